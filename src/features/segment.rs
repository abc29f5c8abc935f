use super::FeatureSchema;
use crate::calendar::CalendarFeatures;
use crate::logging::*;
use crate::spatial::{Cardinal, Coordinate};

/// 区間所要時間モデル (ヒートマップ・区間予測) の特徴量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFeatures {
    pub direction: Cardinal,
    pub length: f64,
    pub street_heading: f64,
    pub start: Coordinate,
    pub end: Coordinate,
    pub current_speed: f64,
    pub congestion_level: f64,
    pub calendar: CalendarFeatures,
}

pub const SEGMENT_WIDTH: usize = 12;

impl FeatureSchema<SEGMENT_WIDTH> for SegmentFeatures {
    const COLUMNS: [&'static str; SEGMENT_WIDTH] = [
        "direction",
        "length",
        "street_heading",
        "start_longitude",
        "start_latitude",
        "end_longitude",
        "end_latitude",
        "current_speed",
        "congestion_level",
        "hour_of_day",
        "day_of_week",
        "month",
    ];

    fn to_row(&self) -> [f64; SEGMENT_WIDTH] {
        [
            f64::from(self.direction.code()),
            self.length,
            self.street_heading,
            self.start.lng,
            self.start.lat,
            self.end.lng,
            self.end.lat,
            self.current_speed,
            self.congestion_level,
            f64::from(self.calendar.hour),
            f64::from(self.calendar.day_of_week),
            f64::from(self.calendar.month),
        ]
    }
}

/// 方向文字列を読む。未知の値は N (先頭の値) にする
pub fn parse_direction_lenient(value: &str) -> Cardinal {
    value.parse().unwrap_or_else(|err| {
        let log = DEFAULT.new(o!("function" => "parse_direction_lenient"));
        warn!(log, "unknown direction, falling back to N"; "error" => %err);
        Cardinal::N
    })
}
