//! 時刻の正規化とカレンダー特徴量


use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

/// すべての時系列テーブルの結合キーとなるバケット幅 (分)
pub const BUCKET_MINUTES: u32 = 5;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// リクエストやデータファイルの時刻文字列を読む
///
/// タイムゾーン変換はしない。オフセット付き (RFC 3339) の場合は壁時計の値をそのまま使う。
/// 日付のみ (`YYYY-MM-DD`) はその日の 0 時とする。
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = value.trim();
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        && let Some(ts) = date.and_hms_opt(0, 0, 0)
    {
        return Ok(ts);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|ts| ts.naive_local())
        .map_err(|_| TimestampError(value.to_string()))
}

/// 5 分境界へ切り捨てる
pub fn floor_to_bucket(ts: NaiveDateTime) -> NaiveDateTime {
    let minute = ts.minute() - ts.minute() % BUCKET_MINUTES;
    ts.date()
        .and_hms_opt(ts.hour(), minute, 0)
        .unwrap_or(ts)
}

/// 12-2 月: 0 (冬), 3-5 月: 1 (春), 6-8 月: 2 (夏), 9-11 月: 3 (秋)
pub fn season_for_month(month: u32) -> u8 {
    match month {
        12 | 1 | 2 => 0,
        3..=5 => 1,
        6..=8 => 2,
        _ => 3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    /// 0-23
    pub hour: u32,
    /// 0 = 月曜 .. 6 = 日曜
    pub day_of_week: u32,
    pub is_weekend: bool,
    /// 1-12
    pub month: u32,
    pub season: u8,
}

impl CalendarFeatures {
    pub fn from_timestamp(ts: NaiveDateTime) -> Self {
        let day_of_week = ts.weekday().num_days_from_monday();
        let month = ts.month();
        Self {
            hour: ts.hour(),
            day_of_week,
            is_weekend: day_of_week >= 5,
            month,
            season: season_for_month(month),
        }
    }
}
