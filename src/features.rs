//! 予測モデルへ渡す特徴量の組み立て
//!
//! 列の並びは学習済みモデルとの外部契約なので、`FeatureSchema::COLUMNS` と
//! `to_row` を必ず同じ順序で保つこと。

pub mod segment;


use crate::calendar::{CalendarFeatures, floor_to_bucket};
use crate::logging::*;
use crate::lookup::{
    DEFAULT_CRASH_COUNT, DEFAULT_HUMIDITY, DEFAULT_MEAN_CONGESTION, DEFAULT_MEAN_SPEED,
    DEFAULT_RAIN_INTENSITY, DEFAULT_TEMP_F, LookupTables, WeatherRecord,
};
use crate::spatial::{RegionId, RegionMap, route_distance_km};
use crate::trip::{ForecastType, TravelMode, TripRequest};
use ndarray::Array2;

pub use segment::{SEGMENT_WIDTH, SegmentFeatures};

/// 固定長の特徴量行
pub trait FeatureSchema<const N: usize> {
    /// モデル学習時の列名 (この順で `to_row` が値を並べる)
    const COLUMNS: [&'static str; N];

    fn to_row(&self) -> [f64; N];
}

/// 行の並びを保ったまま (rows × N) の行列にする
pub fn to_matrix<T, const N: usize>(rows: &[T]) -> Array2<f64>
where
    T: FeatureSchema<N>,
{
    let mut matrix = Array2::zeros((rows.len(), N));
    for (mut target, row) in matrix.rows_mut().into_iter().zip(rows) {
        for (cell, value) in target.iter_mut().zip(row.to_row()) {
            *cell = value;
        }
    }
    matrix
}

/// 通勤時間モデルの特徴量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommuteFeatures {
    pub route_distance_km: f64,
    pub origin_region_id: RegionId,
    pub destination_region_id: RegionId,
    pub mode: TravelMode,
    pub mean_speed: f64,
    pub mean_congestion: f64,
    pub temp_f: f64,
    pub rain_intensity: f64,
    pub humidity: f64,
    pub crash_count_60min: u32,
    pub calendar: CalendarFeatures,
}

pub const COMMUTE_WIDTH: usize = 15;

impl FeatureSchema<COMMUTE_WIDTH> for CommuteFeatures {
    const COLUMNS: [&'static str; COMMUTE_WIDTH] = [
        "route_distance_km",
        "origin_region_id",
        "destination_region_id",
        "mode",
        "mean_speed",
        "mean_congestion",
        "temp_f",
        "rain_intensity",
        "humidity",
        "crash_count_60min",
        "hour",
        "day_of_week",
        "is_weekend",
        "month",
        "season",
    ];

    fn to_row(&self) -> [f64; COMMUTE_WIDTH] {
        [
            self.route_distance_km,
            f64::from(self.origin_region_id.0),
            f64::from(self.destination_region_id.0),
            f64::from(self.mode.code()),
            self.mean_speed,
            self.mean_congestion,
            self.temp_f,
            self.rain_intensity,
            self.humidity,
            f64::from(self.crash_count_60min),
            f64::from(self.calendar.hour),
            f64::from(self.calendar.day_of_week),
            if self.calendar.is_weekend { 1.0 } else { 0.0 },
            f64::from(self.calendar.month),
            f64::from(self.calendar.season),
        ]
    }
}

/// リクエストと集計テーブルから特徴量を組み立てる
pub fn build_features(
    request: &TripRequest,
    regions: &RegionMap,
    tables: &LookupTables,
) -> CommuteFeatures {
    let bucket = floor_to_bucket(request.timestamp);
    let log = DEFAULT.new(o!(
        "function" => "build_features",
        "bucket" => bucket.to_string(),
    ));

    let origin_region = regions.region_for_point(request.origin);
    let destination_region = regions.region_for_point(request.destination);
    let distance = route_distance_km(request.origin, request.destination, request.mode);

    // 両端とも取れたときだけ平均する (片方だけ実データを混ぜない)
    let origin_congestion = tables.congestion.lookup(origin_region, bucket);
    let destination_congestion = tables.congestion.lookup(destination_region, bucket);
    let (mean_speed, mean_congestion) = match (origin_congestion, destination_congestion) {
        (Some(o), Some(d)) => (
            (o.mean_speed + d.mean_speed) / 2.0,
            (o.mean_congestion + d.mean_congestion) / 2.0,
        ),
        _ => {
            debug!(log, "congestion lookup missed, using defaults";
                "origin_region" => %origin_region,
                "destination_region" => %destination_region,
            );
            (DEFAULT_MEAN_SPEED, DEFAULT_MEAN_CONGESTION)
        }
    };

    let weather = tables.weather.lookup(bucket).unwrap_or_else(|| {
        debug!(log, "weather lookup missed, using defaults");
        WeatherRecord::default()
    });
    let overrides = request.overrides;

    CommuteFeatures {
        route_distance_km: distance,
        origin_region_id: origin_region,
        destination_region_id: destination_region,
        mode: request.mode,
        mean_speed,
        mean_congestion,
        temp_f: overrides.temp_f.unwrap_or(weather.temp_f),
        rain_intensity: overrides.rain_intensity.unwrap_or(weather.rain_intensity),
        humidity: overrides.humidity.unwrap_or(weather.humidity),
        crash_count_60min: tables.crashes.count(origin_region, bucket),
        calendar: CalendarFeatures::from_timestamp(bucket),
    }
}

/// 注目する要因以外の特徴量群を既定値へ戻す
pub fn apply_forecast_type(features: CommuteFeatures, forecast_type: ForecastType) -> CommuteFeatures {
    let neutral_weather = CommuteFeatures {
        temp_f: DEFAULT_TEMP_F,
        rain_intensity: DEFAULT_RAIN_INTENSITY,
        humidity: DEFAULT_HUMIDITY,
        ..features
    };
    match forecast_type {
        ForecastType::Overall => features,
        ForecastType::Congestion => CommuteFeatures {
            crash_count_60min: DEFAULT_CRASH_COUNT,
            ..neutral_weather
        },
        ForecastType::Weather => CommuteFeatures {
            mean_speed: DEFAULT_MEAN_SPEED,
            mean_congestion: DEFAULT_MEAN_CONGESTION,
            crash_count_60min: DEFAULT_CRASH_COUNT,
            ..features
        },
        ForecastType::Accidents => neutral_weather,
    }
}
