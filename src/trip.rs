//! 1 回の予測リクエストを表すドメイン型

#[cfg(test)]
mod tests;

use crate::logging::*;
use crate::spatial::Coordinate;
use chrono::NaiveDateTime;
use std::fmt;
use std::result::Result;
use std::str::FromStr;

/// 移動手段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
    Transit,
}

impl TravelMode {
    /// 特徴量ベクトルでの数値表現
    pub fn code(self) -> u8 {
        match self {
            TravelMode::Driving => 0,
            TravelMode::Walking => 1,
            TravelMode::Cycling => 2,
            TravelMode::Transit => 3,
        }
    }

    /// 自由流の基準速度 (km/h)
    pub fn reference_speed_kmh(self) -> f64 {
        match self {
            TravelMode::Walking => 5.0,
            TravelMode::Cycling => 15.0,
            TravelMode::Transit => 25.0,
            TravelMode::Driving => 45.0,
        }
    }

    /// 未知の文字列は Driving として扱い、警告を残す
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            let log = DEFAULT.new(o!("function" => "TravelMode::parse_lenient"));
            warn!(log, "unknown travel mode, falling back to driving"; "mode" => value);
            TravelMode::Driving
        })
    }
}

impl FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "cycling" => Ok(TravelMode::Cycling),
            "transit" => Ok(TravelMode::Transit),
            _ => Err(format!("unknown travel mode: {}", s)),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
            TravelMode::Transit => "transit",
        };
        write!(f, "{}", s)
    }
}

/// 予測で切り分ける要因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ForecastType {
    #[default]
    Overall,
    Congestion,
    Weather,
    Accidents,
}

impl ForecastType {
    /// 未知の文字列は Overall (何も中和しない) として扱う
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            let log = DEFAULT.new(o!("function" => "ForecastType::parse_lenient"));
            warn!(log, "unknown forecast type, falling back to overall"; "forecast_type" => value);
            ForecastType::Overall
        })
    }
}

impl FromStr for ForecastType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overall" => Ok(ForecastType::Overall),
            "congestion" => Ok(ForecastType::Congestion),
            "weather" => Ok(ForecastType::Weather),
            "accidents" => Ok(ForecastType::Accidents),
            _ => Err(format!("unknown forecast type: {}", s)),
        }
    }
}

impl fmt::Display for ForecastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ForecastType::Overall => "overall",
            ForecastType::Congestion => "congestion",
            ForecastType::Weather => "weather",
            ForecastType::Accidents => "accidents",
        };
        write!(f, "{}", s)
    }
}

/// 利用者が指定した気象値 (テーブル値・既定値より常に優先)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeatherOverrides {
    pub temp_f: Option<f64>,
    pub rain_intensity: Option<f64>,
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub mode: TravelMode,
    pub timestamp: NaiveDateTime,
    pub forecast_type: ForecastType,
    pub overrides: WeatherOverrides,
}
