//! 座標まわりの純粋関数群 (距離・方位・リージョン判定)

pub mod regions;


use crate::trip::TravelMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use regions::{DEFAULT_REGION, RegionId, RegionMap};

/// 地球半径 (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// 緯度経度 (度)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// 大円距離 (km)
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_phi = (to.lat - from.lat).to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// 経路距離 (km)
///
/// ルーティングサービスが無いため大円距離で近似する。
/// `mode` は移動手段ごとの経路グラフを導入するときのために受け取っている。
pub fn route_distance_km(from: Coordinate, to: Coordinate, _mode: TravelMode) -> f64 {
    haversine_km(from, to)
}

/// `from` から `to` への初期方位 (度, [0, 360))
///
/// 同一地点は 0 (北) を返す。
pub fn bearing_degrees(from: Coordinate, to: Coordinate) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    // atan2 は [-180, 180] なので +360 した後の剰余で [0, 360) に収まる
    let theta = y.atan2(x).to_degrees();
    (theta + 360.0) % 360.0
}

/// 4 方位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cardinal {
    N,
    S,
    E,
    W,
}

impl Cardinal {
    /// セグメントモデルの DIRECTION 列の値
    pub fn code(self) -> u8 {
        match self {
            Cardinal::N => 0,
            Cardinal::S => 1,
            Cardinal::E => 2,
            Cardinal::W => 3,
        }
    }
}

impl fmt::Display for Cardinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Cardinal::N => "N",
            Cardinal::S => "S",
            Cardinal::E => "E",
            Cardinal::W => "W",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0:?}")]
pub struct UnknownDirection(pub String);

impl FromStr for Cardinal {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Cardinal::N),
            "S" => Ok(Cardinal::S),
            "E" => Ok(Cardinal::E),
            "W" => Ok(Cardinal::W),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// 方位を 4 象限に分類する
///
/// 境界 45/135/225/315 はそれぞれ上側の象限に含まれる。
pub fn bearing_to_cardinal(bearing: f64) -> Cardinal {
    if (45.0..135.0).contains(&bearing) {
        Cardinal::E
    } else if (135.0..225.0).contains(&bearing) {
        Cardinal::S
    } else if (225.0..315.0).contains(&bearing) {
        Cardinal::W
    } else {
        Cardinal::N
    }
}
