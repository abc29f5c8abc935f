#[cfg(test)]
mod tests;

use super::Coordinate;
use crate::Result;
use crate::logging::*;
use anyhow::{Context, anyhow, bail};
use geo::{Contains, MultiPolygon, Point};
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// 交通集計に使うリージョン ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// どのリージョンにも含まれない座標の割り当て先
pub const DEFAULT_REGION: RegionId = RegionId(1);

/// リージョン分割 (起動時に一度だけ読み込む)
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    regions: Vec<(RegionId, MultiPolygon<f64>)>,
}

impl RegionMap {
    /// 分割なし: すべての座標が DEFAULT_REGION になる
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(regions: Vec<(RegionId, MultiPolygon<f64>)>) -> Self {
        Self { regions }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// 座標を含む最初のリージョンを返す。該当なしは DEFAULT_REGION
    pub fn region_for_point(&self, point: Coordinate) -> RegionId {
        let p = Point::new(point.lng, point.lat);
        self.regions
            .iter()
            .find(|(_, area)| area.contains(&p))
            .map(|(id, _)| *id)
            .unwrap_or(DEFAULT_REGION)
    }

    /// GeoJSON FeatureCollection から読み込む
    ///
    /// 各 Feature は整数の `region_id` プロパティと Polygon / MultiPolygon を持つこと。
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let geojson: GeoJson = text.parse().context("failed to parse region GeoJSON")?;
        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => bail!("region GeoJSON must be a FeatureCollection"),
        };

        let mut regions = Vec::with_capacity(collection.features.len());
        for (index, feature) in collection.features.into_iter().enumerate() {
            let id = feature
                .property("region_id")
                .and_then(|v| v.as_u64())
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| anyhow!("feature #{} has no integer region_id", index))?;
            let geometry = feature
                .geometry
                .ok_or_else(|| anyhow!("feature #{} (region {}) has no geometry", index, id))?;
            let geometry = geo::Geometry::<f64>::try_from(geometry.value)
                .with_context(|| format!("feature #{} (region {})", index, id))?;
            let area = match geometry {
                geo::Geometry::Polygon(polygon) => MultiPolygon::new(vec![polygon]),
                geo::Geometry::MultiPolygon(multi) => multi,
                _ => bail!("feature #{} (region {}) is not a polygon", index, id),
            };
            regions.push((RegionId(id), area));
        }
        Ok(Self::new(regions))
    }

    /// パスが空なら分割なし
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let log = DEFAULT.new(o!("function" => "RegionMap::load"));
        let Some(path) = path else {
            warn!(log, "no region partition configured, every point maps to the default region";
                "default_region" => %DEFAULT_REGION,
            );
            return Ok(Self::empty());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let map = Self::from_geojson_str(&text)?;
        info!(log, "region partition loaded";
            "path" => %path.display(),
            "regions" => map.len(),
        );
        Ok(map)
    }
}
