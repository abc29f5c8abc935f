//! 起動時に一度だけ組み立て、以後は読み取り専用で共有する予測コンテキスト

#[cfg(test)]
mod tests;

use crate::Result;
use crate::config;
use crate::features::{
    COMMUTE_WIDTH, CommuteFeatures, FeatureSchema, SEGMENT_WIDTH, SegmentFeatures,
};
use crate::logging::*;
use crate::lookup::LookupTables;
use crate::lookup::load::load_tables;
use crate::model::{TravelTimeModel, load_model};
use crate::spatial::{Coordinate, RegionMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// スタンドインモデルが距離として読む列
const COMMUTE_DISTANCE_COLUMN: usize = 0;
const SEGMENT_DISTANCE_COLUMN: usize = 1;

pub struct PredictionContext {
    pub commute_model: Arc<dyn TravelTimeModel>,
    pub segment_model: Arc<dyn TravelTimeModel>,
    pub tables: LookupTables,
    pub regions: RegionMap,
    pub heatmap_destination: Coordinate,
}

impl PredictionContext {
    pub fn new(
        commute_model: Arc<dyn TravelTimeModel>,
        segment_model: Arc<dyn TravelTimeModel>,
        tables: LookupTables,
        regions: RegionMap,
        heatmap_destination: Coordinate,
    ) -> Self {
        Self {
            commute_model,
            segment_model,
            tables,
            regions,
            heatmap_destination,
        }
    }

    /// 設定に従ってテーブル・リージョン・モデルを読み込む
    pub fn load() -> Result<Self> {
        let log = DEFAULT.new(o!("function" => "PredictionContext::load"));

        let tables = load_tables(
            Path::new(&config::get("CONGESTION_TABLE_PATH")?),
            Path::new(&config::get("WEATHER_TABLE_PATH")?),
            Path::new(&config::get("CRASH_TABLE_PATH")?),
        )?;

        let regions_path = optional_path("REGIONS_PATH");
        let regions = RegionMap::load(regions_path.as_deref())?;
        info!(log, "regions ready"; "count" => regions.len());

        let noise = config::get_f64("STAND_IN_NOISE_MINUTES")?;
        let commute_model = load_model(
            "commute",
            optional_path("COMMUTE_MODEL_PATH").as_deref(),
            &<CommuteFeatures as FeatureSchema<COMMUTE_WIDTH>>::COLUMNS,
            COMMUTE_DISTANCE_COLUMN,
            noise,
        )?;
        let segment_model = load_model(
            "segment",
            optional_path("SEGMENT_MODEL_PATH").as_deref(),
            &<SegmentFeatures as FeatureSchema<SEGMENT_WIDTH>>::COLUMNS,
            SEGMENT_DISTANCE_COLUMN,
            noise,
        )?;

        let heatmap_destination = Coordinate::new(
            config::get_f64("HEATMAP_DESTINATION_LAT")?,
            config::get_f64("HEATMAP_DESTINATION_LNG")?,
        );
        info!(log, "prediction context loaded";
            "heatmap_destination_lat" => heatmap_destination.lat,
            "heatmap_destination_lng" => heatmap_destination.lng,
        );

        Ok(Self::new(
            commute_model,
            segment_model,
            tables,
            regions,
            heatmap_destination,
        ))
    }
}

fn optional_path(name: &str) -> Option<PathBuf> {
    config::get_optional(name).map(PathBuf::from)
}
