//! 複数の出発点から 1 つの目的地への遅延ヒートマップ


use crate::calendar::CalendarFeatures;
use crate::context::PredictionContext;
use crate::error::Error;
use crate::features::{SEGMENT_WIDTH, SegmentFeatures, to_matrix};
use crate::logging::*;
use crate::model::predict_rows;
use crate::predict::free_flow_minutes;
use crate::spatial::{Coordinate, bearing_degrees, bearing_to_cardinal, haversine_km};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::result::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapRequest {
    pub points: Vec<Coordinate>,
    pub current_speed: f64,
    pub congestion_level: f64,
    pub timestamp: NaiveDateTime,
    pub destination: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatmapCell {
    pub lat: f64,
    pub lng: f64,
    pub weight: f64,
}

/// 出発点から目的地への幾何特徴だけで区間特徴量を作る
pub fn point_features(
    point: Coordinate,
    destination: Coordinate,
    current_speed: f64,
    congestion_level: f64,
    calendar: CalendarFeatures,
) -> SegmentFeatures {
    let bearing = bearing_degrees(point, destination);
    SegmentFeatures {
        direction: bearing_to_cardinal(bearing),
        length: haversine_km(point, destination),
        street_heading: bearing,
        start: point,
        end: destination,
        current_speed,
        congestion_level,
        calendar,
    }
}

/// 全地点をまとめて 1 回だけモデルに渡し、入力順のまま重みを返す
///
/// 重みは |予測 - 基準| でクランプしない。
pub fn predict_heatmap(
    ctx: &PredictionContext,
    request: &HeatmapRequest,
) -> Result<Vec<HeatmapCell>, Error> {
    let log = DEFAULT.new(o!(
        "function" => "predict_heatmap",
        "points" => request.points.len(),
    ));
    if request.points.is_empty() {
        return Ok(Vec::new());
    }

    let calendar = CalendarFeatures::from_timestamp(request.timestamp);
    let rows: Vec<SegmentFeatures> = request
        .points
        .iter()
        .map(|&point| {
            point_features(
                point,
                request.destination,
                request.current_speed,
                request.congestion_level,
                calendar,
            )
        })
        .collect();
    let matrix = to_matrix::<_, SEGMENT_WIDTH>(&rows);
    let predictions = predict_rows(ctx.segment_model.as_ref(), matrix.view())?;

    let cells: Vec<HeatmapCell> = rows
        .iter()
        .zip(predictions)
        .map(|(row, predicted)| {
            let baseline = free_flow_minutes(row.length, request.current_speed);
            HeatmapCell {
                lat: row.start.lat,
                lng: row.start.lng,
                weight: (predicted - baseline).abs(),
            }
        })
        .collect();
    debug!(log, "heatmap computed"; "cells" => cells.len());
    Ok(cells)
}
