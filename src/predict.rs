//! 単一トリップの所要時間予測


use crate::context::PredictionContext;
use crate::error::Error;
use crate::features::{
    COMMUTE_WIDTH, SEGMENT_WIDTH, SegmentFeatures, apply_forecast_type, build_features,
    to_matrix,
};
use crate::logging::*;
use crate::model::predict_rows;
use crate::trip::TripRequest;
use serde::Serialize;
use std::result::Result;

/// 予測結果 (すべて分)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    pub pred_time_min: f64,
    pub base_time_min: f64,
    pub delay_min: f64,
}

/// 渋滞なしの所要時間 (分)。速度が 0 以下なら 0
pub fn free_flow_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    if speed_kmh <= 0.0 {
        return 0.0;
    }
    distance_km / speed_kmh * 60.0
}

pub fn predict_commute(
    ctx: &PredictionContext,
    request: &TripRequest,
) -> Result<PredictionResult, Error> {
    let log = DEFAULT.new(o!(
        "function" => "predict_commute",
        "mode" => request.mode.to_string(),
        "forecast_type" => request.forecast_type.to_string(),
    ));

    let features = build_features(request, &ctx.regions, &ctx.tables);
    let features = apply_forecast_type(features, request.forecast_type);
    let matrix = to_matrix::<_, COMMUTE_WIDTH>(&[features]);

    let predictions = predict_rows(ctx.commute_model.as_ref(), matrix.view())?;
    let pred_time_min = predictions.first().copied().unwrap_or_default();
    let base_time_min =
        free_flow_minutes(features.route_distance_km, request.mode.reference_speed_kmh());
    let delay_min = (pred_time_min - base_time_min).max(0.0);

    debug!(log, "predicted";
        "distance_km" => features.route_distance_km,
        "pred_time_min" => pred_time_min,
        "base_time_min" => base_time_min,
    );
    Ok(PredictionResult {
        pred_time_min,
        base_time_min,
        delay_min,
    })
}

/// 区間モデルで 1 区間の所要時間 (分) を予測する
pub fn predict_segment(ctx: &PredictionContext, features: &SegmentFeatures) -> Result<f64, Error> {
    let matrix = to_matrix::<_, SEGMENT_WIDTH>(std::slice::from_ref(features));
    let predictions = predict_rows(ctx.segment_model.as_ref(), matrix.view())?;
    Ok(predictions.first().copied().unwrap_or_default())
}
