use super::{AppState, log_failure};
use crate::calendar::parse_timestamp;
use crate::error::Error;
use crate::heatmap::{HeatmapCell, HeatmapRequest, predict_heatmap};
use crate::logging::*;
use crate::spatial::Coordinate;
use axum::{
    Router,
    extract::{Json, State},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::result::Result;
use std::sync::Arc;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/heatmap", post(heatmap))
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeatmapBody {
    pub points: Vec<Coordinate>,
    pub current_speed: f64,
    pub congestion_level: f64,
    pub datetime_str: String,
    #[serde(default)]
    pub destination: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapResponse {
    pub data: Vec<HeatmapCell>,
}

impl HeatmapBody {
    /// 目的地が無ければ既定の目的地を使う
    pub fn into_request(self, default_destination: Coordinate) -> Result<HeatmapRequest, Error> {
        Ok(HeatmapRequest {
            timestamp: parse_timestamp(&self.datetime_str)?,
            destination: self.destination.unwrap_or(default_destination),
            points: self.points,
            current_speed: self.current_speed,
            congestion_level: self.congestion_level,
        })
    }
}

pub(super) async fn heatmap(
    State(state): State<Arc<AppState>>,
    Json(body): Json<HeatmapBody>,
) -> Result<Json<HeatmapResponse>, Error> {
    let log = DEFAULT.new(o!(
        "function" => "web::heatmap",
        "points" => body.points.len(),
    ));
    info!(log, "start");

    let result = body
        .into_request(state.context.heatmap_destination)
        .and_then(|request| predict_heatmap(&state.context, &request));
    match result {
        Ok(data) => Ok(Json(HeatmapResponse { data })),
        Err(err) => {
            log_failure(&log, &err);
            Err(err)
        }
    }
}
