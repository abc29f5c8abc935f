use super::segment::{SegmentRequest, SegmentResponse};
use super::{AppState, log_failure};
use crate::calendar::parse_timestamp;
use crate::error::Error;
use crate::logging::*;
use crate::predict::{PredictionResult, predict_commute};
use crate::spatial::Coordinate;
use crate::trip::{ForecastType, TravelMode, TripRequest, WeatherOverrides};
use axum::{
    Router,
    extract::{Json, State},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::result::Result;
use std::sync::Arc;

pub fn add_route(app: Router<Arc<AppState>>) -> Router<Arc<AppState>> {
    app.route("/predict", post(predict))
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequest {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
    #[serde(default = "default_mode")]
    pub mode: String,
    pub datetime: String,
    #[serde(default = "default_forecast_type")]
    pub forecast_type: String,
    #[serde(default)]
    pub temp_f: Option<f64>,
    #[serde(default)]
    pub rain_intensity: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

/// `/predict` はトリップ形式と区間形式 (フロントエンドが送る形) の両方を受け付ける
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PredictBody {
    Trip(PredictRequest),
    Segment(SegmentRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Trip(PredictionResult),
    Segment(SegmentResponse),
}

fn default_mode() -> String {
    TravelMode::Driving.to_string()
}

fn default_forecast_type() -> String {
    ForecastType::Overall.to_string()
}

impl PredictRequest {
    pub fn to_trip(&self) -> Result<TripRequest, Error> {
        Ok(TripRequest {
            origin: Coordinate::new(self.origin_lat, self.origin_lng),
            destination: Coordinate::new(self.dest_lat, self.dest_lng),
            mode: TravelMode::parse_lenient(&self.mode),
            timestamp: parse_timestamp(&self.datetime)?,
            forecast_type: ForecastType::parse_lenient(&self.forecast_type),
            overrides: WeatherOverrides {
                temp_f: self.temp_f,
                rain_intensity: self.rain_intensity,
                humidity: self.humidity,
            },
        })
    }
}

pub(super) async fn predict(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PredictBody>,
) -> Result<Json<PredictResponse>, Error> {
    let result = match &body {
        PredictBody::Trip(request) => {
            let log = DEFAULT.new(o!(
                "function" => "web::predict",
                "mode" => request.mode.clone(),
                "forecast_type" => request.forecast_type.clone(),
            ));
            info!(log, "start");
            request
                .to_trip()
                .and_then(|trip| predict_commute(&state.context, &trip))
                .map(PredictResponse::Trip)
                .inspect_err(|err| log_failure(&log, err))
        }
        PredictBody::Segment(request) => {
            let log = DEFAULT.new(o!(
                "function" => "web::predict",
                "direction" => request.direction.clone(),
            ));
            info!(log, "start segment");
            request
                .predict(&state.context)
                .map(PredictResponse::Segment)
                .inspect_err(|err| log_failure(&log, err))
        }
    };
    result.map(Json)
}
