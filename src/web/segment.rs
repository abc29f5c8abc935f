use super::{AppState, log_failure};
use crate::calendar::{CalendarFeatures, parse_timestamp};
use crate::context::PredictionContext;
use crate::error::Error;
use crate::features::SegmentFeatures;
use crate::features::segment::parse_direction_lenient;
use crate::logging::*;
use crate::predict::predict_segment;
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
    app.route("/predict/segment", post(predict_travel_time))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentRequest {
    pub direction: String,
    pub length: f64,
    pub street_heading: f64,
    pub start_latitude: f64,
    pub start_longitude: f64,
    pub end_latitude: f64,
    pub end_longitude: f64,
    pub current_speed: f64,
    pub congestion_level: f64,
    pub datetime_str: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentResponse {
    pub travel_time_min: f64,
}

impl SegmentRequest {
    pub fn to_features(&self) -> Result<SegmentFeatures, Error> {
        let timestamp = parse_timestamp(&self.datetime_str)?;
        Ok(SegmentFeatures {
            direction: parse_direction_lenient(&self.direction),
            length: self.length,
            street_heading: self.street_heading,
            start: Coordinate::new(self.start_latitude, self.start_longitude),
            end: Coordinate::new(self.end_latitude, self.end_longitude),
            current_speed: self.current_speed,
            congestion_level: self.congestion_level,
            calendar: CalendarFeatures::from_timestamp(timestamp),
        })
    }

    pub(super) fn predict(&self, ctx: &PredictionContext) -> Result<SegmentResponse, Error> {
        let features = self.to_features()?;
        let travel_time_min = predict_segment(ctx, &features)?;
        Ok(SegmentResponse { travel_time_min })
    }
}

pub(super) async fn predict_travel_time(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SegmentRequest>,
) -> Result<Json<SegmentResponse>, Error> {
    let log = DEFAULT.new(o!(
        "function" => "web::predict_travel_time",
        "direction" => request.direction.clone(),
    ));

    match request.predict(&state.context) {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            log_failure(&log, &err);
            Err(err)
        }
    }
}
