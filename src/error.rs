use crate::calendar::TimestampError;
use crate::model::ModelError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;


/// リクエスト処理中のエラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Model invocation failed: {0}")]
    Model(#[from] ModelError),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidTimestamp(_) => StatusCode::BAD_REQUEST,
            Error::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TimestampError> for Error {
    fn from(err: TimestampError) -> Self {
        Error::InvalidTimestamp(err.0)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
