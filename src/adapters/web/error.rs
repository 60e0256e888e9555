//! JSON error responses for the proxy server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::StockbriefError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

pub fn status_from_error(err: &StockbriefError) -> StatusCode {
    match err {
        StockbriefError::EmptySelection
        | StockbriefError::ConfigMissing { .. }
        | StockbriefError::ConfigInvalid { .. }
        | StockbriefError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        StockbriefError::HttpClient { .. }
        | StockbriefError::Render { .. }
        | StockbriefError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<StockbriefError> for WebError {
    fn from(err: StockbriefError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
