//! Proxy server adapter.
//!
//! Keeps the upstream API keys on the server and exposes the price and
//! analysis endpoints browsers and `BackendAdapter` call, plus report
//! generation over the full pipeline.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::orchestrator::ReportOrchestrator;
use crate::ports::analysis_port::AnalysisPort;
use crate::ports::price_port::PricePort;

pub struct AppState {
    pub prices: Arc<dyn PricePort>,
    pub analysis: Arc<dyn AnalysisPort>,
    pub orchestrator: ReportOrchestrator,
}

impl AppState {
    pub fn new(prices: Arc<dyn PricePort>, analysis: Arc<dyn AnalysisPort>) -> Self {
        let orchestrator = ReportOrchestrator::new(prices.clone(), analysis.clone());
        Self {
            prices,
            analysis,
            orchestrator,
        }
    }
}

/// CORS for the configured origins; unparsable origins are skipped.
///
/// A `*` entry allows any origin, without credentials.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if allowed_origins.iter().any(|origin| origin.trim() == "*") {
        warn!("allowed_origins contains '*'; allowing any origin without credentials");
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/stock/{ticker}", get(handlers::stock))
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/report", get(handlers::report_json))
        .route("/report", get(handlers::report_page))
        .fallback(handlers::not_found)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
