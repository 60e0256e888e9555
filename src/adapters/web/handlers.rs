//! HTTP request handlers for the proxy server.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::adapters::backend_adapter::{AnalyzeBody, AnalyzeReply};
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::adapters::polygon_adapter::{series_from_value, AggregatesPayload};
use crate::domain::analysis::parse_analysis;
use crate::domain::metrics::DerivedMetrics;
use crate::domain::price::{DateRange, PriceSeries};
use crate::domain::prompt::AnalysisRequest;
use crate::domain::report::{GenerationMode, Report};
use crate::domain::ticker::{parse_symbols, Ticker, TickerSet};
use crate::ports::report_port::ReportPort;

use super::{AppState, WebError};

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub tickers: Option<String>,
    #[serde(default)]
    pub mode: GenerationMode,
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, WebError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| WebError::bad_request(format!("Invalid {field} date, expected YYYY-MM-DD")))
}

/// Both bounds or neither; missing bounds mean the trailing default window.
fn resolve_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, WebError> {
    match (start, end) {
        (Some(start), Some(end)) => {
            let start = parse_date("start", start)?;
            let end = parse_date("end", end)?;
            DateRange::new(start, end)
                .ok_or_else(|| WebError::bad_request("start date is after end date"))
        }
        (None, None) => Ok(DateRange::trailing_from_now()),
        _ => Err(WebError::bad_request("start and end must be given together")),
    }
}

fn parse_ticker(raw: &str) -> Result<Ticker, WebError> {
    if raw.trim().is_empty() {
        return Err(WebError::bad_request("Ticker is required"));
    }
    Ticker::new(raw).ok_or_else(|| WebError::bad_request("Invalid ticker symbol"))
}

pub async fn stock(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<AggregatesPayload>, WebError> {
    let ticker = parse_ticker(&ticker)?;
    let range = resolve_range(query.start.as_deref(), query.end.as_deref())?;

    let series = state.prices.fetch_series(&ticker, &range).await.map_err(|e| {
        warn!(ticker = %ticker, error = %e, "price fetch failed");
        WebError::bad_gateway(e.to_string())
    })?;

    Ok(Json(AggregatesPayload::from(&series)))
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Response, WebError> {
    let ticker = parse_ticker(body.ticker.as_deref().unwrap_or_default())?;
    let range = resolve_range(body.start_date.as_deref(), body.end_date.as_deref())?;

    let series = match &body.stock_data {
        Some(data) => series_from_value(&ticker, data)
            .map_err(|e| WebError::bad_request(format!("Invalid stockData: {e}")))?,
        None => PriceSeries::empty(ticker.clone()),
    };
    let metrics = DerivedMetrics::derive(&series);
    let request = AnalysisRequest::new(series, metrics, range);

    match state.analysis.analyze(&request).await {
        Ok(text) => {
            let result = parse_analysis(&text);
            Ok(Json(AnalyzeReply {
                summary: result.summary,
                technical: result.technical,
                recommendation: result.recommendation,
                full_response: Some(text.0),
                error: None,
            })
            .into_response())
        }
        Err(e) => {
            warn!(ticker = %ticker, error = %e, "analysis failed");
            let reply = AnalyzeReply {
                summary: format!("Unable to generate real-time analysis for {ticker}."),
                technical: "API connection error. Please try again later.".into(),
                recommendation: "Analysis unavailable.".into(),
                full_response: None,
                error: Some(e.to_string()),
            };
            Ok((StatusCode::BAD_GATEWAY, Json(reply)).into_response())
        }
    }
}

async fn generate(state: &AppState, query: ReportQuery) -> Result<Report, WebError> {
    let symbols = query.tickers.as_deref().map(parse_symbols).unwrap_or_default();
    let mut tickers = TickerSet::from_symbols(&symbols);
    let range = DateRange::trailing_from_now();
    Ok(state
        .orchestrator
        .generate(&mut tickers, range, query.mode)
        .await?)
}

pub async fn report_json(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Report>, WebError> {
    generate(&state, query).await.map(Json)
}

pub async fn report_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Html<String>, WebError> {
    let report = generate(&state, query).await?;
    let html = HtmlReportAdapter::new().render(&report)?;
    Ok(Html(html))
}

pub async fn not_found() -> WebError {
    WebError::new(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_requires_both_bounds() {
        assert!(resolve_range(Some("2024-03-01"), None).is_err());
        assert!(resolve_range(None, None).is_ok());
        let range = resolve_range(Some("2024-03-01"), Some("2024-03-30")).unwrap();
        assert_eq!(range.to_string(), "2024-03-01 to 2024-03-30");
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = resolve_range(Some("2024-03-30"), Some("2024-03-01")).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn blank_ticker_is_rejected() {
        let err = parse_ticker("  ").unwrap_err();
        assert_eq!(err.message, "Ticker is required");
    }

    #[test]
    fn path_like_ticker_is_rejected() {
        let err = parse_ticker("../../v1/other#").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Invalid ticker symbol");
    }
}
