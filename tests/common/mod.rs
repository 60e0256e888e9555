#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::sync::Mutex;
use stockbrief::domain::analysis::AnalysisText;
use stockbrief::domain::error::{PipelineError, Upstream};
pub use stockbrief::domain::price::{DateRange, PricePoint, PriceSeries};
use stockbrief::domain::prompt::AnalysisRequest;
pub use stockbrief::domain::ticker::{Ticker, TickerSet};
use stockbrief::ports::analysis_port::AnalysisPort;
use stockbrief::ports::price_port::PricePort;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, PipelineError>,
    pub calls: Mutex<Vec<String>>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_points(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, error: PipelineError) -> Self {
        self.errors.insert(ticker.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PricePort for MockPricePort {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        _range: &DateRange,
    ) -> Result<PriceSeries, PipelineError> {
        self.calls.lock().unwrap().push(ticker.to_string());
        if let Some(err) = self.errors.get(ticker.as_str()) {
            return Err(err.clone());
        }
        let points = self.data.get(ticker.as_str()).cloned().unwrap_or_default();
        Ok(PriceSeries::new(ticker.clone(), points))
    }
}

pub struct MockAnalysisPort {
    pub responses: HashMap<String, String>,
    pub errors: HashMap<String, PipelineError>,
    pub requests: Mutex<Vec<AnalysisRequest>>,
}

impl MockAnalysisPort {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            errors: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_response(mut self, ticker: &str, text: &str) -> Self {
        self.responses.insert(ticker.to_string(), text.to_string());
        self
    }

    pub fn with_error(mut self, ticker: &str, error: PipelineError) -> Self {
        self.errors.insert(ticker.to_string(), error);
        self
    }

    pub fn requests(&self) -> Vec<AnalysisRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisPort for MockAnalysisPort {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisText, PipelineError> {
        self.requests.lock().unwrap().push(request.clone());
        let ticker = request.ticker.as_str();
        if let Some(err) = self.errors.get(ticker) {
            return Err(err.clone());
        }
        let text = self.responses.get(ticker).cloned().unwrap_or_else(|| {
            format!(
                "SUMMARY: {ticker} traded sideways.\nTECHNICAL: No clear pattern.\nRECOMMENDATION: HOLD on mixed signals."
            )
        });
        Ok(AnalysisText::new(text))
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_point(date_str: &str, close: f64) -> PricePoint {
    PricePoint {
        date: date(date_str),
        open: close,
        high: close * 1.01,
        low: close * 0.99,
        close,
        volume: 1_000_000.0,
    }
}

/// `count` consecutive daily points from `start`, closing up 1.0 per day.
pub fn generate_points(start: &str, count: usize, base_close: f64) -> Vec<PricePoint> {
    let start = date(start);
    (0..count)
        .map(|i| {
            let close = base_close + i as f64;
            PricePoint {
                date: start + Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1_000_000.0 + (i as f64) * 1000.0,
            }
        })
        .collect()
}

pub fn ticker(s: &str) -> Ticker {
    Ticker::new(s).unwrap()
}

pub fn test_range() -> DateRange {
    DateRange::trailing(date("2024-03-31"))
}

pub fn unavailable_prices(reason: &str) -> PipelineError {
    PipelineError::unavailable(Upstream::PriceData, reason)
}

pub fn unavailable_analysis(reason: &str) -> PipelineError {
    PipelineError::unavailable(Upstream::Analysis, reason)
}
