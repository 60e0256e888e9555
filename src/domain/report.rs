//! Assembled report: one entry per ticker plus a closing disclaimer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;
use super::demo::DemoModeAdapter;
use super::metrics::{format_price, format_volume, DerivedMetrics, NOT_AVAILABLE};
use super::price::DateRange;
use super::samples::{sample_analysis, unavailable_analysis, DISCLAIMER, FALLBACK_WARNING};
use super::ticker::Ticker;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Live,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerReport {
    pub ticker: Ticker,
    pub metrics: Option<DerivedMetrics>,
    pub analysis: AnalysisResult,
    pub used_fallback: bool,
    pub warning: Option<String>,
}

impl TickerReport {
    pub fn live(ticker: Ticker, metrics: Option<DerivedMetrics>, analysis: AnalysisResult) -> Self {
        Self {
            ticker,
            metrics,
            analysis,
            used_fallback: false,
            warning: None,
        }
    }

    /// Cached sample (or generic placeholder) after a failed pipeline.
    pub fn fallback(ticker: Ticker) -> Self {
        let analysis = sample_analysis(&ticker).unwrap_or_else(|| unavailable_analysis(&ticker));
        Self {
            ticker,
            metrics: None,
            analysis,
            used_fallback: true,
            warning: Some(FALLBACK_WARNING.to_string()),
        }
    }

    pub fn demo(ticker: Ticker) -> Self {
        let analysis = DemoModeAdapter::analysis_for(&ticker);
        Self::live(ticker, None, analysis)
    }

    pub fn percent_change_display(&self) -> String {
        self.metrics
            .as_ref()
            .map(DerivedMetrics::percent_change_display)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn price_change_display(&self) -> String {
        self.metrics
            .as_ref()
            .map(DerivedMetrics::price_change_display)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn close_display(&self) -> String {
        self.metric_display(|m| format_price(m.close_price))
    }

    pub fn range_display(&self) -> String {
        self.metric_display(|m| {
            format!("{} - {}", format_price(m.period_low), format_price(m.period_high))
        })
    }

    pub fn avg_volume_display(&self) -> String {
        self.metric_display(|m| format_volume(m.avg_volume))
    }

    fn metric_display(&self, f: impl Fn(&DerivedMetrics) -> String) -> String {
        self.metrics
            .as_ref()
            .map(f)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub date_range: DateRange,
    pub mode: GenerationMode,
    /// Same order as the ticker selection.
    pub entries: Vec<TickerReport>,
    pub disclaimer: String,
}

impl Report {
    pub fn new(date_range: DateRange, mode: GenerationMode, entries: Vec<TickerReport>) -> Self {
        Self {
            generated_at: Utc::now(),
            date_range,
            mode,
            entries,
            disclaimer: DISCLAIMER.to_string(),
        }
    }

    pub fn tickers(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.ticker.as_str()).collect()
    }

    pub fn fallback_count(&self) -> usize {
        self.entries.iter().filter(|e| e.used_fallback).count()
    }
}
