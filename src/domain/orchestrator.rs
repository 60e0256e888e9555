//! Report generation pipeline.
//!
//! Live mode runs `Fetch -> Derive -> Analyze -> Parse -> Assemble` for each
//! ticker in selection order, one ticker at a time. A failed `Fetch` or
//! `Analyze` turns that ticker into a fallback entry; it never aborts the
//! batch. Demo mode uses cached samples only.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::analysis::{parse_analysis, AnalysisText};
use super::demo::DemoModeAdapter;
use super::error::{PipelineError, StockbriefError, Upstream};
use super::metrics::DerivedMetrics;
use super::price::{DateRange, PriceSeries};
use super::prompt::AnalysisRequest;
use super::report::{GenerationMode, Report, TickerReport};
use super::ticker::{Ticker, TickerSet};
use crate::ports::analysis_port::AnalysisPort;
use crate::ports::price_port::PricePort;

/// Pipeline stages that talk to an upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Fetch,
    Analyze,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Fetch => write!(f, "fetch"),
            Stage::Analyze => write!(f, "analyze"),
        }
    }
}

/// A stage failure, tagged with the stage it came from.
#[derive(Debug, Clone, PartialEq)]
struct StageFailure {
    stage: Stage,
    error: PipelineError,
}

impl StageFailure {
    fn at(stage: Stage) -> impl FnOnce(PipelineError) -> Self {
        move |error| Self { stage, error }
    }
}

pub struct ReportOrchestrator {
    prices: Arc<dyn PricePort>,
    analysis: Arc<dyn AnalysisPort>,
}

/// Stand-in ports for demo-only use; every call reports the service unavailable.
struct Offline;

#[async_trait]
impl PricePort for Offline {
    async fn fetch_series(
        &self,
        _ticker: &Ticker,
        _range: &DateRange,
    ) -> Result<PriceSeries, PipelineError> {
        Err(PipelineError::unavailable(Upstream::PriceData, "offline"))
    }
}

#[async_trait]
impl AnalysisPort for Offline {
    async fn analyze(&self, _request: &AnalysisRequest) -> Result<AnalysisText, PipelineError> {
        Err(PipelineError::unavailable(Upstream::Analysis, "offline"))
    }
}

impl ReportOrchestrator {
    pub fn new(prices: Arc<dyn PricePort>, analysis: Arc<dyn AnalysisPort>) -> Self {
        Self { prices, analysis }
    }

    /// An orchestrator without upstream services. Demo reports work as usual;
    /// live reports fall back for every ticker.
    pub fn offline() -> Self {
        Self::new(Arc::new(Offline), Arc::new(Offline))
    }

    /// Generate a report for `tickers`.
    ///
    /// Demo mode fills an empty selection with the sample tickers first.
    /// Live mode requires at least one ticker; upstream failures never
    /// surface here.
    pub async fn generate(
        &self,
        tickers: &mut TickerSet,
        range: DateRange,
        mode: GenerationMode,
    ) -> Result<Report, StockbriefError> {
        let entries = match mode {
            GenerationMode::Demo => {
                let added = DemoModeAdapter::populate_if_empty(tickers);
                if added > 0 {
                    debug!(added, "populated empty selection with sample tickers");
                }
                tickers.iter().cloned().map(TickerReport::demo).collect()
            }
            GenerationMode::Live => {
                if tickers.is_empty() {
                    return Err(StockbriefError::EmptySelection);
                }
                let mut entries = Vec::with_capacity(tickers.len());
                for ticker in tickers.iter() {
                    entries.push(self.run_ticker(ticker, &range).await);
                }
                entries
            }
        };

        let report = Report::new(range, mode, entries);
        info!(
            tickers = report.entries.len(),
            fallbacks = report.fallback_count(),
            mode = ?mode,
            "report assembled"
        );
        Ok(report)
    }

    async fn run_ticker(&self, ticker: &Ticker, range: &DateRange) -> TickerReport {
        match self.run_pipeline(ticker, range).await {
            Ok(entry) => entry,
            Err(failure) => {
                warn!(
                    ticker = %ticker,
                    stage = %failure.stage,
                    service = %failure.error.service(),
                    error = %failure.error,
                    "pipeline failed, using cached data"
                );
                TickerReport::fallback(ticker.clone())
            }
        }
    }

    #[instrument(skip(self, range), fields(ticker = %ticker))]
    async fn run_pipeline(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<TickerReport, StageFailure> {
        let series = self
            .prices
            .fetch_series(ticker, range)
            .await
            .map_err(StageFailure::at(Stage::Fetch))?;
        debug!(points = series.len(), "fetched price series");

        let metrics = DerivedMetrics::derive(&series);
        if metrics.is_none() {
            debug!("empty series, metrics unavailable");
        }

        let request = AnalysisRequest::new(series, metrics.clone(), *range);
        let text = self
            .analysis
            .analyze(&request)
            .await
            .map_err(StageFailure::at(Stage::Analyze))?;

        let analysis = parse_analysis(&text);
        Ok(TickerReport::live(ticker.clone(), metrics, analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PricePoint;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct StubPrices {
        fail: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PricePort for StubPrices {
        async fn fetch_series(
            &self,
            ticker: &Ticker,
            _range: &DateRange,
        ) -> Result<PriceSeries, PipelineError> {
            self.calls.lock().unwrap().push(ticker.to_string());
            if Some(ticker.as_str()) == self.fail {
                return Err(PipelineError::unavailable(Upstream::PriceData, "503"));
            }
            let point = |day, close| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 100.0,
            };
            Ok(PriceSeries::new(
                ticker.clone(),
                vec![point(1, 100.0), point(2, 110.0)],
            ))
        }
    }

    struct StubAnalysis;

    #[async_trait]
    impl AnalysisPort for StubAnalysis {
        async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisText, PipelineError> {
            Ok(AnalysisText::new(format!(
                "SUMMARY: {} moved. TECHNICAL: fine. RECOMMENDATION: HOLD",
                request.ticker
            )))
        }
    }

    fn orchestrator(fail: Option<&'static str>) -> (ReportOrchestrator, Arc<StubPrices>) {
        let prices = Arc::new(StubPrices {
            fail,
            calls: Mutex::new(Vec::new()),
        });
        (
            ReportOrchestrator::new(prices.clone(), Arc::new(StubAnalysis)),
            prices,
        )
    }

    fn range() -> DateRange {
        DateRange::trailing(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap())
    }

    #[tokio::test]
    async fn live_entries_follow_selection_order() {
        let (orch, prices) = orchestrator(None);
        let mut set = TickerSet::from_symbols(["NVDA", "AAPL"]);
        let report = orch
            .generate(&mut set, range(), GenerationMode::Live)
            .await
            .unwrap();
        assert_eq!(report.tickers(), vec!["NVDA", "AAPL"]);
        assert_eq!(*prices.calls.lock().unwrap(), vec!["NVDA", "AAPL"]);
        assert_eq!(report.entries[0].analysis.summary, "NVDA moved.");
        assert_eq!(report.entries[0].percent_change_display(), "+10.00%");
    }

    #[tokio::test]
    async fn fetch_failure_falls_back_for_that_ticker_only() {
        let (orch, _) = orchestrator(Some("AAPL"));
        let mut set = TickerSet::from_symbols(["AAPL", "NVDA"]);
        let report = orch
            .generate(&mut set, range(), GenerationMode::Live)
            .await
            .unwrap();
        assert!(report.entries[0].used_fallback);
        assert!(!report.entries[1].used_fallback);
    }

    #[tokio::test]
    async fn failure_is_tagged_with_stage_and_service() {
        let (orch, _) = orchestrator(Some("AAPL"));
        let aapl = Ticker::new("AAPL").unwrap();
        let failure = orch.run_pipeline(&aapl, &range()).await.unwrap_err();
        assert_eq!(failure.stage, Stage::Fetch);
        assert_eq!(failure.stage.to_string(), "fetch");
        assert_eq!(failure.error.service(), Upstream::PriceData);
    }

    #[tokio::test]
    async fn live_mode_rejects_empty_selection() {
        let (orch, _) = orchestrator(None);
        let mut set = TickerSet::new();
        let err = orch
            .generate(&mut set, range(), GenerationMode::Live)
            .await
            .unwrap_err();
        assert!(matches!(err, StockbriefError::EmptySelection));
    }

    #[tokio::test]
    async fn demo_mode_makes_no_upstream_calls() {
        let (orch, prices) = orchestrator(None);
        let mut set = TickerSet::new();
        let report = orch
            .generate(&mut set, range(), GenerationMode::Demo)
            .await
            .unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(report.entries.len(), 3);
        assert!(prices.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn offline_orchestrator_falls_back_in_live_mode() {
        let orch = ReportOrchestrator::offline();
        let mut set = TickerSet::from_symbols(["NVDA"]);
        let report = orch
            .generate(&mut set, range(), GenerationMode::Live)
            .await
            .unwrap();
        assert_eq!(report.fallback_count(), 1);
        assert!(report.entries[0].analysis.summary.starts_with("NVIDIA"));
    }
}
