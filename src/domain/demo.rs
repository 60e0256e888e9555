//! Demo mode: cached sample content only, no network calls.

use super::analysis::AnalysisResult;
use super::samples::{demo_unavailable_analysis, sample_analysis};
use super::ticker::{Ticker, TickerSet};

pub const SAMPLE_TICKERS: [&str; 3] = ["AAPL", "TSLA", "NVDA"];

pub struct DemoModeAdapter;

impl DemoModeAdapter {
    pub fn sample_tickers() -> impl Iterator<Item = Ticker> {
        SAMPLE_TICKERS.iter().filter_map(|s| Ticker::new(s))
    }

    /// Demo shortcuts are offered only while nothing is selected.
    pub fn demo_available(set: &TickerSet) -> bool {
        set.is_empty()
    }

    /// Fill an empty set with the sample tickers, up to capacity.
    ///
    /// A non-empty set is left untouched. Returns how many were added.
    pub fn populate_if_empty(set: &mut TickerSet) -> usize {
        if !set.is_empty() {
            return 0;
        }
        Self::sample_tickers().filter(|t| set.add(t.as_str())).count()
    }

    /// Add one sample ticker. Unknown symbols and ones already present are ignored.
    pub fn load_sample(set: &mut TickerSet, symbol: &str) -> bool {
        match Ticker::new(symbol) {
            Some(t) if SAMPLE_TICKERS.iter().any(|s| *s == t.as_str()) => set.add(t.as_str()),
            _ => false,
        }
    }

    /// Cached analysis for `ticker`, or the "not available in demo mode" entry.
    pub fn analysis_for(ticker: &Ticker) -> AnalysisResult {
        sample_analysis(ticker).unwrap_or_else(|| demo_unavailable_analysis(ticker))
    }
}
