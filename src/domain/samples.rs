//! Static cached analyses and placeholder text.

use super::analysis::AnalysisResult;
use super::ticker::Ticker;

/// Marker attached to entries built from cached content after a failure.
pub const FALLBACK_WARNING: &str = "Using cached data (API unavailable)";

pub const DISCLAIMER: &str = "This analysis is generated by AI and should not be considered as \
financial advice. Always conduct your own research and consult with financial professionals \
before making investment decisions.";

/// Cached analysis for one of the sample tickers.
pub fn sample_analysis(ticker: &Ticker) -> Option<AnalysisResult> {
    let result = match ticker.as_str() {
        "AAPL" => AnalysisResult::new(
            "Apple shows strong momentum with consistent revenue growth from services and wearables.",
            "Technical indicators suggest consolidation around current levels with potential breakout above $195.",
            "HOLD - Wait for clearer directional signals before adding positions.",
        ),
        "TSLA" => AnalysisResult::new(
            "Tesla maintains volatility amid EV market competition and margin pressures.",
            "Watch for support at $240 and resistance at $265 levels.",
            "NEUTRAL - High volatility presents both opportunities and risks.",
        ),
        "NVDA" => AnalysisResult::new(
            "NVIDIA continues to dominate AI chip market with exceptional datacenter growth.",
            "Recent consolidation healthy after massive run-up, with strong institutional accumulation.",
            "BUY - Long-term AI tailwinds remain intact despite short-term volatility.",
        ),
        _ => return None,
    };
    Some(result)
}

/// Placeholder for a live ticker with no cached sample.
pub fn unavailable_analysis(ticker: &Ticker) -> AnalysisResult {
    AnalysisResult::new(
        format!("Unable to fetch real-time data for {ticker}."),
        "Please check your API connection and try again.",
        "N/A",
    )
}

/// Placeholder for a demo-mode ticker with no cached sample.
pub fn demo_unavailable_analysis(ticker: &Ticker) -> AnalysisResult {
    AnalysisResult::new(
        format!("Analysis for {ticker} is not available in demo mode."),
        "Demo mode only includes cached samples for AAPL, TSLA and NVDA.",
        "N/A",
    )
}
