//! Analysis requests and the prompt text sent to the language model.

use super::analysis::{RECOMMENDATION_LABEL, SUMMARY_LABEL, TECHNICAL_LABEL};
use super::metrics::{format_percent, format_price, format_volume, DerivedMetrics};
use super::price::{DateRange, PriceSeries};
use super::ticker::Ticker;

/// Everything the analysis service needs for one ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub ticker: Ticker,
    pub metrics: Option<DerivedMetrics>,
    pub range: DateRange,
    /// The fetched series, for services that want the raw points.
    pub series: PriceSeries,
}

impl AnalysisRequest {
    pub fn new(series: PriceSeries, metrics: Option<DerivedMetrics>, range: DateRange) -> Self {
        Self {
            ticker: series.ticker.clone(),
            metrics,
            range,
            series,
        }
    }

    /// Human-readable block describing the period, or a "no data" note.
    pub fn price_summary(&self) -> String {
        match &self.metrics {
            Some(m) => format!(
                "Period: {start} to {end}\n\
                 Opening Price: {open}\n\
                 Closing Price: {close}\n\
                 Period High: {high}\n\
                 Period Low: {low}\n\
                 Average Volume: {volume}\n\
                 Price Change: {change}",
                start = self.range.start_str(),
                end = self.range.end_str(),
                open = format_price(m.open_price),
                close = format_price(m.close_price),
                high = format_price(m.period_high),
                low = format_price(m.period_low),
                volume = format_volume(m.avg_volume),
                change = format_percent(m.percent_change),
            ),
            None => format!(
                "Period: {} to {}\nNo price data was available for this period.",
                self.range.start_str(),
                self.range.end_str()
            ),
        }
    }

    pub fn user_message(&self) -> String {
        format!(
            "Analyze the stock {} with the following data:\n{}",
            self.ticker,
            self.price_summary()
        )
    }
}

pub fn system_prompt() -> String {
    format!(
        "You are a professional stock market analyst providing concise, actionable insights.\n\
         Format your response with exactly three sections:\n\
         {SUMMARY_LABEL} One sentence about the stock's recent trends, performance and dividend information.\n\n\
         {TECHNICAL_LABEL} One sentence about key technical indicators or patterns.\n\n\
         {RECOMMENDATION_LABEL} One sentence with BUY/HOLD/SELL and brief reasoning.\n\
         Be specific and data-driven. No disclaimers needed."
    )
}
