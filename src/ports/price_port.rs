//! Price series access port.

use async_trait::async_trait;

use crate::domain::error::PipelineError;
use crate::domain::price::{DateRange, PriceSeries};
use crate::domain::ticker::Ticker;

#[async_trait]
pub trait PricePort: Send + Sync {
    /// Daily series for `ticker` over `range`, ascending by date.
    ///
    /// An empty series is a valid answer; errors are reserved for transport
    /// failures and undecodable payloads.
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeries, PipelineError>;
}
