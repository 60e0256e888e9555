//! Client for a remote `stockbrief serve` proxy.
//!
//! The proxy keeps the upstream API keys; this adapter only needs its base
//! URL. Both ports are served from the same instance.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::adapters::http_client::normalize_base_url;
use crate::adapters::polygon_adapter::{parse_aggregates, AggregatesPayload};
use crate::domain::analysis::{AnalysisResult, AnalysisText};
use crate::domain::error::{PipelineError, StockbriefError, Upstream};
use crate::domain::price::{DateRange, PriceSeries};
use crate::domain::prompt::AnalysisRequest;
use crate::domain::ticker::Ticker;
use crate::ports::analysis_port::AnalysisPort;
use crate::ports::config_port::{require, ConfigPort};
use crate::ports::price_port::PricePort;

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub stock_data: Option<serde_json::Value>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Response of `POST /api/analyze`, success or fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReply {
    pub summary: String,
    pub technical: String,
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzeReply {
    /// Raw model text when the proxy forwarded it, else the fields re-labeled.
    pub fn into_text(self) -> AnalysisText {
        match self.full_response.filter(|t| !t.trim().is_empty()) {
            Some(text) => AnalysisText::new(text),
            None => AnalysisText::new(
                AnalysisResult::new(self.summary, self.technical, self.recommendation)
                    .to_labeled_text(),
            ),
        }
    }
}

pub struct BackendAdapter {
    client: Client,
    base_url: String,
}

impl BackendAdapter {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    pub fn from_config(config: &dyn ConfigPort, client: Client) -> Result<Self, StockbriefError> {
        let base_url = require(config, "backend", "base_url")?;
        Ok(Self::new(client, &base_url))
    }
}

#[async_trait]
impl PricePort for BackendAdapter {
    #[instrument(skip(self, range), fields(ticker = %ticker))]
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeries, PipelineError> {
        debug!(base_url = %self.base_url, "requesting series from proxy");

        let response = self
            .client
            .get(format!("{}/api/stock/{}", self.base_url, ticker))
            .query(&[("start", range.start_str()), ("end", range.end_str())])
            .send()
            .await
            .map_err(|e| PipelineError::unavailable(Upstream::PriceData, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::unavailable(
                Upstream::PriceData,
                format!("proxy returned HTTP {status}"),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::unavailable(Upstream::PriceData, e.to_string()))?;
        parse_aggregates(ticker, &body)
    }
}

#[async_trait]
impl AnalysisPort for BackendAdapter {
    #[instrument(skip(self, request), fields(ticker = %request.ticker))]
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisText, PipelineError> {
        let body = AnalyzeBody {
            ticker: Some(request.ticker.to_string()),
            stock_data: serde_json::to_value(AggregatesPayload::from(&request.series)).ok(),
            start_date: Some(request.range.start_str()),
            end_date: Some(request.range.end_str()),
        };

        let response = self
            .client
            .post(format!("{}/api/analyze", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::unavailable(Upstream::Analysis, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::unavailable(
                Upstream::Analysis,
                format!("proxy returned HTTP {status}"),
            ));
        }

        let reply: AnalyzeReply = response.json().await.map_err(|e| {
            PipelineError::malformed(Upstream::Analysis, format!("failed to parse reply: {e}"))
        })?;

        // Older proxies answer 200 with a fallback body.
        if let Some(error) = reply.error {
            return Err(PipelineError::unavailable(Upstream::Analysis, error));
        }
        Ok(reply.into_text())
    }
}
