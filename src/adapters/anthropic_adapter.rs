//! Anthropic Messages API client.
//!
//! See: https://docs.anthropic.com/en/api/messages

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::adapters::http_client::normalize_base_url;
use crate::domain::analysis::AnalysisText;
use crate::domain::error::{PipelineError, StockbriefError, Upstream};
use crate::domain::prompt::{system_prompt, AnalysisRequest};
use crate::ports::analysis_port::AnalysisPort;
use crate::ports::config_port::{require, ConfigPort};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_MAX_TOKENS: u32 = 200;
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct AnthropicSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl AnthropicSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Read `[anthropic]`; only `api_key` is required.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockbriefError> {
        let mut settings = Self::new(require(config, "anthropic", "api_key")?);
        if let Some(base_url) = config.get_non_empty("anthropic", "base_url") {
            settings.base_url = normalize_base_url(&base_url);
        }
        if let Some(model) = config.get_non_empty("anthropic", "model") {
            settings.model = model;
        }

        if let Some(raw) = config.get_non_empty("anthropic", "max_tokens") {
            settings.max_tokens = raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid("max_tokens", format!("expected a positive integer, got '{raw}'")))?;
        }

        if let Some(raw) = config.get_non_empty("anthropic", "temperature") {
            settings.temperature = raw
                .parse::<f64>()
                .ok()
                .filter(|t| (0.0..=1.0).contains(t))
                .ok_or_else(|| invalid("temperature", format!("expected a number within 0.0..=1.0, got '{raw}'")))?;
        }
        Ok(settings)
    }
}

fn invalid(key: &str, reason: String) -> StockbriefError {
    StockbriefError::ConfigInvalid {
        section: "anthropic".into(),
        key: key.into(),
        reason,
    }
}

pub struct AnthropicAdapter {
    client: Client,
    settings: AnthropicSettings,
}

impl AnthropicAdapter {
    pub fn new(client: Client, settings: AnthropicSettings) -> Self {
        Self { client, settings }
    }

    pub fn from_config(config: &dyn ConfigPort, client: Client) -> Result<Self, StockbriefError> {
        Ok(Self::new(client, AnthropicSettings::from_config(config)?))
    }

    fn messages_url(&self) -> String {
        format!("{}/messages", self.settings.base_url)
    }

    fn build_request(&self, request: &AnalysisRequest) -> MessagesRequest {
        MessagesRequest {
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            system: system_prompt(),
            messages: vec![UserMessage {
                role: "user",
                content: request.user_message(),
            }],
        }
    }
}

#[async_trait]
impl AnalysisPort for AnthropicAdapter {
    #[instrument(skip(self, request), fields(ticker = %request.ticker))]
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisText, PipelineError> {
        debug!(model = %self.settings.model, "sending analysis request");

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.build_request(request))
            .send()
            .await
            .map_err(|e| PipelineError::unavailable(Upstream::Analysis, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::unavailable(
                Upstream::Analysis,
                format!("HTTP {status}: {}", body.trim()),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::unavailable(Upstream::Analysis, e.to_string()))?;
        let text = extract_text(&body)?;
        debug!(chars = text.as_str().len(), "received analysis");
        Ok(text)
    }
}

/// Concatenated text blocks of a Messages API response.
pub fn extract_text(body: &str) -> Result<AnalysisText, PipelineError> {
    let response: MessagesResponse = serde_json::from_str(body).map_err(|e| {
        PipelineError::malformed(Upstream::Analysis, format!("failed to parse response: {e}"))
    })?;

    let text: String = response
        .content
        .iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(PipelineError::EmptyResponse {
            service: Upstream::Analysis,
        });
    }
    Ok(AnalysisText::new(text))
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    system: String,
    messages: Vec<UserMessage>,
}

#[derive(Debug, Serialize)]
struct UserMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
