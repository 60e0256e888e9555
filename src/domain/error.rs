//! Domain error types.

use std::fmt;

/// The upstream service a pipeline stage talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    PriceData,
    Analysis,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::PriceData => write!(f, "price data service"),
            Upstream::Analysis => write!(f, "analysis service"),
        }
    }
}

/// Failure of a single per-ticker pipeline stage.
///
/// These never escape the orchestrator: each one is turned into a fallback
/// entry for the affected ticker.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("{service} unavailable: {reason}")]
    UpstreamUnavailable { service: Upstream, reason: String },

    #[error("malformed response from {service}: {reason}")]
    MalformedResponse { service: Upstream, reason: String },

    #[error("{service} returned no content")]
    EmptyResponse { service: Upstream },
}

impl PipelineError {
    pub fn unavailable(service: Upstream, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            service,
            reason: reason.into(),
        }
    }

    pub fn malformed(service: Upstream, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            service,
            reason: reason.into(),
        }
    }

    pub fn service(&self) -> Upstream {
        match self {
            Self::UpstreamUnavailable { service, .. }
            | Self::MalformedResponse { service, .. }
            | Self::EmptyResponse { service } => *service,
        }
    }
}

/// Top-level error type for stockbrief.
#[derive(Debug, thiserror::Error)]
pub enum StockbriefError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {reason}")]
    HttpClient { reason: String },

    #[error("no tickers selected")]
    EmptySelection,

    #[error("failed to render report: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockbriefError> for std::process::ExitCode {
    fn from(err: &StockbriefError) -> Self {
        let code: u8 = match err {
            StockbriefError::Io(_) | StockbriefError::Render { .. } => 1,
            StockbriefError::ConfigParse { .. }
            | StockbriefError::ConfigMissing { .. }
            | StockbriefError::ConfigInvalid { .. } => 2,
            StockbriefError::HttpClient { .. } => 3,
            StockbriefError::EmptySelection => 4,
        };
        std::process::ExitCode::from(code)
    }
}
