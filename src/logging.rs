//! tracing subscriber setup.
//!
//! Logs go to stderr so report text on stdout stays clean.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::error::StockbriefError;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `stockbrief=debug,tower_http=info`.
    pub level: String,
    pub format: LogFormat,
    /// Colored output; off for log files and CI.
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            format: LogFormat::Text,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// `[logging] level`, `format` (`text` or `json`) and `ansi`.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockbriefError> {
        let level = config
            .get_non_empty("logging", "level")
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

        let format = match config.get_non_empty("logging", "format").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(StockbriefError::ConfigInvalid {
                    section: "logging".into(),
                    key: "format".into(),
                    reason: format!("expected 'text' or 'json', got '{other}'"),
                })
            }
        };

        let ansi = config.get_bool("logging", "ansi", true);

        Ok(Self {
            level,
            format,
            ansi,
        })
    }

    /// `RUST_LOG` wins over the configured level.
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(config.env_filter());
    let result = match config.format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_ansi(config.ansi)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    if result.is_err() {
        tracing::debug!("global subscriber already installed");
    }
}
