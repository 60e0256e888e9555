//! Shared reqwest client construction.

use std::time::Duration;

use reqwest::Client;

use crate::domain::error::StockbriefError;
use crate::ports::config_port::ConfigPort;

/// Optional `[http] timeout_secs`. Absent means no client-side timeout.
pub fn timeout_from_config(config: &dyn ConfigPort) -> Result<Option<Duration>, StockbriefError> {
    let Some(raw) = config.get_non_empty("http", "timeout_secs") else {
        return Ok(None);
    };
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(StockbriefError::ConfigInvalid {
            section: "http".into(),
            key: "timeout_secs".into(),
            reason: format!("expected a positive integer, got '{raw}'"),
        }),
    }
}

pub fn build_client(timeout: Option<Duration>) -> Result<Client, StockbriefError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(|e| StockbriefError::HttpClient {
        reason: e.to_string(),
    })
}

pub fn client_from_config(config: &dyn ConfigPort) -> Result<Client, StockbriefError> {
    build_client(timeout_from_config(config)?)
}

/// Strip trailing slashes so paths can be appended with `format!`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
