//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.get_string(section, key)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(default)
    }

    /// Non-blank string value; blank entries count as unset.
    fn get_non_empty(&self, section: &str, key: &str) -> Option<String> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Fetch a non-blank value or fail with `ConfigMissing`.
pub fn require(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, crate::domain::error::StockbriefError> {
    config
        .get_non_empty(section, key)
        .ok_or_else(|| crate::domain::error::StockbriefError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}
