//! Environment overlay for configuration.
//!
//! A key `[section] key` is looked up as the environment variable
//! `SECTION_KEY` (uppercased, `-` and `.` mapped to `_`) before falling back
//! to the wrapped file configuration. `[polygon] api_key` therefore reads
//! `POLYGON_API_KEY`.

use std::collections::HashMap;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::ports::config_port::ConfigPort;

#[derive(Debug)]
pub struct EnvConfigAdapter {
    vars: HashMap<String, String>,
    file: FileConfigAdapter,
}

impl EnvConfigAdapter {
    /// Snapshot the process environment on top of `file`.
    pub fn from_env(file: FileConfigAdapter) -> Self {
        Self::from_vars(std::env::vars(), file)
    }

    pub fn from_vars<I, K, V>(vars: I, file: FileConfigAdapter) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            file,
        }
    }

    pub fn var_name(section: &str, key: &str) -> String {
        format!("{section}_{key}")
            .to_uppercase()
            .replace(['-', '.'], "_")
    }
}

impl ConfigPort for EnvConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.vars
            .get(&Self::var_name(section, key))
            .cloned()
            .or_else(|| self.file.get_string(section, key))
    }
}
