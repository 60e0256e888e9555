//! Concrete adapter implementations for ports.

pub mod anthropic_adapter;
pub mod backend_adapter;
pub mod csv_adapter;
pub mod env_config_adapter;
pub mod file_config_adapter;
pub mod html_report_adapter;
pub mod http_client;
pub mod json_report_adapter;
pub mod polygon_adapter;
pub mod text_report_adapter;
#[cfg(feature = "web")]
pub mod web;
