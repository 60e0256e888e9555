//! JSON report writer.

use crate::domain::error::StockbriefError;
use crate::domain::report::Report;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportPort for JsonReportAdapter {
    fn render(&self, report: &Report) -> Result<String, StockbriefError> {
        let mut json = serde_json::to_string_pretty(report).map_err(|e| StockbriefError::Render {
            reason: e.to_string(),
        })?;
        json.push('\n');
        Ok(json)
    }
}
