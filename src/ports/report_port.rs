//! Report output port.

use crate::domain::error::StockbriefError;
use crate::domain::report::Report;

/// Port for writing assembled reports.
pub trait ReportPort {
    fn render(&self, report: &Report) -> Result<String, StockbriefError>;

    /// Default implementation: renders and writes the result to `output_path`,
    /// creating parent directories as needed.
    fn write(&self, report: &Report, output_path: &str) -> Result<(), StockbriefError> {
        let content = self.render(report)?;
        let path = std::path::Path::new(output_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}
