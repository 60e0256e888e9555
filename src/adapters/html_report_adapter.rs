//! HTML report adapter implementing ReportPort.
//!
//! Renders a standalone page with the `report.html` Askama template.

use askama::Template;

use crate::domain::error::StockbriefError;
use crate::domain::report::{GenerationMode, Report};
use crate::ports::report_port::ReportPort;

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    report: &'a Report,
    generated: String,
    demo: bool,
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for HtmlReportAdapter {
    fn render(&self, report: &Report) -> Result<String, StockbriefError> {
        let template = ReportTemplate {
            report,
            generated: report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
            demo: report.mode == GenerationMode::Demo,
        };
        template.render().map_err(|e| StockbriefError::Render {
            reason: e.to_string(),
        })
    }
}
