//! Plain-text report writer, the default for stdout.

use std::fmt::Write;

use crate::domain::error::StockbriefError;
use crate::domain::report::{GenerationMode, Report, TickerReport};
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

fn write_entry(out: &mut String, entry: &TickerReport) -> std::fmt::Result {
    writeln!(out, "{} Analysis", entry.ticker)?;
    writeln!(out, "{}", "-".repeat(entry.ticker.as_str().len() + 9))?;
    if let Some(warning) = &entry.warning {
        writeln!(out, "! {warning}")?;
    }
    writeln!(
        out,
        "Price Change:   {} ({})",
        entry.price_change_display(),
        entry.percent_change_display()
    )?;
    if entry.metrics.is_some() {
        writeln!(out, "Close:          {}", entry.close_display())?;
        writeln!(out, "Range:          {}", entry.range_display())?;
        writeln!(out, "Avg Volume:     {}", entry.avg_volume_display())?;
    }
    writeln!(out, "Summary:        {}", entry.analysis.summary)?;
    writeln!(out, "Technical:      {}", entry.analysis.technical)?;
    writeln!(out, "Recommendation: {}", entry.analysis.recommendation)?;
    writeln!(out)
}

fn write_report(out: &mut String, report: &Report) -> std::fmt::Result {
    writeln!(out, "AI Stock Report")?;
    writeln!(out, "Period:    {}", report.date_range)?;
    writeln!(
        out,
        "Generated: {}{}",
        report.generated_at.format("%Y-%m-%d %H:%M UTC"),
        if report.mode == GenerationMode::Demo {
            " (demo)"
        } else {
            ""
        }
    )?;
    writeln!(out)?;

    for entry in &report.entries {
        write_entry(out, entry)?;
    }

    writeln!(out, "Disclaimer")?;
    writeln!(out, "{}", report.disclaimer)
}

impl ReportPort for TextReportAdapter {
    fn render(&self, report: &Report) -> Result<String, StockbriefError> {
        let mut out = String::new();
        write_report(&mut out, report).map_err(|e| StockbriefError::Render {
            reason: e.to_string(),
        })?;
        Ok(out)
    }
}
