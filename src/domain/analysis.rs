//! Analysis text and its best-effort extraction into labeled sections.
//!
//! The language model is asked for three sections introduced by fixed,
//! case-sensitive labels. [`parse_analysis`] is total: a missing or blank
//! section takes its default string and parsing never fails.

use serde::{Deserialize, Serialize};

pub const SUMMARY_LABEL: &str = "SUMMARY:";
pub const TECHNICAL_LABEL: &str = "TECHNICAL:";
pub const RECOMMENDATION_LABEL: &str = "RECOMMENDATION:";

pub const DEFAULT_SUMMARY: &str = "Analysis completed.";
pub const DEFAULT_TECHNICAL: &str = "Technical indicators analyzed.";
pub const DEFAULT_RECOMMENDATION: &str = "Please review the data.";

/// Raw, unstructured response from the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisText(pub String);

impl AnalysisText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub technical: String,
    pub recommendation: String,
}

impl AnalysisResult {
    pub fn new(
        summary: impl Into<String>,
        technical: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            summary: summary.into(),
            technical: technical.into(),
            recommendation: recommendation.into(),
        }
    }

    /// Render back into the labeled layout [`parse_analysis`] reads.
    pub fn to_labeled_text(&self) -> String {
        format!(
            "{SUMMARY_LABEL} {}\n\n{TECHNICAL_LABEL} {}\n\n{RECOMMENDATION_LABEL} {}",
            self.summary, self.technical, self.recommendation
        )
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY, DEFAULT_TECHNICAL, DEFAULT_RECOMMENDATION)
    }
}

/// Extract the three labeled sections from `text`.
///
/// Each label is located by its first occurrence. A section runs from the
/// end of its label to the start of the nearest other label that follows
/// it, or to the end of the text.
pub fn parse_analysis(text: &AnalysisText) -> AnalysisResult {
    let text = text.as_str();
    let labels = [SUMMARY_LABEL, TECHNICAL_LABEL, RECOMMENDATION_LABEL];
    let positions: Vec<Option<usize>> = labels.iter().map(|l| text.find(l)).collect();

    let section = |index: usize, default: &str| -> String {
        let Some(start) = positions[index] else {
            return default.to_string();
        };
        let content_start = start + labels[index].len();
        let content_end = positions
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .filter_map(|(_, pos)| *pos)
            .filter(|&pos| pos >= content_start)
            .min()
            .unwrap_or(text.len());

        let content = text[content_start..content_end].trim();
        if content.is_empty() {
            default.to_string()
        } else {
            content.to_string()
        }
    };

    AnalysisResult {
        summary: section(0, DEFAULT_SUMMARY),
        technical: section(1, DEFAULT_TECHNICAL),
        recommendation: section(2, DEFAULT_RECOMMENDATION),
    }
}
