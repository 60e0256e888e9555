//! Language-model analysis port.

use async_trait::async_trait;

use crate::domain::analysis::AnalysisText;
use crate::domain::error::PipelineError;
use crate::domain::prompt::AnalysisRequest;

#[async_trait]
pub trait AnalysisPort: Send + Sync {
    /// One request per ticker; returns the service's raw text.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisText, PipelineError>;
}
