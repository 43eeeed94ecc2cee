use async_trait::async_trait;

use crate::error::Result;
use crate::types::*;

#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Resolves once the engine reports `bestmove`, times out, or fails.
    async fn evaluate(&self, request: EvaluationRequest) -> Result<EngineAnalysis>;

    /// Like [`AnalysisEngine::evaluate`], but failures degrade to the
    /// neutral analysis.
    async fn evaluate_or_neutral(&self, request: EvaluationRequest) -> EngineAnalysis {
        let fallback = EngineAnalysis::neutral(&request);
        self.evaluate(request).await.unwrap_or(fallback)
    }

    async fn shutdown(&self) -> Result<()>;

    fn is_ready(&self) -> bool;
}
