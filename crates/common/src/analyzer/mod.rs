//! Pluggable evidence analyzers
//!
//! Both strategies produce the same [`Analysis`] shape so the orchestrator
//! does not care which one produced a verdict:
//! - [`HeuristicAnalyzer`]: keyword/negation classifier, never fails
//! - [`SemanticAnalyzer`]: external language model via [`crate::llm::LlmBackend`]

mod heuristic;
mod semantic;

pub use heuristic::HeuristicAnalyzer;
pub use semantic::{build_user_message, parse_llm_response, ParsedVerdict, SemanticAnalyzer, SYSTEM_PROMPT};

use crate::config::AnalyzerMode;
use crate::errors::Result;
use crate::models::Analysis;
use async_trait::async_trait;

/// Turns extracted evidence into a verdict for a claim
#[async_trait]
pub trait EvidenceAnalyzer: Send + Sync {
    async fn analyze(&self, evidence: &[String], claim: &str) -> Result<Analysis>;

    /// Which mode this analyzer implements
    fn mode(&self) -> AnalyzerMode;
}
