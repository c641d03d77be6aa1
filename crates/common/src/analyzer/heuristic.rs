use super::EvidenceAnalyzer;
use crate::config::{AnalyzerMode, FactCheckConfig};
use crate::errors::Result;
use crate::evidence::HeuristicClassifier;
use crate::models::Analysis;
use async_trait::async_trait;

/// [`HeuristicClassifier`] behind the analyzer trait
#[derive(Debug, Clone)]
pub struct HeuristicAnalyzer {
    classifier: HeuristicClassifier,
}

impl HeuristicAnalyzer {
    pub fn new(config: &FactCheckConfig) -> Self {
        Self {
            classifier: HeuristicClassifier::new(config.min_keyword_length),
        }
    }

    /// Synchronous entry point, used directly as the semantic fallback
    pub fn classify(&self, evidence: &[String], claim: &str) -> Analysis {
        let (verdict, relevant) = self.classifier.classify(evidence, claim);
        Analysis::bare(verdict, relevant)
    }
}

#[async_trait]
impl EvidenceAnalyzer for HeuristicAnalyzer {
    async fn analyze(&self, evidence: &[String], claim: &str) -> Result<Analysis> {
        Ok(self.classify(evidence, claim))
    }

    fn mode(&self) -> AnalyzerMode {
        AnalyzerMode::Keyword
    }
}
