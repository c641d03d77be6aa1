//! End-to-end claim verification
//!
//! Search, fetch, extract, analyze. Only rate-limit and timeout failures of
//! the search step reach the caller; every other failure degrades the result
//! instead of aborting it.

use crate::analyzer::{EvidenceAnalyzer, HeuristicAnalyzer, SemanticAnalyzer};
use crate::config::{AnalyzerMode, AppConfig};
use crate::errors::{AppError, Result};
use crate::evidence::SentenceExtractor;
use crate::metrics;
use crate::models::{Analysis, AnalysisResult, SearchHit, Source};
use crate::retriever::{Retriever, WikipediaClient};
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Claim verification orchestrator
pub struct FactChecker {
    config: Arc<AppConfig>,
    retriever: Arc<dyn Retriever>,
    extractor: SentenceExtractor,
    heuristic: HeuristicAnalyzer,
    semantic: Option<Arc<dyn EvidenceAnalyzer>>,
}

impl FactChecker {
    pub fn new(config: Arc<AppConfig>, retriever: Arc<dyn Retriever>) -> Self {
        Self {
            extractor: SentenceExtractor::from_config(&config.fact_check),
            heuristic: HeuristicAnalyzer::new(&config.fact_check),
            semantic: None,
            retriever,
            config,
        }
    }

    /// Checker backed by the Wikipedia client described in `config`
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self> {
        let retriever = Arc::new(WikipediaClient::new(&config.wikipedia)?);
        Ok(Self::new(config, retriever))
    }

    /// Use a fixed analyzer for semantic mode instead of building one from
    /// `llm` configuration on each claim
    pub fn with_semantic_analyzer(mut self, analyzer: Arc<dyn EvidenceAnalyzer>) -> Self {
        self.semantic = Some(analyzer);
        self
    }

    /// Verify one claim.
    ///
    /// `max_documents` defaults to `wikipedia.max_articles`, `mode` to
    /// `analyzer_mode`.
    #[instrument(skip(self))]
    pub async fn run_fact_check(
        &self,
        claim: &str,
        max_documents: Option<usize>,
        mode: Option<AnalyzerMode>,
    ) -> Result<AnalysisResult> {
        let start = Instant::now();
        let mode = mode.unwrap_or(self.config.analyzer_mode);
        let max_documents = max_documents.unwrap_or(self.config.wikipedia.max_articles);

        let hits = match self.retriever.search(claim, max_documents).await {
            Ok(hits) => hits,
            Err(e @ (AppError::RetrievalRateLimited | AppError::RetrievalTimeout)) => {
                warn!(error = %e, "Search failed");
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Search failed, treating as no results");
                Vec::new()
            }
        };

        if hits.is_empty() {
            info!("No search results for claim");
            let result = AnalysisResult::insufficient();
            metrics::record_fact_check(start.elapsed().as_secs_f64(), mode, result.verdict);
            return Ok(result);
        }

        let (evidence, sources) = self.gather_evidence(claim, hits, max_documents).await;
        let (analysis, analyzed_by) = self.analyze(mode, &evidence, claim).await;
        let result = AnalysisResult::new(analysis, sources);

        info!(
            verdict = %result.verdict,
            analyzer = %analyzed_by,
            evidence = result.evidence.len(),
            sources = result.sources.len(),
            "Fact check complete"
        );
        metrics::record_fact_check(start.elapsed().as_secs_f64(), analyzed_by, result.verdict);
        Ok(result)
    }

    /// Verify claims one after another. Each slot holds that claim's own
    /// outcome; a failure does not stop the rest.
    #[instrument(skip(self, claims), fields(count = claims.len()))]
    pub async fn run_batch(
        &self,
        claims: &[String],
        max_documents: Option<usize>,
        mode: Option<AnalyzerMode>,
    ) -> Vec<Result<AnalysisResult>> {
        let mut results = Vec::with_capacity(claims.len());
        for claim in claims {
            results.push(self.run_fact_check(claim, max_documents, mode).await);
        }
        results
    }

    /// Fetch the first `max_documents` distinct hits and extract their
    /// evidence, preserving search order.
    async fn gather_evidence(
        &self,
        claim: &str,
        hits: Vec<SearchHit>,
        max_documents: usize,
    ) -> (Vec<String>, Vec<Source>) {
        let mut seen = HashSet::new();
        let hits: Vec<SearchHit> = hits
            .into_iter()
            .take(max_documents)
            .filter(|hit| seen.insert(hit.id))
            .collect();

        let concurrency = self.config.fact_check.fetch_concurrency.max(1);
        let fetched: Vec<(SearchHit, Result<String>)> = stream::iter(hits)
            .map(|hit| async move {
                let body = self.retriever.fetch(hit.id).await;
                (hit, body)
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut evidence = Vec::new();
        let mut sources = Vec::new();
        let mut skipped = 0;

        for (hit, body) in fetched {
            let body = match body {
                Ok(body) if !body.is_empty() => body,
                Ok(_) => {
                    debug!(page_id = hit.id, title = %hit.title, "Empty document, skipping");
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    warn!(page_id = hit.id, title = %hit.title, error = %e, "Fetch failed, skipping");
                    skipped += 1;
                    continue;
                }
            };

            debug!(page_id = hit.id, title = %hit.title, "Analyzing article");
            evidence.extend(self.extractor.extract(&body, claim));
            sources.push(Source {
                url: self.retriever.document_url(hit.id),
                title: hit.title,
                document_id: hit.id,
            });
        }

        metrics::record_documents(sources.len(), skipped);
        (evidence, sources)
    }

    /// Run the analyzer for `mode`, returning its analysis and the mode of
    /// the analyzer that actually produced it
    async fn analyze(
        &self,
        mode: AnalyzerMode,
        evidence: &[String],
        claim: &str,
    ) -> (Analysis, AnalyzerMode) {
        match mode {
            AnalyzerMode::Keyword => (self.heuristic.classify(evidence, claim), self.heuristic.mode()),
            AnalyzerMode::Llm => match self.semantic_analysis(evidence, claim).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(error = %e, "LLM analyzer failed, falling back to keyword");
                    metrics::record_analyzer_fallback(self.config.llm.provider.as_str());
                    (self.heuristic.classify(evidence, claim), self.heuristic.mode())
                }
            },
        }
    }

    async fn semantic_analysis(
        &self,
        evidence: &[String],
        claim: &str,
    ) -> Result<(Analysis, AnalyzerMode)> {
        match &self.semantic {
            Some(analyzer) => Ok((analyzer.analyze(evidence, claim).await?, analyzer.mode())),
            None => {
                let analyzer = SemanticAnalyzer::from_config(&self.config.llm)?;
                let analysis = analyzer.analyze(evidence, claim).await?;
                Ok((analysis, analyzer.mode()))
            }
        }
    }
}
