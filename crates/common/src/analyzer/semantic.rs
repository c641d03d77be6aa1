//! Language-model evidence analysis
//!
//! The backend reply is free text that should contain a JSON object. Parsing
//! is defensive: anything that does not yield a verdict from the closed set
//! becomes INSUFFICIENT_EVIDENCE with zero confidence. Backend failures are
//! folded into the result here and never reach the caller as errors.

use super::EvidenceAnalyzer;
use crate::config::{AnalyzerMode, LlmConfig};
use crate::errors::{AppError, Result};
use crate::llm::{create_backend, LlmBackend};
use crate::models::{Analysis, Verdict};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

pub const SYSTEM_PROMPT: &str = r#"You are a fact-checking assistant. Given a CLAIM and EVIDENCE excerpts from Wikipedia, determine whether the evidence supports, contradicts, or is mixed/insufficient regarding the claim.

Respond with a JSON object only, no other text:
{
  "verdict": "TRUE" | "FALSE" | "MIXED" | "INSUFFICIENT_EVIDENCE",
  "explanation": "One or two sentences explaining your verdict in plain language.",
  "confidence": 0-100,
  "citations": ["quote or phrase from evidence that supports your verdict", "..."]
}

- TRUE: evidence clearly supports the claim.
- FALSE: evidence clearly contradicts the claim.
- MIXED: some evidence supports and some contradicts.
- INSUFFICIENT_EVIDENCE: evidence does not clearly address the claim.

Be concise. Citations should be short excerpts from the provided evidence."#;

/// Evidence sentences included in the prompt
const MAX_PROMPT_EVIDENCE: usize = 20;
const MAX_CITATIONS: usize = 5;
const NO_EVIDENCE_EXPLANATION: &str = "No evidence was provided to evaluate the claim.";

/// Fields recovered from a backend reply
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVerdict {
    pub verdict: Verdict,
    pub explanation: String,
    pub confidence: u8,
    pub citations: Vec<String>,
}

impl ParsedVerdict {
    fn unusable() -> Self {
        Self {
            verdict: Verdict::InsufficientEvidence,
            explanation: String::new(),
            confidence: 0,
            citations: Vec::new(),
        }
    }
}

/// User payload: the claim followed by numbered evidence
pub fn build_user_message(claim: &str, evidence: &[String]) -> String {
    let evidence_blob = evidence
        .iter()
        .take(MAX_PROMPT_EVIDENCE)
        .enumerate()
        .map(|(i, sentence)| format!("[{}] {}", i + 1, sentence))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("CLAIM: {claim}\n\nEVIDENCE:\n{evidence_blob}\n\nRespond with JSON only.")
}

/// Recover a verdict from backend text.
///
/// Takes the span from the first `{` to the last `}`. No span, invalid JSON,
/// a non-object, or a verdict outside the closed set all give
/// [`ParsedVerdict::unusable`].
pub fn parse_llm_response(text: &str) -> ParsedVerdict {
    let text = text.trim();
    let (start, end) = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => (start, end),
        _ => {
            warn!("LLM response contains no JSON object");
            return ParsedVerdict::unusable();
        }
    };

    let object = match serde_json::from_str::<Value>(&text[start..=end]) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("LLM response JSON is not an object");
            return ParsedVerdict::unusable();
        }
        Err(e) => {
            warn!(error = %e, "LLM response parse error");
            return ParsedVerdict::unusable();
        }
    };

    let Some(verdict) = object
        .get("verdict")
        .and_then(stringify)
        .and_then(|raw| Verdict::parse(&raw))
    else {
        warn!(verdict = ?object.get("verdict"), "LLM verdict outside the closed set");
        return ParsedVerdict::unusable();
    };

    ParsedVerdict {
        verdict,
        explanation: object.get("explanation").and_then(stringify).unwrap_or_default(),
        confidence: clamp_confidence(object.get("confidence")),
        citations: citations(&object),
    }
}

/// String form of a JSON scalar; null counts as absent
fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn clamp_confidence(value: Option<&Value>) -> u8 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f.trunc() as i64),
        _ => None,
    };
    raw.unwrap_or(0).clamp(0, 100) as u8
}

fn citations(object: &Map<String, Value>) -> Vec<String> {
    let Some(Value::Array(items)) = object.get("citations") else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(stringify)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .take(MAX_CITATIONS)
        .collect()
}

/// Reason text for a failed backend call, without the error-kind prefix
fn failure_reason(err: &AppError) -> String {
    match err {
        AppError::AnalyzerUnavailable { message }
        | AppError::MalformedAnalyzerResponse { message } => message.clone(),
        other => other.to_string(),
    }
}

pub struct SemanticAnalyzer {
    backend: Arc<dyn LlmBackend>,
    confidence_enabled: bool,
}

impl SemanticAnalyzer {
    pub fn new(backend: Arc<dyn LlmBackend>, confidence_enabled: bool) -> Self {
        Self {
            backend,
            confidence_enabled,
        }
    }

    /// Build the configured backend. Fails only when the HTTP client cannot
    /// be constructed.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Ok(Self::new(create_backend(config)?, config.confidence_enabled))
    }

    pub fn provider(&self) -> &str {
        self.backend.provider()
    }
}

#[async_trait]
impl EvidenceAnalyzer for SemanticAnalyzer {
    async fn analyze(&self, evidence: &[String], claim: &str) -> Result<Analysis> {
        if evidence.is_empty() {
            return Ok(Analysis {
                verdict: Verdict::InsufficientEvidence,
                evidence: Vec::new(),
                explanation: Some(NO_EVIDENCE_EXPLANATION.to_string()),
                confidence: Some(0),
                citations: Some(Vec::new()),
            });
        }

        let user_message = build_user_message(claim, evidence);
        let raw = match self.backend.complete(SYSTEM_PROMPT, &user_message).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    provider = self.backend.provider(),
                    error = %e,
                    "LLM call failed"
                );
                return Ok(Analysis {
                    verdict: Verdict::InsufficientEvidence,
                    evidence: evidence.to_vec(),
                    explanation: Some(format!("Analysis unavailable: {}", failure_reason(&e))),
                    confidence: Some(0),
                    citations: Some(Vec::new()),
                });
            }
        };

        let parsed = parse_llm_response(&raw);
        let confidence = if self.confidence_enabled { parsed.confidence } else { 0 };
        debug!(
            provider = self.backend.provider(),
            model = self.backend.model(),
            verdict = %parsed.verdict,
            confidence,
            "LLM analysis complete"
        );

        Ok(Analysis {
            verdict: parsed.verdict,
            evidence: evidence.to_vec(),
            explanation: Some(parsed.explanation).filter(|e| !e.is_empty()),
            confidence: Some(confidence),
            citations: Some(parsed.citations),
        })
    }

    fn mode(&self) -> AnalyzerMode {
        AnalyzerMode::Llm
    }
}
