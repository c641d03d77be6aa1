//! Core data model shared by the pipeline, exporters and front ends

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Four-way outcome for a claim given its evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    True,
    False,
    Mixed,
    InsufficientEvidence,
}

impl Verdict {
    pub const ALL: [Verdict; 4] = [
        Verdict::True,
        Verdict::False,
        Verdict::Mixed,
        Verdict::InsufficientEvidence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "TRUE",
            Verdict::False => "FALSE",
            Verdict::Mixed => "MIXED",
            Verdict::InsufficientEvidence => "INSUFFICIENT_EVIDENCE",
        }
    }

    /// Case-insensitive lookup in the closed verdict set
    pub fn parse(raw: &str) -> Option<Self> {
        let upper = raw.trim().to_uppercase();
        Self::ALL.into_iter().find(|v| v.as_str() == upper)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranked search candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
}

/// Document that contributed non-empty content to a claim's evidence pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(rename = "pageid")]
    pub document_id: u64,
    pub url: String,
}

/// Outcome of one analyzer run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub verdict: Verdict,
    pub evidence: Vec<String>,
    pub explanation: Option<String>,
    pub confidence: Option<u8>,
    pub citations: Option<Vec<String>>,
}

impl Analysis {
    /// Heuristic-shaped analysis: no explanation, confidence or citations
    pub fn bare(verdict: Verdict, evidence: Vec<String>) -> Self {
        Self {
            verdict,
            evidence,
            explanation: None,
            confidence: None,
            citations: None,
        }
    }

    pub fn insufficient() -> Self {
        Self::bare(Verdict::InsufficientEvidence, Vec::new())
    }
}

/// Terminal artifact of one claim's processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    pub evidence: Vec<String>,
    pub sources: Vec<Source>,
    pub explanation: Option<String>,
    pub confidence: Option<u8>,
    pub citations: Option<Vec<String>>,
}

impl AnalysisResult {
    pub fn new(analysis: Analysis, sources: Vec<Source>) -> Self {
        Self {
            verdict: analysis.verdict,
            evidence: analysis.evidence,
            sources,
            explanation: analysis.explanation,
            confidence: analysis.confidence,
            citations: analysis.citations,
        }
    }

    /// No evidence and no sources
    pub fn insufficient() -> Self {
        Self::new(Analysis::insufficient(), Vec::new())
    }
}

/// Result stamped with its claim and a UTC timestamp, as handed to
/// export and history collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckReport {
    pub timestamp: String,
    pub claim: String,
    pub verdict: Verdict,
    pub evidence: Vec<String>,
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
}

impl FactCheckReport {
    pub fn new(claim: impl Into<String>, result: AnalysisResult) -> Self {
        Self::at(claim, result, Utc::now())
    }

    pub fn at(claim: impl Into<String>, result: AnalysisResult, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, false),
            claim: claim.into(),
            verdict: result.verdict,
            evidence: result.evidence,
            sources: result.sources,
            explanation: result.explanation,
            confidence: result.confidence,
            citations: result.citations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(
            serde_json::to_string(&Verdict::InsufficientEvidence).unwrap(),
            "\"INSUFFICIENT_EVIDENCE\""
        );
        assert_eq!(serde_json::to_string(&Verdict::True).unwrap(), "\"TRUE\"");
        let parsed: Verdict = serde_json::from_str("\"MIXED\"").unwrap();
        assert_eq!(parsed, Verdict::Mixed);
    }

    #[test]
    fn test_verdict_parse_is_closed() {
        assert_eq!(Verdict::parse("false"), Some(Verdict::False));
        assert_eq!(Verdict::parse(" insufficient_evidence "), Some(Verdict::InsufficientEvidence));
        assert_eq!(Verdict::parse("PARTLY_TRUE"), None);
        assert_eq!(Verdict::parse(""), None);
    }

    #[test]
    fn test_source_serializes_pageid() {
        let source = Source {
            title: "Marathon".into(),
            document_id: 100,
            url: "https://en.wikipedia.org/?curid=100".into(),
        };
        let value = serde_json::to_value(&source).unwrap();
        assert_eq!(value["pageid"], 100);
        assert_eq!(value["title"], "Marathon");
    }

    #[test]
    fn test_report_timestamp_is_utc() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        let report = FactCheckReport::at("claim", AnalysisResult::insufficient(), ts);
        assert_eq!(report.timestamp, "2024-03-01T12:30:05.000000+00:00");
        assert_eq!(report.verdict, Verdict::InsufficientEvidence);
        assert!(report.sources.is_empty());
    }
}
