//! Plain-text rendering of reports and history

use wikicheck_common::models::FactCheckReport;

const MAX_EVIDENCE_SHOWN: usize = 5;
const SNIPPET_CHARS: usize = 200;
const HISTORY_CLAIM_CHARS: usize = 60;
const RULE_WIDTH: usize = 50;

/// First `max_chars` characters, with "..." when something was cut
pub fn snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

pub fn render_report(report: &FactCheckReport) -> String {
    let mut out = String::from("\n=== VERDICT ===\n");
    out.push_str(&format!("Claim: '{}'\n", report.claim));
    out.push_str(&format!("Verdict: {}\n", report.verdict));
    if let Some(confidence) = report.confidence {
        out.push_str(&format!("Confidence: {}%\n", confidence));
    }
    if let Some(explanation) = &report.explanation {
        out.push_str(&format!("Explanation: {}\n", explanation));
    }

    if report.evidence.is_empty() {
        out.push_str("No specific evidence found.\n");
    } else {
        out.push_str("\nKey Evidence:\n");
        for (i, sentence) in report.evidence.iter().take(MAX_EVIDENCE_SHOWN).enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, snippet(sentence, SNIPPET_CHARS)));
        }
    }

    out.push_str("\nSources:\n");
    for (i, source) in report.sources.iter().enumerate() {
        out.push_str(&format!("{}. {} - {}\n", i + 1, source.title, source.url));
    }
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out
}

/// Entries are expected newest first
pub fn render_history(reports: &[FactCheckReport]) -> String {
    if reports.is_empty() {
        return "No past fact-checks yet.".to_string();
    }

    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {}\n   When: {}\n",
            i + 1,
            snippet(&report.claim, HISTORY_CLAIM_CHARS),
            report.verdict,
            report.timestamp
        ));
        if let Some(first) = report.evidence.first() {
            out.push_str(&format!("   Evidence: {}\n", snippet(first, SNIPPET_CHARS)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikicheck_common::models::{AnalysisResult, Source, Verdict};

    fn report(evidence: Vec<String>, confidence: Option<u8>) -> FactCheckReport {
        FactCheckReport::new(
            "The first marathon runner died",
            AnalysisResult {
                verdict: Verdict::True,
                evidence,
                sources: vec![Source {
                    title: "Marathon".to_string(),
                    document_id: 19619,
                    url: "https://en.wikipedia.org/?curid=19619".to_string(),
                }],
                explanation: None,
                confidence,
                citations: None,
            },
        )
    }

    #[test]
    fn test_snippet_truncates_by_chars() {
        assert_eq!(snippet("short", 10), "short");
        assert_eq!(snippet("abcdef", 3), "abc...");
        assert_eq!(snippet("ééééé", 2), "éé...");
    }

    #[test]
    fn test_report_shows_at_most_five_snippets() {
        let evidence: Vec<String> = (1..=7).map(|i| format!("Evidence {i}")).collect();
        let text = render_report(&report(evidence, Some(80)));

        assert!(text.contains("Verdict: TRUE"));
        assert!(text.contains("Confidence: 80%"));
        assert!(text.contains("5. Evidence 5"));
        assert!(!text.contains("Evidence 6"));
        assert!(text.contains("1. Marathon - https://en.wikipedia.org/?curid=19619"));
        assert!(!text.contains("Explanation"));
    }

    #[test]
    fn test_report_without_evidence() {
        let text = render_report(&report(vec![], None));
        assert!(text.contains("No specific evidence found."));
        assert!(!text.contains("Confidence"));
    }

    #[test]
    fn test_history_rendering() {
        assert_eq!(render_history(&[]), "No past fact-checks yet.");

        let text = render_history(&[report(vec!["x".repeat(300)], None)]);
        assert!(text.starts_with("1. The first marathon runner died - TRUE"));
        assert!(text.contains(&format!("Evidence: {}...", "x".repeat(200))));
    }
}
