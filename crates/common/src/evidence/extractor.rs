//! Sentence extraction
//!
//! Splits an article body on a period followed by whitespace and keeps the
//! sentences that share vocabulary with the claim. The splitter is naive on
//! purpose: abbreviations stay glued to the next sentence and decimals like
//! "3. 5" may split. Downstream heuristics tolerate that noise.

use super::claim_keywords;
use crate::config::FactCheckConfig;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `.` followed by any Unicode whitespace, including no-break spaces
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s+").expect("sentence boundary pattern is valid"));

/// Split text into sentence candidates on `.` followed by whitespace
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY.split(text).collect()
}

/// Keyword-overlap sentence filter
#[derive(Debug, Clone)]
pub struct SentenceExtractor {
    min_keyword_length: usize,
    max_sentences: usize,
}

impl SentenceExtractor {
    pub fn new(min_keyword_length: usize, max_sentences: usize) -> Self {
        Self {
            min_keyword_length,
            max_sentences,
        }
    }

    pub fn from_config(config: &FactCheckConfig) -> Self {
        Self::new(config.min_keyword_length, config.max_evidence_sentences)
    }

    /// Relevant sentences of `body` in document order, at most `max_sentences`.
    ///
    /// A sentence is relevant when it contains, case-insensitively, at least
    /// one claim keyword of `min_keyword_length` characters or more.
    pub fn extract(&self, body: &str, claim: &str) -> Vec<String> {
        if body.is_empty() || claim.is_empty() {
            return Vec::new();
        }

        let keywords: Vec<String> = claim_keywords(claim)
            .into_iter()
            .filter(|kw| kw.chars().count() >= self.min_keyword_length)
            .collect();
        if keywords.is_empty() {
            return Vec::new();
        }

        let relevant: Vec<String> = split_sentences(body)
            .into_iter()
            .filter(|sentence| !sentence.is_empty())
            .filter(|sentence| {
                let lower = sentence.to_lowercase();
                keywords.iter().any(|kw| lower.contains(kw.as_str()))
            })
            .take(self.max_sentences)
            .map(str::to_string)
            .collect();

        debug!(
            body_len = body.len(),
            keywords = keywords.len(),
            relevant = relevant.len(),
            "Sentences extracted"
        );

        relevant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> SentenceExtractor {
        SentenceExtractor::new(3, 10)
    }

    #[test]
    fn test_split_on_period_whitespace() {
        let parts = split_sentences("First one. Second one.  Third one.");
        assert_eq!(parts, vec!["First one", "Second one", "Third one."]);
    }

    #[test]
    fn test_splitter_is_naive_about_abbreviations() {
        let parts = split_sentences("Dr. Smith ran. He won.");
        assert_eq!(parts, vec!["Dr", "Smith ran", "He won."]);
        // no whitespace after the period, so decimals stay whole
        assert_eq!(split_sentences("Pi is 3.14 roughly"), vec!["Pi is 3.14 roughly"]);
    }

    #[test]
    fn test_split_on_unicode_whitespace() {
        let parts = split_sentences("The marathon ended.\u{a0}The runner died.");
        assert_eq!(parts, vec!["The marathon ended", "The runner died."]);

        let parts = split_sentences("One.\u{2003}Two.\u{3000}\nThree");
        assert_eq!(parts, vec!["One", "Two", "Three"]);
    }

    #[test]
    fn test_no_break_space_keeps_sentences_apart() {
        let out = extractor().extract("The marathon ended.\u{a0}The runner died.", "runner");
        assert_eq!(out, vec!["The runner died."]);
    }

    #[test]
    fn test_extracts_relevant_sentences_in_order() {
        let text = "The marathon is a long race. Pheidippides ran to Athens. He died after the run.";
        let out = extractor().extract(text, "marathon runner died");
        assert_eq!(out, vec!["The marathon is a long race", "He died after the run."]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let out = extractor().extract("MARATHON history is old. Unrelated text.", "Marathon");
        assert_eq!(out, vec!["MARATHON history is old"]);
    }

    #[test]
    fn test_keyword_length_threshold_is_inclusive() {
        // "ran" has exactly min_keyword_length characters and still counts
        let out = extractor().extract("He ran fast. Nothing else.", "ran");
        assert_eq!(out, vec!["He ran fast"]);

        // "is" is too short to count
        let out = extractor().extract("This is it. Another one.", "is");
        assert!(out.is_empty());
    }

    #[test]
    fn test_truncates_to_max_sentences() {
        let text = (0..20)
            .map(|i| format!("Sentence {i} about rivers"))
            .collect::<Vec<_>>()
            .join(". ");
        let out = SentenceExtractor::new(3, 4).extract(&text, "rivers");
        assert_eq!(out.len(), 4);
        assert_eq!(out[0], "Sentence 0 about rivers");
        assert_eq!(out[3], "Sentence 3 about rivers");
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        assert!(extractor().extract("", "marathon").is_empty());
        assert!(extractor().extract("The marathon. Again.", "").is_empty());
    }

    #[test]
    fn test_every_result_contains_a_keyword() {
        let text = "Rome is in Italy. Paris is in France. Berlin is the capital of Germany. \
                    The Alps span several countries. Italy borders France.";
        let claim = "Rome Italy capital";
        let keywords: Vec<String> = claim
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.chars().count() >= 3)
            .map(str::to_string)
            .collect();

        for max in 0..6 {
            let out = SentenceExtractor::new(3, max).extract(text, claim);
            assert!(out.len() <= max);
            for sentence in &out {
                assert!(!sentence.is_empty());
                let lower = sentence.to_lowercase();
                assert!(keywords.iter().any(|kw| lower.contains(kw.as_str())));
            }
        }
    }
}
