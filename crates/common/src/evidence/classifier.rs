//! Keyword/negation verdict heuristic
//!
//! Deliberately shallow: a sentence that mentions a claim keyword supports
//! the claim unless it also contains a negation word, in which case it
//! contradicts it. Matching is plain substring matching, so "none" also
//! fires inside longer tokens.

use crate::models::Verdict;
use tracing::debug;

/// Negation vocabulary, matched as case-insensitive substrings
pub const NEGATION_WORDS: [&str; 11] = [
    "not", "no", "never", "didn't", "doesn't", "wasn't", "weren't", "false", "incorrect",
    "neither", "none",
];

/// Only location claims whose evidence mentions this string are contradicted
/// by the location branch.
const LOCATION_CONTRADICTION_MARKER: &str = "china";

#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    min_keyword_length: usize,
}

impl HeuristicClassifier {
    pub fn new(min_keyword_length: usize) -> Self {
        Self { min_keyword_length }
    }

    /// Aggregate evidence into a verdict and the evidence that justified it.
    ///
    /// Claim words must be strictly longer than `min_keyword_length`, unlike
    /// the extractor which accepts words of exactly that length.
    pub fn classify(&self, evidence: &[String], claim: &str) -> (Verdict, Vec<String>) {
        let claim_lower = claim.to_lowercase();
        let claim_words: Vec<&str> = claim_lower
            .split_whitespace()
            .filter(|w| w.chars().count() > self.min_keyword_length)
            .collect();
        let location = claimed_location(&claim_lower);

        let mut supporting = Vec::new();
        let mut contradicting = Vec::new();

        for sentence in evidence {
            let sentence_lower = sentence.to_lowercase();
            let has_keyword = claim_words.iter().any(|kw| sentence_lower.contains(kw));
            let has_negation = NEGATION_WORDS.iter().any(|neg| sentence_lower.contains(neg));

            if has_keyword && !has_negation {
                supporting.push(sentence.clone());
            } else if has_keyword {
                contradicting.push(sentence.clone());
            } else if let Some(location) = location.as_deref() {
                if location != LOCATION_CONTRADICTION_MARKER
                    && sentence_lower.contains(LOCATION_CONTRADICTION_MARKER)
                {
                    contradicting.push(sentence.clone());
                }
            }
        }

        debug!(
            supporting = supporting.len(),
            contradicting = contradicting.len(),
            "Evidence classified"
        );

        match (supporting.is_empty(), contradicting.is_empty()) {
            (false, false) => {
                supporting.extend(contradicting);
                (Verdict::Mixed, supporting)
            }
            (false, true) => (Verdict::True, supporting),
            (true, false) => (Verdict::False, contradicting),
            (true, true) => (Verdict::InsufficientEvidence, Vec::new()),
        }
    }
}

/// Location named by an "is in" / "located in" claim: the text after the
/// first "in ", without '?' and surrounding whitespace.
fn claimed_location(claim_lower: &str) -> Option<String> {
    if !claim_lower.contains("is in") && !claim_lower.contains("located in") {
        return None;
    }
    let (_, rest) = claim_lower.split_once("in ")?;
    let location = rest.replace('?', "").trim().to_string();
    (!location.is_empty()).then_some(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> HeuristicClassifier {
        HeuristicClassifier::new(3)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_supporting_evidence_is_true() {
        let evidence = strings(&[
            "Pheidippides ran the first marathon and died after finishing.",
            "The first marathon runner collapsed and died.",
        ]);
        let (verdict, relevant) =
            classifier().classify(&evidence, "The first marathon runner died after finishing");
        assert_eq!(verdict, Verdict::True);
        assert_eq!(relevant, evidence);
    }

    #[test]
    fn test_negated_evidence_is_false() {
        let evidence = strings(&["The first marathon runner did not die; he survived and lived many years."]);
        let (verdict, relevant) = classifier().classify(&evidence, "The first marathon runner died");
        assert_eq!(verdict, Verdict::False);
        assert_eq!(relevant, evidence);
    }

    #[test]
    fn test_split_evidence_is_mixed_in_concatenation_order() {
        let evidence = strings(&[
            "Some sources say the runner did not die and survived.",
            "Pheidippides died after the run.",
        ]);
        let (verdict, relevant) =
            classifier().classify(&evidence, "The marathon runner died after the run");
        assert_eq!(verdict, Verdict::Mixed);
        // supporting first, then contradicting, regardless of input order
        assert_eq!(
            relevant,
            strings(&[
                "Pheidippides died after the run.",
                "Some sources say the runner did not die and survived.",
            ])
        );
    }

    #[test]
    fn test_mixed_scenario_from_docs() {
        let evidence = strings(&[
            "Pheidippides died after the run.",
            "Some sources say the runner did not die and survived.",
        ]);
        let (verdict, relevant) =
            classifier().classify(&evidence, "The marathon runner died after the run");
        assert_eq!(verdict, Verdict::Mixed);
        assert_eq!(relevant, evidence);
    }

    #[test]
    fn test_unrelated_evidence_is_insufficient() {
        let evidence = strings(&["The weather today is sunny."]);
        let (verdict, relevant) = classifier().classify(&evidence, "The marathon runner died");
        assert_eq!(verdict, Verdict::InsufficientEvidence);
        assert!(relevant.is_empty());
    }

    #[test]
    fn test_empty_evidence_is_insufficient() {
        let (verdict, relevant) = classifier().classify(&[], "The moon is made of cheese");
        assert_eq!(verdict, Verdict::InsufficientEvidence);
        assert!(relevant.is_empty());

        let (verdict, relevant) = classifier().classify(&[], "");
        assert_eq!(verdict, Verdict::InsufficientEvidence);
        assert!(relevant.is_empty());
    }

    #[test]
    fn test_keyword_threshold_is_strict() {
        // "ran" has exactly three characters and is ignored by the classifier
        let evidence = strings(&["He ran quickly."]);
        let (verdict, _) = classifier().classify(&evidence, "ran");
        assert_eq!(verdict, Verdict::InsufficientEvidence);
    }

    #[test]
    fn test_negation_matches_inside_tokens() {
        // "know" contains "no"
        let evidence = strings(&["Historians know the marathon legend well."]);
        let (verdict, _) = classifier().classify(&evidence, "marathon legend");
        assert_eq!(verdict, Verdict::False);
    }

    #[test]
    fn test_location_branch_contradicts_on_china() {
        let evidence = strings(&["The wall stretches across China."]);
        let (verdict, relevant) = classifier().classify(&evidence, "The Eiffel Tower is in Paris?");
        assert_eq!(verdict, Verdict::False);
        assert_eq!(relevant, evidence);
    }

    #[test]
    fn test_location_branch_ignores_china_claims() {
        // "china?" keeps its question mark as a claim word, so only the
        // location branch sees this sentence
        let evidence = strings(&["Shanghai is a city in China."]);
        let (verdict, _) = classifier().classify(&evidence, "Is Beijing located in China?");
        assert_eq!(verdict, Verdict::InsufficientEvidence);
    }

    #[test]
    fn test_location_branch_needs_china_in_sentence() {
        let evidence = strings(&["The river runs through Germany."]);
        let (verdict, _) = classifier().classify(&evidence, "The Eiffel Tower is in Paris");
        assert_eq!(verdict, Verdict::InsufficientEvidence);
    }

    #[test]
    fn test_claimed_location_uses_first_in() {
        assert_eq!(claimed_location("the tower is in paris?"), Some("paris".to_string()));
        assert_eq!(claimed_location("berlin is in germany"), Some("is in germany".to_string()));
        assert_eq!(claimed_location("rome is the capital"), None);
        assert_eq!(claimed_location("it is in ?"), None);
    }
}
