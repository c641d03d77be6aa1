//! Evidence pipeline core
//!
//! - Sentence extraction from article bodies
//! - Keyword/negation verdict heuristic

mod classifier;
mod extractor;

pub use classifier::{HeuristicClassifier, NEGATION_WORDS};
pub use extractor::{split_sentences, SentenceExtractor};

use std::collections::HashSet;

/// Lower-cased, whitespace-split, deduplicated claim keywords
pub(crate) fn claim_keywords(claim: &str) -> HashSet<String> {
    claim
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
