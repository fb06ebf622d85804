//! Context block assembly

use mgpt_core::RetrievedPassage;

/// Separator placed between passages in the context block
pub const PASSAGE_SEPARATOR: &str = "\n\n";

/// Join passage texts, in retrieval order, into one context block
pub fn build_context(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(PASSAGE_SEPARATOR)
}
