use crate::services::thesaurus::Thesaurus;
use lazy_static::lazy_static;
use regex::Regex;
use std::{collections::BTreeSet, sync::Arc};
use tracing::debug;

lazy_static! {
    /// Words, optionally joined by internal hyphens, apostrophes or periods.
    static ref TOKEN_PATTERN: Regex =
        Regex::new(r"[\p{L}\p{N}]+(?:[-'.’][\p{L}\p{N}]+)*").unwrap();
}

/// Turns a free-text health description into the set of thesaurus lemmas
/// used to match pose records.
#[derive(Clone)]
pub struct KeywordExtractor {
    thesaurus: Arc<dyn Thesaurus>,
}

impl KeywordExtractor {
    pub fn new(thesaurus: Arc<dyn Thesaurus>) -> Self {
        Self { thesaurus }
    }

    /// Every lemma of every sense of every alphabetic token in `text`.
    ///
    /// Tokens without an entry contribute nothing, so text made only of
    /// punctuation, digits or unknown words yields an empty set.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let keywords: BTreeSet<String> = tokenize(text)
            .iter()
            .flat_map(|token| self.thesaurus.senses(token))
            .flatten()
            .collect();

        debug!("Extracted {} keywords from health issue", keywords.len());
        keywords
    }
}

/// Split into lowercase alphabetic tokens.
///
/// Contractions are split at the apostrophe (`don't` becomes `do` + `n't`)
/// and only the leading part can survive the alphabetic check. Hyphenated
/// and dotted words are kept whole, and therefore dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| split_contraction(m.as_str()))
        .filter(|token| !token.is_empty() && token.chars().all(char::is_alphabetic))
        .map(|token| token.to_lowercase())
        .collect()
}

fn split_contraction(token: &str) -> &str {
    let lower = token.to_lowercase();
    if lower.ends_with("n't") || lower.ends_with("n’t") {
        let cut = token.len() - if lower.ends_with("n't") { 3 } else { 5 };
        return &token[..cut];
    }

    match token.find(|c: char| c == '\'' || c == '’') {
        Some(idx) => &token[..idx],
        None => token,
    }
}
