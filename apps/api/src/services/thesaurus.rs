use crate::error::{ApiError, Result};
use lazy_static::lazy_static;
use std::{collections::HashMap, fs, path::Path};
use tracing::info;

/// Source of word senses, each sense being the list of its lemma names.
///
/// Lemma names follow the WordNet convention: lowercase, with multi-word
/// lemmas joined by underscores (`pain_in_the_neck`).
pub trait Thesaurus: Send + Sync {
    fn senses(&self, word: &str) -> Vec<Vec<String>>;
}

/// WordNet-derived lexicon shipped with the service, covering the vocabulary
/// people use to describe common complaints. A full export can be layered on
/// top with `Lexicon::from_json_file`.
const BUILTIN_LEXICON: &str = include_str!("../../data/lexicon.json");

lazy_static! {
    /// Irregular inflections that suffix detachment cannot undo.
    static ref EXCEPTIONS: HashMap<&'static str, &'static str> = [
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("children", "child"),
        ("calves", "calf"),
        ("swollen", "swell"),
        ("slept", "sleep"),
        ("vertebrae", "vertebra"),
    ]
    .into_iter()
    .collect();
}

/// An in-memory thesaurus keyed by lowercase word.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl Lexicon {
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_LEXICON)
    }

    /// Parse a lexicon of the form `{ "word": [["lemma", ...], ...] }`.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, Vec<Vec<String>>> = serde_json::from_str(raw)?;
        let entries = parsed
            .into_iter()
            .map(|(word, senses)| (word.to_lowercase(), senses))
            .collect();
        Ok(Self { entries })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to read thesaurus file {}: {}",
                path.display(),
                e
            ))
        })?;
        let lexicon = Self::from_json_str(&raw)?;
        info!(
            "Loaded {} thesaurus entries from {}",
            lexicon.len(),
            path.display()
        );
        Ok(lexicon)
    }

    /// Merge another lexicon in; its entries replace existing ones.
    pub fn extend(&mut self, other: Lexicon) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Thesaurus for Lexicon {
    /// Senses of the word and of every base form that has an entry, so
    /// `depressed` yields both the adjective and the senses of `depress`.
    fn senses(&self, word: &str) -> Vec<Vec<String>> {
        let word = word.to_lowercase();
        let mut senses: Vec<Vec<String>> = Vec::new();
        for form in base_forms(&word) {
            for sense in self.entries.get(&form).into_iter().flatten() {
                if !senses.contains(sense) {
                    senses.push(sense.clone());
                }
            }
        }
        senses
    }
}

/// Inflectional endings and their replacements, tried in order.
const DETACHMENTS: &[(&str, &str)] = &[
    ("ses", "s"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("s", ""),
    ("ing", "e"),
    ("ing", ""),
    ("ed", "e"),
    ("ed", ""),
];

/// The word itself followed by its candidate base forms.
fn base_forms(word: &str) -> Vec<String> {
    let mut forms = vec![word.to_string()];
    if let Some(base) = EXCEPTIONS.get(word) {
        forms.push(base.to_string());
    }
    for (suffix, replacement) in DETACHMENTS {
        if let Some(stem) = word.strip_suffix(suffix) {
            if stem.len() >= 2 {
                let form = format!("{}{}", stem, replacement);
                if !forms.contains(&form) {
                    forms.push(form);
                }
            }
        }
    }
    forms
}
