//! Title normalization for exact-match comparison

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Text a missing title is stringified to under [`MissingTitlePolicy::Placeholder`].
pub const MISSING_TITLE_PLACEHOLDER: &str = "nan";

lazy_static! {
    // Anything that is not a letter or a number (underscores, marks and
    // connector punctuation included)
    static ref NON_WORD_RUN: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// How records without a title take part in matching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTitlePolicy {
    /// Missing titles normalize to `"nan"`, so several of them exact-match
    /// each other.
    #[default]
    Placeholder,
    /// Missing titles get no key at all: never grouped, never scanned.
    Empty,
}

/// Normalize a title for comparison
///
/// - Missing titles become `"nan"`
/// - Converts to lowercase
/// - Replaces runs of anything but letters and numbers with a space
/// - Collapses whitespace and trims
pub fn normalize_title(title: Option<&str>) -> String {
    normalize_title_internal(title.unwrap_or(MISSING_TITLE_PLACEHOLDER))
}

pub(crate) fn normalize_title_internal(title: &str) -> String {
    let lowered = title.to_lowercase();
    let spaced = NON_WORD_RUN.replace_all(&lowered, " ");
    WHITESPACE_RUN.replace_all(&spaced, " ").trim().to_string()
}

/// Strip diacritics by decomposing and dropping combining marks
fn fold_diacritics(title: &str) -> String {
    title.nfkd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Title normalizer carrying the configurable parts of normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TitleNormalizer {
    pub missing_titles: MissingTitlePolicy,
    pub fold_diacritics: bool,
}

impl TitleNormalizer {
    pub fn new(missing_titles: MissingTitlePolicy, fold_diacritics: bool) -> Self {
        Self {
            missing_titles,
            fold_diacritics,
        }
    }

    /// Compute the matching key for a title.
    ///
    /// Returns `None` only for a missing title under [`MissingTitlePolicy::Empty`].
    pub fn normalize(&self, title: Option<&str>) -> Option<String> {
        let raw = match (title, self.missing_titles) {
            (Some(raw), _) => raw,
            (None, MissingTitlePolicy::Placeholder) => MISSING_TITLE_PLACEHOLDER,
            (None, MissingTitlePolicy::Empty) => return None,
        };

        if self.fold_diacritics {
            Some(normalize_title_internal(&fold_diacritics(raw)))
        } else {
            Some(normalize_title_internal(raw))
        }
    }
}
