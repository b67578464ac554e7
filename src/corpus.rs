//! Corpus loading and tokenization.
//!
//! Two sources feed the language model:
//! - **Base corpus**: mandatory. By default the reference text bundled into
//!   the binary at compile time, optionally replaced by a file from the
//!   configuration.
//! - **Supplementary corpus**: optional plain UTF-8 text file whose words are
//!   added on top of the base corpus. A missing or unreadable file is skipped.
//!
//! # Tokenization
//!
//! The two sources are tokenized differently:
//! - The base corpus keeps only purely alphabetic words. Each whitespace
//!   separated token first has its surrounding punctuation detached, so
//!   "mat." counts as "mat" while "don't" and "1920" are dropped.
//! - The supplementary corpus is lowercased and every `\b\w+\b` match is a
//!   word, which keeps digits and underscores ("don't" yields "don" and "t").
//!
//! Query-time context words go through `normalize_query_token`, which strips
//! punctuation but does not filter to alphabetic characters.

use crate::error::ModelError;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

// Embed the reference corpus at compile time.
const BUNDLED_CORPUS: &str = include_str!("../corpus/reference.txt");

/// The mandatory base corpus.
#[derive(Debug, Clone)]
pub struct Corpus {
    text: Cow<'static, str>,
}

impl Corpus {
    /// The reference corpus compiled into the binary.
    pub fn bundled() -> Self {
        Self {
            text: Cow::Borrowed(BUNDLED_CORPUS),
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Cow::Owned(text.into()),
        }
    }

    /// Read a base corpus from disk.
    ///
    /// # Errors
    /// Returns `ModelError::Corpus` if the file cannot be read. Unlike the
    /// supplementary corpus, a configured base corpus is mandatory.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Corpus {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "read base corpus");
        Ok(Self::from_text(text))
    }

    /// The corpus as a flat sequence of training words.
    pub fn words(&self) -> Vec<String> {
        reference_tokens(&self.text)
    }
}

/// Tokenize base-corpus text: alphabetic words only, lowercased.
pub fn reference_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(strip_punctuation)
        .filter(|word| !word.is_empty() && word.chars().all(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}

/// Tokenize supplementary-corpus text with word-boundary matching.
pub fn supplementary_tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    word_pattern()
        .find_iter(&lowered)
        .map(|found| found.as_str().to_owned())
        .collect()
}

/// Load and tokenize a supplementary corpus file.
///
/// Returns `None` when the file is missing or unreadable. Training then
/// proceeds on the base corpus alone.
pub fn load_supplementary(path: &Path) -> Option<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(supplementary_tokens(&text)),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "supplementary corpus unavailable, skipping");
            None
        }
    }
}

/// Normalize one query-time context word.
///
/// Lowercases and strips surrounding whitespace and ASCII punctuation.
/// Returns `None` when nothing is left.
pub fn normalize_query_token(token: &str) -> Option<String> {
    let stripped = strip_punctuation(token.trim());
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.to_lowercase())
    }
}

fn strip_punctuation(token: &str) -> &str {
    token.trim_matches(|c: char| c.is_ascii_punctuation())
}

fn word_pattern() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\b\w+\b").expect("word pattern is a valid regex"))
}
