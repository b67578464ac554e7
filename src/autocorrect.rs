//! Single-word spelling correction.
//!
//! The suggestion layer only talks to the `Autocorrect` trait. The default
//! implementation, `SpellChecker`, indexes every word the language model was
//! trained on with SymSpell, so the vocabulary and word frequencies of
//! corrections match those of predictions and completions.

use crate::ngram::NGramModel;
use crate::symspell::SymSpell;
use tracing::debug;

/// Result of correcting one word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Best replacement, or the original word when it is known or nothing is close.
    pub best: String,
    /// Close known words, best first. Empty for known words.
    pub candidates: Vec<String>,
}

pub trait Autocorrect {
    fn correct(&self, word: &str) -> Correction;
}

/// SymSpell-backed spell checker.
pub struct SpellChecker {
    symspell: SymSpell,
    max_edit_distance: usize,
}

impl SpellChecker {
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            symspell: SymSpell::new(max_edit_distance),
            max_edit_distance,
        }
    }

    /// Build a checker from the vocabulary of a trained model.
    pub fn from_model(model: &NGramModel, max_edit_distance: usize) -> Self {
        let mut checker = Self::new(max_edit_distance);
        for (word, frequency) in model.word_frequencies() {
            checker.insert(word, frequency);
        }
        debug!(
            words = checker.symspell.word_count(),
            max_edit_distance, "spell checker ready"
        );
        checker
    }

    pub fn insert(&mut self, word: &str, frequency: u64) {
        self.symspell.insert(&word.to_lowercase(), frequency);
    }
}

impl Autocorrect for SpellChecker {
    /// Known words (case-insensitive) come back unchanged with no candidates.
    fn correct(&self, word: &str) -> Correction {
        let lowered = word.to_lowercase();
        if lowered.is_empty() || self.symspell.contains(&lowered) {
            return Correction {
                best: word.to_owned(),
                candidates: Vec::new(),
            };
        }

        let candidates: Vec<String> = self
            .symspell
            .lookup(&lowered, self.max_edit_distance)
            .into_iter()
            .map(|item| item.term)
            .collect();
        let best = candidates.first().cloned().unwrap_or_else(|| word.to_owned());

        Correction { best, candidates }
    }
}
