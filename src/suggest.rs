//! Suggestion assembly for the text being typed.
//!
//! Combines the three kinds of help a keyboard offers:
//! - **Autocorrect**: fixes for the word being typed
//! - **Completion**: full words starting with the word being typed
//! - **Prediction**: the next word once the current one is finished
//!
//! A word counts as finished when the text ends with whitespace or the word
//! ends with sentence punctuation (`.`, `,`, `!`, `?`).

use crate::autocorrect::Autocorrect;
use crate::config::Config;
use crate::ngram::NGramModel;

/// Characters that finish the current word.
const WORD_END: [char; 4] = ['.', ',', '!', '?'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Autocorrect,
    Prediction,
    Completion,
}

impl SuggestionKind {
    pub fn label(self) -> &'static str {
        match self {
            SuggestionKind::Autocorrect => "Autocorrect",
            SuggestionKind::Prediction => "Next Word",
            SuggestionKind::Completion => "Complete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub word: String,
}

impl Suggestion {
    fn new(kind: SuggestionKind, word: impl Into<String>) -> Self {
        Self {
            kind,
            word: word.into(),
        }
    }
}

/// How many suggestions of each kind to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestLimits {
    pub max_predictions: usize,
    pub max_suggestions: usize,
    pub max_alternatives: usize,
}

impl From<&Config> for SuggestLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_predictions: config.max_predictions,
            max_suggestions: config.max_suggestions,
            max_alternatives: config.max_autocorrect_alternatives,
        }
    }
}

/// Read-only view over a trained model and a spell checker.
pub struct Suggester<'a> {
    model: &'a NGramModel,
    autocorrect: &'a dyn Autocorrect,
    limits: SuggestLimits,
}

impl<'a> Suggester<'a> {
    pub fn new(model: &'a NGramModel, autocorrect: &'a dyn Autocorrect, limits: SuggestLimits) -> Self {
        Self {
            model,
            autocorrect,
            limits,
        }
    }

    /// Suggestions for the current text, in display order.
    pub fn suggest(&self, input: &str) -> Vec<Suggestion> {
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((&current, preceding)) = words.split_last() else {
            return Vec::new();
        };

        if is_complete(input, current) {
            return self
                .model
                .predict_next_words(&words, self.limits.max_predictions)
                .into_iter()
                .map(|word| Suggestion::new(SuggestionKind::Prediction, word))
                .collect();
        }

        let mut suggestions = Vec::new();

        let correction = self.autocorrect.correct(current);
        if correction.best != current {
            suggestions.push(Suggestion::new(SuggestionKind::Autocorrect, correction.best.as_str()));
        }
        let alternatives = correction
            .candidates
            .into_iter()
            .filter(|candidate| *candidate != correction.best)
            .take(self.limits.max_alternatives);
        for candidate in alternatives {
            suggestions.push(Suggestion::new(SuggestionKind::Autocorrect, candidate));
        }

        let completions = self
            .model
            .get_word_suggestions(current, preceding, self.limits.max_suggestions);
        for word in completions {
            suggestions.push(Suggestion::new(SuggestionKind::Completion, word));
        }

        suggestions
    }
}

fn is_complete(input: &str, current: &str) -> bool {
    input.ends_with(char::is_whitespace) || current.ends_with(WORD_END)
}

/// Apply a chosen suggestion to the text.
///
/// Autocorrections and completions replace the last word; predictions are
/// appended after it. Words are re-joined with single spaces.
pub fn apply(kind: SuggestionKind, word: &str, input: &str) -> String {
    match kind {
        SuggestionKind::Autocorrect | SuggestionKind::Completion => {
            let mut words: Vec<&str> = input.split_whitespace().collect();
            words.pop();
            words.push(word);
            words.join(" ")
        }
        SuggestionKind::Prediction => {
            let head = input.trim_end();
            if head.is_empty() {
                word.to_owned()
            } else {
                format!("{head} {word}")
            }
        }
    }
}
