//! N-gram Language Model for next-word prediction and word completion.
//!
//! The model learns two tables from a corpus:
//! - **N-gram table**: the `n-1` preceding words (the context key) → counts
//!   of the word that followed them.
//! - **Unigram table**: word → total occurrences, used as the global
//!   "most common words" ranking.
//!
//! # Prediction
//!
//! Given a context, the last `n-1` words form the key:
//! - Known key: its followers, most frequent first
//! - Unknown key, or fewer than `n-1` usable words: the global unigram ranking
//!
//! Ties are always broken by the order in which words were first seen, so
//! results are deterministic for a given training corpus.
//!
//! # Completion
//!
//! A partially typed word is completed from the context predictions first,
//! then from the global ranking, keeping only words with the typed prefix.
//!
//! # Lifecycle
//!
//! ```rust
//! let mut model = NGramModel::new(3)?;
//! model.train(&Corpus::bundled(), Some(Path::new("extra.txt")))?;
//! let next = model.predict_next_words(&["the", "quick"], 5);
//! ```
//!
//! Training takes `&mut self` and queries take `&self`. Once the trained
//! model is shared (for example behind an `Arc`), it can no longer be
//! trained, and concurrent queries need no locking.

use crate::corpus::{self, Corpus};
use crate::counter::FrequencyCounter;
use crate::error::ModelError;
use ahash::AHashMap;
use std::path::Path;
use tracing::{debug, info};

/// Default order: two words of context predict the third.
pub const DEFAULT_ORDER: usize = 3;

/// Size of the trained tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    pub order: usize,
    /// Training tokens seen across all sources.
    pub tokens: u64,
    /// Distinct words.
    pub vocabulary: usize,
    /// Distinct context keys.
    pub contexts: usize,
    /// Distinct (context key, next word) pairs.
    pub transitions: usize,
}

/// An order-`n` word language model.
///
/// # Invariants
/// - `n >= 2`, fixed at construction
/// - Every key in `ngrams` has exactly `n-1` words
/// - Counts only grow during training; queries never modify the tables
#[derive(Debug, Clone)]
pub struct NGramModel {
    n: usize,
    /// Context key (n-1 words) → counts of the following word.
    ngrams: AHashMap<Vec<String>, FrequencyCounter>,
    /// Word → total count over every training source.
    unigrams: FrequencyCounter,
}

impl NGramModel {
    /// Create an untrained model of order `n`.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidOrder` if `n < 2`.
    pub fn new(n: usize) -> Result<Self, ModelError> {
        if n < 2 {
            return Err(ModelError::InvalidOrder(n));
        }
        Ok(Self {
            n,
            ngrams: AHashMap::new(),
            unigrams: FrequencyCounter::new(),
        })
    }

    pub fn order(&self) -> usize {
        self.n
    }

    /// Train on the base corpus and, if given, a supplementary corpus file.
    ///
    /// Training accumulates: calling it again adds the counts on top of the
    /// existing ones. Repeating the same corpus scales every count equally,
    /// so rankings do not change.
    ///
    /// A missing or unreadable supplementary file is logged and skipped.
    ///
    /// # Errors
    /// Returns `ModelError::EmptyCorpus` if the base corpus has no usable
    /// words. The model is left untouched in that case.
    pub fn train(&mut self, base: &Corpus, supplementary: Option<&Path>) -> Result<(), ModelError> {
        let base_words = base.words();
        if base_words.is_empty() {
            return Err(ModelError::EmptyCorpus);
        }
        debug!(words = base_words.len(), "training on base corpus");
        self.add_sequence(&base_words);

        if let Some(path) = supplementary {
            if let Some(words) = corpus::load_supplementary(path) {
                debug!(path = %path.display(), words = words.len(), "training on supplementary corpus");
                self.add_sequence(&words);
            }
        }

        self.rerank();

        let stats = self.stats();
        info!(
            order = stats.order,
            tokens = stats.tokens,
            vocabulary = stats.vocabulary,
            contexts = stats.contexts,
            transitions = stats.transitions,
            "language model trained"
        );
        Ok(())
    }

    /// Count unigrams and every full window of `n` words in one sequence.
    ///
    /// Windows never span two sequences.
    fn add_sequence(&mut self, words: &[String]) {
        for word in words {
            self.unigrams.add(word);
        }

        for window in words.windows(self.n) {
            let (key, next) = window.split_at(self.n - 1);
            let next = &next[0];
            match self.ngrams.get_mut(key) {
                Some(followers) => followers.add(next),
                None => {
                    let mut followers = FrequencyCounter::new();
                    followers.add(next);
                    self.ngrams.insert(key.to_vec(), followers);
                }
            }
        }
    }

    fn rerank(&mut self) {
        self.unigrams.rerank();
        for followers in self.ngrams.values_mut() {
            followers.rerank();
        }
    }

    /// Drop n-gram transitions seen fewer than `min_count` times.
    ///
    /// Contexts left without followers are removed. Unigrams are kept, so
    /// the fallback ranking does not change. `min_count <= 1` does nothing.
    ///
    /// # Returns
    /// The number of transitions removed.
    pub fn prune(&mut self, min_count: u64) -> usize {
        if min_count <= 1 {
            return 0;
        }

        let mut removed = 0;
        for followers in self.ngrams.values_mut() {
            removed += followers.retain(|_, count| count >= min_count);
        }
        self.ngrams.retain(|_, followers| !followers.is_empty());

        info!(min_count, removed, contexts = self.ngrams.len(), "pruned rare transitions");
        removed
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            order: self.n,
            tokens: self.unigrams.total(),
            vocabulary: self.unigrams.len(),
            contexts: self.ngrams.len(),
            transitions: self.ngrams.values().map(FrequencyCounter::len).sum(),
        }
    }

    /// Every known word with its count, most frequent first.
    pub fn word_frequencies(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.unigrams.most_common()
    }

    /// Predict the words most likely to follow `context`.
    ///
    /// Context words are lowercased and stripped of surrounding punctuation;
    /// words that end up empty are ignored. The last `n-1` remaining words
    /// form the lookup key. Falls back to the most common words when the
    /// context is too short or was never seen.
    ///
    /// # Returns
    /// At most `max_predictions` words, most likely first.
    pub fn predict_next_words<S: AsRef<str>>(&self, context: &[S], max_predictions: usize) -> Vec<&str> {
        if max_predictions == 0 {
            return Vec::new();
        }

        let context: Vec<String> = context
            .iter()
            .filter_map(|word| corpus::normalize_query_token(word.as_ref()))
            .collect();

        let width = self.n - 1;
        if context.len() >= width {
            let key = &context[context.len() - width..];
            if let Some(followers) = self.ngrams.get(key) {
                return followers
                    .most_common()
                    .take(max_predictions)
                    .map(|(word, _)| word)
                    .collect();
            }
        }

        self.most_common_words(max_predictions)
    }

    /// Complete a partially typed word.
    ///
    /// Candidates come from the context predictions first (up to twice the
    /// cap is considered), then from the global ranking. Only words starting
    /// with the lowercased `partial` are kept, without duplicates. An empty
    /// `partial` behaves like `predict_next_words`.
    ///
    /// # Returns
    /// At most `max_suggestions` words.
    pub fn get_word_suggestions<S: AsRef<str>>(
        &self,
        partial: &str,
        context: &[S],
        max_suggestions: usize,
    ) -> Vec<&str> {
        if partial.is_empty() {
            return self.predict_next_words(context, max_suggestions);
        }
        if max_suggestions == 0 {
            return Vec::new();
        }

        let partial = partial.to_lowercase();
        let mut suggestions: Vec<&str> = Vec::with_capacity(max_suggestions);

        if !context.is_empty() {
            let predictions = self.predict_next_words(context, max_suggestions.saturating_mul(2));
            for word in predictions {
                if word.starts_with(partial.as_str()) && !suggestions.contains(&word) {
                    suggestions.push(word);
                    if suggestions.len() >= max_suggestions {
                        return suggestions;
                    }
                }
            }
        }

        for (word, _) in self.unigrams.most_common() {
            if word.starts_with(partial.as_str()) && !suggestions.contains(&word) {
                suggestions.push(word);
                if suggestions.len() >= max_suggestions {
                    break;
                }
            }
        }

        suggestions
    }

    fn most_common_words(&self, max: usize) -> Vec<&str> {
        self.unigrams.most_common().take(max).map(|(word, _)| word).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    const CAT_CORPUS: &str = "the cat sat on the mat the cat ran";

    fn cat_model() -> NGramModel {
        let mut model = NGramModel::new(3).unwrap();
        model.train(&Corpus::from_text(CAT_CORPUS), None).unwrap();
        model
    }

    const NO_CONTEXT: [&str; 0] = [];

    #[test]
    fn test_predicts_followers_by_count_then_first_seen() {
        let model = cat_model();
        assert_eq!(model.predict_next_words(&["the", "cat"], 2), vec!["sat", "ran"]);
        assert_eq!(model.predict_next_words(&["the", "cat"], 1), vec!["sat"]);
    }

    #[test]
    fn test_empty_context_returns_most_common_word() {
        let model = cat_model();
        assert_eq!(model.predict_next_words(&NO_CONTEXT, 1), vec!["the"]);
    }

    #[test]
    fn test_completion_filters_by_prefix() {
        let model = cat_model();
        assert_eq!(model.get_word_suggestions("c", &["the"], 5), vec!["cat"]);
    }

    #[test]
    fn test_missing_supplementary_corpus_matches_base_only() {
        let mut with_missing = NGramModel::new(3).unwrap();
        with_missing
            .train(
                &Corpus::from_text(CAT_CORPUS),
                Some(Path::new("/nonexistent/smartkey/extra.txt")),
            )
            .unwrap();
        let base_only = cat_model();

        assert_eq!(with_missing.stats(), base_only.stats());
        for context in [vec!["the", "cat"], vec!["on", "the"], vec![], vec!["dog", "cat"]] {
            assert_eq!(
                with_missing.predict_next_words(&context, 5),
                base_only.predict_next_words(&context, 5)
            );
        }
        assert_eq!(
            with_missing.get_word_suggestions("m", &["on", "the"], 3),
            base_only.get_word_suggestions("m", &["on", "the"], 3)
        );
    }

    #[test]
    fn test_unknown_context_falls_back_to_global_ranking() {
        let model = cat_model();
        let global = model.predict_next_words(&NO_CONTEXT, 4);
        assert_eq!(global, vec!["the", "cat", "sat", "on"]);
        assert_eq!(model.predict_next_words(&["a", "dog"], 4), global);
        // Too little context also falls back.
        assert_eq!(model.predict_next_words(&["cat"], 4), global);
    }

    #[test]
    fn test_context_is_normalized() {
        let model = cat_model();
        assert_eq!(model.predict_next_words(&["The", "Cat!"], 2), vec!["sat", "ran"]);
        // Punctuation-only words are dropped before the key is formed.
        assert_eq!(model.predict_next_words(&["the", "cat", "--"], 2), vec!["sat", "ran"]);
        // Only the last n-1 words matter.
        assert_eq!(model.predict_next_words(&["on", "the", "mat"], 1), vec!["the"]);
    }

    #[test]
    fn test_whitespace_only_context_is_no_context() {
        let model = cat_model();
        assert_eq!(model.predict_next_words(&["  ", ""], 2), vec!["the", "cat"]);
    }

    #[test]
    fn test_zero_cap_returns_nothing() {
        let model = cat_model();
        assert!(model.predict_next_words(&["the", "cat"], 0).is_empty());
        assert!(model.predict_next_words(&NO_CONTEXT, 0).is_empty());
        assert!(model.get_word_suggestions("c", &["the"], 0).is_empty());
        assert!(model.get_word_suggestions("", &["the"], 0).is_empty());
    }

    #[test]
    fn test_empty_partial_delegates_to_prediction() {
        let model = cat_model();
        assert_eq!(
            model.get_word_suggestions("", &["the", "cat"], 3),
            model.predict_next_words(&["the", "cat"], 3)
        );
    }

    #[test]
    fn test_completion_prefers_context_then_global() {
        let model = NGramModel::new(2)
            .and_then(|mut model| {
                let corpus = Corpus::from_text("to the store to the shop to the shop red roses rest");
                model.train(&corpus, None)?;
                Ok(model)
            })
            .unwrap();

        // "to" is followed by "the" only; "the" by "shop" then "store".
        assert_eq!(model.get_word_suggestions("s", &["the"], 2), vec!["shop", "store"]);
        // Global fallback fills the rest in frequency order.
        assert_eq!(
            model.get_word_suggestions("R", &["the"], 5),
            vec!["red", "roses", "rest"]
        );
    }

    #[test]
    fn test_completion_has_no_duplicates() {
        let model = cat_model();
        let suggestions = model.get_word_suggestions("t", &["on", "the"], 5);
        assert_eq!(suggestions, vec!["the"]);
    }

    #[test]
    fn test_training_accumulates() {
        let corpus = Corpus::from_text(CAT_CORPUS);
        let mut model = NGramModel::new(3).unwrap();
        model.train(&corpus, None).unwrap();
        let once: Vec<String> = model
            .predict_next_words(&NO_CONTEXT, 10)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let tokens_once = model.stats().tokens;

        model.train(&corpus, None).unwrap();
        assert_eq!(model.stats().tokens, tokens_once * 2);
        assert_eq!(model.predict_next_words(&NO_CONTEXT, 10), once);
        assert_eq!(model.predict_next_words(&["the", "cat"], 2), vec!["sat", "ran"]);
    }

    #[test]
    fn test_supplementary_corpus_adds_counts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "The cat ran. The cat ran! The cat, ran?").unwrap();
        file.flush().unwrap();

        let mut model = NGramModel::new(3).unwrap();
        model
            .train(&Corpus::from_text(CAT_CORPUS), Some(file.path()))
            .unwrap();

        assert_eq!(model.predict_next_words(&["the", "cat"], 2), vec!["ran", "sat"]);
        assert_eq!(model.stats().tokens, 9 + 9);
    }

    #[test]
    fn test_supplementary_corpus_keeps_digits() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "route 66 route 66 route 66").unwrap();
        file.flush().unwrap();

        let mut model = NGramModel::new(2).unwrap();
        model
            .train(&Corpus::from_text("route one 66"), Some(file.path()))
            .unwrap();

        // "66" is dropped from the base corpus but kept from the supplementary one.
        assert_eq!(model.predict_next_words(&["route"], 1), vec!["66"]);
    }

    #[test]
    fn test_invalid_order_is_rejected() {
        assert!(matches!(NGramModel::new(0), Err(ModelError::InvalidOrder(0))));
        assert!(matches!(NGramModel::new(1), Err(ModelError::InvalidOrder(1))));
        assert!(NGramModel::new(2).is_ok());
    }

    #[test]
    fn test_empty_base_corpus_is_an_error() {
        let mut model = NGramModel::new(3).unwrap();
        let result = model.train(&Corpus::from_text("123 ... 456"), None);
        assert!(matches!(result, Err(ModelError::EmptyCorpus)));
        assert_eq!(model.stats().tokens, 0);
    }

    #[test]
    fn test_stats() {
        let model = cat_model();
        assert_eq!(
            model.stats(),
            ModelStats {
                order: 3,
                tokens: 9,
                vocabulary: 6,
                contexts: 6,
                transitions: 7,
            }
        );
    }

    #[test]
    fn test_prune_removes_rare_transitions() {
        let corpus = Corpus::from_text("a b c a b c a b d x y z");
        let mut model = NGramModel::new(3).unwrap();
        model.train(&corpus, None).unwrap();
        let global: Vec<String> = model
            .predict_next_words(&NO_CONTEXT, 3)
            .into_iter()
            .map(str::to_owned)
            .collect();

        assert_eq!(model.prune(1), 0);
        let removed = model.prune(2);
        assert!(removed > 0);

        // (a, b) → c survives with count 2; d was seen once.
        assert_eq!(model.predict_next_words(&["a", "b"], 5), vec!["c"]);
        // (x, y) lost its only follower and now falls back.
        assert_eq!(model.predict_next_words(&["x", "y"], 3), global);
        assert_eq!(model.stats().vocabulary, 7);
    }

    #[test]
    fn test_word_frequencies_are_ranked() {
        let model = cat_model();
        let top: Vec<(&str, u64)> = model.word_frequencies().take(2).collect();
        assert_eq!(top, vec![("the", 3), ("cat", 2)]);
    }

    #[test]
    fn test_shared_model_answers_identically_across_threads() {
        let model = Arc::new(cat_model());
        let expected = model.predict_next_words(&["the", "cat"], 5);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let model = Arc::clone(&model);
                std::thread::spawn(move || {
                    let predictions: Vec<String> = model
                        .predict_next_words(&["the", "cat"], 5)
                        .into_iter()
                        .map(str::to_owned)
                        .collect();
                    predictions
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_bundled_corpus_trains() {
        let mut model = NGramModel::new(DEFAULT_ORDER).unwrap();
        model.train(&Corpus::bundled(), None).unwrap();

        assert_eq!(model.predict_next_words(&NO_CONTEXT, 1), vec!["the"]);
        let completions = model.get_word_suggestions("riv", &["along", "the"], 3);
        assert_eq!(completions.first(), Some(&"river"));
    }
}
