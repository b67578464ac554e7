// symspell.rs - Symmetric-delete index for fast spelling candidates
// Words and inputs are reduced to their deletes; shared deletes mark candidates,
// which are then verified with a bounded Damerau-Levenshtein distance.

use ahash::{AHashMap, AHashSet};
use std::cmp::Ordering;
use std::iter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestItem {
    pub term: String,
    pub distance: usize,
    pub frequency: u64,
}

pub struct SymSpell {
    // Main dictionary: word -> frequency
    words: AHashMap<String, u64>,
    // Delete dictionary: delete_word -> list of original words
    deletes: AHashMap<String, Vec<String>>,
    max_edit_distance: usize,
}

impl SymSpell {
    pub fn new(max_edit_distance: usize) -> Self {
        Self {
            words: AHashMap::new(),
            deletes: AHashMap::new(),
            max_edit_distance,
        }
    }

    /// Add a word with its frequency. Re-inserting a word adds to its frequency.
    pub fn insert(&mut self, word: &str, frequency: u64) {
        if let Some(existing) = self.words.get_mut(word) {
            *existing += frequency;
            return;
        }
        self.words.insert(word.to_owned(), frequency);

        for delete in Self::generate_deletes(word, self.max_edit_distance) {
            self.deletes.entry(delete).or_default().push(word.to_owned());
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Known words within `max_edit_distance` of `input`.
    ///
    /// Sorted by distance, then by descending frequency. The distance is
    /// capped at the distance the index was built with.
    pub fn lookup(&self, input: &str, max_edit_distance: usize) -> Vec<SuggestItem> {
        let max_edit_distance = max_edit_distance.min(self.max_edit_distance);
        let input_deletes = Self::generate_deletes(input, max_edit_distance);
        let mut suggestions = Vec::new();
        let mut considered = AHashSet::new();

        // The input itself and each of its deletes may be a word, or a delete
        // shared with words.
        for probe in iter::once(input).chain(input_deletes.iter().map(String::as_str)) {
            let direct = self.words.contains_key(probe).then_some(probe);
            let shared = self
                .deletes
                .get(probe)
                .into_iter()
                .flatten()
                .map(String::as_str);

            for original in direct.into_iter().chain(shared) {
                if !considered.insert(original) {
                    continue;
                }

                let Some(distance) = Self::damerau_levenshtein_distance(input, original, max_edit_distance)
                else {
                    continue;
                };
                if let Some(&frequency) = self.words.get(original) {
                    suggestions.push(SuggestItem {
                        term: original.to_owned(),
                        distance,
                        frequency,
                    });
                }
            }
        }

        // Sort by distance first, then by frequency
        suggestions.sort_by(|a, b| match a.distance.cmp(&b.distance) {
            Ordering::Equal => b.frequency.cmp(&a.frequency).then_with(|| a.term.cmp(&b.term)),
            other => other,
        });

        suggestions
    }

    /// Generate all delete strings within max_edit_distance
    fn generate_deletes(word: &str, max_edit_distance: usize) -> Vec<String> {
        let mut deletes = Vec::new();
        let mut queue = vec![(word.to_string(), 0)];
        let mut seen = AHashSet::new();
        seen.insert(word.to_string());

        while let Some((current, depth)) = queue.pop() {
            if depth >= max_edit_distance {
                continue;
            }
            let chars: Vec<char> = current.chars().collect();
            for skip in 0..chars.len() {
                let new_word: String = chars
                    .iter()
                    .enumerate()
                    .filter(|&(j, _)| j != skip)
                    .map(|(_, &c)| c)
                    .collect();

                if seen.insert(new_word.clone()) {
                    deletes.push(new_word.clone());
                    queue.push((new_word, depth + 1));
                }
            }
        }

        deletes
    }

    /// Damerau-Levenshtein (optimal string alignment) distance with early termination.
    ///
    /// Returns `None` when the distance exceeds `max_distance`.
    fn damerau_levenshtein_distance(source: &str, target: &str, max_distance: usize) -> Option<usize> {
        let source_chars: Vec<char> = source.chars().collect();
        let target_chars: Vec<char> = target.chars().collect();
        let len1 = source_chars.len();
        let len2 = target_chars.len();

        // Quick checks
        if len1.abs_diff(len2) > max_distance {
            return None;
        }
        if len1 == 0 || len2 == 0 {
            return Some(len1.max(len2));
        }

        let mut matrix = vec![vec![0usize; len2 + 1]; len1 + 1];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[0] = i;
        }
        for (j, cell) in matrix[0].iter_mut().enumerate() {
            *cell = j;
        }

        for i in 1..=len1 {
            let mut min_in_row = usize::MAX;

            for j in 1..=len2 {
                let cost = usize::from(source_chars[i - 1] != target_chars[j - 1]);

                let deletion = matrix[i - 1][j] + 1;
                let insertion = matrix[i][j - 1] + 1;
                let substitution = matrix[i - 1][j - 1] + cost;
                matrix[i][j] = deletion.min(insertion).min(substitution);

                // Damerau: transposition
                if i > 1
                    && j > 1
                    && source_chars[i - 1] == target_chars[j - 2]
                    && source_chars[i - 2] == target_chars[j - 1]
                {
                    matrix[i][j] = matrix[i][j].min(matrix[i - 2][j - 2] + cost);
                }

                min_in_row = min_in_row.min(matrix[i][j]);
            }

            // Early termination: no cell in this row can still get under the limit
            if min_in_row > max_distance {
                return None;
            }
        }

        let distance = matrix[len1][len2];
        (distance <= max_distance).then_some(distance)
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(items: &[SuggestItem]) -> Vec<&str> {
        items.iter().map(|item| item.term.as_str()).collect()
    }

    #[test]
    fn test_basic_lookup() {
        let mut symspell = SymSpell::new(2);
        symspell.insert("hello", 100);
        symspell.insert("world", 50);

        let suggestions = symspell.lookup("hello", 2);
        assert_eq!(suggestions[0].term, "hello");
        assert_eq!(suggestions[0].distance, 0);
    }

    #[test]
    fn test_correction() {
        let mut symspell = SymSpell::new(2);
        symspell.insert("hello", 100);

        let suggestions = symspell.lookup("helo", 2);
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].term, "hello");
        assert_eq!(suggestions[0].distance, 1);
    }

    #[test]
    fn test_single_edits_are_found_at_distance_one() {
        let mut symspell = SymSpell::new(1);
        symspell.insert("hello", 100);

        // deletion, insertion, substitution, transposition
        for typo in ["helo", "helloo", "hallo", "hlelo"] {
            assert_eq!(terms(&symspell.lookup(typo, 1)), vec!["hello"], "typo: {typo}");
        }
    }

    #[test]
    fn test_ranked_by_distance_then_frequency() {
        let mut symspell = SymSpell::new(2);
        symspell.insert("the", 1000);
        symspell.insert("then", 50);
        symspell.insert("ten", 10);
        symspell.insert("tea", 500);

        let suggestions = symspell.lookup("teh", 2);
        assert_eq!(suggestions[0].term, "the");
        assert_eq!(suggestions[0].distance, 1);
        assert!(suggestions.windows(2).all(|pair| pair[0].distance <= pair[1].distance));
    }

    #[test]
    fn test_reinsert_adds_frequency() {
        let mut symspell = SymSpell::new(1);
        symspell.insert("cat", 2);
        symspell.insert("cat", 3);
        assert_eq!(symspell.word_count(), 1);
        assert_eq!(symspell.lookup("cat", 0)[0].frequency, 5);
    }

    #[test]
    fn test_distance() {
        assert_eq!(SymSpell::damerau_levenshtein_distance("hello", "helo", 2), Some(1));
        assert_eq!(SymSpell::damerau_levenshtein_distance("hello", "world", 2), None);
        assert_eq!(SymSpell::damerau_levenshtein_distance("", "ab", 2), Some(2));
        assert_eq!(SymSpell::damerau_levenshtein_distance("ab", "ba", 1), Some(1));
    }
}
