//! Insertion-ordered frequency counter.
//!
//! Both tables of the language model are built from `FrequencyCounter`s:
//! the unigram table is one counter, and every context of the n-gram table
//! owns one for its followers.
//!
//! # Ranking
//!
//! Entries are kept in the order they were first seen. `rerank()` computes a
//! stable ordering by descending count, so words with equal counts keep
//! their first-seen order. Queries only read that ranking, which means a
//! lookup never sorts anything.
//!
//! The ranking reflects the counts as of the last `rerank()`. The model
//! calls it once at the end of every training pass.

use ahash::AHashMap;

#[derive(Debug, Clone, Default)]
pub struct FrequencyCounter {
    /// Word → position in `entries`.
    index: AHashMap<String, usize>,
    /// (word, count) in first-seen order.
    entries: Vec<(String, u64)>,
    /// Positions into `entries`, most frequent first.
    ranking: Vec<usize>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `word`, creating its entry on first sight.
    pub fn add(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.index.insert(word.to_owned(), self.entries.len());
                self.entries.push((word.to_owned(), 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Rebuild the ranking from the current counts.
    pub fn rerank(&mut self) {
        let entries = &self.entries;
        let mut ranking: Vec<usize> = (0..entries.len()).collect();
        // `sort_by` is stable: equal counts stay in first-seen order.
        ranking.sort_by(|&a, &b| entries[b].1.cmp(&entries[a].1));
        self.ranking = ranking;
    }

    /// Words and counts, most frequent first.
    pub fn most_common(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.ranking.iter().map(move |&position| {
            let (word, count) = &self.entries[position];
            (word.as_str(), *count)
        })
    }

    /// Keep only entries matching `keep`, then rerank.
    ///
    /// Surviving entries keep their relative first-seen order.
    ///
    /// # Returns
    /// The number of entries removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&str, u64) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|(word, count)| keep(word.as_str(), *count));

        self.index.clear();
        for (position, (word, _)) in self.entries.iter().enumerate() {
            self.index.insert(word.clone(), position);
        }
        self.rerank();

        before - self.entries.len()
    }
}
