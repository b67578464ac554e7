//! Error types for model construction and training.
//!
//! Queries never fail: unknown contexts and empty input degrade to the
//! global unigram ranking. Only problems with the mandatory base corpus or
//! an invalid model order surface as errors, and those are fatal at startup.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The model order must leave at least one word of context.
    #[error("model order must be >= 2, got {0}")]
    InvalidOrder(usize),

    /// The base corpus produced no usable tokens.
    #[error("base corpus contains no usable words")]
    EmptyCorpus,

    /// A configured base corpus file could not be read.
    #[error("failed to read base corpus {}: {source}", path.display())]
    Corpus {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
