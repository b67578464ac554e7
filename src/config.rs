use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::ngram::DEFAULT_ORDER;

const APP_NAME: &str = "smartkey";
const CONFIG_NAME: &str = "config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// N-gram order: `order - 1` words of context predict the next one.
    pub order: usize,
    pub max_predictions: usize,
    pub max_suggestions: usize,
    pub max_autocorrect_alternatives: usize,
    pub max_edit_distance: usize,
    /// Extra training text, added on top of the base corpus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus_path: Option<PathBuf>,
    /// Replaces the bundled reference corpus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_corpus_path: Option<PathBuf>,
    /// Transitions seen fewer times than this are pruned after training.
    pub prune_min_count: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            max_predictions: 5,
            max_suggestions: 5,
            max_autocorrect_alternatives: 2,
            max_edit_distance: 2,
            corpus_path: None,
            base_corpus_path: None,
            prune_min_count: 1,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        match confy::load(APP_NAME, Some(CONFIG_NAME)) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, Some(CONFIG_NAME), self)
    }

    /// The supplementary corpus to train on.
    ///
    /// An explicit `corpus_path` always wins, even if the file is missing.
    /// Otherwise `<data dir>/smartkey/corpus.txt` is used when it exists.
    pub fn supplementary_corpus(&self) -> Option<PathBuf> {
        if let Some(path) = &self.corpus_path {
            return Some(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_NAME).join("corpus.txt"))
            .filter(|path| path.is_file())
    }
}
