//! smartkey - next-word prediction, word completion and autocorrect in the terminal.
//!
//! # Overview
//!
//! The application learns word statistics from a reference corpus at startup
//! and then offers keyboard-style suggestions for the text you type:
//! - Autocorrect for a misspelled word
//! - Completions for a partially typed word
//! - Predictions for the next word once the current one is finished
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  User Types     │ ← One line of text per prompt (main.rs)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Suggester      │ ← Picks autocorrect / completion / prediction (suggest.rs)
//! └───┬─────────┬───┘
//!     │         │
//!     ▼         ▼
//! ┌────────┐ ┌──────────────┐
//! │SymSpell│ │ NGramModel   │ ← Context-based language model (ngram.rs)
//! └────────┘ └──────┬───────┘
//!                   │
//!                   ▼
//! ┌─────────────────┐
//! │  Corpus         │ ← Bundled reference text + optional extra file (corpus.rs)
//! └─────────────────┘
//! ```
//!
//! # Modules
//!
//! - `main.rs`: Entry point, CLI, logging and the interactive session
//! - `config.rs`: Persisted settings (`config.toml`)
//! - `corpus.rs`: Corpus loading and tokenization
//! - `counter.rs`: Insertion-ordered frequency counter
//! - `ngram.rs`: The n-gram language model
//! - `symspell.rs`: Fast spelling candidates using the SymSpell algorithm
//! - `autocorrect.rs`: Single-word correction on top of SymSpell
//! - `suggest.rs`: Suggestion kinds, assembly and application
//!
//! # Model lifetime
//!
//! The model is trained once, before the first prompt, and never modified
//! afterwards. Everything downstream only holds shared references to it.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod autocorrect;
mod config;
mod corpus;
mod counter;
mod error;
mod ngram;
mod suggest;
mod symspell;

use autocorrect::SpellChecker;
use config::Config;
use corpus::Corpus;
use ngram::NGramModel;
use suggest::{SuggestLimits, Suggester, Suggestion};

#[derive(Parser, Debug)]
#[command(name = "smartkey")]
#[command(about = "Next-word prediction, word completion and autocorrect")]
#[command(version)]
struct Args {
    /// N-gram order (3 = two words of context)
    #[arg(short = 'n', long)]
    order: Option<usize>,

    /// Supplementary corpus file added to the training text
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    /// Base corpus file replacing the bundled reference text
    #[arg(long)]
    base_corpus: Option<PathBuf>,

    /// Maximum number of completions
    #[arg(long)]
    max_suggestions: Option<usize>,

    /// Maximum number of next-word predictions
    #[arg(long)]
    max_predictions: Option<usize>,

    /// Prune transitions seen fewer times than this
    #[arg(long)]
    prune_min_count: Option<u64>,

    /// Print suggestions for TEXT and exit
    #[arg(short, long)]
    text: Option<String>,
}

impl Args {
    /// Command-line flags override the persisted config for this run only.
    fn apply_to(&self, config: &mut Config) {
        if let Some(order) = self.order {
            config.order = order;
        }
        if let Some(path) = &self.corpus {
            config.corpus_path = Some(path.clone());
        }
        if let Some(path) = &self.base_corpus {
            config.base_corpus_path = Some(path.clone());
        }
        if let Some(max) = self.max_suggestions {
            config.max_suggestions = max;
        }
        if let Some(max) = self.max_predictions {
            config.max_predictions = max;
        }
        if let Some(min_count) = self.prune_min_count {
            config.prune_min_count = min_count;
        }
    }
}

const HELP: &str = "\
Type text and press Enter to see suggestions.
  :N      apply suggestion number N
  :clear  start over with empty text
  :help   show this help
  :quit   exit";

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Text(&'a str),
    Apply(usize),
    Clear,
    Help,
    Quit,
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            ":q" | ":quit" => Command::Quit,
            ":clear" => Command::Clear,
            ":help" | ":h" => Command::Help,
            command => match command.strip_prefix(':').map(str::parse::<usize>) {
                Some(Ok(index)) => Command::Apply(index),
                Some(Err(_)) => Command::Help,
                None => Command::Text(line),
            },
        }
    }
}

/// Application entry point.
///
/// # Initialization Sequence
/// 1. Initialize logging (stderr, `RUST_LOG` overrides the `info` default)
/// 2. Load the config and apply command-line overrides
/// 3. Train the language model and build the spell checker
/// 4. Answer a single `--text` query, or run the interactive session
///
/// # Errors
/// Returns an error if the base corpus cannot be read or yields no words,
/// or if the configured order is invalid.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = Config::load();

    // Persist defaults so users get a concrete config.toml on first run.
    if let Err(err) = config.save() {
        warn!(error = %err, "failed to persist config defaults");
    }

    args.apply_to(&mut config);

    let model = build_model(&config)?;
    let spell_checker = SpellChecker::from_model(&model, config.max_edit_distance);
    let suggester = Suggester::new(&model, &spell_checker, SuggestLimits::from(&config));

    let stdout = io::stdout();
    if let Some(text) = &args.text {
        render(&mut stdout.lock(), text, &suggester.suggest(text))?;
        return Ok(());
    }

    info!(order = model.order(), "ready");
    run_session(&suggester, io::stdin().lock(), stdout.lock())?;
    Ok(())
}

/// Train the model described by `config`.
///
/// The returned model is complete; callers only ever borrow it immutably.
fn build_model(config: &Config) -> Result<NGramModel> {
    let base = match &config.base_corpus_path {
        Some(path) => Corpus::from_path(path)?,
        None => Corpus::bundled(),
    };

    let mut model = NGramModel::new(config.order)?;
    let supplementary = config.supplementary_corpus();
    model
        .train(&base, supplementary.as_deref())
        .context("failed to train language model")?;
    model.prune(config.prune_min_count);

    Ok(model)
}

/// Interactive loop: every line replaces the current text, `:N` applies a suggestion.
fn run_session<R: BufRead, W: Write>(suggester: &Suggester<'_>, input: R, mut out: W) -> io::Result<()> {
    let mut text = String::new();
    let mut suggestions: Vec<Suggestion> = Vec::new();

    writeln!(out, "{HELP}")?;
    prompt(&mut out)?;

    for line in input.lines() {
        let line = line?;
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Clear => {
                text.clear();
                suggestions.clear();
            }
            Command::Apply(number) => {
                match number.checked_sub(1).and_then(|index| suggestions.get(index)) {
                    Some(chosen) => {
                        text = suggest::apply(chosen.kind, &chosen.word, &text);
                        suggestions = suggester.suggest(&text);
                        writeln!(out, "text: {text}")?;
                        render(&mut out, &text, &suggestions)?;
                    }
                    None => writeln!(out, "no suggestion #{number}")?,
                }
            }
            Command::Text(typed) => {
                text = typed.to_owned();
                suggestions = suggester.suggest(&text);
                render(&mut out, &text, &suggestions)?;
            }
        }
        prompt(&mut out)?;
    }

    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

fn render<W: Write>(out: &mut W, text: &str, suggestions: &[Suggestion]) -> io::Result<()> {
    if suggestions.is_empty() {
        writeln!(out, "  (no suggestions)")?;
    }
    for (number, suggestion) in suggestions.iter().enumerate() {
        writeln!(out, "  {}. {}: {}", number + 1, suggestion.kind.label(), suggestion.word)?;
    }
    writeln!(
        out,
        "  words: {} | characters: {} | suggestions: {}",
        text.split_whitespace().count(),
        text.chars().count(),
        suggestions.len()
    )
}
