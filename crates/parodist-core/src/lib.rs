use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ─── Configuration ───────────────────────────────────────────────

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Number of refinement rounds after the word-pattern pass.
    /// Pass 1 is semantic coherence (when context exists); the remaining
    /// `refinement_passes - 1` are punctuation/capitalization passes.
    #[serde(default = "default_refinement_passes")]
    pub refinement_passes: usize,
    /// How many accepted parody lines to feed back as context.
    #[serde(default = "default_context_lines")]
    pub context_lines: usize,
    /// Maximum total-syllable drift a refinement result may have before
    /// it is rejected and the prior candidate stands.
    #[serde(default = "default_syllable_tolerance")]
    pub syllable_tolerance: u32,
}

fn default_refinement_passes() -> usize {
    2
}
fn default_context_lines() -> usize {
    8
}
fn default_syllable_tolerance() -> u32 {
    2
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            refinement_passes: 2,
            context_lines: 8,
            syllable_tolerance: 2,
        }
    }
}

// ─── Keyword Map ─────────────────────────────────────────────────

/// Thematic vocabulary: keyword → one-sentence definition.
///
/// Keys are unique; a later insert of the same key replaces the definition
/// but keeps the original position, so iteration order is stable insertion
/// order. Prompts rely on that stability for deterministic text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl KeywordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Later occurrences win on duplicate keys.
    pub fn insert(&mut self, keyword: &str, definition: &str) {
        if let Some(&i) = self.index.get(keyword) {
            self.entries[i].1 = definition.to_string();
        } else {
            self.index
                .insert(keyword.to_string(), self.entries.len());
            self.entries
                .push((keyword.to_string(), definition.to_string()));
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.index
            .get(keyword)
            .map(|&i| self.entries[i].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse `keyword: definition` lines.
    ///
    /// One pair per line, split at the first `:`. Both sides are trimmed and
    /// stripped of a wrapping `"` or `'` pair. Lines without a `:`, empty
    /// keys, and empty definitions are discarded. Blank lines are ignored.
    /// On duplicate keys the later occurrence wins.
    pub fn parse(text: &str) -> KeywordMap {
        let mut map = KeywordMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = strip_wrapping_quotes(key.trim());
            let value = strip_wrapping_quotes(value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            map.insert(key, value);
        }
        map
    }
}

/// Remove one matching pair of `"` or `'` wrapping the whole string.
pub fn strip_wrapping_quotes(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

// ─── Completer Capability ────────────────────────────────────────

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum CompleterError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    #[error("model '{0}' is not installed on the backend")]
    ModelMissing(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("malformed backend response: {0}")]
    Malformed(String),
}

/// The narrow LLM capability the engine consumes.
///
/// Implementations own whatever connections or sessions they need; the
/// engine never touches I/O directly. The trait is object-safe and uses
/// `&self`, so backends needing mutation use interior mutability.
pub trait TextCompleter {
    /// Succeeds if the backend is usable. Called once before generation.
    fn verify(&self) -> Result<(), CompleterError>;

    /// Send one prompt, get the backend's raw text response.
    fn complete(&self, prompt: &str) -> Result<String, CompleterError>;

    /// Human-readable backend name (for logging).
    fn name(&self) -> &str;
}

// ─── Engine Error Taxonomy ───────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The backend check failed before any generation. Inspect the backend
    /// (is the daemon running? is the model pulled?) and retry.
    #[error("completer backend check failed ({0}); start the backend or pick another model, then retry")]
    CompleterUnavailable(#[source] CompleterError),

    /// Initial generation for a line failed. Refinements cannot recover a
    /// missing candidate, so this aborts the run. `line` is the index among
    /// the non-blank input lines.
    #[error("generation failed on line {line} ({source}); the backend dropped mid-run, retry the run")]
    CompleterFailed {
        line: usize,
        #[source]
        source: CompleterError,
    },

    /// Nothing to do: the input had no non-blank lines.
    #[error("input contains no non-blank lines; check the lyrics file")]
    EmptyInput,

    /// Cooperative cancellation was observed at a suspension point.
    #[error("cancelled after {completed} of {total} lines")]
    Cancelled { completed: usize, total: usize },

    /// The completer call behind keyword generation failed outright.
    #[error("keyword generation failed ({0}); check the backend and retry")]
    KeywordGenerationFailed(#[source] CompleterError),

    /// Keyword generation parsed to an empty map. Usually a model that
    /// ignored the output format; retry or rephrase the subjects.
    #[error("keyword generation produced no usable `keyword: definition` pairs; retry or rephrase the subjects")]
    KeywordParseEmpty,
}

// ─── Cancellation ────────────────────────────────────────────────

/// Cooperative cancellation signal, checked by the engine between line
/// iterations and before each completer call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
