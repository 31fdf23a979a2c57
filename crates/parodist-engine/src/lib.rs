//! The parody generation engine: deterministic prompt construction, the
//! per-line generate/refine/validate loop, and keyword generation.
//!
//! All LLM access goes through the `TextCompleter` capability from
//! `parodist-core`; everything in this crate besides the completer calls is
//! synchronous, pure string work.

pub mod engine;
pub mod keywords;
pub mod prompt;

pub use engine::ParodyEngine;
pub use keywords::generate_keywords;
