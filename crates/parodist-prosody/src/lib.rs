//! Pure prosodic analysis: tokenization, syllable counting, rhyme grouping,
//! and style transfer. Everything here is deterministic string work with no
//! I/O and no mutable state.

pub mod rhyme;
pub mod style;
pub mod syllable;
pub mod token;

pub use rhyme::{analyze as analyze_rhymes, rhymes, RhymeScheme};
pub use style::transfer;
pub use syllable::{analyze_line, count_line, count_word, WordSyllables};
pub use token::{is_blank, split_line, word_tokens, LineTokens};
