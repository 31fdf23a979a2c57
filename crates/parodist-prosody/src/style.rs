//! Style transfer: re-dress a generated line in the original's clothes.
//!
//! The generated text supplies the words; the original supplies everything
//! else — leading whitespace, per-word capitalization, the exact separators
//! between words, and the trailing punctuation.

use crate::token::{first_letter_uppercase, set_first_letter_case, split_line, word_tokens};

/// Copy the original line's positional capitalization and separators onto
/// the generated line's word tokens.
///
/// For the first `min(k, m)` positions the generated word takes the
/// original word's first-letter case and is followed by the original's
/// separator. Surplus generated words are appended after the original's
/// trailing suffix, each preceded by a single space. When the generated
/// line is shorter, output stops at its last word plus the original's
/// separator at that position.
pub fn transfer(original: &str, generated: &str) -> String {
    let parts = split_line(original);
    let generated_words = word_tokens(generated);

    let k = parts.words.len();
    let m = generated_words.len();
    let p = k.min(m);

    let mut out = String::with_capacity(original.len() + generated.len());
    out.push_str(&parts.leading);
    for i in 0..p {
        let upper = first_letter_uppercase(&parts.words[i]);
        out.push_str(&set_first_letter_case(&generated_words[i], upper));
        out.push_str(&parts.separators[i]);
    }
    for extra in &generated_words[p..] {
        out.push(' ');
        out.push_str(extra);
    }
    out
}
