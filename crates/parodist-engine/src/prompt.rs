//! Deterministic prompt construction.
//!
//! Prompt text is part of the observable contract: given the same inputs,
//! every builder returns byte-identical text, keyword maps serialize in
//! insertion order, and optional sections appear only when they have
//! content. Tests snapshot the output.

use parodist_core::KeywordMap;
use parodist_prosody::token::{first_letter_uppercase, word_tokens};

/// The per-line facts every prompt shape draws from.
#[derive(Debug, Clone, Copy)]
pub struct LineBrief<'a> {
    pub original: &'a str,
    pub total_syllables: usize,
    /// Annotated word pattern, e.g. `hello(2) world(1)`.
    pub annotated_pattern: &'a str,
    /// Compact count pattern, e.g. `2-1`.
    pub dash_pattern: &'a str,
    pub rhyme_label: &'a str,
    pub scheme: &'a str,
}

/// First-shot generation prompt for one line.
pub fn initial(
    brief: &LineBrief,
    keywords: &KeywordMap,
    previous: &[&str],
    peers: &[&str],
) -> String {
    let mut p = String::new();
    p.push_str("You are writing a themed parody of a song, one line at a time.\n\n");

    if !keywords.is_empty() {
        p.push_str("Theme vocabulary:\n");
        for (keyword, definition) in keywords.iter() {
            p.push_str(&format!("- {}: {}\n", keyword, definition));
        }
        p.push('\n');
    }

    p.push_str(&format!("Original line: \"{}\"\n", brief.original));
    p.push_str(&format!(
        "Syllable target: {} syllables in total.\n",
        brief.total_syllables
    ));
    p.push_str(&format!("Word pattern: {}\n", brief.annotated_pattern));

    if !previous.is_empty() {
        p.push('\n');
        p.push_str("Previous parody lines:\n");
        for (i, line) in previous.iter().enumerate() {
            p.push_str(&format!("{}. {}\n", i + 1, line));
        }
    }

    p.push('\n');
    p.push_str(&format!(
        "Rhyme: this line is group {} in the scheme {}.\n",
        brief.rhyme_label, brief.scheme
    ));
    if !peers.is_empty() {
        p.push_str("It must rhyme with:\n");
        for line in peers {
            p.push_str(&format!("- {}\n", line));
        }
    }

    p.push('\n');
    p.push_str("Rules:\n");
    p.push_str("- Write exactly one replacement line on the theme.\n");
    p.push_str("- Match the word pattern: same number of words, same syllables per word.\n");
    p.push_str("- Output ONLY the line, nothing else.\n");
    p
}

/// Refinement prompt: force the per-word syllable counts back onto the
/// required pattern.
pub fn word_pattern(brief: &LineBrief, candidate: &str, actual_pattern: &str) -> String {
    format!(
        "Rewrite this parody line so its per-word syllable counts are exactly {required}.\n\
         \n\
         Line: \"{candidate}\"\n\
         Current pattern: {actual}\n\
         Required pattern: {required}\n\
         Original line: \"{original}\"\n\
         \n\
         Rules:\n\
         - Use the same number of words as the required pattern.\n\
         - Keep the theme and the rhyme of the line.\n\
         - Output ONLY the rewritten line, nothing else.\n",
        required = brief.dash_pattern,
        candidate = candidate,
        actual = actual_pattern,
        original = brief.original,
    )
}

/// Refinement prompt: keep the pattern, improve flow from the previous
/// accepted lines.
pub fn semantic(brief: &LineBrief, candidate: &str, previous: &[&str]) -> String {
    let mut p = String::from("These parody lines are already written:\n");
    for (i, line) in previous.iter().enumerate() {
        p.push_str(&format!("{}. {}\n", i + 1, line));
    }
    p.push('\n');
    p.push_str("Rewrite this line so it follows on from them and advances the theme.\n\n");
    p.push_str(&format!("Line: \"{}\"\n\n", candidate));
    p.push_str("Rules:\n");
    p.push_str(&format!(
        "- Keep the per-word syllable pattern exactly {}.\n",
        brief.dash_pattern
    ));
    p.push_str("- Output ONLY the rewritten line, nothing else.\n");
    p
}

/// Refinement prompt: copy the original's punctuation and capitalization.
pub fn punctuation(brief: &LineBrief, candidate: &str) -> String {
    format!(
        "Rewrite this line to carry the original's punctuation and capitalization.\n\
         \n\
         Line: \"{candidate}\"\n\
         Original line: \"{original}\"\n\
         Original punctuation marks: {punct}\n\
         Original capitalization pattern: {caps} (X = capitalized word, x = lowercase word)\n\
         \n\
         Rules:\n\
         - Keep the words and their syllable counts.\n\
         - Output ONLY the rewritten line, nothing else.\n",
        candidate = candidate,
        original = brief.original,
        punct = punctuation_summary(brief.original),
        caps = capitalization_pattern(brief.original),
    )
}

/// Prompt asking for `count` lines of `keyword: definition`.
pub fn keyword_list(subjects: &[String], count: usize) -> String {
    let mut p = format!(
        "List exactly {} keywords for these subjects: {}.\n\n",
        count,
        subjects.join(", ")
    );
    p.push_str("Rules:\n");
    p.push_str("- One entry per line, in the form keyword: definition.\n");
    p.push_str("- Each keyword is one to three words.\n");
    p.push_str("- Each definition is one short sentence.\n");
    p.push_str("- Output ONLY the list, nothing else.\n");
    p
}

/// The punctuation characters of a line, in order of appearance, or
/// `none`. A punctuation character is anything that is neither
/// alphanumeric nor whitespace.
pub fn punctuation_summary(line: &str) -> String {
    let marks: Vec<String> = line
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .map(|c| c.to_string())
        .collect();
    if marks.is_empty() {
        "none".to_string()
    } else {
        marks.join(" ")
    }
}

/// One letter per word token: `X` when its first letter is uppercase,
/// `x` otherwise.
pub fn capitalization_pattern(line: &str) -> String {
    word_tokens(line)
        .iter()
        .map(|w| if first_letter_uppercase(w) { 'X' } else { 'x' })
        .collect()
}
