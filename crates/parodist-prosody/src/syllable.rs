//! Orthographic syllable estimation.
//!
//! This is a spelling heuristic, not phonetics: count maximal vowel runs,
//! discount a silent final `e`, credit a final consonant-`le`. The rule is
//! frozen; generation targets and refinement validation both count with it,
//! so they always agree.

use crate::token::word_tokens;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Per-word syllable counts for one line, in token order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSyllables {
    pub words: Vec<(String, usize)>,
}

impl WordSyllables {
    pub fn total(&self) -> usize {
        self.words.iter().map(|(_, n)| n).sum()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.words.iter().map(|(_, n)| *n).collect()
    }

    /// Annotated form used in prompts: `hello(2) world(1)`.
    pub fn annotated(&self) -> String {
        self.words
            .iter()
            .map(|(w, n)| format!("{}({})", w, n))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Compact count pattern used in prompts: `2-1`.
    pub fn dash_pattern(&self) -> String {
        self.words
            .iter()
            .map(|(_, n)| n.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// Estimate the syllable count of a single word.
///
/// Lowercases and keeps Unicode letters only, then:
/// 1. count maximal runs of `{a,e,i,o,u,y}`;
/// 2. a final `e` with more than one run is silent (subtract 1);
/// 3. a final consonant-`le` with more than one run adds a syllable back;
/// 4. clamp to at least 1.
///
/// Empty input (no letters) returns 0.
pub fn count_word(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(|c| c.to_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }

    let mut runs = 0usize;
    let mut in_run = false;
    for &c in &letters {
        let v = is_vowel(c);
        if v && !in_run {
            runs += 1;
        }
        in_run = v;
    }

    let n = letters.len();
    let mut count = runs as isize;
    if letters[n - 1] == 'e' && runs > 1 {
        count -= 1;
    }
    if n >= 3 && letters[n - 2] == 'l' && letters[n - 1] == 'e' && runs > 1 && !is_vowel(letters[n - 3])
    {
        count += 1;
    }
    count.max(1) as usize
}

/// Total syllable count of a line, summed over its word tokens.
pub fn count_line(line: &str) -> usize {
    word_tokens(line).iter().map(|w| count_word(w)).sum()
}

/// Per-word `(token, count)` pairs for a line.
pub fn analyze_line(line: &str) -> WordSyllables {
    WordSyllables {
        words: word_tokens(line)
            .into_iter()
            .map(|w| {
                let n = count_word(&w);
                (w, n)
            })
            .collect(),
    }
}
