//! Word tokenization with exact separator preservation.
//!
//! A word token is a maximal run of Unicode letters. Everything else,
//! apostrophes and digits included, belongs to the separators, which are
//! kept verbatim so a split line reconstructs exactly.

/// A line split into its leading prefix, word tokens, and the separator
/// following each token. `separators.len() == words.len()`; the last
/// separator is the trailing suffix (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens {
    pub leading: String,
    pub words: Vec<String>,
    pub separators: Vec<String>,
}

impl LineTokens {
    /// Rebuild the exact original line.
    pub fn reconstruct(&self) -> String {
        let mut out = String::from(&self.leading);
        for (word, sep) in self.words.iter().zip(&self.separators) {
            out.push_str(word);
            out.push_str(sep);
        }
        out
    }
}

/// True iff the line contains only whitespace.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split a line into leading prefix, word tokens, and per-token separators.
pub fn split_line(line: &str) -> LineTokens {
    let mut leading = String::new();
    let mut words: Vec<String> = Vec::new();
    let mut separators: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut sep = String::new();

    for c in line.chars() {
        if c.is_alphabetic() {
            if word.is_empty() {
                // A new token begins: the run collected so far is either the
                // line's leading prefix or the previous token's separator.
                if words.is_empty() {
                    leading = std::mem::take(&mut sep);
                } else {
                    separators.push(std::mem::take(&mut sep));
                }
            }
            word.push(c);
        } else {
            if !word.is_empty() {
                words.push(std::mem::take(&mut word));
            }
            sep.push(c);
        }
    }

    if !word.is_empty() {
        words.push(word);
        separators.push(String::new());
    } else if !words.is_empty() {
        separators.push(sep);
    } else {
        leading = sep;
    }

    LineTokens {
        leading,
        words,
        separators,
    }
}

/// Just the word tokens of a line, in order.
pub fn word_tokens(line: &str) -> Vec<String> {
    split_line(line).words
}

/// Whether a token's first letter is uppercase. False for tokens with no
/// letters at all.
pub fn first_letter_uppercase(token: &str) -> bool {
    token
        .chars()
        .find(|c| c.is_alphabetic())
        .map(|c| c.is_uppercase())
        .unwrap_or(false)
}

/// Force the first letter of `word` to upper or lower case, leaving the
/// rest untouched.
pub fn set_first_letter_case(word: &str, upper: bool) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let first: String = if upper {
                c.to_uppercase().collect()
            } else {
                c.to_lowercase().collect()
            };
            first + chars.as_str()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_separators() {
        let t = split_line("Hello, world!");
        assert_eq!(t.leading, "");
        assert_eq!(t.words, vec!["Hello", "world"]);
        assert_eq!(t.separators, vec![", ", "!"]);
    }

    #[test]
    fn apostrophes_and_digits_are_separators() {
        let t = split_line("don't stop 99 times");
        assert_eq!(t.words, vec!["don", "t", "stop", "times"]);
        assert_eq!(t.separators, vec!["'", " ", " 99 ", ""]);
    }

    #[test]
    fn leading_whitespace_is_kept() {
        let t = split_line("  oh yes");
        assert_eq!(t.leading, "  ");
        assert_eq!(t.words, vec!["oh", "yes"]);
    }

    #[test]
    fn line_without_words_goes_to_leading() {
        let t = split_line("--- 123 ---");
        assert_eq!(t.leading, "--- 123 ---");
        assert!(t.words.is_empty());
        assert!(t.separators.is_empty());
    }

    #[test]
    fn reconstruction_round_trips() {
        let lines = [
            "Hello, world!",
            "  leading and trailing  ",
            "don't stop me now",
            "one",
            "",
            "¿Dónde está la línea?",
            "a--b..c!!",
            "--- 123 ---",
            "ends with word",
        ];
        for line in lines {
            assert_eq!(split_line(line).reconstruct(), line, "line: {:?}", line);
        }
    }

    #[test]
    fn first_letter_case_detection() {
        assert!(first_letter_uppercase("Hello"));
        assert!(!first_letter_uppercase("hello"));
        assert!(!first_letter_uppercase(""));
    }

    #[test]
    fn set_first_letter_case_handles_unicode() {
        assert_eq!(set_first_letter_case("goodbye", true), "Goodbye");
        assert_eq!(set_first_letter_case("Goodbye", false), "goodbye");
        assert_eq!(set_first_letter_case("école", true), "École");
        assert_eq!(set_first_letter_case("", true), "");
    }
}
