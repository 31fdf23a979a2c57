//! Rhyme grouping over line-final words.
//!
//! The predicate is an orthographic heuristic layered from four rules:
//! equality, shared 4-char suffix, vowel-skeleton match, and a fixed list of
//! common English suffixes. It is committed behavior, not a phonology model.

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

const COMMON_SUFFIXES: &[&str] = &[
    "ing", "tion", "sion", "ness", "ment", "ly", "ed", "er", "est", "ight", "ite", "ate", "ake",
    "oke", "eak", "ook", "ank", "ink",
];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Rhyme-group labels for a sequence of lines, plus their concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhymeScheme {
    pub labels: Vec<String>,
    pub scheme: String,
}

/// The rhyme key of a line: its last word token, lowercased, letters only.
/// Empty when the line has no word tokens.
pub fn rhyme_key(line: &str) -> String {
    crate::token::word_tokens(line)
        .last()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphabetic())
                .flat_map(|c| c.to_lowercase())
                .collect()
        })
        .unwrap_or_default()
}

/// Whether two letter-only lowercase words rhyme.
pub fn rhymes(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    let ac: Vec<char> = a.chars().collect();
    let bc: Vec<char> = b.chars().collect();

    if ac.len() >= 2 && bc.len() >= 2 {
        let n = 4.min(ac.len().min(bc.len()));
        if ac[ac.len() - n..] == bc[bc.len() - n..] {
            return true;
        }
    }

    if vowel_skeleton_match(&ac, &bc) {
        return true;
    }

    common_suffix_match(a, b)
}

/// Last two vowel characters equal, and the consonant tails after the final
/// vowel run equal. Requires at least two vowel characters on both sides.
fn vowel_skeleton_match(a: &[char], b: &[char]) -> bool {
    let va: Vec<char> = a.iter().copied().filter(|&c| is_vowel(c)).collect();
    let vb: Vec<char> = b.iter().copied().filter(|&c| is_vowel(c)).collect();
    if va.len() < 2 || vb.len() < 2 {
        return false;
    }
    if va[va.len() - 2..] != vb[vb.len() - 2..] {
        return false;
    }
    trailing_consonants(a) == trailing_consonants(b)
}

fn trailing_consonants(word: &[char]) -> &[char] {
    match word.iter().rposition(|&c| is_vowel(c)) {
        Some(i) => &word[i + 1..],
        None => word,
    }
}

/// Both words end in the same fixed suffix with an equal character right
/// before it. Words no longer than the suffix itself never match here.
fn common_suffix_match(a: &str, b: &str) -> bool {
    for suffix in COMMON_SUFFIXES {
        if let (Some(ra), Some(rb)) = (a.strip_suffix(suffix), b.strip_suffix(suffix)) {
            if let (Some(ca), Some(cb)) = (ra.chars().last(), rb.chars().last()) {
                if ca == cb {
                    return true;
                }
            }
        }
    }
    false
}

/// The nth label in dense first-appearance order: A..Z, AA, AB, ...
pub fn label_for(mut n: usize) -> String {
    let mut out: Vec<char> = Vec::new();
    loop {
        out.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    out.iter().rev().collect()
}

/// Assign a rhyme-group label to every line.
///
/// Left to right: each line reuses the label of the lowest-index earlier
/// line whose key rhymes with its own, otherwise mints the next fresh
/// label. Lines with an empty key (no word tokens) always mint.
pub fn analyze<S: AsRef<str>>(lines: &[S]) -> RhymeScheme {
    let keys: Vec<String> = lines.iter().map(|l| rhyme_key(l.as_ref())).collect();
    let mut labels: Vec<String> = Vec::with_capacity(keys.len());
    let mut minted = 0usize;

    for i in 0..keys.len() {
        let reused = if keys[i].is_empty() {
            None
        } else {
            (0..i)
                .find(|&j| !keys[j].is_empty() && rhymes(&keys[i], &keys[j]))
                .map(|j| labels[j].clone())
        };
        labels.push(reused.unwrap_or_else(|| {
            let label = label_for(minted);
            minted += 1;
            label
        }));
    }

    let scheme = labels.concat();
    RhymeScheme { labels, scheme }
}

/// The label at `index`.
pub fn group_of(index: usize, labels: &[String]) -> &str {
    &labels[index]
}

/// All other indices sharing `labels[index]`.
pub fn peers_of(index: usize, labels: &[String]) -> Vec<usize> {
    labels
        .iter()
        .enumerate()
        .filter(|&(i, label)| i != index && *label == labels[index])
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_last_word_lowercased() {
        assert_eq!(rhyme_key("Twinkle little STAR!"), "star");
        assert_eq!(rhyme_key("  --- "), "");
        assert_eq!(rhyme_key(""), "");
    }

    #[test]
    fn equal_words_rhyme() {
        assert!(rhymes("star", "star"));
    }

    #[test]
    fn shared_four_char_suffix_rhymes() {
        assert!(rhymes("night", "light"));
        assert!(rhymes("mission", "passion"));
        assert!(!rhymes("night", "note"));
    }

    #[test]
    fn vowel_skeleton_rhymes() {
        // Same last two vowel characters, same consonant tail.
        assert!(rhymes("day", "way"));
        assert!(rhymes("rain", "main"));
        assert!(!rhymes("day", "dog"));
    }

    #[test]
    fn common_suffix_needs_matching_preceding_char() {
        assert!(rhymes("making", "taking"));
        assert!(!rhymes("making", "going"));
    }

    #[test]
    fn rhymes_is_symmetric() {
        let pairs = [
            ("night", "light"),
            ("day", "way"),
            ("making", "taking"),
            ("star", "dog"),
        ];
        for (a, b) in pairs {
            assert_eq!(rhymes(a, b), rhymes(b, a), "{} / {}", a, b);
        }
    }

    #[test]
    fn abab_scheme() {
        let lines = [
            "The moon came out at night",
            "We sang the whole long day",
            "The stars were burning light",
            "And slowly slipped away",
        ];
        let result = analyze(&lines);
        assert_eq!(result.labels[0], result.labels[2]);
        assert_eq!(result.labels[1], result.labels[3]);
        assert_ne!(result.labels[0], result.labels[1]);
        assert_eq!(result.scheme, "ABAB");
    }

    #[test]
    fn wordless_lines_mint_unique_groups() {
        let lines = ["---", "...", "---"];
        let result = analyze(&lines);
        assert_eq!(result.scheme, "ABC");
    }

    #[test]
    fn empty_input_gives_empty_scheme() {
        let result = analyze::<&str>(&[]);
        assert!(result.labels.is_empty());
        assert_eq!(result.scheme, "");
    }

    #[test]
    fn labels_extend_past_z() {
        assert_eq!(label_for(0), "A");
        assert_eq!(label_for(25), "Z");
        assert_eq!(label_for(26), "AA");
        assert_eq!(label_for(27), "AB");
        assert_eq!(label_for(51), "AZ");
        assert_eq!(label_for(52), "BA");
    }

    #[test]
    fn peers_share_a_label() {
        let lines = ["night", "day", "light", "way"];
        let result = analyze(&lines);
        assert_eq!(peers_of(0, &result.labels), vec![2]);
        assert_eq!(peers_of(3, &result.labels), vec![1]);
        assert_eq!(group_of(1, &result.labels), group_of(3, &result.labels));
    }
}
