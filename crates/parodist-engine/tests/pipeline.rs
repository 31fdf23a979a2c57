//! End-to-end runs of the generation pipeline against in-memory completers.

use parodist_core::{CompleterError, EngineConfig, KeywordMap, TextCompleter};
use parodist_engine::{generate_keywords, ParodyEngine};
use parodist_prosody::{count_line, is_blank};

/// Answers every prompt with the line the prompt itself asks about:
/// refinement prompts echo the current candidate, the initial prompt echoes
/// the original line. Turns the whole pipeline into an identity transform.
struct EchoCompleter;

fn extract(prompt: &str, marker: &str) -> Option<String> {
    let start = prompt.find(marker)? + marker.len();
    let rest = &prompt[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

impl TextCompleter for EchoCompleter {
    fn verify(&self) -> Result<(), CompleterError> {
        Ok(())
    }

    fn complete(&self, prompt: &str) -> Result<String, CompleterError> {
        let line = extract(prompt, "\nLine: \"")
            .or_else(|| extract(prompt, "Original line: \""))
            .unwrap_or_default();
        Ok(line)
    }

    fn name(&self) -> &str {
        "echo"
    }
}

struct ListCompleter {
    list: String,
}

impl TextCompleter for ListCompleter {
    fn verify(&self) -> Result<(), CompleterError> {
        Ok(())
    }

    fn complete(&self, _prompt: &str) -> Result<String, CompleterError> {
        Ok(self.list.clone())
    }

    fn name(&self) -> &str {
        "list"
    }
}

fn verse() -> Vec<String> {
    [
        "Twinkle, twinkle, little star,",
        "How I wonder what you are!",
        "",
        "Up above the world so high,",
        "Like a diamond in the sky.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn keywords() -> KeywordMap {
    KeywordMap::parse("espresso: a small strong coffee\nroast: how dark the beans are cooked")
}

#[test]
fn echo_pipeline_reproduces_the_verse() {
    let engine = ParodyEngine::new(EngineConfig::default());
    let input = verse();
    let output = engine
        .generate(&input, &keywords(), &EchoCompleter, None, None)
        .unwrap();

    // Echoed candidates styled after their own originals come back intact.
    assert_eq!(output, input);
}

#[test]
fn output_shape_matches_input_shape() {
    let engine = ParodyEngine::new(EngineConfig::default());
    let input = verse();
    let output = engine
        .generate(&input, &keywords(), &EchoCompleter, None, None)
        .unwrap();

    assert_eq!(output.len(), input.len());
    for (original, generated) in input.iter().zip(&output) {
        assert_eq!(is_blank(original), generated.is_empty());
        if !is_blank(original) {
            let drift = count_line(original) as i64 - count_line(generated) as i64;
            assert!(drift.abs() <= 2, "line drifted: {:?}", generated);
        }
    }
}

#[test]
fn echo_runs_are_deterministic() {
    let engine = ParodyEngine::new(EngineConfig::default());
    let input = verse();
    let a = engine
        .generate(&input, &keywords(), &EchoCompleter, None, None)
        .unwrap();
    let b = engine
        .generate(&input, &keywords(), &EchoCompleter, None, None)
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn keyword_generation_round_trips_through_parsing() {
    let completer = ListCompleter {
        list: "crema: the foam on top of espresso\nbeans: seeds that become coffee\n".to_string(),
    };
    let map = generate_keywords(&["coffee".to_string()], 2, &completer).unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("crema"), Some("the foam on top of espresso"));
    assert_eq!(map.get("beans"), Some("seeds that become coffee"));
}
