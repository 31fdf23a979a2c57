//! Keyword generation: one completer call, parsed into a `KeywordMap`.

use parodist_core::{EngineError, KeywordMap, TextCompleter};

use crate::prompt;

/// Ask the completer for `count` thematic `keyword: definition` pairs about
/// `subjects`. Subjects are trimmed and empties dropped; `count` is clamped
/// to 1..=100. An unparseable response (empty map) is an error.
pub fn generate_keywords(
    subjects: &[String],
    count: usize,
    completer: &dyn TextCompleter,
) -> Result<KeywordMap, EngineError> {
    let subjects: Vec<String> = subjects
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    let count = count.clamp(1, 100);

    let text = prompt::keyword_list(&subjects, count);
    tracing::debug!(subjects = subjects.len(), count, "requesting keyword list");
    let raw = completer
        .complete(&text)
        .map_err(EngineError::KeywordGenerationFailed)?;

    let map = KeywordMap::parse(&raw);
    if map.is_empty() {
        return Err(EngineError::KeywordParseEmpty);
    }
    tracing::debug!(parsed = map.len(), "keyword list parsed");
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{BrokenCompleter, FixedCompleter};

    fn subjects(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_well_formed_response() {
        let completer = FixedCompleter::new(
            "espresso: a small strong coffee\nroast: how dark the beans are cooked",
        );
        let map = generate_keywords(&subjects(&["coffee"]), 2, &completer).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("espresso"), Some("a small strong coffee"));
    }

    #[test]
    fn unparseable_response_is_an_error() {
        let completer = FixedCompleter::new("I would rather not make a list today.");
        let result = generate_keywords(&subjects(&["coffee"]), 5, &completer);
        assert!(matches!(result, Err(EngineError::KeywordParseEmpty)));
    }

    #[test]
    fn completer_failure_surfaces() {
        let result = generate_keywords(&subjects(&["coffee"]), 5, &BrokenCompleter);
        assert!(matches!(
            result,
            Err(EngineError::KeywordGenerationFailed(_))
        ));
    }

    #[test]
    fn subjects_are_trimmed_and_count_clamped() {
        let completer = FixedCompleter::new("beans: seeds that become coffee");
        let map =
            generate_keywords(&subjects(&["  coffee  ", "", "mornings"]), 500, &completer).unwrap();
        assert_eq!(map.len(), 1);
    }
}
