//! The per-line constrained generation loop.
//!
//! For every non-blank input line the engine asks the completer for a
//! candidate, runs a fixed schedule of refinement passes (each validated,
//! each allowed to fail without consequence), then dresses the survivor in
//! the original line's capitalization and punctuation before committing it.

use parodist_core::{CancelToken, EngineConfig, EngineError, KeywordMap, TextCompleter};
use parodist_prosody::{rhyme, style, syllable, token};

use crate::prompt;

/// One refinement pass over the current candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refinement {
    WordPattern,
    Semantic,
    Punctuation,
}

/// Precomputed constraints for one non-blank input line.
struct LinePlan {
    position: usize,
    syllables: syllable::WordSyllables,
    total: usize,
    annotated: String,
    dash: String,
}

/// State accumulated across the run: accepted output positionally aligned
/// to the input, plus the non-blank subset used for context and rhyme.
struct ParodyContext {
    accepted: Vec<String>,
    non_blank: Vec<String>,
}

pub struct ParodyEngine {
    config: EngineConfig,
}

impl ParodyEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Generate a parody of `lines`, one output line per input line.
    ///
    /// Blank input positions come back as empty strings without touching
    /// the completer; every other position comes back non-empty. The
    /// progress callback fires once per committed non-blank line with
    /// `(committed, total_non_blank)`. Cancellation is observed between
    /// line iterations and before every completer call.
    pub fn generate(
        &self,
        lines: &[String],
        keywords: &KeywordMap,
        completer: &dyn TextCompleter,
        cancel: Option<&CancelToken>,
        mut progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> Result<Vec<String>, EngineError> {
        completer
            .verify()
            .map_err(EngineError::CompleterUnavailable)?;

        let plans: Vec<LinePlan> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| !token::is_blank(line))
            .map(|(position, line)| {
                let syllables = syllable::analyze_line(line);
                LinePlan {
                    position,
                    total: syllables.total(),
                    annotated: syllables.annotated(),
                    dash: syllables.dash_pattern(),
                    syllables,
                }
            })
            .collect();
        if plans.is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let non_blank_total = plans.len();

        let originals: Vec<&str> = plans.iter().map(|p| lines[p.position].as_str()).collect();
        let scheme = rhyme::analyze(&originals);
        tracing::debug!(scheme = %scheme.scheme, lines = non_blank_total, "rhyme pre-pass done");

        let mut ctx = ParodyContext {
            accepted: Vec::with_capacity(lines.len()),
            non_blank: Vec::with_capacity(non_blank_total),
        };
        let mut j = 0usize;

        for (position, line) in lines.iter().enumerate() {
            check_cancel(cancel, j, non_blank_total)?;

            if token::is_blank(line) {
                ctx.accepted.push(String::new());
                continue;
            }

            let plan = &plans[j];
            debug_assert_eq!(plan.position, position);

            let context_start = ctx.non_blank.len().saturating_sub(self.config.context_lines);
            let previous: Vec<&str> = ctx.non_blank[context_start..]
                .iter()
                .map(String::as_str)
                .collect();
            let peers: Vec<&str> = rhyme::peers_of(j, &scheme.labels)
                .into_iter()
                .filter(|&p| p < j)
                .map(|p| ctx.non_blank[p].as_str())
                .collect();

            let brief = prompt::LineBrief {
                original: line,
                total_syllables: plan.total,
                annotated_pattern: &plan.annotated,
                dash_pattern: &plan.dash,
                rhyme_label: rhyme::group_of(j, &scheme.labels),
                scheme: &scheme.scheme,
            };

            check_cancel(cancel, j, non_blank_total)?;
            let initial = prompt::initial(&brief, keywords, &previous, &peers);
            let raw = completer
                .complete(&initial)
                .map_err(|source| EngineError::CompleterFailed { line: j, source })?;
            let mut candidate = sanitize(&raw);
            if token::word_tokens(&candidate).is_empty() {
                tracing::warn!(line = position, "wordless initial candidate, reusing the original line");
                candidate = line.clone();
            }

            for pass in self.refinement_schedule(j, previous.is_empty()) {
                check_cancel(cancel, j, non_blank_total)?;
                let text = match pass {
                    Refinement::WordPattern => {
                        let actual = syllable::analyze_line(&candidate).dash_pattern();
                        prompt::word_pattern(&brief, &candidate, &actual)
                    }
                    Refinement::Semantic => prompt::semantic(&brief, &candidate, &previous),
                    Refinement::Punctuation => prompt::punctuation(&brief, &candidate),
                };
                match completer.complete(&text) {
                    Ok(raw) => {
                        let proposed = sanitize(&raw);
                        if self.accepts(pass, &proposed, plan) {
                            candidate = proposed;
                        } else {
                            tracing::debug!(line = position, pass = ?pass, "refinement rejected, keeping candidate");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(line = position, pass = ?pass, error = %err, "refinement call failed, keeping candidate");
                    }
                }
            }

            if token::word_tokens(&candidate).is_empty() {
                candidate = line.clone();
            }
            let finished = style::transfer(line, &candidate);
            ctx.non_blank.push(finished.clone());
            ctx.accepted.push(finished);
            j += 1;
            if let Some(report) = progress.as_mut() {
                report(j, non_blank_total);
            }
        }

        Ok(ctx.accepted)
    }

    /// Pass order for one line: word-pattern first, semantic coherence when
    /// earlier lines exist, then the remaining punctuation rounds.
    fn refinement_schedule(&self, j: usize, no_context: bool) -> Vec<Refinement> {
        let mut passes = vec![Refinement::WordPattern];
        if j > 0 && !no_context {
            passes.push(Refinement::Semantic);
        }
        for _ in 1..self.config.refinement_passes {
            passes.push(Refinement::Punctuation);
        }
        passes
    }

    /// Whether a refinement's proposal may replace the candidate.
    fn accepts(&self, pass: Refinement, proposed: &str, plan: &LinePlan) -> bool {
        let analysis = syllable::analyze_line(proposed);
        if analysis.words.is_empty() {
            return false;
        }
        let drift = (analysis.total() as i64 - plan.total as i64).abs();
        if drift > self.config.syllable_tolerance as i64 {
            return false;
        }
        match pass {
            Refinement::WordPattern | Refinement::Semantic => {
                analysis.counts() == plan.syllables.counts()
            }
            Refinement::Punctuation => true,
        }
    }
}

fn check_cancel(
    cancel: Option<&CancelToken>,
    completed: usize,
    total: usize,
) -> Result<(), EngineError> {
    if cancel.map(CancelToken::is_cancelled).unwrap_or(false) {
        Err(EngineError::Cancelled { completed, total })
    } else {
        Ok(())
    }
}

/// Clean a raw completer response into a single candidate line.
///
/// Takes the first non-empty response line, trims it, strips one wrapping
/// `"` pair, and strips one wrapping `'` pair only when no other `'`
/// appears inside (contractions keep their quotes).
pub fn sanitize(raw: &str) -> String {
    let mut s = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s = &s[1..s.len() - 1];
    }
    if s.len() >= 2
        && s.starts_with('\'')
        && s.ends_with('\'')
        && !s[1..s.len() - 1].contains('\'')
    {
        s = &s[1..s.len() - 1];
    }
    s.trim().to_string()
}
