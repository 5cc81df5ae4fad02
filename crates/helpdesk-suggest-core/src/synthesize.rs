//! Suggestion synthesis.
//!
//! Turns ranked candidates into user-facing [`Suggestion`]s in two passes:
//!
//! - **Direct**: one suggestion per top candidate whose resolution is
//!   long enough, with confidence `min(0.95, similarity + 0.10)`.
//! - **Combined**: the resolutions of the top three candidates merged by
//!   [`combine_solutions`], with confidence `min(0.90, top + 0.05)`.
//!
//! Both sets are merged, short texts dropped, sorted by confidence,
//! de-duplicated on text, and truncated.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::keywords::extract_keywords;
use crate::models::{RankedCandidate, Suggestion, SuggestionKind};
use crate::similarity::score_similarity;
use crate::vocabulary::Vocabulary;

const DIRECT_BOOST: f64 = 0.10;
const DIRECT_CAP: f64 = 0.95;
const COMBINED_BOOST: f64 = 0.05;
const COMBINED_CAP: f64 = 0.90;

/// Resolutions must be longer than this (trimmed) to be used at all.
const MIN_RESOLUTION_CHARS: usize = 10;
/// Combined text must be longer than this to be emitted.
const MIN_COMBINED_CHARS: usize = 20;
/// Final suggestions must be longer than this.
const MIN_SUGGESTION_CHARS: usize = 15;
/// Candidates feeding the combined suggestion.
const COMBINE_TOP: usize = 3;
/// Two resolutions above this similarity are redundant.
const REDUNDANT_SIMILARITY: f64 = 0.7;

/// Synthesis tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisParams {
    /// Top candidates that may yield a direct suggestion.
    pub max_direct: usize,
    /// Suggestions returned after assembly.
    pub max_suggestions: usize,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            max_direct: 5,
            max_suggestions: 5,
        }
    }
}

/// Outcome of [`synthesize`].
#[derive(Debug, Clone, Default)]
pub struct Synthesis {
    /// Final suggestions, highest confidence first.
    pub suggestions: Vec<Suggestion>,
    /// Direct suggestions built before assembly.
    pub direct: usize,
    /// Combined suggestions built before assembly (0 or 1).
    pub combined: usize,
}

/// Build suggestions from ranked candidates with default parameters.
///
/// Always returns a vector, empty when nothing qualifies.
pub fn synthesize_suggestions(
    ranked: &[RankedCandidate],
    vocabulary: &Vocabulary,
    now: DateTime<Utc>,
) -> Vec<Suggestion> {
    synthesize(ranked, &SynthesisParams::default(), vocabulary, now).suggestions
}

/// Build suggestions from ranked candidates.
pub fn synthesize(
    ranked: &[RankedCandidate],
    params: &SynthesisParams,
    vocabulary: &Vocabulary,
    now: DateTime<Utc>,
) -> Synthesis {
    let mut seq = 0usize;
    let mut next_id = |sources: &[String]| {
        let id = suggestion_id(sources, now, seq);
        seq += 1;
        id
    };

    let mut all: Vec<Suggestion> = Vec::new();

    for cand in ranked.iter().take(params.max_direct) {
        let resolution = match usable_resolution(cand) {
            Some(r) => r,
            None => continue,
        };
        let sources = vec![cand.record.id.clone()];
        all.push(Suggestion {
            id: next_id(&sources),
            text: clean_and_format(resolution),
            confidence: (cand.similarity + DIRECT_BOOST).clamp(0.0, DIRECT_CAP),
            source_record_ids: sources,
            keywords: extract_keywords(
                &format!("{} {}", cand.record.title, resolution),
                vocabulary,
            ),
            kind: SuggestionKind::Direct,
            category: cand.record.category.clone(),
            created_at: now,
        });
    }
    let direct = all.len();

    let mut combined = 0;
    if ranked.len() >= 2 {
        let contributors: Vec<(&RankedCandidate, &str)> = ranked
            .iter()
            .take(COMBINE_TOP)
            .filter_map(|c| usable_resolution(c).map(|r| (c, r)))
            .collect();

        if contributors.len() >= 2 {
            let texts: Vec<&str> = contributors.iter().map(|(_, r)| *r).collect();
            if let Some(text) = combine_solutions(&texts, vocabulary) {
                if text.chars().count() > MIN_COMBINED_CHARS {
                    let top = &ranked[0];
                    let sources: Vec<String> = contributors
                        .iter()
                        .map(|(c, _)| c.record.id.clone())
                        .collect();
                    let titles: Vec<&str> = contributors
                        .iter()
                        .map(|(c, _)| c.record.title.as_str())
                        .collect();
                    all.push(Suggestion {
                        id: next_id(&sources),
                        keywords: extract_keywords(
                            &format!("{} {}", titles.join(" "), text),
                            vocabulary,
                        ),
                        text,
                        confidence: (top.similarity + COMBINED_BOOST).clamp(0.0, COMBINED_CAP),
                        source_record_ids: sources,
                        kind: SuggestionKind::Combined,
                        category: top.record.category.clone(),
                        created_at: now,
                    });
                    combined = 1;
                }
            }
        }
    }

    all.retain(|s| s.text.chars().count() > MIN_SUGGESTION_CHARS);
    all.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut seen: HashSet<String> = HashSet::new();
    all.retain(|s| seen.insert(s.text.clone()));
    all.truncate(params.max_suggestions);

    Synthesis {
        suggestions: all,
        direct,
        combined,
    }
}

/// Merge several resolution texts into one.
///
/// Texts of 10 characters or fewer (trimmed) are ignored. With one text
/// left it is simply cleaned; with two or more, the first two are merged:
/// near-duplicates (similarity > 0.7) collapse to the longer one,
/// otherwise they are joined as `"{first}. Inoltre: {second}"`. A first
/// text already ending in `!` or `?` keeps its mark instead of gaining `.`.
pub fn combine_solutions(texts: &[&str], vocabulary: &Vocabulary) -> Option<String> {
    let usable: Vec<&str> = texts
        .iter()
        .map(|t| t.trim())
        .filter(|t| t.chars().count() > MIN_RESOLUTION_CHARS)
        .collect();

    match usable.as_slice() {
        [] => None,
        [only] => Some(clean_and_format(only)),
        [first, second, ..] => {
            if score_similarity(first, second, vocabulary) > REDUNDANT_SIMILARITY {
                let longer = if second.chars().count() > first.chars().count() {
                    second
                } else {
                    first
                };
                Some(clean_and_format(longer))
            } else {
                let joined = if first.ends_with(['!', '?']) {
                    format!("{} Inoltre: {}", first, second)
                } else {
                    let head = first.trim_end_matches('.').trim_end();
                    format!("{}. Inoltre: {}", head, second)
                };
                Some(clean_and_format(&joined))
            }
        }
    }
}

/// Normalize whitespace and terminal punctuation.
///
/// Runs of spaces and tabs become one space, blank lines disappear, each
/// line and the whole text are trimmed, and a `.` is appended unless the
/// text already ends with `.`, `!`, or `?`. Idempotent.
///
/// ```rust
/// use helpdesk_suggest_core::synthesize::clean_and_format;
///
/// assert_eq!(clean_and_format("  riavviare   il PC \n\n\n poi  verificare "),
///            "riavviare il PC\npoi verificare.");
/// ```
pub fn clean_and_format(text: &str) -> String {
    let mut out = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if !out.is_empty() && !out.ends_with(['.', '!', '?']) {
        out.push('.');
    }
    out
}

fn usable_resolution(cand: &RankedCandidate) -> Option<&str> {
    cand.record
        .resolution_text()
        .filter(|r| r.trim().chars().count() > MIN_RESOLUTION_CHARS)
}

/// `sug_<millis>_<seq>_<hash>` where the hash covers the source ids.
fn suggestion_id(sources: &[String], now: DateTime<Utc>, seq: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sources.join("\n").as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("sug_{}_{}_{}", now.timestamp_millis(), seq, &digest[..8])
}
