//! Candidate ranking.
//!
//! # Algorithm
//!
//! 1. Re-validate every candidate (identifier and resolution text present).
//!    Invalid candidates are skipped and reported, never fatal.
//! 2. Score `title + " " + body` of the query against the same text of
//!    each candidate with [`score_similarity`].
//! 3. Drop candidates at or below the relevance floor.
//! 4. Sort by similarity (desc), then `resolved_at` (desc).
//! 5. Truncate to the limit.

use anyhow::{bail, Result};

use crate::models::{HistoricalRecord, RankedCandidate};
use crate::similarity::score_similarity;
use crate::vocabulary::Vocabulary;

/// Similarity at or below which a candidate is treated as noise.
pub const DEFAULT_RELEVANCE_FLOOR: f64 = 0.01;

/// Ranked candidates passed on to synthesis by default.
pub const DEFAULT_RANK_LIMIT: usize = 15;

/// Ranking tuning parameters, decoupled from application config.
#[derive(Debug, Clone, Copy)]
pub struct RankParams {
    /// Maximum ranked candidates to return.
    pub limit: usize,
    /// Candidates scoring `<=` this are dropped.
    pub relevance_floor: f64,
}

impl Default for RankParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RANK_LIMIT,
            relevance_floor: DEFAULT_RELEVANCE_FLOOR,
        }
    }
}

/// A candidate rejected before scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCandidate {
    pub record_id: String,
    pub reason: String,
}

/// Outcome of [`rank_candidates`].
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Candidates above the floor, best first.
    pub ranked: Vec<RankedCandidate>,
    /// Candidates rejected by validation.
    pub skipped: Vec<SkippedCandidate>,
    /// Candidates that were scored.
    pub considered: usize,
}

/// Rank resolved tickets by similarity to a query, best first.
///
/// Returns an empty vector when nothing clears the relevance floor.
pub fn find_similar_resolved(
    query_title: &str,
    query_body: &str,
    candidates: &[HistoricalRecord],
    limit: usize,
    vocabulary: &Vocabulary,
) -> Vec<RankedCandidate> {
    let params = RankParams {
        limit,
        ..RankParams::default()
    };
    rank_candidates(query_title, query_body, candidates, &params, vocabulary).ranked
}

/// Rank candidates and report which ones were skipped.
pub fn rank_candidates(
    query_title: &str,
    query_body: &str,
    candidates: &[HistoricalRecord],
    params: &RankParams,
    vocabulary: &Vocabulary,
) -> Ranking {
    let query = format!("{} {}", query_title, query_body);
    let mut ranking = Ranking::default();

    for record in candidates {
        if let Err(e) = validate_candidate(record) {
            ranking.skipped.push(SkippedCandidate {
                record_id: record.id.clone(),
                reason: e.to_string(),
            });
            continue;
        }
        ranking.considered += 1;

        let similarity = score_similarity(&query, &record.issue_text(), vocabulary);
        if similarity <= params.relevance_floor {
            continue;
        }
        ranking.ranked.push(RankedCandidate {
            record: record.clone(),
            similarity,
        });
    }

    ranking.ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.record.resolved_at.cmp(&a.record.resolved_at))
    });
    ranking.ranked.truncate(params.limit);

    ranking
}

fn validate_candidate(record: &HistoricalRecord) -> Result<()> {
    if record.id.trim().is_empty() {
        bail!("missing identifier");
    }
    if record.resolution_text().is_none() {
        bail!("missing resolution text");
    }
    Ok(())
}
