//! Text similarity scoring.
//!
//! # Scoring
//!
//! ```text
//! score = min(1.0, jaccard(Ka, Kb) + 0.2 × |technical ∩| + Σ phrase bonuses)
//! ```
//!
//! where `Ka`, `Kb` are the keyword sets of each text. Plain Jaccard
//! under-rewards a single shared product name, so shared technical terms
//! and phrases found in both raw texts add fixed bonuses before clamping.
//!
//! Every term depends only on set intersection/union sizes or on
//! independent containment checks, so the score is symmetric.

use std::collections::HashSet;

use serde::Serialize;

use crate::keywords::extract_keywords;
use crate::vocabulary::Vocabulary;

/// Bonus per technical term present in both keyword sets.
pub const TECHNICAL_TERM_BONUS: f64 = 0.2;

/// Components of a similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimilarityBreakdown {
    /// `|Ka ∩ Kb| / |Ka ∪ Kb|`, `0.0` for an empty union.
    pub jaccard: f64,
    /// Sum of [`TECHNICAL_TERM_BONUS`] over shared technical terms.
    pub technical_bonus: f64,
    /// Sum of bonuses for phrases contained in both texts.
    pub phrase_bonus: f64,
    /// Clamped total in `[0.0, 1.0]`.
    pub score: f64,
}

/// Similarity of two texts in `[0.0, 1.0]`.
pub fn score_similarity(a: &str, b: &str, vocabulary: &Vocabulary) -> f64 {
    similarity_breakdown(a, b, vocabulary).score
}

/// Similarity of two texts with its individual components.
///
/// Identical non-empty texts score `1.0` even when they contain no
/// keywords at all. Empty texts score `0.0`.
pub fn similarity_breakdown(a: &str, b: &str, vocabulary: &Vocabulary) -> SimilarityBreakdown {
    if a.trim().is_empty() || b.trim().is_empty() {
        return SimilarityBreakdown {
            jaccard: 0.0,
            technical_bonus: 0.0,
            phrase_bonus: 0.0,
            score: 0.0,
        };
    }

    let ka: HashSet<String> = extract_keywords(a, vocabulary).into_iter().collect();
    let kb: HashSet<String> = extract_keywords(b, vocabulary).into_iter().collect();

    let shared: Vec<&String> = ka.intersection(&kb).collect();
    let union = ka.union(&kb).count();

    let jaccard = if union == 0 {
        0.0
    } else {
        shared.len() as f64 / union as f64
    };

    let technical_count = shared.iter().filter(|t| vocabulary.is_technical(t)).count();
    let technical_bonus = technical_count as f64 * TECHNICAL_TERM_BONUS;

    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let phrase_bonus: f64 = vocabulary
        .phrases()
        .iter()
        .filter(|p| a_lower.contains(&p.phrase) && b_lower.contains(&p.phrase))
        .map(|p| p.bonus)
        .sum();

    let mut score = (jaccard + technical_bonus + phrase_bonus).clamp(0.0, 1.0);
    if a.trim() == b.trim() {
        score = 1.0;
    }

    SimilarityBreakdown {
        jaccard,
        technical_bonus,
        phrase_bonus,
        score,
    }
}
