//! Core data models used throughout Helpdesk Suggest.
//!
//! These types represent the resolved tickets read from the store, the
//! ranked candidates and suggestions produced by the pipeline, and the
//! feedback events written back by callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved ticket, read from the external record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// How the ticket was resolved. Records without a non-blank
    /// resolution never reach scoring.
    #[serde(default)]
    pub resolution: Option<String>,
    pub resolved_at: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<String>,
}

impl HistoricalRecord {
    /// Title and body joined by a single space, as compared against queries.
    pub fn issue_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }

    /// The resolution text, if present and not blank.
    pub fn resolution_text(&self) -> Option<&str> {
        self.resolution
            .as_deref()
            .filter(|r| !r.trim().is_empty())
    }
}

/// A [`HistoricalRecord`] paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub record: HistoricalRecord,
    /// Similarity in `[0.0, 1.0]`.
    pub similarity: f64,
}

/// Where a suggestion's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// Resolution of a single similar ticket.
    Direct,
    /// Merge of the resolutions of several similar tickets.
    Combined,
}

/// A user-facing solution suggestion. Built fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    /// Cleaned solution text, always longer than 15 characters.
    pub text: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Contributing records, in rank order. Never empty.
    pub source_record_ids: Vec<String>,
    pub keywords: Vec<String>,
    pub kind: SuggestionKind,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only event recording whether a suggestion helped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: String,
    pub suggestion_id: String,
    pub ticket_id: String,
    pub was_helpful: bool,
    pub feedback_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate accuracy of past suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub total: usize,
    pub helpful: usize,
    /// `helpful / total * 100`, rounded to two decimals. `0.0` when empty.
    pub accuracy_rate_percent: f64,
    /// Events created in the seven days before `now`.
    pub last_week_count: usize,
}
