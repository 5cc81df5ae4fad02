//! Suggestion feedback events and accuracy statistics.

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{FeedbackRecord, PerformanceStats};

/// Build a well-formed feedback event.
///
/// Identifiers are trimmed and must not be empty; blank feedback text is
/// stored as `None`.
pub fn new_feedback_record(
    suggestion_id: &str,
    ticket_id: &str,
    was_helpful: bool,
    feedback_text: Option<&str>,
    now: DateTime<Utc>,
) -> Result<FeedbackRecord> {
    let suggestion_id = suggestion_id.trim();
    let ticket_id = ticket_id.trim();
    if suggestion_id.is_empty() {
        bail!("suggestion_id must not be empty");
    }
    if ticket_id.is_empty() {
        bail!("ticket_id must not be empty");
    }

    Ok(FeedbackRecord {
        id: Uuid::new_v4().to_string(),
        suggestion_id: suggestion_id.to_string(),
        ticket_id: ticket_id.to_string(),
        was_helpful,
        feedback_text: feedback_text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string),
        created_at: now,
    })
}

/// Reduce feedback events to accuracy statistics.
pub fn compute_performance_stats(events: &[FeedbackRecord], now: DateTime<Utc>) -> PerformanceStats {
    let total = events.len();
    let helpful = events.iter().filter(|e| e.was_helpful).count();
    let week_ago = now - Duration::days(7);
    let last_week_count = events.iter().filter(|e| e.created_at >= week_ago).count();

    let accuracy_rate_percent = if total == 0 {
        0.0
    } else {
        round2(helpful as f64 / total as f64 * 100.0)
    };

    PerformanceStats {
        total,
        helpful,
        accuracy_rate_percent,
        last_week_count,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
