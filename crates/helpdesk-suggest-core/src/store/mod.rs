//! Storage abstraction for Helpdesk Suggest.
//!
//! The [`Store`] trait is everything the suggestion engine needs from the
//! ticketing backend: a window of resolved tickets to compare against and
//! an append-only feedback log. Backends decide how tickets are persisted;
//! the engine never writes tickets.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{FeedbackRecord, HistoricalRecord};

/// Candidates requested from the store by default.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 200;

/// Abstract record store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`fetch_candidate_records`](Store::fetch_candidate_records) | Recent resolved tickets |
/// | [`append_feedback`](Store::append_feedback) | Append a feedback event |
/// | [`list_feedback`](Store::list_feedback) | Read the feedback log |
#[async_trait]
pub trait Store: Send + Sync {
    /// Resolved or closed tickets with non-blank resolution text, most
    /// recently resolved first, at most `limit`.
    async fn fetch_candidate_records(&self, limit: usize) -> Result<Vec<HistoricalRecord>>;

    /// Append one feedback event.
    async fn append_feedback(&self, record: &FeedbackRecord) -> Result<()>;

    /// All feedback events, oldest first.
    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>>;
}
