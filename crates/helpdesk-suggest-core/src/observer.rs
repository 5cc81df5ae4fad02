//! Pipeline diagnostics.
//!
//! The [`SuggestionEngine`](crate::engine::SuggestionEngine) reports one
//! [`PipelineEvent`] at each stage boundary to a [`PipelineObserver`].
//! [`TracingObserver`] forwards them as structured `tracing` events;
//! [`RecordingObserver`] keeps them in memory so tests can assert on them.

use std::sync::Mutex;

/// Something that happened while generating suggestions or recording feedback.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The query text was tokenized.
    QueryTokenized { keywords: Vec<String> },
    /// Candidate records were read from the store.
    CandidatesFetched { count: usize },
    /// The store could not provide candidates; no suggestions are produced.
    FetchFailed { error: String },
    /// A candidate was rejected before scoring.
    CandidateSkipped { record_id: String, reason: String },
    /// Ranking finished.
    CandidatesRanked { considered: usize, kept: usize },
    /// Synthesis finished.
    SuggestionsSynthesized {
        direct: usize,
        combined: usize,
        returned: usize,
    },
    /// A feedback event was appended to the log.
    FeedbackRecorded {
        suggestion_id: String,
        was_helpful: bool,
    },
}

/// Receives pipeline diagnostics.
pub trait PipelineObserver: Send + Sync {
    fn on_event(&self, event: &PipelineEvent);
}

/// Emits every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::QueryTokenized { keywords } => {
                tracing::debug!(stage = "tokenize", count = keywords.len(), keywords = ?keywords, "query tokenized");
            }
            PipelineEvent::CandidatesFetched { count } => {
                tracing::debug!(stage = "fetch", count, "candidates fetched");
            }
            PipelineEvent::FetchFailed { error } => {
                tracing::warn!(stage = "fetch", %error, "candidate fetch failed, returning no suggestions");
            }
            PipelineEvent::CandidateSkipped { record_id, reason } => {
                tracing::warn!(stage = "rank", record_id = %record_id, %reason, "candidate skipped");
            }
            PipelineEvent::CandidatesRanked { considered, kept } => {
                tracing::debug!(stage = "rank", considered, kept, "candidates ranked");
            }
            PipelineEvent::SuggestionsSynthesized {
                direct,
                combined,
                returned,
            } => {
                tracing::info!(stage = "synthesize", direct, combined, returned, "suggestions generated");
            }
            PipelineEvent::FeedbackRecorded {
                suggestion_id,
                was_helpful,
            } => {
                tracing::info!(stage = "feedback", suggestion_id = %suggestion_id, was_helpful, "feedback recorded");
            }
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<PipelineEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
