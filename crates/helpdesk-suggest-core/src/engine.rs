//! Suggestion engine: the single entry point callers use.
//!
//! [`SuggestionEngine`] holds only fixed configuration (vocabulary and
//! tuning parameters) plus a diagnostics observer, so it can be built
//! freely and shared across requests. It drives the pure pipeline stages
//! and reports each stage boundary to its [`PipelineObserver`].
//!
//! # Failure policy
//!
//! Suggestions are an enhancement, so [`generate_suggestions`](SuggestionEngine::generate_suggestions)
//! never fails: a store error or an invalid candidate degrades to fewer
//! (or zero) suggestions. Feedback writes are user-initiated and do
//! propagate their errors.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::feedback::{compute_performance_stats, new_feedback_record};
use crate::keywords::extract_keywords;
use crate::models::{FeedbackRecord, HistoricalRecord, PerformanceStats, RankedCandidate, Suggestion};
use crate::observer::{PipelineEvent, PipelineObserver, TracingObserver};
use crate::rank::{rank_candidates, RankParams};
use crate::similarity::{similarity_breakdown, SimilarityBreakdown};
use crate::store::{Store, DEFAULT_CANDIDATE_LIMIT};
use crate::synthesize::{synthesize, SynthesisParams};
use crate::vocabulary::Vocabulary;

/// Engine tuning parameters, decoupled from application config.
#[derive(Debug, Clone, Copy)]
pub struct SuggestParams {
    /// Records requested from the store per call.
    pub candidate_limit: usize,
    pub rank: RankParams,
    pub synthesis: SynthesisParams,
}

impl Default for SuggestParams {
    fn default() -> Self {
        Self {
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
            rank: RankParams::default(),
            synthesis: SynthesisParams::default(),
        }
    }
}

/// Generates suggestions and records feedback against a [`Store`].
#[derive(Clone)]
pub struct SuggestionEngine {
    vocabulary: Vocabulary,
    params: SuggestParams,
    observer: Arc<dyn PipelineObserver>,
}

impl SuggestionEngine {
    /// Engine reporting diagnostics through `tracing`.
    pub fn new(vocabulary: Vocabulary, params: SuggestParams) -> Self {
        Self {
            vocabulary,
            params,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the diagnostics observer.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn params(&self) -> &SuggestParams {
        &self.params
    }

    /// Fetch recent resolved tickets and build suggestions for a query.
    ///
    /// Never fails; returns an empty vector when the store is unavailable
    /// or nothing is similar enough.
    pub async fn generate_suggestions<S: Store + ?Sized>(
        &self,
        store: &S,
        title: &str,
        body: &str,
    ) -> Vec<Suggestion> {
        if is_blank_query(title, body) {
            return self.suggest_from_candidates(title, body, &[], Utc::now());
        }

        let candidates = match store.fetch_candidate_records(self.params.candidate_limit).await {
            Ok(c) => c,
            Err(e) => {
                self.emit(PipelineEvent::FetchFailed {
                    error: format!("{:#}", e),
                });
                return Vec::new();
            }
        };
        self.emit(PipelineEvent::CandidatesFetched {
            count: candidates.len(),
        });

        self.suggest_from_candidates(title, body, &candidates, Utc::now())
    }

    /// Run the pipeline over candidates the caller already holds.
    pub fn suggest_from_candidates(
        &self,
        title: &str,
        body: &str,
        candidates: &[HistoricalRecord],
        now: DateTime<Utc>,
    ) -> Vec<Suggestion> {
        let query_keywords = extract_keywords(&format!("{} {}", title, body), &self.vocabulary);
        self.emit(PipelineEvent::QueryTokenized {
            keywords: query_keywords,
        });
        if is_blank_query(title, body) {
            self.emit(PipelineEvent::SuggestionsSynthesized {
                direct: 0,
                combined: 0,
                returned: 0,
            });
            return Vec::new();
        }

        let ranked = self.rank(title, body, candidates);

        let synthesis = synthesize(&ranked, &self.params.synthesis, &self.vocabulary, now);
        self.emit(PipelineEvent::SuggestionsSynthesized {
            direct: synthesis.direct,
            combined: synthesis.combined,
            returned: synthesis.suggestions.len(),
        });
        synthesis.suggestions
    }

    /// Rank candidates against a query, reporting skipped records.
    pub fn rank(
        &self,
        title: &str,
        body: &str,
        candidates: &[HistoricalRecord],
    ) -> Vec<RankedCandidate> {
        let ranking = rank_candidates(title, body, candidates, &self.params.rank, &self.vocabulary);
        for skipped in &ranking.skipped {
            self.emit(PipelineEvent::CandidateSkipped {
                record_id: skipped.record_id.clone(),
                reason: skipped.reason.clone(),
            });
        }
        self.emit(PipelineEvent::CandidatesRanked {
            considered: ranking.considered,
            kept: ranking.ranked.len(),
        });
        ranking.ranked
    }

    /// Append a feedback event to the store's log.
    ///
    /// Unlike suggestion generation, failures are returned to the caller.
    pub async fn record_feedback<S: Store + ?Sized>(
        &self,
        store: &S,
        suggestion_id: &str,
        ticket_id: &str,
        was_helpful: bool,
        feedback_text: Option<&str>,
    ) -> Result<FeedbackRecord> {
        let record = new_feedback_record(suggestion_id, ticket_id, was_helpful, feedback_text, Utc::now())?;
        store
            .append_feedback(&record)
            .await
            .with_context(|| format!("Failed to record feedback for suggestion {}", record.suggestion_id))?;

        self.emit(PipelineEvent::FeedbackRecorded {
            suggestion_id: record.suggestion_id.clone(),
            was_helpful,
        });
        Ok(record)
    }

    /// Accuracy statistics over the store's feedback log.
    pub async fn performance_stats<S: Store + ?Sized>(
        &self,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<PerformanceStats> {
        let events = store
            .list_feedback()
            .await
            .context("Failed to read feedback log")?;
        Ok(compute_performance_stats(&events, now))
    }

    pub fn keywords(&self, text: &str) -> Vec<String> {
        extract_keywords(text, &self.vocabulary)
    }

    pub fn explain_similarity(&self, a: &str, b: &str) -> SimilarityBreakdown {
        similarity_breakdown(a, b, &self.vocabulary)
    }

    fn emit(&self, event: PipelineEvent) {
        self.observer.on_event(&event);
    }
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new(Vocabulary::default(), SuggestParams::default())
    }
}

fn is_blank_query(title: &str, body: &str) -> bool {
    title.trim().is_empty() && body.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SuggestionKind;
    use crate::observer::RecordingObserver;
    use crate::store::memory::InMemoryStore;
    use anyhow::bail;
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct FailingStore;

    #[async_trait]
    impl Store for FailingStore {
        async fn fetch_candidate_records(&self, _limit: usize) -> Result<Vec<HistoricalRecord>> {
            bail!("connection refused")
        }
        async fn append_feedback(&self, _record: &FeedbackRecord) -> Result<()> {
            bail!("disk full")
        }
        async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>> {
            bail!("connection refused")
        }
    }

    fn rec(id: &str, title: &str, body: &str, resolution: Option<&str>) -> HistoricalRecord {
        HistoricalRecord {
            id: id.to_string(),
            title: title.to_string(),
            body: body.to_string(),
            resolution: resolution.map(str::to_string),
            resolved_at: Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap(),
            category: Some("software".to_string()),
        }
    }

    fn recording_engine() -> (SuggestionEngine, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        let engine = SuggestionEngine::default().with_observer(observer.clone());
        (engine, observer)
    }

    #[tokio::test]
    async fn test_exact_technical_match() {
        let (engine, _) = recording_engine();
        let store = InMemoryStore::with_records(vec![rec(
            "T-100",
            "IPOS non funziona",
            "",
            Some("Riavviare il servizio IPOS e ripetere l'aggiornamento."),
        )]);

        let ranked = engine.rank(
            "Problema aggiornamento IPOS",
            "il sistema IPOS non si aggiorna",
            &store.fetch_candidate_records(200).await.unwrap(),
        );
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].similarity > 0.3);

        let suggestions = engine
            .generate_suggestions(&store, "Problema aggiornamento IPOS", "il sistema IPOS non si aggiorna")
            .await;
        let direct = suggestions
            .iter()
            .find(|s| s.kind == SuggestionKind::Direct)
            .expect("direct suggestion");
        assert_eq!(direct.source_record_ids, vec!["T-100"]);
        assert!(direct.text.ends_with('.'));
        assert_eq!(direct.category.as_deref(), Some("software"));
        assert!(direct.keywords.contains(&"ipos".to_string()));
    }

    #[tokio::test]
    async fn test_unrelated_texts_excluded() {
        let (engine, observer) = recording_engine();
        let store = InMemoryStore::with_records(vec![rec(
            "T-7",
            "problema wifi ufficio",
            "la rete wifi cade",
            Some("riavviato router"),
        )]);
        let candidates = store.fetch_candidate_records(200).await.unwrap();
        let score = engine
            .explain_similarity("stampante non stampa ", &candidates[0].issue_text())
            .score;
        assert!(score <= 0.05);

        let suggestions = engine
            .generate_suggestions(&store, "stampante non stampa", "")
            .await;
        assert!(suggestions.is_empty());
        assert!(observer.events().contains(&PipelineEvent::CandidatesRanked {
            considered: 1,
            kept: 0
        }));
    }

    #[tokio::test]
    async fn test_empty_store_and_empty_query_return_empty() {
        let (engine, _) = recording_engine();
        let store = InMemoryStore::new();
        assert!(engine.generate_suggestions(&store, "stampante", "").await.is_empty());

        let store = InMemoryStore::with_records(vec![rec(
            "T-1",
            "stampante",
            "",
            Some("Sostituito il toner della stampante"),
        )]);
        assert!(engine.generate_suggestions(&store, "", "   ").await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_skips_store() {
        let (engine, observer) = recording_engine();
        let suggestions = engine.generate_suggestions(&FailingStore, "  ", "\n\t").await;
        assert!(suggestions.is_empty());

        let events = observer.events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, PipelineEvent::FetchFailed { .. } | PipelineEvent::CandidatesFetched { .. })));
        assert_eq!(
            events.last(),
            Some(&PipelineEvent::SuggestionsSynthesized {
                direct: 0,
                combined: 0,
                returned: 0
            })
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_empty() {
        let (engine, observer) = recording_engine();
        let suggestions = engine.generate_suggestions(&FailingStore, "stampante", "").await;
        assert!(suggestions.is_empty());
        assert_eq!(
            observer.events(),
            vec![PipelineEvent::FetchFailed {
                error: "connection refused".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_malformed_candidate_does_not_abort_batch() {
        let (engine, observer) = recording_engine();
        let candidates = vec![
            rec("bad", "stampante inceppata", "", None),
            rec("good", "stampante inceppata", "", Some("Rimosso il foglio inceppato dal cassetto")),
        ];
        let suggestions =
            engine.suggest_from_candidates("stampante inceppata", "", &candidates, Utc::now());
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].source_record_ids, vec!["good"]);
        assert!(observer.events().iter().any(|e| matches!(
            e,
            PipelineEvent::CandidateSkipped { record_id, .. } if record_id == "bad"
        )));
    }

    #[tokio::test]
    async fn test_stage_events_in_order() {
        let (engine, observer) = recording_engine();
        let store = InMemoryStore::with_records(vec![rec(
            "T-1",
            "stampante inceppata",
            "",
            Some("Rimosso il foglio inceppato dal cassetto"),
        )]);
        engine.generate_suggestions(&store, "stampante inceppata", "").await;

        let stages: Vec<&'static str> = observer
            .events()
            .iter()
            .map(|e| match e {
                PipelineEvent::CandidatesFetched { .. } => "fetch",
                PipelineEvent::QueryTokenized { .. } => "tokenize",
                PipelineEvent::CandidatesRanked { .. } => "rank",
                PipelineEvent::SuggestionsSynthesized { .. } => "synthesize",
                _ => "other",
            })
            .collect();
        assert_eq!(stages, vec!["fetch", "tokenize", "rank", "synthesize"]);
    }

    #[tokio::test]
    async fn test_feedback_roundtrip_and_stats() {
        let (engine, observer) = recording_engine();
        let store = InMemoryStore::new();
        engine
            .record_feedback(&store, "sug_1", "T-1", true, Some("ottimo"))
            .await
            .unwrap();
        engine
            .record_feedback(&store, "sug_2", "T-2", false, None)
            .await
            .unwrap();

        let stats = engine.performance_stats(&store, Utc::now()).await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.helpful, 1);
        assert_eq!(stats.accuracy_rate_percent, 50.0);
        assert_eq!(stats.last_week_count, 2);
        assert!(observer.events().contains(&PipelineEvent::FeedbackRecorded {
            suggestion_id: "sug_1".to_string(),
            was_helpful: true
        }));
    }

    #[tokio::test]
    async fn test_feedback_write_failure_propagates() {
        let (engine, observer) = recording_engine();
        let err = engine
            .record_feedback(&FailingStore, "sug_1", "T-1", true, None)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("disk full"));
        assert!(observer.events().is_empty());

        assert!(engine
            .record_feedback(&InMemoryStore::new(), "", "T-1", true, None)
            .await
            .is_err());
    }
}
