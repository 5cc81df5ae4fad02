//! Feedback recording and performance statistics commands.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use helpdesk_suggest_core::engine::SuggestionEngine;
use helpdesk_suggest_core::models::{FeedbackRecord, PerformanceStats};

use crate::config::Config;
use crate::db;
use crate::sqlite_store::{SqliteStore, TicketCounts};

/// Append a feedback event to the database.
///
/// Errors propagate: losing feedback silently defeats collecting it.
pub async fn submit_feedback(
    config: &Config,
    suggestion_id: &str,
    ticket_id: &str,
    was_helpful: bool,
    feedback_text: Option<&str>,
) -> Result<FeedbackRecord> {
    let engine = SuggestionEngine::new(config.vocabulary(), config.suggest_params());
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let result = engine
        .record_feedback(&store, suggestion_id, ticket_id, was_helpful, feedback_text)
        .await;

    pool.close().await;
    result
}

/// CLI entry point for `hds feedback`.
pub async fn run_feedback(
    config: &Config,
    suggestion_id: &str,
    ticket_id: &str,
    was_helpful: bool,
    feedback_text: Option<String>,
) -> Result<()> {
    let record = submit_feedback(
        config,
        suggestion_id,
        ticket_id,
        was_helpful,
        feedback_text.as_deref(),
    )
    .await?;

    println!(
        "Feedback recorded: {} ({})",
        record.id,
        if record.was_helpful {
            "helpful"
        } else {
            "not helpful"
        }
    );
    Ok(())
}

/// Everything `hds stats` reports.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub feedback: PerformanceStats,
    pub tickets: TicketCounts,
}

/// Gather feedback accuracy and ticket counts.
pub async fn gather_stats(config: &Config) -> Result<StatsReport> {
    let engine = SuggestionEngine::new(config.vocabulary(), config.suggest_params());
    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());

    let feedback = engine.performance_stats(&store, Utc::now()).await?;
    let tickets = store.count_tickets().await?;

    pool.close().await;
    Ok(StatsReport { feedback, tickets })
}

/// CLI entry point for `hds stats`.
pub async fn run_stats(config: &Config, json: bool) -> Result<()> {
    let report = gather_stats(config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Helpdesk Suggest — Stats");
    println!("========================");
    println!();
    println!("  Database:        {}", config.db.path.display());
    println!("  Tickets:         {}", report.tickets.total);
    println!("  Candidates:      {}", report.tickets.candidates);
    println!();
    println!("  Feedback:        {}", report.feedback.total);
    println!("  Helpful:         {}", report.feedback.helpful);
    println!(
        "  Accuracy:        {:.2}%",
        report.feedback.accuracy_rate_percent
    );
    println!("  Last 7 days:     {}", report.feedback.last_week_count);
    println!();

    Ok(())
}
