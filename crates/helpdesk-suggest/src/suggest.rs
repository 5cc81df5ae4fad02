//! Suggestion generation against the SQLite ticket store.
//!
//! This module provides the application-level entry points. The pipeline
//! itself (keywords, similarity, ranking, synthesis) lives in
//! `helpdesk-suggest-core` and reaches tickets through the [`Store`]
//! trait; this wrapper handles config, the database connection, and CLI
//! output formatting.
//!
//! [`Store`]: helpdesk_suggest_core::store::Store

use anyhow::Result;

use helpdesk_suggest_core::engine::SuggestionEngine;
use helpdesk_suggest_core::models::{Suggestion, SuggestionKind};

use crate::config::Config;
use crate::db;
use crate::sqlite_store::SqliteStore;

/// Build an engine from config, optionally overriding the result count.
pub fn engine_from_config(config: &Config, limit: Option<usize>) -> SuggestionEngine {
    let mut params = config.suggest_params();
    if let Some(limit) = limit {
        params.synthesis.max_suggestions = limit.max(1);
    }
    SuggestionEngine::new(config.vocabulary(), params)
}

/// Core suggestion function returning structured results.
///
/// Shared by `hds suggest` and `POST /suggest`. An unreachable database
/// is logged and yields no suggestions, like any other fetch failure.
pub async fn suggest_solutions(
    config: &Config,
    title: &str,
    body: &str,
    limit: Option<usize>,
) -> Vec<Suggestion> {
    let engine = engine_from_config(config, limit);

    let pool = match db::connect(config).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %format!("{:#}", e), "ticket store unavailable, returning no suggestions");
            return Vec::new();
        }
    };
    let store = SqliteStore::new(pool.clone());

    let suggestions = engine.generate_suggestions(&store, title, body).await;

    pool.close().await;
    suggestions
}

/// CLI entry point. Calls [`suggest_solutions`] and prints results to stdout.
pub async fn run_suggest(
    config: &Config,
    title: &str,
    body: Option<String>,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let body = body.unwrap_or_default();
    let suggestions = suggest_solutions(config, title, &body, limit).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!("No suggestions found.");
        return Ok(());
    }

    for (i, s) in suggestions.iter().enumerate() {
        let kind = match s.kind {
            SuggestionKind::Direct => "direct",
            SuggestionKind::Combined => "combined",
        };
        match &s.category {
            Some(category) => println!("{}. [{:.2}] {} / {}", i + 1, s.confidence, kind, category),
            None => println!("{}. [{:.2}] {}", i + 1, s.confidence, kind),
        }
        for line in s.text.lines() {
            println!("    {}", line);
        }
        println!("    sources: {}", s.source_record_ids.join(", "));
        if !s.keywords.is_empty() {
            println!("    keywords: {}", s.keywords.join(", "));
        }
        println!("    id: {}", s.id);
        println!();
    }

    Ok(())
}
