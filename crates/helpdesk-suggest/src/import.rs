//! Ticket import.
//!
//! Reads a JSON array of [`Ticket`]s exported from the helpdesk backend
//! and upserts them into the `tickets` table. Re-importing the same file
//! updates rows in place; it never duplicates them.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::db;
use crate::models::Ticket;
use crate::sqlite_store::SqliteStore;

/// Counts reported after an import.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Parse a ticket export.
pub fn parse_tickets(content: &str) -> Result<Vec<Ticket>> {
    serde_json::from_str(content).context("Failed to parse tickets: expected a JSON array")
}

/// Upsert every valid ticket from `path`.
pub async fn import_tickets(config: &Config, path: &Path) -> Result<ImportSummary> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read tickets file: {}", path.display()))?;
    let tickets = parse_tickets(&content)?;

    let pool = db::connect(config).await?;
    let store = SqliteStore::new(pool.clone());
    let mut summary = ImportSummary::default();

    for ticket in &tickets {
        if ticket.id.trim().is_empty() || ticket.title.trim().is_empty() {
            tracing::warn!(id = %ticket.id, "skipping ticket without id or title");
            summary.skipped += 1;
            continue;
        }
        store
            .upsert_ticket(ticket)
            .await
            .with_context(|| format!("Failed to store ticket {}", ticket.id))?;
        summary.imported += 1;
    }

    pool.close().await;
    tracing::info!(imported = summary.imported, skipped = summary.skipped, "import finished");
    Ok(summary)
}

/// CLI entry point for `hds import`.
pub async fn run_import(config: &Config, path: &Path) -> Result<()> {
    let summary = import_tickets(config, path).await?;
    println!("imported tickets: {}", summary.imported);
    println!("skipped: {}", summary.skipped);
    println!("ok");
    Ok(())
}
