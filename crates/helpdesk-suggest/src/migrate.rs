use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

/// Create the database and apply the schema. Idempotent.
pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Create all tables and indexes on an open pool.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // Tickets mirrored from the helpdesk backend
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tickets (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT NOT NULL DEFAULT '',
            resolution TEXT,
            category TEXT,
            status TEXT NOT NULL DEFAULT 'open',
            resolved_at INTEGER,
            imported_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Append-only feedback log
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS suggestion_feedback (
            id TEXT PRIMARY KEY,
            suggestion_id TEXT NOT NULL,
            ticket_id TEXT NOT NULL,
            was_helpful INTEGER NOT NULL,
            feedback_text TEXT,
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_tickets_status_resolved ON tickets(status, resolved_at DESC)",
    )
    .execute(pool)
    .await?;
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_feedback_created_at ON suggestion_feedback(created_at)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
