//! SQLite-backed [`Store`] implementation.
//!
//! Maps each [`Store`] operation onto the `tickets` and
//! `suggestion_feedback` tables created by [`crate::migrate`].

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use helpdesk_suggest_core::models::{FeedbackRecord, HistoricalRecord};
use helpdesk_suggest_core::store::Store;

use crate::models::Ticket;

/// SQLite implementation of the [`Store`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Ticket counts shown by `hds stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TicketCounts {
    pub total: i64,
    /// Resolved or closed with a non-blank resolution.
    pub candidates: i64,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert or update a ticket by id.
    pub async fn upsert_ticket(&self, ticket: &Ticket) -> Result<()> {
        let now = Utc::now().timestamp();
        sqlx::query(
            r#"
            INSERT INTO tickets (id, title, body, resolution, category, status, resolved_at, imported_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                resolution = excluded.resolution,
                category = excluded.category,
                status = excluded.status,
                resolved_at = excluded.resolved_at,
                imported_at = excluded.imported_at
            "#,
        )
        .bind(&ticket.id)
        .bind(&ticket.title)
        .bind(&ticket.body)
        .bind(&ticket.resolution)
        .bind(&ticket.category)
        .bind(ticket.status.as_str())
        .bind(ticket.resolved_at.map(|t| t.timestamp()))
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn count_tickets(&self) -> Result<TicketCounts> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
            .fetch_one(&self.pool)
            .await?;
        let candidates: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tickets
            WHERE status IN ('resolved', 'closed')
              AND resolution IS NOT NULL AND trim(resolution) != ''
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(TicketCounts { total, candidates })
    }
}

fn from_ts(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}

#[async_trait]
impl Store for SqliteStore {
    async fn fetch_candidate_records(&self, limit: usize) -> Result<Vec<HistoricalRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, resolution, category,
                   COALESCE(resolved_at, imported_at) AS resolved_at
            FROM tickets
            WHERE status IN ('resolved', 'closed')
              AND resolution IS NOT NULL AND trim(resolution) != ''
            ORDER BY COALESCE(resolved_at, imported_at) DESC, id ASC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| HistoricalRecord {
                id: row.get("id"),
                title: row.get("title"),
                body: row.get("body"),
                resolution: row.get("resolution"),
                category: row.get("category"),
                resolved_at: from_ts(row.get("resolved_at")),
            })
            .collect())
    }

    async fn append_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO suggestion_feedback
                (id, suggestion_id, ticket_id, was_helpful, feedback_text, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.suggestion_id)
        .bind(&record.ticket_id)
        .bind(record.was_helpful)
        .bind(&record.feedback_text)
        .bind(record.created_at.timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, suggestion_id, ticket_id, was_helpful, feedback_text, created_at
            FROM suggestion_feedback
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| FeedbackRecord {
                id: row.get("id"),
                suggestion_id: row.get("suggestion_id"),
                ticket_id: row.get("ticket_id"),
                was_helpful: row.get("was_helpful"),
                feedback_text: row.get("feedback_text"),
                created_at: from_ts(row.get("created_at")),
            })
            .collect())
    }
}
