//! In-memory [`Store`] implementation for tests and embedding.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock` for thread safety.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::{FeedbackRecord, HistoricalRecord};

use super::Store;

/// In-memory store. Every inserted record is treated as resolved.
pub struct InMemoryStore {
    records: RwLock<HashMap<String, HistoricalRecord>>,
    feedback: RwLock<Vec<FeedbackRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            feedback: RwLock::new(Vec::new()),
        }
    }

    /// Build a store pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = HistoricalRecord>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.records.write() {
            for r in records {
                map.insert(r.id.clone(), r);
            }
        }
        store
    }

    /// Insert or replace a record by id.
    pub fn insert(&self, record: HistoricalRecord) -> Result<()> {
        let mut map = self
            .records
            .write()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        map.insert(record.id.clone(), record);
        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn fetch_candidate_records(&self, limit: usize) -> Result<Vec<HistoricalRecord>> {
        let map = self
            .records
            .read()
            .map_err(|_| anyhow!("record store lock poisoned"))?;
        let mut records: Vec<HistoricalRecord> = map
            .values()
            .filter(|r| r.resolution_text().is_some())
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.resolved_at
                .cmp(&a.resolved_at)
                .then(a.id.cmp(&b.id))
        });
        records.truncate(limit);
        Ok(records)
    }

    async fn append_feedback(&self, record: &FeedbackRecord) -> Result<()> {
        let mut log = self
            .feedback
            .write()
            .map_err(|_| anyhow!("feedback log lock poisoned"))?;
        log.push(record.clone());
        Ok(())
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackRecord>> {
        let log = self
            .feedback
            .read()
            .map_err(|_| anyhow!("feedback log lock poisoned"))?;
        Ok(log.clone())
    }
}
