//! In-memory query history

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use uuid::Uuid;

/// One recorded execution attempt
#[derive(Clone, Debug, PartialEq)]
pub struct QueryHistoryEntry {
    pub id: Uuid,
    pub sql: String,
    pub connection_id: Option<Uuid>,
    pub executed_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Rows returned or affected, on success
    pub row_count: Option<u64>,
    pub error: Option<String>,
    pub success: bool,
}

impl QueryHistoryEntry {
    pub fn success(sql: impl Into<String>, connection_id: Option<Uuid>, duration_ms: u64, row_count: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            sql: sql.into(),
            connection_id,
            executed_at: Utc::now(),
            duration_ms,
            row_count: Some(row_count),
            error: None,
            success: true,
        }
    }

    pub fn failure(
        sql: impl Into<String>,
        connection_id: Option<Uuid>,
        duration_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sql: sql.into(),
            connection_id,
            executed_at: Utc::now(),
            duration_ms,
            row_count: None,
            error: Some(error.into()),
            success: false,
        }
    }
}

/// Bounded history, most recent first
#[derive(Debug)]
pub struct QueryHistory {
    entries: VecDeque<QueryHistoryEntry>,
    max_entries: usize,
}

impl QueryHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    /// Record an entry, evicting the oldest past the limit
    pub fn add(&mut self, entry: QueryHistoryEntry) {
        tracing::debug!(
            query_id = %entry.id,
            success = entry.success,
            duration_ms = entry.duration_ms,
            "adding query to history"
        );
        self.entries.push_front(entry);
        self.entries.truncate(self.max_entries);
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueryHistoryEntry> {
        self.entries.iter()
    }

    pub fn for_connection(&self, connection_id: Uuid) -> impl Iterator<Item = &QueryHistoryEntry> {
        self.entries
            .iter()
            .filter(move |e| e.connection_id == Some(connection_id))
    }

    /// Case-insensitive substring search over the SQL text
    pub fn search(&self, text: &str) -> impl Iterator<Item = &QueryHistoryEntry> {
        let needle = text.to_lowercase();
        self.entries
            .iter()
            .filter(move |e| e.sql.to_lowercase().contains(&needle))
    }

    pub fn clear(&mut self) {
        tracing::info!(entries_cleared = self.entries.len(), "clearing query history");
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(1000)
    }
}
