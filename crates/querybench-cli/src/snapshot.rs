//! Offline collaborator backed by snapshot files
//!
//! A schema snapshot is JSON of the form
//! `{"databases": {"<db>": {"<table>": {"kind": "table", "columns": [...]}}}}`.
//! Plan files are JSON arrays of plan rows. Nothing is ever executed.

use anyhow::Context;
use async_trait::async_trait;
use querybench_analyzer::parse_plan_rows_json;
use querybench_core::{
    ColumnEntry, DatabaseEntry, PlanRow, QueryExecutor, QueryResult, Result, SchemaSource,
    TableEntry, TableKind, WorkbenchError,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TableSnapshot {
    #[serde(default)]
    pub kind: TableKind,
    #[serde(default)]
    pub columns: Vec<ColumnEntry>,
}

/// Schema of one connection. Names are listed in sorted order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub databases: BTreeMap<String, BTreeMap<String, TableSnapshot>>,
}

impl SchemaSnapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema snapshot: {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Invalid schema snapshot: {}", path.display()))
    }

    /// The only database, when there is exactly one
    pub fn sole_database(&self) -> Option<&str> {
        let mut names = self.databases.keys();
        match (names.next(), names.next()) {
            (Some(name), None) => Some(name.as_str()),
            _ => None,
        }
    }
}

/// Answers schema listings and EXPLAIN from files loaded up front
#[derive(Debug, Default)]
pub struct OfflineCollaborator {
    schema: SchemaSnapshot,
    plan: Vec<PlanRow>,
}

impl OfflineCollaborator {
    pub fn new(schema: SchemaSnapshot) -> Self {
        Self {
            schema,
            plan: Vec::new(),
        }
    }

    pub fn with_plan(mut self, plan: Vec<PlanRow>) -> Self {
        self.plan = plan;
        self
    }

    /// Load plan rows from a JSON file
    pub fn load_plan(path: &Path) -> anyhow::Result<Vec<PlanRow>> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file: {}", path.display()))?;
        parse_plan_rows_json(&text).with_context(|| format!("Invalid plan file: {}", path.display()))
    }
}

#[async_trait]
impl QueryExecutor for OfflineCollaborator {
    async fn execute(&self, _connection_id: Uuid, _sql: &str, _database: Option<&str>) -> Result<QueryResult> {
        Err(WorkbenchError::Execution(
            "offline: statements are not executed".to_string(),
        ))
    }

    async fn explain(&self, _connection_id: Uuid, _sql: &str, _database: Option<&str>) -> Result<Vec<PlanRow>> {
        if self.plan.is_empty() {
            return Err(WorkbenchError::Explain("offline: no plan loaded".to_string()));
        }
        Ok(self.plan.clone())
    }
}

#[async_trait]
impl SchemaSource for OfflineCollaborator {
    async fn list_databases(&self, _connection_id: Uuid) -> Result<Vec<DatabaseEntry>> {
        Ok(self
            .schema
            .databases
            .keys()
            .map(|name| DatabaseEntry::new(name.clone()))
            .collect())
    }

    async fn list_tables(&self, _connection_id: Uuid, database: &str) -> Result<Vec<TableEntry>> {
        Ok(self
            .schema
            .databases
            .get(database)
            .map(|tables| {
                tables
                    .iter()
                    .map(|(name, table)| TableEntry::new(name.clone(), table.kind))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_columns(&self, _connection_id: Uuid, database: &str, table: &str) -> Result<Vec<ColumnEntry>> {
        Ok(self
            .schema
            .databases
            .get(database)
            .and_then(|tables| tables.get(table))
            .map(|table| table.columns.clone())
            .unwrap_or_default())
    }
}
