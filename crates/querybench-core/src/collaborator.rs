//! Boundary traits for the external collaborators
//!
//! Connection management, SQL transport and schema fetching live outside the
//! workbench engine. The facade reaches them only through these traits.

use crate::{ColumnEntry, DatabaseEntry, PlanRow, QueryResult, Result, TableEntry};
use async_trait::async_trait;
use uuid::Uuid;

/// Executes SQL against a connection
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `sql`, optionally scoped to `database`
    async fn execute(
        &self,
        connection_id: Uuid,
        sql: &str,
        database: Option<&str>,
    ) -> Result<QueryResult>;

    /// Run EXPLAIN for `sql` and return one `PlanRow` per output row
    async fn explain(
        &self,
        connection_id: Uuid,
        sql: &str,
        database: Option<&str>,
    ) -> Result<Vec<PlanRow>>;
}

/// Lists schema metadata. Each call returns a full snapshot of its scope.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn list_databases(&self, connection_id: Uuid) -> Result<Vec<DatabaseEntry>>;

    async fn list_tables(&self, connection_id: Uuid, database: &str) -> Result<Vec<TableEntry>>;

    async fn list_columns(
        &self,
        connection_id: Uuid,
        database: &str,
        table: &str,
    ) -> Result<Vec<ColumnEntry>>;
}

/// Best-effort SQL pretty-printer
pub trait SqlFormatter: Send + Sync {
    fn format(&self, sql: &str) -> Result<String>;
}
