//! Metadata cache keyed by connection, database and table

use parking_lot::RwLock;
use querybench_core::{ColumnEntry, DatabaseEntry, Result, SchemaSource, TableEntry};
use std::collections::HashMap;
use uuid::Uuid;

/// Cached metadata for one connection
#[derive(Debug, Default)]
struct ConnectionScope {
    /// `None` until the database list has been fetched once
    databases: Option<Vec<DatabaseEntry>>,
    /// Tables per database
    tables: HashMap<String, Vec<TableEntry>>,
    /// Columns per (database, table)
    columns: HashMap<(String, String), Vec<ColumnEntry>>,
}

/// Read-through schema metadata cache.
///
/// Getters never block on I/O: an unfetched scope reads as empty. Refreshes
/// fetch from a `SchemaSource` and swap the whole scope in one write, so a
/// reader sees either the old snapshot or the new one, never a mix. A failed
/// refresh leaves the previous snapshot in place.
#[derive(Debug, Default)]
pub struct MetadataCache {
    cache: RwLock<HashMap<Uuid, ConnectionScope>>,
}

impl MetadataCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Databases known for a connection, empty if never fetched
    pub fn get_databases(&self, connection_id: Uuid) -> Vec<DatabaseEntry> {
        let cache = self.cache.read();
        let result = cache
            .get(&connection_id)
            .and_then(|scope| scope.databases.clone());
        if result.is_none() {
            tracing::trace!(connection_id = %connection_id, "cache miss for databases");
        }
        result.unwrap_or_default()
    }

    /// Tables of a database, empty if never fetched
    pub fn get_tables(&self, connection_id: Uuid, database: &str) -> Vec<TableEntry> {
        let cache = self.cache.read();
        let result = cache
            .get(&connection_id)
            .and_then(|scope| scope.tables.get(database).cloned());
        if result.is_none() {
            tracing::trace!(connection_id = %connection_id, database = %database, "cache miss for tables");
        }
        result.unwrap_or_default()
    }

    /// Columns of a table, empty if never fetched
    pub fn get_columns(&self, connection_id: Uuid, database: &str, table: &str) -> Vec<ColumnEntry> {
        let cache = self.cache.read();
        let key = (database.to_string(), table.to_string());
        let result = cache
            .get(&connection_id)
            .and_then(|scope| scope.columns.get(&key).cloned());
        if result.is_none() {
            tracing::trace!(connection_id = %connection_id, database = %database, table = %table, "cache miss for columns");
        }
        result.unwrap_or_default()
    }

    /// Whether the table list of a database has been fetched at least once
    pub fn has_tables(&self, connection_id: Uuid, database: &str) -> bool {
        self.cache
            .read()
            .get(&connection_id)
            .is_some_and(|scope| scope.tables.contains_key(database))
    }

    /// Replace the database list of a connection
    pub fn set_databases(&self, connection_id: Uuid, databases: Vec<DatabaseEntry>) {
        tracing::debug!(connection_id = %connection_id, database_count = databases.len(), "caching databases");
        let mut cache = self.cache.write();
        cache.entry(connection_id).or_default().databases = Some(databases);
    }

    /// Replace the table list of a database.
    ///
    /// Column scopes of tables missing from the new list are dropped with it.
    pub fn set_tables(&self, connection_id: Uuid, database: &str, tables: Vec<TableEntry>) {
        tracing::debug!(connection_id = %connection_id, database = %database, table_count = tables.len(), "caching tables");
        let mut cache = self.cache.write();
        let scope = cache.entry(connection_id).or_default();
        scope.columns.retain(|(db, table), _| {
            db != database || tables.iter().any(|t| &t.name == table)
        });
        scope.tables.insert(database.to_string(), tables);
    }

    /// Replace the column list of a table
    pub fn set_columns(&self, connection_id: Uuid, database: &str, table: &str, columns: Vec<ColumnEntry>) {
        tracing::debug!(connection_id = %connection_id, database = %database, table = %table, column_count = columns.len(), "caching columns");
        let mut cache = self.cache.write();
        cache
            .entry(connection_id)
            .or_default()
            .columns
            .insert((database.to_string(), table.to_string()), columns);
    }

    /// Fetch the database list and replace the cached scope.
    ///
    /// Returns the number of databases now cached.
    pub async fn refresh_databases(&self, source: &dyn SchemaSource, connection_id: Uuid) -> Result<usize> {
        let databases = source.list_databases(connection_id).await.inspect_err(|e| {
            tracing::warn!(connection_id = %connection_id, error = %e, "database refresh failed, keeping previous snapshot");
        })?;
        let count = databases.len();
        self.set_databases(connection_id, databases);
        Ok(count)
    }

    /// Fetch the table list of a database and replace the cached scope
    pub async fn refresh_tables(
        &self,
        source: &dyn SchemaSource,
        connection_id: Uuid,
        database: &str,
    ) -> Result<usize> {
        let tables = source
            .list_tables(connection_id, database)
            .await
            .inspect_err(|e| {
                tracing::warn!(connection_id = %connection_id, database = %database, error = %e, "table refresh failed, keeping previous snapshot");
            })?;
        let count = tables.len();
        self.set_tables(connection_id, database, tables);
        Ok(count)
    }

    /// Fetch the column list of a table and replace the cached scope
    pub async fn refresh_columns(
        &self,
        source: &dyn SchemaSource,
        connection_id: Uuid,
        database: &str,
        table: &str,
    ) -> Result<usize> {
        let columns = source
            .list_columns(connection_id, database, table)
            .await
            .inspect_err(|e| {
                tracing::warn!(connection_id = %connection_id, database = %database, table = %table, error = %e, "column refresh failed, keeping previous snapshot");
            })?;
        let count = columns.len();
        self.set_columns(connection_id, database, table, columns);
        Ok(count)
    }

    /// Drop everything cached for a connection
    pub fn invalidate(&self, connection_id: Uuid) {
        tracing::info!(connection_id = %connection_id, "invalidating metadata cache");
        self.cache.write().remove(&connection_id);
    }

    /// Clear all cached metadata
    pub fn clear(&self) {
        let count = self.cache.read().len();
        tracing::info!(cache_entries = count, "clearing metadata cache");
        self.cache.write().clear();
    }
}
