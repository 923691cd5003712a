//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use querybench_core::{
    ColumnEntry, ColumnMeta, DatabaseEntry, PlanRow, QueryExecutor, QueryResult, Result,
    SchemaSource, SqlFormatter, TableEntry, TableKind, Value, WorkbenchError,
};
use querybench_workbench::{Collaborators, Workbench, WorkbenchConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Notify;
use uuid::Uuid;

/// Mock execution collaborator.
///
/// Returns a fixed result for `execute` and fixed rows for `explain`. Can be
/// switched to fail, to fail only for SQL containing a pattern, or to block
/// inside `execute` until `release()` is called.
pub struct MockExecutor {
    pub result: Mutex<QueryResult>,
    pub plan: Mutex<Vec<PlanRow>>,
    pub fail_execute: AtomicBool,
    pub fail_explain: AtomicBool,
    /// `execute` fails for SQL containing any of these
    pub failing_patterns: Mutex<Vec<String>>,
    /// When set, `execute` waits on `gate` after signalling `started`
    pub blocking: AtomicBool,
    pub started: Notify,
    pub gate: Notify,
    pub execute_count: AtomicUsize,
    /// Log of all SQL sent to `execute`
    pub sql_log: Mutex<Vec<String>>,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self {
            result: Mutex::new(sample_result()),
            plan: Mutex::new(Vec::new()),
            fail_execute: AtomicBool::new(false),
            fail_explain: AtomicBool::new(false),
            failing_patterns: Mutex::new(Vec::new()),
            blocking: AtomicBool::new(false),
            started: Notify::new(),
            gate: Notify::new(),
            execute_count: AtomicUsize::new(0),
            sql_log: Mutex::new(Vec::new()),
        }
    }
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(self, rows: Vec<PlanRow>) -> Self {
        *self.plan.lock() = rows;
        self
    }

    pub fn set_fail_execute(&self, fail: bool) {
        self.fail_execute.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_explain(&self, fail: bool) {
        self.fail_explain.store(fail, Ordering::SeqCst);
    }

    pub fn fail_when_contains(&self, pattern: impl Into<String>) {
        self.failing_patterns.lock().push(pattern.into());
    }

    pub fn set_blocking(&self, blocking: bool) {
        self.blocking.store(blocking, Ordering::SeqCst);
    }

    /// Let one blocked `execute` call continue
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn execute_count(&self) -> usize {
        self.execute_count.load(Ordering::SeqCst)
    }

    pub fn sql_log(&self) -> Vec<String> {
        self.sql_log.lock().clone()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn execute(&self, _connection_id: Uuid, sql: &str, _database: Option<&str>) -> Result<QueryResult> {
        self.execute_count.fetch_add(1, Ordering::SeqCst);
        self.sql_log.lock().push(sql.to_string());

        if self.blocking.load(Ordering::SeqCst) {
            self.started.notify_one();
            self.gate.notified().await;
        }

        if self.fail_execute.load(Ordering::SeqCst) {
            return Err(WorkbenchError::Execution("connection lost".into()));
        }
        let failing = self
            .failing_patterns
            .lock()
            .iter()
            .any(|pattern| sql.contains(pattern.as_str()));
        if failing {
            return Err(WorkbenchError::Execution("permission denied".into()));
        }

        Ok(self.result.lock().clone())
    }

    async fn explain(&self, _connection_id: Uuid, _sql: &str, _database: Option<&str>) -> Result<Vec<PlanRow>> {
        if self.fail_explain.load(Ordering::SeqCst) {
            return Err(WorkbenchError::Explain("syntax error".into()));
        }
        Ok(self.plan.lock().clone())
    }
}

/// Mock schema collaborator serving a mutable in-memory schema
#[derive(Default)]
pub struct MockSchemaSource {
    pub databases: Mutex<Vec<String>>,
    pub tables: Mutex<HashMap<String, Vec<TableEntry>>>,
    pub columns: Mutex<HashMap<(String, String), Vec<ColumnEntry>>>,
    pub should_fail: AtomicBool,
    pub call_count: AtomicUsize,
}

impl MockSchemaSource {
    /// Database `shop` with `users(id, name)` and `orders(id, user_id, total)`
    pub fn shop() -> Self {
        let source = Self::default();
        *source.databases.lock() = vec!["shop".to_string()];
        source.set_tables(
            "shop",
            vec![
                TableEntry::new("users", TableKind::Table),
                TableEntry::new("orders", TableKind::Table),
            ],
        );
        source.set_columns(
            "shop",
            "users",
            vec![ColumnEntry::new("id", "int"), ColumnEntry::new("name", "varchar(255)")],
        );
        source.set_columns(
            "shop",
            "orders",
            vec![
                ColumnEntry::new("id", "bigint"),
                ColumnEntry::new("user_id", "int"),
                ColumnEntry::new("total", "decimal(10,2)"),
            ],
        );
        source
    }

    pub fn set_tables(&self, database: &str, tables: Vec<TableEntry>) {
        self.tables.lock().insert(database.to_string(), tables);
    }

    pub fn set_columns(&self, database: &str, table: &str, columns: Vec<ColumnEntry>) {
        self.columns
            .lock()
            .insert((database.to_string(), table.to_string()), columns);
    }

    pub fn set_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(WorkbenchError::Schema("metadata query timed out".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaSource for MockSchemaSource {
    async fn list_databases(&self, _connection_id: Uuid) -> Result<Vec<DatabaseEntry>> {
        self.check()?;
        Ok(self
            .databases
            .lock()
            .iter()
            .map(|name| DatabaseEntry::new(name.clone()))
            .collect())
    }

    async fn list_tables(&self, _connection_id: Uuid, database: &str) -> Result<Vec<TableEntry>> {
        self.check()?;
        Ok(self.tables.lock().get(database).cloned().unwrap_or_default())
    }

    async fn list_columns(&self, _connection_id: Uuid, database: &str, table: &str) -> Result<Vec<ColumnEntry>> {
        self.check()?;
        Ok(self
            .columns
            .lock()
            .get(&(database.to_string(), table.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Formatter that uppercases, or always fails
pub struct MockFormatter {
    pub should_fail: bool,
}

impl SqlFormatter for MockFormatter {
    fn format(&self, sql: &str) -> Result<String> {
        if self.should_fail {
            return Err(WorkbenchError::Format("unbalanced parenthesis".into()));
        }
        Ok(sql.to_uppercase())
    }
}

pub fn sample_result() -> QueryResult {
    QueryResult::from_rows(
        vec![ColumnMeta::new("id", "int"), ColumnMeta::new("name", "varchar")],
        vec![
            vec![Value::Int64(1), Value::String("ada".into())],
            vec![Value::Int64(2), Value::String("grace".into())],
        ],
    )
}

/// A workbench wired to mocks, with handles to the mocks
pub struct Harness {
    pub workbench: Workbench,
    pub executor: Arc<MockExecutor>,
    pub schema: Arc<MockSchemaSource>,
    pub connection_id: Uuid,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(MockExecutor::new(), MockSchemaSource::shop(), false, WorkbenchConfig::default())
    }

    pub fn with(
        executor: MockExecutor,
        schema: MockSchemaSource,
        failing_formatter: bool,
        config: WorkbenchConfig,
    ) -> Self {
        let executor = Arc::new(executor);
        let schema = Arc::new(schema);
        let collaborators = Collaborators {
            executor: executor.clone(),
            schema: schema.clone(),
            formatter: Arc::new(MockFormatter {
                should_fail: failing_formatter,
            }),
        };

        Self {
            workbench: Workbench::from_config(config, collaborators),
            executor,
            schema,
            connection_id: Uuid::new_v4(),
        }
    }

    /// A tab bound to the harness connection and `shop`
    pub fn bound_tab(&self, sql: &str) -> Uuid {
        let id = self
            .workbench
            .create_tab(Some(self.connection_id), Some("shop".to_string()));
        self.workbench.update_content(id, sql);
        id
    }
}
