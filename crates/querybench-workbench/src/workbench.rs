//! Workbench facade
//!
//! The only component that talks to the execution, schema and formatting
//! collaborators. Collaborator calls are awaited without holding any lock, so
//! edits and tab closes that happen while a call is in flight are applied
//! first; the response is then validated against the current registry and
//! dropped if its tab is gone.

use crate::config::WorkbenchConfig;
use crate::debounce::Debouncer;
use crate::history::{QueryHistory, QueryHistoryEntry};
use parking_lot::{Mutex, RwLock};
use querybench_analyzer::{IndexSuggestion, PlanAnalysis, PlanAnalyzer};
use querybench_completion::{CompletionList, CompletionRequest, CompletionResolver};
use querybench_core::{QueryExecutor, Result, SchemaSource, SqlFormatter, WorkbenchError};
use querybench_schema::MetadataCache;
use querybench_session::SessionRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

const NO_CONNECTION_MESSAGE: &str = "no connection bound to this tab";
const CANCELLED_MESSAGE: &str = "execution cancelled";

/// External collaborators used by the workbench
#[derive(Clone)]
pub struct Collaborators {
    pub executor: Arc<dyn QueryExecutor>,
    pub schema: Arc<dyn SchemaSource>,
    pub formatter: Arc<dyn SqlFormatter>,
}

/// What happened to an `execute_tab` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The result was stored on the tab
    Completed,
    /// The tab moved to `Failed` with this message
    Failed(String),
    /// The tab was already executing; nothing was sent
    AlreadyExecuting,
    /// The tab was closed before the response arrived
    Discarded,
    UnknownTab,
}

/// Moves a tab out of `Executing` when its `execute_tab` future is dropped
/// before the response arrives
struct InFlightExecution<'a> {
    sessions: &'a RwLock<SessionRegistry>,
    id: Uuid,
    armed: bool,
}

impl InFlightExecution<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightExecution<'_> {
    fn drop(&mut self) {
        if self.armed && self.sessions.write().fail_execution(self.id, CANCELLED_MESSAGE) {
            tracing::warn!(tab_id = %self.id, "execution dropped before its response arrived");
        }
    }
}

/// Orchestrates tabs, metadata, completion and plan analysis
pub struct Workbench {
    config: WorkbenchConfig,
    sessions: RwLock<SessionRegistry>,
    metadata: Arc<MetadataCache>,
    collaborators: Collaborators,
    analyzer: PlanAnalyzer,
    /// Latest analysis per tab
    analyses: RwLock<HashMap<Uuid, PlanAnalysis>>,
    history: Mutex<QueryHistory>,
    search_debouncer: Debouncer,
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workbench")
            .field("config", &self.config)
            .field("tabs", &self.sessions.read().len())
            .finish_non_exhaustive()
    }
}

impl Workbench {
    pub fn new(
        config: WorkbenchConfig,
        sessions: SessionRegistry,
        metadata: Arc<MetadataCache>,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            analyzer: PlanAnalyzer::with_config(config.advisor.clone()),
            history: Mutex::new(QueryHistory::new(config.history_limit)),
            search_debouncer: Debouncer::new(config.search_debounce()),
            sessions: RwLock::new(sessions),
            analyses: RwLock::new(HashMap::new()),
            metadata,
            collaborators,
            config,
        }
    }

    /// Build a workbench with an empty registry and cache
    pub fn from_config(config: WorkbenchConfig, collaborators: Collaborators) -> Self {
        let sessions = SessionRegistry::with_title_prefix(config.tab_title_prefix.clone());
        Self::new(config, sessions, Arc::new(MetadataCache::new()), collaborators)
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn metadata(&self) -> &Arc<MetadataCache> {
        &self.metadata
    }

    /// Read access to the registry
    pub fn with_sessions<R>(&self, f: impl FnOnce(&SessionRegistry) -> R) -> R {
        f(&self.sessions.read())
    }

    pub fn create_tab(&self, connection_id: Option<Uuid>, database: Option<String>) -> Uuid {
        self.sessions.write().create_tab(connection_id, database)
    }

    /// Close a tab and drop its analysis. Idempotent.
    pub fn close_tab(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write();
        let closed = sessions.close_tab(id);
        self.analyses.write().remove(&id);
        closed
    }

    pub fn set_active(&self, id: Uuid) -> bool {
        self.sessions.write().set_active(id)
    }

    pub fn update_content(&self, id: Uuid, text: impl Into<String>) -> bool {
        self.sessions.write().update_content(id, text)
    }

    pub fn rename_tab(&self, id: Uuid, title: impl Into<String>) -> bool {
        self.sessions.write().rename_tab(id, title)
    }

    pub fn bind_tab(&self, id: Uuid, connection_id: Option<Uuid>, database: Option<String>) -> bool {
        self.sessions.write().bind_tab(id, connection_id, database)
    }

    /// Execute the tab's buffer and apply the response to the tab, if it
    /// still exists when the response arrives.
    #[tracing::instrument(skip(self, id), fields(tab_id = %id))]
    pub async fn execute_tab(&self, id: Uuid) -> ExecutionOutcome {
        let (connection_id, sql, database) = {
            let mut sessions = self.sessions.write();
            let Some(tab) = sessions.get(id) else {
                return ExecutionOutcome::UnknownTab;
            };
            let connection_id = tab.connection_id();
            let sql = tab.content().to_string();
            let database = tab.database().map(str::to_string);

            if !sessions.begin_execution(id) {
                return ExecutionOutcome::AlreadyExecuting;
            }
            let Some(connection_id) = connection_id else {
                sessions.fail_execution(id, NO_CONNECTION_MESSAGE);
                return ExecutionOutcome::Failed(NO_CONNECTION_MESSAGE.to_string());
            };
            (connection_id, sql, database)
        };

        let in_flight = InFlightExecution {
            sessions: &self.sessions,
            id,
            armed: true,
        };
        let start = Instant::now();
        let response = self
            .collaborators
            .executor
            .execute(connection_id, &sql, database.as_deref())
            .await;
        in_flight.disarm();
        let duration_ms = start.elapsed().as_millis() as u64;

        let entry = match &response {
            Ok(result) => {
                let row_count = if result.has_rows() {
                    result.row_count() as u64
                } else {
                    result.affected_rows
                };
                QueryHistoryEntry::success(sql.as_str(), Some(connection_id), duration_ms, row_count)
            }
            Err(e) => QueryHistoryEntry::failure(sql.as_str(), Some(connection_id), duration_ms, e.message()),
        };
        self.history.lock().add(entry);

        let mut sessions = self.sessions.write();
        if !sessions.contains(id) {
            tracing::warn!(duration_ms, "tab closed while executing, discarding response");
            return ExecutionOutcome::Discarded;
        }

        match response {
            Ok(result) => {
                let rows = result.row_count();
                if sessions.complete_execution(id, result) {
                    tracing::info!(rows, duration_ms, "query executed");
                    ExecutionOutcome::Completed
                } else {
                    ExecutionOutcome::Discarded
                }
            }
            Err(e) => {
                let message = e.message();
                if sessions.fail_execution(id, message.clone()) {
                    tracing::info!(error = %message, duration_ms, "query failed");
                    ExecutionOutcome::Failed(message)
                } else {
                    ExecutionOutcome::Discarded
                }
            }
        }
    }

    /// EXPLAIN the tab's buffer and analyze the plan.
    ///
    /// On failure any previous analysis for the tab is cleared and the error
    /// is returned. `Ok(None)` means the tab is unknown or was closed before
    /// the plan arrived.
    #[tracing::instrument(skip(self, id), fields(tab_id = %id))]
    pub async fn explain_tab(&self, id: Uuid) -> Result<Option<PlanAnalysis>> {
        let (connection_id, sql, database) = {
            let sessions = self.sessions.read();
            let Some(tab) = sessions.get(id) else {
                return Ok(None);
            };
            (
                tab.connection_id(),
                tab.content().to_string(),
                tab.database().map(str::to_string),
            )
        };

        let Some(connection_id) = connection_id else {
            self.analyses.write().remove(&id);
            return Err(WorkbenchError::NotConnected);
        };

        let rows = match self
            .collaborators
            .executor
            .explain(connection_id, &sql, database.as_deref())
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "explain failed, clearing previous analysis");
                self.analyses.write().remove(&id);
                return Err(e);
            }
        };

        let analysis = self.analyzer.analyze(rows, &sql);

        let sessions = self.sessions.read();
        if !sessions.contains(id) {
            tracing::warn!("tab closed while explaining, discarding plan");
            return Ok(None);
        }
        self.analyses.write().insert(id, analysis.clone());
        tracing::info!(
            warnings = analysis.warnings.len(),
            suggestions = analysis.suggestions.len(),
            "plan analyzed"
        );
        Ok(Some(analysis))
    }

    /// Latest analysis of a tab
    pub fn analysis(&self, id: Uuid) -> Option<PlanAnalysis> {
        self.analyses.read().get(&id).cloned()
    }

    /// Run a suggestion's DDL on the tab's connection.
    ///
    /// On success the suggestion is removed from the tab's working set and
    /// the return value says whether it was still present. On failure the
    /// suggestion stays and the error is returned.
    #[tracing::instrument(skip(self, id, suggestion), fields(tab_id = %id, ddl = %suggestion.ddl))]
    pub async fn apply_suggestion(&self, id: Uuid, suggestion: &IndexSuggestion) -> Result<bool> {
        let (connection_id, database) = {
            let sessions = self.sessions.read();
            let Some(tab) = sessions.get(id) else {
                return Ok(false);
            };
            (tab.connection_id(), tab.database().map(str::to_string))
        };
        let connection_id = connection_id.ok_or(WorkbenchError::NotConnected)?;

        self.collaborators
            .executor
            .execute(connection_id, &suggestion.ddl, database.as_deref())
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "applying index suggestion failed"))?;

        let removed = self
            .analyses
            .write()
            .get_mut(&id)
            .is_some_and(|analysis| analysis.remove_suggestion(&suggestion.ddl));
        tracing::info!(table = %suggestion.table, removed, "index suggestion applied");
        Ok(removed)
    }

    /// Completion candidates at a cursor position in the tab's buffer
    pub fn complete(&self, id: Uuid, line: usize, column: usize) -> CompletionList {
        let sessions = self.sessions.read();
        let Some(tab) = sessions.get(id) else {
            return CompletionList::default();
        };
        let request = CompletionRequest::new(tab.content(), line, column)
            .with_connection(tab.connection_id(), tab.database());
        CompletionResolver::new(&self.metadata).resolve(&request)
    }

    pub async fn refresh_databases(&self, connection_id: Uuid) -> Result<usize> {
        self.metadata
            .refresh_databases(self.collaborators.schema.as_ref(), connection_id)
            .await
    }

    pub async fn refresh_tables(&self, connection_id: Uuid, database: &str) -> Result<usize> {
        self.metadata
            .refresh_tables(self.collaborators.schema.as_ref(), connection_id, database)
            .await
    }

    pub async fn refresh_columns(&self, connection_id: Uuid, database: &str, table: &str) -> Result<usize> {
        self.metadata
            .refresh_columns(self.collaborators.schema.as_ref(), connection_id, database, table)
            .await
    }

    /// Refresh everything completion needs for a tab's binding: databases,
    /// then tables and their columns when a database is bound.
    ///
    /// Stops at the first failure. Returns the number of tables refreshed.
    #[tracing::instrument(skip(self, id), fields(tab_id = %id))]
    pub async fn refresh_tab_metadata(&self, id: Uuid) -> Result<usize> {
        let (connection_id, database) = {
            let sessions = self.sessions.read();
            let Some(tab) = sessions.get(id) else {
                return Ok(0);
            };
            (tab.connection_id(), tab.database().map(str::to_string))
        };
        let connection_id = connection_id.ok_or(WorkbenchError::NotConnected)?;

        self.refresh_databases(connection_id).await?;
        let Some(database) = database else {
            return Ok(0);
        };

        self.refresh_tables(connection_id, &database).await?;
        let tables = self.metadata.get_tables(connection_id, &database);
        for table in &tables {
            self.refresh_columns(connection_id, &database, &table.name).await?;
        }
        tracing::info!(tables = tables.len(), "tab metadata refreshed");
        Ok(tables.len())
    }

    /// Pretty-print the tab's buffer in place.
    ///
    /// Formatter failures leave the buffer unchanged and are only logged.
    pub fn format_tab(&self, id: Uuid) -> bool {
        let Some(content) = self.with_sessions(|s| s.get(id).map(|t| t.content().to_string())) else {
            return false;
        };

        match self.collaborators.formatter.format(&content) {
            Ok(formatted) => self.update_content(id, formatted),
            Err(e) => {
                tracing::warn!(tab_id = %id, error = %e, "formatting failed, buffer left unchanged");
                false
            }
        }
    }

    /// Snapshot of the history, most recent first
    pub fn history(&self) -> Vec<QueryHistoryEntry> {
        self.history.lock().entries().cloned().collect()
    }

    pub fn search_history(&self, text: &str) -> Vec<QueryHistoryEntry> {
        self.history.lock().search(text).cloned().collect()
    }

    /// Debounced `search_history`; `None` if a later search superseded this one
    pub async fn search_history_debounced(&self, text: &str) -> Option<Vec<QueryHistoryEntry>> {
        self.search_debouncer
            .run(|| async { self.search_history(text) })
            .await
    }

    /// Abandon any pending debounced search
    pub fn cancel_search(&self) {
        self.search_debouncer.cancel();
    }

    pub fn clear_history(&self) {
        self.history.lock().clear();
    }
}
