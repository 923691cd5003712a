//! Ordered collection of tabs with a single focused tab

use crate::tab::{ExecutionState, Tab};
use querybench_core::QueryResult;
use uuid::Uuid;

const DEFAULT_TITLE_PREFIX: &str = "Query";

/// Owns every open tab and tracks which one is active.
///
/// Operations addressed to an unknown tab id are silent no-ops: they come
/// from UI races such as a response landing after its tab was closed.
/// Mutating operations report whether they changed anything.
#[derive(Debug)]
pub struct SessionRegistry {
    tabs: Vec<Tab>,
    active: Option<Uuid>,
    title_prefix: String,
    /// Last number handed out for an auto-generated title; never reused
    title_seq: u64,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::with_title_prefix(DEFAULT_TITLE_PREFIX)
    }

    /// Create a registry whose auto titles read `"<prefix> <n>"`
    pub fn with_title_prefix(prefix: impl Into<String>) -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            title_prefix: prefix.into(),
            title_seq: 0,
        }
    }

    /// Open a new empty tab, make it active and return its id
    pub fn create_tab(&mut self, connection_id: Option<Uuid>, database: Option<String>) -> Uuid {
        self.title_seq += 1;
        let title = format!("{} {}", self.title_prefix, self.title_seq);
        let tab = Tab::new(title, connection_id, database);
        let id = tab.id;
        tracing::info!(tab_id = %id, title = %tab.title, connection_id = ?connection_id, "created tab");
        self.tabs.push(tab);
        self.active = Some(id);
        id
    }

    /// Remove a tab. Focus moves to the tab that took its position, or to
    /// the previous one when the last tab was closed.
    ///
    /// Returns false if the id is unknown.
    pub fn close_tab(&mut self, id: Uuid) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let removed = self.tabs.remove(index);
        tracing::info!(tab_id = %id, executing = removed.is_executing(), "closed tab");

        if self.active == Some(id) {
            self.active = self
                .tabs
                .get(index)
                .or_else(|| index.checked_sub(1).and_then(|prev| self.tabs.get(prev)))
                .map(|tab| tab.id);
        }
        true
    }

    /// Focus a tab; unknown ids leave focus unchanged
    pub fn set_active(&mut self, id: Uuid) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.active = Some(id);
        true
    }

    /// Replace the buffer text. Execution state is untouched.
    pub fn update_content(&mut self, id: Uuid, text: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(tab) => {
                tab.content = text.into();
                true
            }
            None => false,
        }
    }

    pub fn rename_tab(&mut self, id: Uuid, title: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(tab) => {
                tab.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Point a tab at another connection and/or database
    pub fn bind_tab(&mut self, id: Uuid, connection_id: Option<Uuid>, database: Option<String>) -> bool {
        match self.get_mut(id) {
            Some(tab) => {
                tab.connection_id = connection_id;
                tab.database = database;
                true
            }
            None => false,
        }
    }

    /// `Idle | Failed -> Executing`. A tab that is already executing is left
    /// alone so the same tab never runs twice concurrently.
    pub fn begin_execution(&mut self, id: Uuid) -> bool {
        let Some(tab) = self.get_mut(id) else {
            return false;
        };
        if !tab.state.can_begin() {
            tracing::debug!(tab_id = %id, "execution already in flight");
            return false;
        }
        tab.state = ExecutionState::Executing;
        tab.last_error = None;
        tracing::debug!(tab_id = %id, "execution started");
        true
    }

    /// `Executing -> Idle` with a fresh result
    pub fn complete_execution(&mut self, id: Uuid, result: QueryResult) -> bool {
        let Some(tab) = self.executing_tab(id) else {
            return false;
        };
        tracing::debug!(tab_id = %id, rows = result.row_count(), "execution completed");
        tab.result = Some(result);
        tab.last_error = None;
        tab.state = ExecutionState::Idle;
        true
    }

    /// `Executing -> Failed`; the previous result is kept
    pub fn fail_execution(&mut self, id: Uuid, message: impl Into<String>) -> bool {
        let Some(tab) = self.executing_tab(id) else {
            return false;
        };
        let message = message.into();
        tracing::debug!(tab_id = %id, error = %message, "execution failed");
        tab.last_error = Some(message);
        tab.state = ExecutionState::Failed;
        true
    }

    pub fn get(&self, id: Uuid) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.position(id).is_some()
    }

    /// Tabs in display order
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    fn executing_tab(&mut self, id: Uuid) -> Option<&mut Tab> {
        let tab = self.get_mut(id)?;
        if tab.state != ExecutionState::Executing {
            tracing::debug!(tab_id = %id, state = tab.state.as_str(), "rejected transition, tab is not executing");
            return None;
        }
        Some(tab)
    }
}
