//! A single editing session

use querybench_core::QueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Execution lifecycle of a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    #[default]
    Idle,
    Executing,
    Failed,
}

impl ExecutionState {
    /// Whether a new execution may start from this state
    pub fn can_begin(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Executing => "executing",
            Self::Failed => "failed",
        }
    }
}

/// One SQL editing buffer plus its execution state.
///
/// Only `SessionRegistry` mutates tabs; everyone else reads them.
#[derive(Debug, Clone)]
pub struct Tab {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) connection_id: Option<Uuid>,
    pub(crate) database: Option<String>,
    pub(crate) result: Option<QueryResult>,
    pub(crate) state: ExecutionState,
    pub(crate) last_error: Option<String>,
}

impl Tab {
    pub(crate) fn new(title: String, connection_id: Option<Uuid>, database: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content: String::new(),
            connection_id,
            database,
            result: None,
            state: ExecutionState::Idle,
            last_error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current buffer text
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn connection_id(&self) -> Option<Uuid> {
        self.connection_id
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Last successful execution result. Stays at the previous value while
    /// an execution is in flight and after a failure.
    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Error of the last execution, only set in `Failed`
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_executing(&self) -> bool {
        self.state == ExecutionState::Executing
    }
}
