//! Querybench Workbench - the facade over the workbench engine
//!
//! This crate provides:
//! - `Workbench`: tab lifecycle, execution, EXPLAIN analysis, completion and
//!   metadata refresh behind one owned instance
//! - `WorkbenchConfig`: TOML-backed settings
//! - `QueryHistory`: bounded in-memory record of execution attempts
//! - `Debouncer`: cancellable timer for search-as-you-type
//! - `SqlFormatCollaborator`: `sqlformat`-backed formatting collaborator

mod config;
mod debounce;
mod formatter;
mod history;
mod workbench;

pub use config::WorkbenchConfig;
pub use debounce::Debouncer;
pub use formatter::SqlFormatCollaborator;
pub use history::{QueryHistory, QueryHistoryEntry};
pub use workbench::{Collaborators, ExecutionOutcome, Workbench};
