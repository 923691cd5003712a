//! Querybench Session - editing tabs and their execution state machine
//!
//! `SessionRegistry` owns the ordered tabs and the focused one. Execution
//! moves through `Idle -> Executing -> {Idle, Failed}`, with `Failed ->
//! Executing` allowed for retries. Closing a tab removes it outright.

mod registry;
mod tab;

pub use registry::SessionRegistry;
pub use tab::{ExecutionState, Tab};
