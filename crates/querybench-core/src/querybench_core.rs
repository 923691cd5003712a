//! Querybench Core - shared abstractions for the query workbench engine
//!
//! This crate provides the types and traits every other querybench crate
//! depends on:
//!
//! - `QueryExecutor`, `SchemaSource`, `SqlFormatter` - the narrow boundary to
//!   the external execution, schema and formatting collaborators
//! - `PlanRow` - one row of EXPLAIN output
//! - `DatabaseEntry`, `TableEntry`, `ColumnEntry` - schema metadata snapshots
//! - `QueryResult`, `Row`, `Value` - execution results
//! - `WorkbenchError` - the error type reported across the boundary

mod collaborator;
mod error;
mod metadata;
mod plan;
mod types;

pub use collaborator::*;
pub use error::*;
pub use metadata::*;
pub use plan::*;
pub use types::*;
