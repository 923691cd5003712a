//! Plan warnings and index suggestions
//!
//! Warnings are raised per plan row. Index suggestions come from a
//! best-effort lexical scan of the SQL text, not from a parser: qualified
//! `table.column` references for full scans, and the identifiers following
//! ORDER BY / GROUP BY when the plan sorts or groups without an index.

mod analyzer;
mod columns;

pub use analyzer::*;
pub use columns::{clause_columns, qualified_columns};
