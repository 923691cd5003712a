//! Querybench Analyzer - EXPLAIN analysis and index advisory
//!
//! This crate provides functionality for:
//! - Decoding traditional tabular EXPLAIN results into `PlanRow`s
//! - Flagging full scans, filesorts and temporary tables per plan row
//! - Proposing `CREATE INDEX` statements from a lexical pass over the SQL

pub mod explain;
pub mod suggestions;

pub use explain::*;
pub use suggestions::*;
