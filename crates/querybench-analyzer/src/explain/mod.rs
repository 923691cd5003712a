//! EXPLAIN output decoding
//!
//! Execution collaborators backed by a real driver can implement `explain`
//! by running `EXPLAIN <sql>` and handing the result set to
//! [`plan_rows_from_result`], or by deserializing JSON rows with
//! [`parse_plan_rows_json`].

mod tabular;

pub use tabular::{PlanDecodeError, parse_plan_rows_json, plan_rows_from_result};
