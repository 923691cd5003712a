//! EXPLAIN output rows

use serde::{Deserialize, Serialize};

/// Access type reported for a full table scan
pub const FULL_SCAN_ACCESS: &str = "ALL";

/// One row of traditional (tabular) EXPLAIN output.
///
/// Produced by the execution collaborator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanRow {
    /// SELECT identifier (NULL for UNION RESULT rows)
    pub id: Option<u64>,
    /// SIMPLE, PRIMARY, SUBQUERY, DERIVED, UNION, ...
    pub select_type: String,
    /// Table (or alias) the row refers to
    pub table: Option<String>,
    /// Join/access type: ALL, index, range, ref, eq_ref, const, ...
    #[serde(alias = "type")]
    pub access_type: Option<String>,
    pub possible_keys: Option<String>,
    #[serde(alias = "key")]
    pub used_key: Option<String>,
    #[serde(alias = "key_len")]
    pub key_length: Option<String>,
    /// Columns or constants compared to the used key
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    #[serde(alias = "rows")]
    pub rows_estimate: Option<u64>,
    #[serde(alias = "filtered")]
    pub filtered_percent: Option<f64>,
    #[serde(alias = "Extra")]
    pub extra: Option<String>,
}

impl PlanRow {
    /// Create a row for `table` with the given access type
    pub fn new(table: impl Into<String>, access_type: impl Into<String>) -> Self {
        Self {
            id: Some(1),
            select_type: "SIMPLE".to_string(),
            table: Some(table.into()),
            access_type: Some(access_type.into()),
            ..Default::default()
        }
    }

    pub fn with_used_key(mut self, key: impl Into<String>) -> Self {
        self.used_key = Some(key.into());
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_rows_estimate(mut self, rows: u64) -> Self {
        self.rows_estimate = Some(rows);
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Returns true if the row reports a full table scan
    pub fn is_full_scan(&self) -> bool {
        self.access_type.as_deref() == Some(FULL_SCAN_ACCESS)
    }

    /// Returns true if no index is used for this row
    pub fn has_no_key(&self) -> bool {
        self.used_key.as_deref().is_none_or(|k| k.trim().is_empty())
    }

    /// Returns true if the `extra` column mentions `flag`
    pub fn extra_contains(&self, flag: &str) -> bool {
        self.extra.as_deref().is_some_and(|e| e.contains(flag))
    }

    pub fn uses_filesort(&self) -> bool {
        self.extra_contains("Using filesort")
    }

    pub fn uses_temporary(&self) -> bool {
        self.extra_contains("Using temporary")
    }

    /// Table name used in messages
    pub fn table_label(&self) -> &str {
        self.table.as_deref().unwrap_or("unknown")
    }
}
