//! Traditional tabular EXPLAIN decoding
//!
//! MySQL-style `EXPLAIN` returns one row per table access with the columns
//! `id, select_type, table, type, possible_keys, key, key_len, ref, rows,
//! filtered, Extra`. Column names are matched case-insensitively; optional
//! columns missing from older servers (`filtered`, `partitions`) are tolerated.

use querybench_core::{PlanRow, QueryResult, Row, Value};
use thiserror::Error;

/// Errors that can occur when decoding EXPLAIN output
#[derive(Debug, Error)]
pub enum PlanDecodeError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Missing EXPLAIN column: {0}")]
    MissingColumn(&'static str),

    #[error("Empty EXPLAIN output")]
    EmptyOutput,
}

/// Result type for EXPLAIN decoding
pub type Result<T> = std::result::Result<T, PlanDecodeError>;

/// Decode a tabular EXPLAIN result set
pub fn plan_rows_from_result(result: &QueryResult) -> Result<Vec<PlanRow>> {
    for required in ["table", "type"] {
        if !result
            .columns
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(required))
        {
            return Err(PlanDecodeError::MissingColumn(required));
        }
    }

    if !result.has_rows() {
        return Err(PlanDecodeError::EmptyOutput);
    }

    Ok(result.rows.iter().map(decode_row).collect())
}

/// Parse a JSON array of plan rows (either field spelling of `PlanRow`)
pub fn parse_plan_rows_json(json: &str) -> Result<Vec<PlanRow>> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return Err(PlanDecodeError::EmptyOutput);
    }
    let rows: Vec<PlanRow> = serde_json::from_str(trimmed)?;
    if rows.is_empty() {
        return Err(PlanDecodeError::EmptyOutput);
    }
    Ok(rows)
}

fn decode_row(row: &Row) -> PlanRow {
    PlanRow {
        id: row.get_by_name("id").and_then(Value::as_i64).and_then(|v| u64::try_from(v).ok()),
        select_type: text(row, "select_type").unwrap_or_default(),
        table: text(row, "table"),
        access_type: text(row, "type"),
        possible_keys: text(row, "possible_keys"),
        used_key: text(row, "key"),
        key_length: text(row, "key_len"),
        reference: text(row, "ref"),
        rows_estimate: row
            .get_by_name("rows")
            .and_then(Value::as_i64)
            .and_then(|v| u64::try_from(v).ok()),
        filtered_percent: row.get_by_name("filtered").and_then(Value::as_f64),
        extra: text(row, "extra"),
    }
}

/// Text of a cell; SQL NULL, a literal "NULL" and blanks all read as absent
fn text(row: &Row, column: &str) -> Option<String> {
    row.get_by_name(column)
        .and_then(Value::to_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
}
