//! Plan Analyzer - Warnings and Index Suggestions
//!
//! Inspects tabular EXPLAIN rows for full table scans, filesorts and
//! temporary tables, and proposes `CREATE INDEX` statements from a lexical
//! pass over the analyzed SQL text.

use super::columns::{clause_columns, qualified_columns};
use querybench_core::PlanRow;
use serde::{Deserialize, Serialize};

/// Severity level for plan warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    /// Critical issue that should be addressed immediately
    Critical,
    /// Warning that may impact performance
    Warning,
    /// Informational note
    Info,
}

impl SeverityLevel {
    pub fn is_critical(&self) -> bool {
        matches!(self, Self::Critical)
    }

    /// Returns true if this is at least a warning
    pub fn is_warning_or_above(&self) -> bool {
        matches!(self, Self::Critical | Self::Warning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// What a plan warning is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// `type = ALL`
    FullTableScan,
    /// `Extra` contains "Using filesort"
    Filesort,
    /// `Extra` contains "Using temporary"
    TemporaryTable,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTableScan => "full_table_scan",
            Self::Filesort => "filesort",
            Self::TemporaryTable => "temporary_table",
        }
    }
}

/// A single human-readable warning derived from one plan row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWarning {
    pub kind: WarningKind,
    pub severity: SeverityLevel,
    pub table: String,
    pub message: String,
}

/// Which heuristic produced an index suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionTrigger {
    WhereClause,
    JoinColumns,
    OrderBy,
    GroupBy,
}

impl SuggestionTrigger {
    /// Reason attached to suggestions of this trigger
    pub fn reason(&self) -> &'static str {
        match self {
            Self::WhereClause => "WHERE-clause columns lack an index",
            Self::JoinColumns => "JOIN columns lack an index",
            Self::OrderBy => "ORDER BY columns lack an index",
            Self::GroupBy => "GROUP BY columns lack an index",
        }
    }
}

/// A proposed index, with the DDL that creates it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSuggestion {
    pub table: String,
    /// Index columns in order
    pub columns: Vec<String>,
    pub reason: String,
    pub ddl: String,
    pub trigger: SuggestionTrigger,
}

impl IndexSuggestion {
    pub fn new(table: impl Into<String>, columns: Vec<String>, trigger: SuggestionTrigger) -> Self {
        let table = table.into();
        let ddl = index_ddl(&table, &columns);
        Self {
            table,
            columns,
            reason: trigger.reason().to_string(),
            ddl,
            trigger,
        }
    }
}

/// Build `CREATE INDEX idx_<table>_<cols> ON `<table>` (`c1`, `c2`)`
pub fn index_ddl(table: &str, columns: &[String]) -> String {
    let mut name = format!("idx_{}", table);
    for column in columns {
        name.push('_');
        name.push_str(column);
    }
    let name: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    let column_list = columns
        .iter()
        .map(|c| format!("`{}`", c))
        .collect::<Vec<_>>()
        .join(", ");

    format!("CREATE INDEX {} ON `{}` ({})", name, table, column_list)
}

/// Result of analyzing one statement's plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanAnalysis {
    /// The analyzed plan rows
    pub rows: Vec<PlanRow>,
    pub warnings: Vec<PlanWarning>,
    /// Working set of suggestions not yet applied
    pub suggestions: Vec<IndexSuggestion>,
    pub summary: String,
}

impl PlanAnalysis {
    pub fn has_critical_issues(&self) -> bool {
        self.warnings.iter().any(|w| w.severity.is_critical())
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings.iter().any(|w| w.severity.is_warning_or_above())
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.suggestions.is_empty()
    }

    pub fn find_suggestion(&self, ddl: &str) -> Option<&IndexSuggestion> {
        self.suggestions.iter().find(|s| s.ddl == ddl)
    }

    /// Removes every suggestion whose DDL matches exactly.
    ///
    /// Returns true if anything was removed.
    pub fn remove_suggestion(&mut self, ddl: &str) -> bool {
        let before = self.suggestions.len();
        self.suggestions.retain(|s| s.ddl != ddl);
        self.suggestions.len() != before
    }
}

/// Configuration for the plan analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    /// Maximum number of columns in a suggested index
    pub max_index_columns: usize,
    /// Full scans estimating at least this many rows are critical
    pub critical_row_threshold: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            max_index_columns: 3,
            critical_row_threshold: 10_000,
        }
    }
}

impl AdvisorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_index_columns(mut self, max: usize) -> Self {
        self.max_index_columns = max.max(1);
        self
    }

    pub fn with_critical_row_threshold(mut self, threshold: u64) -> Self {
        self.critical_row_threshold = threshold;
        self
    }
}

/// Plan analyzer producing warnings and index suggestions
#[derive(Debug, Clone, Default)]
pub struct PlanAnalyzer {
    config: AdvisorConfig,
}

impl PlanAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialized configs bypass the builders, so the column cap is
    /// clamped here too
    pub fn with_config(config: AdvisorConfig) -> Self {
        let max_index_columns = config.max_index_columns.max(1);
        Self {
            config: AdvisorConfig {
                max_index_columns,
                ..config
            },
        }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Analyzes EXPLAIN rows for `sql`
    pub fn analyze(&self, rows: Vec<PlanRow>, sql: &str) -> PlanAnalysis {
        let sql_lower = sql.to_lowercase();
        let mut analysis = PlanAnalysis {
            rows,
            ..Default::default()
        };

        for row in &analysis.rows {
            self.check_row(row, &mut analysis.warnings);
        }

        for row in &analysis.rows {
            self.suggest_for_full_scan(row, &sql_lower, &mut analysis.suggestions);
        }

        self.suggest_for_sorting(&analysis.rows, &sql_lower, &mut analysis.suggestions);

        analysis.summary = generate_summary(&analysis);

        tracing::debug!(
            rows = analysis.rows.len(),
            warnings = analysis.warnings.len(),
            suggestions = analysis.suggestions.len(),
            "analyzed plan"
        );

        analysis
    }

    fn check_row(&self, row: &PlanRow, warnings: &mut Vec<PlanWarning>) {
        let table = row.table_label();

        if row.is_full_scan() {
            let rows = row.rows_estimate.unwrap_or(0);
            let severity = if rows >= self.config.critical_row_threshold {
                SeverityLevel::Critical
            } else {
                SeverityLevel::Warning
            };
            let estimate = match row.rows_estimate {
                Some(rows) => rows.to_string(),
                None => "unknown".to_string(),
            };

            warnings.push(PlanWarning {
                kind: WarningKind::FullTableScan,
                severity,
                table: table.to_string(),
                message: format!(
                    "Full table scan on '{}' (~{} rows examined)",
                    table, estimate
                ),
            });
        }

        if row.uses_filesort() {
            warnings.push(PlanWarning {
                kind: WarningKind::Filesort,
                severity: SeverityLevel::Info,
                table: table.to_string(),
                message: format!("Sorting '{}' requires a filesort", table),
            });
        }

        if row.uses_temporary() {
            warnings.push(PlanWarning {
                kind: WarningKind::TemporaryTable,
                severity: SeverityLevel::Info,
                table: table.to_string(),
                message: format!("Query on '{}' uses a temporary table", table),
            });
        }
    }

    fn suggest_for_full_scan(
        &self,
        row: &PlanRow,
        sql_lower: &str,
        suggestions: &mut Vec<IndexSuggestion>,
    ) {
        if !row.is_full_scan() {
            return;
        }
        let Some(table) = row.table.as_deref() else {
            return;
        };

        let columns = qualified_columns(sql_lower, table, self.config.max_index_columns);
        if columns.is_empty() {
            return;
        }

        if row.has_no_key() {
            suggestions.push(IndexSuggestion::new(
                table,
                columns.clone(),
                SuggestionTrigger::WhereClause,
            ));
        }

        if row.reference.is_none() {
            suggestions.push(IndexSuggestion::new(
                table,
                columns,
                SuggestionTrigger::JoinColumns,
            ));
        }
    }

    // Attributed to the first row's table even when a later row carries the flag
    fn suggest_for_sorting(
        &self,
        rows: &[PlanRow],
        sql_lower: &str,
        suggestions: &mut Vec<IndexSuggestion>,
    ) {
        let sorting = rows.iter().any(|r| r.uses_filesort() || r.uses_temporary());
        if !sorting {
            return;
        }
        let Some(table) = rows.first().and_then(|r| r.table.as_deref()) else {
            return;
        };

        for (keyword, trigger) in [
            ("order by", SuggestionTrigger::OrderBy),
            ("group by", SuggestionTrigger::GroupBy),
        ] {
            let columns = clause_columns(sql_lower, keyword, self.config.max_index_columns);
            if !columns.is_empty() {
                suggestions.push(IndexSuggestion::new(table, columns, trigger));
            }
        }
    }
}

fn generate_summary(analysis: &PlanAnalysis) -> String {
    let critical = analysis
        .warnings
        .iter()
        .filter(|w| w.severity == SeverityLevel::Critical)
        .count();
    let warnings = analysis
        .warnings
        .iter()
        .filter(|w| w.severity == SeverityLevel::Warning)
        .count();
    let info = analysis
        .warnings
        .iter()
        .filter(|w| w.severity == SeverityLevel::Info)
        .count();
    let suggestions = analysis.suggestions.len();

    if analysis.is_clean() {
        "Query plan looks fine - no issues detected.".to_string()
    } else if critical > 0 {
        format!(
            "Plan has {} critical issue(s), {} warning(s) and {} note(s); {} index suggestion(s)",
            critical, warnings, info, suggestions
        )
    } else if warnings > 0 {
        format!(
            "Plan has {} warning(s) and {} note(s); {} index suggestion(s)",
            warnings, info, suggestions
        )
    } else {
        format!(
            "Plan has {} note(s); {} index suggestion(s)",
            info, suggestions
        )
    }
}
