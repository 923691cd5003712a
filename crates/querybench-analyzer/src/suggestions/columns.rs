//! Lexical column extraction
//!
//! These helpers scan lowercased SQL text with regular expressions. They do
//! not understand the grammar: aliases, subqueries and string literals can
//! all produce false positives or misses.

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[a-z_][a-z0-9_$]*(?:\.[a-z_][a-z0-9_$]*)*").expect("valid identifier pattern")
});

static LIMIT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\blimit\b").expect("valid limit pattern"));

/// Words skipped when collecting ORDER BY / GROUP BY columns
const CLAUSE_STOP_WORDS: &[&str] = &["asc", "desc", "and", "or", "by"];

/// Collect up to `limit` distinct identifiers written as `<table>.<identifier>`.
///
/// `sql_lower` must already be lowercased. Backtick quoting around either
/// part is accepted. Order of first appearance is preserved.
pub fn qualified_columns(sql_lower: &str, table: &str, limit: usize) -> Vec<String> {
    let table = table.to_lowercase();
    if table.is_empty() || limit == 0 {
        return Vec::new();
    }

    let pattern = format!(
        r"(?:^|[^a-z0-9_$])`?{}`?\.`?([a-z_][a-z0-9_$]*)",
        regex::escape(&table)
    );
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };

    let mut columns: Vec<String> = Vec::new();
    for caps in re.captures_iter(sql_lower) {
        let Some(column) = caps.get(1) else {
            continue;
        };
        push_distinct(&mut columns, column.as_str());
        if columns.len() >= limit {
            break;
        }
    }
    columns
}

/// Collect up to `limit` distinct bare identifiers following `keyword`
/// (e.g. `"order by"`), stopping at the next `limit` keyword or the end.
///
/// Qualified names contribute their last segment. `asc`, `desc`, `and`,
/// `or` and `by` are skipped.
pub fn clause_columns(sql_lower: &str, keyword: &str, limit: usize) -> Vec<String> {
    let words: Vec<String> = keyword.split_whitespace().map(regex::escape).collect();
    if words.is_empty() || limit == 0 {
        return Vec::new();
    }
    let Ok(keyword_re) = Regex::new(&format!(r"\b{}\b", words.join(r"\s+"))) else {
        return Vec::new();
    };
    let Some(found) = keyword_re.find(sql_lower) else {
        return Vec::new();
    };

    let tail = &sql_lower[found.end()..];
    let clause = match LIMIT_KEYWORD.find(tail) {
        Some(limit_kw) => &tail[..limit_kw.start()],
        None => tail,
    };

    let mut columns: Vec<String> = Vec::new();
    for ident in IDENTIFIER.find_iter(clause) {
        let name = ident.as_str().rsplit('.').next().unwrap_or(ident.as_str());
        if CLAUSE_STOP_WORDS.contains(&name) {
            continue;
        }
        push_distinct(&mut columns, name);
        if columns.len() >= limit {
            break;
        }
    }
    columns
}

fn push_distinct(columns: &mut Vec<String>, name: &str) {
    if !columns.iter().any(|c| c == name) {
        columns.push(name.to_string());
    }
}
