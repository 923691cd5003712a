//! Completion resolution against the metadata cache

use crate::candidate::{CompletionCandidate, CompletionKind, CompletionList};
use crate::word::word_at;
use querybench_schema::MetadataCache;
use std::collections::HashSet;
use uuid::Uuid;

/// Everything needed to answer one completion request
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub text: &'a str,
    /// 0-based line of the cursor
    pub line: usize,
    /// 0-based character column of the cursor
    pub column: usize,
    pub connection_id: Option<Uuid>,
    pub database: Option<&'a str>,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(text: &'a str, line: usize, column: usize) -> Self {
        Self {
            text,
            line,
            column,
            connection_id: None,
            database: None,
        }
    }

    pub fn with_connection(mut self, connection_id: Option<Uuid>, database: Option<&'a str>) -> Self {
        self.connection_id = connection_id;
        self.database = database;
        self
    }
}

/// Resolves completion candidates from cached schema metadata.
///
/// Column candidates come from every cached table of the bound database, not
/// only from tables referenced by the statement. There is no scoring: the
/// editor filters the list against the extracted word.
#[derive(Debug, Clone, Copy)]
pub struct CompletionResolver<'a> {
    cache: &'a MetadataCache,
}

impl<'a> CompletionResolver<'a> {
    pub fn new(cache: &'a MetadataCache) -> Self {
        Self { cache }
    }

    pub fn resolve(&self, request: &CompletionRequest<'_>) -> CompletionList {
        let (word, span) = word_at(request.text, request.line, request.column);
        let mut candidates = Vec::new();

        if let Some(connection_id) = request.connection_id {
            for database in self.cache.get_databases(connection_id) {
                candidates.push(CompletionCandidate::new(database.name, CompletionKind::Database));
            }

            if let Some(database) = request.database {
                let tables = self.cache.get_tables(connection_id, database);
                for table in &tables {
                    candidates.push(
                        CompletionCandidate::new(table.name.clone(), CompletionKind::Table)
                            .with_detail(table.kind.as_str()),
                    );
                }

                for table in &tables {
                    for column in self.cache.get_columns(connection_id, database, &table.name) {
                        let detail = format!("{}.{}", table.name, column.declared_type);
                        candidates.push(
                            CompletionCandidate::new(column.name, CompletionKind::Column)
                                .with_detail(detail),
                        );
                    }
                }
            }
        }

        let candidates = dedup(candidates);
        tracing::trace!(word = %word, candidates = candidates.len(), "resolved completions");

        CompletionList {
            word,
            span,
            candidates,
        }
    }
}

/// Keep the first candidate for each (kind, label)
fn dedup(candidates: Vec<CompletionCandidate>) -> Vec<CompletionCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.kind, c.label.clone())))
        .collect()
}

#[cfg(test)]
mod tests;
