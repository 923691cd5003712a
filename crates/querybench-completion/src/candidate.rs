//! Completion candidates

use crate::word::WordSpan;
use lsp_types::{CompletionItem, CompletionItemKind, CompletionTextEdit, Position, Range, TextEdit};
use serde::{Deserialize, Serialize};

/// What a candidate refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionKind {
    Database,
    Table,
    Column,
}

impl CompletionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Table => "table",
            Self::Column => "column",
        }
    }

    fn lsp_kind(&self) -> CompletionItemKind {
        match self {
            Self::Database => CompletionItemKind::MODULE,
            Self::Table => CompletionItemKind::CLASS,
            Self::Column => CompletionItemKind::FIELD,
        }
    }
}

/// A single suggestion. Recomputed on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCandidate {
    pub label: String,
    pub kind: CompletionKind,
    pub insert_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CompletionCandidate {
    pub fn new(label: impl Into<String>, kind: CompletionKind) -> Self {
        let label = label.into();
        Self {
            insert_text: label.clone(),
            label,
            kind,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Convert to an LSP item whose edit replaces exactly `span`.
    ///
    /// `position` keeps the resolver's order when the editor sorts by
    /// `sort_text`.
    pub fn to_lsp(&self, span: &WordSpan, position: usize) -> CompletionItem {
        let range = Range {
            start: Position::new(span.line as u32, span.start as u32),
            end: Position::new(span.line as u32, span.end as u32),
        };
        CompletionItem {
            label: self.label.clone(),
            kind: Some(self.kind.lsp_kind()),
            detail: self.detail.clone(),
            sort_text: Some(format!("{:05}", position)),
            filter_text: Some(self.label.clone()),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range,
                new_text: self.insert_text.clone(),
            })),
            ..Default::default()
        }
    }
}

/// Result of a completion request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompletionList {
    /// The word under the cursor that a chosen candidate replaces
    pub word: String,
    pub span: WordSpan,
    pub candidates: Vec<CompletionCandidate>,
}

impl CompletionList {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Candidates of one kind, in order
    pub fn of_kind(&self, kind: CompletionKind) -> impl Iterator<Item = &CompletionCandidate> {
        self.candidates.iter().filter(move |c| c.kind == kind)
    }

    pub fn to_lsp_items(&self) -> Vec<CompletionItem> {
        self.candidates
            .iter()
            .enumerate()
            .map(|(i, candidate)| candidate.to_lsp(&self.span, i))
            .collect()
    }
}
