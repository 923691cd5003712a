//! Querybench Completion - schema-aware SQL completion
//!
//! Turns a cursor position, the buffer text and the cached schema metadata
//! into an ordered candidate list: databases, then tables, then columns.
//! Resolution is synchronous and reads only the metadata cache; a scope that
//! has not been fetched yet simply contributes nothing.

mod candidate;
mod resolver;
mod word;

pub use candidate::{CompletionCandidate, CompletionKind, CompletionList};
pub use resolver::{CompletionRequest, CompletionResolver};
pub use word::{WordSpan, word_at};
