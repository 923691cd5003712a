//! Querybench Schema - metadata cache for schema-aware tooling
//!
//! The cache memoizes database, table and column listings per connection so
//! completion never waits on the network. Scopes are filled from a
//! `SchemaSource` and replaced wholesale on every successful refresh.

mod cache;

pub use cache::MetadataCache;
