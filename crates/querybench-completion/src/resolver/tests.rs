//! Tests for completion resolution

use super::*;
use lsp_types::{CompletionItemKind, CompletionTextEdit};
use pretty_assertions::assert_eq;
use querybench_core::{ColumnEntry, DatabaseEntry, TableEntry, TableKind};

fn shop_cache(conn: Uuid) -> MetadataCache {
    let cache = MetadataCache::new();
    cache.set_databases(conn, vec![DatabaseEntry::new("shop")]);
    cache.set_tables(conn, "shop", vec![TableEntry::new("users", TableKind::Table)]);
    cache.set_columns(
        conn,
        "shop",
        "users",
        vec![ColumnEntry::new("id", "int"), ColumnEntry::new("name", "varchar(255)")],
    );
    cache
}

fn summary(list: &CompletionList) -> Vec<(CompletionKind, &str)> {
    list.candidates
        .iter()
        .map(|c| (c.kind, c.label.as_str()))
        .collect()
}

#[test]
fn test_bound_tab_gets_databases_tables_then_columns() {
    let conn = Uuid::new_v4();
    let cache = shop_cache(conn);
    let request = CompletionRequest::new("SELECT ", 0, 7).with_connection(Some(conn), Some("shop"));

    let list = CompletionResolver::new(&cache).resolve(&request);

    assert_eq!(
        summary(&list),
        vec![
            (CompletionKind::Database, "shop"),
            (CompletionKind::Table, "users"),
            (CompletionKind::Column, "id"),
            (CompletionKind::Column, "name"),
        ]
    );
    assert_eq!(list.word, "");
}

#[test]
fn test_details() {
    let conn = Uuid::new_v4();
    let cache = shop_cache(conn);
    let request = CompletionRequest::new("SELECT ", 0, 7).with_connection(Some(conn), Some("shop"));

    let list = CompletionResolver::new(&cache).resolve(&request);

    assert_eq!(list.candidates[0].detail, None);
    assert_eq!(list.candidates[1].detail.as_deref(), Some("table"));
    assert_eq!(list.candidates[2].detail.as_deref(), Some("users.int"));
    assert_eq!(list.candidates[3].detail.as_deref(), Some("users.varchar(255)"));
}

#[test]
fn test_unbound_tab_gets_nothing() {
    let conn = Uuid::new_v4();
    let cache = shop_cache(conn);

    let list = CompletionResolver::new(&cache).resolve(&CompletionRequest::new("SELECT ", 0, 7));

    assert!(list.is_empty());
}

#[test]
fn test_connection_without_database_gets_databases_only() {
    let conn = Uuid::new_v4();
    let cache = shop_cache(conn);
    let request = CompletionRequest::new("USE ", 0, 4).with_connection(Some(conn), None);

    let list = CompletionResolver::new(&cache).resolve(&request);

    assert_eq!(summary(&list), vec![(CompletionKind::Database, "shop")]);
}

#[test]
fn test_columns_come_from_every_cached_table() {
    let conn = Uuid::new_v4();
    let cache = shop_cache(conn);
    cache.set_tables(
        conn,
        "shop",
        vec![
            TableEntry::new("users", TableKind::Table),
            TableEntry::new("orders", TableKind::Table),
        ],
    );
    cache.set_columns(conn, "shop", "users", vec![ColumnEntry::new("id", "int")]);
    cache.set_columns(conn, "shop", "orders", vec![ColumnEntry::new("total", "decimal(10,2)")]);

    // Statement only mentions `users`; `orders` columns are still offered
    let request = CompletionRequest::new("SELECT  FROM users", 0, 7).with_connection(Some(conn), Some("shop"));
    let list = CompletionResolver::new(&cache).resolve(&request);

    let columns: Vec<&str> = list
        .of_kind(CompletionKind::Column)
        .map(|c| c.label.as_str())
        .collect();
    assert_eq!(columns, vec!["id", "total"]);
}

#[test]
fn test_missing_scopes_contribute_nothing() {
    let conn = Uuid::new_v4();
    let cache = MetadataCache::new();
    cache.set_tables(conn, "shop", vec![TableEntry::new("users", TableKind::Table)]);

    let request = CompletionRequest::new("SELECT ", 0, 7).with_connection(Some(conn), Some("shop"));
    let list = CompletionResolver::new(&cache).resolve(&request);

    assert_eq!(summary(&list), vec![(CompletionKind::Table, "users")]);
}

#[test]
fn test_duplicate_columns_collapse() {
    let conn = Uuid::new_v4();
    let cache = MetadataCache::new();
    cache.set_tables(
        conn,
        "shop",
        vec![
            TableEntry::new("users", TableKind::Table),
            TableEntry::new("orders", TableKind::Table),
        ],
    );
    cache.set_columns(conn, "shop", "users", vec![ColumnEntry::new("id", "int")]);
    cache.set_columns(
        conn,
        "shop",
        "orders",
        vec![ColumnEntry::new("id", "bigint"), ColumnEntry::new("user_id", "int")],
    );

    let request = CompletionRequest::new("", 0, 0).with_connection(Some(conn), Some("shop"));
    let list = CompletionResolver::new(&cache).resolve(&request);
    let columns: Vec<_> = list.of_kind(CompletionKind::Column).collect();

    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].detail.as_deref(), Some("users.int"));
    assert_eq!(columns[1].label, "user_id");
}

#[test]
fn test_lsp_items_replace_current_word() {
    let conn = Uuid::new_v4();
    let cache = shop_cache(conn);
    let request = CompletionRequest::new("SELECT na", 0, 9).with_connection(Some(conn), Some("shop"));

    let list = CompletionResolver::new(&cache).resolve(&request);
    assert_eq!(list.word, "na");

    let items = list.to_lsp_items();
    let name = items.iter().find(|i| i.label == "name").unwrap();
    assert_eq!(name.kind, Some(CompletionItemKind::FIELD));
    assert_eq!(name.sort_text.as_deref(), Some("00003"));
    match name.text_edit.as_ref().unwrap() {
        CompletionTextEdit::Edit(edit) => {
            assert_eq!(edit.range.start.character, 7);
            assert_eq!(edit.range.end.character, 9);
            assert_eq!(edit.new_text, "name");
        }
        other => panic!("unexpected edit {:?}", other),
    }
}
