use datagrid_lib::column::{Column, ColumnSpec};
use datagrid_lib::store::{ColumnStore, SqliteBackend, StoreBackend, widget_key};

#[tokio::test]
async fn test_columns_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("columns.db");
    let key = widget_key(None, "https://example.com/api/people");

    let columns = vec![
        Column::resolve(&ColumnSpec::field("name").title("Name")),
        Column::resolve(&ColumnSpec::field("age").title("Age").hidden(true)),
    ];

    {
        let store = ColumnStore::new(SqliteBackend::open(&path).await.unwrap());
        store.save(&key, &columns).await.unwrap();
    }

    let store = ColumnStore::new(SqliteBackend::open(&path).await.unwrap());
    let loaded = store.load(&key).await.unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].title.as_deref(), Some("Name"));
    assert_eq!(loaded[1].hidden, Some(true));

    store.forget(&key).await.unwrap();
    assert!(store.load(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_overwrite_replaces_payload() {
    let dir = tempfile::tempdir().unwrap();
    let backend = SqliteBackend::open(dir.path().join("columns.db")).await.unwrap();

    backend.set("k", "[]".to_string()).await.unwrap();
    backend.set("k", "[{}]".to_string()).await.unwrap();
    assert_eq!(backend.get("k").await.unwrap().as_deref(), Some("[{}]"));

    backend.delete("k").await.unwrap();
    assert_eq!(backend.get("k").await.unwrap(), None);
    assert_eq!(backend.get("missing").await.unwrap(), None);
}
