use bytes::Bytes;
use portfolio_site::object_store::{LocalStore, ObjectStore, ObjectStoreError};

fn test_store(dir: &tempfile::TempDir) -> LocalStore {
    LocalStore::new(dir.path(), "http://localhost:8080/").unwrap()
}

#[tokio::test]
async fn test_local_store_put_get() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let data = Bytes::from("hello world");
    store
        .put("1700000000000-hello.txt", data.clone(), "text/plain")
        .await
        .unwrap();

    let retrieved = store.get("1700000000000-hello.txt").await.unwrap();
    assert_eq!(retrieved, data);
}

#[tokio::test]
async fn test_local_store_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    assert_eq!(
        store.public_url("17-a.png"),
        "http://localhost:8080/media/17-a.png"
    );
}

#[tokio::test]
async fn test_local_store_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    store
        .put("to-delete", Bytes::from("data"), "text/plain")
        .await
        .unwrap();
    store.delete("to-delete").await.unwrap();

    assert!(matches!(
        store.get("to-delete").await,
        Err(ObjectStoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_local_store_delete_nonexistent() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    // Deleting a nonexistent key should not error
    store.delete("nonexistent").await.unwrap();
}

#[tokio::test]
async fn test_local_store_delete_many() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    for key in ["a.png", "b.png", "c.png"] {
        store.put(key, Bytes::from(key), "image/png").await.unwrap();
    }

    store
        .delete_many(&["a.png".to_string(), "missing.png".to_string(), "c.png".to_string()])
        .await
        .unwrap();

    assert!(store.get("a.png").await.is_err());
    assert_eq!(store.get("b.png").await.unwrap(), Bytes::from("b.png"));
    assert!(store.get("c.png").await.is_err());
}

#[tokio::test]
async fn test_local_store_delete_many_attempts_every_key() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    store.put("keep-going.png", Bytes::from("x"), "image/png").await.unwrap();

    let result = store
        .delete_many(&["../escape".to_string(), "keep-going.png".to_string()])
        .await;
    assert!(matches!(result, Err(ObjectStoreError::InvalidKey(_))));
    assert!(store.get("keep-going.png").await.is_err());
}

#[tokio::test]
async fn test_local_store_get_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    let result = store.get("missing").await;
    assert!(matches!(result, Err(ObjectStoreError::NotFound(_))));
}

#[tokio::test]
async fn test_local_store_rejects_nested_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    for key in ["../outside", "nested/key", "/etc/passwd", "", "."] {
        let result = store.put(key, Bytes::from("x"), "text/plain").await;
        assert!(
            matches!(result, Err(ObjectStoreError::InvalidKey(_))),
            "key {key:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_local_store_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let store = test_store(&dir);

    store.put("key", Bytes::from("first"), "text/plain").await.unwrap();
    store.put("key", Bytes::from("second"), "text/plain").await.unwrap();

    let data = store.get("key").await.unwrap();
    assert_eq!(data, Bytes::from("second"));
}
