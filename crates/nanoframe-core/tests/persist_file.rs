use nanoframe_core::{FileStore, MemStore, Persistence};
use tempfile::TempDir;

#[test]
fn file_store_round_trips_across_instances() {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::new(tmp.path()).unwrap();
    assert_eq!(store.get("nano_api_key"), None);
    store.set("nano_api_key", "sk-123").unwrap();

    let reopened = FileStore::new(tmp.path()).unwrap();
    assert_eq!(reopened.get("nano_api_key").as_deref(), Some("sk-123"));
    assert_eq!(reopened.get("missing"), None);
}

#[test]
fn file_store_last_write_wins() {
    let tmp = TempDir::new().unwrap();
    let store = FileStore::new(tmp.path()).unwrap();
    store.set("k", "first").unwrap();
    store.set("k", "second").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("second"));
    let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
        .collect();
    assert!(leftovers.is_empty(), "no temp files left behind");
}

#[test]
fn mem_store_overwrites_in_place() {
    let store = MemStore::new();
    assert_eq!(store.get("k"), None);
    store.set("k", "a").unwrap();
    store.set("k", "b").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("b"));
}
