//! Favorites store round-trips against a real temporary directory

use pokesearch::persist::FavoritesStore;
use tempfile::tempdir;

#[tokio::test]
async fn test_roundtrip_preserves_order() {
    let dir = tempdir().expect("temp dir");
    let store = FavoritesStore::new(dir.path().join("favorites.json"));

    let names = vec![
        "pikachu".to_string(),
        "eevee".to_string(),
        "snorlax".to_string(),
    ];
    store.save(&names).await.expect("save");

    assert_eq!(store.load().await.expect("load"), names);
}

#[tokio::test]
async fn test_missing_file_is_empty_list() {
    let dir = tempdir().expect("temp dir");
    let store = FavoritesStore::new(dir.path().join("favorites.json"));

    assert!(store.load().await.expect("load").is_empty());
}

#[tokio::test]
async fn test_save_rewrites_whole_list() {
    let dir = tempdir().expect("temp dir");
    let store = FavoritesStore::new(dir.path().join("favorites.json"));

    store
        .save(&["pikachu".to_string(), "eevee".to_string()])
        .await
        .expect("save");
    store.save(&["eevee".to_string()]).await.expect("save");

    assert_eq!(store.load().await.expect("load"), vec!["eevee".to_string()]);
}

#[tokio::test]
async fn test_corrupted_file_reports_error() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("favorites.json");
    tokio::fs::write(&path, "not json").await.expect("write");

    let store = FavoritesStore::new(path);
    assert!(store.load().await.is_err());
}

#[tokio::test]
async fn test_save_creates_missing_directories() {
    let dir = tempdir().expect("temp dir");
    let store = FavoritesStore::new(dir.path().join("nested").join("favorites.json"));

    store.save(&["pikachu".to_string()]).await.expect("save");
    assert_eq!(
        store.load().await.expect("load"),
        vec!["pikachu".to_string()]
    );
}
