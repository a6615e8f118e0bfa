//! Domain store tests against the SQLite backend
//!
//! Exercises the whole-value contract through a real database file so that
//! values survive reopening the store.

use journey_common::models::{LocationType, StoredLocation, StoredPhoto, SyncMeta};
use journey_common::store::SqliteKvStore;
use journey_common::DomainStore;
use std::sync::Arc;

async fn open_store(path: &std::path::Path) -> DomainStore {
    let kv = SqliteKvStore::open(path).await.expect("Should open database");
    DomainStore::new(Arc::new(kv))
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("journey.db");

    {
        let store = open_store(&db_path).await;

        store
            .store_photos(&[StoredPhoto {
                id: "p1".to_string(),
                caption: "Our trip!".to_string(),
                taken_at: "2019-06-01T12:00:00Z".to_string(),
                lat: 0.0,
                lng: 0.0,
                contributor: Some("Pranav Kumar".to_string()),
            }])
            .await
            .unwrap();
        store
            .store_locations(&[StoredLocation {
                id: "paris-2019".to_string(),
                name: "Paris".to_string(),
                lat: 0.0,
                lng: 0.0,
                kind: LocationType::Pranav,
                year: 2019,
                photo_ids: vec!["p1".to_string()],
            }])
            .await
            .unwrap();
        store
            .store_meta(&SyncMeta {
                last_synced: "2024-01-01T00:00:00.000Z".to_string(),
                album_id: "album".to_string(),
                total_photos: 1,
                years: vec![2019],
            })
            .await
            .unwrap();
        store.set_caption("p1", "Edited").await.unwrap();
    }

    assert!(db_path.exists(), "Database file was not created");

    let store = open_store(&db_path).await;

    let photos = store.photos().await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].contributor.as_deref(), Some("Pranav Kumar"));

    let locations = store.locations().await.unwrap();
    assert_eq!(locations[0].kind, LocationType::Pranav);
    assert_eq!(locations[0].photo_ids, vec!["p1".to_string()]);

    let meta = store.meta().await.unwrap().expect("meta stored");
    assert_eq!(meta.years, vec![2019]);

    assert_eq!(store.captions().await.unwrap()["p1"], "Edited");
}

#[tokio::test]
async fn test_fresh_database_reads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir.path().join("journey.db")).await;

    assert!(store.locations().await.unwrap().is_empty());
    assert!(store.photos().await.unwrap().is_empty());
    assert!(store.captions().await.unwrap().is_empty());
    assert!(store.meta().await.unwrap().is_none());
}

#[tokio::test]
async fn test_caption_edits_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir.path().join("journey.db")).await;

    store.set_caption("a", "one").await.unwrap();
    store.set_caption("b", "two").await.unwrap();
    store.set_caption("a", "three").await.unwrap();

    let captions = store.captions().await.unwrap();
    assert_eq!(captions.len(), 2);
    assert_eq!(captions["a"], "three");
    assert_eq!(captions["b"], "two");
}
