//! Integration tests for the local key-value store.

use std::sync::Arc;
use tournament_admin::store::{
    FileStorage, KeyValueStorage, LocalStore, MemoryStorage, RecordStore, SaveRequest,
    STORAGE_KEY,
};
use tournament_admin::{
    Difficulty, Prizes, RecordId, Status, StoreError, TournamentDraft, TournamentRecord,
};

fn draft(title: &str) -> TournamentDraft {
    TournamentDraft {
        title: title.into(),
        subtitle: "Weekly".into(),
        start_date: "2024-11-15T10:00".into(),
        duration: 3,
        prize_pool: 5000,
        max_participants: 200,
        difficulty: Difficulty::Hard,
        language: "Any".into(),
        description: "desc".into(),
        rules: vec!["Duration: 3 Hours".into(), "Scoring: Speed".into()],
        prizes: Prizes::new(60, 25, 15),
    }
}

fn empty_store() -> LocalStore<Arc<MemoryStorage>> {
    LocalStore::new(Arc::new(MemoryStorage::new())).seeded(false)
}

#[tokio::test]
async fn seeds_defaults_until_first_save() {
    let storage = Arc::new(MemoryStorage::new());
    let store = LocalStore::new(storage.clone());

    let records = store.load_all().await.unwrap();
    let titles: Vec<_> = records.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Web Dev Championship", "Data Structure Masters", "Algorithm Sprint"]
    );
    assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);

    store.save(SaveRequest::Create(draft("New"))).await.unwrap();
    let stored: Vec<TournamentRecord> =
        serde_json::from_str(&storage.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 4);
}

#[tokio::test]
async fn save_then_reload_round_trips_editable_fields() {
    let store = empty_store();
    let created = store.save(SaveRequest::Create(draft("Cup"))).await.unwrap();
    assert!(matches!(created.id, RecordId::Seq(_)));
    assert_eq!(created.participants, 0);
    assert_eq!(created.status, Status::Open);
    assert!(created.updated_at.is_none());

    let reloaded = store.load_all().await.unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].draft(), draft("Cup"));
    assert_eq!(reloaded[0], created);
}

#[tokio::test]
async fn newest_first_and_ids_unique() {
    let store = empty_store();
    let a = store.save(SaveRequest::Create(draft("A"))).await.unwrap();
    let b = store.save(SaveRequest::Create(draft("B"))).await.unwrap();
    let c = store.save(SaveRequest::Create(draft("C"))).await.unwrap();
    assert!(a.id != b.id && b.id != c.id && a.id != c.id);

    let titles: Vec<_> = store
        .load_all()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["C", "B", "A"]);
}

#[tokio::test]
async fn update_keeps_store_maintained_fields() {
    let store = LocalStore::new(Arc::new(MemoryStorage::new()));
    let before = store
        .load_all()
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.id == RecordId::Seq(3))
        .unwrap();

    let mut edited = before.draft();
    edited.title = "Web Dev Open".into();
    let saved = store
        .save(SaveRequest::Update(RecordId::Seq(3), edited.clone()))
        .await
        .unwrap();

    assert_eq!(saved.draft(), edited);
    assert_eq!(saved.participants, 156);
    assert_eq!(saved.status, Status::Ongoing);
    assert_eq!(saved.created_at, before.created_at);
    assert!(saved.updated_at.is_some());
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let store = empty_store();
    let err = store
        .save(SaveRequest::Update(RecordId::Seq(99), draft("X")))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(RecordId::Seq(99))));
}

#[tokio::test]
async fn delete_removes_only_the_target() {
    let store = empty_store();
    let a = store.save(SaveRequest::Create(draft("A"))).await.unwrap();
    let b = store.save(SaveRequest::Create(draft("B"))).await.unwrap();
    store.delete(&a.id).await.unwrap();
    let left = store.load_all().await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, b.id);
}

#[tokio::test]
async fn quota_exceeded_surfaces_and_keeps_old_blob() {
    let storage = Arc::new(MemoryStorage::with_quota(64));
    let store = LocalStore::new(storage.clone()).seeded(false);
    let err = store
        .save(SaveRequest::Create(draft("Too big for the quota")))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::QuotaExceeded { quota: 64, .. }));
    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn corrupt_blob_is_a_serialization_error() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set(STORAGE_KEY, "{not json").unwrap();
    let store = LocalStore::new(storage);
    assert!(matches!(
        store.load_all().await,
        Err(StoreError::Serialization(_))
    ));
}

#[tokio::test]
async fn file_storage_persists_integer_ids() {
    let dir = std::env::temp_dir().join(format!("tournament-admin-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    {
        let store = LocalStore::new(FileStorage::new(&dir)).seeded(false);
        store.save(SaveRequest::Create(draft("On disk"))).await.unwrap();
    }

    let raw = std::fs::read_to_string(dir.join(format!("{}.json", STORAGE_KEY))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value[0]["id"].is_i64());
    assert_eq!(value[0]["prizes"]["first"], 60);

    let reopened = LocalStore::new(FileStorage::new(&dir)).seeded(false);
    let records = reopened.load_all().await.unwrap();
    assert_eq!(records[0].title, "On disk");
    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_file_saves_all_land() {
    let dir = std::env::temp_dir().join(format!("tournament-admin-concurrent-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let store = Arc::new(LocalStore::new(FileStorage::new(&dir)).seeded(false));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .save(SaveRequest::Create(draft(&format!("Cup {}", i))))
                    .await
            })
        })
        .collect();
    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.sort_by_key(|id| id.to_string());
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(store.load_all().await.unwrap().len(), 8);
    let _ = std::fs::remove_dir_all(&dir);
}
