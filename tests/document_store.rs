//! Integration tests for the document collection store and its ready signal.

use std::sync::Arc;
use tournament_admin::store::{
    readiness, DocumentStore, MemoryCollection, RecordStore, SaveRequest,
};
use tournament_admin::{
    Difficulty, Prizes, RecordId, Status, StoreError, TournamentDraft,
};

fn draft(title: &str) -> TournamentDraft {
    TournamentDraft {
        title: title.into(),
        subtitle: "Remote".into(),
        start_date: "2024-11-20T14:00".into(),
        duration: 4,
        prize_pool: 8000,
        max_participants: 150,
        difficulty: Difficulty::Expert,
        language: "C++/Java".into(),
        description: "Master complex data structures.".into(),
        rules: vec!["Duration: 4 Hours".into()],
        prizes: Prizes::new(50, 30, 20),
    }
}

async fn connected() -> (Arc<MemoryCollection>, DocumentStore<Arc<MemoryCollection>>) {
    let collection = Arc::new(MemoryCollection::new());
    let (notifier, ready) = readiness();
    assert!(notifier.ready(collection.clone()));
    let store = DocumentStore::connect(ready).await.unwrap();
    (collection, store)
}

#[tokio::test]
async fn connect_waits_for_the_ready_signal() {
    let (notifier, ready) = readiness();
    let waiter = tokio::spawn(DocumentStore::connect(ready));
    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());

    notifier.ready(MemoryCollection::new());
    let store = waiter.await.unwrap().unwrap();
    assert_eq!(store.collection_name(), "tournaments");
    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn connect_fails_when_backend_never_initializes() {
    let (notifier, ready) = readiness::<MemoryCollection>();
    drop(notifier);
    assert!(matches!(
        DocumentStore::connect(ready).await,
        Err(StoreError::Unavailable)
    ));
}

#[tokio::test]
async fn create_assigns_key_defaults_and_server_timestamp() {
    let (collection, store) = connected().await;
    let created = store.save(SaveRequest::Create(draft("DS Masters"))).await.unwrap();

    assert!(matches!(created.id, RecordId::Key(_)));
    assert_eq!(created.participants, 0);
    assert_eq!(created.status, Status::Open);
    assert!(created.subscribers.is_empty());
    assert!(created.updated_at.is_none());
    assert_eq!(created.draft(), draft("DS Masters"));
    assert_eq!(collection.len(), 1);
}

#[tokio::test]
async fn load_is_ordered_newest_first_by_the_collection() {
    let (_, store) = connected().await;
    for title in ["first", "second", "third"] {
        store.save(SaveRequest::Create(draft(title))).await.unwrap();
    }
    let titles: Vec<_> = store
        .load_all()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn update_replaces_editable_fields_and_stamps_updated_at() {
    let (_, store) = connected().await;
    let created = store.save(SaveRequest::Create(draft("Old"))).await.unwrap();

    let mut edited = created.draft();
    edited.title = "New".into();
    edited.rules = vec!["One".into(), "Two".into()];
    let updated = store
        .save(SaveRequest::Update(created.id.clone(), edited.clone()))
        .await
        .unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.draft(), edited);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at.unwrap() > created.created_at);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (_, store) = connected().await;
    let missing = RecordId::Key("missing".into());
    assert!(matches!(
        store.save(SaveRequest::Update(missing.clone(), draft("x"))).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(store.delete(&missing).await, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn offline_backend_reports_transport_errors() {
    let (collection, store) = connected().await;
    let created = store.save(SaveRequest::Create(draft("Kept"))).await.unwrap();

    collection.set_offline(Some("permission denied"));
    let err = store.delete(&created.id).await.unwrap_err();
    assert_eq!(err.to_string(), "Transport error: permission denied");
    assert!(store.load_all().await.is_err());

    collection.set_offline(None);
    assert_eq!(store.load_all().await.unwrap().len(), 1);
}
