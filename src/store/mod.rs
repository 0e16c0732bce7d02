//! Record Store Adapter: one async interface over the document collection
//! and the local key-value blob.

mod document;
mod local;

pub use document::{
    readiness, DocumentCollection, DocumentStore, MemoryCollection, Readiness, ReadyNotifier,
    COLLECTION,
};
pub use local::{FileStorage, KeyValueStorage, LocalStore, MemoryStorage, STORAGE_KEY};

use crate::error::StoreResult;
use crate::models::{RecordId, TournamentDraft, TournamentRecord};
use async_trait::async_trait;

/// What a save should do: insert a new record or replace an existing one's editable fields.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveRequest {
    Create(TournamentDraft),
    Update(RecordId, TournamentDraft),
}

impl SaveRequest {
    pub fn is_update(&self) -> bool {
        matches!(self, SaveRequest::Update(..))
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, newest `createdAt` first.
    async fn load_all(&self) -> StoreResult<Vec<TournamentRecord>>;

    /// Persist one record and return it with id and timestamps filled in.
    async fn save(&self, request: SaveRequest) -> StoreResult<TournamentRecord>;

    async fn delete(&self, id: &RecordId) -> StoreResult<()>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
