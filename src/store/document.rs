//! Remote variant: tournaments kept as documents in a collection.

use crate::error::{StoreError, StoreResult};
use crate::models::{RecordId, TournamentRecord};
use crate::store::{RecordStore, SaveRequest};
use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use tokio::sync::oneshot;
use uuid::Uuid;

/// Collection holding the tournament documents.
pub const COLLECTION: &str = "tournaments";

const CREATED_AT: &str = "createdAt";
const UPDATED_AT: &str = "updatedAt";

pub type Document = Map<String, Value>;

/// A document collection with generated ids, server timestamps and ordered queries.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Insert a document, stamping `timestamp_field` with server time. Returns the new id.
    async fn add(&self, fields: Document, timestamp_field: &str) -> StoreResult<String>;

    /// Merge `fields` into an existing document and stamp `timestamp_field`.
    async fn update(&self, id: &str, fields: Document, timestamp_field: &str) -> StoreResult<()>;

    async fn get(&self, id: &str) -> StoreResult<Option<Document>>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    /// All documents ordered by `field`.
    async fn list_ordered(&self, field: &str, descending: bool) -> StoreResult<Vec<(String, Document)>>;
}

#[async_trait]
impl<C: DocumentCollection + ?Sized> DocumentCollection for Arc<C> {
    async fn add(&self, fields: Document, timestamp_field: &str) -> StoreResult<String> {
        (**self).add(fields, timestamp_field).await
    }

    async fn update(&self, id: &str, fields: Document, timestamp_field: &str) -> StoreResult<()> {
        (**self).update(id, fields, timestamp_field).await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Document>> {
        (**self).get(id).await
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        (**self).delete(id).await
    }

    async fn list_ordered(&self, field: &str, descending: bool) -> StoreResult<Vec<(String, Document)>> {
        (**self).list_ordered(field, descending).await
    }
}

/// Sending half of the backend-ready signal.
pub struct ReadyNotifier<C>(oneshot::Sender<C>);

/// Receiving half; resolves once with the initialized collection.
pub struct Readiness<C>(oneshot::Receiver<C>);

pub fn readiness<C>() -> (ReadyNotifier<C>, Readiness<C>) {
    let (tx, rx) = oneshot::channel();
    (ReadyNotifier(tx), Readiness(rx))
}

impl<C> ReadyNotifier<C> {
    /// Hand over the collection. Returns false if nobody is waiting anymore.
    pub fn ready(self, collection: C) -> bool {
        self.0.send(collection).is_ok()
    }
}

impl<C> Readiness<C> {
    pub async fn wait(self) -> StoreResult<C> {
        self.0.await.map_err(|_| StoreError::Unavailable)
    }
}

/// Record store over a [`DocumentCollection`]. Ordering is left to the collection.
pub struct DocumentStore<C> {
    collection: C,
}

impl<C: DocumentCollection> DocumentStore<C> {
    /// Wait for the backend to signal it is initialized, once.
    pub async fn connect(readiness: Readiness<C>) -> StoreResult<Self> {
        log::info!("Waiting for document backend to initialize...");
        let collection = readiness.wait().await?;
        log::info!("Document backend ready (collection '{}')", COLLECTION);
        Ok(Self { collection })
    }

    pub fn collection_name(&self) -> &'static str {
        COLLECTION
    }

    async fn fetch(&self, id: &str) -> StoreResult<TournamentRecord> {
        let doc = self
            .collection
            .get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(RecordId::Key(id.to_string())))?;
        to_record(id, doc)
    }
}

#[async_trait]
impl<C: DocumentCollection> RecordStore for DocumentStore<C> {
    async fn load_all(&self) -> StoreResult<Vec<TournamentRecord>> {
        let docs = self.collection.list_ordered(CREATED_AT, true).await?;
        log::debug!("Loaded {} tournament document(s)", docs.len());
        docs.into_iter().map(|(id, doc)| to_record(&id, doc)).collect()
    }

    async fn save(&self, request: SaveRequest) -> StoreResult<TournamentRecord> {
        match request {
            SaveRequest::Create(draft) => {
                let mut fields = to_document(&draft)?;
                fields.insert("participants".into(), Value::from(0));
                fields.insert("status".into(), Value::from("open"));
                fields.insert("subscribers".into(), Value::Array(Vec::new()));
                let id = self.collection.add(fields, CREATED_AT).await?;
                log::info!("Tournament created with id {}", id);
                self.fetch(&id).await
            }
            SaveRequest::Update(id, draft) => {
                let key = id.to_string();
                let fields = to_document(&draft)?;
                self.collection.update(&key, fields, UPDATED_AT).await?;
                log::info!("Tournament {} updated", key);
                self.fetch(&key).await
            }
        }
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        self.collection.delete(&id.to_string()).await?;
        log::info!("Tournament {} deleted", id);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "document"
    }
}

fn to_document<T: serde::Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Transport(format!(
            "expected an object document, got {}",
            other
        ))),
    }
}

fn to_record(id: &str, mut doc: Document) -> StoreResult<TournamentRecord> {
    doc.insert("id".into(), Value::from(id));
    Ok(serde_json::from_value(Value::Object(doc))?)
}

/// In-process document collection: UUID ids, server timestamps, ordered listing.
///
/// Can be switched offline to make every call fail with a transport error.
#[derive(Default)]
pub struct MemoryCollection {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    docs: Vec<(String, Document)>,
    last_stamp: Option<DateTime<Utc>>,
    offline: Option<String>,
}

impl MemoryInner {
    /// Server time, strictly increasing so ordering by timestamp is total.
    fn stamp(&mut self) -> Value {
        let mut now = Utc::now();
        if let Some(last) = self.last_stamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_stamp = Some(now);
        Value::from(now.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn check_online(&self) -> StoreResult<()> {
        match &self.offline {
            Some(reason) => Err(StoreError::Transport(reason.clone())),
            None => Ok(()),
        }
    }
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following call fail with `reason`, or recover with `None`.
    pub fn set_offline(&self, reason: Option<&str>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.offline = reason.map(str::to_string);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, MemoryInner>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| StoreError::Transport("lock error".into()))?;
        inner.check_online()?;
        Ok(inner)
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, MemoryInner>> {
        let inner = self
            .inner
            .write()
            .map_err(|_| StoreError::Transport("lock error".into()))?;
        inner.check_online()?;
        Ok(inner)
    }
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn add(&self, mut fields: Document, timestamp_field: &str) -> StoreResult<String> {
        let mut inner = self.write()?;
        let id = Uuid::new_v4().to_string();
        let stamp = inner.stamp();
        fields.insert(timestamp_field.to_string(), stamp);
        inner.docs.push((id.clone(), fields));
        Ok(id)
    }

    async fn update(&self, id: &str, fields: Document, timestamp_field: &str) -> StoreResult<()> {
        let mut inner = self.write()?;
        let stamp = inner.stamp();
        let (_, doc) = inner
            .docs
            .iter_mut()
            .find(|(key, _)| key == id)
            .ok_or_else(|| StoreError::NotFound(RecordId::Key(id.to_string())))?;
        doc.extend(fields);
        doc.insert(timestamp_field.to_string(), stamp);
        Ok(())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Document>> {
        let inner = self.read()?;
        Ok(inner
            .docs
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, doc)| doc.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut inner = self.write()?;
        let before = inner.docs.len();
        inner.docs.retain(|(key, _)| key != id);
        if inner.docs.len() == before {
            return Err(StoreError::NotFound(RecordId::Key(id.to_string())));
        }
        Ok(())
    }

    async fn list_ordered(&self, field: &str, descending: bool) -> StoreResult<Vec<(String, Document)>> {
        let inner = self.read()?;
        let mut docs = inner.docs.clone();
        docs.sort_by(|(_, a), (_, b)| {
            let ord = compare_field(a.get(field), b.get(field));
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
        Ok(docs)
    }
}

/// Timestamps compare as instants, everything else as text; missing sorts first.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
