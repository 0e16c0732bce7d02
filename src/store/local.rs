//! Local variant: all tournaments as one JSON array under a single key.

use crate::error::{StoreError, StoreResult};
use crate::models::{Difficulty, Prizes, RecordId, Status, TournamentRecord};
use crate::store::{RecordStore, SaveRequest};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

/// Key holding the serialized tournament array.
pub const STORAGE_KEY: &str = "admin_tournaments";

/// Synchronous string key-value storage.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

/// One `<key>.json` file per key inside a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory storage with an optional total size quota in bytes.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::Unavailable)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Unavailable)?;
        if let Some(quota) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Record store over a [`KeyValueStorage`]. Sorts by `createdAt` itself.
///
/// Storage calls may touch the filesystem, so each operation runs on the
/// blocking thread pool.
pub struct LocalStore<K> {
    storage: Arc<K>,
    seed: bool,
    // serializes read-modify-write of the blob
    write_lock: Arc<Mutex<()>>,
}

impl<K: KeyValueStorage + 'static> LocalStore<K> {
    /// Starts from the default tournaments while the key is absent.
    pub fn new(storage: K) -> Self {
        Self {
            storage: Arc::new(storage),
            seed: true,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn seeded(mut self, seed: bool) -> Self {
        self.seed = seed;
        self
    }

    /// Run `op` against the storage off the async worker.
    async fn blocking<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Blob<K>) -> StoreResult<T> + Send + 'static,
    {
        let blob = Blob {
            storage: self.storage.clone(),
            seed: self.seed,
            write_lock: self.write_lock.clone(),
        };
        tokio::task::spawn_blocking(move || op(&blob))
            .await
            .map_err(|e| StoreError::Transport(format!("storage task failed: {}", e)))?
    }
}

/// What one blocking storage operation works on.
struct Blob<K> {
    storage: Arc<K>,
    seed: bool,
    write_lock: Arc<Mutex<()>>,
}

impl<K: KeyValueStorage> Blob<K> {
    /// Stored order, or the seed list when nothing is stored.
    fn read(&self) -> StoreResult<Vec<TournamentRecord>> {
        match self.storage.get(STORAGE_KEY)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None if self.seed => Ok(default_tournaments()),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, records: &[TournamentRecord]) -> StoreResult<()> {
        let blob = serde_json::to_string(records)?;
        self.storage.set(STORAGE_KEY, &blob)
    }

    fn save(&self, request: SaveRequest) -> StoreResult<TournamentRecord> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Unavailable)?;
        let mut records = self.read()?;
        let now = Utc::now();
        let saved = match request {
            SaveRequest::Create(draft) => {
                let id = next_id(&records, now);
                let created_at = records
                    .iter()
                    .map(|t| t.created_at)
                    .max()
                    .filter(|latest| *latest >= now)
                    .map(|latest| latest + Duration::microseconds(1))
                    .unwrap_or(now);
                let record = TournamentRecord::create(RecordId::Seq(id), draft, created_at);
                records.push(record.clone());
                record
            }
            SaveRequest::Update(id, draft) => {
                let record = records
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or(StoreError::NotFound(id))?;
                record.apply(draft, now);
                record.clone()
            }
        };
        self.write(&records)?;
        log::info!("Saved tournament {} to local storage", saved.id);
        Ok(saved)
    }

    fn delete(&self, id: &RecordId) -> StoreResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Unavailable)?;
        let mut records = self.read()?;
        records.retain(|t| &t.id != id);
        self.write(&records)?;
        log::info!("Deleted tournament {} from local storage", id);
        Ok(())
    }
}

#[async_trait]
impl<K: KeyValueStorage + 'static> RecordStore for LocalStore<K> {
    async fn load_all(&self) -> StoreResult<Vec<TournamentRecord>> {
        let mut records = self.blocking(|blob| blob.read()).await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn save(&self, request: SaveRequest) -> StoreResult<TournamentRecord> {
        self.blocking(move |blob| blob.save(request)).await
    }

    async fn delete(&self, id: &RecordId) -> StoreResult<()> {
        let id = id.clone();
        self.blocking(move |blob| blob.delete(&id)).await
    }

    fn backend(&self) -> &'static str {
        "local"
    }
}

/// Millisecond clock id, bumped past the largest stored id so ids stay unique.
fn next_id(records: &[TournamentRecord], now: DateTime<Utc>) -> i64 {
    let largest = records
        .iter()
        .filter_map(|t| match t.id {
            RecordId::Seq(n) => Some(n),
            RecordId::Key(_) => None,
        })
        .max();
    let millis = now.timestamp_millis();
    match largest {
        Some(n) if n >= millis => n + 1,
        _ => millis,
    }
}

fn seed_time(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 11, 1, 9, minute, 0)
        .single()
        .unwrap_or_default()
}

/// Tournaments shown before anything has been saved.
pub fn default_tournaments() -> Vec<TournamentRecord> {
    let seed = |id: i64,
                title: &str,
                subtitle: &str,
                start_date: &str,
                (duration, prize_pool, max_participants, participants): (i64, i64, i64, i64),
                difficulty: Difficulty,
                language: &str,
                status: Status,
                description: &str,
                rules: &[&str]| TournamentRecord {
        id: RecordId::Seq(id),
        title: title.into(),
        subtitle: subtitle.into(),
        start_date: start_date.into(),
        duration,
        prize_pool,
        max_participants,
        participants,
        difficulty,
        language: language.into(),
        status,
        description: description.into(),
        rules: rules.iter().map(|r| r.to_string()).collect(),
        prizes: Prizes::default(),
        subscribers: Vec::new(),
        created_at: seed_time(id as u32),
        updated_at: None,
    };

    vec![
        seed(
            1,
            "Algorithm Sprint",
            "Weekly coding challenge",
            "2024-11-15T10:00",
            (3, 5000, 200, 128),
            Difficulty::Medium,
            "Any",
            Status::Open,
            "Test your algorithmic skills in this weekly challenge.",
            &[
                "Duration: 3 Hours",
                "Language: Any programming language allowed",
                "Scoring: Speed + Accuracy",
                "Difficulty: Easy to Hard problems",
            ],
        ),
        seed(
            2,
            "Data Structure Masters",
            "Advanced DS challenges",
            "2024-11-20T14:00",
            (4, 8000, 150, 89),
            Difficulty::Hard,
            "C++/Java",
            Status::Open,
            "Master complex data structures and algorithms.",
            &[
                "Duration: 4 Hours",
                "Language: C++ or Java only",
                "Scoring: Based on time complexity and correctness",
                "Difficulty: Medium to Hard problems",
            ],
        ),
        seed(
            3,
            "Web Dev Championship",
            "Full-stack challenge",
            "2024-11-25T09:00",
            (6, 12000, 300, 156),
            Difficulty::Expert,
            "JavaScript",
            Status::Ongoing,
            "Build a complete web application in 6 hours.",
            &[
                "Duration: 6 Hours",
                "Language: JavaScript (React/Node.js)",
                "Scoring: Functionality + Design + Performance",
                "Must deploy to live server",
            ],
        ),
    ]
}
