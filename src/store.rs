//! Key-value persistence behind a trait, plus a JSON meet store on top of it.

use crate::models::{DualMeet, MeetError, MeetId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

/// String key-value store injected into the meet store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// Drop entries not read or written for `max_idle`. Returns how many were removed.
    fn purge_idle(&self, max_idle: Duration) -> usize;
}

struct Entry {
    value: String,
    last_activity: Instant,
}

/// In-memory store. Reads refresh an entry's last activity.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |g| g.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut g = self.entries.write().map_err(|_| StoreError::Lock)?;
        Ok(g.get_mut(key).map(|entry| {
            entry.last_activity = Instant::now();
            entry.value.clone()
        }))
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut g = self.entries.write().map_err(|_| StoreError::Lock)?;
        g.insert(
            key.to_string(),
            Entry {
                value,
                last_activity: Instant::now(),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut g = self.entries.write().map_err(|_| StoreError::Lock)?;
        Ok(g.remove(key).map(|e| e.value))
    }

    fn purge_idle(&self, max_idle: Duration) -> usize {
        let mut g = match self.entries.write() {
            Ok(guard) => guard,
            Err(_) => return 0,
        };
        let before = g.len();
        g.retain(|_, entry| entry.last_activity.elapsed() < max_idle);
        before - g.len()
    }
}

/// Errors from the meet store.
#[derive(Debug)]
pub enum StoreError {
    /// Stored meet could not be encoded or decoded.
    Serialization(String),
    /// Lock poisoned by a panicking writer.
    Lock,
    NotFound(MeetId),
    /// The update closure rejected the change; nothing was saved.
    Meet(MeetError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Serialization(msg) => write!(f, "Stored meet is unreadable: {}", msg),
            StoreError::Lock => write!(f, "lock error"),
            StoreError::NotFound(_) => write!(f, "No meet"),
            StoreError::Meet(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<MeetError> for StoreError {
    fn from(e: MeetError) -> Self {
        StoreError::Meet(e)
    }
}

/// Meets stored as JSON under `meet/<id>`.
pub struct MeetStore {
    kv: Arc<dyn KeyValueStore>,
    /// Serializes load-modify-save cycles.
    write_lock: Mutex<()>,
}

impl MeetStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    fn key(id: MeetId) -> String {
        format!("meet/{}", id)
    }

    pub fn load(&self, id: MeetId) -> Result<DualMeet, StoreError> {
        let raw = self.kv.get(&Self::key(id))?.ok_or(StoreError::NotFound(id))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, meet: &DualMeet) -> Result<(), StoreError> {
        let raw = serde_json::to_string(meet)?;
        self.kv.put(&Self::key(meet.id), raw)
    }

    /// Remove a meet. Waits for any running `update` so it cannot be saved back afterwards.
    /// Returns false if there was no such meet.
    pub fn delete(&self, id: MeetId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Lock)?;
        Ok(self.kv.remove(&Self::key(id))?.is_some())
    }

    /// Load a meet, apply `f`, and save it if `f` succeeds. Returns the updated meet.
    pub fn update<T, F>(&self, id: MeetId, f: F) -> Result<(DualMeet, T), StoreError>
    where
        F: FnOnce(&mut DualMeet) -> Result<T, MeetError>,
    {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Lock)?;
        let mut meet = self.load(id)?;
        let out = f(&mut meet)?;
        self.save(&meet)?;
        Ok((meet, out))
    }

    pub fn purge_idle(&self, max_idle: Duration) -> usize {
        self.kv.purge_idle(max_idle)
    }
}
