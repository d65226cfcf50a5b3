//! Optional read-through snapshots of list responses.
//!
//! A snapshot is only ever a hint to render something while the network
//! answers. Entries older than `max_age` are ignored.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Key-value storage for snapshots, e.g. the browser's local storage.
pub trait SnapshotStorage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    saved_at: Timestamp,
    value: T,
}

#[derive(Clone)]
pub struct SnapshotCache {
    storage: Rc<dyn SnapshotStorage>,
    key: String,
    max_age: Duration,
}

impl SnapshotCache {
    pub fn new(
        storage: Rc<dyn SnapshotStorage>,
        key: impl Into<String>,
        max_age: Duration,
    ) -> Self {
        Self {
            storage,
            key: key.into(),
            max_age,
        }
    }

    pub fn load<T: DeserializeOwned>(&self) -> Option<T> {
        self.load_at(Timestamp::now())
    }

    /// The stored value if it was saved no more than `max_age` before `now`.
    pub fn load_at<T: DeserializeOwned>(&self, now: Timestamp) -> Option<T> {
        let text = self.storage.read(&self.key)?;
        let envelope: Envelope<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!(key = %self.key, "discarding unreadable snapshot: {e}");
                return None;
            }
        };

        let age_ms = now.as_millisecond() - envelope.saved_at.as_millisecond();
        if age_ms < 0 || age_ms as u128 > self.max_age.as_millis() {
            return None;
        }
        Some(envelope.value)
    }

    pub fn save<T: Serialize>(&self, value: &T) {
        self.save_at(value, Timestamp::now())
    }

    pub fn save_at<T: Serialize>(&self, value: &T, now: Timestamp) {
        let envelope = Envelope {
            saved_at: now,
            value,
        };
        match serde_json::to_string(&envelope) {
            Ok(text) => self.storage.write(&self.key, &text),
            Err(e) => {
                tracing::warn!(key = %self.key, "could not store snapshot: {e}")
            }
        }
    }

    pub fn clear(&self) {
        self.storage.remove(&self.key);
    }
}
