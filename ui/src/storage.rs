//! Browser local storage as a snapshot backend.

use client::SnapshotStorage;

/// `window.localStorage`. Every operation is a no-op when storage is
/// unavailable, e.g. in private browsing.
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl SnapshotStorage for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage()
            && let Err(e) = storage.set_item(key, value)
        {
            tracing::warn!("could not write {key} to local storage: {e:?}");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}
