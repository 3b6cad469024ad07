//! Observable store mirrored to durable storage.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::{MemoryStore, Readable, Store, Subscription};
use crate::storage::Storage;

/// An observable value that survives restarts.
///
/// On construction the value stored under `key` seeds the store; if it is
/// missing, unreadable or fails to deserialize, `initial` is used instead.
/// Every write serializes the new value to storage before subscribers are
/// notified. Storage failures are logged and never returned: the in-memory
/// value always changes, so the client keeps working without persistence.
pub struct PersistedStore<T> {
    inner: Arc<PersistedInner<T>>,
}

struct PersistedInner<T> {
    key: String,
    initial: T,
    storage: Arc<dyn Storage>,
    memory: MemoryStore<T>,
}

impl<T> Clone for PersistedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PersistedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("key", &self.inner.key)
            .field("memory", &self.inner.memory)
            .finish_non_exhaustive()
    }
}

impl<T> PersistedStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a store bound to `key`, rehydrating from `storage`.
    pub fn new(key: impl Into<String>, initial: T, storage: Arc<dyn Storage>) -> Self {
        let key = key.into();
        let value = load(storage.as_ref(), &key).unwrap_or_else(|| initial.clone());

        Self {
            inner: Arc::new(PersistedInner {
                key,
                initial,
                storage,
                memory: MemoryStore::new(value),
            }),
        }
    }

    /// Storage key this store is bound to.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Remove the stored entry and reset to the initial value.
    pub fn clear(&self) {
        self.inner.memory.update(|_| {
            if let Err(e) = self.inner.storage.remove(&self.inner.key) {
                error!(key = %self.inner.key, error = %e, "Failed to remove persisted value");
            }
            self.inner.initial.clone()
        });
    }

    fn persist(&self, value: &T) {
        let key = &self.inner.key;
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key = %key, error = %e, "Failed to serialize value for storage");
                return;
            }
        };
        if let Err(e) = self.inner.storage.set(key, &raw) {
            error!(key = %key, error = %e, "Failed to persist value");
        }
    }
}

/// Read and decode the stored value for `key`, if there is a usable one.
fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key = %key, error = %e, "Failed to read persisted value, using default");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!(key = %key, "Rehydrated persisted value");
            Some(value)
        }
        Err(e) => {
            warn!(key = %key, error = %e, "Malformed persisted value, using default");
            None
        }
    }
}

impl<T> Readable<T> for PersistedStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn get(&self) -> T {
        self.inner.memory.get()
    }

    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.inner.memory.subscribe(listener)
    }
}

impl<T> Store<T> for PersistedStore<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn set(&self, value: T) {
        self.update(move |_| value);
    }

    /// Storage is written while the value lock is held, so concurrent
    /// writers cannot leave storage and memory holding different values.
    fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.inner.memory.update(|current| {
            let next = f(current);
            self.persist(&next);
            next
        });
    }
}
