//! In-memory observable store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::{Readable, Store, Subscription};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// An observable value held in memory.
///
/// Cloning is cheap and yields a handle to the same value.
pub struct MemoryStore<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for MemoryStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = self.inner.value.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MemoryStore").field("value", &*value).finish()
    }
}

impl<T> MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a store holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: RwLock::new(value),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Call every listener with `value`.
    ///
    /// Listeners are snapshotted first and run without any lock held, so a
    /// listener may read or even write the store it is subscribed to.
    fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(value);
        }
    }
}

impl<T> Readable<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn get(&self) -> T {
        self.inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let listener: Listener<T> = Arc::new(listener);

        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&listener)));

        listener(&self.get());

        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(existing, _)| *existing != id);
            }
        })
    }
}

impl<T> Store<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn set(&self, value: T) {
        {
            let mut current = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = value.clone();
        }
        self.notify(&value);
    }

    fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = {
            let mut current = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let next = f(&current);
            *current = next.clone();
            next
        };
        self.notify(&next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value: &T| {
            sink.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(value.clone());
        })
    }

    #[test]
    fn test_subscribe_receives_current_then_changes() {
        let store = MemoryStore::new(1);
        let (seen, listener) = recorder::<i32>();
        let _sub = store.subscribe(listener);

        store.set(2);
        store.update(|n| n * 10);

        assert_eq!(*seen.lock().unwrap_or_else(PoisonError::into_inner), vec![1, 2, 20]);
        assert_eq!(store.get(), 20);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = MemoryStore::new("a".to_string());
        let (seen, listener) = recorder::<String>();
        let sub = store.subscribe(listener);
        assert_eq!(store.subscriber_count(), 1);

        sub.unsubscribe();
        store.set("b".to_string());

        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(seen.lock().unwrap_or_else(PoisonError::into_inner).len(), 1);
    }

    #[test]
    fn test_drop_unsubscribes_and_detach_keeps() {
        let store = MemoryStore::new(0);
        {
            let _sub = store.subscribe(|_| {});
        }
        assert_eq!(store.subscriber_count(), 0);

        store.subscribe(|_| {}).detach();
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn test_clones_share_value() {
        let store = MemoryStore::new(vec![1]);
        let other = store.clone();
        other.update(|v| {
            let mut v = v.clone();
            v.push(2);
            v
        });
        assert_eq!(store.get(), vec![1, 2]);
    }

    #[test]
    fn test_listener_may_read_store() {
        let store = MemoryStore::new(0);
        let reader = store.clone();
        let (seen, listener) = recorder::<i32>();
        let _sub = store.subscribe(move |_| listener(&reader.get()));
        store.set(5);
        assert_eq!(*seen.lock().unwrap_or_else(PoisonError::into_inner), vec![0, 5]);
    }
}
