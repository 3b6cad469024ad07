//! Observable state containers.
//!
//! # Architecture
//!
//! Every piece of client state lives in a store. A store holds one value,
//! hands out copies through [`Readable::get`], and calls its subscribers
//! synchronously whenever the value changes. Subscribing invokes the
//! listener once right away with the current value.
//!
//! - [`MemoryStore`] - plain observable value
//! - [`PersistedStore`] - observable value mirrored to durable storage
//! - [`Derived`] - read-only projection of another store, recomputed on
//!   every notification and never stored
//!
//! # Example
//!
//! ```rust
//! use dancemode_client::store::{MemoryStore, Readable, Store};
//!
//! let count = MemoryStore::new(0_u32);
//! let sub = count.subscribe(|value| tracing::debug!(value, "count changed"));
//! count.update(|n| n + 1);
//! assert_eq!(count.get(), 1);
//! sub.unsubscribe();
//! ```

mod derived;
mod memory;
mod persisted;

pub use derived::Derived;
pub use memory::MemoryStore;
pub use persisted::PersistedStore;

/// A store whose value can be read and observed.
pub trait Readable<T> {
    /// A copy of the current value.
    fn get(&self) -> T;

    /// Register `listener`.
    ///
    /// The listener runs once immediately with the current value and then
    /// after every change, until the returned [`Subscription`] is dropped or
    /// unsubscribed.
    fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static;
}

/// A store whose value can be replaced.
pub trait Store<T>: Readable<T> {
    /// Replace the value and notify subscribers.
    fn set(&self, value: T);

    /// Replace the value with `f(current)` and notify subscribers.
    ///
    /// Reading the current value and storing the new one happen under a
    /// single lock, so concurrent updates are never lost.
    fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T;
}

/// Handle keeping a listener registered.
///
/// Dropping the handle unsubscribes; call [`Subscription::detach`] to keep
/// the listener for the lifetime of the store instead.
#[must_use = "dropping a Subscription unsubscribes the listener immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the listener registered for as long as the store lives.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
