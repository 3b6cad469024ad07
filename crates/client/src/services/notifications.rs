//! Transient error and success messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::store::{MemoryStore, Readable, Store};

/// Error and success message stores with auto-clear timers.
///
/// Each message clears itself after `clear_after`. A timer only clears the
/// message it was started for: showing a newer message restarts the clock.
#[derive(Clone)]
pub struct Notifications {
    inner: Arc<NotificationsInner>,
}

struct NotificationsInner {
    clear_after: Duration,
    error: Channel,
    success: Channel,
}

struct Channel {
    message: MemoryStore<Option<String>>,
    generation: AtomicU64,
}

impl Channel {
    fn new() -> Self {
        Self {
            message: MemoryStore::new(None),
            generation: AtomicU64::new(0),
        }
    }

    fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.message.set(None);
    }
}

impl std::fmt::Debug for Notifications {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifications")
            .field("clear_after", &self.inner.clear_after)
            .field("error", &self.inner.error.message.get())
            .field("success", &self.inner.success.message.get())
            .finish()
    }
}

impl Notifications {
    /// Create empty notification stores that clear after `clear_after`.
    #[must_use]
    pub fn new(clear_after: Duration) -> Self {
        Self {
            inner: Arc::new(NotificationsInner {
                clear_after,
                error: Channel::new(),
                success: Channel::new(),
            }),
        }
    }

    /// Current error message store.
    #[must_use]
    pub fn error(&self) -> &MemoryStore<Option<String>> {
        &self.inner.error.message
    }

    /// Current success message store.
    #[must_use]
    pub fn success(&self) -> &MemoryStore<Option<String>> {
        &self.inner.success.message
    }

    /// Show an error message.
    pub fn show_error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!(message = %message, "Showing error notification");
        self.show(Kind::Error, message);
    }

    /// Show a success message.
    pub fn show_success(&self, message: impl Into<String>) {
        let message = message.into();
        info!(message = %message, "Showing success notification");
        self.show(Kind::Success, message);
    }

    /// Clear both messages immediately.
    pub fn clear_all(&self) {
        self.inner.error.clear();
        self.inner.success.clear();
    }

    fn show(&self, kind: Kind, message: String) {
        let channel = self.inner.channel(kind);
        let generation = channel.generation.fetch_add(1, Ordering::SeqCst) + 1;
        channel.message.set(Some(message));

        // Outside a runtime the message stays until cleared explicitly
        let Ok(handle) = Handle::try_current() else {
            debug!("No async runtime, notification will not auto-clear");
            return;
        };

        let inner = Arc::clone(&self.inner);
        handle.spawn(async move {
            tokio::time::sleep(inner.clear_after).await;
            let channel = inner.channel(kind);
            if channel
                .generation
                .compare_exchange(generation, generation + 1, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                channel.message.set(None);
            }
        });
    }
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Error,
    Success,
}

impl NotificationsInner {
    const fn channel(&self, kind: Kind) -> &Channel {
        match kind {
            Kind::Error => &self.error,
            Kind::Success => &self.success,
        }
    }
}
