//! Shared, swappable configuration-derived state.
//!
//! `ConfigStore<T>` wraps `Arc<RwLock<T>>` so that a SIGHUP reload can
//! replace the value while request handlers keep reading it.

use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

pub struct ConfigStore<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> ConfigStore<T> {
    /// Create a new `ConfigStore` with the given initial value.
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// Replace the stored value.
    pub async fn update(&self, value: T) {
        let mut guard = self.inner.write().await;
        *guard = value;
    }

    /// Read the current value.
    pub async fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read().await
    }
}

impl<T: Clone> ConfigStore<T> {
    /// Clone the current value out of the store so the lock is not held
    /// across long awaits.
    pub async fn snapshot(&self) -> T {
        self.inner.read().await.clone()
    }
}

impl<T> Clone for ConfigStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
