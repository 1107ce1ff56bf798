//! Abstract key-value store the session persists through

use anyhow::{Context, Result};
use async_trait::async_trait;
use scorebook_protocol::StorePath;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::mpsc;

/// Remote real-time store
///
/// Values are JSON trees addressed by [`StorePath`]. Implementations must
/// make [`Store::increment_fields`] a per-field read-modify-write so that
/// concurrent external changes are not overwritten.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Current value at `path`, `None` if nothing is stored there
    async fn read_once(&self, path: &StorePath) -> Result<Option<Value>>;

    /// Follow `path`; the subscription yields the current value immediately and
    /// again after every change at or below `path`.
    async fn subscribe(&self, path: &StorePath) -> Result<Subscription>;

    /// Overwrite the value at `path`
    async fn write_atomic(&self, path: &StorePath, value: Value) -> Result<()>;

    /// Add each delta to the number at `path/field` (missing counts as 0)
    async fn increment_fields(&self, path: &StorePath, increments: &[(String, i64)])
    -> Result<()>;
}

/// A live subscription; unsubscribes when dropped
pub struct Subscription {
    updates: mpsc::UnboundedReceiver<Option<Value>>,
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(
        updates: mpsc::UnboundedReceiver<Option<Value>>,
        unsubscribe: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            updates,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Next value at the path
    ///
    /// The outer `None` means the store ended the subscription.
    pub async fn next(&mut self) -> Option<Option<Value>> {
        self.updates.recv().await
    }

    /// A value that has already arrived, without waiting
    pub fn try_next(&mut self) -> Option<Option<Value>> {
        self.updates.try_recv().ok()
    }

    /// Stop receiving updates
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

/// Read and deserialize a record
pub async fn read_record<S, T>(store: &S, path: &StorePath) -> Result<Option<T>>
where
    S: Store + ?Sized,
    T: DeserializeOwned,
{
    match store.read_once(path).await? {
        None | Some(Value::Null) => Ok(None),
        Some(value) => {
            let record = serde_json::from_value(value)
                .with_context(|| format!("Malformed record at {}", path))?;
            Ok(Some(record))
        }
    }
}
