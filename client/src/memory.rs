//! In-process store
//!
//! Holds the whole tree as one JSON value. Used by tests, demos, and hosts that
//! score offline.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use scorebook_protocol::StorePath;
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::store::{Store, Subscription};

struct Subscriber {
    id: u64,
    path: StorePath,
    tx: mpsc::UnboundedSender<Option<Value>>,
}

#[derive(Default)]
struct Inner {
    root: Value,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// Store backed by an in-memory JSON tree
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    /// Start with existing data
    pub fn from_value(root: Value) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                root,
                ..Inner::default()
            })),
        }
    }

    /// Copy of the whole tree
    pub fn snapshot(&self) -> Value {
        self.inner
            .lock()
            .map(|inner| inner.root.clone())
            .unwrap_or(Value::Null)
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.subscribers.len())
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

fn lookup<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn present(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).cloned()
}

/// Child of `node` named by `segment`, created if missing
///
/// Arrays are indexed by numeric segments and padded with `null`; any
/// other non-object node is replaced by an object.
fn child<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = segment.parse::<usize>().ok().filter(|_| node.is_array());
    if index.is_none() && !node.is_object() {
        *node = Value::Object(Map::new());
    }

    match node {
        Value::Array(items) => {
            let index = index.unwrap_or(items.len());
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            &mut items[index]
        }
        Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
        other => other,
    }
}

/// Write `value` at `segments`, creating parents on the way; `null` removes
fn assign(root: &mut Value, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut node = root;
    for segment in parents {
        node = child(node, segment);
    }

    if !value.is_null() {
        *child(node, last) = value;
        return;
    }

    match node {
        Value::Object(map) => {
            map.remove(last);
        }
        // Clearing an entry keeps the later indices in place
        Value::Array(items) => {
            if let Some(item) = last.parse::<usize>().ok().and_then(|i| items.get_mut(i)) {
                *item = Value::Null;
            }
        }
        _ => {}
    }
}

impl Inner {
    /// Push the new value to every subscriber whose path overlaps `changed`
    fn notify(&mut self, changed: &StorePath) {
        let root = &self.root;
        self.subscribers.retain(|sub| {
            if !sub.path.overlaps(changed) {
                return !sub.tx.is_closed();
            }
            let value = present(lookup(root, &sub.path.segments()));
            sub.tx.send(value).is_ok()
        });
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn read_once(&self, path: &StorePath) -> Result<Option<Value>> {
        let inner = self.lock()?;
        Ok(present(lookup(&inner.root, &path.segments())))
    }

    async fn subscribe(&self, path: &StorePath) -> Result<Subscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock()?;

        let id = inner.next_id;
        inner.next_id += 1;

        // Fire immediately with the current value
        let current = present(lookup(&inner.root, &path.segments()));
        tx.send(current)
            .map_err(|_| anyhow!("Subscription closed before first value"))?;

        inner.subscribers.push(Subscriber {
            id,
            path: path.clone(),
            tx,
        });

        let registry = Arc::downgrade(&self.inner);
        Ok(Subscription::new(rx, move || {
            if let Some(inner) = registry.upgrade()
                && let Ok(mut inner) = inner.lock()
            {
                inner.subscribers.retain(|sub| sub.id != id);
            }
        }))
    }

    async fn write_atomic(&self, path: &StorePath, value: Value) -> Result<()> {
        let mut inner = self.lock()?;
        assign(&mut inner.root, &path.segments(), value);
        inner.notify(path);
        Ok(())
    }

    async fn increment_fields(
        &self,
        path: &StorePath,
        increments: &[(String, i64)],
    ) -> Result<()> {
        let mut inner = self.lock()?;
        let base = path.segments();

        for (field, delta) in increments {
            let mut segments = base.clone();
            segments.extend(field.split('/').map(str::to_string));

            let current = lookup(&inner.root, &segments)
                .and_then(Value::as_i64)
                .unwrap_or(0);
            assign(&mut inner.root, &segments, Value::from(current + delta));
        }

        inner.notify(path);
        Ok(())
    }
}
