//! In-memory document store.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{DocumentStore, Fields, StoreError, segments};

/// Document store held in process memory.
///
/// Used for dry runs and tests. Counts writes so a caller can check that
/// nothing was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    root: Value,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `path`, if any.
    pub async fn get(&self, path: &str) -> Option<Value> {
        let inner = self.inner.read().await;
        segments(path)
            .try_fold(&inner.root, |node, key| node.get(key))
            .filter(|v| !v.is_null())
            .cloned()
    }

    /// Number of `update` and `set` calls so far.
    pub async fn write_count(&self) -> usize {
        self.inner.read().await.writes
    }
}

/// Apply `write` to the node at `path`, creating objects along the way.
///
/// Anything that is not an object on the way is replaced by one.
fn write_at<'a>(
    node: &mut Value,
    mut path: impl Iterator<Item = &'a str>,
    write: impl FnOnce(&mut Value),
) {
    match path.next() {
        None => write(node),
        Some(key) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                write_at(map.entry(key).or_insert(Value::Null), path, write);
            }
        }
    }
}

impl DocumentStore for MemoryStore {
    async fn update(&self, path: &str, fields: Fields) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.writes += 1;

        write_at(&mut inner.root, segments(path), |node| {
            for (key, value) in fields {
                write_at(node, segments(&key), |child| *child = value);
            }
        });
        Ok(())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.writes += 1;

        write_at(&mut inner.root, segments(path), |node| *node = value);
        Ok(())
    }
}
