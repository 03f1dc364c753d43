//! Shard implementation
//!
//! HashMap of documents behind a single parking_lot RwLock.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{JsonKvError, Result};

/// One lock-guarded partition of the keyspace
///
/// ## Concurrency:
/// - `get`/`read`/`collect_prefix` take the shared lock
/// - `put`/`remove`/`update` take the exclusive lock for their whole body,
///   so a read-modify-write through `update` is atomic per shard
pub(crate) struct Shard {
    /// Position of this shard in the store
    id: usize,

    /// Documents owned by this shard
    docs: RwLock<HashMap<String, Value>>,
}

impl Shard {
    pub(crate) fn new(id: usize) -> Self {
        Self {
            id,
            docs: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn id(&self) -> usize {
        self.id
    }

    /// Copy of the document under `key` (shared lock)
    pub(crate) fn get(&self, key: &str) -> Option<Value> {
        self.docs.read().get(key).cloned()
    }

    /// Insert or overwrite a whole document (exclusive lock)
    pub(crate) fn put(&self, key: String, doc: Value) -> Option<Value> {
        self.docs.write().insert(key, doc)
    }

    /// Drop a whole document (exclusive lock)
    pub(crate) fn remove(&self, key: &str) -> Option<Value> {
        self.docs.write().remove(key)
    }

    /// Run `f` against the document under `key` while holding the shared lock
    pub(crate) fn read<R>(&self, key: &str, f: impl FnOnce(&Value) -> Result<R>) -> Result<R> {
        let docs = self.docs.read();
        let doc = docs
            .get(key)
            .ok_or_else(|| JsonKvError::NoSuchKey(key.to_string()))?;
        f(doc)
    }

    /// Run `f` against the document under `key` while holding the exclusive lock
    pub(crate) fn update<R>(
        &self,
        key: &str,
        f: impl FnOnce(&mut Value) -> Result<R>,
    ) -> Result<R> {
        let mut docs = self.docs.write();
        let doc = docs
            .get_mut(key)
            .ok_or_else(|| JsonKvError::NoSuchKey(key.to_string()))?;
        f(doc)
    }

    /// Append copies of every document whose key starts with `prefix`
    pub(crate) fn collect_prefix(&self, prefix: &str, out: &mut Vec<(String, Value)>) {
        let docs = self.docs.read();
        out.extend(
            docs.iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, doc)| (key.clone(), doc.clone())),
        );
    }

    pub(crate) fn len(&self) -> usize {
        self.docs.read().len()
    }
}
