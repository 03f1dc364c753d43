//! Sharded document store
//!
//! Fixed array of shards plus the operation surface used by the command layer.

use serde_json::{Number, Value};

use super::shard::Shard;
use crate::config::Config;
use crate::error::{JsonKvError, Result};
use crate::path::{self, Path};

/// Sharded, concurrently accessible JSON document store
///
/// Every key lives in exactly one shard, chosen by `crc32(key) % shard_count`.
/// Path operations look the document up and run the whole traversal while
/// the owning shard's lock is held, so a read-modify-write on one key is
/// never interleaved with another writer on the same shard.
///
/// A missing key is checked before the path is parsed, so a path operation
/// on an absent key always reports `NoSuchKey`.
pub struct ShardedStore {
    shards: Box<[Shard]>,
}

impl ShardedStore {
    /// Default number of shards
    pub const DEFAULT_SHARD_COUNT: usize = 1024;

    /// Create a store with `shard_count` shards (at least one)
    pub fn new(shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1)).map(Shard::new).collect();
        Self { shards }
    }

    /// Create a store sized by the config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.shard_count)
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Number of shards (fixed for the life of the store)
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Id of the shard that owns `key`
    pub fn shard_of(&self, key: &str) -> usize {
        self.shard(key).id()
    }

    fn shard(&self, key: &str) -> &Shard {
        let slot = crc32fast::hash(key.as_bytes()) as usize % self.shards.len();
        &self.shards[slot]
    }

    // =========================================================================
    // Whole-document operations
    // =========================================================================

    /// Insert or overwrite the document under `key`
    pub fn put_doc(&self, key: &str, doc: Value) -> Result<()> {
        self.shard(key).put(key.to_string(), doc);
        Ok(())
    }

    /// Copy of the document under `key`, or `None` if it was never set
    pub fn get_doc(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.shard(key).get(key))
    }

    /// Delete the document under `key`; returns whether it existed
    pub fn remove_doc(&self, key: &str) -> Result<bool> {
        Ok(self.shard(key).remove(key).is_some())
    }

    // =========================================================================
    // Path operations
    // =========================================================================

    /// Store `value` at `path` inside an existing document
    pub fn put_path(&self, key: &str, path: &str, value: Value) -> Result<()> {
        self.shard(key).update(key, |doc| path::set(doc, &Path::parse(path)?, value))
    }

    /// Value at `path`, or `None` when a field along the path is absent
    pub fn get_path(&self, key: &str, path: &str) -> Result<Option<Value>> {
        self.shard(key).read(key, |doc| {
            match path::query(doc, &Path::parse(path)?) {
                Ok(value) => Ok(Some(value)),
                Err(JsonKvError::NoSuchField(_)) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    /// Add `delta` to the number at `path`; returns the stored result
    pub fn incr_path(&self, key: &str, path: &str, delta: &Number) -> Result<i64> {
        self.shard(key)
            .update(key, |doc| path::increment(doc, &Path::parse(path)?, delta))
    }

    /// Append `value` to the array at `path`
    pub fn push_path(&self, key: &str, path: &str, value: Value) -> Result<()> {
        self.shard(key).update(key, |doc| path::push(doc, &Path::parse(path)?, value))
    }

    /// Remove and return the head of the array at `path`
    pub fn pop_path(&self, key: &str, path: &str) -> Result<Value> {
        self.shard(key).update(key, |doc| path::pop(doc, &Path::parse(path)?))
    }

    /// Delete the field or element at `path`
    pub fn remove_path(&self, key: &str, path: &str) -> Result<()> {
        self.shard(key)
            .update(key, |doc| path::remove(doc, &Path::parse(path)?).map(|_| ()))
    }

    /// Length of the array at `path`
    pub fn array_len(&self, key: &str, path: &str) -> Result<usize> {
        self.shard(key)
            .read(key, |doc| path::array_len(doc, &Path::parse(path)?))
    }

    // =========================================================================
    // Keyspace operations
    // =========================================================================

    /// Snapshot of every `(key, document)` whose key starts with `prefix`,
    /// sorted by key.
    ///
    /// Shards are visited one at a time, so the result is consistent per
    /// shard but not across shards.
    pub fn scan(&self, prefix: &str) -> Result<impl Iterator<Item = (String, Value)>> {
        let mut entries = Vec::new();
        for shard in self.shards.iter() {
            shard.collect_prefix(prefix, &mut entries);
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries.into_iter())
    }

    /// Persist the store to `file_name`. Not supported: the store is
    /// memory-only.
    pub fn save(&self, _file_name: &str) -> Result<()> {
        Err(JsonKvError::Unimplemented("save"))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Total number of documents across all shards
    pub fn len(&self) -> usize {
        self.shards.iter().map(Shard::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SHARD_COUNT)
    }
}
