//! Store Module
//!
//! In-memory document storage partitioned into independently locked shards.
//!
//! ## Responsibilities
//! - Route every key to exactly one shard (CRC32 of the key modulo the
//!   shard count, fixed at construction)
//! - Whole-document get/put/remove
//! - Path-scoped reads and read-modify-writes, run entirely under the
//!   owning shard's lock
//!
//! ## Concurrency Model
//! ```text
//!   key ──crc32──► shard[i] ──RwLock──► HashMap<String, Value>
//! ```
//! Operations on keys in different shards never contend. On one shard,
//! readers run in parallel and writers are serialized.

mod shard;
mod sharded;

pub use sharded::ShardedStore;
