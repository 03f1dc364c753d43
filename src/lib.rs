//! # jsonkv
//!
//! A sharded, concurrent JSON document store with:
//! - Dotted-path reads and in-place writes (`a.b[0].c`, negative indexes)
//! - Atomic per-key increment, push and pop (FIFO) on sub-fields
//! - Reader/writer lock per shard, CRC32 key routing
//! - RESP-based TCP client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │               (one thread per connection)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Request (name + argument buffers)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Engine (command layer)                     │
//! │          parse arguments → store call → Response             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    ShardedStore                              │
//! │          crc32(key) % N → Shard (RwLock<HashMap>)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ document held under the shard lock
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │              Path traversal / mutation                       │
//! │        query · set · increment · push · pop · ...            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod path;
pub mod store;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JsonKvError, Result};
pub use config::Config;
pub use engine::Engine;
pub use path::Path;
pub use store::ShardedStore;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jsonkv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
