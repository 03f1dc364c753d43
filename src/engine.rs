//! Engine Module
//!
//! The command layer that sits between connections and the store.
//!
//! ## Responsibilities
//! - Decode requests into commands (arity and argument checks happen
//!   before the store is touched)
//! - Invoke the matching store operation
//! - Encode results and errors as protocol responses

use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{Command, Request, Response};
use crate::store::ShardedStore;

/// The main command engine
///
/// ## Concurrency Model
///
/// The engine itself holds no locks. Every connection thread calls into
/// the shared [`ShardedStore`], which serializes writers per shard and
/// lets readers on the same shard proceed in parallel.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Document storage
    store: ShardedStore,
}

impl Engine {
    /// Target file for `save`/`bgsave`
    const DUMP_FILENAME: &'static str = "dump.json";

    /// Create an engine with the given config
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let store = ShardedStore::from_config(&config);

        tracing::info!(shards = store.shard_count(), "Document store initialized");

        Ok(Self { config, store })
    }

    /// Decode and execute a request, turning any failure into an error reply.
    ///
    /// A failing command never affects the connection or the store.
    pub fn handle(&self, request: &Request) -> Response {
        let outcome = Command::parse(request).and_then(|command| self.execute(command));
        match outcome {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(command = %request.name, error = %e, "Command failed");
                Response::error(&e.to_string())
            }
        }
    }

    /// Execute a command
    ///
    /// Routes commands to the store operation they name
    pub fn execute(&self, command: Command) -> Result<Response> {
        tracing::trace!(command = command.name(), "Executing command");

        match command {
            Command::Ping => Ok(Response::pong()),
            Command::DocSet { key, value } => {
                self.store.put_doc(&key, value)?;
                Ok(Response::ok())
            }
            Command::DocGet { key } => {
                let doc = self.store.get_doc(&key)?;
                Response::json_or_nil(doc.as_ref())
            }
            Command::DocDel { key } => {
                let removed = self.store.remove_doc(&key)?;
                Ok(Response::Integer(i64::from(removed)))
            }
            Command::DocScan { prefix } => {
                let matches: Map<String, Value> = self.store.scan(&prefix)?.collect();
                Response::json(&Value::Object(matches))
            }
            Command::PathSet { key, path, value } => {
                self.store.put_path(&key, &path, value)?;
                Ok(Response::ok())
            }
            Command::PathGet { key, path } => {
                let value = self.store.get_path(&key, &path)?;
                Response::json_or_nil(value.as_ref())
            }
            Command::PathPush { key, path, value } => {
                self.store.push_path(&key, &path, value)?;
                Ok(Response::ok())
            }
            Command::PathPop { key, path } => {
                let head = self.store.pop_path(&key, &path)?;
                Response::json(&head)
            }
            Command::PathIncr { key, path, delta } => {
                let updated = self.store.incr_path(&key, &path, &delta)?;
                Ok(Response::Integer(updated))
            }
            Command::PathDel { key, path } => {
                self.store.remove_path(&key, &path)?;
                Ok(Response::ok())
            }
            Command::PathLen { key, path } => {
                let len = self.store.array_len(&key, &path)?;
                Ok(Response::Integer(len as i64))
            }
            Command::Save => {
                self.store.save(Self::DUMP_FILENAME)?;
                Ok(Response::ok())
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the document store
    pub fn store(&self) -> &ShardedStore {
        &self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
