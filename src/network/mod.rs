//! Network Module
//!
//! TCP server, per-client connection handling, and a blocking client.
//!
//! ## Architecture
//! - Single acceptor thread
//! - One thread per client connection
//! - Requests routed through Engine

mod server;
mod connection;
mod client;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
pub use client::Client;
