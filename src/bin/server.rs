//! jsonkv Server Binary
//!
//! Starts the TCP server for jsonkv.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use jsonkv::network::Server;
use jsonkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// jsonkv Server
#[derive(Parser, Debug)]
#[command(name = "jsonkv-server")]
#[command(about = "Sharded JSON document store with path queries")]
#[command(version)]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(short, long)]
    listen: Option<String>,

    /// Number of shards
    #[arg(short, long)]
    shards: Option<usize>,

    /// Maximum concurrent connections
    #[arg(short, long)]
    max_connections: Option<usize>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jsonkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("jsonkv Server v{}", jsonkv::VERSION);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Shards: {}", config.shard_count);

    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, engine) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Defaults, then the config file, then command-line flags
fn build_config(args: &Args) -> jsonkv::Result<Config> {
    let base = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let mut builder = Config::builder()
        .shard_count(base.shard_count)
        .listen_addr(base.listen_addr)
        .max_connections(base.max_connections)
        .read_timeout_ms(base.read_timeout_ms)
        .write_timeout_ms(base.write_timeout_ms);

    if let Some(listen) = &args.listen {
        builder = builder.listen_addr(listen.as_str());
    }
    if let Some(shards) = args.shards {
        builder = builder.shard_count(shards);
    }
    if let Some(max) = args.max_connections {
        builder = builder.max_connections(max);
    }

    let config = builder.build();
    config.validate()?;
    Ok(config)
}
