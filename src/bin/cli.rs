//! jsonkv CLI Client
//!
//! Command-line interface for interacting with jsonkv.

use clap::{Parser, Subcommand};
use jsonkv::network::Client;
use jsonkv::protocol::Response;

/// jsonkv CLI
#[derive(Parser, Debug)]
#[command(name = "jsonkv-cli")]
#[command(about = "CLI for the jsonkv document store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6380")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Store a whole document
    DocSet {
        key: String,
        /// Document as JSON text
        json: String,
    },

    /// Fetch a whole document
    DocGet { key: String },

    /// Delete a whole document
    DocDel { key: String },

    /// Fetch every document whose key starts with a prefix
    DocScan { prefix: String },

    /// Store a value at a path
    PathSet {
        key: String,
        path: String,
        /// Value as JSON text
        json: String,
    },

    /// Fetch the value at a path
    PathGet { key: String, path: String },

    /// Append a value to the array at a path
    PathPush {
        key: String,
        path: String,
        /// Value as JSON text
        json: String,
    },

    /// Remove the head of the array at a path
    PathPop { key: String, path: String },

    /// Add to the number at a path
    PathIncr {
        key: String,
        path: String,
        #[arg(allow_hyphen_values = true)]
        delta: String,
    },

    /// Delete the field or element at a path
    PathDel { key: String, path: String },

    /// Length of the array at a path
    PathLen { key: String, path: String },
}

impl Commands {
    /// Wire name and argument list
    fn to_call(&self) -> (&'static str, Vec<&str>) {
        match self {
            Commands::Ping => ("ping", vec![]),
            Commands::DocSet { key, json } => ("doc-set", vec![key.as_str(), json.as_str()]),
            Commands::DocGet { key } => ("doc-get", vec![key.as_str()]),
            Commands::DocDel { key } => ("doc-del", vec![key.as_str()]),
            Commands::DocScan { prefix } => ("doc-scan", vec![prefix.as_str()]),
            Commands::PathSet { key, path, json } => {
                ("path-set", vec![key.as_str(), path.as_str(), json.as_str()])
            }
            Commands::PathGet { key, path } => ("path-get", vec![key.as_str(), path.as_str()]),
            Commands::PathPush { key, path, json } => {
                ("path-push", vec![key.as_str(), path.as_str(), json.as_str()])
            }
            Commands::PathPop { key, path } => ("path-pop", vec![key.as_str(), path.as_str()]),
            Commands::PathIncr { key, path, delta } => {
                ("path-incr", vec![key.as_str(), path.as_str(), delta.as_str()])
            }
            Commands::PathDel { key, path } => ("path-del", vec![key.as_str(), path.as_str()]),
            Commands::PathLen { key, path } => ("path-len", vec![key.as_str(), path.as_str()]),
        }
    }
}

fn main() {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Could not connect to {}: {}", args.server, e);
            std::process::exit(1);
        }
    };

    let (name, call_args) = args.command.to_call();
    let call_args: Vec<&[u8]> = call_args.iter().map(|a| a.as_bytes()).collect();

    match client.call(name, &call_args) {
        Ok(Response::Simple(status)) => println!("{}", status),
        Ok(Response::Bulk(payload)) => println!("{}", String::from_utf8_lossy(&payload)),
        Ok(Response::Integer(n)) => println!("(integer) {}", n),
        Ok(Response::Nil) => println!("(nil)"),
        Ok(Response::Error(message)) => {
            eprintln!("(error) {}", message);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            std::process::exit(1);
        }
    }
}
