//! Command definitions
//!
//! A [`Request`] is what the codec reads off the wire: a command name and
//! raw argument buffers. [`Command::parse`] checks arity and decodes those
//! buffers into keys, paths and JSON values before anything touches the
//! store.

use bytes::Bytes;
use serde_json::{Number, Value};

use crate::error::{JsonKvError, Result};

/// Command name plus ordered argument buffers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Command name as sent by the client
    pub name: String,

    /// Arguments following the name
    pub args: Vec<Bytes>,
}

impl Request {
    pub fn new(name: impl Into<String>, args: Vec<Bytes>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Ping (health check)
    Ping,

    /// Store a whole document
    DocSet { key: String, value: Value },

    /// Fetch a whole document
    DocGet { key: String },

    /// Delete a whole document
    DocDel { key: String },

    /// Fetch every document whose key starts with a prefix
    DocScan { prefix: String },

    /// Store a value at a path inside a document
    PathSet { key: String, path: String, value: Value },

    /// Fetch the value at a path
    PathGet { key: String, path: String },

    /// Append to the array at a path
    PathPush { key: String, path: String, value: Value },

    /// Remove the head of the array at a path
    PathPop { key: String, path: String },

    /// Add to the number at a path
    PathIncr { key: String, path: String, delta: Number },

    /// Delete the field or element at a path
    PathDel { key: String, path: String },

    /// Length of the array at a path
    PathLen { key: String, path: String },

    /// Persist the store (`save` and `bgsave`)
    Save,
}

impl Command {
    /// Decode a request into a command.
    ///
    /// Names are case-insensitive. Wrong arity, non-UTF-8 keys or paths and
    /// malformed JSON are `InvalidParameter`.
    pub fn parse(request: &Request) -> Result<Self> {
        let name = request.name.to_ascii_lowercase();
        let args = request.args.as_slice();

        let command = match name.as_str() {
            "ping" => {
                arity(&name, args, 0)?;
                Command::Ping
            }
            "doc-set" => {
                arity(&name, args, 2)?;
                Command::DocSet {
                    key: text(&args[0], "key")?,
                    value: json(&args[1])?,
                }
            }
            "doc-get" => {
                arity(&name, args, 1)?;
                Command::DocGet {
                    key: text(&args[0], "key")?,
                }
            }
            "doc-del" => {
                arity(&name, args, 1)?;
                Command::DocDel {
                    key: text(&args[0], "key")?,
                }
            }
            "doc-scan" => {
                arity(&name, args, 1)?;
                Command::DocScan {
                    prefix: text(&args[0], "prefix")?,
                }
            }
            "path-set" => {
                arity(&name, args, 3)?;
                Command::PathSet {
                    key: text(&args[0], "key")?,
                    path: text(&args[1], "path")?,
                    value: json(&args[2])?,
                }
            }
            "path-get" => {
                arity(&name, args, 2)?;
                Command::PathGet {
                    key: text(&args[0], "key")?,
                    path: text(&args[1], "path")?,
                }
            }
            "path-push" => {
                arity(&name, args, 3)?;
                Command::PathPush {
                    key: text(&args[0], "key")?,
                    path: text(&args[1], "path")?,
                    value: json(&args[2])?,
                }
            }
            "path-pop" => {
                arity(&name, args, 2)?;
                Command::PathPop {
                    key: text(&args[0], "key")?,
                    path: text(&args[1], "path")?,
                }
            }
            "path-incr" => {
                arity(&name, args, 3)?;
                Command::PathIncr {
                    key: text(&args[0], "key")?,
                    path: text(&args[1], "path")?,
                    delta: number(&args[2])?,
                }
            }
            "path-del" => {
                arity(&name, args, 2)?;
                Command::PathDel {
                    key: text(&args[0], "key")?,
                    path: text(&args[1], "path")?,
                }
            }
            "path-len" => {
                arity(&name, args, 2)?;
                Command::PathLen {
                    key: text(&args[0], "key")?,
                    path: text(&args[1], "path")?,
                }
            }
            "save" | "bgsave" => {
                arity(&name, args, 0)?;
                Command::Save
            }
            _ => return Err(JsonKvError::UnknownCommand(request.name.clone())),
        };

        Ok(command)
    }

    /// Wire name of the command
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "ping",
            Command::DocSet { .. } => "doc-set",
            Command::DocGet { .. } => "doc-get",
            Command::DocDel { .. } => "doc-del",
            Command::DocScan { .. } => "doc-scan",
            Command::PathSet { .. } => "path-set",
            Command::PathGet { .. } => "path-get",
            Command::PathPush { .. } => "path-push",
            Command::PathPop { .. } => "path-pop",
            Command::PathIncr { .. } => "path-incr",
            Command::PathDel { .. } => "path-del",
            Command::PathLen { .. } => "path-len",
            Command::Save => "save",
        }
    }

    /// Encode the command back into a request (client side)
    pub fn to_request(&self) -> Request {
        let args = match self {
            Command::Ping | Command::Save => Vec::new(),
            Command::DocGet { key } | Command::DocDel { key } => vec![bytes_of(key)],
            Command::DocScan { prefix } => vec![bytes_of(prefix)],
            Command::DocSet { key, value } => vec![bytes_of(key), json_bytes(value)],
            Command::PathSet { key, path, value } | Command::PathPush { key, path, value } => {
                vec![bytes_of(key), bytes_of(path), json_bytes(value)]
            }
            Command::PathIncr { key, path, delta } => {
                vec![bytes_of(key), bytes_of(path), Bytes::from(delta.to_string())]
            }
            Command::PathGet { key, path }
            | Command::PathPop { key, path }
            | Command::PathDel { key, path }
            | Command::PathLen { key, path } => vec![bytes_of(key), bytes_of(path)],
        };
        Request::new(self.name(), args)
    }
}

fn arity(name: &str, args: &[Bytes], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(JsonKvError::InvalidParameter(format!(
            "'{}' takes {} argument(s), got {}",
            name,
            expected,
            args.len()
        )));
    }
    Ok(())
}

fn text(arg: &Bytes, what: &str) -> Result<String> {
    std::str::from_utf8(arg)
        .map(str::to_string)
        .map_err(|_| JsonKvError::InvalidParameter(format!("{} is not valid UTF-8", what)))
}

fn json(arg: &Bytes) -> Result<Value> {
    serde_json::from_slice(arg)
        .map_err(|e| JsonKvError::InvalidParameter(format!("malformed JSON: {}", e)))
}

fn number(arg: &Bytes) -> Result<Number> {
    match json(arg)? {
        Value::Number(n) => Ok(n),
        other => Err(JsonKvError::InvalidParameter(format!(
            "delta must be a number, got {}",
            other
        ))),
    }
}

fn bytes_of(text: &str) -> Bytes {
    Bytes::copy_from_slice(text.as_bytes())
}

fn json_bytes(value: &Value) -> Bytes {
    Bytes::from(value.to_string())
}
