//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (RESP)
//!
//! Requests are arrays of bulk strings: the command name followed by its
//! arguments. Keys and paths travel as UTF-8 text, documents and values as
//! JSON text.
//!
//! ### Commands
//! - `ping`
//! - `doc-set key json` / `doc-get key` / `doc-del key` / `doc-scan prefix`
//! - `path-set key path json` / `path-get key path`
//! - `path-push key path json` / `path-pop key path`
//! - `path-incr key path number`
//! - `path-del key path` / `path-len key path`
//! - `save` / `bgsave` (unimplemented)
//!
//! ### Responses
//! - `+OK` / `+PONG`: success
//! - `-ERR <message>`: error
//! - `$<len>`: JSON payload
//! - `$-1`: nil (absent value)
//! - `:<n>`: integer

mod command;
mod response;
mod codec;

pub use command::{Command, Request};
pub use response::Response;
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, read_request,
    read_response, write_request, write_response, MAX_ARGS, MAX_BULK_SIZE, MAX_LINE_SIZE,
};
