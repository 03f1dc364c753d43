//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol (RESP).
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! *<argc>\r\n
//! $<len>\r\n<command name>\r\n
//! $<len>\r\n<arg 1>\r\n
//! ...
//! ```
//! An inline request (`doc-get user:1\r\n`) is accepted as well; its
//! arguments are split on whitespace.
//!
//! ### Response Format
//! ```text
//! +OK\r\n                  simple status
//! -ERR <message>\r\n       error
//! $<len>\r\n<payload>\r\n  bulk payload
//! $-1\r\n                  nil
//! :<n>\r\n                 integer
//! ```

use std::io::{self, BufRead, Read, Write};

use bytes::Bytes;

use super::{Request, Response};
use crate::error::{JsonKvError, Result};

/// Maximum bulk payload size (16 MB)
pub const MAX_BULK_SIZE: usize = 16 * 1024 * 1024;

/// Maximum number of arguments after the command name
pub const MAX_ARGS: usize = 1024;

/// Maximum length of a header or inline line (64 KB)
pub const MAX_LINE_SIZE: usize = 64 * 1024;

const CRLF: &[u8] = b"\r\n";

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request as a multi-bulk array
pub fn encode_request(request: &Request) -> Vec<u8> {
    let mut message = Vec::new();
    message.extend_from_slice(format!("*{}\r\n", request.args.len() + 1).as_bytes());
    push_bulk(&mut message, request.name.as_bytes());
    for arg in &request.args {
        push_bulk(&mut message, arg);
    }
    message
}

/// Decode a request from a complete buffer
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let mut reader = bytes;
    read_request(&mut reader).map_err(|e| incomplete(e, "request"))
}

/// Read a complete request from a stream
///
/// Blocks until a complete request is received or an error occurs. End of
/// stream before the first byte is reported as `UnexpectedEof`.
pub fn read_request<R: BufRead>(reader: &mut R) -> Result<Request> {
    loop {
        let line = read_line(reader)?;

        if line.first() == Some(&b'*') {
            let count = parse_length(&line[1..], "array length")?;
            if count < 1 {
                return Err(JsonKvError::Protocol("empty request array".to_string()));
            }
            let count = count as usize;
            if count > MAX_ARGS + 1 {
                return Err(JsonKvError::Protocol(format!(
                    "too many arguments: {} (max {})",
                    count - 1,
                    MAX_ARGS
                )));
            }

            let name = read_bulk(reader)?.ok_or_else(|| {
                JsonKvError::Protocol("nil command name".to_string())
            })?;
            let mut args = Vec::with_capacity(count - 1);
            for _ in 1..count {
                let arg = read_bulk(reader)?
                    .ok_or_else(|| JsonKvError::Protocol("nil argument".to_string()))?;
                args.push(arg);
            }
            return Ok(Request::new(command_name(&name)?, args));
        }

        // Inline request; blank lines are skipped
        let mut words = line
            .split(|b| b.is_ascii_whitespace())
            .filter(|word| !word.is_empty());
        let Some(name) = words.next() else {
            continue;
        };
        let args: Vec<Bytes> = words.map(Bytes::copy_from_slice).collect();
        if args.len() > MAX_ARGS {
            return Err(JsonKvError::Protocol(format!(
                "too many arguments: {} (max {})",
                args.len(),
                MAX_ARGS
            )));
        }
        return Ok(Request::new(command_name(name)?, args));
    }
}

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
pub fn encode_response(response: &Response) -> Vec<u8> {
    let mut message = Vec::new();
    match response {
        Response::Simple(status) => {
            message.push(b'+');
            message.extend_from_slice(single_line(status).as_bytes());
            message.extend_from_slice(CRLF);
        }
        Response::Error(text) => {
            message.extend_from_slice(b"-ERR ");
            message.extend_from_slice(single_line(text).as_bytes());
            message.extend_from_slice(CRLF);
        }
        Response::Bulk(payload) => push_bulk(&mut message, payload),
        Response::Nil => message.extend_from_slice(b"$-1\r\n"),
        Response::Integer(n) => message.extend_from_slice(format!(":{}\r\n", n).as_bytes()),
    }
    message
}

/// Decode a response from a complete buffer
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let mut reader = bytes;
    read_response(&mut reader).map_err(|e| incomplete(e, "response"))
}

/// Read a complete response from a stream
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let line = read_line(reader)?;
    let Some((&marker, rest)) = line.split_first() else {
        return Err(JsonKvError::Protocol("empty response line".to_string()));
    };

    match marker {
        b'+' => Ok(Response::Simple(response_text(rest)?)),
        b'-' => {
            let text = response_text(rest)?;
            let message = text.strip_prefix("ERR ").unwrap_or(&text);
            Ok(Response::Error(message.to_string()))
        }
        b':' => Ok(Response::Integer(parse_length(rest, "integer reply")?)),
        b'$' => match bulk_body(reader, rest)? {
            Some(payload) => Ok(Response::Bulk(payload)),
            None => Ok(Response::Nil),
        },
        _ => Err(JsonKvError::Protocol(format!(
            "unknown response type: 0x{:02x}",
            marker
        ))),
    }
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Framing helpers
// =============================================================================

fn push_bulk(message: &mut Vec<u8>, payload: &[u8]) {
    message.extend_from_slice(format!("${}\r\n", payload.len()).as_bytes());
    message.extend_from_slice(payload);
    message.extend_from_slice(CRLF);
}

/// Read one line, without its `\r\n` (a bare `\n` is accepted)
fn read_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let limit = (MAX_LINE_SIZE + CRLF.len()) as u64;
    let read = reader.by_ref().take(limit).read_until(b'\n', &mut line)?;

    if read == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    if line.last() != Some(&b'\n') {
        if read as u64 >= limit {
            return Err(JsonKvError::Protocol(format!(
                "line too long (max {} bytes)",
                MAX_LINE_SIZE
            )));
        }
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }

    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(line)
}

/// Read a `$<len>` header and its payload; `None` for `$-1`
fn read_bulk<R: BufRead>(reader: &mut R) -> Result<Option<Bytes>> {
    let line = read_line(reader)?;
    match line.split_first() {
        Some((b'$', rest)) => bulk_body(reader, rest),
        _ => Err(JsonKvError::Protocol(format!(
            "expected bulk string, got '{}'",
            String::from_utf8_lossy(&line)
        ))),
    }
}

fn bulk_body<R: BufRead>(reader: &mut R, header: &[u8]) -> Result<Option<Bytes>> {
    let len = parse_length(header, "bulk length")?;
    if len == -1 {
        return Ok(None);
    }
    if len < 0 || len as u64 > MAX_BULK_SIZE as u64 {
        return Err(JsonKvError::Protocol(format!(
            "bulk length {} out of range (max {})",
            len, MAX_BULK_SIZE
        )));
    }

    let mut payload = vec![0u8; len as usize + CRLF.len()];
    reader.read_exact(&mut payload)?;
    if !payload.ends_with(CRLF) {
        return Err(JsonKvError::Protocol(
            "bulk string not terminated by CRLF".to_string(),
        ));
    }
    payload.truncate(len as usize);
    Ok(Some(Bytes::from(payload)))
}

fn parse_length(digits: &[u8], what: &str) -> Result<i64> {
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| {
            JsonKvError::Protocol(format!(
                "invalid {}: '{}'",
                what,
                String::from_utf8_lossy(digits)
            ))
        })
}

fn command_name(name: &[u8]) -> Result<String> {
    String::from_utf8(name.to_vec())
        .map_err(|_| JsonKvError::Protocol("command name is not UTF-8".to_string()))
}

fn response_text(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|_| JsonKvError::Protocol("status line is not UTF-8".to_string()))
}

/// Status and error lines must not break the framing
fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn incomplete(err: JsonKvError, what: &str) -> JsonKvError {
    match err {
        JsonKvError::Io(ref e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            JsonKvError::Protocol(format!("incomplete {}", what))
        }
        other => other,
    }
}
