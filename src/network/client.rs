//! Blocking client
//!
//! Sends requests over one TCP connection and reads the matching responses.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::{read_response, write_request, Command, Request, Response};

/// A client connection to a jsonkv server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Bound how long a call may wait for its response
    pub fn set_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    /// Send a raw request and wait for its response
    pub fn request(&mut self, request: &Request) -> Result<Response> {
        write_request(&mut self.writer, request)?;
        read_response(&mut self.reader)
    }

    /// Send a command by name with raw arguments
    pub fn call(&mut self, name: &str, args: &[&[u8]]) -> Result<Response> {
        let args = args.iter().map(|a| Bytes::copy_from_slice(a)).collect();
        self.request(&Request::new(name, args))
    }

    /// Send a typed command
    pub fn send(&mut self, command: &Command) -> Result<Response> {
        self.request(&command.to_request())
    }
}
