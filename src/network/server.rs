//! TCP Server
//!
//! Accepts connections and runs each one on its own thread.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;

use super::Connection;
use crate::config::Config;
use crate::engine::Engine;
use crate::error::Result;
use crate::protocol::{write_response, Response};

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Open client streams, kept so shutdown can unblock their readers
type Registry = Arc<Mutex<HashMap<u64, TcpStream>>>;

/// Cloneable handle that stops a running [`Server`]
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Ask the server to stop accepting and close live connections
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// TCP server for jsonkv
///
/// One thread per client connection; the store does all synchronization.
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: TcpListener,
    shutdown: ShutdownHandle,
    active: Arc<AtomicUsize>,
    next_id: AtomicU64,
    registry: Registry,
}

impl Server {
    /// Bind the listen address from `config`
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        // Non-blocking accept so the loop can notice a shutdown request
        listener.set_nonblocking(true)?;

        Ok(Self {
            config,
            engine,
            listener,
            shutdown: ShutdownHandle::default(),
            active: Arc::new(AtomicUsize::new(0)),
            next_id: AtomicU64::new(0),
            registry: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Address actually bound (useful with port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Handle for stopping the server from another thread
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Number of connections currently being served
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Start the server (blocking until shutdown)
    pub fn run(&self) -> Result<()> {
        tracing::info!("Listening on {}", self.local_addr()?);
        let wait_group = WaitGroup::new();

        while !self.shutdown.is_shutdown() {
            match self.listener.accept() {
                Ok((stream, peer)) => self.dispatch(stream, peer, &wait_group),
                Err(e) if e.kind() == ErrorKind::WouldBlock => thread::sleep(ACCEPT_POLL_INTERVAL),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }

        let open: Vec<TcpStream> = self.registry.lock().drain().map(|(_, s)| s).collect();
        tracing::info!("Shutting down, closing {} connection(s)", open.len());
        for stream in open {
            let _ = stream.shutdown(Shutdown::Both);
        }
        wait_group.wait();

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Hand an accepted stream to a new connection thread
    fn dispatch(&self, stream: TcpStream, peer: SocketAddr, wait_group: &WaitGroup) {
        if self.active.load(Ordering::Acquire) >= self.config.max_connections {
            tracing::warn!(
                "Rejecting {}: connection limit {} reached",
                peer,
                self.config.max_connections
            );
            reject(stream, "max number of clients reached");
            return;
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let registered = stream.set_nonblocking(false).and_then(|_| stream.try_clone());
        match registered {
            Ok(clone) => {
                self.registry.lock().insert(id, clone);
            }
            Err(e) => {
                tracing::warn!("Failed to set up connection from {}: {}", peer, e);
                return;
            }
        }
        self.active.fetch_add(1, Ordering::AcqRel);

        let guard = ConnectionGuard {
            id,
            active: Arc::clone(&self.active),
            registry: Arc::clone(&self.registry),
            _wait: wait_group.clone(),
        };
        let engine = Arc::clone(&self.engine);
        let (read_ms, write_ms) = (self.config.read_timeout_ms, self.config.write_timeout_ms);

        let spawned = thread::Builder::new()
            .name(format!("jsonkv-conn-{}", id))
            .spawn(move || {
                let _guard = guard;
                if let Err(e) = serve(stream, engine, read_ms, write_ms) {
                    tracing::debug!("Connection {} from {} ended with error: {}", id, peer, e);
                }
            });

        // A failed spawn drops the closure, and with it the guard
        if let Err(e) = spawned {
            tracing::error!("Failed to spawn connection thread: {}", e);
        }
    }
}

fn serve(stream: TcpStream, engine: Arc<Engine>, read_ms: u64, write_ms: u64) -> Result<()> {
    let mut connection = Connection::new(stream, engine)?;
    connection.set_timeouts(read_ms, write_ms)?;
    connection.handle()
}

fn reject(mut stream: TcpStream, message: &str) {
    let _ = stream.set_nonblocking(false);
    let _ = write_response(&mut stream, &Response::error(message));
    let _ = stream.shutdown(Shutdown::Both);
}

/// Releases a connection's slot when its thread ends
struct ConnectionGuard {
    id: u64,
    active: Arc<AtomicUsize>,
    registry: Registry,
    _wait: WaitGroup,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.id);
        self.active.fetch_sub(1, Ordering::AcqRel);
    }
}
