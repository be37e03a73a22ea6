//! The transport under a [`NetworkClient`](super::NetworkClient).
//!
//! A [`Connection`] is one socket split three ways:
//!
//! - a buffered **reader** handed to the receive-loop thread,
//! - a **writer** kept behind a mutex for `submit_move`,
//! - a **shutdown** handle that any thread may call to tear the socket down.
//!
//! Calling the shutdown handle is what unblocks a receive loop parked in a
//! blocking read: the read returns end-of-stream and the loop exits.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::Arc;

use tracing::{debug, info};

use super::ClientError;

/// Tears down the underlying transport.
///
/// Implementations must be safe to call from any thread and more than once.
pub trait ConnectionShutdown: Send + Sync {
    fn shutdown(&self) -> io::Result<()>;
}

impl ConnectionShutdown for TcpStream {
    fn shutdown(&self) -> io::Result<()> {
        TcpStream::shutdown(self, Shutdown::Both)
    }
}

/// A connected transport, not yet attached to a client.
pub struct Connection {
    peer: String,
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
    shutdown: Arc<dyn ConnectionShutdown>,
}

impl Connection {
    /// Resolves `host:port` and connects over TCP.
    ///
    /// # Errors
    ///
    /// [`ClientError::ConnectFailed`] if resolution or every candidate
    /// address fails.
    pub fn open(host: &str, port: u16) -> Result<Self, ClientError> {
        let addr = format!("{host}:{port}");
        let connect_failed = |source| ClientError::ConnectFailed {
            addr: addr.clone(),
            source,
        };

        let candidates = (host, port).to_socket_addrs().map_err(connect_failed)?;
        let mut last_err = io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses");
        for candidate in candidates {
            match TcpStream::connect(candidate) {
                Ok(stream) => {
                    info!(peer = %candidate, "connected to reversi server");
                    return Self::from_tcp(stream).map_err(connect_failed);
                }
                Err(e) => {
                    debug!(peer = %candidate, "connect attempt failed: {e}");
                    last_err = e;
                }
            }
        }
        Err(connect_failed(last_err))
    }

    /// Wraps an already connected TCP stream.
    pub fn from_tcp(stream: TcpStream) -> io::Result<Self> {
        // Moves are single short lines; send them without Nagle delay.
        stream.set_nodelay(true)?;
        let peer = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());
        let reader = BufReader::new(stream.try_clone()?);
        let writer = stream.try_clone()?;
        Ok(Self {
            peer,
            reader: Box::new(reader),
            writer: Box::new(writer),
            shutdown: Arc::new(stream),
        })
    }

    /// Assembles a connection from arbitrary parts.
    ///
    /// Used by tests to substitute an in-memory reader or a failing writer.
    pub fn from_parts(
        peer: impl Into<String>,
        reader: impl BufRead + Send + 'static,
        writer: impl Write + Send + 'static,
        shutdown: Arc<dyn ConnectionShutdown>,
    ) -> Self {
        Self {
            peer: peer.into(),
            reader: Box::new(reader),
            writer: Box::new(writer),
            shutdown,
        }
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    #[allow(clippy::type_complexity)]
    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        Box<dyn BufRead + Send>,
        Box<dyn Write + Send>,
        Arc<dyn ConnectionShutdown>,
    ) {
        (self.peer, self.reader, self.writer, self.shutdown)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").field("peer", &self.peer).finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
