//! Network infrastructure for the client application.
//!
//! Architecture:
//! - [`Connection`] owns the socket split into a buffered reader, a writer,
//!   and a shutdown handle.
//! - [`NetworkClient`] runs the receive loop on its own thread, applies
//!   decoded [`reversi_core::ProtocolEvent`]s to the board model, and exposes
//!   a thread-safe `submit_move`.
//!
//! # State machine
//!
//! ```text
//! Connecting ─▶ AwaitingDimension ─▶ Playing ─▶ GameOver ─▶ Closed
//!                      │                │                     ▲
//!                      └────────────────┴──── any fault / close()
//! ```

pub mod client;
pub mod connection;

use std::io;

use reversi_core::{CodecError, ModelError};
use serde::Serialize;
use thiserror::Error;

pub use client::NetworkClient;
pub use connection::{Connection, ConnectionShutdown};

/// Lifecycle state of a [`NetworkClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClientState {
    /// TCP connect in progress.
    Connecting,
    /// Connected; the first server message must announce the board side.
    AwaitingDimension,
    /// Board allocated; moves may be submitted.
    Playing,
    /// The server announced the outcome; draining until the server closes.
    GameOver,
    /// Connection released.  Terminal.
    Closed,
}

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// TCP connection to the server failed.
    #[error("failed to connect to reversi server at {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: io::Error,
    },
    /// An I/O error occurred while setting up the connection.
    #[error("connection I/O error: {0}")]
    Io(#[from] io::Error),
    /// A move was submitted outside the `Playing` state.  No I/O was done.
    #[error("cannot submit a move while the client is {state:?}")]
    NotPlaying { state: ClientState },
    /// A write failed; the client is now closed.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The receive loop thread could not be started.
    #[error("failed to spawn receive loop: {0}")]
    Spawn(#[source] io::Error),
}
