//! reversi-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does reversi-client do?
//!
//! The server owns the Reversi match.  The client:
//!
//! 1. Connects to the server over TCP.
//! 2. Waits for the dimension announcement and allocates the local board.
//! 3. Runs a dedicated receive-loop thread that decodes every server line and
//!    applies it to the shared [`reversi_core::BoardModel`], which in turn
//!    notifies the presentation layer.
//! 4. Lets the presentation submit moves from its own thread while the
//!    receive loop keeps running.

/// Application layer: use cases driven by the presentation.
pub mod application;

/// Infrastructure layer: network client, configuration, console front end.
pub mod infrastructure;
