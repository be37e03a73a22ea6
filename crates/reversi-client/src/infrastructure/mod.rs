//! Infrastructure layer for the client application.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `reversi_core`, but MUST NOT be imported by the `application` layer.
//!
//! # Sub-modules
//!
//! - **`network`** – TCP connection, the protocol state machine, and the
//!   receive loop that feeds the board model.
//! - **`config`** – Optional TOML configuration file for the binary.
//! - **`console`** – Plain-text board rendering and command parsing used by
//!   the `reversi-client` binary.

pub mod config;
pub mod console;
pub mod network;
