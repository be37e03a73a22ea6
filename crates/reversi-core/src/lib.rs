//! # reversi-core
//!
//! Shared library for the Reversi network client containing the board model,
//! its observer contract, and the line protocol codec.
//!
//! This crate has zero dependencies on sockets, threads, or UI frameworks.
//! The socket side lives in `reversi-client`.
//!
//! # Architecture overview
//!
//! A remote server is the authority on a Reversi match.  It streams short text
//! messages ("a piece was placed", "it is your turn", "you won") to the client,
//! and the client keeps a local mirror of the game so a presentation layer can
//! draw it.
//!
//! - **`domain`** – The [`BoardModel`]: grid contents, whose turn it is, the
//!   terminal status, and the subscribe/notify mechanism observers use to learn
//!   that something changed.  All state sits behind a lock owned by the model.
//!
//! - **`protocol`** – The [`ProtocolEvent`] tagged variant and the codec that
//!   turns one inbound line into exactly one event, and a move request into
//!   exactly one outbound line.  Pure functions, no I/O.

pub mod domain;
pub mod protocol;

pub use domain::board::{BoardModel, BoardSnapshot, Fault, ModelError};
pub use domain::cell::{CellMark, CellUpdate, GameStatus, Outcome, TurnOwner, MAX_DIMENSION};
pub use domain::observer::{BoardChanged, BoardObserver, SubscriptionId};
pub use protocol::codec::{decode_message, encode_event, encode_move, CodecError};
pub use protocol::messages::ProtocolEvent;
