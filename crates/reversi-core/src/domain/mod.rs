//! Domain layer: the client-side mirror of a Reversi match.
//!
//! - **`cell`** – Small value types: cell marks, turn owner, game status and
//!   the `CellUpdate` triple carried by move broadcasts.
//! - **`board`** – `BoardModel`, the single shared mutable resource between
//!   the network receive loop and the presentation layer.
//! - **`observer`** – The "something changed" notification contract.

pub mod board;
pub mod cell;
pub mod observer;

pub use board::{BoardModel, BoardSnapshot, Fault, ModelError};
pub use cell::{CellMark, CellUpdate, GameStatus, Outcome, TurnOwner, MAX_DIMENSION};
pub use observer::{BoardChanged, BoardObserver, SubscriptionId};
