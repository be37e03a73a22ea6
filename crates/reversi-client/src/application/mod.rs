//! Application layer use cases for the client application.
//!
//! # What use cases does the client have?
//!
//! - **`play_move`** – Validates a move the local player asked for against the
//!   current board and, when it passes, hands it to a [`MoveSubmitter`].  The
//!   network client is injected as the submitter at construction time.
//!
//! - **`game_status`** – Condenses a [`reversi_core::BoardSnapshot`] into the
//!   short status strings the presentation shows (whose turn, moves left,
//!   final result).

pub mod game_status;
pub mod play_move;

pub use game_status::StatusSummary;
pub use play_move::{MoveRequestOutcome, MoveSubmitter, PlayMoveUseCase, SubmitError};
