//! PlayMoveUseCase: turns a local click (or typed coordinate) into a move request.
//!
//! The server is authoritative over the rules.  This use case only refuses
//! requests that are certain to be rejected (not our turn, cell taken, off
//! the board) so the network is not bothered with them.

use std::sync::Arc;

use reversi_core::BoardModel;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a submitter could not send a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// No game is in progress on the connection.
    #[error("no game in progress")]
    NotPlaying,
    /// The move could not be expressed on the wire.
    #[error("move cannot be sent: {0}")]
    Invalid(String),
    /// The connection failed while sending.
    #[error("connection lost: {0}")]
    ConnectionLost(String),
}

/// Sends a move request to the server.
///
/// Implemented by the network client in the infrastructure layer.
#[cfg_attr(test, mockall::automock)]
pub trait MoveSubmitter: Send + Sync {
    fn submit_move(&self, row: usize, col: usize) -> Result<(), SubmitError>;
}

/// Result of [`PlayMoveUseCase::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveRequestOutcome {
    /// The request went out; the board changes when the server broadcasts it.
    Sent,
    /// The server has not handed the turn to this client.
    NotYourTurn,
    /// Off the board, already occupied, or the game is over.
    Invalid,
    /// The submitter refused or failed.
    Rejected(SubmitError),
}

/// The Play Move use case.
pub struct PlayMoveUseCase {
    model: Arc<BoardModel>,
    submitter: Arc<dyn MoveSubmitter>,
}

impl PlayMoveUseCase {
    pub fn new(model: Arc<BoardModel>, submitter: Arc<dyn MoveSubmitter>) -> Self {
        Self { model, submitter }
    }

    /// Checks the request against the model and forwards it if plausible.
    ///
    /// Never mutates the model: pieces appear only once the server echoes
    /// the move back.
    pub fn request(&self, row: usize, col: usize) -> MoveRequestOutcome {
        if !self.model.is_local_turn() {
            debug!(row, col, "move ignored: not the local turn");
            return MoveRequestOutcome::NotYourTurn;
        }
        if !self.model.is_legal_move(row, col) {
            debug!(row, col, "move ignored: cell unavailable");
            return MoveRequestOutcome::Invalid;
        }
        match self.submitter.submit_move(row, col) {
            Ok(()) => MoveRequestOutcome::Sent,
            Err(e) => {
                warn!(row, col, "move not sent: {e}");
                MoveRequestOutcome::Rejected(e)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
