//! Value types shared by the board model and the protocol codec.

use serde::{Deserialize, Serialize};

/// Largest board side the client accepts.
///
/// A dimension announcement above this value is rejected, and move requests
/// with a coordinate at or above it cannot be encoded.
pub const MAX_DIMENSION: usize = 26;

// ── Cell marks ────────────────────────────────────────────────────────────────

/// The occupant of a single board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellMark {
    #[default]
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl CellMark {
    /// Returns `true` for [`CellMark::Empty`].
    pub fn is_empty(self) -> bool {
        matches!(self, CellMark::Empty)
    }

    /// Wire digit used in `MOVE_MADE` broadcasts.  `Empty` has none.
    pub fn wire_digit(self) -> Option<u8> {
        match self {
            CellMark::Empty => None,
            CellMark::PlayerOne => Some(1),
            CellMark::PlayerTwo => Some(2),
        }
    }
}

impl TryFrom<u8> for CellMark {
    type Error = ();

    /// Only player marks travel on the wire; `0` is not a valid placement.
    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            1 => Ok(CellMark::PlayerOne),
            2 => Ok(CellMark::PlayerTwo),
            _ => Err(()),
        }
    }
}

// ── Turn ownership ────────────────────────────────────────────────────────────

/// Which side is authorised to submit the next move, per the latest server notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TurnOwner {
    Local,
    /// Nothing is local until the server says so.
    #[default]
    Remote,
}

// ── Game status ───────────────────────────────────────────────────────────────

/// Overall status of the match as seen from this client.
///
/// `InProgress` is the only non-terminal value.  Once any other value is
/// reached the model refuses all further mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Tie,
    Won,
    Lost,
    Error,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

/// Outcome carried by an end-of-game notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Tie,
    Won,
    Lost,
}

impl From<Outcome> for GameStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Tie => GameStatus::Tie,
            Outcome::Won => GameStatus::Won,
            Outcome::Lost => GameStatus::Lost,
        }
    }
}

// ── Cell updates ──────────────────────────────────────────────────────────────

/// One `(row, col, mark)` triple from a piece-placement broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellUpdate {
    pub row: usize,
    pub col: usize,
    pub mark: CellMark,
}

impl CellUpdate {
    pub fn new(row: usize, col: usize, mark: CellMark) -> Self {
        Self { row, col, mark }
    }
}
