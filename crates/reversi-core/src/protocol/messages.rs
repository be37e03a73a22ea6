//! Reversi line protocol message kinds and the decoded event type.
//!
//! Every message is one line of UTF-8 text terminated by `\n`.  The first
//! whitespace-separated token is an upper-case keyword that selects the kind;
//! the remaining tokens are its arguments.
//!
//! ```text
//! server → client                      event
//! ─────────────────────────────────────────────────────────────
//! CONNECT 8                            DimensionAnnounced(8)
//! MOVE_MADE 3 4 1 [r c m ...]          CellsUpdated([(3,4,PlayerOne), ...])
//! TURN LOCAL | TURN REMOTE             TurnChanged(owner)
//! GAME_WON | GAME_LOST | GAME_TIED     GameOver(outcome)
//! ERROR <free text>                    ProtocolError(text)
//!
//! client → server
//! ─────────────────────────────────────────────────────────────
//! MOVE 2 3
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::cell::{CellUpdate, Outcome, TurnOwner};

// ── Keywords ──────────────────────────────────────────────────────────────────

/// Every keyword the protocol defines, in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    Connect,
    MoveMade,
    Turn,
    GameWon,
    GameLost,
    GameTied,
    Error,
    /// Client → server move request.
    Move,
}

impl MessageKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            MessageKind::Connect => "CONNECT",
            MessageKind::MoveMade => "MOVE_MADE",
            MessageKind::Turn => "TURN",
            MessageKind::GameWon => "GAME_WON",
            MessageKind::GameLost => "GAME_LOST",
            MessageKind::GameTied => "GAME_TIED",
            MessageKind::Error => "ERROR",
            MessageKind::Move => "MOVE",
        }
    }
}

impl TryFrom<&str> for MessageKind {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, ()> {
        match value {
            "CONNECT" => Ok(MessageKind::Connect),
            "MOVE_MADE" => Ok(MessageKind::MoveMade),
            "TURN" => Ok(MessageKind::Turn),
            "GAME_WON" => Ok(MessageKind::GameWon),
            "GAME_LOST" => Ok(MessageKind::GameLost),
            "GAME_TIED" => Ok(MessageKind::GameTied),
            "ERROR" => Ok(MessageKind::Error),
            "MOVE" => Ok(MessageKind::Move),
            _ => Err(()),
        }
    }
}

/// Argument tokens for `TURN`.
pub const TURN_LOCAL: &str = "LOCAL";
pub const TURN_REMOTE: &str = "REMOTE";

// ── Decoded events ────────────────────────────────────────────────────────────

/// One decoded server → client message.
///
/// A closed set: the network client matches on it exhaustively, so a new kind
/// cannot slip through unhandled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtocolEvent {
    /// First message of every session: the board side.
    DimensionAnnounced(usize),
    /// One or more pieces placed (or flipped) in a single broadcast.
    CellsUpdated(Vec<CellUpdate>),
    /// Whose move is next.
    TurnChanged(TurnOwner),
    /// The match ended.
    GameOver(Outcome),
    /// Free-text error notice from the server.
    ProtocolError(String),
}

impl ProtocolEvent {
    /// The keyword this event travels under.
    pub fn kind(&self) -> MessageKind {
        match self {
            ProtocolEvent::DimensionAnnounced(_) => MessageKind::Connect,
            ProtocolEvent::CellsUpdated(_) => MessageKind::MoveMade,
            ProtocolEvent::TurnChanged(_) => MessageKind::Turn,
            ProtocolEvent::GameOver(Outcome::Won) => MessageKind::GameWon,
            ProtocolEvent::GameOver(Outcome::Lost) => MessageKind::GameLost,
            ProtocolEvent::GameOver(Outcome::Tie) => MessageKind::GameTied,
            ProtocolEvent::ProtocolError(_) => MessageKind::Error,
        }
    }
}
