//! Text codec for the Reversi line protocol.
//!
//! Wire format (one message per line):
//! ```text
//! <KEYWORD>[ <arg>]*\n
//! ```
//! Tokens are separated by ASCII whitespace, keywords are case-sensitive, and
//! a trailing `\r` before the newline is tolerated.  See
//! [`crate::protocol::messages`] for the message catalog.
//!
//! The codec never performs I/O and never touches the board model: feed it a
//! string, get an event back.

use thiserror::Error;

use crate::domain::cell::{CellMark, CellUpdate, Outcome, TurnOwner, MAX_DIMENSION};
use crate::protocol::messages::{MessageKind, ProtocolEvent, TURN_LOCAL, TURN_REMOTE};

/// Errors that can occur while decoding or encoding a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The line does not match any recognised message shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A move coordinate cannot be represented on the wire.
    #[error("coordinate ({row}, {col}) outside the encodable range 0..{max}", max = MAX_DIMENSION)]
    CoordinateOutOfRange { row: usize, col: usize },

    /// An event holds a value the server-side line format cannot carry.
    #[error("event cannot be encoded: {0}")]
    Unencodable(String),
}

fn malformed(detail: impl Into<String>) -> CodecError {
    CodecError::MalformedMessage(detail.into())
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes exactly one server → client line into a [`ProtocolEvent`].
///
/// The line may still carry its `\n` / `\r\n` terminator.
///
/// # Errors
///
/// Returns [`CodecError::MalformedMessage`] for an empty line, an unknown
/// keyword, the wrong number of arguments, non-numeric or out-of-range
/// numbers, or a client-only keyword.
///
/// # Examples
///
/// ```rust
/// use reversi_core::{decode_message, ProtocolEvent, TurnOwner};
///
/// assert_eq!(decode_message("CONNECT 8\n"), Ok(ProtocolEvent::DimensionAnnounced(8)));
/// assert_eq!(decode_message("TURN LOCAL"), Ok(ProtocolEvent::TurnChanged(TurnOwner::Local)));
/// assert!(decode_message("HELLO").is_err());
/// ```
pub fn decode_message(line: &str) -> Result<ProtocolEvent, CodecError> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(malformed("empty message"));
    }

    let (keyword, rest) = match trimmed.split_once(|c: char| c.is_ascii_whitespace()) {
        Some((keyword, rest)) => (keyword, rest.trim_start()),
        None => (trimmed, ""),
    };

    let kind = MessageKind::try_from(keyword)
        .map_err(|_| malformed(format!("unknown message kind {keyword:?}")))?;

    match kind {
        MessageKind::Connect => decode_connect(rest),
        MessageKind::MoveMade => decode_move_made(rest),
        MessageKind::Turn => decode_turn(rest),
        MessageKind::GameWon => decode_game_over(kind, rest, Outcome::Won),
        MessageKind::GameLost => decode_game_over(kind, rest, Outcome::Lost),
        MessageKind::GameTied => decode_game_over(kind, rest, Outcome::Tie),
        MessageKind::Error => Ok(ProtocolEvent::ProtocolError(rest.to_string())),
        MessageKind::Move => Err(malformed("MOVE is a client request, not a server message")),
    }
}

/// Serializes a move request as `MOVE <row> <col>\n`.
///
/// # Errors
///
/// Returns [`CodecError::CoordinateOutOfRange`] if either coordinate is
/// `>= MAX_DIMENSION`.
///
/// # Examples
///
/// ```rust
/// use reversi_core::encode_move;
///
/// assert_eq!(encode_move(2, 3).unwrap(), "MOVE 2 3\n");
/// ```
pub fn encode_move(row: usize, col: usize) -> Result<String, CodecError> {
    if row >= MAX_DIMENSION || col >= MAX_DIMENSION {
        return Err(CodecError::CoordinateOutOfRange { row, col });
    }
    Ok(format!("{} {row} {col}\n", MessageKind::Move.keyword()))
}

/// Renders a server → client event as its wire line (with `\n`).
///
/// The client never sends these; scripted test servers and benchmarks do.
/// For every `Ok` result, `decode_message(&encode_event(e)?) == Ok(e)`.
///
/// # Errors
///
/// Returns [`CodecError::Unencodable`] for an out-of-range dimension or
/// coordinate, an empty or `Empty`-mark cell batch, or error text containing
/// a line break or leading/trailing whitespace (the decoder trims both).
pub fn encode_event(event: &ProtocolEvent) -> Result<String, CodecError> {
    let keyword = event.kind().keyword();
    let line = match event {
        ProtocolEvent::DimensionAnnounced(dim) => {
            if *dim == 0 || *dim > MAX_DIMENSION {
                return Err(CodecError::Unencodable(format!("dimension {dim}")));
            }
            format!("{keyword} {dim}")
        }
        ProtocolEvent::CellsUpdated(updates) => {
            if updates.is_empty() {
                return Err(CodecError::Unencodable("empty cell batch".to_string()));
            }
            let mut line = keyword.to_string();
            for update in updates {
                if update.row >= MAX_DIMENSION || update.col >= MAX_DIMENSION {
                    return Err(CodecError::Unencodable(format!(
                        "cell ({}, {})",
                        update.row, update.col
                    )));
                }
                let digit = update
                    .mark
                    .wire_digit()
                    .ok_or_else(|| CodecError::Unencodable("empty mark".to_string()))?;
                line.push_str(&format!(" {} {} {digit}", update.row, update.col));
            }
            line
        }
        ProtocolEvent::TurnChanged(owner) => {
            let arg = match owner {
                TurnOwner::Local => TURN_LOCAL,
                TurnOwner::Remote => TURN_REMOTE,
            };
            format!("{keyword} {arg}")
        }
        ProtocolEvent::GameOver(_) => keyword.to_string(),
        ProtocolEvent::ProtocolError(text) => {
            if text.contains(|c| c == '\n' || c == '\r') {
                return Err(CodecError::Unencodable("multi-line error text".to_string()));
            }
            if text.trim() != text {
                return Err(CodecError::Unencodable(format!(
                    "error text {text:?} has surrounding whitespace"
                )));
            }
            if text.is_empty() {
                keyword.to_string()
            } else {
                format!("{keyword} {text}")
            }
        }
    };
    Ok(line + "\n")
}

// ── Per-message decode helpers ────────────────────────────────────────────────

fn decode_connect(args: &str) -> Result<ProtocolEvent, CodecError> {
    let [token] = require_args::<1>(args, MessageKind::Connect)?;
    let dim = parse_number(token, "dimension")?;
    if dim == 0 || dim > MAX_DIMENSION {
        return Err(malformed(format!(
            "dimension {dim} outside 1..={MAX_DIMENSION}"
        )));
    }
    Ok(ProtocolEvent::DimensionAnnounced(dim))
}

fn decode_move_made(args: &str) -> Result<ProtocolEvent, CodecError> {
    let tokens: Vec<&str> = args.split_ascii_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 3 != 0 {
        return Err(malformed(format!(
            "MOVE_MADE needs one or more <row> <col> <mark> triples, got {} tokens",
            tokens.len()
        )));
    }

    let mut updates = Vec::with_capacity(tokens.len() / 3);
    for triple in tokens.chunks_exact(3) {
        let row = parse_coordinate(triple[0], "row")?;
        let col = parse_coordinate(triple[1], "col")?;
        let mark = triple[2]
            .parse::<u8>()
            .ok()
            .and_then(|digit| CellMark::try_from(digit).ok())
            .ok_or_else(|| malformed(format!("unknown player mark {:?}", triple[2])))?;
        updates.push(CellUpdate::new(row, col, mark));
    }
    Ok(ProtocolEvent::CellsUpdated(updates))
}

fn decode_turn(args: &str) -> Result<ProtocolEvent, CodecError> {
    let [token] = require_args::<1>(args, MessageKind::Turn)?;
    let owner = match token {
        TURN_LOCAL => TurnOwner::Local,
        TURN_REMOTE => TurnOwner::Remote,
        other => return Err(malformed(format!("unknown turn owner {other:?}"))),
    };
    Ok(ProtocolEvent::TurnChanged(owner))
}

fn decode_game_over(
    kind: MessageKind,
    args: &str,
    outcome: Outcome,
) -> Result<ProtocolEvent, CodecError> {
    require_args::<0>(args, kind)?;
    Ok(ProtocolEvent::GameOver(outcome))
}

// ── Token helpers ─────────────────────────────────────────────────────────────

/// Splits `args` into exactly `N` tokens.
fn require_args<const N: usize>(args: &str, kind: MessageKind) -> Result<[&str; N], CodecError> {
    let tokens: Vec<&str> = args.split_ascii_whitespace().collect();
    let found = tokens.len();
    tokens.try_into().map_err(|_| {
        malformed(format!(
            "{} expects {N} argument(s), got {found}",
            kind.keyword()
        ))
    })
}

fn parse_number(token: &str, what: &str) -> Result<usize, CodecError> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(format!("{what} {token:?} is not a number")));
    }
    token
        .parse::<usize>()
        .map_err(|_| malformed(format!("{what} {token:?} is not a number")))
}

fn parse_coordinate(token: &str, what: &str) -> Result<usize, CodecError> {
    let value = parse_number(token, what)?;
    if value >= MAX_DIMENSION {
        return Err(malformed(format!(
            "{what} {value} outside 0..{MAX_DIMENSION}"
        )));
    }
    Ok(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_malformed(line: &str) {
        let result = decode_message(line);
        assert!(
            matches!(result, Err(CodecError::MalformedMessage(_))),
            "{line:?} must be malformed, got {result:?}"
        );
    }

    // ── CONNECT ───────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_connect_announces_dimension() {
        assert_eq!(
            decode_message("CONNECT 8"),
            Ok(ProtocolEvent::DimensionAnnounced(8))
        );
    }

    #[test]
    fn test_decode_connect_rejects_zero_and_oversized() {
        assert_malformed("CONNECT 0");
        assert_malformed(&format!("CONNECT {}", MAX_DIMENSION + 1));
        assert_malformed("CONNECT -4");
        assert_malformed("CONNECT eight");
        assert_malformed("CONNECT");
        assert_malformed("CONNECT 8 8");
    }

    // ── MOVE_MADE ─────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_move_made_single_triple() {
        assert_eq!(
            decode_message("MOVE_MADE 3 4 1"),
            Ok(ProtocolEvent::CellsUpdated(vec![CellUpdate::new(
                3,
                4,
                CellMark::PlayerOne
            )]))
        );
    }

    #[test]
    fn test_decode_move_made_keeps_triple_order() {
        let event = decode_message("MOVE_MADE 2 3 2 3 3 2 4 3 2").unwrap();
        assert_eq!(
            event,
            ProtocolEvent::CellsUpdated(vec![
                CellUpdate::new(2, 3, CellMark::PlayerTwo),
                CellUpdate::new(3, 3, CellMark::PlayerTwo),
                CellUpdate::new(4, 3, CellMark::PlayerTwo),
            ])
        );
    }

    #[test]
    fn test_decode_move_made_rejects_bad_shapes() {
        assert_malformed("MOVE_MADE");
        assert_malformed("MOVE_MADE 3 4");
        assert_malformed("MOVE_MADE 3 4 1 5");
        assert_malformed("MOVE_MADE 3 4 0");
        assert_malformed("MOVE_MADE 3 4 3");
        assert_malformed("MOVE_MADE x 4 1");
        assert_malformed(&format!("MOVE_MADE {MAX_DIMENSION} 0 1"));
    }

    // ── TURN / GAME_* / ERROR ─────────────────────────────────────────────────

    #[test]
    fn test_decode_turn_both_owners() {
        assert_eq!(
            decode_message("TURN LOCAL"),
            Ok(ProtocolEvent::TurnChanged(TurnOwner::Local))
        );
        assert_eq!(
            decode_message("TURN REMOTE"),
            Ok(ProtocolEvent::TurnChanged(TurnOwner::Remote))
        );
        assert_malformed("TURN");
        assert_malformed("TURN local");
        assert_malformed("TURN LOCAL REMOTE");
    }

    #[test]
    fn test_decode_game_over_outcomes() {
        assert_eq!(decode_message("GAME_WON"), Ok(ProtocolEvent::GameOver(Outcome::Won)));
        assert_eq!(decode_message("GAME_LOST"), Ok(ProtocolEvent::GameOver(Outcome::Lost)));
        assert_eq!(decode_message("GAME_TIED"), Ok(ProtocolEvent::GameOver(Outcome::Tie)));
        assert_malformed("GAME_WON 1");
    }

    #[test]
    fn test_decode_error_keeps_free_text() {
        assert_eq!(
            decode_message("ERROR illegal move at 2 2\n"),
            Ok(ProtocolEvent::ProtocolError("illegal move at 2 2".to_string()))
        );
        assert_eq!(
            decode_message("ERROR"),
            Ok(ProtocolEvent::ProtocolError(String::new()))
        );
    }

    // ── Framing and unknown input ─────────────────────────────────────────────

    #[test]
    fn test_decode_tolerates_crlf_terminator() {
        assert_eq!(
            decode_message("TURN REMOTE\r\n"),
            Ok(ProtocolEvent::TurnChanged(TurnOwner::Remote))
        );
    }

    #[test]
    fn test_decode_unknown_and_empty_lines_are_malformed() {
        assert_malformed("");
        assert_malformed("\n");
        assert_malformed("   ");
        assert_malformed("HELLO 1 2");
        assert_malformed("connect 8");
    }

    #[test]
    fn test_decode_client_move_request_is_malformed() {
        assert_malformed("MOVE 2 2");
    }

    // ── Encoding ──────────────────────────────────────────────────────────────

    #[test]
    fn test_encode_move_is_deterministic() {
        assert_eq!(encode_move(2, 2), Ok("MOVE 2 2\n".to_string()));
        assert_eq!(encode_move(0, 25), encode_move(0, 25));
    }

    #[test]
    fn test_encode_move_rejects_out_of_range() {
        assert_eq!(
            encode_move(MAX_DIMENSION, 0),
            Err(CodecError::CoordinateOutOfRange { row: MAX_DIMENSION, col: 0 })
        );
    }

    #[test]
    fn test_encode_event_lines_decode_back() {
        let events = [
            ProtocolEvent::DimensionAnnounced(6),
            ProtocolEvent::CellsUpdated(vec![
                CellUpdate::new(2, 2, CellMark::PlayerOne),
                CellUpdate::new(2, 3, CellMark::PlayerTwo),
            ]),
            ProtocolEvent::TurnChanged(TurnOwner::Local),
            ProtocolEvent::GameOver(Outcome::Tie),
            ProtocolEvent::ProtocolError("not your turn".to_string()),
        ];
        for event in events {
            let line = encode_event(&event).unwrap();
            assert!(line.ends_with('\n'));
            assert_eq!(decode_message(&line), Ok(event));
        }
    }

    #[test]
    fn test_encode_event_rejects_error_text_the_decoder_would_trim() {
        for text in [" padded", "trailing ", " ", "\tboth\t"] {
            let event = ProtocolEvent::ProtocolError(text.to_string());

            let result = encode_event(&event);

            assert!(
                matches!(result, Err(CodecError::Unencodable(_))),
                "{text:?} must be unencodable, got {result:?}"
            );
        }
    }

    #[test]
    fn test_encode_event_keeps_inner_whitespace_in_error_text() {
        let event = ProtocolEvent::ProtocolError("opponent  left the game".to_string());

        let line = encode_event(&event).unwrap();

        assert_eq!(decode_message(&line), Ok(event));
    }

    #[test]
    fn test_encode_event_rejects_empty_mark() {
        let event = ProtocolEvent::CellsUpdated(vec![CellUpdate::new(0, 0, CellMark::Empty)]);
        assert!(matches!(encode_event(&event), Err(CodecError::Unencodable(_))));
    }
}
