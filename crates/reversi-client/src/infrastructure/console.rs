//! Plain-text front end used by the `reversi-client` binary.
//!
//! Rendering is a pure function of a [`BoardSnapshot`]; input parsing is a
//! pure function of one stdin line.  Neither touches the network.

use reversi_core::{BoardSnapshot, CellMark};

use crate::application::StatusSummary;

/// A parsed stdin line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `<row> <col>`, zero-based.
    Move { row: usize, col: usize },
    Quit,
    Help,
}

pub const HELP: &str = "commands: `<row> <col>` to place a piece (zero-based), `help`, `quit`";

/// Parses one input line.  Returns `None` for anything unrecognised.
pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;
    match first.to_ascii_lowercase().as_str() {
        "quit" | "q" | "exit" => return tokens.next().is_none().then_some(ConsoleCommand::Quit),
        "help" | "?" => return tokens.next().is_none().then_some(ConsoleCommand::Help),
        _ => {}
    }
    let row = first.parse().ok()?;
    let col = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some(ConsoleCommand::Move { row, col })
}

fn glyph(mark: CellMark) -> char {
    match mark {
        CellMark::Empty => '.',
        CellMark::PlayerOne => 'X',
        CellMark::PlayerTwo => 'O',
    }
}

/// Renders the grid with row/column indices, followed by the status line.
///
/// ```text
///     0 1 2 3
///  0  . . . .
///  1  . X O .
///  2  . O X .
///  3  . . . .
/// It's your turn.  Moves left: 12  [Running]
/// ```
pub fn render(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    if let Some(dim) = snapshot.dimension {
        out.push_str("   ");
        for col in 0..dim {
            out.push_str(&format!("{col:>2}"));
        }
        out.push('\n');
        for (row, cells) in snapshot.cells.iter().enumerate() {
            out.push_str(&format!("{row:>2} "));
            for &mark in cells {
                out.push(' ');
                out.push(glyph(mark));
            }
            out.push('\n');
        }
    } else {
        out.push_str("(waiting for the server to announce the board)\n");
    }
    out.push_str(&StatusSummary::from_snapshot(snapshot).to_string());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use reversi_core::{BoardModel, CellUpdate, TurnOwner};

    #[test]
    fn test_parse_move_pair() {
        assert_eq!(parse_command("2 3"), Some(ConsoleCommand::Move { row: 2, col: 3 }));
        assert_eq!(parse_command("  10\t4 \n"), Some(ConsoleCommand::Move { row: 10, col: 4 }));
    }

    #[test]
    fn test_parse_keywords_case_insensitive() {
        assert_eq!(parse_command("QUIT"), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("q"), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("help"), Some(ConsoleCommand::Help));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("2"), None);
        assert_eq!(parse_command("2 3 4"), None);
        assert_eq!(parse_command("-1 3"), None);
        assert_eq!(parse_command("a b"), None);
        assert_eq!(parse_command("quit now"), None);
    }

    #[test]
    fn test_render_before_dimension_shows_waiting_notice() {
        let model = BoardModel::new();

        let text = render(&model.snapshot());

        assert!(text.starts_with("(waiting"));
        assert!(text.contains("Wait for your turn."));
    }

    #[test]
    fn test_render_draws_every_cell() {
        // Arrange
        let model = BoardModel::new();
        model.initialize(2).unwrap();
        model
            .apply_cell_updates(&[
                CellUpdate::new(0, 0, CellMark::PlayerOne),
                CellUpdate::new(1, 1, CellMark::PlayerTwo),
            ])
            .unwrap();
        model.apply_turn_change(TurnOwner::Local).unwrap();

        // Act
        let text = render(&model.snapshot());

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    0 1");
        assert_eq!(lines[1], " 0  X .");
        assert_eq!(lines[2], " 1  . O");
        assert_eq!(lines[3], "It's your turn.  Moves left: 2  [Running]");
    }
}
