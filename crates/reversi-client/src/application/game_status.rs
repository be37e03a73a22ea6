//! Status line texts derived from a board snapshot.

use reversi_core::{BoardSnapshot, GameStatus};

pub const YOUR_TURN: &str = "It's your turn.";
pub const WAIT_FOR_TURN: &str = "Wait for your turn.";
pub const RUNNING: &str = "Running";
pub const STOPPED: &str = "Stopped.";

/// What the presentation shows beside the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    /// Turn prompt while playing, final result once the game ended.
    pub headline: String,
    /// `"Moves left: N"`.
    pub moves: String,
    /// `"Running"` or `"Stopped."`.
    pub activity: &'static str,
    /// Fault description when the session ended in error.
    pub detail: Option<String>,
}

impl StatusSummary {
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        let headline = match snapshot.status {
            GameStatus::InProgress if snapshot.is_local_turn() => YOUR_TURN,
            GameStatus::InProgress => WAIT_FOR_TURN,
            GameStatus::Won => "Game over. You won!",
            GameStatus::Lost => "Game over. You lost!",
            GameStatus::Tie => "Game over. You tied!",
            GameStatus::Error => "ERROR!",
        };
        Self {
            headline: headline.to_string(),
            moves: format!("Moves left: {}", snapshot.moves_remaining),
            activity: if snapshot.status.is_terminal() { STOPPED } else { RUNNING },
            detail: snapshot.fault.as_ref().map(ToString::to_string),
        }
    }
}

impl std::fmt::Display for StatusSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {}  [{}]", self.headline, self.moves, self.activity)?;
        if let Some(detail) = &self.detail {
            write!(f, "  {detail}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reversi_core::{BoardModel, Fault, Outcome, TurnOwner};

    fn started(dim: usize) -> BoardModel {
        let model = BoardModel::new();
        model.initialize(dim).unwrap();
        model
    }

    #[test]
    fn test_remote_turn_asks_player_to_wait() {
        let model = started(4);

        let summary = StatusSummary::from_snapshot(&model.snapshot());

        assert_eq!(summary.headline, WAIT_FOR_TURN);
        assert_eq!(summary.moves, "Moves left: 16");
        assert_eq!(summary.activity, RUNNING);
        assert_eq!(summary.detail, None);
    }

    #[test]
    fn test_local_turn_prompts_player() {
        let model = started(4);
        model.apply_turn_change(TurnOwner::Local).unwrap();

        let summary = StatusSummary::from_snapshot(&model.snapshot());

        assert_eq!(summary.headline, YOUR_TURN);
    }

    #[test]
    fn test_outcomes_replace_turn_prompt_and_stop() {
        for (outcome, text) in [
            (Outcome::Won, "Game over. You won!"),
            (Outcome::Lost, "Game over. You lost!"),
            (Outcome::Tie, "Game over. You tied!"),
        ] {
            let model = started(4);
            model.apply_game_over(outcome).unwrap();

            let summary = StatusSummary::from_snapshot(&model.snapshot());

            assert_eq!(summary.headline, text);
            assert_eq!(summary.activity, STOPPED);
        }
    }

    #[test]
    fn test_fault_shows_error_with_detail() {
        // Arrange: faults can arrive before the board exists.
        let model = BoardModel::new();
        model
            .report_fault(Fault::ConnectionLost("reset by peer".to_string()))
            .unwrap();

        // Act
        let summary = StatusSummary::from_snapshot(&model.snapshot());

        // Assert
        assert_eq!(summary.headline, "ERROR!");
        assert_eq!(summary.activity, STOPPED);
        assert!(summary.detail.unwrap().contains("reset by peer"));
    }

    #[test]
    fn test_display_joins_fields_on_one_line() {
        let model = started(2);

        let line = StatusSummary::from_snapshot(&model.snapshot()).to_string();

        assert_eq!(line, "Wait for your turn.  Moves left: 4  [Running]");
    }
}
