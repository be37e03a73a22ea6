//! Integration tests for the reversi-core codec driving a board model.
//!
//! These feed literal server lines through the public codec and apply the
//! resulting events to a `BoardModel`, the same way the network client's
//! receive loop does, but without a socket.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use reversi_core::{
    decode_message, BoardModel, CellMark, CodecError, GameStatus, Outcome, ProtocolEvent,
};

/// Applies one decoded event to the model, mirroring the receive loop.
fn apply(model: &BoardModel, line: &str) {
    match decode_message(line).expect("fixture lines must decode") {
        ProtocolEvent::DimensionAnnounced(dim) => model.initialize(dim).unwrap(),
        ProtocolEvent::CellsUpdated(updates) => model.apply_cell_updates(&updates).unwrap(),
        ProtocolEvent::TurnChanged(owner) => model.apply_turn_change(owner).unwrap(),
        ProtocolEvent::GameOver(outcome) => model.apply_game_over(outcome).unwrap(),
        ProtocolEvent::ProtocolError(text) => panic!("unexpected server error {text}"),
    }
}

#[test]
fn test_dimension_announcement_of_eight_gives_64_empty_cells() {
    // Arrange
    let model = BoardModel::new();

    // Act
    apply(&model, "CONNECT 8\n");

    // Assert
    let snapshot = model.snapshot();
    assert_eq!(snapshot.dimension, Some(8));
    assert_eq!(snapshot.count(CellMark::Empty), 64);
}

#[test]
fn test_opening_sequence_then_first_move() {
    let model = BoardModel::new();
    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notifications);
    model.subscribe_fn(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    for line in [
        "CONNECT 8",
        "MOVE_MADE 3 3 2 3 4 1 4 3 1 4 4 2",
        "TURN LOCAL",
        "MOVE_MADE 2 3 1 3 3 1",
        "TURN REMOTE",
    ] {
        apply(&model, line);
    }

    let snapshot = model.snapshot();
    assert_eq!(snapshot.contents_at(2, 3), Some(CellMark::PlayerOne));
    assert_eq!(snapshot.contents_at(3, 3), Some(CellMark::PlayerOne));
    assert_eq!(snapshot.count(CellMark::PlayerOne), 4);
    assert_eq!(snapshot.count(CellMark::PlayerTwo), 1);
    assert_eq!(snapshot.moves_remaining, 59);
    assert!(!snapshot.is_local_turn());
    assert_eq!(notifications.load(Ordering::SeqCst), 5);
}

#[test]
fn test_game_over_line_sets_terminal_status() {
    let model = BoardModel::new();
    apply(&model, "CONNECT 4");
    apply(&model, "GAME_LOST");

    assert_eq!(model.status(), GameStatus::Lost);
    assert!(model.apply_game_over(Outcome::Won).is_err());
}

#[test]
fn test_unrecognised_line_never_reaches_the_model() {
    let model = BoardModel::new();
    let result = decode_message("PLACE 3 4 BLACK");

    assert!(matches!(result, Err(CodecError::MalformedMessage(_))));
    assert!(!model.is_initialized());
    assert_eq!(model.status(), GameStatus::InProgress);
}

#[test]
fn test_snapshot_serializes_for_presentation_bridges() {
    let model = BoardModel::new();
    apply(&model, "CONNECT 2");
    apply(&model, "MOVE_MADE 0 1 2");

    let json = serde_json::to_value(model.snapshot()).unwrap();

    assert_eq!(json["dimension"], 2);
    assert_eq!(json["cells"][0][1], "PlayerTwo");
    assert_eq!(json["status"], "InProgress");
    assert_eq!(json["moves_remaining"], 3);
}
