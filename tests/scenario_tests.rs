//! End-to-end game scenarios driven through the move text protocol.
//!
//! These tests play short games gesture by gesture and check the turn
//! state machine, captures, history and replay along the way.

use plateau_engine::{Board, Cell, Move, OriginKind, PieceId, PieceKind, PlateauConfig, PlateauState, PlayerId};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

fn play(board: &mut Board, text: &str) {
    let mv: Move = text.parse().unwrap_or_else(|e| panic!("{text}: {e}"));
    board
        .execute(&mv)
        .unwrap_or_else(|e| panic!("{text} in {:?}: {e}", board.state()));
}

/// Both players place their initial 2-stacks, then one single each.
fn opening() -> Board {
    let mut board = Board::new(PlateauConfig::default()).unwrap();
    play(&mut board, "Onboard A1 100 MMMM 0,1");
    play(&mut board, "Done");
    play(&mut board, "Onboard D4 100 MMMM 12,13");
    play(&mut board, "Done");
    play(&mut board, "Onboard B2 100 MM 2");
    play(&mut board, "Done");
    // player 1's red goes in red side up
    play(&mut board, "Onboard C2 100 RM 16");
    play(&mut board, "Done");
    board
}

// =============================================================================
// Opening
// =============================================================================

/// Test that the initial placement round alternates and then enters play.
#[test]
fn test_initial_placement_round() {
    let mut board = Board::new(PlateauConfig::default()).unwrap();
    assert_eq!(board.state(), PlateauState::Onboard2);
    assert_eq!(board.whose_turn(), P0);

    play(&mut board, "Onboard A1 100 MMMM 0,1");
    assert_eq!(board.state(), PlateauState::Onboard2Done);
    play(&mut board, "Done");
    assert_eq!(board.state(), PlateauState::Onboard2);
    assert_eq!(board.whose_turn(), P1);

    play(&mut board, "Onboard D4 100 MMMM 12,13");
    play(&mut board, "Done");
    assert_eq!(board.state(), PlateauState::Play);
    assert_eq!(board.whose_turn(), P0);

    assert_eq!(board.cell_stack(Cell::new(0, 0)).pieces(), &[PieceId(0), PieceId(1)]);
    assert_eq!(board.cell_stack(Cell::new(3, 3)).height(), 2);
    assert!(board.check_invariants().is_ok());
}

/// Test that the initial stack must go on an edge cell.
#[test]
fn test_initial_stack_needs_edge_cell() {
    let board = Board::new(PlateauConfig::default()).unwrap();
    let mv: Move = "Onboard B2 100 MMMM 0,1".parse().unwrap();
    assert!(!board.is_legal(&mv));
}

/// Test that onboarding by gestures reaches the same layout as the
/// composite move.
#[test]
fn test_rack_gestures_match_composite_onboard() {
    let mut board = Board::new(PlateauConfig::default()).unwrap();
    play(&mut board, "Onboard A1 100 MMMM 0,1");
    play(&mut board, "Done");
    play(&mut board, "Onboard D4 100 MMMM 12,13");
    play(&mut board, "Done");

    let mut composite = board.clone();
    play(&mut composite, "Onboard B2 100 MM 2");

    let rack = board.rack_stack_id(P0, PieceKind::Mute);
    let top = board.stack(rack).top().unwrap();
    play(&mut board, &format!("Pick {top} R"));
    assert_eq!(board.state(), PlateauState::OnboardDrop);
    let drop_cmd = format!("Drop {} 100 B2", board.cell_stack_id(Cell::new(1, 1)));
    play(&mut board, &drop_cmd);
    assert_eq!(board.state(), PlateauState::OnboardDone);

    assert_eq!(board.cell_stack(Cell::new(1, 1)).height(), 1);
    assert_eq!(
        board.stack(board.cell_stack_id(Cell::new(1, 1))).top().map(|p| board.piece(p).kind()),
        composite.stack(composite.cell_stack_id(Cell::new(1, 1))).top().map(|p| composite.piece(p).kind())
    );
}

// =============================================================================
// Stomp capture
// =============================================================================

/// Test that a colored piece stomping a lone enemy piece captures it.
#[test]
fn test_stomp_capture_end_to_end() {
    let mut board = opening();
    assert_eq!(board.whose_turn(), P0);

    // player 0 adds a mute elsewhere
    play(&mut board, "Onboard A3 100 MM 3");
    play(&mut board, "Done");
    assert_eq!(board.whose_turn(), P1);

    let b2 = board.cell_stack_id(Cell::new(1, 1));
    play(&mut board, "Pick 16 C2 0");
    assert_eq!(board.state(), PlateauState::PlayDrop);
    play(&mut board, &format!("Drop {b2} 100 B2"));
    assert_eq!(board.state(), PlateauState::PlayCapture);
    play(&mut board, "Done");

    assert_eq!(board.captive_count(P1), 1);
    assert_eq!(board.turns_since_capture(), 0);
    assert_eq!(board.state(), PlateauState::Play);
    assert_eq!(board.whose_turn(), P0);

    assert_eq!(board.stack(b2).pieces(), &[PieceId(16)]);
    let captive = board.stack_of(PieceId(2));
    assert_eq!(captive.origin_kind(), OriginKind::Captive);
    assert_eq!(captive.owner(), Some(P1));
    assert!(board.piece(PieceId(2)).knows_fully(P1));
    assert!(board.check_invariants().is_ok());
}

/// Test that a turn without capture advances the capture clock.
#[test]
fn test_turns_since_capture_counts_quiet_turns() {
    let board = opening();
    // two onboard turns after the initial round
    assert_eq!(board.turns_since_capture(), 2);
}

/// Test that cancelling a board move puts everything back.
#[test]
fn test_cancel_restores_stack() {
    let mut board = opening();
    let before = board.digest();
    play(&mut board, "Pick 2 B2 0");
    assert_eq!(board.state(), PlateauState::PlayDrop);
    play(&mut board, "Drop -1 99");
    assert_eq!(board.state(), PlateauState::Play);
    assert_eq!(board.cell_stack(Cell::new(1, 1)).pieces(), &[PieceId(2)]);
    assert_eq!(board.digest(), before);
}

// =============================================================================
// History and replay
// =============================================================================

/// Test that the history records every executed move in order.
#[test]
fn test_history_records_moves() {
    let board = opening();
    let history = board.history();
    assert_eq!(history.len(), 8);
    assert_eq!(history[0].player, P0);
    assert_eq!(history[0].state, PlateauState::Onboard2);
    assert!(history[1].mv.is_done());
    assert_eq!(history[2].player, P1);
}

/// Test that replaying the history rebuilds an identical board.
#[test]
fn test_replay_verifies() {
    let mut board = opening();
    play(&mut board, "Onboard A3 100 MM 3");
    play(&mut board, "Done");
    play(&mut board, "Pick 16 C2 0");
    let drop_cmd = format!("Drop {} 100 B2", board.cell_stack_id(Cell::new(1, 1)));
    play(&mut board, &drop_cmd);
    play(&mut board, "Done");

    let replayed = board.replay_history().unwrap();
    assert!(board.verify_same(&replayed).is_ok());
    assert_eq!(board.digest(), replayed.digest());
}

/// Test that move text printed from the history parses back to the same
/// moves.
#[test]
fn test_history_text_round_trip() {
    let board = opening();
    for record in board.history().iter() {
        let text = record.mv.to_string();
        let parsed: Move = text.parse().unwrap();
        assert_eq!(parsed, record.mv);
    }
}

// =============================================================================
// Resignation
// =============================================================================

/// Test that resigning can be taken back before it is confirmed.
#[test]
fn test_resign_toggle_and_confirm() {
    let mut board = opening();
    play(&mut board, "Resign");
    assert_eq!(board.state(), PlateauState::Resign);
    play(&mut board, "Resign");
    assert_eq!(board.state(), PlateauState::Play);

    play(&mut board, "Resign");
    play(&mut board, "Done");
    assert!(board.is_game_over());
    assert_eq!(board.winner(), Some(P1));
    assert!(board.legal_moves().is_empty());
}

/// Test that a draw state ends the game without a winner.
#[test]
fn test_draw_state_ends_without_winner() {
    let mut board = opening();
    board.set_draw_state().unwrap();
    play(&mut board, "Done");
    assert!(board.is_game_over());
    assert_eq!(board.winner(), None);
}
