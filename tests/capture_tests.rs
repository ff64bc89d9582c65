//! Stomp capture tests on real boards.
//!
//! Positions are built with the setup hooks, then a single board move is
//! played and resolved with `Done`.

use plateau_engine::rules::captured_positions;
use plateau_engine::{Board, Cell, Face, Move, OriginKind, PieceId, PlateauConfig, PlateauState, PlayerId};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

fn board_with(placements: &[(u16, (u8, u8), bool)]) -> Board {
    let mut board = Board::new(PlateauConfig::default()).unwrap();
    for &(piece, (col, row), flipped) in placements {
        board.setup_place(PieceId(piece), Cell::new(col, row), flipped).unwrap();
    }
    board.setup_turn(P0, PlateauState::Play).unwrap();
    board
}

/// Lift `piece` and drop the run on `cell`.
fn hop(board: &mut Board, piece: u16, cell: (u8, u8)) {
    board.execute(&Move::pick(PieceId(piece))).unwrap();
    let target = board.cell_stack_id(Cell::new(cell.0, cell.1));
    board.execute(&Move::drop_on(target)).unwrap();
}

fn captives(board: &Board, player: PlayerId) -> Vec<PieceId> {
    let mut pieces = board.captive_pieces(player);
    pieces.sort();
    pieces
}

// =============================================================================
// Capture depth
// =============================================================================

/// Test that a single colored piece takes the piece directly beneath.
#[test]
fn test_single_stomp_takes_upper_defender() {
    // red at B1, enemy mutes stacked at C1
    let mut board = board_with(&[(4, (1, 0), false), (12, (2, 0), false), (13, (2, 0), false)]);
    hop(&mut board, 4, (2, 0));
    assert_eq!(board.state(), PlateauState::PlayCapture);
    board.execute(&Move::Done).unwrap();

    assert_eq!(captives(&board, P0), vec![PieceId(13)]);
    assert_eq!(board.cell_stack(Cell::new(2, 0)).pieces(), &[PieceId(12), PieceId(4)]);
    assert_eq!(board.whose_turn(), P1);
    assert_eq!(board.turns_since_capture(), 0);
}

/// Test that a run of two takes two defenders.
#[test]
fn test_double_stomp_takes_two() {
    // mute under red at A1 moves two squares onto C1
    let mut board = board_with(&[
        (0, (0, 0), false),
        (4, (0, 0), false),
        (12, (2, 0), false),
        (13, (2, 0), false),
    ]);
    hop(&mut board, 0, (2, 0));
    assert_eq!(board.state(), PlateauState::PlayCapture);
    board.execute(&Move::Done).unwrap();

    assert_eq!(captives(&board, P0), vec![PieceId(12), PieceId(13)]);
    assert_eq!(board.cell_stack(Cell::new(2, 0)).pieces(), &[PieceId(0), PieceId(4)]);
    assert!(board.check_invariants().is_ok());
}

/// Test that the capturer's own buried pieces are skipped, not taken.
#[test]
fn test_sandwiched_defenders_are_taken() {
    // C1 holds enemy, own, enemy from the bottom
    let mut board = board_with(&[
        (0, (0, 0), false),
        (4, (0, 0), false),
        (12, (2, 0), false),
        (1, (2, 0), false),
        (13, (2, 0), false),
    ]);
    hop(&mut board, 0, (2, 0));
    board.execute(&Move::Done).unwrap();

    assert_eq!(captives(&board, P0), vec![PieceId(12), PieceId(13)]);
    assert_eq!(board.cell_stack(Cell::new(2, 0)).pieces(), &[PieceId(1), PieceId(0), PieceId(4)]);
}

/// Test that captured pieces are disclosed and sorted into kind slots.
#[test]
fn test_captives_are_revealed_and_sorted() {
    let mut board = board_with(&[(4, (1, 0), false), (17, (2, 0), true)]);
    // player 1's red lies blank side up
    assert!(!board.piece(PieceId(17)).knows_fully(P0));
    hop(&mut board, 4, (2, 0));
    board.execute(&Move::Done).unwrap();

    let piece = board.piece(PieceId(17));
    assert!(piece.knows_fully(P0));
    assert!(!piece.is_flipped());
    let slot = board.stack_of(PieceId(17));
    assert_eq!(slot.origin_kind(), OriginKind::Captive);
    assert_eq!(slot.slot_kind(), Some(piece.kind()));
    assert_eq!(board.stats(P0).captives, 1);
    assert_eq!(board.stats(P0).captive_points, 2);
}

/// Test that a stack on the mover's own bottom piece is still stomped when
/// defenders sit above that bottom.
#[test]
fn test_stomp_over_own_bottom_takes_defender() {
    // C1 holds own, own, enemy, enemy from the bottom
    let mut board = board_with(&[
        (0, (2, 0), false),
        (1, (2, 0), false),
        (12, (2, 0), false),
        (13, (2, 0), false),
        (4, (1, 0), false),
    ]);
    hop(&mut board, 4, (2, 0));
    assert_eq!(board.state(), PlateauState::PlayCapture);
    board.execute(&Move::Done).unwrap();

    assert_eq!(captives(&board, P0), vec![PieceId(13)]);
    assert_eq!(board.captive_count(P0), 1);
    assert_eq!(
        board.cell_stack(Cell::new(2, 0)).pieces(),
        &[PieceId(0), PieceId(1), PieceId(12), PieceId(4)]
    );
    assert!(board.check_invariants().is_ok());
}

// =============================================================================
// Capture in place
// =============================================================================

/// C1 holds two enemy mutes under player 0's red.
fn red_on_enemy_mutes() -> Board {
    board_with(&[(12, (2, 0), false), (13, (2, 0), false), (4, (2, 0), false)])
}

/// Test that lifting a piece and putting it straight back on a stomped
/// stack captures in place.
#[test]
fn test_drop_back_on_stomped_origin_captures() {
    let mut board = red_on_enemy_mutes();
    let c1 = board.cell_stack_id(Cell::new(2, 0));
    board.execute(&Move::pick(PieceId(4))).unwrap();
    assert!(board
        .legal_moves()
        .iter()
        .any(|mv| matches!(mv, Move::Drop { stack: Some(s), .. } if *s == c1)));

    board.execute(&Move::drop_on(c1)).unwrap();
    assert_eq!(board.state(), PlateauState::PlayCapture);
    assert!(board.legal_moves().contains(&Move::Done));
    board.execute(&Move::Done).unwrap();

    assert_eq!(captives(&board, P0), vec![PieceId(13)]);
    assert_eq!(board.cell_stack(Cell::new(2, 0)).pieces(), &[PieceId(12), PieceId(4)]);
    assert_eq!(board.whose_turn(), P1);
    assert_eq!(board.turns_since_capture(), 0);
}

/// Test that cancelling over a stomped origin is still only a cancel.
#[test]
fn test_cancel_over_stomped_origin_captures_nothing() {
    let mut board = red_on_enemy_mutes();
    board.execute(&Move::pick(PieceId(4))).unwrap();
    board.execute(&Move::cancel()).unwrap();

    assert_eq!(board.state(), PlateauState::Play);
    assert_eq!(board.captive_count(P0), 0);
    assert_eq!(
        board.cell_stack(Cell::new(2, 0)).pieces(),
        &[PieceId(12), PieceId(13), PieceId(4)]
    );
}

/// Test that a capture in place can be lifted again and carried elsewhere.
#[test]
fn test_capture_in_place_can_be_taken_up_again() {
    let mut board = red_on_enemy_mutes();
    let c1 = board.cell_stack_id(Cell::new(2, 0));
    board.execute(&Move::pick(PieceId(4))).unwrap();
    board.execute(&Move::drop_on(c1)).unwrap();

    board.execute(&Move::pick(PieceId(4))).unwrap();
    assert_eq!(board.state(), PlateauState::PlayDrop);
    hop_to(&mut board, (3, 0));
    assert_eq!(board.state(), PlateauState::PlayDone);
    board.execute(&Move::Done).unwrap();
    assert_eq!(board.captive_count(P0), 0);
    assert!(board.check_invariants().is_ok());
}

/// Drop the stack in hand on `cell`.
fn hop_to(board: &mut Board, cell: (u8, u8)) {
    let target = board.cell_stack_id(Cell::new(cell.0, cell.1));
    board.execute(&Move::drop_on(target)).unwrap();
}

// =============================================================================
// No capture
// =============================================================================

/// Test that a lone mute may not land on an enemy stack.
#[test]
fn test_mute_cannot_stomp() {
    let mut board = board_with(&[(0, (1, 0), false), (12, (2, 0), false)]);
    board.execute(&Move::pick(PieceId(0))).unwrap();
    let target = board.cell_stack_id(Cell::new(2, 0));
    assert!(!board.is_legal(&Move::drop_on(target)));
}

/// Test that a stack showing blank must move on after landing on an enemy.
#[test]
fn test_blank_top_on_enemy_is_undone() {
    // mute riding on a red at A1
    let mut board = board_with(&[(4, (0, 0), false), (0, (0, 0), false), (12, (1, 0), false)]);
    hop(&mut board, 4, (1, 0));
    assert_eq!(board.state(), PlateauState::PlayUndone);
    assert!(!board.is_legal(&Move::Done));

    // lifting the run again takes the hop back
    board.execute(&Move::pick(PieceId(4))).unwrap();
    assert_eq!(board.state(), PlateauState::PlayDrop);
    board.execute(&Move::drop_on(board.cell_stack_id(Cell::new(0, 0)))).unwrap();
    assert_eq!(board.state(), PlateauState::Play);
    assert_eq!(board.cell_stack(Cell::new(0, 0)).pieces(), &[PieceId(4), PieceId(0)]);
    assert_eq!(board.cell_stack(Cell::new(1, 0)).pieces(), &[PieceId(12)]);
}

/// Test that landing on one's own stack is a plain move.
#[test]
fn test_landing_on_own_stack_captures_nothing() {
    let mut board = board_with(&[(4, (1, 0), false), (0, (2, 0), false)]);
    hop(&mut board, 4, (2, 0));
    assert_eq!(board.state(), PlateauState::PlayDone);
    board.execute(&Move::Done).unwrap();
    assert_eq!(board.captive_count(P0), 0);
    assert_eq!(board.turns_since_capture(), 1);
}

// =============================================================================
// Resolver agrees with the board
// =============================================================================

/// Test the pure resolver on the shapes used above.
#[test]
fn test_resolver_shapes() {
    assert_eq!(captured_positions(&[P1, P1, P0], Face::Red), vec![1]);
    assert_eq!(captured_positions(&[P1, P1, P0, P0], Face::Red), vec![0, 1]);
    assert_eq!(captured_positions(&[P1, P0, P1, P0, P0], Face::Red), vec![0, 2]);
    assert!(captured_positions(&[P1, P0], Face::Blank).is_empty());
}
