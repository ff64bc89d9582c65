//! Hidden-state resampling tests.
//!
//! Resampling must keep everything the viewer can see, so these tests
//! compare the viewer's picture of the board before and after.

use plateau_engine::{Board, Cell, Face, GameRng, Move, PieceId, PlateauConfig, PlateauState, PlayerId};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);

/// A middle game: player 1 has mutes and a blank-side-up red on the board,
/// player 0 has a few pieces of its own.
fn hidden_board() -> Board {
    let mut board = Board::new(PlateauConfig::default()).unwrap();
    let placements = [
        (12, (0, 0), false),
        (13, (0, 0), false),
        (16, (3, 3), true),
        (17, (2, 3), false),
        (0, (0, 1), false),
        (4, (0, 1), false),
        (6, (3, 0), false),
    ];
    for (piece, (col, row), flipped) in placements {
        board.setup_place(PieceId(piece), Cell::new(col, row), flipped).unwrap();
    }
    board.setup_turn(P0, PlateauState::Play).unwrap();
    board
}

/// What `viewer` sees at every position of every stack: who owns the piece
/// and which face is up, if known.
fn picture(board: &Board, viewer: PlayerId) -> Vec<Vec<(PlayerId, Face)>> {
    board
        .stacks()
        .iter()
        .map(|s| {
            s.pieces()
                .iter()
                .map(|&p| {
                    let piece = board.piece(p);
                    (piece.owner(), piece.visible_top(viewer))
                })
                .collect()
        })
        .collect()
}

// =============================================================================
// Visible state is preserved
// =============================================================================

/// Test that the viewer's picture of the board survives resampling.
#[test]
fn test_viewer_picture_is_unchanged() {
    let board = hidden_board();
    let before = picture(&board, P0);
    for seed in 0..32 {
        let mut sample = board.clone();
        let mut rng = GameRng::new(seed);
        sample.randomize_hidden_state(&mut rng, P0);
        assert_eq!(picture(&sample, P0), before, "seed {seed}");
        assert!(sample.check_invariants().is_ok(), "seed {seed}");
    }
}

/// Test that the viewer's own pieces never move.
#[test]
fn test_viewer_pieces_stay_put() {
    let board = hidden_board();
    for seed in 0..32 {
        let mut sample = board.clone();
        sample.randomize_hidden_state(&mut GameRng::new(seed), P0);
        for piece in board.pieces().iter().filter(|p| p.owner() == P0) {
            let now = sample.piece(piece.id());
            assert_eq!(now.stack(), piece.stack());
            assert_eq!(now.is_flipped(), piece.is_flipped());
        }
    }
}

/// Test that some sample actually differs from the real layout.
#[test]
fn test_resampling_moves_hidden_pieces() {
    let board = hidden_board();
    let moved = (0..32).any(|seed| {
        let mut sample = board.clone();
        sample.randomize_hidden_state(&mut GameRng::new(seed), P0) > 0
            && sample.cell_stack(Cell::new(0, 0)).pieces() != board.cell_stack(Cell::new(0, 0)).pieces()
    });
    assert!(moved);
}

/// Test that a piece showing red is only ever replaced by one that can.
#[test]
fn test_known_colors_are_respected() {
    let board = hidden_board();
    for seed in 0..32 {
        let mut sample = board.clone();
        sample.randomize_hidden_state(&mut GameRng::new(seed), P0);
        let top = sample.cell_stack(Cell::new(2, 3)).top().unwrap();
        assert_eq!(sample.piece(top).real_top(), Face::Red);
        assert_eq!(sample.piece(top).owner(), P1);
    }
}

// =============================================================================
// Nothing to resample
// =============================================================================

/// Test that open information leaves nothing to resample.
#[test]
fn test_open_information_has_no_swaps() {
    let mut board = Board::new(PlateauConfig::default().with_open_information()).unwrap();
    board.setup_place(PieceId(16), Cell::new(1, 1), true).unwrap();
    board.setup_turn(P0, PlateauState::Play).unwrap();
    let digest = board.digest();
    assert_eq!(board.randomize_hidden_state(&mut GameRng::new(9), P0), 0);
    assert_eq!(board.digest(), digest);
}

/// Test that captives are never resampled.
#[test]
fn test_captives_stay_put() {
    let mut board = hidden_board();
    // player 0's red-topped pair at A2 stomps the two mutes at A1
    board.execute(&"Pick 0 A2 0".parse().unwrap()).unwrap();
    board.execute(&Move::drop_on(board.cell_stack_id(Cell::new(0, 0)))).unwrap();
    board.execute(&Move::Done).unwrap();
    assert_eq!(board.captive_count(P0), 2);

    let mut sample = board.clone();
    sample.randomize_hidden_state(&mut GameRng::new(4), P0);
    let mut held = sample.captive_pieces(P0);
    held.sort();
    assert_eq!(held, vec![PieceId(12), PieceId(13)]);
}

/// Test that the moves a search sees after resampling are all legal.
#[test]
fn test_resampled_moves_are_legal() {
    let mut board = hidden_board();
    board.randomize_hidden_state(&mut GameRng::new(11), P0);
    for mv in board.legal_moves() {
        assert!(board.is_legal(&mv), "{mv}");
    }
}
