//! Property tests over random playouts.
//!
//! Every playout is driven by the engine's own weighted move sampler, so
//! these tests exercise move generation, legality and execution together.

use plateau_engine::{Board, GameRng, GameRngState, Move, PlateauConfig, SearchGame};
use proptest::prelude::*;

/// Gestures per playout. Enough to get well past the opening.
const MAX_STEPS: usize = 300;

/// Route engine logs to the test output; `RUST_LOG=plateau_engine=debug`
/// shows every turn.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Play up to `steps` sampled moves through the search interface.
fn playout(config: PlateauConfig, seed: u64, steps: usize) -> Board {
    init_tracing();
    let mut board = Board::new(config).unwrap();
    let mut rng = GameRng::new(seed);
    for _ in 0..steps {
        let Some(mv) = board.random_move(&mut rng) else {
            break;
        };
        board.apply_move(&mv).unwrap_or_else(|e| panic!("{mv}: {e}"));
    }
    board
}

// =============================================================================
// Invariants along the way
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Test that every position reached keeps the board a partition of the
    /// pieces, and that only finished games run out of moves.
    #[test]
    fn prop_playout_keeps_invariants(seed in any::<u64>()) {
        init_tracing();
        let mut board = Board::new(PlateauConfig::default().with_seed(seed)).unwrap();
        let mut rng = GameRng::new(seed);
        for _ in 0..MAX_STEPS {
            let moves = board.legal_moves();
            if moves.is_empty() {
                prop_assert!(board.is_terminal());
                break;
            }
            let mv = board.random_move(&mut rng).unwrap();
            prop_assert!(moves.contains(&mv));
            board.apply_move(&mv).unwrap();
            prop_assert!(board.check_invariants().is_ok(), "after {}", mv);
        }
    }

    /// Test that undoing every applied move returns the starting position.
    #[test]
    fn prop_undo_restores_start(seed in any::<u64>(), steps in 1usize..120) {
        let start = Board::new(PlateauConfig::default()).unwrap();
        let mut board = playout(PlateauConfig::default(), seed, steps);
        while board.undo_move().is_ok() {}
        prop_assert_eq!(SearchGame::digest(&board), SearchGame::digest(&start));
        prop_assert!(board.history().is_empty());
        prop_assert!(board.verify_same(&start).is_ok());
    }

    /// Test that replaying a game's history rebuilds the same board.
    #[test]
    fn prop_replay_verifies(seed in any::<u64>()) {
        let board = playout(PlateauConfig::default().with_seed(seed), seed, MAX_STEPS);
        let replayed = board.replay_history().unwrap();
        prop_assert!(board.verify_same(&replayed).is_ok());
        prop_assert_eq!(board.digest(), replayed.digest());
    }

    /// Test that every move in a played history survives the text protocol.
    #[test]
    fn prop_history_text_round_trips(seed in any::<u64>()) {
        let board = playout(PlateauConfig::default(), seed, MAX_STEPS);
        for record in board.history().iter() {
            let parsed: Move = record.mv.to_string().parse().unwrap();
            prop_assert_eq!(&parsed, &record.mv);
        }
    }

    /// Test that playouts on other board sizes and open boards stay sound.
    #[test]
    fn prop_variants_stay_sound(seed in any::<u64>(), size in 3usize..=6, open in any::<bool>()) {
        let mut config = PlateauConfig::default().with_board_size(size).with_seed(seed);
        if open {
            config = config.with_open_information();
        }
        let board = playout(config, seed, MAX_STEPS);
        prop_assert!(board.check_invariants().is_ok());
    }
}

// =============================================================================
// Clones and resampled copies
// =============================================================================

/// Test that a clone is independent of its source.
#[test]
fn test_clone_is_independent() {
    let board = playout(PlateauConfig::default(), 17, 40);
    let mut copy = board.clone();
    assert!(board.verify_same(&copy).is_ok());

    let mut rng = GameRng::new(5);
    if let Some(mv) = copy.random_move(&mut rng) {
        copy.apply_move(&mv).unwrap();
        assert!(board.verify_same(&copy).is_err());
    }
    assert!(board.check_invariants().is_ok());
}

/// Test that playouts from a resampled copy stay sound.
#[test]
fn test_playout_after_resampling() {
    let board = playout(PlateauConfig::default(), 23, 60);
    let viewer = board.current_player();
    for seed in 0..8 {
        let mut sample = board.clone();
        let mut rng = GameRng::new(seed);
        sample.randomize_hidden_state(&mut rng, viewer);
        for _ in 0..MAX_STEPS {
            let Some(mv) = sample.random_move(&mut rng) else {
                break;
            };
            sample.apply_move(&mv).unwrap();
        }
        assert!(sample.check_invariants().is_ok());
    }
}

/// Test that the same seed gives the same game.
#[test]
fn test_playouts_are_deterministic() {
    let a = playout(PlateauConfig::default(), 99, MAX_STEPS);
    let b = playout(PlateauConfig::default(), 99, MAX_STEPS);
    assert_eq!(a.digest(), b.digest());
    assert_eq!(a.history().len(), b.history().len());
}

// =============================================================================
// Serialization
// =============================================================================

/// Test that configuration and RNG state survive JSON.
#[test]
fn test_config_and_rng_state_serialize() {
    let config = PlateauConfig::default().with_board_size(5).with_seed(31);
    let json = serde_json::to_string(&config).unwrap();
    let back: PlateauConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);

    let mut rng = GameRng::new(8);
    rng.next_u64();
    let state = rng.state();
    let json = serde_json::to_string(&state).unwrap();
    let back: GameRngState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);

    let mut resumed = GameRng::from_state(&back);
    assert_eq!(resumed.next_u64(), rng.next_u64());
}
