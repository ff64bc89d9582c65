//! Search interface.
//!
//! `SearchGame` is what a tree search needs from a game: enumerate, sample,
//! apply and take back moves, and recognise the end. `Board` implements it
//! with an undo stack of position snapshots, so a search can walk down a
//! line of play on one cloned board and back up again without re-cloning.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::core::{EngineError, GameRng, PlayerId};
use crate::moves::Move;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Winner(PlayerId),
    /// Ended without a winner.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// Game interface for search.
///
/// ## Implementation Notes
///
/// - `apply_move` must be deterministic and must leave the game unchanged
///   when it returns an error.
/// - `undo_move` takes back exactly one successful `apply_move`.
/// - `digest` must agree for equal positions however they were reached.
pub trait SearchGame: Clone {
    /// All legal moves for the player to move. Empty once the game is over.
    fn legal_moves(&self) -> Vec<Move>;

    /// A random legal move, or `None` when there is none.
    fn random_move(&self, rng: &mut GameRng) -> Option<Move>;

    /// Play `mv`, remembering enough to take it back.
    fn apply_move(&mut self, mv: &Move) -> Result<(), EngineError>;

    /// Take back the last applied move.
    fn undo_move(&mut self) -> Result<(), EngineError>;

    /// Hash of the current position.
    fn digest(&self) -> u64;

    /// The player whose input is expected.
    fn current_player(&self) -> PlayerId;

    /// Returns `Some(result)` if the game has ended, `None` if it continues.
    fn result(&self) -> Option<GameResult>;

    fn is_terminal(&self) -> bool {
        self.result().is_some()
    }
}

impl SearchGame for Board {
    fn legal_moves(&self) -> Vec<Move> {
        Board::legal_moves(self)
    }

    fn random_move(&self, rng: &mut GameRng) -> Option<Move> {
        Board::random_move(self, rng)
    }

    fn apply_move(&mut self, mv: &Move) -> Result<(), EngineError> {
        let saved = self.execute_saving(mv)?;
        self.undo_stack.push(saved);
        Ok(())
    }

    fn undo_move(&mut self) -> Result<(), EngineError> {
        let saved = self.undo_stack.pop().ok_or(EngineError::NothingToUndo)?;
        self.pos = saved;
        Ok(())
    }

    fn digest(&self) -> u64 {
        Board::digest(self)
    }

    fn current_player(&self) -> PlayerId {
        self.whose_turn()
    }

    fn result(&self) -> Option<GameResult> {
        Board::result(self).copied()
    }
}
