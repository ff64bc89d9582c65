//! Copy verification and replay.

use tracing::warn;

use super::board::Board;
use crate::core::{EngineError, PlateauConfig};
use crate::moves::Move;

impl Board {
    /// Check that `other` is an exact copy of this board: same layout,
    /// same turn state, same digest.
    pub fn verify_same(&self, other: &Board) -> Result<(), EngineError> {
        let mismatch = self.first_difference(other);
        if let Some(reason) = mismatch {
            warn!(reason = %reason, move_number = self.move_number(), "copy verification failed");
            return Err(EngineError::CopyMismatch(reason));
        }
        Ok(())
    }

    fn first_difference(&self, other: &Board) -> Option<String> {
        if self.config() != other.config() {
            return Some("configurations differ".into());
        }
        if let Some(i) = (0..self.pieces().len()).find(|&i| self.pieces()[i] != other.pieces()[i]) {
            return Some(format!("piece {i} differs"));
        }
        if let Some(i) = (0..self.stacks().len()).find(|&i| self.stacks()[i] != other.stacks()[i]) {
            return Some(format!("stack {i} differs"));
        }
        if self.state() != other.state() || self.whose_turn() != other.whose_turn() {
            return Some(format!(
                "turn state {:?}/{} vs {:?}/{}",
                self.state(),
                self.whose_turn(),
                other.state(),
                other.whose_turn()
            ));
        }
        if self.move_number() != other.move_number() || self.frames() != other.frames() {
            return Some("move in flight differs".into());
        }
        if self.dropped_piece() != other.dropped_piece() || self.flipped_piece() != other.flipped_piece() {
            return Some("dropped or flipped marker differs".into());
        }
        if self.turns_since_capture() != other.turns_since_capture() || self.result() != other.result() {
            return Some("counters differ".into());
        }
        let (a, b) = (self.digest(), other.digest());
        if a != b {
            return Some(format!("digest {a:#018x} vs {b:#018x}"));
        }
        None
    }

    /// Rebuild a board by playing `moves` from the start.
    pub fn replay<'a>(config: PlateauConfig, moves: impl IntoIterator<Item = &'a Move>) -> Result<Self, EngineError> {
        let mut board = Board::new(config)?;
        for mv in moves {
            board.execute(mv)?;
        }
        Ok(board)
    }

    /// Rebuild this board from its own history.
    pub fn replay_history(&self) -> Result<Self, EngineError> {
        Board::replay(self.config().clone(), self.history().iter().map(|r| &r.mv))
    }
}
