//! Hidden-state resampling for search.
//!
//! From one player's point of view, opponent pieces they have not fully
//! seen could be any other unseen opponent piece that shows the same known
//! faces. Resampling shuffles those pieces among their positions so a
//! search sees a random member of the viewer's information set instead of
//! the true hidden layout.

use rustc_hash::FxHashSet;

use super::board::Board;
use crate::core::{GameRng, PieceId, PlayerId};
use crate::pieces::{Face, Piece, PieceKind};
use crate::stacks::{swap_in, OriginKind};

/// What `viewer` can see of a piece where it lies: known faces plus the
/// kind a sorted pool slot implies.
#[derive(Clone, Copy, Debug)]
struct Slot {
    top: Option<Face>,
    bottom: Option<Face>,
    kind: Option<PieceKind>,
}

impl Slot {
    fn of(board: &Board, piece: &Piece, viewer: PlayerId) -> Self {
        let (knows_top, knows_bottom) = piece.oriented_knowledge(viewer);
        Self {
            top: knows_top.then(|| piece.real_top()),
            bottom: knows_bottom.then(|| piece.real_bottom()),
            kind: board.stack(piece.stack()).slot_kind(),
        }
    }

    fn admits(self, piece: &Piece) -> bool {
        self.kind.map_or(true, |k| k == piece.kind()) && piece.kind().orientation_for(self.top, self.bottom).is_some()
    }
}

impl Board {
    /// Replace every opponent piece `viewer` has not fully seen with a
    /// random compatible substitute. Returns the number of swaps made.
    pub fn randomize_hidden_state(&mut self, rng: &mut GameRng, viewer: PlayerId) -> usize {
        let hidden: Vec<PieceId> = self
            .pieces()
            .iter()
            .filter(|p| p.owner() != viewer && !p.knows_fully(viewer))
            .filter(|p| {
                !matches!(
                    self.stack(p.stack()).origin_kind(),
                    OriginKind::Captive | OriginKind::Trade
                )
            })
            .map(Piece::id)
            .collect();

        let mut swaps = 0;
        let mut moved = FxHashSet::default();
        for &p in &hidden {
            let slot_p = Slot::of(self, self.piece(p), viewer);
            let candidates: Vec<PieceId> = hidden
                .iter()
                .copied()
                .filter(|&q| {
                    q == p || {
                        let slot_q = Slot::of(self, self.piece(q), viewer);
                        slot_p.admits(self.piece(q)) && slot_q.admits(self.piece(p))
                    }
                })
                .collect();
            let Some(&q) = rng.choose(&candidates) else {
                continue;
            };
            if q != p {
                self.swap_pieces(p, q, viewer);
                moved.insert(p);
                moved.insert(q);
                swaps += 1;
            }
        }
        tracing::trace!(viewer = %viewer, swaps, pieces = moved.len(), "resampled hidden state");
        swaps
    }

    /// Exchange the locations of two pieces of the same owner. Each piece
    /// takes the other's orientation as far as `viewer` could see it, and
    /// inherits what every observer knew about that position.
    pub(crate) fn swap_pieces(&mut self, a: PieceId, b: PieceId, viewer: PlayerId) {
        let (sa, sb) = (self.piece(a).stack(), self.piece(b).stack());
        let slot_a = Slot::of(self, self.piece(a), viewer);
        let slot_b = Slot::of(self, self.piece(b), viewer);
        let knowledge_a: Vec<(bool, bool)> = PlayerId::all().map(|o| self.piece(a).oriented_knowledge(o)).collect();
        let knowledge_b: Vec<(bool, bool)> = PlayerId::all().map(|o| self.piece(b).oriented_knowledge(o)).collect();

        self.stack_mut(sa).swap_members(a, b);
        if sb != sa {
            self.stack_mut(sb).swap_members(a, b);
        }
        self.piece_mut(a).set_stack(sb);
        self.piece_mut(b).set_stack(sa);

        for frame in &mut self.pos.frames {
            swap_in(&mut frame.snapshot, a, b);
        }
        for marker in [&mut self.pos.dropped_piece, &mut self.pos.flipped_piece] {
            if *marker == Some(a) {
                *marker = Some(b);
            } else if *marker == Some(b) {
                *marker = Some(a);
            }
        }

        self.settle_into(a, slot_b, &knowledge_b);
        self.settle_into(b, slot_a, &knowledge_a);
    }

    /// Orient `piece` to show what `slot` showed and give it the slot's
    /// per-observer knowledge.
    fn settle_into(&mut self, piece: PieceId, slot: Slot, knowledge: &[(bool, bool)]) {
        let kind = self.piece(piece).kind();
        let p = self.piece_mut(piece);
        if slot.top.is_some() || slot.bottom.is_some() {
            if let Some(flipped) = kind.orientation_for(slot.top, slot.bottom) {
                p.set_flipped(flipped);
            }
        }
        for (observer, &known) in PlayerId::all().zip(knowledge) {
            p.set_oriented_knowledge(observer, known);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PlateauState;
    use crate::core::{Cell, PlateauConfig};

    #[test]
    fn test_fully_known_pieces_stay_put() {
        let mut board = Board::new(PlateauConfig::default().with_open_information()).unwrap();
        let before = board.clone();
        let mut rng = GameRng::new(3);
        assert_eq!(board.randomize_hidden_state(&mut rng, PlayerId::new(0)), 0);
        assert_eq!(board.pieces(), before.pieces());
        assert_eq!(board.stacks(), before.stacks());
    }

    #[test]
    fn test_swap_keeps_partition_and_markers() {
        let mut board = Board::new(PlateauConfig::default()).unwrap();
        board.setup_turn(PlayerId::new(1), PlateauState::Play).unwrap();
        board.setup_place(PieceId(12), Cell::new(0, 0), false).unwrap();
        board.setup_place(PieceId(13), Cell::new(3, 3), false).unwrap();
        board.pos.dropped_piece = Some(PieceId(12));

        board.swap_pieces(PieceId(12), PieceId(13), PlayerId::new(0));
        assert!(board.check_invariants().is_ok());
        assert_eq!(board.cell_stack(Cell::new(0, 0)).top(), Some(PieceId(13)));
        assert_eq!(board.dropped_piece(), Some(PieceId(13)));
    }
}
