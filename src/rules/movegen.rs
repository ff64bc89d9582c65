//! Move generation.
//!
//! Moves are generated one gesture at a time, the way a player would click
//! through a turn: a board move is a `Pick` and then one `Drop` per hop.
//! Rack placements are generated as composite `Onboard` moves.
//!
//! Every candidate is passed through the legality oracle before it is
//! returned, so the generator only has to be generous, never exact.

use rustc_hash::FxHashSet;
use smallvec::{smallvec, SmallVec};

use super::capture::captured_positions;
use super::geometry::reachable_displacements;
use crate::board::{Board, PlateauState};
use crate::core::{Cell, GameRng, PieceId, PlayerId, StackId};
use crate::moves::{FaceString, Locus, Move};
use crate::pieces::{Face, PieceKind};
use crate::stacks::{run_from_top, Level, OriginKind, Stack};

/// Relative weight of a drop that lands on an opponent's stack.
const ATTACK_WEIGHT: f32 = 2.0;

/// Relative weight of opening a prisoner exchange from `Play`.
const EXCHANGE_WEIGHT: f32 = 0.25;

impl Board {
    /// Every move the player to move may make now.
    ///
    /// `Pass` appears only when nothing else is legal in `Play` or
    /// `Flipped`. A finished game has no moves.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = non_pass_moves(self);
        if moves.is_empty() && matches!(self.state(), PlateauState::Play | PlateauState::Flipped) {
            moves.push(Move::Pass);
        }
        moves
    }

    /// A random legal move. Attacking drops are favoured; opening an
    /// exchange is rare.
    pub fn random_move(&self, rng: &mut GameRng) -> Option<Move> {
        let mut moves = self.legal_moves();
        let weights: Vec<f32> = moves.iter().map(|mv| move_weight(self, mv)).collect();
        let i = rng.choose_weighted(&weights)?;
        Some(moves.swap_remove(i))
    }
}

/// Something other than `Pass` is legal.
pub(crate) fn has_non_pass_move(board: &Board) -> bool {
    !non_pass_moves(board).is_empty()
}

fn move_weight(board: &Board, mv: &Move) -> f32 {
    match mv {
        Move::Drop { stack: Some(target), .. } => {
            let dest = board.stack(*target);
            let attacked = dest.origin_kind() == OriginKind::Board
                && dest
                    .top_owner(board.pieces())
                    .is_some_and(|owner| owner != board.whose_turn());
            if attacked {
                ATTACK_WEIGHT
            } else {
                1.0
            }
        }
        Move::Exchange { .. } if board.state() == PlateauState::Play => EXCHANGE_WEIGHT,
        _ => 1.0,
    }
}

fn non_pass_moves(board: &Board) -> Vec<Move> {
    use PlateauState as S;

    let mut out = Vec::new();
    match board.state() {
        S::Onboard2 => initial_onboards(board, &mut out),
        S::Play => {
            onboards(board, &mut out);
            board_picks(board, None, &mut out);
            flips(board, &mut out);
            exchange_openings(board, &mut out);
        }
        S::Flipped => {
            if let Some(flipped) = board.flipped_piece() {
                board_picks(board, Some(board.piece(flipped).stack()), &mut out);
                retain_legal(board, &mut out);
                if out.is_empty() {
                    out.push(flip_move(board, flipped));
                }
            }
        }
        S::PlayDrop => {
            hop_drops(board, &mut out);
            in_place_drop(board, &mut out);
            retain_legal(board, &mut out);
            if out.is_empty() {
                undo_drops(board, &mut out);
            }
        }
        state @ (S::PlayDone | S::PlayCapture | S::PlayUndone) => {
            if state.is_done_state() {
                out.push(Move::Done);
            }
            continuation_picks(board, false, &mut out);
            retain_legal(board, &mut out);
            if out.is_empty() {
                continuation_picks(board, true, &mut out);
            }
        }
        S::Onboard2Drop | S::Rack2Drop | S::OnboardDrop | S::RackDrop => rack_drops(board, &mut out),
        S::CaptiveShuffle => {
            if board.has_stack_in_hand() {
                pool_drops(board, &mut out);
            } else {
                out.push(Move::Done);
                exchange_openings(board, &mut out);
                retain_legal(board, &mut out);
                if out.is_empty() {
                    // the offer can never be met: take it back piece by piece
                    trade_picks(board, &mut out);
                }
            }
        }
        S::Exchange => {
            if board.has_stack_in_hand() {
                pool_drops(board, &mut out);
            } else {
                exchange_responses(board, &mut out);
            }
        }
        S::ExchangeDone | S::Onboard2Done | S::OnboardDone | S::Draw | S::Resign => out.push(Move::Done),
        S::GameOver => {}
    }
    retain_legal(board, &mut out);
    out
}

fn retain_legal(board: &Board, out: &mut Vec<Move>) {
    out.retain(|mv| board.is_legal(mv));
}

// === Rack placement ===

/// The next piece of each kind in `player`'s rack, skipping `skip` pieces
/// from the top of each slot.
fn rack_piece(board: &Board, player: PlayerId, kind: PieceKind, skip: usize) -> Option<PieceId> {
    let rack = board.stack(board.rack_stack_id(player, kind));
    rack.height().checked_sub(skip + 1).map(|i| rack.pieces()[i])
}

/// Orientations worth trying for a piece, as `(up, down)` faces.
fn orientations(kind: PieceKind) -> SmallVec<[(Face, Face); 2]> {
    let (primary, secondary) = kind.faces();
    if kind.is_mono_color() {
        smallvec![(primary, secondary)]
    } else {
        smallvec![(primary, secondary), (secondary, primary)]
    }
}

fn initial_onboards(board: &Board, out: &mut Vec<Move>) {
    let mover = board.whose_turn();
    let n = board.board_size();
    let cells: Vec<Cell> = board
        .cells()
        .filter(|c| c.is_edge(n) && board.cell_stack(*c).is_empty())
        .collect();

    for bottom_kind in PieceKind::ALL {
        let Some(bottom) = rack_piece(board, mover, bottom_kind, 0) else {
            continue;
        };
        for top_kind in PieceKind::ALL {
            let skip = usize::from(top_kind == bottom_kind);
            let Some(top) = rack_piece(board, mover, top_kind, skip) else {
                continue;
            };
            for (top_up, top_down) in orientations(top_kind) {
                for (bottom_up, bottom_down) in orientations(bottom_kind) {
                    let colors: FaceString = smallvec![top_up, top_down, bottom_up, bottom_down];
                    for &cell in &cells {
                        out.push(Move::Onboard {
                            cell,
                            level: Level::Top,
                            colors: colors.clone(),
                            pieces: smallvec![bottom, top],
                        });
                    }
                }
            }
        }
    }
}

/// Single-piece placements on empty cells or on top of the mover's own
/// stacks. Pieces never go on showing Orange.
fn onboards(board: &Board, out: &mut Vec<Move>) {
    let mover = board.whose_turn();
    let cells: Vec<Cell> = board
        .cells()
        .filter(|&c| board.top_owner(c).map_or(true, |owner| owner == mover))
        .collect();

    for kind in PieceKind::ALL {
        let Some(piece) = rack_piece(board, mover, kind, 0) else {
            continue;
        };
        for (up, down) in orientations(kind) {
            if up == Face::Orange {
                continue;
            }
            for &cell in &cells {
                out.push(Move::Onboard {
                    cell,
                    level: Level::Top,
                    colors: smallvec![up, down],
                    pieces: smallvec![piece],
                });
            }
        }
    }
}

fn rack_drops(board: &Board, out: &mut Vec<Move>) {
    let Some(moving) = board.moving_stack() else {
        return;
    };
    for cell in board.cells() {
        out.push(Move::Drop {
            stack: Some(board.cell_stack_id(cell)),
            level: Level::Top,
            locus: Some(Locus::Cell(cell)),
        });
    }
    if let Some(top) = moving.top() {
        let piece = board.piece(top);
        out.push(Move::Drop {
            stack: Some(board.rack_stack_id(piece.owner(), piece.kind())),
            level: Level::Top,
            locus: Some(Locus::Rack),
        });
    }
}

// === Board moves ===

/// Lifts from the mover's stacks (or only from `only`) that have at least
/// one place to go.
fn board_picks(board: &Board, only: Option<StackId>, out: &mut Vec<Move>) {
    let mover = board.whose_turn();
    let table = board.pieces();
    for stack in board.board_stacks() {
        if only.is_some_and(|id| id != stack.id()) || stack.top_owner(table) != Some(mover) {
            continue;
        }
        let Some(cell) = stack.cell() else {
            continue;
        };
        let height = stack.height();
        let in_place = captures_in_place(board, stack.pieces());
        for index in height - stack.takeoff_height(table)..height {
            if in_place || has_first_hop(board, stack, index) {
                out.push(Move::Pick {
                    piece: stack.pieces()[index],
                    locus: Some(Locus::Cell(cell)),
                    level: Some(index),
                });
            }
        }
    }
}

/// Lifting from `index` leaves the stack at least one landing cell.
fn has_first_hop(board: &Board, stack: &Stack, index: usize) -> bool {
    let table = board.pieces();
    let (Some(cell), Some(top)) = (stack.cell(), stack.top()) else {
        return false;
    };
    let mover = board.whose_turn();
    let face = table[top.index()].real_top();
    let colored = stack.pieces()[index..].iter().any(|p| !table[p.index()].is_mute());
    reachable_displacements(face, stack.takeoff_height(table), None)
        .into_iter()
        .filter_map(|(dx, dy)| cell.step(dx, dy, board.board_size()))
        .any(|dest| match board.top_owner(dest) {
            None => true,
            Some(owner) => owner == mover || colored,
        })
}

fn flip_move(board: &Board, piece: PieceId) -> Move {
    let chip = board.piece(piece);
    Move::Flip {
        piece,
        locus: board.stack(chip.stack()).cell().map(Locus::Cell),
        face: chip.real_top(),
    }
}

fn flips(board: &Board, out: &mut Vec<Move>) {
    let mover = board.whose_turn();
    for stack in board.board_stacks() {
        let Some(top) = stack.top() else {
            continue;
        };
        let chip = board.piece(top);
        if chip.owner() == mover && !chip.is_mono_color() {
            out.push(flip_move(board, top));
        }
    }
}

/// Drops that carry the stack in hand to a new cell.
fn hop_drops(board: &Board, out: &mut Vec<Move>) {
    let frames = board.frames();
    let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
        return;
    };
    let Some(start) = board.stack(first.origin).cell() else {
        return;
    };
    let Some(&top) = first.snapshot.last() else {
        return;
    };
    let face = board.piece(top).real_top();
    let height = run_from_top(&first.snapshot, board.pieces());
    let previous = if frames.len() > 1 {
        board.stack(last.origin).cell().map(|c| c.offset_from(start))
    } else {
        None
    };
    for (dx, dy) in reachable_displacements(face, height, previous) {
        if let Some(cell) = start.step(dx, dy, board.board_size()) {
            out.push(Move::Drop {
                stack: Some(board.cell_stack_id(cell)),
                level: Level::Top,
                locus: Some(Locus::Cell(cell)),
            });
        }
    }
}

/// Putting the stack in hand straight back down, when that stomps its
/// origin into a capture.
fn in_place_drop(board: &Board, out: &mut Vec<Move>) {
    let Some(first) = board.frames().first() else {
        return;
    };
    if captures_in_place(board, &first.snapshot) {
        out.push(Move::Drop {
            stack: Some(first.origin),
            level: Level::Top,
            locus: board.stack(first.origin).cell().map(Locus::Cell),
        });
    }
}

/// A stack laid out as `pieces` takes at least one defender when it is
/// stomped where it stands.
fn captures_in_place(board: &Board, pieces: &[PieceId]) -> bool {
    let table = board.pieces();
    let Some(&top) = pieces.last() else {
        return false;
    };
    let owners: Vec<PlayerId> = pieces.iter().map(|p| table[p.index()].owner()).collect();
    !captured_positions(&owners, table[top.index()].real_top()).is_empty()
}

/// Drops back onto a stack the move already passed through.
fn undo_drops(board: &Board, out: &mut Vec<Move>) {
    for frame in board.frames() {
        out.push(Move::Drop {
            stack: Some(frame.origin),
            level: Level::Top,
            locus: board.stack(frame.origin).cell().map(Locus::Cell),
        });
    }
}

/// Lifts from the landing stack that carry the move on. The piece just
/// dropped is only offered when `redo` is set, since lifting it takes the
/// last hop back.
fn continuation_picks(board: &Board, redo: bool, out: &mut Vec<Move>) {
    let frames = board.frames();
    // after a capture in place there is no hop to carry on from
    if frames.len() < 2 {
        return;
    }
    let Some(last) = frames.last() else {
        return;
    };
    let landing = board.stack(last.origin);
    let Some(cell) = landing.cell() else {
        return;
    };
    let dropped = board.dropped_piece();
    let height = landing.height();
    for index in height - landing.takeoff_height(board.pieces())..height {
        let piece = landing.pieces()[index];
        if (Some(piece) == dropped) == redo {
            out.push(Move::Pick {
                piece,
                locus: Some(Locus::Cell(cell)),
                level: Some(index),
            });
        }
    }
}

// === Prisoner exchange ===

/// One captive of each kind offered on its own.
fn exchange_openings(board: &Board, out: &mut Vec<Move>) {
    for stack in board.captive_stacks(board.whose_turn()) {
        if let Some(top) = stack.top() {
            out.push(Move::Exchange {
                pieces: smallvec![top],
            });
        }
    }
}

/// Every distinct set of captives that brings the responder's offer up to
/// what the rules demand.
fn exchange_responses(board: &Board, out: &mut Vec<Move>) {
    let mover = board.whose_turn();
    let captives = board.captive_pieces(mover);
    let held: Vec<u32> = captives
        .iter()
        .chain(board.trade_pieces(mover).iter())
        .map(|&p| board.piece(p).value())
        .collect();
    let ask = board.trade_value(mover.opponent());
    let needed = super::exchange::largest_subset_below(ask, &held);
    let offered = board.trade_value(mover);

    let mut seen = FxHashSet::default();
    for mask in 1u32..(1 << captives.len()) {
        let chosen: SmallVec<[PieceId; 6]> = captives
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &p)| p)
            .collect();
        let total: u32 = chosen.iter().map(|&p| board.piece(p).value()).sum();
        if offered + total < needed {
            continue;
        }
        let mut kinds = [0u8; PieceKind::COUNT];
        for &p in &chosen {
            kinds[board.piece(p).kind().index()] += 1;
        }
        if seen.insert(kinds) {
            out.push(Move::Exchange { pieces: chosen });
        }
    }
}

fn trade_picks(board: &Board, out: &mut Vec<Move>) {
    for stack in board.trade_stacks(board.whose_turn()) {
        if let Some(top) = stack.top() {
            out.push(Move::Pick {
                piece: top,
                locus: Some(Locus::Trade),
                level: None,
            });
        }
    }
}

fn pool_drops(board: &Board, out: &mut Vec<Move>) {
    let mover = board.whose_turn();
    let Some(top) = board.moving_stack().and_then(Stack::top) else {
        return;
    };
    let kind = board.piece(top).kind();
    out.push(Move::Drop {
        stack: Some(board.captive_stack_id(mover, kind)),
        level: Level::Top,
        locus: Some(Locus::Captive),
    });
    out.push(Move::Drop {
        stack: Some(board.trade_stack_id(mover, kind)),
        level: Level::Top,
        locus: Some(Locus::Trade),
    });
}
