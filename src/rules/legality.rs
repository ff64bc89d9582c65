//! Legality oracle.
//!
//! Pure queries over a `Board`. Each gesture is judged by the state, the
//! origin category of the stack involved, and (for drops) the origin of the
//! move in flight. Nothing here mutates the board.

use super::exchange::exchange_is_legal;
use super::geometry::legal_displacement;
use super::movegen;
use crate::board::{Board, PlateauState};
use crate::core::{Cell, EngineError, PieceId, PlayerId, StackId};
use crate::moves::{FaceString, Move};
use crate::pieces::Face;
use crate::stacks::{run_from_top, Level, OriginKind, Stack};

impl Board {
    /// Whether `mv` may be executed now.
    #[must_use]
    pub fn is_legal(&self, mv: &Move) -> bool {
        self.check_legal(mv).is_ok()
    }

    /// Validate `mv` against the current position.
    ///
    /// Unknown piece or stack indices are reported as such; anything else
    /// the rules forbid is an `IllegalMove`.
    pub fn check_legal(&self, mv: &Move) -> Result<(), EngineError> {
        let legal = match mv {
            Move::Pick { piece, .. } => {
                self.try_piece(*piece)?;
                pick_is_legal(self, *piece)
            }
            Move::Drop { stack, level, .. } => {
                if let Some(stack) = stack {
                    self.try_stack(*stack)?;
                }
                drop_is_legal(self, *stack, *level)
            }
            Move::Flip { piece, face, .. } => {
                self.try_piece(*piece)?;
                flip_is_legal(self, *piece, *face)
            }
            Move::Onboard {
                cell,
                level,
                colors,
                pieces,
            } => {
                for &p in pieces {
                    self.try_piece(p)?;
                }
                onboard_is_legal(self, *cell, *level, colors, pieces)
            }
            Move::Exchange { pieces } => {
                for &p in pieces {
                    self.try_piece(p)?;
                }
                exchange_op_is_legal(self, pieces)
            }
            Move::Done => done_is_legal(self),
            Move::Resign => !self.state().is_game_over(),
            Move::Start(_) => {
                self.frames().is_empty()
                    && matches!(self.state(), PlateauState::Onboard2 | PlateauState::Play)
            }
            Move::Pass => pass_is_legal(self),
        };
        if legal {
            Ok(())
        } else {
            Err(EngineError::IllegalMove {
                mv: mv.to_string(),
                state: self.state(),
            })
        }
    }

    /// A stack is in hand.
    #[must_use]
    pub fn has_stack_in_hand(&self) -> bool {
        self.moving_stack().is_some_and(|s| !s.is_empty())
    }
}

/// The piece at `index` and everything above it belong to `owner`.
pub(crate) fn unobstructed(board: &Board, stack: &Stack, index: usize, owner: PlayerId) -> bool {
    stack.pieces()[index..].iter().all(|&p| board.piece(p).owner() == owner)
}

/// `level` puts a drop on top of `stack`.
fn on_top(level: Level, stack: &Stack) -> bool {
    match level {
        Level::Top => true,
        Level::At(i) => i >= stack.height(),
    }
}

/// `level` inserts into the top run of a stack `player` tops, or on top.
fn within_own_run(board: &Board, level: Level, stack: &Stack, player: PlayerId) -> bool {
    if stack.top_owner(board.pieces()) != Some(player) {
        return false;
    }
    let height = stack.height();
    let run = stack.takeoff_height(board.pieces());
    level.index_in(height) >= height - run
}

/// The moving stack may stop on `target` under the movement rules of the
/// stack that started the move.
#[must_use]
pub fn legal_destination(board: &Board, target: StackId) -> bool {
    let frames = board.frames();
    let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
        return false;
    };
    let Ok(landing) = board.try_stack(target) else {
        return false;
    };
    let (Some(origin), Some(dest)) = (board.stack(first.origin).cell(), landing.cell()) else {
        return false;
    };
    let Some(&top) = first.snapshot.last() else {
        return false;
    };
    let face = board.piece(top).real_top();
    let height = run_from_top(&first.snapshot, board.pieces());
    let previous = if frames.len() > 1 {
        board.stack(last.origin).cell().map(|c| c.offset_from(origin))
    } else {
        None
    };
    legal_displacement(face, height, dest.offset_from(origin), previous)
}

/// Whether `piece` may be lifted now.
#[must_use]
pub(crate) fn pick_is_legal(board: &Board, piece: PieceId) -> bool {
    if board.has_stack_in_hand() {
        return false;
    }
    let mover = board.whose_turn();
    let state = board.state();
    let chip = board.piece(piece);
    let stack = board.stack_of(piece);
    let Some(index) = stack.index_of(piece) else {
        return false;
    };

    match stack.origin_kind() {
        OriginKind::Rack => {
            matches!(state, PlateauState::Onboard2 | PlateauState::Play) && stack.owner() == Some(mover)
        }
        OriginKind::Board => match state {
            PlateauState::Play => {
                stack.top_owner(board.pieces()) == Some(mover) && unobstructed(board, stack, index, mover)
            }
            PlateauState::Flipped => {
                let flipped_stack = board.flipped_piece().map(|f| board.piece(f).stack());
                flipped_stack == Some(stack.id())
                    && stack.top_owner(board.pieces()) == Some(mover)
                    && unobstructed(board, stack, index, mover)
            }
            PlateauState::OnboardDone | PlateauState::Onboard2Done => board.dropped_piece() == Some(piece),
            PlateauState::PlayDone
            | PlateauState::PlayCapture
            | PlateauState::PlayUndone
            | PlateauState::Draw => continuation_pick_is_legal(board, stack, index, chip.owner()),
            _ => false,
        },
        OriginKind::Captive => {
            matches!(
                state,
                PlateauState::Play
                    | PlateauState::CaptiveShuffle
                    | PlateauState::Exchange
                    | PlateauState::ExchangeDone
            ) && stack.owner() == Some(mover)
                && (state != PlateauState::Play || board.frames().is_empty())
        }
        OriginKind::Trade => state.is_exchange() && stack.owner() == Some(mover),
        OriginKind::Picked => false,
    }
}

/// Lifting part of the landing stack to carry the move on.
fn continuation_pick_is_legal(board: &Board, stack: &Stack, index: usize, chip_owner: PlayerId) -> bool {
    let mover = board.whose_turn();
    let frames = board.frames();
    let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
        return false;
    };
    if last.origin != stack.id() {
        return false;
    }
    let Some(&original_top) = first.snapshot.last() else {
        return false;
    };
    if !stack.contains(original_top)
        || stack.top_owner(board.pieces()) != Some(mover)
        || !unobstructed(board, stack, index, mover)
    {
        return false;
    }

    // Landing on someone else's piece pins it; a pin may not strand one of
    // the moving stack's own mutes on top of it.
    let pinned = last
        .snapshot
        .last()
        .is_some_and(|&p| board.piece(p).owner() != chip_owner);
    if !pinned || index == 0 {
        return true;
    }
    let under = stack.pieces()[index - 1];
    !board.piece(under).is_mute() || !first.snapshot.contains(&under)
}

/// Whether the stack in hand may be put down on `target` (or, for `None`,
/// returned to where the move started).
#[must_use]
pub(crate) fn drop_is_legal(board: &Board, target: Option<StackId>, level: Level) -> bool {
    let Some(moving) = board.moving_stack().filter(|s| !s.is_empty()) else {
        return false;
    };
    let Some(target) = target else {
        return true;
    };
    let Some(origin) = board.move_origin() else {
        return false;
    };
    let mover = board.whose_turn();
    let state = board.state();
    let dest = board.stack(target);

    match (dest.origin_kind(), origin) {
        (OriginKind::Rack, OriginKind::Rack) => state.is_rack_drop() && dest.owner() == Some(mover),
        (OriginKind::Board, OriginKind::Rack) => {
            let Some(cell) = dest.cell() else {
                return false;
            };
            match state {
                PlateauState::Onboard2Drop => dest.is_empty() && cell.is_edge(board.board_size()),
                PlateauState::OnboardDrop => {
                    dest.is_empty() || within_own_run(board, level, dest, mover)
                }
                _ => false,
            }
        }
        (OriginKind::Board, OriginKind::Board) => {
            if state != PlateauState::PlayDrop {
                return false;
            }
            if board.frames().iter().any(|f| f.origin == target) {
                return true;
            }
            if !legal_destination(board, target) || !on_top(level, dest) {
                return false;
            }
            match dest.top_owner(board.pieces()) {
                None => true,
                Some(owner) if owner == mover => true,
                Some(_) => moving.pieces().iter().any(|&p| !board.piece(p).is_mute()),
            }
        }
        (OriginKind::Captive | OriginKind::Trade, OriginKind::Captive | OriginKind::Trade) => {
            state.is_exchange() && dest.owner() == Some(mover)
        }
        _ => false,
    }
}

/// Whether `piece`, showing real top `face`, may be turned over now.
#[must_use]
pub(crate) fn flip_is_legal(board: &Board, piece: PieceId, face: Face) -> bool {
    let chip = board.piece(piece);
    if chip.real_top() != face {
        return false;
    }
    let mover = board.whose_turn();
    let stack = board.stack_of(piece);
    let is_top = stack.top() == Some(piece);

    match (stack.origin_kind(), board.state()) {
        (OriginKind::Board, PlateauState::Play) => {
            is_top && chip.owner() == mover && board.frames().is_empty()
        }
        (OriginKind::Board, PlateauState::Flipped) => board.flipped_piece() == Some(piece),
        (OriginKind::Picked, state) if state.is_rack_drop() => {
            is_top && board.move_origin() == Some(OriginKind::Rack) && chip.owner() == mover
        }
        _ => false,
    }
}

/// Whether a composite rack-to-board move is legal. An in-hand rack pick
/// counts as still being in the rack.
#[must_use]
pub(crate) fn onboard_is_legal(board: &Board, cell: Cell, level: Level, colors: &FaceString, pieces: &[PieceId]) -> bool {
    let mover = board.whose_turn();
    let state = board.state();
    let initial = match state {
        PlateauState::Onboard2 | PlateauState::Onboard2Drop | PlateauState::Rack2Drop => true,
        PlateauState::Play | PlateauState::OnboardDrop | PlateauState::RackDrop => false,
        _ => return false,
    };
    if board.has_stack_in_hand() && board.move_origin() != Some(OriginKind::Rack) {
        return false;
    }
    if !board.on_board(cell) || colors.len() != 2 * pieces.len() {
        return false;
    }

    let wanted = if initial { 2 } else { 1 };
    if pieces.len() != wanted || (wanted == 2 && pieces[0] == pieces[1]) {
        return false;
    }
    for &p in pieces {
        let chip = board.piece(p);
        let home = board.stack_of(p).origin_kind();
        let in_rack = home == OriginKind::Rack
            || (home == OriginKind::Picked && board.move_origin() == Some(OriginKind::Rack));
        if chip.owner() != mover || !in_rack {
            return false;
        }
    }
    // top piece first in the face string
    for (chunk, &p) in colors.chunks(2).zip(pieces.iter().rev()) {
        let kind = board.piece(p).kind();
        if kind.orientation_for(Some(chunk[0]), Some(chunk[1])).is_none() {
            return false;
        }
    }

    let dest = board.cell_stack(cell);
    if initial {
        dest.is_empty() && cell.is_edge(board.board_size()) && level == Level::Top
    } else {
        dest.is_empty() || within_own_run(board, level, dest, mover)
    }
}

/// Moving the listed captives of the mover into their trade pool.
#[must_use]
pub(crate) fn exchange_op_is_legal(board: &Board, pieces: &[PieceId]) -> bool {
    let mover = board.whose_turn();
    let state = board.state();
    if !matches!(state, PlateauState::Play) && !state.is_exchange() {
        return false;
    }
    if board.has_stack_in_hand() || (state == PlateauState::Play && !board.frames().is_empty()) {
        return false;
    }
    if pieces.is_empty() {
        return false;
    }
    pieces.iter().enumerate().all(|(i, &p)| {
        let stack = board.stack_of(p);
        stack.origin_kind() == OriginKind::Captive && stack.owner() == Some(mover) && !pieces[..i].contains(&p)
    })
}

#[must_use]
pub(crate) fn done_is_legal(board: &Board) -> bool {
    let state = board.state();
    if !state.is_done_state() {
        return false;
    }
    if state == PlateauState::CaptiveShuffle {
        let mover = board.whose_turn();
        let offer = board.trade_value(mover);
        return offer > 0 && offer >= board.min_trade_offer(mover);
    }
    if state == PlateauState::ExchangeDone {
        return exchange_is_legal(board);
    }
    true
}

#[must_use]
pub(crate) fn pass_is_legal(board: &Board) -> bool {
    matches!(board.state(), PlateauState::Play | PlateauState::Flipped) && !movegen::has_non_pass_move(board)
}
