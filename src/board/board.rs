//! The board: piece and stack arenas plus turn state.
//!
//! ## Layout
//!
//! All pieces and stacks live in flat tables addressed by `PieceId` and
//! `StackId`. Pieces point back at their stack by index, so cloning a board
//! is a plain value copy and needs no pointer remapping.
//!
//! ## Position
//!
//! Everything that changes during play is kept in `Position`, which is what
//! the undo stack snapshots. The move history is an `im::Vector` inside the
//! position so snapshots share it structurally.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::frames::MoveFrame;
use super::state::PlateauState;
use crate::core::{Cell, EngineError, GameRng, PieceId, PlateauConfig, PlayerId, PlayerMap, StackId, PLAYER_COUNT};
use crate::moves::MoveRecord;
use crate::pieces::{Piece, PieceKind};
use crate::rules::GameResult;
use crate::stacks::{Level, Origin, OriginKind, PieceList, Stack};

/// Pool slots per player: one captive and one trade stack per kind, then
/// one rack stack per kind.
const POOL_STACKS_PER_PLAYER: usize = 3 * PieceKind::COUNT;

/// Mutable game state, snapshotted by the undo stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) pieces: Vec<Piece>,
    pub(crate) stacks: Vec<Stack>,
    pub(crate) state: PlateauState,
    pub(crate) whose_turn: PlayerId,
    pub(crate) move_number: u32,
    pub(crate) frames: Vec<MoveFrame>,
    pub(crate) dropped_piece: Option<PieceId>,
    pub(crate) flipped_piece: Option<PieceId>,
    pub(crate) unresign: Option<PlateauState>,
    pub(crate) turns_since_capture: u32,
    pub(crate) min_trade_offer: PlayerMap<u32>,
    pub(crate) result: Option<GameResult>,
    pub(crate) history: Vector<MoveRecord>,
    /// Digests at each turn hand-over, for repetition counting.
    pub(crate) turn_digests: Vector<u64>,
}

/// Per-player summary used for scoring and display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Enemy pieces held in this player's captive pool.
    pub captives: usize,
    /// Point value of those captives.
    pub captive_points: u32,
    /// This player's pieces on the board.
    pub on_board: usize,
    /// Sum of takeoff heights of the stacks this player tops.
    pub controlled_height: usize,
    /// Point value still in this player's rack.
    pub rack_points: u32,
    /// Point value of this player's pieces that are not captured.
    pub points_in_play: u32,
}

/// A Plateau game.
#[derive(Clone, Debug)]
pub struct Board {
    config: PlateauConfig,
    pub(crate) pos: Position,
    pub(crate) undo_stack: Vec<Position>,
}

impl Board {
    /// Set up a new game: every piece in its owner's rack, player 0 to place
    /// the initial 2-stack.
    pub fn new(config: PlateauConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let n = config.board_size;
        let slots = picked_slots(n);

        let mut stacks = Vec::with_capacity(n * n + PLAYER_COUNT * POOL_STACKS_PER_PLAYER + slots);
        for col in 0..n {
            for row in 0..n {
                let id = StackId(stacks.len() as u16);
                stacks.push(Stack::board(id, Cell::new(col as u8, row as u8)));
            }
        }
        for player in PlayerId::all() {
            for kind in PieceKind::ALL {
                let id = StackId(stacks.len() as u16);
                stacks.push(Stack::pool(id, Origin::Captive, player, kind));
                let id = StackId(stacks.len() as u16);
                stacks.push(Stack::pool(id, Origin::Trade, player, kind));
            }
            for kind in PieceKind::ALL {
                let id = StackId(stacks.len() as u16);
                stacks.push(Stack::pool(id, Origin::Rack, player, kind));
            }
        }
        for slot in 0..slots {
            let id = StackId(stacks.len() as u16);
            stacks.push(Stack::picked(id, slot as u8));
        }

        let mut tags = GameRng::new(config.seed).for_context("piece-tags");
        let mut pieces = Vec::with_capacity(PLAYER_COUNT * config.pieces_per_player());
        for player in PlayerId::all() {
            for kind in PieceKind::ALL {
                for _ in 0..config.piece_counts[kind.index()] {
                    let id = PieceId(pieces.len() as u16);
                    let rack = rack_stack_id(n, player, kind);
                    let mut piece = Piece::new(id, player, kind, tags.next_u64(), rack);
                    if !config.hidden_information {
                        piece.reveal_all();
                    }
                    stacks[rack.index()].insert_at(Level::Top, &[id]);
                    pieces.push(piece);
                }
            }
        }

        debug!(setup = %config.setup_string(), pieces = pieces.len(), "new board");

        Ok(Self {
            config,
            pos: Position {
                pieces,
                stacks,
                state: PlateauState::Onboard2,
                whose_turn: PlayerId::new(0),
                move_number: 0,
                frames: Vec::new(),
                dropped_piece: None,
                flipped_piece: None,
                unresign: None,
                turns_since_capture: 0,
                min_trade_offer: PlayerMap::with_value(0),
                result: None,
                history: Vector::new(),
                turn_digests: Vector::new(),
            },
            undo_stack: Vec::new(),
        })
    }

    /// Set up a game from a setup string such as `"plateau 2 1035356 1"`.
    pub fn from_setup_str(setup: &str) -> Result<Self, EngineError> {
        Self::new(PlateauConfig::from_setup_str(setup)?)
    }

    // === Configuration and turn state ===

    #[must_use]
    pub fn config(&self) -> &PlateauConfig {
        &self.config
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.config.board_size
    }

    #[must_use]
    pub fn state(&self) -> PlateauState {
        self.pos.state
    }

    #[must_use]
    pub fn whose_turn(&self) -> PlayerId {
        self.pos.whose_turn
    }

    /// Completed turn hand-overs since the start.
    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.pos.move_number
    }

    /// Frames of the move in flight, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[MoveFrame] {
        &self.pos.frames
    }

    /// The stack currently in hand, if any.
    #[must_use]
    pub fn moving_stack(&self) -> Option<&Stack> {
        self.pos.frames.last()?.moving.map(|id| self.stack(id))
    }

    /// Origin category of the move in flight.
    #[must_use]
    pub fn move_origin(&self) -> Option<OriginKind> {
        self.pos.frames.first().map(|f| self.stack(f.origin).origin_kind())
    }

    #[must_use]
    pub fn dropped_piece(&self) -> Option<PieceId> {
        self.pos.dropped_piece
    }

    /// The board piece flipped this turn, if any.
    #[must_use]
    pub fn flipped_piece(&self) -> Option<PieceId> {
        self.pos.flipped_piece
    }

    #[must_use]
    pub fn turns_since_capture(&self) -> u32 {
        self.pos.turns_since_capture
    }

    /// Smallest trade pool total `player` may propose next, 0 for no limit.
    #[must_use]
    pub fn min_trade_offer(&self, player: PlayerId) -> u32 {
        self.pos.min_trade_offer[player]
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        self.pos.result.as_ref()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.pos.result {
            Some(GameResult::Winner(p)) => Some(p),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.pos.state.is_game_over()
    }

    /// Every move executed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.pos.history
    }

    /// How many turn hand-overs so far produced the current digest,
    /// including the current one when a turn has just been handed over.
    #[must_use]
    pub fn repetition_count(&self) -> usize {
        let current = self.digest();
        self.pos.turn_digests.iter().filter(|&&d| d == current).count()
    }

    // === Arena access ===

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pos.pieces
    }

    #[must_use]
    pub fn stacks(&self) -> &[Stack] {
        &self.pos.stacks
    }

    /// Look up a piece. Panics on an id this board never issued; use
    /// `try_piece` for untrusted input.
    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pos.pieces[id.index()]
    }

    pub fn try_piece(&self, id: PieceId) -> Result<&Piece, EngineError> {
        self.pos.pieces.get(id.index()).ok_or(EngineError::UnknownPiece(id.0))
    }

    /// Look up a stack. Panics on an id this board never issued; use
    /// `try_stack` for untrusted input.
    #[must_use]
    pub fn stack(&self, id: StackId) -> &Stack {
        &self.pos.stacks[id.index()]
    }

    pub fn try_stack(&self, id: StackId) -> Result<&Stack, EngineError> {
        self.pos.stacks.get(id.index()).ok_or(EngineError::UnknownStack(id.0))
    }

    /// The stack holding `piece`.
    #[must_use]
    pub fn stack_of(&self, piece: PieceId) -> &Stack {
        self.stack(self.piece(piece).stack())
    }

    // === Layout ===

    #[must_use]
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let n = self.board_size() as u8;
        (0..n).flat_map(move |col| (0..n).map(move |row| Cell::new(col, row)))
    }

    #[must_use]
    pub fn on_board(&self, cell: Cell) -> bool {
        usize::from(cell.col) < self.board_size() && usize::from(cell.row) < self.board_size()
    }

    #[must_use]
    pub fn cell_stack_id(&self, cell: Cell) -> StackId {
        StackId((usize::from(cell.col) * self.board_size() + usize::from(cell.row)) as u16)
    }

    #[must_use]
    pub fn cell_stack(&self, cell: Cell) -> &Stack {
        self.stack(self.cell_stack_id(cell))
    }

    #[must_use]
    pub fn captive_stack_id(&self, player: PlayerId, kind: PieceKind) -> StackId {
        let base = pool_base(self.board_size(), player);
        StackId((base + 2 * kind.index()) as u16)
    }

    #[must_use]
    pub fn trade_stack_id(&self, player: PlayerId, kind: PieceKind) -> StackId {
        let base = pool_base(self.board_size(), player);
        StackId((base + 2 * kind.index() + 1) as u16)
    }

    #[must_use]
    pub fn rack_stack_id(&self, player: PlayerId, kind: PieceKind) -> StackId {
        rack_stack_id(self.board_size(), player, kind)
    }

    #[must_use]
    pub fn picked_stack_id(&self, slot: usize) -> StackId {
        let n = self.board_size();
        StackId((n * n + PLAYER_COUNT * POOL_STACKS_PER_PLAYER + slot) as u16)
    }

    /// Number of picked slots, which bounds the length of a chained move.
    #[must_use]
    pub fn picked_slots(&self) -> usize {
        picked_slots(self.board_size())
    }

    /// Board stacks in id order.
    pub fn board_stacks(&self) -> impl Iterator<Item = &Stack> {
        let n = self.board_size();
        self.pos.stacks[..n * n].iter()
    }

    pub fn rack_stacks(&self, player: PlayerId) -> impl Iterator<Item = &Stack> + '_ {
        PieceKind::ALL.into_iter().map(move |k| self.stack(self.rack_stack_id(player, k)))
    }

    pub fn captive_stacks(&self, player: PlayerId) -> impl Iterator<Item = &Stack> + '_ {
        PieceKind::ALL.into_iter().map(move |k| self.stack(self.captive_stack_id(player, k)))
    }

    pub fn trade_stacks(&self, player: PlayerId) -> impl Iterator<Item = &Stack> + '_ {
        PieceKind::ALL.into_iter().map(move |k| self.stack(self.trade_stack_id(player, k)))
    }

    pub fn picked_stacks(&self) -> impl Iterator<Item = &Stack> + '_ {
        (0..self.picked_slots()).map(move |s| self.stack(self.picked_stack_id(s)))
    }

    /// Enemy pieces held by `player`, in slot order.
    #[must_use]
    pub fn captive_pieces(&self, player: PlayerId) -> Vec<PieceId> {
        self.captive_stacks(player).flat_map(|s| s.pieces().iter().copied()).collect()
    }

    /// Enemy pieces `player` currently offers in trade.
    #[must_use]
    pub fn trade_pieces(&self, player: PlayerId) -> Vec<PieceId> {
        self.trade_stacks(player).flat_map(|s| s.pieces().iter().copied()).collect()
    }

    #[must_use]
    pub fn captive_count(&self, player: PlayerId) -> usize {
        self.captive_stacks(player).map(Stack::height).sum()
    }

    /// Point total of `player`'s trade pool.
    #[must_use]
    pub fn trade_value(&self, player: PlayerId) -> u32 {
        self.trade_stacks(player).map(|s| s.value(&self.pos.pieces)).sum()
    }

    /// Owner of the top piece on `cell`.
    #[must_use]
    pub fn top_owner(&self, cell: Cell) -> Option<PlayerId> {
        self.cell_stack(cell).top_owner(&self.pos.pieces)
    }

    // === Statistics ===

    #[must_use]
    pub fn stats(&self, player: PlayerId) -> PlayerStats {
        let table = &self.pos.pieces;
        let mut stats = PlayerStats {
            captives: self.captive_count(player),
            captive_points: self.captive_stacks(player).map(|s| s.value(table)).sum(),
            ..PlayerStats::default()
        };
        for stack in self.board_stacks() {
            stats.on_board += stack
                .pieces()
                .iter()
                .filter(|p| table[p.index()].owner() == player)
                .count();
            if stack.top_owner(table) == Some(player) {
                stats.controlled_height += stack.takeoff_height(table);
            }
        }
        stats.rack_points = self.rack_stacks(player).map(|s| s.value(table)).sum();
        let opponent = player.opponent();
        let lost: u32 = self
            .captive_stacks(opponent)
            .chain(self.trade_stacks(opponent))
            .map(|s| s.value(table))
            .sum();
        let total: u32 = table
            .iter()
            .filter(|p| p.owner() == player)
            .map(Piece::value)
            .sum();
        stats.points_in_play = total - lost;
        stats
    }

    /// A player has won: six captives, or six of their pieces in an
    /// unbroken run anywhere in one board stack.
    #[must_use]
    pub fn wins_now(&self, player: PlayerId) -> bool {
        if self.captive_count(player) >= 6 {
            return true;
        }
        let table = &self.pos.pieces;
        self.board_stacks()
            .filter(|s| s.height() >= 6)
            .any(|s| s.longest_run(player, table) >= 6)
    }

    // === Collaborator hooks ===

    /// Put the game into the draw state (for example after repeated
    /// positions). `Done` then ends the game without a winner. The change
    /// is pushed on the search undo stack, so `undo_move` takes it back.
    pub fn set_draw_state(&mut self) -> Result<(), EngineError> {
        let state = self.pos.state;
        let allowed = matches!(
            state,
            PlateauState::Play
                | PlateauState::Flipped
                | PlateauState::PlayDone
                | PlateauState::PlayCapture
                | PlateauState::PlayUndone
                | PlateauState::OnboardDone
        );
        if !allowed {
            return Err(EngineError::IllegalMove {
                mv: "draw".into(),
                state,
            });
        }
        self.undo_stack.push(self.pos.clone());
        self.pos.state = PlateauState::Draw;
        Ok(())
    }

    // === Position editing ===

    /// Move `piece` onto the top of `cell` with the given orientation, for
    /// building analysis positions. Only allowed with nothing in hand.
    /// The edited position becomes the base for search: the undo stack is
    /// cleared.
    pub fn setup_place(&mut self, piece: PieceId, cell: Cell, flipped: bool) -> Result<(), EngineError> {
        self.try_piece(piece)?;
        if !self.on_board(cell) {
            return Err(EngineError::Setup(format!("{cell} is off the board")));
        }
        if !self.pos.frames.is_empty() {
            return Err(EngineError::Setup("a move is in flight".into()));
        }
        let from = self.piece(piece).stack();
        if self.stack(from).origin_kind() == OriginKind::Picked {
            return Err(EngineError::Setup(format!("piece {piece} is in hand")));
        }
        let to = self.cell_stack_id(cell);
        self.undo_stack.clear();
        self.move_single(piece, to, Level::Top);
        let p = self.piece_mut(piece);
        p.set_flipped(flipped);
        p.reveal_top();
        Ok(())
    }

    /// Set the player to move and the state, for building analysis positions.
    /// Clears the undo stack like `setup_place`.
    pub fn setup_turn(&mut self, player: PlayerId, state: PlateauState) -> Result<(), EngineError> {
        if !self.pos.frames.is_empty() {
            return Err(EngineError::Setup("a move is in flight".into()));
        }
        match state {
            PlateauState::Onboard2 | PlateauState::Play => {}
            other => return Err(EngineError::Setup(format!("cannot start in {other:?}"))),
        }
        self.undo_stack.clear();
        self.pos.whose_turn = player;
        self.pos.state = state;
        self.pos.move_number = self.pos.move_number.max(2);
        Ok(())
    }

    // === Consistency ===

    /// Verify that the board is a partition of all pieces and that every
    /// stack's origin and owner agree with the pieces it holds.
    pub fn check_invariants(&self) -> Result<(), EngineError> {
        let table = &self.pos.pieces;
        let mut holder: Vec<Option<StackId>> = vec![None; table.len()];

        for (i, piece) in table.iter().enumerate() {
            if piece.id().index() != i {
                return Err(EngineError::Inconsistent(format!("piece {i} carries id {}", piece.id())));
            }
        }

        for (i, stack) in self.pos.stacks.iter().enumerate() {
            if stack.id().index() != i {
                return Err(EngineError::Inconsistent(format!("stack {i} carries id {}", stack.id())));
            }
            for &p in stack.pieces() {
                let Some(piece) = table.get(p.index()) else {
                    return Err(EngineError::Inconsistent(format!("stack {i} holds unknown piece {p}")));
                };
                if let Some(other) = holder[p.index()].replace(stack.id()) {
                    return Err(EngineError::Inconsistent(format!(
                        "piece {p} is in stacks {other} and {i}"
                    )));
                }
                if piece.stack() != stack.id() {
                    return Err(EngineError::Inconsistent(format!(
                        "piece {p} points at stack {} but sits in {i}",
                        piece.stack()
                    )));
                }
                let placed_ok = match stack.origin_kind() {
                    OriginKind::Board | OriginKind::Picked => true,
                    OriginKind::Rack => stack.owner() == Some(piece.owner()),
                    OriginKind::Captive | OriginKind::Trade => {
                        stack.owner().is_some_and(|o| o != piece.owner())
                    }
                };
                if !placed_ok {
                    return Err(EngineError::Inconsistent(format!(
                        "piece {p} of {} cannot sit in {:?} stack {i}",
                        piece.owner(),
                        stack.origin()
                    )));
                }
            }
            if let Origin::Picked(slot) = stack.origin() {
                let referenced = self
                    .pos
                    .frames
                    .get(usize::from(slot))
                    .is_some_and(|f| f.moving == Some(stack.id()));
                if !stack.is_empty() && !referenced {
                    return Err(EngineError::Inconsistent(format!("picked slot {slot} holds stray pieces")));
                }
            }
        }

        if let Some(missing) = holder.iter().position(Option::is_none) {
            return Err(EngineError::Inconsistent(format!("piece {missing} is in no stack")));
        }

        for (i, frame) in self.pos.frames.iter().enumerate() {
            if let Some(moving) = frame.moving {
                if moving != self.picked_stack_id(i) {
                    return Err(EngineError::Inconsistent(format!("frame {i} holds the wrong picked slot")));
                }
            }
        }
        Ok(())
    }

    // === Low-level mutation ===

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pos.pieces[id.index()]
    }

    pub(crate) fn stack_mut(&mut self, id: StackId) -> &mut Stack {
        &mut self.pos.stacks[id.index()]
    }

    /// Move the piece at `index` of `from`, and everything above it, into
    /// `to` at `level`. Returns the moved pieces, bottom first.
    pub(crate) fn move_run(&mut self, from: StackId, index: usize, to: StackId, level: Level) -> PieceList {
        let moved = self.stack_mut(from).split_off(index);
        self.stack_mut(to).insert_at(level, &moved);
        for &p in &moved {
            self.piece_mut(p).set_stack(to);
        }
        moved
    }

    /// Move a single piece out of whatever stack holds it.
    pub(crate) fn move_single(&mut self, piece: PieceId, to: StackId, level: Level) {
        let from = self.piece(piece).stack();
        if let Some(index) = self.stack(from).index_of(piece) {
            self.stack_mut(from).remove_at(index);
        }
        self.stack_mut(to).insert_at(level, &[piece]);
        self.piece_mut(piece).set_stack(to);
    }

    /// Pass the turn to the other player, who starts in `next`.
    pub(crate) fn advance_player(&mut self, next: PlateauState) {
        self.pos.whose_turn = self.pos.whose_turn.opponent();
        self.pos.move_number += 1;
        self.pos.frames.clear();
        self.pos.dropped_piece = None;
        self.pos.state = next;
        let digest = self.digest();
        self.pos.turn_digests.push_back(digest);
    }
}

fn picked_slots(board_size: usize) -> usize {
    2 * board_size
}

fn pool_base(board_size: usize, player: PlayerId) -> usize {
    board_size * board_size + player.index() * POOL_STACKS_PER_PLAYER
}

fn rack_stack_id(board_size: usize, player: PlayerId, kind: PieceKind) -> StackId {
    StackId((pool_base(board_size, player) + 2 * PieceKind::COUNT + kind.index()) as u16)
}

impl PartialEq for Board {
    /// Boards are equal when their configuration and current position match;
    /// the undo stack is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config && self.pos == other.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(PlateauConfig::default()).unwrap()
    }

    #[test]
    fn test_new_board_layout() {
        let b = board();
        assert_eq!(b.pieces().len(), 24);
        assert_eq!(b.stacks().len(), 16 + 42 + 8);
        assert_eq!(b.state(), PlateauState::Onboard2);
        assert_eq!(b.whose_turn(), PlayerId::new(0));
        assert!(b.check_invariants().is_ok());
    }

    #[test]
    fn test_stack_numbering() {
        let b = board();
        assert_eq!(b.cell_stack_id(Cell::new(0, 0)), StackId(0));
        assert_eq!(b.cell_stack_id(Cell::new(1, 0)), StackId(4));
        assert_eq!(b.captive_stack_id(PlayerId::new(0), PieceKind::Mute), StackId(16));
        assert_eq!(b.trade_stack_id(PlayerId::new(0), PieceKind::Mute), StackId(17));
        assert_eq!(b.rack_stack_id(PlayerId::new(0), PieceKind::Mute), StackId(30));
        assert_eq!(b.captive_stack_id(PlayerId::new(1), PieceKind::Mute), StackId(37));
        assert_eq!(b.picked_stack_id(0), StackId(58));

        for stack in b.stacks() {
            if let Some(cell) = stack.cell() {
                assert_eq!(b.cell_stack_id(cell), stack.id());
            }
        }
    }

    #[test]
    fn test_racks_hold_own_pieces() {
        let b = board();
        for player in PlayerId::all() {
            let count: usize = b.rack_stacks(player).map(Stack::height).sum();
            assert_eq!(count, 12);
            for stack in b.rack_stacks(player) {
                for &p in stack.pieces() {
                    assert_eq!(b.piece(p).owner(), player);
                    assert_eq!(Some(b.piece(p).kind()), stack.slot_kind());
                }
            }
        }
    }

    #[test]
    fn test_hidden_information_setup() {
        let b = board();
        let p = b.rack_stacks(PlayerId::new(1)).next().unwrap().pieces()[0];
        assert!(!b.piece(p).knows_top(PlayerId::new(0)));

        let open = Board::new(PlateauConfig::default().with_open_information()).unwrap();
        assert!(open.piece(p).knows_fully(PlayerId::new(0)));
    }

    #[test]
    fn test_invariant_detects_back_reference_mismatch() {
        let mut b = board();
        let p = PieceId(0);
        b.piece_mut(p).set_stack(StackId(3));
        assert!(matches!(b.check_invariants(), Err(EngineError::Inconsistent(_))));
    }

    #[test]
    fn test_setup_place_and_stats() {
        let mut b = board();
        b.setup_place(PieceId(0), Cell::new(1, 1), false).unwrap();
        b.setup_place(PieceId(1), Cell::new(1, 1), false).unwrap();
        assert!(b.check_invariants().is_ok());

        let stats = b.stats(PlayerId::new(0));
        assert_eq!(stats.on_board, 2);
        assert_eq!(stats.controlled_height, 2);
        assert_eq!(stats.captives, 0);
        assert_eq!(stats.points_in_play, 1 + 1 + 1 + 1 + 2 + 2 + 2 + 2 + 3 + 3 + 4 + 5);
        assert!(b.setup_place(PieceId(0), Cell::new(7, 7), false).is_err());
    }

    #[test]
    fn test_six_stack_wins() {
        let mut b = board();
        for i in 0..5 {
            b.setup_place(PieceId(i), Cell::new(2, 2), false).unwrap();
        }
        assert!(!b.wins_now(PlayerId::new(0)));
        b.setup_place(PieceId(5), Cell::new(2, 2), false).unwrap();
        assert!(b.wins_now(PlayerId::new(0)));
        assert!(!b.wins_now(PlayerId::new(1)));
    }

    #[test]
    fn test_buried_six_run_still_wins() {
        let mut b = board();
        for i in 0..6 {
            b.setup_place(PieceId(i), Cell::new(1, 3), false).unwrap();
        }
        b.setup_place(PieceId(12), Cell::new(1, 3), false).unwrap();
        assert!(b.wins_now(PlayerId::new(0)));
        assert!(!b.wins_now(PlayerId::new(1)));
    }

    #[test]
    fn test_broken_run_does_not_win() {
        let mut b = board();
        for i in 0..3 {
            b.setup_place(PieceId(i), Cell::new(0, 0), false).unwrap();
        }
        b.setup_place(PieceId(12), Cell::new(0, 0), false).unwrap();
        for i in 3..6 {
            b.setup_place(PieceId(i), Cell::new(0, 0), false).unwrap();
        }
        assert_eq!(b.stack(b.cell_stack_id(Cell::new(0, 0))).height(), 7);
        assert!(!b.wins_now(PlayerId::new(0)));
    }

    #[test]
    fn test_set_draw_state_only_at_turn_points() {
        let mut b = board();
        assert!(b.set_draw_state().is_err());
        b.setup_turn(PlayerId::new(0), PlateauState::Play).unwrap();
        b.set_draw_state().unwrap();
        assert_eq!(b.state(), PlateauState::Draw);
    }
}
