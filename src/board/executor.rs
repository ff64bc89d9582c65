//! Move executor.
//!
//! Every move is validated by the legality oracle first. The position is
//! saved before any mutation and restored if execution fails part way, so
//! an error never leaves a half-applied move behind.

use tracing::{debug, trace};

use super::board::{Board, Position};
use super::frames::MoveFrame;
use super::state::PlateauState;
use crate::core::{Cell, EngineError, PieceId, PlayerId, StackId};
use crate::moves::{FaceString, Move, MoveRecord};
use crate::pieces::{Face, PieceKind};
use crate::rules::capture::captured_positions;
use crate::rules::exchange::exchange_is_legal;
use crate::rules::GameResult;
use crate::stacks::{Level, OriginKind, PieceList};

impl Board {
    /// Validate and apply `mv`, recording it in the history.
    pub fn execute(&mut self, mv: &Move) -> Result<(), EngineError> {
        self.execute_saving(mv).map(|_| ())
    }

    /// Execute `mv` and hand back the position it was played from.
    pub(crate) fn execute_saving(&mut self, mv: &Move) -> Result<Position, EngineError> {
        self.check_legal(mv)?;
        let saved = self.pos.clone();
        let player = self.whose_turn();
        let state = self.state();
        let move_number = self.move_number();

        if let Err(e) = self.apply(mv) {
            self.pos = saved;
            return Err(e);
        }

        self.pos
            .history
            .push_back(MoveRecord::new(player, mv.clone(), state, move_number));
        trace!(mv = %mv, state = ?self.state(), player = %player, "executed");
        Ok(saved)
    }

    fn apply(&mut self, mv: &Move) -> Result<(), EngineError> {
        match mv {
            Move::Pick { piece, .. } => self.do_pick(*piece),
            Move::Drop { stack, level, .. } => self.do_drop(*stack, *level),
            Move::Flip { piece, .. } => self.do_flip(*piece),
            Move::Onboard {
                cell,
                level,
                colors,
                pieces,
            } => self.do_onboard(*cell, *level, colors, pieces),
            Move::Exchange { pieces } => {
                self.do_exchange(pieces);
                Ok(())
            }
            Move::Done => self.do_done(),
            Move::Resign => {
                if self.pos.state == PlateauState::Resign {
                    self.pos.state = self.pos.unresign.take().unwrap_or(PlateauState::Play);
                } else {
                    self.pos.unresign = Some(self.pos.state);
                    self.pos.state = PlateauState::Resign;
                }
                Ok(())
            }
            Move::Start(player) => {
                self.pos.whose_turn = *player;
                self.pos.state = if self.pos.move_number < 2 {
                    PlateauState::Onboard2
                } else {
                    PlateauState::Play
                };
                Ok(())
            }
            Move::Pass => {
                self.pos.flipped_piece = None;
                self.pos.turns_since_capture += 1;
                self.advance_player(PlateauState::Play);
                Ok(())
            }
        }
    }

    // === Pick ===

    fn do_pick(&mut self, piece: PieceId) -> Result<(), EngineError> {
        let state = self.pos.state;
        let from = self.piece(piece).stack();
        let index = self
            .stack(from)
            .index_of(piece)
            .ok_or_else(|| EngineError::Inconsistent(format!("piece {piece} missing from stack {from}")))?;
        let slot0 = self.picked_stack_id(0);

        match state {
            PlateauState::PlayDone | PlateauState::PlayCapture | PlateauState::PlayUndone | PlateauState::Draw => {
                if self.pos.dropped_piece == Some(piece) && self.pos.frames.len() > 1 {
                    self.pos.frames.pop();
                }
                let step = self.pos.frames.len() - 1;
                let slot = self.picked_stack_id(step);
                self.move_run(from, index, slot, Level::Top);
                self.pos.frames[step].moving = Some(slot);
            }
            PlateauState::OnboardDone => {
                let snapshot = PieceList::from(self.stack(from).pieces());
                self.move_single(piece, slot0, Level::Top);
                let frame = self.first_frame_mut()?;
                frame.snapshot = snapshot;
                frame.moving = Some(slot0);
            }
            PlateauState::Onboard2Done => {
                self.move_run(from, index, slot0, Level::Top);
                self.first_frame_mut()?.moving = Some(slot0);
            }
            _ => {
                let snapshot = PieceList::from(self.stack(from).pieces());
                self.pos.frames.clear();
                let mut frame = MoveFrame::new(from, snapshot);
                frame.moving = Some(slot0);
                self.pos.frames.push(frame);
                self.move_run(from, index, slot0, Level::Top);
            }
        }

        self.state_after_pick(state, from)
    }

    fn state_after_pick(&mut self, state: PlateauState, from: StackId) -> Result<(), EngineError> {
        use PlateauState as S;

        let origin = self.move_origin().ok_or_else(|| EngineError::Inconsistent("pick left no frame".into()))?;
        let moving = self.moving_stack().map(|s| (s.height(), s.top())).unwrap_or((0, None));
        let (height, moving_top) = moving;

        let next = match (origin, state) {
            (OriginKind::Rack, S::Play) => {
                if height == 1 {
                    S::OnboardDrop
                } else {
                    S::RackDrop
                }
            }
            (OriginKind::Rack, S::Onboard2 | S::Onboard2Done) => {
                if height == 2 {
                    S::Onboard2Drop
                } else {
                    S::Rack2Drop
                }
            }
            (OriginKind::Rack, S::OnboardDone) => S::OnboardDrop,
            (OriginKind::Board, S::Play | S::Flipped) => {
                if let Some(top) = moving_top {
                    self.piece_mut(top).reveal_top();
                }
                self.reveal_stack_top(from);
                S::PlayDrop
            }
            (OriginKind::Board, S::PlayDone | S::PlayCapture | S::PlayUndone | S::Draw) => {
                self.reveal_stack_top(from);
                S::PlayDrop
            }
            (OriginKind::Captive, S::Play | S::CaptiveShuffle) => S::CaptiveShuffle,
            (OriginKind::Captive | OriginKind::Trade, S::ExchangeDone) => S::Exchange,
            (OriginKind::Captive | OriginKind::Trade, S::Exchange | S::CaptiveShuffle) => state,
            (origin, state) => {
                return Err(EngineError::Inconsistent(format!(
                    "pick from {origin:?} origin in {state:?}"
                )))
            }
        };
        self.pos.state = next;
        Ok(())
    }

    // === Drop ===

    fn do_drop(&mut self, target: Option<StackId>, level: Level) -> Result<(), EngineError> {
        let state = self.pos.state;
        let start = self.first_frame_mut()?.origin;
        let cancel = target.is_none();
        let target = target.unwrap_or(start);
        let origin = self.stack(start).origin_kind();
        let target_kind = self.stack(target).origin_kind();

        if origin == OriginKind::Board && target_kind == OriginKind::Board {
            if let Some(i) = self.pos.frames.iter().position(|f| f.origin == target) {
                if self.unwind_to(i, cancel) {
                    return Ok(());
                }
            }
        }

        let step = self.pos.frames.len() - 1;
        let moving = self.pos.frames[step]
            .moving
            .take()
            .ok_or_else(|| EngineError::Inconsistent("drop with nothing in hand".into()))?;

        if origin == OriginKind::Board && target_kind == OriginKind::Board && target != start {
            if self.pos.frames.len() >= self.picked_slots() {
                return Err(EngineError::Inconsistent("move chain is longer than the picked slots".into()));
            }
            let snapshot = PieceList::from(self.stack(target).pieces());
            self.pos.frames.push(MoveFrame::new(target, snapshot));
        }

        // A flipped top travelling with the stack exposes what it covered.
        let in_hand = self.stack(moving).pieces().to_vec();
        if in_hand.len() >= 2 && in_hand.last().copied() == self.pos.flipped_piece {
            self.piece_mut(in_hand[in_hand.len() - 2]).reveal_top();
        }

        match target_kind {
            OriginKind::Board | OriginKind::Picked => {
                let height = self.stack(target).height();
                let at = level.index_in(height);
                if at > 0 && at < height {
                    let under = self.stack(target).pieces()[at - 1];
                    self.piece_mut(under).reveal_top();
                }
                let moved = self.move_run(moving, 0, target, level);
                self.pos.dropped_piece = moved.first().copied();
                if origin == OriginKind::Rack {
                    if let Some(&top) = moved.last() {
                        self.piece_mut(top).reveal_top();
                    }
                }
            }
            OriginKind::Rack => {
                for &p in &in_hand {
                    let piece = self.piece(p);
                    let home = self.rack_stack_id(piece.owner(), piece.kind());
                    self.move_single(p, home, Level::Top);
                }
                self.pos.dropped_piece = in_hand.first().copied();
            }
            OriginKind::Captive | OriginKind::Trade => {
                let owner = self
                    .stack(target)
                    .owner()
                    .ok_or_else(|| EngineError::Inconsistent(format!("pool stack {target} has no owner")))?;
                for &p in &in_hand {
                    let slot = self.pool_slot(target_kind, owner, self.piece(p).kind());
                    self.move_single(p, slot, Level::Top);
                }
                self.pos.dropped_piece = in_hand.first().copied();
            }
        }

        if target_kind != OriginKind::Board {
            self.pos.frames.clear();
        }

        self.state_after_drop(state, target, target_kind)
    }

    /// Carry every hop after frame `i` back, in reverse, onto the stacks
    /// they started from. Returns true when the whole move was taken back.
    ///
    /// A real drop (not a cancel) that puts the stack back onto a stomped
    /// origin is a capture in place: the origin frame stays as the landing
    /// and the turn waits in `PlayCapture`.
    fn unwind_to(&mut self, i: usize, cancel: bool) -> bool {
        loop {
            let step = self.pos.frames.len() - 1;
            let home = self.pos.frames[step].origin;
            if let Some(moving) = self.pos.frames[step].moving.take() {
                let moved = self.move_run(moving, 0, home, Level::Top);
                if let Some(&bottom) = moved.first() {
                    self.pos.dropped_piece = Some(bottom);
                }
            }

            if step == 0 {
                if !cancel && self.stack(home).is_stomped(self.pieces()) {
                    self.pos.state = PlateauState::PlayCapture;
                    return true;
                }
                self.pos.frames.clear();
                if cancel {
                    if let Some(flipped) = self.pos.flipped_piece.take() {
                        self.piece_mut(flipped).flip();
                    }
                }
                self.pos.dropped_piece = self.pos.flipped_piece;
                self.pos.state = if self.pos.flipped_piece.is_some() {
                    PlateauState::Flipped
                } else {
                    PlateauState::Play
                };
                return true;
            }

            let keep = self.pos.frames[step].snapshot.len();
            let slot = self.picked_stack_id(step - 1);
            self.move_run(home, keep, slot, Level::Top);
            self.pos.frames[step - 1].moving = Some(slot);
            self.pos.frames.pop();
            if step == i {
                return false;
            }
        }
    }

    fn state_after_drop(&mut self, state: PlateauState, target: StackId, target_kind: OriginKind) -> Result<(), EngineError> {
        use PlateauState as S;

        let next = match (target_kind, state) {
            (OriginKind::Board, S::Onboard2 | S::Onboard2Drop) => S::Onboard2Done,
            (OriginKind::Board, S::Play | S::OnboardDrop) => S::OnboardDone,
            (OriginKind::Board, S::PlayDrop) => self.state_after_hop(target),
            (OriginKind::Rack, S::Onboard2Drop | S::Rack2Drop) => S::Onboard2,
            (OriginKind::Rack, S::OnboardDrop | S::RackDrop) => S::Play,
            (OriginKind::Captive | OriginKind::Trade, S::Exchange | S::ExchangeDone) => {
                if exchange_is_legal(self) {
                    S::ExchangeDone
                } else {
                    S::Exchange
                }
            }
            (OriginKind::Captive, S::CaptiveShuffle) if self.trade_value(self.whose_turn()) == 0 => S::Play,
            (OriginKind::Captive | OriginKind::Trade, S::CaptiveShuffle) => S::CaptiveShuffle,
            (kind, state) => {
                return Err(EngineError::Inconsistent(format!("drop on {kind:?} stack in {state:?}")));
            }
        };
        self.pos.state = next;
        Ok(())
    }

    /// State after a board stack lands on `target`.
    fn state_after_hop(&self, target: StackId) -> PlateauState {
        let table = self.pieces();
        let landing = self.stack(target);
        let mut next = if landing.is_stomped(table) {
            PlateauState::PlayCapture
        } else {
            PlateauState::PlayDone
        };

        let (Some(first), Some(last)) = (self.pos.frames.first(), self.pos.frames.last()) else {
            return next;
        };
        let new_face = landing.top().map(|p| table[p.index()].real_top());
        let old_owner = last.snapshot.last().map(|p| table[p.index()].owner());

        if old_owner == Some(self.whose_turn().opponent()) && new_face == Some(Face::Blank) {
            // a mute cannot rest on an enemy stack
            next = PlateauState::PlayUndone;
        } else if new_face == Some(Face::Orange) {
            let start = self.stack(first.origin).cell();
            let here = landing.cell();
            if let (Some(start), Some(here)) = (start, here) {
                let (dx, dy) = here.offset_from(start);
                if dx.abs() + dy.abs() != 3 {
                    next = PlateauState::PlayUndone;
                }
            }
        }
        next
    }

    // === Flip ===

    fn do_flip(&mut self, piece: PieceId) -> Result<(), EngineError> {
        let kind = self.stack_of(piece).origin_kind();
        self.piece_mut(piece).flip();
        if kind == OriginKind::Board {
            self.piece_mut(piece).reveal_top();
            self.pos.dropped_piece = Some(piece);
            match self.pos.state {
                PlateauState::Play => {
                    self.pos.state = PlateauState::Flipped;
                    self.pos.flipped_piece = Some(piece);
                }
                PlateauState::Flipped => {
                    self.pos.state = PlateauState::Play;
                    self.pos.flipped_piece = None;
                }
                state => return Err(EngineError::Inconsistent(format!("board flip in {state:?}"))),
            }
        }
        Ok(())
    }

    // === Composite moves ===

    fn do_onboard(&mut self, cell: Cell, level: Level, colors: &FaceString, pieces: &[PieceId]) -> Result<(), EngineError> {
        if self.has_stack_in_hand() {
            self.do_drop(None, Level::Top)?;
        }
        let initial = self.pos.state == PlateauState::Onboard2;

        for (faces, &p) in colors.chunks(2).zip(pieces.iter().rev()) {
            let kind = self.piece(p).kind();
            let flipped = kind
                .orientation_for(Some(faces[0]), Some(faces[1]))
                .ok_or_else(|| EngineError::Inconsistent(format!("{kind:?} cannot show {}{}", faces[0], faces[1])))?;
            self.piece_mut(p).set_flipped(flipped);
        }

        let (Some(&bottom), Some(&top)) = (pieces.first(), pieces.last()) else {
            return Err(EngineError::Inconsistent("onboard without pieces".into()));
        };
        let rack = self.piece(top).stack();
        let snapshot = PieceList::from(self.stack(rack).pieces());
        self.pos.frames.clear();
        self.pos.frames.push(MoveFrame::new(rack, snapshot));

        let dest = self.cell_stack_id(cell);
        let height = self.stack(dest).height();
        let at = level.index_in(height);
        if at > 0 && at < height {
            let under = self.stack(dest).pieces()[at - 1];
            self.piece_mut(under).reveal_top();
        }
        for (offset, &p) in pieces.iter().enumerate() {
            self.move_single(p, dest, Level::At(at + offset));
        }
        self.piece_mut(top).reveal_top();
        self.pos.dropped_piece = Some(bottom);
        self.pos.state = if initial {
            PlateauState::Onboard2Done
        } else {
            PlateauState::OnboardDone
        };
        Ok(())
    }

    fn do_exchange(&mut self, pieces: &[PieceId]) {
        let mover = self.whose_turn();
        for &p in pieces {
            let slot = self.trade_stack_id(mover, self.piece(p).kind());
            self.move_single(p, slot, Level::Top);
        }
        self.pos.state = match self.pos.state {
            PlateauState::Play => PlateauState::CaptiveShuffle,
            PlateauState::Exchange | PlateauState::ExchangeDone => {
                if exchange_is_legal(self) {
                    PlateauState::ExchangeDone
                } else {
                    PlateauState::Exchange
                }
            }
            other => other,
        };
        debug!(player = %mover, offered = pieces.len(), total = self.trade_value(mover), "trade offer");
    }

    // === Done ===

    fn do_done(&mut self) -> Result<(), EngineError> {
        let mover = self.whose_turn();
        match self.pos.state {
            PlateauState::Resign => self.end_game(GameResult::Winner(mover.opponent())),
            PlateauState::ExchangeDone => {
                let proposer = mover.opponent();
                if self.trade_value(mover) == 0 {
                    let ask = self.trade_value(proposer);
                    self.pos.min_trade_offer[proposer] = ask + 1;
                    debug!(player = %mover, ask, "exchange refused");
                    self.advance_player(PlateauState::CaptiveShuffle);
                } else {
                    self.resort();
                    self.pos.frames.clear();
                    self.pos.state = PlateauState::Play;
                    debug!(player = %mover, "exchange completed");
                }
            }
            PlateauState::CaptiveShuffle => {
                self.advance_player(PlateauState::Exchange);
                if exchange_is_legal(self) {
                    self.pos.state = PlateauState::ExchangeDone;
                }
            }
            PlateauState::Onboard2Done => {
                let next = if mover == PlayerId::new(0) {
                    PlateauState::Onboard2
                } else {
                    PlateauState::Play
                };
                self.advance_player(next);
            }
            PlateauState::Draw => self.end_game(GameResult::Draw),
            PlateauState::PlayDone => self.finish_board_turn(false),
            PlateauState::PlayCapture => {
                let landing = self
                    .pos
                    .frames
                    .last()
                    .map(|f| f.origin)
                    .ok_or_else(|| EngineError::Inconsistent("capture without a landing".into()))?;
                let captured = self.resolve_captures(landing);
                self.finish_board_turn(captured > 0);
            }
            PlateauState::OnboardDone => self.finish_board_turn(false),
            state => return Err(EngineError::Inconsistent(format!("done in {state:?}"))),
        }
        Ok(())
    }

    /// Take the defenders stomped in `landing` into the top owner's
    /// captive pool. Returns how many were taken.
    fn resolve_captures(&mut self, landing: StackId) -> usize {
        let table = self.pieces();
        let stack = self.stack(landing);
        let owners: Vec<PlayerId> = stack.pieces().iter().map(|p| table[p.index()].owner()).collect();
        let (Some(&captor), Some(top)) = (owners.last(), stack.top()) else {
            return 0;
        };
        let victims = captured_positions(&owners, table[top.index()].real_top());
        let ids: Vec<PieceId> = victims.iter().map(|&i| stack.pieces()[i]).collect();

        for (&i, &victim) in victims.iter().zip(&ids).rev() {
            if i > 0 {
                let under = self.stack(landing).pieces()[i - 1];
                self.piece_mut(under).reveal_top();
            }
            let pool = self.captive_stack_id(captor, self.piece(victim).kind());
            self.move_single(victim, pool, Level::Top);
            let piece = self.piece_mut(victim);
            piece.reveal_all();
            piece.flip_up();
        }

        if !ids.is_empty() {
            debug!(
                player = %captor,
                cell = ?self.stack(landing).cell(),
                captured = ids.len(),
                "capture"
            );
        }
        ids.len()
    }

    /// Close a board turn: update the capture clock, then either end the
    /// game or hand the turn over.
    fn finish_board_turn(&mut self, captured: bool) {
        self.pos.flipped_piece = None;
        if captured {
            self.pos.turns_since_capture = 0;
            self.pos.min_trade_offer = crate::core::PlayerMap::with_value(0);
        } else {
            self.pos.turns_since_capture += 1;
        }

        let mover = self.whose_turn();
        if self.wins_now(mover) {
            self.end_game(GameResult::Winner(mover));
        } else if self.wins_now(mover.opponent()) {
            self.end_game(GameResult::Winner(mover.opponent()));
        } else {
            self.advance_player(PlateauState::Play);
        }
    }

    fn end_game(&mut self, result: GameResult) {
        debug!(result = ?result, move_number = self.move_number(), "game over");
        self.pos.frames.clear();
        self.pos.result = Some(result);
        self.pos.state = PlateauState::GameOver;
    }

    /// Send every traded piece home to its owner's rack, face up.
    fn resort(&mut self) {
        let hidden = self.config().hidden_information;
        for player in PlayerId::all() {
            for kind in PieceKind::ALL {
                let pool = self.trade_stack_id(player, kind);
                let traded = self.stack(pool).pieces().to_vec();
                for p in traded {
                    let home = self.rack_stack_id(self.piece(p).owner(), kind);
                    self.move_single(p, home, Level::Top);
                    let piece = self.piece_mut(p);
                    piece.flip_up();
                    if hidden {
                        piece.anonymize();
                    }
                }
            }
        }
    }

    fn pool_slot(&self, category: OriginKind, owner: PlayerId, kind: PieceKind) -> StackId {
        if category == OriginKind::Trade {
            self.trade_stack_id(owner, kind)
        } else {
            self.captive_stack_id(owner, kind)
        }
    }

    fn reveal_stack_top(&mut self, stack: StackId) {
        if let Some(top) = self.stack(stack).top() {
            self.piece_mut(top).reveal_top();
        }
    }

    fn first_frame_mut(&mut self) -> Result<&mut MoveFrame, EngineError> {
        self.pos
            .frames
            .first_mut()
            .ok_or_else(|| EngineError::Inconsistent("no move in flight".into()))
    }
}
