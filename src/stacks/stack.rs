//! Stacks: ordered piece containers.
//!
//! Every location a piece can occupy is a `Stack`: board cells, the per-kind
//! rack, captive and trade slots of each player, and the transient picked
//! slots that hold a moving sub-stack while a move is in flight. Pieces are
//! listed bottom to top.
//!
//! Queries that depend on piece owners take the board's piece table as a
//! slice, since the stack itself only stores indices.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Cell, PieceId, PlayerId, StackId};
use crate::pieces::{Piece, PieceKind};

/// Inline capacity covers all but very tall towers.
pub type PieceList = SmallVec<[PieceId; 8]>;

/// Where a stack lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Origin {
    Board(Cell),
    Rack,
    Captive,
    Trade,
    /// Transient holding slot for the moving stack of one move step.
    Picked(u8),
}

impl Origin {
    #[must_use]
    pub fn kind(self) -> OriginKind {
        match self {
            Origin::Board(_) => OriginKind::Board,
            Origin::Rack => OriginKind::Rack,
            Origin::Captive => OriginKind::Captive,
            Origin::Trade => OriginKind::Trade,
            Origin::Picked(_) => OriginKind::Picked,
        }
    }

    #[must_use]
    pub fn cell(self) -> Option<Cell> {
        match self {
            Origin::Board(cell) => Some(cell),
            _ => None,
        }
    }
}

/// Origin category without the payload, for matching against states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OriginKind {
    Board,
    Rack,
    Captive,
    Trade,
    Picked,
}

/// Insertion depth for a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// On top of whatever is there.
    Top,
    /// Insert so the first dropped piece lands at this index.
    At(usize),
}

impl Level {
    /// Resolve against a stack of `height`: the insertion index.
    #[must_use]
    pub fn index_in(self, height: usize) -> usize {
        match self {
            Level::Top => height,
            Level::At(i) => i.min(height),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack {
    id: StackId,
    origin: Origin,
    /// Owner of a rack/captive/trade slot.
    owner: Option<PlayerId>,
    /// Kind a rack/captive/trade slot is sorted by.
    slot_kind: Option<PieceKind>,
    pieces: PieceList,
}

impl Stack {
    /// A stack on a board cell.
    #[must_use]
    pub fn board(id: StackId, cell: Cell) -> Self {
        Self {
            id,
            origin: Origin::Board(cell),
            owner: None,
            slot_kind: None,
            pieces: PieceList::new(),
        }
    }

    /// A per-kind slot of a player's rack, captive pool or trade pool.
    #[must_use]
    pub fn pool(id: StackId, origin: Origin, owner: PlayerId, kind: PieceKind) -> Self {
        Self {
            id,
            origin,
            owner: Some(owner),
            slot_kind: Some(kind),
            pieces: PieceList::new(),
        }
    }

    /// A transient picked slot.
    #[must_use]
    pub fn picked(id: StackId, slot: u8) -> Self {
        Self {
            id,
            origin: Origin::Picked(slot),
            owner: None,
            slot_kind: None,
            pieces: PieceList::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> StackId {
        self.id
    }

    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin
    }

    #[must_use]
    pub fn origin_kind(&self) -> OriginKind {
        self.origin.kind()
    }

    #[must_use]
    pub fn cell(&self) -> Option<Cell> {
        self.origin.cell()
    }

    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    #[must_use]
    pub fn slot_kind(&self) -> Option<PieceKind> {
        self.slot_kind
    }

    /// Pieces bottom to top.
    #[must_use]
    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<PieceId> {
        self.pieces.last().copied()
    }

    #[must_use]
    pub fn bottom(&self) -> Option<PieceId> {
        self.pieces.first().copied()
    }

    #[must_use]
    pub fn contains(&self, piece: PieceId) -> bool {
        self.pieces.contains(&piece)
    }

    #[must_use]
    pub fn index_of(&self, piece: PieceId) -> Option<usize> {
        self.pieces.iter().position(|&p| p == piece)
    }

    /// Owner of the top piece.
    #[must_use]
    pub fn top_owner(&self, table: &[Piece]) -> Option<PlayerId> {
        self.top().map(|p| table[p.index()].owner())
    }

    /// Length of the run of top-owner pieces counted from the top.
    #[must_use]
    pub fn takeoff_height(&self, table: &[Piece]) -> usize {
        run_from_top(&self.pieces, table)
    }

    /// The bottom piece is obstructed: some piece above it belongs to the
    /// other player. The bottom owner's own pieces never obstruct it.
    #[must_use]
    pub fn is_stomped(&self, table: &[Piece]) -> bool {
        let Some((bottom, rest)) = self.pieces.split_first() else {
            return false;
        };
        let owner = table[bottom.index()].owner();
        rest.iter().any(|p| table[p.index()].owner() != owner)
    }

    /// Longest run of `player`'s pieces anywhere in the stack.
    #[must_use]
    pub fn longest_run(&self, player: PlayerId, table: &[Piece]) -> usize {
        self.pieces
            .iter()
            .fold((0, 0), |(best, run), p| {
                let run = if table[p.index()].owner() == player { run + 1 } else { 0 };
                (best.max(run), run)
            })
            .0
    }

    /// Sum of piece values.
    #[must_use]
    pub fn value(&self, table: &[Piece]) -> u32 {
        self.pieces.iter().map(|p| table[p.index()].value()).sum()
    }

    /// Detach the piece at `index` and everything above it.
    pub(crate) fn split_off(&mut self, index: usize) -> PieceList {
        if index >= self.pieces.len() {
            return PieceList::new();
        }
        self.pieces.drain(index..).collect()
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> PieceId {
        self.pieces.remove(index)
    }

    /// Insert `pieces` (bottom first) at `level`, preserving their order.
    pub(crate) fn insert_at(&mut self, level: Level, pieces: &[PieceId]) {
        let at = level.index_in(self.pieces.len());
        self.pieces.insert_many(at, pieces.iter().copied());
    }

    /// Exchange the places of `a` and `b` wherever either occurs.
    pub(crate) fn swap_members(&mut self, a: PieceId, b: PieceId) {
        swap_in(&mut self.pieces, a, b);
    }
}

/// Exchange `a` and `b` in a piece list.
pub(crate) fn swap_in(pieces: &mut [PieceId], a: PieceId, b: PieceId) {
    for p in pieces.iter_mut() {
        if *p == a {
            *p = b;
        } else if *p == b {
            *p = a;
        }
    }
}

/// Run of same-owner pieces from the top of a bottom-to-top list.
#[must_use]
pub fn run_from_top(pieces: &[PieceId], table: &[Piece]) -> usize {
    let Some(&top) = pieces.last() else {
        return 0;
    };
    let owner = table[top.index()].owner();
    pieces
        .iter()
        .rev()
        .take_while(|p| table[p.index()].owner() == owner)
        .count()
}
