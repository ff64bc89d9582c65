//! Piece instances.
//!
//! A `Piece` is a two-faced tile. Its kind and owner never change; its
//! orientation, location and disclosure state do. The location is a
//! back-reference into the board's stack table and must always agree with
//! the stack that lists the piece.

use serde::{Deserialize, Serialize};

use super::face::{Face, PieceKind};
use super::knowledge::{Knowledge, Side};
use crate::core::{PieceId, PlayerId, StackId};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    owner: PlayerId,
    kind: PieceKind,
    flipped: bool,
    knowledge: Knowledge,
    /// Random key, only used for digesting.
    tag: u64,
    stack: StackId,
}

impl Piece {
    /// Create a piece in the given stack, known to its owner only.
    #[must_use]
    pub fn new(id: PieceId, owner: PlayerId, kind: PieceKind, tag: u64, stack: StackId) -> Self {
        let mut knowledge = Knowledge::NONE;
        knowledge.learn_both(owner);
        Self {
            id,
            owner,
            kind,
            flipped: false,
            knowledge,
            tag,
            stack,
        }
    }

    #[must_use]
    pub fn id(&self) -> PieceId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.kind.value()
    }

    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    #[must_use]
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// The stack currently holding this piece.
    #[must_use]
    pub fn stack(&self) -> StackId {
        self.stack
    }

    #[must_use]
    pub fn knowledge(&self) -> Knowledge {
        self.knowledge
    }

    /// The physical side currently facing up.
    #[must_use]
    pub fn top_side(&self) -> Side {
        if self.flipped {
            Side::Secondary
        } else {
            Side::Primary
        }
    }

    #[must_use]
    pub fn face_of(&self, side: Side) -> Face {
        let (primary, secondary) = self.kind.faces();
        match side {
            Side::Primary => primary,
            Side::Secondary => secondary,
        }
    }

    #[must_use]
    pub fn real_top(&self) -> Face {
        self.face_of(self.top_side())
    }

    #[must_use]
    pub fn real_bottom(&self) -> Face {
        self.face_of(self.top_side().other())
    }

    #[must_use]
    pub fn knows_top(&self, observer: PlayerId) -> bool {
        self.knowledge.knows(self.top_side(), observer)
    }

    #[must_use]
    pub fn knows_bottom(&self, observer: PlayerId) -> bool {
        self.knowledge.knows(self.top_side().other(), observer)
    }

    #[must_use]
    pub fn knows_fully(&self, observer: PlayerId) -> bool {
        self.knowledge.knows_both(observer)
    }

    /// The top face as `observer` sees it.
    #[must_use]
    pub fn visible_top(&self, observer: PlayerId) -> Face {
        if self.knows_top(observer) {
            self.real_top()
        } else {
            Face::Unknown
        }
    }

    /// The bottom face as `observer` sees it.
    #[must_use]
    pub fn visible_bottom(&self, observer: PlayerId) -> Face {
        if self.knows_bottom(observer) {
            self.real_bottom()
        } else {
            Face::Unknown
        }
    }

    /// Real top face is blank; the piece carries no color when exposed.
    #[must_use]
    pub fn is_mute(&self) -> bool {
        self.real_top() == Face::Blank
    }

    #[must_use]
    pub fn is_mono_color(&self) -> bool {
        self.kind.is_mono_color()
    }

    pub(crate) fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// Restore the primary face to the top.
    pub(crate) fn flip_up(&mut self) {
        self.flipped = false;
    }

    pub(crate) fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub(crate) fn set_stack(&mut self, stack: StackId) {
        self.stack = stack;
    }

    /// Disclose the current top face to every observer.
    pub(crate) fn reveal_top(&mut self) {
        let side = self.top_side();
        for p in PlayerId::all() {
            self.knowledge.learn(side, p);
        }
    }

    /// Disclose both faces to every observer.
    pub(crate) fn reveal_all(&mut self) {
        self.knowledge = Knowledge::ALL;
    }

    /// Disclose both faces to one observer.
    pub(crate) fn reveal_to(&mut self, observer: PlayerId) {
        self.knowledge.learn_both(observer);
    }

    /// Every observer except the owner forgets both faces.
    pub(crate) fn anonymize(&mut self) {
        for p in PlayerId::all().filter(|&p| p != self.owner) {
            self.knowledge.forget_both(p);
        }
    }

    /// What `observer` knows about the (top, bottom) of this piece as it
    /// currently lies.
    pub(crate) fn oriented_knowledge(&self, observer: PlayerId) -> (bool, bool) {
        (self.knows_top(observer), self.knows_bottom(observer))
    }

    /// Set what `observer` knows about the current top and bottom.
    pub(crate) fn set_oriented_knowledge(&mut self, observer: PlayerId, (top, bottom): (bool, bool)) {
        let up = self.top_side();
        self.knowledge.set(up, observer, top);
        self.knowledge.set(up.other(), observer, bottom);
    }
}
