//! Per-observer disclosure state of a piece's two sides.
//!
//! One bit per (physical side, observer). Bits are tied to physical sides,
//! not to "top" and "bottom", so flipping a piece keeps what each observer
//! has already seen. Outside the crate the set is read-only: disclosure
//! changes only through the intention-revealing methods on `Piece`.

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PLAYER_COUNT};

/// A physical side of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Primary,
    Secondary,
}

impl Side {
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::Primary => Side::Secondary,
            Side::Secondary => Side::Primary,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Knowledge(u8);

impl Knowledge {
    /// Nobody knows anything.
    pub const NONE: Knowledge = Knowledge(0);

    /// Every observer knows both sides.
    pub const ALL: Knowledge = Knowledge((1 << (2 * PLAYER_COUNT)) - 1);

    const fn bit(side: Side, observer: PlayerId) -> u8 {
        let side = match side {
            Side::Primary => 0,
            Side::Secondary => 1,
        };
        1 << (side * PLAYER_COUNT + observer.index())
    }

    #[must_use]
    pub const fn knows(self, side: Side, observer: PlayerId) -> bool {
        self.0 & Self::bit(side, observer) != 0
    }

    /// Both sides known to `observer`.
    #[must_use]
    pub const fn knows_both(self, observer: PlayerId) -> bool {
        self.knows(Side::Primary, observer) && self.knows(Side::Secondary, observer)
    }

    pub(crate) fn learn(&mut self, side: Side, observer: PlayerId) {
        self.0 |= Self::bit(side, observer);
    }

    pub(crate) fn learn_both(&mut self, observer: PlayerId) {
        self.learn(Side::Primary, observer);
        self.learn(Side::Secondary, observer);
    }

    pub(crate) fn forget_both(&mut self, observer: PlayerId) {
        self.0 &= !(Self::bit(Side::Primary, observer) | Self::bit(Side::Secondary, observer));
    }

    pub(crate) fn set(&mut self, side: Side, observer: PlayerId, known: bool) {
        if known {
            self.learn(side, observer);
        } else {
            self.0 &= !Self::bit(side, observer);
        }
    }
}
