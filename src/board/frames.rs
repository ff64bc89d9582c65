//! In-flight move frames.
//!
//! A turn that slides a stack across the board is a chain of pick/drop
//! steps. Each step is one `MoveFrame`: the stack the step started from, a
//! copy of that stack's contents before anything was dropped on it, and the
//! picked slot holding the moving sub-stack while it is in hand.
//!
//! Frame `i` always uses picked slot `i`. The current move step is
//! `frames.len() - 1`; an empty frame list means nothing is in flight.

use serde::{Deserialize, Serialize};

use crate::core::StackId;
use crate::stacks::PieceList;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveFrame {
    /// Stack this step started from.
    pub origin: StackId,
    /// Contents of `origin` before this step touched it.
    pub snapshot: PieceList,
    /// Picked slot holding the moving stack, while it is in hand.
    pub moving: Option<StackId>,
}

impl MoveFrame {
    #[must_use]
    pub fn new(origin: StackId, snapshot: PieceList) -> Self {
        Self {
            origin,
            snapshot,
            moving: None,
        }
    }
}
