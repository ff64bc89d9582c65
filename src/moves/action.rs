//! Move representation.
//!
//! A `Move` is one gesture or composite command. Gestures (`Pick`, `Drop`,
//! `Flip`) drive the state machine one step at a time; `Onboard` and
//! `Exchange` bundle a whole rack-to-board or captive-to-trade transfer.
//!
//! Optional `locus` fields are informational: they echo where the gesture
//! happened so a move log can be read without a board, and are never used
//! to decide legality.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::PlateauState;
use crate::core::{Cell, PieceId, PlayerId, StackId};
use crate::pieces::Face;
use crate::stacks::Level;

/// Where a gesture happened, as written in move text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locus {
    Cell(Cell),
    Rack,
    Captive,
    Trade,
}

/// Real faces of onboarded pieces: top piece first, two letters per piece
/// (top face, then bottom face).
pub type FaceString = SmallVec<[Face; 4]>;

/// A complete move.
///
/// ```
/// use plateau_engine::moves::Move;
///
/// let mv: Move = "Pick 3 B2".parse().unwrap();
/// assert_eq!(mv.to_string(), "Pick 3 B2");
/// assert_eq!("done".parse::<Move>().unwrap(), Move::Done);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Take pieces from the rack and place them on `cell` in one step.
    Onboard {
        cell: Cell,
        level: Level,
        colors: FaceString,
        /// Bottom piece first.
        pieces: SmallVec<[PieceId; 2]>,
    },
    /// Lift a piece and everything above it.
    Pick {
        piece: PieceId,
        locus: Option<Locus>,
        level: Option<usize>,
    },
    /// Put the stack in hand down. `None` cancels the move in flight.
    Drop {
        stack: Option<StackId>,
        level: Level,
        locus: Option<Locus>,
    },
    /// Turn a piece over. `face` is its real top face before the flip.
    /// Pieces in hand have no locus.
    Flip {
        piece: PieceId,
        locus: Option<Locus>,
        face: Face,
    },
    /// Move captives into the trade pool.
    Exchange { pieces: SmallVec<[PieceId; 6]> },
    Done,
    /// Resign, or take back a resignation.
    Resign,
    Start(PlayerId),
    /// Nothing else is legal.
    Pass,
}

impl Move {
    /// Drop onto a stack at the top.
    #[must_use]
    pub fn drop_on(stack: StackId) -> Self {
        Move::Drop {
            stack: Some(stack),
            level: Level::Top,
            locus: None,
        }
    }

    #[must_use]
    pub fn pick(piece: PieceId) -> Self {
        Move::Pick {
            piece,
            locus: None,
            level: None,
        }
    }

    /// Cancel the move in flight.
    #[must_use]
    pub fn cancel() -> Self {
        Move::Drop {
            stack: None,
            level: Level::Top,
            locus: None,
        }
    }

    /// The face letters of an onboard as disclosed to the opponent: only the
    /// top face of the top piece is shown.
    #[must_use]
    pub fn public_colors(&self) -> Option<FaceString> {
        match self {
            Move::Onboard { colors, .. } => Some(
                colors
                    .iter()
                    .enumerate()
                    .map(|(i, &f)| if i == 0 { f } else { Face::Unknown })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Ends a player's input for now.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Move::Done | Move::Pass)
    }
}

/// A move with the context it was played in, for history and replay.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: PlayerId,
    pub mv: Move,
    /// State the move was played from.
    pub state: PlateauState,
    pub move_number: u32,
}

impl MoveRecord {
    #[must_use]
    pub fn new(player: PlayerId, mv: Move, state: PlateauState, move_number: u32) -> Self {
        Self {
            player,
            mv,
            state,
            move_number,
        }
    }
}
