//! Faces and piece kinds.
//!
//! Every piece has two real faces fixed by its kind. The face that is up
//! decides how the stack it tops may move.

use serde::{Deserialize, Serialize};

/// A single face of a piece, as seen by some observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Blank,
    Red,
    Blue,
    Orange,
    /// The observer does not know this face.
    Unknown,
}

impl Face {
    /// Protocol letter for this face.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Face::Blank => 'M',
            Face::Red => 'R',
            Face::Blue => 'B',
            Face::Orange => 'O',
            Face::Unknown => '?',
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'M' => Some(Face::Blank),
            'R' => Some(Face::Red),
            'B' => Some(Face::Blue),
            'O' => Some(Face::Orange),
            '?' => Some(Face::Unknown),
            _ => None,
        }
    }

    /// True for any face with movement or capture color.
    #[must_use]
    pub const fn is_colored(self) -> bool {
        matches!(self, Face::Red | Face::Blue | Face::Orange)
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The permanent type of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Mute,
    Red,
    Blue,
    RedMask,
    BlueMask,
    Twister,
    Ace,
}

impl PieceKind {
    pub const COUNT: usize = 7;

    pub const ALL: [PieceKind; Self::COUNT] = [
        PieceKind::Mute,
        PieceKind::Red,
        PieceKind::Blue,
        PieceKind::RedMask,
        PieceKind::BlueMask,
        PieceKind::Twister,
        PieceKind::Ace,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The two real faces: primary (up when unflipped), then secondary.
    #[must_use]
    pub const fn faces(self) -> (Face, Face) {
        match self {
            PieceKind::Mute => (Face::Blank, Face::Blank),
            PieceKind::Red => (Face::Red, Face::Blank),
            PieceKind::Blue => (Face::Blue, Face::Blank),
            PieceKind::RedMask => (Face::Red, Face::Red),
            PieceKind::BlueMask => (Face::Blue, Face::Blue),
            PieceKind::Twister => (Face::Red, Face::Blue),
            PieceKind::Ace => (Face::Orange, Face::Blank),
        }
    }

    /// Point value used by prisoner exchange and scoring.
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            PieceKind::Mute => 1,
            PieceKind::Red | PieceKind::Blue => 2,
            PieceKind::RedMask | PieceKind::BlueMask => 3,
            PieceKind::Twister => 4,
            PieceKind::Ace => 5,
        }
    }

    /// Both real faces are the same color.
    #[must_use]
    pub fn is_mono_color(self) -> bool {
        let (a, b) = self.faces();
        a == b
    }

    /// Whether some orientation shows `top` up and `bottom` down. `None`
    /// leaves that side unconstrained. Returns the flipped flag that does.
    #[must_use]
    pub fn orientation_for(self, top: Option<Face>, bottom: Option<Face>) -> Option<bool> {
        let (primary, secondary) = self.faces();
        let fits = |up: Face, down: Face| {
            top.map_or(true, |t| t == up) && bottom.map_or(true, |b| b == down)
        };
        if fits(primary, secondary) {
            Some(false)
        } else if fits(secondary, primary) {
            Some(true)
        } else {
            None
        }
    }
}
