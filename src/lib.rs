//! # plateau-engine
//!
//! Game-state engine for Plateau, a two-player stacking and capture game
//! played with two-faced pieces on a small square board.
//!
//! ## Design Principles
//!
//! 1. **Validate, then mutate**: every move is checked by the legality
//!    oracle before the board changes. A rejected move leaves the board
//!    exactly as it was.
//!
//! 2. **Arena tables**: pieces and stacks live in flat tables addressed by
//!    `PieceId` and `StackId`, so a board clones as a plain value.
//!
//! 3. **Hidden information is data**: each piece records which faces each
//!    player has seen. Search can resample what a player has not seen.
//!
//! ## Architecture
//!
//! - **Gesture-level moves**: a turn is a sequence of `Pick`, `Drop`, `Flip`
//!   and `Done` gestures driving a turn-state machine, with composite
//!   `Onboard` and `Exchange` moves for rack placement and prisoner trades.
//!
//! - **Search surface**: `SearchGame` gives move enumeration, weighted
//!   sampling, apply/undo and a position digest.
//!
//! ## Modules
//!
//! - `core`: identifiers, players, RNG, configuration, errors
//! - `pieces`: faces, kinds, knowledge and the piece record
//! - `stacks`: ordered piece stacks and their origin categories
//! - `board`: board state, move execution, digest, resampling, verification
//! - `rules`: geometry, captures, exchange, legality, move generation
//! - `moves`: the `Move` type and its text protocol
//!
//! ## Example
//!
//! ```
//! use plateau_engine::{Board, Move, PlateauConfig, PlateauState};
//!
//! let mut board = Board::new(PlateauConfig::default()).unwrap();
//! // bottom piece first in the list, top piece first in the faces
//! let mv: Move = "Onboard A1 100 RMMM 3,4".parse().unwrap();
//! board.execute(&mv).unwrap();
//! assert_eq!(board.state(), PlateauState::Onboard2Done);
//! ```

pub mod board;
pub mod core;
pub mod moves;
pub mod pieces;
pub mod rules;
pub mod stacks;

// Re-export commonly used types
pub use crate::core::{
    Cell, EngineError, GameRng, GameRngState, PieceId, PlateauConfig, PlayerId, PlayerMap, StackId, Variation,
    PLAYER_COUNT,
};

pub use crate::pieces::{Face, Knowledge, Piece, PieceKind, Side};

pub use crate::stacks::{Level, Origin, OriginKind, Stack};

pub use crate::board::{Board, MoveFrame, PlateauState, PlayerStats};

pub use crate::rules::{GameResult, SearchGame};

pub use crate::moves::{FaceString, Locus, Move, MoveRecord};
