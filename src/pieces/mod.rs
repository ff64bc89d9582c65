//! Pieces: kinds, faces, and per-observer disclosure.
//!
//! ## Key Types
//!
//! - `Face`: one face of a piece, or `Unknown` to an observer
//! - `PieceKind`: the permanent type, fixing both real faces and the value
//! - `Knowledge`: who has seen which physical side
//! - `Piece`: a runtime piece with owner, orientation and location

pub mod face;
pub mod knowledge;
pub mod piece;

pub use face::{Face, PieceKind};
pub use knowledge::{Knowledge, Side};
pub use piece::Piece;
