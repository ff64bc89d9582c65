//! Moves and their text protocol.

pub mod action;
pub mod notation;

pub use action::{FaceString, Locus, Move, MoveRecord};
