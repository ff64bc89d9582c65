//! The board and everything that changes it.
//!
//! - `board`: piece and stack tables, layout, scoring
//! - `executor`: applies moves through the state machine
//! - `frames`: bookkeeping for multi-hop moves in flight
//! - `digest`: position hash
//! - `resample`: hidden-state resampling for search
//! - `verify`: copy verification and replay

#[allow(clippy::module_inception)]
pub mod board;
pub mod digest;
pub mod executor;
pub mod frames;
pub mod resample;
pub mod state;
pub mod verify;

pub use board::{Board, PlayerStats};
pub use frames::MoveFrame;
pub use state::PlateauState;
