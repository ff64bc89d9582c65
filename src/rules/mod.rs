//! Game rules: movement geometry, captures, prisoner exchange, the
//! legality oracle and move generation.
//!
//! Everything here is a query over a `Board`. Mutation happens only in
//! `board::executor`, which calls into these rules before touching state.

pub mod capture;
pub mod engine;
pub mod exchange;
pub mod geometry;
pub mod legality;
pub mod movegen;

pub use capture::captured_positions;
pub use engine::{GameResult, SearchGame};
pub use exchange::{exchange_is_legal, largest_subset_below};
pub use geometry::{is_knight_move, legal_displacement, reachable_displacements};
pub use legality::legal_destination;
