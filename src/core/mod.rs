//! Core engine types: identifiers, players, RNG, configuration, errors.
//!
//! Nothing in this module knows the rules of the game. The board and rules
//! modules build on these.

pub mod config;
pub mod error;
pub mod ids;
pub mod player;
pub mod rng;

pub use config::{PlateauConfig, Variation, DEFAULT_PIECE_COUNTS, DEFAULT_SEED};
pub use error::EngineError;
pub use ids::{Cell, PieceId, StackId};
pub use player::{PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
