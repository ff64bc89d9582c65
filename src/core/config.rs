//! Game configuration.
//!
//! A game is configured once at setup by a `PlateauConfig`. Collaborators
//! usually hand the engine a setup string of the form
//! `"<game> <players> <seed> <revision>"`:
//!
//! ```
//! use plateau_engine::core::PlateauConfig;
//!
//! let config = PlateauConfig::from_setup_str("plateau 2 1035356 1").unwrap();
//! assert_eq!(config.seed, 1035356);
//! assert_eq!(config.board_size, 4);
//! ```

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::player::PLAYER_COUNT;
use crate::pieces::PieceKind;

/// Rule variations the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variation {
    Plateau,
}

impl Variation {
    /// Look up a variation by its setup-string name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.eq_ignore_ascii_case("plateau").then_some(Variation::Plateau)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Variation::Plateau => "plateau",
        }
    }

    #[must_use]
    pub fn board_size(self) -> usize {
        match self {
            Variation::Plateau => 4,
        }
    }
}

/// Default per-player piece counts, indexed by `PieceKind::index`.
pub const DEFAULT_PIECE_COUNTS: [u8; PieceKind::COUNT] = [4, 2, 2, 1, 1, 1, 1];

/// Default seed for piece tags.
pub const DEFAULT_SEED: u64 = 1035356;

/// Complete configuration for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateauConfig {
    pub variation: Variation,

    /// Side length of the square board.
    pub board_size: usize,

    /// Pieces of each kind issued to each player.
    pub piece_counts: [u8; PieceKind::COUNT],

    /// Seed for the per-piece digest tags.
    pub seed: u64,

    /// Rules revision carried by the setup string.
    pub revision: u32,

    /// When true, pieces start known only to their owner. When false every
    /// face is disclosed to both players (analysis boards).
    pub hidden_information: bool,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        Self {
            variation: Variation::Plateau,
            board_size: Variation::Plateau.board_size(),
            piece_counts: DEFAULT_PIECE_COUNTS,
            seed: DEFAULT_SEED,
            revision: 1,
            hidden_information: true,
        }
    }
}

impl PlateauConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a setup string: game name, player count, seed, rules revision.
    ///
    /// The revision may be omitted and defaults to 1.
    pub fn from_setup_str(setup: &str) -> Result<Self, EngineError> {
        let mut tokens = setup.split_whitespace();

        let name = tokens
            .next()
            .ok_or_else(|| EngineError::Setup("empty setup string".into()))?;
        let variation = Variation::from_name(name)
            .ok_or_else(|| EngineError::Setup(format!("unknown game {name:?}")))?;

        let players: usize = parse_field(tokens.next(), "player count")?;
        if players != PLAYER_COUNT {
            return Err(EngineError::Setup(format!(
                "{players} players requested, only {PLAYER_COUNT} are supported"
            )));
        }

        let seed: u64 = parse_field(tokens.next(), "seed")?;
        let revision: u32 = match tokens.next() {
            Some(tok) => parse_field(Some(tok), "revision")?,
            None => 1,
        };

        if let Some(extra) = tokens.next() {
            return Err(EngineError::Setup(format!("unexpected token {extra:?}")));
        }

        let config = Self {
            variation,
            board_size: variation.board_size(),
            ..Self::default()
        }
        .with_seed(seed)
        .with_revision(revision);
        config.validate()?;
        Ok(config)
    }

    /// Render the setup string this configuration was built from.
    #[must_use]
    pub fn setup_string(&self) -> String {
        format!("{} {} {} {}", self.variation.name(), PLAYER_COUNT, self.seed, self.revision)
    }

    /// Set the piece tag seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the rules revision.
    #[must_use]
    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = revision;
        self
    }

    /// Override the board size.
    #[must_use]
    pub fn with_board_size(mut self, size: usize) -> Self {
        self.board_size = size;
        self
    }

    /// Override the per-player count of one piece kind.
    #[must_use]
    pub fn with_piece_count(mut self, kind: PieceKind, count: u8) -> Self {
        self.piece_counts[kind.index()] = count;
        self
    }

    /// Disclose every face to both players from the start.
    #[must_use]
    pub fn with_open_information(mut self) -> Self {
        self.hidden_information = false;
        self
    }

    /// Pieces issued to each player.
    #[must_use]
    pub fn pieces_per_player(&self) -> usize {
        self.piece_counts.iter().map(|&c| usize::from(c)).sum()
    }

    /// Check that the configuration describes a playable board.
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(3..=8).contains(&self.board_size) {
            return Err(EngineError::Setup(format!(
                "board size {} outside 3..=8",
                self.board_size
            )));
        }
        match self.pieces_per_player() {
            0 => Err(EngineError::Setup("no pieces to play with".into())),
            n if n > 12 => Err(EngineError::Setup(format!("{n} pieces per player, at most 12"))),
            _ => Ok(()),
        }
    }
}

fn parse_field<T: std::str::FromStr>(tok: Option<&str>, what: &str) -> Result<T, EngineError> {
    let tok = tok.ok_or_else(|| EngineError::Setup(format!("missing {what}")))?;
    tok.parse()
        .map_err(|_| EngineError::Setup(format!("bad {what} {tok:?}")))
}
