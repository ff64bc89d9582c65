//! Stable integer identifiers for pieces, stacks and board cells.
//!
//! Every piece and every stack lives in a flat table owned by the board and
//! is addressed by index. The indices are part of the move protocol, so they
//! never change for the lifetime of a game.
//!
//! ## Stack numbering
//!
//! - `0..n*n`: board cells, column-major (`A1, A2, .., B1, ..`)
//! - then per player: interleaved captive/trade stacks per piece kind,
//!   followed by one rack stack per piece kind
//! - then the transient picked slots
//!
//! ```
//! use plateau_engine::core::Cell;
//!
//! let cell: Cell = "C4".parse().unwrap();
//! assert_eq!(cell.col, 2);
//! assert_eq!(cell.row, 3);
//! assert_eq!(cell.to_string(), "C4");
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::EngineError;

/// Index of a piece in the board's piece table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl PieceId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a stack in the board's stack table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StackId(pub u16);

impl StackId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for StackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A board coordinate. Columns are lettered from `A`, rows numbered from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: u8,
    pub row: u8,
}

impl Cell {
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }

    /// True when the cell lies on the outer ring of a `size` x `size` board.
    #[must_use]
    pub const fn is_edge(self, size: usize) -> bool {
        let last = size as u8 - 1;
        self.col == 0 || self.row == 0 || self.col == last || self.row == last
    }

    /// Signed column/row displacement from `other` to `self`.
    #[must_use]
    pub fn offset_from(self, other: Cell) -> (i32, i32) {
        (
            i32::from(self.col) - i32::from(other.col),
            i32::from(self.row) - i32::from(other.row),
        )
    }

    /// The cell displaced by `(dx, dy)`, if it is on a `size` board.
    #[must_use]
    pub fn step(self, dx: i32, dy: i32, size: usize) -> Option<Cell> {
        let col = i32::from(self.col) + dx;
        let row = i32::from(self.row) + dy;
        let size = size as i32;
        ((0..size).contains(&col) && (0..size).contains(&row)).then(|| Cell::new(col as u8, row as u8))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", char::from(b'A' + self.col), u32::from(self.row) + 1)
    }
}

impl FromStr for Cell {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: &str| EngineError::parse(s, reason);
        let mut chars = s.chars();
        let col = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(|| bad("expected a column letter"))?
            .to_ascii_uppercase();
        let row: u8 = chars.as_str().parse().map_err(|_| bad("expected a row number"))?;
        if row == 0 {
            return Err(bad("rows are numbered from 1"));
        }
        Ok(Cell::new(col as u8 - b'A', row - 1))
    }
}
