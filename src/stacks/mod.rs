pub mod stack;

pub use stack::{run_from_top, Level, Origin, OriginKind, PieceList, Stack};
pub(crate) use stack::swap_in;
