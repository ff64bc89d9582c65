//! Engine error type.
//!
//! Every error here is fatal for the operation that produced it: the board is
//! left exactly as it was before the call. Callers are expected to consult the
//! legality queries before building a move, so in a correct program only
//! `Parse` (bad input text) is ever observed in practice.

use thiserror::Error;

use crate::board::PlateauState;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("malformed move text {text:?}: {reason}")]
    Parse { text: String, reason: String },

    #[error("invalid setup: {0}")]
    Setup(String),

    #[error("illegal move `{mv}` in state {state:?}")]
    IllegalMove { mv: String, state: PlateauState },

    #[error("unknown piece index {0}")]
    UnknownPiece(u16),

    #[error("unknown stack index {0}")]
    UnknownStack(u16),

    #[error("inconsistent board: {0}")]
    Inconsistent(String),

    #[error("board copy mismatch: {0}")]
    CopyMismatch(String),

    #[error("nothing to undo")]
    NothingToUndo,
}

impl EngineError {
    pub(crate) fn parse(text: &str, reason: impl Into<String>) -> Self {
        EngineError::Parse {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
