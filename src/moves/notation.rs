//! Text protocol for moves.
//!
//! Whitespace-separated tokens with an optional leading sequence number.
//! Keywords are case-insensitive.
//!
//! | Move | Text |
//! |------|------|
//! | pick | `Pick <piece> [<locus> [<level>]]` |
//! | drop | `Drop <stack\|-1> <level> [<locus>]` |
//! | onboard | `Onboard <cell> <level> <faces> <piece,piece..>` |
//! | flip | `Flip <piece> [<locus>] <face>` |
//! | exchange | `Exchange <piece,piece..>` |
//! | other | `Done`, `Resign`, `Pass`, `Start P<n>` |
//!
//! Levels: `100` (or more) is on top, `99` on a drop cancels the move in
//! flight, smaller numbers are insertion indices. Loci are cells such as
//! `C4`, or `R`, `P`, `T` for rack, captive (prisoner) and trade.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use smallvec::SmallVec;

use super::action::{FaceString, Locus, Move};
use crate::core::{Cell, EngineError, PieceId, PlayerId, StackId};
use crate::pieces::Face;
use crate::stacks::Level;

const TOP_LEVEL: usize = 100;
const CANCEL_LEVEL: usize = 99;

impl Display for Locus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Locus::Cell(cell) => write!(f, "{cell}"),
            Locus::Rack => f.write_str("R"),
            Locus::Captive => f.write_str("P"),
            Locus::Trade => f.write_str("T"),
        }
    }
}

impl FromStr for Locus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "R" => Ok(Locus::Rack),
            "P" => Ok(Locus::Captive),
            "T" => Ok(Locus::Trade),
            _ => s.parse::<Cell>().map(Locus::Cell),
        }
    }
}

fn fmt_level(level: Level) -> String {
    match level {
        Level::Top => TOP_LEVEL.to_string(),
        Level::At(i) => i.to_string(),
    }
}

fn fmt_list(pieces: &[PieceId]) -> String {
    pieces.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Move::Onboard {
                cell,
                level,
                colors,
                pieces,
            } => {
                let faces: String = colors.iter().map(|c| c.as_char()).collect();
                write!(f, "Onboard {cell} {} {faces} {}", fmt_level(*level), fmt_list(pieces))
            }
            Move::Pick { piece, locus, level } => {
                write!(f, "Pick {piece}")?;
                if let Some(locus) = locus {
                    write!(f, " {locus}")?;
                    if let Some(level) = level {
                        write!(f, " {level}")?;
                    }
                }
                Ok(())
            }
            Move::Drop { stack: None, .. } => write!(f, "Drop -1 {CANCEL_LEVEL}"),
            Move::Drop {
                stack: Some(stack),
                level,
                locus,
            } => {
                write!(f, "Drop {stack} {}", fmt_level(*level))?;
                if let Some(locus) = locus {
                    write!(f, " {locus}")?;
                }
                Ok(())
            }
            Move::Flip { piece, locus, face } => match locus {
                Some(locus) => write!(f, "Flip {piece} {locus} {face}"),
                None => write!(f, "Flip {piece} {face}"),
            },
            Move::Exchange { pieces } => write!(f, "Exchange {}", fmt_list(pieces)),
            Move::Done => f.write_str("Done"),
            Move::Resign => f.write_str("Resign"),
            Move::Pass => f.write_str("Pass"),
            Move::Start(p) => write!(f, "Start {p}"),
        }
    }
}

/// Token cursor that reports errors against the whole move text.
struct Tokens<'a> {
    text: &'a str,
    inner: std::iter::Peekable<std::str::SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            inner: text.split_whitespace().peekable(),
        }
    }

    fn err(&self, reason: impl Into<String>) -> EngineError {
        EngineError::parse(self.text, reason)
    }

    fn next(&mut self, what: &str) -> Result<&'a str, EngineError> {
        self.inner.next().ok_or_else(|| self.err(format!("missing {what}")))
    }

    fn optional(&mut self) -> Option<&'a str> {
        self.inner.next()
    }

    fn number<T: FromStr>(&mut self, what: &str) -> Result<T, EngineError> {
        let tok = self.next(what)?;
        tok.parse().map_err(|_| self.err(format!("bad {what} {tok:?}")))
    }

    fn piece(&mut self) -> Result<PieceId, EngineError> {
        self.number::<u16>("piece index").map(PieceId)
    }

    fn piece_list<A: smallvec::Array<Item = PieceId>>(&mut self) -> Result<SmallVec<A>, EngineError> {
        let tok = self.next("piece list")?;
        tok.split(',')
            .map(|p| {
                p.trim()
                    .parse::<u16>()
                    .map(PieceId)
                    .map_err(|_| self.err(format!("bad piece index {p:?}")))
            })
            .collect()
    }

    fn face(&self, tok: &str) -> Result<Face, EngineError> {
        let mut chars = tok.chars();
        match (chars.next().and_then(Face::from_char), chars.next()) {
            (Some(face), None) => Ok(face),
            _ => Err(self.err(format!("bad face {tok:?}"))),
        }
    }

    fn finish(mut self) -> Result<(), EngineError> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(self.err(format!("unexpected token {extra:?}"))),
        }
    }
}

fn parse_level(n: usize) -> Level {
    if n >= CANCEL_LEVEL {
        Level::Top
    } else {
        Level::At(n)
    }
}

impl FromStr for Move {
    type Err = EngineError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tokens = Tokens::new(text);
        let mut keyword = tokens.next("move keyword")?;
        if keyword.trim_end_matches('.').chars().all(|c| c.is_ascii_digit()) {
            keyword = tokens.next("move keyword")?;
        }

        let mv = match keyword.to_ascii_lowercase().as_str() {
            "pick" => {
                let piece = tokens.piece()?;
                let locus = tokens.optional().map(str::parse::<Locus>).transpose()?;
                let level = match tokens.optional() {
                    Some(tok) => Some(tok.parse().map_err(|_| tokens.err(format!("bad level {tok:?}")))?),
                    None => None,
                };
                Move::Pick { piece, locus, level }
            }
            "drop" => {
                let stack: i32 = tokens.number("stack index")?;
                let level: i64 = tokens.number("level")?;
                let locus = tokens.optional().map(str::parse::<Locus>).transpose()?;
                if stack < 0 || level == CANCEL_LEVEL as i64 {
                    Move::Drop {
                        stack: None,
                        level: Level::Top,
                        locus,
                    }
                } else {
                    let stack = u16::try_from(stack).map_err(|_| tokens.err("stack index out of range"))?;
                    let level = usize::try_from(level).map_err(|_| tokens.err("negative level"))?;
                    Move::Drop {
                        stack: Some(StackId(stack)),
                        level: parse_level(level),
                        locus,
                    }
                }
            }
            "onboard" => {
                let cell: Cell = tokens.next("cell")?.parse()?;
                let level = parse_level(tokens.number("level")?);
                let faces_tok = tokens.next("faces")?;
                let colors = faces_tok
                    .chars()
                    .map(|c| Face::from_char(c).ok_or_else(|| tokens.err(format!("bad face {c:?}"))))
                    .collect::<Result<FaceString, _>>()?;
                let pieces = tokens.piece_list()?;
                if colors.len() != 2 * pieces.len() {
                    return Err(tokens.err("need two faces per onboarded piece"));
                }
                Move::Onboard {
                    cell,
                    level,
                    colors,
                    pieces,
                }
            }
            "flip" => {
                let piece = tokens.piece()?;
                let first = tokens.next("face")?;
                match tokens.optional() {
                    Some(face) => Move::Flip {
                        piece,
                        locus: Some(first.parse()?),
                        face: tokens.face(face)?,
                    },
                    None => Move::Flip {
                        piece,
                        locus: None,
                        face: tokens.face(first)?,
                    },
                }
            }
            "exchange" => Move::Exchange {
                pieces: tokens.piece_list()?,
            },
            "done" => Move::Done,
            "resign" => Move::Resign,
            "pass" => Move::Pass,
            "start" => {
                let tok = tokens.next("player")?;
                let index = tok
                    .strip_prefix(['P', 'p'])
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|&n| n < 2)
                    .ok_or_else(|| tokens.err(format!("bad player {tok:?}")))?;
                Move::Start(PlayerId::new(index))
            }
            other => return Err(tokens.err(format!("unknown move {other:?}"))),
        };
        tokens.finish()?;
        Ok(mv)
    }
}
