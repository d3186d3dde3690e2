//! Moves in Standard Algebraic Notation

use crate::board::Board;
use crate::moves::{self, Move, MoveList};
use crate::validator;
use rookery_base::types::{CastlingSide, File, PieceKind, Rank, Square};

use std::fmt;

/// Check mark after the move
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CheckMark {
    /// Check (a.k.a. "+")
    Single,
    /// Checkmate (a.k.a. "#")
    Checkmate,
}

/// SAN move without a check mark
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Data {
    Castling(CastlingSide),
    /// Pawn move, like `e4`, `exd5` or `e8=Q`
    Pawn {
        src_file: File,
        dst: Square,
        capture: bool,
        promote: Option<PieceKind>,
    },
    /// Move of any piece except a pawn, like `Nf3`, `Rxe1` or `Nbd7`
    Simple {
        piece: PieceKind,
        file: Option<File>,
        rank: Option<Rank>,
        capture: bool,
        dst: Square,
    },
}

/// Finds out what is needed to tell the move from other moves of the same kind to the same square
struct AmbigDetector {
    mv: Move,
    sim_any: bool,
    sim_file: bool,
    sim_rank: bool,
}

impl AmbigDetector {
    fn new(mv: Move) -> Self {
        Self {
            mv,
            sim_any: false,
            sim_file: false,
            sim_rank: false,
        }
    }

    fn push(&mut self, other: Move) {
        if other.src() == self.mv.src()
            || other.dst() != self.mv.dst()
            || other.piece() != self.mv.piece()
        {
            return;
        }
        self.sim_any = true;
        if self.mv.src().file() == other.src().file() {
            self.sim_file = true;
        }
        if self.mv.src().rank() == other.src().rank() {
            self.sim_rank = true;
        }
    }

    fn file(&self) -> Option<File> {
        if self.sim_any && (self.sim_rank || !self.sim_file) {
            return Some(self.mv.src().file());
        }
        None
    }

    fn rank(&self) -> Option<Rank> {
        if self.sim_any && self.sim_file {
            return Some(self.mv.src().rank());
        }
        None
    }
}

impl Data {
    /// Creates SAN data for the legal move `mv` in position `b`
    pub fn from_move(mv: Move, b: &Board) -> Data {
        if let Some(side) = mv.kind().castling_side() {
            return Data::Castling(side);
        }
        if mv.piece() == PieceKind::Pawn {
            return Data::Pawn {
                src_file: mv.src().file(),
                dst: mv.dst(),
                capture: mv.is_capture(),
                promote: mv.promote(),
            };
        }
        let mut detector = AmbigDetector::new(mv);
        let alternatives: MoveList = validator::legal_moves(b);
        for other in &alternatives {
            detector.push(*other);
        }
        Data::Simple {
            piece: mv.piece(),
            file: detector.file(),
            rank: detector.rank(),
            capture: mv.is_capture(),
            dst: mv.dst(),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match *self {
            Self::Castling(CastlingSide::King) => write!(f, "O-O"),
            Self::Castling(CastlingSide::Queen) => write!(f, "O-O-O"),
            Self::Pawn {
                src_file,
                dst,
                capture,
                promote,
            } => {
                if capture {
                    write!(f, "{}x", src_file)?;
                }
                write!(f, "{}", dst)?;
                if let Some(kind) = promote {
                    write!(f, "={}", kind.as_char())?;
                }
                Ok(())
            }
            Self::Simple {
                piece,
                file,
                rank,
                capture,
                dst,
            } => {
                write!(f, "{}", piece.as_char())?;
                if let Some(file) = file {
                    write!(f, "{}", file)?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", rank)?;
                }
                if capture {
                    write!(f, "x")?;
                }
                write!(f, "{}", dst)
            }
        }
    }
}

/// Move in SAN format with a [`CheckMark`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct San {
    /// Data without check mark
    pub data: Data,
    /// Check mark, if any
    pub check: Option<CheckMark>,
}

impl San {
    /// Creates the SAN from the legal move `mv` in position `b`
    pub fn from_move(mv: Move, b: &Board) -> San {
        let data = Data::from_move(mv, b);
        let mut after = b.clone();
        let _ = moves::make_move(&mut after, mv);
        let check = if validator::is_check(&after) {
            if validator::has_legal_moves(&after) {
                Some(CheckMark::Single)
            } else {
                Some(CheckMark::Checkmate)
            }
        } else {
            None
        };
        San { data, check }
    }
}

impl fmt::Display for San {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.data.fmt(f)?;
        match self.check {
            Some(CheckMark::Single) => write!(f, "+"),
            Some(CheckMark::Checkmate) => write!(f, "#"),
            None => Ok(()),
        }
    }
}
