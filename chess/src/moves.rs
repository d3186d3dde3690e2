//! Moves, the reversible move primitive and move-related errors

use crate::board::Board;
use crate::evaluator::GameState;
use rookery_base::geometry;
use rookery_base::square_set::SquareSet;
use rookery_base::types::{
    CastlingRights, CastlingSide, Color, Piece, PieceKind, PieceParseError, Square, SquareError,
};

use arrayvec::ArrayVec;
use std::convert::Infallible;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::slice;
use std::str::FromStr;

use thiserror::Error;

/// Error returned when a move request is rejected
///
/// All these errors are recoverable. A rejected request never changes the game.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    #[error("invalid square: {0}")]
    InvalidSquare(#[from] SquareError),
    #[error("no piece on {0}")]
    NoPieceAtOrigin(Square),
    /// The piece on the square belongs to the side which is not to move
    #[error("piece on {0} does not belong to the side to move")]
    NotCallersPiece(Square),
    /// The destination is not among the legal targets of the piece
    #[error("illegal move {src}{dst}")]
    IllegalMove { src: Square, dst: Square },
    /// A promotion must be completed before anything else
    #[error("promotion is pending")]
    PromotionPending,
    #[error("cannot promote to {0:?}")]
    InvalidPromotionChoice(PieceKind),
    #[error("no promotion is pending")]
    NoPromotionPending,
    #[error("game is over: {0}")]
    GameOver(GameState),
}

impl From<Infallible> for MoveError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

/// Move kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Any move or capture except the special ones below, including single pawn steps and promotions
    Simple,
    /// Double pawn move
    PawnDouble,
    Enpassant,
    CastlingKingside,
    CastlingQueenside,
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastlingKingside,
            CastlingSide::Queen => Self::CastlingQueenside,
        }
    }
}

impl MoveKind {
    #[inline]
    pub fn castling_side(self) -> Option<CastlingSide> {
        match self {
            MoveKind::CastlingKingside => Some(CastlingSide::King),
            MoveKind::CastlingQueenside => Some(CastlingSide::Queen),
            _ => None,
        }
    }
}

/// Chess move
///
/// Besides the source and destination squares, the move remembers the moved piece, the captured
/// piece and the promotion target, so it can be displayed and undone without the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    src: Square,
    dst: Square,
    color: Color,
    piece: PieceKind,
    captured: Option<PieceKind>,
    promote: Option<PieceKind>,
}

impl Move {
    /// Classifies the move from `src` to `dst` in position `b`
    ///
    /// The move is **not** checked for legality. Promotions are created without a promotion
    /// target, use [`Move::with_promote()`] to set it.
    pub fn classify(b: &Board, src: Square, dst: Square) -> Result<Move, MoveError> {
        let piece = b.get(src).ok_or(MoveError::NoPieceAtOrigin(src))?;
        let mut kind = MoveKind::Simple;
        let mut captured = b.get(dst).map(|p| p.kind);

        match piece.kind {
            PieceKind::King => {
                if src == geometry::king_home(piece.color) {
                    for side in CastlingSide::ALL {
                        if dst == geometry::castling_king_dst(piece.color, side) {
                            kind = MoveKind::from(side);
                        }
                    }
                }
            }
            PieceKind::Pawn => {
                if src.rank().index().abs_diff(dst.rank().index()) == 2 {
                    kind = MoveKind::PawnDouble;
                } else if src.file() != dst.file() && captured.is_none() {
                    kind = MoveKind::Enpassant;
                    captured = Some(PieceKind::Pawn);
                }
            }
            _ => {}
        }

        Ok(Move {
            kind,
            src,
            dst,
            color: piece.color,
            piece: piece.kind,
            captured,
            promote: None,
        })
    }

    /// Returns a copy of this move which promotes the pawn to `kind`
    #[inline]
    pub fn with_promote(self, kind: PieceKind) -> Move {
        Move {
            promote: Some(kind),
            ..self
        }
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn src(&self) -> Square {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Square {
        self.dst
    }

    /// Returns the side which makes this move
    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns the kind of the moved piece (before promotion)
    #[inline]
    pub const fn piece(&self) -> PieceKind {
        self.piece
    }

    #[inline]
    pub const fn captured(&self) -> Option<PieceKind> {
        self.captured
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn promote(&self) -> Option<PieceKind> {
        self.promote
    }

    /// Returns `true` if a pawn reaches the last rank with this move
    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.piece == PieceKind::Pawn && self.dst.rank() == geometry::promotion_rank(self.color)
    }

    /// Square of the pawn captured en passant
    ///
    /// It stands on the source rank and on the destination file.
    #[inline]
    pub fn enpassant_victim(&self) -> Square {
        Square::from_parts(self.dst.file(), self.src.rank())
    }

    /// Converts this move into its UCI representation
    #[inline]
    pub fn uci(&self) -> UciMove {
        UciMove {
            src: self.src,
            dst: self.dst,
            promote: self.promote,
        }
    }
}

/// Displays the move in UCI format, like `e2e4` or `e7e8q`
impl fmt::Display for Move {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.uci().fmt(f)
    }
}

/// Error parsing [`UciMove`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum UciParseError {
    #[error("bad string length")]
    BadLength,
    #[error("bad source: {0}")]
    BadSrc(SquareError),
    #[error("bad destination: {0}")]
    BadDst(SquareError),
    #[error("bad promote: {0}")]
    BadPromote(PieceParseError),
}

/// Move in UCI format, not bound to any position
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UciMove {
    pub src: Square,
    pub dst: Square,
    pub promote: Option<PieceKind>,
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(kind) = self.promote {
            write!(f, "{}", kind.as_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for UciMove {
    type Err = UciParseError;

    fn from_str(s: &str) -> Result<UciMove, Self::Err> {
        if !matches!(s.len(), 4 | 5) || !s.is_ascii() {
            return Err(UciParseError::BadLength);
        }
        let src = Square::from_str(&s[0..2]).map_err(UciParseError::BadSrc)?;
        let dst = Square::from_str(&s[2..4]).map_err(UciParseError::BadDst)?;
        let promote = match s.get(4..) {
            Some(p) if !p.is_empty() => {
                Some(PieceKind::from_str(p).map_err(UciParseError::BadPromote)?)
            }
            _ => None,
        };
        Ok(UciMove { src, dst, promote })
    }
}

/// List of moves, stored inline
#[derive(Debug, Clone, Default)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }

    /// Returns the set of destinations of all the moves from `src`
    pub fn targets(&self, src: Square) -> SquareSet {
        self.0
            .iter()
            .filter(|mv| mv.src == src)
            .map(|mv| mv.dst)
            .collect()
    }
}

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Metadata necessary to undo the applied move
#[derive(Debug, Copy, Clone)]
pub(crate) struct Undo {
    moved: Piece,
    taken: Option<(Square, Piece)>,
    rook: Option<Piece>,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    last_move: Option<Move>,
    side: Color,
}

fn castling_sources(c: Color, s: CastlingSide) -> SquareSet {
    SquareSet::from_square(geometry::king_home(c)).with(geometry::rook_home(c, s))
}

/// Clears the castling rights whose king or rook square was left or entered by the move
fn update_castling(b: &mut Board, change: SquareSet) {
    for c in Color::ALL {
        for s in CastlingSide::ALL {
            if !(change & castling_sources(c, s)).is_empty() {
                b.castling.remove(c, s);
            }
        }
    }
}

/// Applies the move `mv` to the board and returns the data to revert it
///
/// The move must be pseudo-legal in position `b`. This is the only function which changes the
/// placement of pieces, both for committed moves and for legality trials. If the move is a
/// promotion without a promotion target, the pawn stays on the last rank.
pub(crate) fn make_move(b: &mut Board, mv: Move) -> Undo {
    let moved = b
        .take(mv.src)
        .unwrap_or_else(|| Piece::new(mv.color, mv.piece));
    let mut undo = Undo {
        moved,
        taken: None,
        rook: None,
        castling: b.castling,
        en_passant: b.en_passant,
        halfmove_clock: b.halfmove_clock,
        fullmove_number: b.fullmove_number,
        last_move: b.last_move,
        side: b.side,
    };

    let taken_sq = match mv.kind {
        MoveKind::Enpassant => mv.enpassant_victim(),
        _ => mv.dst,
    };
    if let Some(taken) = b.take(taken_sq) {
        undo.taken = Some((taken_sq, taken));
        b.captured.push(taken);
    }

    if let Some(side) = mv.kind.castling_side() {
        let rook = b.take(geometry::rook_home(mv.color, side));
        undo.rook = rook;
        b.put(
            geometry::castling_rook_dst(mv.color, side),
            rook.map(Piece::moved),
        );
    }

    let placed = match mv.promote {
        Some(kind) => Piece::new(mv.color, kind).moved(),
        None => moved.moved(),
    };
    b.put(mv.dst, Some(placed));

    update_castling(b, SquareSet::from_square(mv.src).with(mv.dst));

    b.en_passant = match mv.kind {
        MoveKind::PawnDouble => mv.src.try_shift(0, geometry::pawn_forward(mv.color)),
        _ => None,
    };

    if mv.piece == PieceKind::Pawn || undo.taken.is_some() {
        b.halfmove_clock = 0;
    } else {
        b.halfmove_clock = b.halfmove_clock.saturating_add(1);
    }
    if mv.color == Color::Black {
        b.fullmove_number = b.fullmove_number.saturating_add(1);
    }
    b.side = mv.color.inv();
    b.last_move = Some(mv);

    undo
}

/// Reverts the move `mv` applied by [`make_move()`], restoring the board exactly
pub(crate) fn unmake_move(b: &mut Board, mv: Move, u: Undo) {
    b.put(mv.dst, None);
    if let Some(side) = mv.kind.castling_side() {
        b.put(geometry::castling_rook_dst(mv.color, side), None);
        b.put(geometry::rook_home(mv.color, side), u.rook);
    }
    if let Some((sq, piece)) = u.taken {
        b.put(sq, Some(piece));
        b.captured.pop();
    }
    b.put(mv.src, Some(u.moved));

    b.castling = u.castling;
    b.en_passant = u.en_passant;
    b.halfmove_clock = u.halfmove_clock;
    b.fullmove_number = u.fullmove_number;
    b.last_move = u.last_move;
    b.side = u.side;
}
