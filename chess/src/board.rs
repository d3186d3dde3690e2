//! Board and related things

use crate::moves::Move;
use crate::validator;
use rookery_base::geometry;
use rookery_base::square_set::SquareSet;
use rookery_base::types::{
    CastlingRights, CastlingRightsParseError, CastlingSide, Color, ColorParseError, File, Piece,
    PieceKind, Rank, Square, SquareError,
};

use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Board validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the first or on the last rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Square),
    /// The side which is not to move is in check
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing the first part of FEN (i.e. the positions of pieces on the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    #[error("too many ranks")]
    Overflow,
    #[error("not enough ranks")]
    Underflow,
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`Board`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    #[error("board not specified")]
    NoBoard,
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    #[error("no move side")]
    NoMoveSide,
    #[error("bad move side: {0}")]
    MoveSide(#[from] ColorParseError),
    #[error("no castling rights")]
    NoCastling,
    #[error("bad castling rights: {0}")]
    Castling(#[from] CastlingRightsParseError),
    #[error("no enpassant")]
    NoEnpassant,
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] SquareError),
    /// En passant target is not on the rank behind a pawn which just made a double step
    #[error("invalid enpassant rank {0}")]
    InvalidEnpassantRank(Rank),
    #[error("bad half-move clock: {0}")]
    HalfmoveClock(ParseIntError),
    #[error("bad move number: {0}")]
    FullmoveNumber(ParseIntError),
    /// FEN contains extra data
    #[error("extra data in FEN")]
    ExtraData,
    /// FEN was parsed, but the position is invalid
    #[error("invalid position: {0}")]
    Invalid(#[from] ValidateError),
}

/// Packed encoding of a position, used to detect repetitions
///
/// Two boards have equal fingerprints if and only if they have the same placement of pieces,
/// the same side to move, the same castling rights and the same en passant file. Move counters,
/// captured pieces and has-moved flags are not included.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    placement: [u64; 4],
    meta: u16,
}

impl Fingerprint {
    fn piece_code(piece: Piece) -> u64 {
        1 + piece.kind.index() as u64 + 6 * piece.color as u64
    }

    fn new(b: &Board) -> Fingerprint {
        let mut placement = [0_u64; 4];
        for (idx, cell) in b.cells.iter().enumerate() {
            if let Some(piece) = cell {
                placement[idx / 16] |= Self::piece_code(*piece) << ((idx % 16) * 4);
            }
        }
        let ep_code = b.en_passant.map_or(0, |sq| sq.file().index() as u16 + 1);
        let meta = (b.side as u16) | ((b.castling.bits() as u16) << 1) | (ep_code << 5);
        Fingerprint { placement, meta }
    }
}

/// Chess board
///
/// The board holds the placement of pieces together with the derived state of the game: castling
/// rights, en passant target, move counters, the last move and the list of captured pieces.
///
/// A board can only be obtained through [`Board::initial()`] or by parsing a FEN string, so
/// it always contains exactly one king of each color. It is mutated only by executing moves
/// through [`Game`](crate::Game).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) cells: [Option<Piece>; 64],
    pub(crate) side: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) last_move: Option<Move>,
    pub(crate) captured: Vec<Piece>,
}

impl Board {
    const EMPTY: Board = Board {
        cells: [None; 64],
        side: Color::White,
        castling: CastlingRights::NONE,
        en_passant: None,
        halfmove_clock: 0,
        fullmove_number: 1,
        last_move: None,
        captured: Vec::new(),
    };

    /// Returns a board with the initial position
    pub fn initial() -> Board {
        let mut res = Board::EMPTY;
        res.castling = CastlingRights::ALL;
        for file in File::iter() {
            for color in Color::ALL {
                res.put(
                    Square::from_parts(file, geometry::pawn_home_rank(color)),
                    Some(Piece::new(color, PieceKind::Pawn)),
                );
            }
        }
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for color in Color::ALL {
            for (file, kind) in File::iter().zip(BACK_RANK) {
                res.put(
                    Square::from_parts(file, geometry::home_rank(color)),
                    Some(Piece::new(color, kind)),
                );
            }
        }
        res
    }

    /// Parses a board from FEN
    ///
    /// Does the same as [`Board::from_str`]. It is recommended to use this function instead of
    /// `from_str()` for better readability.
    #[inline]
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Returns the piece on square `sq`, if any
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.get(Square::from_parts(file, rank))
    }

    #[inline]
    pub(crate) fn put(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.index()] = piece;
    }

    #[inline]
    pub(crate) fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the square passed over by the pawn which has just made a double step
    ///
    /// This is the square where an en passant capture lands. It is cleared by the next move.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Number of half-moves since the last pawn move or capture
    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    /// Move number, incremented after each move by Black
    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Returns the pieces captured so far, in the order of capture
    #[inline]
    pub fn captured(&self) -> &[Piece] {
        &self.captured
    }

    /// Returns all the pieces of color `c` together with their squares
    pub fn pieces(&self, c: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |sq| match self.get(sq) {
            Some(piece) if piece.color == c => Some((sq, piece)),
            _ => None,
        })
    }

    /// Returns the set of squares occupied by pieces of color `c`
    pub fn color(&self, c: Color) -> SquareSet {
        self.pieces(c).map(|(sq, _)| sq).collect()
    }

    /// Returns the set of all the occupied squares
    pub fn occupied(&self) -> SquareSet {
        Square::iter()
            .filter(|sq| self.get(*sq).is_some())
            .collect()
    }

    /// Returns the position of the king of color `c`
    ///
    /// Valid boards always contain exactly one king of each color.
    pub fn king_square(&self, c: Color) -> Option<Square> {
        self.pieces(c)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Returns the total material value of pieces of color `c` on the board
    pub fn material(&self, c: Color) -> u32 {
        self.pieces(c).map(|(_, piece)| piece.kind.value()).sum()
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        validator::is_check(self)
    }

    /// Returns `true` if the side to move has at least one legal move
    #[inline]
    pub fn has_legal_moves(&self) -> bool {
        validator::has_legal_moves(self)
    }

    /// Returns the fingerprint of the current position
    #[inline]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::new(self)
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use rookery::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }

    /// Converts the board into a FEN string
    ///
    /// Does the same as `Board::to_string()`.
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    /// Checks the parsed position and fixes the state which cannot be expressed by FEN
    ///
    /// En passant targets and castling rights which cannot be used are dropped silently. Has-moved
    /// flags are inferred from the placement and castling rights.
    fn validate(mut self) -> Result<Board, ValidateError> {
        for color in Color::ALL {
            if self.pieces(color).count() > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
            match self
                .pieces(color)
                .filter(|(_, p)| p.kind == PieceKind::King)
                .count()
            {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }

        for rank in [Rank::R1, Rank::R8] {
            for file in File::iter() {
                if let Some(p) = self.get2(file, rank) {
                    if p.kind == PieceKind::Pawn {
                        return Err(ValidateError::InvalidPawn(Square::from_parts(file, rank)));
                    }
                }
            }
        }

        // Reset enpassant if there is no pawn which could have made the double step
        if let Some(target) = self.en_passant {
            let them = self.side.inv();
            let pawn_sq = Square::from_parts(target.file(), geometry::enpassant_src_rank(self.side));
            let origin = Square::from_parts(target.file(), geometry::pawn_home_rank(them));
            if self.get(pawn_sq) != Some(Piece::new(them, PieceKind::Pawn))
                || self.get(target).is_some()
                || self.get(origin).is_some()
            {
                self.en_passant = None;
            }
        }

        // Reset bad castling flags
        for color in Color::ALL {
            if self.get(geometry::king_home(color)) != Some(Piece::new(color, PieceKind::King)) {
                self.castling.revoke(color);
            }
            for side in CastlingSide::ALL {
                let rook = self.get(geometry::rook_home(color, side));
                if rook != Some(Piece::new(color, PieceKind::Rook)) {
                    self.castling.remove(color, side);
                }
            }
        }

        for sq in Square::iter() {
            if let Some(piece) = self.get(sq) {
                let unmoved = match piece.kind {
                    PieceKind::Pawn => sq.rank() == geometry::pawn_home_rank(piece.color),
                    PieceKind::King => {
                        sq == geometry::king_home(piece.color) && self.castling.any(piece.color)
                    }
                    PieceKind::Rook => CastlingSide::ALL.iter().any(|&side| {
                        sq == geometry::rook_home(piece.color, side)
                            && self.castling.contains(piece.color, side)
                    }),
                    _ => true,
                };
                if !unmoved {
                    self.put(sq, Some(piece.moved()));
                }
            }
        }

        if validator::is_king_attacked(&self, self.side.inv()) {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(self)
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::initial()
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

fn parse_cells(s: &str) -> Result<[Option<Piece>; 64], CellsParseError> {
    type Error = CellsParseError;

    // FEN lists the ranks from the eighth one down to the first one
    let rank_of = |row: usize| Rank::from_index(7 - row);

    let mut file = 0_usize;
    let mut row = 0_usize;
    let mut cells = [None; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(rank_of(row)));
                }
                file += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(rank_of(row)));
                }
                row += 1;
                file = 0;
                if row >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(rank_of(row)));
                }
                let piece = Piece::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                cells[Square::from_parts(File::from_index(file), rank_of(row)).index()] =
                    Some(piece);
                file += 1;
            }
        };
    }

    if file < 8 {
        return Err(Error::RankUnderflow(rank_of(row)));
    }
    if row < 7 {
        return Err(Error::Underflow);
    }

    Ok(cells)
}

fn parse_en_passant(s: &str, side: Color) -> Result<Option<Square>, FenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let target = Square::from_str(s)?;
    if target.rank() != geometry::enpassant_dst_rank(side) {
        return Err(FenParseError::InvalidEnpassantRank(target.rank()));
    }
    Ok(Some(target))
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        type Error = FenParseError;

        if !s.is_ascii() {
            return Err(Error::NonAscii);
        }
        let mut iter = s.split(' ').fuse();

        let cells = parse_cells(iter.next().ok_or(Error::NoBoard)?)?;
        let side = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        let castling = CastlingRights::from_str(iter.next().ok_or(Error::NoCastling)?)?;
        let en_passant = parse_en_passant(iter.next().ok_or(Error::NoEnpassant)?, side)?;
        let halfmove_clock = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::HalfmoveClock)?,
            None => 0,
        };
        let fullmove_number = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::FullmoveNumber)?,
            None => 1,
        };

        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        let board = Board {
            cells,
            side,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            last_move: None,
            captured: Vec::new(),
        };
        Ok(board.validate()?)
    }
}

fn format_cells(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    for rank in Rank::iter().rev() {
        if rank != Rank::R8 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let piece = match b.get2(file, rank) {
                Some(piece) => piece,
                None => {
                    empty += 1;
                    continue;
                }
            };
            if empty != 0 {
                write!(f, "{}", (b'0' + empty) as char)?;
                empty = 0;
            }
            write!(f, "{}", piece)?;
        }
        if empty != 0 {
            write!(f, "{}", (b'0' + empty) as char)?;
        }
    }
    Ok(())
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        format_cells(self, f)?;
        write!(f, " {} {}", self.side, self.castling)?;
        match self.en_passant {
            Some(p) => write!(f, " {}", p)?,
            None => write!(f, " -")?,
        };
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)?;
        Ok(())
    }
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;
    const WHITE_INDICATOR: char;
    const BLACK_INDICATOR: char;

    fn cell(c: Option<Piece>) -> char;

    fn indicator(c: Color) -> char {
        match c {
            Color::White => Self::WHITE_INDICATOR,
            Color::Black => Self::BLACK_INDICATOR,
        }
    }

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter().rev() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                write!(f, "{}", Self::cell(b.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", Self::indicator(b.side), Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';
    const WHITE_INDICATOR: char = 'W';
    const BLACK_INDICATOR: char = 'B';

    fn cell(c: Option<Piece>) -> char {
        c.map_or('.', |p| p.as_char())
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';
    const WHITE_INDICATOR: char = '○';
    const BLACK_INDICATOR: char = '●';

    fn cell(c: Option<Piece>) -> char {
        c.map_or('.', |p| p.as_utf8_char())
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_initial() {
        assert_eq!(Board::initial().to_string(), INI_FEN);
        assert_eq!(Board::from_str(INI_FEN), Ok(Board::initial()));
        let b = Board::initial();
        assert_eq!(b.king_square(Color::White), Some(sq("e1")));
        assert_eq!(b.king_square(Color::Black), Some(sq("e8")));
        assert_eq!(b.pieces(Color::White).count(), 16);
        assert_eq!(b.occupied().len(), 32);
        assert_eq!(b.material(Color::White), 39);
        assert_eq!(b.material(Color::Black), 39);
        assert!(b.pieces(Color::Black).all(|(_, p)| !p.moved));
    }

    #[test]
    fn test_midgame() {
        const FEN: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21";

        let board = Board::from_fen(FEN).unwrap();
        assert_eq!(board.as_fen(), FEN);
        assert_eq!(
            board.get2(File::B, Rank::R4),
            Some(Piece::new(Color::Black, PieceKind::Bishop))
        );
        assert_eq!(
            board.get2(File::F, Rank::R2),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        assert_eq!(board.king_square(Color::White), Some(sq("h1")));
        assert_eq!(board.king_square(Color::Black), Some(sq("g8")));
        assert_eq!(board.side(), Color::White);
        assert_eq!(board.castling(), CastlingRights::NONE);
        assert_eq!(board.en_passant(), None);
        assert_eq!(board.halfmove_clock(), 1);
        assert_eq!(board.fullmove_number(), 21);
    }

    #[test]
    fn test_fixes() {
        const FEN: &str = "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w KQkq c6 6 5";

        let board = Board::from_fen(FEN).unwrap();
        assert_eq!(
            board.castling(),
            CastlingRights::NONE.with(Color::White, CastlingSide::Queen)
        );
        assert_eq!(board.en_passant(), None);
        assert_eq!(
            board.as_fen(),
            "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w Q - 6 5"
        );

        // The king and the a1 rook keep castling, so they are unmoved. The rook on g1 has moved.
        assert!(!board.get(sq("e1")).unwrap().moved);
        assert!(!board.get(sq("a1")).unwrap().moved);
        assert!(board.get(sq("g1")).unwrap().moved);
        assert!(board.get(sq("e7")).unwrap().moved);
        assert!(board.get(sq("e4")).unwrap().moved);
        assert!(!board.get(sq("d2")).unwrap().moved);
    }

    #[test]
    fn test_en_passant_kept() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3")
                .unwrap();
        assert_eq!(board.en_passant(), Some(sq("e3")));
        assert_eq!(
            Board::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e6 0 3"),
            Err(FenParseError::InvalidEnpassantRank(Rank::R6))
        );
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenParseError::NoMoveSide)
        );
        assert_eq!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"),
            Err(FenParseError::NoCastling)
        );
        assert_eq!(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq"),
            Err(FenParseError::NoEnpassant)
        );

        let b = Board::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(b.halfmove_clock(), 0);
        assert_eq!(b.fullmove_number(), 1);
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Invalid(ValidateError::NoKing(Color::Black)))
        );
        assert_eq!(
            Board::from_fen("k6k/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Invalid(ValidateError::TooManyKings(
                Color::Black
            )))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/K6P w - - 0 1"),
            Err(FenParseError::Invalid(ValidateError::InvalidPawn(sq("h1"))))
        );
        assert_eq!(
            Board::from_fen("k6R/8/8/8/8/8/8/K7 w - - 0 1"),
            Err(FenParseError::Invalid(
                ValidateError::OpponentKingAttacked
            ))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/K6x w - - 0 1"),
            Err(FenParseError::Board(CellsParseError::UnexpectedChar('x')))
        );
        assert_eq!(
            Board::from_fen("k7/8/8/8/8/8/8/K6 w - - 0 1"),
            Err(FenParseError::Board(CellsParseError::RankUnderflow(
                Rank::R1
            )))
        );
    }

    #[test]
    fn test_fingerprint() {
        let a = Board::initial();
        let mut b = Board::initial();
        b.halfmove_clock = 17;
        b.fullmove_number = 9;
        b.put(sq("e2"), Some(Piece::new(Color::White, PieceKind::Pawn).moved()));
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.side = Color::Black;
        assert_ne!(a.fingerprint(), b.fingerprint());
        b.side = Color::White;

        b.castling.remove(Color::Black, CastlingSide::King);
        assert_ne!(a.fingerprint(), b.fingerprint());
        b.castling = CastlingRights::ALL;

        b.en_passant = Some(sq("d6"));
        assert_ne!(a.fingerprint(), b.fingerprint());
        b.en_passant = None;

        b.put(sq("e2"), None);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_pretty_utf8() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 0 1").unwrap();
        let res = r#"
8│....♚...
7│........
6│........
5│........
4│........
3│........
2│........
1│....♔..♖
─┼────────
●│abcdefgh
"#;
        assert_eq!(b.pretty(PrettyStyle::Utf8).to_string().trim(), res.trim());
    }
}
