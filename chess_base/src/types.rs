use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("square (rank {rank}, file {file}) is outside the board")]
    OutOfRange { rank: usize, file: usize },
    #[error("unexpected file char {0:?}")]
    UnexpectedFileChar(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRankChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceParseError {
    #[error("unexpected piece char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastlingRightsParseError {
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
    #[error("duplicate char {0:?}")]
    DuplicateChar(char),
    #[error("unexpected empty string")]
    EmptyString,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

const FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

impl File {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "file index must be between 0 and 7");
        FILES[val]
    }

    pub fn try_from_index(val: usize) -> Option<Self> {
        FILES.get(val).copied()
    }

    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        FILES.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(Self::from_index((u32::from(c) - u32::from('a')) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board rank, counted from White's side: `R1` has index 0
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

const RANKS: [Rank; 8] = [
    Rank::R1,
    Rank::R2,
    Rank::R3,
    Rank::R4,
    Rank::R5,
    Rank::R6,
    Rank::R7,
    Rank::R8,
];

impl Rank {
    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const fn from_index(val: usize) -> Self {
        assert!(val < 8, "rank index must be between 0 and 7");
        RANKS[val]
    }

    pub fn try_from_index(val: usize) -> Option<Self> {
        RANKS.get(val).copied()
    }

    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        RANKS.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '1'..='8' => Some(Self::from_index((u32::from(c) - u32::from('1')) as usize)),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board
///
/// The index of a square is `rank * 8 + file`, so `a1` is 0 and `h8` is 63.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const fn from_index(val: usize) -> Square {
        assert!(val < 64, "square must be between 0 and 63");
        Square(val as u8)
    }

    pub const fn from_parts(file: File, rank: Rank) -> Square {
        Square(((rank as u8) << 3) | file as u8)
    }

    /// Creates a square from raw rank and file numbers, both in `0..8`
    pub fn from_coords(rank: usize, file: usize) -> Result<Square, SquareError> {
        match (Rank::try_from_index(rank), File::try_from_index(file)) {
            (Some(rank), Some(file)) => Ok(Square::from_parts(file, rank)),
            _ => Err(SquareError::OutOfRange { rank, file }),
        }
    }

    pub const fn file(&self) -> File {
        File::from_index((self.0 & 7) as usize)
    }

    pub const fn rank(&self) -> Rank {
        Rank::from_index((self.0 >> 3) as usize)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns `true` for light squares (`h1`, `a8`, ...)
    pub const fn is_light(&self) -> bool {
        (self.file().index() + self.rank().index()) % 2 == 1
    }

    pub fn try_shift(self, delta_file: isize, delta_rank: isize) -> Option<Square> {
        let new_file = self.file().index() as isize + delta_file;
        let new_rank = self.rank().index() as isize + delta_rank;
        if !(0..8).contains(&new_file) || !(0..8).contains(&new_rank) {
            return None;
        }
        Some(Square::from_parts(
            File::from_index(new_file as usize),
            Rank::from_index(new_rank as usize),
        ))
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Square)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Square({})", self)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file_ch, rank_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file_ch), Some(rank_ch), None) => (file_ch, rank_ch),
            _ => return Err(SquareError::BadLength),
        };
        Ok(Square::from_parts(
            File::from_char(file_ch).ok_or(SquareError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(SquareError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

/// `(rank, file)` pair, both in `0..8`
impl TryFrom<(usize, usize)> for Square {
    type Error = SquareError;

    fn try_from((rank, file): (usize, usize)) -> Result<Self, Self::Error> {
        Square::from_coords(rank, file)
    }
}

impl TryFrom<&str> for Square {
    type Error = SquareError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Square::from_str(s)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ColorParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Kinds a pawn may be promoted to, most valuable first
    pub const PROMOTION_CHOICES: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub const fn is_promotion_choice(&self) -> bool {
        matches!(
            *self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight
        )
    }

    /// Conventional material value in pawns. The king has no material value.
    pub const fn value(&self) -> u32 {
        match *self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    /// Returns the uppercase letter used for this kind in FEN and SAN
    pub fn as_char(&self) -> char {
        b"PNBRQK"[self.index()] as char
    }

    /// Parses a piece letter, ignoring its case
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for PieceKind {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => PieceKind::from_char(ch).ok_or(PieceParseError::UnexpectedChar(ch)),
            _ => Err(PieceParseError::BadLength),
        }
    }
}

/// Piece standing on the board
///
/// Besides its kind and color, the piece remembers whether it has ever moved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub moved: bool,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece {
            kind,
            color,
            moved: false,
        }
    }

    pub const fn moved(self) -> Piece {
        Piece {
            moved: true,
            ..self
        }
    }

    pub const fn is(&self, color: Color, kind: PieceKind) -> bool {
        self.color as u8 == color as u8 && self.kind as u8 == kind as u8
    }

    /// Returns the FEN letter: uppercase for White, lowercase for Black
    pub fn as_char(&self) -> char {
        let ch = self.kind.as_char();
        match self.color {
            Color::White => ch,
            Color::Black => ch.to_ascii_lowercase(),
        }
    }

    pub fn as_utf8_char(&self) -> char {
        let idx = self.kind.index();
        match self.color {
            Color::White => ['♙', '♘', '♗', '♖', '♕', '♔'][idx],
            Color::Black => ['♟', '♞', '♝', '♜', '♛', '♚'][idx],
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    Queen = 0,
    King = 1,
}

impl CastlingSide {
    pub const ALL: [CastlingSide; 2] = [CastlingSide::King, CastlingSide::Queen];
}

/// Castling rights, one flag for each color and side.
///
/// Flags are listed in FEN order: `K`, `Q`, `k`, `q`.
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

const CASTLING_FLAGS: [(char, Color, CastlingSide); 4] = [
    ('K', Color::White, CastlingSide::King),
    ('Q', Color::White, CastlingSide::Queen),
    ('k', Color::Black, CastlingSide::King),
    ('q', Color::Black, CastlingSide::Queen),
];

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn mask(c: Color, s: CastlingSide) -> u8 {
        let shift = match (c, s) {
            (Color::White, CastlingSide::King) => 0,
            (Color::White, CastlingSide::Queen) => 1,
            (Color::Black, CastlingSide::King) => 2,
            (Color::Black, CastlingSide::Queen) => 3,
        };
        1 << shift
    }

    const fn color_mask(c: Color) -> u8 {
        Self::mask(c, CastlingSide::King) | Self::mask(c, CastlingSide::Queen)
    }

    pub const fn contains(self, c: Color, s: CastlingSide) -> bool {
        self.0 & Self::mask(c, s) != 0
    }

    /// Returns `true` if `c` may still castle to at least one side.
    pub const fn any(self, c: Color) -> bool {
        self.0 & Self::color_mask(c) != 0
    }

    pub const fn with(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | Self::mask(c, s))
    }

    pub fn insert(&mut self, c: Color, s: CastlingSide) {
        self.0 |= Self::mask(c, s);
    }

    pub fn remove(&mut self, c: Color, s: CastlingSide) {
        self.0 &= !Self::mask(c, s);
    }

    /// Drops both rights of `c`.
    pub fn revoke(&mut self, c: Color) {
        self.0 &= !Self::color_mask(c);
    }

    /// Packed flags in `0..16`, used as a hash key component.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "CastlingRights({})", self)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 == 0 {
            return f.write_str("-");
        }
        CASTLING_FLAGS
            .iter()
            .filter(|&&(_, c, s)| self.contains(c, s))
            .try_for_each(|&(ch, _, _)| write!(f, "{}", ch))
    }
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<CastlingRights, Self::Err> {
        match s {
            "" => return Err(CastlingRightsParseError::EmptyString),
            "-" => return Ok(CastlingRights::NONE),
            _ => {}
        }
        s.chars().try_fold(CastlingRights::NONE, |acc, ch| {
            let &(_, c, side) = CASTLING_FLAGS
                .iter()
                .find(|&&(flag, _, _)| flag == ch)
                .ok_or(CastlingRightsParseError::UnexpectedChar(ch))?;
            if acc.contains(c, side) {
                return Err(CastlingRightsParseError::DuplicateChar(ch));
            }
            Ok(acc.with(c, side))
        })
    }
}
