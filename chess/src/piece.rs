//! Move geometry of the pieces
//!
//! Every piece kind exposes the same capabilities through [`PieceMoves`]: the squares it attacks,
//! the squares it may move to if self-check is ignored, and its material value. All of them are
//! pure functions of the board and the square the piece stands on.

use crate::board::Board;
use rookery_base::geometry;
use rookery_base::square_set::SquareSet;
use rookery_base::types::{CastlingSide, Piece, PieceKind, Square};

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const DIAG_DIRS: [(isize, isize); 4] = [(1, 1), (-1, 1), (-1, -1), (1, -1)];
const LINE_DIRS: [(isize, isize); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

fn leaper(from: Square, offsets: &[(isize, isize)]) -> SquareSet {
    offsets
        .iter()
        .filter_map(|&(df, dr)| from.try_shift(df, dr))
        .collect()
}

/// Walks each direction until the edge of the board or the first occupied square, which is included
fn slider(b: &Board, from: Square, dirs: &[(isize, isize)]) -> SquareSet {
    let mut res = SquareSet::EMPTY;
    for &(df, dr) in dirs {
        let mut cur = from;
        while let Some(next) = cur.try_shift(df, dr) {
            res.insert(next);
            if b.get(next).is_some() {
                break;
            }
            cur = next;
        }
    }
    res
}

fn pawn_attacks(piece: Piece, from: Square) -> SquareSet {
    let fwd = geometry::pawn_forward(piece.color);
    [-1, 1]
        .iter()
        .filter_map(|&df| from.try_shift(df, fwd))
        .collect()
}

fn pawn_targets(b: &Board, piece: Piece, from: Square) -> SquareSet {
    let fwd = geometry::pawn_forward(piece.color);
    let mut res = SquareSet::EMPTY;

    if let Some(single) = from.try_shift(0, fwd) {
        if b.get(single).is_none() {
            res.insert(single);
            if from.rank() == geometry::pawn_home_rank(piece.color) {
                if let Some(double) = single.try_shift(0, fwd) {
                    if b.get(double).is_none() {
                        res.insert(double);
                    }
                }
            }
        }
    }

    let enemies = b.color(piece.color.inv());
    let mut capturable = enemies;
    if let Some(ep) = b.en_passant() {
        // The target belongs to the pawns of the side which did not make the double step
        if ep.rank() == geometry::enpassant_dst_rank(piece.color) {
            capturable.insert(ep);
        }
    }
    res | (pawn_attacks(piece, from) & capturable)
}

fn castling_targets(b: &Board, piece: Piece, from: Square) -> SquareSet {
    let mut res = SquareSet::EMPTY;
    if from != geometry::king_home(piece.color) {
        return res;
    }
    for side in CastlingSide::ALL {
        if b.castling().contains(piece.color, side) {
            res.insert(geometry::castling_king_dst(piece.color, side));
        }
    }
    res
}

/// Capabilities shared by all the piece kinds
pub trait PieceMoves {
    /// Squares attacked by the piece standing on `from`
    ///
    /// For sliding pieces, the first occupied square in each direction is attacked regardless of
    /// its color. Pawns attack only their two diagonal-forward squares.
    fn attack_pattern(&self, b: &Board, from: Square) -> SquareSet;

    /// Squares where the piece standing on `from` may move, without regard to self-check
    ///
    /// The king additionally reports the castling destinations for which the castling right is
    /// still present. Whether castling is actually possible is decided by the validator.
    fn pseudo_legal_targets(&self, b: &Board, from: Square) -> SquareSet;

    /// Material value of the piece
    fn value(&self) -> u32;
}

impl PieceMoves for Piece {
    fn attack_pattern(&self, b: &Board, from: Square) -> SquareSet {
        match self.kind {
            PieceKind::Pawn => pawn_attacks(*self, from),
            PieceKind::Knight => leaper(from, &KNIGHT_OFFSETS),
            PieceKind::Bishop => slider(b, from, &DIAG_DIRS),
            PieceKind::Rook => slider(b, from, &LINE_DIRS),
            PieceKind::Queen => slider(b, from, &DIAG_DIRS) | slider(b, from, &LINE_DIRS),
            PieceKind::King => leaper(from, &KING_OFFSETS),
        }
    }

    fn pseudo_legal_targets(&self, b: &Board, from: Square) -> SquareSet {
        let own = b.color(self.color);
        match self.kind {
            PieceKind::Pawn => pawn_targets(b, *self, from),
            PieceKind::King => {
                (self.attack_pattern(b, from) & !own) | castling_targets(b, *self, from)
            }
            _ => self.attack_pattern(b, from) & !own,
        }
    }

    #[inline]
    fn value(&self) -> u32 {
        self.kind.value()
    }
}
