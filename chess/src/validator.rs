//! Legality checks
//!
//! Pseudo-legal targets are narrowed to legal ones by trying each candidate on a scratch copy of the
//! board: the move is made, the king of the mover is checked for attacks, and the move is unmade.

use crate::board::Board;
use crate::moves::{self, Move, MoveError, MoveList};
use crate::piece::PieceMoves;
use rookery_base::geometry;
use rookery_base::square_set::SquareSet;
use rookery_base::types::{CastlingSide, Color, Piece, PieceKind, Square};

/// Returns all the pieces of color `by` which attack the square `sq`
pub fn attackers(b: &Board, sq: Square, by: Color) -> SquareSet {
    b.pieces(by)
        .filter(|(from, piece)| piece.attack_pattern(b, *from).contains(sq))
        .map(|(from, _)| from)
        .collect()
}

/// Returns `true` if the square `sq` is attacked by any piece of color `by`
pub fn is_square_attacked(b: &Board, sq: Square, by: Color) -> bool {
    b.pieces(by)
        .any(|(from, piece)| piece.attack_pattern(b, from).contains(sq))
}

/// Returns `true` if the king of color `c` is attacked
pub fn is_king_attacked(b: &Board, c: Color) -> bool {
    match b.king_square(c) {
        Some(king) => is_square_attacked(b, king, c.inv()),
        None => false,
    }
}

/// Returns `true` if the side to move is in check
#[inline]
pub fn is_check(b: &Board) -> bool {
    is_king_attacked(b, b.side())
}

/// Returns all the pieces that give check currently
pub fn checkers(b: &Board) -> SquareSet {
    match b.king_square(b.side()) {
        Some(king) => attackers(b, king, b.side().inv()),
        None => SquareSet::EMPTY,
    }
}

/// Checks everything about castling except the safety of the destination square
///
/// The king and the rook must be unmoved, the squares between them must be empty, and the king
/// must not be in check or pass over an attacked square.
fn is_castling_allowed(b: &Board, color: Color, side: CastlingSide) -> bool {
    if !b.castling().contains(color, side) {
        return false;
    }
    let king_sq = geometry::king_home(color);
    let rook_sq = geometry::rook_home(color, side);
    let unmoved = |sq: Square, kind: PieceKind| {
        matches!(b.get(sq), Some(p) if p.is(color, kind) && !p.moved)
    };
    if !unmoved(king_sq, PieceKind::King) || !unmoved(rook_sq, PieceKind::Rook) {
        return false;
    }
    let rank = geometry::home_rank(color);
    if geometry::castling_gap_files(side)
        .iter()
        .any(|&file| b.get(Square::from_parts(file, rank)).is_some())
    {
        return false;
    }
    let enemy = color.inv();
    !is_square_attacked(b, king_sq, enemy)
        && !is_square_attacked(b, geometry::castling_rook_dst(color, side), enemy)
        && !is_square_attacked(b, geometry::castling_king_dst(color, side), enemy)
}

/// Exclusive handle for trying moves on a board
///
/// The simulator borrows the board mutably, so at most one trial can be in progress. Each trial
/// restores the board before returning its verdict.
struct Simulator<'a> {
    board: &'a mut Board,
}

impl<'a> Simulator<'a> {
    fn new(board: &'a mut Board) -> Self {
        Simulator { board }
    }

    /// Returns `true` if the move does not leave the king of the mover attacked
    fn is_safe(&mut self, mv: Move) -> bool {
        let undo = moves::make_move(self.board, mv);
        let safe = !is_king_attacked(self.board, mv.color());
        moves::unmake_move(self.board, mv, undo);
        safe
    }

    fn legal_targets(&mut self, piece: Piece, from: Square) -> SquareSet {
        let mut res = SquareSet::EMPTY;
        for dst in piece.pseudo_legal_targets(self.board, from) {
            if matches!(self.board.get(dst), Some(p) if p.kind == PieceKind::King) {
                continue;
            }
            let mv = match Move::classify(self.board, from, dst) {
                Ok(mv) => mv,
                Err(_) => continue,
            };
            if let Some(side) = mv.kind().castling_side() {
                if !is_castling_allowed(self.board, piece.color, side) {
                    continue;
                }
            }
            if self.is_safe(mv) {
                res.insert(dst);
            }
        }
        res
    }
}

/// Returns the squares where the piece on `from` may legally move
///
/// Works for the pieces of both colors. The board is not changed.
pub fn legal_targets(b: &Board, from: Square) -> Result<SquareSet, MoveError> {
    let piece = b.get(from).ok_or(MoveError::NoPieceAtOrigin(from))?;
    let mut scratch = b.clone();
    Ok(Simulator::new(&mut scratch).legal_targets(piece, from))
}

/// Returns `true` if the piece on `src` may legally move to `dst`
pub fn is_legal(b: &Board, src: Square, dst: Square) -> Result<bool, MoveError> {
    Ok(legal_targets(b, src)?.contains(dst))
}

/// Generates all the legal moves for the side to move
///
/// Promotions are listed once for each possible promotion target.
pub fn legal_moves(b: &Board) -> MoveList {
    let mut res = MoveList::new();
    let mut scratch = b.clone();
    let mut sim = Simulator::new(&mut scratch);
    for (from, piece) in b.pieces(b.side()) {
        for dst in sim.legal_targets(piece, from) {
            let mv = match Move::classify(b, from, dst) {
                Ok(mv) => mv,
                Err(_) => continue,
            };
            if mv.is_promotion() {
                for kind in PieceKind::PROMOTION_CHOICES {
                    res.push(mv.with_promote(kind));
                }
            } else {
                res.push(mv);
            }
        }
    }
    res
}

/// Returns `true` if the side to move has at least one legal move
pub fn has_legal_moves(b: &Board) -> bool {
    let mut scratch = b.clone();
    let mut sim = Simulator::new(&mut scratch);
    b.pieces(b.side())
        .any(|(from, piece)| !sim.legal_targets(piece, from).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn set(squares: &[&str]) -> SquareSet {
        squares.iter().map(|s| sq(s)).collect()
    }

    fn perft(b: &mut Board, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = legal_moves(b);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut res = 0;
        for mv in &moves {
            let undo = moves::make_move(b, *mv);
            res += perft(b, depth - 1);
            moves::unmake_move(b, *mv, undo);
        }
        res
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(legal_moves(&b).len(), 20);
        assert!(!is_check(&b));
        assert!(has_legal_moves(&b));
        assert_eq!(legal_targets(&b, sq("e1")), Ok(SquareSet::EMPTY));
        assert_eq!(legal_targets(&b, sq("b1")), Ok(set(&["a3", "c3"])));
        assert_eq!(
            legal_targets(&b, sq("e4")),
            Err(MoveError::NoPieceAtOrigin(sq("e4")))
        );
    }

    #[test]
    fn test_perft_initial() {
        let mut b = Board::initial();
        assert_eq!(perft(&mut b, 1), 20);
        assert_eq!(perft(&mut b, 2), 400);
        assert_eq!(perft(&mut b, 3), 8902);
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn test_perft_kiwipete() {
        let mut b =
            Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
                .unwrap();
        assert_eq!(perft(&mut b, 1), 48);
        assert_eq!(perft(&mut b, 2), 2039);
    }

    #[test]
    fn test_perft_endgame() {
        let mut b = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&mut b, 1), 14);
        assert_eq!(perft(&mut b, 2), 191);
        assert_eq!(perft(&mut b, 3), 2812);
    }

    #[test]
    fn test_attacks() {
        let b = Board::from_fen("4k3/8/8/3p4/8/5N2/8/R3K3 w - - 0 1").unwrap();
        // Pawns attack diagonally but not forward
        assert!(is_square_attacked(&b, sq("e4"), Color::Black));
        assert!(is_square_attacked(&b, sq("c4"), Color::Black));
        assert!(!is_square_attacked(&b, sq("d4"), Color::Black));
        // Sliders stop at the first piece
        assert!(is_square_attacked(&b, sq("a8"), Color::White));
        assert!(is_square_attacked(&b, sq("d1"), Color::White));
        assert!(!is_square_attacked(&b, sq("f1"), Color::Black));
        assert_eq!(attackers(&b, sq("d4"), Color::White), set(&["f3"]));
        assert_eq!(attackers(&b, sq("d2"), Color::White), set(&["f3", "e1"]));
    }

    #[test]
    fn test_pinned_piece() {
        // The knight on e4 is pinned by the rook on e8
        let b = Board::from_fen("4r1k1/8/8/8/4N3/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(legal_targets(&b, sq("e4")), Ok(SquareSet::EMPTY));
        assert_eq!(
            legal_targets(&b, sq("e1")),
            Ok(set(&["d1", "d2", "e2", "f1", "f2"]))
        );
    }

    #[test]
    fn test_check_evasions() {
        let b = Board::from_fen("4k3/8/8/8/8/8/3q4/R3K3 w Q - 0 1").unwrap();
        assert!(is_check(&b));
        assert_eq!(checkers(&b), set(&["d2"]));
        // Cannot castle out of check, the king must capture or step aside
        assert_eq!(legal_targets(&b, sq("e1")), Ok(set(&["d2", "f1"])));
        assert_eq!(legal_targets(&b, sq("a1")), Ok(SquareSet::EMPTY));
    }

    #[test]
    fn test_castling_gate() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let b = Board::from_fen(fen).unwrap();
        let targets = legal_targets(&b, sq("e1")).unwrap();
        assert!(targets.contains(sq("g1")));
        assert!(targets.contains(sq("c1")));

        // No rights
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w kq - 0 1").unwrap();
        let targets = legal_targets(&b, sq("e1")).unwrap();
        assert!(!targets.contains(sq("g1")));
        assert!(!targets.contains(sq("c1")));

        // A piece between the king and the rook
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        let targets = legal_targets(&b, sq("e1")).unwrap();
        assert!(!targets.contains(sq("g1")));
        assert!(!targets.contains(sq("c1")));

        // The b1 square may be attacked for queenside castling, but d1 may not
        let b = Board::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(legal_targets(&b, sq("e1")).unwrap().contains(sq("c1")));
        let b = Board::from_fen("3rk3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let targets = legal_targets(&b, sq("e1")).unwrap();
        assert!(!targets.contains(sq("c1")));
        assert!(targets.contains(sq("g1")));

        // The destination is attacked
        let b = Board::from_fen("4k1r1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!legal_targets(&b, sq("e1")).unwrap().contains(sq("g1")));

        // The king is in check
        let b = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(legal_targets(&b, sq("e1")).unwrap().contains(sq("g1")));
        let b = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let targets = legal_targets(&b, sq("e1")).unwrap();
        assert!(!targets.contains(sq("g1")));
        assert!(!targets.contains(sq("c1")));
    }

    #[test]
    fn test_promotions_listed() {
        let b = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = legal_moves(&b);
        let promotes: Vec<_> = moves
            .iter()
            .filter(|mv| mv.src() == sq("a7"))
            .map(|mv| mv.promote())
            .collect();
        assert_eq!(
            promotes,
            vec![
                Some(PieceKind::Queen),
                Some(PieceKind::Rook),
                Some(PieceKind::Bishop),
                Some(PieceKind::Knight)
            ]
        );
    }

    #[test]
    fn test_stalemate_and_mate() {
        let b = Board::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1").unwrap();
        assert!(!has_legal_moves(&b));
        assert!(!is_check(&b));

        let b = Board::from_fen("rn1q1bnr/ppp1kB1p/3p2p1/3NN3/4P3/8/PPPP1PPP/R1BbK2R b KQ - 2 7")
            .unwrap();
        assert!(!has_legal_moves(&b));
        assert!(is_check(&b));
    }
}
