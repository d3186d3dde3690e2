//! Contract for automated move sources

use crate::board::Board;
use crate::moves::{Move, UciMove};
use rookery_base::types::{PieceKind, Square};

/// Move proposed by a [`MoveSource`]
///
/// The proposal is not trusted. It takes the same path through validation as a move entered by
/// a human.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Proposal {
    pub src: Square,
    pub dst: Square,
    /// Promotion choice, used only if the move turns out to be a promotion
    pub promotion: Option<PieceKind>,
}

impl From<UciMove> for Proposal {
    fn from(u: UciMove) -> Self {
        Proposal {
            src: u.src,
            dst: u.dst,
            promotion: u.promote,
        }
    }
}

impl From<Move> for Proposal {
    fn from(mv: Move) -> Self {
        mv.uci().into()
    }
}

/// Something that chooses moves for one of the players, like an engine or a network peer
pub trait MoveSource {
    /// Proposes a move in position `board`, or returns `None` to give up
    fn propose(&mut self, board: &Board) -> Option<Proposal>;
}

impl<F> MoveSource for F
where
    F: FnMut(&Board) -> Option<Proposal>,
{
    fn propose(&mut self, board: &Board) -> Option<Proposal> {
        self(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_uci() {
        let u: UciMove = "e7e8n".parse().unwrap();
        let p = Proposal::from(u);
        assert_eq!(p.src, "e7".parse().unwrap());
        assert_eq!(p.dst, "e8".parse().unwrap());
        assert_eq!(p.promotion, Some(PieceKind::Knight));
    }

    #[test]
    fn test_closure_source() {
        let mut source = |b: &Board| {
            crate::validator::legal_moves(b)
                .first()
                .map(|mv| Proposal::from(*mv))
        };
        let p = source.propose(&Board::initial()).unwrap();
        assert_eq!(p.promotion, None);
        assert!(crate::validator::is_legal(&Board::initial(), p.src, p.dst).unwrap());
    }
}
