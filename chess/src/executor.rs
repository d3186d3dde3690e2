//! Committing validated moves to the board

use crate::board::Board;
use crate::history::History;
use crate::moves::{self, Move, MoveError};
use crate::san::San;
use crate::validator;
use rookery_base::types::{PieceKind, Square};

use tracing::debug;

/// Pawn move to the last rank which waits for the promotion choice
///
/// The board already has the pawn on the last rank, but the move is neither logged nor evaluated
/// until the promotion is completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPromotion {
    mv: Move,
    before: Board,
}

impl PendingPromotion {
    /// Square where the pawn is promoted
    #[inline]
    pub fn square(&self) -> Square {
        self.mv.dst()
    }

    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// Result of [`execute()`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The move is applied and recorded in the history
    Applied(Move),
    /// The pawn reached the last rank, call [`complete_promotion()`] to finish the move
    Pending(PendingPromotion),
}

fn commit(board: &mut Board, history: &mut History, before: Board, mv: Move) {
    let san = San::from_move(mv, &before).to_string();
    history.record_position(board.fingerprint());
    debug!(uci = %mv, san = %san, "move applied");
    history.record_move(mv, san, before);
}

/// Moves the piece from `src` to `dst`
///
/// The move is checked against the legal targets of the piece, so nothing is changed if it fails.
pub fn execute(
    board: &mut Board,
    history: &mut History,
    src: Square,
    dst: Square,
) -> Result<Step, MoveError> {
    let piece = board.get(src).ok_or(MoveError::NoPieceAtOrigin(src))?;
    if piece.color != board.side() {
        return Err(MoveError::NotCallersPiece(src));
    }
    if !validator::legal_targets(board, src)?.contains(dst) {
        return Err(MoveError::IllegalMove { src, dst });
    }

    let mv = Move::classify(board, src, dst)?;
    let before = board.clone();
    let _ = moves::make_move(board, mv);
    if mv.is_promotion() {
        debug!(uci = %mv, "promotion pending");
        return Ok(Step::Pending(PendingPromotion { mv, before }));
    }
    commit(board, history, before, mv);
    Ok(Step::Applied(mv))
}

/// Finishes the pending promotion, replacing the pawn with a piece of kind `kind`
///
/// On error, the board stays as it is and the promotion remains pending.
pub fn complete_promotion(
    board: &mut Board,
    history: &mut History,
    pending: &PendingPromotion,
    kind: PieceKind,
) -> Result<Move, MoveError> {
    if !kind.is_promotion_choice() {
        return Err(MoveError::InvalidPromotionChoice(kind));
    }
    let mv = pending.mv.with_promote(kind);
    let mut after = pending.before.clone();
    let _ = moves::make_move(&mut after, mv);
    *board = after;
    commit(board, history, pending.before.clone(), mv);
    Ok(mv)
}

/// Takes back the pawn move which waits for the promotion choice
pub(crate) fn cancel_promotion(board: &mut Board, pending: PendingPromotion) {
    debug!(uci = %pending.mv, "promotion cancelled");
    *board = pending.before;
}
