//! Game which owns the board and drives the move lifecycle

use crate::board::{Board, FenParseError};
use crate::evaluator::{self, GameOptions, GameState};
use crate::executor::{self, PendingPromotion, Step};
use crate::history::{History, SanList};
use crate::moves::{Move, MoveError, MoveList};
use crate::source::MoveSource;
use crate::validator;
use rookery_base::square_set::SquareSet;
use rookery_base::types::{CastlingRights, Color, Piece, PieceKind, Square};

use tracing::{debug, info};

/// Result of [`Game::execute()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Execution {
    /// The move is completed
    Applied(Move),
    /// The pawn reached the given square on the last rank. [`Game::complete_promotion()`] must be
    /// called before anything else.
    PromotionPending(Square),
}

/// Read-only view of the game for presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub cells: [Option<Piece>; 64],
    pub side: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub last_move: Option<Move>,
    pub captured: Vec<Piece>,
    pub state: GameState,
    pub pending_promotion: Option<Square>,
}

impl Snapshot {
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }
}

/// Chess game
///
/// The game is the only owner of the board. Every change of the board goes through
/// [`Game::execute()`], [`Game::complete_promotion()`] or [`Game::undo_last_move()`], and the state
/// of the game is evaluated after each completed move.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: History,
    pending: Option<PendingPromotion>,
    state: GameState,
    options: GameOptions,
}

fn rejected(e: MoveError) -> MoveError {
    debug!(error = %e, "request rejected");
    e
}

impl Game {
    /// Creates a game from the initial position with the official rules
    pub fn new() -> Game {
        Game::with_options(Board::initial(), GameOptions::default())
    }

    pub fn from_fen(fen: &str) -> Result<Game, FenParseError> {
        Ok(Game::with_options(
            Board::from_fen(fen)?,
            GameOptions::default(),
        ))
    }

    pub fn with_options(board: Board, options: GameOptions) -> Game {
        let history = History::new();
        let state = evaluator::evaluate(&board, &history, &options);
        Game {
            board,
            history,
            pending: None,
            state,
            options,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[inline]
    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Returns the side which won by checkmate
    pub fn winner(&self) -> Option<Color> {
        match self.state {
            GameState::Checkmate => Some(self.board.side().inv()),
            _ => None,
        }
    }

    /// Returns the square of the pawn waiting for the promotion choice
    #[inline]
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending.as_ref().map(PendingPromotion::square)
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut cells = [None; 64];
        for sq in Square::iter() {
            cells[sq.index()] = self.board.get(sq);
        }
        Snapshot {
            cells,
            side: self.board.side(),
            castling: self.board.castling(),
            en_passant: self.board.en_passant(),
            halfmove_clock: self.board.halfmove_clock(),
            fullmove_number: self.board.fullmove_number(),
            last_move: self.board.last_move(),
            captured: self.board.captured().to_vec(),
            state: self.state,
            pending_promotion: self.pending_promotion(),
        }
    }

    fn ensure_no_pending(&self) -> Result<(), MoveError> {
        match self.pending {
            Some(_) => Err(rejected(MoveError::PromotionPending)),
            None => Ok(()),
        }
    }

    fn update_state(&mut self) {
        self.state = evaluator::evaluate(&self.board, &self.history, &self.options);
        if self.state.is_terminal() {
            info!(state = %self.state, fen = %self.board, "game over");
        }
    }

    /// Returns the squares where the piece on `from` may legally move
    ///
    /// Pieces of both colors can be queried.
    pub fn legal_targets<S>(&self, from: S) -> Result<SquareSet, MoveError>
    where
        S: TryInto<Square>,
        MoveError: From<S::Error>,
    {
        self.ensure_no_pending()?;
        let from = from.try_into().map_err(|e| rejected(e.into()))?;
        validator::legal_targets(&self.board, from).map_err(rejected)
    }

    /// Returns all the legal moves of the side to move
    pub fn legal_moves(&self) -> Result<MoveList, MoveError> {
        self.ensure_no_pending()?;
        Ok(validator::legal_moves(&self.board))
    }

    /// Moves the piece from `src` to `dst`
    ///
    /// If the pawn reaches the last rank, the move is not finished until
    /// [`Game::complete_promotion()`] is called. If an error is returned, nothing is changed.
    pub fn execute<S>(&mut self, src: S, dst: S) -> Result<Execution, MoveError>
    where
        S: TryInto<Square>,
        MoveError: From<S::Error>,
    {
        self.ensure_no_pending()?;
        if self.state.is_terminal() {
            return Err(rejected(MoveError::GameOver(self.state)));
        }
        let src = src.try_into().map_err(|e| rejected(e.into()))?;
        let dst = dst.try_into().map_err(|e| rejected(e.into()))?;

        match executor::execute(&mut self.board, &mut self.history, src, dst).map_err(rejected)? {
            Step::Applied(mv) => {
                self.update_state();
                Ok(Execution::Applied(mv))
            }
            Step::Pending(pending) => {
                let sq = pending.square();
                self.pending = Some(pending);
                Ok(Execution::PromotionPending(sq))
            }
        }
    }

    /// Finishes the pending promotion, replacing the pawn with a piece of kind `kind`
    pub fn complete_promotion(&mut self, kind: PieceKind) -> Result<Move, MoveError> {
        let pending = self
            .pending
            .as_ref()
            .ok_or_else(|| rejected(MoveError::NoPromotionPending))?;
        let mv = executor::complete_promotion(&mut self.board, &mut self.history, pending, kind)
            .map_err(rejected)?;
        self.pending = None;
        self.update_state();
        Ok(mv)
    }

    /// Takes back the last completed move
    ///
    /// Returns `None` if no moves were made in this game. The state of the game is rewound
    /// together with the board.
    pub fn undo_last_move(&mut self) -> Result<Option<Move>, MoveError> {
        self.ensure_no_pending()?;
        let mv = match self.history.undo_last_move(&mut self.board) {
            Some(mv) => mv,
            None => return Ok(None),
        };
        self.state = evaluator::evaluate(&self.board, &self.history, &self.options);
        debug!(uci = %mv, "move undone");
        Ok(Some(mv))
    }

    /// Returns the move log as numbered SAN text, like `1. e4 e5 2. Nf3 Nc6`
    #[inline]
    pub fn move_log(&self) -> SanList<'_> {
        self.history.san_list()
    }

    /// Asks `source` for a move and plays it
    ///
    /// The proposal goes through the same checks as any other move. If the move is a promotion
    /// and the proposal does not name the piece, the pawn is promoted to a queen. Returns `None`
    /// if the source has no move to offer.
    pub fn play_from<M: MoveSource + ?Sized>(
        &mut self,
        source: &mut M,
    ) -> Result<Option<Move>, MoveError> {
        self.ensure_no_pending()?;
        let proposal = match source.propose(&self.board) {
            Some(p) => p,
            None => return Ok(None),
        };
        match self.execute(proposal.src, proposal.dst)? {
            Execution::Applied(mv) => Ok(Some(mv)),
            Execution::PromotionPending(_) => {
                let kind = proposal.promotion.unwrap_or(PieceKind::Queen);
                match self.complete_promotion(kind) {
                    Ok(mv) => Ok(Some(mv)),
                    Err(e) => {
                        if let Some(pending) = self.pending.take() {
                            executor::cancel_promotion(&mut self.board, pending);
                        }
                        Err(e)
                    }
                }
            }
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
