//! Chess rule engine
//!
//! The engine validates, executes and evaluates moves proposed by humans or automated players.
//! The entry point is [`Game`], which owns the [`Board`] and keeps the history of the game.

pub mod board;
pub mod evaluator;
pub mod executor;
pub mod game;
pub mod history;
pub mod moves;
pub mod piece;
pub mod san;
pub mod source;
pub mod validator;

pub use rookery_base::geometry;
pub use rookery_base::square_set::SquareSet;
pub use rookery_base::types::{
    CastlingRights, CastlingSide, Color, File, Piece, PieceKind, Rank, Square, SquareError,
};

pub use board::{Board, FenParseError, Fingerprint, PrettyStyle, ValidateError};
pub use evaluator::{GameOptions, GameState};
pub use game::{Execution, Game, Snapshot};
pub use history::History;
pub use moves::{Move, MoveError, MoveKind, MoveList, UciMove};
pub use piece::PieceMoves;
pub use san::San;
pub use source::{MoveSource, Proposal};
