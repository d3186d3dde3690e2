//! Game state evaluation

use crate::board::Board;
use crate::history::History;
use crate::validator;
use rookery_base::types::{Color, PieceKind};

use derive_more::Display;

/// State of the game after the last completed move
///
/// All the states except [`GameState::InProgress`] and [`GameState::Check`] are terminal.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    #[display(fmt = "in progress")]
    InProgress,
    #[display(fmt = "check")]
    Check,
    #[display(fmt = "checkmate")]
    Checkmate,
    #[display(fmt = "draw by stalemate")]
    StalemateDraw,
    #[display(fmt = "draw by insufficient material")]
    InsufficientMaterialDraw,
    #[display(fmt = "draw by repetition")]
    RepetitionDraw,
    #[display(fmt = "draw by fifty-move rule")]
    FiftyMoveDraw,
}

impl GameState {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(*self, GameState::InProgress | GameState::Check)
    }

    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(
            *self,
            GameState::StalemateDraw
                | GameState::InsufficientMaterialDraw
                | GameState::RepetitionDraw
                | GameState::FiftyMoveDraw
        )
    }
}

/// Rule thresholds used by the evaluator
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GameOptions {
    /// The game is drawn when the same position occurs this many times
    pub repetition_limit: usize,
    /// The game is drawn when the half-move clock reaches this value
    pub fifty_move_limit: u16,
}

impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            repetition_limit: 3,
            fifty_move_limit: 100,
        }
    }
}

/// Returns `true` if neither side can ever checkmate, regardless of the moves
///
/// Such positions are:
///
/// - king vs king
/// - king and a single knight or bishop vs king
/// - kings and bishops, all standing on squares of the same color
pub fn is_insufficient_material(b: &Board) -> bool {
    let mut minors = 0;
    let mut knights = 0;
    let mut light_bishops = 0;
    let mut dark_bishops = 0;
    for color in Color::ALL {
        for (sq, piece) in b.pieces(color) {
            match piece.kind {
                PieceKind::King => {}
                PieceKind::Knight => {
                    knights += 1;
                    minors += 1;
                }
                PieceKind::Bishop => {
                    if sq.is_light() {
                        light_bishops += 1;
                    } else {
                        dark_bishops += 1;
                    }
                    minors += 1;
                }
                PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
            }
        }
    }

    if minors <= 1 {
        return true;
    }
    knights == 0 && (light_bishops == 0 || dark_bishops == 0)
}

/// Derives the state of the game from the position and the history of the game
///
/// When several states apply at once, the first one in the following order wins: checkmate,
/// stalemate, insufficient material, repetition, fifty-move rule, check.
pub fn evaluate(b: &Board, history: &History, options: &GameOptions) -> GameState {
    let in_check = validator::is_check(b);
    if !validator::has_legal_moves(b) {
        return if in_check {
            GameState::Checkmate
        } else {
            GameState::StalemateDraw
        };
    }
    if is_insufficient_material(b) {
        return GameState::InsufficientMaterialDraw;
    }
    if history.is_repetition(options.repetition_limit) {
        return GameState::RepetitionDraw;
    }
    if b.halfmove_clock() >= options.fifty_move_limit {
        return GameState::FiftyMoveDraw;
    }
    if in_check {
        return GameState::Check;
    }
    GameState::InProgress
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(fen: &str) -> GameState {
        let b = Board::from_fen(fen).unwrap();
        evaluate(&b, &History::new(), &GameOptions::default())
    }

    #[test]
    fn test_states() {
        assert_eq!(eval("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"), GameState::InProgress);
        assert_eq!(
            eval("rn1q1bnr/ppp1kB1p/3p2p1/3NN3/4P3/8/PPPP1PPP/R1BbK2R b KQ - 2 7"),
            GameState::Checkmate
        );
        assert_eq!(eval("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1"), GameState::StalemateDraw);
        assert_eq!(
            eval("rnbqkbnr/pppp1ppp/8/4p3/4P3/5Q2/PPPP1PPP/RNB1KBNR w KQkq - 0 3"),
            GameState::InProgress
        );
        assert_eq!(
            eval("rnb1kbnr/pppp1ppp/8/4p3/4P2q/8/PPPP1PPP/RNBQKBNR w KQkq - 1 3"),
            GameState::InProgress
        );
        assert_eq!(
            eval("rnbqkbnr/ppp2ppp/3p4/1B2p3/4P3/8/PPPP1PPP/RNBQK1NR b KQkq - 1 3"),
            GameState::Check
        );
    }

    #[test]
    fn test_insufficient_material() {
        assert_eq!(eval("7K/8/8/8/8/8/7k/8 w - - 0 1"), GameState::InsufficientMaterialDraw);
        assert_eq!(eval("7K/8/5n2/8/8/8/7k/8 w - - 0 1"), GameState::InsufficientMaterialDraw);
        assert_eq!(eval("7K/8/5b2/8/8/8/7k/8 w - - 0 1"), GameState::InsufficientMaterialDraw);
        assert_eq!(eval("7K/8/8/8/8/8/1B5k/8 w - - 0 1"), GameState::InsufficientMaterialDraw);
        // Bishops on squares of the same color
        assert_eq!(eval("7K/8/8/2b5/8/8/1B5k/8 w - - 0 1"), GameState::InsufficientMaterialDraw);
        assert_eq!(
            eval("2K4k/8/8/8/B1B5/1B1B4/B1B5/1B1B4 w - - 0 1"),
            GameState::InsufficientMaterialDraw
        );

        // Bishops on squares of different colors
        assert_eq!(eval("7K/8/8/8/2b5/8/1B5k/8 w - - 0 1"), GameState::InProgress);
        assert_eq!(eval("NNK4k/8/8/8/8/8/8/8 w - - 0 1"), GameState::InProgress);
        assert_eq!(eval("7K/8/8/8/8/8/1N5k/7n w - - 0 1"), GameState::InProgress);
        assert_eq!(eval("7K/8/8/8/8/8/7k/R7 w - - 0 1"), GameState::InProgress);
        assert_eq!(eval("7K/8/8/8/8/8/q6k/8 w - - 0 1"), GameState::InProgress);
        assert_eq!(eval("7K/8/8/8/8/8/1P5k/8 w - - 0 1"), GameState::InProgress);
    }

    #[test]
    fn test_fifty_moves() {
        assert_eq!(eval("NNK4k/8/8/8/8/8/8/8 w - - 99 80"), GameState::InProgress);
        assert_eq!(eval("NNK4k/8/8/8/8/8/8/8 w - - 100 80"), GameState::FiftyMoveDraw);

        let b = Board::from_fen("NNK4k/8/8/8/8/8/8/8 w - - 100 80").unwrap();
        let options = GameOptions {
            fifty_move_limit: 150,
            ..GameOptions::default()
        };
        assert_eq!(evaluate(&b, &History::new(), &options), GameState::InProgress);
    }

    #[test]
    fn test_precedence() {
        // Checkmate on the hundredth half-move is still a checkmate
        assert_eq!(
            eval("7k/6Q1/6K1/8/8/8/8/8 b - - 100 90"),
            GameState::Checkmate
        );
        // Insufficient material wins over the fifty-move rule
        assert_eq!(eval("7K/8/8/8/8/8/7k/8 w - - 120 90"), GameState::InsufficientMaterialDraw);
        // The fifty-move rule wins over check
        assert_eq!(eval("4k3/8/8/8/8/8/8/4R1K1 b - - 99 90"), GameState::Check);
        assert_eq!(eval("4k3/8/8/8/8/8/8/4R1K1 b - - 100 90"), GameState::FiftyMoveDraw);
    }

    #[test]
    fn test_terminal() {
        assert!(!GameState::InProgress.is_terminal());
        assert!(!GameState::Check.is_terminal());
        assert!(GameState::Checkmate.is_terminal());
        assert!(!GameState::Checkmate.is_draw());
        assert!(GameState::RepetitionDraw.is_draw());
        assert_eq!(GameState::FiftyMoveDraw.to_string(), "draw by fifty-move rule");
    }
}
