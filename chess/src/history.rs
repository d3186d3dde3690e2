//! History of the game: repetition table, move log and undo

use crate::board::{Board, Fingerprint};
use crate::moves::Move;
use rookery_base::types::Color;

use std::collections::HashMap;
use std::fmt;

/// Completed ply in the move log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    mv: Move,
    san: String,
    before: Board,
}

impl Entry {
    #[inline]
    pub fn mv(&self) -> Move {
        self.mv
    }

    #[inline]
    pub fn san(&self) -> &str {
        &self.san
    }

    /// Position before this move
    #[inline]
    pub fn before(&self) -> &Board {
        &self.before
    }
}

/// Keeps the positions and moves of the game
///
/// The number of recorded positions is always equal to the number of logged moves. The initial
/// position of the game is not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    counts: HashMap<Fingerprint, usize>,
    positions: Vec<Fingerprint>,
    log: Vec<Entry>,
}

impl History {
    pub fn new() -> History {
        History::default()
    }

    /// Increments the occurrence counter of the position
    pub fn record_position(&mut self, fp: Fingerprint) {
        *self.counts.entry(fp).or_insert(0) += 1;
        self.positions.push(fp);
    }

    /// Appends the move to the log together with the position before it
    pub fn record_move(&mut self, mv: Move, san: String, before: Board) {
        self.log.push(Entry { mv, san, before });
    }

    /// Returns how many times the position occurred after a move
    pub fn repetition_count(&self, fp: &Fingerprint) -> usize {
        self.counts.get(fp).copied().unwrap_or(0)
    }

    /// Returns `true` if the last recorded position occurred at least `limit` times
    pub fn is_repetition(&self, limit: usize) -> bool {
        self.positions
            .last()
            .map_or(false, |fp| self.repetition_count(fp) >= limit)
    }

    /// Threefold case of [`History::is_repetition`]
    pub fn is_triple_repetition(&self) -> bool {
        self.is_repetition(3)
    }

    /// Removes the last move and puts the position before it on the board
    ///
    /// Returns `None` if there are no moves.
    pub fn undo_last_move(&mut self, board: &mut Board) -> Option<Move> {
        let entry = self.log.pop()?;
        if let Some(fp) = self.positions.pop() {
            if let Some(count) = self.counts.get_mut(&fp) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(&fp);
                }
            }
        }
        *board = entry.before;
        Some(entry.mv)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.log.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.log
    }

    #[inline]
    pub fn last(&self) -> Option<&Entry> {
        self.log.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = Move> + '_ {
        self.log.iter().map(|e| e.mv)
    }

    /// Returns the wrapper which formats the log as numbered SAN text, like `1. e4 e5 2. Nf3`
    pub fn san_list(&self) -> SanList<'_> {
        SanList(self)
    }

    /// Returns the wrapper which formats the log as space-separated UCI moves
    pub fn uci_list(&self) -> UciList<'_> {
        UciList(self)
    }
}

pub struct SanList<'a>(&'a History);

impl<'a> fmt::Display for SanList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, entry) in self.0.log.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            let b = &entry.before;
            match b.side() {
                Color::White => write!(f, "{}. ", b.fullmove_number())?,
                Color::Black if i == 0 => write!(f, "{}... ", b.fullmove_number())?,
                Color::Black => {}
            }
            write!(f, "{}", entry.san)?;
        }
        Ok(())
    }
}

pub struct UciList<'a>(&'a History);

impl<'a> fmt::Display for UciList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, m) in self.0.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", m)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves;
    use rookery_base::types::Square;

    fn play(history: &mut History, board: &mut Board, uci: &str, san: &str) {
        let src: Square = uci[0..2].parse().unwrap();
        let dst: Square = uci[2..4].parse().unwrap();
        let mv = Move::classify(board, src, dst).unwrap();
        let before = board.clone();
        let _ = moves::make_move(board, mv);
        history.record_position(board.fingerprint());
        history.record_move(mv, san.to_string(), before);
    }

    #[test]
    fn test_record_and_undo() {
        let mut history = History::new();
        let mut board = Board::initial();
        play(&mut history, &mut board, "e2e4", "e4");
        play(&mut history, &mut board, "e7e5", "e5");
        play(&mut history, &mut board, "g1f3", "Nf3");
        assert_eq!(history.len(), 3);
        assert_eq!(history.repetition_count(&board.fingerprint()), 1);
        assert_eq!(history.san_list().to_string(), "1. e4 e5 2. Nf3");
        assert_eq!(history.uci_list().to_string(), "e2e4 e7e5 g1f3");

        let mv = history.undo_last_move(&mut board).unwrap();
        assert_eq!(mv.to_string(), "g1f3");
        assert_eq!(history.len(), 2);
        assert_eq!(
            board.as_fen(),
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2"
        );

        let _ = history.undo_last_move(&mut board);
        let _ = history.undo_last_move(&mut board);
        assert_eq!(board, Board::initial());
        assert!(history.is_empty());
        assert_eq!(history, History::new());
        assert_eq!(history.undo_last_move(&mut board), None);
    }

    #[test]
    fn test_repetition() {
        let mut history = History::new();
        let mut board = Board::initial();
        for _ in 0..2 {
            play(&mut history, &mut board, "g1f3", "Nf3");
            play(&mut history, &mut board, "g8f6", "Nf6");
            play(&mut history, &mut board, "f3g1", "Ng1");
            play(&mut history, &mut board, "f6g8", "Ng8");
        }
        assert!(!history.is_triple_repetition());
        assert!(history.is_repetition(2));
        assert_eq!(history.repetition_count(&board.fingerprint()), 2);
        play(&mut history, &mut board, "g1f3", "Nf3");
        assert!(history.is_triple_repetition());
        assert!(!history.is_repetition(4));

        let _ = history.undo_last_move(&mut board);
        assert!(!history.is_triple_repetition());
        assert!(history.is_repetition(2));
        assert!(!History::new().is_repetition(1));
    }

    #[test]
    fn test_black_starts() {
        let mut history = History::new();
        let mut board =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap();
        play(&mut history, &mut board, "e7e5", "e5");
        play(&mut history, &mut board, "g1f3", "Nf3");
        assert_eq!(history.san_list().to_string(), "1... e5 2. Nf3");
    }
}
