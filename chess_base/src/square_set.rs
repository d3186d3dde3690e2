use crate::types::Square;
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::fmt;
use std::iter::{FromIterator, IntoIterator};

/// Set of squares, stored as a 64-bit mask indexed by [`Square::index`]
#[derive(
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct SquareSet(u64);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(0);
    pub const FULL: SquareSet = SquareSet(u64::MAX);

    pub const fn from_raw(val: u64) -> SquareSet {
        SquareSet(val)
    }

    pub const fn from_square(sq: Square) -> SquareSet {
        SquareSet(1_u64 << sq.index())
    }

    pub const fn with(self, sq: Square) -> SquareSet {
        SquareSet(self.0 | (1_u64 << sq.index()))
    }

    pub const fn without(self, sq: Square) -> SquareSet {
        SquareSet(self.0 & !(1_u64 << sq.index()))
    }

    pub fn insert(&mut self, sq: Square) {
        *self = self.with(sq);
    }

    pub fn remove(&mut self, sq: Square) {
        *self = self.without(sq);
    }

    pub const fn contains(&self, sq: Square) -> bool {
        ((self.0 >> sq.index()) & 1) != 0
    }

    pub const fn as_raw(&self) -> u64 {
        self.0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> Iter {
        Iter(self.0)
    }
}

impl From<SquareSet> for u64 {
    fn from(s: SquareSet) -> u64 {
        s.0
    }
}

impl From<Square> for SquareSet {
    fn from(sq: Square) -> SquareSet {
        SquareSet::from_square(sq)
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "SquareSet({})", self)
    }
}

/// Formats the set as a sorted list of squares, like `{a1, e4}`
impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{{")?;
        for (idx, sq) in self.iter().enumerate() {
            if idx != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", sq)?;
        }
        write!(f, "}}")
    }
}

pub struct Iter(u64);

impl Iterator for Iter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0.wrapping_sub(1_u64);
        Some(Square::from_index(bit as usize))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> SquareSet {
        iter.into_iter()
            .fold(SquareSet::EMPTY, |set, sq| set.with(sq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_iter() {
        let set = SquareSet::EMPTY
            .with(Square::from_parts(File::A, Rank::R4))
            .with(Square::from_parts(File::E, Rank::R2))
            .with(Square::from_parts(File::F, Rank::R3));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![
                Square::from_parts(File::E, Rank::R2),
                Square::from_parts(File::F, Rank::R3),
                Square::from_parts(File::A, Rank::R4),
            ],
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_bitops() {
        let sa = Square::from_parts(File::A, Rank::R4);
        let sb = Square::from_parts(File::E, Rank::R2);
        let sc = Square::from_parts(File::F, Rank::R3);

        let s1 = SquareSet::EMPTY.with(sa).with(sb);
        let s2 = SquareSet::EMPTY.with(sb).with(sc);
        assert_eq!(s1 & s2, SquareSet::EMPTY.with(sb));
        assert_eq!(s1 | s2, SquareSet::EMPTY.with(sa).with(sb).with(sc));
        assert_eq!(s1 ^ s2, SquareSet::EMPTY.with(sa).with(sc));

        assert_eq!((!s1).iter().count(), 62);
        assert_eq!((!s1).len(), 62);
        assert!(!(!s1).contains(sa));
    }

    #[test]
    fn test_collect_and_format() {
        let set: SquareSet = ["h8", "a1", "e4"]
            .iter()
            .map(|s| s.parse::<Square>().unwrap())
            .collect();
        assert_eq!(set.to_string(), "{a1, e4, h8}");
        assert_eq!(SquareSet::EMPTY.to_string(), "{}");
    }
}
