use crate::types::{CastlingSide, Color, File, Rank, Square};

/// Rank on which the king and rooks of color `c` start
pub const fn home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn pawn_home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn promotion_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank where a pawn of color `c` must stand to capture en passant
pub const fn enpassant_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R5,
        Color::Black => Rank::R4,
    }
}

/// Rank of the square a pawn of color `c` lands on when capturing en passant
pub const fn enpassant_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Rank delta of a single pawn step
pub const fn pawn_forward(c: Color) -> isize {
    match c {
        Color::White => 1,
        Color::Black => -1,
    }
}

pub const fn king_home(c: Color) -> Square {
    Square::from_parts(File::E, home_rank(c))
}

pub const fn rook_home(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Square::from_parts(file, home_rank(c))
}

/// Where the king lands after castling
pub const fn castling_king_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Square::from_parts(file, home_rank(c))
}

/// Where the rook lands after castling. This is also the square the king passes over.
pub const fn castling_rook_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Square::from_parts(file, home_rank(c))
}

/// Files between the king and the rook which must be empty for castling
pub const fn castling_gap_files(s: CastlingSide) -> &'static [File] {
    match s {
        CastlingSide::King => &[File::F, File::G],
        CastlingSide::Queen => &[File::B, File::C, File::D],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castling_squares() {
        assert_eq!(king_home(Color::White).to_string(), "e1");
        assert_eq!(king_home(Color::Black).to_string(), "e8");
        assert_eq!(
            castling_king_dst(Color::White, CastlingSide::Queen).to_string(),
            "c1"
        );
        assert_eq!(
            castling_rook_dst(Color::Black, CastlingSide::King).to_string(),
            "f8"
        );
        assert_eq!(
            rook_home(Color::Black, CastlingSide::Queen).to_string(),
            "a8"
        );
    }
}
