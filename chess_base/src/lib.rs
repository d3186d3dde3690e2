//! # Base types for rookery
//!
//! This is an auxiliary crate for `rookery` which contains the board vocabulary: squares, colors,
//! pieces, castling rights and square sets.
//!
//! Normally you don't want to use this crate directly. Everything here is re-exported from `rookery`.

pub mod geometry;
pub mod square_set;
pub mod types;
