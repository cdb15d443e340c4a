//! `flipside-othello` implements the rules of Reversi (Othello) on boards of any even size.
//!
//! This package implements two levels of abstraction:
//!
//!  - [`Board`] is a plain grid of [`Disk`]s with the placement and flipping rules.
//!    It does not know whose turn it is.
//!  - [`Game`] pairs a board with a [`GameState`], skipping sides that must pass and
//!    detecting the end of the game.

pub mod test_utils;

mod board;
mod coord;
mod disk;
mod game;
mod utils;

pub use board::*;
pub use coord::*;
pub use disk::*;
pub use game::*;

/// The number of spaces on one edge of a standard board.
pub const DEFAULT_EDGE_LENGTH: i32 = 8;
