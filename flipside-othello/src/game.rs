//! Implements game-level Othello logic.
//!
//! A [`Game`] pairs a [`Board`] with whose turn it is, and keeps that state
//! consistent with the board: a side with no legal move is skipped, and a
//! position where neither side can move is over.

use crate::board::Board;
use crate::disk::Disk;
use derive_more::{Display, Error};
use std::fmt;

/// Whose turn it is, or how the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    BeingPlayed { turn: Disk },
    /// `winner` is `None` on a tie.
    Over { winner: Option<Disk> },
}

impl GameState {
    /// Compute the state of `board` when `turn` is nominally to move.
    fn normalized(board: &Board, turn: Disk) -> Self {
        if board.has_valid_move(turn) {
            GameState::BeingPlayed { turn }
        } else if board.has_valid_move(!turn) {
            GameState::BeingPlayed { turn: !turn }
        } else {
            GameState::Over {
                winner: board.side_with_more_disks(),
            }
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameState::BeingPlayed { turn } => write!(f, "{} to move", turn),
            GameState::Over { winner: Some(winner) } => write!(f, "{} won", winner),
            GameState::Over { winner: None } => f.write_str("Tied"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum PlacementError {
    #[display(fmt = "the game is over")]
    IllegalState,
    #[display(fmt = "cannot place a disk at ({}, {})", x, y)]
    IllegalPosition { x: i32, y: i32 },
}

/// A board and the state derived from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Game {
    board: Board,
    state: GameState,
}

impl Default for Game {
    /// The standard 8x8 start with dark to move.
    fn default() -> Self {
        Self::new(Board::default(), Disk::Dark)
    }
}

impl Game {
    /// Start from `board` with `turn` nominally to move.
    /// The state is normalized, so `turn` is skipped if it has no move.
    pub fn new(board: Board, turn: Disk) -> Self {
        let state = GameState::normalized(&board, turn);
        Self { board, state }
    }

    /// Start from `board` with dark nominally to move.
    pub fn from_board(board: Board) -> Self {
        Self::new(board, Disk::Dark)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    /// The side to move, or `None` once the game is over.
    pub fn turn(&self) -> Option<Disk> {
        match self.state {
            GameState::BeingPlayed { turn } => Some(turn),
            GameState::Over { .. } => None,
        }
    }

    /// The winner of a finished game. `None` while playing or on a tie.
    pub fn winner(&self) -> Option<Disk> {
        match self.state {
            GameState::BeingPlayed { .. } => None,
            GameState::Over { winner } => winner,
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Over { .. })
    }

    /// Place a disk for the side to move and hand the turn to the other side.
    pub fn place_disk_at(&mut self, x: i32, y: i32) -> Result<(), PlacementError> {
        let turn = self.turn().ok_or(PlacementError::IllegalState)?;

        self.board
            .place(turn, x, y)
            .map_err(|_| PlacementError::IllegalPosition { x, y })?;

        self.state = GameState::normalized(&self.board, !turn);
        Ok(())
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board.pretty())?;
        write!(f, "{}", self.state)
    }
}
