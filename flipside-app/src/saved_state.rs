//! A snapshot of a game in progress and its text format.
//!
//! The first line holds three symbols: whose turn it is (`x`, `o`, or `-` once
//! the game is over), then the dark and light player modes (`0` manual, `1`
//! computer). The remaining lines are the board, as written by [`Board`]'s
//! `Display` impl.

use crate::delegate::PlayerMode;
use derive_more::{Display, Error};
use flipside_othello::{Board, Disk, ParseBoardError, ParseDiskError};
use std::str;

/// Everything needed to resume a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedState {
    /// `None` once the game is over.
    pub turn: Option<Disk>,
    pub dark_player: PlayerMode,
    pub light_player: PlayerMode,
    pub board: Board,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum FormatError {
    #[display(fmt = "saved game is not valid UTF-8")]
    NotUtf8,
    #[display(fmt = "saved game has no header line")]
    MissingHeader,
    #[display(fmt = "unexpected header symbol {:?}", symbol)]
    Header { symbol: Option<char> },
    #[display(fmt = "bad saved board: {}", _0)]
    Board(ParseBoardError),
}

impl From<ParseBoardError> for FormatError {
    fn from(error: ParseBoardError) -> Self {
        FormatError::Board(error)
    }
}

impl From<ParseDiskError> for FormatError {
    fn from(error: ParseDiskError) -> Self {
        FormatError::Header {
            symbol: Some(error.symbol),
        }
    }
}

fn mode_symbol(mode: PlayerMode) -> char {
    match mode {
        PlayerMode::Manual => '0',
        PlayerMode::Computer => '1',
    }
}

fn mode_from_symbol(symbol: Option<char>) -> Result<PlayerMode, FormatError> {
    match symbol {
        Some('0') => Ok(PlayerMode::Manual),
        Some('1') => Ok(PlayerMode::Computer),
        _ => Err(FormatError::Header { symbol }),
    }
}

impl SavedState {
    /// The mode of one side.
    pub fn player(&self, side: Disk) -> PlayerMode {
        match side {
            Disk::Dark => self.dark_player,
            Disk::Light => self.light_player,
        }
    }

    /// Write the snapshot as UTF-8 text with no trailing newline.
    pub fn encode(&self) -> Vec<u8> {
        let mut text = String::new();
        text.push(Disk::cell_symbol(self.turn));
        text.push(mode_symbol(self.dark_player));
        text.push(mode_symbol(self.light_player));
        text.push('\n');
        text.push_str(&self.board.to_string());
        text.into_bytes()
    }

    /// Read a snapshot written by [`SavedState::encode`].
    ///
    /// Blank lines are skipped and characters after the third header symbol
    /// are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, FormatError> {
        let text = str::from_utf8(data).map_err(|_| FormatError::NotUtf8)?;
        let mut lines = text.lines().filter(|line| !line.is_empty());

        let mut header = lines.next().ok_or(FormatError::MissingHeader)?.chars();
        let turn = match header.next() {
            Some(symbol) => Disk::from_symbol(symbol)?,
            None => return Err(FormatError::Header { symbol: None }),
        };
        let dark_player = mode_from_symbol(header.next())?;
        let light_player = mode_from_symbol(header.next())?;

        let board: Board = lines.collect::<Vec<_>>().join("\n").parse()?;

        Ok(Self {
            turn,
            dark_player,
            light_player,
            board,
        })
    }
}
