//! Code for working with [`Coord`]s on a board.

use derive_more::{Display, Error, From, Into};
use std::fmt::{self, Formatter, Write};

/// Column letters used by the human notation, left to right.
pub(crate) const COLUMN_LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A cell address on a board: `x` grows to the right, `y` grows downward.
/// May lie outside any particular board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, From, Into)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub fn distance(self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Convert this [`Coord`] into string notation ("E6" for x = 4, y = 5).
/// Addresses with no letter notation are written as "(x, y)".
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let col = usize::try_from(self.x)
            .ok()
            .and_then(|x| COLUMN_LETTERS.chars().nth(x));

        match col {
            Some(col) if self.y >= 0 => {
                f.write_char(col)?;
                write!(f, "{}", self.y + 1)
            }
            _ => write!(f, "({}, {})", self.x, self.y),
        }
    }
}

#[derive(Debug, PartialEq, Display, Error)]
#[display(fmt = "invalid coordinate string")]
pub struct ParseCoordError;

/// Build a [`Coord`] from a 1-indexed string notation ("E6", "b12").
/// Bounds against a particular board are not checked.
impl std::str::FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let col_str = chars.next().ok_or(ParseCoordError)?.to_ascii_uppercase();
        let col = COLUMN_LETTERS.find(col_str).ok_or(ParseCoordError)? as i32;
        let row: i32 = chars.as_str().parse().or(Err(ParseCoordError))?;

        if row < 1 {
            return Err(ParseCoordError);
        }

        Ok(Self::new(col, row - 1))
    }
}
