//! The board: a rectangular grid of optional disks and the placement rules.
//!
//! Boards are plain values. Every operation here is pure except the explicitly
//! mutating ones (`set`, `reset`, `flip`, `place`), and a copy of a board never
//! aliases the original.

use crate::coord::Coord;
use crate::disk::{Disk, ParseDiskError};
use crate::utils;
use derive_more::{Display, Error};
use std::fmt;
use std::ops::Range;

/// Steps to each of the eight neighbours, clockwise from the upper-left.
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 0),
    (-1, 1),
];

/// A `width` by `height` grid of cells, each empty or holding one disk.
/// Both dimensions are even and at least 2.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    width: i32,
    height: i32,
    disks: Vec<Option<Disk>>,
}

/// Returned when a disk cannot be placed: the cell is off the board, occupied, or nothing would flip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
#[display(fmt = "cannot place a {} disk at ({}, {})", disk, x, y)]
pub struct DiskPlacementError {
    pub disk: Disk,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum ParseBoardError {
    #[display(fmt = "row {} has {} cells, expected {}", row, len, width)]
    RaggedRows { row: usize, len: usize, width: usize },
    #[display(fmt = "{}", _0)]
    UnknownSymbol(ParseDiskError),
    #[display(fmt = "a {}x{} board is not allowed", width, height)]
    InvalidSize { width: usize, height: usize },
}

impl From<ParseDiskError> for ParseBoardError {
    fn from(error: ParseDiskError) -> Self {
        ParseBoardError::UnknownSymbol(error)
    }
}

/// Returns whether a `width` by `height` board is allowed.
pub fn is_valid_size(width: usize, height: usize) -> bool {
    width >= 2 && height >= 2 && width % 2 == 0 && height % 2 == 0
}

impl Default for Board {
    /// Gets the standard 8x8 starting board.
    fn default() -> Self {
        Self::new(crate::DEFAULT_EDGE_LENGTH, crate::DEFAULT_EDGE_LENGTH)
    }
}

impl Board {
    /// Construct the starting board of the given size: four disks in the centre.
    /// Panics unless both dimensions are even and at least 2.
    pub fn new(width: i32, height: i32) -> Self {
        let mut board = Self::empty(width, height);
        board.reset();
        board
    }

    /// Construct a board with no disks on it.
    /// Panics unless both dimensions are even and at least 2.
    pub fn empty(width: i32, height: i32) -> Self {
        Self::check_size(width, height);
        Self {
            width,
            height,
            disks: vec![None; (width * height) as usize],
        }
    }

    /// Construct a board from row-major cells.
    /// Panics unless the dimensions are valid and `disks` holds exactly `width * height` cells.
    pub fn with_disks(width: i32, height: i32, disks: Vec<Option<Disk>>) -> Self {
        Self::check_size(width, height);
        assert_eq!(
            disks.len(),
            (width * height) as usize,
            "cell count must equal width * height ({} x {})",
            width,
            height
        );
        Self {
            width,
            height,
            disks,
        }
    }

    /// Construct a board from its symbol text, e.g. `"ox\nxo"`.
    /// Panics on malformed text; use [`str::parse`] to handle untrusted input.
    pub fn from_symbols(symbols: &str) -> Self {
        match symbols.parse() {
            Ok(board) => board,
            Err(error) => panic!("illegal board format ({}):\n{}", error, symbols),
        }
    }

    fn check_size(width: i32, height: i32) {
        assert!(width >= 2, "width must be >= 2: {}", width);
        assert!(height >= 2, "height must be >= 2: {}", height);
        assert!(width % 2 == 0, "width must be even: {}", width);
        assert!(height % 2 == 0, "height must be even: {}", height);
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn x_range(&self) -> Range<i32> {
        0..self.width
    }

    #[inline]
    pub fn y_range(&self) -> Range<i32> {
        0..self.height
    }

    /// Returns whether `(x, y)` lies on this board.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x_range().contains(&x) && self.y_range().contains(&y)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.contains(x, y) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    /// Get the disk at `(x, y)`. Cells off the board read as empty.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<Disk> {
        self.index(x, y).and_then(|i| self.disks[i])
    }

    /// Set the cell at `(x, y)`. Panics if the cell is off the board.
    pub fn set(&mut self, x: i32, y: i32, disk: Option<Disk>) {
        match self.index(x, y) {
            Some(i) => self.disks[i] = disk,
            None => panic!(
                "({}, {}) is outside the {}x{} board",
                x, y, self.width, self.height
            ),
        }
    }

    /// Iterate every cell with its address, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Option<Disk>)> + '_ {
        let width = self.width;
        self.disks
            .iter()
            .enumerate()
            .map(move |(i, disk)| (Coord::new(i as i32 % width, i as i32 / width), *disk))
    }

    /// Clear the board and put the four starting disks in the centre.
    pub fn reset(&mut self) {
        self.disks.iter_mut().for_each(|cell| *cell = None);

        let (cx, cy) = (self.width / 2, self.height / 2);
        self.set(cx - 1, cy - 1, Some(Disk::Light));
        self.set(cx, cy - 1, Some(Disk::Dark));
        self.set(cx - 1, cy, Some(Disk::Dark));
        self.set(cx, cy, Some(Disk::Light));
    }

    /// Count the disks of one side.
    pub fn count(&self, disk: Disk) -> usize {
        self.disks.iter().filter(|&&cell| cell == Some(disk)).count()
    }

    /// The side with more disks on the board, or `None` on a tie.
    pub fn side_with_more_disks(&self) -> Option<Disk> {
        let dark = self.count(Disk::Dark);
        let light = self.count(Disk::Light);
        match dark.cmp(&light) {
            std::cmp::Ordering::Greater => Some(Disk::Dark),
            std::cmp::Ordering::Less => Some(Disk::Light),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// A copy of this board with every disk turned over.
    pub fn flipped(&self) -> Self {
        let mut flipped = self.clone();
        flipped.flip();
        flipped
    }

    /// Turn every disk over.
    pub fn flip(&mut self) {
        self.disks.iter_mut().flatten().for_each(Disk::flip);
    }

    /// The cells that placing `disk` at `(x, y)` would turn over.
    /// Empty if the target is off the board, occupied, or brackets nothing.
    fn captures(&self, disk: Disk, x: i32, y: i32) -> Vec<Coord> {
        if !self.contains(x, y) || self.get(x, y).is_some() {
            return Vec::new();
        }

        let mut captured = Vec::new();
        for &(dx, dy) in DIRECTIONS.iter() {
            let mut line = Vec::new();
            let (mut cx, mut cy) = (x + dx, y + dy);

            // A run only counts if it ends on one of our own disks.
            loop {
                match self.get(cx, cy) {
                    Some(cell) if cell == disk => {
                        captured.append(&mut line);
                        break;
                    }
                    Some(_) => line.push(Coord::new(cx, cy)),
                    None => break,
                }
                cx += dx;
                cy += dy;
            }
        }

        captured
    }

    /// Returns whether `disk` can legally be placed at `(x, y)`.
    pub fn can_place_disk(&self, disk: Disk, x: i32, y: i32) -> bool {
        !self.captures(disk, x, y).is_empty()
    }

    /// Every legal placement for `side`, scanning rows top to bottom and each row left to right.
    pub fn valid_moves(&self, side: Disk) -> Vec<Coord> {
        self.y_range()
            .flat_map(|y| self.x_range().map(move |x| Coord::new(x, y)))
            .filter(|c| self.can_place_disk(side, c.x, c.y))
            .collect()
    }

    /// Returns whether `side` has any legal placement.
    pub fn has_valid_move(&self, side: Disk) -> bool {
        self.y_range()
            .any(|y| self.x_range().any(|x| self.can_place_disk(side, x, y)))
    }

    /// Place `disk` at `(x, y)` and turn over every bracketed disk.
    /// Leaves the board untouched on error.
    pub fn place(&mut self, disk: Disk, x: i32, y: i32) -> Result<(), DiskPlacementError> {
        let captured = self.captures(disk, x, y);
        if captured.is_empty() {
            return Err(DiskPlacementError { disk, x, y });
        }

        self.set(x, y, Some(disk));
        for c in captured {
            self.set(c.x, c.y, Some(disk));
        }
        Ok(())
    }

    /// A human-readable rendering with column letters and row numbers.
    pub fn pretty(&self) -> Pretty<'_> {
        Pretty(self)
    }
}

/// Parse symbol text: one line per row, `x` dark, `o` light, `-` empty.
/// Blank lines are skipped.
impl std::str::FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut width = None;
        let mut height = 0;
        let mut disks = Vec::new();

        for (row, line) in s.lines().filter(|line| !line.is_empty()).enumerate() {
            let len = line.chars().count();
            let width = *width.get_or_insert(len);
            if len != width {
                return Err(ParseBoardError::RaggedRows { row, len, width });
            }

            for symbol in line.chars() {
                disks.push(Disk::from_symbol(symbol)?);
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        if !is_valid_size(width, height) {
            return Err(ParseBoardError::InvalidSize { width, height });
        }

        Ok(Self::with_disks(width as i32, height as i32, disks))
    }
}

/// Encode as symbol text, rows separated by newlines, with no trailing newline.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.disks.chunks(self.width as usize).enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for &cell in row {
                write!(f, "{}", Disk::cell_symbol(cell))?;
            }
        }
        Ok(())
    }
}

/// See [`Board::pretty`].
pub struct Pretty<'a>(&'a Board);

impl fmt::Display for Pretty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        utils::format_grid(
            board.disks.iter().map(|cell| match cell {
                None => '.',
                Some(disk) => disk.symbol(),
            }),
            board.width as usize,
            board.height as usize,
            f,
        )
    }
}
