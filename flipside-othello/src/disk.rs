//! The two sides of a game and per-side storage.

use derive_more::{Display, Error};
use rand::Rng;
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the two sides in a game, and the piece each side places.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Disk {
    Dark,
    Light,
}

impl Disk {
    /// Both sides, dark first.
    pub const SIDES: [Disk; 2] = [Disk::Dark, Disk::Light];

    /// Gets the other side.
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Disk::Dark => Disk::Light,
            Disk::Light => Disk::Dark,
        }
    }

    /// Turns this disk over in place.
    #[inline]
    pub fn flip(&mut self) {
        *self = self.flipped();
    }

    /// Draw a side uniformly from `rng`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen() {
            Disk::Dark
        } else {
            Disk::Light
        }
    }

    /// The board symbol for this disk: `x` for dark, `o` for light.
    pub fn symbol(self) -> char {
        match self {
            Disk::Dark => 'x',
            Disk::Light => 'o',
        }
    }

    /// Read a cell symbol: `x`, `o`, or `-` for an empty cell.
    pub fn from_symbol(symbol: char) -> Result<Option<Self>, ParseDiskError> {
        match symbol {
            'x' => Ok(Some(Disk::Dark)),
            'o' => Ok(Some(Disk::Light)),
            '-' => Ok(None),
            _ => Err(ParseDiskError { symbol }),
        }
    }

    /// The symbol for a cell that may be empty.
    pub fn cell_symbol(cell: Option<Self>) -> char {
        cell.map_or('-', Disk::symbol)
    }
}

impl Default for Disk {
    /// Gets the side that moves first (dark).
    fn default() -> Self {
        Self::Dark
    }
}

impl std::ops::Not for Disk {
    type Output = Self;

    /// Gets the other side.
    fn not(self) -> Self {
        self.flipped()
    }
}

impl fmt::Display for Disk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disk::Dark => f.write_str("Dark"),
            Disk::Light => f.write_str("Light"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display(fmt = "illegal disk symbol: {:?}", symbol)]
pub struct ParseDiskError {
    pub symbol: char,
}

/// Exactly one value per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BySide<T> {
    pub dark: T,
    pub light: T,
}

impl<T> BySide<T> {
    pub fn new(dark: T, light: T) -> Self {
        Self { dark, light }
    }

    /// Build both values from a function of the side.
    pub fn from_fn<F: FnMut(Disk) -> T>(mut f: F) -> Self {
        Self {
            dark: f(Disk::Dark),
            light: f(Disk::Light),
        }
    }

    /// Iterate `(side, value)` pairs, dark first.
    pub fn iter(&self) -> impl Iterator<Item = (Disk, &T)> {
        Disk::SIDES.into_iter().map(move |side| (side, &self[side]))
    }
}

impl<T: Clone> BySide<T> {
    /// The same value for both sides.
    pub fn splat(value: T) -> Self {
        Self {
            dark: value.clone(),
            light: value,
        }
    }
}

impl<T> Index<Disk> for BySide<T> {
    type Output = T;

    fn index(&self, side: Disk) -> &T {
        match side {
            Disk::Dark => &self.dark,
            Disk::Light => &self.light,
        }
    }
}

impl<T> IndexMut<Disk> for BySide<T> {
    fn index_mut(&mut self, side: Disk) -> &mut T {
        match side {
            Disk::Dark => &mut self.dark,
            Disk::Light => &mut self.light,
        }
    }
}
