//! Miscellaneous project utilities.

use crate::coord::COLUMN_LETTERS;
use std::fmt::{self, Formatter};
use std::iter::Iterator;

/// Format `width * height` characters into a pretty grid with column letters
/// and row numbers. `piece_iter` must yield exactly `width * height` items.
pub fn format_grid<T: Iterator<Item = char>>(
    mut piece_iter: T,
    width: usize,
    height: usize,
    f: &mut Formatter,
) -> fmt::Result {
    let label_width = height.to_string().len();

    write!(f, "{:w$} ", "", w = label_width)?;
    for col in COLUMN_LETTERS.chars().take(width) {
        write!(f, " {}", col)?;
    }

    for row in 0..height {
        write!(f, "\n{:>w$} ", row + 1, w = label_width)?;
        for _ in 0..width {
            write!(f, " {}", piece_iter.next().ok_or(fmt::Error)?)?;
        }
    }

    match piece_iter.next() {
        None => Ok(()),
        _ => Err(fmt::Error),
    }
}
