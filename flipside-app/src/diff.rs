//! Ordering of changed cells for display.

use flipside_othello::{Board, Coord, Disk};
use itertools::Itertools;

/// One cell to redraw: its new contents and address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiskChange {
    pub disk: Option<Disk>,
    pub x: i32,
    pub y: i32,
}

impl DiskChange {
    pub fn new(disk: Option<Disk>, x: i32, y: i32) -> Self {
        Self { disk, x, y }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Bucket of the direction from `origin` to `target`, clockwise from the upper-left.
/// The origin itself is bucket 0 and the left is bucket 8.
fn direction_score(origin: Coord, target: Coord) -> u8 {
    match ((target.x - origin.x).signum(), (target.y - origin.y).signum()) {
        (0, 0) => 0,
        (-1, -1) => 1,
        (0, -1) => 2,
        (1, -1) => 3,
        (1, 0) => 4,
        (1, 1) => 5,
        (0, 1) => 6,
        (-1, 1) => 7,
        (-1, 0) => 8,
        _ => unreachable!("signum is always -1, 0 or 1"),
    }
}

/// The cells that differ between `before` and `after`.
///
/// A single placement (exactly one new disk, every change turning to the same
/// side) is ordered outward from the new disk, one direction at a time.
/// Anything else is listed row-major. Panics if the boards differ in size.
pub fn board_diff(before: &Board, after: &Board) -> Vec<DiskChange> {
    assert_eq!(before.width(), after.width(), "board widths differ");
    assert_eq!(before.height(), after.height(), "board heights differ");

    let mut placed = Vec::new();
    let mut diff: Vec<DiskChange> = after
        .cells()
        .filter_map(|(c, disk)| {
            let old = before.get(c.x, c.y);
            if old == disk {
                return None;
            }
            if old.is_none() {
                placed.push(c);
            }
            Some(DiskChange::new(disk, c.x, c.y))
        })
        .collect();

    let single_placement = placed.len() == 1
        && diff.len() > 1
        && diff.iter().all(|change| change.disk.is_some())
        && diff.iter().map(|change| change.disk).all_equal();

    if single_placement {
        let origin = placed[0];
        diff.sort_by_key(|change| {
            let c = change.coord();
            (direction_score(origin, c), origin.distance(c))
        });
    }

    diff
}
