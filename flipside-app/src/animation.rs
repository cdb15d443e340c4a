//! Turning a whole-board update into a sequence of single-disk updates.
//!
//! A view that can redraw one cell at a time implements [`DiskAnimator`] and
//! forwards [`GameView::update_board`](crate::GameView::update_board) to
//! [`animate_board`].

use crate::canceller::Canceller;
use crate::delegate::Completion;
use crate::diff::{board_diff, DiskChange};
use flipside_othello::{Board, Disk};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

pub trait DiskAnimator {
    /// The board as currently displayed.
    fn board(&self) -> Board;

    /// Redraw one cell, then call `completion`.
    /// Cancelling the returned token stops the redraw without calling `completion`.
    fn update_disk(
        &self,
        disk: Option<Disk>,
        x: i32,
        y: i32,
        animated: bool,
        completion: Completion,
    ) -> Canceller;
}

/// Play the changes from the displayed board to `board` one after another,
/// then call `completion`.
///
/// Each step starts from the previous step's completion. Cancelling the
/// returned token cancels the step in flight and drops the rest, and
/// `completion` is never called.
pub fn animate_board<A>(
    animator: &Rc<A>,
    board: &Board,
    animated: bool,
    completion: Completion,
) -> Canceller
where
    A: DiskAnimator + ?Sized + 'static,
{
    let diff: VecDeque<DiskChange> = board_diff(&animator.board(), board).into();
    let canceller = Canceller::default();
    apply_diff(
        Rc::downgrade(animator),
        diff,
        animated,
        canceller.clone(),
        completion,
    );
    canceller
}

fn apply_diff<A>(
    animator: Weak<A>,
    mut diff: VecDeque<DiskChange>,
    animated: bool,
    canceller: Canceller,
    completion: Completion,
) where
    A: DiskAnimator + ?Sized + 'static,
{
    if canceller.is_cancelled() {
        return;
    }

    let change = match diff.pop_front() {
        Some(change) => change,
        None => return completion(),
    };
    let target = match animator.upgrade() {
        Some(target) => target,
        None => return,
    };

    let next = {
        let canceller = canceller.clone();
        Box::new(move || apply_diff(animator, diff, animated, canceller, completion))
    };
    let step = target.update_disk(change.disk, change.x, change.y, animated, next);
    canceller.add_subcanceller(step);
}
