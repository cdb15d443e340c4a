//! A stand-in computer player that picks a random legal move after a pause.

use crate::canceller::Canceller;
use crate::delegate::{MoveHandler, MoveStrategy};
use crate::timer::Scheduler;
use flipside_othello::{Board, Disk};
use rand::seq::SliceRandom;
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long the computer pretends to think by default.
pub const DEFAULT_THINKING_TIME: Duration = Duration::from_secs(2);

pub struct RandomStrategy<R> {
    rng: RefCell<R>,
    scheduler: Rc<dyn Scheduler>,
    delay: Duration,
}

impl<R: Rng> RandomStrategy<R> {
    pub fn new(rng: R, scheduler: Rc<dyn Scheduler>) -> Self {
        Self::with_delay(rng, scheduler, DEFAULT_THINKING_TIME)
    }

    pub fn with_delay(rng: R, scheduler: Rc<dyn Scheduler>, delay: Duration) -> Self {
        Self {
            rng: RefCell::new(rng),
            scheduler,
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<R: Rng> MoveStrategy for RandomStrategy<R> {
    fn choose_move(&self, board: &Board, side: Disk, handler: MoveHandler) -> Canceller {
        let moves = board.valid_moves(side);
        let choice = match moves.choose(&mut *self.rng.borrow_mut()) {
            Some(&choice) => choice,
            None => {
                warn!(%side, "asked to move without a legal move");
                return Canceller::default();
            }
        };

        debug!(%side, %choice, delay = ?self.delay, "computer chose a move");
        self.scheduler
            .schedule(self.delay, Box::new(move || handler(choice.x, choice.y)))
    }
}
