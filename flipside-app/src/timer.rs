//! Delayed tasks for a single-threaded host.

use crate::canceller::Canceller;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// A unit of delayed work.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after a delay.
pub trait Scheduler {
    /// Run `task` once `delay` has passed, unless the returned token is cancelled first.
    fn schedule(&self, delay: Duration, task: Task) -> Canceller;
}

type TimerKey = (Instant, u64);

#[derive(Default)]
struct Timers {
    entries: BTreeMap<TimerKey, (Task, Canceller)>,
    next_seq: u64,
}

/// A [`Scheduler`] that never runs anything by itself: the host loop sleeps
/// until [`TimerQueue::next_deadline`] and then calls [`TimerQueue::run_due`].
#[derive(Default)]
pub struct TimerQueue {
    timers: Rc<RefCell<Timers>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` at `deadline`, unless the returned token is cancelled first.
    pub fn schedule_at(&self, deadline: Instant, task: Task) -> Canceller {
        let mut timers = self.timers.borrow_mut();
        let key = (deadline, timers.next_seq);
        timers.next_seq += 1;

        let weak: Weak<RefCell<Timers>> = Rc::downgrade(&self.timers);
        let canceller = Canceller::new(move || {
            if let Some(timers) = weak.upgrade() {
                timers.borrow_mut().entries.remove(&key);
            }
        });
        timers.entries.insert(key, (task, canceller.clone()));
        canceller
    }

    /// When the earliest pending task is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .borrow()
            .entries
            .keys()
            .next()
            .map(|&(deadline, _)| deadline)
    }

    pub fn len(&self) -> usize {
        self.timers.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every task due at `now`, earliest first, and return how many ran.
    /// Tasks with equal deadlines run in the order they were scheduled.
    pub fn run_due(&self, now: Instant) -> usize {
        let mut ran = 0;
        loop {
            let due = {
                let mut timers = self.timers.borrow_mut();
                match timers.entries.keys().next() {
                    Some(&key) if key.0 <= now => timers.entries.remove(&key),
                    _ => None,
                }
            };

            match due {
                Some((_, canceller)) if canceller.is_cancelled() => continue,
                Some((task, _)) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&self, delay: Duration, task: Task) -> Canceller {
        self.schedule_at(Instant::now() + delay, task)
    }
}
