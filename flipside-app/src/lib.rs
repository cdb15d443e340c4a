//! `flipside-app` coordinates a game of Reversi between a user interface, a
//! save file and a computer player.
//!
//!  - [`GameController`] is the state machine that sequences turns, computer
//!    moves, board animations, passes and resets.
//!  - [`GameView`], [`GameStore`] and [`MoveStrategy`] are the collaborators it
//!    drives. [`GameSaver`], [`RandomStrategy`] and [`terminal::TerminalView`]
//!    are ready-made implementations.
//!  - [`Canceller`] is the cancellation token every asynchronous request returns.
//!
//! Everything here is single-threaded: the host owns the controller and its
//! collaborators on one thread and feeds it events from its own loop.

pub mod terminal;

mod ai;
mod animation;
mod canceller;
mod controller;
mod delegate;
mod diff;
mod saved_state;
mod saver;
mod timer;

pub use ai::*;
pub use animation::*;
pub use canceller::*;
pub use controller::*;
pub use delegate::*;
pub use diff::*;
pub use saved_state::*;
pub use saver::*;
pub use timer::*;
