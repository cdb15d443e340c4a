//! The collaborators a [`GameController`](crate::GameController) drives.
//!
//! Every method takes `&self`; implementors keep their own state behind
//! `Cell`/`RefCell`. A collaborator may call a completion before returning,
//! and the controller is written to cope with that.

use crate::canceller::Canceller;
use crate::saved_state::SavedState;
use crate::saver::SaveError;
use flipside_othello::{Board, Disk, GameState};
use std::fmt;

/// Runs once when an asynchronous request finishes.
pub type Completion = Box<dyn FnOnce()>;

/// Receives the cell a strategy chose.
pub type MoveHandler = Box<dyn FnOnce(i32, i32)>;

/// Receives the user's answer to a reset prompt.
pub type Confirmation = Box<dyn FnOnce(bool)>;

/// Who picks the moves for one side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerMode {
    Manual,
    Computer,
}

impl Default for PlayerMode {
    fn default() -> Self {
        PlayerMode::Manual
    }
}

impl fmt::Display for PlayerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerMode::Manual => f.write_str("manual"),
            PlayerMode::Computer => f.write_str("computer"),
        }
    }
}

/// The status line shown above the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Message {
    Turn(Disk),
    /// `winner` is `None` on a tie.
    Result { winner: Option<Disk> },
}

impl From<GameState> for Message {
    fn from(state: GameState) -> Self {
        match state {
            GameState::BeingPlayed { turn } => Message::Turn(turn),
            GameState::Over { winner } => Message::Result { winner },
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Turn(side) => write!(f, "{}'s turn", side),
            Message::Result { winner: Some(side) } => write!(f, "{} won", side),
            Message::Result { winner: None } => f.write_str("Tied"),
        }
    }
}

/// Presents the game and asks the user questions.
///
/// `animated` is false for updates that happen before the game starts.
pub trait GameView {
    fn update_message(&self, message: Message, animated: bool);

    fn update_disk_counts(&self, dark: usize, light: usize, animated: bool);

    fn update_player_mode(&self, mode: PlayerMode, side: Disk, animated: bool);

    /// Show or hide the "thinking" indicator of one side.
    fn update_activity_indicator(&self, visible: bool, side: Disk, animated: bool);

    /// Show `board`, then call `completion`.
    /// Cancelling the returned token stops the update without calling `completion`.
    fn update_board(&self, board: &Board, animated: bool, completion: Completion) -> Canceller;

    /// Ask whether to throw the current game away.
    fn confirm_reset(&self, completion: Confirmation);

    /// Tell the user that `side` has no move, then call `completion` once acknowledged.
    fn alert_pass(&self, side: Disk, completion: Completion);
}

/// Persists the game between sessions.
pub trait GameStore {
    fn save_game(&self, state: &SavedState) -> Result<(), SaveError>;

    fn load_game(&self) -> Result<SavedState, SaveError>;
}

/// Chooses moves for a [`PlayerMode::Computer`] side.
pub trait MoveStrategy {
    /// Pick a legal cell for `side` on `board` and pass it to `handler`.
    /// Cancelling the returned token must stop `handler` from being called.
    fn choose_move(&self, board: &Board, side: Disk, handler: MoveHandler) -> Canceller;
}
