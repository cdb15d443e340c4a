//! The game controller: sequences turns, computer moves, board animations,
//! pass alerts, resets and saving.
//!
//! At any moment the controller is doing at most one of: waiting for the side
//! in turn to move, animating the last move, waiting for a pass to be
//! acknowledged, or nothing at all (before [`GameController::start`] and after
//! the game ends). A reset confirmation can be pending alongside any of these.
//!
//! Every wait is represented by a [`Canceller`] stored with a ticket number.
//! Callbacks carry the ticket they were issued with and do nothing unless that
//! ticket is still the one on file, so a late or cancelled callback is inert.
//!
//! The controller is single-threaded (`!Send`). It never holds a borrow of its
//! own state while calling a collaborator, so collaborators may call back
//! before returning.

use crate::canceller::Canceller;
use crate::delegate::{GameStore, GameView, Message, MoveStrategy, PlayerMode};
use crate::saved_state::SavedState;
use crate::saver::SaveError;
use derive_more::{Display, Error};
use flipside_othello::{Board, BySide, Disk, Game, GameState, PlacementError};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, instrument, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum StartError {
    #[display(fmt = "the game has already been started")]
    AlreadyStarted,
}

/// Why [`GameController::place_disk_at`] refused a move. The checks run in
/// declaration order and the first that fails is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The game has ended.
    #[display(fmt = "the game is over")]
    GameIsOver,
    /// A board update is still playing.
    #[display(fmt = "the board is being updated")]
    DuringAnimations,
    /// The side in turn has no open wait: the game is not started, a pass
    /// alert is showing, or the previous move is still being applied.
    #[display(fmt = "no move is being awaited")]
    NotAwaitingMove,
    /// The side in turn is played by the computer.
    #[display(fmt = "the player in turn is not manual")]
    PlayerInTurnIsNotManual,
    /// The rules reject the cell, including cells off the board.
    #[display(fmt = "invalid move: {}", _0)]
    InvalidMove(PlacementError),
}

impl From<PlacementError> for MoveError {
    fn from(error: PlacementError) -> Self {
        MoveError::InvalidMove(error)
    }
}

/// An outstanding wait and the ticket it was issued under.
struct Pending {
    ticket: u64,
    canceller: Canceller,
}

struct State {
    game: Game,
    players: BySide<PlayerMode>,
    started: bool,
    animation: Option<Pending>,
    player_waits: BySide<Option<Pending>>,
    pass_alert: Option<u64>,
    confirming_reset: bool,
    next_ticket: u64,
}

impl State {
    fn ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn saved_state(&self) -> SavedState {
        SavedState {
            turn: self.game.turn(),
            dark_player: self.players.dark,
            light_player: self.players.light,
            board: self.game.board().clone(),
        }
    }

    /// Every token currently on file.
    fn cancellers(&self) -> Vec<Canceller> {
        self.animation
            .iter()
            .chain(self.player_waits.dark.iter())
            .chain(self.player_waits.light.iter())
            .map(|pending| pending.canceller.clone())
            .collect()
    }
}

struct Shared {
    view: Weak<dyn GameView>,
    store: Weak<dyn GameStore>,
    strategy: Weak<dyn MoveStrategy>,
    state: RefCell<State>,
}

/// Drives one game between a view, a store and a computer strategy.
///
/// The controller keeps only weak references to its collaborators; if one is
/// dropped, the calls it would have received are skipped.
pub struct GameController {
    shared: Rc<Shared>,
}

impl GameController {
    /// Build a controller, resuming the saved game if the store has one and
    /// starting (and saving) a new game otherwise.
    ///
    /// The view is brought up to date before this returns.
    pub fn new<V, S, M>(view: &Rc<V>, store: &Rc<S>, strategy: &Rc<M>) -> Self
    where
        V: GameView + 'static,
        S: GameStore + 'static,
        M: MoveStrategy + 'static,
    {
        let view: Weak<V> = Rc::downgrade(view);
        let view: Weak<dyn GameView> = view;
        let store: Weak<S> = Rc::downgrade(store);
        let store: Weak<dyn GameStore> = store;
        let strategy: Weak<M> = Rc::downgrade(strategy);
        let strategy: Weak<dyn MoveStrategy> = strategy;

        let shared = Rc::new(Shared {
            view,
            store,
            strategy,
            state: RefCell::new(State {
                game: Game::default(),
                players: BySide::splat(PlayerMode::Manual),
                started: false,
                animation: None,
                player_waits: BySide::default(),
                pass_alert: None,
                confirming_reset: false,
                next_ticket: 0,
            }),
        });

        if let Err(error) = shared.load_game() {
            info!(%error, "starting a new game");
            shared.new_game(true);
        }

        if let Some(view) = shared.view() {
            for side in Disk::SIDES {
                view.update_activity_indicator(false, side, false);
            }
        }

        Self { shared }
    }

    /// Build a controller whose view, store and strategy are all `delegate`.
    pub fn with_delegate<D>(delegate: &Rc<D>) -> Self
    where
        D: GameView + GameStore + MoveStrategy + 'static,
    {
        Self::new(delegate, delegate, delegate)
    }

    /// Begin waiting for the side in turn. Can only be called once.
    #[instrument(skip(self))]
    pub fn start(&self) -> Result<(), StartError> {
        {
            let mut state = self.shared.state.borrow_mut();
            if state.started {
                return Err(StartError::AlreadyStarted);
            }
            state.started = true;
        }

        info!("game started");
        self.shared.wait_for_player();
        Ok(())
    }

    /// Place a disk for the manual side in turn.
    #[instrument(skip(self))]
    pub fn place_disk_at(&self, x: i32, y: i32) -> Result<(), MoveError> {
        let turn = {
            let state = self.shared.state.borrow();
            let turn = state.game.turn().ok_or(MoveError::GameIsOver)?;
            if state.animation.is_some() {
                return Err(MoveError::DuringAnimations);
            }
            if state.player_waits[turn].is_none() {
                return Err(MoveError::NotAwaitingMove);
            }
            if state.players[turn] != PlayerMode::Manual {
                return Err(MoveError::PlayerInTurnIsNotManual);
            }
            turn
        };

        self.shared.handle_move(turn, x, y)?;
        Ok(())
    }

    /// Change who plays `side`. A wait in progress for that side is restarted
    /// under the new mode.
    #[instrument(skip(self))]
    pub fn set_player(&self, mode: PlayerMode, side: Disk) {
        self.shared.set_player(mode, side);
    }

    /// Ask the view to confirm, then throw the current game away and start a
    /// new one. Does nothing while an earlier request is still unanswered.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.shared.reset();
    }

    pub fn state(&self) -> GameState {
        self.shared.state.borrow().game.state()
    }

    pub fn board(&self) -> Board {
        self.shared.state.borrow().game.board().clone()
    }

    pub fn player(&self, side: Disk) -> PlayerMode {
        self.shared.state.borrow().players[side]
    }

    pub fn is_started(&self) -> bool {
        self.shared.state.borrow().started
    }

    /// Whether the side in turn may move right now.
    pub fn is_waiting_for_move(&self) -> bool {
        let state = self.shared.state.borrow();
        match state.game.turn() {
            Some(turn) => state.player_waits[turn].is_some() && state.animation.is_none(),
            None => false,
        }
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        let cancellers = self.shared.state.borrow().cancellers();
        for canceller in cancellers {
            canceller.cancel();
        }
    }
}

impl Shared {
    fn view(&self) -> Option<Rc<dyn GameView>> {
        self.view.upgrade()
    }

    fn ticket(&self) -> u64 {
        self.state.borrow_mut().ticket()
    }

    fn load_game(&self) -> Result<(), SaveError> {
        let store = self.store.upgrade().ok_or(SaveError::Missing)?;
        let saved = store.load_game()?;
        info!(turn = ?saved.turn, "resuming saved game");

        {
            let mut state = self.state.borrow_mut();
            state.game = Game::new(saved.board.clone(), saved.turn.unwrap_or(Disk::Dark));
            state.players = BySide::new(saved.dark_player, saved.light_player);
        }

        if let Some(view) = self.view() {
            for side in Disk::SIDES {
                view.update_player_mode(saved.player(side), side, false);
            }
        }
        self.show_game();
        Ok(())
    }

    /// Replace the game with a fresh one and both players with manual ones.
    /// With `notify_all`, the view hears about both modes even if unchanged.
    fn new_game(&self, notify_all: bool) {
        let (changed, animated) = {
            let mut state = self.state.borrow_mut();
            state.game = Game::default();
            let changed: Vec<Disk> = Disk::SIDES
                .into_iter()
                .filter(|&side| notify_all || state.players[side] != PlayerMode::Manual)
                .collect();
            state.players = BySide::splat(PlayerMode::Manual);
            (changed, state.started)
        };

        if let Some(view) = self.view() {
            for side in changed {
                view.update_player_mode(PlayerMode::Manual, side, animated);
            }
        }
        self.show_game();
        self.save();
    }

    /// Show the message, counts and board without animation.
    fn show_game(&self) {
        self.update_message(None);
        self.update_disk_counts();

        let board = self.state.borrow().game.board().clone();
        if let Some(view) = self.view() {
            // Not animated, so there is nothing worth cancelling.
            let _ = view.update_board(&board, false, Box::new(|| {}));
        }
    }

    fn update_message(&self, message: Option<Message>) {
        let (message, animated) = {
            let state = self.state.borrow();
            let message = message.unwrap_or_else(|| state.game.state().into());
            (message, state.started)
        };
        if let Some(view) = self.view() {
            view.update_message(message, animated);
        }
    }

    fn update_disk_counts(&self) {
        let (dark, light, animated) = {
            let state = self.state.borrow();
            let board = state.game.board();
            (board.count(Disk::Dark), board.count(Disk::Light), state.started)
        };
        if let Some(view) = self.view() {
            view.update_disk_counts(dark, light, animated);
        }
    }

    fn save(&self) {
        let saved = self.state.borrow().saved_state();
        if let Some(store) = self.store.upgrade() {
            if let Err(error) = store.save_game(&saved) {
                warn!(%error, "failed to save the game");
            }
        }
    }

    /// Open a wait for the side in turn, if the game is still being played.
    fn wait_for_player(self: &Rc<Self>) {
        let (turn, mode) = {
            let state = self.state.borrow();
            match state.game.turn() {
                Some(turn) => (turn, state.players[turn]),
                None => return,
            }
        };

        debug!(%turn, %mode, "waiting for player");
        match mode {
            PlayerMode::Manual => self.wait_for_manual(turn),
            PlayerMode::Computer => self.wait_for_computer(turn),
        }
    }

    fn wait_for_manual(self: &Rc<Self>, turn: Disk) {
        let ticket = self.ticket();
        let weak = Rc::downgrade(self);
        let canceller = Canceller::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.clear_player_wait(turn, ticket);
            }
        });
        self.state.borrow_mut().player_waits[turn] = Some(Pending { ticket, canceller });
    }

    fn wait_for_computer(self: &Rc<Self>, turn: Disk) {
        let (view, strategy) = match (self.view(), self.strategy.upgrade()) {
            (Some(view), Some(strategy)) => (view, strategy),
            _ => {
                warn!(%turn, "no view or strategy to play the computer side");
                return;
            }
        };

        let ticket = self.ticket();
        let canceller = {
            let weak = Rc::downgrade(self);
            Canceller::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.finish_computer_wait(turn, ticket);
                }
            })
        };
        let board = {
            let mut state = self.state.borrow_mut();
            state.player_waits[turn] = Some(Pending {
                ticket,
                canceller: canceller.clone(),
            });
            state.game.board().clone()
        };

        view.update_activity_indicator(true, turn, true);

        let weak = Rc::downgrade(self);
        let thinking = strategy.choose_move(
            &board,
            turn,
            Box::new(move |x, y| {
                if let Some(shared) = weak.upgrade() {
                    shared.computer_moved(turn, ticket, x, y);
                }
            }),
        );
        canceller.add_subcanceller(thinking);
    }

    /// Drop the wait for `side` if it is still the one issued under `ticket`.
    fn clear_player_wait(&self, side: Disk, ticket: u64) -> bool {
        let mut state = self.state.borrow_mut();
        let current = state.player_waits[side].as_ref().map(|pending| pending.ticket);
        if current == Some(ticket) {
            state.player_waits[side] = None;
            true
        } else {
            false
        }
    }

    fn finish_computer_wait(&self, side: Disk, ticket: u64) -> bool {
        if !self.clear_player_wait(side, ticket) {
            return false;
        }
        if let Some(view) = self.view() {
            view.update_activity_indicator(false, side, true);
        }
        true
    }

    fn computer_moved(self: &Rc<Self>, side: Disk, ticket: u64, x: i32, y: i32) {
        if !self.finish_computer_wait(side, ticket) {
            debug!(%side, x, y, "ignoring a stale computer move");
            return;
        }

        if let Err(error) = self.handle_move(side, x, y) {
            warn!(%side, x, y, %error, "computer chose an illegal move, asking again");
            self.wait_for_player();
        }
    }

    /// Apply a move for `side`, save, and animate the result.
    fn handle_move(self: &Rc<Self>, side: Disk, x: i32, y: i32) -> Result<(), PlacementError> {
        let board = {
            let mut state = self.state.borrow_mut();
            state.game.place_disk_at(x, y)?;
            state.player_waits[side] = None;
            state.game.board().clone()
        };
        info!(%side, x, y, "disk placed");
        self.save();

        let view = match self.view() {
            Some(view) => view,
            None => return Ok(()),
        };

        let ticket = self.ticket();
        let canceller = {
            let weak = Rc::downgrade(self);
            Canceller::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.clear_animation(ticket);
                }
            })
        };
        self.state.borrow_mut().animation = Some(Pending {
            ticket,
            canceller: canceller.clone(),
        });

        let weak = Rc::downgrade(self);
        let drawing = view.update_board(
            &board,
            true,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.animation_finished(side, ticket);
                }
            }),
        );
        canceller.add_subcanceller(drawing);
        Ok(())
    }

    fn clear_animation(&self, ticket: u64) -> bool {
        let mut state = self.state.borrow_mut();
        if state.animation.as_ref().map(|pending| pending.ticket) == Some(ticket) {
            state.animation = None;
            true
        } else {
            false
        }
    }

    fn animation_finished(self: &Rc<Self>, side: Disk, ticket: u64) {
        if !self.clear_animation(ticket) {
            debug!("ignoring a stale animation completion");
            return;
        }

        self.update_disk_counts();

        let next = self.state.borrow().game.turn();
        if next == Some(side) {
            let passing = !side;
            info!(%passing, "no legal move, passing");
            self.update_message(Some(Message::Turn(passing)));

            let ticket = self.ticket();
            self.state.borrow_mut().pass_alert = Some(ticket);
            if let Some(view) = self.view() {
                let weak = Rc::downgrade(self);
                view.alert_pass(
                    passing,
                    Box::new(move || {
                        if let Some(shared) = weak.upgrade() {
                            shared.pass_acknowledged(ticket);
                        }
                    }),
                );
            }
        } else {
            self.update_message(None);
            self.wait_for_player();
        }
    }

    fn pass_acknowledged(self: &Rc<Self>, ticket: u64) {
        {
            let mut state = self.state.borrow_mut();
            if state.pass_alert != Some(ticket) {
                debug!("ignoring a stale pass acknowledgement");
                return;
            }
            state.pass_alert = None;
        }

        self.update_message(None);
        self.wait_for_player();
    }

    fn set_player(self: &Rc<Self>, mode: PlayerMode, side: Disk) {
        let waiting = {
            let mut state = self.state.borrow_mut();
            state.players[side] = mode;
            state.player_waits[side]
                .as_ref()
                .map(|pending| pending.canceller.clone())
        };
        self.save();

        if let Some(canceller) = waiting {
            canceller.cancel();
            self.wait_for_player();
        }
    }

    fn reset(self: &Rc<Self>) {
        {
            let mut state = self.state.borrow_mut();
            if state.confirming_reset {
                debug!("a reset is already awaiting confirmation");
                return;
            }
            state.confirming_reset = true;
        }

        let view = match self.view() {
            Some(view) => view,
            None => {
                self.state.borrow_mut().confirming_reset = false;
                return;
            }
        };

        let weak = Rc::downgrade(self);
        view.confirm_reset(Box::new(move |confirmed| {
            if let Some(shared) = weak.upgrade() {
                shared.reset_confirmed(confirmed);
            }
        }));
    }

    fn reset_confirmed(self: &Rc<Self>, confirmed: bool) {
        let cancellers = {
            let mut state = self.state.borrow_mut();
            if !state.confirming_reset {
                return;
            }
            state.confirming_reset = false;
            if !confirmed {
                debug!("reset declined");
                return;
            }
            state.pass_alert = None;
            state.cancellers()
        };

        info!("resetting the game");
        for canceller in cancellers {
            canceller.cancel();
        }
        {
            let mut state = self.state.borrow_mut();
            state.animation = None;
            state.player_waits = BySide::default();
        }

        self.new_game(false);
        if self.state.borrow().started {
            self.wait_for_player();
        }
    }
}
