//! A line-oriented terminal front end.
//!
//! [`TerminalView`] renders the game as text and animates flips on a
//! [`Scheduler`]. [`drive`] is the host loop: it runs due timers and feeds
//! typed [`Command`]s to the controller.

use crate::animation::{animate_board, DiskAnimator};
use crate::canceller::Canceller;
use crate::controller::GameController;
use crate::delegate::{Completion, Confirmation, GameView, Message, PlayerMode};
use crate::timer::{Scheduler, TimerQueue};
use async_std::channel::{self, Receiver};
use async_std::future;
use async_trait::async_trait;
use derive_more::{Display, Error};
use flipside_othello::{Board, BySide, Coord, Disk};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::rc::{Rc, Weak};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How long [`drive`] waits for input when no timer is pending.
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// One line of user input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// A cell in human notation, e.g. `e6`.
    Place(Coord),
    /// `dark computer`, `light manual`, ...
    SetPlayer(Disk, PlayerMode),
    Reset,
    /// `y` or `n` to a reset prompt.
    Answer(bool),
    /// An empty line, which acknowledges a pass.
    Acknowledge,
    Show,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq, Display, Error)]
#[display(fmt = "unrecognized command: {:?}", input)]
pub struct ParseCommandError {
    pub input: String,
}

fn parse_side(word: &str) -> Option<Disk> {
    match word {
        "dark" | "x" => Some(Disk::Dark),
        "light" | "o" => Some(Disk::Light),
        _ => None,
    }
}

fn parse_mode(word: &str) -> Option<PlayerMode> {
    match word {
        "manual" | "human" => Some(PlayerMode::Manual),
        "computer" | "cpu" => Some(PlayerMode::Computer),
        _ => None,
    }
}

impl std::str::FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim().to_ascii_lowercase();
        let words: Vec<&str> = line.split_whitespace().collect();

        let command = match words.as_slice() {
            [] => Command::Acknowledge,
            ["y"] | ["yes"] => Command::Answer(true),
            ["n"] | ["no"] => Command::Answer(false),
            ["reset"] | ["new"] => Command::Reset,
            ["show"] | ["board"] => Command::Show,
            ["quit"] | ["exit"] | ["q"] => Command::Quit,
            [side, mode] => match (parse_side(side), parse_mode(mode)) {
                (Some(side), Some(mode)) => Command::SetPlayer(side, mode),
                _ => return Err(ParseCommandError { input: s.to_owned() }),
            },
            [cell] => cell
                .parse()
                .map(Command::Place)
                .map_err(|_| ParseCommandError { input: s.to_owned() })?,
            _ => return Err(ParseCommandError { input: s.to_owned() }),
        };
        Ok(command)
    }
}

/// Renders the game as text on `W`.
pub struct TerminalView<W> {
    this: Weak<Self>,
    out: RefCell<W>,
    scheduler: Rc<dyn Scheduler>,
    flip_delay: Duration,
    board: RefCell<Board>,
    counts: Cell<(usize, usize)>,
    message: Cell<Option<Message>>,
    players: Cell<BySide<PlayerMode>>,
    reset_prompt: RefCell<Option<Confirmation>>,
    pass_prompt: RefCell<Option<Completion>>,
}

impl<W: Write + 'static> TerminalView<W> {
    /// Each flipped disk is shown `flip_delay` after the previous one.
    pub fn new(out: W, scheduler: Rc<dyn Scheduler>, flip_delay: Duration) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            out: RefCell::new(out),
            scheduler,
            flip_delay,
            board: RefCell::new(Board::default()),
            counts: Cell::new((0, 0)),
            message: Cell::new(None),
            players: Cell::new(BySide::default()),
            reset_prompt: RefCell::new(None),
            pass_prompt: RefCell::new(None),
        })
    }

    /// Borrow the output, e.g. to inspect what was written.
    pub fn output(&self) -> std::cell::Ref<'_, W> {
        self.out.borrow()
    }

    pub fn say(&self, line: fmt::Arguments<'_>) {
        let mut out = self.out.borrow_mut();
        if let Err(error) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!(%error, "cannot write to the terminal");
        }
    }

    /// Print the board, the disk counts, the players and the status line.
    pub fn render(&self) {
        let board = self.board.borrow().clone();
        let (dark, light) = self.counts.get();
        let players = self.players.get();
        self.say(format_args!("{}", board.pretty()));
        self.say(format_args!(
            "x Dark ({}): {}    o Light ({}): {}",
            players.dark, dark, players.light, light
        ));
        if let Some(message) = self.message.get() {
            self.say(format_args!("{}", message));
        }
    }

    /// Whether a reset or pass prompt is waiting for an answer.
    /// The two are independent and may be pending together.
    pub fn is_prompting(&self) -> bool {
        self.reset_prompt.borrow().is_some() || self.pass_prompt.borrow().is_some()
    }

    /// Answer a pending reset prompt. Returns false if there was none.
    pub fn answer_reset(&self, confirmed: bool) -> bool {
        let prompt = self.reset_prompt.borrow_mut().take();
        match prompt {
            Some(completion) => {
                completion(confirmed);
                true
            }
            None => false,
        }
    }

    /// Acknowledge a pending pass alert. Returns false if there was none.
    pub fn acknowledge_pass(&self) -> bool {
        let prompt = self.pass_prompt.borrow_mut().take();
        match prompt {
            Some(completion) => {
                completion();
                true
            }
            None => false,
        }
    }
}

impl<W: Write + 'static> GameView for TerminalView<W> {
    fn update_message(&self, message: Message, animated: bool) {
        self.message.set(Some(message));
        if animated {
            self.say(format_args!("{}", message));
        }
    }

    fn update_disk_counts(&self, dark: usize, light: usize, _animated: bool) {
        self.counts.set((dark, light));
    }

    fn update_player_mode(&self, mode: PlayerMode, side: Disk, animated: bool) {
        let mut players = self.players.get();
        players[side] = mode;
        self.players.set(players);
        if animated {
            self.say(format_args!("{} is now played by: {}", side, mode));
        }
    }

    fn update_activity_indicator(&self, visible: bool, side: Disk, _animated: bool) {
        if visible {
            self.say(format_args!("{} is thinking...", side));
        }
    }

    fn update_board(&self, board: &Board, animated: bool, completion: Completion) -> Canceller {
        let this = match self.this.upgrade() {
            Some(this) => this,
            None => return Canceller::default(),
        };

        let weak = self.this.clone();
        let completion: Completion = Box::new(move || {
            if let Some(view) = weak.upgrade() {
                view.render();
            }
            completion();
        });
        let resized = {
            let shown = self.board.borrow();
            shown.width() != board.width() || shown.height() != board.height()
        };
        if resized {
            // Nothing to animate between boards of different sizes.
            *self.board.borrow_mut() = board.clone();
            completion();
            return Canceller::default();
        }

        animate_board(&this, board, animated, completion)
    }

    fn confirm_reset(&self, completion: Confirmation) {
        *self.reset_prompt.borrow_mut() = Some(completion);
        self.say(format_args!("Start a new game? [y/n]"));
    }

    fn alert_pass(&self, side: Disk, completion: Completion) {
        *self.pass_prompt.borrow_mut() = Some(completion);
        self.say(format_args!(
            "{} has no legal move and must pass. Press Enter to continue.",
            side
        ));
    }
}

impl<W: Write + 'static> DiskAnimator for TerminalView<W> {
    fn board(&self) -> Board {
        self.board.borrow().clone()
    }

    fn update_disk(
        &self,
        disk: Option<Disk>,
        x: i32,
        y: i32,
        animated: bool,
        completion: Completion,
    ) -> Canceller {
        self.board.borrow_mut().set(x, y, disk);
        if animated {
            self.scheduler.schedule(self.flip_delay, completion)
        } else {
            completion();
            Canceller::default()
        }
    }
}

/// Carry out one command. Returns false once the user asked to quit.
pub fn handle_command<W: Write + 'static>(
    controller: &GameController,
    view: &TerminalView<W>,
    command: Command,
) -> bool {
    debug!(?command, "handling command");
    match command {
        Command::Quit => return false,
        Command::Show => view.render(),
        Command::Reset => controller.reset(),
        Command::Answer(confirmed) => {
            if !view.answer_reset(confirmed) {
                view.say(format_args!("Nothing to answer."));
            }
        }
        Command::Acknowledge => {
            view.acknowledge_pass();
        }
        Command::SetPlayer(side, mode) => {
            controller.set_player(mode, side);
            view.update_player_mode(mode, side, true);
        }
        Command::Place(cell) => {
            if view.is_prompting() {
                view.say(format_args!("Answer the question above first."));
            } else if let Err(error) = controller.place_disk_at(cell.x, cell.y) {
                view.say(format_args!("Cannot play {}: {}.", cell, error));
            }
        }
    }
    true
}

/// The result of waiting for input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Nothing arrived before the timeout.
    Idle,
    /// The input has ended.
    Closed,
}

/// Somewhere lines of input come from.
#[async_trait(?Send)]
pub trait CommandSource {
    /// Wait up to `timeout` for the next line.
    async fn next_line(&mut self, timeout: Duration) -> Input;
}

/// Lines typed on standard input, read on a background thread.
pub struct StdinLines {
    lines: Receiver<String>,
}

impl StdinLines {
    pub fn spawn() -> Self {
        let (sender, lines) = channel::unbounded();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(error) => {
                        warn!(%error, "cannot read standard input");
                        break;
                    }
                };
                if sender.try_send(line).is_err() {
                    break;
                }
            }
        });
        Self { lines }
    }
}

#[async_trait(?Send)]
impl CommandSource for StdinLines {
    async fn next_line(&mut self, timeout: Duration) -> Input {
        match future::timeout(timeout, self.lines.recv()).await {
            Ok(Ok(line)) => Input::Line(line),
            Ok(Err(_)) => Input::Closed,
            Err(_) => Input::Idle,
        }
    }
}

/// Run the host loop until the input ends or the user quits.
///
/// Due timers always run before the next line is read.
pub async fn drive<C, W>(
    controller: &GameController,
    view: &TerminalView<W>,
    timers: &TimerQueue,
    input: &mut C,
) where
    C: CommandSource + ?Sized,
    W: Write + 'static,
{
    loop {
        while timers.run_due(Instant::now()) > 0 {}

        let timeout = timers
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_TIMEOUT);

        let line = match input.next_line(timeout).await {
            Input::Line(line) => line,
            Input::Idle => continue,
            Input::Closed => return,
        };

        match line.parse::<Command>() {
            Ok(command) => {
                if !handle_command(controller, view, command) {
                    return;
                }
            }
            Err(error) => view.say(format_args!("{}", error)),
        }
    }
}
