//! Drives a `GameController` through whole games against a recording delegate.

use flipside_app::{
    Canceller, Completion, Confirmation, GameController, GameStore, GameView, Message,
    MoveError, MoveHandler, MoveStrategy, PlayerMode, SaveError, SavedState, StartError,
};
use flipside_othello::{Board, BySide, Disk, PlacementError};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Recorded {
    message: Option<Message>,
    counts: Option<BySide<usize>>,
    players: BySide<Option<PlayerMode>>,
    indicators: BySide<Option<bool>>,
    board: Option<Board>,
    pass_alert_side: Option<Disk>,

    board_completion: Option<Completion>,
    reset_confirmation: Option<Confirmation>,
    pass_completion: Option<Completion>,

    saved: Option<SavedState>,

    board_for_move: Option<Board>,
    side_for_move: Option<Disk>,
    move_handler: Option<MoveHandler>,
}

/// Plays view, store and computer at once, and holds every callback it is
/// handed until the test releases it.
#[derive(Default)]
struct TestDelegate {
    recorded: Rc<RefCell<Recorded>>,
}

/// Everything a user could observe, compared as a whole.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Snapshot {
    message: Message,
    counts: BySide<usize>,
    players: BySide<PlayerMode>,
    indicators: BySide<bool>,
    board: Board,
    pass_alert_side: Option<Disk>,
    animating: bool,
    confirming_reset: bool,
    alerting_pass: bool,
    saved: Option<SavedState>,
    board_for_move: Option<Board>,
    side_for_move: Option<Disk>,
    thinking: bool,
}

impl TestDelegate {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn with_saved(saved: &SavedState) -> Rc<Self> {
        let delegate = Self::new();
        delegate.recorded.borrow_mut().saved = Some(saved.clone());
        delegate
    }

    fn snapshot(&self) -> Snapshot {
        let r = self.recorded.borrow();
        Snapshot {
            message: r.message.expect("no message shown"),
            counts: r.counts.expect("no counts shown"),
            players: BySide::from_fn(|side| r.players[side].expect("no player mode shown")),
            indicators: BySide::from_fn(|side| r.indicators[side].expect("no indicator shown")),
            board: r.board.clone().expect("no board shown"),
            pass_alert_side: r.pass_alert_side,
            animating: r.board_completion.is_some(),
            confirming_reset: r.reset_confirmation.is_some(),
            alerting_pass: r.pass_completion.is_some(),
            saved: r.saved.clone(),
            board_for_move: r.board_for_move.clone(),
            side_for_move: r.side_for_move,
            thinking: r.move_handler.is_some(),
        }
    }

    /// What the user does to the mode control before the controller hears of it.
    fn set_player(&self, mode: PlayerMode, side: Disk) {
        self.recorded.borrow_mut().players[side] = Some(mode);
    }

    fn complete_board_animation(&self) {
        let completion = self.recorded.borrow_mut().board_completion.take();
        completion.expect("no board animation in progress")();
    }

    fn complete_reset_confirmation(&self, confirmed: bool) {
        let confirmation = self.recorded.borrow_mut().reset_confirmation.take();
        confirmation.expect("no reset confirmation in progress")(confirmed);
    }

    fn complete_pass_alert(&self) {
        let completion = {
            let mut r = self.recorded.borrow_mut();
            r.pass_alert_side = None;
            r.pass_completion.take()
        };
        completion.expect("no pass alert shown")();
    }

    fn take_move_handler(&self) -> MoveHandler {
        let mut r = self.recorded.borrow_mut();
        r.board_for_move = None;
        r.side_for_move = None;
        r.move_handler.take().expect("the computer is not thinking")
    }

    fn handle_computer_move_at(&self, x: i32, y: i32) {
        self.take_move_handler()(x, y);
    }
}

impl GameView for TestDelegate {
    fn update_message(&self, message: Message, _animated: bool) {
        self.recorded.borrow_mut().message = Some(message);
    }

    fn update_disk_counts(&self, dark: usize, light: usize, _animated: bool) {
        self.recorded.borrow_mut().counts = Some(BySide::new(dark, light));
    }

    fn update_player_mode(&self, mode: PlayerMode, side: Disk, _animated: bool) {
        self.recorded.borrow_mut().players[side] = Some(mode);
    }

    fn update_activity_indicator(&self, visible: bool, side: Disk, _animated: bool) {
        self.recorded.borrow_mut().indicators[side] = Some(visible);
    }

    fn update_board(&self, board: &Board, animated: bool, completion: Completion) -> Canceller {
        self.recorded.borrow_mut().board = Some(board.clone());
        if !animated {
            completion();
            return Canceller::default();
        }

        self.recorded.borrow_mut().board_completion = Some(completion);
        let recorded = Rc::downgrade(&self.recorded);
        Canceller::new(move || {
            if let Some(recorded) = recorded.upgrade() {
                recorded.borrow_mut().board_completion = None;
            }
        })
    }

    fn confirm_reset(&self, completion: Confirmation) {
        self.recorded.borrow_mut().reset_confirmation = Some(completion);
    }

    fn alert_pass(&self, side: Disk, completion: Completion) {
        let mut r = self.recorded.borrow_mut();
        r.pass_alert_side = Some(side);
        r.pass_completion = Some(completion);
    }
}

impl GameStore for TestDelegate {
    fn save_game(&self, state: &SavedState) -> Result<(), SaveError> {
        self.recorded.borrow_mut().saved = Some(state.clone());
        Ok(())
    }

    fn load_game(&self) -> Result<SavedState, SaveError> {
        self.recorded.borrow().saved.clone().ok_or(SaveError::Missing)
    }
}

impl MoveStrategy for TestDelegate {
    fn choose_move(&self, board: &Board, side: Disk, handler: MoveHandler) -> Canceller {
        {
            let mut r = self.recorded.borrow_mut();
            r.board_for_move = Some(board.clone());
            r.side_for_move = Some(side);
            r.move_handler = Some(handler);
        }

        let recorded = Rc::downgrade(&self.recorded);
        Canceller::new(move || {
            if let Some(recorded) = recorded.upgrade() {
                let mut r = recorded.borrow_mut();
                r.board_for_move = None;
                r.side_for_move = None;
                r.move_handler = None;
            }
        })
    }
}

fn board(rows: &[&str]) -> Board {
    Board::from_symbols(&rows.join("\n"))
}

fn saved(turn: Option<Disk>, dark: PlayerMode, light: PlayerMode, board: &Board) -> SavedState {
    SavedState {
        turn,
        dark_player: dark,
        light_player: light,
        board: board.clone(),
    }
}

/// Nothing in flight: the view shows `saved` and the controller waits on no one.
fn idle(saved: &SavedState, message: Message, dark: usize, light: usize) -> Snapshot {
    Snapshot {
        message,
        counts: BySide::new(dark, light),
        players: BySide::new(saved.dark_player, saved.light_player),
        indicators: BySide::splat(false),
        board: saved.board.clone(),
        pass_alert_side: None,
        animating: false,
        confirming_reset: false,
        alerting_pass: false,
        saved: Some(saved.clone()),
        board_for_move: None,
        side_for_move: None,
        thinking: false,
    }
}

/// The computer playing `side` has been asked to move on the board shown.
fn thinking(snapshot: Snapshot, side: Disk) -> Snapshot {
    let board = snapshot.board.clone();
    let mut indicators = BySide::splat(false);
    indicators[side] = true;
    Snapshot {
        indicators,
        board_for_move: Some(board),
        side_for_move: Some(side),
        thinking: true,
        ..snapshot
    }
}

fn start(controller: &GameController) {
    controller.start().expect("the game starts");
}

fn new_game() -> SavedState {
    saved(
        Some(Disk::Dark),
        PlayerMode::Manual,
        PlayerMode::Manual,
        &Board::default(),
    )
}

fn midgame_board() -> Board {
    board(&[
        "---xxoo-",
        "x-xx-oxx",
        "xxx-xxox",
        "ooooxxo-",
        "--xoxxx-",
        "----x--o",
        "--------",
        "--------",
    ])
}

fn opening_board() -> Board {
    board(&[
        "--------",
        "--------",
        "--------",
        "---ox---",
        "---xxx--",
        "--------",
        "--------",
        "--------",
    ])
}

fn board_after_f6() -> Board {
    board(&[
        "--------",
        "--------",
        "--------",
        "---ox---",
        "---xx---",
        "----x---",
        "--------",
        "--------",
    ])
}

fn board_after_f6_f6() -> Board {
    board(&[
        "--------",
        "--------",
        "--------",
        "---ox---",
        "---xo---",
        "----xo--",
        "--------",
        "--------",
    ])
}

fn light_to_force_pass() -> (Board, Board) {
    let before = board(&[
        "--------",
        "--------",
        "--------",
        "xxxxxxxx",
        "oooooooo",
        "oooooooo",
        "oooooooo",
        "oooooooo",
    ]);
    let after = board(&[
        "--------",
        "--------",
        "-------o",
        "xxxxxxoo",
        "oooooooo",
        "oooooooo",
        "oooooooo",
        "oooooooo",
    ]);
    (before, after)
}

fn dark_to_finish() -> (Board, Board) {
    let before = board(&[
        "--oxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
    ]);
    let after = board(&[
        "-xxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
    ]);
    (before, after)
}

/// Every placement fails with `expected` and leaves the view as it was.
fn assert_every_placement_fails(
    controller: &GameController,
    delegate: &TestDelegate,
    expected: MoveError,
) {
    let before = delegate.snapshot();
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(controller.place_disk_at(x, y), Err(expected), "at ({}, {})", x, y);
            assert_eq!(delegate.snapshot(), before);
        }
    }
}

/// Every cell `side` cannot take on `board` is rejected as an illegal position.
fn assert_illegal_placements_fail(
    controller: &GameController,
    delegate: &TestDelegate,
    board: &Board,
    side: Disk,
) {
    let before = delegate.snapshot();
    for y in 0..8 {
        for x in 0..8 {
            if board.can_place_disk(side, x, y) {
                continue;
            }
            assert_eq!(
                controller.place_disk_at(x, y),
                Err(MoveError::InvalidMove(PlacementError::IllegalPosition { x, y }))
            );
            assert_eq!(delegate.snapshot(), before);
        }
    }
}

#[test]
fn construction_without_a_saved_game() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);

    let fresh = new_game();
    assert_eq!(delegate.snapshot(), idle(&fresh, Message::Turn(Disk::Dark), 2, 2));
    assert!(!controller.is_started());
    assert!(!controller.is_waiting_for_move());
}

#[test]
fn construction_resumes_a_saved_game() {
    let state = saved(
        Some(Disk::Light),
        PlayerMode::Computer,
        PlayerMode::Computer,
        &midgame_board(),
    );
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);

    assert_eq!(delegate.snapshot(), idle(&state, Message::Turn(Disk::Light), 20, 11));
    assert_eq!(controller.player(Disk::Dark), PlayerMode::Computer);
    assert_eq!(controller.board(), midgame_board());
}

#[test]
fn construction_resumes_a_finished_game() {
    let board = board(&[
        "oxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
        "xxxxxxxx",
    ]);
    let state = saved(None, PlayerMode::Manual, PlayerMode::Computer, &board);
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);

    let result = Message::Result {
        winner: Some(Disk::Dark),
    };
    assert_eq!(delegate.snapshot(), idle(&state, result, 63, 1));

    start(&controller);
    assert_eq!(delegate.snapshot(), idle(&state, result, 63, 1));
    assert_eq!(controller.place_disk_at(0, 0), Err(MoveError::GameIsOver));
}

#[test]
fn start_only_once() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);

    start(&controller);
    assert!(controller.is_started());
    assert!(controller.is_waiting_for_move());
    assert_eq!(delegate.snapshot(), idle(&new_game(), Message::Turn(Disk::Dark), 2, 2));

    assert_eq!(controller.start(), Err(StartError::AlreadyStarted));
}

#[test]
fn start_asks_the_computer_in_turn() {
    let state = saved(
        Some(Disk::Light),
        PlayerMode::Computer,
        PlayerMode::Computer,
        &opening_board(),
    );
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);

    assert_eq!(controller.place_disk_at(3, 5), Err(MoveError::NotAwaitingMove));

    start(&controller);
    assert_eq!(
        delegate.snapshot(),
        thinking(idle(&state, Message::Turn(Disk::Light), 4, 1), Disk::Light)
    );
}

#[test]
fn switching_the_side_in_turn_between_manual_and_computer() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    let board = Board::default();
    let turn = Message::Turn(Disk::Dark);

    delegate.set_player(PlayerMode::Computer, Disk::Dark);
    controller.set_player(PlayerMode::Computer, Disk::Dark);

    let dark_computer = saved(
        Some(Disk::Dark),
        PlayerMode::Computer,
        PlayerMode::Manual,
        &board,
    );
    assert_eq!(
        delegate.snapshot(),
        thinking(idle(&dark_computer, turn, 2, 2), Disk::Dark)
    );

    let late_move = delegate.take_move_handler();
    delegate.set_player(PlayerMode::Manual, Disk::Dark);
    controller.set_player(PlayerMode::Manual, Disk::Dark);
    assert_eq!(delegate.snapshot(), idle(&new_game(), turn, 2, 2));

    // The computer answering after being switched off changes nothing.
    late_move(5, 3);
    assert_eq!(delegate.snapshot(), idle(&new_game(), turn, 2, 2));
    assert_eq!(controller.board(), board);

    delegate.set_player(PlayerMode::Computer, Disk::Light);
    controller.set_player(PlayerMode::Computer, Disk::Light);
    let light_computer = saved(
        Some(Disk::Dark),
        PlayerMode::Manual,
        PlayerMode::Computer,
        &board,
    );
    assert_eq!(delegate.snapshot(), idle(&light_computer, turn, 2, 2));
    assert!(controller.is_waiting_for_move());
}

#[test]
fn reset_can_be_declined_then_confirmed() {
    let state = saved(
        Some(Disk::Light),
        PlayerMode::Manual,
        PlayerMode::Manual,
        &midgame_board(),
    );
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    let resumed = idle(&state, Message::Turn(Disk::Light), 20, 11);

    controller.reset();
    assert_eq!(
        delegate.snapshot(),
        Snapshot {
            confirming_reset: true,
            ..resumed.clone()
        }
    );

    delegate.complete_reset_confirmation(false);
    assert_eq!(delegate.snapshot(), resumed);

    controller.reset();
    delegate.complete_reset_confirmation(true);
    assert_eq!(delegate.snapshot(), idle(&new_game(), Message::Turn(Disk::Dark), 2, 2));
    assert!(controller.is_waiting_for_move());
}

#[test]
fn reset_while_one_is_pending_is_ignored() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    controller.reset();
    let pending = delegate.recorded.borrow_mut().reset_confirmation.take();
    controller.reset();
    assert!(!delegate.snapshot().confirming_reset);

    pending.expect("a confirmation was requested")(false);
    controller.reset();
    assert!(delegate.snapshot().confirming_reset);
}

#[test]
fn reset_while_the_computer_is_thinking() {
    let state = saved(
        Some(Disk::Light),
        PlayerMode::Computer,
        PlayerMode::Computer,
        &opening_board(),
    );
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    controller.reset();
    assert!(delegate.snapshot().confirming_reset);
    assert!(delegate.snapshot().thinking);

    delegate.complete_reset_confirmation(true);
    assert_eq!(delegate.snapshot(), idle(&new_game(), Message::Turn(Disk::Dark), 2, 2));
    assert_eq!(controller.player(Disk::Light), PlayerMode::Manual);
}

#[test]
fn reset_during_a_board_animation() {
    let state = saved(
        Some(Disk::Light),
        PlayerMode::Manual,
        PlayerMode::Manual,
        &opening_board(),
    );
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    controller.place_disk_at(3, 5).expect("a legal move");
    assert!(delegate.snapshot().animating);

    controller.reset();
    assert!(delegate.snapshot().confirming_reset);

    delegate.complete_reset_confirmation(true);
    assert_eq!(delegate.snapshot(), idle(&new_game(), Message::Turn(Disk::Dark), 2, 2));
    assert!(controller.is_waiting_for_move());
}

#[test]
fn reset_before_start_does_not_wait_for_anyone() {
    let state = saved(
        Some(Disk::Light),
        PlayerMode::Manual,
        PlayerMode::Computer,
        &opening_board(),
    );
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);

    controller.reset();
    delegate.complete_reset_confirmation(true);

    assert_eq!(delegate.snapshot(), idle(&new_game(), Message::Turn(Disk::Dark), 2, 2));
    assert!(!controller.is_waiting_for_move());
    assert_eq!(controller.place_disk_at(2, 3), Err(MoveError::NotAwaitingMove));
}

#[test]
fn manual_players_take_turns() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    let board0 = Board::default();
    let board1 = board_after_f6();
    let board2 = board_after_f6_f6();
    let manual = |turn, board: &Board| saved(turn, PlayerMode::Manual, PlayerMode::Manual, board);

    assert_illegal_placements_fail(&controller, &delegate, &board0, Disk::Dark);

    controller.place_disk_at(4, 5).expect("a legal move");
    // The counts and message follow the animation.
    let animating = Snapshot {
        board: board1.clone(),
        animating: true,
        saved: Some(manual(Some(Disk::Light), &board1)),
        ..idle(&new_game(), Message::Turn(Disk::Dark), 2, 2)
    };
    assert_eq!(delegate.snapshot(), animating);
    assert!(!controller.is_waiting_for_move());
    assert_every_placement_fails(&controller, &delegate, MoveError::DuringAnimations);

    delegate.complete_board_animation();
    let after_dark = manual(Some(Disk::Light), &board1);
    assert_eq!(delegate.snapshot(), idle(&after_dark, Message::Turn(Disk::Light), 4, 1));
    assert_illegal_placements_fail(&controller, &delegate, &board1, Disk::Light);

    controller.place_disk_at(5, 5).expect("a legal move");
    let animating = Snapshot {
        board: board2.clone(),
        animating: true,
        saved: Some(manual(Some(Disk::Dark), &board2)),
        ..idle(&after_dark, Message::Turn(Disk::Light), 4, 1)
    };
    assert_eq!(delegate.snapshot(), animating);
    assert_every_placement_fails(&controller, &delegate, MoveError::DuringAnimations);

    delegate.complete_board_animation();
    let after_light = manual(Some(Disk::Dark), &board2);
    assert_eq!(delegate.snapshot(), idle(&after_light, Message::Turn(Disk::Dark), 3, 3));
}

#[test]
fn a_side_without_moves_passes_after_an_alert() {
    let (board0, board1) = light_to_force_pass();
    let state = saved(Some(Disk::Light), PlayerMode::Manual, PlayerMode::Manual, &board0);
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    assert_eq!(delegate.snapshot(), idle(&state, Message::Turn(Disk::Light), 8, 32));

    controller.place_disk_at(7, 2).expect("a legal move");
    let after = saved(Some(Disk::Light), PlayerMode::Manual, PlayerMode::Manual, &board1);
    assert_eq!(
        delegate.snapshot(),
        Snapshot {
            board: board1.clone(),
            animating: true,
            saved: Some(after.clone()),
            ..idle(&state, Message::Turn(Disk::Light), 8, 32)
        }
    );

    delegate.complete_board_animation();
    assert_eq!(
        delegate.snapshot(),
        Snapshot {
            pass_alert_side: Some(Disk::Dark),
            alerting_pass: true,
            ..idle(&after, Message::Turn(Disk::Dark), 6, 35)
        }
    );
    assert!(!controller.is_waiting_for_move());

    delegate.complete_pass_alert();
    assert_eq!(delegate.snapshot(), idle(&after, Message::Turn(Disk::Light), 6, 35));
    assert!(controller.is_waiting_for_move());
}

#[test]
fn a_small_board_refuses_cells_past_its_edges() {
    let board0 = board(&["xxxx", "ooo-", "-xo-", "x---"]);
    let board1 = board(&["xxxx", "ooo-", "ooo-", "x---"]);
    let manual = |turn, board: &Board| saved(turn, PlayerMode::Manual, PlayerMode::Manual, board);
    let state = manual(Some(Disk::Light), &board0);
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    assert_eq!(delegate.snapshot(), idle(&state, Message::Turn(Disk::Light), 6, 4));
    assert_illegal_placements_fail(&controller, &delegate, &board0, Disk::Light);

    // Each of these would bracket a dark run if the board went on past its edge.
    for &(x, y) in &[(-1, -1), (0, -1), (1, -1), (2, -1)] {
        assert_eq!(
            controller.place_disk_at(x, y),
            Err(MoveError::InvalidMove(PlacementError::IllegalPosition { x, y }))
        );
    }
    assert_eq!(delegate.snapshot(), idle(&state, Message::Turn(Disk::Light), 6, 4));
    assert!(controller.is_waiting_for_move());

    controller.place_disk_at(0, 2).expect("a legal move");
    delegate.complete_board_animation();
    let after = manual(Some(Disk::Dark), &board1);
    assert_eq!(delegate.snapshot(), idle(&after, Message::Turn(Disk::Dark), 5, 6));
}

#[test]
fn the_last_move_ends_the_game() {
    let (board0, board1) = dark_to_finish();
    let state = saved(Some(Disk::Dark), PlayerMode::Manual, PlayerMode::Manual, &board0);
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    assert_eq!(delegate.snapshot(), idle(&state, Message::Turn(Disk::Dark), 61, 1));

    controller.place_disk_at(1, 0).expect("a legal move");
    let over = saved(None, PlayerMode::Manual, PlayerMode::Manual, &board1);
    assert_eq!(
        delegate.snapshot(),
        Snapshot {
            board: board1.clone(),
            animating: true,
            saved: Some(over.clone()),
            ..idle(&state, Message::Turn(Disk::Dark), 61, 1)
        }
    );

    delegate.complete_board_animation();
    let result = Message::Result {
        winner: Some(Disk::Dark),
    };
    assert_eq!(delegate.snapshot(), idle(&over, result, 63, 0));
    assert_eq!(controller.place_disk_at(0, 0), Err(MoveError::GameIsOver));
}

#[test]
fn computers_play_each_other() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);
    for side in Disk::SIDES {
        delegate.set_player(PlayerMode::Computer, side);
        controller.set_player(PlayerMode::Computer, side);
    }
    start(&controller);

    let board1 = board_after_f6();
    let board2 = board_after_f6_f6();
    let computers = |turn, board: &Board| {
        saved(turn, PlayerMode::Computer, PlayerMode::Computer, board)
    };

    let opening = computers(Some(Disk::Dark), &Board::default());
    assert_eq!(
        delegate.snapshot(),
        thinking(idle(&opening, Message::Turn(Disk::Dark), 2, 2), Disk::Dark)
    );
    assert_every_placement_fails(&controller, &delegate, MoveError::PlayerInTurnIsNotManual);

    delegate.handle_computer_move_at(4, 5);
    assert_eq!(
        delegate.snapshot(),
        Snapshot {
            board: board1.clone(),
            animating: true,
            saved: Some(computers(Some(Disk::Light), &board1)),
            ..idle(&opening, Message::Turn(Disk::Dark), 2, 2)
        }
    );
    assert_every_placement_fails(&controller, &delegate, MoveError::DuringAnimations);

    delegate.complete_board_animation();
    let after_dark = computers(Some(Disk::Light), &board1);
    assert_eq!(
        delegate.snapshot(),
        thinking(idle(&after_dark, Message::Turn(Disk::Light), 4, 1), Disk::Light)
    );
    assert_every_placement_fails(&controller, &delegate, MoveError::PlayerInTurnIsNotManual);

    delegate.handle_computer_move_at(5, 5);
    assert_eq!(
        delegate.snapshot(),
        Snapshot {
            board: board2.clone(),
            animating: true,
            saved: Some(computers(Some(Disk::Dark), &board2)),
            ..idle(&after_dark, Message::Turn(Disk::Light), 4, 1)
        }
    );

    delegate.complete_board_animation();
    let after_light = computers(Some(Disk::Dark), &board2);
    assert_eq!(
        delegate.snapshot(),
        thinking(idle(&after_light, Message::Turn(Disk::Dark), 3, 3), Disk::Dark)
    );
}

#[test]
fn computer_passes_then_moves_again() {
    let (board0, board1) = light_to_force_pass();
    let state = saved(Some(Disk::Light), PlayerMode::Computer, PlayerMode::Computer, &board0);
    let delegate = TestDelegate::with_saved(&state);
    let controller = GameController::with_delegate(&delegate);
    start(&controller);

    assert_eq!(
        delegate.snapshot(),
        thinking(idle(&state, Message::Turn(Disk::Light), 8, 32), Disk::Light)
    );

    delegate.handle_computer_move_at(7, 2);
    delegate.complete_board_animation();
    let after = saved(Some(Disk::Light), PlayerMode::Computer, PlayerMode::Computer, &board1);
    assert_eq!(
        delegate.snapshot(),
        Snapshot {
            pass_alert_side: Some(Disk::Dark),
            alerting_pass: true,
            ..idle(&after, Message::Turn(Disk::Dark), 6, 35)
        }
    );

    delegate.complete_pass_alert();
    assert_eq!(
        delegate.snapshot(),
        thinking(idle(&after, Message::Turn(Disk::Light), 6, 35), Disk::Light)
    );
}

#[test]
fn an_illegal_computer_move_is_asked_again() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);
    delegate.set_player(PlayerMode::Computer, Disk::Dark);
    controller.set_player(PlayerMode::Computer, Disk::Dark);
    start(&controller);

    delegate.handle_computer_move_at(0, 0);

    let snapshot = delegate.snapshot();
    assert!(snapshot.thinking);
    assert_eq!(snapshot.side_for_move, Some(Disk::Dark));
    assert_eq!(snapshot.board, Board::default());
    assert_eq!(controller.board(), Board::default());
}

#[test]
fn dropping_the_controller_cancels_outstanding_work() {
    let delegate = TestDelegate::new();
    let controller = GameController::with_delegate(&delegate);
    delegate.set_player(PlayerMode::Computer, Disk::Dark);
    controller.set_player(PlayerMode::Computer, Disk::Dark);
    start(&controller);
    assert!(delegate.snapshot().thinking);

    drop(controller);
    assert!(!delegate.snapshot().thinking);
}
