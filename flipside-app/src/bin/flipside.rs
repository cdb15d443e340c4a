//! Play Reversi in the terminal.
//!
//! Type a cell (`e6`) to move, `dark computer` / `light manual` to change who
//! plays a side, `reset` to start over, and `quit` to leave. The game is saved
//! after every move and resumed on the next launch.

use anyhow::Result;
use async_std::task;
use clap::Parser;
use flipside_app::terminal::{self, StdinLines, TerminalView};
use flipside_app::{
    FileData, GameController, GameSaver, GameView, PlayerMode, RandomStrategy, TimerQueue,
};
use flipside_othello::Disk;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Play Reversi against yourself or a random computer player.
#[derive(Parser, Debug)]
#[command(name = "flipside", version)]
struct Options {
    /// Where the game is saved between sessions
    #[arg(long, env = "FLIPSIDE_SAVE_FILE", default_value = "flipside-game.txt")]
    save_file: PathBuf,

    /// How long the computer thinks before moving, in milliseconds
    #[arg(long, default_value_t = 2000)]
    think_ms: u64,

    /// Delay between flipped disks, in milliseconds
    #[arg(long, default_value_t = 150)]
    flip_ms: u64,

    /// Seed for the computer player's choices
    #[arg(long)]
    seed: Option<u64>,

    /// Who plays dark, overriding the saved game
    #[arg(long, value_parser = parse_mode)]
    dark: Option<PlayerMode>,

    /// Who plays light, overriding the saved game
    #[arg(long, value_parser = parse_mode)]
    light: Option<PlayerMode>,
}

fn parse_mode(name: &str) -> Result<PlayerMode, String> {
    match name {
        "manual" => Ok(PlayerMode::Manual),
        "computer" => Ok(PlayerMode::Computer),
        _ => Err(format!("expected `manual` or `computer`, got `{}`", name)),
    }
}

fn main() -> Result<()> {
    let options = Options::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    task::block_on(run(options))
}

async fn run(options: Options) -> Result<()> {
    info!(?options, "starting flipside");

    let timers = Rc::new(TimerQueue::new());
    let view = TerminalView::new(
        io::stdout(),
        timers.clone(),
        Duration::from_millis(options.flip_ms),
    );
    let saver = Rc::new(GameSaver::new(FileData::new(&options.save_file)));
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let strategy = Rc::new(RandomStrategy::with_delay(
        rng,
        timers.clone(),
        Duration::from_millis(options.think_ms),
    ));

    let controller = GameController::new(&view, &saver, &strategy);
    for (side, mode) in [(Disk::Dark, options.dark), (Disk::Light, options.light)] {
        if let Some(mode) = mode {
            controller.set_player(mode, side);
            view.update_player_mode(mode, side, false);
        }
    }

    view.render();
    controller.start()?;

    let mut input = StdinLines::spawn();
    terminal::drive(&controller, &view, &timers, &mut input).await;

    info!("bye");
    Ok(())
}
