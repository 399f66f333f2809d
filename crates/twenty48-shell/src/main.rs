use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use twenty48_grid::engine::{parse_snapshot, Grid, Snapshot, GOAL_TILE};
use twenty48_shell::app::{Message, Shell};
use twenty48_shell::config::Config;
use twenty48_shell::cues::LogCues;
use twenty48_shell::flavor::{format_points, label_for};
use twenty48_shell::haptics::LogBuzzer;
use twenty48_shell::input::{self, Action};
use twenty48_shell::score::ScoreBoard;
use twenty48_shell::store::{Debounced, StateStore};

#[derive(Debug, Parser)]
#[command(author, version, about = "Slide and merge tiles on a 4x4 grid in your terminal")]
struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the saved-state document (overrides the config)
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Fixed RNG seed for reproducible games (overrides the config)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,
}

type Game = Grid<StdRng, Shell>;

fn new_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn start_new_game(game: Game, seed: Option<u64>) -> Game {
    let mut shell = game.into_observer();
    shell.begin_new_game();
    Grid::with_rng(new_rng(seed), shell)
}

fn render(game: &Game) {
    let shell = game.observer();
    println!("{game}");
    println!(
        "score {}  best {}",
        format_points(shell.scores.score()),
        format_points(shell.scores.best()),
    );
    match shell.message() {
        Some(Message::Start) => println!("press enter to start a new game"),
        Some(Message::Win) => println!(
            "you reached {} ({})! press enter to keep going",
            GOAL_TILE,
            label_for(GOAL_TILE)
        ),
        Some(Message::WinAndOver) => println!(
            "you reached {} ({}) and the grid locked. n: new game",
            GOAL_TILE,
            label_for(GOAL_TILE)
        ),
        Some(Message::Over) => println!("no moves left. n: new game"),
        None => {}
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = match &cli.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    if let Some(dir) = cli.state_dir {
        config.state_dir = dir;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let store = StateStore::new(&config.state_dir)?;
    let saved = store.load();
    let debounced = Debounced::new(store, Duration::from_millis(config.debounce_ms));

    let resumed: Option<Snapshot> = saved.game.as_deref().and_then(|raw| {
        parse_snapshot(raw)
            .map_err(|err| warn!("saved game unusable ({err}), starting fresh"))
            .ok()
    });
    let resuming = resumed.is_some();
    let scores = ScoreBoard::resume(if resuming { saved.score } else { 0 }, saved.best);
    let shell = Shell::new(
        scores,
        debounced,
        Box::new(LogCues),
        Box::new(LogBuzzer),
        resuming,
    );

    let mut game: Game = match resumed {
        Some(snapshot) => {
            info!("resumed game at {} points", saved.score);
            Grid::restore_with_rng(&snapshot, new_rng(config.seed), shell)?
        }
        None => Grid::with_rng(new_rng(config.seed), shell),
    };

    println!("w/a/s/d or up/left/down/right: move  n: new game  q: quit");
    render(&game);

    for line in io::stdin().lock().lines() {
        let line = line?;
        let Some(action) = input::parse(&line) else {
            println!("? w/a/s/d to move, n for new game, q to quit");
            continue;
        };
        match action {
            Action::Quit => break,
            Action::NewGame => game = start_new_game(game, config.seed),
            Action::Dismiss => {
                // The start overlay acts as a new-game button; any other
                // overlay just comes down.
                if game.observer().message() == Some(Message::Start) {
                    game = start_new_game(game, config.seed);
                } else {
                    game.observer_mut().dismiss();
                }
            }
            Action::Shift(direction) => {
                // Moves are ignored while an overlay is up; the player
                // acknowledges it first.
                if game.observer().message().is_none() {
                    game.make_move(direction);
                }
            }
        }
        render(&game);
    }
    Ok(())
}
