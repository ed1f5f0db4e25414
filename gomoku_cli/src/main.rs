use std::io::{stdin, stdout};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use gomoku::{load_game_history, FileStorage, Replay, DEFAULT_VIEW_RADIUS, MAX_VIEW_RADIUS};
use gomoku_cli::{
    autoplay, resolve_players, run_session, run_viewer, sleep_for, write_history, Config,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Directory for the game history and the current players
    #[arg(short, long, default_value = "gomoku-data")]
    data_dir: PathBuf,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: LevelFilter,

    /// How many cells to show in each direction from the center of the view
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_VIEW_RADIUS,
        value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_VIEW_RADIUS))
    )]
    view_radius: u32,

    /// RNG seed for the ids of recorded games
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play hot-seat games in the terminal
    Play {
        /// Name of the player with the X marks, who moves first
        #[arg(long)]
        player_x: Option<String>,

        /// Name of the player with the O marks
        #[arg(long)]
        player_o: Option<String>,
    },
    /// List the finished games, most recent first
    History,
    /// Step through a finished game
    Replay {
        /// Index of the game in the history, 0 being the most recent one
        index: usize,

        /// Play the game from the start instead of reading commands
        #[arg(short, long, default_value_t = false)]
        autoplay: bool,

        /// Milliseconds between two moves during auto-play
        #[arg(long, default_value_t = 800)]
        interval_ms: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut config = Config {
        rng: StdRng::seed_from_u64(seed),
        view_radius: args.view_radius,
    };

    let mut storage = FileStorage::new(&args.data_dir).with_context(|| {
        format!("Could not open data directory '{}'", args.data_dir.display())
    })?;

    match args.command {
        Command::Play { player_x, player_o } => {
            let players = resolve_players(&mut storage, player_x, player_o)?;
            let num_recorded = run_session(
                &mut config,
                &mut storage,
                &players,
                stdin().lock(),
                stdout().lock(),
            )?;
            eprintln!("{} finished game(s) recorded", num_recorded);
        }
        Command::History => {
            write_history(&load_game_history(&storage), stdout().lock())?;
        }
        Command::Replay {
            index,
            autoplay: play_automatically,
            interval_ms,
        } => {
            let mut history = load_game_history(&storage);
            if index >= history.len() {
                anyhow::bail!(
                    "There is no game with index {} ({} games stored)",
                    index,
                    history.len()
                );
            }
            let record = history.swap_remove(index);
            let mut replay = Replay::new(record).with_interval(Duration::from_millis(interval_ms));
            if play_automatically {
                autoplay(&config, &mut replay, stdout().lock(), sleep_for)?;
            } else {
                run_viewer(
                    &config,
                    &mut replay,
                    stdin().lock(),
                    stdout().lock(),
                    sleep_for,
                )?;
            }
        }
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Standard output is reserved for the board
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
