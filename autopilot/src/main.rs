use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use twenty48::{Board, Direction, MoveOutcome};

use crate::recording::Recorder;

mod recording;

/// Plays uniformly random moves until no move changes the board anymore.
#[derive(Parser)]
struct Args {
    /// Number of rows
    #[arg(long, default_value_t = 4)]
    rows: usize,

    /// Number of columns
    #[arg(long, default_value_t = 4)]
    columns: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many moves even if the game is not over
    #[arg(short, long, default_value_t = 100_000)]
    max_moves: usize,

    /// Rearrange the board into a descending chain after every move
    #[arg(short, long, default_value_t = false)]
    auto_chain: bool,

    /// Record the session as a JSON file into this directory
    #[arg(short, long)]
    record_session_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    // Get a random seed
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut recorder = if let Some(dir_path) = args.record_session_to_directory {
        Some(Recorder::new(dir_path, seed)?)
    } else {
        None
    };

    let mut board = Board::with_rng(args.rows, args.columns, StdRng::seed_from_u64(rng.gen()));

    let mut moves_played = 0;
    let mut game_over = false;
    while moves_played < args.max_moves {
        let direction = *Direction::ALL.choose(&mut rng).expect("four directions");
        let outcome = board.make_move(direction);
        moves_played += 1;

        if let Some(rec) = &mut recorder {
            rec.store_move(direction, board.highest_value());
        }
        if let MoveOutcome::GameOver { score } = outcome {
            info!(score, moves_played, "No move changes the board anymore");
            game_over = true;
            break;
        }
        if args.auto_chain {
            board.auto_chain();
        }
        if moves_played % 1000 == 0 {
            debug!(moves_played, highest = board.highest_value());
        }
    }

    if let Some(rec) = &mut recorder {
        rec.write_session_recording()?;
    }

    info!(moves_played, highest = board.highest_value(), game_over);
    println!("{}", board);
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}
