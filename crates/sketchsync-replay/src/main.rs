//! Replays a recorded stream of drawing-surface change events through a
//! whiteboard session backed by file storage, then prints the persisted
//! board.

mod replay;

use clap::Parser;
use replay::{ReplayError, parse_events, replay};
use sketchsync_core::{Board, BoardStorage, FileStorage, SessionConfig, WhiteboardSession};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "sketchsync-replay", version, about)]
struct Cli {
    /// Recorded change events, one JSON object per line
    #[arg(long)]
    events: PathBuf,

    /// Board to open before replaying (a fresh board is created otherwise)
    #[arg(long)]
    board: Option<PathBuf>,

    /// Directory for board files (defaults to the platform data directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Session configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the debounce interval in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

fn read(path: &Path) -> Result<String, ReplayError> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(cli: &Cli) -> Result<SessionConfig, ReplayError> {
    let mut config = match &cli.config {
        Some(path) => {
            SessionConfig::from_json(&read(path)?).map_err(|source| ReplayError::Parse {
                what: "session config",
                path: path.clone(),
                source,
            })?
        }
        None => SessionConfig::default(),
    };
    if let Some(debounce_ms) = cli.debounce_ms {
        config = config.with_debounce_ms(debounce_ms);
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<Board, ReplayError> {
    let config = load_config(&cli)?;

    let storage = Arc::new(match &cli.store {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    });
    log::info!("Storing boards in {}", storage.base_path().display());

    let board = match &cli.board {
        Some(path) => Board::from_json(&read(path)?).map_err(|source| ReplayError::Parse {
            what: "board",
            path: path.clone(),
            source,
        })?,
        None => Board::new("Replay", "sketchsync-replay"),
    };
    pollster::block_on(storage.insert(&board))?;

    let events = parse_events(&read(&cli.events)?)?;
    log::info!(
        "Replaying {} events with a {}ms debounce",
        events.len(),
        config.debounce_ms
    );

    let (mut session, _) = WhiteboardSession::open(&board, Arc::clone(&storage), config);

    let summary = replay(&mut session, &events, Instant::now());
    log::info!(
        "{} notifications, {} material changes, {} saves",
        summary.notifications,
        summary.changes,
        summary.saves
    );

    Ok(pollster::block_on(storage.load(board.id))?)
}

fn main() -> ExitCode {
    env_logger::init();

    let result = run(Cli::parse()).and_then(|board| board.to_json().map_err(ReplayError::Encode));
    match result {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
