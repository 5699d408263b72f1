use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use goro_engine::{MOVE_GEN, Position, START_SFEN, legal_moves, perft};
use mimalloc::MiMalloc;
use tracing::{Level, debug, level_filters::LevelFilter, warn};
use tracing_subscriber::{Registry, layer::SubscriberExt, prelude::*, util::SubscriberInitExt};

use goro_cli::{ReadSessionCommand, Session, SessionCommandStdinReader};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Count leaf positions below a position, split by first move.
    Perft {
        sfen: String,
        depth: u8,
    },
    /// List the legal moves of a position.
    Moves {
        #[arg(default_value = START_SFEN)]
        sfen: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    enable_logging()?;

    match cli.command {
        Some(Commands::Perft { sfen, depth }) => cli_perft(&sfen, depth),
        Some(Commands::Moves { sfen }) => cli_moves(&sfen),
        None => session_main_loop(),
    }
}

fn parse_sfen(sfen: &str) -> Result<Position> {
    Position::from_sfen(sfen).with_context(|| format!("Couldn't parse given sfen: `{}`", sfen))
}

fn cli_perft(sfen: &str, depth: u8) -> Result<()> {
    let position = parse_sfen(sfen)?;
    let (move_counts, tot_moves) = perft(&position, depth as usize, MOVE_GEN);
    for (mve, move_nodes) in move_counts.into_iter() {
        println!("{}:  {}", mve, move_nodes);
    }
    println!("Total: {}", tot_moves);
    Ok(())
}

fn cli_moves(sfen: &str) -> Result<()> {
    let position = parse_sfen(sfen)?;
    for (idx, mve) in legal_moves(&position, position.turn()).iter().enumerate() {
        println!("{}: {}", idx, mve);
    }
    Ok(())
}

fn session_main_loop() -> Result<()> {
    let mut session = Session::new(MOVE_GEN, io::stdout());
    let mut reader = SessionCommandStdinReader;

    while let Some(line) = reader.read_session_command()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("{}", line);

        if let Err(err) = session.handle_command(line) {
            warn!("{}", err);
            println!("error: {}", err);
            io::stdout().flush()?;
        }
        if session.has_quit() {
            break;
        }
    }
    Ok(())
}

fn enable_logging() -> Result<()> {
    let log_path = if let Ok(log_path_str) = env::var("GORO_LOG_PATH") {
        PathBuf::from_str(&log_path_str)?
    } else {
        let log_path = get_default_log_path()?;
        if let Some(log_path_dir) = log_path.parent() {
            fs::create_dir_all(log_path_dir)?;
        }
        log_path
    };

    let log_file =
        File::create(&log_path).with_context(|| format!("Couldn't create file {:?}", log_path))?;

    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        );

    let log_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_filter(LevelFilter::from_level(Level::DEBUG));

    Registry::default().with(stderr_layer).with(log_layer).init();

    Ok(())
}

fn get_default_log_path() -> Result<PathBuf> {
    let mut log_path = dirs::home_dir().context("Home directory not set")?;
    log_path.push(".local/state/goro");
    log_path.push("goro.log");
    Ok(log_path)
}
