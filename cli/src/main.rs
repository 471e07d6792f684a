//! Terminal front end: difficulty menu, board drawing and key handling around `calcsweeper-core`.
mod app;
mod keys;
mod render;
mod terminal;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use calcsweeper_core::Difficulty;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Beginner,
    Intermediate,
    Expert,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Beginner => Difficulty::Beginner,
            DifficultyArg::Intermediate => Difficulty::Intermediate,
            DifficultyArg::Expert => Difficulty::Expert,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Start straight into a game with this preset instead of showing the menu
    #[arg(short, long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write logs to this file; the terminal itself is used for the board
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        setup_logging(path, args.verbose.tracing_level_filter())?;
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    log::debug!("seed: {}", seed);

    app::App::new(seed, args.difficulty.map(Difficulty::from)).run()
}

fn setup_logging(path: &Path, level: tracing::level_filters::LevelFilter) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("could not create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);

    // RUST_LOG directives refine the level picked with -v/-q
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .finish()
        .try_init()
        .context("could not install logger")?;

    log::info!("Logging initialized at {}", level);
    Ok(())
}

/// Seeds from the wall clock, the same way the calculator seeds from its real-time clock.
fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
