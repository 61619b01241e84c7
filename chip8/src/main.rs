use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod keymap;
mod run;

/// Run a Chip-8 ROM in a window.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to the ROM to run
    pub rom: PathBuf,

    /// Window pixels per Chip-8 pixel
    #[arg(short, long, default_value_t = 10)]
    pub scale: u32,

    /// Milliseconds between instructions
    #[arg(short, long, default_value_t = 2)]
    pub delay: u64,

    /// Seed for the random number generator, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    run::run(Args::parse())
}
