//! CLI interface for price-pulse
//!
//! Provides subcommands for:
//! - `run`: Live dashboard fed by the price stream
//! - `replay`: Feed recorded frames through the dashboard
//! - `config`: Show the effective configuration

mod replay;
mod run;

pub use replay::{replay_frames, ReplayArgs, ReplayStats};
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "price-pulse")]
#[command(about = "Real-time crypto price dashboard fed by the CoinCap price stream")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the live dashboard; type an asset name to switch the display
    Run(RunArgs),
    /// Replay recorded frames (one JSON object per line)
    Replay(ReplayArgs),
    /// Show configuration
    Config,
}
