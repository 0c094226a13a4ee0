//! CLI interface for ensemble-engine
//!
//! Provides subcommands for:
//! - `run`: start the decision loop (paper execution)
//! - `status`: show the latest persisted snapshot
//! - `config`: show effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ensemble-engine")]
#[command(about = "Risk-aware multi-strategy ensemble trading engine")]
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
    /// Start the decision loop
    Run(RunArgs),
    /// Show the latest persisted snapshot
    Status,
    /// Show effective configuration
    Config,
}
