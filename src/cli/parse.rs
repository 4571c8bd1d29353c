//! CLI parse: clap types for drivediff. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// drivediff CLI - verify a local directory against its sync mirror
#[derive(Parser)]
#[command(name = "drivediff")]
#[command(about = "Compares your directory with its sync mirror")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Suppress all logging
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare the input directory with the sync mirror
    ///
    /// Red lines are files the mirror is missing; yellow lines are files
    /// the mirror has that no longer exist in the input.
    Diff {
        /// Sync mirror root to verify
        target: PathBuf,

        /// Input directory of the files to be compared
        #[arg(long, short = 'i', default_value = ".")]
        input: PathBuf,

        /// Merge global and input dir .driveignore
        #[arg(long, short = 'M')]
        merge_ignores: bool,

        /// Print paths without color
        #[arg(long)]
        no_color: bool,
    },
}
