//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub mod commands;
pub mod output;

pub use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "ffcs",
    version,
    about = "Recommend faculty and course offerings by filters and free-text style queries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a config file (overrides global and project config)
    #[arg(long, global = true, env = "FFCS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Catalog snapshot (CSV) to serve
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Machine-readable JSON output (shorthand for --format json)
    #[arg(long, global = true)]
    pub robot: bool,

    /// Output format
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Output format from flags, falling back to the configured default.
    #[must_use]
    pub fn output_format(&self, configured: &str) -> OutputFormat {
        if self.robot {
            return OutputFormat::Json;
        }
        self.format.unwrap_or_else(|| {
            OutputFormat::from_str(configured, true).unwrap_or(OutputFormat::Human)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    #[must_use]
    pub const fn is_robot(self) -> bool {
        matches!(self, Self::Json)
    }
}
