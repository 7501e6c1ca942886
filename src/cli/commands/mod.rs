//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod catalog;
pub mod completions;
pub mod config;
pub mod recommend;

use crate::app::AppContext;
use crate::error::Result;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Recommend(args) => recommend::run(ctx, args),
        Commands::Catalog(args) => catalog::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recommend instructors by filters and an optional free-text query
    Recommend(recommend::RecommendArgs),

    /// Summarize or list the loaded catalog
    Catalog(catalog::CatalogArgs),

    /// Show the effective configuration
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

impl Commands {
    /// Commands that need the catalog and embedding cache.
    #[must_use]
    pub const fn needs_engine(&self) -> bool {
        matches!(self, Self::Recommend(_) | Self::Catalog(_))
    }

    /// Argument checks that need neither the catalog nor the engine.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Recommend(args) => recommend::validate(args),
            _ => Ok(()),
        }
    }
}
