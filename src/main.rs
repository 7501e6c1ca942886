//! ffcs - FFCS Buddy CLI
//!
//! Recommend faculty and course offerings by structural filters and
//! free-text style queries.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use ffcs_buddy::Result;
use ffcs_buddy::app::AppContext;
use ffcs_buddy::cli::output::{emit_robot, robot_error};
use ffcs_buddy::cli::{Cli, Commands, OutputFormat};
use ffcs_buddy::config::{Config, env_output_format};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match &cli.command {
        Commands::Completions(_) => Ok(Config::default()),
        _ => AppContext::load_config(&cli),
    };
    let format = match &config {
        Ok(config) => cli.output_format(&config.output.format),
        // Config failed to load: environment alone decides how to report it.
        Err(_) => cli.output_format(&env_output_format().unwrap_or_else(|| "human".to_string())),
    };
    init_tracing(&cli, format);

    match config.and_then(|config| run(&cli, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if format.is_robot() {
                // Robot mode: JSON error output to stdout
                if emit_robot(&robot_error(&e)).is_err() {
                    eprintln!("Error: {e}");
                }
            } else {
                eprintln!("Error: {e}");
            }
            if e.is_startup_fatal() {
                tracing::error!(code = e.code(), "engine failed to start");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: Config) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return ffcs_buddy::cli::commands::completions::run(args);
    }
    let ctx = AppContext::new(cli, config)?;
    ffcs_buddy::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli, format: OutputFormat) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,ffcs_buddy=info",
        1 => "info,ffcs_buddy=debug",
        2 => "debug,ffcs_buddy=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if format.is_robot() {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
