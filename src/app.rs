use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::catalog::Catalog;
use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::engine::Recommender;
use crate::error::{FfcsError, Result};
use crate::search::build_embedder;

pub struct AppContext {
    pub config: Config,
    pub output_format: OutputFormat,
    engine: Option<Arc<Recommender>>,
}

impl AppContext {
    /// Effective configuration: files and `FFCS_*` variables, then the
    /// `--catalog` flag.
    pub fn load_config(cli: &Cli) -> Result<Config> {
        let cwd = std::env::current_dir()?;
        let mut config = Config::load(cli.config.as_deref(), &cwd)?;
        if let Some(path) = &cli.catalog {
            config.catalog.path.clone_from(path);
        }
        Ok(config)
    }

    /// Validate the command's arguments and, for commands that serve
    /// recommendations, build the engine. Invalid arguments are rejected
    /// before the catalog is loaded; any catalog or provider failure is
    /// fatal.
    pub fn new(cli: &Cli, config: Config) -> Result<Self> {
        cli.command.validate()?;

        let engine = if cli.command.needs_engine() {
            Some(Arc::new(build_engine(&config)?))
        } else {
            None
        };

        Ok(Self {
            output_format: cli.output_format(&config.output.format),
            config,
            engine,
        })
    }

    /// The shared engine handle.
    pub fn engine(&self) -> Result<&Arc<Recommender>> {
        self.engine
            .as_ref()
            .ok_or_else(|| FfcsError::MissingConfig("engine was not initialized".to_string()))
    }

    #[must_use]
    pub const fn robot(&self) -> bool {
        self.output_format.is_robot()
    }
}

/// Load the catalog, construct the embedding provider and embed every item.
pub fn build_engine(config: &Config) -> Result<Recommender> {
    let started = Instant::now();
    let catalog = Catalog::load(resolve(&config.catalog.path), &config.catalog.columns)?;
    let embedder = build_embedder(&config.embedding, &catalog)?;
    let engine =
        Recommender::new(catalog, embedder)?.with_query_cache(config.cache.query_capacity);
    info!(
        items = engine.catalog().len(),
        elapsed_ms = started.elapsed().as_millis(),
        "engine ready"
    );
    Ok(engine)
}

fn resolve(path: &Path) -> std::path::PathBuf {
    let text = path.to_string_lossy();
    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
