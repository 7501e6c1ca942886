//! Error types for ffcs-buddy.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FfcsError>;

#[derive(Debug, Error)]
pub enum FfcsError {
    #[error("catalog snapshot not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("catalog {} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("embedding provider error: {0}")]
    Embedding(String),

    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl FfcsError {
    /// Stable machine-readable code used in robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CatalogNotFound(_) => "catalog_not_found",
            Self::MissingColumns { .. } => "missing_columns",
            Self::Catalog(_) => "catalog_error",
            Self::Config(_) => "config_error",
            Self::MissingConfig(_) => "missing_config",
            Self::Embedding(_) => "embedding_error",
            Self::DimensionMismatch { .. } => "dimension_mismatch",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }

    /// Errors that keep the engine from ever becoming ready.
    #[must_use]
    pub const fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::CatalogNotFound(_)
                | Self::MissingColumns { .. }
                | Self::Catalog(_)
                | Self::Config(_)
                | Self::MissingConfig(_)
        )
    }
}

impl From<csv::Error> for FfcsError {
    fn from(err: csv::Error) -> Self {
        let location = err
            .position()
            .map(|pos| format!(" (line {})", pos.line()))
            .unwrap_or_default();
        Self::Catalog(format!("{err}{location}"))
    }
}
