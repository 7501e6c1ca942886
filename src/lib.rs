//! FFCS Buddy
//!
//! Hybrid filter-and-rank recommendation of instructors and course
//! offerings: structural substring/tag filters narrow a static catalog, then
//! the survivors are ordered by semantic similarity to a free-text query or,
//! without one, by their quality score.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ffcs_buddy::catalog::Catalog;
//! use ffcs_buddy::config::ColumnsConfig;
//! use ffcs_buddy::engine::{RecommendRequest, Recommender};
//! use ffcs_buddy::search::HashEmbedder;
//!
//! # fn main() -> ffcs_buddy::Result<()> {
//! let catalog = Catalog::load("ffcs_data.csv", &ColumnsConfig::default())?;
//! let engine = Recommender::new(catalog, Arc::new(HashEmbedder::default()))?;
//! let results = engine.recommend(
//!     &RecommendRequest::new().course_code("CSE1004").query("a relaxed teacher").top_n(5),
//! )?;
//! # let _ = results;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod search;
pub mod test_utils;
pub mod utils;

pub use error::{FfcsError, Result};
