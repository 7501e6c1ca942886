use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FfcsError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration: defaults, then global and project files (or a
    /// single explicit file), then `FFCS_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>, project_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("FFCS_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_dir)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("ffcs/config.toml"))
    }

    fn load_project(project_dir: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&project_dir.join("ffcs.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| FfcsError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| FfcsError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.catalog {
            self.catalog.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.recommend {
            self.recommend.merge(patch);
        }
        if let Some(patch) = patch.cache {
            self.cache.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(format) = env_output_format() {
            self.output.format = format;
        }

        if let Some(value) = env_string("FFCS_CATALOG_PATH") {
            self.catalog.path = PathBuf::from(value);
        }
        if let Some(value) = env_string("FFCS_CATALOG_NAME_COLUMN") {
            self.catalog.columns.name = value;
        }
        if let Some(value) = env_string("FFCS_CATALOG_DEPARTMENT_COLUMN") {
            self.catalog.columns.department = value;
        }
        if let Some(value) = env_string("FFCS_CATALOG_TAGS_COLUMN") {
            self.catalog.columns.tags = value;
        }
        if let Some(value) = env_string("FFCS_CATALOG_SCORE_COLUMN") {
            self.catalog.columns.quality_score = value;
        }
        if let Some(values) = env_list("FFCS_CATALOG_ATTRIBUTES") {
            self.catalog.columns.attributes = values;
        }

        if let Some(value) = env_string("FFCS_EMBEDDING_BACKEND") {
            self.embedding.backend = parse_backend(&value)?;
        }
        if let Some(value) = env_usize("FFCS_EMBEDDING_DIMS")? {
            self.embedding.dims = value;
        }
        if let Some(value) = env_string("FFCS_EMBEDDING_MODEL") {
            self.embedding.model = value;
        }
        if let Some(value) = env_string("FFCS_EMBEDDING_BASE_URL") {
            self.embedding.base_url = value;
        }
        if let Some(value) = env_string("FFCS_EMBEDDING_API_KEY_ENV") {
            self.embedding.api_key_env = value;
        }
        if let Some(value) = env_duration("FFCS_EMBEDDING_TIMEOUT")? {
            self.embedding.timeout = value;
        }
        if let Some(value) = env_usize("FFCS_EMBEDDING_MAX_RETRIES")? {
            self.embedding.max_retries = value;
        }
        if let Some(value) = env_usize("FFCS_EMBEDDING_BATCH_SIZE")? {
            self.embedding.batch_size = value;
        }

        if let Some(value) = env_usize("FFCS_RECOMMEND_DEFAULT_TOP_N")? {
            self.recommend.default_top_n = value;
        }

        if let Some(value) = env_usize("FFCS_CACHE_QUERY_CAPACITY")? {
            self.cache.query_capacity = value;
        }
        if env_bool("FFCS_CACHE_DISABLED").unwrap_or(false) {
            self.cache.query_capacity = 0;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub path: PathBuf,
    pub columns: ColumnsConfig,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("ffcs_data.csv")
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            columns: ColumnsConfig::default(),
        }
    }
}

impl CatalogConfig {
    fn merge(&mut self, patch: CatalogPatch) {
        if let Some(value) = patch.path {
            self.path = value;
        }
        if let Some(patch) = patch.columns {
            self.columns.merge(patch);
        }
    }
}

/// Column names of the catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub name: String,
    pub department: String,
    pub tags: String,
    pub quality_score: String,
    pub attributes: Vec<String>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            name: "faculty_name".to_string(),
            department: "department".to_string(),
            tags: "style_tags".to_string(),
            quality_score: "rating".to_string(),
            attributes: vec!["course_code".to_string(), "slot".to_string()],
        }
    }
}

impl ColumnsConfig {
    fn merge(&mut self, patch: ColumnsPatch) {
        if let Some(value) = patch.name {
            self.name = value;
        }
        if let Some(value) = patch.department {
            self.department = value;
        }
        if let Some(value) = patch.tags {
            self.tags = value;
        }
        if let Some(value) = patch.quality_score {
            self.quality_score = value;
        }
        if let Some(values) = patch.attributes {
            self.attributes = values;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// FNV-1a feature hashing, no model required
    Hash,
    /// Multi-hot vector over the catalog's tag vocabulary
    Tags,
    /// OpenAI-compatible `/embeddings` endpoint
    Openai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub dims: usize,
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub max_retries: usize,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Hash,
            dims: 384,
            model: "all-MiniLM-L6-v2".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
            batch_size: 64,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.dims {
            self.dims = value;
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.base_url {
            self.base_url = value;
        }
        if let Some(value) = patch.api_key_env {
            self.api_key_env = value;
        }
        if let Some(value) = patch.timeout {
            self.timeout = value;
        }
        if let Some(value) = patch.max_retries {
            self.max_retries = value;
        }
        if let Some(value) = patch.batch_size {
            self.batch_size = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    pub default_top_n: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self { default_top_n: 10 }
    }
}

impl RecommendConfig {
    fn merge(&mut self, patch: RecommendPatch) {
        if let Some(value) = patch.default_top_n {
            self.default_top_n = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of live query embeddings kept; 0 disables the cache
    pub query_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { query_capacity: 256 }
    }
}

impl CacheConfig {
    fn merge(&mut self, patch: CachePatch) {
        if let Some(value) = patch.query_capacity {
            self.query_capacity = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub catalog: Option<CatalogPatch>,
    pub embedding: Option<EmbeddingPatch>,
    pub recommend: Option<RecommendPatch>,
    pub cache: Option<CachePatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogPatch {
    pub path: Option<PathBuf>,
    pub columns: Option<ColumnsPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ColumnsPatch {
    pub name: Option<String>,
    pub department: Option<String>,
    pub tags: Option<String>,
    pub quality_score: Option<String>,
    pub attributes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub backend: Option<EmbeddingBackend>,
    pub dims: Option<usize>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub max_retries: Option<usize>,
    pub batch_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RecommendPatch {
    pub default_top_n: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CachePatch {
    pub query_capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub format: Option<String>,
}

/// Output format selected by `FFCS_OUTPUT_FORMAT` or `FFCS_ROBOT` alone.
///
/// Used when the config files themselves fail to load and the error still
/// has to be reported in the requested format.
#[must_use]
pub fn env_output_format() -> Option<String> {
    env_string("FFCS_OUTPUT_FORMAT")
        .or_else(|| env_bool("FFCS_ROBOT").unwrap_or(false).then(|| "json".to_string()))
}

fn parse_backend(value: &str) -> Result<EmbeddingBackend> {
    match value.to_lowercase().as_str() {
        "hash" => Ok(EmbeddingBackend::Hash),
        "tags" | "tag" | "onehot" | "one-hot" => Ok(EmbeddingBackend::Tags),
        "openai" | "api" => Ok(EmbeddingBackend::Openai),
        _ => Err(FfcsError::Config(format!(
            "invalid embedding backend {value} (expected hash|tags|openai)"
        ))),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| FfcsError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_duration(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(value) => humantime_serde::re::humantime::parse_duration(&value)
            .map(Some)
            .map_err(|err| FfcsError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}
