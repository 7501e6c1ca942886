//! Catalog store
//!
//! Immutable, index-addressed table of recommendable items loaded once from a
//! CSV snapshot. Positional indices are stable for the lifetime of a loaded
//! catalog; every other structure (embedding cache, candidate lists) refers
//! to items by these indices.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::ColumnsConfig;
use crate::error::{FfcsError, Result};
use crate::utils::{fold, split_tags};

/// One recommendable entity (an instructor teaching a course offering).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub department: String,
    /// Structural attributes with a value; missing cells are absent.
    pub attributes: BTreeMap<String, String>,
    /// Parsed tag labels in stored order.
    pub tags: Vec<String>,
    /// Tag text exactly as stored; this is what gets embedded.
    pub tags_text: String,
    pub quality_score: f64,
}

impl Item {
    pub fn new(
        name: impl Into<String>,
        department: impl Into<String>,
        tags_text: impl Into<String>,
        quality_score: f64,
    ) -> Self {
        let tags_text = tags_text.into();
        let tags = split_tags(&tags_text).map(ToString::to_string).collect();
        Self {
            name: name.into(),
            department: department.into(),
            attributes: BTreeMap::new(),
            tags,
            tags_text,
            quality_score,
        }
    }

    /// Attach a structural attribute. Blank values are treated as missing.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.attributes.insert(name.into(), value);
        }
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Case-insensitive membership test on the parsed tag labels.
    #[must_use]
    pub fn has_tag(&self, folded_tag: &str) -> bool {
        self.tags.iter().any(|tag| fold(tag) == folded_tag)
    }

    /// Tags rendered back to a human-readable string.
    #[must_use]
    pub fn tags_display(&self) -> String {
        self.tags.join(", ")
    }
}

/// The loaded snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<Item>,
    attribute_names: Vec<String>,
    fingerprint: String,
    source: Option<PathBuf>,
}

impl Catalog {
    /// Load a CSV snapshot from disk.
    ///
    /// A missing file, unreadable CSV, missing column or unparsable quality
    /// score is fatal: the caller must not serve requests without a catalog.
    pub fn load(path: impl AsRef<Path>, columns: &ColumnsConfig) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FfcsError::CatalogNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let mut catalog = Self::parse(bytes.as_slice(), columns, path)?;
        catalog.fingerprint = fingerprint(&bytes);
        catalog.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            items = catalog.len(),
            fingerprint = %catalog.fingerprint,
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a snapshot from any reader (stdin, in-memory fixtures).
    pub fn from_reader<R: Read>(mut reader: R, columns: &ColumnsConfig) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let mut catalog = Self::parse(bytes.as_slice(), columns, Path::new("<reader>"))?;
        catalog.fingerprint = fingerprint(&bytes);
        Ok(catalog)
    }

    /// Build a catalog from items constructed in code.
    #[must_use]
    pub fn from_items(items: Vec<Item>) -> Self {
        let attribute_names = items
            .iter()
            .flat_map(|item| item.attributes.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            items,
            attribute_names,
            fingerprint: String::new(),
            source: None,
        }
    }

    fn parse(bytes: &[u8], columns: &ColumnsConfig, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(false)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        let position = |column: &str| headers.iter().position(|h| h == column);

        let mut missing = Vec::new();
        let mut require = |column: &str| {
            let found = position(column);
            if found.is_none() {
                missing.push(column.to_string());
            }
            found.unwrap_or_default()
        };

        let name_idx = require(&columns.name);
        let department_idx = require(&columns.department);
        let tags_idx = require(&columns.tags);
        let score_idx = require(&columns.quality_score);
        let attribute_idx: Vec<(String, usize)> = columns
            .attributes
            .iter()
            .map(|attr| (attr.clone(), require(attr)))
            .collect();

        if !missing.is_empty() {
            return Err(FfcsError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }

        let mut items = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let line = row + 2;
            let field = |idx: usize| record.get(idx).unwrap_or_default();

            let raw_score = field(score_idx).trim();
            let quality_score = raw_score.parse::<f64>().map_err(|err| {
                FfcsError::Catalog(format!(
                    "{}: line {line}: invalid {} value {raw_score:?}: {err}",
                    path.display(),
                    columns.quality_score
                ))
            })?;

            let mut item = Item::new(
                field(name_idx).trim(),
                field(department_idx).trim(),
                field(tags_idx),
                quality_score,
            );
            for (attr, idx) in &attribute_idx {
                item = item.with_attribute(attr.as_str(), field(*idx).trim());
            }
            items.push(item);
        }

        debug!(rows = items.len(), columns = headers.len(), "parsed catalog snapshot");

        Ok(Self {
            items,
            attribute_names: columns.attributes.clone(),
            fingerprint: String::new(),
            source: None,
        })
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items paired with their positional index, in original order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &Item)> {
        self.items.iter().enumerate()
    }

    /// Structural attribute columns known to this catalog.
    #[must_use]
    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// SHA-256 of the snapshot bytes; empty for catalogs built in code.
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[must_use]
    pub fn departments(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| item.department.clone())
            .filter(|dept| !dept.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorted, case-folded set of every tag label in the catalog.
    #[must_use]
    pub fn tag_vocabulary(&self) -> Vec<String> {
        self.items
            .iter()
            .flat_map(|item| item.tags.iter().map(|tag| fold(tag)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
