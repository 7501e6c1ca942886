//! Filter stage: structural predicates over the catalog.
//!
//! Predicates are conjunctive and applied in order, each one narrowing the
//! surviving index list. Indices always refer to the original catalog.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, Item};
use crate::utils::{fold, is_blank};

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive substring match on a structural attribute.
    /// Items without the attribute fail.
    Attribute { name: String, needle: String },
    /// Case-insensitive membership in the item's tag labels.
    Tag { tag: String },
}

impl Predicate {
    /// Substring predicate; `None` when the value is blank (not supplied).
    #[must_use]
    pub fn attribute(name: impl Into<String>, value: &str) -> Option<Self> {
        if is_blank(value) {
            return None;
        }
        Some(Self::Attribute {
            name: name.into(),
            needle: fold(value.trim()),
        })
    }

    /// Tag predicate; `None` when the tag is blank.
    #[must_use]
    pub fn tag(value: &str) -> Option<Self> {
        if is_blank(value) {
            return None;
        }
        Some(Self::Tag {
            tag: fold(value.trim()),
        })
    }

    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Attribute { name, needle } => item
                .attribute(name)
                .is_some_and(|value| fold(value).contains(needle.as_str())),
            Self::Tag { tag } => item.has_tag(tag),
        }
    }
}

/// Apply predicates in order and return surviving indices in catalog order.
///
/// With no predicates every index survives. Once the candidate list is empty
/// the remaining predicates are skipped.
#[must_use]
pub fn apply(catalog: &Catalog, predicates: &[Predicate]) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..catalog.len()).collect();

    for predicate in predicates {
        if candidates.is_empty() {
            break;
        }
        candidates.retain(|&index| {
            catalog
                .get(index)
                .is_some_and(|item| predicate.matches(item))
        });
        debug!(?predicate, remaining = candidates.len(), "filter stage");
    }

    candidates
}
