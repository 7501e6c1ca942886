//! Ranking stage.
//!
//! Both modes produce `(index, score)` pairs sorted by score descending with
//! ties broken by original catalog index ascending, so output is a pure
//! function of the input.

use std::cmp::Ordering;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::search::cosine_similarity;

/// A candidate with its ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ranked {
    pub index: usize,
    pub score: f64,
}

/// Score `(index, cached embedding)` pairs by cosine similarity to `query`.
#[must_use]
pub fn by_similarity(query: &[f32], candidates: &[(usize, &[f32])]) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = candidates
        .iter()
        .map(|&(index, vector)| Ranked {
            index,
            score: f64::from(cosine_similarity(query, vector)),
        })
        .collect();
    sort_ranked(&mut ranked);
    ranked
}

/// Score candidates by their quality score, reported verbatim.
#[must_use]
pub fn by_quality(catalog: &Catalog, candidates: &[usize]) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = candidates
        .iter()
        .filter_map(|&index| {
            catalog.get(index).map(|item| Ranked {
                index,
                score: item.quality_score,
            })
        })
        .collect();
    sort_ranked(&mut ranked);
    ranked
}

/// Score descending, NaN last, then index ascending.
pub fn sort_ranked(ranked: &mut [Ranked]) {
    ranked.sort_by(|a, b| descending(a.score, b.score).then(a.index.cmp(&b.index)));
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
