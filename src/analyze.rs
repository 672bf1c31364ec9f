// src/analyze.rs
// Ranking reports over an ingested dataset

use std::cmp::Ordering;

use crate::error::{ReportError, Result};
use crate::model::IndexInfo;

/// Default K for every report
pub const DEFAULT_TOP: usize = 10;

/// An index together with its shard-size coefficient of variation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Imbalance<'a> {
    pub index: &'a IndexInfo,
    pub cv: f64,
}

/// Select the `k` highest-ranked items.
///
/// `key` extracts the ranking key (`None` excludes the item); larger keys
/// rank first. Equal keys are ordered by `tie`, which must be a total order
/// over the items for the result to be independent of input order.
pub fn top_k_by<'a, T, K, F, C>(items: &'a [T], k: usize, key: F, tie: C) -> Result<Vec<(&'a T, K)>>
where
    F: Fn(&T) -> Option<K>,
    K: PartialOrd,
    C: Fn(&T, &T) -> Ordering,
{
    if k == 0 {
        return Err(ReportError::usage("top-k selection needs k >= 1"));
    }

    let mut ranked: Vec<(&T, K)> = items
        .iter()
        .filter_map(|item| key(item).map(|value| (item, value)))
        .collect();

    if ranked.len() > k {
        ranked.select_nth_unstable_by(k - 1, |a, b| rank_order(a, b, &tie));
        ranked.truncate(k);
    }
    ranked.sort_by(|a, b| rank_order(a, b, &tie));

    Ok(ranked)
}

fn rank_order<T, K, C>(a: &(&T, K), b: &(&T, K), tie: &C) -> Ordering
where
    K: PartialOrd,
    C: Fn(&T, &T) -> Ordering,
{
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| tie(a.0, b.0))
}

fn by_name(a: &IndexInfo, b: &IndexInfo) -> Ordering {
    a.name.cmp(&b.name)
}

/// The `k` largest indexes by `size_bytes`, ties by name ascending
pub fn largest(indexes: &[IndexInfo], k: usize) -> Result<Vec<&IndexInfo>> {
    let ranked = top_k_by(indexes, k, |i| Some(i.size_bytes), by_name)?;
    Ok(ranked.into_iter().map(|(index, _)| index).collect())
}

/// The `k` indexes with the most shards, ties by size descending then name
pub fn most_shards(indexes: &[IndexInfo], k: usize) -> Result<Vec<&IndexInfo>> {
    let ranked = top_k_by(
        indexes,
        k,
        |i| Some(i.total_shards),
        |a, b| b.size_bytes.cmp(&a.size_bytes).then_with(|| by_name(a, b)),
    )?;
    Ok(ranked.into_iter().map(|(index, _)| index).collect())
}

/// The `k` indexes whose shard sizes vary the most relative to their mean.
///
/// Only indexes with at least two reported shards and non-uniform shard
/// sizes take part; see [`coefficient_of_variation`].
pub fn least_balanced(indexes: &[IndexInfo], k: usize) -> Result<Vec<Imbalance<'_>>> {
    let ranked = top_k_by(indexes, k, coefficient_of_variation, |a, b| {
        b.total_shards
            .cmp(&a.total_shards)
            .then_with(|| by_name(a, b))
    })?;
    Ok(ranked
        .into_iter()
        .map(|(index, cv)| Imbalance { index, cv })
        .collect())
}

/// Population coefficient of variation (σ/μ) of the shard sizes.
///
/// `None` when fewer than two shards are reported, when every shard is
/// empty, or when all shards have the same size.
pub fn coefficient_of_variation(index: &IndexInfo) -> Option<f64> {
    let first = index.shards.first()?.size_bytes;
    if index.shards.len() < 2 || index.shard_sizes().all(|size| size == first) {
        return None;
    }

    let n = index.shards.len() as f64;
    let mean = index.shard_sizes().map(|s| s as f64).sum::<f64>() / n;
    if mean == 0.0 {
        return None;
    }
    let variance = index
        .shard_sizes()
        .map(|s| {
            let d = s as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    Some(variance.sqrt() / mean)
}
