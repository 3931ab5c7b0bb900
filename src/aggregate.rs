//! Grouping & aggregation over parsed routes.
//! Implement `Aggregator` for your aggregation state, feed it with `ingest`,
//! and hand the frozen entries to the ranking step.

use crate::filters::{matches_all, Predicate};
use crate::key_extractor::KeyExtractor;
use crate::route::Route;
use ahash::AHashMap;
use serde::Serialize;

/// One group of an aggregation result: its label and statistic (an occurrence
/// count for the counting aggregators).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RankedEntry {
    #[serde(rename = "subject")]
    pub label: String,
    pub statistic: u64,
}

impl RankedEntry {
    pub fn new(label: impl Into<String>, statistic: u64) -> Self {
        Self { label: label.into(), statistic }
    }
}

pub trait Aggregator {
    fn ingest(&mut self, route: &Route);
    fn merge(&mut self, other: Self);
    /// Freeze the working state into entries (unordered).
    fn into_entries(self) -> Vec<RankedEntry>;
}

/// Counts routes per derived label, optionally restricted by a predicate
/// conjunction. Labels are only inserted on first sight, so every entry has a
/// count of at least one.
#[derive(Debug)]
pub struct CountAggregator {
    key: KeyExtractor,
    only: Vec<Predicate>,
    counts: AHashMap<String, u64>,
}

impl CountAggregator {
    pub fn new(key: KeyExtractor) -> Self {
        Self { key, only: Vec::new(), counts: AHashMap::new() }
    }

    /// Restrict counting to routes that satisfy every predicate.
    pub fn only(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.only.extend(predicates);
        self
    }

    pub fn counts(&self) -> &AHashMap<String, u64> {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

impl Aggregator for CountAggregator {
    fn ingest(&mut self, route: &Route) {
        if !matches_all(route, &self.only) {
            return;
        }
        if let Some(k) = self.key.key_for(route) {
            *self.counts.entry(k).or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: Self) {
        for (k, v) in other.counts {
            *self.counts.entry(k).or_insert(0) += v;
        }
    }

    fn into_entries(self) -> Vec<RankedEntry> {
        self.counts.into_iter().map(|(label, statistic)| RankedEntry { label, statistic }).collect()
    }
}

/// Keeps, per label, the largest absolute altitude change between origin and
/// destination. Routes without two numeric altitudes are ignored.
#[derive(Debug)]
pub struct AltitudeChangeAggregator {
    key: KeyExtractor,
    only: Vec<Predicate>,
    max_by_key: AHashMap<String, u64>,
}

impl AltitudeChangeAggregator {
    pub fn new(key: KeyExtractor) -> Self {
        Self { key, only: Vec::new(), max_by_key: AHashMap::new() }
    }

    pub fn only(mut self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.only.extend(predicates);
        self
    }
}

impl Aggregator for AltitudeChangeAggregator {
    fn ingest(&mut self, route: &Route) {
        if !matches_all(route, &self.only) {
            return;
        }
        let (Some(from), Some(to)) = (route.from_altitude(), route.to_altitude()) else {
            return;
        };
        let Some(k) = self.key.key_for(route) else { return };
        let diff = to.abs_diff(from);
        let slot = self.max_by_key.entry(k).or_insert(diff);
        *slot = (*slot).max(diff);
    }

    fn merge(&mut self, other: Self) {
        for (k, v) in other.max_by_key {
            let slot = self.max_by_key.entry(k).or_insert(v);
            *slot = (*slot).max(v);
        }
    }

    fn into_entries(self) -> Vec<RankedEntry> {
        self.max_by_key.into_iter().map(|(label, statistic)| RankedEntry { label, statistic }).collect()
    }
}

/// Feed every route through `agg` and return its entries.
pub fn aggregate_with<A: Aggregator>(mut agg: A, routes: &[Route]) -> Vec<RankedEntry> {
    for r in routes {
        agg.ingest(r);
    }
    agg.into_entries()
}

/// Label -> occurrence count over `routes`, restricted by `only`.
pub fn count_by_key(routes: &[Route], key: KeyExtractor, only: &[Predicate]) -> AHashMap<String, u64> {
    let mut agg = CountAggregator::new(key).only(only.iter().cloned());
    for r in routes {
        agg.ingest(r);
    }
    agg.counts
}
