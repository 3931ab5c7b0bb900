//! Ranking & top-N selection.
//!
//! Entries are ordered by statistic in the requested direction; equal
//! statistics are always ordered by label ascending, so the output does not
//! depend on the order groups were discovered in.

use crate::aggregate::RankedEntry;
use std::cmp::Ordering;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("expected asc or desc, got {:?}", other)),
        }
    }
}

/// Total order used by `top_n`.
pub fn compare_entries(a: &RankedEntry, b: &RankedEntry, direction: SortDirection) -> Ordering {
    let by_stat = match direction {
        SortDirection::Asc => a.statistic.cmp(&b.statistic),
        SortDirection::Desc => b.statistic.cmp(&a.statistic),
    };
    by_stat.then_with(|| a.label.cmp(&b.label))
}

/// Sort `entries` and keep the first `n`. `n == 0` yields an empty list and
/// `n` larger than the input keeps everything.
pub fn top_n(mut entries: Vec<RankedEntry>, direction: SortDirection, n: usize) -> Vec<RankedEntry> {
    entries.sort_by(|a, b| compare_entries(a, b, direction));
    entries.truncate(n);
    entries
}
