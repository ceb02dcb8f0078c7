use crate::types::Record;
use std::collections::BTreeSet;

/// Which records the dashboard currently looks at: one allowed-value set
/// per categorical dimension plus an inclusive year range.
///
/// The engine imposes no defaults. An empty set means nothing is selected
/// for that dimension, so nothing passes; "everything" has to be spelled
/// out, which [`FilterSpec::select_all`] does from the dataset itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub categories: BTreeSet<String>,
    pub sub_categories: BTreeSet<String>,
    pub segments: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub min_year: i32,
    pub max_year: i32,
}

impl FilterSpec {
    /// Build the spec that selects every distinct value and the full year
    /// span present in `data` — the explicit form of "no filtering".
    pub fn select_all(data: &[Record]) -> Self {
        let years: Vec<i32> = data.iter().filter_map(|r| r.year).collect();
        FilterSpec {
            categories: data.iter().map(|r| r.category.clone()).collect(),
            sub_categories: data.iter().map(|r| r.sub_category.clone()).collect(),
            segments: data.iter().map(|r| r.segment.clone()).collect(),
            regions: data.iter().map(|r| r.region.clone()).collect(),
            min_year: years.iter().copied().min().unwrap_or(0),
            max_year: years.iter().copied().max().unwrap_or(0),
        }
    }

    /// True when the record satisfies every predicate. A record whose
    /// `year` is null never falls inside the range.
    pub fn matches(&self, r: &Record) -> bool {
        let year_ok = matches!(r.year, Some(y) if y >= self.min_year && y <= self.max_year);
        year_ok
            && self.categories.contains(&r.category)
            && self.sub_categories.contains(&r.sub_category)
            && self.segments.contains(&r.segment)
            && self.regions.contains(&r.region)
    }

    /// Project the working subset out of the cleaned dataset. Pure; no
    /// caching, recomputed per call.
    pub fn apply(&self, data: &[Record]) -> Vec<Record> {
        data.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
