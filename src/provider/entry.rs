use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One value bucket of a facet: a term and the number of documents carrying it.
///
/// Entries order by count descending, then by term ascending, so repeated
/// population of the same node always lists values in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetNavigationEntry {
    pub term: String,
    pub count: u64,
}

impl FacetNavigationEntry {
    pub fn new(term: impl Into<String>, count: u64) -> Self {
        Self {
            term: term.into(),
            count,
        }
    }

    /// Buckets in display order.
    pub fn sorted(buckets: BTreeMap<String, u64>) -> Vec<Self> {
        let mut entries: Vec<Self> = buckets
            .into_iter()
            .map(|(term, count)| Self::new(term, count))
            .collect();
        entries.sort();
        entries
    }
}

impl Ord for FacetNavigationEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .count
            .cmp(&self.count)
            .then_with(|| self.term.cmp(&other.term))
    }
}

impl PartialOrd for FacetNavigationEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
