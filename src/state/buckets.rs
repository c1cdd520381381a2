use crate::state::status::is_indexable;
use std::collections::HashMap;

/// Pages grouped by resolved indexing status
///
/// Groups keep the order in which each status was first seen, and pages keep
/// the order in which they were added to their group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBuckets {
    groups: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl StatusBuckets {
    /// Creates an empty set of buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a page to the bucket for its status
    pub fn push(&mut self, status: &str, url: impl Into<String>) {
        let slot = match self.index.get(status) {
            Some(&slot) => slot,
            None => {
                self.groups.push((status.to_string(), Vec::new()));
                self.index.insert(status.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        self.groups[slot].1.push(url.into());
    }

    /// Returns the pages recorded under `status`
    pub fn get(&self, status: &str) -> Option<&[String]> {
        self.index
            .get(status)
            .map(|&slot| self.groups[slot].1.as_slice())
    }

    /// Iterates over `(status, pages)` in first-seen status order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(status, pages)| (status.as_str(), pages.as_slice()))
    }

    /// Number of distinct statuses
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of pages across all buckets
    pub fn page_count(&self) -> usize {
        self.groups.iter().map(|(_, pages)| pages.len()).sum()
    }

    /// Concatenates the buckets whose status is indexable, in bucket order
    pub fn indexable_pages(&self) -> Vec<String> {
        self.groups
            .iter()
            .filter(|(status, _)| is_indexable(status))
            .flat_map(|(_, pages)| pages.iter().cloned())
            .collect()
    }
}
