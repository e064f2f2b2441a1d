//! Free-text search and recent-search history
//!
//! Search is an OR across fields: a record matches when any one of its
//! searchable fields contains the query. This is deliberately different from
//! filters, which AND together.

use crate::core::field::Record;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Default number of recent searches kept
pub const DEFAULT_RECENT_SEARCH_LIMIT: usize = 5;

/// Reads one searchable string out of a record; `None` means "no text"
pub type FieldExtractor<R> = Arc<dyn Fn(&R) -> Option<String> + Send + Sync>;

/// Extractor reading a dotted path through [`Record::resolve`]
pub fn path_extractor<R: Record + 'static>(path: impl Into<String>) -> FieldExtractor<R> {
    let path: String = path.into();
    Arc::new(move |record: &R| record.resolve(&path).to_text())
}

/// Build the search predicate for `query` over `extractors`
///
/// A blank query short-circuits to a predicate that accepts everything and
/// never calls an extractor.
pub fn build_matcher<'a, R>(
    query: &str,
    extractors: &'a [FieldExtractor<R>],
) -> impl Fn(&R) -> bool + use<'a, R> {
    let needle = query.trim().to_lowercase();

    move |record: &R| {
        needle.is_empty()
            || extractors.iter().any(|extract| {
                extract(record).is_some_and(|text| text.to_lowercase().contains(&needle))
            })
    }
}

/// Ordered set of searchable fields for one list view
pub struct SearchFields<R> {
    names: Vec<String>,
    extractors: Vec<FieldExtractor<R>>,
}

impl<R> SearchFields<R> {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            extractors: Vec::new(),
        }
    }

    /// Add a field read by a custom extractor
    pub fn add(&mut self, name: impl Into<String>, extractor: FieldExtractor<R>) {
        self.names.push(name.into());
        self.extractors.push(extractor);
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn extractors(&self) -> &[FieldExtractor<R>] {
        &self.extractors
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl<R: Record + 'static> SearchFields<R> {
    /// Searchable fields read by dotted paths
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = Self::new();
        for path in paths {
            let path: String = path.into();
            fields.add(path.clone(), path_extractor(path));
        }
        fields
    }
}

impl<R> Default for SearchFields<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for SearchFields<R> {
    fn clone(&self) -> Self {
        Self {
            names: self.names.clone(),
            extractors: self.extractors.clone(),
        }
    }
}

impl<R> fmt::Debug for SearchFields<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchFields")
            .field("names", &self.names)
            .finish()
    }
}

/// Bounded, most-recent-first, duplicate-free list of committed queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSearches {
    entries: VecDeque<String>,
    limit: usize,
}

impl RecentSearches {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Restore a list persisted by the caller, most recent first
    ///
    /// Blank and duplicate entries are dropped and the list is cut to `limit`.
    pub fn with_entries<I, S>(limit: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut recent = Self::new(limit);
        for entry in entries {
            let entry: String = entry.into();
            let entry = entry.trim();
            if recent.entries.len() == limit {
                break;
            }
            if !entry.is_empty() && !recent.contains(entry) {
                recent.entries.push_back(entry.to_string());
            }
        }
        recent
    }

    /// Record a committed query; returns whether the history changed
    ///
    /// Blank queries are ignored. A query already in the history leaves it
    /// untouched; it is not moved to the front.
    pub fn commit(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.limit == 0 || self.contains(query) {
            return false;
        }

        self.entries.push_front(query.to_string());
        self.entries.truncate(self.limit);
        true
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.iter().any(|entry| entry == query)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_SEARCH_LIMIT)
    }
}
