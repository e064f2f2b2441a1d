//! The per-list-view engine
//!
//! A [`DataView`] owns the filter state, search query, sort and page of one
//! list screen. Every committed change re-runs the whole pipeline
//!
//! ```text
//! records → search → filters → sort → paginate
//! ```
//!
//! and republishes a [`ViewSnapshot`] for the render layer. Draft edits in the
//! filter panel do not recompute anything until they are applied.

use crate::core::field::Record;
use crate::core::filter::FilterValue;
use crate::core::predicate::compile;
use crate::core::query::{PageState, paginate};
use crate::core::search::{RecentSearches, SearchFields, build_matcher};
use crate::core::sort::{SortConfig, ValueResolver, build_comparator};
use crate::core::state::{ActiveFilter, FilterState};
use crate::core::store::RecordSource;
use serde::Serialize;
use std::collections::HashMap;

/// Whether the filter panel is open with possibly uncommitted edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Idle,
    Editing,
}

/// Everything the render layer needs to draw the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot<R> {
    /// Rows of the current page, in display order
    pub displayed_rows: Vec<R>,

    /// Rows left after search and filters, across all pages
    pub total_items: usize,

    /// At least 1, even when nothing matches
    pub total_pages: usize,

    /// Current page after clamping
    pub current_page: usize,

    pub active_filter_count: usize,

    /// Most recent first
    pub recent_searches: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortConfig>,

    pub has_next: bool,

    pub has_prev: bool,
}

impl<R> Default for ViewSnapshot<R> {
    fn default() -> Self {
        Self {
            displayed_rows: Vec::new(),
            total_items: 0,
            total_pages: 1,
            current_page: 1,
            active_filter_count: 0,
            recent_searches: Vec::new(),
            sort: None,
            has_next: false,
            has_prev: false,
        }
    }
}

/// Search, filter, sort and pagination state for one list view
pub struct DataView<R> {
    pub(super) name: String,
    pub(super) records: Vec<R>,
    pub(super) filters: FilterState,
    pub(super) panel: PanelState,
    pub(super) search_fields: SearchFields<R>,
    pub(super) query: String,
    pub(super) recent: RecentSearches,
    pub(super) sortable: Vec<String>,
    pub(super) resolvers: HashMap<String, ValueResolver<R>>,
    pub(super) sort: Option<SortConfig>,
    pub(super) page: PageState,
    pub(super) page_size_options: Vec<usize>,
    pub(super) snapshot: ViewSnapshot<R>,
}

impl<R: Record + Clone> DataView<R> {
    // === Output ===

    /// The last published result
    pub fn snapshot(&self) -> &ViewSnapshot<R> {
        &self.snapshot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Replace the dataset, e.g. after a refetch; goes back to page 1
    pub fn set_records(&mut self, records: Vec<R>) {
        self.records = records;
        self.page.reset();
        self.recompute();
    }

    /// Reload the dataset from `source`; goes back to page 1
    pub fn reload<S: RecordSource<R> + ?Sized>(&mut self, source: &S) {
        self.set_records(source.list_all());
    }

    // === Search ===

    /// The committed search query
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_fields(&self) -> &[String] {
        self.search_fields.names()
    }

    /// Commit a search query; goes back to page 1
    pub fn search(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.recent.commit(&self.query);
        self.page.reset();
        self.recompute();
    }

    pub fn clear_search(&mut self) {
        self.search("");
    }

    pub fn recent_searches(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn clear_recent_searches(&mut self) {
        self.recent.clear();
        self.snapshot.recent_searches.clear();
    }

    // === Filters ===

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn panel(&self) -> PanelState {
        self.panel
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.filters.active_filters()
    }

    /// Open the filter panel
    pub fn open_filters(&mut self) {
        self.panel = PanelState::Editing;
    }

    /// Edit one draft value; opens the panel if needed
    pub fn set_draft_filter(&mut self, id: &str, value: FilterValue) {
        self.panel = PanelState::Editing;
        self.filters.set_draft(id, value);
    }

    /// Toggle one choice of a multiselect draft
    pub fn toggle_filter_value(&mut self, id: &str, value: &str) {
        self.panel = PanelState::Editing;
        self.filters.toggle_multiselect_value(id, value);
    }

    /// Flip a boolean draft
    pub fn toggle_filter_flag(&mut self, id: &str) {
        self.panel = PanelState::Editing;
        self.filters.toggle_boolean(id);
    }

    /// Commit the draft filters and close the panel; goes back to page 1
    pub fn apply_filters(&mut self) {
        let changed = self.filters.apply();
        tracing::debug!(
            view = %self.name,
            changed,
            active = self.filters.active_count(),
            "filters applied"
        );
        self.panel = PanelState::Idle;
        self.page.reset();
        self.recompute();
    }

    /// Discard the draft and close the panel
    pub fn cancel_filters(&mut self) {
        self.filters.cancel();
        self.panel = PanelState::Idle;
    }

    /// Clear every filter, draft and applied; goes back to page 1
    pub fn reset_filters(&mut self) {
        self.filters.reset_all();
        self.panel = PanelState::Idle;
        self.page.reset();
        self.recompute();
    }

    /// Remove one applied filter (an active filter chip)
    pub fn clear_filter(&mut self, id: &str) {
        if self.filters.clear(id) {
            self.page.reset();
            self.recompute();
        }
    }

    // === Sort ===

    pub fn sort(&self) -> Option<&SortConfig> {
        self.sort.as_ref()
    }

    /// Keys offered as sortable columns; empty means any key
    pub fn sortable_keys(&self) -> &[String] {
        &self.sortable
    }

    /// Column header click: flip direction on the same key, else sort
    /// ascending by `key`
    pub fn sort_by(&mut self, key: &str) {
        let sort = SortConfig::toggle(self.sort.as_ref(), key);
        tracing::debug!(view = %self.name, sort = %sort, "sort changed");
        self.sort = Some(sort);
        self.recompute();
    }

    pub fn set_sort(&mut self, sort: Option<SortConfig>) {
        self.sort = sort;
        self.recompute();
    }

    pub fn clear_sort(&mut self) {
        self.set_sort(None);
    }

    // === Pagination ===

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// Jump to `page`; out-of-range pages are clamped
    pub fn set_page(&mut self, page: usize) {
        self.page.set_page(page);
        self.recompute();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.current_page.saturating_sub(1));
    }

    /// Change rows per page (0 is treated as 1); goes back to page 1
    pub fn set_page_size(&mut self, size: usize) {
        self.page.set_page_size(size);
        self.recompute();
    }

    // === Pipeline ===

    /// Run search, filters, sort and pagination over the full dataset
    pub(super) fn recompute(&mut self) {
        let predicate = compile(self.filters.registry(), self.filters.applied());
        let matcher = build_matcher(&self.query, self.search_fields.extractors());

        let mut rows: Vec<&R> = self
            .records
            .iter()
            .filter(|record| matcher(*record))
            .filter(|record| predicate.matches(*record))
            .collect();

        if let Some(sort) = &self.sort {
            let custom = self.resolvers.get(&sort.key).cloned();
            let compare = build_comparator(&sort.key, sort.direction, move |record: &R, key: &str| {
                match &custom {
                    Some(resolve) => resolve(record, key),
                    None => record.resolve(key),
                }
            });
            rows.sort_by(|a, b| compare(*a, *b));
        }

        self.page.set_total(rows.len());
        let page = paginate(&rows, self.page.current_page, self.page.items_per_page);
        let meta = self.page.meta();

        let snapshot = ViewSnapshot {
            displayed_rows: page.slice.iter().map(|row| (*row).clone()).collect(),
            total_items: page.total_items,
            total_pages: page.total_pages,
            current_page: page.clamped_page,
            active_filter_count: self.filters.active_count(),
            recent_searches: self.recent.to_vec(),
            sort: self.sort.clone(),
            has_next: meta.has_next,
            has_prev: meta.has_prev,
        };

        tracing::debug!(
            view = %self.name,
            records = self.records.len(),
            total = snapshot.total_items,
            page = snapshot.current_page,
            pages = snapshot.total_pages,
            active_filters = snapshot.active_filter_count,
            query = %self.query,
            "view recomputed"
        );

        self.snapshot = snapshot;
    }
}
