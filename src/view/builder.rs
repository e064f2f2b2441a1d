//! DataViewBuilder for assembling a list view from configuration and code

use super::data_view::{DataView, PanelState, ViewSnapshot};
use crate::config::ViewConfig;
use crate::core::error::ConfigError;
use crate::core::field::{FieldValue, Record};
use crate::core::filter::{FilterOption, FilterRegistry};
use crate::core::query::PageState;
use crate::core::search::{RecentSearches, SearchFields, path_extractor};
use crate::core::sort::{SortConfig, ValueResolver};
use crate::core::state::FilterState;
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for creating list views
///
/// Serializable settings live in a [`ViewConfig`]; closures (custom search
/// extractors and sort resolvers) are added in code.
///
/// # Example
///
/// ```ignore
/// let view = DataViewBuilder::new("wallets")
///     .with_filter(FilterOption::select("type", "Type", choices))
///     .search_path("user.name")
///     .sort_resolver("owner", |w: &Value, _| w.resolve("user.name"))
///     .page_size(10)
///     .records(wallets)
///     .build()?;
/// ```
pub struct DataViewBuilder<R> {
    config: ViewConfig,
    registry: Option<Arc<FilterRegistry>>,
    search_fields: SearchFields<R>,
    resolvers: HashMap<String, ValueResolver<R>>,
    recent_searches: Vec<String>,
    records: Vec<R>,
}

impl<R: Record + Clone + 'static> DataViewBuilder<R> {
    /// Create a builder for an empty view
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_config(ViewConfig::new(name))
    }

    /// Start from a loaded configuration
    pub fn from_config(config: ViewConfig) -> Self {
        Self {
            config,
            registry: None,
            search_fields: SearchFields::new(),
            resolvers: HashMap::new(),
            recent_searches: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn with_filter(mut self, option: FilterOption) -> Self {
        self.config.filters.push(option);
        self
    }

    pub fn with_filters(mut self, options: impl IntoIterator<Item = FilterOption>) -> Self {
        self.config.filters.extend(options);
        self
    }

    /// Share an already validated registry between views
    ///
    /// Takes precedence over filters from the configuration.
    pub fn with_registry(mut self, registry: Arc<FilterRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Search a dotted path of each record, after any configured paths
    pub fn search_path(mut self, path: impl Into<String>) -> Self {
        let path: String = path.into();
        self.search_fields.add(path.clone(), path_extractor(path));
        self
    }

    /// Search several dotted paths, after any configured paths
    pub fn search_paths<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths
            .into_iter()
            .fold(self, |builder, path| builder.search_path(path))
    }

    /// Search a value computed by `extractor`
    pub fn search_field<F>(mut self, name: impl Into<String>, extractor: F) -> Self
    where
        F: Fn(&R) -> Option<String> + Send + Sync + 'static,
    {
        self.search_fields.add(name, Arc::new(extractor));
        self
    }

    /// Sort key `key` by a computed value instead of a record path
    pub fn sort_resolver<F>(mut self, key: impl Into<String>, resolver: F) -> Self
    where
        F: Fn(&R, &str) -> FieldValue + Send + Sync + 'static,
    {
        self.resolvers.insert(key.into(), Arc::new(resolver));
        self
    }

    /// Restrict the offered sort keys
    pub fn sortable<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.sortable = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn default_sort(mut self, sort: SortConfig) -> Self {
        self.config.default_sort = Some(sort);
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn page_size_options(mut self, sizes: Vec<usize>) -> Self {
        self.config.page_size_options = sizes;
        self
    }

    pub fn recent_search_limit(mut self, limit: usize) -> Self {
        self.config.recent_search_limit = limit;
        self
    }

    /// Seed the history with searches the caller persisted earlier
    pub fn recent_searches<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recent_searches = entries.into_iter().map(Into::into).collect();
        self
    }

    pub fn records(mut self, records: Vec<R>) -> Self {
        self.records = records;
        self
    }

    /// Validate the configuration and compute the first snapshot
    pub fn build(self) -> Result<DataView<R>, ConfigError> {
        let config_registry = self.config.validate()?;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(config_registry));

        let mut search_fields = SearchFields::from_paths(self.config.search_fields.iter().cloned());
        for (name, extractor) in self
            .search_fields
            .names()
            .iter()
            .zip(self.search_fields.extractors())
        {
            search_fields.add(name.clone(), extractor.clone());
        }

        tracing::debug!(
            view = %self.config.name,
            filters = registry.len(),
            search_fields = search_fields.names().len(),
            records = self.records.len(),
            "building data view"
        );

        let mut view = DataView {
            name: self.config.name,
            records: self.records,
            filters: FilterState::new(registry),
            panel: PanelState::Idle,
            search_fields,
            query: String::new(),
            recent: RecentSearches::with_entries(
                self.config.recent_search_limit,
                self.recent_searches,
            ),
            sortable: self.config.sortable,
            resolvers: self.resolvers,
            sort: self.config.default_sort,
            page: PageState::new(self.config.page_size),
            page_size_options: self.config.page_size_options,
            snapshot: ViewSnapshot::default(),
        };
        view.recompute();
        Ok(view)
    }
}
