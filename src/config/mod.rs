//! View configuration loading and validation

use crate::core::error::ConfigError;
use crate::core::filter::{FilterOption, FilterRegistry};
use crate::core::query::DEFAULT_PAGE_SIZE;
use crate::core::search::DEFAULT_RECENT_SEARCH_LIMIT;
use crate::core::sort::SortConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_recent_search_limit() -> usize {
    DEFAULT_RECENT_SEARCH_LIMIT
}

/// Complete configuration of one list view
///
/// # Example
///
/// ```yaml
/// name: wallets
/// search_fields: [user.name, user.email]
/// sortable: [balance, created_at]
/// default_sort: { key: created_at, direction: desc }
/// page_size: 10
/// page_size_options: [10, 25, 50]
/// filters:
///   - id: type
///     label: Type
///     type: select
///     options:
///       - { value: user, label: User }
///       - { value: group, label: Group }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Name of the list view, used in logs
    pub name: String,

    /// Filters shown in the filter panel
    #[serde(default)]
    pub filters: Vec<FilterOption>,

    /// Dotted paths searched by the free-text box
    #[serde(default)]
    pub search_fields: Vec<String>,

    /// Keys the user may sort by; empty means any key
    #[serde(default)]
    pub sortable: Vec<String>,

    /// Initial sort
    #[serde(default)]
    pub default_sort: Option<SortConfig>,

    /// Initial number of rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page sizes offered to the user
    #[serde(default)]
    pub page_size_options: Vec<usize>,

    /// How many recent searches to remember
    #[serde(default = "default_recent_search_limit")]
    pub recent_search_limit: usize,
}

impl ViewConfig {
    /// A configuration with no filters, search fields or sort
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            filters: Vec::new(),
            search_fields: Vec::new(),
            sortable: Vec::new(),
            default_sort: None,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: Vec::new(),
            recent_search_limit: DEFAULT_RECENT_SEARCH_LIMIT,
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Whether `key` may be sorted by
    ///
    /// If no sortable keys are listed, every key is allowed (permissive mode)
    pub fn is_sortable(&self, key: &str) -> bool {
        self.sortable.is_empty() || self.sortable.iter().any(|k| k == key)
    }

    /// Check the configuration and build its filter registry
    pub fn validate(&self) -> Result<FilterRegistry, ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize { size: 0 });
        }

        if let Some(size) = self.page_size_options.iter().find(|size| **size == 0) {
            return Err(ConfigError::InvalidPageSize { size: *size });
        }

        if let Some(sort) = &self.default_sort
            && !self.is_sortable(&sort.key)
        {
            return Err(ConfigError::UnknownSortKey {
                key: sort.key.clone(),
            });
        }

        FilterRegistry::new(self.filters.clone())
    }
}
