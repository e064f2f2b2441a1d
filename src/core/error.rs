//! Typed configuration errors
//!
//! The view pipeline itself is infallible: dirty record values, unknown keys
//! and out-of-range pages all have documented fallbacks. The only place an
//! error can surface is while assembling a view from its configuration.

use thiserror::Error;

/// Errors raised while validating a filter registry or view configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Two filters share the same id
    #[error("Duplicate filter id '{id}'")]
    DuplicateFilterId { id: String },

    /// A select or multiselect filter was declared without choices
    #[error("Filter '{id}' of type {kind} requires at least one option")]
    MissingOptions { id: String, kind: &'static str },

    /// A filter's default value does not have the shape its type expects
    #[error("Default value for filter '{id}' does not match type {kind}")]
    DefaultValueMismatch { id: String, kind: &'static str },

    /// Page size must be strictly positive
    #[error("Invalid page size {size}: must be greater than zero")]
    InvalidPageSize { size: usize },

    /// The default sort refers to a key the view cannot sort by
    #[error("Default sort key '{key}' is not sortable")]
    UnknownSortKey { key: String },
}

impl ConfigError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::DuplicateFilterId { .. } => "DUPLICATE_FILTER_ID",
            ConfigError::MissingOptions { .. } => "MISSING_FILTER_OPTIONS",
            ConfigError::DefaultValueMismatch { .. } => "DEFAULT_VALUE_MISMATCH",
            ConfigError::InvalidPageSize { .. } => "INVALID_PAGE_SIZE",
            ConfigError::UnknownSortKey { .. } => "UNKNOWN_SORT_KEY",
        }
    }
}
