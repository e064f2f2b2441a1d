//! # Admin DataView
//!
//! A client-side search, filter, sort and pagination engine for admin list
//! screens.
//!
//! ## Features
//!
//! - **Declarative Filters**: Select, multiselect, date, date range, text, number and boolean filters described in YAML or code
//! - **Draft/Applied Separation**: Edits in the filter panel only take effect when applied
//! - **Free-Text Search**: Case-insensitive substring search across any number of record fields
//! - **Recent Searches**: A bounded, most-recent-first search history
//! - **Null-Safe Sorting**: Missing values always sort last, numbers compare numerically
//! - **Clamped Pagination**: Out-of-range pages never panic and never show an empty page when data exists
//! - **Type-Safe**: Filter values are a tagged union checked against the filter's type
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dataview::prelude::*;
//!
//! let mut view = DataViewBuilder::new("fee_rules")
//!     .with_filter(
//!         FilterOption::select("status", "Status", vec![
//!             SelectChoice::new("active", "Active").matching(json!(true)),
//!             SelectChoice::new("inactive", "Inactive").matching(json!(false)),
//!         ])
//!         .on_field("is_active"),
//!     )
//!     .search_paths(["name", "code"])
//!     .records(rules)
//!     .build()?;
//!
//! view.set_draft_filter("status", FilterValue::Select("active".into()));
//! view.apply_filters();
//! view.search("card");
//! view.sort_by("amount");
//!
//! for row in &view.snapshot().displayed_rows {
//!     println!("{row}");
//! }
//! ```

pub mod config;
pub mod core;
pub mod view;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::ConfigError,
        field::{FieldValue, Record},
        filter::{
            DateRange, FilterOption, FilterRegistry, FilterType, FilterValue, FilterValues,
            NumberRange, SelectChoice,
        },
        predicate::{Predicate, compile},
        query::{PageState, PaginationMeta, paginate},
        search::{RecentSearches, build_matcher},
        sort::{SortConfig, SortDirection, build_comparator},
        state::{ActiveFilter, FilterState},
        store::RecordSource,
    };

    // === View ===
    pub use crate::view::{DataView, DataViewBuilder, PanelState, ViewSnapshot};

    // === Config ===
    pub use crate::config::ViewConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use serde_json::{Value, json};
}
