//! Core module containing the building blocks of the view pipeline

pub mod error;
pub mod field;
pub mod filter;
pub mod predicate;
pub mod query;
pub mod search;
pub mod sort;
pub mod state;
pub mod store;

pub use error::ConfigError;
pub use field::{FieldValue, Record};
pub use filter::{
    DateRange, FilterOption, FilterRegistry, FilterType, FilterValue, FilterValues, NumberRange,
    SelectChoice,
};
pub use predicate::{Predicate, compile};
pub use query::{Page, PageState, PaginationMeta, paginate};
pub use search::{FieldExtractor, RecentSearches, SearchFields, build_matcher};
pub use sort::{SortConfig, SortDirection, build_comparator, build_record_comparator};
pub use state::{ActiveFilter, FilterState};
pub use store::RecordSource;
