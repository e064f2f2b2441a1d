//! List view orchestration

pub mod builder;
pub mod data_view;

pub use builder::DataViewBuilder;
pub use data_view::{DataView, PanelState, ViewSnapshot};
