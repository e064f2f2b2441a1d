//! Draft/applied filter state
//!
//! The filter panel edits a *draft* generation; only [`FilterState::apply`]
//! promotes it to the *applied* generation the pipeline reads. No operation
//! here fails: unknown ids and values of the wrong shape are ignored.

use crate::core::filter::{FilterRegistry, FilterValue, FilterValues};
use serde::Serialize;
use std::sync::Arc;

/// An applied, non-empty filter, ready to be shown as a removable chip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilter {
    pub id: String,
    pub label: String,
    pub summary: String,
}

/// Two generations of filter values for one list view
#[derive(Debug, Clone)]
pub struct FilterState {
    registry: Arc<FilterRegistry>,
    draft: FilterValues,
    applied: FilterValues,
    active_count: usize,
}

impl FilterState {
    /// Start with every filter at its declared default
    pub fn new(registry: Arc<FilterRegistry>) -> Self {
        let initial = registry.initial_values();
        let active_count = count_active(&initial);
        Self {
            registry,
            draft: initial.clone(),
            applied: initial,
            active_count,
        }
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn draft(&self) -> &FilterValues {
        &self.draft
    }

    pub fn applied(&self) -> &FilterValues {
        &self.applied
    }

    /// Number of applied filters that are not at their empty value
    pub fn active_count(&self) -> usize {
        self.active_count
    }

    /// Whether the draft holds uncommitted edits
    pub fn is_dirty(&self) -> bool {
        self.draft != self.applied
    }

    /// Replace the draft value of one filter
    pub fn set_draft(&mut self, id: &str, value: FilterValue) {
        let Some(option) = self.registry.get(id) else {
            tracing::warn!(filter = id, "ignoring draft value for unknown filter");
            return;
        };

        if !option.kind.accepts(&value) {
            tracing::warn!(
                filter = id,
                expected = option.kind.name(),
                "ignoring draft value of the wrong type"
            );
            return;
        }

        self.draft.insert(id.to_string(), value);
    }

    /// Add `value` to a multiselect draft, or remove it if already selected
    pub fn toggle_multiselect_value(&mut self, id: &str, value: &str) {
        if let Some(FilterValue::Multiselect(selected)) = self.draft.get_mut(id)
            && !selected.remove(value)
        {
            selected.insert(value.to_string());
        }
    }

    /// Flip a boolean draft value
    pub fn toggle_boolean(&mut self, id: &str) {
        if let Some(FilterValue::Boolean(flag)) = self.draft.get_mut(id) {
            *flag = !*flag;
        }
    }

    /// Commit the draft; returns whether the applied values changed
    pub fn apply(&mut self) -> bool {
        let changed = self.draft != self.applied;
        self.applied = self.draft.clone();
        self.active_count = count_active(&self.applied);
        changed
    }

    /// Throw away uncommitted edits
    pub fn cancel(&mut self) {
        self.draft = self.applied.clone();
    }

    /// Clear both generations to each filter's empty value
    pub fn reset_all(&mut self) {
        self.applied = self.registry.empty_values();
        self.draft = self.applied.clone();
        self.active_count = 0;
    }

    /// Clear a single applied filter (and its draft); returns whether it was active
    pub fn clear(&mut self, id: &str) -> bool {
        let Some(option) = self.registry.get(id) else {
            return false;
        };

        let empty = option.kind.empty_value();
        let was_active = self.applied.get(id).is_some_and(|value| !value.is_unset());
        self.applied.insert(id.to_string(), empty.clone());
        self.draft.insert(id.to_string(), empty);
        self.active_count = count_active(&self.applied);
        was_active
    }

    /// Applied filters that currently restrict the view, in registry order
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.registry
            .iter()
            .filter_map(|option| {
                let value = self.applied.get(&option.id)?;
                (!value.is_unset()).then(|| ActiveFilter {
                    id: option.id.clone(),
                    label: option.label.clone(),
                    summary: value.summary(&option.kind),
                })
            })
            .collect()
    }
}

fn count_active(values: &FilterValues) -> usize {
    values.values().filter(|value| !value.is_unset()).count()
}
