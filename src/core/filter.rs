//! Filter registry: what each filter is, and the values it can hold
//!
//! A list view declares its filters once as a list of [`FilterOption`]s.
//! The [`FilterRegistry`] validates that list and is then shared read-only
//! by the state store and the predicate compiler.
//!
//! # Example
//!
//! ```yaml
//! - id: status
//!   label: Status
//!   field: is_active
//!   type: select
//!   options:
//!     - { value: active, label: Active, matches: true }
//!     - { value: inactive, label: Inactive, matches: false }
//! - id: created
//!   label: Created
//!   field: created_at
//!   type: daterange
//! - id: amount
//!   label: Amount
//!   type: number
//!   range: true
//! ```

use crate::core::error::ConfigError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Filter values keyed by filter id, in registry order
pub type FilterValues = IndexMap<String, FilterValue>;

/// One selectable choice of a select or multiselect filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectChoice {
    /// Value stored in the filter state when this choice is picked
    pub value: String,

    /// Human-readable label
    pub label: String,

    /// Raw value the record field must equal when this choice is picked
    ///
    /// When absent the record field is compared against `value` itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<Value>,
}

impl SelectChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            matches: None,
        }
    }

    /// Compare the record field against `matches` instead of `value`
    pub fn matching(mut self, raw: Value) -> Self {
        self.matches = Some(raw);
        self
    }
}

/// The type of a filter, carrying the data only that type needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterType {
    Select { options: Vec<SelectChoice> },
    Multiselect { options: Vec<SelectChoice> },
    Date,
    Daterange,
    Text,
    Number {
        /// Filter by an inclusive `{from, to}` range instead of substring
        #[serde(default)]
        range: bool,
    },
    Boolean,
}

impl FilterType {
    pub fn name(&self) -> &'static str {
        match self {
            FilterType::Select { .. } => "select",
            FilterType::Multiselect { .. } => "multiselect",
            FilterType::Date => "date",
            FilterType::Daterange => "daterange",
            FilterType::Text => "text",
            FilterType::Number { range: false } => "number",
            FilterType::Number { range: true } => "number range",
            FilterType::Boolean => "boolean",
        }
    }

    /// Choices for select and multiselect filters, empty otherwise
    pub fn choices(&self) -> &[SelectChoice] {
        match self {
            FilterType::Select { options } | FilterType::Multiselect { options } => options,
            _ => &[],
        }
    }

    /// The value that means "this filter is not set"
    pub fn empty_value(&self) -> FilterValue {
        match self {
            FilterType::Select { .. } => FilterValue::Select(String::new()),
            FilterType::Multiselect { .. } => FilterValue::Multiselect(BTreeSet::new()),
            FilterType::Date => FilterValue::Date(None),
            FilterType::Daterange => FilterValue::DateRange(DateRange::default()),
            FilterType::Text => FilterValue::Text(String::new()),
            FilterType::Number { range: false } => FilterValue::Number(String::new()),
            FilterType::Number { range: true } => FilterValue::NumberRange(NumberRange::default()),
            FilterType::Boolean => FilterValue::Boolean(false),
        }
    }

    /// Whether `value` has the shape this type stores
    pub fn accepts(&self, value: &FilterValue) -> bool {
        matches!(
            (self, value),
            (FilterType::Select { .. }, FilterValue::Select(_))
                | (FilterType::Multiselect { .. }, FilterValue::Multiselect(_))
                | (FilterType::Date, FilterValue::Date(_))
                | (FilterType::Daterange, FilterValue::DateRange(_))
                | (FilterType::Text, FilterValue::Text(_))
                | (FilterType::Number { range: false }, FilterValue::Number(_))
                | (FilterType::Number { range: true }, FilterValue::NumberRange(_))
                | (FilterType::Boolean, FilterValue::Boolean(_))
        )
    }

    /// Convert a loosely-typed JSON value (as found in config files) into
    /// the typed value for this filter
    pub fn value_from_json(&self, raw: &Value) -> Option<FilterValue> {
        match self {
            FilterType::Select { .. } => raw.as_str().map(|s| FilterValue::Select(s.to_string())),
            FilterType::Multiselect { .. } => match raw {
                Value::String(s) => Some(FilterValue::Multiselect(BTreeSet::from([s.clone()]))),
                Value::Array(items) => items
                    .iter()
                    .map(|item| item.as_str().map(str::to_string))
                    .collect::<Option<BTreeSet<_>>>()
                    .map(FilterValue::Multiselect),
                _ => None,
            },
            FilterType::Date => match raw {
                Value::Null => Some(FilterValue::Date(None)),
                Value::String(s) => Some(FilterValue::Date(Some(s.clone()))),
                _ => None,
            },
            FilterType::Daterange => {
                let map = raw.as_object()?;
                Some(FilterValue::DateRange(DateRange {
                    from: map.get("from").and_then(Value::as_str).map(str::to_string),
                    to: map.get("to").and_then(Value::as_str).map(str::to_string),
                }))
            }
            FilterType::Text => raw.as_str().map(|s| FilterValue::Text(s.to_string())),
            FilterType::Number { range: false } => match raw {
                Value::String(s) => Some(FilterValue::Number(s.clone())),
                Value::Number(n) => Some(FilterValue::Number(n.to_string())),
                _ => None,
            },
            FilterType::Number { range: true } => {
                let map = raw.as_object()?;
                let bound = |key: &str| match map.get(key) {
                    Some(Value::Number(n)) => n.as_f64(),
                    Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                Some(FilterValue::NumberRange(NumberRange {
                    from: bound("from"),
                    to: bound("to"),
                }))
            }
            FilterType::Boolean => raw.as_bool().map(FilterValue::Boolean),
        }
    }
}

/// Inclusive date range; each bound is an ISO date string
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
}

impl DateRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        // Blank inputs from a cleared date picker count as absent
        let keep = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            from: keep(from),
            to: keep(to),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// Inclusive numeric range with optional bounds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct NumberRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
}

impl NumberRange {
    pub fn new(from: Option<f64>, to: Option<f64>) -> Self {
        Self { from, to }
    }

    /// Build a range from raw text inputs; unparseable bounds are dropped
    pub fn parse(from: &str, to: &str) -> Self {
        Self {
            from: from.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            to: to.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, value: f64) -> bool {
        self.from.is_none_or(|from| from <= value) && self.to.is_none_or(|to| value <= to)
    }
}

/// The current value of one filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Select(String),
    Multiselect(BTreeSet<String>),
    Date(Option<String>),
    DateRange(DateRange),
    Text(String),
    Number(String),
    NumberRange(NumberRange),
    Boolean(bool),
}

impl FilterValue {
    /// Whether this value leaves its filter inactive
    pub fn is_unset(&self) -> bool {
        match self {
            FilterValue::Select(s) | FilterValue::Text(s) | FilterValue::Number(s) => {
                s.trim().is_empty()
            }
            FilterValue::Multiselect(set) => set.is_empty(),
            FilterValue::Date(day) => day.as_deref().is_none_or(|d| d.trim().is_empty()),
            FilterValue::DateRange(range) => range.is_empty(),
            FilterValue::NumberRange(range) => range.is_empty(),
            FilterValue::Boolean(flag) => !flag,
        }
    }

    /// Short human summary, used for active filter chips
    pub fn summary(&self, kind: &FilterType) -> String {
        let label_of = |value: &str| {
            kind.choices()
                .iter()
                .find(|choice| choice.value == value)
                .map(|choice| choice.label.clone())
                .unwrap_or_else(|| value.to_string())
        };

        match self {
            FilterValue::Select(value) => label_of(value),
            FilterValue::Multiselect(values) => values
                .iter()
                .map(|v| label_of(v))
                .collect::<Vec<_>>()
                .join(", "),
            FilterValue::Date(day) => day.clone().unwrap_or_default(),
            FilterValue::DateRange(DateRange { from, to }) => match (from, to) {
                (Some(from), Some(to)) => format!("{} to {}", from, to),
                (Some(from), None) => format!("from {}", from),
                (None, Some(to)) => format!("until {}", to),
                (None, None) => String::new(),
            },
            FilterValue::Text(text) | FilterValue::Number(text) => text.trim().to_string(),
            FilterValue::NumberRange(NumberRange { from, to }) => match (from, to) {
                (Some(from), Some(to)) => format!("{} to {}", from, to),
                (Some(from), None) => format!(">= {}", from),
                (None, Some(to)) => format!("<= {}", to),
                (None, None) => String::new(),
            },
            FilterValue::Boolean(flag) => if *flag { "Yes" } else { "No" }.to_string(),
        }
    }
}

/// Static description of one filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterOption {
    /// Unique id within the registry
    pub id: String,

    /// Label shown in the filter panel
    pub label: String,

    /// Record key the filter reads; defaults to `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(flatten)]
    pub kind: FilterType,

    /// Initial value, in the loose JSON shape accepted by
    /// [`FilterType::value_from_json`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl FilterOption {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FilterType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field: None,
            kind,
            default_value: None,
        }
    }

    pub fn select(id: impl Into<String>, label: impl Into<String>, options: Vec<SelectChoice>) -> Self {
        Self::new(id, label, FilterType::Select { options })
    }

    pub fn multiselect(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<SelectChoice>,
    ) -> Self {
        Self::new(id, label, FilterType::Multiselect { options })
    }

    /// Read the record at `field` instead of at the filter id
    pub fn on_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_default(mut self, raw: Value) -> Self {
        self.default_value = Some(raw);
        self
    }

    /// Record key this filter reads
    pub fn field(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.id)
    }

    /// Typed initial value: the declared default, or the empty value
    pub fn initial_value(&self) -> FilterValue {
        self.default_value
            .as_ref()
            .and_then(|raw| self.kind.value_from_json(raw))
            .unwrap_or_else(|| self.kind.empty_value())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let needs_options = matches!(
            self.kind,
            FilterType::Select { .. } | FilterType::Multiselect { .. }
        );
        if needs_options && self.kind.choices().is_empty() {
            return Err(ConfigError::MissingOptions {
                id: self.id.clone(),
                kind: self.kind.name(),
            });
        }

        if let Some(raw) = &self.default_value
            && self.kind.value_from_json(raw).is_none()
        {
            return Err(ConfigError::DefaultValueMismatch {
                id: self.id.clone(),
                kind: self.kind.name(),
            });
        }

        Ok(())
    }
}

/// Validated, ordered set of filter descriptions for one list view
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    options: IndexMap<String, FilterOption>,
}

impl FilterRegistry {
    /// Build a registry, rejecting duplicate ids and malformed options
    pub fn new(options: Vec<FilterOption>) -> Result<Self, ConfigError> {
        let mut map = IndexMap::with_capacity(options.len());
        for option in options {
            option.validate()?;
            if map.contains_key(&option.id) {
                return Err(ConfigError::DuplicateFilterId { id: option.id });
            }
            map.insert(option.id.clone(), option);
        }
        Ok(Self { options: map })
    }

    pub fn get(&self, id: &str) -> Option<&FilterOption> {
        self.options.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterOption> {
        self.options.values()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Every filter at its type-appropriate empty value
    pub fn empty_values(&self) -> FilterValues {
        self.iter()
            .map(|option| (option.id.clone(), option.kind.empty_value()))
            .collect()
    }

    /// Every filter at its declared default (or empty) value
    pub fn initial_values(&self) -> FilterValues {
        self.iter()
            .map(|option| (option.id.clone(), option.initial_value()))
            .collect()
    }
}
