//! Sort configuration and type-aware comparators

use crate::core::field::{FieldValue, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Reads the comparison value for a sort key out of a record
pub type ValueResolver<R> = Arc<dyn Fn(&R, &str) -> FieldValue + Send + Sync>;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

/// Which key the view is sorted by, and in which direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Dotted path into the record, or the id of a registered resolver
    pub key: String,

    #[serde(default)]
    pub direction: SortDirection,
}

impl SortConfig {
    pub fn new(key: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            key: key.into(),
            direction,
        }
    }

    pub fn asc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self::new(key, SortDirection::Desc)
    }

    /// The config after a click on column `key`
    ///
    /// Clicking the current key flips its direction; any other key starts
    /// ascending.
    pub fn toggle(current: Option<&SortConfig>, key: &str) -> SortConfig {
        match current {
            Some(current) if current.key == key => {
                SortConfig::new(key, current.direction.reverse())
            }
            _ => SortConfig::asc(key),
        }
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.direction)
    }
}

/// Case-folded comparison, lowercase before uppercase on ties, the way
/// collators order "a" and "A"
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Order of value kinds when a column mixes types
fn kind_rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Integer(_) | FieldValue::Float(_) => 0,
        FieldValue::String(_) => 1,
        FieldValue::Boolean(_) => 2,
        FieldValue::Null => 3,
    }
}

/// Compare two field values for sorting
///
/// Numbers compare numerically (NaN after every other number), strings
/// case-insensitively and booleans `false` first. Values of different kinds
/// order numbers, then strings, then booleans, so the order stays total on
/// mixed columns. A missing value sorts after a present one in both
/// directions.
pub fn compare_values(a: &FieldValue, b: &FieldValue, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (FieldValue::Null, FieldValue::Null) => return Ordering::Equal,
        (FieldValue::Null, _) => return Ordering::Greater,
        (_, FieldValue::Null) => return Ordering::Less,
        (FieldValue::String(x), FieldValue::String(y)) => locale_cmp(x, y),
        (FieldValue::Boolean(x), FieldValue::Boolean(y)) => x.cmp(y),
        (x, y) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => number_cmp(x, y),
            _ => kind_rank(x).cmp(&kind_rank(y)),
        },
    };
    direction.apply(ordering)
}

/// Total order on floats; every NaN sorts last and NaNs tie
fn number_cmp(x: f64, y: f64) -> Ordering {
    match (x.is_nan(), y.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => x.total_cmp(&y),
    }
}

/// Comparator over records for `key`, reading values through `resolver`
pub fn build_comparator<R, F>(
    key: &str,
    direction: SortDirection,
    resolver: F,
) -> impl Fn(&R, &R) -> Ordering + use<R, F>
where
    F: Fn(&R, &str) -> FieldValue,
{
    let key = key.to_string();
    move |a: &R, b: &R| compare_values(&resolver(a, &key), &resolver(b, &key), direction)
}

/// Comparator reading values through [`Record::resolve`]
pub fn build_record_comparator<R: Record>(
    key: &str,
    direction: SortDirection,
) -> impl Fn(&R, &R) -> Ordering + use<R> {
    build_comparator(key, direction, |record: &R, key: &str| record.resolve(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn amounts(records: &[Value]) -> Vec<Value> {
        records.iter().map(|r| r["amount"].clone()).collect()
    }

    #[test]
    fn test_toggle_same_key_flips_direction() {
        let first = SortConfig::toggle(None, "amount");
        assert_eq!(first, SortConfig::asc("amount"));

        let second = SortConfig::toggle(Some(&first), "amount");
        assert_eq!(second, SortConfig::desc("amount"));

        let third = SortConfig::toggle(Some(&second), "amount");
        assert_eq!(third, SortConfig::asc("amount"));
    }

    #[test]
    fn test_toggle_new_key_resets_to_asc() {
        let current = SortConfig::desc("amount");
        assert_eq!(
            SortConfig::toggle(Some(&current), "name"),
            SortConfig::asc("name")
        );
    }

    #[test]
    fn test_display_sort_config() {
        assert_eq!(SortConfig::desc("created_at").to_string(), "created_at:desc");
        assert_eq!(SortConfig::asc("name").to_string(), "name:asc");
    }

    #[test]
    fn test_numbers_sort_numerically() {
        let mut records = vec![json!({"amount": 5}), json!({"amount": 1}), json!({"amount": 3})];

        records.sort_by(build_record_comparator("amount", SortDirection::Asc));
        assert_eq!(amounts(&records), vec![json!(1), json!(3), json!(5)]);

        records.sort_by(build_record_comparator("amount", SortDirection::Desc));
        assert_eq!(amounts(&records), vec![json!(5), json!(3), json!(1)]);
    }

    #[test]
    fn test_mixed_integer_and_float() {
        assert_eq!(
            compare_values(&FieldValue::Float(2.5), &FieldValue::Integer(3), SortDirection::Asc),
            Ordering::Less
        );
    }

    #[test]
    fn test_strings_ignore_case() {
        let mut names = vec![json!("banana"), json!("Apple"), json!("cherry")];
        names.sort_by(|a, b| {
            compare_values(&FieldValue::from(a), &FieldValue::from(b), SortDirection::Asc)
        });
        assert_eq!(names, vec![json!("Apple"), json!("banana"), json!("cherry")]);
    }

    #[test]
    fn test_lowercase_before_uppercase_on_tie() {
        assert_eq!(
            compare_values(&FieldValue::from("a"), &FieldValue::from("A"), SortDirection::Asc),
            Ordering::Less
        );
    }

    #[test]
    fn test_missing_values_sink_in_both_directions() {
        let mut records = vec![
            json!({"name": "b", "amount": 2}),
            json!({"name": "none"}),
            json!({"name": "a", "amount": 1}),
        ];

        records.sort_by(build_record_comparator("amount", SortDirection::Asc));
        assert_eq!(records[2]["name"], "none");

        records.sort_by(build_record_comparator("amount", SortDirection::Desc));
        assert_eq!(records[0]["name"], "b");
        assert_eq!(records[2]["name"], "none");
    }

    #[test]
    fn test_mixed_kinds_order_numbers_strings_booleans() {
        let values = [
            FieldValue::Integer(10),
            FieldValue::from("9a"),
            FieldValue::Boolean(false),
        ];
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                assert_eq!(compare_values(b, a, SortDirection::Asc), j.cmp(&i));
                assert_eq!(compare_values(b, a, SortDirection::Desc), i.cmp(&j));
            }
        }
    }

    #[test]
    fn test_no_cycle_between_numbers_and_numeric_text() {
        let two = FieldValue::Integer(2);
        let ten = FieldValue::Integer(10);
        let text = FieldValue::from("1a");

        assert_eq!(compare_values(&two, &ten, SortDirection::Asc), Ordering::Less);
        assert_eq!(compare_values(&ten, &text, SortDirection::Asc), Ordering::Less);
        assert_eq!(compare_values(&two, &text, SortDirection::Asc), Ordering::Less);
    }

    #[test]
    fn test_nan_sorts_after_numbers() {
        let mut values = vec![
            FieldValue::Float(f64::NAN),
            FieldValue::Integer(3),
            FieldValue::Float(f64::NEG_INFINITY),
            FieldValue::Float(f64::NAN),
            FieldValue::Float(1.5),
        ];
        values.sort_by(|a, b| compare_values(a, b, SortDirection::Asc));

        assert_eq!(values[0], FieldValue::Float(f64::NEG_INFINITY));
        assert_eq!(values[1], FieldValue::Float(1.5));
        assert_eq!(values[2], FieldValue::Integer(3));
        assert!(values[3..].iter().all(|v| v.as_f64().is_some_and(f64::is_nan)));
    }

    #[test]
    fn test_mixed_column_sorts_in_both_directions() {
        let mut records: Vec<Value> = (0..200)
            .map(|i| match i % 5 {
                0 => json!({"amount": i}),
                1 => json!({"amount": format!("{}a", i)}),
                2 => json!({"amount": i as f64 / 3.0}),
                3 => json!({"amount": i % 2 == 0}),
                _ => json!({"other": i}),
            })
            .collect();

        records.sort_by(build_record_comparator("amount", SortDirection::Asc));
        assert!(records[0]["amount"].is_number());
        assert!(records[199]["amount"].is_null());

        records.sort_by(build_record_comparator("amount", SortDirection::Desc));
        assert!(records[0]["amount"].is_boolean());
        assert!(records[199]["amount"].is_null());
    }

    #[test]
    fn test_nested_key() {
        let mut records = vec![
            json!({"paymentMethod": {"name": "Wire"}}),
            json!({"paymentMethod": {"name": "card"}}),
        ];
        records.sort_by(build_record_comparator("paymentMethod.name", SortDirection::Asc));
        assert_eq!(records[0]["paymentMethod"]["name"], "card");
    }

    #[test]
    fn test_custom_resolver() {
        let mut records = vec![json!({"first": "Zed"}), json!({"first": "amelia"})];
        let by_length = build_comparator("first", SortDirection::Asc, |record: &Value, key: &str| {
            FieldValue::Integer(record[key].as_str().map(str::len).unwrap_or(0) as i64)
        });
        records.sort_by(by_length);
        assert_eq!(records[0]["first"], "Zed");
        assert_eq!(records[1]["first"], "amelia");
    }
}
