//! Predicate compiler
//!
//! Turns the applied filter values into one predicate over records. Each
//! filter type has its own compilation function; the combined predicate is
//! the AND of every active clause, so an empty set of clauses lets every
//! record through.
//!
//! Dirty data never fails a compile: an unparseable filter date disables its
//! filter, and an unparseable record date is read as the Unix epoch.

use crate::core::field::{FieldValue, Record};
use crate::core::filter::{
    DateRange, FilterOption, FilterRegistry, FilterType, FilterValue, FilterValues, NumberRange,
    SelectChoice,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use std::collections::BTreeSet;

/// What a select choice compares the record field against
#[derive(Debug, Clone, PartialEq)]
enum Expected {
    /// The choice carries an explicit raw value
    Value(FieldValue),
    /// Compare the field's text form to the choice value
    Text(String),
}

impl Expected {
    fn for_choice(value: &str, choices: &[SelectChoice]) -> Self {
        choices
            .iter()
            .find(|choice| choice.value == value)
            .and_then(|choice| choice.matches.as_ref())
            .map(|raw| Expected::Value(FieldValue::from(raw)))
            .unwrap_or_else(|| Expected::Text(value.to_string()))
    }

    fn matches(&self, field: &FieldValue) -> bool {
        match self {
            Expected::Value(expected) => field.loosely_equals(expected),
            Expected::Text(expected) => field.to_text().as_deref() == Some(expected.as_str()),
        }
    }
}

/// One compiled filter condition
#[derive(Debug, Clone, PartialEq)]
enum Clause {
    Equals { field: String, expected: Expected },
    OneOf { field: String, expected: Vec<Expected> },
    Contains { field: String, needle: String },
    Between { field: String, range: NumberRange },
    SameDay { field: String, day: NaiveDate },
    Within { field: String, from: i64, to: i64 },
    IsTrue { field: String },
}

impl Clause {
    fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Clause::Equals { field, expected } => expected.matches(&record.resolve(field)),
            Clause::OneOf { field, expected } => {
                let value = record.resolve(field);
                expected.iter().any(|e| e.matches(&value))
            }
            Clause::Contains { field, needle } => record
                .resolve(field)
                .to_text()
                .is_some_and(|text| text.to_lowercase().contains(needle.as_str())),
            Clause::Between { field, range } => record
                .resolve(field)
                .to_number()
                .is_some_and(|n| range.contains(n)),
            Clause::SameDay { field, day } => {
                instant_or_epoch(&record.resolve(field)).date_naive() == *day
            }
            Clause::Within { field, from, to } => {
                let at = instant_or_epoch(&record.resolve(field)).timestamp_millis();
                *from <= at && at <= *to
            }
            Clause::IsTrue { field } => record.resolve(field) == FieldValue::Boolean(true),
        }
    }
}

/// Combined filter predicate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    /// The predicate that accepts every record
    pub fn always() -> Self {
        Self::default()
    }

    /// True when no filter restricts the records
    pub fn is_pass_through(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Number of active conditions
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// AND of every clause
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        self.clauses.iter().all(|clause| clause.matches(record))
    }
}

/// Compile the applied filter values into a single predicate
///
/// Values for ids missing from the registry, and values whose shape does not
/// match their filter's type, are ignored.
pub fn compile(registry: &FilterRegistry, applied: &FilterValues) -> Predicate {
    let clauses = registry
        .iter()
        .filter_map(|option| {
            let value = applied.get(&option.id)?;
            compile_filter(option, value)
        })
        .collect();

    Predicate { clauses }
}

fn compile_filter(option: &FilterOption, value: &FilterValue) -> Option<Clause> {
    if value.is_unset() {
        return None;
    }

    let field = option.field();
    match (&option.kind, value) {
        (FilterType::Select { options }, FilterValue::Select(selected)) => {
            Some(compile_select(field, selected, options))
        }
        (FilterType::Multiselect { options }, FilterValue::Multiselect(selected)) => {
            Some(compile_multiselect(field, selected, options))
        }
        (FilterType::Date, FilterValue::Date(Some(day))) => compile_date(field, day),
        (FilterType::Daterange, FilterValue::DateRange(range)) => compile_daterange(field, range),
        (FilterType::Text, FilterValue::Text(text))
        | (FilterType::Number { range: false }, FilterValue::Number(text)) => {
            Some(compile_contains(field, text))
        }
        (FilterType::Number { range: true }, FilterValue::NumberRange(range)) => {
            Some(Clause::Between {
                field: field.to_string(),
                range: *range,
            })
        }
        (FilterType::Boolean, FilterValue::Boolean(true)) => Some(Clause::IsTrue {
            field: field.to_string(),
        }),
        _ => {
            tracing::warn!(
                filter = %option.id,
                expected = option.kind.name(),
                "skipping filter value of the wrong type"
            );
            None
        }
    }
}

fn compile_select(field: &str, selected: &str, choices: &[SelectChoice]) -> Clause {
    Clause::Equals {
        field: field.to_string(),
        expected: Expected::for_choice(selected, choices),
    }
}

fn compile_multiselect(field: &str, selected: &BTreeSet<String>, choices: &[SelectChoice]) -> Clause {
    Clause::OneOf {
        field: field.to_string(),
        expected: selected
            .iter()
            .map(|value| Expected::for_choice(value, choices))
            .collect(),
    }
}

fn compile_contains(field: &str, text: &str) -> Clause {
    Clause::Contains {
        field: field.to_string(),
        needle: text.trim().to_lowercase(),
    }
}

fn compile_date(field: &str, day: &str) -> Option<Clause> {
    let Some(day) = parse_day(day) else {
        tracing::warn!(field, value = day, "ignoring unparseable date filter");
        return None;
    };
    Some(Clause::SameDay {
        field: field.to_string(),
        day,
    })
}

fn compile_daterange(field: &str, range: &DateRange) -> Option<Clause> {
    let from = range.from.as_deref().and_then(|raw| {
        let bound = start_bound(raw);
        if bound.is_none() {
            tracing::warn!(field, value = raw, "ignoring unparseable lower date bound");
        }
        bound
    });
    let to = range.to.as_deref().and_then(|raw| {
        let bound = end_bound(raw);
        if bound.is_none() {
            tracing::warn!(field, value = raw, "ignoring unparseable upper date bound");
        }
        bound
    });

    if from.is_none() && to.is_none() {
        return None;
    }

    Some(Clause::Within {
        field: field.to_string(),
        from: from.unwrap_or(i64::MIN),
        to: to.unwrap_or(i64::MAX),
    })
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a record or bound value into an instant
///
/// Accepts RFC 3339, naive date-times, plain dates (midnight UTC) and
/// integer epoch milliseconds.
pub fn parse_instant(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Integer(millis) => DateTime::from_timestamp_millis(*millis),
        FieldValue::String(text) => parse_instant_str(text.trim()),
        _ => None,
    }
}

fn parse_instant_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|day| day.and_time(NaiveTime::MIN))
        })
        .map(|naive| naive.and_utc())
}

fn instant_or_epoch(value: &FieldValue) -> DateTime<Utc> {
    parse_instant(value).unwrap_or_default()
}

fn parse_day(text: &str) -> Option<NaiveDate> {
    parse_instant_str(text.trim()).map(|dt| dt.date_naive())
}

fn is_plain_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_ok()
}

fn start_bound(raw: &str) -> Option<i64> {
    parse_instant_str(raw.trim()).map(|dt| dt.timestamp_millis())
}

/// A plain-date upper bound covers its whole day
fn end_bound(raw: &str) -> Option<i64> {
    let at = parse_instant_str(raw.trim())?;
    if is_plain_date(raw) {
        // The last representable day has no successor; its end is unbounded
        Some(
            at.checked_add_signed(TimeDelta::days(1))
                .map_or(i64::MAX, |next_day| next_day.timestamp_millis() - 1),
        )
    } else {
        Some(at.timestamp_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn registry(options: Vec<FilterOption>) -> FilterRegistry {
        FilterRegistry::new(options).unwrap()
    }

    fn applied(pairs: Vec<(&str, FilterValue)>) -> FilterValues {
        pairs
            .into_iter()
            .map(|(id, value)| (id.to_string(), value))
            .collect()
    }

    #[test]
    fn test_empty_applied_is_pass_through() {
        let registry = registry(vec![FilterOption::new("name", "Name", FilterType::Text)]);
        let predicate = compile(&registry, &registry.empty_values());
        assert!(predicate.is_pass_through());
        assert!(predicate.matches(&json!({"name": "anything"})));
        assert!(predicate.matches(&json!(null)));
    }

    #[test]
    fn test_select_compares_text_form() {
        let registry = registry(vec![FilterOption::select(
            "type",
            "Type",
            vec![SelectChoice::new("user", "User"), SelectChoice::new("group", "Group")],
        )]);
        let predicate = compile(&registry, &applied(vec![("type", FilterValue::Select("user".into()))]));

        assert!(predicate.matches(&json!({"type": "user"})));
        assert!(!predicate.matches(&json!({"type": "group"})));
        assert!(!predicate.matches(&json!({})));
    }

    #[test]
    fn test_select_with_raw_match_value() {
        let registry = registry(vec![
            FilterOption::select(
                "status",
                "Status",
                vec![
                    SelectChoice::new("active", "Active").matching(json!(true)),
                    SelectChoice::new("inactive", "Inactive").matching(json!(false)),
                ],
            )
            .on_field("is_active"),
        ]);
        let predicate = compile(
            &registry,
            &applied(vec![("status", FilterValue::Select("inactive".into()))]),
        );

        assert!(predicate.matches(&json!({"is_active": false})));
        assert!(!predicate.matches(&json!({"is_active": true})));
        assert!(!predicate.matches(&json!({"is_active": "false"})));
    }

    #[test]
    fn test_multiselect_membership() {
        let registry = registry(vec![FilterOption::multiselect(
            "currency",
            "Currency",
            vec![
                SelectChoice::new("USD", "USD"),
                SelectChoice::new("EUR", "EUR"),
                SelectChoice::new("GBP", "GBP"),
            ],
        )]);
        let selected = BTreeSet::from(["USD".to_string(), "EUR".to_string()]);
        let predicate = compile(
            &registry,
            &applied(vec![("currency", FilterValue::Multiselect(selected))]),
        );

        assert!(predicate.matches(&json!({"currency": "EUR"})));
        assert!(!predicate.matches(&json!({"currency": "GBP"})));
    }

    #[test]
    fn test_text_is_case_insensitive_substring() {
        let registry = registry(vec![
            FilterOption::new("email", "Email", FilterType::Text).on_field("user.email"),
        ]);
        let predicate = compile(&registry, &applied(vec![("email", FilterValue::Text(" EXAMPLE ".into()))]));

        assert!(predicate.matches(&json!({"user": {"email": "jo@Example.com"}})));
        assert!(!predicate.matches(&json!({"user": {"email": "jo@test.com"}})));
        assert!(!predicate.matches(&json!({"user": null})));
    }

    #[test]
    fn test_number_substring() {
        let registry = registry(vec![FilterOption::new(
            "phone",
            "Phone",
            FilterType::Number { range: false },
        )]);
        let predicate = compile(&registry, &applied(vec![("phone", FilterValue::Number("234".into()))]));

        assert!(predicate.matches(&json!({"phone": 1234567})));
        assert!(!predicate.matches(&json!({"phone": 999})));
    }

    #[test]
    fn test_number_range_open_ended() {
        let registry = registry(vec![FilterOption::new(
            "amount",
            "Amount",
            FilterType::Number { range: true },
        )]);

        let at_least_ten = compile(
            &registry,
            &applied(vec![("amount", FilterValue::NumberRange(NumberRange::new(Some(10.0), None)))]),
        );
        assert!(at_least_ten.matches(&json!({"amount": 10})));
        assert!(at_least_ten.matches(&json!({"amount": "250.5"})));
        assert!(!at_least_ten.matches(&json!({"amount": 9.99})));
        assert!(!at_least_ten.matches(&json!({"amount": "n/a"})));

        let between = compile(
            &registry,
            &applied(vec![(
                "amount",
                FilterValue::NumberRange(NumberRange::new(Some(1.0), Some(5.0))),
            )]),
        );
        assert!(between.matches(&json!({"amount": 5})));
        assert!(!between.matches(&json!({"amount": 6})));
    }

    #[test]
    fn test_date_exact_day() {
        let registry = registry(vec![FilterOption::new("day", "Day", FilterType::Date).on_field("created_at")]);
        let predicate = compile(
            &registry,
            &applied(vec![("day", FilterValue::Date(Some("2024-03-15".into())))]),
        );

        assert!(predicate.matches(&json!({"created_at": "2024-03-15T23:59:00Z"})));
        assert!(predicate.matches(&json!({"created_at": "2024-03-15"})));
        assert!(!predicate.matches(&json!({"created_at": "2024-03-16T00:00:00Z"})));
        assert!(!predicate.matches(&json!({"created_at": "garbage"})));
    }

    #[test]
    fn test_unparseable_date_filter_is_ignored() {
        let registry = registry(vec![FilterOption::new("day", "Day", FilterType::Date)]);
        let predicate = compile(&registry, &applied(vec![("day", FilterValue::Date(Some("soon".into())))]));
        assert!(predicate.is_pass_through());
    }

    fn created_range(from: Option<&str>, to: Option<&str>) -> Predicate {
        let registry = registry(vec![
            FilterOption::new("created", "Created", FilterType::Daterange).on_field("created_at"),
        ]);
        compile(
            &registry,
            &applied(vec![("created", FilterValue::DateRange(DateRange::new(from, to)))]),
        )
    }

    #[test]
    fn test_daterange_inclusive_bounds() {
        let predicate = created_range(Some("2024-01-01"), Some("2024-01-31"));

        assert!(predicate.matches(&json!({"created_at": "2024-01-01T00:00:00Z"})));
        assert!(predicate.matches(&json!({"created_at": "2024-01-31T23:59:59Z"})));
        assert!(!predicate.matches(&json!({"created_at": "2024-02-01T00:00:00Z"})));
        assert!(!predicate.matches(&json!({"created_at": "2023-12-31T23:59:59Z"})));
    }

    #[test]
    fn test_daterange_accepts_epoch_millis() {
        let predicate = created_range(Some("2024-01-01"), None);
        // 2024-06-01T00:00:00Z
        assert!(predicate.matches(&json!({"created_at": 1_717_200_000_000_i64})));
    }

    #[test]
    fn test_daterange_invalid_record_date_is_epoch() {
        let bad = json!({"created_at": "not a date"});
        let missing = json!({});

        let from_only = created_range(Some("2024-01-01"), None);
        assert!(!from_only.matches(&bad));
        assert!(!from_only.matches(&missing));

        let both = created_range(Some("2024-01-01"), Some("2024-12-31"));
        assert!(!both.matches(&bad));

        let to_only = created_range(None, Some("2024-12-31"));
        assert!(to_only.matches(&bad));
        assert!(to_only.matches(&missing));
    }

    #[test]
    fn test_daterange_last_representable_day_is_unbounded() {
        assert_eq!(end_bound("+262142-12-31"), Some(i64::MAX));

        let predicate = created_range(None, Some("+262142-12-31"));
        assert!(predicate.matches(&json!({"created_at": "2024-06-01"})));
        assert!(predicate.matches(&json!({"created_at": "not a date"})));
    }

    #[test]
    fn test_boolean_false_does_not_filter() {
        let registry = registry(vec![FilterOption::new("verified", "Verified", FilterType::Boolean)]);

        let off = compile(&registry, &applied(vec![("verified", FilterValue::Boolean(false))]));
        assert!(off.is_pass_through());

        let on = compile(&registry, &applied(vec![("verified", FilterValue::Boolean(true))]));
        assert!(on.matches(&json!({"verified": true})));
        assert!(!on.matches(&json!({"verified": "true"})));
        assert!(!on.matches(&json!({"verified": false})));
    }

    #[test]
    fn test_unknown_ids_and_mismatched_values_are_ignored() {
        let registry = registry(vec![FilterOption::new("name", "Name", FilterType::Text)]);
        let predicate = compile(
            &registry,
            &applied(vec![
                ("ghost", FilterValue::Text("x".into())),
                ("name", FilterValue::Boolean(true)),
            ]),
        );
        assert!(predicate.is_pass_through());
    }

    #[test]
    fn test_combined_predicate_is_and() {
        let registry = registry(vec![
            FilterOption::select("type", "Type", vec![SelectChoice::new("user", "User")]),
            FilterOption::new("verified", "Verified", FilterType::Boolean),
        ]);
        let predicate = compile(
            &registry,
            &applied(vec![
                ("type", FilterValue::Select("user".into())),
                ("verified", FilterValue::Boolean(true)),
            ]),
        );
        assert_eq!(predicate.len(), 2);

        let records: Vec<Value> = vec![
            json!({"type": "user", "verified": true}),
            json!({"type": "user", "verified": false}),
            json!({"type": "group", "verified": true}),
        ];
        let passing: Vec<_> = records.iter().filter(|r| predicate.matches(*r)).collect();
        assert_eq!(passing, vec![&records[0]]);
    }

    #[test]
    fn test_compile_does_not_mutate_applied() {
        let registry = registry(vec![FilterOption::new("name", "Name", FilterType::Text)]);
        let values = applied(vec![("name", FilterValue::Text("Bob".into()))]);
        let before = values.clone();
        let first = compile(&registry, &values);
        let second = compile(&registry, &values);
        assert_eq!(values, before);
        assert_eq!(first, second);
    }
}
