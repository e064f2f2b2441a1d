//! Fee rules list screen
//!
//! This example demonstrates:
//! - Loading a view from YAML configuration
//! - Typed records implementing `Record`
//! - Draft/applied filters, search, sort and pagination
//! - Active filter chips and recent searches

use dataview::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
struct FeeRule {
    id: u32,
    code: String,
    name: String,
    channel: &'static str,
    amount: f64,
    is_active: bool,
    created_at: String,
}

impl Record for FeeRule {
    fn resolve(&self, key: &str) -> FieldValue {
        match key {
            "id" => FieldValue::Integer(self.id.into()),
            "code" => self.code.as_str().into(),
            "name" => self.name.as_str().into(),
            "channel" => self.channel.into(),
            "amount" => self.amount.into(),
            "is_active" => self.is_active.into(),
            "created_at" => self.created_at.as_str().into(),
            _ => FieldValue::Null,
        }
    }
}

fn fee_rules() -> Vec<FeeRule> {
    let channels = ["card", "wire", "payout"];
    (1..=24)
        .map(|i| FeeRule {
            id: i,
            code: format!("FR-{:03}", i),
            name: format!("{} fee tier {}", channels[i as usize % 3], i),
            channel: channels[i as usize % 3],
            amount: f64::from(i) * 1.25,
            is_active: i % 4 != 0,
            created_at: format!("2024-{:02}-{:02}", (i % 12) + 1, (i % 27) + 1),
        })
        .collect()
}

fn print_snapshot(title: &str, view: &DataView<FeeRule>) {
    let snapshot = view.snapshot();
    println!("── {} ──", title);
    println!(
        "   page {}/{} · {} rows · {} active filters",
        snapshot.current_page,
        snapshot.total_pages,
        snapshot.total_items,
        snapshot.active_filter_count
    );
    for rule in &snapshot.displayed_rows {
        println!(
            "   {} {:<22} {:>7.2} {}",
            rule.code,
            rule.name,
            rule.amount,
            if rule.is_active { "active" } else { "inactive" }
        );
    }
    println!();
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Fee Rules DataView Example");
    println!("==========================\n");

    let config = ViewConfig::from_yaml_str(include_str!("fee_rules.yaml"))?;
    println!("Loaded view '{}' with {} filters\n", config.name, config.filters.len());

    let mut view = DataViewBuilder::from_config(config)
        .sort_resolver("name", |rule: &FeeRule, _key: &str| {
            FieldValue::String(rule.name.to_lowercase())
        })
        .recent_searches(["tier 1"])
        .records(fee_rules())
        .build()?;
    print_snapshot("initial (newest first)", &view);

    view.set_draft_filter("status", FilterValue::Select("active".into()));
    view.toggle_filter_value("channel", "card");
    view.toggle_filter_value("channel", "wire");
    print_snapshot("draft edited, nothing applied yet", &view);

    view.apply_filters();
    print_snapshot("active card and wire rules", &view);

    view.set_draft_filter(
        "amount",
        FilterValue::NumberRange(NumberRange::parse("5", "20")),
    );
    view.apply_filters();
    for chip in view.active_filters() {
        println!("   [{}: {}]", chip.label, chip.summary);
    }
    println!();

    view.search("tier 1");
    view.sort_by("amount");
    print_snapshot("search 'tier 1', amount ascending", &view);

    view.sort_by("amount");
    print_snapshot("amount descending", &view);

    view.clear_search();
    view.clear_filter("amount");
    view.set_page(99);
    print_snapshot("page 99 clamps to the last page", &view);

    view.reset_filters();
    view.set_page_size(10);
    print_snapshot("filters reset, 10 per page", &view);

    println!("Recent searches: {:?}", view.snapshot().recent_searches);
    println!("\nSnapshot as JSON:");
    println!("{}", serde_json::to_string_pretty(view.snapshot())?);

    Ok(())
}
