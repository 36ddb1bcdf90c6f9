//! Output formatting - plain ASCII sections, colour on the key figures

use carbon_common::calculator::ResultView;
use carbon_common::{
    display_category, ActivityCatalog, ActivityRecord, ActivitySet, ImpactBand, Subscriber,
};
use owo_colors::OwoColorize;
use std::fmt::Write;

fn band_colored(band: ImpactBand) -> String {
    match band {
        ImpactBand::Low => band.label().bright_green().to_string(),
        ImpactBand::Moderate => band.label().yellow().to_string(),
        ImpactBand::Significant => band.label().bright_yellow().to_string(),
        ImpactBand::High => band.label().bright_red().to_string(),
    }
}

pub fn render_categories(catalog: &ActivityCatalog) -> String {
    let mut out = String::from("[CATEGORIES]\n");
    for (category, set) in catalog.iter() {
        let _ = writeln!(
            out,
            "  {:<12} {} ({} activities)",
            category,
            display_category(category),
            set.len()
        );
    }
    out
}

pub fn render_activity_set(category: &str, set: &ActivitySet) -> String {
    let mut out = format!("[{}]\n", display_category(category).to_uppercase());
    if set.is_empty() {
        out.push_str("  (no activities)\n");
        return out;
    }
    for (key, activity) in set.iter() {
        let _ = writeln!(
            out,
            "  {:<22} {} (per {})",
            key,
            activity.name,
            activity.unit_suffix()
        );
        let _ = writeln!(out, "  {:<22} {}", "", activity.description.dimmed());
    }
    out
}

pub fn render_catalog(catalog: &ActivityCatalog) -> String {
    catalog
        .iter()
        .map(|(category, set)| render_activity_set(category, set))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_result(view: &ResultView) -> String {
    let mut out = String::from("[EMISSION RESULT]\n");
    let _ = writeln!(out, "  Activity:  {}", view.activity_name);
    let _ = writeln!(out, "  Quantity:  {} {}", view.quantity, view.unit_suffix);
    let _ = writeln!(
        out,
        "  Emissions: {} kg CO2",
        view.co2_emissions.to_string().bold()
    );
    let _ = writeln!(out, "  Impact:    {}", band_colored(view.band));
    out.push('\n');
    let _ = writeln!(out, "[CONTEXT] {}", view.band.advisory());
    out
}

pub fn render_history(email: &str, records: &[ActivityRecord]) -> String {
    let mut out = format!("[HISTORY] {}\n", email);
    if records.is_empty() {
        out.push_str("  No recorded calculations\n");
        return out;
    }
    for record in records {
        let _ = writeln!(
            out,
            "  {}  {:<22} {:>10} -> {} kg CO2",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.activity_type,
            record.quantity,
            record.co2_emissions
        );
    }
    out
}

pub fn render_users(users: &[Subscriber]) -> String {
    let mut out = String::from("[SUBSCRIBERS]\n");
    for user in users {
        let status = if user.is_subscribed {
            "[subscribed]".green().to_string()
        } else {
            "[unsubscribed]".dimmed().to_string()
        };
        let _ = writeln!(out, "  #{:<4} {} {}", user.id, user.email, status);
    }
    out
}

pub fn error_line(message: &str) -> String {
    format!("{} {}", "[ERROR]".bright_red(), message)
}

pub fn ok_line(message: &str) -> String {
    format!("{} {}", "[OK]".bright_green(), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbon_common::Activity;

    #[test]
    fn test_result_block_contains_advisory() {
        let view = ResultView {
            activity_name: "Car".into(),
            quantity: 10.0,
            unit_suffix: "km".into(),
            co2_emissions: 2.3,
            band: ImpactBand::Moderate,
        };
        let text = render_result(&view);
        assert!(text.contains("Activity:  Car"));
        assert!(text.contains("Quantity:  10 km"));
        assert!(text.contains("2.3"));
        assert!(text.contains(ImpactBand::Moderate.advisory()));
    }

    #[test]
    fn test_empty_set_rendering() {
        let text = render_activity_set("offsets", &ActivitySet::new());
        assert!(text.starts_with("[OFFSETS]"));
        assert!(text.contains("(no activities)"));
    }

    #[test]
    fn test_activity_unit_suffix_shown() {
        let mut set = ActivitySet::new();
        set.insert(
            "electricity",
            Activity {
                name: "Electricity".into(),
                unit: "kg CO₂/kWh".into(),
                description: "Grid".into(),
            },
        );
        let text = render_activity_set("energy", &set);
        assert!(text.contains("Electricity (per kWh)"));
    }
}
