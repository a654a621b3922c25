//! Rendering of metrics and filter options for the terminal.
//!
//! Supports labeled text and pretty-printed JSON.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

use crate::metrics::{FilterOptions, MetricsBundle};
use crate::table::weekday_name;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Formats a 0–1 rate as a percentage with two decimals.
pub fn percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Labeled key metrics, one per line.
pub fn render_metrics(bundle: &MetricsBundle) -> String {
    let counts = [
        ("Avg. Dials", bundle.avg_total_dials),
        ("Avg. Conversations", bundle.avg_conversations),
        ("Avg. Leads", bundle.avg_leads),
        ("Avg. Offers Made", bundle.avg_offers_made),
        ("Avg. Correct Numbers", bundle.avg_total_correct_numbers),
    ];
    let rates = [
        ("Connection Rate", bundle.connection_rate),
        ("Offer Efficiency", bundle.offer_efficiency),
        ("Acceptance Rate", bundle.acceptance_rate),
        ("Contract Rate", bundle.contract_rate),
        ("Success Rate", bundle.success_rate),
    ];

    let mut out = String::new();
    let _ = writeln!(out, "Key Metrics ({} rows)", bundle.row_count);
    for (label, value) in counts {
        let _ = writeln!(out, "  {label:<22}{value:.2}");
    }
    for (label, value) in rates {
        let _ = writeln!(out, "  {label:<22}{}", percent(value));
    }
    out
}

/// Observed days and caller choices, including the `All` sentinel.
pub fn render_options(options: &FilterOptions) -> String {
    let days: Vec<&str> = options.days.iter().map(|d| weekday_name(*d)).collect();

    let mut out = String::new();
    let _ = writeln!(out, "Days:    {}", days.join(", "));
    let _ = writeln!(out, "Callers: {}", options.caller_choices().join(", "));
    out
}

pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn format_metrics(bundle: &MetricsBundle, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_metrics(bundle)),
        OutputFormat::Json => to_json(bundle),
    }
}

pub fn format_options(options: &FilterOptions, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_options(options)),
        OutputFormat::Json => to_json(options),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn sample_bundle() -> MetricsBundle {
        MetricsBundle {
            row_count: 1,
            avg_total_dials: 10.0,
            avg_conversations: 5.0,
            connection_rate: 0.5,
            success_rate: 0.1,
            ..Default::default()
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.5), "50.00%");
        assert_eq!(percent(0.0), "0.00%");
        assert_eq!(percent(0.07), "7.00%");
    }

    #[test]
    fn test_render_metrics_labels() {
        let text = render_metrics(&sample_bundle());

        assert!(text.contains("Key Metrics (1 rows)"));
        assert!(text.lines().any(|l| l.contains("Avg. Conversations") && l.ends_with("5.00")));
        assert!(text.lines().any(|l| l.contains("Success Rate") && l.ends_with("10.00%")));
        assert_eq!(text.lines().count(), 11);
    }

    #[test]
    fn test_metrics_json() {
        let json = format_metrics(&sample_bundle(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["row_count"], 1);
        assert_eq!(value["connection_rate"], 0.5);
    }

    #[test]
    fn test_render_options() {
        let options = FilterOptions {
            days: vec![Weekday::Mon, Weekday::Thu],
            callers: vec!["A".to_string(), "B".to_string()],
        };
        let text = format_options(&options, OutputFormat::Text).unwrap();

        assert!(text.contains("Days:    Monday, Thursday"));
        assert!(text.contains("Callers: All, A, B"));
    }
}
