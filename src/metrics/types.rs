//! Values handed to the presentation layer.

use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::metrics::filter::CallerFilter;
use crate::table::{CallTable, weekday_name};

/// Aggregates over the rows a [`FilterSelection`](crate::metrics::FilterSelection) kept.
///
/// Every value is a mean rounded to two decimals. A mean over no values is 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MetricsBundle {
    pub row_count: usize,

    // counts
    pub avg_total_dials: f64,
    pub avg_conversations: f64,
    pub avg_leads: f64,
    pub avg_offers_made: f64,
    pub avg_total_correct_numbers: f64,

    // ratios
    pub connection_rate: f64,
    pub offer_efficiency: f64,
    pub acceptance_rate: f64,
    pub contract_rate: f64,
    pub success_rate: f64,
}

/// Values a presentation layer can offer in its filter widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Observed weekdays in order of first appearance.
    #[serde(serialize_with = "serialize_days")]
    pub days: Vec<Weekday>,
    /// Observed callers, sorted, without the `All` sentinel.
    pub callers: Vec<String>,
}

impl FilterOptions {
    pub fn from_table(table: &CallTable) -> Self {
        let mut days = Vec::new();
        let mut callers = Vec::new();

        for record in table.records() {
            if let Some(day) = record.day_of_week() {
                if !days.contains(&day) {
                    days.push(day);
                }
            }
            if let Some(caller) = record.caller() {
                callers.push(caller.to_string());
            }
        }

        callers.sort();
        callers.dedup();

        FilterOptions { days, callers }
    }

    /// Caller choices with the `All` sentinel first.
    pub fn caller_choices(&self) -> Vec<String> {
        std::iter::once(CallerFilter::ALL_LABEL.to_string())
            .chain(self.callers.iter().cloned())
            .collect()
    }
}

fn serialize_days<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(days.iter().map(|d| weekday_name(*d)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{CallRecord, CountField};
    use chrono::NaiveDate;

    fn record(day: u32, caller: Option<&str>) -> CallRecord {
        CallRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, day),
            caller.map(str::to_string),
            [Some(0.0); CountField::COUNT],
        )
    }

    #[test]
    fn test_options_order_and_dedup() {
        let table = CallTable::from_records(vec![
            record(3, Some("Zoe")),
            record(1, Some("Adam")),
            record(10, Some("Zoe")),
            record(2, None),
            CallRecord::new(None, Some("Mia".to_string()), [Some(0.0); CountField::COUNT]),
        ]);
        let options = FilterOptions::from_table(&table);

        assert_eq!(options.days, vec![Weekday::Wed, Weekday::Mon, Weekday::Tue]);
        assert_eq!(options.callers, vec!["Adam", "Mia", "Zoe"]);
        assert_eq!(options.caller_choices()[0], "All");
        assert_eq!(options.caller_choices().len(), 4);
    }

    #[test]
    fn test_options_serialize_full_day_names() {
        let options = FilterOptions {
            days: vec![Weekday::Fri],
            callers: vec!["A".to_string()],
        };
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"days":["Friday"],"callers":["A"]}"#);
    }

    #[test]
    fn test_default_bundle_is_all_zero() {
        let bundle = MetricsBundle::default();
        assert_eq!(bundle.row_count, 0);
        assert_eq!(bundle.success_rate, 0.0);
    }
}
