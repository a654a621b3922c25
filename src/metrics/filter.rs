use std::collections::HashSet;

use chrono::Weekday;

use crate::table::{CallRecord, CallTable};

/// Caller restriction. `All` is the "no restriction" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CallerFilter {
    #[default]
    All,
    Only(String),
}

impl CallerFilter {
    pub const ALL_LABEL: &'static str = "All";

    /// `All` (any case) or an empty string means no restriction.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case(Self::ALL_LABEL) {
            CallerFilter::All
        } else {
            CallerFilter::Only(raw.to_string())
        }
    }

    pub fn matches(&self, caller: Option<&str>) -> bool {
        match self {
            CallerFilter::All => true,
            CallerFilter::Only(name) => caller == Some(name.as_str()),
        }
    }
}

/// Which rows a display cycle looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub days: HashSet<Weekday>,
    pub caller: CallerFilter,
}

impl FilterSelection {
    pub fn new(days: impl IntoIterator<Item = Weekday>, caller: CallerFilter) -> Self {
        FilterSelection {
            days: days.into_iter().collect(),
            caller,
        }
    }

    /// Every observed weekday, every caller.
    ///
    /// Undated rows contribute no weekday and so stay out of even this default view.
    pub fn all(table: &CallTable) -> Self {
        FilterSelection {
            days: table.records().iter().filter_map(CallRecord::day_of_week).collect(),
            caller: CallerFilter::All,
        }
    }

    /// Undated rows never match, whatever days are selected.
    pub fn matches(&self, record: &CallRecord) -> bool {
        let day_ok = record
            .day_of_week()
            .is_some_and(|day| self.days.contains(&day));
        day_ok && self.caller.matches(record.caller())
    }

    /// Rows of `table` that pass the selection. The table itself is untouched.
    pub fn apply<'a>(&self, table: &'a CallTable) -> Vec<&'a CallRecord> {
        table.records().iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CountField;
    use chrono::NaiveDate;

    fn record(day: u32, caller: Option<&str>) -> CallRecord {
        // January 2024 starts on a Monday.
        let date = NaiveDate::from_ymd_opt(2024, 1, day);
        CallRecord::new(
            date,
            caller.map(str::to_string),
            [Some(1.0); CountField::COUNT],
        )
    }

    fn sample_table() -> CallTable {
        CallTable::from_records(vec![
            record(1, Some("A")),
            record(2, Some("B")),
            record(8, Some("B")),
            record(3, None),
            CallRecord::new(None, Some("A".to_string()), [Some(1.0); CountField::COUNT]),
        ])
    }

    #[test]
    fn test_caller_filter_parse() {
        assert_eq!(CallerFilter::parse("All"), CallerFilter::All);
        assert_eq!(CallerFilter::parse("all"), CallerFilter::All);
        assert_eq!(CallerFilter::parse(""), CallerFilter::All);
        assert_eq!(CallerFilter::parse(" Dana "), CallerFilter::Only("Dana".to_string()));
    }

    #[test]
    fn test_all_selection_skips_undated_rows() {
        let table = sample_table();
        let selection = FilterSelection::all(&table);

        assert_eq!(selection.days.len(), 3);
        assert_eq!(selection.apply(&table).len(), 4);
    }

    #[test]
    fn test_day_filter() {
        let table = sample_table();
        let selection = FilterSelection::new([Weekday::Mon], CallerFilter::All);
        let rows = selection.apply(&table);

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.day_of_week() == Some(Weekday::Mon)));
    }

    #[test]
    fn test_caller_filter() {
        let table = sample_table();
        let selection = FilterSelection::new(
            [Weekday::Mon, Weekday::Tue, Weekday::Wed],
            CallerFilter::Only("B".to_string()),
        );

        assert_eq!(selection.apply(&table).len(), 2);
    }

    #[test]
    fn test_null_caller_never_matches_named_caller() {
        let rec = record(3, None);
        assert!(!CallerFilter::Only("A".to_string()).matches(rec.caller()));
        assert!(CallerFilter::All.matches(rec.caller()));
    }

    #[test]
    fn test_empty_days_select_nothing() {
        let table = sample_table();
        let selection = FilterSelection::new([], CallerFilter::All);

        assert!(selection.apply(&table).is_empty());
        assert_eq!(table.len(), 5);
    }
}
