//! Line commands for the interactive display loop.
//!
//! ```text
//! days Monday,Tuesday   select weekdays (also: all, none)
//! caller Dana           select one caller (also: All)
//! show                  print metrics for the current selection
//! options               print observed days and callers
//! refresh               reload the sheet, bypassing the cache
//! quit                  leave
//! ```

use std::collections::HashSet;
use std::str::FromStr;

use chrono::Weekday;

use crate::metrics::{CallerFilter, FilterSelection};
use crate::table::CallTable;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySelection {
    /// Whatever weekdays the current table contains.
    AllObserved,
    Only(HashSet<Weekday>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Days(DaySelection),
    Caller(CallerFilter),
    Show,
    Options,
    Refresh,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match verb.to_ascii_lowercase().as_str() {
            "days" | "day" => parse_days(rest).map(ShellCommand::Days),
            "caller" => Ok(ShellCommand::Caller(CallerFilter::parse(rest))),
            "show" | "" => Ok(ShellCommand::Show),
            "options" => Ok(ShellCommand::Options),
            "refresh" => Ok(ShellCommand::Refresh),
            "help" | "?" => Ok(ShellCommand::Help),
            "quit" | "exit" => Ok(ShellCommand::Quit),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

fn parse_days(raw: &str) -> Result<DaySelection, String> {
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        return Ok(DaySelection::AllObserved);
    }
    if raw.eq_ignore_ascii_case("none") {
        return Ok(DaySelection::Only(HashSet::new()));
    }

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| format!("'{s}' is not a day of the week"))
        })
        .collect::<Result<HashSet<_>, _>>()
        .map(DaySelection::Only)
}

/// The selection as edited by shell commands, resolved against a table per display cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    pub days: DaySelection,
    pub caller: CallerFilter,
}

impl Default for ShellState {
    fn default() -> Self {
        ShellState {
            days: DaySelection::AllObserved,
            caller: CallerFilter::All,
        }
    }
}

impl ShellState {
    pub fn selection(&self, table: &CallTable) -> FilterSelection {
        match &self.days {
            DaySelection::AllObserved => FilterSelection {
                caller: self.caller.clone(),
                ..FilterSelection::all(table)
            },
            DaySelection::Only(days) => {
                FilterSelection::new(days.iter().copied(), self.caller.clone())
            }
        }
    }
}

pub const HELP: &str = "\
commands:
  days <d1,d2,...|all|none>   choose weekdays
  caller <name|All>           choose a caller
  show                        print metrics
  options                     list days and callers
  refresh                     reload the sheet
  quit                        exit";
