//! Fetch-and-transform of the call sheet into a [`CallTable`].

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::error::PipelineError;
use crate::fetch::{HttpClient, Source, read_source};
use crate::table::record::{CallRecord, CountField, Counts};
use crate::table::schema::ColumnLayout;

/// The cleaned call sheet. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CallTable {
    records: Vec<CallRecord>,
    synthesized_columns: Vec<CountField>,
    coerced_cells: usize,
}

impl CallTable {
    pub fn from_records(records: Vec<CallRecord>) -> Self {
        CallTable {
            records,
            synthesized_columns: Vec::new(),
            coerced_cells: 0,
        }
    }

    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count columns that were absent from the sheet and zero-filled.
    pub fn synthesized_columns(&self) -> &[CountField] {
        &self.synthesized_columns
    }

    /// Non-empty date or count cells that could not be parsed and became null.
    pub fn coerced_cells(&self) -> usize {
        self.coerced_cells
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%b-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a date cell. Anything unrecognised is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parses a count cell. Empty, non-numeric and non-finite cells are `None`.
pub fn parse_count(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Turns raw CSV bytes into a [`CallTable`].
///
/// Pure: the same bytes always produce an equal table.
///
/// # Errors
///
/// Returns [`PipelineError::SourceUnavailable`] if the bytes are empty, are not
/// valid CSV, or lack the `Date` or `Caller` header.
pub fn transform(source_id: &str, bytes: &[u8]) -> Result<CallTable, PipelineError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(PipelineError::source_unavailable(source_id, "empty response body"));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::source_unavailable(source_id, e))?
        .clone();

    let layout = ColumnLayout::resolve(&headers).map_err(|missing| {
        PipelineError::source_unavailable(
            source_id,
            format!("missing required column `{missing}`"),
        )
    })?;

    let synthesized_columns = layout.synthesized();
    for field in &synthesized_columns {
        warn!(column = field.name(), "Column absent from sheet, filling with zero");
    }

    let mut records = Vec::new();
    let mut coerced_cells = 0;

    for result in reader.records() {
        let row = result.map_err(|e| PipelineError::source_unavailable(source_id, e))?;
        let (record, failures) = build_record(&layout, &row);
        coerced_cells += failures;
        records.push(record);
    }

    if coerced_cells > 0 {
        warn!(coerced_cells, "Unparseable cells replaced with null");
    }
    debug!(rows = records.len(), "Call sheet transformed");

    Ok(CallTable {
        records,
        synthesized_columns,
        coerced_cells,
    })
}

fn build_record(layout: &ColumnLayout, row: &StringRecord) -> (CallRecord, usize) {
    let mut failures = 0;
    let cell = |pos: usize| row.get(pos).unwrap_or("");
    let is_blank = |raw: &str| raw.trim().is_empty();

    let raw_date = cell(layout.date);
    let date = parse_date(raw_date);
    if date.is_none() && !is_blank(raw_date) {
        failures += 1;
    }

    let raw_caller = cell(layout.caller).trim();
    let caller = (!raw_caller.is_empty()).then(|| raw_caller.to_string());

    let mut counts: Counts = [None; CountField::COUNT];
    for field in CountField::ALL {
        counts[field.index()] = match layout.counts[field.index()] {
            Some(pos) => {
                let raw = cell(pos);
                let value = parse_count(raw);
                if value.is_none() && !is_blank(raw) {
                    failures += 1;
                }
                value
            }
            None => Some(0.0),
        };
    }

    (CallRecord::new(date, caller, counts), failures)
}

/// Fetches the sheet from `source` and transforms it.
#[tracing::instrument(skip(client, source), fields(source = %source))]
pub async fn load<C: HttpClient + ?Sized>(
    client: &C,
    source: &Source,
) -> Result<CallTable, PipelineError> {
    let bytes = read_source(client, source).await?;
    let table = transform(&source.id(), &bytes)?;
    info!(
        rows = table.len(),
        synthesized = table.synthesized_columns().len(),
        coerced_cells = table.coerced_cells(),
        "Call sheet loaded"
    );
    Ok(table)
}
