use tracing::debug;

use crate::metrics::filter::FilterSelection;
use crate::metrics::types::MetricsBundle;
use crate::metrics::utility::column_mean;
use crate::table::{CallTable, CountField, Ratios};

/// Applies `selection` to `table` and averages the surviving rows into a [`MetricsBundle`].
///
/// Each column is averaged over its own non-null values. A column with no
/// values at all averages to 0, so an empty selection yields an all-zero bundle.
#[tracing::instrument(skip_all, fields(days = selection.days.len(), caller = ?selection.caller))]
pub fn aggregate(table: &CallTable, selection: &FilterSelection) -> MetricsBundle {
    let rows = selection.apply(table);
    debug!(rows = rows.len(), total = table.len(), "Selection applied");

    let count_mean = |field: CountField| column_mean(rows.iter().map(|r| r.count(field)));
    let ratio_mean =
        |pick: fn(&Ratios) -> Option<f64>| column_mean(rows.iter().map(|r| pick(r.ratios())));

    MetricsBundle {
        row_count: rows.len(),
        avg_total_dials: count_mean(CountField::TotalDials),
        avg_conversations: count_mean(CountField::Conversations),
        avg_leads: count_mean(CountField::Leads),
        avg_offers_made: count_mean(CountField::OffersMade),
        avg_total_correct_numbers: count_mean(CountField::TotalCorrectNumbers),
        connection_rate: ratio_mean(|r| r.connection_rate),
        offer_efficiency: ratio_mean(|r| r.offers_per_convo),
        acceptance_rate: ratio_mean(|r| r.acceptance_rate),
        contract_rate: ratio_mean(|r| r.contract_rate),
        success_rate: ratio_mean(|r| r.success_rate),
    }
}
