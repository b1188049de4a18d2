use bizmeld_parser::{Cell, DeckSummary};

use crate::coerce::parse_currency;

const REVENUE: &str = "Revenue (in $)";

/// Normalizes the presentation summary.
///
/// `summary_metrics` and `revenue_breakdown` pass through unchanged; rows of
/// the quarterly table with a currency-formatted revenue field get separators
/// stripped and coerce to float in place. Failures become null.
pub fn normalize_deck(summary: &DeckSummary) -> DeckSummary {
    let mut normalized = summary.clone();

    if let Some(index) = normalized.quarterly_metrics.column_index(REVENUE) {
        for row in &mut normalized.quarterly_metrics.rows {
            row[index] = match &row[index] {
                Cell::Str(text) => match parse_currency(text) {
                    Some(value) => Cell::Float(value),
                    None => Cell::Null,
                },
                Cell::Int(value) => Cell::Float(*value as f64),
                other => other.clone(),
            };
        }
    }

    normalized
}
