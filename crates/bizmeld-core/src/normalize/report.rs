use bizmeld_parser::PageExtract;
use polars::prelude::*;

use crate::coerce::{cell_to_any, coerce_f64, coerce_f64_hard, coerce_i64_hard};
use crate::error::{PipelineError, Result};
use crate::frame::FrameBuilder;

const YEAR: &str = "Year";
const QUARTER: &str = "Quarter";
const REVENUE: &str = "Revenue (in $)";
const MEMBERSHIPS: &str = "Memberships Sold";
const DURATION: &str = "Avg Duration (Minutes)";

/// Normalizes the aggregated report extracted from the paginated source.
///
/// Page tables stack into one frame keyed by trimmed column names. The year
/// and revenue casts are hard (a malformed value aborts the run); the two
/// count/duration columns coerce softly to null. Header casing is preserved.
pub fn normalize_report(pages: &[PageExtract]) -> Result<DataFrame> {
    if pages.is_empty() {
        return Ok(DataFrame::default());
    }

    let mut builder = FrameBuilder::new();
    let mut seen: Vec<String> = Vec::new();

    for page in pages {
        let trimmed: Vec<String> = page
            .table
            .columns
            .iter()
            .map(|column| column.trim().to_string())
            .collect();
        for name in &trimmed {
            if !seen.contains(name) {
                seen.push(name.clone());
            }
        }

        for row in &page.table.rows {
            for (name, cell) in trimmed.iter().zip(row) {
                let value = match name.as_str() {
                    YEAR => AnyValue::Int64(coerce_i64_hard(YEAR, cell)?),
                    REVENUE => to_float(coerce_f64_hard(REVENUE, cell)?),
                    MEMBERSHIPS | DURATION => to_float(coerce_f64(cell)),
                    _ => cell_to_any(cell),
                };
                builder.push(name, value);
            }
            builder.finish_row();
        }
    }

    for required in [YEAR, QUARTER, REVENUE, MEMBERSHIPS, DURATION] {
        if !seen.iter().any(|name| name == required) {
            return Err(PipelineError::Processing(format!(
                "aggregated report is missing the '{required}' column"
            )));
        }
    }

    builder.finish()
}

fn to_float(value: Option<f64>) -> AnyValue<'static> {
    match value {
        Some(number) => AnyValue::Float64(number),
        None => AnyValue::Null,
    }
}
