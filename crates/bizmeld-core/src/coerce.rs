use bizmeld_parser::Cell;
use polars::prelude::AnyValue;

use crate::error::{PipelineError, Result};
use crate::frame::any_str;

/// Parses a currency-formatted number: optional `$` prefix, thousands
/// separators allowed.
pub fn parse_currency(text: &str) -> Option<f64> {
    let cleaned = text.trim().trim_start_matches('$').replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Soft numeric coercion: anything that is not a number becomes None.
pub fn coerce_f64(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Int(value) => Some(*value as f64),
        Cell::Float(value) => Some(*value),
        Cell::Str(text) => parse_currency(text),
        Cell::Date(_) | Cell::Null => None,
    }
}

/// Hard integer cast for the report's year column. Nulls and malformed
/// values are fatal.
pub fn coerce_i64_hard(column: &str, cell: &Cell) -> Result<i64> {
    match cell {
        Cell::Int(value) => Ok(*value),
        Cell::Float(value) if value.fract() == 0.0 => Ok(*value as i64),
        Cell::Str(text) => text.trim().parse::<i64>().map_err(|_| coercion(column, cell)),
        _ => Err(coercion(column, cell)),
    }
}

/// Hard float cast for the report's revenue column after separator
/// stripping. A null passes through; a malformed value is fatal.
pub fn coerce_f64_hard(column: &str, cell: &Cell) -> Result<Option<f64>> {
    match cell {
        Cell::Null => Ok(None),
        Cell::Int(value) => Ok(Some(*value as f64)),
        Cell::Float(value) => Ok(Some(*value)),
        Cell::Str(text) => parse_currency(text)
            .map(Some)
            .ok_or_else(|| coercion(column, cell)),
        Cell::Date(_) => Err(coercion(column, cell)),
    }
}

fn coercion(column: &str, cell: &Cell) -> PipelineError {
    PipelineError::Coercion {
        column: column.to_string(),
        value: cell.to_string(),
    }
}

/// A cell carried through unchanged into a frame column.
pub fn cell_to_any(cell: &Cell) -> AnyValue<'static> {
    match cell {
        Cell::Int(value) => AnyValue::Int64(*value),
        Cell::Float(value) => AnyValue::Float64(*value),
        Cell::Str(text) => any_str(text),
        Cell::Date(date) => AnyValue::Date(days_since_epoch(*date)),
        Cell::Null => AnyValue::Null,
    }
}

pub fn days_since_epoch(date: chrono::NaiveDate) -> i32 {
    let epoch = chrono::NaiveDate::from_ymd_opt(1970, 1, 1).expect("unix epoch is a valid date");
    (date - epoch).num_days() as i32
}
