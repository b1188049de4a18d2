use anyhow::Result;
use bizmeld_core::CompositeDataset;
use chrono::NaiveDate;
use polars::prelude::*;
use serde_json::{Map, Value};

/// Converts a frame into an array of plain JSON records.
///
/// Missing or non-finite numeric cells become the null sentinel; dates render
/// as `YYYY-MM-DD` strings.
pub fn frame_to_records(frame: &DataFrame) -> Result<Value> {
    let columns = frame.get_columns();
    let mut records = Vec::with_capacity(frame.height());
    for row in 0..frame.height() {
        let mut record = Map::with_capacity(columns.len());
        for column in columns {
            let value = column.as_materialized_series().get(row)?;
            record.insert(column.name().to_string(), any_value_to_json(value));
        }
        records.push(Value::Object(record));
    }
    Ok(Value::Array(records))
}

/// Serializes the whole composite dataset. An unavailable activity source
/// renders as JSON null.
pub fn composite_to_json(composite: &CompositeDataset) -> Result<Value> {
    let membership_activity = match &composite.membership_activity {
        Some(frame) => frame_to_records(frame)?,
        None => Value::Null,
    };

    let mut data = Map::new();
    data.insert(
        "company_info".to_string(),
        frame_to_records(&composite.company_info)?,
    );
    data.insert(
        "employee_data".to_string(),
        frame_to_records(&composite.employee_data)?,
    );
    data.insert(
        "company_performance".to_string(),
        frame_to_records(&composite.company_performance)?,
    );
    data.insert("membership_activity".to_string(), membership_activity);
    data.insert(
        "aggregated_performance".to_string(),
        frame_to_records(&composite.aggregated_performance)?,
    );
    data.insert(
        "presentation".to_string(),
        serde_json::to_value(&composite.presentation)?,
    );
    Ok(Value::Object(data))
}

fn any_value_to_json(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(flag) => Value::Bool(flag),
        AnyValue::Int32(number) => Value::from(number),
        AnyValue::Int64(number) => Value::from(number),
        AnyValue::UInt32(number) => Value::from(number),
        AnyValue::UInt64(number) => Value::from(number),
        AnyValue::Float32(number) => float_to_json(number as f64),
        AnyValue::Float64(number) => float_to_json(number),
        AnyValue::String(text) => Value::String(text.to_string()),
        AnyValue::StringOwned(text) => Value::String(text.to_string()),
        AnyValue::Date(days) => Value::String(format_days(days)),
        other => Value::String(other.to_string()),
    }
}

fn float_to_json(number: f64) -> Value {
    if number.is_finite() {
        serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    } else {
        Value::Null
    }
}

fn format_days(days: i32) -> String {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("unix epoch is a valid date");
    let date = epoch + chrono::Duration::days(days as i64);
    date.format("%Y-%m-%d").to_string()
}
