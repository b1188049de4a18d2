use polars::prelude::*;
use serde_json::{Map, Value};

use crate::error::{PipelineError, Result};
use crate::frame::{any_str, FrameBuilder};

/// Sub-entities that own their own output tables and therefore stay out of
/// the flattened company table.
const SUB_ENTITIES: &[&str] = &["employees", "performance"];

/// The three tables recovered from the structured records document.
#[derive(Debug, Clone)]
pub struct RecordFrames {
    pub companies: DataFrame,
    pub employees: DataFrame,
    pub performance: DataFrame,
}

/// Normalizes the structured records document:
/// - flattens each company into one row (nested mappings join with `_`),
/// - explodes employee lists into rows carrying a `company_id` back-reference,
/// - folds each company's per-quarter performance mapping into one row per
///   (company, quarter) pair.
pub fn normalize_records(records: &Value) -> Result<RecordFrames> {
    let companies = records
        .get("companies")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            PipelineError::Processing("records document is missing a 'companies' array".to_string())
        })?;

    let mut company_builder = FrameBuilder::new();
    let mut employee_builder = FrameBuilder::new();
    let mut performance_builder = FrameBuilder::new();

    for company in companies {
        let Some(fields) = company.as_object() else {
            continue;
        };
        let company_id = scalar_to_any(fields.get("id").unwrap_or(&Value::Null));

        flatten_into(&mut company_builder, "", fields, SUB_ENTITIES);
        company_builder.finish_row();

        if let Some(employees) = fields.get("employees").and_then(Value::as_array) {
            for employee in employees {
                let Some(employee_fields) = employee.as_object() else {
                    continue;
                };
                flatten_into(&mut employee_builder, "", employee_fields, &[]);
                employee_builder.push("company_id", company_id.clone());
                employee_builder.finish_row();
            }
        }

        if let Some(performance) = fields.get("performance").and_then(Value::as_object) {
            for (quarter, metrics) in performance {
                performance_builder.push("company_id", company_id.clone());
                performance_builder.push("quarter", any_str(quarter));
                if let Some(metrics) = metrics.as_object() {
                    for (name, value) in metrics {
                        performance_builder.push(name, scalar_to_any(value));
                    }
                }
                performance_builder.finish_row();
            }
        }
    }

    Ok(RecordFrames {
        companies: company_builder.finish()?,
        employees: employee_builder.finish()?,
        performance: performance_builder.finish()?,
    })
}

/// Pushes one entity's scalar fields into the builder, flattening nested
/// mappings with `_` separators. Arrays and non-scalar leaves are skipped;
/// `skip` excludes top-level sub-entities.
fn flatten_into(builder: &mut FrameBuilder, prefix: &str, fields: &Map<String, Value>, skip: &[&str]) {
    for (key, value) in fields {
        if prefix.is_empty() && skip.contains(&key.as_str()) {
            continue;
        }
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}_{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(builder, &name, nested, &[]),
            Value::Array(_) => {}
            scalar => builder.push(&name, scalar_to_any(scalar)),
        }
    }
}

fn scalar_to_any(value: &Value) -> AnyValue<'static> {
    match value {
        Value::Null => AnyValue::Null,
        Value::Bool(flag) => AnyValue::Boolean(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(integer) => AnyValue::Int64(integer),
            None => number.as_f64().map(AnyValue::Float64).unwrap_or(AnyValue::Null),
        },
        Value::String(text) => any_str(text),
        Value::Array(_) | Value::Object(_) => AnyValue::Null,
    }
}
