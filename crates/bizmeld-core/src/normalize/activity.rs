use bizmeld_parser::{Cell, Table};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::coerce::{cell_to_any, coerce_f64, days_since_epoch};
use crate::error::{PipelineError, Result};

static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Normalizes the membership activity table:
/// - lower-cases and trims column names,
/// - parses the `date` column into a calendar date and derives `year` and
///   `quarter` from it (an unparseable date nulls all three),
/// - coerces `revenue` to numeric (an absent column is all null),
/// - projects onto the fixed output column list; everything else is dropped.
///
/// Only the `date` column is required; other projected columns that are
/// absent from the input come out all-null, like `revenue`.
pub fn normalize_activity(raw: &Table) -> Result<DataFrame> {
    let columns: Vec<String> = raw
        .columns
        .iter()
        .map(|column| column.trim().to_ascii_lowercase())
        .collect();

    let date_index = columns
        .iter()
        .position(|column| column == "date")
        .ok_or_else(|| {
            PipelineError::Processing("activity table is missing a 'date' column".to_string())
        })?;
    let revenue_index = columns.iter().position(|column| column == "revenue");

    let height = raw.height();
    let mut dates: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut years: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut quarters: Vec<Option<String>> = Vec::with_capacity(height);
    let mut revenue: Vec<Option<f64>> = Vec::with_capacity(height);

    for row in &raw.rows {
        match parse_date_cell(&row[date_index]) {
            Some(date) => {
                dates.push(Some(days_since_epoch(date)));
                years.push(Some(date.year()));
                quarters.push(Some(quarter_label(date)));
            }
            None => {
                dates.push(None);
                years.push(None);
                quarters.push(None);
            }
        }
        revenue.push(revenue_index.and_then(|index| coerce_f64(&row[index])));
    }

    let date_series = Series::new("date".into(), dates).cast(&DataType::Date)?;

    let mut out: Vec<Column> = Vec::with_capacity(9);
    out.push(date_series.into());
    out.push(passthrough_column(raw, &columns, "membership_id")?);
    out.push(passthrough_column(raw, &columns, "membership_type")?);
    out.push(passthrough_column(raw, &columns, "activity")?);
    out.push(Series::new("revenue".into(), revenue).into());
    out.push(passthrough_column(raw, &columns, "duration (minutes)")?);
    out.push(passthrough_column(raw, &columns, "location")?);
    out.push(Series::new("year".into(), years).into());
    out.push(Series::new("quarter".into(), quarters).into());

    Ok(DataFrame::new(out)?)
}

fn passthrough_column(raw: &Table, columns: &[String], name: &str) -> Result<Column> {
    let values: Vec<AnyValue<'static>> = match columns.iter().position(|column| column == name) {
        Some(index) => raw.rows.iter().map(|row| cell_to_any(&row[index])).collect(),
        None => vec![AnyValue::Null; raw.height()],
    };
    let series = Series::from_any_values(name.into(), &values, false)?;
    Ok(series.into())
}

fn parse_date_cell(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::Str(text) => {
            let trimmed = text.trim();
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        }
        _ => None,
    }
}

fn quarter_label(date: NaiveDate) -> String {
    format!("Q{}", (date.month() - 1) / 3 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        table.rows = rows;
        table
    }

    #[test]
    fn derives_date_year_quarter_and_revenue() {
        let raw = table(
            &["date", "revenue"],
            vec![vec![
                Cell::Str("2024-01-15".to_string()),
                Cell::Str("$1,000".to_string()),
            ]],
        );
        let frame = normalize_activity(&raw).expect("normalize failed");

        assert_eq!(
            frame.get_column_names_str(),
            vec![
                "date",
                "membership_id",
                "membership_type",
                "activity",
                "revenue",
                "duration (minutes)",
                "location",
                "year",
                "quarter"
            ]
        );
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(
            frame
                .column("date")
                .unwrap()
                .as_materialized_series()
                .get(0)
                .unwrap(),
            AnyValue::Date(days_since_epoch(expected))
        );
        assert_eq!(frame.column("year").unwrap().i32().unwrap().get(0), Some(2024));
        assert_eq!(
            frame.column("quarter").unwrap().str().unwrap().get(0),
            Some("Q1")
        );
        assert_eq!(
            frame.column("revenue").unwrap().f64().unwrap().get(0),
            Some(1000.0)
        );
        // Absent projected columns come out all-null.
        assert_eq!(
            frame.column("membership_id").unwrap().null_count(),
            frame.height()
        );
    }

    #[test]
    fn quarter_derivation_covers_all_twelve_months() {
        let rows = (1..=12)
            .map(|month| vec![Cell::Str(format!("2024-{month:02}-15"))])
            .collect();
        let frame = normalize_activity(&table(&["date"], rows)).expect("normalize failed");

        let quarters = frame.column("quarter").unwrap().str().unwrap().clone();
        let expected = [
            "Q1", "Q1", "Q1", "Q2", "Q2", "Q2", "Q3", "Q3", "Q3", "Q4", "Q4", "Q4",
        ];
        for (month, label) in expected.iter().enumerate() {
            assert_eq!(quarters.get(month), Some(*label), "month {}", month + 1);
        }
    }

    #[test]
    fn unparseable_date_nulls_the_derived_columns() {
        let raw = table(
            &["date", "revenue"],
            vec![vec![Cell::Str("not a date".to_string()), Cell::Int(5)]],
        );
        let frame = normalize_activity(&raw).expect("normalize failed");

        assert_eq!(frame.column("date").unwrap().null_count(), 1);
        assert_eq!(frame.column("year").unwrap().null_count(), 1);
        assert_eq!(frame.column("quarter").unwrap().null_count(), 1);
        assert_eq!(frame.column("revenue").unwrap().f64().unwrap().get(0), Some(5.0));
    }

    #[test]
    fn non_numeric_revenue_becomes_null() {
        let raw = table(
            &["date", "revenue"],
            vec![vec![
                Cell::Str("2024-05-01".to_string()),
                Cell::Str("waived".to_string()),
            ]],
        );
        let frame = normalize_activity(&raw).expect("normalize failed");
        assert_eq!(frame.column("revenue").unwrap().null_count(), 1);
    }

    #[test]
    fn missing_date_column_is_fatal() {
        let raw = table(&["revenue"], vec![vec![Cell::Int(10)]]);
        let err = normalize_activity(&raw).expect_err("must fail");
        assert!(matches!(err, PipelineError::Processing(_)));
    }

    #[test]
    fn extra_input_columns_are_dropped() {
        let raw = table(
            &["date", "internal_note"],
            vec![vec![
                Cell::Str("2024-07-04".to_string()),
                Cell::Str("ignore me".to_string()),
            ]],
        );
        let frame = normalize_activity(&raw).expect("normalize failed");
        assert!(frame.column("internal_note").is_err());
        assert_eq!(
            frame.column("quarter").unwrap().str().unwrap().get(0),
            Some("Q3")
        );
    }
}
