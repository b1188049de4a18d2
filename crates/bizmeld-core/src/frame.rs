use std::collections::HashMap;

use polars::prelude::*;

use crate::error::Result;

/// Accumulates rows with a data-driven column set into a `DataFrame`.
///
/// Column order is first-seen. A column that first appears after earlier rows
/// is backfilled with nulls; a column absent from a row is padded with null
/// when the row is finished. Pushing the same column twice within one row
/// overwrites (last write wins), mirroring record-merge semantics.
#[derive(Default)]
pub struct FrameBuilder {
    order: Vec<String>,
    columns: HashMap<String, Vec<AnyValue<'static>>>,
    height: usize,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: AnyValue<'static>) {
        let height = self.height;
        let column = self.ensure_column(name);
        if column.len() > height {
            *column.last_mut().expect("column vector non-empty") = value;
        } else {
            column.push(value);
        }
    }

    fn ensure_column(&mut self, name: &str) -> &mut Vec<AnyValue<'static>> {
        if !self.order.iter().any(|existing| existing == name) {
            self.order.push(name.to_string());
            self.columns
                .insert(name.to_string(), vec![AnyValue::Null; self.height]);
        }
        self.columns.get_mut(name).expect("column vector missing")
    }

    pub fn finish_row(&mut self) {
        self.height += 1;
        for name in &self.order {
            let column = self.columns.get_mut(name).expect("column vector missing");
            while column.len() < self.height {
                column.push(AnyValue::Null);
            }
        }
    }

    pub fn finish(self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.order.len());
        for name in &self.order {
            let values = self.columns.get(name).expect("column vector missing");
            let series = Series::from_any_values(name.as_str().into(), values, false)?;
            columns.push(series.into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Owned string `AnyValue`, the shape every builder in this crate feeds.
pub fn any_str(value: &str) -> AnyValue<'static> {
    AnyValue::StringOwned(value.into())
}
