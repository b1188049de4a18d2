use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// A single scalar value as found in a tabular source.
///
/// The schema of a [`Table`] is data-driven: nothing constrains which variant
/// appears in which column beyond what the source contained.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    Null,
}

impl Cell {
    /// Infers a scalar from raw source text: integer, then float, else string.
    /// Empty or NaN-ish text becomes null.
    pub fn infer(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Cell::Null;
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Cell::Int(value);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            return Cell::Float(value);
        }
        Cell::Str(trimmed.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Int(value) => write!(f, "{value}"),
            Cell::Float(value) => write!(f, "{value}"),
            Cell::Str(value) => f.write_str(value),
            Cell::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Cell::Null => Ok(()),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Int(value) => serializer.serialize_i64(*value),
            Cell::Float(value) if value.is_finite() => serializer.serialize_f64(*value),
            Cell::Float(_) => serializer.serialize_none(),
            Cell::Str(value) => serializer.serialize_str(value),
            Cell::Date(value) => serializer.serialize_str(&value.format("%Y-%m-%d").to_string()),
            Cell::Null => serializer.serialize_none(),
        }
    }
}

/// An ordered sequence of rows sharing one column schema.
///
/// Rows are rectangular: every row holds exactly one cell per column, in
/// column order. Constructors in this crate maintain that invariant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

/// Serializes as an array of row objects keyed by column name.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RowRecord {
                columns: &self.columns,
                cells: row,
            })?;
        }
        seq.end()
    }
}

struct RowRecord<'a> {
    columns: &'a [String],
    cells: &'a [Cell],
}

impl Serialize for RowRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

/// One presentation page: extracted text fragments and raw cell grids, in
/// document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideContent {
    pub index: usize,
    pub texts: Vec<String>,
    pub grids: Vec<Vec<Vec<String>>>,
}

impl SlideContent {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// All text fragments joined for pattern scanning.
    pub fn joined_text(&self) -> String {
        self.texts.join("\n")
    }
}

/// The table detected on one page of the paginated report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageExtract {
    pub page_index: usize,
    pub table: Table,
}

/// A value recovered from the summary slide: a count or a free-text label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Metric {
    Count(i64),
    Label(String),
}

/// The three typed sub-structures recovered from a presentation deck.
///
/// All members are always present; pattern misses leave them sparse or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeckSummary {
    pub summary_metrics: BTreeMap<String, Metric>,
    pub quarterly_metrics: Table,
    pub revenue_breakdown: BTreeMap<String, i64>,
}
