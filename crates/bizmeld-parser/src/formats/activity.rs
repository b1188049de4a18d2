use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::errors::ParserError;
use crate::model::{Cell, Table};

/// Reads the tabular activity source.
///
/// Header names are trimmed and lower-cased at read time; cell scalars are
/// inferred per value. Errors propagate; the pipeline decides whether this
/// source is allowed to be unavailable.
pub fn read_activity(path: &Path) -> Result<Table, ParserError> {
    let file =
        File::open(path).map_err(|source| ParserError::io(path.display().to_string(), source))?;
    read_activity_from_reader(file)
}

pub fn read_activity_from_reader<R: Read>(reader: R) -> Result<Table, ParserError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_ascii_lowercase())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.rows.push(record.iter().map(Cell::infer).collect());
    }
    Ok(table)
}
