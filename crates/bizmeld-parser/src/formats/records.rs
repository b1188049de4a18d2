use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::errors::ParserError;

/// Reads the structured records source as one JSON document.
///
/// The document is kept untyped: its shape is data-driven and the
/// normalization layer decides which parts become tables.
pub fn read_records(path: &Path) -> Result<Value, ParserError> {
    let file =
        File::open(path).map_err(|source| ParserError::io(path.display().to_string(), source))?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}
