use std::path::Path;

use lopdf::Document;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ParserError;
use crate::model::{Cell, PageExtract, Table};

/// Cells in the text layer are separated by tabs or runs of two-plus spaces.
static CELL_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t|\s{2,}").expect("valid regex"));

/// Reads the paginated report and extracts at most one table per page.
///
/// Pages are scanned independently; a page whose text layer holds no table
/// contributes nothing. A missing or corrupt document is fatal.
pub fn read_report(path: &Path) -> Result<Vec<PageExtract>, ParserError> {
    let document = Document::load(path)?;
    let mut extracts = Vec::new();
    for (page_number, _) in document.get_pages() {
        let text = document.extract_text(&[page_number])?;
        if let Some(table) = extract_page_table(&text) {
            extracts.push(PageExtract {
                page_index: (page_number - 1) as usize,
                table,
            });
        }
    }
    Ok(extracts)
}

/// Detects a table in one page's text layer.
///
/// The first line splitting into two or more cells is the header. Every later
/// multi-cell line is a candidate row, kept only when its cell count exactly
/// matches the header's; mismatched rows are dropped. Single-cell lines
/// (titles, footers) are ignored.
pub fn extract_page_table(text: &str) -> Option<Table> {
    let mut lines = text.lines().map(split_cells);

    let header = loop {
        match lines.next() {
            Some(cells) if cells.len() >= 2 => break cells,
            Some(_) => continue,
            None => return None,
        }
    };

    let width = header.len();
    let mut table = Table::new(header);
    for cells in lines {
        if cells.len() < 2 {
            continue;
        }
        if cells.len() != width {
            continue;
        }
        table.rows.push(cells.iter().map(|cell| Cell::infer(cell)).collect());
    }
    Some(table)
}

fn split_cells(line: &str) -> Vec<String> {
    CELL_SPLIT
        .split(line)
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}
