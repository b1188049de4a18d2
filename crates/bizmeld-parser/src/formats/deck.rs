use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::errors::ParserError;
use crate::model::{DeckSummary, SlideContent};
use crate::slides::summarize_slides;

static SLIDE_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ppt/slides/slide(\d+)\.xml$").expect("valid regex"));

/// Reads the presentation source and applies the slide-text extractor.
///
/// The per-slide intermediate layer is exposed through
/// [`read_slides_from_reader`] so extraction rules can be tested on
/// synthetic decks.
pub fn read_deck(path: &Path) -> Result<DeckSummary, ParserError> {
    let file =
        File::open(path).map_err(|source| ParserError::io(path.display().to_string(), source))?;
    let slides = read_slides_from_reader(file)?;
    Ok(summarize_slides(&slides))
}

/// Walks `ppt/slides/slideN.xml` entries in slide order and decomposes each
/// into text fragments and raw cell grids.
pub fn read_slides_from_reader<R: Read + Seek>(reader: R) -> Result<Vec<SlideContent>, ParserError> {
    let mut archive = zip::ZipArchive::new(reader)?;

    let mut entries: Vec<(usize, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = SLIDE_ENTRY
                .captures(name)?
                .get(1)?
                .as_str()
                .parse::<usize>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    entries.sort();

    let mut slides = Vec::with_capacity(entries.len());
    for (index, (_, name)) in entries.iter().enumerate() {
        let mut xml = String::new();
        archive
            .by_name(name)?
            .read_to_string(&mut xml)
            .map_err(|source| ParserError::io(name.clone(), source))?;
        slides.push(parse_slide_xml(index, &xml)?);
    }
    Ok(slides)
}

/// Parses one slide's XML into text fragments (one per text-bearing shape)
/// and cell grids (one per table).
pub fn parse_slide_xml(index: usize, xml: &str) -> Result<SlideContent, ParserError> {
    let mut slide = SlideContent::new(index);

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    // Table state; a cell's text never routes into the surrounding shape.
    let mut grid: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_table = false;
    let mut in_cell = false;

    // Shape state.
    let mut shape_text = String::new();
    let mut in_shape = false;
    let mut shape_has_text = false;

    let mut in_run_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref event)) => match local_name(event.name().as_ref()) {
                b"tbl" => {
                    in_table = true;
                    grid.clear();
                }
                b"tr" if in_table => row.clear(),
                b"tc" if in_table => {
                    in_cell = true;
                    cell.clear();
                }
                b"sp" => {
                    in_shape = true;
                    shape_has_text = false;
                    shape_text.clear();
                }
                b"txBody" if in_shape && !in_table => shape_has_text = true,
                b"p" => {
                    if in_cell && !cell.is_empty() {
                        cell.push('\n');
                    } else if shape_has_text && !in_table && !shape_text.is_empty() {
                        shape_text.push('\n');
                    }
                }
                b"t" => in_run_text = true,
                _ => {}
            },
            Ok(Event::End(ref event)) => match local_name(event.name().as_ref()) {
                b"tbl" => {
                    in_table = false;
                    slide.grids.push(std::mem::take(&mut grid));
                }
                b"tr" if in_table => grid.push(std::mem::take(&mut row)),
                b"tc" if in_table => {
                    in_cell = false;
                    row.push(std::mem::take(&mut cell));
                }
                b"sp" => {
                    if in_shape && shape_has_text {
                        slide.texts.push(std::mem::take(&mut shape_text));
                    }
                    in_shape = false;
                }
                b"t" => in_run_text = false,
                _ => {}
            },
            Ok(Event::Text(ref event)) => {
                if !in_run_text {
                    continue;
                }
                let text = event.unescape().map_err(|err| ParserError::SlideXml {
                    slide: index.to_string(),
                    message: err.to_string(),
                })?;
                if in_cell {
                    cell.push_str(&text);
                } else if in_shape && shape_has_text {
                    shape_text.push_str(&text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                return Err(ParserError::SlideXml {
                    slide: index.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    Ok(slide)
}

/// Strips the namespace prefix from a qualified element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&byte| byte == b':') {
        Some(position) => &name[position + 1..],
        None => name,
    }
}
