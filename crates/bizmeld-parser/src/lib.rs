pub mod errors;
pub mod formats;
pub mod model;
pub mod slides;

pub use errors::ParserError;
pub use formats::{
    extract_page_table, parse_slide_xml, read_activity, read_activity_from_reader, read_deck,
    read_records, read_report, read_slides_from_reader,
};
pub use model::{Cell, DeckSummary, Metric, PageExtract, SlideContent, Table};
pub use slides::{summarize_slides, SlideRole};

#[cfg(test)]
mod tests;
