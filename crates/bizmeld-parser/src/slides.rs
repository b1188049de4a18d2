use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Cell, DeckSummary, Metric, SlideContent, Table};

static TOTAL_REVENUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total Revenue:\s*\$([\d,]+)").expect("valid regex"));
static MEMBERSHIPS_SOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Total Memberships Sold:\s*([\d,]+)").expect("valid regex"));
static TOP_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Top Location:\s*([\w\s]+)").expect("valid regex"));
static BREAKDOWN_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)([\w\s]+):\s*(\d+)%").expect("valid regex"));

/// The fixed extraction rule bound to a slide's position.
///
/// The rule set is closed: slides beyond the known positions are read but
/// produce nothing. Adding a role is one variant plus one handler arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRole {
    Summary,
    QuarterlyTable,
    RevenueBreakdown,
}

impl SlideRole {
    pub fn of_index(index: usize) -> Option<SlideRole> {
        match index {
            0 => Some(SlideRole::Summary),
            1 => Some(SlideRole::QuarterlyTable),
            2 => Some(SlideRole::RevenueBreakdown),
            _ => None,
        }
    }
}

/// Applies each slide's positional rule and collects the deck summary.
pub fn summarize_slides(slides: &[SlideContent]) -> DeckSummary {
    let mut summary = DeckSummary::default();
    for slide in slides {
        match SlideRole::of_index(slide.index) {
            Some(SlideRole::Summary) => extract_summary_metrics(slide, &mut summary),
            Some(SlideRole::QuarterlyTable) => {
                summary.quarterly_metrics = extract_quarterly_table(slide);
            }
            Some(SlideRole::RevenueBreakdown) => extract_revenue_breakdown(slide, &mut summary),
            None => {}
        }
    }
    summary
}

/// Scans the summary slide for the three fixed patterns. A pattern that does
/// not match contributes no key.
fn extract_summary_metrics(slide: &SlideContent, summary: &mut DeckSummary) {
    let text = slide.joined_text();

    if let Some(value) = TOTAL_REVENUE
        .captures(&text)
        .and_then(|captures| parse_separated_int(&captures[1]))
    {
        summary
            .summary_metrics
            .insert("Total Revenue".to_string(), Metric::Count(value));
    }

    if let Some(value) = MEMBERSHIPS_SOLD
        .captures(&text)
        .and_then(|captures| parse_separated_int(&captures[1]))
    {
        summary
            .summary_metrics
            .insert("Total Memberships Sold".to_string(), Metric::Count(value));
    }

    if let Some(captures) = TOP_LOCATION.captures(&text) {
        summary.summary_metrics.insert(
            "Top Location".to_string(),
            Metric::Label(captures[1].trim().to_string()),
        );
    }
}

/// Builds a table from the first grid on the quarterly slide, if any.
///
/// Unlike the paginated report, width mismatches are not dropped here: every
/// row is included, padded with nulls or truncated to the header's width.
fn extract_quarterly_table(slide: &SlideContent) -> Table {
    let Some(grid) = slide.grids.first() else {
        return Table::default();
    };
    let Some((header, rows)) = grid.split_first() else {
        return Table::default();
    };

    let width = header.len();
    let mut table = Table::new(header.clone());
    for raw in rows {
        let mut row: Vec<Cell> = raw
            .iter()
            .take(width)
            .map(|value| Cell::infer(value))
            .collect();
        row.resize(width, Cell::Null);
        table.rows.push(row);
    }
    table
}

/// Collects every `<label>: <n>%` pair from the breakdown slide's text.
fn extract_revenue_breakdown(slide: &SlideContent, summary: &mut DeckSummary) {
    let text = slide.joined_text();
    for captures in BREAKDOWN_ENTRY.captures_iter(&text) {
        if let Ok(percent) = captures[2].parse::<i64>() {
            summary
                .revenue_breakdown
                .insert(captures[1].trim().to_string(), percent);
        }
    }
}

fn parse_separated_int(raw: &str) -> Option<i64> {
    raw.replace(',', "").parse::<i64>().ok()
}
