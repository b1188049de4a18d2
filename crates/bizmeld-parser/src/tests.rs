use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::errors::ParserError;
use crate::formats::{
    extract_page_table, parse_slide_xml, read_activity_from_reader, read_deck, read_records,
    read_slides_from_reader,
};
use crate::model::{Cell, Metric, SlideContent};
use crate::slides::{summarize_slides, SlideRole};

fn slide_xml(body: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
            r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#,
            r#"<p:cSld><p:spTree>{body}</p:spTree></p:cSld></p:sld>"#
        ),
        body = body
    )
}

fn text_shape(lines: &[&str]) -> String {
    let paragraphs: String = lines
        .iter()
        .map(|line| format!("<a:p><a:r><a:t>{line}</a:t></a:r></a:p>"))
        .collect();
    format!("<p:sp><p:txBody>{paragraphs}</p:txBody></p:sp>")
}

fn table_frame(rows: &[&[&str]]) -> String {
    let body: String = rows
        .iter()
        .map(|cells| {
            let row: String = cells
                .iter()
                .map(|cell| {
                    format!("<a:tc><a:txBody><a:p><a:r><a:t>{cell}</a:t></a:r></a:p></a:txBody></a:tc>")
                })
                .collect();
            format!("<a:tr>{row}</a:tr>")
        })
        .collect();
    format!(
        "<p:graphicFrame><a:graphic><a:graphicData><a:tbl>{body}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"
    )
}

fn deck_zip(slides: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    for (name, xml) in slides {
        zip.start_file(*name, options).expect("start zip entry");
        zip.write_all(xml.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

#[test]
fn activity_reader_lowercases_headers_and_infers_scalars() {
    let csv = "Date,Membership_ID,Revenue,Duration (Minutes)\n2024-01-15,M001,19.99,45\n";
    let table = read_activity_from_reader(csv.as_bytes()).expect("activity parse failed");

    assert_eq!(
        table.columns,
        vec!["date", "membership_id", "revenue", "duration (minutes)"]
    );
    assert_eq!(table.height(), 1);
    assert_eq!(table.rows[0][0], Cell::Str("2024-01-15".to_string()));
    assert_eq!(table.rows[0][1], Cell::Str("M001".to_string()));
    assert_eq!(table.rows[0][2], Cell::Float(19.99));
    assert_eq!(table.rows[0][3], Cell::Int(45));
}

#[test]
fn activity_reader_treats_empty_cells_as_null() {
    let csv = "date,revenue\n2024-01-15,\n";
    let table = read_activity_from_reader(csv.as_bytes()).expect("activity parse failed");
    assert_eq!(table.rows[0][1], Cell::Null);
}

#[test]
fn activity_reader_accepts_empty_source() {
    let table = read_activity_from_reader("date,revenue\n".as_bytes()).expect("parse failed");
    assert!(table.is_empty());
    assert_eq!(table.columns.len(), 2);
}

#[test]
fn report_page_table_detects_header_and_rows() {
    let text = "Quarterly Performance Report\n\
                Year\tQuarter\tRevenue (in $)\tMemberships Sold\tAvg Duration (Minutes)\n\
                2024\tQ1\t1,200,000\t3,450\t42.5\n\
                2024\tQ2\t1,350,000\t3,720\t44.1\n";
    let table = extract_page_table(text).expect("no table detected");

    assert_eq!(
        table.columns,
        vec![
            "Year",
            "Quarter",
            "Revenue (in $)",
            "Memberships Sold",
            "Avg Duration (Minutes)"
        ]
    );
    assert_eq!(table.height(), 2);
    assert_eq!(table.rows[0][0], Cell::Int(2024));
    assert_eq!(table.rows[0][2], Cell::Str("1,200,000".to_string()));
    assert_eq!(table.rows[1][4], Cell::Float(44.1));
}

#[test]
fn report_page_table_drops_width_mismatched_rows() {
    let text = "Year\tQuarter\tRevenue (in $)\n\
                2024\tQ1\t1,200,000\n\
                2024\tQ2\n\
                2024\tQ3\t1,400,000\n";
    let table = extract_page_table(text).expect("no table detected");

    // Three data rows in, the short one silently gone.
    assert_eq!(table.height(), 2);
    assert_eq!(table.rows[1][1], Cell::Str("Q3".to_string()));
}

#[test]
fn report_page_without_table_contributes_nothing() {
    let text = "Annual Overview\nPrepared by the finance team\n";
    assert!(extract_page_table(text).is_none());
}

#[test]
fn slide_xml_yields_shape_texts_and_grids() {
    let xml = slide_xml(&format!(
        "{}{}",
        text_shape(&["Quarterly Metrics", "FY 2024"]),
        table_frame(&[&["Quarter", "Revenue (in $)"], &["Q1", "1,200,000"]]),
    ));
    let slide = parse_slide_xml(1, &xml).expect("slide parse failed");

    assert_eq!(slide.index, 1);
    assert_eq!(slide.texts, vec!["Quarterly Metrics\nFY 2024"]);
    assert_eq!(
        slide.grids,
        vec![vec![
            vec!["Quarter".to_string(), "Revenue (in $)".to_string()],
            vec!["Q1".to_string(), "1,200,000".to_string()],
        ]]
    );
}

#[test]
fn deck_reader_orders_slides_numerically() {
    let bytes = deck_zip(&[
        ("ppt/slides/slide10.xml", &slide_xml(&text_shape(&["ten"]))),
        ("ppt/slides/slide2.xml", &slide_xml(&text_shape(&["two"]))),
        ("ppt/slides/slide1.xml", &slide_xml(&text_shape(&["one"]))),
        ("ppt/presentation.xml", "<p:presentation/>"),
    ]);
    let slides = read_slides_from_reader(Cursor::new(bytes)).expect("deck parse failed");

    let texts: Vec<&str> = slides
        .iter()
        .map(|slide| slide.texts[0].as_str())
        .collect();
    assert_eq!(texts, vec!["one", "two", "ten"]);
    assert_eq!(slides[2].index, 2);
}

#[test]
fn summary_slide_patterns_are_sparse() {
    let mut slide = SlideContent::new(0);
    slide
        .texts
        .push("Total Revenue: $1,234,567\nTop Location: Downtown".to_string());

    let summary = summarize_slides(&[slide]);
    assert_eq!(
        summary.summary_metrics.get("Total Revenue"),
        Some(&Metric::Count(1_234_567))
    );
    assert_eq!(
        summary.summary_metrics.get("Top Location"),
        Some(&Metric::Label("Downtown".to_string()))
    );
    assert!(!summary.summary_metrics.contains_key("Total Memberships Sold"));
}

#[test]
fn summary_slide_extracts_all_three_metrics() {
    let mut slide = SlideContent::new(0);
    slide.texts.push("Total Memberships Sold: 3,450".to_string());
    slide.texts.push("Total Revenue: $987,654".to_string());
    slide.texts.push("Top Location: Downtown".to_string());

    let summary = summarize_slides(&[slide]);
    assert_eq!(summary.summary_metrics.len(), 3);
    assert_eq!(
        summary.summary_metrics.get("Total Memberships Sold"),
        Some(&Metric::Count(3_450))
    );
}

#[test]
fn quarterly_slide_grid_is_zipped_unguarded() {
    let mut slide = SlideContent::new(1);
    slide.grids.push(vec![
        vec!["Quarter".into(), "Revenue (in $)".into(), "Members".into()],
        vec!["Q1".into(), "1,200,000".into(), "3450".into()],
        vec!["Q2".into(), "1,350,000".into()],
        vec!["Q3".into(), "1,500,000".into(), "3900".into(), "extra".into()],
    ]);

    let table = summarize_slides(&[slide]).quarterly_metrics;
    // Every row survives, padded or truncated to the header's width.
    assert_eq!(table.height(), 3);
    assert_eq!(table.rows[1][2], Cell::Null);
    assert_eq!(table.rows[2].len(), 3);
}

#[test]
fn breakdown_slide_matches_case_insensitively() {
    let mut slide = SlideContent::new(2);
    slide.texts.push("Classes: 40%".to_string());
    slide.texts.push("personal training: 35%".to_string());
    slide.texts.push("Open Gym: 25%".to_string());

    let summary = summarize_slides(&[slide]);
    assert_eq!(summary.revenue_breakdown.len(), 3);
    assert_eq!(summary.revenue_breakdown.get("Classes"), Some(&40));
    assert_eq!(summary.revenue_breakdown.get("personal training"), Some(&35));
    assert_eq!(summary.revenue_breakdown.get("Open Gym"), Some(&25));
}

#[test]
fn slides_beyond_known_roles_produce_nothing() {
    assert_eq!(SlideRole::of_index(0), Some(SlideRole::Summary));
    assert_eq!(SlideRole::of_index(3), None);

    let mut slide = SlideContent::new(3);
    slide.texts.push("Total Revenue: $999,999".to_string());
    slide.texts.push("Classes: 40%".to_string());

    let summary = summarize_slides(&[slide]);
    assert!(summary.summary_metrics.is_empty());
    assert!(summary.revenue_breakdown.is_empty());
}

#[test]
fn empty_deck_summary_members_are_present_but_empty() {
    let summary = summarize_slides(&[]);
    assert!(summary.summary_metrics.is_empty());
    assert!(summary.quarterly_metrics.is_empty());
    assert!(summary.revenue_breakdown.is_empty());
}

#[test]
fn deck_reader_composes_summary_end_to_end() {
    let bytes = deck_zip(&[
        (
            "ppt/slides/slide1.xml",
            &slide_xml(&text_shape(&[
                "Total Revenue: $1,234,567",
                "Top Location: Downtown",
            ])),
        ),
        (
            "ppt/slides/slide2.xml",
            &slide_xml(&table_frame(&[
                &["Quarter", "Revenue (in $)"],
                &["Q1", "1,200,000"],
            ])),
        ),
        (
            "ppt/slides/slide3.xml",
            &slide_xml(&text_shape(&["Classes: 40%", "Open Gym: 60%"])),
        ),
    ]);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("deck.pptx");
    std::fs::write(&path, bytes).expect("write deck");

    let summary = read_deck(&path).expect("deck read failed");
    assert_eq!(
        summary.summary_metrics.get("Total Revenue"),
        Some(&Metric::Count(1_234_567))
    );
    assert_eq!(summary.quarterly_metrics.height(), 1);
    assert_eq!(summary.revenue_breakdown.get("Open Gym"), Some(&60));
}

#[test]
fn records_reader_round_trips_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("records.json");
    std::fs::write(&path, r#"{"companies":[{"id":1,"name":"Acme"}]}"#).expect("write records");

    let value = read_records(&path).expect("records read failed");
    assert_eq!(value["companies"][0]["name"], "Acme");
}

#[test]
fn missing_source_file_is_an_io_error() {
    let err = read_records(std::path::Path::new("/nonexistent/records.json"))
        .expect_err("missing file must fail");
    assert!(matches!(err, ParserError::Io { .. }));
}
