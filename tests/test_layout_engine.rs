//! Integration tests for the layout engine: wrapping, pagination,
//! margins and table geometry.

use pdf_report::elements::{
    Alignment, BorderStyle, Element, Page, TableCell, TableElement, TableRow, TextElement,
    VerticalAlignment,
};
use pdf_report::geometry::Point;
use pdf_report::layout::{chars_per_line, wrap_text, LayoutEngine};
use pdf_report::writer::{Color, Margins, PdfWriter};
use proptest::prelude::*;
use regex::Regex;

fn render(pages: &[Page]) -> PdfWriter {
    let mut writer = PdfWriter::new();
    LayoutEngine::default().render(&mut writer, pages);
    writer
}

fn page_content(writer: &PdfWriter, index: usize) -> String {
    String::from_utf8_lossy(&writer.page_stream(index).unwrap().build().unwrap()).to_string()
}

/// (x, y, text) of every text show on a page.
fn text_positions(content: &str) -> Vec<(f32, f32, String)> {
    let re = Regex::new(r"1 0 0 1 (-?[\d.]+) (-?[\d.]+) Tm\n\((.*)\) Tj").unwrap();
    re.captures_iter(content)
        .map(|c| (c[1].parse().unwrap(), c[2].parse().unwrap(), c[3].to_string()))
        .collect()
}

fn single_page(elements: Vec<Element>) -> Vec<Page> {
    let mut page = Page::new("test");
    page.elements = elements;
    vec![page]
}

#[test]
fn test_wrap_example_from_width() {
    let max_chars = chars_per_line(100.0, 10.0);
    assert_eq!(max_chars, 16);

    let lines = wrap_text("The quick brown fox jumps", max_chars);
    assert!(lines.iter().all(|l| l.chars().count() <= 16));
    let words: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
    assert_eq!(words, vec!["The", "quick", "brown", "fox", "jumps"]);
}

#[test]
fn test_page_overflow_boundary() {
    let mut writer = PdfWriter::new();
    writer.start();

    writer.set_cursor_y(70.0);
    assert!(!writer.check_page_overflow(20.0), "landing on the margin must not break");
    writer.set_cursor_y(60.0);
    assert!(writer.check_page_overflow(20.0), "40 < 50 must break");
    assert_eq!(writer.page_count(), 2);
}

#[test]
fn test_long_text_flows_onto_new_pages() {
    let paragraph = "lorem ipsum dolor sit amet ".repeat(400);
    let writer = render(&single_page(vec![Element::text(paragraph)]));

    assert!(writer.page_count() > 1);
    for index in 0..writer.page_count() {
        for (_, y, _) in text_positions(&page_content(&writer, index)) {
            assert!(y >= 50.0, "line at y={} is below the bottom margin", y);
        }
    }
}

#[test]
fn test_page_margin_override_moves_text() {
    let mut pages = single_page(vec![Element::text("indented")]);
    pages[0].left_margin = Some(100.0);
    let writer = render(&pages);

    let positions = text_positions(&page_content(&writer, 0));
    assert_eq!(positions[0].0, 100.0);
}

#[test]
fn test_element_margin_overrides_page_margin() {
    let mut element = TextElement {
        text: "near edge".to_string(),
        ..TextElement::default()
    };
    element.style.left_margin = 20.0;
    let mut pages = single_page(vec![Element::Text(element)]);
    pages[0].left_margin = Some(100.0);
    let writer = render(&pages);

    assert_eq!(text_positions(&page_content(&writer, 0))[0].0, 20.0);
}

#[test]
fn test_document_margins_apply_without_overrides() {
    let mut writer = PdfWriter::new();
    let engine = LayoutEngine::new(Margins::uniform(72.0));
    engine.render(&mut writer, &single_page(vec![Element::text("x")]));

    let positions = text_positions(&page_content(&writer, 0));
    assert_eq!(positions[0], (72.0, 842.0 - 72.0 - 30.0, "x".to_string()));
}

#[test]
fn test_custom_position_does_not_paginate() {
    let mut element = TextElement {
        text: "footer ".repeat(30),
        ..TextElement::default()
    };
    element.style.position = Some(Point::new(60.0, 40.0));
    let writer = render(&single_page(vec![Element::Text(element)]));

    assert_eq!(writer.page_count(), 1);
}

fn colspan_table() -> TableElement {
    let mut table = TableElement::new(vec![
        TableRow {
            cells: vec![TableCell::new("AB").with_colspan(2), TableCell::new("C")],
        },
        TableRow::from_texts(["1", "2", "3"]),
    ]);
    table.width = Some(300.0);
    table
}

#[test]
fn test_table_colspan_positions() {
    let writer = render(&single_page(vec![Element::Table(colspan_table())]));
    let positions = text_positions(&page_content(&writer, 0));

    let x_of = |label: &str| positions.iter().find(|(_, _, t)| t == label).unwrap().0;
    // Columns are 100 wide starting at 50; text is padded by 5
    assert_eq!(x_of("AB"), 55.0);
    assert_eq!(x_of("C"), 255.0);
    assert_eq!(x_of("1"), 55.0);
    assert_eq!(x_of("2"), 155.0);
    assert_eq!(x_of("3"), 255.0);
}

#[test]
fn test_table_header_is_bold_with_background() {
    let writer = render(&single_page(vec![Element::Table(colspan_table())]));
    let content = page_content(&writer, 0);

    assert!(content.contains("/F2 11 Tf\n1 0 0 1 55"));
    assert!(content.contains("0.9 0.9 0.9 rg"));
    // Header spans 200 + 100 wide cells
    assert!(content.contains("50 741 200 21 re\nf\n"));
    assert!(content.contains("250 741 100 21 re\nf\n"));
}

#[test]
fn test_table_borders_are_four_lines_per_cell() {
    let mut table = colspan_table();
    table.border_style = BorderStyle::Dashed;
    table.border_thickness = 2.0;
    let writer = render(&single_page(vec![Element::Table(table)]));
    let content = page_content(&writer, 0);

    let strokes = content.lines().filter(|l| *l == "S").count();
    assert_eq!(strokes, (2 + 3) * 4);
    assert!(content.contains("[3 3] 0 d"));
    // Reset after each bordered row
    assert_eq!(content.matches("1 w\n").count(), 2);
    assert!(content.matches("[] 0 d").count() >= 2);
}

#[test]
fn test_table_without_borders_draws_no_lines() {
    let mut table = colspan_table();
    table.show_borders = false;
    table.has_header = false;
    let writer = render(&single_page(vec![Element::Table(table)]));
    let content = page_content(&writer, 0);

    assert!(!content.lines().any(|l| l == "S"));
    assert!(!content.contains(" re\n"));
}

#[test]
fn test_table_breaks_between_rows_without_repeating_header() {
    let mut rows = vec![TableRow::from_texts(["Header A", "Header B"])];
    for i in 0..80 {
        rows.push(TableRow::from_texts([format!("row {}", i), "value".to_string()]));
    }
    let writer = render(&single_page(vec![Element::Table(TableElement::new(rows))]));

    assert!(writer.page_count() > 1);
    let all: String = (0..writer.page_count()).map(|i| page_content(&writer, i)).collect();
    assert_eq!(all.matches("(Header A) Tj").count(), 1);
    assert!(page_content(&writer, 1).contains("(row "));
}

#[test]
fn test_table_alignment_and_cell_alignment() {
    let mut table = TableElement::new(vec![TableRow {
        cells: vec![TableCell::new("abc").with_alignment(Alignment::Right)],
    }]);
    table.width = Some(200.0);
    table.style.alignment = Alignment::Right;
    table.style.font_size = 10.0;
    table.has_header = false;
    let writer = render(&single_page(vec![Element::Table(table)]));

    // Table spans 345..545; text 18 wide, padded 5 from the right edge
    let positions = text_positions(&page_content(&writer, 0));
    assert_eq!(positions[0].0, 522.0);
}

/// Three 100pt columns, font 10, padding 5. The first cell wraps to four
/// lines, so the row is 50pt tall; the second cell wraps to two lines.
fn render_aligned_row(alignment: VerticalAlignment) -> (f32, Vec<(f32, f32, String)>) {
    let tall = "aaaaaaaaaaaaaaa bbbbbbbbbbbbbbb ccccccccccccccc ddddddddddddddd";
    let mut table = TableElement::new(vec![TableRow {
        cells: vec![
            TableCell::new(tall).with_background(Color::gray(0.8)),
            TableCell::new("first-cell-line second").with_vertical_alignment(alignment),
            TableCell::new("x"),
        ],
    }]);
    table.width = Some(300.0);
    table.style.font_size = 10.0;
    table.has_header = false;
    let writer = render(&single_page(vec![Element::Table(table)]));
    let content = page_content(&writer, 0);

    let rect = Regex::new(r"50 (-?[\d.]+) 100 50 re\nf\n").unwrap();
    let bottom: f32 = rect.captures(&content).unwrap()[1].parse().unwrap();
    (bottom, text_positions(&content))
}

fn y_of(positions: &[(f32, f32, String)], label: &str) -> f32 {
    positions.iter().find(|(_, _, t)| t == label).unwrap().1
}

#[test]
fn test_cell_vertical_alignment_top() {
    let (bottom, positions) = render_aligned_row(VerticalAlignment::Top);
    let top = bottom + 50.0;
    // top - padding - 0.8 * fs
    assert_eq!(y_of(&positions, "first-cell-line"), top - 13.0);
    assert_eq!(y_of(&positions, "second"), top - 23.0);
    assert_eq!(positions.iter().find(|(_, _, t)| t == "second").unwrap().0, 155.0);
}

#[test]
fn test_cell_vertical_alignment_bottom() {
    let (bottom, positions) = render_aligned_row(VerticalAlignment::Bottom);
    // Last line at bottom + padding + 0.2 * fs
    assert_eq!(y_of(&positions, "second"), bottom + 7.0);
    assert_eq!(y_of(&positions, "first-cell-line"), bottom + 17.0);
}

#[test]
fn test_cell_vertical_alignment_middle() {
    let (bottom, positions) = render_aligned_row(VerticalAlignment::Middle);
    // The full-height cell fills the row either way
    assert_eq!(y_of(&positions, "aaaaaaaaaaaaaaa"), bottom + 37.0);
    assert_eq!(y_of(&positions, "ddddddddddddddd"), bottom + 7.0);
    assert_eq!(y_of(&positions, "first-cell-line"), bottom + 27.0);
}

#[test]
fn test_huge_colspan_renders_clipped() {
    let table = TableElement::new(vec![
        TableRow {
            cells: vec![TableCell::new("wide").with_colspan(u32::MAX)],
        },
        TableRow::from_texts(["a", "b"]),
    ]);
    let writer = render(&single_page(vec![Element::Table(table)]));

    assert_eq!(writer.page_count(), 1);
    let positions = text_positions(&page_content(&writer, 0));
    assert_eq!(positions.iter().find(|(_, _, t)| t == "wide").unwrap().0, 55.0);
    // Clipped columns are 10pt each
    assert_eq!(positions.iter().find(|(_, _, t)| t == "b").unwrap().0, 65.0);
}

#[test]
fn test_empty_table_is_skipped() {
    let writer = render(&single_page(vec![Element::Table(TableElement::default())]));
    assert!(!page_content(&writer, 0).contains(" re\n"));
    assert_eq!(writer.page_count(), 1);
}

proptest! {
    #[test]
    fn prop_wrap_preserves_words_and_width(
        words in prop::collection::vec("[a-z]{1,25}", 0..40),
        max_chars in 1usize..30,
    ) {
        let text = words.join(" ");
        let lines = wrap_text(&text, max_chars);

        for line in &lines {
            prop_assert!(line.chars().count() <= max_chars);
            prop_assert!(!line.is_empty());
        }
        let rejoined: String = lines.iter().flat_map(|l| l.split(' ')).collect();
        prop_assert_eq!(rejoined, words.concat());
    }
}
