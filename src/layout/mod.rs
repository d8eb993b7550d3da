//! Layout engine.
//!
//! Walks pages and elements in order and turns them into [`PdfWriter`]
//! calls. The engine keeps no state between calls; the writer owns the
//! cursor and pages.
//!
//! Per element, in order:
//! 1. move down by `spacing_before`
//! 2. start a new page if `spacing_after + font_size × line_height` does not fit
//! 3. draw (at the flow cursor, or at the element's absolute position)
//! 4. move down by `spacing_after`

pub mod shapes;
pub mod table;
pub mod text_wrap;

pub use table::{cell_slots, column_widths, CellSlot, TableLayout};
pub use text_wrap::{chars_per_line, wrap_text};

use crate::elements::{
    Alignment, DividerElement, Element, ElementStyle, ImageElement, Page, TextElement,
    DEFAULT_MARGIN,
};
use crate::writer::{approx_text_width, Margins, PdfWriter};

/// Font size above which an element gets extra space above it.
const LARGE_FONT_THRESHOLD: f32 = 50.0;

/// Space left below a divider, on top of its thickness.
const DIVIDER_GAP: f32 = 10.0;

/// Horizontal frame an element is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Effective left margin
    pub left: f32,
    /// Effective right margin
    pub right: f32,
    /// Page width
    pub page_width: f32,
    /// Absolute left edge, for custom-positioned elements
    pub custom_x: Option<f32>,
    /// Whether the element takes part in pagination
    pub flow: bool,
}

impl Frame {
    /// Width between the margins.
    pub fn available_width(&self) -> f32 {
        (self.page_width - self.left - self.right).max(0.0)
    }

    /// Left edge of a `width`-wide box with the given alignment.
    pub fn place(&self, width: f32, alignment: Alignment) -> f32 {
        if let Some(x) = self.custom_x {
            return x;
        }
        match alignment {
            Alignment::Left => self.left,
            Alignment::Center => (self.page_width - width) / 2.0,
            Alignment::Right => self.page_width - self.right - width,
        }
    }
}

/// Element margin, or the page margin when the element uses the default.
fn effective_margin(element_margin: f32, page_margin: f32) -> f32 {
    if element_margin == DEFAULT_MARGIN {
        page_margin
    } else {
        element_margin
    }
}

/// Renders a page/element tree into a [`PdfWriter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    margins: Margins,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(Margins::default())
    }
}

impl LayoutEngine {
    /// Engine using `margins` wherever a page does not override them.
    pub fn new(margins: Margins) -> Self {
        Self { margins }
    }

    /// Document margins.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Margins in effect on `page`.
    pub fn page_margins(&self, page: &Page) -> Margins {
        Margins {
            top: page.top_margin.unwrap_or(self.margins.top),
            bottom: page.bottom_margin.unwrap_or(self.margins.bottom),
            left: page.left_margin.unwrap_or(self.margins.left),
            right: page.right_margin.unwrap_or(self.margins.right),
        }
    }

    /// Render `pages` into `writer`, replacing anything it held.
    ///
    /// Each layout page starts a new PDF page; long content continues on
    /// further pages. An empty layout produces one blank page.
    pub fn render(&self, writer: &mut PdfWriter, pages: &[Page]) {
        writer.start();
        if pages.is_empty() {
            log::warn!("Layout has no pages; producing a blank document");
        }

        for (index, page) in pages.iter().enumerate() {
            writer.set_margins(self.page_margins(page));
            if index == 0 {
                writer.reset_cursor();
            } else {
                writer.new_page();
            }
            log::debug!("Rendering page '{}' ({} elements)", page.name, page.elements.len());

            for element in &page.elements {
                self.render_element(writer, element);
            }
        }
    }

    /// Render one element at the cursor, including its spacing.
    pub fn render_element(&self, writer: &mut PdfWriter, element: &Element) {
        let style = element.style();
        if style.spacing_before > 0.0 {
            writer.add_vertical_space(style.spacing_before);
        }
        writer.check_page_overflow(style.spacing_after + style.font_size * style.line_height);

        if style.font_size > LARGE_FONT_THRESHOLD {
            writer.add_vertical_space((style.font_size - LARGE_FONT_THRESHOLD) * 0.3);
        }
        writer.set_color(style.color);

        let margins = writer.margins();
        let mut frame = Frame {
            left: effective_margin(style.left_margin, margins.left),
            right: effective_margin(style.right_margin, margins.right),
            page_width: writer.page_width(),
            custom_x: None,
            flow: true,
        };

        match style.position {
            Some(position) => {
                let flow_cursor = writer.cursor_y();
                writer.set_cursor_y(position.y);
                frame.custom_x = Some(position.x);
                frame.flow = false;
                self.draw(writer, element, &frame);
                writer.set_cursor_y(flow_cursor);
            },
            None => self.draw(writer, element, &frame),
        }

        writer.add_vertical_space(style.spacing_after);
    }

    fn draw(&self, writer: &mut PdfWriter, element: &Element, frame: &Frame) {
        match element {
            Element::Text(text) => draw_paragraph(writer, text, frame),
            Element::Divider(divider) => draw_divider(writer, divider, frame),
            Element::Spacer(spacer) => writer.add_vertical_space(spacer.amount()),
            Element::Table(table) => {
                if let Some(layout) = TableLayout::new(table, frame) {
                    layout.render(writer, table, frame);
                }
            },
            Element::Shape(shape) => shapes::draw_shape(writer, shape, frame),
            Element::Image(image) => draw_image(writer, image, frame),
        }
    }
}

/// Draw wrapped text, one cursor step per line.
fn draw_paragraph(writer: &mut PdfWriter, element: &TextElement, frame: &Frame) {
    let style: &ElementStyle = &element.style;
    let max_width = style.max_width.filter(|w| *w > 0.0).unwrap_or_else(|| frame.available_width());
    let lines = wrap_text(&element.text, chars_per_line(max_width, style.font_size));
    let step = style.font_size * style.line_height;

    for (index, line) in lines.iter().enumerate() {
        // A fresh page starts with the default graphics state
        if index > 0 && frame.flow && writer.check_page_overflow(step) {
            writer.set_color(style.color);
        }

        if style.alignment == Alignment::Center && frame.custom_x.is_none() {
            writer.draw_centered_text(line, style.font_size, style.bold);
        } else {
            let x = frame.place(approx_text_width(line, style.font_size), style.alignment);
            writer.draw_text(line, x, style.font_size, style.bold);
        }
        writer.add_vertical_space(step);
    }
}

fn draw_divider(writer: &mut PdfWriter, divider: &DividerElement, frame: &Frame) {
    let width = divider.width.filter(|w| *w > 0.0).unwrap_or_else(|| frame.available_width());
    let x = frame.place(width, divider.style.alignment);

    writer.save_state();
    writer.set_line_width(divider.thickness);
    writer.draw_horizontal_line(x, x + width);
    writer.restore_state();
    writer.add_vertical_space(divider.thickness + DIVIDER_GAP);
}

/// Embed and place an image; unreadable images are skipped.
fn draw_image(writer: &mut PdfWriter, element: &ImageElement, frame: &Frame) {
    let Ok(name) = writer.embed_image(&element.path) else {
        return;
    };
    let Some(pixels) = writer.image_size(&name) else {
        return;
    };

    let (width, height) = element.display_size(pixels, frame.available_width());
    if frame.flow {
        writer.check_page_overflow(height);
    }
    let x = frame.place(width, element.style.alignment);
    let top = writer.cursor_y();
    writer.draw_image(&name, x, top - height, width, height);
    writer.add_vertical_space(height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::SpacerElement;
    use crate::geometry::Point;

    fn content(writer: &PdfWriter, page: usize) -> String {
        String::from_utf8_lossy(&writer.page_stream(page).unwrap().build().unwrap()).to_string()
    }

    #[test]
    fn test_frame_place() {
        let frame = Frame {
            left: 40.0,
            right: 60.0,
            page_width: 600.0,
            custom_x: None,
            flow: true,
        };
        assert_eq!(frame.available_width(), 500.0);
        assert_eq!(frame.place(100.0, Alignment::Left), 40.0);
        assert_eq!(frame.place(100.0, Alignment::Center), 250.0);
        assert_eq!(frame.place(100.0, Alignment::Right), 440.0);

        let custom = Frame {
            custom_x: Some(7.0),
            ..frame
        };
        assert_eq!(custom.place(100.0, Alignment::Right), 7.0);
    }

    #[test]
    fn test_effective_margin_sentinel() {
        assert_eq!(effective_margin(50.0, 72.0), 72.0);
        assert_eq!(effective_margin(20.0, 72.0), 20.0);
    }

    #[test]
    fn test_page_margin_overrides() {
        let engine = LayoutEngine::new(Margins::uniform(40.0));
        let mut page = Page::new("p");
        page.left_margin = Some(10.0);

        let margins = engine.page_margins(&page);
        assert_eq!(margins.left, 10.0);
        assert_eq!(margins.top, 40.0);
    }

    #[test]
    fn test_text_element_advances_cursor() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut page = Page::new("p");
        page.elements.push(Element::text("Hello world"));
        engine.render(&mut writer, &[page]);

        // 762 - 11 * 1.2 - 10
        assert!((writer.cursor_y() - 738.8).abs() < 1e-3);
        assert!(content(&writer, 0).contains("1 0 0 1 50 762 Tm\n(Hello world) Tj"));
    }

    #[test]
    fn test_header_is_centered() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut page = Page::new("p");
        page.elements.push(Element::header("Title"));
        engine.render(&mut writer, &[page]);

        // (595 - 5 * 18 * 0.6) / 2
        assert!(content(&writer, 0).contains("/F2 18 Tf\n1 0 0 1 270.5 762 Tm\n(Title) Tj"));
    }

    #[test]
    fn test_right_aligned_text_uses_right_margin() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut el = TextElement {
            text: "abc".to_string(),
            ..TextElement::default()
        };
        el.style.alignment = Alignment::Right;
        el.style.font_size = 10.0;
        let mut page = Page::new("p");
        page.elements.push(Element::Text(el));
        engine.render(&mut writer, &[page]);

        // 595 - 50 - 18
        assert!(content(&writer, 0).contains("1 0 0 1 527 762 Tm"));
    }

    #[test]
    fn test_custom_position_restores_flow_cursor() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut el = TextElement {
            text: "Stamp".to_string(),
            ..TextElement::default()
        };
        el.style.position = Some(Point::new(400.0, 100.0));
        el.style.spacing_after = 0.0;
        let mut page = Page::new("p");
        page.elements.push(Element::Text(el));
        engine.render(&mut writer, &[page]);

        assert_eq!(writer.cursor_y(), 762.0);
        assert!(content(&writer, 0).contains("1 0 0 1 400 100 Tm"));
    }

    #[test]
    fn test_spacer_fallback_amount() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut page = Page::new("p");
        page.elements.push(Element::Spacer(SpacerElement {
            text: "oops".to_string(),
            style: ElementStyle {
                spacing_after: 0.0,
                ..ElementStyle::default()
            },
        }));
        engine.render(&mut writer, &[page]);
        assert_eq!(writer.cursor_y(), 742.0);
    }

    #[test]
    fn test_divider_is_self_contained() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut page = Page::new("p");
        page.elements.push(Element::divider());
        engine.render(&mut writer, &[page]);

        let text = content(&writer, 0);
        assert!(text.contains("q\nBT\nET\n1 w\nBT\nET\n50 762 m\n545 762 l\nS\nBT\nET\nQ\n"));
        // thickness + gap + spacing_after
        assert_eq!(writer.cursor_y(), 762.0 - 11.0 - 20.0);
    }

    #[test]
    fn test_each_layout_page_starts_pdf_page() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut second = Page::new("second");
        second.top_margin = Some(100.0);
        engine.render(&mut writer, &[Page::new("first"), second]);

        assert_eq!(writer.page_count(), 2);
        assert_eq!(writer.cursor_y(), 842.0 - 100.0 - 30.0);
    }

    #[test]
    fn test_empty_layout_yields_blank_page() {
        let mut writer = PdfWriter::new();
        LayoutEngine::default().render(&mut writer, &[]);
        assert_eq!(writer.page_count(), 1);
    }

    #[test]
    fn test_large_font_gets_extra_space() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut el = TextElement {
            text: "Big".to_string(),
            ..TextElement::default()
        };
        el.style.font_size = 60.0;
        let mut page = Page::new("p");
        page.elements.push(Element::Text(el));
        engine.render(&mut writer, &[page]);

        // (60 - 50) * 0.3 = 3 below the top line
        assert!(content(&writer, 0).contains("1 0 0 1 50 759 Tm"));
    }

    #[test]
    fn test_missing_image_is_skipped() {
        let engine = LayoutEngine::default();
        let mut writer = PdfWriter::new();
        let mut page = Page::new("p");
        page.elements.push(Element::Image(ImageElement::new("/nonexistent/photo.jpg")));
        engine.render(&mut writer, &[page]);

        assert_eq!(writer.image_count(), 0);
        assert!(!content(&writer, 0).contains(" Do"));
    }
}
