//! PDF document writer.
//!
//! Assembles complete PDF documents with proper structure:
//! header, body, xref table, and trailer.
//!
//! Object numbers follow a fixed layout that depends only on the page,
//! opacity and image counts:
//!
//! ```text
//! 1            Catalog
//! 2            Pages
//! 3 + 2i       Page i
//! 4 + 2i       Contents of page i
//! 3 + 2N       Font F1 (Helvetica)
//! 4 + 2N       Font F2 (Helvetica-Bold)
//! 5 + 2N + j   ExtGState GSj+1
//! 5 + 2N + G + k  Image XObject Imk+1
//! ```
//!
//! [`PdfWriter::to_bytes`] computes this layout first and only then emits
//! objects, recording each offset immediately before the object is written.

use super::content_stream::{Color, ContentStreamBuilder, LineCap, LineJoin};
use super::graphics_state::OpacityRegistry;
use super::image_handler::{ImageError, ImageManager};
use super::object_serializer::ObjectSerializer;
use crate::error::Result;
use crate::geometry::{PathSegment, Point};
use crate::object::Object;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

/// Approximate glyph advance of the base fonts, as a fraction of the font size.
pub const APPROX_CHAR_WIDTH: f32 = 0.6;

/// Resource name of the regular font.
pub const FONT_REGULAR: &str = "F1";
/// Resource name of the bold font.
pub const FONT_BOLD: &str = "F2";

/// Approximate rendered width of `text` at `font_size`.
pub fn approx_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * APPROX_CHAR_WIDTH
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(50.0)
    }
}

impl Margins {
    /// Same margin on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

/// Configuration for PDF generation.
#[derive(Debug, Clone)]
pub struct PdfWriterConfig {
    /// PDF version (e.g., "1.4")
    pub version: String,
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Initial page margins
    pub margins: Margins,
    /// Extra space below the top margin before the first line of a page
    pub top_padding: f32,
}

impl Default for PdfWriterConfig {
    fn default() -> Self {
        Self {
            version: "1.4".to_string(),
            page_width: 595.0,
            page_height: 842.0,
            margins: Margins::default(),
            top_padding: 30.0,
        }
    }
}

impl PdfWriterConfig {
    /// Set the page size in points.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    /// Set the initial margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set the padding below the top margin.
    pub fn with_top_padding(mut self, padding: f32) -> Self {
        self.top_padding = padding;
        self
    }
}

/// Which paint passes a closed shape receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Paint {
    /// Fill the interior with the fill color
    pub fill: bool,
    /// Stroke the outline with the stroke color
    pub stroke: bool,
}

impl Paint {
    /// Outline only.
    pub const STROKE: Paint = Paint {
        fill: false,
        stroke: true,
    };
    /// Interior only.
    pub const FILL: Paint = Paint {
        fill: true,
        stroke: false,
    };
    /// Interior, then outline on top.
    pub const FILL_STROKE: Paint = Paint {
        fill: true,
        stroke: true,
    };

    /// Build from independent toggles.
    pub fn new(fill: bool, stroke: bool) -> Self {
        Self { fill, stroke }
    }
}

/// Object number layout for one finalize pass.
#[derive(Debug, Clone, Copy)]
struct ObjectLayout {
    pages: u32,
    opacity_states: u32,
    images: u32,
}

impl ObjectLayout {
    const CATALOG: u32 = 1;
    const PAGES: u32 = 2;

    fn page(&self, index: u32) -> u32 {
        3 + index * 2
    }

    fn contents(&self, index: u32) -> u32 {
        4 + index * 2
    }

    fn font(&self, index: u32) -> u32 {
        3 + self.pages * 2 + index
    }

    fn ext_gstate(&self, index: u32) -> u32 {
        5 + self.pages * 2 + index
    }

    fn image(&self, index: u32) -> u32 {
        5 + self.pages * 2 + self.opacity_states + index
    }

    /// Number of objects, excluding the free-list head.
    fn object_count(&self) -> u32 {
        4 + self.pages * 2 + self.opacity_states + self.images
    }
}

/// PDF document writer.
///
/// Owns every buffer of one document: page content streams, the vertical
/// cursor, and the opacity and image registries. All drawing goes to the
/// last page; earlier pages are never touched again.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    config: PdfWriterConfig,
    margins: Margins,
    pages: Vec<ContentStreamBuilder>,
    cursor_y: f32,
    opacity: OpacityRegistry,
    images: ImageManager,
}

impl PdfWriter {
    /// Create a new PDF writer with default config.
    pub fn new() -> Self {
        Self::with_config(PdfWriterConfig::default())
    }

    /// Create a PDF writer with custom config.
    pub fn with_config(config: PdfWriterConfig) -> Self {
        let margins = config.margins;
        let mut writer = Self {
            config,
            margins,
            pages: Vec::new(),
            cursor_y: 0.0,
            opacity: OpacityRegistry::new(),
            images: ImageManager::new(),
        };
        writer.reset_cursor();
        writer
    }

    /// Writer configuration.
    pub fn config(&self) -> &PdfWriterConfig {
        &self.config
    }

    /// Page width in points.
    pub fn page_width(&self) -> f32 {
        self.config.page_width
    }

    /// Page height in points.
    pub fn page_height(&self) -> f32 {
        self.config.page_height
    }

    /// Margins currently in effect.
    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Change the margins used by following drawing and pagination calls.
    pub fn set_margins(&mut self, margins: Margins) {
        self.margins = margins;
    }

    /// Current vertical write position.
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Move the vertical write position.
    pub fn set_cursor_y(&mut self, y: f32) {
        self.cursor_y = y;
    }

    /// Put the cursor at the top of the writable area.
    pub fn reset_cursor(&mut self) {
        self.cursor_y = self.config.page_height - self.margins.top - self.config.top_padding;
    }

    /// Move the cursor down by `amount`.
    pub fn add_vertical_space(&mut self, amount: f32) {
        if amount.is_finite() {
            self.cursor_y -= amount;
        }
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Content stream of page `index`.
    pub fn page_stream(&self, index: usize) -> Option<&ContentStreamBuilder> {
        self.pages.get(index)
    }

    /// Number of distinct opacity states registered.
    pub fn opacity_state_count(&self) -> usize {
        self.opacity.len()
    }

    /// Number of distinct images registered.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Reset all buffers and begin the first page.
    pub fn start(&mut self) {
        self.pages.clear();
        self.opacity = OpacityRegistry::new();
        self.images = ImageManager::new();
        self.new_page();
    }

    /// Close the current page and begin a fresh one.
    pub fn new_page(&mut self) {
        if let Some(current) = self.pages.last_mut() {
            current.end_text();
        }
        let mut stream = ContentStreamBuilder::new();
        stream.begin_text();
        self.pages.push(stream);
        self.reset_cursor();
        log::debug!("Started page {}", self.pages.len());
    }

    /// Start a new page if `space_needed` does not fit above the bottom margin.
    ///
    /// Returns `true` when a page break happened. Landing exactly on the
    /// bottom margin still fits.
    pub fn check_page_overflow(&mut self, space_needed: f32) -> bool {
        if self.cursor_y - space_needed < self.margins.bottom {
            self.new_page();
            true
        } else {
            false
        }
    }

    /// The stream drawing calls go to, starting a page if none exists.
    fn stream(&mut self) -> &mut ContentStreamBuilder {
        if self.pages.is_empty() {
            self.new_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    // === Text ===

    /// Draw one line of text at `x` on the cursor baseline.
    pub fn draw_text(&mut self, text: &str, x: f32, size: f32, bold: bool) {
        if !x.is_finite() || !size.is_finite() || size <= 0.0 {
            return;
        }
        let y = self.cursor_y;
        let font = if bold { FONT_BOLD } else { FONT_REGULAR };
        self.stream().begin_text().set_font(font, size).text(text, x, y);
    }

    /// Draw one line of text centered on the page.
    pub fn draw_centered_text(&mut self, text: &str, size: f32, bold: bool) {
        let x = (self.config.page_width - approx_text_width(text, size)) / 2.0;
        self.draw_text(text, x, size, bold);
    }

    // === Graphics state ===

    /// Set both the fill (text and fills) and stroke (lines) color.
    pub fn set_color(&mut self, color: Color) {
        self.stream().fill_color(color).stroke_color(color);
    }

    /// Set the fill color only.
    pub fn set_fill_color(&mut self, color: Color) {
        self.stream().fill_color(color);
    }

    /// Set the stroke color only.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.stream().stroke_color(color);
    }

    /// Set the stroke width. Negative widths are clamped to zero.
    pub fn set_line_width(&mut self, width: f32) {
        let width = if width.is_finite() { width.max(0.0) } else { 1.0 };
        self.stream().outside_text(|b| {
            b.set_line_width(width);
        });
    }

    /// Set the line join style.
    pub fn set_line_join(&mut self, join: LineJoin) {
        self.stream().outside_text(|b| {
            b.set_line_join(join);
        });
    }

    /// Set the line cap style.
    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.stream().outside_text(|b| {
            b.set_line_cap(cap);
        });
    }

    /// Set the dash pattern; an empty pattern means a solid line.
    ///
    /// Patterns with negative, non-finite or all-zero lengths are replaced
    /// by a solid line.
    pub fn set_dash_pattern(&mut self, pattern: &[f32], phase: f32) {
        let valid = pattern.iter().all(|v| v.is_finite() && *v >= 0.0)
            && pattern.iter().any(|v| *v > 0.0);
        let pattern = if valid { pattern.to_vec() } else { Vec::new() };
        let phase = if valid && phase.is_finite() { phase } else { 0.0 };
        self.stream().outside_text(|b| {
            b.set_dash_pattern(pattern, phase);
        });
    }

    /// Set fill and stroke opacity.
    ///
    /// Fully opaque is the default graphics state, so values of 1.0 and
    /// above emit nothing. Lower values select a shared ExtGState resource.
    pub fn set_opacity(&mut self, value: f32) {
        if !(value < 1.0) {
            return;
        }
        let name = self.opacity.register(value);
        self.stream().outside_text(|b| {
            b.set_ext_gstate(&name);
        });
    }

    /// Save the graphics state (`q`).
    pub fn save_state(&mut self) {
        self.stream().outside_text(|b| {
            b.save_state();
        });
    }

    /// Restore the graphics state saved by [`PdfWriter::save_state`] (`Q`).
    pub fn restore_state(&mut self) {
        self.stream().outside_text(|b| {
            b.restore_state();
        });
    }

    // === Paths ===

    /// Stroke a straight line.
    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        if ![x1, y1, x2, y2].iter().all(|v| v.is_finite()) {
            return;
        }
        self.stream().outside_text(|b| {
            b.move_to(x1, y1).line_to(x2, y2).stroke();
        });
    }

    /// Stroke a horizontal line on the cursor from `x_start` to `x_end`.
    pub fn draw_horizontal_line(&mut self, x_start: f32, x_end: f32) {
        let y = self.cursor_y;
        self.draw_line(x_start, y, x_end, y);
    }

    /// Stroke a horizontal line across the writable width at the cursor.
    pub fn draw_horizontal_rule(&mut self) {
        let end = self.config.page_width - self.margins.right;
        self.draw_horizontal_line(self.margins.left, end);
    }

    /// Draw a rectangle with lower-left corner (x, y).
    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, paint: Paint) {
        if !valid_box(x, y, width, height) {
            return;
        }
        self.stream().outside_text(|b| {
            b.rect(x, y, width, height).paint(paint.fill, paint.stroke);
        });
    }

    /// Draw a rectangle with Bezier-rounded corners.
    pub fn draw_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        paint: Paint,
    ) {
        if !valid_box(x, y, width, height) {
            return;
        }
        let radius = if radius.is_finite() { radius } else { 0.0 };
        self.stream().outside_text(|b| {
            b.rounded_rect(x, y, width, height, radius)
                .paint(paint.fill, paint.stroke);
        });
    }

    /// Draw an ellipse centered at (cx, cy).
    pub fn draw_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, paint: Paint) {
        if !valid_box(cx, cy, rx, ry) {
            return;
        }
        self.stream().outside_text(|b| {
            b.ellipse(cx, cy, rx, ry).paint(paint.fill, paint.stroke);
        });
    }

    /// Draw a circle centered at (cx, cy).
    pub fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: Paint) {
        self.draw_ellipse(cx, cy, radius, radius, paint);
    }

    /// Draw a closed polygon through `points` (absolute coordinates).
    pub fn draw_polygon(&mut self, points: &[Point], paint: Paint) {
        if points.len() < 2 || !points.iter().all(Point::is_finite) {
            return;
        }
        self.stream().outside_text(|b| {
            b.move_to(points[0].x, points[0].y);
            for p in &points[1..] {
                b.line_to(p.x, p.y);
            }
            b.close_path().paint(paint.fill, paint.stroke);
        });
    }

    /// Draw a free-form path with every point shifted by (dx, dy).
    ///
    /// A path that does not begin with a move starts at (dx, dy).
    pub fn draw_path(&mut self, segments: &[PathSegment], dx: f32, dy: f32, paint: Paint) {
        if segments.is_empty() || !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let finite = segments.iter().all(|seg| match seg {
            PathSegment::MoveTo { to } | PathSegment::LineTo { to } => to.is_finite(),
            PathSegment::CurveTo { c1, c2, to } => {
                c1.is_finite() && c2.is_finite() && to.is_finite()
            },
            PathSegment::Close => true,
        });
        if !finite {
            return;
        }

        self.stream().outside_text(|b| {
            if !matches!(segments[0], PathSegment::MoveTo { .. }) {
                b.move_to(dx, dy);
            }
            for seg in segments {
                match seg.offset(dx, dy) {
                    PathSegment::MoveTo { to } => b.move_to(to.x, to.y),
                    PathSegment::LineTo { to } => b.line_to(to.x, to.y),
                    PathSegment::CurveTo { c1, c2, to } => {
                        b.curve_to(c1.x, c1.y, c2.x, c2.y, to.x, to.y)
                    },
                    PathSegment::Close => b.close_path(),
                };
            }
            b.paint(paint.fill, paint.stroke);
        });
    }

    // === Images ===

    /// Register a JPEG file as an image resource.
    ///
    /// The same path always maps to the same resource. Failures are logged
    /// and returned; the caller must not draw an image that failed here.
    pub fn embed_image(&mut self, path: impl AsRef<Path>) -> std::result::Result<String, ImageError> {
        let path = path.as_ref();
        self.images.register_from_file(path).map_err(|e| {
            log::warn!("Skipping image {}: {}", path.display(), e);
            e
        })
    }

    /// Pixel size of a registered image.
    pub fn image_size(&self, resource_id: &str) -> Option<(u32, u32)> {
        self.images.get(resource_id).map(|img| (img.width, img.height))
    }

    /// Paint a registered image into the box with lower-left (x, y).
    pub fn draw_image(&mut self, resource_id: &str, x: f32, y: f32, width: f32, height: f32) {
        if !valid_box(x, y, width, height) {
            return;
        }
        if self.images.get(resource_id).is_none() {
            log::warn!("Image resource {} is not registered", resource_id);
            return;
        }
        self.stream().draw_image(resource_id, x, y, width, height);
    }

    // === Output ===

    /// Serialize the document.
    ///
    /// Works on the accumulated state without changing it, so calling this
    /// repeatedly returns identical bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let layout = ObjectLayout {
            pages: self.pages.len() as u32,
            opacity_states: self.opacity.len() as u32,
            images: self.images.len() as u32,
        };
        let serializer = ObjectSerializer::compact();
        let mut output = Vec::new();
        let mut offsets: Vec<usize> = Vec::with_capacity(layout.object_count() as usize);

        writeln!(output, "%PDF-{}", self.config.version)?;
        // Binary marker (recommended for binary content)
        output.extend_from_slice(b"%\xE2\xE3\xCF\xD3\n");

        let resources = self.resources(&layout);

        // Catalog
        let catalog = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Catalog")),
            ("Pages", ObjectSerializer::reference(ObjectLayout::PAGES, 0)),
        ]);
        emit(&mut output, &mut offsets, &serializer, ObjectLayout::CATALOG, &catalog)?;

        // Pages
        let kids = (0..layout.pages)
            .map(|i| ObjectSerializer::reference(layout.page(i), 0))
            .collect();
        let pages = ObjectSerializer::dict(vec![
            ("Type", ObjectSerializer::name("Pages")),
            ("Kids", Object::Array(kids)),
            ("Count", ObjectSerializer::integer(layout.pages as i64)),
        ]);
        emit(&mut output, &mut offsets, &serializer, ObjectLayout::PAGES, &pages)?;

        // Page and content objects
        for (i, stream) in self.pages.iter().enumerate() {
            let index = i as u32;
            let page = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Page")),
                ("Parent", ObjectSerializer::reference(ObjectLayout::PAGES, 0)),
                (
                    "MediaBox",
                    ObjectSerializer::rect(
                        0.0,
                        0.0,
                        self.config.page_width as f64,
                        self.config.page_height as f64,
                    ),
                ),
                ("Contents", ObjectSerializer::reference(layout.contents(index), 0)),
                ("Resources", resources.clone()),
            ]);
            emit(&mut output, &mut offsets, &serializer, layout.page(index), &page)?;

            let contents = Object::Stream {
                dict: HashMap::new(),
                data: bytes::Bytes::from(stream.build()?),
            };
            emit(&mut output, &mut offsets, &serializer, layout.contents(index), &contents)?;
        }

        // Fonts
        for (i, base_font) in ["Helvetica", "Helvetica-Bold"].iter().enumerate() {
            let font = ObjectSerializer::dict(vec![
                ("Type", ObjectSerializer::name("Font")),
                ("Subtype", ObjectSerializer::name("Type1")),
                ("BaseFont", ObjectSerializer::name(base_font)),
                ("Encoding", ObjectSerializer::name("WinAnsiEncoding")),
            ]);
            emit(&mut output, &mut offsets, &serializer, layout.font(i as u32), &font)?;
        }

        // Opacity states
        for (j, (_, state)) in self.opacity.states().enumerate() {
            emit(&mut output, &mut offsets, &serializer, layout.ext_gstate(j as u32), &state)?;
        }

        // Images
        for (k, entry) in self.images.images().enumerate() {
            let xobject = entry.image.build_xobject();
            emit(&mut output, &mut offsets, &serializer, layout.image(k as u32), &xobject)?;
        }

        // Cross-reference table
        let xref_start = output.len();
        writeln!(output, "xref")?;
        writeln!(output, "0 {}", offsets.len() + 1)?;
        output.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            output.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }

        let trailer = ObjectSerializer::dict(vec![
            ("Size", ObjectSerializer::integer(offsets.len() as i64 + 1)),
            ("Root", ObjectSerializer::reference(ObjectLayout::CATALOG, 0)),
        ]);
        writeln!(output, "trailer")?;
        serializer.write_object(&mut output, &trailer)?;
        writeln!(output)?;
        writeln!(output, "startxref")?;
        writeln!(output, "{}", xref_start)?;
        writeln!(output, "%%EOF")?;

        log::debug!(
            "Finalized {} pages, {} objects, {} bytes",
            layout.pages,
            offsets.len(),
            output.len()
        );
        Ok(output)
    }

    /// Save the PDF to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Resource dictionary shared by every page.
    fn resources(&self, layout: &ObjectLayout) -> Object {
        let fonts = ObjectSerializer::dict(vec![
            (FONT_REGULAR, ObjectSerializer::reference(layout.font(0), 0)),
            (FONT_BOLD, ObjectSerializer::reference(layout.font(1), 0)),
        ]);
        let mut entries = vec![("Font", fonts)];

        if !self.opacity.is_empty() {
            let states: HashMap<String, Object> = self
                .opacity
                .states()
                .enumerate()
                .map(|(j, (name, _))| {
                    (name.to_string(), ObjectSerializer::reference(layout.ext_gstate(j as u32), 0))
                })
                .collect();
            entries.push(("ExtGState", Object::Dictionary(states)));
        }

        if !self.images.is_empty() {
            let xobjects: HashMap<String, Object> = self
                .images
                .images()
                .enumerate()
                .map(|(k, entry)| {
                    (entry.resource_id.clone(), ObjectSerializer::reference(layout.image(k as u32), 0))
                })
                .collect();
            entries.push(("XObject", Object::Dictionary(xobjects)));
        }

        ObjectSerializer::dict(entries)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Record the offset of object `id` and append it to `output`.
fn emit(
    output: &mut Vec<u8>,
    offsets: &mut Vec<usize>,
    serializer: &ObjectSerializer,
    id: u32,
    obj: &Object,
) -> std::io::Result<()> {
    debug_assert_eq!(id as usize, offsets.len() + 1, "objects must be emitted in id order");
    offsets.push(output.len());
    serializer.write_indirect(output, id, 0, obj)
}

/// Finite position and strictly positive extent.
fn valid_box(x: f32, y: f32, width: f32, height: f32) -> bool {
    [x, y, width, height].iter().all(|v| v.is_finite()) && width > 0.0 && height > 0.0
}
