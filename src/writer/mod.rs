//! PDF writing module.
//!
//! ## Architecture
//!
//! ```text
//! drawing calls (text, lines, shapes, images)
//!     ↓
//! [ContentStreamBuilder] (one per page, operators → bytes)
//!     ↓
//! [PdfWriter] (pages, cursor, shared resources, xref)
//!     ↓
//! [ObjectSerializer] (serializes PDF objects)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```
//! use pdf_report::writer::{Color, PdfWriter};
//!
//! let mut writer = PdfWriter::new();
//! writer.start();
//! writer.set_color(Color::new(0.2, 0.2, 0.8));
//! writer.draw_text("Hello, World!", 50.0, 12.0, true);
//! writer.add_vertical_space(20.0);
//! writer.draw_horizontal_rule();
//!
//! let bytes = writer.to_bytes().unwrap();
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! ```

mod content_stream;
mod graphics_state;
mod image_handler;
mod object_serializer;
mod pdf_writer;

pub use content_stream::{
    Color, ContentStreamBuilder, ContentStreamOp, LineCap, LineJoin, BEZIER_CIRCLE_K,
};
pub use graphics_state::{ExtGStateBuilder, OpacityRegistry};
pub use image_handler::{
    parse_jpeg_header, ColorSpace, ImageData, ImageError, ImageManager, JpegFrame,
    RegisteredImage,
};
pub use object_serializer::ObjectSerializer;
pub use pdf_writer::{
    approx_text_width, Margins, Paint, PdfWriter, PdfWriterConfig, APPROX_CHAR_WIDTH,
    FONT_BOLD, FONT_REGULAR,
};
