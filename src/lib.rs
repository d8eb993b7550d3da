// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

//! # PDF Report
//!
//! Minimal PDF report writer: lays out pages of text, tables, vector shapes
//! and JPEG images, and serializes them into a PDF 1.4 file with an exact
//! cross-reference table.
//!
//! ## Layers
//!
//! - [`writer`]: the document writer. Page content streams, the vertical
//!   cursor, drawing primitives, opacity and image resources, and the
//!   final byte assembly (objects, xref, trailer).
//! - [`layout`]: the layout engine. Word wrap, pagination, tables with
//!   colspan, shape placement and margin resolution.
//! - [`elements`]: the layout description (pages and typed elements),
//!   deserializable from JSON.
//! - [`report`]: the high-level [`Report`] API.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_report::elements::{Element, TableElement, TableRow};
//! use pdf_report::Report;
//!
//! # fn main() -> pdf_report::Result<()> {
//! let mut report = Report::new();
//! report.add_header("Inventory");
//! report.add_element(Element::text("Stock levels at close of day."));
//! report.add_element(Element::Table(TableElement::new(vec![
//!     TableRow::from_texts(["Item", "Qty"]),
//!     TableRow::from_texts(["Bolts", "1200"]),
//! ])));
//!
//! let bytes = report.generate()?;
//! assert!(bytes.ends_with(b"%%EOF\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Fonts and text
//!
//! Only the standard Helvetica and Helvetica-Bold fonts are referenced,
//! never embedded. Text is written as WinAnsi (Latin-1); other characters
//! are replaced with `?`. Widths are approximated as 0.6 × font size per
//! character.

#![warn(missing_docs)]

// Error handling
pub mod error;

// PDF object model
pub mod geometry;
pub mod object;

// PDF writing
pub mod writer;

// Layout description and engine
pub mod elements;
pub mod layout;

// High-level API
pub mod report;

// Re-exports
pub use elements::{Element, Page};
pub use error::{Error, Result};
pub use layout::LayoutEngine;
pub use report::{Report, ReportConfig};
pub use writer::{PdfWriter, PdfWriterConfig};
