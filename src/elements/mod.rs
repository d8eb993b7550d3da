//! Layout description model.
//!
//! A report is an ordered list of [`Page`]s, each an ordered list of
//! [`Element`]s. The model is plain data: it is built by the caller (or
//! deserialized from JSON), read by the layout engine, and never mutated
//! while a document is rendered.
//!
//! ## Example
//!
//! ```
//! use pdf_report::elements::{Element, Page};
//!
//! let mut page = Page::new("Summary");
//! page.elements.push(Element::header("Quarterly Report"));
//! page.elements.push(Element::divider());
//! page.elements.push(Element::text("All systems nominal."));
//!
//! let json = serde_json::to_string(&page).unwrap();
//! let back: Page = serde_json::from_str(&json).unwrap();
//! assert_eq!(back, page);
//! ```

mod image;
mod shape;
mod table;
mod text;

pub use image::ImageElement;
pub use shape::{ShapeElement, ShapeKind};
pub use table::{BorderStyle, TableCell, TableElement, TableRow, MAX_TABLE_COLUMNS};
pub use text::{DividerElement, SpacerElement, TextElement};

use crate::geometry::Point;
use crate::writer::Color;
use serde::{Deserialize, Serialize};

/// Element margin value that means "use the page margin".
pub const DEFAULT_MARGIN: f32 = 50.0;

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    /// Flush with the left margin
    #[default]
    Left,
    /// Centered on the page (or cell)
    Center,
    /// Flush with the right margin
    Right,
}

/// Vertical alignment of text within a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlignment {
    /// Lines start below the top padding
    Top,
    /// Lines are centered in the row
    #[default]
    Middle,
    /// Last line sits on the bottom padding
    Bottom,
}

/// Presentation fields shared by every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    /// Font size in points
    pub font_size: f32,
    /// Use the bold font
    pub bold: bool,
    /// Fill and stroke color
    pub color: Color,
    /// Horizontal alignment
    pub alignment: Alignment,
    /// Space added above the element
    #[serde(alias = "top_margin")]
    pub spacing_before: f32,
    /// Space added below the element
    #[serde(alias = "bottom_margin")]
    pub spacing_after: f32,
    /// Left margin; [`DEFAULT_MARGIN`] defers to the page
    pub left_margin: f32,
    /// Right margin; [`DEFAULT_MARGIN`] defers to the page
    pub right_margin: f32,
    /// Line spacing multiplier for wrapped text
    pub line_height: f32,
    /// Absolute position overriding flow layout
    pub position: Option<Point>,
    /// Maximum width overriding the margin-derived width
    pub max_width: Option<f32>,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            bold: false,
            color: Color::black(),
            alignment: Alignment::Left,
            spacing_before: 0.0,
            spacing_after: 10.0,
            left_margin: DEFAULT_MARGIN,
            right_margin: DEFAULT_MARGIN,
            line_height: 1.2,
            position: None,
            max_width: None,
        }
    }
}

/// One piece of report content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// Wrapped paragraph
    Text(TextElement),
    /// Horizontal rule
    Divider(DividerElement),
    /// Fixed vertical gap
    Spacer(SpacerElement),
    /// Grid of cells
    Table(TableElement),
    /// Vector shape
    Shape(ShapeElement),
    /// Embedded JPEG
    Image(ImageElement),
}

impl Element {
    /// Centered bold heading.
    pub fn header(text: impl Into<String>) -> Self {
        Element::Text(TextElement {
            text: text.into(),
            style: ElementStyle {
                font_size: 18.0,
                bold: true,
                alignment: Alignment::Center,
                spacing_after: 20.0,
                line_height: 1.3,
                ..ElementStyle::default()
            },
        })
    }

    /// Plain paragraph with default styling.
    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(TextElement {
            text: text.into(),
            style: ElementStyle::default(),
        })
    }

    /// Full-width divider.
    pub fn divider() -> Self {
        Element::Divider(DividerElement {
            style: ElementStyle {
                spacing_after: 20.0,
                ..ElementStyle::default()
            },
            ..DividerElement::default()
        })
    }

    /// Vertical gap of `amount` points.
    pub fn spacer(amount: f32) -> Self {
        Element::Spacer(SpacerElement {
            text: amount.to_string(),
            style: ElementStyle::default(),
        })
    }

    /// Shared style fields.
    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Text(e) => &e.style,
            Element::Divider(e) => &e.style,
            Element::Spacer(e) => &e.style,
            Element::Table(e) => &e.style,
            Element::Shape(e) => &e.style,
            Element::Image(e) => &e.style,
        }
    }

    /// Mutable access to the shared style fields.
    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            Element::Text(e) => &mut e.style,
            Element::Divider(e) => &mut e.style,
            Element::Spacer(e) => &mut e.style,
            Element::Table(e) => &mut e.style,
            Element::Shape(e) => &mut e.style,
            Element::Image(e) => &mut e.style,
        }
    }

    /// Short kind name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::Divider(_) => "divider",
            Element::Spacer(_) => "spacer",
            Element::Table(_) => "table",
            Element::Shape(_) => "shape",
            Element::Image(_) => "image",
        }
    }
}

/// A page of the layout description.
///
/// Each margin left unset falls back to the report's document margins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    /// Display name
    pub name: String,
    /// Content in drawing order
    pub elements: Vec<Element>,
    /// Top margin override
    pub top_margin: Option<f32>,
    /// Bottom margin override
    pub bottom_margin: Option<f32>,
    /// Left margin override
    pub left_margin: Option<f32>,
    /// Right margin override
    pub right_margin: Option<f32>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new("New Page")
    }
}

impl Page {
    /// Empty page with no margin overrides.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            top_margin: None,
            bottom_margin: None,
            left_margin: None,
            right_margin: None,
        }
    }
}
