//! Table element.

use super::{Alignment, ElementStyle, VerticalAlignment};
use crate::writer::Color;
use serde::{Deserialize, Serialize};

/// Widest grid a table is laid out with. Spans past it are clipped.
pub const MAX_TABLE_COLUMNS: usize = 256;

/// Stroke style of table borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderStyle {
    /// Continuous line
    #[default]
    Solid,
    /// Dashed line
    Dashed,
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    /// Cell text
    pub text: String,
    /// Horizontal alignment within the cell
    pub alignment: Alignment,
    /// Vertical alignment of the wrapped lines
    pub vertical_alignment: VerticalAlignment,
    /// Horizontal nudge applied to the text
    pub offset_x: f32,
    /// Vertical nudge applied to the text
    pub offset_y: f32,
    /// Background fill; header rows fall back to the table header color
    pub background: Option<Color>,
    /// Number of columns this cell spans (values below 1 count as 1)
    pub colspan: u32,
    /// Wrap text to the cell width; otherwise a single line
    pub wrap: bool,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            text: String::new(),
            alignment: Alignment::Left,
            vertical_alignment: VerticalAlignment::Middle,
            offset_x: 0.0,
            offset_y: 0.0,
            background: None,
            colspan: 1,
            wrap: true,
        }
    }
}

impl TableCell {
    /// Left-aligned cell with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the horizontal alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the vertical alignment.
    pub fn with_vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    /// Span `colspan` columns.
    pub fn with_colspan(mut self, colspan: u32) -> Self {
        self.colspan = colspan;
        self
    }

    /// Set a background fill.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Columns actually spanned.
    pub fn span(&self) -> usize {
        self.colspan.max(1) as usize
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRow {
    /// Cells in column order
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Row of plain left-aligned cells.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: texts.into_iter().map(TableCell::new).collect(),
        }
    }
}

/// A grid of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableElement {
    /// Rows, top to bottom
    pub rows: Vec<TableRow>,
    /// Fixed column widths; zero or missing entries share the remaining width
    pub column_widths: Vec<f32>,
    /// Table width; the available width when unset
    pub width: Option<f32>,
    /// Draw cell borders
    pub show_borders: bool,
    /// Border stroke width
    pub border_thickness: f32,
    /// Border stroke color
    pub border_color: Color,
    /// Border stroke style
    pub border_style: BorderStyle,
    /// Space between cell edge and text
    pub cell_padding: f32,
    /// First row is a header (bold, header background)
    pub has_header: bool,
    /// Header background when the cell has none
    pub header_color: Color,
    /// Presentation; `alignment` places the whole table
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Default for TableElement {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            column_widths: Vec::new(),
            width: None,
            show_borders: true,
            border_thickness: 1.0,
            border_color: Color::black(),
            border_style: BorderStyle::Solid,
            cell_padding: 5.0,
            has_header: true,
            header_color: Color::gray(0.9),
            style: ElementStyle::default(),
        }
    }
}

impl TableElement {
    /// Table with the given rows and default styling.
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Number of grid columns: the widest row, counting spans.
    ///
    /// Saturates instead of overflowing; callers cap the result at
    /// [`MAX_TABLE_COLUMNS`].
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.cells.iter().map(TableCell::span).fold(0usize, usize::saturating_add))
            .max()
            .unwrap_or(0)
    }
}
