//! Table layout and rendering.
//!
//! Each row is handled in two phases: measure (wrap every cell to its
//! spanned width and take the tallest) and paint (background, borders,
//! text). Rows are paginated individually; a page break inside a table
//! does not repeat the header row.

use super::text_wrap::{chars_per_line, wrap_text};
use super::Frame;
use crate::elements::{
    Alignment, BorderStyle, TableCell, TableElement, TableRow, VerticalAlignment, MAX_TABLE_COLUMNS,
};
use crate::writer::{approx_text_width, Paint, PdfWriter};

/// Narrowest width an automatically sized column gets.
pub const MIN_COLUMN_WIDTH: f32 = 10.0;

/// Dash pattern used for dashed borders.
pub const DASHED_BORDER: [f32; 2] = [3.0, 3.0];

/// Split `table_width` into `count` columns.
///
/// Positive finite entries of `overrides` are used as-is; every other
/// column gets an equal share of what remains, at least [`MIN_COLUMN_WIDTH`].
pub fn column_widths(table_width: f32, overrides: &[f32], count: usize) -> Vec<f32> {
    let fixed = |i: usize| overrides.get(i).copied().filter(|w| w.is_finite() && *w > 0.0);

    let fixed_total: f32 = (0..count).filter_map(fixed).sum();
    let auto_count = (0..count).filter(|i| fixed(*i).is_none()).count();
    let auto_width = ((table_width - fixed_total) / auto_count.max(1) as f32).max(MIN_COLUMN_WIDTH);

    (0..count).map(|i| fixed(i).unwrap_or(auto_width)).collect()
}

/// Horizontal placement of one cell within its row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSlot {
    /// First grid column the cell occupies
    pub column: usize,
    /// Left edge, relative to the table's left edge
    pub x: f32,
    /// Combined width of the spanned columns
    pub width: f32,
}

/// Place the cells of one row left to right.
///
/// A cell spanning `n` columns consumes the next `n` grid columns (clipped at
/// the last column). Cells that start past the last column are dropped.
pub fn cell_slots(cells: &[TableCell], columns: &[f32]) -> Vec<CellSlot> {
    let mut slots = Vec::with_capacity(cells.len());
    let mut column = 0;
    let mut x = 0.0;

    for cell in cells {
        if column >= columns.len() {
            break;
        }
        let end = column.saturating_add(cell.span()).min(columns.len());
        let width: f32 = columns[column..end].iter().sum();
        slots.push(CellSlot { column, x, width });
        x += width;
        column = end;
    }
    slots
}

/// Calculated layout of a table.
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Left edge of the table
    pub x: f32,
    /// Column widths in points
    pub column_widths: Vec<f32>,
}

impl TableLayout {
    /// Lay out `table` within `frame`, or `None` if it has nothing to draw.
    pub fn new(table: &TableElement, frame: &Frame) -> Option<Self> {
        if table.rows.is_empty() {
            log::warn!("Table has no rows; skipping");
            return None;
        }
        let mut count = table.column_count();
        if count == 0 {
            log::warn!("Table rows have no cells; skipping");
            return None;
        }
        if count > MAX_TABLE_COLUMNS {
            log::warn!("Table spans {} columns; clipping to {}", count, MAX_TABLE_COLUMNS);
            count = MAX_TABLE_COLUMNS;
        }

        let table_width = table.width.unwrap_or_else(|| frame.available_width());
        Some(Self {
            x: frame.place(table_width, table.style.alignment),
            column_widths: column_widths(table_width, &table.column_widths, count),
        })
    }

    /// Wrap every cell of `row` and return the lines with the row height.
    ///
    /// The height is at least one line plus padding; empty cells still
    /// produce one (empty) line.
    pub fn measure_row(&self, table: &TableElement, row: &TableRow) -> (Vec<Vec<String>>, f32) {
        let font_size = table.style.font_size;
        let padding = table.cell_padding;
        let mut height = font_size + padding * 2.0;

        let slots = cell_slots(&row.cells, &self.column_widths);
        let lines = row
            .cells
            .iter()
            .zip(&slots)
            .map(|(cell, slot)| {
                let mut lines = if cell.wrap {
                    let max_chars = chars_per_line(slot.width - padding * 2.0, font_size);
                    wrap_text(&cell.text, max_chars)
                } else {
                    vec![cell.text.clone()]
                };
                if lines.is_empty() {
                    lines.push(String::new());
                }
                height = height.max(lines.len() as f32 * font_size + padding * 2.0);
                lines
            })
            .collect();

        (lines, height)
    }

    /// Draw every row, breaking pages between rows when `frame` is in the flow.
    pub fn render(&self, writer: &mut PdfWriter, table: &TableElement, frame: &Frame) {
        for (index, row) in table.rows.iter().enumerate() {
            let is_header = index == 0 && table.has_header;
            let (lines, height) = self.measure_row(table, row);

            if frame.flow {
                writer.check_page_overflow(height);
            }
            self.paint_row(writer, table, row, &lines, height, is_header);

            if table.show_borders {
                writer.set_line_width(1.0);
                writer.set_dash_pattern(&[], 0.0);
            }
            writer.add_vertical_space(height);
        }
    }

    fn paint_row(
        &self,
        writer: &mut PdfWriter,
        table: &TableElement,
        row: &TableRow,
        lines: &[Vec<String>],
        height: f32,
        is_header: bool,
    ) {
        let top = writer.cursor_y();
        let bottom = top - height;
        let font_size = table.style.font_size;
        let padding = table.cell_padding;
        let bold = is_header || table.style.bold;

        let slots = cell_slots(&row.cells, &self.column_widths);
        for ((cell, slot), cell_lines) in row.cells.iter().zip(&slots).zip(lines) {
            let left = self.x + slot.x;
            let right = left + slot.width;

            let background = cell.background.or(is_header.then_some(table.header_color));
            if let Some(color) = background {
                writer.set_color(color);
                writer.draw_rect(left, bottom, slot.width, height, Paint::FILL);
            }

            if table.show_borders {
                writer.set_line_width(table.border_thickness);
                writer.set_color(table.border_color);
                match table.border_style {
                    BorderStyle::Dashed => writer.set_dash_pattern(&DASHED_BORDER, 0.0),
                    BorderStyle::Solid => writer.set_dash_pattern(&[], 0.0),
                }
                // One line per side, all drawn in the same direction,
                // so dash phase lines up at the corners.
                writer.draw_line(left, top, right, top);
                writer.draw_line(left, bottom, right, bottom);
                writer.draw_line(left, top, left, bottom);
                writer.draw_line(right, top, right, bottom);
            }

            writer.set_color(table.style.color);
            let count = cell_lines.len() as f32;
            let first_baseline = match cell.vertical_alignment {
                VerticalAlignment::Top => top - padding - font_size * 0.8,
                VerticalAlignment::Middle => {
                    top - height / 2.0 + count * font_size / 2.0 - font_size * 0.8
                },
                VerticalAlignment::Bottom => {
                    bottom + padding + (count - 1.0) * font_size + font_size * 0.2
                },
            };

            for (l, line) in cell_lines.iter().enumerate() {
                let text_width = approx_text_width(line, font_size);
                let x = match cell.alignment {
                    Alignment::Left => left + padding,
                    Alignment::Center => left + slot.width / 2.0 - text_width / 2.0,
                    Alignment::Right => right - text_width - padding,
                } + cell.offset_x;
                let y = first_baseline - l as f32 * font_size + cell.offset_y;

                writer.set_cursor_y(y);
                writer.draw_text(line, x, font_size, bold);
            }
            writer.set_cursor_y(top);
        }
    }
}
