//! Shape dispatch.
//!
//! A shape occupies a `width` × `height` box whose top-left corner is the
//! placed x and the current cursor. The whole shape is drawn inside one
//! saved graphics state so its stroke settings and opacity end with it.

use super::Frame;
use crate::elements::{ShapeElement, ShapeKind};
use crate::geometry::Point;
use crate::writer::{Paint, PdfWriter};

/// Draw `shape` at the cursor and advance past it.
pub fn draw_shape(writer: &mut PdfWriter, shape: &ShapeElement, frame: &Frame) {
    let width = shape.width.unwrap_or_else(|| frame.available_width());
    let height = shape.height;
    let x = frame.place(width, shape.style.alignment);

    if frame.flow {
        writer.check_page_overflow(shape.flow_height());
    }
    let top = writer.cursor_y();
    let bottom = top - height;
    let paint = Paint::new(shape.fill, shape.stroke);

    writer.save_state();
    writer.set_opacity(shape.opacity);
    writer.set_fill_color(shape.fill_color);
    writer.set_stroke_color(shape.border_color);
    writer.set_line_width(shape.border_thickness);
    writer.set_line_join(shape.line_join);
    writer.set_line_cap(shape.line_cap);
    if !shape.dash_pattern.is_empty() {
        writer.set_dash_pattern(&shape.dash_pattern, 0.0);
    }

    match shape.kind {
        ShapeKind::Line => {
            if shape.stroke {
                writer.draw_line(x, top, x + width, top);
            }
        },
        ShapeKind::Rectangle => writer.draw_rect(x, bottom, width, height, paint),
        ShapeKind::RoundedRectangle => {
            writer.draw_rounded_rect(x, bottom, width, height, shape.corner_radius, paint)
        },
        ShapeKind::Circle => {
            let radius = width.min(height) / 2.0;
            writer.draw_circle(x + width / 2.0, top - height / 2.0, radius, paint);
        },
        ShapeKind::Ellipse => {
            writer.draw_ellipse(x + width / 2.0, top - height / 2.0, width / 2.0, height / 2.0, paint)
        },
        ShapeKind::Polygon => {
            let points: Vec<Point> = shape.points.iter().map(|p| p.offset(x, bottom)).collect();
            writer.draw_polygon(&points, paint);
        },
        ShapeKind::Path => writer.draw_path(&shape.segments, x, bottom, paint),
    }

    writer.restore_state();
    writer.add_vertical_space(shape.flow_height());
}
