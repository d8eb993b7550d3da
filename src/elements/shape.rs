//! Vector shape element.

use super::ElementStyle;
use crate::geometry::{PathSegment, Point};
use crate::writer::{Color, LineCap, LineJoin};
use serde::{Deserialize, Serialize};

/// Kind of vector shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Horizontal line across the shape width
    Line,
    /// Axis-aligned rectangle
    #[default]
    Rectangle,
    /// Rectangle with rounded corners
    RoundedRectangle,
    /// Circle inscribed in the shape box
    Circle,
    /// Ellipse filling the shape box
    Ellipse,
    /// Closed polygon through `points`
    Polygon,
    /// Free-form path through `segments`
    Path,
}

/// A vector shape occupying a `width` × `height` box in the flow.
///
/// Polygon points and path segments are offsets from the lower-left corner
/// of that box, y up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeElement {
    /// Which shape to draw
    #[serde(alias = "shape_type")]
    pub kind: ShapeKind,
    /// Box width; the available width when unset
    pub width: Option<f32>,
    /// Box height
    pub height: f32,
    /// Corner radius for rounded rectangles
    pub corner_radius: f32,
    /// Fill the interior
    pub fill: bool,
    /// Interior color
    pub fill_color: Color,
    /// Stroke the outline
    pub stroke: bool,
    /// Outline color
    pub border_color: Color,
    /// Outline width
    pub border_thickness: f32,
    /// Outline join style
    pub line_join: LineJoin,
    /// Outline cap style
    pub line_cap: LineCap,
    /// Outline dash lengths; empty is solid
    pub dash_pattern: Vec<f32>,
    /// Polygon vertices
    pub points: Vec<Point>,
    /// Path segments
    pub segments: Vec<PathSegment>,
    /// Opacity of fill and stroke
    pub opacity: f32,
    /// Presentation; `alignment` places the shape box
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Default for ShapeElement {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Rectangle,
            width: None,
            height: 50.0,
            corner_radius: 10.0,
            fill: false,
            fill_color: Color::white(),
            stroke: true,
            border_color: Color::black(),
            border_thickness: 1.0,
            line_join: LineJoin::Miter,
            line_cap: LineCap::Butt,
            dash_pattern: Vec::new(),
            points: Vec::new(),
            segments: Vec::new(),
            opacity: 1.0,
            style: ElementStyle::default(),
        }
    }
}

impl ShapeElement {
    /// Default-styled shape of `kind`.
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Vertical space the shape takes in the flow.
    pub fn flow_height(&self) -> f32 {
        match self.kind {
            ShapeKind::Line => self.border_thickness.max(0.0),
            _ => self.height.max(0.0),
        }
    }
}
