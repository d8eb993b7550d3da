//! Geometric primitives.
//!
//! Points and path segments in PDF user space (origin bottom-left, y up),
//! shared by the writer primitives and the layout description.

use serde::{Deserialize, Serialize};

/// A 2D point in document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_report::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// This point shifted by (dx, dy).
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// One segment of a free-form path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PathSegment {
    /// Start a new subpath
    MoveTo {
        /// Target point
        to: Point,
    },
    /// Straight line from the current point
    LineTo {
        /// Target point
        to: Point,
    },
    /// Cubic Bezier curve from the current point
    CurveTo {
        /// First control point
        c1: Point,
        /// Second control point
        c2: Point,
        /// End point
        to: Point,
    },
    /// Close the current subpath
    Close,
}

impl PathSegment {
    /// This segment shifted by (dx, dy).
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        match self {
            PathSegment::MoveTo { to } => PathSegment::MoveTo {
                to: to.offset(dx, dy),
            },
            PathSegment::LineTo { to } => PathSegment::LineTo {
                to: to.offset(dx, dy),
            },
            PathSegment::CurveTo { c1, c2, to } => PathSegment::CurveTo {
                c1: c1.offset(dx, dy),
                c2: c2.offset(dx, dy),
                to: to.offset(dx, dy),
            },
            PathSegment::Close => PathSegment::Close,
        }
    }
}
