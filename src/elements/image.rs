//! Image element.

use super::ElementStyle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A JPEG image placed in the flow.
///
/// Width defaults to the pixel width (limited to the available width);
/// height defaults to the value that keeps the aspect ratio.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageElement {
    /// JPEG file on disk
    pub path: PathBuf,
    /// Display width in points
    pub width: Option<f32>,
    /// Display height in points
    pub height: Option<f32>,
    /// Presentation; `alignment` places the image
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl ImageElement {
    /// Image at `path` with natural size.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Display size for an image of `pixels` within `available` width.
    pub fn display_size(&self, pixels: (u32, u32), available: f32) -> (f32, f32) {
        let (px_w, px_h) = (pixels.0.max(1) as f32, pixels.1.max(1) as f32);
        match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * px_h / px_w),
            (None, Some(h)) => (h * px_w / px_h, h),
            (None, None) => {
                let w = px_w.min(available.max(1.0));
                (w, w * px_h / px_w)
            },
        }
    }
}
