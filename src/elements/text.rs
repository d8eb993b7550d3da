//! Text, divider and spacer elements.

use super::ElementStyle;
use serde::{Deserialize, Serialize};

/// Gap used when a spacer amount is missing or not a number.
pub const DEFAULT_SPACER_AMOUNT: f32 = 20.0;

/// A wrapped paragraph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextElement {
    /// Text content; words are separated by spaces
    pub text: String,
    /// Presentation
    #[serde(flatten)]
    pub style: ElementStyle,
}

/// A horizontal rule at the cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividerElement {
    /// Stroke thickness
    pub thickness: f32,
    /// Rule length; the available width when unset
    pub width: Option<f32>,
    /// Presentation
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl Default for DividerElement {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            width: None,
            style: ElementStyle::default(),
        }
    }
}

/// A fixed vertical gap.
///
/// The amount is carried as text, the way a layout editor stores it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacerElement {
    /// Gap in points, as text
    #[serde(alias = "amount")]
    pub text: String,
    /// Presentation
    #[serde(flatten)]
    pub style: ElementStyle,
}

impl SpacerElement {
    /// Parsed gap, or [`DEFAULT_SPACER_AMOUNT`] when the text is not a finite number.
    pub fn amount(&self) -> f32 {
        match self.text.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => value,
            _ => DEFAULT_SPACER_AMOUNT,
        }
    }
}
