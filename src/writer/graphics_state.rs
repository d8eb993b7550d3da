//! Extended Graphics State (ExtGState) for transparency.
//!
//! Opacity cannot be set with a plain content-stream operator; it lives in
//! an ExtGState resource selected with `gs`. [`OpacityRegistry`] hands out
//! one resource name per distinct opacity value and remembers first-seen
//! order so object numbers can be assigned at finalize time.

use crate::object::Object;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Builder for Extended Graphics State dictionaries.
#[derive(Debug, Clone, Default)]
pub struct ExtGStateBuilder {
    /// Fill alpha (ca) - 0.0 to 1.0
    fill_alpha: Option<f32>,
    /// Stroke alpha (CA) - 0.0 to 1.0
    stroke_alpha: Option<f32>,
}

impl ExtGStateBuilder {
    /// Create a new ExtGState builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set fill alpha (opacity for fill and text operations).
    ///
    /// Value should be between 0.0 (fully transparent) and 1.0 (fully opaque).
    pub fn fill_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Set stroke alpha (opacity for stroke operations).
    pub fn stroke_alpha(mut self, alpha: f32) -> Self {
        self.stroke_alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Set both fill and stroke alpha to the same value.
    pub fn alpha(self, alpha: f32) -> Self {
        self.fill_alpha(alpha).stroke_alpha(alpha)
    }

    /// Build the ExtGState dictionary as a PDF Object.
    pub fn build(&self) -> Object {
        let mut dict: HashMap<String, Object> = HashMap::new();
        dict.insert("Type".to_string(), Object::Name("ExtGState".to_string()));

        if let Some(alpha) = self.fill_alpha {
            dict.insert("ca".to_string(), Object::Real(alpha as f64));
        }
        if let Some(alpha) = self.stroke_alpha {
            dict.insert("CA".to_string(), Object::Real(alpha as f64));
        }

        Object::Dictionary(dict)
    }
}

/// Opacity is deduplicated at this resolution (thousandths).
const OPACITY_STEPS: f32 = 1000.0;

/// Deduplicating registry of opacity ExtGState resources.
///
/// Keys are opacity values rounded to thousandths; insertion order is the
/// order the resources are emitted in.
#[derive(Debug, Clone, Default)]
pub struct OpacityRegistry {
    /// rounded opacity -> resource name ("GS1", "GS2", ...)
    states: IndexMap<u16, String>,
}

impl OpacityRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the resource name for `opacity`, registering it on first use.
    ///
    /// Values are clamped to `0.0..=1.0` before rounding.
    pub fn register(&mut self, opacity: f32) -> String {
        let key = Self::key(opacity);
        let next = self.states.len() + 1;
        self.states
            .entry(key)
            .or_insert_with(|| {
                log::debug!("Registered opacity state GS{} for {}", next, key as f32 / OPACITY_STEPS);
                format!("GS{}", next)
            })
            .clone()
    }

    /// Number of distinct opacity states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if no opacity state has been registered.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterate `(resource name, ExtGState dictionary)` in registration order.
    pub fn states(&self) -> impl Iterator<Item = (&str, Object)> + '_ {
        self.states.iter().map(|(key, name)| {
            let alpha = *key as f32 / OPACITY_STEPS;
            (name.as_str(), ExtGStateBuilder::new().alpha(alpha).build())
        })
    }

    fn key(opacity: f32) -> u16 {
        let clamped = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            1.0
        };
        (clamped * OPACITY_STEPS).round() as u16
    }
}
