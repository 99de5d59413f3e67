//! Public types and constants for the preview renderer.

use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;

/// Mark drawn for each placed item. Every shape is inscribed in the item's
/// circle, so the packer's overlap bound holds for the drawn marks too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Circle,
    /// Axis-aligned square inscribed in the circle.
    Square,
    /// Upward equilateral triangle inscribed in the circle.
    Triangle,
}

impl Shape {
    /// Rectangle available for a label inside a shape of circumradius `r`:
    /// `(width, height, dy)` where `dy` is the offset of the box center below the circle center.
    pub fn label_box(&self, r: f64) -> (f64, f64, f64) {
        match self {
            Shape::Circle | Shape::Square => (r * SQRT_2, r * SQRT_2, 0.0),
            // Band between the centroid and the base; its top edge is the narrow one.
            Shape::Triangle => (r * 2.0 / 3f64.sqrt(), r * 0.5, r * 0.25),
        }
    }

    /// Vertices of the triangle inscribed in a circle of radius `r` at `(cx, cy)`.
    pub fn triangle_points(cx: f64, cy: f64, r: f64) -> [(f64, f64); 3] {
        let half = r * 3f64.sqrt() / 2.0;
        [(cx, cy - r), (cx - half, cy + r / 2.0), (cx + half, cy + r / 2.0)]
    }
}

/// Preview rendering options.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOptions {
    pub shape: Shape,
    /// Blank border around the packing canvas, in pixels.
    pub margin: u32,
    /// Labels are only emitted by the SVG backend.
    pub draw_labels: bool,
    /// Locale tag for value labels (see [`super::util::map_locale`]).
    pub locale: String,
    pub max_font_px: f64,
    pub min_font_px: f64,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            shape: Shape::Circle,
            margin: 10,
            draw_labels: true,
            locale: "en".into(),
            max_font_px: 18.0,
            min_font_px: 7.0,
        }
    }
}
