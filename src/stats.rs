use crate::geometry::{Circle, overlap_fractions};
use crate::models::PlacedCircle;
use crate::packer::PackOutcome;
use serde::{Deserialize, Serialize};

/// Summary of one packing run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackSummary {
    pub requested: usize,
    pub placed: usize,
    pub dropped: usize,
    /// Placed circles whose radius hit a clamp.
    pub clamped: usize,
    /// Total placed area / canvas area.
    pub coverage: f64,
    /// Worst pairwise overlap, as a fraction of the smaller circle's area.
    pub max_overlap_fraction: f64,
    pub min_radius: Option<f64>,
    pub max_radius: Option<f64>,
}

/// Summarize `outcome` for `requested` input items on a `width` x `height` canvas.
pub fn summarize(outcome: &PackOutcome, requested: usize, width: f64, height: f64) -> PackSummary {
    let circles = outcome.circles();
    let placed_area: f64 = circles.iter().map(|c| c.area).sum();
    let canvas = width * height;
    let min_radius = circles.iter().map(|c| c.radius).min_by(|a, b| a.total_cmp(b));
    let max_radius = circles.iter().map(|c| c.radius).max_by(|a, b| a.total_cmp(b));
    PackSummary {
        requested,
        placed: circles.len(),
        dropped: outcome.dropped().len(),
        clamped: circles.iter().filter(|c| c.clamped).count(),
        coverage: if canvas > 0.0 { placed_area / canvas } else { 0.0 },
        max_overlap_fraction: max_overlap_fraction(circles),
        min_radius,
        max_radius,
    }
}

/// Largest overlap fraction over all pairs (0 for fewer than two circles).
pub fn max_overlap_fraction(circles: &[PlacedCircle]) -> f64 {
    let shapes: Vec<Circle> = circles
        .iter()
        .map(|c| Circle::new(c.x, c.y, c.radius))
        .collect();
    let mut worst = 0.0f64;
    for (i, a) in shapes.iter().enumerate() {
        for b in &shapes[i + 1..] {
            let (fa, fb) = overlap_fractions(a, b);
            worst = worst.max(fa).max(fb);
        }
    }
    worst
}
