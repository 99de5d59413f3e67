//! Packer configuration: defaults, validation, and JSON loading.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::path::Path;

/// Fraction of `min(width, height)` used as the radius cap when `max_radius` is unset.
pub const AUTO_MAX_RADIUS_FRACTION: f64 = 0.3;

/// Upper bound on tangency candidates swept around one placed circle (a 0.1° step).
/// Candidate generation is not charged against `max_steps`, so this keeps each
/// level of the search bounded.
pub const MAX_ANGLE_STEPS: usize = 3600;

/// Seed position for the first (largest) circle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstPosition {
    /// Tangent to the top and left canvas edges.
    TopLeft,
    /// Canvas center.
    Center,
}

/// Ordering applied to tangency candidates before the search tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSort {
    /// Row-major scan: smallest `y` first, then smallest `x`.
    TopLeft,
    /// Closest to the canvas center first.
    Center,
    /// Shuffled; see [`PackConfig::seed`].
    Random,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    pub fill_ratio: f64,
    /// Radians between tangency candidates around a placed circle.
    pub angle_step: f64,
    pub dist_padding: f64,
    pub overlap_max: f64,
    pub max_drop_tries: usize,
    pub first_positions: Vec<FirstPosition>,
    pub candidate_sort: CandidateSort,
    pub min_radius: f64,
    /// `None` caps radii at [`AUTO_MAX_RADIUS_FRACTION`] of the shorter canvas side.
    pub max_radius: Option<f64>,
    /// Candidate evaluations allowed per search attempt; `None` is unbounded.
    pub max_steps: Option<u64>,
    /// Seed for [`CandidateSort::Random`]; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            fill_ratio: 0.80,
            angle_step: PI / 24.0,
            dist_padding: 0.3,
            overlap_max: 0.12,
            max_drop_tries: 2,
            first_positions: vec![FirstPosition::TopLeft, FirstPosition::Center],
            candidate_sort: CandidateSort::TopLeft,
            min_radius: 0.0,
            max_radius: None,
            max_steps: Some(250_000),
            seed: None,
        }
    }
}

impl PackConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: PackConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fill_ratio > 0.0 && self.fill_ratio <= 1.0) {
            return Err(ConfigError::FillRatio(self.fill_ratio));
        }
        if !(self.angle_step > 0.0 && self.angle_step <= TAU) {
            return Err(ConfigError::AngleStep(self.angle_step));
        }
        if self.angle_steps() > MAX_ANGLE_STEPS {
            return Err(ConfigError::AngleStepTooFine {
                step: self.angle_step,
                max_steps: MAX_ANGLE_STEPS,
            });
        }
        if !(self.dist_padding.is_finite() && self.dist_padding >= 0.0) {
            return Err(ConfigError::DistPadding(self.dist_padding));
        }
        if !(0.0..=1.0).contains(&self.overlap_max) {
            return Err(ConfigError::OverlapMax(self.overlap_max));
        }
        if self.first_positions.is_empty() {
            return Err(ConfigError::NoFirstPositions);
        }
        if !(self.min_radius.is_finite() && self.min_radius >= 0.0) {
            return Err(ConfigError::MinRadius(self.min_radius));
        }
        if let Some(max) = self.max_radius
            && !(max.is_finite() && max >= self.min_radius)
        {
            return Err(ConfigError::MaxRadius {
                min: self.min_radius,
                max,
            });
        }
        Ok(())
    }

    /// Radius cap for a given canvas.
    pub fn effective_max_radius(&self, width: f64, height: f64) -> f64 {
        self.max_radius
            .unwrap_or_else(|| (width.min(height) * AUTO_MAX_RADIUS_FRACTION).max(self.min_radius))
    }

    /// Number of tangency candidates generated around one placed circle.
    pub fn angle_steps(&self) -> usize {
        // Absorb rounding so that e.g. π/24 yields exactly 48 steps.
        ((TAU / self.angle_step) - 1e-9).ceil().max(1.0) as usize
    }
}
