//! Error types shared by the packer, the configuration layer, and data loading.

use thiserror::Error;

/// Invalid packer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("fill_ratio must be in (0, 1], got {0}")]
    FillRatio(f64),
    #[error("angle_step must be in (0, 2π], got {0}")]
    AngleStep(f64),
    #[error("angle_step {step} yields more than {max_steps} candidates per circle")]
    AngleStepTooFine { step: f64, max_steps: usize },
    #[error("dist_padding must be finite and non-negative, got {0}")]
    DistPadding(f64),
    #[error("overlap_max must be in [0, 1], got {0}")]
    OverlapMax(f64),
    #[error("first_positions must name at least one seed position")]
    NoFirstPositions,
    #[error("min_radius must be finite and non-negative, got {0}")]
    MinRadius(f64),
    #[error("max_radius ({max}) must be finite and at least min_radius ({min})")]
    MaxRadius { min: f64, max: f64 },
}

/// Precondition violations detected before a search starts.
///
/// Running out of candidates is not an error; see [`crate::packer::PackOutcome`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PackError {
    #[error("no items to pack")]
    EmptyInput,
    #[error("canvas must have positive, finite dimensions, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("item {id:?} has invalid value {value} (expected a positive, finite number)")]
    InvalidValue { id: String, value: f64 },
    #[error("duplicate item id {0:?}")]
    DuplicateId(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Problems mapping a raw data payload onto items.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid field mapping: no {role} column named {name:?} (available: {available})")]
    FieldMapping {
        role: &'static str,
        name: String,
        available: String,
    },
    #[error("unsupported input format {0:?} (expected .csv or .json)")]
    UnsupportedFormat(String),
    #[error("JSON input must be an array of objects, or hold one under \"data\" or \"items\"")]
    JsonShape,
}
