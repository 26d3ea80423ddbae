use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for trackaug operations.
#[derive(Debug, Error)]
pub enum TrackaugError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bounding box vector has {len} elements (expected 5)")]
    InvalidVectorLength { len: usize },

    #[error("Feature vector of length {len} needs space for 2 values from index {index}")]
    BufferTooSmall { index: usize, len: usize },

    #[error("Cyclic range [{min} .. {max}) must have finite bounds and a finite width")]
    NonFiniteRange { min: f64, max: f64 },

    #[error("Cyclic range is inverted: min {min} must be less than max {max}")]
    InvertedRange { min: f64, max: f64 },

    #[error("Cyclic range {range} is suspiciously small (must exceed {minimum})")]
    RangeTooSmall { range: f64, minimum: f64 },

    #[error("Feature vector holds a non-finite value at index {index}")]
    NonFiniteFeature { index: usize },

    #[error("Value {value} is outside the cyclic range [{min} .. {max}]")]
    ValueOutOfRange { value: f64, min: f64, max: f64 },

    #[error(
        "Cannot assign a cyclic value with range [{from_min} .. {from_max}) \
         to one with range [{to_min} .. {to_max})"
    )]
    RangeMismatch {
        from_min: f64,
        from_max: f64,
        to_min: f64,
        to_max: f64,
    },

    #[error("Invalid sampling parameters: {message}")]
    InvalidParams { message: String },

    #[error("Example generator has no frame pair; call reset first")]
    GeneratorNotReady,

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Failed to parse YAML config from {path}: {source}")]
    ConfigYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to parse JSON config from {path}: {source}")]
    ConfigJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON output: {0}")]
    JsonWrite(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
