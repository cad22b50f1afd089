//! Error types for the fallible edges of the viewer: configuration and color
//! parsing. The interactive core itself never fails.

use thiserror::Error;

/// Reasons a [`crate::ViewerConfig`] is rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("scale bounds must be finite and positive, got [{min}, {max}]")]
    NonPositiveScale { min: f64, max: f64 },

    #[error("min scale {min} exceeds max scale {max}")]
    InvertedScaleBounds { min: f64, max: f64 },

    #[error("initial scale {initial} lies outside [{min}, {max}]")]
    InitialScaleOutOfRange { initial: f64, min: f64, max: f64 },

    #[error("zoom sensitivity must be finite and positive, got {0}")]
    InvalidZoomSensitivity(f64),

    #[error("brush width must lie in (0, {max}], got {width}")]
    InvalidBrushWidth { width: f64, max: f64 },

    #[error("viewport maximum must be positive, got {width}x{height}")]
    InvalidViewportMax { width: f64, height: f64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),

    #[error("color must have 3, 6 or 8 hex digits: {0:?}")]
    InvalidLength(String),

    #[error("invalid hex digit in color: {0:?}")]
    InvalidDigit(String),
}
