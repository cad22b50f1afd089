use serde::{Deserialize, Serialize};

use crate::annotation::MAX_STROKE_WIDTH;
use crate::color::Color;
use crate::error::ConfigError;

pub const DEFAULT_MIN_SCALE: f64 = 0.5;
pub const DEFAULT_MAX_SCALE: f64 = 3.0;
/// Wheel delta units to exponent; a 100-unit notch changes scale by about 10%.
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.001;
pub const DEFAULT_BRUSH_WIDTH: f64 = 3.0;
pub const DEFAULT_VIEWPORT_MAX_WIDTH: f64 = 800.0;
pub const DEFAULT_VIEWPORT_MAX_HEIGHT: f64 = 600.0;

/// Tunables for one viewer instance.
///
/// Deserializes from a partial camelCase JSON object; absent keys keep their
/// defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_sensitivity: f64,
    pub initial_scale: f64,
    pub brush_color: Color,
    /// Image-space stroke width; at most `MAX_STROKE_WIDTH`.
    pub brush_width: f64,
    pub viewport_max_width: f64,
    pub viewport_max_height: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            initial_scale: 1.0,
            brush_color: Color::default(),
            brush_width: DEFAULT_BRUSH_WIDTH,
            viewport_max_width: DEFAULT_VIEWPORT_MAX_WIDTH,
            viewport_max_height: DEFAULT_VIEWPORT_MAX_HEIGHT,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0) {
            return Err(ConfigError::NonPositiveScale { min, max });
        }
        if min > max {
            return Err(ConfigError::InvertedScaleBounds { min, max });
        }
        if !(min..=max).contains(&self.initial_scale) {
            return Err(ConfigError::InitialScaleOutOfRange {
                initial: self.initial_scale,
                min,
                max,
            });
        }
        if !(self.zoom_sensitivity.is_finite() && self.zoom_sensitivity > 0.0) {
            return Err(ConfigError::InvalidZoomSensitivity(self.zoom_sensitivity));
        }
        if !(self.brush_width > 0.0 && self.brush_width <= MAX_STROKE_WIDTH) {
            return Err(ConfigError::InvalidBrushWidth {
                width: self.brush_width,
                max: MAX_STROKE_WIDTH,
            });
        }
        let (width, height) = (self.viewport_max_width, self.viewport_max_height);
        if !(width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidViewportMax { width, height });
        }
        Ok(())
    }

    /// Parse a JSON config, falling back to defaults when it is malformed or
    /// fails validation.
    pub fn from_json_or_default(text: &str) -> Self {
        let config = match serde_json::from_str::<Self>(text) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Ignoring malformed viewer config: {err}");
                return Self::default();
            }
        };
        match config.validate() {
            Ok(()) => config,
            Err(err) => {
                log::warn!("Ignoring invalid viewer config: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ViewerConfig::default();
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.max_scale, 3.0);
        assert_eq!(config.initial_scale, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = ViewerConfig::from_json_or_default(
            r##"{"maxScale": 5.0, "brushColor": "#00ff00"}"##,
        );
        assert_eq!(config.max_scale, 5.0);
        assert_eq!(config.min_scale, 0.5);
        assert_eq!(config.brush_color, Color::rgb(0, 255, 0));
    }

    #[test]
    fn invalid_config_falls_back_to_defaults() {
        let config = ViewerConfig::from_json_or_default(r#"{"minScale": 4.0}"#);
        assert_eq!(config, ViewerConfig::default());
        let config = ViewerConfig::from_json_or_default("not json");
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn validate_reports_each_violation() {
        let mut config = ViewerConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..ViewerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedScaleBounds { min: 2.0, max: 1.0 })
        );

        config = ViewerConfig {
            initial_scale: 4.0,
            ..ViewerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialScaleOutOfRange { .. })
        ));

        config = ViewerConfig {
            zoom_sensitivity: 0.0,
            ..ViewerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidZoomSensitivity(0.0))
        );

        config = ViewerConfig {
            viewport_max_height: -1.0,
            ..ViewerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidViewportMax { .. })
        ));
    }

    #[test]
    fn brush_width_above_stroke_cap_is_rejected() {
        let config = ViewerConfig {
            brush_width: MAX_STROKE_WIDTH + 1.0,
            ..ViewerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidBrushWidth {
                width: MAX_STROKE_WIDTH + 1.0,
                max: MAX_STROKE_WIDTH,
            })
        );
        let config = ViewerConfig {
            brush_width: MAX_STROKE_WIDTH,
            ..ViewerConfig::default()
        };
        assert!(config.validate().is_ok());
        let config = ViewerConfig::from_json_or_default(r#"{"brushWidth": 100.0}"#);
        assert_eq!(config.brush_width, DEFAULT_BRUSH_WIDTH);
    }
}
