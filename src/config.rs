use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// All matching thresholds in one struct.
/// Serializable so threshold presets can be loaded from JSON; any field
/// missing from a preset keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // -- Length gate --
    /// Minimum `(user + ε) / (canonical + ε)` length ratio.
    pub min_length_ratio: f64,
    /// Additive smoothing ε for the length ratio. Keeps very short
    /// strokes from producing unstable ratios.
    pub length_epsilon: f64,

    // -- Shape gate --
    /// Maximum discrete Fréchet distance between the normalized strokes,
    /// taking the best of `rotations`.
    pub shape_fit_threshold: f64,
    /// Candidate rotations (radians) applied to the canonical stroke.
    pub rotations: Vec<f64>,

    // -- Distance gates (glyph coordinates, unit square) --
    /// Average nearest-point distance must stay below this.
    pub avg_distance_threshold: f64,
    /// Start and end points must each lie within this distance.
    pub endpoint_threshold: f64,

    /// Multiplier loosening every gate. 1.0 = thresholds as given;
    /// larger values accept sloppier strokes.
    pub leniency: f64,
    /// On rejection, re-run the gates on the reversed user stroke and
    /// flag the report if the stroke was simply drawn backwards.
    pub check_backwards: bool,

    pub normalize: NormalizeConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_length_ratio: 0.55,
            length_epsilon: 0.024,
            shape_fit_threshold: 0.4,
            rotations: vec![PI / 16.0, PI / 32.0, 0.0, -PI / 32.0, -PI / 16.0],
            avg_distance_threshold: 0.1,
            endpoint_threshold: 0.15,
            leniency: 1.0,
            check_backwards: true,
            normalize: NormalizeConfig::default(),
        }
    }
}

impl MatchConfig {
    /// Check a loaded preset, returning it unchanged when usable.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.normalize.validate()?;
        let thresholds = [
            ("min_length_ratio", self.min_length_ratio),
            ("length_epsilon", self.length_epsilon),
            ("shape_fit_threshold", self.shape_fit_threshold),
            ("avg_distance_threshold", self.avg_distance_threshold),
            ("endpoint_threshold", self.endpoint_threshold),
            ("leniency", self.leniency),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Threshold { name, value });
            }
        }
        if let Some(&value) = self.rotations.iter().find(|r| !r.is_finite()) {
            return Err(ConfigError::Threshold {
                name: "rotations",
                value,
            });
        }
        Ok(self)
    }
}

/// Curve normalization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Number of arc-length-spaced points produced by resampling.
    pub sample_count: usize,
    /// Longest allowed segment in the normalized frame.
    pub max_segment_length: f64,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            sample_count: 30,
            max_segment_length: 0.05,
        }
    }
}

impl NormalizeConfig {
    /// Shortest `max_segment_length` accepted from a preset. Normalized
    /// strokes span about 2 units, so this already means tens of
    /// thousands of points per stroke.
    pub const MIN_SEGMENT_LENGTH: f64 = 1e-4;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_count < 2 {
            return Err(ConfigError::SampleCount(self.sample_count));
        }
        let value = self.max_segment_length;
        if !value.is_finite() || value < Self::MIN_SEGMENT_LENGTH {
            return Err(ConfigError::SegmentLength {
                value,
                min: Self::MIN_SEGMENT_LENGTH,
            });
        }
        Ok(())
    }
}

/// How raw glyph coordinates map into the unit square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoordinateConvention {
    /// `((x + xOffset) / width, (y + yOffset) / height)`.
    #[default]
    Standard,
    /// Older datasets with a flipped Y axis and a fixed 1024 em:
    /// `((x + xOffset) / 1024, (900 - y - yOffset) / 1024)`.
    LegacyInverted,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(MatchConfig::default().validated(), Ok(MatchConfig::default()));
    }

    #[test]
    fn tiny_segment_length_is_rejected() {
        let json = r#"{ "normalize": { "max_segment_length": 1e-9 } }"#;
        let config: MatchConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.normalize.sample_count, 30);
        assert_eq!(
            config.validated(),
            Err(ConfigError::SegmentLength {
                value: 1e-9,
                min: NormalizeConfig::MIN_SEGMENT_LENGTH
            })
        );
    }

    #[test]
    fn single_sample_is_rejected() {
        let config = MatchConfig {
            normalize: NormalizeConfig {
                sample_count: 1,
                ..NormalizeConfig::default()
            },
            ..MatchConfig::default()
        };
        assert_eq!(config.validated(), Err(ConfigError::SampleCount(1)));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let config = MatchConfig {
            endpoint_threshold: -0.1,
            ..MatchConfig::default()
        };
        assert_eq!(
            config.validated(),
            Err(ConfigError::Threshold {
                name: "endpoint_threshold",
                value: -0.1
            })
        );
    }
}
