//! Configuration parameters for fingerprinting and matching
//!
//! The defaults are the values the matching thresholds were tuned against.
//! Fingerprints are only comparable when built with the same frame length
//! and band boundaries.

use crate::error::{AudioMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of frequency bands tracked per source
pub const NUM_BANDS: usize = 4;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    // Framing
    pub frame_length: usize,

    // Peak tracking
    pub band_boundaries: [usize; NUM_BANDS],

    // Scoring
    /// Decimal digits dropped from each token before comparison
    pub intensity: u32,
    /// Largest truncated difference still counted as agreement
    pub threshold: i64,
    /// Fraction of the self-similarity baseline a pair must reach
    pub accuracy: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            frame_length: 1024,
            band_boundaries: [128, 256, 512, 1025],
            intensity: 4,
            threshold: 5,
            accuracy: 0.7,
        }
    }
}

impl MatchConfig {
    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| AudioMatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: MatchConfig = toml::from_str(&content).map_err(|e| {
            AudioMatchError::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.frame_length < 2 || !self.frame_length.is_power_of_two() {
            return Err(AudioMatchError::Config(format!(
                "frame_length must be a power of two >= 2, got {}",
                self.frame_length
            )));
        }
        if self.band_boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AudioMatchError::Config(
                "band_boundaries must be strictly increasing".to_string(),
            ));
        }
        // Every scanned index (0..frame_length - 1) needs a band.
        let last = self.band_boundaries[NUM_BANDS - 1];
        if last + 1 < self.frame_length {
            return Err(AudioMatchError::Config(format!(
                "last band boundary {} does not cover frame_length {}",
                last, self.frame_length
            )));
        }
        if !(self.accuracy > 0.0 && self.accuracy <= 1.0) {
            return Err(AudioMatchError::Config(format!(
                "accuracy must be in (0, 1], got {}",
                self.accuracy
            )));
        }
        if self.threshold < 0 {
            return Err(AudioMatchError::Config(format!(
                "threshold must be >= 0, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_length, 1024);
        assert_eq!(config.band_boundaries, [128, 256, 512, 1025]);
    }

    #[test]
    fn test_parse_partial_toml() {
        let toml_str = r#"
            accuracy = 0.8
            threshold = 3
        "#;

        let config: MatchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.threshold, 3);
        assert!((config.accuracy - 0.8).abs() < 1e-12);
        assert_eq!(config.frame_length, 1024);
        assert_eq!(config.intensity, 4);
    }

    #[test]
    fn test_rejects_non_power_of_two_frame() {
        let config = MatchConfig {
            frame_length: 1000,
            ..MatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(AudioMatchError::Config(_))));
    }

    #[test]
    fn test_rejects_unordered_boundaries() {
        let config = MatchConfig {
            band_boundaries: [128, 512, 256, 1025],
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_uncovered_indices() {
        let config = MatchConfig {
            frame_length: 2048,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_accuracy() {
        for accuracy in [0.0, -0.5, 1.5, f64::NAN] {
            let config = MatchConfig {
                accuracy,
                ..MatchConfig::default()
            };
            assert!(config.validate().is_err(), "accuracy {accuracy} accepted");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("audiomatch-no-such-config.toml");
        let err = MatchConfig::load(&path).unwrap_err();
        assert!(matches!(err, AudioMatchError::Io { .. }));
    }
}
