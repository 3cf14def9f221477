//! Tunables of the red-eye pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, invalid};

/// Parameters for [`RedEyeTool`](crate::redeye::RedEyeTool). The default is
/// the calibrated setting; fields absent from JSON take their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedEyeConfig {
    /// CIELab `a*` of canonical red-eye red. Default: 62.
    #[serde(default = "RedEyeConfig::default_reference_a")]
    pub reference_a: f64,
    /// CIELab `b*` of canonical red-eye red. Default: 30.
    #[serde(default = "RedEyeConfig::default_reference_b")]
    pub reference_b: f64,
    /// Redness above this value marks a pixel as red-eye. Default: 175.
    #[serde(default = "RedEyeConfig::default_mask_threshold")]
    pub mask_threshold: u8,
    /// Threshold applied after the denoising blur. Default: 1.
    #[serde(default = "RedEyeConfig::default_denoise_threshold")]
    pub denoise_threshold: u8,
    /// Gaussian kernel size for denoising and edge softening. Must be odd.
    /// Default: 3.
    #[serde(default = "RedEyeConfig::default_blur_size")]
    pub blur_size: usize,
    /// Gaussian amount (standard deviation × 20). Default: 15.
    #[serde(default = "RedEyeConfig::default_blur_amount")]
    pub blur_amount: f32,
}

impl RedEyeConfig {
    fn default_reference_a() -> f64 {
        62.0
    }

    fn default_reference_b() -> f64 {
        30.0
    }

    fn default_mask_threshold() -> u8 {
        175
    }

    fn default_denoise_threshold() -> u8 {
        1
    }

    fn default_blur_size() -> usize {
        3
    }

    fn default_blur_amount() -> f32 {
        15.0
    }

    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.reference_a.is_finite() && self.reference_b.is_finite()) {
            return Err(invalid(format!(
                "reference chromaticity ({}, {}) must be finite",
                self.reference_a, self.reference_b
            )));
        }
        if self.blur_size % 2 == 0 {
            return Err(invalid(format!(
                "blur size {} must be odd",
                self.blur_size
            )));
        }
        if !(self.blur_amount.is_finite() && self.blur_amount > 0.0) {
            return Err(invalid(format!(
                "blur amount {} must be positive",
                self.blur_amount
            )));
        }
        Ok(())
    }
}

impl Default for RedEyeConfig {
    fn default() -> Self {
        Self {
            reference_a: Self::default_reference_a(),
            reference_b: Self::default_reference_b(),
            mask_threshold: Self::default_mask_threshold(),
            denoise_threshold: Self::default_denoise_threshold(),
            blur_size: Self::default_blur_size(),
            blur_amount: Self::default_blur_amount(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RedEyeError;

    #[test]
    fn test_default_is_valid() {
        let config = RedEyeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mask_threshold, 175);
        assert_eq!(config.blur_size, 3);
    }

    #[test]
    fn test_json_round_trip() {
        let config = RedEyeConfig {
            mask_threshold: 160,
            blur_size: 5,
            ..RedEyeConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(RedEyeConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = RedEyeConfig::from_json(r#"{ "blur_amount": 20.0 }"#).unwrap();
        assert_eq!(config.blur_amount, 20.0);
        assert_eq!(config.reference_a, 62.0);
        assert_eq!(config.denoise_threshold, 1);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            RedEyeConfig::from_json(r#"{ "blur_size": 4 }"#),
            Err(RedEyeError::InvalidParameter(_))
        ));
        assert!(matches!(
            RedEyeConfig::from_json(r#"{ "blur_amount": 0.0 }"#),
            Err(RedEyeError::InvalidParameter(_))
        ));
        assert!(matches!(
            RedEyeConfig::from_json(r#"{ "mask_threshold": 300 }"#),
            Err(RedEyeError::Config(_))
        ));
        assert!(matches!(
            RedEyeConfig::from_json("not json"),
            Err(RedEyeError::Config(_))
        ));
    }
}
