//! Dendrite configuration.
//!
//! All tunables of the learning engine live in one [`DendriteConfig`] value
//! handed to each dendrite at construction. Configurations serialize to JSON so
//! an experiment can be described in a file and reloaded.
//!
//! # Example
//!
//! ```
//! use dendrite_learning::{DendriteConfig, ZeroWeightPolicy};
//!
//! let config = DendriteConfig {
//!     kernel_width: 20.0,
//!     zero_weight_policy: ZeroWeightPolicy::Skip,
//!     ..DendriteConfig::default()
//! };
//! config.validate().unwrap();
//!
//! let json = config.to_json().unwrap();
//! let restored = DendriteConfig::from_json(&json).unwrap();
//! assert_eq!(config, restored);
//! ```

use crate::{DendriteError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default Gaussian kernel width (lambda).
pub const DEFAULT_KERNEL_WIDTH: f64 = 100.0;

/// Default weight learning rate.
pub const DEFAULT_ETA_W: f64 = 0.002;

/// Default location learning rate.
pub const DEFAULT_ETA_X: f64 = 0.00002;

/// Default dendrite activation threshold.
pub const DEFAULT_DENDRITE_THRESHOLD: f64 = 0.9;

/// What a weight update does with a synapse whose weight is exactly zero.
///
/// The weight rule divides by the current weight, so a zero weight has no
/// defined update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ZeroWeightPolicy {
    /// Fail the whole update with `DegenerateWeight`; no weight is changed
    Reject,
    /// Leave zero-weight synapses untouched and update the rest
    Skip,
    /// Raise a zero weight to the given floor before applying the rule
    Floor(f64),
}

impl Default for ZeroWeightPolicy {
    fn default() -> Self {
        ZeroWeightPolicy::Reject
    }
}

/// Tunables for one dendrite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DendriteConfig {
    /// Gaussian kernel width; larger means broader, more overlapping fields
    pub kernel_width: f64,
    /// Weight learning rate
    pub eta_w: f64,
    /// Location learning rate
    pub eta_x: f64,
    /// Probability of flipping a presynaptic activation
    pub synapse_noise: f64,
    /// Amplitude of uniform jitter added to the excitation before thresholding
    pub dendrite_noise: f64,
    /// Excitation must strictly exceed this to activate
    pub dendrite_threshold: f64,
    /// Multiplier on location displacements; `None` uses the axis length
    pub location_scale: Option<f64>,
    /// Handling of zero weights during a weight update
    pub zero_weight_policy: ZeroWeightPolicy,
}

impl Default for DendriteConfig {
    fn default() -> Self {
        Self {
            kernel_width: DEFAULT_KERNEL_WIDTH,
            eta_w: DEFAULT_ETA_W,
            eta_x: DEFAULT_ETA_X,
            synapse_noise: 0.0,
            dendrite_noise: 0.0,
            dendrite_threshold: DEFAULT_DENDRITE_THRESHOLD,
            location_scale: None,
            zero_weight_policy: ZeroWeightPolicy::default(),
        }
    }
}

impl DendriteConfig {
    /// Check that every value keeps the computation finite.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if:
    /// - `kernel_width` is not finite and positive
    /// - `synapse_noise` lies outside [0, 1]
    /// - `dendrite_noise` is negative or not finite
    /// - a learning rate, the threshold or `location_scale` is not finite
    /// - a `Floor` zero-weight policy has a zero or non-finite floor
    pub fn validate(&self) -> Result<()> {
        if !(self.kernel_width.is_finite() && self.kernel_width > 0.0) {
            return Err(invalid(format!(
                "kernel_width must be finite and > 0 (got {})",
                self.kernel_width
            )));
        }
        check_probability("synapse_noise", self.synapse_noise)?;
        if !(self.dendrite_noise.is_finite() && self.dendrite_noise >= 0.0) {
            return Err(invalid(format!(
                "dendrite_noise must be finite and >= 0 (got {})",
                self.dendrite_noise
            )));
        }
        check_finite("eta_w", self.eta_w)?;
        check_finite("eta_x", self.eta_x)?;
        check_finite("dendrite_threshold", self.dendrite_threshold)?;
        if let Some(scale) = self.location_scale {
            check_finite("location_scale", scale)?;
        }
        if let ZeroWeightPolicy::Floor(floor) = self.zero_weight_policy {
            if !floor.is_finite() || floor == 0.0 {
                return Err(invalid(format!(
                    "zero weight floor must be finite and non-zero (got {})",
                    floor
                )));
            }
        }
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write the configuration to a JSON file.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

fn invalid(msg: String) -> DendriteError {
    DendriteError::InvalidConfiguration(msg)
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(format!("{} must be finite (got {})", name, value)))
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{} must be in [0, 1] (got {})", name, value)))
    }
}
