//! Per-cycle traces of dendrite state for display and evaluation.
//!
//! While recording, the controller appends one [`CycleSnapshot`] per step to a
//! [`LearningTrace`]. The finished trace exports to JSON for plotting
//! excitation profiles, weights and locations outside the library.

use crate::controller::PatchId;
use crate::outcome::Outcome;
use crate::{Dendrite, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static description of one patch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchMetadata {
    pub patch: PatchId,
    pub dendrite_id: u32,
    pub reference: Vec<usize>,
    pub num_sensors: usize,
    pub num_detectors: usize,
    pub axis_length: usize,
}

/// State of one dendrite at the end of a cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatchSnapshot {
    pub expected: bool,
    pub activation: bool,
    pub outcome: Outcome,
    pub scalar_excitation: f64,
    pub spatial_excitation_profile: Vec<f64>,
    pub weights: Vec<f64>,
    pub locations: Vec<f64>,
}

impl PatchSnapshot {
    pub fn capture(dendrite: &Dendrite, expected: bool) -> Self {
        Self {
            expected,
            activation: dendrite.activation(),
            outcome: Outcome::from_prediction(expected, dendrite.activation()),
            scalar_excitation: dendrite.scalar_excitation(),
            spatial_excitation_profile: dendrite.spatial_excitation_profile().to_vec(),
            weights: dendrite.weights(),
            locations: dendrite.locations(),
        }
    }
}

/// All patches after one controller step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleSnapshot {
    /// Controller step this snapshot was taken after (1-based)
    pub step_number: u64,
    pub patches: Vec<PatchSnapshot>,
}

/// Complete learning trace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningTrace {
    pub patches: Vec<PatchMetadata>,
    pub steps: Vec<CycleSnapshot>,
    /// Number of recorded steps
    pub total_steps: usize,
}

impl LearningTrace {
    /// Empty trace over the given patches.
    pub fn new(patches: Vec<PatchMetadata>) -> Self {
        Self {
            patches,
            steps: Vec::new(),
            total_steps: 0,
        }
    }

    /// Append the state of every patch after controller step `step_number`.
    pub fn record(&mut self, step_number: u64, patches: Vec<PatchSnapshot>) {
        self.steps.push(CycleSnapshot {
            step_number,
            patches,
        });
        self.total_steps = self.steps.len();
    }

    /// Export trace to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Export trace to JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Import trace from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Import trace from JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
