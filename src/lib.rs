//! Dendrite Learning - error-driven dendrites with kernel-weighted synapse overlap
//!
//! Each dendrite watches a short window of categorical symbols through a grid
//! of synapses, one per (sensor slot, detector class) pair. Synapses carry a
//! weight and a location on a 1-D axis. A dendrite's excitation is a
//! kernel-density style self-similarity of its active synapses: it is large when
//! strongly weighted active synapses sit close together. When the thresholded
//! activation disagrees with the expected signal, two plasticity rules reshape
//! both the weights and the locations.
//!
//! # Architecture
//!
//! - **kernel**: Gaussian influence between two positions
//! - **Synapse**: weight, location and per-cycle activation values
//! - **Dendrite**: synapse grid, excitation, threshold and plasticity
//! - **LearningController**: one dendrite per observation patch, driven in order
//! - **LearningTrace**: JSON traces of excitation, weights and locations
//!
//! # Examples
//!
//! ## Driving a single dendrite
//!
//! ```
//! use dendrite_learning::{Dendrite, DendriteConfig};
//!
//! let mut dendrite = Dendrite::new(1, 2, 100, 0.0, DendriteConfig::default(), 0).unwrap();
//! dendrite.set_weight(0, 0, 1.0);
//!
//! // Slot 0 observes symbol 0: only synapse (0, 0) is active
//! dendrite.update_synapse_activations(&[0]);
//! dendrite.update_dendrite_activation();
//! assert_eq!(dendrite.scalar_excitation(), 1.0);
//! assert!(dendrite.activation());
//!
//! // Firing was wrong: the active weight shrinks
//! dendrite.update_synapse_weights(false).unwrap();
//! dendrite.update_synapse_locations(false);
//! assert!(dendrite.synapse(0, 0).weight() < 1.0);
//! ```
//!
//! ## Patches over a symbol sequence
//!
//! ```
//! use dendrite_learning::{Alphabet, DendriteConfig, LearningController};
//!
//! let mut controller = LearningController::new(Alphabet::dna(), DendriteConfig::default()).unwrap();
//! controller.add_patch_text("GATTA", 200, 1).unwrap();
//! controller.add_patch_text("CCGTA", 200, 2).unwrap();
//!
//! let outcomes = controller.step_text(&["GATTA", "CCGTT"]).unwrap();
//! assert_eq!(outcomes.len(), 2);
//! ```

pub mod alphabet;
pub mod config;
pub mod controller;
pub mod dendrite;
pub mod error;
pub mod kernel;
pub mod outcome;
pub mod recorder;
pub mod synapse;

// Re-exports for convenient access
pub use alphabet::Alphabet;
pub use config::{DendriteConfig, ZeroWeightPolicy};
pub use controller::{LearningController, PatchId};
pub use dendrite::Dendrite;
pub use error::{DendriteError, Result};
pub use kernel::kernel;
pub use outcome::{ConfusionCounts, Outcome};
pub use recorder::{CycleSnapshot, LearningTrace, PatchMetadata, PatchSnapshot};
pub use synapse::Synapse;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = "Dendrite Learning";

/// Get version string
pub fn version() -> String {
    format!("{} v{}", NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(ver.contains("Dendrite Learning"));
        assert!(ver.contains(VERSION));
    }

    #[test]
    fn test_re_exports() {
        let _config = DendriteConfig::default();
        let _result: Result<()> = Ok(());
        assert_eq!(kernel(1.0, 1.0, 1.0, 1.0), 1.0);
    }
}
