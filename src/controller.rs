//! LearningController - drives a population of independent dendrites.
//!
//! Each patch pairs a reference observation window with its own dendrite.
//! On every step the controller compares each patch's current observation
//! with its reference to produce the expected signal, then runs the
//! dendrite's four-stage cycle.
//!
//! # Example
//!
//! ```
//! use dendrite_learning::{Alphabet, DendriteConfig, LearningController, Result};
//!
//! # fn main() -> Result<()> {
//! let mut controller = LearningController::new(Alphabet::dna(), DendriteConfig::default())?;
//! let patch = controller.add_patch_text("ACGTA", 200, 1)?;
//!
//! // Observation matches the reference, so the expected signal is true
//! let outcomes = controller.step_text(&["ACGTA"])?;
//! assert_eq!(outcomes.len(), 1);
//!
//! let counts = controller.counts(patch)?;
//! assert_eq!(counts.total(), 1);
//! # Ok(())
//! # }
//! ```

use crate::outcome::{ConfusionCounts, Outcome};
use crate::recorder::{LearningTrace, PatchMetadata, PatchSnapshot};
use crate::{Alphabet, Dendrite, DendriteConfig, DendriteError, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a patch within a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatchId(usize);

impl PatchId {
    /// Position of the patch in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

struct Patch {
    reference: Vec<usize>,
    dendrite: Dendrite,
    counts: ConfusionCounts,
}

/// Owns one dendrite per observation patch and steps them in order.
pub struct LearningController {
    alphabet: Alphabet,
    config: DendriteConfig,
    patches: Vec<Patch>,
    num_steps: u64,

    /// Trace being recorded, if any
    trace: Option<LearningTrace>,
    recording: bool,
}

impl LearningController {
    /// Create a controller with no patches.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` fails validation.
    pub fn new(alphabet: Alphabet, config: DendriteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            alphabet,
            config,
            patches: Vec::new(),
            num_steps: 0,
            trace: None,
            recording: false,
        })
    }

    /// Add a patch that learns to fire on `reference`.
    ///
    /// The patch's dendrite has one sensor slot per reference symbol, one
    /// detector class per alphabet symbol, bias 0 and the controller's
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `reference` is empty, holds a symbol
    /// outside the alphabet, or `axis_length` is 0.
    pub fn add_patch(&mut self, reference: Vec<usize>, axis_length: usize, seed: u64) -> Result<PatchId> {
        if let Some(&bad) = reference.iter().find(|&&s| s >= self.alphabet.len()) {
            return Err(DendriteError::InvalidConfiguration(format!(
                "reference symbol {} outside alphabet of {} symbols",
                bad,
                self.alphabet.len()
            )));
        }

        let dendrite = Dendrite::new(
            reference.len(),
            self.alphabet.len(),
            axis_length,
            0.0,
            self.config.clone(),
            seed,
        )?;

        let id = PatchId(self.patches.len());
        log::debug!(
            "patch {} -> dendrite {}: reference {}",
            id.0,
            dendrite.id(),
            self.alphabet.decode(&reference)
        );

        self.patches.push(Patch {
            reference,
            dendrite,
            counts: ConfusionCounts::new(),
        });
        Ok(id)
    }

    /// Add a patch whose reference is given as alphabet characters.
    pub fn add_patch_text(&mut self, reference: &str, axis_length: usize, seed: u64) -> Result<PatchId> {
        let reference = self.alphabet.encode(reference)?;
        self.add_patch(reference, axis_length, seed)
    }

    /// Run one cycle on every patch.
    ///
    /// `observations[i]` is the current window of patch `i`. The expected
    /// signal for a patch is whether its window equals its reference.
    /// Returns the outcome of each patch in order.
    ///
    /// # Errors
    ///
    /// - `InvalidInputSize` if the number of windows, or the length of a
    ///   window, does not match; no patch is stepped.
    /// - `SymbolOutOfRange` if a window holds an index outside the alphabet;
    ///   no patch is stepped.
    /// - The first error from a dendrite cycle. A failing patch does not
    ///   stop the others: every patch is cycled, the step is counted and
    ///   recorded, and only then is the error returned. The failing patch's
    ///   counts are left unchanged.
    pub fn step<O: AsRef<[usize]>>(&mut self, observations: &[O]) -> Result<Vec<Outcome>> {
        if observations.len() != self.patches.len() {
            return Err(DendriteError::InvalidInputSize {
                expected: self.patches.len(),
                actual: observations.len(),
            });
        }
        for (patch, obs) in self.patches.iter().zip(observations) {
            self.check_window(&patch.reference, obs.as_ref())?;
        }

        let mut outcomes = Vec::with_capacity(self.patches.len());
        let mut first_error = None;
        for (i, (patch, obs)) in self.patches.iter_mut().zip(observations).enumerate() {
            let observed = obs.as_ref();
            let expected = observed == patch.reference.as_slice();
            match patch.dendrite.cycle(observed, expected) {
                Ok(outcome) => {
                    patch.counts.record(outcome);
                    outcomes.push(outcome);
                }
                Err(err) => {
                    log::warn!("patch {}: cycle failed: {}", i, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        self.num_steps += 1;
        self.record_current_state(observations);

        match first_error {
            Some(err) => Err(err),
            None => Ok(outcomes),
        }
    }

    /// Run one cycle on every patch, with windows given as alphabet characters.
    pub fn step_text(&mut self, observations: &[&str]) -> Result<Vec<Outcome>> {
        let encoded = observations
            .iter()
            .map(|obs| self.alphabet.encode(obs))
            .collect::<Result<Vec<_>>>()?;
        self.step(&encoded)
    }

    /// Run one cycle on a single patch with an externally supplied expected
    /// signal. The step counter and trace are not touched.
    pub fn step_patch(&mut self, id: PatchId, observed: &[usize], expected: bool) -> Result<Outcome> {
        self.check_window(&self.patch(id)?.reference, observed)?;
        let patch = self
            .patches
            .get_mut(id.0)
            .ok_or(DendriteError::UnknownPatch(id.0))?;
        let outcome = patch.dendrite.cycle(observed, expected)?;
        patch.counts.record(outcome);
        Ok(outcome)
    }

    /// Number of patches.
    pub fn num_patches(&self) -> usize {
        self.patches.len()
    }

    /// Number of completed `step` calls.
    pub fn num_steps(&self) -> u64 {
        self.num_steps
    }

    /// Ids of all patches in insertion order.
    pub fn patch_ids(&self) -> Vec<PatchId> {
        (0..self.patches.len()).map(PatchId).collect()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn config(&self) -> &DendriteConfig {
        &self.config
    }

    pub fn dendrite(&self, id: PatchId) -> Result<&Dendrite> {
        self.patch(id).map(|p| &p.dendrite)
    }

    pub fn dendrite_mut(&mut self, id: PatchId) -> Result<&mut Dendrite> {
        self.patches
            .get_mut(id.0)
            .map(|p| &mut p.dendrite)
            .ok_or(DendriteError::UnknownPatch(id.0))
    }

    pub fn reference(&self, id: PatchId) -> Result<&[usize]> {
        self.patch(id).map(|p| p.reference.as_slice())
    }

    pub fn counts(&self, id: PatchId) -> Result<ConfusionCounts> {
        self.patch(id).map(|p| p.counts)
    }

    /// Outcome tally summed over all patches.
    pub fn total_counts(&self) -> ConfusionCounts {
        self.patches.iter().fold(ConfusionCounts::new(), |mut acc, p| {
            acc.true_positives += p.counts.true_positives;
            acc.false_negatives += p.counts.false_negatives;
            acc.true_negatives += p.counts.true_negatives;
            acc.false_positives += p.counts.false_positives;
            acc
        })
    }

    /// Start recording a trace of every subsequent `step`.
    ///
    /// Any trace already being recorded is discarded.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// controller.start_recording();
    /// controller.step_text(&["ACGTA"])?;
    /// let trace = controller.stop_recording().unwrap();
    /// trace.to_json_file("trace.json")?;
    /// ```
    pub fn start_recording(&mut self) {
        let patches = self
            .patches
            .iter()
            .enumerate()
            .map(|(i, p)| PatchMetadata {
                patch: PatchId(i),
                dendrite_id: p.dendrite.id(),
                reference: p.reference.clone(),
                num_sensors: p.dendrite.num_sensors(),
                num_detectors: p.dendrite.num_detectors(),
                axis_length: p.dendrite.axis_length(),
            })
            .collect();
        self.trace = Some(LearningTrace::new(patches));
        self.recording = true;
    }

    /// Stop recording and return the trace, or `None` if not recording.
    pub fn stop_recording(&mut self) -> Option<LearningTrace> {
        self.recording = false;
        self.trace.take()
    }

    /// Check if recording is currently active.
    pub fn is_recording(&self) -> bool {
        self.recording && self.trace.is_some()
    }

    /// Pause recording without losing accumulated data.
    pub fn pause_recording(&mut self) {
        self.recording = false;
    }

    /// Resume recording after pausing. Does nothing if no trace was started.
    pub fn resume_recording(&mut self) {
        self.recording = self.trace.is_some();
    }

    fn patch(&self, id: PatchId) -> Result<&Patch> {
        self.patches
            .get(id.0)
            .ok_or(DendriteError::UnknownPatch(id.0))
    }

    fn check_window(&self, reference: &[usize], observed: &[usize]) -> Result<()> {
        if observed.len() != reference.len() {
            return Err(DendriteError::InvalidInputSize {
                expected: reference.len(),
                actual: observed.len(),
            });
        }
        match observed.iter().find(|&&s| s >= self.alphabet.len()) {
            Some(&symbol) => Err(DendriteError::SymbolOutOfRange {
                symbol,
                alphabet_len: self.alphabet.len(),
            }),
            None => Ok(()),
        }
    }

    fn record_current_state<O: AsRef<[usize]>>(&mut self, observations: &[O]) {
        if !self.recording {
            return;
        }
        let Some(trace) = self.trace.as_mut() else {
            return;
        };

        let snapshots = self
            .patches
            .iter()
            .zip(observations)
            .map(|(p, obs)| {
                let expected = obs.as_ref() == p.reference.as_slice();
                PatchSnapshot::capture(&p.dendrite, expected)
            })
            .collect();
        trace.record(self.num_steps, snapshots);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> LearningController {
        LearningController::new(Alphabet::dna(), DendriteConfig::default()).unwrap()
    }

    #[test]
    fn test_add_patch() {
        let mut c = controller();
        let id = c.add_patch(vec![0, 1, 2], 50, 0).unwrap();
        assert_eq!(id.index(), 0);
        assert_eq!(c.num_patches(), 1);

        let d = c.dendrite(id).unwrap();
        assert_eq!(d.num_sensors(), 3);
        assert_eq!(d.num_detectors(), 4);
        assert_eq!(d.bias(), 0.0);
    }

    #[test]
    fn test_add_patch_rejects_bad_reference() {
        let mut c = controller();
        assert!(c.add_patch(vec![0, 4], 50, 0).is_err());
        assert!(c.add_patch(vec![], 50, 0).is_err());
        assert!(matches!(
            c.add_patch_text("ACU", 50, 0),
            Err(DendriteError::UnknownSymbol('U'))
        ));
        assert_eq!(c.num_patches(), 0);
    }

    #[test]
    fn test_unknown_patch() {
        let c = controller();
        assert!(matches!(
            c.dendrite(PatchId(3)),
            Err(DendriteError::UnknownPatch(3))
        ));
    }

    #[test]
    fn test_step_wrong_count() {
        let mut c = controller();
        c.add_patch(vec![0, 1], 20, 0).unwrap();
        let result = c.step(&[vec![0, 1], vec![1, 1]]);
        assert!(matches!(
            result,
            Err(DendriteError::InvalidInputSize { expected: 1, actual: 2 })
        ));
        assert_eq!(c.num_steps(), 0);
    }

    #[test]
    fn test_step_wrong_window_length() {
        let mut c = controller();
        c.add_patch(vec![0, 1], 20, 0).unwrap();
        assert!(matches!(
            c.step(&[vec![0, 1, 2]]),
            Err(DendriteError::InvalidInputSize { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_step_symbol_out_of_range() {
        let mut c = controller();
        let id = c.add_patch(vec![0, 1], 20, 0).unwrap();
        let weights = c.dendrite(id).unwrap().weights();

        assert!(matches!(
            c.step(&[vec![0, 4]]),
            Err(DendriteError::SymbolOutOfRange { symbol: 4, alphabet_len: 4 })
        ));
        assert!(matches!(
            c.step_patch(id, &[7, 0], true),
            Err(DendriteError::SymbolOutOfRange { symbol: 7, .. })
        ));
        assert_eq!(c.dendrite(id).unwrap().weights(), weights);
        assert_eq!(c.counts(id).unwrap().total(), 0);
    }
}
