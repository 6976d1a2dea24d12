//! Dendrite - kernel-weighted synapse overlap with error-driven plasticity.
//!
//! A `Dendrite` owns an `NJ x NK` grid of synapses: one per (sensor slot,
//! detector class) pair. Each cycle it samples presynaptic activations from the
//! observed symbols, measures how strongly the active synapses overlap along a
//! 1-D axis, thresholds that excitation into a binary activation, and, only when
//! the activation disagrees with the expected signal, moves weights and
//! locations.
//!
//! # Cycle
//!
//! 1. `update_synapse_activations(observed)` - sample y, derive wy and z
//! 2. `update_dendrite_activation()` - pairwise overlap, excitation, threshold
//! 3. `update_synapse_weights(expected)` - weight rule on prediction error
//! 4. `update_synapse_locations(expected)` - location rule on prediction error
//!
//! `cycle()` runs all four in order.
//!
//! # Examples
//!
//! ```
//! use dendrite_learning::{Dendrite, DendriteConfig};
//!
//! // 5 sensor slots, 4 detector classes, 200 axis samples
//! let mut dendrite = Dendrite::new(5, 4, 200, 0.0, DendriteConfig::default(), 42).unwrap();
//!
//! let observed = [0, 1, 2, 3, 0];
//! dendrite.update_synapse_activations(&observed);
//! dendrite.update_dendrite_activation();
//! dendrite.update_synapse_weights(true).unwrap();
//! dendrite.update_synapse_locations(true);
//!
//! assert_eq!(dendrite.spatial_excitation_profile().len(), 200);
//! ```

use crate::kernel::{affinity_matrix, clamp};
use crate::outcome::Outcome;
use crate::synapse::Synapse;
use crate::{DendriteConfig, DendriteError, Result, ZeroWeightPolicy};
use itertools::iproduct;
use rand::distributions::Open01;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU32, Ordering};

/// A dendrite learning to fire on one reference observation.
///
/// Synapses are stored flat in row-major order: synapse `(j, k)` lives at
/// index `j * NK + k`.
#[derive(Debug, Clone)]
pub struct Dendrite {
    id: u32,
    seed: u64,
    rng: StdRng,
    config: DendriteConfig,

    // Parameters
    num_j: usize,        // Sensor slots
    num_k: usize,        // Detector classes
    num_x: usize,        // Axis samples
    bias: f64,           // Constant excitation offset
    location_scale: f64, // Multiplier on location displacements

    synapses: Vec<Synapse>,

    // Derived per cycle
    excitation: f64,
    profile: Vec<f64>,
    activation: bool,

    // Pairwise kernel over current locations (row-major, n x n)
    affinity: Vec<f64>,
    affinity_stale: bool,
}

impl Dendrite {
    /// Create a dendrite with random weights in [0, 1) and evenly spaced
    /// synapse locations.
    ///
    /// # Arguments
    ///
    /// * `num_j` - Number of sensor slots (NJ)
    /// * `num_k` - Number of detector classes (NK)
    /// * `num_x` - Axis length in samples (NX)
    /// * `bias` - Constant excitation offset
    /// * `config` - Learning tunables
    /// * `seed` - Seed for this dendrite's random generator
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any dimension is zero, `bias` is not
    /// finite, or `config` fails validation.
    pub fn new(
        num_j: usize,
        num_k: usize,
        num_x: usize,
        bias: f64,
        config: DendriteConfig,
        seed: u64,
    ) -> Result<Self> {
        static NEXT_ID: AtomicU32 = AtomicU32::new(0);

        config.validate()?;
        if num_j == 0 || num_k == 0 || num_x == 0 {
            return Err(DendriteError::InvalidConfiguration(format!(
                "dendrite dimensions must be > 0 (got NJ={}, NK={}, NX={})",
                num_j, num_k, num_x
            )));
        }
        if !bias.is_finite() {
            return Err(DendriteError::InvalidConfiguration(format!(
                "bias must be finite (got {})",
                bias
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let num_s = num_j * num_k;
        let spacing = num_x as f64 / (num_s + 1) as f64;

        let synapses: Vec<Synapse> = iproduct!(0..num_j, 0..num_k)
            .map(|(j, k)| {
                let location = (j * num_k + k + 1) as f64 * spacing;
                Synapse::new(rng.gen::<f64>(), location, num_x)
            })
            .collect();

        let location_scale = config.location_scale.unwrap_or(num_x as f64);

        Ok(Self {
            id: NEXT_ID.fetch_add(1, Ordering::SeqCst),
            seed,
            rng,
            config,
            num_j,
            num_k,
            num_x,
            bias,
            location_scale,
            synapses,
            excitation: bias,
            profile: vec![bias; num_x],
            activation: false,
            affinity: Vec::with_capacity(num_s * num_s),
            affinity_stale: true,
        })
    }

    /// Sample presynaptic activations from the observed symbols.
    ///
    /// For synapse `(j, k)` the presynaptic activation is 1 when slot `j`
    /// observes symbol `k` and a uniform draw exceeds `synapse_noise`, or when
    /// it does not and the draw falls below `synapse_noise`. Draws are taken in
    /// row-major synapse order.
    ///
    /// # Panics
    ///
    /// Panics if `observed.len() != NJ` or any symbol is `>= NK`.
    pub fn update_synapse_activations(&mut self, observed: &[usize]) {
        assert_eq!(
            observed.len(),
            self.num_j,
            "observed must hold one symbol per sensor slot"
        );

        let p = self.config.synapse_noise;
        let width = self.config.kernel_width;

        for (j, &symbol) in observed.iter().enumerate() {
            assert!(
                symbol < self.num_k,
                "observed symbol out of range (got {} >= {})",
                symbol,
                self.num_k
            );

            for k in 0..self.num_k {
                // Open interval so p = 0 never flips and p = 1 always does
                let t: f64 = self.rng.sample(Open01);
                let y = if symbol == k { t > p } else { t < p };
                self.synapses[j * self.num_k + k].activate(y, width);
            }
        }
    }

    /// Recompute scalar and spatial excitation, then threshold.
    ///
    /// Every ordered pair of synapses `(S0, S1)`, self-pairs included, adds
    /// `wy0 * wy1 * kernel(x0, x1)` to `S0`'s contribution and `z0[x] * z1[x]`
    /// to the spatial profile. The activation is set when the excitation
    /// strictly exceeds `dendrite_threshold`.
    pub fn update_dendrite_activation(&mut self) {
        self.refresh_affinity();

        let n = self.synapses.len();
        self.excitation = self.bias;
        self.profile.fill(self.bias);

        for s0 in 0..n {
            let wy0 = self.synapses[s0].activation;
            let row = &self.affinity[s0 * n..(s0 + 1) * n];
            let mut a = 0.0;
            for (s1, k) in self.synapses.iter().zip(row) {
                a += wy0 * s1.activation * k;
            }
            self.synapses[s0].contribution = a;
            self.excitation += a;
        }

        // sum over pairs of z0[x] * z1[x] == (sum of z[x])^2
        let mut column = vec![0.0; self.num_x];
        for s in &self.synapses {
            for (c, z) in column.iter_mut().zip(&s.profile) {
                *c += z;
            }
        }
        for (d, c) in self.profile.iter_mut().zip(&column) {
            *d += c * c;
        }

        let drive = if self.config.dendrite_noise > 0.0 {
            let u: f64 = self.rng.gen();
            self.excitation + self.config.dendrite_noise * (u - 0.5)
        } else {
            self.excitation
        };
        self.activation = drive > self.config.dendrite_threshold;

        log::trace!(
            "dendrite {}: excitation {:.6}, activation {}",
            self.id,
            self.excitation,
            self.activation
        );
    }

    /// Apply the weight rule if the activation disagrees with `expected`.
    ///
    /// `weight += eta_w * (expected - activation) * contribution / weight`
    ///
    /// # Errors
    ///
    /// Under `ZeroWeightPolicy::Reject`, returns `DegenerateWeight` for the
    /// first synapse with a weight of exactly 0. No weight is changed.
    pub fn update_synapse_weights(&mut self, expected: bool) -> Result<()> {
        if expected == self.activation {
            return Ok(());
        }

        let policy = self.config.zero_weight_policy;
        if policy == ZeroWeightPolicy::Reject {
            if let Some(s) = self.synapses.iter().position(|s| s.weight == 0.0) {
                let (sensor, detector) = (s / self.num_k, s % self.num_k);
                log::warn!(
                    "dendrite {}: weight update rejected, zero weight at ({}, {})",
                    self.id,
                    sensor,
                    detector
                );
                return Err(DendriteError::DegenerateWeight { sensor, detector });
            }
        }

        let err = self.prediction_error(expected);
        let eta = self.config.eta_w;
        let mut skipped = 0usize;
        let mut total_dw = 0.0;

        for s in self.synapses.iter_mut() {
            if s.weight == 0.0 {
                match policy {
                    ZeroWeightPolicy::Floor(floor) => s.weight = floor,
                    _ => {
                        skipped += 1;
                        continue;
                    }
                }
            }
            let dw = eta * err * s.contribution / s.weight;
            s.weight += dw;
            total_dw += dw.abs();
        }

        if skipped > 0 {
            log::warn!(
                "dendrite {}: skipped {} zero-weight synapses",
                self.id,
                skipped
            );
        }
        log::debug!(
            "dendrite {}: weight update, error {:+}, mean |dw| {:.3e}",
            self.id,
            err,
            total_dw / self.synapses.len() as f64
        );

        Ok(())
    }

    /// Apply the location rule if the activation disagrees with `expected`.
    ///
    /// Every displacement is computed from the locations as they stand before
    /// the call, then all are applied together:
    ///
    /// `dX0 = -eta_x * (expected - activation) * sum_1 (x1 - x0) * wy0 * wy1 * kernel(x0, x1)`
    ///
    /// `x0 = clamp(x0 + dX0 * location_scale, 0, NX)`
    pub fn update_synapse_locations(&mut self, expected: bool) {
        if expected == self.activation {
            return;
        }

        self.refresh_affinity();

        let n = self.synapses.len();
        let scale = -self.config.eta_x * self.prediction_error(expected);

        let displacements: Vec<f64> = (0..n)
            .map(|s0| {
                let x0 = self.synapses[s0].location;
                let wy0 = self.synapses[s0].activation;
                let row = &self.affinity[s0 * n..(s0 + 1) * n];
                let pull: f64 = self
                    .synapses
                    .iter()
                    .zip(row)
                    .map(|(s1, k)| (s1.location - x0) * wy0 * s1.activation * k)
                    .sum();
                scale * pull
            })
            .collect();

        let hi = self.num_x as f64;
        let mut total_dx = 0.0;
        for (s, dx) in self.synapses.iter_mut().zip(&displacements) {
            s.location = clamp(s.location + dx * self.location_scale, 0.0, hi);
            total_dx += dx.abs();
        }
        self.affinity_stale = true;

        log::debug!(
            "dendrite {}: location update, mean |dx| {:.3e}",
            self.id,
            total_dx / n as f64
        );
    }

    /// Run one full learning cycle and report the outcome.
    ///
    /// If the weight stage fails, neither weights nor locations change.
    pub fn cycle(&mut self, observed: &[usize], expected: bool) -> Result<Outcome> {
        self.update_synapse_activations(observed);
        self.update_dendrite_activation();
        let outcome = Outcome::from_prediction(expected, self.activation);
        self.update_synapse_weights(expected)?;
        self.update_synapse_locations(expected);
        Ok(outcome)
    }

    /// Unique dendrite id (used in log output).
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Seed the random generator was created from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Configuration in use.
    pub fn config(&self) -> &DendriteConfig {
        &self.config
    }

    /// Number of sensor slots (NJ).
    #[inline]
    pub fn num_sensors(&self) -> usize {
        self.num_j
    }

    /// Number of detector classes (NK).
    #[inline]
    pub fn num_detectors(&self) -> usize {
        self.num_k
    }

    /// Axis length in samples (NX).
    #[inline]
    pub fn axis_length(&self) -> usize {
        self.num_x
    }

    /// Multiplier applied to location displacements.
    #[inline]
    pub fn location_scale(&self) -> f64 {
        self.location_scale
    }

    #[inline]
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Change the bias; takes effect at the next `update_dendrite_activation`.
    pub fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }

    /// Binary activation from the last threshold.
    #[inline]
    pub fn activation(&self) -> bool {
        self.activation
    }

    /// Scalar excitation (Da) from the last activation update.
    #[inline]
    pub fn scalar_excitation(&self) -> f64 {
        self.excitation
    }

    /// Spatial excitation profile (Dz) from the last activation update.
    #[inline]
    pub fn spatial_excitation_profile(&self) -> &[f64] {
        &self.profile
    }

    /// Synapse for sensor slot `j` and detector class `k`.
    ///
    /// # Panics
    ///
    /// Panics if `j >= NJ` or `k >= NK`.
    pub fn synapse(&self, j: usize, k: usize) -> &Synapse {
        &self.synapses[self.index(j, k)]
    }

    /// All synapses in row-major order.
    pub fn synapses(&self) -> &[Synapse] {
        &self.synapses
    }

    /// Weights in row-major order.
    pub fn weights(&self) -> Vec<f64> {
        self.synapses.iter().map(|s| s.weight).collect()
    }

    /// Locations in row-major order.
    pub fn locations(&self) -> Vec<f64> {
        self.synapses.iter().map(|s| s.location).collect()
    }

    /// Overwrite one synapse weight.
    pub fn set_weight(&mut self, j: usize, k: usize, weight: f64) {
        let s = self.index(j, k);
        self.synapses[s].weight = weight;
    }

    /// Overwrite one synapse location, clamped to [0, NX].
    pub fn set_location(&mut self, j: usize, k: usize, location: f64) {
        let s = self.index(j, k);
        self.synapses[s].location = clamp(location, 0.0, self.num_x as f64);
        self.affinity_stale = true;
    }

    /// Estimate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        let mut bytes = std::mem::size_of::<Self>();

        bytes += self.synapses.capacity() * std::mem::size_of::<Synapse>();
        for s in &self.synapses {
            bytes += s.profile.capacity() * std::mem::size_of::<f64>();
        }
        bytes += self.profile.capacity() * std::mem::size_of::<f64>();
        bytes += self.affinity.capacity() * std::mem::size_of::<f64>();

        bytes
    }

    #[inline]
    fn index(&self, j: usize, k: usize) -> usize {
        assert!(j < self.num_j, "sensor index out of bounds");
        assert!(k < self.num_k, "detector index out of bounds");
        j * self.num_k + k
    }

    /// expected - activation, as -1.0 or 1.0
    #[inline]
    fn prediction_error(&self, expected: bool) -> f64 {
        f64::from(expected as u8) - f64::from(self.activation as u8)
    }

    fn refresh_affinity(&mut self) {
        if !self.affinity_stale {
            return;
        }
        let locations = self.locations();
        affinity_matrix(&locations, self.config.kernel_width, &mut self.affinity);
        self.affinity_stale = false;
    }
}
