//! Synapse - weight, location and per-cycle activation state.
//!
//! A synapse pairs one sensor slot with one detector class. Its weight and
//! location are learned and persist across cycles; everything else is derived
//! afresh each cycle by the owning [`Dendrite`](crate::Dendrite).

use crate::kernel::kernel;

/// One synapse on a dendrite.
#[derive(Debug, Clone, PartialEq)]
pub struct Synapse {
    /// Synaptic strength (unipolar, not clamped)
    pub(crate) weight: f64,
    /// Position along the dendrite axis, kept within [0, NX]
    pub(crate) location: f64,
    /// Presynaptic activation y (0 or 1)
    pub(crate) presynaptic: u8,
    /// Synaptic activation wy = weight * y
    pub(crate) activation: f64,
    /// Share of the dendrite's scalar excitation
    pub(crate) contribution: f64,
    /// Kernel-weighted influence at each axis sample
    pub(crate) profile: Vec<f64>,
}

impl Synapse {
    pub(crate) fn new(weight: f64, location: f64, num_x: usize) -> Self {
        Self {
            weight,
            location,
            presynaptic: 0,
            activation: 0.0,
            contribution: 0.0,
            profile: vec![0.0; num_x],
        }
    }

    /// Set y, derive wy and redraw the spatial profile.
    pub(crate) fn activate(&mut self, presynaptic: bool, width: f64) {
        self.presynaptic = presynaptic as u8;
        self.activation = self.weight * f64::from(self.presynaptic);

        let wy = self.activation;
        let loc = self.location;
        for (x, z) in self.profile.iter_mut().enumerate() {
            *z = wy * kernel(x as f64, loc, 1.0, width);
        }
    }

    /// Current weight.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Current location on the dendrite axis.
    #[inline]
    pub fn location(&self) -> f64 {
        self.location
    }

    /// Presynaptic activation from the last sampling stage.
    #[inline]
    pub fn presynaptic_activation(&self) -> bool {
        self.presynaptic != 0
    }

    /// Weight times presynaptic activation.
    #[inline]
    pub fn synaptic_activation(&self) -> f64 {
        self.activation
    }

    /// This synapse's share of the last scalar excitation.
    #[inline]
    pub fn excitation_contribution(&self) -> f64 {
        self.contribution
    }

    /// Receptive-field profile sampled along the axis.
    #[inline]
    pub fn spatial_profile(&self) -> &[f64] {
        &self.profile
    }
}
