//! Tests for the Gaussian kernel and pairwise affinity matrix.

use approx::assert_relative_eq;
use dendrite_learning::kernel::{affinity_matrix, clamp, kernel};
use proptest::prelude::*;

#[test]
fn test_kernel_zero_distance_is_amplitude() {
    for amp in [0.0, 0.5, 1.0, 3.0] {
        assert_eq!(kernel(42.0, 42.0, amp, 100.0), amp);
    }
}

#[test]
fn test_kernel_decays_with_distance() {
    let near = kernel(0.0, 10.0, 1.0, 100.0);
    let far = kernel(0.0, 50.0, 1.0, 100.0);
    assert!(near > far);
    assert!(far > 0.0);
}

#[test]
fn test_kernel_width_controls_spread() {
    // Broader kernels overlap more at the same distance
    assert!(kernel(0.0, 30.0, 1.0, 100.0) > kernel(0.0, 30.0, 1.0, 10.0));
}

#[test]
fn test_kernel_known_value() {
    // 2 widths away: exp(-2)
    assert_relative_eq!(kernel(10.0, 30.0, 1.0, 10.0), (-2.0f64).exp(), max_relative = 1e-12);
}

#[test]
fn test_affinity_matrix_diagonal_and_symmetry() {
    let locs = [5.0, 17.5, 90.0, 91.0];
    let mut m = Vec::new();
    affinity_matrix(&locs, 25.0, &mut m);

    let n = locs.len();
    for i in 0..n {
        assert_eq!(m[i * n + i], 1.0);
        for j in 0..n {
            assert_eq!(m[i * n + j], m[j * n + i]);
        }
    }
    // Closest pair has the largest off-diagonal entry
    assert!(m[2 * n + 3] > m[1]);
}

#[test]
fn test_clamp_bounds() {
    assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
    assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
    assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
}

// =============================================================================
// Property-Based Tests
// =============================================================================

proptest! {
    #[test]
    fn prop_kernel_symmetric(
        a in -1.0e4..1.0e4f64,
        b in -1.0e4..1.0e4f64,
        amp in 0.0..10.0f64,
        width in 0.01..1000.0f64,
    ) {
        prop_assert_eq!(kernel(a, b, amp, width), kernel(b, a, amp, width));
    }

    #[test]
    fn prop_kernel_bounded_by_amplitude(
        a in -1.0e4..1.0e4f64,
        b in -1.0e4..1.0e4f64,
        amp in 0.0..10.0f64,
        width in 0.01..1000.0f64,
    ) {
        let k = kernel(a, b, amp, width);
        prop_assert!(k >= 0.0);
        prop_assert!(k <= amp);
    }

    #[test]
    fn prop_clamp_in_range(x in -1.0e6..1.0e6f64, hi in 0.0..1.0e3f64) {
        let c = clamp(x, 0.0, hi);
        prop_assert!(c >= 0.0 && c <= hi);
    }
}
