//! Gaussian kernel used for receptive fields and synapse affinity.
//!
//! The same function serves two purposes: it shapes a synapse's receptive
//! field along the dendrite axis, and it weights the interaction between two
//! synapses by how close their locations are.

/// Symmetric Gaussian influence between positions `x` and `y`.
///
/// `amplitude * exp(-0.5 * (x - y)^2 / width^2)`
///
/// # Examples
///
/// ```
/// use dendrite_learning::kernel::kernel;
///
/// assert_eq!(kernel(3.0, 3.0, 1.0, 100.0), 1.0);
/// assert_eq!(kernel(0.0, 50.0, 1.0, 10.0), kernel(50.0, 0.0, 1.0, 10.0));
/// ```
#[inline]
pub fn kernel(x: f64, y: f64, amplitude: f64, width: f64) -> f64 {
    let d = x - y;
    amplitude * (-0.5 * (d * d) / (width * width)).exp()
}

/// Clamp `x` into `[lo, hi]`.
///
/// Unlike `f64::clamp` this never panics; a NaN input maps to `lo`.
///
/// # Examples
///
/// ```
/// use dendrite_learning::kernel::clamp;
///
/// assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
/// assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
/// assert_eq!(clamp(4.5, 0.0, 10.0), 4.5);
/// ```
#[inline]
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    hi.min(lo.max(x))
}

/// Fill `out` with the row-major pairwise kernel matrix of `locations`.
///
/// `out[i * n + j] = kernel(locations[i], locations[j], 1, width)`. The matrix
/// is symmetric with ones on the diagonal.
pub fn affinity_matrix(locations: &[f64], width: f64, out: &mut Vec<f64>) {
    let n = locations.len();
    out.clear();
    out.resize(n * n, 0.0);

    for i in 0..n {
        out[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let k = kernel(locations[i], locations[j], 1.0, width);
            out[i * n + j] = k;
            out[j * n + i] = k;
        }
    }
}
