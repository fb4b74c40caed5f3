//! Finite-difference stencils
//!
//! Weights for the `order`-th derivative at an arbitrary point from samples
//! at arbitrary offsets, computed with Fornberg's recursion ("Generation of
//! Finite Difference Formulas on Arbitrarily Spaced Grids", Math. Comp.,
//! 1988). A stencil over `p` points is exact for polynomials of degree
//! `p - 1`.
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::stencil::fd_weights;
//!
//! let w = fd_weights(0.0, &[-1.0, 0.0, 1.0], 2);
//! assert_eq!(w, vec![1.0, -2.0, 1.0]);
//! ```

/// Weights for the `order`-th derivative at `x0` from samples at `nodes`.
///
/// Returns one weight per node; all zeros if `nodes.len() <= order`.
pub fn fd_weights(x0: f64, nodes: &[f64], order: usize) -> Vec<f64> {
    let n = nodes.len();
    if n <= order {
        return vec![0.0; n];
    }

    // c[i][k]: weight of node i for derivative k
    let mut c = vec![vec![0.0; order + 1]; n];
    c[0][0] = 1.0;
    let mut c1 = 1.0;
    let mut c4 = nodes[0] - x0;

    for i in 1..n {
        let mn = i.min(order);
        let mut c2 = 1.0;
        let c5 = c4;
        c4 = nodes[i] - x0;
        for j in 0..i {
            let c3 = nodes[i] - nodes[j];
            c2 *= c3;
            if j == i - 1 {
                for k in (1..=mn).rev() {
                    c[i][k] = c1 * (k as f64 * c[i - 1][k - 1] - c5 * c[i - 1][k]) / c2;
                }
                c[i][0] = -c1 * c5 * c[i - 1][0] / c2;
            }
            for k in (1..=mn).rev() {
                c[j][k] = (c4 * c[j][k] - k as f64 * c[j][k - 1]) / c3;
            }
            c[j][0] = c4 * c[j][0] / c3;
        }
        c1 = c2;
    }

    c.into_iter().map(|row| row[order]).collect()
}

/// Centered and edge-shifted stencils for one derivative order and radius.
///
/// For a trace of `n` samples, sample `i` uses the `2r + 1` nodes centered on
/// it when they fit, otherwise the window is moved inside `[0, n)`. Shifted
/// stencils are precomputed once per distinct offset.
#[derive(Debug, Clone)]
pub struct StencilSet {
    /// Number of nodes per stencil (`2r + 1`, or `n` for short traces).
    width: usize,
    /// `shifted[s]`: weights for a window starting `s` samples before the target.
    shifted: Vec<Vec<f64>>,
}

impl StencilSet {
    /// Build stencils for traces of exactly `n` samples.
    pub fn new(order: usize, radius: usize, n: usize) -> Self {
        let width = (2 * radius + 1).min(n);
        let shifted = (0..width)
            .map(|s| {
                let nodes: Vec<f64> = (0..width).map(|j| j as f64 - s as f64).collect();
                fd_weights(0.0, &nodes, order)
            })
            .collect();
        Self { width, shifted }
    }

    /// Nodes per stencil.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Evaluate at every sample using only in-trace samples.
    pub fn apply_shifted(&self, trace: &[f64], out: &mut [f64]) {
        let n = trace.len();
        let half = self.width / 2;
        for (i, y) in out.iter_mut().enumerate() {
            let start = i.saturating_sub(half).min(n - self.width);
            let weights = &self.shifted[i - start];
            *y = weights
                .iter()
                .zip(&trace[start..start + self.width])
                .map(|(w, x)| w * x)
                .sum();
        }
    }
}

/// Apply centered weights of radius `r` to a trace padded by `r` on each side.
pub fn apply_centered(weights: &[f64], padded: &[f64], out: &mut [f64]) {
    let width = weights.len();
    debug_assert_eq!(padded.len(), out.len() + width - 1);
    for (i, y) in out.iter_mut().enumerate() {
        *y = weights
            .iter()
            .zip(&padded[i..i + width])
            .map(|(w, x)| w * x)
            .sum();
    }
}
