//! Hilbert Transform — Real trace to analytic signal
//!
//! Builds the analytic signal `x + j·H{x}` of a seismic trace with a
//! windowed FIR Hilbert transformer. Unlike a streaming filter, the kernel is
//! applied centered on each sample (zero delay), reading `m` samples of
//! padding on each side of the trace.
//!
//! ## Kernel
//!
//! ```text
//!   h[k] = 2 / (π·k) · w(k)    k odd
//!   h[k] = 0                   k even (including k = 0)
//! ```
//!
//! `w` is a Hamming window over the `2m + 1` taps. The kernel is
//! antisymmetric, so its response is purely imaginary, and it is scaled to
//! unit gain at a quarter of the sampling rate.
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::hilbert::HilbertKernel;
//!
//! let kernel = HilbertKernel::new(12);
//! let n = 128;
//! let m = kernel.radius();
//! // Tone at a quarter of the sampling rate, already padded by m samples
//! let padded: Vec<f64> = (0..n + 2 * m)
//!     .map(|i| (std::f64::consts::FRAC_PI_2 * i as f64).cos())
//!     .collect();
//! let analytic = kernel.analytic(&padded);
//! assert_eq!(analytic.len(), n);
//! assert!(analytic.iter().all(|z| (z.norm() - 1.0).abs() < 1e-9));
//! ```

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::types::Sample;

/// Antisymmetric FIR Hilbert kernel of half-width `m`.
#[derive(Debug, Clone, PartialEq)]
pub struct HilbertKernel {
    /// Taps for offsets `-m..=m`; index `m` is the center.
    taps: Vec<f64>,
    radius: usize,
}

impl HilbertKernel {
    /// Design a kernel with `2·radius + 1` taps.
    ///
    /// A radius of 0 is raised to 1, the smallest kernel with a non-zero tap.
    pub fn new(radius: usize) -> Self {
        let radius = radius.max(1);
        Self {
            taps: Self::design_taps(radius),
            radius,
        }
    }

    /// Hamming-windowed ideal response, normalized at quarter rate.
    fn design_taps(m: usize) -> Vec<f64> {
        let num_taps = 2 * m + 1;
        let mut taps = vec![0.0; num_taps];
        for (i, tap) in taps.iter_mut().enumerate() {
            let k = i as i64 - m as i64;
            if k % 2 == 0 {
                continue;
            }
            let h = 2.0 / (PI * k as f64);
            let w = 0.54 - 0.46 * (2.0 * PI * i as f64 / (num_taps - 1) as f64).cos();
            *tap = h * w;
        }

        // Magnitude response at ω = π/2 is 2·Σ h[k]·sin(kπ/2) over k > 0
        let gain: f64 = (1..=m)
            .map(|k| taps[m + k] * (PI / 2.0 * k as f64).sin())
            .sum::<f64>()
            * 2.0;
        for tap in &mut taps {
            *tap /= gain;
        }
        taps
    }

    /// Half-width of the kernel; the padding it reads on each side.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of taps (`2m + 1`).
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Filter taps, center at index `radius()`.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Magnitude response at normalized angular frequency `omega` (rad/sample).
    pub fn gain(&self, omega: f64) -> f64 {
        let m = self.radius;
        2.0 * (1..=m)
            .map(|k| self.taps[m + k] * (omega * k as f64).sin())
            .sum::<f64>()
    }

    /// Quadrature component at each unpadded position.
    ///
    /// `padded` holds the trace with `radius()` samples of padding on each
    /// side; the output has `padded.len() - 2·radius()` samples.
    pub fn quadrature(&self, padded: &[Sample]) -> Vec<Sample> {
        let mut out = vec![0.0; padded.len().saturating_sub(2 * self.radius)];
        self.quadrature_into(padded, &mut out);
        out
    }

    /// Quadrature component written into `out`.
    pub fn quadrature_into(&self, padded: &[Sample], out: &mut [Sample]) {
        let m = self.radius;
        debug_assert_eq!(padded.len(), out.len() + 2 * m);
        for (i, q) in out.iter_mut().enumerate() {
            let center = i + m;
            // y[n] = Σ h[k]·x[n-k]; odd taps only, folded by antisymmetry
            let mut acc = 0.0;
            for k in (1..=m).step_by(2) {
                acc += self.taps[m + k] * (padded[center - k] - padded[center + k]);
            }
            *q = acc;
        }
    }

    /// Analytic signal at each unpadded position: `re = x`, `im = H{x}`.
    pub fn analytic(&self, padded: &[Sample]) -> Vec<Complex64> {
        let m = self.radius;
        let quadrature = self.quadrature(padded);
        quadrature
            .iter()
            .enumerate()
            .map(|(i, &im)| Complex64::new(padded[i + m], im))
            .collect()
    }
}
