//! Phase Unwrap — Remove 2π discontinuities from phase traces
//!
//! Instantaneous phase is reported wrapped to (−π, π]. Differentiating it
//! for instantaneous frequency requires the continuous (unwrapped) phase.
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::phase_unwrap::unwrap_phase;
//!
//! let wrapped = vec![0.0, 1.0, 2.0, 3.0, -3.0, -2.0, -1.0, 0.0];
//! let unwrapped = unwrap_phase(&wrapped);
//! assert!(unwrapped.windows(2).all(|w| w[1] > w[0]));
//! ```

use std::f64::consts::{PI, TAU};

/// Unwrap a phase trace in place.
///
/// A step larger than π between neighbours is taken as a wrap and removed
/// by the nearest multiple of 2π; the first sample is kept as is.
pub fn unwrap_in_place(phase: &mut [f64]) {
    let Some(&first) = phase.first() else {
        return;
    };
    let mut prev = first;
    let mut correction = 0.0;
    for p in phase.iter_mut().skip(1) {
        let raw = *p;
        let step = raw - prev;
        if step.abs() > PI {
            correction -= TAU * (step / TAU).round();
        }
        prev = raw;
        *p = raw + correction;
    }
}

/// Unwrap a phase trace.
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    let mut out = phase.to_vec();
    unwrap_in_place(&mut out);
    out
}

/// Wrap a phase to the half-open interval (−π, π].
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let p = phase % TAU;
    if p > PI {
        p - TAU
    } else if p <= -PI {
        p + TAU
    } else {
        p
    }
}
