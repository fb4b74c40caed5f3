//! Trace Windowing — edge padding for finite-support operators
//!
//! Extends a trace of `N` samples by `r` synthesized samples on each side so
//! that an operator with kernel radius `r` can be evaluated at every sample
//! without shrinking the output.
//!
//! ```text
//!   trace          a b c d          (N = 4, r = 2)
//!   zero-pad     0 0 a b c d 0 0
//!   replicate    a a a b c d d d
//!   reflect      c b a b c d c b
//! ```
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::window::{pad_trace, BoundaryPolicy};
//!
//! let padded = pad_trace(&[1.0, 2.0, 3.0, 4.0], 2, BoundaryPolicy::Reflect).unwrap();
//! assert_eq!(padded, vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{AttrError, AttrResult, Sample};

/// Rule for synthesizing samples outside a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Fill with zeros
    ZeroPad,
    /// Repeat the first/last sample
    EdgeReplicate,
    /// Mirror across the boundary sample, which is not repeated
    Reflect,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        BoundaryPolicy::Reflect
    }
}

impl BoundaryPolicy {
    /// Value of the sample at signed position `pos` relative to the trace start.
    #[inline]
    fn sample_at(self, trace: &[Sample], pos: i64) -> Sample {
        let n = trace.len() as i64;
        if (0..n).contains(&pos) {
            return trace[pos as usize];
        }
        match self {
            BoundaryPolicy::ZeroPad => 0.0,
            BoundaryPolicy::EdgeReplicate => trace[pos.clamp(0, n - 1) as usize],
            BoundaryPolicy::Reflect => {
                if n == 1 {
                    return trace[0];
                }
                // Mirror with period 2(N-1) so any radius folds back inside
                let period = 2 * (n - 1);
                let folded = pos.rem_euclid(period);
                let idx = if folded < n { folded } else { period - folded };
                trace[idx as usize]
            }
        }
    }
}

/// A validated padding request: radius plus boundary policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceWindow {
    radius: usize,
    policy: BoundaryPolicy,
}

impl TraceWindow {
    /// Create a window, rejecting negative radii.
    pub fn new(radius: i64, policy: BoundaryPolicy) -> AttrResult<Self> {
        if radius < 0 {
            return Err(AttrError::InvalidRadius(radius));
        }
        Ok(Self {
            radius: radius as usize,
            policy,
        })
    }

    pub(crate) fn from_radius(radius: usize, policy: BoundaryPolicy) -> Self {
        Self { radius, policy }
    }

    /// Padding added on each side.
    pub fn radius(&self) -> usize {
        self.radius
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Length of the padded trace for an input of `n` samples.
    pub fn padded_len(&self, n: usize) -> usize {
        n + 2 * self.radius
    }

    /// Pad a trace into a fresh buffer of length `N + 2r`.
    pub fn pad(&self, trace: &[Sample]) -> AttrResult<Vec<Sample>> {
        let mut out = Vec::with_capacity(self.padded_len(trace.len()));
        self.pad_into(trace, &mut out)?;
        Ok(out)
    }

    /// Pad a trace into a reusable buffer, replacing its contents.
    pub fn pad_into(&self, trace: &[Sample], out: &mut Vec<Sample>) -> AttrResult<()> {
        if trace.is_empty() {
            return Err(AttrError::ShapeMismatch {
                expected: 1,
                actual: 0,
            });
        }
        out.clear();
        let r = self.radius as i64;
        let n = trace.len() as i64;

        for pos in -r..0 {
            out.push(self.policy.sample_at(trace, pos));
        }
        out.extend_from_slice(trace);
        for pos in n..n + r {
            out.push(self.policy.sample_at(trace, pos));
        }
        Ok(())
    }
}

/// Pad a trace by `radius` samples on each side.
pub fn pad_trace(trace: &[Sample], radius: i64, policy: BoundaryPolicy) -> AttrResult<Vec<Sample>> {
    TraceWindow::new(radius, policy)?.pad(trace)
}
