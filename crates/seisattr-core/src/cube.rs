//! Seismic cube data model
//!
//! A cube is a dense 3-D array indexed by `(inline, crossline, sample)`. It is
//! stored row-major with the sample axis fastest, so every trace is one
//! contiguous slice:
//!
//! ```text
//!   data = [ trace(0,0) | trace(0,1) | ... | trace(0,nx-1) | trace(1,0) | ... ]
//!            └── ns ──┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::cube::{AxisMetadata, AxisRange, SeismicCube};
//!
//! let cube = SeismicCube::zeros([2, 3, 16]);
//! assert_eq!(cube.trace(1, 2).len(), 16);
//!
//! let meta = AxisMetadata::new(
//!     AxisRange::new(100.0, 101.0, 1.0),
//!     AxisRange::new(200.0, 202.0, 1.0),
//!     AxisRange::new(0.0, 0.060, 0.004),
//! );
//! assert_eq!(meta.shape(), [2, 3, 16]);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{AttrError, AttrResult, Sample};

/// Regular sampling of one axis: `start, start + step, ..., end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl AxisRange {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// Number of samples on the axis, or 0 if the range is not usable.
    pub fn len(&self) -> usize {
        self.step_count().map_or(0, |steps| steps.saturating_add(1))
    }

    /// Steps from `start` to `end`, rounded to a whole number.
    ///
    /// `None` for an irregular range or one with more steps than fit in
    /// `usize`.
    pub fn step_count(&self) -> Option<usize> {
        if !self.is_regular() {
            return None;
        }
        let steps = ((self.end - self.start) / self.step).round();
        if steps.is_finite() && steps >= 0.0 && steps < usize::MAX as f64 {
            Some(steps as usize)
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finite bounds and a non-zero step pointing from `start` to `end`.
    pub fn is_regular(&self) -> bool {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return false;
        }
        if self.step == 0.0 {
            return false;
        }
        let span = self.end - self.start;
        span == 0.0 || span.signum() == self.step.signum()
    }

    /// Coordinate of the `index`-th sample.
    pub fn coordinate(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }
}

/// Axis description for inline, crossline and time/depth axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMetadata {
    pub inline: AxisRange,
    pub crossline: AxisRange,
    /// Time or depth axis; `step` is the sample interval.
    pub sample: AxisRange,
}

impl AxisMetadata {
    pub fn new(inline: AxisRange, crossline: AxisRange, sample: AxisRange) -> Self {
        Self {
            inline,
            crossline,
            sample,
        }
    }

    /// Index-based metadata for a cube of the given shape with unit steps.
    pub fn unit(shape: [usize; 3]) -> Self {
        let axis = |n: usize| AxisRange::new(0.0, n.saturating_sub(1) as f64, 1.0);
        Self::new(axis(shape[0]), axis(shape[1]), axis(shape[2]))
    }

    /// Shape implied by the three axis ranges.
    pub fn shape(&self) -> [usize; 3] {
        [self.inline.len(), self.crossline.len(), self.sample.len()]
    }

    /// Sample interval of the time/depth axis.
    pub fn sample_interval(&self) -> f64 {
        self.sample.step.abs()
    }
}

/// A 3-D amplitude volume.
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicCube {
    shape: [usize; 3],
    data: Vec<Sample>,
}

impl SeismicCube {
    /// Wrap a flat buffer laid out as `[inline][crossline][sample]`.
    pub fn from_vec(shape: [usize; 3], data: Vec<Sample>) -> AttrResult<Self> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(AttrError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// All-zero cube.
    pub fn zeros(shape: [usize; 3]) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.iter().product()],
        }
    }

    /// Build a cube by evaluating `f(inline, crossline, sample)` everywhere.
    pub fn from_fn(shape: [usize; 3], mut f: impl FnMut(usize, usize, usize) -> Sample) -> Self {
        let mut data = Vec::with_capacity(shape.iter().product());
        for il in 0..shape[0] {
            for xl in 0..shape[1] {
                for s in 0..shape[2] {
                    data.push(f(il, xl, s));
                }
            }
        }
        Self { shape, data }
    }

    /// `[n_inline, n_crossline, n_sample]`
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    #[inline]
    pub fn n_inline(&self) -> usize {
        self.shape[0]
    }

    #[inline]
    pub fn n_crossline(&self) -> usize {
        self.shape[1]
    }

    /// Samples per trace.
    #[inline]
    pub fn trace_len(&self) -> usize {
        self.shape[2]
    }

    /// Number of traces in the inline/crossline grid.
    #[inline]
    pub fn trace_count(&self) -> usize {
        self.shape[0] * self.shape[1]
    }

    #[inline]
    fn offset(&self, inline: usize, crossline: usize) -> usize {
        (inline * self.shape[1] + crossline) * self.shape[2]
    }

    /// Trace at a grid position.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the grid.
    pub fn trace(&self, inline: usize, crossline: usize) -> &[Sample] {
        assert!(inline < self.shape[0] && crossline < self.shape[1]);
        let start = self.offset(inline, crossline);
        &self.data[start..start + self.shape[2]]
    }

    pub(crate) fn trace_mut(&mut self, inline: usize, crossline: usize) -> &mut [Sample] {
        let start = self.offset(inline, crossline);
        let len = self.shape[2];
        &mut self.data[start..start + len]
    }

    /// Sample value, or `None` out of bounds.
    pub fn get(&self, inline: usize, crossline: usize, sample: usize) -> Option<Sample> {
        if inline < self.shape[0] && crossline < self.shape[1] && sample < self.shape[2] {
            Some(self.data[self.offset(inline, crossline) + sample])
        } else {
            None
        }
    }

    /// Flat sample buffer.
    pub fn as_slice(&self) -> &[Sample] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<Sample> {
        self.data
    }

    /// Allocate a zeroed cube, reporting allocation failure instead of aborting.
    pub(crate) fn try_zeros(shape: [usize; 3]) -> AttrResult<Self> {
        let len = shape.iter().product::<usize>();
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| AttrError::ResourceExhausted {
                bytes: len.saturating_mul(std::mem::size_of::<Sample>()),
            })?;
        data.resize(len, 0.0);
        Ok(Self { shape, data })
    }
}

/// A derived attribute volume, same shape and axes as its input.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeCube {
    attribute: &'static str,
    metadata: AxisMetadata,
    cube: SeismicCube,
}

impl AttributeCube {
    pub(crate) fn new(attribute: &'static str, metadata: AxisMetadata, cube: SeismicCube) -> Self {
        Self {
            attribute,
            metadata,
            cube,
        }
    }

    /// Name of the attribute held in this cube.
    pub fn attribute(&self) -> &'static str {
        self.attribute
    }

    pub fn metadata(&self) -> &AxisMetadata {
        &self.metadata
    }

    pub fn shape(&self) -> [usize; 3] {
        self.cube.shape()
    }

    pub fn trace(&self, inline: usize, crossline: usize) -> &[Sample] {
        self.cube.trace(inline, crossline)
    }

    pub fn get(&self, inline: usize, crossline: usize, sample: usize) -> Option<Sample> {
        self.cube.get(inline, crossline, sample)
    }

    pub fn as_slice(&self) -> &[Sample] {
        self.cube.as_slice()
    }

    pub fn as_cube(&self) -> &SeismicCube {
        &self.cube
    }

    /// Reuse the attribute as input to another computation.
    pub fn into_cube(self) -> SeismicCube {
        self.cube
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_len() {
        assert_eq!(AxisRange::new(0.0, 0.028, 0.004).len(), 8);
        assert_eq!(AxisRange::new(10.0, 13.0, 1.0).len(), 4);
        assert_eq!(AxisRange::new(5.0, 5.0, 1.0).len(), 1);
        // Descending axes are allowed when the step agrees
        assert_eq!(AxisRange::new(13.0, 10.0, -1.0).len(), 4);
    }

    #[test]
    fn test_axis_irregular() {
        assert!(!AxisRange::new(0.0, 10.0, 0.0).is_regular());
        assert!(!AxisRange::new(0.0, 10.0, -1.0).is_regular());
        assert!(!AxisRange::new(0.0, f64::NAN, 1.0).is_regular());
        assert_eq!(AxisRange::new(0.0, 10.0, -1.0).len(), 0);
    }

    #[test]
    fn test_from_vec_shape_check() {
        let err = SeismicCube::from_vec([2, 2, 2], vec![0.0; 7]).unwrap_err();
        assert_eq!(
            err,
            AttrError::ShapeMismatch {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn test_trace_layout() {
        let cube = SeismicCube::from_fn([2, 3, 4], |il, xl, s| (il * 100 + xl * 10 + s) as f64);
        assert_eq!(cube.trace(1, 2), &[120.0, 121.0, 122.0, 123.0]);
        assert_eq!(cube.get(0, 1, 3), Some(13.0));
        assert_eq!(cube.get(2, 0, 0), None);
        assert_eq!(cube.trace_count(), 6);
    }

    #[test]
    fn test_unit_metadata() {
        let meta = AxisMetadata::unit([4, 5, 6]);
        assert_eq!(meta.shape(), [4, 5, 6]);
        assert_eq!(meta.sample_interval(), 1.0);
    }

    #[test]
    fn test_try_zeros() {
        let cube = SeismicCube::try_zeros([3, 2, 5]).unwrap();
        assert_eq!(cube.as_slice().len(), 30);
        assert!(cube.as_slice().iter().all(|&x| x == 0.0));
    }
}
