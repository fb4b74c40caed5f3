//! Signal-processing attributes
//!
//! Attributes computed directly from trace samples (plus phase rotation,
//! which borrows the analytic signal).
//!
//! ```text
//!   first/second derivative   Fornberg stencil, radius r, / h^order
//!   rms amplitude             sqrt(mean(x²)) over 2r + 1 samples
//!   phase rotation            re·cos θ − im·sin θ
//!   reflection intensity      ∫ x dt  (trapezoid, from the first sample)
//! ```
//!
//! Derivative stencils honor [`EdgeStencil`]: with `Shifted` the stencil is
//! moved inside the trace near the edges and no padding is read, so a
//! polynomial of degree `2r` is differentiated exactly at every sample.

use super::complex_trace::{analytic_parts, hilbert_footprint, prepare_hilbert};
use super::{DerivativeStencil, EdgeStencil, Kernels, OperatorConfig, TraceOperator};
use crate::stencil::{fd_weights, StencilSet};
use crate::types::{AttrResult, Sample};

/// Stencil half-width; a derivative needs at least one neighbor.
fn derivative_radius(config: &OperatorConfig) -> AttrResult<usize> {
    Ok(config.kernel_radius()?.max(1))
}

fn derivative_padding(config: &OperatorConfig) -> AttrResult<usize> {
    let r = derivative_radius(config)?;
    Ok(match config.edge_stencil {
        EdgeStencil::Shifted => 0,
        EdgeStencil::Padded => r,
    })
}

fn prepare_derivative(order: usize, config: &OperatorConfig, trace_len: usize) -> AttrResult<Kernels> {
    let r = derivative_radius(config)?;
    let stencil = match config.edge_stencil {
        EdgeStencil::Shifted => DerivativeStencil::Shifted(StencilSet::new(order, r, trace_len)),
        EdgeStencil::Padded => {
            let r = r as i64;
            let nodes: Vec<f64> = (-r..=r).map(|k| k as f64).collect();
            DerivativeStencil::Centered(fd_weights(0.0, &nodes, order))
        }
    };
    Ok(Kernels::default().with_stencil(stencil))
}

fn evaluate_derivative(
    order: usize,
    padded: &[Sample],
    out: &mut [Sample],
    config: &OperatorConfig,
    kernels: &Kernels,
) -> AttrResult<()> {
    kernels.stencil()?.apply(padded, out);

    let scale = config.interval().powi(order as i32);
    if scale != 1.0 {
        for y in out.iter_mut() {
            *y /= scale;
        }
    }
    Ok(())
}

/// First derivative along the sample axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstDerivative;

impl TraceOperator for FirstDerivative {
    fn name(&self) -> &'static str {
        "first-derivative"
    }

    fn kernel_radius(&self, config: &OperatorConfig) -> AttrResult<usize> {
        derivative_radius(config)
    }

    fn padding(&self, config: &OperatorConfig) -> AttrResult<usize> {
        derivative_padding(config)
    }

    fn min_trace_len(&self, _config: &OperatorConfig) -> usize {
        2
    }

    fn prepare(&self, config: &OperatorConfig, trace_len: usize) -> AttrResult<Kernels> {
        prepare_derivative(1, config, trace_len)
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        evaluate_derivative(1, padded, out, config, kernels)
    }
}

/// Second derivative along the sample axis.
///
/// Radius 1 at an interior sample: `(x[i-1] − 2x[i] + x[i+1]) / h²`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecondDerivative;

impl TraceOperator for SecondDerivative {
    fn name(&self) -> &'static str {
        "second-derivative"
    }

    fn kernel_radius(&self, config: &OperatorConfig) -> AttrResult<usize> {
        derivative_radius(config)
    }

    fn padding(&self, config: &OperatorConfig) -> AttrResult<usize> {
        derivative_padding(config)
    }

    fn min_trace_len(&self, _config: &OperatorConfig) -> usize {
        3
    }

    fn prepare(&self, config: &OperatorConfig, trace_len: usize) -> AttrResult<Kernels> {
        prepare_derivative(2, config, trace_len)
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        evaluate_derivative(2, padded, out, config, kernels)
    }
}

/// Root-mean-square amplitude over a sliding window of `2r + 1` samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct RmsAmplitude;

impl TraceOperator for RmsAmplitude {
    fn name(&self) -> &'static str {
        "rms-amplitude"
    }

    fn kernel_radius(&self, config: &OperatorConfig) -> AttrResult<usize> {
        config.kernel_radius()
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, _kernels: &Kernels) -> AttrResult<()> {
        let width = 2 * config.kernel_radius()? + 1;
        for (i, y) in out.iter_mut().enumerate() {
            let energy: f64 = padded[i..i + width].iter().map(|x| x * x).sum();
            *y = (energy / width as f64).sqrt();
        }
        Ok(())
    }
}

/// Trace with its phase rotated by `rotation_degrees`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseRotation;

impl TraceOperator for PhaseRotation {
    fn name(&self) -> &'static str {
        "phase-rotation"
    }

    fn kernel_radius(&self, config: &OperatorConfig) -> AttrResult<usize> {
        hilbert_footprint(config)
    }

    fn prepare(&self, config: &OperatorConfig, _trace_len: usize) -> AttrResult<Kernels> {
        prepare_hilbert(config)
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (re, im) = analytic_parts(padded, out.len(), kernels)?;
        let (sin, cos) = config.rotation_degrees.to_radians().sin_cos();
        for ((y, &a), &b) in out.iter_mut().zip(re).zip(&im) {
            *y = a * cos - b * sin;
        }
        Ok(())
    }
}

/// Running trapezoidal integral of the trace, zero at the first sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReflectionIntensity;

impl TraceOperator for ReflectionIntensity {
    fn name(&self) -> &'static str {
        "reflection-intensity"
    }

    fn kernel_radius(&self, _config: &OperatorConfig) -> AttrResult<usize> {
        Ok(0)
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, _kernels: &Kernels) -> AttrResult<()> {
        let half_h = 0.5 * config.interval();
        let mut acc = 0.0;
        for (i, y) in out.iter_mut().enumerate() {
            if i > 0 {
                acc += half_h * (padded[i - 1] + padded[i]);
            }
            *y = acc;
        }
        Ok(())
    }
}
