//! Operator Library
//!
//! Every attribute is a stateless [`TraceOperator`]: a pure mapping from one
//! trace (plus [`OperatorConfig`]) to an output trace of the same length.
//! Operators never pad themselves; they declare how much padding they read
//! and the caller hands them a pre-padded trace.
//!
//! ```text
//!   trace ──► validate ──► pad (window) ──► evaluate ──► quantize ──► output
//!              │  empty → ShapeMismatch
//!              │  radius > N/2 → UnsupportedConfig
//!              │  (an unset Hilbert half-width shrinks to fit instead)
//!              └  NaN/Inf → NonFiniteInput (unless propagate_nonfinite)
//! ```
//!
//! ## Families
//!
//! - Complex trace ([`complex_trace`]): envelope, instantaneous phase and
//!   frequency, quadrature, cosine of phase, relative amplitude change,
//!   sweetness
//! - Signal processing ([`signal`]): first/second derivative, RMS amplitude,
//!   phase rotation, reflection intensity
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::operators::{apply_trace, AttributeKind, OperatorConfig};
//!
//! let ramp: Vec<f64> = (0..8).map(|i| 3.0 * i as f64 - 1.0).collect();
//! let op = AttributeKind::SecondDerivative.operator();
//! let out = apply_trace(op.as_ref(), &ramp, &OperatorConfig::default()).unwrap();
//! assert!(out.iter().all(|y| y.abs() < 1e-9));
//! ```

pub mod complex_trace;
pub mod signal;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::hilbert::HilbertKernel;
use crate::stencil::{apply_centered, StencilSet};
use crate::types::{AttrError, AttrResult, Precision, Sample};
use crate::window::{BoundaryPolicy, TraceWindow};

pub use complex_trace::{
    CosineOfPhase, Envelope, InstantaneousFrequency, InstantaneousPhase, Quadrature,
    RelativeAmplitudeChange, Sweetness,
};
pub use signal::{
    FirstDerivative, PhaseRotation, ReflectionIntensity, RmsAmplitude, SecondDerivative,
};

/// Hilbert half-width used when none is configured and the trace allows it.
pub const DEFAULT_HILBERT_RADIUS: usize = 12;

/// How derivative stencils treat samples near the trace edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeStencil {
    /// Centered stencil everywhere, reading samples from the boundary policy.
    Padded,
    /// Stencil window moved inside the trace near the edges.
    Shifted,
}

impl Default for EdgeStencil {
    fn default() -> Self {
        EdgeStencil::Shifted
    }
}

/// Tunable options recognized by the operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Derivative stencil / RMS window half-width
    pub kernel_radius: i64,
    /// Hilbert FIR half-width for the complex-trace family.
    ///
    /// `None` picks [`DEFAULT_HILBERT_RADIUS`], shrunk to half the trace
    /// length on short traces. An explicit value is never adjusted.
    pub hilbert_radius: Option<i64>,
    /// Rule for samples outside the trace
    pub boundary: BoundaryPolicy,
    /// Derivative edge handling
    pub edge_stencil: EdgeStencil,
    /// Output sample precision
    pub precision: Precision,
    /// Let NaN/Inf flow through IEEE arithmetic instead of failing
    pub propagate_nonfinite: bool,
    /// Sample interval for physical units (None = per sample)
    pub sample_interval: Option<f64>,
    /// Rotation angle for the phase rotation attribute
    pub rotation_degrees: f64,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            kernel_radius: 1,
            hilbert_radius: None,
            boundary: BoundaryPolicy::Reflect,
            edge_stencil: EdgeStencil::Shifted,
            precision: Precision::Double,
            propagate_nonfinite: false,
            sample_interval: None,
            rotation_degrees: 90.0,
        }
    }
}

impl OperatorConfig {
    pub fn with_kernel_radius(mut self, radius: i64) -> Self {
        self.kernel_radius = radius;
        self
    }

    pub fn with_hilbert_radius(mut self, radius: i64) -> Self {
        self.hilbert_radius = Some(radius);
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_edge_stencil(mut self, edge_stencil: EdgeStencil) -> Self {
        self.edge_stencil = edge_stencil;
        self
    }

    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_propagate_nonfinite(mut self, propagate: bool) -> Self {
        self.propagate_nonfinite = propagate;
        self
    }

    pub fn with_sample_interval(mut self, interval: f64) -> Self {
        self.sample_interval = Some(interval);
        self
    }

    pub fn with_rotation_degrees(mut self, degrees: f64) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Sample interval used for scaling, 1 when unitless.
    pub fn interval(&self) -> f64 {
        self.sample_interval.unwrap_or(1.0)
    }

    /// Validated derivative/window radius.
    pub fn kernel_radius(&self) -> AttrResult<usize> {
        checked_radius(self.kernel_radius)
    }

    /// Validated Hilbert half-width; the default when unset.
    pub fn hilbert_radius(&self) -> AttrResult<usize> {
        self.hilbert_radius
            .map_or(Ok(DEFAULT_HILBERT_RADIUS), checked_radius)
    }

    /// Copy with every trace-length dependent default filled in.
    pub fn for_trace_len(&self, trace_len: usize) -> OperatorConfig {
        let mut config = self.clone();
        if config.hilbert_radius.is_none() {
            let fitted = DEFAULT_HILBERT_RADIUS.min(trace_len / 2).max(1);
            config.hilbert_radius = Some(fitted as i64);
        }
        config
    }

    /// Check option values that do not depend on the trace.
    pub fn validate(&self) -> AttrResult<()> {
        self.kernel_radius()?;
        self.hilbert_radius()?;
        if let Some(h) = self.sample_interval {
            if !(h.is_finite() && h > 0.0) {
                return Err(AttrError::UnsupportedConfig(format!(
                    "sample_interval must be positive and finite, got {h}"
                )));
            }
        }
        if !self.rotation_degrees.is_finite() {
            return Err(AttrError::UnsupportedConfig(
                "rotation_degrees must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

fn checked_radius(radius: i64) -> AttrResult<usize> {
    usize::try_from(radius).map_err(|_| AttrError::InvalidRadius(radius))
}

/// Derivative weights prepared for one trace length.
#[derive(Debug, Clone)]
pub enum DerivativeStencil {
    /// Edge-shifted stencils reading only in-trace samples.
    Shifted(StencilSet),
    /// One centered stencil applied to the padded trace.
    Centered(Vec<f64>),
}

impl DerivativeStencil {
    pub fn apply(&self, padded: &[Sample], out: &mut [Sample]) {
        match self {
            DerivativeStencil::Shifted(set) => set.apply_shifted(padded, out),
            DerivativeStencil::Centered(weights) => apply_centered(weights, padded, out),
        }
    }
}

/// Filter kernels an operator builds once per run and reads for every trace.
#[derive(Debug, Clone, Default)]
pub struct Kernels {
    hilbert: Option<HilbertKernel>,
    stencil: Option<DerivativeStencil>,
}

impl Kernels {
    pub fn with_hilbert(mut self, kernel: HilbertKernel) -> Self {
        self.hilbert = Some(kernel);
        self
    }

    pub fn with_stencil(mut self, stencil: DerivativeStencil) -> Self {
        self.stencil = Some(stencil);
        self
    }

    pub fn hilbert(&self) -> AttrResult<&HilbertKernel> {
        self.hilbert
            .as_ref()
            .ok_or_else(|| AttrError::UnsupportedConfig("Hilbert kernel not prepared".to_string()))
    }

    pub fn stencil(&self) -> AttrResult<&DerivativeStencil> {
        self.stencil
            .as_ref()
            .ok_or_else(|| AttrError::UnsupportedConfig("derivative stencil not prepared".to_string()))
    }
}

/// A pure, stateless per-trace attribute operator.
pub trait TraceOperator: Send + Sync {
    /// Attribute name, used to tag output cubes and log events.
    fn name(&self) -> &'static str;

    /// Nominal kernel radius; must not exceed half the trace length.
    fn kernel_radius(&self, config: &OperatorConfig) -> AttrResult<usize>;

    /// Samples of padding read on each side by [`evaluate`](Self::evaluate).
    fn padding(&self, config: &OperatorConfig) -> AttrResult<usize> {
        self.kernel_radius(config)
    }

    /// Shortest trace the operator can produce a meaningful result for.
    fn min_trace_len(&self, _config: &OperatorConfig) -> usize {
        1
    }

    /// Build the kernels [`evaluate`](Self::evaluate) reads for traces of
    /// `trace_len` samples.
    fn prepare(&self, _config: &OperatorConfig, _trace_len: usize) -> AttrResult<Kernels> {
        Ok(Kernels::default())
    }

    /// Compute `out` from a trace padded by `padding(config)` on each side.
    fn evaluate(
        &self,
        padded: &[Sample],
        out: &mut [Sample],
        config: &OperatorConfig,
        kernels: &Kernels,
    ) -> AttrResult<()>;
}

impl fmt::Debug for dyn TraceOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceOperator")
            .field("name", &self.name())
            .finish()
    }
}

/// Every attribute the library knows, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeKind {
    Envelope,
    InstantaneousPhase,
    InstantaneousFrequency,
    Quadrature,
    CosineOfPhase,
    RelativeAmplitudeChange,
    Sweetness,
    FirstDerivative,
    SecondDerivative,
    RmsAmplitude,
    PhaseRotation,
    ReflectionIntensity,
}

impl AttributeKind {
    /// All attributes, complex-trace family first.
    pub const ALL: [AttributeKind; 12] = [
        AttributeKind::Envelope,
        AttributeKind::InstantaneousPhase,
        AttributeKind::InstantaneousFrequency,
        AttributeKind::Quadrature,
        AttributeKind::CosineOfPhase,
        AttributeKind::RelativeAmplitudeChange,
        AttributeKind::Sweetness,
        AttributeKind::FirstDerivative,
        AttributeKind::SecondDerivative,
        AttributeKind::RmsAmplitude,
        AttributeKind::PhaseRotation,
        AttributeKind::ReflectionIntensity,
    ];

    /// Names of all attributes.
    pub fn list() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.operator().name()).collect()
    }

    /// Look up an attribute by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.operator().name().eq_ignore_ascii_case(name))
    }

    /// Whether the attribute is derived from the analytic signal.
    pub fn is_complex_trace(&self) -> bool {
        matches!(
            self,
            AttributeKind::Envelope
                | AttributeKind::InstantaneousPhase
                | AttributeKind::InstantaneousFrequency
                | AttributeKind::Quadrature
                | AttributeKind::CosineOfPhase
                | AttributeKind::RelativeAmplitudeChange
                | AttributeKind::Sweetness
        )
    }

    /// Create the operator for this attribute.
    pub fn operator(&self) -> Box<dyn TraceOperator> {
        match self {
            AttributeKind::Envelope => Box::new(Envelope),
            AttributeKind::InstantaneousPhase => Box::new(InstantaneousPhase),
            AttributeKind::InstantaneousFrequency => Box::new(InstantaneousFrequency),
            AttributeKind::Quadrature => Box::new(Quadrature),
            AttributeKind::CosineOfPhase => Box::new(CosineOfPhase),
            AttributeKind::RelativeAmplitudeChange => Box::new(RelativeAmplitudeChange),
            AttributeKind::Sweetness => Box::new(Sweetness),
            AttributeKind::FirstDerivative => Box::new(FirstDerivative),
            AttributeKind::SecondDerivative => Box::new(SecondDerivative),
            AttributeKind::RmsAmplitude => Box::new(RmsAmplitude),
            AttributeKind::PhaseRotation => Box::new(PhaseRotation),
            AttributeKind::ReflectionIntensity => Box::new(ReflectionIntensity),
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator().name())
    }
}

/// Check the operator can run on a trace of `n` samples with this config.
pub fn check_support(op: &dyn TraceOperator, n: usize, config: &OperatorConfig) -> AttrResult<()> {
    if n == 0 {
        return Err(AttrError::ShapeMismatch {
            expected: 1,
            actual: 0,
        });
    }
    let config = &config.for_trace_len(n);
    config.validate()?;
    let radius = op.kernel_radius(config)?;
    if radius > n / 2 {
        return Err(AttrError::UnsupportedConfig(format!(
            "{}: kernel radius {} exceeds half the trace length {}",
            op.name(),
            radius,
            n
        )));
    }
    let min_len = op.min_trace_len(config);
    if n < min_len {
        return Err(AttrError::UnsupportedConfig(format!(
            "{}: needs at least {} samples per trace, got {}",
            op.name(),
            min_len,
            n
        )));
    }
    Ok(())
}

/// Index of the first NaN/Inf sample.
fn first_nonfinite(trace: &[Sample]) -> Option<usize> {
    trace.iter().position(|x| !x.is_finite())
}

/// Reusable per-worker state for applying one operator to many traces of
/// one length.
///
/// Holds the operator's kernels and the padding scratch buffer, so
/// consecutive traces neither redesign filters nor reallocate.
pub struct TraceProcessor<'a> {
    op: &'a dyn TraceOperator,
    config: OperatorConfig,
    kernels: Cow<'a, Kernels>,
    trace_len: usize,
    window: TraceWindow,
    scratch: Vec<Sample>,
}

impl<'a> TraceProcessor<'a> {
    /// Validate the operator against a trace length and build its kernels.
    pub fn new(op: &'a dyn TraceOperator, config: &OperatorConfig, trace_len: usize) -> AttrResult<Self> {
        check_support(op, trace_len, config)?;
        let config = config.for_trace_len(trace_len);
        let kernels = op.prepare(&config, trace_len)?;
        Self::assemble(op, config, Cow::Owned(kernels), trace_len)
    }

    /// Processor sharing kernels already prepared for `config` and
    /// `trace_len`; `config` must come from [`OperatorConfig::for_trace_len`]
    /// and have passed [`check_support`].
    pub(crate) fn with_kernels(
        op: &'a dyn TraceOperator,
        config: &OperatorConfig,
        kernels: &'a Kernels,
        trace_len: usize,
    ) -> AttrResult<Self> {
        Self::assemble(op, config.clone(), Cow::Borrowed(kernels), trace_len)
    }

    fn assemble(
        op: &'a dyn TraceOperator,
        config: OperatorConfig,
        kernels: Cow<'a, Kernels>,
        trace_len: usize,
    ) -> AttrResult<Self> {
        let window = TraceWindow::from_radius(op.padding(&config)?, config.boundary);
        Ok(Self {
            op,
            config,
            kernels,
            trace_len,
            scratch: Vec::with_capacity(window.padded_len(trace_len)),
            window,
        })
    }

    /// Resolved configuration the operator runs with.
    pub fn config(&self) -> &OperatorConfig {
        &self.config
    }

    /// Samples of padding applied to each trace.
    pub fn padding(&self) -> usize {
        self.window.radius()
    }

    /// Process one trace into `out` (same length as `trace`).
    pub fn process_into(&mut self, trace: &[Sample], out: &mut [Sample]) -> AttrResult<()> {
        if trace.len() != self.trace_len {
            return Err(AttrError::ShapeMismatch {
                expected: self.trace_len,
                actual: trace.len(),
            });
        }
        if out.len() != trace.len() {
            return Err(AttrError::ShapeMismatch {
                expected: trace.len(),
                actual: out.len(),
            });
        }
        if !self.config.propagate_nonfinite {
            if let Some(index) = first_nonfinite(trace) {
                return Err(AttrError::NonFiniteInput { index });
            }
        }
        self.window.pad_into(trace, &mut self.scratch)?;
        self.op
            .evaluate(&self.scratch, out, &self.config, &self.kernels)?;
        if self.config.precision != Precision::Double {
            for y in out.iter_mut() {
                *y = self.config.precision.quantize(*y);
            }
        }
        Ok(())
    }
}

/// Apply an operator to a single trace.
pub fn apply_trace(op: &dyn TraceOperator, trace: &[Sample], config: &OperatorConfig) -> AttrResult<Vec<Sample>> {
    let mut processor = TraceProcessor::new(op, config, trace.len())?;
    let mut out = vec![0.0; trace.len()];
    processor.process_into(trace, &mut out)?;
    Ok(out)
}

// Helpers shared by the operator families.

/// Centered difference inside, one-sided at the first/last sample.
pub(crate) fn gradient(x: &[Sample], out: &mut [Sample], h: f64) {
    let n = x.len();
    if n < 2 {
        out.iter_mut().for_each(|y| *y = 0.0);
        return;
    }
    out[0] = (x[1] - x[0]) / h;
    out[n - 1] = (x[n - 1] - x[n - 2]) / h;
    for i in 1..n - 1 {
        out[i] = (x[i + 1] - x[i - 1]) / (2.0 * h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = OperatorConfig::default();
        assert_eq!(c.kernel_radius, 1);
        assert_eq!(c.hilbert_radius, None);
        assert_eq!(c.hilbert_radius(), Ok(DEFAULT_HILBERT_RADIUS));
        assert_eq!(c.boundary, BoundaryPolicy::Reflect);
        assert_eq!(c.edge_stencil, EdgeStencil::Shifted);
        assert!(!c.propagate_nonfinite);
        assert_eq!(c.interval(), 1.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            OperatorConfig::default().with_kernel_radius(-2).validate(),
            Err(AttrError::InvalidRadius(-2))
        );
        assert!(matches!(
            OperatorConfig::default().with_sample_interval(0.0).validate(),
            Err(AttrError::UnsupportedConfig(_))
        ));
    }

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in AttributeKind::ALL {
            let name = kind.operator().name();
            assert_eq!(AttributeKind::from_name(name), Some(kind));
        }
        assert_eq!(AttributeKind::list().len(), AttributeKind::ALL.len());
        assert_eq!(AttributeKind::from_name("nonexistent"), None);
    }

    #[test]
    fn test_kind_serde_names() {
        let kind: AttributeKind = serde_yaml::from_str("second-derivative").unwrap();
        assert_eq!(kind, AttributeKind::SecondDerivative);
        assert_eq!(AttributeKind::Envelope.to_string(), "envelope");
    }

    #[test]
    fn test_radius_larger_than_half_trace() {
        let trace = vec![1.0; 8];
        let config = OperatorConfig::default().with_kernel_radius(10);
        let err = apply_trace(&SecondDerivative, &trace, &config).unwrap_err();
        assert!(matches!(err, AttrError::UnsupportedConfig(_)), "{err:?}");
    }

    #[test]
    fn test_radius_half_trace_allowed() {
        let trace: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let config = OperatorConfig::default().with_kernel_radius(4);
        assert!(apply_trace(&SecondDerivative, &trace, &config).is_ok());
    }

    #[test]
    fn test_negative_radius() {
        let config = OperatorConfig::default().with_kernel_radius(-1);
        let err = apply_trace(&FirstDerivative, &[1.0; 8], &config).unwrap_err();
        assert_eq!(err, AttrError::InvalidRadius(-1));
    }

    #[test]
    fn test_empty_trace() {
        let err = apply_trace(&Envelope, &[], &OperatorConfig::default()).unwrap_err();
        assert!(matches!(err, AttrError::ShapeMismatch { actual: 0, .. }));
    }

    #[test]
    fn test_nonfinite_rejected() {
        let mut trace = vec![0.5; 16];
        trace[5] = f64::NAN;
        let err = apply_trace(&SecondDerivative, &trace, &OperatorConfig::default()).unwrap_err();
        assert_eq!(err, AttrError::NonFiniteInput { index: 5 });

        trace[5] = f64::INFINITY;
        let err = apply_trace(&SecondDerivative, &trace, &OperatorConfig::default()).unwrap_err();
        assert_eq!(err, AttrError::NonFiniteInput { index: 5 });
    }

    #[test]
    fn test_nonfinite_propagated() {
        let mut trace = vec![0.5; 16];
        trace[5] = f64::NAN;
        let config = OperatorConfig::default().with_propagate_nonfinite(true);
        let out = apply_trace(&SecondDerivative, &trace, &config).unwrap();
        assert!(out[5].is_nan());
        assert!(out[0].is_finite());
        assert!(out[15].is_finite());
    }

    #[test]
    fn test_single_precision_output() {
        let trace: Vec<f64> = (0..32).map(|i| (i as f64 * 0.3).sin()).collect();
        let config = OperatorConfig::default().with_precision(Precision::Single);
        let out = apply_trace(&FirstDerivative, &trace, &config).unwrap();
        assert!(out.iter().all(|&y| y == (y as f32) as f64));
    }

    #[test]
    fn test_processor_reuse_matches_single_calls() {
        let config = OperatorConfig::default().with_hilbert_radius(6);
        let traces: Vec<Vec<f64>> = (0..4)
            .map(|k| (0..40).map(|i| ((i + k) as f64 * 0.4).cos()).collect())
            .collect();
        let mut processor = TraceProcessor::new(&Envelope, &config, 40).unwrap();
        for trace in &traces {
            let mut out = vec![0.0; 40];
            processor.process_into(trace, &mut out).unwrap();
            assert_eq!(out, apply_trace(&Envelope, trace, &config).unwrap());
        }
    }

    #[test]
    fn test_unset_hilbert_radius_fits_trace() {
        let config = OperatorConfig::default();
        assert_eq!(config.for_trace_len(500).hilbert_radius, Some(12));
        assert_eq!(config.for_trace_len(8).hilbert_radius, Some(4));
        assert_eq!(config.for_trace_len(3).hilbert_radius, Some(1));

        let explicit = OperatorConfig::default().with_hilbert_radius(6);
        assert_eq!(explicit.for_trace_len(8).hilbert_radius, Some(6));
    }

    #[test]
    fn test_explicit_hilbert_radius_stays_strict() {
        let trace = vec![1.0; 8];
        assert!(apply_trace(&Envelope, &trace, &OperatorConfig::default()).is_ok());

        let config = OperatorConfig::default().with_hilbert_radius(12);
        let err = apply_trace(&Envelope, &trace, &config).unwrap_err();
        assert!(matches!(err, AttrError::UnsupportedConfig(_)), "{err:?}");
    }

    #[test]
    fn test_processor_rejects_other_lengths() {
        let config = OperatorConfig::default();
        let mut processor = TraceProcessor::new(&SecondDerivative, &config, 16).unwrap();
        let mut out = vec![0.0; 12];
        let err = processor.process_into(&[0.0; 12], &mut out).unwrap_err();
        assert_eq!(
            err,
            AttrError::ShapeMismatch {
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn test_processor_prepares_kernels_once() {
        let config = OperatorConfig::default().with_kernel_radius(2);
        let processor = TraceProcessor::new(&FirstDerivative, &config, 10).unwrap();
        assert!(processor.kernels.stencil().is_ok());
        assert!(processor.kernels.hilbert().is_err());

        let processor = TraceProcessor::new(&Envelope, &config, 10).unwrap();
        assert_eq!(processor.kernels.hilbert().unwrap().radius(), 5);
        assert_eq!(processor.config().hilbert_radius, Some(5));
    }

    #[test]
    fn test_gradient() {
        let x = [0.0, 1.0, 4.0, 9.0];
        let mut g = [0.0; 4];
        gradient(&x, &mut g, 1.0);
        assert_eq!(g, [1.0, 2.0, 4.0, 5.0]);
    }
}
