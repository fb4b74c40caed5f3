//! Attribute Engine — cube-level entry point
//!
//! Validates cube metadata, resolves the operator configuration against the
//! cube's axes, and hands the work to a [`CubeDriver`]. Attributes are
//! grouped into two families, mirroring how interpreters use them:
//!
//! ```text
//!   AttributeEngine
//!   ├── complex_trace()       envelope, instantaneous phase/frequency, quadrature,
//!   │                         cosine of phase, relative amplitude change, sweetness
//!   └── signal_processing()   first/second derivative, rms amplitude,
//!                             phase rotation, reflection intensity
//! ```
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::attributes::AttributeEngine;
//! use seisattr_core::cube::{AxisMetadata, AxisRange, SeismicCube};
//!
//! let dt = 0.004;
//! let cube = SeismicCube::from_fn([2, 2, 128], |_, _, s| {
//!     (2.0 * std::f64::consts::PI * 25.0 * s as f64 * dt).cos()
//! });
//! let meta = AxisMetadata::new(
//!     AxisRange::new(1.0, 2.0, 1.0),
//!     AxisRange::new(10.0, 11.0, 1.0),
//!     AxisRange::new(0.0, 127.0 * dt, dt),
//! );
//!
//! let engine = AttributeEngine::default();
//! let freq = engine.complex_trace().instantaneous_frequency(&cube, &meta).unwrap();
//! assert!((freq.get(0, 0, 64).unwrap() - 25.0).abs() < 0.5);
//! ```

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::cube::{AttributeCube, AxisMetadata, AxisRange, SeismicCube};
use crate::driver::{CancellationToken, CubeDriver, DriverConfig};
use crate::observe::EngineMetrics;
use crate::operators::{AttributeKind, OperatorConfig, TraceOperator};
use crate::types::{AttrError, AttrResult};

/// Relative tolerance for an axis span to count as a whole number of steps.
const STEP_TOLERANCE: f64 = 1e-6;

fn check_axis(name: &str, axis: &AxisRange, expected_len: usize) -> AttrResult<()> {
    let invalid = |reason: String| Err(AttrError::InvalidCubeMetadata(format!("{name} axis: {reason}")));

    if !(axis.start.is_finite() && axis.end.is_finite() && axis.step.is_finite()) {
        return invalid(format!(
            "non-finite range {} .. {} step {}",
            axis.start, axis.end, axis.step
        ));
    }
    if axis.step == 0.0 {
        return invalid("step is zero".to_string());
    }
    if !axis.is_regular() {
        return invalid(format!(
            "step {} does not move from {} towards {}",
            axis.step, axis.start, axis.end
        ));
    }
    let steps = (axis.end - axis.start) / axis.step;
    if (steps - steps.round()).abs() > STEP_TOLERANCE * steps.abs().max(1.0) {
        return invalid(format!("span is not a whole number of steps ({steps})"));
    }
    let Some(len) = axis.step_count().map(|n| n + 1) else {
        return invalid(format!("span of {steps} steps is too large"));
    };
    if len != expected_len {
        return invalid(format!(
            "describes {len} samples but the cube has {expected_len}"
        ));
    }
    Ok(())
}

/// Check that `metadata` describes `cube` and the sample axis is long enough.
///
/// Fails with [`AttrError::InvalidCubeMetadata`] before any computation.
pub fn validate(cube: &SeismicCube, metadata: &AxisMetadata, min_support: usize) -> AttrResult<()> {
    let [ni, nx, ns] = cube.shape();
    check_axis("inline", &metadata.inline, ni)?;
    check_axis("crossline", &metadata.crossline, nx)?;
    check_axis("sample", &metadata.sample, ns)?;
    if ns < min_support {
        return Err(AttrError::InvalidCubeMetadata(format!(
            "sample axis has {ns} samples, at least {min_support} required"
        )));
    }
    Ok(())
}

/// Computes attribute cubes with one operator and driver configuration.
#[derive(Debug, Clone)]
pub struct AttributeEngine {
    operator: OperatorConfig,
    driver: DriverConfig,
    token: CancellationToken,
    metrics: Option<Arc<EngineMetrics>>,
    physical_units: bool,
}

impl Default for AttributeEngine {
    fn default() -> Self {
        Self::new(OperatorConfig::default(), DriverConfig::default())
    }
}

impl AttributeEngine {
    pub fn new(operator: OperatorConfig, driver: DriverConfig) -> Self {
        Self {
            operator,
            driver,
            token: CancellationToken::new(),
            metrics: None,
            physical_units: true,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.operator.clone(), config.driver.clone())
            .with_physical_units(config.physical_units)
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<EngineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Scale derivatives and frequencies by the metadata sample interval.
    pub fn with_physical_units(mut self, enabled: bool) -> Self {
        self.physical_units = enabled;
        self
    }

    pub fn operator_config(&self) -> &OperatorConfig {
        &self.operator
    }

    pub fn driver_config(&self) -> &DriverConfig {
        &self.driver
    }

    /// Token observed by every run of this engine.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn metrics(&self) -> Option<&Arc<EngineMetrics>> {
        self.metrics.as_ref()
    }

    /// Operator config for a cube; an explicit sample interval always wins.
    pub fn resolve_config(&self, metadata: &AxisMetadata) -> OperatorConfig {
        let mut config = self.operator.clone();
        if self.physical_units && config.sample_interval.is_none() {
            config.sample_interval = Some(metadata.sample_interval());
        }
        config
    }

    /// Compute a named attribute over the whole cube.
    pub fn compute(&self, kind: AttributeKind, cube: &SeismicCube, metadata: &AxisMetadata) -> AttrResult<AttributeCube> {
        self.compute_with(kind.operator().as_ref(), cube, metadata)
    }

    /// Compute any operator over the whole cube.
    pub fn compute_with(
        &self,
        op: &dyn TraceOperator,
        cube: &SeismicCube,
        metadata: &AxisMetadata,
    ) -> AttrResult<AttributeCube> {
        let config = self.resolve_config(metadata);
        validate(cube, metadata, op.min_trace_len(&config))?;
        tracing::debug!(
            attribute = op.name(),
            sample_interval = config.interval(),
            "computing attribute"
        );

        let mut driver = CubeDriver::new(self.driver.clone()).with_token(self.token.clone());
        if let Some(metrics) = &self.metrics {
            driver = driver.with_metrics(Arc::clone(metrics));
        }
        driver.run(cube, metadata, op, &config)
    }

    /// Attributes derived from the analytic signal.
    pub fn complex_trace(&self) -> ComplexTraceAttributes<'_> {
        ComplexTraceAttributes { engine: self }
    }

    /// Derivative, energy and integral attributes.
    pub fn signal_processing(&self) -> SignalProcessingAttributes<'_> {
        SignalProcessingAttributes { engine: self }
    }
}

macro_rules! family_methods {
    ($($(#[$doc:meta])* $method:ident => $kind:ident,)*) => {
        $(
            $(#[$doc])*
            pub fn $method(&self, cube: &SeismicCube, metadata: &AxisMetadata) -> AttrResult<AttributeCube> {
                self.engine.compute(AttributeKind::$kind, cube, metadata)
            }
        )*
    };
}

/// Complex-trace attribute family of an [`AttributeEngine`].
#[derive(Debug, Clone, Copy)]
pub struct ComplexTraceAttributes<'a> {
    engine: &'a AttributeEngine,
}

impl ComplexTraceAttributes<'_> {
    family_methods! {
        /// Instantaneous amplitude.
        envelope => Envelope,
        /// Instantaneous phase in radians, (−π, π].
        instantaneous_phase => InstantaneousPhase,
        /// Instantaneous frequency in cycles per sample-axis unit.
        instantaneous_frequency => InstantaneousFrequency,
        quadrature => Quadrature,
        cosine_of_phase => CosineOfPhase,
        relative_amplitude_change => RelativeAmplitudeChange,
        sweetness => Sweetness,
    }
}

/// Signal-processing attribute family of an [`AttributeEngine`].
#[derive(Debug, Clone, Copy)]
pub struct SignalProcessingAttributes<'a> {
    engine: &'a AttributeEngine,
}

impl SignalProcessingAttributes<'_> {
    family_methods! {
        first_derivative => FirstDerivative,
        /// Second derivative along the sample axis.
        second_derivative => SecondDerivative,
        rms_amplitude => RmsAmplitude,
        phase_rotation => PhaseRotation,
        reflection_intensity => ReflectionIntensity,
    }
}
