//! Complex-trace attributes
//!
//! Attributes derived from the analytic signal `z = x + j·H{x}` built by the
//! FIR [`HilbertKernel`]:
//!
//! | Attribute                 | Definition                          |
//! |---------------------------|-------------------------------------|
//! | envelope                  | `|z|`                               |
//! | instantaneous-phase       | `arg z`, wrapped to (−π, π]         |
//! | instantaneous-frequency   | `d(unwrapped phase)/dt / 2π`        |
//! | quadrature                | `Im z`                              |
//! | cosine-of-phase           | `Re z / |z|`                        |
//! | relative-amplitude-change | `d|z|/dt / |z|`                     |
//! | sweetness                 | `|z| / sqrt(|f|)`                   |
//!
//! All of them read `hilbert_radius` samples of padding on each side; when
//! the radius is unset it is fitted to the trace (see
//! [`OperatorConfig::for_trace_len`]).
//! Derivatives with respect to time use the centered difference inside the
//! trace and a one-sided difference at the first and last sample.

use std::f64::consts::PI;

use super::{gradient, Kernels, OperatorConfig, TraceOperator};
use crate::hilbert::HilbertKernel;
use crate::phase_unwrap::{unwrap_in_place, wrap_phase};
use crate::types::{AttrResult, Sample};

/// Hilbert half-width actually used (at least one tap pair).
pub(super) fn hilbert_footprint(config: &OperatorConfig) -> AttrResult<usize> {
    Ok(config.hilbert_radius()?.max(1))
}

pub(super) fn prepare_hilbert(config: &OperatorConfig) -> AttrResult<Kernels> {
    Ok(Kernels::default().with_hilbert(HilbertKernel::new(hilbert_footprint(config)?)))
}

/// In-phase and quadrature components at each unpadded sample.
pub(super) fn analytic_parts<'p>(padded: &'p [Sample], n: usize, kernels: &Kernels) -> AttrResult<(&'p [Sample], Vec<Sample>)> {
    let kernel = kernels.hilbert()?;
    let m = kernel.radius();
    let quadrature = kernel.quadrature(padded);
    debug_assert_eq!(quadrature.len(), n);
    Ok((&padded[m..m + n], quadrature))
}

fn envelope_into(re: &[Sample], im: &[Sample], out: &mut [Sample]) {
    for ((y, &a), &b) in out.iter_mut().zip(re).zip(im) {
        *y = (a * a + b * b).sqrt();
    }
}

fn phase_into(re: &[Sample], im: &[Sample], out: &mut [Sample]) {
    for ((y, &a), &b) in out.iter_mut().zip(re).zip(im) {
        *y = wrap_phase(b.atan2(a));
    }
}

fn frequency_into(re: &[Sample], im: &[Sample], out: &mut [Sample], h: f64) {
    let mut phase = vec![0.0; out.len()];
    phase_into(re, im, &mut phase);
    unwrap_in_place(&mut phase);
    gradient(&phase, out, 2.0 * PI * h);
}

/// `num / den`, 0 where the denominator vanishes.
#[inline]
fn safe_ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

macro_rules! hilbert_kernel_impl {
    () => {
        fn kernel_radius(&self, config: &OperatorConfig) -> AttrResult<usize> {
            hilbert_footprint(config)
        }

        fn prepare(&self, config: &OperatorConfig, _trace_len: usize) -> AttrResult<Kernels> {
            prepare_hilbert(config)
        }
    };
}

/// Instantaneous amplitude of the analytic signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Envelope;

impl TraceOperator for Envelope {
    fn name(&self) -> &'static str {
        "envelope"
    }

    hilbert_kernel_impl!();

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], _config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (re, im) = analytic_parts(padded, out.len(), kernels)?;
        envelope_into(re, &im, out);
        Ok(())
    }
}

/// Phase of the analytic signal in radians, (−π, π].
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantaneousPhase;

impl TraceOperator for InstantaneousPhase {
    fn name(&self) -> &'static str {
        "instantaneous-phase"
    }

    hilbert_kernel_impl!();

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], _config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (re, im) = analytic_parts(padded, out.len(), kernels)?;
        phase_into(re, &im, out);
        Ok(())
    }
}

/// Rate of change of the unwrapped phase, in cycles per unit of the sample axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantaneousFrequency;

impl TraceOperator for InstantaneousFrequency {
    fn name(&self) -> &'static str {
        "instantaneous-frequency"
    }

    hilbert_kernel_impl!();

    fn min_trace_len(&self, _config: &OperatorConfig) -> usize {
        2
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (re, im) = analytic_parts(padded, out.len(), kernels)?;
        frequency_into(re, &im, out, config.interval());
        Ok(())
    }
}

/// Imaginary (Hilbert-transformed) part of the analytic signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quadrature;

impl TraceOperator for Quadrature {
    fn name(&self) -> &'static str {
        "quadrature"
    }

    hilbert_kernel_impl!();

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], _config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (_, im) = analytic_parts(padded, out.len(), kernels)?;
        out.copy_from_slice(&im);
        Ok(())
    }
}

/// Cosine of the instantaneous phase; amplitude-normalized trace.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineOfPhase;

impl TraceOperator for CosineOfPhase {
    fn name(&self) -> &'static str {
        "cosine-of-phase"
    }

    hilbert_kernel_impl!();

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], _config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (re, im) = analytic_parts(padded, out.len(), kernels)?;
        envelope_into(re, &im, out);
        for (y, &a) in out.iter_mut().zip(re) {
            *y = safe_ratio(a, *y);
        }
        Ok(())
    }
}

/// Time derivative of the envelope normalized by the envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeAmplitudeChange;

impl TraceOperator for RelativeAmplitudeChange {
    fn name(&self) -> &'static str {
        "relative-amplitude-change"
    }

    hilbert_kernel_impl!();

    fn min_trace_len(&self, _config: &OperatorConfig) -> usize {
        2
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (re, im) = analytic_parts(padded, out.len(), kernels)?;
        let mut env = vec![0.0; out.len()];
        envelope_into(re, &im, &mut env);
        gradient(&env, out, config.interval());
        for (y, &e) in out.iter_mut().zip(&env) {
            *y = safe_ratio(*y, e);
        }
        Ok(())
    }
}

/// Envelope divided by the square root of instantaneous frequency.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sweetness;

impl TraceOperator for Sweetness {
    fn name(&self) -> &'static str {
        "sweetness"
    }

    hilbert_kernel_impl!();

    fn min_trace_len(&self, _config: &OperatorConfig) -> usize {
        2
    }

    fn evaluate(&self, padded: &[Sample], out: &mut [Sample], config: &OperatorConfig, kernels: &Kernels) -> AttrResult<()> {
        let (re, im) = analytic_parts(padded, out.len(), kernels)?;
        let mut freq = vec![0.0; out.len()];
        frequency_into(re, &im, &mut freq, config.interval());
        envelope_into(re, &im, out);
        for (y, &f) in out.iter_mut().zip(&freq) {
            *y = safe_ratio(*y, f.abs().sqrt());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::apply_trace;
    use crate::window::BoundaryPolicy;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const DT: f64 = 0.004;
    const F: f64 = 25.0;

    fn tone(n: usize, freq: f64, dt: f64) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 * dt).cos())
            .collect()
    }

    fn interior(n: usize, m: usize) -> std::ops::Range<usize> {
        (m + 1)..(n - m - 1)
    }

    #[test]
    fn test_envelope_zero_trace() {
        for policy in [
            BoundaryPolicy::ZeroPad,
            BoundaryPolicy::EdgeReplicate,
            BoundaryPolicy::Reflect,
        ] {
            let config = OperatorConfig::default().with_boundary(policy);
            let out = apply_trace(&Envelope, &vec![0.0; 64], &config).unwrap();
            assert!(out.iter().all(|&y| y == 0.0));
        }
    }

    #[test]
    fn test_envelope_non_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let trace: Vec<f64> = (0..100).map(|_| rng.gen_range(-5.0..5.0)).collect();
            let out = apply_trace(&Envelope, &trace, &OperatorConfig::default()).unwrap();
            assert!(out.iter().all(|&y| y >= 0.0));
        }
    }

    #[test]
    fn test_envelope_of_tone_is_constant() {
        let n = 256;
        let config = OperatorConfig::default().with_sample_interval(DT);
        let out = apply_trace(&Envelope, &tone(n, F, DT), &config).unwrap();
        for i in interior(n, 12) {
            assert!((out[i] - 1.0).abs() < 0.02, "envelope[{i}] = {}", out[i]);
        }
    }

    #[test]
    fn test_envelope_exact_at_quarter_rate() {
        let n = 128;
        let out = apply_trace(&Envelope, &tone(n, 0.25, 1.0), &OperatorConfig::default()).unwrap();
        for i in interior(n, 12) {
            assert!((out[i] - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_instantaneous_frequency_of_tone() {
        let n = 256;
        let config = OperatorConfig::default().with_sample_interval(DT);
        let out = apply_trace(&InstantaneousFrequency, &tone(n, F, DT), &config).unwrap();
        for i in interior(n, 12) {
            assert!((out[i] - F).abs() < 0.5, "freq[{i}] = {}", out[i]);
        }
    }

    #[test]
    fn test_instantaneous_frequency_unitless() {
        let n = 200;
        let out = apply_trace(&InstantaneousFrequency, &tone(n, 0.1, 1.0), &OperatorConfig::default()).unwrap();
        for i in interior(n, 12) {
            assert!((out[i] - 0.1).abs() < 0.002);
        }
    }

    #[test]
    fn test_phase_range_and_tone_phase() {
        let n = 128;
        let out = apply_trace(&InstantaneousPhase, &tone(n, 0.25, 1.0), &OperatorConfig::default()).unwrap();
        assert!(out.iter().all(|&p| p > -PI && p <= PI));
        for i in interior(n, 12) {
            let expected = wrap_phase(PI / 2.0 * i as f64);
            let diff = wrap_phase(out[i] - expected);
            assert!(diff.abs() < 1e-6, "phase[{i}] = {} vs {expected}", out[i]);
        }
    }

    #[test]
    fn test_quadrature_of_cosine_is_sine() {
        let n = 256;
        let config = OperatorConfig::default().with_sample_interval(DT);
        let out = apply_trace(&Quadrature, &tone(n, F, DT), &config).unwrap();
        for i in interior(n, 12) {
            let expected = (2.0 * PI * F * i as f64 * DT).sin();
            assert!((out[i] - expected).abs() < 0.02);
        }
    }

    #[test]
    fn test_cosine_of_phase_normalizes_amplitude() {
        let n = 256;
        let trace: Vec<f64> = tone(n, F, DT).iter().map(|x| 7.5 * x).collect();
        let config = OperatorConfig::default().with_sample_interval(DT);
        let out = apply_trace(&CosineOfPhase, &trace, &config).unwrap();
        assert!(out.iter().all(|&y| y.abs() <= 1.0 + 1e-12));
        for i in interior(n, 12) {
            assert!((out[i] - trace[i] / 7.5).abs() < 0.02);
        }
        let zeros = apply_trace(&CosineOfPhase, &vec![0.0; 64], &config).unwrap();
        assert!(zeros.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_relative_amplitude_change_of_tone() {
        let n = 256;
        let config = OperatorConfig::default().with_sample_interval(DT);
        let out = apply_trace(&RelativeAmplitudeChange, &tone(n, F, DT), &config).unwrap();

        // Gain error g - 1 makes the envelope 1 + (g - 1)·sin²(ωt), whose
        // relative derivative peaks at |g - 1|·ω
        let omega = 2.0 * PI * F;
        let ripple = (HilbertKernel::new(12).gain(omega * DT) - 1.0).abs();
        assert!(ripple < 0.01);
        let bound = ripple * omega;
        for i in interior(n, 13) {
            assert!(out[i].abs() < bound, "rac[{i}] = {} (bound {bound})", out[i]);
        }
    }

    #[test]
    fn test_relative_amplitude_change_zero_at_quarter_rate() {
        let n = 128;
        let out = apply_trace(&RelativeAmplitudeChange, &tone(n, 0.25, 1.0), &OperatorConfig::default()).unwrap();
        for i in interior(n, 13) {
            assert!(out[i].abs() < 1e-8, "rac[{i}] = {}", out[i]);
        }
    }

    #[test]
    fn test_sweetness_of_tone() {
        let n = 256;
        let config = OperatorConfig::default().with_sample_interval(DT);
        let out = apply_trace(&Sweetness, &tone(n, F, DT), &config).unwrap();
        for i in interior(n, 12) {
            assert!((out[i] - 1.0 / F.sqrt()).abs() < 0.01, "sweetness[{i}] = {}", out[i]);
        }
    }

    #[test]
    fn test_determinism() {
        let mut rng = StdRng::seed_from_u64(11);
        let trace: Vec<f64> = (0..90).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let config = OperatorConfig::default().with_sample_interval(DT);
        for op in [&Envelope as &dyn TraceOperator, &InstantaneousFrequency, &Sweetness] {
            let a = apply_trace(op, &trace, &config).unwrap();
            let b = apply_trace(op, &trace, &config).unwrap();
            assert_eq!(a, b, "{} not deterministic", op.name());
        }
    }

    #[test]
    fn test_hilbert_radius_limits_trace() {
        let config = OperatorConfig::default().with_hilbert_radius(12);
        assert!(apply_trace(&Envelope, &vec![1.0; 20], &config).is_err());
        assert!(apply_trace(&Envelope, &vec![1.0; 24], &config).is_ok());
    }

    #[test]
    fn test_default_radius_runs_on_short_traces() {
        let trace = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, -1.0];
        let config = OperatorConfig::default();
        let ops: [&dyn TraceOperator; 7] = [
            &Envelope,
            &InstantaneousPhase,
            &InstantaneousFrequency,
            &Quadrature,
            &CosineOfPhase,
            &RelativeAmplitudeChange,
            &Sweetness,
        ];
        for op in ops {
            for n in [2, 3, 8] {
                let out = apply_trace(op, &trace[..n], &config)
                    .unwrap_or_else(|e| panic!("{} on {n} samples: {e}", op.name()));
                assert_eq!(out.len(), n);
            }
        }
        let env = apply_trace(&Envelope, &trace, &config).unwrap();
        assert!(env.iter().all(|&y| y >= 0.0));
    }
}
