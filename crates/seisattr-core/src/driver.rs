//! Cube Driver — apply a trace operator to every trace of a cube
//!
//! The inline/crossline grid is tiled into rectangular chunks. Chunks are
//! processed in waves of `workers` chunks; within a wave each chunk owns its
//! output buffer, and finished buffers are scattered into disjoint
//! coordinates of the output cube.
//!
//! ```text
//!   crossline ──►
//!   ┌──────┬──────┬──────┐
//!   │  c0  │  c1  │  c2  │   wave 0: c0 c1 c2 c3   (workers = 4)
//!   ├──────┼──────┼──────┤   wave 1: c4 c5
//!   │  c3  │  c4  │  c5  │
//!   └──────┴──────┴──────┘   between waves: cancellation, timeout
//!   inline ▼
//! ```
//!
//! Output at a coordinate depends only on the input trace there, so chunk
//! size and execution order never change the result. The first failing
//! trace aborts the run; no partial cube is returned.
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::cube::{AxisMetadata, SeismicCube};
//! use seisattr_core::driver::{CubeDriver, DriverConfig};
//! use seisattr_core::operators::{OperatorConfig, SecondDerivative};
//!
//! let cube = SeismicCube::from_fn([4, 4, 8], |il, xl, s| (il + xl) as f64 + 2.0 * s as f64);
//! let meta = AxisMetadata::unit(cube.shape());
//! let driver = CubeDriver::new(DriverConfig::default().with_chunk_size(3));
//! let out = driver
//!     .run(&cube, &meta, &SecondDerivative, &OperatorConfig::default())
//!     .unwrap();
//! assert_eq!(out.shape(), [4, 4, 8]);
//! assert!(out.as_slice().iter().all(|y| y.abs() < 1e-9));
//! ```

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::cube::{AttributeCube, AxisMetadata, SeismicCube};
use crate::observe::EngineMetrics;
use crate::operators::{check_support, Kernels, OperatorConfig, TraceOperator, TraceProcessor};
use crate::types::{AttrError, AttrResult, Sample};

/// Default working-memory budget: 256 MiB.
pub const DEFAULT_MEMORY_BUDGET: usize = 256 * 1024 * 1024;

/// Scheduling options for [`CubeDriver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Traces per chunk (None = derived from the memory budget)
    pub chunk_size: Option<usize>,
    /// Working memory budget for chunk buffers in bytes
    pub memory_budget_bytes: usize,
    /// Concurrent chunks per wave (0 = rayon's default thread count)
    pub workers: usize,
    /// Abort the run once this much wall time has elapsed
    pub timeout_ms: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            chunk_size: None,
            memory_budget_bytes: DEFAULT_MEMORY_BUDGET,
            workers: 0,
            timeout_ms: None,
        }
    }
}

impl DriverConfig {
    pub fn with_chunk_size(mut self, traces: usize) -> Self {
        self.chunk_size = Some(traces);
        self
    }

    pub fn with_memory_budget(mut self, bytes: usize) -> Self {
        self.memory_budget_bytes = bytes;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn validate(&self) -> AttrResult<()> {
        if self.chunk_size == Some(0) {
            return Err(AttrError::UnsupportedConfig(
                "chunk_size must be at least 1 trace".to_string(),
            ));
        }
        if self.memory_budget_bytes == 0 {
            return Err(AttrError::UnsupportedConfig(
                "memory_budget_bytes must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Chunks processed concurrently in one wave.
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            return self.workers;
        }
        #[cfg(feature = "parallel")]
        let default = rayon::current_num_threads().max(1);
        #[cfg(not(feature = "parallel"))]
        let default = 1;
        default
    }

    /// Traces per chunk for a cube of `total_traces` traces of `trace_len`
    /// samples padded by `padding` on each side.
    ///
    /// Without an explicit size, `budget / (8 · padded_len · 2 · workers)`
    /// clamped to `[1, total_traces]`: each in-flight chunk holds an output
    /// buffer plus padding scratch.
    pub fn chunk_size_for(&self, total_traces: usize, trace_len: usize, padding: usize) -> usize {
        let upper = total_traces.max(1);
        let size = match self.chunk_size {
            Some(size) => size,
            None => {
                let padded_len = trace_len + 2 * padding;
                let per_trace = std::mem::size_of::<Sample>()
                    .saturating_mul(padded_len)
                    .saturating_mul(2)
                    .saturating_mul(self.effective_workers());
                self.memory_budget_bytes / per_trace.max(1)
            }
        };
        size.clamp(1, upper)
    }
}

/// Cooperative cancellation flag shared between a caller and running drivers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; runs stop at the next wave boundary.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Clear a previous cancellation so the token can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }
}

/// A rectangular tile of the inline/crossline grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position in plan order
    pub index: usize,
    pub inlines: Range<usize>,
    pub crosslines: Range<usize>,
}

impl Chunk {
    pub fn trace_count(&self) -> usize {
        self.inlines.len() * self.crosslines.len()
    }

    /// Trace coordinates, inline-major.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.inlines
            .clone()
            .flat_map(move |il| self.crosslines.clone().map(move |xl| (il, xl)))
    }
}

/// Tiling of a grid into chunks of at most `chunk_size` traces.
///
/// A chunk spans whole crossline rows when `chunk_size >= n_crossline`,
/// otherwise a run of `chunk_size` traces within one row.
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    chunk_size: usize,
    chunks: Vec<Chunk>,
}

impl ChunkPlan {
    pub fn new(n_inline: usize, n_crossline: usize, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let (rows, cols) = if n_crossline == 0 {
            (1, 1)
        } else if chunk_size >= n_crossline {
            (chunk_size / n_crossline, n_crossline)
        } else {
            (1, chunk_size)
        };

        let mut chunks = Vec::new();
        if n_crossline > 0 {
            for il in (0..n_inline).step_by(rows) {
                for xl in (0..n_crossline).step_by(cols) {
                    chunks.push(Chunk {
                        index: chunks.len(),
                        inlines: il..(il + rows).min(n_inline),
                        crosslines: xl..(xl + cols).min(n_crossline),
                    });
                }
            }
        }
        Self { chunk_size, chunks }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Inputs shared read-only by every chunk of a run.
struct RunContext<'a> {
    cube: &'a SeismicCube,
    op: &'a dyn TraceOperator,
    config: &'a OperatorConfig,
    kernels: &'a Kernels,
    metrics: Option<&'a EngineMetrics>,
}

impl RunContext<'_> {
    /// Compute every trace of a chunk into a fresh buffer, inline-major.
    fn process_chunk(&self, chunk: &Chunk) -> AttrResult<Vec<Sample>> {
        let started = Instant::now();
        let n = self.cube.trace_len();
        let mut processor = TraceProcessor::with_kernels(self.op, self.config, self.kernels, n)?;
        let mut buffer = vec![0.0; chunk.trace_count() * n];

        for ((il, xl), out) in chunk.positions().zip(buffer.chunks_exact_mut(n)) {
            if let Err(e) = processor.process_into(self.cube.trace(il, xl), out) {
                if let Some(m) = self.metrics {
                    m.trace_failures.inc();
                }
                return Err(e.at_trace(il, xl));
            }
        }

        let elapsed_us = started.elapsed().as_secs_f64() * 1e6;
        if let Some(m) = self.metrics {
            m.chunk_latency_us.observe(elapsed_us);
        }
        tracing::trace!(
            chunk = chunk.index,
            traces = chunk.trace_count(),
            elapsed_us,
            "chunk complete"
        );
        Ok(buffer)
    }
}

/// Runs an operator over whole cubes.
#[derive(Debug, Clone, Default)]
pub struct CubeDriver {
    config: DriverConfig,
    token: CancellationToken,
    metrics: Option<Arc<EngineMetrics>>,
}

impl CubeDriver {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Observe this token between waves.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Record run, chunk, and trace metrics.
    pub fn with_metrics(mut self, metrics: Arc<EngineMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Apply `op` to every trace of `cube`.
    ///
    /// The operator is checked against the trace length before any work, so
    /// configuration errors are reported untagged. Trace failures are tagged
    /// with their grid position via [`AttrError::AtTrace`].
    pub fn run(
        &self,
        cube: &SeismicCube,
        metadata: &AxisMetadata,
        op: &dyn TraceOperator,
        config: &OperatorConfig,
    ) -> AttrResult<AttributeCube> {
        let span = tracing::debug_span!("attribute_run", attribute = op.name());
        let _entered = span.enter();
        let started = Instant::now();
        let metrics = self.metrics.as_deref();
        if let Some(m) = metrics {
            m.runs_started.inc();
        }

        self.config.validate()?;
        let n = cube.trace_len();
        check_support(op, n, config)?;
        let config = &config.for_trace_len(n);
        let padding = op.padding(config)?;
        let kernels = op.prepare(config, n)?;

        let workers = self.config.effective_workers();
        let chunk_size = self
            .config
            .chunk_size_for(cube.trace_count(), n, padding);
        let plan = ChunkPlan::new(cube.n_inline(), cube.n_crossline(), chunk_size);
        tracing::debug!(
            attribute = op.name(),
            shape = ?cube.shape(),
            chunks = plan.len(),
            chunk_size,
            workers,
            padding,
            "starting attribute run"
        );

        let mut output = SeismicCube::try_zeros(cube.shape())?;
        let ctx = RunContext {
            cube,
            op,
            config,
            kernels: &kernels,
            metrics,
        };
        let pool = self.thread_pool()?;

        for wave in plan.chunks().chunks(workers) {
            self.check_interrupted(started, op.name())?;

            if let Some(m) = metrics {
                m.chunks_in_flight.add(wave.len() as i64);
            }
            let results = run_wave(&ctx, wave, pool.as_ref());
            if let Some(m) = metrics {
                m.chunks_in_flight.add(-(wave.len() as i64));
            }

            // Plan order: the earliest failing chunk in the wave wins
            for (chunk, result) in wave.iter().zip(results) {
                let buffer = match result {
                    Ok(buffer) => buffer,
                    Err(e) => {
                        tracing::warn!(attribute = op.name(), chunk = chunk.index, error = %e, "attribute run failed");
                        return Err(e);
                    }
                };
                scatter(&mut output, chunk, &buffer);
                if let Some(m) = metrics {
                    m.chunks_completed.inc();
                    m.traces_processed.inc_by(chunk.trace_count() as u64);
                }
            }
        }

        if let Some(m) = metrics {
            m.runs_completed.inc();
        }
        tracing::debug!(
            attribute = op.name(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "attribute run complete"
        );
        Ok(AttributeCube::new(op.name(), *metadata, output))
    }

    fn check_interrupted(&self, started: Instant, attribute: &str) -> AttrResult<()> {
        if self.token.is_cancelled() {
            if let Some(m) = &self.metrics {
                m.runs_cancelled.inc();
            }
            tracing::warn!(attribute, "attribute run cancelled");
            return Err(AttrError::Cancelled);
        }
        if let Some(limit) = self.config.timeout_ms {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            if elapsed_ms >= limit {
                if let Some(m) = &self.metrics {
                    m.runs_timed_out.inc();
                }
                tracing::warn!(attribute, elapsed_ms, limit, "attribute run timed out");
                return Err(AttrError::TimedOut { elapsed_ms });
            }
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn thread_pool(&self) -> AttrResult<Option<rayon::ThreadPool>> {
        if self.config.workers == 0 {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("seisattr-worker-{i}"))
            .build()
            .map(Some)
            .map_err(|e| AttrError::UnsupportedConfig(format!("worker pool: {e}")))
    }

    #[cfg(not(feature = "parallel"))]
    fn thread_pool(&self) -> AttrResult<Option<()>> {
        Ok(None)
    }
}

#[cfg(feature = "parallel")]
fn run_wave(
    ctx: &RunContext<'_>,
    wave: &[Chunk],
    pool: Option<&rayon::ThreadPool>,
) -> Vec<AttrResult<Vec<Sample>>> {
    use rayon::prelude::*;

    let work = || {
        wave.par_iter()
            .map(|chunk| ctx.process_chunk(chunk))
            .collect::<Vec<_>>()
    };
    match pool {
        Some(pool) => pool.install(work),
        None => work(),
    }
}

#[cfg(not(feature = "parallel"))]
fn run_wave(ctx: &RunContext<'_>, wave: &[Chunk], _pool: Option<&()>) -> Vec<AttrResult<Vec<Sample>>> {
    wave.iter().map(|chunk| ctx.process_chunk(chunk)).collect()
}

/// Copy a chunk buffer into its coordinates of the output cube.
fn scatter(output: &mut SeismicCube, chunk: &Chunk, buffer: &[Sample]) {
    let n = output.trace_len();
    for ((il, xl), trace) in chunk.positions().zip(buffer.chunks_exact(n)) {
        output.trace_mut(il, xl).copy_from_slice(trace);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Envelope, FirstDerivative, SecondDerivative};
    use crate::window::BoundaryPolicy;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;

    fn random_cube(shape: [usize; 3], seed: u64) -> SeismicCube {
        let mut rng = StdRng::seed_from_u64(seed);
        SeismicCube::from_fn(shape, |_, _, _| rng.gen_range(-1.0..1.0))
    }

    fn run(cube: &SeismicCube, driver: &CubeDriver, op: &dyn TraceOperator) -> AttrResult<AttributeCube> {
        let meta = AxisMetadata::unit(cube.shape());
        driver.run(cube, &meta, op, &OperatorConfig::default())
    }

    #[test]
    fn test_plan_covers_grid_once() {
        for (ni, nx, size) in [(4, 4, 1), (4, 4, 3), (4, 4, 8), (5, 3, 4), (7, 9, 100), (3, 5, 5)] {
            let plan = ChunkPlan::new(ni, nx, size);
            let mut seen = HashSet::new();
            for (i, chunk) in plan.chunks().iter().enumerate() {
                assert_eq!(chunk.index, i);
                assert!(chunk.trace_count() <= size.max(1));
                assert!(chunk.trace_count() > 0);
                for pos in chunk.positions() {
                    assert!(seen.insert(pos), "{pos:?} covered twice");
                }
            }
            assert_eq!(seen.len(), ni * nx);
        }
    }

    #[test]
    fn test_plan_row_tiles() {
        let plan = ChunkPlan::new(4, 4, 8);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.chunks()[1].inlines, 2..4);
        assert_eq!(plan.chunks()[1].crosslines, 0..4);

        let plan = ChunkPlan::new(2, 5, 2);
        assert_eq!(plan.len(), 6);
        assert_eq!(plan.chunks()[2].crosslines, 4..5);
    }

    #[test]
    fn test_default_chunk_size_from_budget() {
        let config = DriverConfig::default()
            .with_workers(2)
            .with_memory_budget(8 * 20 * 2 * 2 * 10);
        // padded_len = 16 + 2·2 = 20 → 10 traces per chunk
        assert_eq!(config.chunk_size_for(1000, 16, 2), 10);
        assert_eq!(config.chunk_size_for(4, 16, 2), 4);

        let tiny = DriverConfig::default().with_workers(1).with_memory_budget(1);
        assert_eq!(tiny.chunk_size_for(50, 16, 0), 1);
    }

    #[test]
    fn test_shape_preserved_and_tagged() {
        let cube = random_cube([3, 5, 32], 1);
        let out = run(&cube, &CubeDriver::default(), &FirstDerivative).unwrap();
        assert_eq!(out.shape(), cube.shape());
        assert_eq!(out.attribute(), "first-derivative");
        assert_eq!(out.metadata(), &AxisMetadata::unit(cube.shape()));
    }

    #[test]
    fn test_chunk_size_invariance() {
        let cube = random_cube([4, 6, 40], 2);
        let whole = CubeDriver::new(DriverConfig::default().with_chunk_size(24));
        let single = CubeDriver::new(DriverConfig::default().with_chunk_size(1).with_workers(3));
        let odd = CubeDriver::new(DriverConfig::default().with_chunk_size(5).with_workers(2));

        let config = OperatorConfig::default().with_hilbert_radius(8);
        let meta = AxisMetadata::unit(cube.shape());
        let a = whole.run(&cube, &meta, &Envelope, &config).unwrap();
        let b = single.run(&cube, &meta, &Envelope, &config).unwrap();
        let c = odd.run(&cube, &meta, &Envelope, &config).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
        assert_eq!(a.as_slice(), c.as_slice());
    }

    #[test]
    fn test_matches_per_trace_application() {
        let cube = random_cube([2, 3, 24], 3);
        let out = run(&cube, &CubeDriver::default(), &SecondDerivative).unwrap();
        for il in 0..2 {
            for xl in 0..3 {
                let expected =
                    crate::operators::apply_trace(&SecondDerivative, cube.trace(il, xl), &OperatorConfig::default())
                        .unwrap();
                assert_eq!(out.trace(il, xl), expected.as_slice());
            }
        }
    }

    #[test]
    fn test_ramp_cube_second_derivative_zero_pad() {
        let cube = SeismicCube::from_fn([4, 4, 8], |il, xl, s| {
            (il + 1) as f64 * s as f64 - 0.5 * xl as f64
        });
        let meta = AxisMetadata::unit(cube.shape());
        let config = OperatorConfig::default()
            .with_kernel_radius(1)
            .with_boundary(BoundaryPolicy::ZeroPad);
        let out = CubeDriver::default()
            .run(&cube, &meta, &SecondDerivative, &config)
            .unwrap();
        assert_eq!(out.shape(), [4, 4, 8]);
        assert!(out.as_slice().iter().all(|y| y.abs() < 1e-9));
    }

    #[test]
    fn test_nan_trace_fails_whole_cube() {
        let mut data = random_cube([3, 3, 16], 4).into_vec();
        // inline 2, crossline 1, sample 7
        data[(2 * 3 + 1) * 16 + 7] = f64::NAN;
        let cube = SeismicCube::from_vec([3, 3, 16], data).unwrap();

        for chunk_size in [1, 4, 9] {
            let driver = CubeDriver::new(DriverConfig::default().with_chunk_size(chunk_size));
            let err = run(&cube, &driver, &SecondDerivative).unwrap_err();
            assert_eq!(err.trace_position(), Some((2, 1)));
            assert_eq!(err.root(), &AttrError::NonFiniteInput { index: 7 });
        }
    }

    #[test]
    fn test_radius_too_large_is_untagged() {
        let cube = random_cube([2, 2, 8], 5);
        let meta = AxisMetadata::unit(cube.shape());
        let config = OperatorConfig::default().with_kernel_radius(10);
        let err = CubeDriver::default()
            .run(&cube, &meta, &SecondDerivative, &config)
            .unwrap_err();
        assert!(matches!(err, AttrError::UnsupportedConfig(_)));
    }

    #[test]
    fn test_cancelled_before_run() {
        let token = CancellationToken::new();
        token.cancel();
        let metrics = Arc::new(EngineMetrics::new());
        let driver = CubeDriver::default()
            .with_token(token.clone())
            .with_metrics(metrics.clone());
        let err = run(&random_cube([2, 2, 16], 6), &driver, &FirstDerivative).unwrap_err();
        assert_eq!(err, AttrError::Cancelled);
        assert_eq!(metrics.snapshot().runs_cancelled, 1);

        token.reset();
        assert!(run(&random_cube([2, 2, 16], 6), &driver, &FirstDerivative).is_ok());
    }

    /// Copies traces through and cancels `token` once `after` traces are done.
    struct CancelAfter {
        token: CancellationToken,
        after: usize,
        seen: AtomicUsize,
    }

    impl TraceOperator for CancelAfter {
        fn name(&self) -> &'static str {
            "cancel-after"
        }

        fn kernel_radius(&self, _config: &OperatorConfig) -> AttrResult<usize> {
            Ok(0)
        }

        fn evaluate(&self, padded: &[Sample], out: &mut [Sample], _config: &OperatorConfig, _kernels: &Kernels) -> AttrResult<()> {
            out.copy_from_slice(padded);
            if self.seen.fetch_add(1, Ordering::SeqCst) + 1 >= self.after {
                self.token.cancel();
            }
            Ok(())
        }
    }

    #[test]
    fn test_cancelled_between_waves() {
        let token = CancellationToken::new();
        let op = CancelAfter {
            token: token.clone(),
            after: 6,
            seen: AtomicUsize::new(0),
        };
        let metrics = Arc::new(EngineMetrics::new());
        // One row of 4 traces per chunk, one chunk per wave
        let driver = CubeDriver::new(DriverConfig::default().with_chunk_size(4).with_workers(1))
            .with_token(token.clone())
            .with_metrics(metrics.clone());

        let result = run(&random_cube([4, 4, 8], 12), &driver, &op);
        assert!(matches!(result, Err(AttrError::Cancelled)), "{result:?}");

        // The wave that observed the cancel finishes; later waves never start
        assert_eq!(op.seen.load(Ordering::SeqCst), 8);
        let snap = metrics.snapshot();
        assert_eq!(snap.chunks_completed, 2);
        assert_eq!(snap.traces_processed, 8);
        assert_eq!(snap.runs_cancelled, 1);
        assert_eq!(snap.runs_completed, 0);
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_short_cube_default_hilbert_radius() {
        let cube = random_cube([4, 4, 8], 13);
        let out = run(&cube, &CubeDriver::default(), &Envelope).unwrap();
        assert_eq!(out.shape(), [4, 4, 8]);
        assert!(out.as_slice().iter().all(|&y| y >= 0.0));
    }

    #[test]
    fn test_zero_timeout() {
        let driver = CubeDriver::new(DriverConfig::default().with_timeout_ms(0));
        let err = run(&random_cube([2, 2, 16], 7), &driver, &FirstDerivative).unwrap_err();
        assert!(matches!(err, AttrError::TimedOut { .. }));
    }

    #[test]
    fn test_invalid_driver_config() {
        let driver = CubeDriver::new(DriverConfig::default().with_chunk_size(0));
        let err = run(&random_cube([2, 2, 16], 8), &driver, &FirstDerivative).unwrap_err();
        assert!(matches!(err, AttrError::UnsupportedConfig(_)));
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = Arc::new(EngineMetrics::new());
        let driver = CubeDriver::new(DriverConfig::default().with_chunk_size(2).with_workers(2))
            .with_metrics(metrics.clone());
        run(&random_cube([3, 4, 16], 9), &driver, &FirstDerivative).unwrap();

        let s = metrics.snapshot();
        assert_eq!(s.runs_started, 1);
        assert_eq!(s.runs_completed, 1);
        assert_eq!(s.traces_processed, 12);
        assert_eq!(s.chunks_completed, 6);
        assert_eq!(s.chunk_latency_count, 6);
        assert_eq!(s.chunks_in_flight, 0);
        assert_eq!(s.trace_failures, 0);
    }
}
