//! # Metrics Collection
//!
//! Lock-free engine metrics:
//!
//! - **Counters**: runs, traces processed, chunks completed, failures
//! - **Gauges**: chunks currently in flight
//! - **Histograms**: per-chunk latency
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::observe::EngineMetrics;
//!
//! let metrics = EngineMetrics::new();
//! metrics.chunks_completed.inc();
//! metrics.chunk_latency_us.observe(150.0);
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.chunks_completed, 1);
//! assert_eq!(snapshot.avg_chunk_latency_us(), 150.0);
//! ```

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// A simple atomic counter.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

/// A simple atomic gauge (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    pub fn new() -> Self {
        Self {
            value: AtomicI64::new(0),
        }
    }

    #[inline]
    pub fn set(&self, v: i64) {
        self.value.store(v, Ordering::Relaxed);
    }

    #[inline]
    pub fn add(&self, v: i64) {
        self.value.fetch_add(v, Ordering::Relaxed);
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Histogram with fixed bucket boundaries.
#[derive(Debug)]
pub struct Histogram {
    boundaries: Vec<f64>,
    /// One bucket per boundary plus an overflow bucket
    buckets: Vec<AtomicU64>,
    /// Sum of observations in thousandths
    sum_milli: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::latency_us()
    }
}

impl Histogram {
    pub fn new(boundaries: Vec<f64>) -> Self {
        let num_buckets = boundaries.len() + 1;
        Self {
            boundaries,
            buckets: (0..num_buckets).map(|_| AtomicU64::new(0)).collect(),
            sum_milli: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Buckets for chunk latencies in microseconds (1 µs to 10 s).
    pub fn latency_us() -> Self {
        Self::new(vec![
            1.0, 10.0, 100.0, 500.0, 1_000.0, 5_000.0, 10_000.0, 50_000.0, 100_000.0, 1_000_000.0,
            10_000_000.0,
        ])
    }

    pub fn observe(&self, value: f64) {
        let bucket_idx = self
            .boundaries
            .iter()
            .position(|&b| value < b)
            .unwrap_or(self.boundaries.len());

        self.buckets[bucket_idx].fetch_add(1, Ordering::Relaxed);
        self.sum_milli
            .fetch_add((value.max(0.0) * 1000.0) as u64, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sum(&self) -> f64 {
        self.sum_milli.load(Ordering::Relaxed) as f64 / 1000.0
    }

    pub fn bucket_counts(&self) -> Vec<u64> {
        self.buckets
            .iter()
            .map(|b| b.load(Ordering::Relaxed))
            .collect()
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    fn reset(&self) {
        for b in &self.buckets {
            b.store(0, Ordering::Relaxed);
        }
        self.sum_milli.store(0, Ordering::Relaxed);
        self.count.store(0, Ordering::Relaxed);
    }
}

/// Metrics shared by every run of one engine.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    // Runs
    /// Cube runs started
    pub runs_started: Counter,
    /// Cube runs that produced an attribute cube
    pub runs_completed: Counter,
    /// Runs stopped by a cancellation token
    pub runs_cancelled: Counter,
    /// Runs stopped by the timeout
    pub runs_timed_out: Counter,

    // Work
    /// Traces written to output cubes
    pub traces_processed: Counter,
    /// Chunks finished without error
    pub chunks_completed: Counter,
    /// Traces that failed an operator
    pub trace_failures: Counter,
    /// Chunks currently being processed
    pub chunks_in_flight: Gauge,

    // Timing
    /// Wall time per chunk in microseconds
    pub chunk_latency_us: Histogram,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            runs_started: self.runs_started.get(),
            runs_completed: self.runs_completed.get(),
            runs_cancelled: self.runs_cancelled.get(),
            runs_timed_out: self.runs_timed_out.get(),
            traces_processed: self.traces_processed.get(),
            chunks_completed: self.chunks_completed.get(),
            trace_failures: self.trace_failures.get(),
            chunks_in_flight: self.chunks_in_flight.get(),
            chunk_latency_count: self.chunk_latency_us.count(),
            chunk_latency_sum_us: self.chunk_latency_us.sum(),
        }
    }

    /// Reset counters and the latency histogram.
    pub fn reset(&self) {
        self.runs_started.reset();
        self.runs_completed.reset();
        self.runs_cancelled.reset();
        self.runs_timed_out.reset();
        self.traces_processed.reset();
        self.chunks_completed.reset();
        self.trace_failures.reset();
        self.chunks_in_flight.set(0);
        self.chunk_latency_us.reset();
    }
}

/// Point-in-time copy of [`EngineMetrics`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub runs_started: u64,
    pub runs_completed: u64,
    pub runs_cancelled: u64,
    pub runs_timed_out: u64,
    pub traces_processed: u64,
    pub chunks_completed: u64,
    pub trace_failures: u64,
    pub chunks_in_flight: i64,
    pub chunk_latency_count: u64,
    pub chunk_latency_sum_us: f64,
}

impl MetricsSnapshot {
    /// Mean chunk latency in microseconds.
    pub fn avg_chunk_latency_us(&self) -> f64 {
        if self.chunk_latency_count == 0 {
            0.0
        } else {
            self.chunk_latency_sum_us / self.chunk_latency_count as f64
        }
    }
}
