//! # Observability
//!
//! - **Logging**: structured events via `tracing`, installed with
//!   [`init_logging`]
//! - **Metrics**: atomic counters, gauges and a latency histogram updated by
//!   the cube driver ([`EngineMetrics`])
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use seisattr_core::observe::{init_logging, EngineMetrics, LogConfig};
//!
//! init_logging(&LogConfig::quiet());
//!
//! let metrics = Arc::new(EngineMetrics::new());
//! metrics.traces_processed.inc_by(16);
//! assert_eq!(metrics.snapshot().traces_processed, 16);
//! ```
//!
//! ```text
//!   driver ──► tracing::debug!/trace!/warn! ──► EnvFilter ──► fmt (json|pretty|compact)
//!          └─► EngineMetrics.{counters, histogram} ──► snapshot()
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use metrics::{Counter, EngineMetrics, Gauge, Histogram, MetricsSnapshot};

/// Install logging and create a metrics instance.
pub fn init(log_config: &LogConfig) -> EngineMetrics {
    init_logging(log_config);
    EngineMetrics::new()
}
