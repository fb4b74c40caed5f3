//! # Structured Logging
//!
//! Installs a global `tracing` subscriber for engine runs. Each cube run is
//! wrapped in an `attribute_run` span; the driver emits `debug!` events per
//! run, `trace!` events per chunk, and `warn!` on cancellation, timeout, or
//! failure.
//!
//! Filtering is built from three sources, strongest first: an explicit
//! `filter` directive string, `RUST_LOG`, then `level` plus the
//! `chunk_events` switch (which raises this crate alone to `trace`).
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::observe::{init_logging, LogConfig, LogFormat};
//!
//! let config = LogConfig {
//!     format: LogFormat::Compact,
//!     chunk_events: true,
//!     ..LogConfig::quiet()
//! };
//! init_logging(&config);
//!
//! tracing::debug!(traces = 1024, "cube complete");
//! ```

use serde::{Deserialize, Serialize};
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Tracing target of this crate, used for crate-scoped directives.
const CRATE_TARGET: &str = "seisattr_core";

/// Minimum severity of emitted events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    /// Run start/finish with shape and chunk plan
    Debug,
    #[default]
    Info,
    /// Cancellations, timeouts and failed runs
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line, for batch jobs feeding a log store
    Json,
    /// Multi-line, colored
    #[default]
    Pretty,
    Compact,
}

/// Logging section of the engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub timestamps: bool,
    /// Emit per-chunk `trace!` events from the driver regardless of `level`
    pub chunk_events: bool,
    /// Log `attribute_run` span close with its busy/idle time
    pub run_timings: bool,
    /// Show the worker thread that emitted each event
    pub worker_threads: bool,
    /// Directive string overriding everything else
    /// (e.g. `"seisattr_core::driver=trace,warn"`)
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            timestamps: true,
            chunk_events: false,
            run_timings: false,
            worker_threads: false,
            filter: None,
        }
    }
}

impl LogConfig {
    /// Per-run detail with timings, for interactive work.
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            run_timings: true,
            worker_threads: true,
            ..Self::default()
        }
    }

    /// JSON lines at info level.
    pub fn production() -> Self {
        Self {
            format: LogFormat::Json,
            ..Self::default()
        }
    }

    /// Errors only, no timestamps.
    pub fn quiet() -> Self {
        Self {
            level: LogLevel::Error,
            format: LogFormat::Compact,
            timestamps: false,
            ..Self::default()
        }
    }

    /// Directive string used when neither `filter` nor `RUST_LOG` is set.
    pub fn directives(&self) -> String {
        if self.chunk_events && self.level > LogLevel::Trace {
            format!("{},{}=trace", self.level, CRATE_TARGET)
        } else {
            self.level.to_string()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.directives());
        match self.filter.as_deref() {
            Some(custom) => EnvFilter::try_new(custom).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.run_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

macro_rules! configured {
    ($layer:expr, $config:expr) => {
        $layer
            .with_thread_names($config.worker_threads)
            .with_span_events($config.span_events())
    };
}

fn fmt_layer<S>(config: &LogConfig) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    match (config.format, config.timestamps) {
        (LogFormat::Json, true) => configured!(fmt::layer().json(), config).boxed(),
        (LogFormat::Json, false) => configured!(fmt::layer().json().without_time(), config).boxed(),
        (LogFormat::Pretty, true) => configured!(fmt::layer().pretty(), config).boxed(),
        (LogFormat::Pretty, false) => configured!(fmt::layer().pretty().without_time(), config).boxed(),
        (LogFormat::Compact, true) => configured!(fmt::layer().compact(), config).boxed(),
        (LogFormat::Compact, false) => configured!(fmt::layer().compact().without_time(), config).boxed(),
    }
}

/// Install the global subscriber.
///
/// Returns `false` when one is already installed; the call then changes
/// nothing.
pub fn init_logging(config: &LogConfig) -> bool {
    let subscriber = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer(config));
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
