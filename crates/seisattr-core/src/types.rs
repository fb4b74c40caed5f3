//! Core types shared across the attribute engine
//!
//! Sample aliases, the error taxonomy, and the floating point precision
//! selector used by every operator.
//!
//! ## Error Propagation
//!
//! ```text
//!   validation ──► InvalidCubeMetadata           (before any work starts)
//!   windowing  ──► InvalidRadius / ShapeMismatch
//!   operator   ──► UnsupportedConfig / NonFiniteInput
//!                      │
//!                      ▼
//!   driver     ──► AtTrace { inline, crossline, source }   (whole cube fails)
//!   scheduler  ──► Cancelled / TimedOut / ResourceExhausted
//! ```
//!
//! Nothing is retried. Per-trace failures abort the whole cube.

use serde::{Deserialize, Serialize};

/// A single amplitude or attribute sample.
pub type Sample = f64;

/// Result type for attribute operations
pub type AttrResult<T> = Result<T, AttrError>;

/// Errors that can occur while computing attributes
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AttrError {
    #[error("Invalid cube metadata: {0}")]
    InvalidCubeMetadata(String),

    #[error("Invalid kernel radius: {0}. Must be >= 0")]
    InvalidRadius(i64),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Unsupported operator configuration: {0}")]
    UnsupportedConfig(String),

    #[error("Non-finite input sample at index {index}")]
    NonFiniteInput { index: usize },

    #[error("Trace at inline {inline}, crossline {crossline} failed: {source}")]
    AtTrace {
        inline: usize,
        crossline: usize,
        #[source]
        source: Box<AttrError>,
    },

    #[error("Computation cancelled")]
    Cancelled,

    #[error("Computation timed out after {elapsed_ms} ms")]
    TimedOut { elapsed_ms: u64 },

    #[error("Unable to allocate {bytes} bytes")]
    ResourceExhausted { bytes: usize },
}

impl AttrError {
    /// Wrap an operator error with the grid position of the failing trace.
    pub fn at_trace(self, inline: usize, crossline: usize) -> Self {
        AttrError::AtTrace {
            inline,
            crossline,
            source: Box::new(self),
        }
    }

    /// The innermost error, with trace tagging stripped.
    pub fn root(&self) -> &AttrError {
        match self {
            AttrError::AtTrace { source, .. } => source.root(),
            other => other,
        }
    }

    /// `(inline, crossline)` of the failing trace, if the error was tagged.
    pub fn trace_position(&self) -> Option<(usize, usize)> {
        match self {
            AttrError::AtTrace {
                inline, crossline, ..
            } => Some((*inline, *crossline)),
            _ => None,
        }
    }

    /// Check if this error is a precondition failure reported before any work.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.root(),
            AttrError::InvalidCubeMetadata(_)
                | AttrError::InvalidRadius(_)
                | AttrError::UnsupportedConfig(_)
        )
    }
}

/// Output sample precision.
///
/// All arithmetic happens in `f64`; `Single` rounds every output sample to
/// the nearest `f32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 32-bit output samples
    Single,
    /// 64-bit output samples
    Double,
}

impl Default for Precision {
    fn default() -> Self {
        Precision::Double
    }
}

impl Precision {
    /// Round a sample to this precision.
    #[inline]
    pub fn quantize(self, x: Sample) -> Sample {
        match self {
            Precision::Single => x as f32 as f64,
            Precision::Double => x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_and_position() {
        let err = AttrError::NonFiniteInput { index: 3 }.at_trace(1, 2);
        assert_eq!(err.trace_position(), Some((1, 2)));
        assert_eq!(err.root(), &AttrError::NonFiniteInput { index: 3 });
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_classification() {
        assert!(AttrError::InvalidRadius(-1).is_validation());
        assert!(AttrError::UnsupportedConfig("x".into())
            .at_trace(0, 0)
            .is_validation());
        assert!(!AttrError::Cancelled.is_validation());
    }

    #[test]
    fn test_error_display() {
        let err = AttrError::ShapeMismatch {
            expected: 8,
            actual: 0,
        };
        assert_eq!(err.to_string(), "Shape mismatch: expected 8, got 0");
    }

    #[test]
    fn test_precision_quantize() {
        let x = 0.1_f64;
        assert_eq!(Precision::Double.quantize(x), x);
        assert_eq!(Precision::Single.quantize(x), 0.1_f32 as f64);
        assert_ne!(Precision::Single.quantize(x), x);
    }
}
