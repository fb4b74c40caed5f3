//! # Seismic Attribute Engine
//!
//! Computes derived attribute volumes from 3-D seismic amplitude cubes.
//! Every attribute is a pure per-trace operator; the engine pads each trace,
//! evaluates the operator, and assembles an output cube of the same shape.
//!
//! ## Overview
//!
//! - **Windowing**: zero-pad, edge-replicate, or reflect padding by kernel radius
//! - **Operators**: complex-trace attributes via an FIR Hilbert transform,
//!   finite-difference derivatives, RMS amplitude, phase rotation,
//!   reflection intensity
//! - **Driver**: chunked, optionally parallel traversal of the trace grid with
//!   cancellation, timeouts, and fail-fast error tagging
//! - **Façade**: metadata validation and attribute families
//!
//! ## Data Flow
//!
//! ```text
//! SeismicCube + AxisMetadata
//!   → validate → ChunkPlan → [per trace: pad → operator → quantize] → AttributeCube
//! ```
//!
//! ## Example
//!
//! ```rust
//! use seisattr_core::prelude::*;
//!
//! let cube = SeismicCube::from_fn([4, 4, 8], |il, _, s| il as f64 + 0.5 * s as f64);
//! let meta = AxisMetadata::unit(cube.shape());
//!
//! let engine = AttributeEngine::new(
//!     OperatorConfig::default().with_boundary(BoundaryPolicy::ZeroPad),
//!     DriverConfig::default(),
//! );
//! let curvature = engine.signal_processing().second_derivative(&cube, &meta).unwrap();
//! assert_eq!(curvature.shape(), cube.shape());
//! assert!(curvature.as_slice().iter().all(|y| y.abs() < 1e-9));
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): process chunks on a rayon thread pool

pub mod attributes;
pub mod config;
pub mod cube;
pub mod driver;
pub mod hilbert;
pub mod observe;
pub mod operators;
pub mod phase_unwrap;
pub mod stencil;
pub mod types;
pub mod window;

// Re-export main types
pub use attributes::{validate, AttributeEngine, ComplexTraceAttributes, SignalProcessingAttributes};
pub use config::{ConfigError, EngineConfig};
pub use cube::{AttributeCube, AxisMetadata, AxisRange, SeismicCube};
pub use driver::{CancellationToken, ChunkPlan, CubeDriver, DriverConfig};
pub use operators::{apply_trace, AttributeKind, EdgeStencil, Kernels, OperatorConfig, TraceOperator, TraceProcessor};
pub use types::{AttrError, AttrResult, Precision, Sample};
pub use window::{pad_trace, BoundaryPolicy, TraceWindow};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::attributes::AttributeEngine;
    pub use crate::cube::{AttributeCube, AxisMetadata, AxisRange, SeismicCube};
    pub use crate::driver::{CancellationToken, DriverConfig};
    pub use crate::operators::{AttributeKind, OperatorConfig};
    pub use crate::types::{AttrError, AttrResult};
    pub use crate::window::BoundaryPolicy;
}
