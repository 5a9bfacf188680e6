//! # sciquant-bench
//!
//! Benchmark harness for compression of scientific images.
//!
//! Key items:
//! - [`SweepConfig`]: scales, quantization mode, coder and seed of a run
//! - [`harness::run_lossless`]: exact round trips through both call conventions
//! - [`harness::run_quantized`]: offset/scale sweep with fidelity metrics
//! - [`report`]: fixed-column CSV tables and the series drawn from them
//!
//! Records are appended datasets-outer, parameters-inner. Report shaping
//! relies on that order.

pub mod config;
pub mod error;
pub mod harness;
pub mod record;
pub mod report;
pub mod source;
pub mod timing;

pub use config::{SweepConfig, REFERENCE_SCALES};
pub use error::BenchError;
pub use harness::{export_visualization, lossless_point, quantized_point, run_lossless, run_quantized, VisualizationSlice};
pub use record::{BenchmarkRecord, LosslessRecord, LosslessRow, QuantizedRow};
pub use source::{scan_dir, DatasetSource};
pub use timing::timed;
