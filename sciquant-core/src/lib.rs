//! # sciquant-core
//!
//! Core abstractions for evaluating compression of scientific image data.
//!
//! This crate defines the two codec seams:
//! - [`EntropyCoder`]: opaque lossless byte coder (bytes in, bytes out)
//! - [`ArrayCodec`]: array-level `encode` / `decode` used by the benchmark
//!
//! It also provides the pre-quantization transform ([`AffineQuantizer`],
//! [`QuantizationConfig`], [`QuantizationMode`]), the two adapters that
//! compose it with a coder ([`LosslessCodec`], [`QuantizedCodec`]), and the
//! fidelity metrics engine ([`metrics::compare`]).

pub mod codec;
pub mod coder;
pub mod metrics;
pub mod quantize;
pub mod quantized_codec;

pub use codec::{ArrayCodec, CallConvention, CompressedPayload, DecodeHint, LosslessCodec};
pub use coder::{CodecError, EntropyCoder};
pub use metrics::{compare, FidelityMetrics, MetricsError};
pub use quantize::{offset_for, AffineQuantizer, CodeWidth, QuantizationConfig, QuantizationMode, QuantizeError};
pub use quantized_codec::QuantizedCodec;
