//! # sciquant-codecs
//!
//! Concrete lossless byte coders plugged in behind [`sciquant_core::EntropyCoder`].
//!
//! Key types:
//! - [`ZstdCoder`]: Zstandard frames at a configurable level
//! - [`Lz4Coder`]: LZ4 block format, sized by the caller
//! - [`RunLengthCoder`]: Byte-level RLE for flat or coarsely quantized data
//! - [`StoredCoder`]: Identity, ratio 1.0
//! - [`CoderKind`]: Name-based selector used by configuration

pub mod kind;
pub mod lz4;
pub mod rle;
pub mod stored;
pub mod zstd_coder;

pub use kind::{CoderKind, UnknownCoder};
pub use lz4::Lz4Coder;
pub use rle::RunLengthCoder;
pub use stored::StoredCoder;
pub use zstd_coder::ZstdCoder;
