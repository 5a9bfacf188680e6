use thiserror::Error;

use sciquant_array::ArrayError;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{coder} compression failed: {reason}")]
    Compress { coder: String, reason: String },
    #[error("{coder} decompression failed: {reason}")]
    Decompress { coder: String, reason: String },
    #[error("Decoded {found} bytes, expected {expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("Payload truncated: {0}")]
    Truncated(&'static str),
    #[error("Invalid code width {0}")]
    InvalidCodeWidth(u8),
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),
}

/// Opaque lossless byte coder.
///
/// The benchmark treats the coder as a black box: bytes in, bytes out.
/// `decompress` receives the exact raw length so size-prefix-free block
/// formats can be used without extra framing.
pub trait EntropyCoder {
    /// Short identifier used in logs and result tables
    fn name(&self) -> &str;
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decompress(&self, payload: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError>;
}

impl<C: EntropyCoder + ?Sized> EntropyCoder for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        (**self).compress(raw)
    }

    fn decompress(&self, payload: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError> {
        (**self).decompress(payload, raw_len)
    }
}

impl<C: EntropyCoder + ?Sized> EntropyCoder for &C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        (**self).compress(raw)
    }

    fn decompress(&self, payload: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError> {
        (**self).decompress(payload, raw_len)
    }
}

/// Fails with `SizeMismatch` unless a coder returned exactly `expected` bytes
pub fn check_decoded_len(decoded: &[u8], expected: usize) -> Result<(), CodecError> {
    if decoded.len() != expected {
        return Err(CodecError::SizeMismatch {
            expected,
            found: decoded.len(),
        });
    }
    Ok(())
}
