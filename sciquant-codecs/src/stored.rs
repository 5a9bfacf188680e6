use sciquant_core::{CodecError, EntropyCoder};

/// Identity coder. Gives a ratio of exactly 1 and isolates harness overhead.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoredCoder;

impl EntropyCoder for StoredCoder {
    fn name(&self) -> &str {
        "stored"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(raw.to_vec())
    }

    fn decompress(&self, payload: &[u8], _raw_len: usize) -> Result<Vec<u8>, CodecError> {
        Ok(payload.to_vec())
    }
}
