use sciquant_core::{CodecError, EntropyCoder};

/// LZ4 block coder.
///
/// Blocks carry no size prefix; the raw length supplied on decode bounds
/// the output buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Coder;

impl Lz4Coder {
    pub fn new() -> Self {
        Self
    }
}

impl EntropyCoder for Lz4Coder {
    fn name(&self) -> &str {
        "lz4"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(lz4_flex::compress(raw))
    }

    fn decompress(&self, payload: &[u8], raw_len: usize) -> Result<Vec<u8>, CodecError> {
        lz4_flex::decompress(payload, raw_len).map_err(|e| CodecError::Decompress {
            coder: "lz4".to_string(),
            reason: e.to_string(),
        })
    }
}
