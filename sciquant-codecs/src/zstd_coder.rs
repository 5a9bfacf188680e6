use sciquant_core::{CodecError, EntropyCoder};

pub const DEFAULT_LEVEL: i32 = 3;

/// Zstandard frame coder
#[derive(Debug, Clone, Copy)]
pub struct ZstdCoder {
    level: i32,
}

impl ZstdCoder {
    pub fn new(level: i32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> i32 {
        self.level
    }
}

impl Default for ZstdCoder {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl EntropyCoder for ZstdCoder {
    fn name(&self) -> &str {
        "zstd"
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::encode_all(raw, self.level).map_err(|e| CodecError::Compress {
            coder: "zstd".to_string(),
            reason: e.to_string(),
        })
    }

    fn decompress(&self, payload: &[u8], _raw_len: usize) -> Result<Vec<u8>, CodecError> {
        zstd::decode_all(payload).map_err(|e| CodecError::Decompress {
            coder: "zstd".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zstd_shrinks_repetitive_bytes() {
        let raw: Vec<u8> = (0..4096u32).map(|i| (i / 64) as u8).collect();
        let coder = ZstdCoder::default();
        let packed = coder.compress(&raw).unwrap();
        assert!(packed.len() < raw.len() / 4, "compressed to {} bytes", packed.len());
        assert_eq!(coder.decompress(&packed, raw.len()).unwrap(), raw);
    }

    #[test]
    fn test_zstd_rejects_garbage() {
        let coder = ZstdCoder::new(1);
        let err = coder.decompress(&[0xde, 0xad, 0xbe, 0xef], 16).unwrap_err();
        assert!(matches!(err, CodecError::Decompress { .. }));
    }
}
