use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use sciquant_core::EntropyCoder;

use crate::{Lz4Coder, RunLengthCoder, StoredCoder, ZstdCoder};

#[derive(thiserror::Error, Debug)]
#[error("Unknown coder '{0}' (expected zstd, lz4, rle or stored)")]
pub struct UnknownCoder(pub String);

/// Selector for the concrete entropy coder behind the codec adapters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoderKind {
    #[default]
    Zstd,
    Lz4,
    Rle,
    Stored,
}

impl CoderKind {
    pub const ALL: [CoderKind; 4] = [CoderKind::Zstd, CoderKind::Lz4, CoderKind::Rle, CoderKind::Stored];

    pub fn label(self) -> &'static str {
        match self {
            CoderKind::Zstd => "zstd",
            CoderKind::Lz4 => "lz4",
            CoderKind::Rle => "rle",
            CoderKind::Stored => "stored",
        }
    }

    /// Instantiate the coder. `level` only applies to zstd.
    pub fn build(self, level: i32) -> Box<dyn EntropyCoder> {
        match self {
            CoderKind::Zstd => Box::new(ZstdCoder::new(level)),
            CoderKind::Lz4 => Box::new(Lz4Coder::new()),
            CoderKind::Rle => Box::new(RunLengthCoder::new()),
            CoderKind::Stored => Box::new(StoredCoder),
        }
    }
}

impl fmt::Display for CoderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CoderKind {
    type Err = UnknownCoder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoderKind::ALL
            .into_iter()
            .find(|k| k.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCoder(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sciquant_array::{DType, NdArray};
    use sciquant_core::{ArrayCodec, CallConvention, DecodeHint, LosslessCodec};

    fn sample_u16() -> NdArray {
        let values = (0..256u32).map(|i| (100 + (i % 17) * 40) as u16).collect();
        NdArray::from_u16(&[16, 16], values).unwrap()
    }

    #[test]
    fn test_every_coder_is_lossless_for_both_dtypes() {
        let u8_arr = NdArray::from_u8(&[8, 8], (0..64).map(|i| (i / 8) as u8).collect()).unwrap();
        let u16_arr = sample_u16();

        for kind in CoderKind::ALL {
            let codec = LosslessCodec::new(kind.build(3));
            for arr in [&u8_arr, &u16_arr] {
                for convention in CallConvention::ALL {
                    let payload = codec.encode(arr).unwrap();
                    let back = codec
                        .decode(&payload, &DecodeHint::for_array(arr, convention))
                        .unwrap()
                        .reshape(arr.shape())
                        .unwrap();
                    assert_eq!(&back, arr, "{} / {}", kind, convention);
                }
            }
        }
    }

    #[test]
    fn test_size_convention_restores_flat_array() {
        let arr = sample_u16();
        let codec = LosslessCodec::new(CoderKind::Lz4.build(0));
        let payload = codec.encode(&arr).unwrap();
        let hint = DecodeHint::BySize {
            dtype: DType::U16,
            nbytes: arr.nbytes(),
        };
        let back = codec.decode(&payload, &hint).unwrap();
        assert_eq!(back.shape(), &[256]);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("ZSTD".parse::<CoderKind>().unwrap(), CoderKind::Zstd);
        assert_eq!("rle".parse::<CoderKind>().unwrap(), CoderKind::Rle);
        assert!("huffman".parse::<CoderKind>().is_err());
        assert_eq!(CoderKind::default(), CoderKind::Zstd);
    }
}
