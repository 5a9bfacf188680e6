use serde::{Deserialize, Serialize};
use std::fmt;

use sciquant_array::{element_count, ArrayError, DType, NdArray};

use crate::coder::{check_decoded_len, CodecError, EntropyCoder};

/// Opaque encoded bytes. Consumed once by `decode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPayload {
    bytes: Vec<u8>,
}

impl CompressedPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// How the caller describes the array it expects back from `decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallConvention {
    /// Caller supplies the original byte count and reshapes afterwards
    BySize,
    /// Caller supplies the original shape
    ByShape,
}

impl CallConvention {
    pub const ALL: [CallConvention; 2] = [CallConvention::BySize, CallConvention::ByShape];

    pub fn label(self) -> &'static str {
        match self {
            CallConvention::BySize => "by_size",
            CallConvention::ByShape => "by_shape",
        }
    }
}

impl fmt::Display for CallConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode-side description of the expected output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeHint {
    /// Output is 1-D with `nbytes / dtype.width()` elements
    BySize { dtype: DType, nbytes: usize },
    /// Output has exactly `shape`
    ByShape { dtype: DType, shape: Vec<usize> },
}

impl DecodeHint {
    /// Hint that describes `array` under the given convention
    pub fn for_array(array: &NdArray, convention: CallConvention) -> Self {
        match convention {
            CallConvention::BySize => DecodeHint::BySize {
                dtype: array.dtype(),
                nbytes: array.nbytes(),
            },
            CallConvention::ByShape => DecodeHint::ByShape {
                dtype: array.dtype(),
                shape: array.shape().to_vec(),
            },
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            DecodeHint::BySize { dtype, .. } | DecodeHint::ByShape { dtype, .. } => *dtype,
        }
    }

    pub fn element_count(&self) -> Result<usize, CodecError> {
        match self {
            DecodeHint::BySize { dtype, nbytes } => {
                if nbytes % dtype.width() != 0 {
                    return Err(ArrayError::RaggedBytes {
                        len: *nbytes,
                        dtype: *dtype,
                    }
                    .into());
                }
                Ok(nbytes / dtype.width())
            }
            DecodeHint::ByShape { shape, .. } => Ok(element_count(shape)),
        }
    }

    /// Shape of the decoded array
    pub fn shape(&self) -> Result<Vec<usize>, CodecError> {
        match self {
            DecodeHint::BySize { .. } => Ok(vec![self.element_count()?]),
            DecodeHint::ByShape { shape, .. } => Ok(shape.clone()),
        }
    }
}

/// Uniform array-level codec seen by the benchmark harness.
///
/// Implementations wrap an [`EntropyCoder`]; the quantized variant also
/// applies the forward transform before encoding and the inverse after
/// decoding, so callers never see the difference.
pub trait ArrayCodec {
    fn name(&self) -> String;
    fn encode(&self, array: &NdArray) -> Result<CompressedPayload, CodecError>;
    fn decode(&self, payload: &CompressedPayload, hint: &DecodeHint) -> Result<NdArray, CodecError>;
}

/// Pass-through codec: element bytes straight into the coder
pub struct LosslessCodec<C> {
    coder: C,
}

impl<C: EntropyCoder> LosslessCodec<C> {
    pub fn new(coder: C) -> Self {
        Self { coder }
    }

    pub fn coder(&self) -> &C {
        &self.coder
    }
}

impl<C: EntropyCoder> ArrayCodec for LosslessCodec<C> {
    fn name(&self) -> String {
        self.coder.name().to_string()
    }

    fn encode(&self, array: &NdArray) -> Result<CompressedPayload, CodecError> {
        let bytes = self.coder.compress(&array.to_le_bytes())?;
        Ok(CompressedPayload::new(bytes))
    }

    fn decode(&self, payload: &CompressedPayload, hint: &DecodeHint) -> Result<NdArray, CodecError> {
        let dtype = hint.dtype();
        let raw_len = hint.element_count()? * dtype.width();
        let raw = self.coder.decompress(payload.as_bytes(), raw_len)?;
        check_decoded_len(&raw, raw_len)?;
        Ok(NdArray::from_le_bytes(dtype, &hint.shape()?, &raw)?)
    }
}
