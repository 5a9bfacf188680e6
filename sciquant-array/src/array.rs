use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Element type of a sample array.
///
/// Only unsigned integer detector formats are supported: 8-bit camera
/// frames and 16-bit scientific CMOS / EMCCD stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    U8,
    U16,
}

impl DType {
    /// Bytes per element
    pub fn width(self) -> usize {
        match self {
            DType::U8 => 1,
            DType::U16 => 2,
        }
    }

    /// Largest representable sample
    pub fn max_value(self) -> u16 {
        match self {
            DType::U8 => u8::MAX as u16,
            DType::U16 => u16::MAX,
        }
    }

    /// Tag byte used by the persistence format
    pub fn tag(self) -> u8 {
        match self {
            DType::U8 => 1,
            DType::U16 => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, ArrayError> {
        match tag {
            1 => Ok(DType::U8),
            2 => Ok(DType::U16),
            other => Err(ArrayError::UnknownDType(other)),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::U8 => write!(f, "uint8"),
            DType::U16 => write!(f, "uint16"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ArrayError {
    #[error("Shape mismatch: {expected:?} vs {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    #[error("Shape {shape:?} holds {expected} elements, got {found}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        found: usize,
    },
    #[error("Byte length {len} is not a multiple of {dtype} width")]
    RaggedBytes { len: usize, dtype: DType },
    #[error("Unknown dtype tag {0}")]
    UnknownDType(u8),
    #[error("Axis {axis} out of range for {ndim}-d array")]
    AxisOutOfRange { axis: usize, ndim: usize },
    #[error("Index {index} out of range for axis of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Bad magic, not a sciquant array blob")]
    BadMagic,
    #[error("Unsupported format version {0}")]
    UnsupportedVersion(u8),
    #[error("Shape {0:?} is too large to address")]
    TooLarge(Vec<usize>),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Element storage, tagged by dtype
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::U8(v) => v.len(),
            Samples::U16(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Row-major N-dimensional array of unsigned integer samples.
///
/// Invariant: the product of `shape` equals the number of stored samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdArray {
    pub(crate) shape: Vec<usize>,
    pub(crate) samples: Samples,
}

/// Number of elements described by a shape. An empty shape is a scalar.
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

impl NdArray {
    pub fn from_u8(shape: &[usize], data: Vec<u8>) -> Result<Self, ArrayError> {
        Self::new(shape, Samples::U8(data))
    }

    pub fn from_u16(shape: &[usize], data: Vec<u16>) -> Result<Self, ArrayError> {
        Self::new(shape, Samples::U16(data))
    }

    pub fn new(shape: &[usize], samples: Samples) -> Result<Self, ArrayError> {
        let expected = element_count(shape);
        if samples.len() != expected {
            return Err(ArrayError::LengthMismatch {
                shape: shape.to_vec(),
                expected,
                found: samples.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            samples,
        })
    }

    /// Array of zeros
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        let n = element_count(shape);
        let samples = match dtype {
            DType::U8 => Samples::U8(vec![0; n]),
            DType::U16 => Samples::U16(vec![0; n]),
        };
        Self {
            shape: shape.to_vec(),
            samples,
        }
    }

    /// Build from samples held as `u16`, narrowing to `dtype`.
    /// Values above the dtype maximum saturate.
    pub fn from_u16_values(shape: &[usize], dtype: DType, values: Vec<u16>) -> Result<Self, ArrayError> {
        match dtype {
            DType::U16 => Self::from_u16(shape, values),
            DType::U8 => {
                let narrow = values.into_iter().map(|v| v.min(u8::MAX as u16) as u8).collect();
                Self::from_u8(shape, narrow)
            }
        }
    }

    pub fn dtype(&self) -> DType {
        match self.samples {
            Samples::U8(_) => DType::U8,
            Samples::U16(_) => DType::U16,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// In-memory size of the element data in bytes
    pub fn nbytes(&self) -> usize {
        self.len() * self.dtype().width()
    }

    /// Sample `i` (flat, row-major) widened to `u16`
    pub fn get(&self, i: usize) -> Option<u16> {
        match &self.samples {
            Samples::U8(v) => v.get(i).map(|&x| x as u16),
            Samples::U16(v) => v.get(i).copied(),
        }
    }

    /// Iterator over all samples widened to `u16`
    pub fn iter_u16(&self) -> Box<dyn Iterator<Item = u16> + '_> {
        match &self.samples {
            Samples::U8(v) => Box::new(v.iter().map(|&x| x as u16)),
            Samples::U16(v) => Box::new(v.iter().copied()),
        }
    }

    /// Little-endian element bytes, the raw input handed to a byte coder
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match &self.samples {
            Samples::U8(v) => v.clone(),
            Samples::U16(v) => {
                let mut out = Vec::with_capacity(v.len() * 2);
                for &x in v {
                    out.extend_from_slice(&x.to_le_bytes());
                }
                out
            }
        }
    }

    /// Rebuild an array from little-endian element bytes
    pub fn from_le_bytes(dtype: DType, shape: &[usize], bytes: &[u8]) -> Result<Self, ArrayError> {
        if bytes.len() % dtype.width() != 0 {
            return Err(ArrayError::RaggedBytes { len: bytes.len(), dtype });
        }
        let samples = match dtype {
            DType::U8 => Samples::U8(bytes.to_vec()),
            DType::U16 => Samples::U16(
                bytes
                    .chunks_exact(2)
                    .map(|c| u16::from_le_bytes([c[0], c[1]]))
                    .collect(),
            ),
        };
        Self::new(shape, samples)
    }
}

/// A named, generated or loaded array. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub name: String,
    pub array: NdArray,
}

impl Dataset {
    pub fn new(name: impl Into<String>, array: NdArray) -> Self {
        Self {
            name: name.into(),
            array,
        }
    }

    pub fn dtype(&self) -> DType {
        self.array.dtype()
    }

    pub fn shape(&self) -> &[usize] {
        self.array.shape()
    }
}
