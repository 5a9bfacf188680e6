use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use sciquant_array::{ArrayError, DType, NdArray};

#[derive(Error, Debug)]
pub enum QuantizeError {
    #[error("Scale must be finite and > 0, got {0}")]
    InvalidScale(f64),
    #[error("Offset must be finite, got {0}")]
    InvalidOffset(f64),
    #[error("Unknown quantization mode '{0}' (expected linear or sqrt)")]
    UnknownMode(String),
}

/// Quantization mode selector
///
/// - **Linear**: affine `code = round((x - offset) / scale)`. Worst-case
///   error is `scale / 2` before integer rounding of the reconstruction,
///   and `scale = 1.0` is exact for integer data with an integer offset.
/// - **SquareRoot**: variance-stabilising `code = round(sqrt(x - offset) / scale)`
///   for shot-noise data, where the noise standard deviation grows as the
///   square root of the signal. Error grows with intensity:
///   `scale * sqrt(x - offset) + scale^2 / 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantizationMode {
    #[default]
    Linear,
    #[serde(rename = "sqrt")]
    SquareRoot,
}

impl QuantizationMode {
    pub fn label(self) -> &'static str {
        match self {
            QuantizationMode::Linear => "linear",
            QuantizationMode::SquareRoot => "sqrt",
        }
    }

    /// Whether reconstruction error stays within `ceil(scale)` for every sample
    pub fn bounded_by_scale(self) -> bool {
        matches!(self, QuantizationMode::Linear)
    }
}

impl fmt::Display for QuantizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for QuantizationMode {
    type Err = QuantizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(QuantizationMode::Linear),
            "sqrt" | "squareroot" => Ok(QuantizationMode::SquareRoot),
            other => Err(QuantizeError::UnknownMode(other.to_string())),
        }
    }
}

/// One forward/inverse mapping instance: `offset` and a strictly positive `scale`.
///
/// `offset` is always supplied by the caller, normally the minimum of the
/// data being encoded, so shifted samples are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantizationConfig {
    offset: f64,
    scale: f64,
}

impl QuantizationConfig {
    pub fn new(offset: f64, scale: f64) -> Result<Self, QuantizeError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(QuantizeError::InvalidScale(scale));
        }
        if !offset.is_finite() {
            return Err(QuantizeError::InvalidOffset(offset));
        }
        Ok(Self { offset, scale })
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Offset for a dataset: its minimum sample, 0 for an empty array
pub fn offset_for(array: &NdArray) -> f64 {
    array.min_value().map(f64::from).unwrap_or(0.0)
}

/// Forward/inverse quantization transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineQuantizer {
    config: QuantizationConfig,
    mode: QuantizationMode,
}

impl AffineQuantizer {
    pub fn new(config: QuantizationConfig, mode: QuantizationMode) -> Self {
        Self { config, mode }
    }

    pub fn linear(config: QuantizationConfig) -> Self {
        Self::new(config, QuantizationMode::Linear)
    }

    pub fn config(&self) -> &QuantizationConfig {
        &self.config
    }

    pub fn mode(&self) -> QuantizationMode {
        self.mode
    }

    /// Map a sample to its integer code. Samples below `offset` map to 0.
    pub fn forward(&self, x: f64) -> u32 {
        let shifted = (x - self.config.offset).max(0.0);
        let q = match self.mode {
            QuantizationMode::Linear => shifted / self.config.scale,
            QuantizationMode::SquareRoot => shifted.sqrt() / self.config.scale,
        };
        // float-to-int casts saturate at u32::MAX
        q.round() as u32
    }

    /// Real-valued reconstruction of a code
    pub fn inverse(&self, code: u32) -> f64 {
        let c = code as f64 * self.config.scale;
        match self.mode {
            QuantizationMode::Linear => c + self.config.offset,
            QuantizationMode::SquareRoot => c * c + self.config.offset,
        }
    }

    /// Reconstruction rounded to the nearest integer and clamped to `dtype`
    pub fn reconstruct(&self, code: u32, dtype: DType) -> u16 {
        let v = self.inverse(code).round();
        v.clamp(0.0, dtype.max_value() as f64) as u16
    }

    /// Worst-case `|inverse(forward(x)) - x|` for `x >= offset`, before the
    /// reconstruction is rounded to an integer sample.
    pub fn error_bound(&self, x: f64) -> f64 {
        let s = self.config.scale;
        match self.mode {
            QuantizationMode::Linear => s / 2.0,
            QuantizationMode::SquareRoot => {
                let shifted = (x - self.config.offset).max(0.0);
                s * shifted.sqrt() + s * s / 4.0
            }
        }
    }

    pub fn forward_array(&self, array: &NdArray) -> Vec<u32> {
        array.iter_u16().map(|x| self.forward(f64::from(x))).collect()
    }

    pub fn inverse_array(&self, codes: &[u32], dtype: DType, shape: &[usize]) -> Result<NdArray, ArrayError> {
        let values = codes.iter().map(|&c| self.reconstruct(c, dtype)).collect();
        NdArray::from_u16_values(shape, dtype, values)
    }
}

/// Byte width used to pack a run of codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CodeWidth {
    One = 1,
    Two = 2,
    Four = 4,
}

impl CodeWidth {
    /// Narrowest width that holds every code
    pub fn for_codes(codes: &[u32]) -> Self {
        let max = codes.iter().copied().max().unwrap_or(0);
        if max <= u8::MAX as u32 {
            CodeWidth::One
        } else if max <= u16::MAX as u32 {
            CodeWidth::Two
        } else {
            CodeWidth::Four
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(CodeWidth::One),
            2 => Some(CodeWidth::Two),
            4 => Some(CodeWidth::Four),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Little-endian packing. Codes must fit the width.
    pub fn pack(self, codes: &[u32]) -> Vec<u8> {
        let mut out = Vec::with_capacity(codes.len() * self.bytes());
        for &c in codes {
            match self {
                CodeWidth::One => out.push(c as u8),
                CodeWidth::Two => out.extend_from_slice(&(c as u16).to_le_bytes()),
                CodeWidth::Four => out.extend_from_slice(&c.to_le_bytes()),
            }
        }
        out
    }

    pub fn unpack(self, bytes: &[u8]) -> Vec<u32> {
        match self {
            CodeWidth::One => bytes.iter().map(|&b| b as u32).collect(),
            CodeWidth::Two => bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
                .collect(),
            CodeWidth::Four => bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        }
    }
}
