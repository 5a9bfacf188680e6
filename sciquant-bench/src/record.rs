use serde::{Deserialize, Serialize};

use sciquant_core::{CallConvention, FidelityMetrics};

use crate::timing::{bytes_to_mb, compression_ratio, throughput_mb_s};

/// One lossless measurement: a dataset through one call convention
#[derive(Debug, Clone, PartialEq)]
pub struct LosslessRecord {
    pub dataset: String,
    pub method: CallConvention,
    pub orig_bytes: usize,
    pub comp_bytes: usize,
    pub encode_seconds: f64,
    pub decode_seconds: f64,
}

impl LosslessRecord {
    pub fn ratio(&self) -> f64 {
        compression_ratio(self.orig_bytes, self.comp_bytes)
    }

    pub fn to_row(&self) -> LosslessRow {
        LosslessRow {
            dataset: self.dataset.clone(),
            method: self.method.label().to_string(),
            orig_mb: bytes_to_mb(self.orig_bytes),
            comp_mb: bytes_to_mb(self.comp_bytes),
            ratio: self.ratio(),
            comp_speed_mb_s: throughput_mb_s(self.orig_bytes, self.encode_seconds),
            decomp_speed_mb_s: throughput_mb_s(self.orig_bytes, self.decode_seconds),
        }
    }
}

/// One quantized sweep point: a dataset at one scale
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    pub dataset: String,
    pub scale: f64,
    pub offset: f64,
    pub orig_bytes: usize,
    pub comp_bytes: usize,
    pub metrics: FidelityMetrics,
    pub encode_seconds: f64,
    pub decode_seconds: f64,
}

impl BenchmarkRecord {
    pub fn ratio(&self) -> f64 {
        compression_ratio(self.orig_bytes, self.comp_bytes)
    }

    pub fn to_row(&self) -> QuantizedRow {
        QuantizedRow {
            dataset: self.dataset.clone(),
            scale: self.scale,
            offset: self.offset,
            orig_mb: bytes_to_mb(self.orig_bytes),
            comp_mb: bytes_to_mb(self.comp_bytes),
            ratio: self.ratio(),
            rmse: self.metrics.rmse,
            psnr: self.metrics.psnr,
            max_error: self.metrics.max_error,
            comp_speed_mb_s: throughput_mb_s(self.orig_bytes, self.encode_seconds),
            decomp_speed_mb_s: throughput_mb_s(self.orig_bytes, self.decode_seconds),
        }
    }
}

/// Lossless results table row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LosslessRow {
    pub dataset: String,
    pub method: String,
    pub orig_mb: f64,
    pub comp_mb: f64,
    pub ratio: f64,
    pub comp_speed_mb_s: f64,
    pub decomp_speed_mb_s: f64,
}

/// Quantization results table row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantizedRow {
    pub dataset: String,
    pub scale: f64,
    pub offset: f64,
    pub orig_mb: f64,
    pub comp_mb: f64,
    pub ratio: f64,
    pub rmse: f64,
    pub psnr: f64,
    pub max_error: f64,
    pub comp_speed_mb_s: f64,
    pub decomp_speed_mb_s: f64,
}
