use std::path::PathBuf;
use thiserror::Error;

use sciquant_array::ArrayError;
use sciquant_core::{CodecError, MetricsError, QuantizeError};
use sciquant_store::StoreError;
use sciquant_synth::SynthError;

#[derive(Error, Debug)]
pub enum BenchError {
    /// Dataset or file absent. The only condition a sweep skips past.
    #[error("Missing input for '{dataset}': {reason}")]
    MissingInput { dataset: String, reason: String },
    #[error("Shape mismatch: {original:?} vs {reconstructed:?}")]
    ShapeMismatch {
        original: Vec<usize>,
        reconstructed: Vec<usize>,
    },
    #[error("Lossless round trip of '{dataset}' via {method} differs in {mismatches} of {total} elements")]
    CorrectnessViolation {
        dataset: String,
        method: String,
        mismatches: usize,
        total: usize,
    },
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Quantization error: {0}")]
    Quantize(#[from] QuantizeError),
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Generator error: {0}")]
    Synth(#[from] SynthError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BenchError {
    /// True only for absent inputs; everything else halts the unit of work
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BenchError::MissingInput { .. })
    }

    pub fn missing(dataset: impl Into<String>, reason: impl ToString) -> Self {
        BenchError::MissingInput {
            dataset: dataset.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<MetricsError> for BenchError {
    fn from(e: MetricsError) -> Self {
        match e {
            MetricsError::ShapeMismatch {
                original,
                reconstructed,
            } => BenchError::ShapeMismatch {
                original,
                reconstructed,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_missing_input_is_recoverable() {
        assert!(BenchError::missing("Real_Microscopy", "file not found").is_recoverable());
        let fatal = BenchError::CorrectnessViolation {
            dataset: "x".into(),
            method: "by_size".into(),
            mismatches: 1,
            total: 10,
        };
        assert!(!fatal.is_recoverable());
        let shape: BenchError = MetricsError::ShapeMismatch {
            original: vec![2],
            reconstructed: vec![3],
        }
        .into();
        assert!(matches!(shape, BenchError::ShapeMismatch { .. }));
        assert!(!shape.is_recoverable());
    }
}
