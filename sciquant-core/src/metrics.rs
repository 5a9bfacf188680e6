use serde::{Deserialize, Serialize};
use thiserror::Error;

use sciquant_array::NdArray;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Shape mismatch: {original:?} vs {reconstructed:?}")]
    ShapeMismatch {
        original: Vec<usize>,
        reconstructed: Vec<usize>,
    },
}

/// Fidelity of a reconstruction against its original
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FidelityMetrics {
    pub rmse: f64,
    /// `+inf` for an exact reconstruction
    pub psnr: f64,
    pub max_error: f64,
    pub mse: f64,
}

impl FidelityMetrics {
    pub fn is_exact(&self) -> bool {
        self.mse == 0.0
    }
}

/// Peak signal used for PSNR, keyed to the apparent bit depth of the data:
/// 255 when the original never exceeds 255, 65535 otherwise.
pub fn data_range(original_max: u16) -> f64 {
    if original_max <= u8::MAX as u16 {
        255.0
    } else {
        65535.0
    }
}

/// Compare two same-shaped arrays.
///
/// Errors are accumulated in `f64` regardless of element width. Dtypes may
/// differ; shapes may not.
pub fn compare(original: &NdArray, reconstructed: &NdArray) -> Result<FidelityMetrics, MetricsError> {
    if original.shape() != reconstructed.shape() {
        return Err(MetricsError::ShapeMismatch {
            original: original.shape().to_vec(),
            reconstructed: reconstructed.shape().to_vec(),
        });
    }

    let mut sum_sq = 0.0f64;
    let mut max_error = 0.0f64;
    for (a, b) in original.iter_u16().zip(reconstructed.iter_u16()) {
        let diff = f64::from(a) - f64::from(b);
        sum_sq += diff * diff;
        max_error = max_error.max(diff.abs());
    }

    let n = original.len();
    let mse = if n == 0 { 0.0 } else { sum_sq / n as f64 };
    let rmse = mse.sqrt();
    let psnr = if mse == 0.0 {
        f64::INFINITY
    } else {
        let range = data_range(original.max_value().unwrap_or(0));
        20.0 * (range / rmse).log10()
    };

    Ok(FidelityMetrics {
        rmse,
        psnr,
        max_error,
        mse,
    })
}
