//! Sweep state machine.
//!
//! Every sweep point runs `encode -> decode -> verify/measure -> record` in
//! strict sequence. Records are appended datasets-outer, parameters-inner.
//! A dataset whose input is missing is logged and skipped; every other
//! failure propagates.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use sciquant_array::{DType, Dataset, NdArray};
use sciquant_core::{
    compare, offset_for, AffineQuantizer, ArrayCodec, CallConvention, DecodeHint, EntropyCoder, FidelityMetrics,
    QuantizationConfig, QuantizationMode, QuantizedCodec,
};

use crate::record::{BenchmarkRecord, LosslessRecord};
use crate::source::DatasetSource;
use crate::timing::timed;
use crate::{BenchError, SweepConfig};

/// Load a source, turning a missing input into `None` after a warning
fn load_or_skip(source: &DatasetSource) -> Result<Option<Dataset>, BenchError> {
    match source.load() {
        Ok(ds) => Ok(Some(ds)),
        Err(e) if e.is_recoverable() => {
            warn!("skipping dataset '{}': {}", source.name(), e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn count_mismatches(a: &NdArray, b: &NdArray) -> usize {
    a.iter_u16().zip(b.iter_u16()).filter(|(x, y)| x != y).count()
}

/// One lossless sweep point. Reconstruction must equal the original exactly.
pub fn lossless_point(
    dataset: &Dataset,
    codec: &dyn ArrayCodec,
    method: CallConvention,
) -> Result<LosslessRecord, BenchError> {
    let original = &dataset.array;
    let hint = DecodeHint::for_array(original, method);

    let (payload, encode_time) = timed(|| codec.encode(original));
    let payload = payload?;
    let (decoded, decode_time) = timed(|| codec.decode(&payload, &hint));
    let decoded = decoded?;

    // the size convention hands back a flat array; the caller reshapes
    let decoded = decoded.reshape(original.shape()).map_err(|_| BenchError::ShapeMismatch {
        original: original.shape().to_vec(),
        reconstructed: hint.shape().unwrap_or_default(),
    })?;

    let mismatches = count_mismatches(original, &decoded);
    if decoded.dtype() != original.dtype() || mismatches > 0 {
        return Err(BenchError::CorrectnessViolation {
            dataset: dataset.name.clone(),
            method: method.label().to_string(),
            mismatches,
            total: original.len(),
        });
    }

    let record = LosslessRecord {
        dataset: dataset.name.clone(),
        method,
        orig_bytes: original.nbytes(),
        comp_bytes: payload.len(),
        encode_seconds: encode_time.as_secs_f64(),
        decode_seconds: decode_time.as_secs_f64(),
    };
    info!(
        "{} [{}]: {} -> {} bytes, ratio {:.3}",
        record.dataset,
        method,
        record.orig_bytes,
        record.comp_bytes,
        record.ratio()
    );
    Ok(record)
}

/// Lossless evaluation of every source through every call convention.
///
/// A round-trip mismatch aborts the whole run with `CorrectnessViolation`.
pub fn run_lossless(sources: &[DatasetSource], codec: &dyn ArrayCodec) -> Result<Vec<LosslessRecord>, BenchError> {
    let mut records = Vec::new();
    for source in sources {
        let Some(dataset) = load_or_skip(source)? else {
            continue;
        };
        info!(
            "testing {} (shape {:?}, {:.2} MB)",
            dataset.name,
            dataset.shape(),
            crate::timing::bytes_to_mb(dataset.array.nbytes())
        );
        for method in CallConvention::ALL {
            records.push(lossless_point(&dataset, codec, method)?);
        }
    }
    Ok(records)
}

/// Widen to `u16` for the quantized path, warning when a conversion happens
pub fn normalize_to_u16(dataset: &Dataset) -> NdArray {
    if dataset.dtype() != DType::U16 {
        warn!("{}: converting {} to uint16 for quantization", dataset.name, dataset.dtype());
    }
    dataset.array.astype(DType::U16)
}

fn quantized_codec<'c>(
    coder: &'c dyn EntropyCoder,
    offset: f64,
    scale: f64,
    mode: QuantizationMode,
) -> Result<QuantizedCodec<&'c dyn EntropyCoder>, BenchError> {
    let config = QuantizationConfig::new(offset, scale)?;
    Ok(QuantizedCodec::new(coder, AffineQuantizer::new(config, mode)))
}

/// One quantized sweep point. `offset` is supplied by the caller and never
/// re-derived here.
pub fn quantized_point(
    name: &str,
    array: &NdArray,
    offset: f64,
    scale: f64,
    mode: QuantizationMode,
    coder: &dyn EntropyCoder,
) -> Result<BenchmarkRecord, BenchError> {
    let codec = quantized_codec(coder, offset, scale, mode)?;
    let hint = DecodeHint::for_array(array, CallConvention::ByShape);

    let (payload, encode_time) = timed(|| codec.encode(array));
    let payload = payload?;
    let (decoded, decode_time) = timed(|| codec.decode(&payload, &hint));
    let decoded = decoded?;

    let metrics = compare(array, &decoded)?;
    debug!("{} scale={}: code width {} bytes", name, scale, payload.as_bytes().first().copied().unwrap_or(0));

    let record = BenchmarkRecord {
        dataset: name.to_string(),
        scale,
        offset,
        orig_bytes: array.nbytes(),
        comp_bytes: payload.len(),
        metrics,
        encode_seconds: encode_time.as_secs_f64(),
        decode_seconds: decode_time.as_secs_f64(),
    };
    info!(
        "{} scale={}: ratio {:.3}, rmse {:.4}, psnr {:.2} dB",
        name,
        scale,
        record.ratio(),
        metrics.rmse,
        metrics.psnr
    );
    Ok(record)
}

/// Quantized sweep: every source at every configured scale.
///
/// The offset of each dataset is its minimum, computed once and reused for
/// every scale.
pub fn run_quantized(sources: &[DatasetSource], config: &SweepConfig) -> Result<Vec<BenchmarkRecord>, BenchError> {
    config.validate()?;
    if !config.mode.bounded_by_scale() {
        warn!(
            "{} quantization does not keep max_error within ceil(scale); errors grow with intensity",
            config.mode
        );
    }
    let coder = config.build_coder();
    let mut records = Vec::new();

    for source in sources {
        let Some(dataset) = load_or_skip(source)? else {
            continue;
        };
        let array = normalize_to_u16(&dataset);
        let offset = offset_for(&array);
        info!("quantizing {} (shape {:?}, offset {})", dataset.name, array.shape(), offset);

        for &scale in &config.scales {
            records.push(quantized_point(&dataset.name, &array, offset, scale, config.mode, coder.as_ref())?);
        }
    }
    Ok(records)
}

/// Files written by [`export_visualization`]
#[derive(Debug, Clone)]
pub struct VisualizationSlice {
    pub original: PathBuf,
    pub decompressed: PathBuf,
    pub offset: f64,
    pub metrics: FidelityMetrics,
}

pub const VIS_ORIGINAL: &str = "vis_original";
pub const VIS_DECOMPRESSED: &str = "vis_decompressed";

/// Middle frame along `time_axis` of a 3-D stack, or the array itself
/// when it is not 3-D
pub fn middle_slice(array: &NdArray, time_axis: usize) -> Result<NdArray, BenchError> {
    if array.ndim() != 3 {
        return Ok(array.clone());
    }
    let len = *array.shape().get(time_axis).ok_or(sciquant_array::ArrayError::AxisOutOfRange {
        axis: time_axis,
        ndim: 3,
    })?;
    Ok(array.frame(time_axis, len / 2)?)
}

/// Quantize the middle slice at scale 1.0 with the slice minimum as offset
/// and persist the original and decompressed slices side by side.
pub fn export_visualization(
    dataset: &Dataset,
    time_axis: usize,
    mode: QuantizationMode,
    coder: &dyn EntropyCoder,
    out_dir: &Path,
) -> Result<VisualizationSlice, BenchError> {
    let slice = middle_slice(&normalize_to_u16(dataset), time_axis)?;
    let offset = offset_for(&slice);

    let codec = quantized_codec(coder, offset, 1.0, mode)?;
    let payload = codec.encode(&slice)?;
    let decompressed = codec.decode(&payload, &DecodeHint::for_array(&slice, CallConvention::ByShape))?;
    let metrics = compare(&slice, &decompressed)?;

    std::fs::create_dir_all(out_dir).map_err(|e| BenchError::io(out_dir, e))?;
    let original = Dataset::new(VIS_ORIGINAL, slice).save_in(out_dir)?;
    let decompressed = Dataset::new(VIS_DECOMPRESSED, decompressed).save_in(out_dir)?;
    info!("saved visualization slices to {}", out_dir.display());

    Ok(VisualizationSlice {
        original,
        decompressed,
        offset,
        metrics,
    })
}
