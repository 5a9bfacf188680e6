//! Result tables.
//!
//! Both tables are CSV with a header row and a fixed column order. Rendering
//! charts is out of scope; this module only reads the tables back and shapes
//! the series a chart would be drawn from.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

use crate::record::{BenchmarkRecord, LosslessRecord, LosslessRow, QuantizedRow};
use crate::BenchError;

pub const LOSSLESS_COLUMNS: [&str; 7] = [
    "dataset",
    "method",
    "orig_mb",
    "comp_mb",
    "ratio",
    "comp_speed_mb_s",
    "decomp_speed_mb_s",
];

pub const QUANTIZED_COLUMNS: [&str; 11] = [
    "dataset",
    "scale",
    "offset",
    "orig_mb",
    "comp_mb",
    "ratio",
    "rmse",
    "psnr",
    "max_error",
    "comp_speed_mb_s",
    "decomp_speed_mb_s",
];

/// Dataset names used by the quantized run
pub const SIMULATED_STACK: &str = "Simulated_Stack";
pub const REAL_MICROSCOPY: &str = "Real_Microscopy";

fn write_table<R: Serialize>(path: &Path, columns: &[&str], rows: impl IntoIterator<Item = R>) -> Result<(), BenchError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| BenchError::io(parent, e))?;
    }
    // header written explicitly so an empty table still has one
    let mut w = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    w.write_record(columns)?;
    for row in rows {
        w.serialize(row)?;
    }
    w.flush().map_err(|e| BenchError::io(path, e))?;
    Ok(())
}

fn read_table<R: DeserializeOwned>(path: &Path) -> Result<Vec<R>, BenchError> {
    if !path.is_file() {
        return Err(BenchError::missing(path.display().to_string(), "results table not found"));
    }
    let mut r = csv::Reader::from_path(path)?;
    let rows = r.deserialize().collect::<Result<Vec<R>, _>>()?;
    Ok(rows)
}

pub fn write_lossless_csv(path: impl AsRef<Path>, records: &[LosslessRecord]) -> Result<(), BenchError> {
    write_table(path.as_ref(), &LOSSLESS_COLUMNS, records.iter().map(LosslessRecord::to_row))
}

pub fn write_quantized_csv(path: impl AsRef<Path>, records: &[BenchmarkRecord]) -> Result<(), BenchError> {
    write_table(path.as_ref(), &QUANTIZED_COLUMNS, records.iter().map(BenchmarkRecord::to_row))
}

pub fn read_lossless_csv(path: impl AsRef<Path>) -> Result<Vec<LosslessRow>, BenchError> {
    read_table(path.as_ref())
}

pub fn read_quantized_csv(path: impl AsRef<Path>) -> Result<Vec<QuantizedRow>, BenchError> {
    read_table(path.as_ref())
}

/// First row of each dataset for `method`, in table order.
/// Later rows for an already seen dataset are ignored.
pub fn first_per_dataset<'a>(rows: &'a [LosslessRow], method: &str) -> Vec<&'a LosslessRow> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|r| r.method == method)
        .filter(|r| seen.insert(r.dataset.as_str()))
        .collect()
}

/// Rate/distortion series for one dataset, sorted by scale.
///
/// Uses `preferred` when the table has rows for it, `fallback` otherwise.
/// Returns the dataset actually used with its rows.
pub fn tradeoff_curve<'a>(rows: &'a [QuantizedRow], preferred: &str, fallback: &str) -> Option<(String, Vec<&'a QuantizedRow>)> {
    let pick = [preferred, fallback]
        .into_iter()
        .find(|name| rows.iter().any(|r| r.dataset == *name))?;
    let mut curve: Vec<_> = rows.iter().filter(|r| r.dataset == pick).collect();
    curve.sort_by(|a, b| a.scale.total_cmp(&b.scale));
    Some((pick.to_string(), curve))
}
