use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use sciquant_array::NdArray;

use crate::{VariableSet, VariableValue};

/// Distinct values are listed when fewer than this many exist
const LIST_UNIQUE_BELOW: usize = 20;

/// Descriptive statistics of one array variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayStats {
    pub min: u16,
    pub max: u16,
    pub mean: f64,
    pub std: f64,
    pub unique_count: usize,
    /// Present only for low-cardinality data
    pub unique_values: Option<Vec<u16>>,
}

impl ArrayStats {
    /// `None` for an empty array
    pub fn of(array: &NdArray) -> Option<Self> {
        let min = array.min_value()?;
        let max = array.max_value()?;
        let mean = array.mean()?;
        let var = array
            .iter_u16()
            .map(|x| {
                let d = f64::from(x) - mean;
                d * d
            })
            .sum::<f64>()
            / array.len() as f64;
        let unique: BTreeSet<u16> = array.iter_u16().collect();
        let unique_count = unique.len();
        let unique_values = (unique_count < LIST_UNIQUE_BELOW).then(|| unique.into_iter().collect());
        Some(Self {
            min,
            max,
            mean,
            std: var.sqrt(),
            unique_count,
            unique_values,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VariableSummary {
    Array {
        name: String,
        dtype: String,
        shape: Vec<usize>,
        nbytes: usize,
        stats: Option<ArrayStats>,
    },
    Text {
        name: String,
        len: usize,
    },
    Scalar {
        name: String,
        value: f64,
    },
}

impl fmt::Display for VariableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableSummary::Array {
                name,
                dtype,
                shape,
                nbytes,
                stats,
            } => {
                writeln!(f, "Variable: {}", name)?;
                writeln!(f, "  Dtype: {}", dtype)?;
                writeln!(f, "  Shape: {:?} ({} bytes)", shape, nbytes)?;
                if let Some(s) = stats {
                    writeln!(f, "  Min: {}  Max: {}", s.min, s.max)?;
                    writeln!(f, "  Mean: {:.4}  Std: {:.4}", s.mean, s.std)?;
                    match &s.unique_values {
                        Some(v) => write!(f, "  Unique values: {:?}", v)?,
                        None => write!(f, "  Unique values count: {}", s.unique_count)?,
                    }
                } else {
                    write!(f, "  (empty)")?;
                }
                Ok(())
            }
            VariableSummary::Text { name, len } => write!(f, "Variable: {}\n  (text, {} bytes)", name, len),
            VariableSummary::Scalar { name, value } => write!(f, "Variable: {}\n  (scalar) {}", name, value),
        }
    }
}

/// Summaries of every non-metadata variable, in container order
pub fn describe(vars: &VariableSet) -> Vec<VariableSummary> {
    vars.iter()
        .filter(|v| !crate::is_metadata(&v.name))
        .map(|v| match &v.value {
            VariableValue::Array(a) => VariableSummary::Array {
                name: v.name.clone(),
                dtype: a.dtype().to_string(),
                shape: a.shape().to_vec(),
                nbytes: a.nbytes(),
                stats: ArrayStats::of(a),
            },
            VariableValue::Text(s) => VariableSummary::Text {
                name: v.name.clone(),
                len: s.len(),
            },
            VariableValue::Scalar(x) => VariableSummary::Scalar {
                name: v.name.clone(),
                value: *x,
            },
        })
        .collect()
}
