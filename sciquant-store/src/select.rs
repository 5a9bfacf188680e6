use log::{debug, info};

use sciquant_array::NdArray;

use crate::{StoreError, VariableSet, VariableValue};

/// Prefix marking container metadata entries
pub const METADATA_PREFIX: &str = "__";

pub fn is_metadata(name: &str) -> bool {
    name.starts_with(METADATA_PREFIX)
}

/// Pick the array to benchmark from a container.
///
/// With an explicit `name`, that variable must exist and hold an array.
/// Otherwise the array variable with the most bytes wins, skipping
/// metadata-prefixed names; on a tie the first in container order wins.
pub fn select_variable<'a>(vars: &'a VariableSet, name: Option<&str>) -> Result<(&'a str, &'a NdArray), StoreError> {
    if let Some(name) = name {
        let var = vars
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| StoreError::NoSuchVariable(name.to_string()))?;
        let array = var
            .value
            .as_array()
            .ok_or_else(|| StoreError::NotAnArray(name.to_string()))?;
        return Ok((var.name.as_str(), array));
    }

    let mut best: Option<(&str, &NdArray)> = None;
    for var in vars.iter() {
        if is_metadata(&var.name) {
            debug!("skipping metadata variable {}", var.name);
            continue;
        }
        let VariableValue::Array(array) = &var.value else {
            continue;
        };
        // strict comparison keeps the first of equal-sized candidates
        if best.map_or(true, |(_, b)| array.nbytes() > b.nbytes()) {
            best = Some((var.name.as_str(), array));
        }
    }

    let (name, array) = best.ok_or(StoreError::NoCandidates)?;
    info!(
        "auto-selected variable '{}' ({}, shape {:?}, {} bytes)",
        name,
        array.dtype(),
        array.shape(),
        array.nbytes()
    );
    Ok((name, array))
}
