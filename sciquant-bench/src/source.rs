use log::{debug, warn};
use std::path::{Path, PathBuf};

use sciquant_array::persist::EXTENSION;
use sciquant_array::Dataset;
use sciquant_store::{select_variable, VariableSet};

use crate::BenchError;

/// Where a benchmark dataset comes from
#[derive(Debug, Clone)]
pub enum DatasetSource {
    /// Already materialised, e.g. freshly generated
    InMemory(Dataset),
    /// A persisted `.sqa` array
    ArrayFile { name: String, path: PathBuf },
    /// One variable of a labeled-variable container. `None` auto-selects
    /// the largest array.
    Container {
        name: String,
        path: PathBuf,
        variable: Option<String>,
    },
}

impl DatasetSource {
    pub fn array_file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        DatasetSource::ArrayFile {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn container(name: impl Into<String>, path: impl Into<PathBuf>, variable: Option<String>) -> Self {
        DatasetSource::Container {
            name: name.into(),
            path: path.into(),
            variable,
        }
    }

    /// Name recorded in result rows
    pub fn name(&self) -> &str {
        match self {
            DatasetSource::InMemory(ds) => &ds.name,
            DatasetSource::ArrayFile { name, .. } | DatasetSource::Container { name, .. } => name,
        }
    }

    /// Materialise the dataset. An absent file is `MissingInput`.
    pub fn load(&self) -> Result<Dataset, BenchError> {
        match self {
            DatasetSource::InMemory(ds) => Ok(ds.clone()),
            DatasetSource::ArrayFile { name, path } => {
                if !path.is_file() {
                    return Err(BenchError::missing(name.clone(), format!("{} not found", path.display())));
                }
                let ds = Dataset::load_from(path)?;
                Ok(Dataset::new(name.clone(), ds.array))
            }
            DatasetSource::Container { name, path, variable } => {
                let vars = VariableSet::load(path).map_err(|e| {
                    if e.is_missing() {
                        BenchError::missing(name.clone(), e)
                    } else {
                        BenchError::Store(e)
                    }
                })?;
                let (picked, array) = select_variable(&vars, variable.as_deref())?;
                debug!("{}: using variable '{}' from {}", name, picked, path.display());
                Ok(Dataset::new(name.clone(), array.clone()))
            }
        }
    }
}

/// Persisted arrays in `dir` whose file stem starts with `prefix`, sorted by name.
///
/// A missing directory or an empty match is `MissingInput`.
pub fn scan_dir(dir: impl AsRef<Path>, prefix: &str) -> Result<Vec<DatasetSource>, BenchError> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| BenchError::missing(format!("{}*", prefix), format!("{}: {}", dir.display(), e)))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BenchError::io(dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!("skipping non UTF-8 file name {}", path.display());
            continue;
        };
        if stem.starts_with(prefix) {
            found.push(DatasetSource::array_file(stem.to_string(), path.clone()));
        }
    }

    if found.is_empty() {
        return Err(BenchError::missing(
            format!("{}*", prefix),
            format!("no .{} files in {}", EXTENSION, dir.display()),
        ));
    }
    found.sort_by(|a, b| a.name().cmp(b.name()));
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sciquant_array::NdArray;
    use sciquant_store::VariableValue;

    #[test]
    fn test_missing_array_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = DatasetSource::array_file("Simulated_Stack", dir.path().join("absent.sqa"));
        let err = src.load().unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_array_file_takes_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let ds = Dataset::new("microscopy_stack", NdArray::from_u16(&[2, 2], vec![1, 2, 3, 4]).unwrap());
        let path = ds.save_in(dir.path()).unwrap();

        let loaded = DatasetSource::array_file("Simulated_Stack", path).load().unwrap();
        assert_eq!(loaded.name, "Simulated_Stack");
        assert_eq!(loaded.array, ds.array);
    }

    #[test]
    fn test_container_source_auto_selects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.sqv");
        let mut vars = VariableSet::new();
        vars.insert("__header__", VariableValue::Text("MATLAB 5.0".into())).unwrap();
        vars.insert("small", VariableValue::Array(NdArray::zeros(&[2], sciquant_array::DType::U8)))
            .unwrap();
        vars.insert("im", VariableValue::Array(NdArray::from_u16(&[2, 3], vec![5; 6]).unwrap()))
            .unwrap();
        vars.save(&path).unwrap();

        let ds = DatasetSource::container("Real_Microscopy", &path, None).load().unwrap();
        assert_eq!(ds.name, "Real_Microscopy");
        assert_eq!(ds.shape(), &[2, 3]);

        let missing = DatasetSource::container("Real_Microscopy", dir.path().join("nope.sqv"), None);
        assert!(missing.load().unwrap_err().is_recoverable());
    }

    #[test]
    fn test_scan_dir_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["uint8_low_entropy", "uint8_high_entropy", "microscopy_stack"] {
            Dataset::new(name, NdArray::zeros(&[1], sciquant_array::DType::U8))
                .save_in(dir.path())
                .unwrap();
        }
        std::fs::write(dir.path().join("uint8_notes.txt"), "x").unwrap();

        let found = scan_dir(dir.path(), "uint8_").unwrap();
        let names: Vec<_> = found.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["uint8_high_entropy", "uint8_low_entropy"]);

        let err = scan_dir(dir.path(), "float32_").unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_preloaded_container_outlives_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.sqv");
        let mut vars = VariableSet::new();
        vars.insert("im", VariableValue::Array(NdArray::from_u16(&[2, 2], vec![7, 8, 9, 10]).unwrap()))
            .unwrap();
        vars.save(&path).unwrap();

        let ds = DatasetSource::container("Real_Microscopy", &path, None).load().unwrap();
        std::fs::remove_file(&path).unwrap();

        let shared = DatasetSource::InMemory(ds.clone());
        assert_eq!(shared.name(), "Real_Microscopy");
        assert_eq!(shared.load().unwrap(), ds);
        assert_eq!(shared.load().unwrap(), ds);
    }
}
