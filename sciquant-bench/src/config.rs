use serde::{Deserialize, Serialize};
use std::path::Path;

use sciquant_codecs::CoderKind;
use sciquant_core::{EntropyCoder, QuantizationMode};

use crate::BenchError;

/// Reference scale sweep
pub const REFERENCE_SCALES: [f64; 7] = [0.1, 0.5, 0.8, 1.0, 1.5, 2.0, 4.0];

/// Parameters of a benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Quantization scales, evaluated in this order
    pub scales: Vec<f64>,
    pub mode: QuantizationMode,
    pub coder: CoderKind,
    /// Coder level (zstd only)
    pub level: i32,
    /// Base seed for every generator call
    pub seed: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            scales: REFERENCE_SCALES.to_vec(),
            mode: QuantizationMode::Linear,
            coder: CoderKind::Zstd,
            level: 3,
            seed: 42,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.scales.is_empty() {
            return Err(BenchError::Config("scale sweep is empty".into()));
        }
        if let Some(bad) = self.scales.iter().find(|s| !s.is_finite() || **s <= 0.0) {
            return Err(BenchError::Config(format!("scale must be finite and > 0, got {}", bad)));
        }
        Ok(())
    }

    /// Read a JSON config. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BenchError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
        let config: SweepConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn build_coder(&self) -> Box<dyn EntropyCoder> {
        self.coder.build(self.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = SweepConfig::default();
        assert_eq!(c.scales, vec![0.1, 0.5, 0.8, 1.0, 1.5, 2.0, 4.0]);
        assert_eq!(c.mode, QuantizationMode::Linear);
        assert_eq!(c.coder, CoderKind::Zstd);
        assert!(c.validate().is_ok());
        assert_eq!(c.build_coder().name(), "zstd");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c: SweepConfig = serde_json::from_str(r#"{"scales": [1.0, 2.0], "coder": "lz4", "mode": "sqrt"}"#).unwrap();
        assert_eq!(c.scales, vec![1.0, 2.0]);
        assert_eq!(c.coder, CoderKind::Lz4);
        assert_eq!(c.mode, QuantizationMode::SquareRoot);
        assert_eq!(c.seed, 42);
    }

    #[test]
    fn test_validate_rejects_bad_scales() {
        let mut c = SweepConfig::default();
        c.scales = vec![];
        assert!(matches!(c.validate(), Err(BenchError::Config(_))));
        c.scales = vec![1.0, 0.0];
        assert!(c.validate().is_err());
        c.scales = vec![-0.5];
        assert!(c.validate().is_err());
        c.scales = vec![f64::NAN];
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sweep.json");
        std::fs::write(&path, r#"{"seed": 7, "level": 9}"#).unwrap();
        let c = SweepConfig::from_json_file(&path).unwrap();
        assert_eq!((c.seed, c.level), (7, 9));

        std::fs::write(&path, r#"{"scales": []}"#).unwrap();
        assert!(SweepConfig::from_json_file(&path).is_err());
    }
}
