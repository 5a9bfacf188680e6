use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use sciquant_array::{Dataset, NdArray};

use crate::SynthError;

/// Statistical character of a synthetic 8-bit image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntropyLevel {
    /// Independent uniform bytes. Incompressible baseline.
    High,
    /// Smooth oscillatory field plus small uniform noise
    Medium,
    /// Diagonal gradient `(row + col) mod 256`. Best-case bound.
    Low,
}

impl EntropyLevel {
    pub const ALL: [EntropyLevel; 3] = [EntropyLevel::High, EntropyLevel::Medium, EntropyLevel::Low];

    pub fn label(self) -> &'static str {
        match self {
            EntropyLevel::High => "high",
            EntropyLevel::Medium => "medium",
            EntropyLevel::Low => "low",
        }
    }

    /// Dataset name used on disk and in result tables
    pub fn dataset_name(self) -> String {
        format!("uint8_{}_entropy", self.label())
    }
}

impl fmt::Display for EntropyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntropyLevel {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntropyLevel::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| SynthError::UnknownLevel(s.to_string()))
    }
}

/// Amplitude of the additive noise on the medium field, exclusive upper bound
const MEDIUM_NOISE: u8 = 20;

fn medium_base(row: usize, col: usize) -> u8 {
    let v = (col as f64 / 10.0).sin() * (row as f64 / 10.0).cos() * 127.0 + 128.0;
    // truncation toward zero, v is always within 1..=255
    v as u8
}

/// Generate a 2-D `uint8` image with the requested entropy character.
///
/// The random source is caller-owned; seed it for reproducible output.
pub fn generate<R: Rng>(shape: &[usize], level: EntropyLevel, rng: &mut R) -> Result<Dataset, SynthError> {
    let (rows, cols) = match *shape {
        [r, c] => (r, c),
        _ => return Err(SynthError::NotTwoDimensional(shape.to_vec())),
    };

    let n = rows * cols;
    let data: Vec<u8> = match level {
        EntropyLevel::High => {
            let mut data = vec![0u8; n];
            rng.fill(data.as_mut_slice());
            data
        }
        EntropyLevel::Low => (0..rows)
            .flat_map(|r| (0..cols).map(move |c| ((r + c) % 256) as u8))
            .collect(),
        EntropyLevel::Medium => {
            let mut data = Vec::with_capacity(n);
            for r in 0..rows {
                for c in 0..cols {
                    let noise = rng.gen_range(0..MEDIUM_NOISE);
                    data.push(medium_base(r, c).saturating_add(noise));
                }
            }
            data
        }
    };

    let array = NdArray::from_u8(&[rows, cols], data)?;
    Ok(Dataset::new(level.dataset_name(), array))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sciquant_array::DType;

    #[test]
    fn test_low_is_diagonal_gradient() {
        let mut rng = StdRng::seed_from_u64(0);
        let ds = generate(&[4, 300], EntropyLevel::Low, &mut rng).unwrap();
        assert_eq!(ds.name, "uint8_low_entropy");
        assert_eq!(ds.dtype(), DType::U8);
        assert_eq!(ds.array.get(0), Some(0));
        // row 1, col 2
        assert_eq!(ds.array.get(300 + 2), Some(3));
        // row 0, col 257 wraps
        assert_eq!(ds.array.get(257), Some(1));
    }

    #[test]
    fn test_medium_stays_near_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let ds = generate(&[32, 32], EntropyLevel::Medium, &mut rng).unwrap();
        for r in 0..32 {
            for c in 0..32 {
                let base = medium_base(r, c) as u16;
                let v = ds.array.get(r * 32 + c).unwrap();
                assert!(v >= base && v < base + MEDIUM_NOISE as u16 || v == 255);
            }
        }
    }

    #[test]
    fn test_medium_saturates_instead_of_wrapping() {
        // cos(0) * sin(x) peaks near x = 15.7, giving a base of 254 or 255
        assert!(medium_base(0, 16) >= 250);
        let mut rng = StdRng::seed_from_u64(1);
        let ds = generate(&[1, 17], EntropyLevel::Medium, &mut rng).unwrap();
        assert!(ds.array.get(16).unwrap() >= 250);
    }

    #[test]
    fn test_same_seed_same_data() {
        let a = generate(&[16, 16], EntropyLevel::High, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(&[16, 16], EntropyLevel::High, &mut StdRng::seed_from_u64(42)).unwrap();
        let c = generate(&[16, 16], EntropyLevel::High, &mut StdRng::seed_from_u64(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rejects_non_2d() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = generate(&[2, 2, 2], EntropyLevel::Low, &mut rng).unwrap_err();
        assert!(matches!(err, SynthError::NotTwoDimensional(_)));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!("Medium".parse::<EntropyLevel>().unwrap(), EntropyLevel::Medium);
        assert!("extreme".parse::<EntropyLevel>().is_err());
    }
}
