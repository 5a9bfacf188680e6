use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};

use sciquant_array::{Dataset, NdArray};

use crate::SynthError;

pub const STACK_NAME: &str = "microscopy_stack";

/// Half-width of the square neighbourhood each point source brightens (3x3)
const SPOT_RADIUS: usize = 1;

/// Parameters of the simulated fluorescence stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MicroscopyParams {
    pub height: usize,
    pub width: usize,
    pub n_frames: usize,
    /// Constant noiseless level of every pixel
    pub background: f64,
    /// Added to each pixel of a spot's neighbourhood, per overlapping spot
    pub peak_intensity: f64,
    pub n_peaks: usize,
}

impl Default for MicroscopyParams {
    fn default() -> Self {
        Self {
            height: 512,
            width: 512,
            n_frames: 10,
            background: 100.0,
            peak_intensity: 1000.0,
            n_peaks: 50,
        }
    }
}

impl MicroscopyParams {
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.height == 0 || self.width == 0 {
            return Err(SynthError::InvalidParams("frame dimensions must be non-zero"));
        }
        if !self.background.is_finite() || self.background < 0.0 {
            return Err(SynthError::InvalidParams("background must be finite and >= 0"));
        }
        if !self.peak_intensity.is_finite() || self.peak_intensity < 0.0 {
            return Err(SynthError::InvalidParams("peak_intensity must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Shot-noise sampler keyed by how many spots cover a pixel.
/// Every pixel's mean is `background + k * peak_intensity`, so one
/// distribution per distinct `k` suffices.
struct ShotNoise {
    background: f64,
    peak_intensity: f64,
    by_overlap: Vec<Option<Poisson<f64>>>,
}

impl ShotNoise {
    fn new(params: &MicroscopyParams) -> Self {
        Self {
            background: params.background,
            peak_intensity: params.peak_intensity,
            by_overlap: Vec::new(),
        }
    }

    fn sample<R: Rng>(&mut self, overlap: u32, rng: &mut R) -> u16 {
        let k = overlap as usize;
        if k >= self.by_overlap.len() {
            let (background, peak) = (self.background, self.peak_intensity);
            let start = self.by_overlap.len();
            self.by_overlap
                .extend((start..=k).map(|i| Poisson::new(background + i as f64 * peak).ok()));
        }
        match &self.by_overlap[k] {
            // float-to-int casts saturate, which is the uint16 clip
            Some(dist) => dist.sample(rng) as u16,
            // zero mean
            None => 0,
        }
    }
}

/// Generate a `uint16` stack of shape `[n_frames, height, width]`.
///
/// Each frame starts at `background`; `n_peaks` spots land at uniformly
/// random pixels and raise their 3x3 neighbourhood (clipped at the border)
/// by `peak_intensity`. Every pixel is then replaced by a Poisson draw with
/// that mean.
pub fn generate_microscopy_stack<R: Rng>(params: &MicroscopyParams, rng: &mut R) -> Result<Dataset, SynthError> {
    params.validate()?;
    let (h, w) = (params.height, params.width);
    let mut noise = ShotNoise::new(params);
    let mut data = Vec::with_capacity(params.n_frames * h * w);
    let mut overlap = vec![0u32; h * w];

    for _ in 0..params.n_frames {
        overlap.iter_mut().for_each(|o| *o = 0);

        for _ in 0..params.n_peaks {
            let x = rng.gen_range(0..w);
            let y = rng.gen_range(0..h);
            let rows = y.saturating_sub(SPOT_RADIUS)..(y + SPOT_RADIUS + 1).min(h);
            for r in rows {
                let cols = x.saturating_sub(SPOT_RADIUS)..(x + SPOT_RADIUS + 1).min(w);
                for c in cols {
                    overlap[r * w + c] += 1;
                }
            }
        }

        for &k in &overlap {
            data.push(noise.sample(k, rng));
        }
    }

    let array = NdArray::from_u16(&[params.n_frames, h, w], data)?;
    Ok(Dataset::new(STACK_NAME, array))
}
