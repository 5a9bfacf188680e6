//! # sciquant-synth
//!
//! Synthetic datasets with known statistics.
//!
//! Key items:
//! - [`generate`]: 2-D `uint8` images at a chosen [`EntropyLevel`]
//! - [`generate_microscopy_stack`]: `uint16` fluorescence-like frames with Poisson shot noise
//!
//! All generators draw from a caller-supplied RNG so runs are reproducible
//! from a seed.

pub mod entropy;
pub mod error;
pub mod microscopy;

pub use entropy::{generate, EntropyLevel};
pub use error::SynthError;
pub use microscopy::{generate_microscopy_stack, MicroscopyParams, STACK_NAME};
