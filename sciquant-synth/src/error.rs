use thiserror::Error;

use sciquant_array::ArrayError;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Generator needs a 2-D shape, got {0:?}")]
    NotTwoDimensional(Vec<usize>),
    #[error("Unknown entropy level '{0}' (expected high, medium or low)")]
    UnknownLevel(String),
    #[error("Invalid microscopy parameter: {0}")]
    InvalidParams(&'static str),
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),
}
