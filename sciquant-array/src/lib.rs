//! # sciquant-array
//!
//! Row-major sample arrays for the sciquant benchmark workspace.
//!
//! This crate provides [`NdArray`], an N-dimensional grid of `uint8` or
//! `uint16` samples with an explicit shape, and [`Dataset`], a named array.
//! The [`persist`] module serializes arrays as single tagged binary blobs that
//! round-trip dtype, shape and element bytes exactly.

pub mod array;
pub mod ops;
pub mod persist;

pub use array::{element_count, ArrayError, DType, Dataset, NdArray, Samples};
