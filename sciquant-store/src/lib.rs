//! Labeled-variable containers.
//!
//! A container holds named arrays, text and scalars, much like the
//! workspace files written by acquisition software. The benchmark only
//! consumes one array from it, chosen by [`select_variable`].

pub mod container;
pub mod error;
pub mod select;
pub mod summary;

pub use container::{Variable, VariableSet, VariableValue};
pub use error::StoreError;
pub use select::{is_metadata, select_variable, METADATA_PREFIX};
pub use summary::{describe, ArrayStats, VariableSummary};
