use std::path::PathBuf;
use thiserror::Error;

use sciquant_array::ArrayError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Container not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a variable container (bad magic)")]
    BadMagic,
    #[error("Unsupported container version {0}")]
    UnsupportedVersion(u8),
    #[error("Unknown variable kind tag {0}")]
    UnknownKind(u8),
    #[error("Variable name or text is not valid UTF-8")]
    BadUtf8,
    #[error("Variable name too long ({0} bytes)")]
    NameTooLong(usize),
    #[error("Duplicate variable '{0}'")]
    Duplicate(String),
    #[error("Variable '{0}' not found")]
    NoSuchVariable(String),
    #[error("Variable '{0}' is not a numeric array")]
    NotAnArray(String),
    #[error("No numeric array variable in container")]
    NoCandidates,
    #[error("Array error: {0}")]
    Array(#[from] ArrayError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// True when the container itself is absent
    pub fn is_missing(&self) -> bool {
        match self {
            StoreError::NotFound(_) => true,
            StoreError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
