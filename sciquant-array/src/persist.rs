//! Tagged binary blob for a single array.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! b"SQAR" [u8 version=1] [u8 dtype tag] [u8 ndim] [u64 dim]*ndim [element bytes...]
//! ```
//!
//! dtype tags: 1 = uint8, 2 = uint16. Element bytes are row-major, LE.
//! The blob round-trips dtype, shape and data exactly.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::{ArrayError, DType, Dataset, NdArray};

pub const MAGIC: &[u8; 4] = b"SQAR";
pub const VERSION: u8 = 1;
/// File extension used for persisted arrays
pub const EXTENSION: &str = "sqa";

pub fn write_array<W: Write>(mut w: W, array: &NdArray) -> Result<(), ArrayError> {
    w.write_all(MAGIC)?;
    w.write_u8(VERSION)?;
    w.write_u8(array.dtype().tag())?;
    w.write_u8(array.ndim() as u8)?;
    for &dim in array.shape() {
        w.write_u64::<LittleEndian>(dim as u64)?;
    }
    w.write_all(&array.to_le_bytes())?;
    w.flush()?;
    Ok(())
}

pub fn read_array<R: Read>(mut r: R) -> Result<NdArray, ArrayError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(ArrayError::BadMagic);
    }
    let version = r.read_u8()?;
    if version != VERSION {
        return Err(ArrayError::UnsupportedVersion(version));
    }
    let dtype = DType::from_tag(r.read_u8()?)?;
    let ndim = r.read_u8()? as usize;
    let mut shape = Vec::with_capacity(ndim);
    for _ in 0..ndim {
        shape.push(r.read_u64::<LittleEndian>()? as usize);
    }

    let len = payload_len(&shape, dtype)?;
    let mut bytes = Vec::new();
    r.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    NdArray::from_le_bytes(dtype, &shape, &bytes)
}

/// Element byte count named by a header, rejecting dims that overflow `usize`
fn payload_len(shape: &[usize], dtype: DType) -> Result<usize, ArrayError> {
    shape
        .iter()
        .try_fold(dtype.width(), |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| ArrayError::TooLarge(shape.to_vec()))
}

/// Write `array` to `path`, creating or truncating the file
pub fn save<P: AsRef<Path>>(path: P, array: &NdArray) -> Result<(), ArrayError> {
    let f = File::create(path)?;
    write_array(BufWriter::new(f), array)
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<NdArray, ArrayError> {
    let f = File::open(path)?;
    read_array(BufReader::new(f))
}

impl Dataset {
    /// Persist under `<dir>/<name>.sqa`, returning the written path
    pub fn save_in<P: AsRef<Path>>(&self, dir: P) -> Result<std::path::PathBuf, ArrayError> {
        let path = dir.as_ref().join(format!("{}.{}", self.name, EXTENSION));
        save(&path, &self.array)?;
        Ok(path)
    }

    /// Load a dataset, naming it after the file stem
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ArrayError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Dataset::new(name, load(path)?))
    }
}
