//! Labeled-variable container.
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! b"SQVC" [u8 version=1] [u32 count]
//! per variable:
//!   [u16 name_len] [name bytes, UTF-8] [u8 kind]
//!   kind 1 (array):  SQAR blob
//!   kind 2 (text):   [u32 len] [UTF-8 bytes]
//!   kind 3 (scalar): [f64]
//! ```
//!
//! Variables keep their insertion order. Names beginning with `__` are
//! metadata by convention and are never picked by [`crate::select_variable`].

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use sciquant_array::persist::{read_array, write_array};
use sciquant_array::NdArray;

use crate::StoreError;

pub const MAGIC: &[u8; 4] = b"SQVC";
pub const VERSION: u8 = 1;
pub const EXTENSION: &str = "sqv";

const KIND_ARRAY: u8 = 1;
const KIND_TEXT: u8 = 2;
const KIND_SCALAR: u8 = 3;

/// Value held by one named variable
#[derive(Debug, Clone, PartialEq)]
pub enum VariableValue {
    Array(NdArray),
    Text(String),
    Scalar(f64),
}

impl VariableValue {
    pub fn as_array(&self) -> Option<&NdArray> {
        match self {
            VariableValue::Array(a) => Some(a),
            _ => None,
        }
    }

    fn kind(&self) -> u8 {
        match self {
            VariableValue::Array(_) => KIND_ARRAY,
            VariableValue::Text(_) => KIND_TEXT,
            VariableValue::Scalar(_) => KIND_SCALAR,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub value: VariableValue,
}

/// Ordered collection of named variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableSet {
    vars: Vec<Variable>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable. Names must be unique.
    pub fn insert(&mut self, name: impl Into<String>, value: VariableValue) -> Result<(), StoreError> {
        let name = name.into();
        if name.len() > u16::MAX as usize {
            return Err(StoreError::NameTooLong(name.len()));
        }
        if self.get(&name).is_some() {
            return Err(StoreError::Duplicate(name));
        }
        self.vars.push(Variable { name, value });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.vars.iter().find(|v| v.name == name).map(|v| &v.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|v| v.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn write_to<W: Write>(&self, mut w: W) -> Result<(), StoreError> {
        w.write_all(MAGIC)?;
        w.write_u8(VERSION)?;
        w.write_u32::<LittleEndian>(self.vars.len() as u32)?;
        for var in &self.vars {
            w.write_u16::<LittleEndian>(var.name.len() as u16)?;
            w.write_all(var.name.as_bytes())?;
            w.write_u8(var.value.kind())?;
            match &var.value {
                VariableValue::Array(a) => write_array(&mut w, a)?,
                VariableValue::Text(s) => {
                    w.write_u32::<LittleEndian>(s.len() as u32)?;
                    w.write_all(s.as_bytes())?;
                }
                VariableValue::Scalar(x) => w.write_f64::<LittleEndian>(*x)?,
            }
        }
        w.flush()?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut r: R) -> Result<Self, StoreError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != MAGIC {
            return Err(StoreError::BadMagic);
        }
        let version = r.read_u8()?;
        if version != VERSION {
            return Err(StoreError::UnsupportedVersion(version));
        }

        let count = r.read_u32::<LittleEndian>()?;
        let mut set = VariableSet::new();
        for _ in 0..count {
            let name_len = r.read_u16::<LittleEndian>()? as usize;
            let mut name = vec![0u8; name_len];
            r.read_exact(&mut name)?;
            let name = String::from_utf8(name).map_err(|_| StoreError::BadUtf8)?;

            let value = match r.read_u8()? {
                KIND_ARRAY => VariableValue::Array(read_array(&mut r)?),
                KIND_TEXT => {
                    let len = r.read_u32::<LittleEndian>()? as usize;
                    let bytes = read_bounded(&mut r, len)?;
                    VariableValue::Text(String::from_utf8(bytes).map_err(|_| StoreError::BadUtf8)?)
                }
                KIND_SCALAR => VariableValue::Scalar(r.read_f64::<LittleEndian>()?),
                other => return Err(StoreError::UnknownKind(other)),
            };
            set.insert(name, value)?;
        }
        Ok(set)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(path.to_path_buf())
            } else {
                StoreError::Io(e)
            }
        })?;
        Self::read_from(BufReader::new(file))
    }
}

/// Read exactly `len` bytes without trusting `len` for the allocation
fn read_bounded<R: Read>(r: &mut R, len: usize) -> Result<Vec<u8>, StoreError> {
    let mut bytes = Vec::new();
    r.take(len as u64).read_to_end(&mut bytes)?;
    if bytes.len() != len {
        return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
    }
    Ok(bytes)
}
