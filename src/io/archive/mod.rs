//! Hierarchical archives addressed by `receptor → compound → field`.
//!
//! An [`Archive`] is opened once and shared read-only between threads. Every thread
//! that performs lookups opens its own [`ArchiveReader`] through
//! [`Archive::open_reader`], so readers never need to be synchronized.
//!
//! Two backends are provided:
//!
//! - [`DirectoryArchive`] – one file per field at `<root>/<receptor>/<compound>/<field>`,
//!   holding one value per line.
//! - [`JsonArchive`] – a single JSON document of nested objects whose leaves are
//!   scalars or arrays of scalars.

use std::fmt;
use std::path::Path;

use super::error::Error;

mod json;
mod tree;

pub use json::JsonArchive;
pub use tree::DirectoryArchive;

/// A single leaf value of an archive.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Numeric view; text is accepted when it parses as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

/// The value stored under one key path. Scalar leaves are entries of length one.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry(pub Vec<Scalar>);

impl Entry {
    /// The first element, which is what the training pipeline consumes.
    pub fn first(&self) -> Option<&Scalar> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub trait Archive: Send + Sync {
    /// Opens an independent read handle.
    fn open_reader(&self) -> Result<Box<dyn ArchiveReader + '_>, Error>;

    /// Human-readable location of the archive for diagnostics.
    fn describe(&self) -> String;
}

pub trait ArchiveReader {
    /// Looks up `receptor/compound/field`.
    ///
    /// Fails with [`Error::MissingKey`] when any component of the path is absent and
    /// with [`Error::InvalidEntry`] when the leaf is empty or not a scalar/array.
    fn entry(&mut self, receptor: &str, compound: &str, field: &str) -> Result<Entry, Error>;
}

/// Opens `path` as a [`DirectoryArchive`] if it is a directory and as a
/// [`JsonArchive`] otherwise.
pub fn open(path: &Path) -> Result<Box<dyn Archive>, Error> {
    if path.is_dir() {
        Ok(Box::new(DirectoryArchive::open(path)?))
    } else {
        Ok(Box::new(JsonArchive::open(path)?))
    }
}

pub(crate) fn key_path(receptor: &str, compound: &str, field: &str) -> String {
    format!("{receptor}/{compound}/{field}")
}
