//! Readers for the inputs the pipeline consumes.
//!
//! - [`smiles`] – SMILES strings into a [`Molecule`](crate::model::molecule::Molecule).
//! - [`table`] – Delimited text files (CSV/TSV) into rows of named cells.
//! - [`archive`] – Hierarchical `receptor → compound → field` archives.

use std::fmt;

pub mod archive;
pub mod error;
pub mod smiles;
pub mod table;

pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Smiles,
    Table,
    Archive,
}

impl Format {
    /// Unit in which parse error positions of this format are reported.
    pub fn position_unit(&self) -> &'static str {
        match self {
            Format::Smiles => "character",
            Format::Table | Format::Archive => "line",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Smiles => write!(f, "SMILES"),
            Format::Table => write!(f, "delimited table"),
            Format::Archive => write!(f, "archive"),
        }
    }
}
