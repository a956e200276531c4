use std::path::PathBuf;

use thiserror::Error;

use crate::io;

/// Errors raised while building or reading a dataset.
///
/// Per-sample failures ([`Parse`](Error::Parse), [`MissingField`](Error::MissingField),
/// [`InvalidField`](Error::InvalidField), [`Archive`](Error::Archive)) are fatal for
/// that sample only. [`SourceLoad`](Error::SourceLoad) is fatal for the whole dataset.
#[derive(Debug, Error)]
pub enum Error {
    /// The SMILES string of a compound could not be turned into a molecule.
    #[error("failed to parse SMILES of compound '{compound}': {source}")]
    Parse {
        compound: String,
        #[source]
        source: io::Error,
    },

    /// A configured target or field does not exist for a row.
    #[error("compound '{compound}' has no field '{field}'")]
    MissingField { compound: String, field: String },

    /// A field exists but cannot be read as a number.
    #[error("field '{field}' of compound '{compound}' is not numeric: '{value}'")]
    InvalidField {
        compound: String,
        field: String,
        value: String,
    },

    /// A data source could not be read or lacks required columns.
    #[error("failed to load data source '{}': {source}", path.display())]
    SourceLoad {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A position outside `[0, len)` was requested.
    #[error("position {position} is out of range for a dataset of {len} rows")]
    IndexOutOfRange { position: usize, len: usize },

    /// A lookup inside an opened archive failed for a reason other than a missing key.
    #[error("archive lookup for compound '{compound}' failed: {source}")]
    Archive {
        compound: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn source_load(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceLoad {
            path: path.into(),
            source,
        }
    }

    pub fn missing_field(compound: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            compound: compound.into(),
            field: field.into(),
        }
    }

    /// Whether the error concerns a single sample and leaves the dataset usable.
    pub fn is_per_sample(&self) -> bool {
        matches!(
            self,
            Error::Parse { .. }
                | Error::MissingField { .. }
                | Error::InvalidField { .. }
                | Error::Archive { .. }
        )
    }
}
