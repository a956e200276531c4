use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at {} {position})", .format.position_unit())]
    Parse {
        format: Format,
        position: usize,
        details: String,
    },

    #[error("chemically invalid molecule: {0}")]
    Chemistry(String),

    #[error("required column '{column}' is missing from the header")]
    MissingColumn { column: String },

    #[error("no entry at archive key path '{path}'")]
    MissingKey { path: String },

    #[error("archive entry at '{path}' has an unexpected shape: {details}")]
    InvalidEntry { path: String, details: String },

    #[error("archive document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn parse(format: Format, position: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            position,
            details: details.into(),
        }
    }

    pub fn chemistry(details: impl Into<String>) -> Self {
        Self::Chemistry(details.into())
    }

    pub fn missing_key(path: impl Into<String>) -> Self {
        Self::MissingKey { path: path.into() }
    }

    pub fn invalid_entry(path: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidEntry {
            path: path.into(),
            details: details.into(),
        }
    }
}
