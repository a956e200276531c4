use std::path::PathBuf;

use thiserror::Error;

use crate::dataset;

/// Errors that abort a training run.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration is inconsistent.
    #[error("invalid training configuration: {0}")]
    InvalidConfig(String),

    /// The dataset holds no rows.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A sample could not be loaded and invalid samples are not skipped.
    #[error("failed to load sample at position {position}: {source}")]
    Sample {
        position: usize,
        #[source]
        source: dataset::Error,
    },

    /// The data loader's worker pool could not be started.
    #[error("failed to start data loader workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    /// A run artifact could not be written.
    #[error("failed to write {what} to '{}': {source}", path.display())]
    Output {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A run artifact could not be serialized.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A checkpoint does not describe a compatible model.
    #[error("checkpoint is not usable: {0}")]
    Checkpoint(String),
}

impl Error {
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    pub(crate) fn output(
        what: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Output {
            what,
            path: path.into(),
            source,
        }
    }
}
