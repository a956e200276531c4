//! Indexed collections of training samples.
//!
//! A dataset is built once from a [`DataSource`]: rows are loaded, compounds listed
//! in the exclusion file are dropped, and the remaining rows are shuffled exactly
//! once. From then on the dataset is read-only and [`Dataset::get`] may be called
//! from any number of threads at once.
//!
//! - [`TabularDataset`] – one delimited file with SMILES and target columns.
//! - [`ArchiveDataset`] – listing files naming `(receptor, compound)` pairs plus an
//!   archive holding the fields of each pair.
//!
//! [`DataLoader`] groups retrieved samples into [`Batch`]es on a worker pool.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

mod archive;
mod batch;
mod config;
mod error;
mod exclusion;
mod loader;
mod row;
mod sample;
mod tabular;

pub use archive::ArchiveDataset;
pub use batch::{Batch, assemble};
pub use config::{ColumnNames, DataSource, DatasetConfig, ListingSelection};
pub use error::Error;
pub use exclusion::ExclusionSet;
pub use loader::{Batches, DataLoader, LoadedBatch};
pub use row::{ArchiveFields, CellFields, Fields, Row};
pub use sample::{Sample, SampleProvider};
pub use tabular::TabularDataset;

/// Random-access collection of samples.
pub trait Dataset: Send + Sync {
    /// Number of retrievable rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The indexed record at `position`.
    fn row(&self, position: usize) -> Result<&Row, Error>;

    /// Builds the sample at `position`. Repeated calls return equal samples.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] for positions outside `[0, len)`, otherwise any
    /// per-sample error of the underlying row.
    fn get(&self, position: usize) -> Result<Sample, Error>;

    fn target_names(&self) -> &[String];
}

/// Opens the dataset described by `source`.
pub fn open(source: &DataSource, config: &DatasetConfig) -> Result<Box<dyn Dataset>, Error> {
    match source {
        DataSource::Table { path } => Ok(Box::new(TabularDataset::open(path, config)?)),
        DataSource::Archive { path, listing_dir } => {
            Ok(Box::new(ArchiveDataset::open(path, listing_dir, config)?))
        }
    }
}

impl DataSource {
    /// The main path of the source, for diagnostics.
    pub fn path(&self) -> &Path {
        match self {
            DataSource::Table { path } | DataSource::Archive { path, .. } => path,
        }
    }
}

fn shuffle_rows(rows: &mut [Row], seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    rows.shuffle(&mut rng);
}
