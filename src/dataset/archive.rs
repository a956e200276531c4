use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::config::{DatasetConfig, ListingSelection};
use super::error::Error;
use super::exclusion::ExclusionSet;
use super::row::{ArchiveFields, Row};
use super::sample::{Sample, SampleProvider};
use super::{Dataset, shuffle_rows};
use crate::io::{self, archive::Archive, table};

/// Dataset whose rows come from listing files and whose fields live in an archive.
///
/// Only `(receptor, compound)` pairs are held in memory. Every retrieval opens its
/// own archive reader, so concurrent `get` calls never share a handle.
pub struct ArchiveDataset {
    archive: Box<dyn Archive>,
    rows: Vec<Row>,
    smiles_field: String,
    provider: SampleProvider,
}

impl ArchiveDataset {
    /// Opens the archive at `path` and indexes the listing files in `listing_dir`.
    pub fn open(path: &Path, listing_dir: &Path, config: &DatasetConfig) -> Result<Self, Error> {
        let archive = io::archive::open(path).map_err(|e| Error::source_load(path, e))?;
        Self::with_archive(archive, listing_dir, config)
    }

    /// Indexes the listing files in `listing_dir` against an already opened archive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceLoad`] if no listing file is selected, a listing file
    /// cannot be read or lacks the receptor/compound columns, or the exclusion file
    /// cannot be read.
    pub fn with_archive(
        archive: Box<dyn Archive>,
        listing_dir: &Path,
        config: &DatasetConfig,
    ) -> Result<Self, Error> {
        let files = listing_files(listing_dir, &config.listing)?;
        let excluded =
            ExclusionSet::load_optional(config.exclude.as_deref(), &config.exclude_column)?;

        let columns = [
            config.columns.receptor.as_str(),
            config.columns.compound.as_str(),
        ];
        let mut rows = Vec::new();
        let mut total = 0;
        for file in &files {
            let table = table::read_path(file, &columns).map_err(|e| Error::source_load(file, e))?;
            total += table.len();
            rows.extend(
                table
                    .rows()
                    .map(|cells| Row::new(cells[0].trim(), cells[1].trim()))
                    .filter(|row| !excluded.contains(&row.compound)),
            );
        }

        shuffle_rows(&mut rows, config.seed);
        debug!(
            archive = %archive.describe(),
            listing_files = files.len(),
            total,
            kept = rows.len(),
            "indexed archive dataset"
        );

        Ok(Self {
            archive,
            rows,
            smiles_field: config.smiles_field.clone(),
            provider: SampleProvider::new(config.targets.clone(), config.graph),
        })
    }
}

fn listing_files(dir: &Path, selection: &ListingSelection) -> Result<Vec<PathBuf>, Error> {
    let files = match selection {
        ListingSelection::Named(name) => vec![dir.join(name)],
        ListingSelection::AllFiles => {
            let entries = fs::read_dir(dir).map_err(|e| Error::source_load(dir, e.into()))?;
            let mut files = Vec::new();
            for entry in entries {
                let path = entry.map_err(|e| Error::source_load(dir, e.into()))?.path();
                if path.is_file() {
                    files.push(path);
                }
            }
            files.sort();
            files
        }
    };

    if files.is_empty() {
        return Err(Error::source_load(
            dir,
            io::Error::from(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "listing directory contains no files",
            )),
        ));
    }
    Ok(files)
}

impl Dataset for ArchiveDataset {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn row(&self, position: usize) -> Result<&Row, Error> {
        self.rows.get(position).ok_or(Error::IndexOutOfRange {
            position,
            len: self.rows.len(),
        })
    }

    fn get(&self, position: usize) -> Result<Sample, Error> {
        let row = self.row(position)?;
        let reader = self.archive.open_reader().map_err(|source| Error::Archive {
            compound: row.compound.clone(),
            source,
        })?;
        let mut fields = ArchiveFields {
            reader,
            smiles_field: &self.smiles_field,
        };
        self.provider.get(row, &mut fields)
    }

    fn target_names(&self) -> &[String] {
        self.provider.target_names()
    }
}
