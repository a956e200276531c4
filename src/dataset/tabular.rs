use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use super::config::DatasetConfig;
use super::error::Error;
use super::exclusion::ExclusionSet;
use super::row::{CellFields, Row};
use super::sample::{Sample, SampleProvider};
use super::{Dataset, shuffle_rows};
use crate::io::table;

/// Dataset backed by one delimited file holding receptor, compound, SMILES, and
/// target columns.
#[derive(Debug, Clone)]
pub struct TabularDataset {
    rows: Vec<Row>,
    smiles_column: String,
    provider: SampleProvider,
}

impl TabularDataset {
    /// Reads `path`, drops excluded compounds, and shuffles the remaining rows once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceLoad`] if the file or the exclusion file cannot be read
    /// or lacks one of the configured columns.
    pub fn open(path: &Path, config: &DatasetConfig) -> Result<Self, Error> {
        let columns = &config.columns;
        let mut wanted: Vec<&str> = vec![
            columns.receptor.as_str(),
            columns.compound.as_str(),
            columns.smiles.as_str(),
        ];
        for target in &config.targets {
            if !wanted.contains(&target.as_str()) {
                wanted.push(target);
            }
        }

        let table = table::read_path(path, &wanted).map_err(|e| Error::source_load(path, e))?;
        let excluded =
            ExclusionSet::load_optional(config.exclude.as_deref(), &config.exclude_column)?;

        let total = table.len();
        let mut rows: Vec<Row> = table
            .rows()
            .filter(|cells| !excluded.contains(cells[1].trim()))
            .map(|cells| Row {
                receptor: cells[0].trim().to_string(),
                compound: cells[1].trim().to_string(),
                cells: wanted[2..]
                    .iter()
                    .zip(&cells[2..])
                    .map(|(name, value)| (name.to_string(), value.clone()))
                    .collect::<BTreeMap<_, _>>(),
            })
            .collect();

        shuffle_rows(&mut rows, config.seed);
        debug!(
            path = %path.display(),
            total,
            excluded = total - rows.len(),
            kept = rows.len(),
            "loaded tabular dataset"
        );

        Ok(Self {
            rows,
            smiles_column: columns.smiles.clone(),
            provider: SampleProvider::new(config.targets.clone(), config.graph),
        })
    }
}

impl Dataset for TabularDataset {
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
        let mut fields = CellFields {
            smiles_column: &self.smiles_column,
        };
        self.provider.get(row, &mut fields)
    }

    fn target_names(&self) -> &[String] {
        self.provider.target_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const CSV: &str = "receptor,drugID,smiles,Hy,MLOGP,extra\n\
                       fgfr1,D1,CCO,0.1,1.0,x\n\
                       fgfr1,D2,c1ccccc1,0.2,2.0,y\n\
                       egfr,D3,CC(=O)O,0.3,3.0,z\n";

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    fn config(targets: &[&str]) -> DatasetConfig {
        DatasetConfig {
            targets: targets.iter().map(|t| t.to_string()).collect(),
            seed: Some(11),
            ..DatasetConfig::default()
        }
    }

    #[test]
    fn excluded_rows_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write(dir.path(), "data.csv", CSV);
        let exclude = write(dir.path(), "corrupt.csv", "drugID\nD2\n");

        let dataset = TabularDataset::open(
            &csv,
            &DatasetConfig {
                exclude: Some(exclude),
                ..config(&["Hy", "MLOGP"])
            },
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.get(0).unwrap().targets.len(), 2);
        let compounds: Vec<&str> = (0..2)
            .map(|p| dataset.row(p).unwrap().compound.as_str())
            .collect();
        assert!(!compounds.contains(&"D2"));
    }

    #[test]
    fn same_seed_same_order() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write(dir.path(), "data.csv", CSV);
        let a = TabularDataset::open(&csv, &config(&["Hy"])).unwrap();
        let b = TabularDataset::open(&csv, &config(&["Hy"])).unwrap();
        for p in 0..a.len() {
            assert_eq!(a.row(p).unwrap(), b.row(p).unwrap());
        }
    }

    #[test]
    fn get_is_idempotent_and_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write(dir.path(), "data.csv", CSV);
        let dataset = TabularDataset::open(&csv, &config(&["Hy"])).unwrap();

        assert_eq!(dataset.get(1).unwrap(), dataset.get(1).unwrap());
        assert!(matches!(
            dataset.get(3),
            Err(Error::IndexOutOfRange { position: 3, len: 3 })
        ));
    }

    #[test]
    fn missing_target_column_fails_construction() {
        let dir = tempfile::tempdir().unwrap();
        let csv = write(dir.path(), "data.csv", CSV);
        let err = TabularDataset::open(&csv, &config(&["vina_score"])).unwrap_err();
        assert!(matches!(err, Error::SourceLoad { .. }));
    }
}
