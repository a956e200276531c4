use rayon::ThreadPool;
use rayon::prelude::*;

use super::Dataset;
use super::batch::{Batch, assemble};
use super::error::Error;
use super::sample::Sample;

/// A batch together with the positions whose retrieval failed.
#[derive(Debug)]
pub struct LoadedBatch {
    pub batch: Batch,
    pub failures: Vec<(usize, Error)>,
}

/// Retrieves samples for batches of positions, optionally on a worker pool.
///
/// Workers only run [`Dataset::get`]; sample order inside a batch always follows
/// the order of the requested positions.
pub struct DataLoader<'a> {
    dataset: &'a dyn Dataset,
    batch_size: usize,
    pool: Option<ThreadPool>,
}

impl<'a> DataLoader<'a> {
    /// Creates a loader that retrieves `batch_size` samples per batch using `workers`
    /// threads, or the calling thread when `workers` is 0.
    pub fn new(
        dataset: &'a dyn Dataset,
        batch_size: usize,
        workers: usize,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = if workers == 0 {
            None
        } else {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("molprop-loader-{i}"))
                    .build()?,
            )
        };
        Ok(Self {
            dataset,
            batch_size: batch_size.max(1),
            pool,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(0, ThreadPool::current_num_threads)
    }

    /// Number of batches needed to cover `positions` positions.
    pub fn num_batches(&self, positions: usize) -> usize {
        positions.div_ceil(self.batch_size)
    }

    /// Lazily loads `positions` in consecutive chunks of the batch size.
    pub fn batches(&self, positions: Vec<usize>) -> Batches<'_, 'a> {
        Batches {
            loader: self,
            positions,
            next: 0,
        }
    }

    /// Loads exactly the given positions as one batch.
    pub fn load(&self, positions: &[usize]) -> LoadedBatch {
        let fetch = || -> Vec<(usize, Result<Sample, Error>)> {
            positions
                .par_iter()
                .map(|&p| (p, self.dataset.get(p)))
                .collect()
        };
        let results = match &self.pool {
            Some(pool) => pool.install(fetch),
            None => positions.iter().map(|&p| (p, self.dataset.get(p))).collect(),
        };

        let mut samples = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (position, result) in results {
            match result {
                Ok(sample) => samples.push(sample),
                Err(e) => failures.push((position, e)),
            }
        }
        LoadedBatch {
            batch: assemble(samples),
            failures,
        }
    }
}

pub struct Batches<'l, 'a> {
    loader: &'l DataLoader<'a>,
    positions: Vec<usize>,
    next: usize,
}

impl Iterator for Batches<'_, '_> {
    type Item = LoadedBatch;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.positions.len() {
            return None;
        }
        let end = (self.next + self.loader.batch_size).min(self.positions.len());
        let chunk = &self.positions[self.next..end];
        self.next = end;
        Some(self.loader.load(chunk))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .loader
            .num_batches(self.positions.len() - self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Row;
    use crate::graph::{self, GraphConfig};

    struct Fixed {
        rows: Vec<Row>,
        smiles: Vec<&'static str>,
        targets: Vec<String>,
    }

    impl Fixed {
        fn new(smiles: Vec<&'static str>) -> Self {
            Self {
                rows: (0..smiles.len())
                    .map(|i| Row::new("r", format!("C{i}")))
                    .collect(),
                smiles,
                targets: vec!["y".into()],
            }
        }
    }

    impl Dataset for Fixed {
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
            let graph = graph::build(self.smiles[position], &GraphConfig::default()).map_err(
                |source| Error::Parse {
                    compound: row.compound.clone(),
                    source,
                },
            )?;
            Ok(Sample {
                compound: row.compound.clone(),
                graph,
                targets: vec![position as f64],
            })
        }

        fn target_names(&self) -> &[String] {
            &self.targets
        }
    }

    #[test]
    fn batches_cover_positions_in_order() {
        let data = Fixed::new(vec!["C", "CC", "CCC", "CCCC", "CCCCC"]);
        for workers in [0, 2] {
            let loader = DataLoader::new(&data, 2, workers).unwrap();
            let batches = loader.batches(vec![4, 0, 3, 1, 2]);
            assert_eq!(batches.len(), 3);

            let targets: Vec<f64> = batches.flat_map(|b| b.batch.targets()).collect();
            assert_eq!(targets, [4.0, 0.0, 3.0, 1.0, 2.0]);
        }
    }

    #[test]
    fn failures_are_reported_with_positions() {
        let data = Fixed::new(vec!["CC", "C1CC", "O"]);
        let loader = DataLoader::new(&data, 8, 1).unwrap();
        let loaded = loader.load(&[0, 1, 2, 7]);

        assert_eq!(loaded.batch.len(), 2);
        let failed: Vec<usize> = loaded.failures.iter().map(|(p, _)| *p).collect();
        assert_eq!(failed, [1, 7]);
        assert!(loaded.failures[0].1.is_per_sample());
        assert!(!loaded.failures[1].1.is_per_sample());
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        let data = Fixed::new(vec!["C"]);
        let loader = DataLoader::new(&data, 0, 0).unwrap();
        assert_eq!(loader.batch_size(), 1);
        assert_eq!(loader.workers(), 0);
        assert_eq!(loader.num_batches(3), 3);
    }
}
