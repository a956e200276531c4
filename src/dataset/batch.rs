use serde::Serialize;

use super::sample::Sample;

/// Samples grouped for one training or validation step.
///
/// Graphs keep their own sizes; nothing is padded or stacked.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Batch {
    samples: Vec<Sample>,
}

/// Packages `samples` unchanged as a batch.
pub fn assemble(samples: Vec<Sample>) -> Batch {
    Batch { samples }
}

impl Batch {
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    /// Target values of all samples, row-major.
    pub fn targets(&self) -> Vec<f64> {
        self.samples
            .iter()
            .flat_map(|s| s.targets.iter().copied())
            .collect()
    }

    pub fn total_atoms(&self) -> usize {
        self.samples.iter().map(|s| s.graph.node_count()).sum()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
