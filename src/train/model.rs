use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::Error;
use super::metrics::{StepMetrics, mse, r2};
use crate::dataset::{Batch, Sample};
use crate::model::graph::{ATOM_FDIM, BOND_FDIM};

/// A multi-task regressor over molecular graphs.
///
/// The training loop drives a regressor only through this trait; architecture and
/// optimizer are the implementor's business.
pub trait Regressor {
    /// Number of outputs per sample.
    fn n_tasks(&self) -> usize;

    /// Predicts a batch, updates the parameters, and reports the metrics of the
    /// predictions made before the update.
    fn train_step(&mut self, batch: &Batch) -> StepMetrics;

    /// Predicts a batch without updating anything.
    fn evaluate(&self, batch: &Batch) -> StepMetrics;

    /// Serializable parameter state.
    fn checkpoint(&self) -> serde_json::Value;
}

/// Width of the pooled input: summed node features, summed edge features, atom count.
pub const READOUT_DIM: usize = ATOM_FDIM + BOND_FDIM + 1;

/// Linear heads on a sum-pooled graph readout, trained with plain SGD.
///
/// During training, input features are dropped with the configured probability
/// and survivors are rescaled by `1 / (1 - p)`.
#[derive(Debug, Clone)]
pub struct ReadoutRegressor {
    state: ReadoutState,
    learning_rate: f64,
    dropout: f64,
    rng: StdRng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ReadoutState {
    kind: String,
    n_features: usize,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

const KIND: &str = "readout";

impl ReadoutRegressor {
    pub fn new(n_tasks: usize, learning_rate: f64, dropout: f64, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let weights = (0..n_tasks)
            .map(|_| {
                (0..READOUT_DIM)
                    .map(|_| rng.random_range(-0.01..0.01))
                    .collect()
            })
            .collect();
        Self {
            state: ReadoutState {
                kind: KIND.to_string(),
                n_features: READOUT_DIM,
                weights,
                bias: vec![0.0; n_tasks],
            },
            learning_rate,
            dropout,
            rng,
        }
    }

    /// Restores parameters written by [`Regressor::checkpoint`].
    pub fn from_checkpoint(
        value: serde_json::Value,
        learning_rate: f64,
        dropout: f64,
        seed: Option<u64>,
    ) -> Result<Self, Error> {
        let state: ReadoutState =
            serde_json::from_value(value).map_err(|e| Error::Checkpoint(e.to_string()))?;
        if state.kind != KIND || state.n_features != READOUT_DIM {
            return Err(Error::Checkpoint(format!(
                "expected a '{KIND}' model with {READOUT_DIM} features, found '{}' with {}",
                state.kind, state.n_features
            )));
        }
        if state.weights.len() != state.bias.len()
            || state.weights.iter().any(|w| w.len() != READOUT_DIM)
        {
            return Err(Error::Checkpoint("weight shapes are inconsistent".into()));
        }
        let mut model = Self::new(0, learning_rate, dropout, seed);
        model.state = state;
        Ok(model)
    }

    fn predict(&self, x: &[f64]) -> Vec<f64> {
        self.state
            .weights
            .iter()
            .zip(&self.state.bias)
            .map(|(w, b)| w.iter().zip(x).map(|(wi, xi)| wi * xi).sum::<f64>() + b)
            .collect()
    }

    fn apply_dropout(&mut self, x: &mut [f64]) {
        if self.dropout <= 0.0 {
            return;
        }
        let keep = 1.0 - self.dropout;
        for v in x.iter_mut() {
            if self.rng.random::<f64>() < self.dropout {
                *v = 0.0;
            } else {
                *v /= keep;
            }
        }
    }
}

/// Sum-pooled readout of one sample.
pub fn readout(sample: &Sample) -> [f64; READOUT_DIM] {
    let mut x = [0.0; READOUT_DIM];
    for node in &sample.graph.nodes {
        for (acc, v) in x[..ATOM_FDIM].iter_mut().zip(node) {
            *acc += *v as f64;
        }
    }
    for edge in sample.graph.edges.values().flatten() {
        for (acc, v) in x[ATOM_FDIM..ATOM_FDIM + BOND_FDIM]
            .iter_mut()
            .zip(&edge.features)
        {
            *acc += *v as f64;
        }
    }
    x[READOUT_DIM - 1] = sample.graph.node_count() as f64;
    x
}

impl Regressor for ReadoutRegressor {
    fn n_tasks(&self) -> usize {
        self.state.bias.len()
    }

    fn train_step(&mut self, batch: &Batch) -> StepMetrics {
        let n_tasks = self.n_tasks();
        if batch.is_empty() || n_tasks == 0 {
            return StepMetrics::default();
        }

        let mut inputs = Vec::with_capacity(batch.len());
        let mut predicted = Vec::with_capacity(batch.len() * n_tasks);
        for sample in batch {
            let mut x = readout(sample);
            self.apply_dropout(&mut x);
            predicted.extend(self.predict(&x));
            inputs.push(x);
        }
        let truth = batch.targets();

        // d(MSE)/d(prediction) over every (sample, task) value
        let scale = 2.0 / truth.len() as f64;
        for (s, x) in inputs.iter().enumerate() {
            for task in 0..n_tasks {
                let k = s * n_tasks + task;
                let grad = scale * (predicted[k] - truth[k]);
                let step = self.learning_rate * grad;
                for (w, xi) in self.state.weights[task].iter_mut().zip(x) {
                    *w -= step * xi;
                }
                self.state.bias[task] -= step;
            }
        }

        StepMetrics {
            loss: mse(&predicted, &truth),
            r2: r2(&predicted, &truth, n_tasks),
        }
    }

    fn evaluate(&self, batch: &Batch) -> StepMetrics {
        let n_tasks = self.n_tasks();
        if batch.is_empty() || n_tasks == 0 {
            return StepMetrics::default();
        }
        let predicted: Vec<f64> = batch
            .iter()
            .flat_map(|sample| self.predict(&readout(sample)))
            .collect();
        let truth = batch.targets();
        StepMetrics {
            loss: mse(&predicted, &truth),
            r2: r2(&predicted, &truth, n_tasks),
        }
    }

    fn checkpoint(&self) -> serde_json::Value {
        serde_json::to_value(&self.state).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::assemble;
    use crate::graph::{self, GraphConfig};

    fn sample(smiles: &str, targets: Vec<f64>) -> Sample {
        Sample {
            compound: smiles.to_string(),
            graph: graph::build(smiles, &GraphConfig::default()).unwrap(),
            targets,
        }
    }

    fn alkanes() -> Batch {
        // target: number of carbons
        assemble(
            ["C", "CC", "CCC", "CCCC", "CCCCC"]
                .iter()
                .map(|s| sample(s, vec![s.len() as f64]))
                .collect(),
        )
    }

    #[test]
    fn readout_sums_features() {
        let x = readout(&sample("CCO", vec![]));
        assert_eq!(x[READOUT_DIM - 1], 3.0);
        // carbon is the first element slot, oxygen the third
        assert_eq!(x[0], 2.0);
        assert_eq!(x[2], 1.0);
        // faithful adjacency: one single-bond edge per atom
        assert_eq!(x[ATOM_FDIM], 3.0);
    }

    #[test]
    fn sgd_reduces_training_loss() {
        let batch = alkanes();
        let mut model = ReadoutRegressor::new(1, 1e-3, 0.0, Some(1));
        let first = model.evaluate(&batch).loss;
        for _ in 0..200 {
            model.train_step(&batch);
        }
        let last = model.evaluate(&batch).loss;
        assert!(last.is_finite());
        assert!(last < first);
    }

    #[test]
    fn evaluate_does_not_change_parameters() {
        let batch = alkanes();
        let model = ReadoutRegressor::new(2, 1e-3, 0.5, Some(2));
        let before = model.checkpoint();
        let _ = model.evaluate(&batch);
        assert_eq!(model.checkpoint(), before);
    }

    #[test]
    fn checkpoint_round_trips_parameters() {
        let model = ReadoutRegressor::new(3, 1e-3, 0.5, Some(3));
        let restored =
            ReadoutRegressor::from_checkpoint(model.checkpoint(), 1e-3, 0.5, None).unwrap();
        assert_eq!(restored.n_tasks(), 3);
        assert_eq!(restored.checkpoint(), model.checkpoint());

        let foreign = serde_json::json!({"kind": "mpnn"});
        let err = ReadoutRegressor::from_checkpoint(foreign, 1e-3, 0.5, None);
        assert!(matches!(err, Err(Error::Checkpoint(_))));
    }

    #[test]
    fn seeded_models_are_identical() {
        let a = ReadoutRegressor::new(2, 1e-3, 0.5, Some(9));
        let b = ReadoutRegressor::new(2, 1e-3, 0.5, Some(9));
        assert_eq!(a.checkpoint(), b.checkpoint());
    }
}
