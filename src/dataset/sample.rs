use serde::Serialize;

use super::error::Error;
use super::row::{Fields, Row};
use crate::graph::{self, GraphConfig};
use crate::model::graph::MolecularGraph;

/// A single training example.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub compound: String,
    pub graph: MolecularGraph,
    /// One value per configured target, in configured order.
    pub targets: Vec<f64>,
}

/// Turns rows into samples: resolves targets and SMILES, then builds the graph.
#[derive(Debug, Clone)]
pub struct SampleProvider {
    targets: Vec<String>,
    graph: GraphConfig,
}

impl SampleProvider {
    pub fn new(targets: Vec<String>, graph: GraphConfig) -> Self {
        Self { targets, graph }
    }

    pub fn target_names(&self) -> &[String] {
        &self.targets
    }

    pub fn get(&self, row: &Row, fields: &mut dyn Fields) -> Result<Sample, Error> {
        let targets = self
            .targets
            .iter()
            .map(|name| fields.target(row, name))
            .collect::<Result<Vec<_>, _>>()?;

        let smiles = fields.smiles(row)?;
        let graph = graph::build(&smiles, &self.graph).map_err(|source| Error::Parse {
            compound: row.compound.clone(),
            source,
        })?;

        Ok(Sample {
            compound: row.compound.clone(),
            graph,
            targets,
        })
    }
}
