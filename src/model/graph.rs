use std::collections::BTreeMap;

use serde::Serialize;

/// Length of an atom (node) feature vector.
pub const ATOM_FDIM: usize = 75;
/// Length of a bond (edge) feature vector.
pub const BOND_FDIM: usize = 6;

pub type AtomFeatures = [f32; ATOM_FDIM];
pub type BondFeatures = [f32; BOND_FDIM];

/// A directed edge leaving some source atom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    #[serde(with = "features")]
    pub features: BondFeatures,
    pub target: usize,
}

/// Per-atom and per-bond feature vectors of one molecule.
///
/// `nodes[i]` holds the features of atom `i`; indices are dense and follow parse
/// order. `edges` maps a source atom to its outgoing edges. Atoms without an
/// outgoing edge have no key at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MolecularGraph {
    #[serde(serialize_with = "serialize_nodes")]
    pub nodes: Vec<AtomFeatures>,
    pub edges: BTreeMap<usize, Vec<Edge>>,
}

impl MolecularGraph {
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of directed edges across all sources.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    #[inline]
    pub fn node(&self, idx: usize) -> Option<&AtomFeatures> {
        self.nodes.get(idx)
    }

    pub fn edges_from(&self, source: usize) -> &[Edge] {
        self.edges.get(&source).map(Vec::as_slice).unwrap_or(&[])
    }
}

// serde implements arrays only up to 32 elements.
fn serialize_nodes<S: serde::Serializer>(
    nodes: &[AtomFeatures],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(nodes.len()))?;
    for node in nodes {
        seq.serialize_element(node.as_slice())?;
    }
    seq.end()
}

mod features {
    use super::BondFeatures;

    pub fn serialize<S: serde::Serializer>(
        features: &BondFeatures,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(features.iter())
    }
}
