//! Molecule-to-graph construction.
//!
//! [`build`] turns a SMILES string into a [`MolecularGraph`]: one node per heavy
//! atom carrying its [`atom_features`], and directed edges carrying
//! [`bond_features`].
//!
//! By default the adjacency reproduces the historical encoding the models were
//! trained on: each source atom keeps only the edge to its lowest-indexed bonded
//! partner. Set [`GraphConfig::strict_adjacency`] to record every bond in both
//! directions instead.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::featurize::{atom_features, bond_features};
use crate::io::Error;
use crate::model::graph::{Edge, MolecularGraph};
use crate::model::molecule::Molecule;
use crate::perceive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Emit an edge for every bond in both directions rather than one edge per
    /// source atom.
    pub strict_adjacency: bool,
}

/// Parses and perceives `smiles`, then encodes it as a graph.
pub fn build(smiles: &str, config: &GraphConfig) -> Result<MolecularGraph, Error> {
    let mol = perceive::parse_smiles(smiles)?;
    Ok(from_molecule(&mol, config))
}

/// Encodes an already perceived molecule.
pub fn from_molecule(mol: &Molecule, config: &GraphConfig) -> MolecularGraph {
    let nodes = (0..mol.atom_count())
        .map(|idx| atom_features(mol, idx))
        .collect();

    let mut edges: BTreeMap<usize, Vec<Edge>> = BTreeMap::new();
    for source in 0..mol.atom_count() {
        let mut partners: Vec<(usize, usize)> = mol.neighbors(source).to_vec();
        partners.sort_unstable();
        if !config.strict_adjacency {
            partners.truncate(1);
        }
        if partners.is_empty() {
            continue;
        }
        edges.insert(
            source,
            partners
                .into_iter()
                .map(|(target, bond)| Edge {
                    features: bond_features(&mol.bonds()[bond]),
                    target,
                })
                .collect(),
        );
    }

    MolecularGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::graph::{ATOM_FDIM, BOND_FDIM};

    fn faithful(smiles: &str) -> MolecularGraph {
        build(smiles, &GraphConfig::default()).unwrap()
    }

    fn strict(smiles: &str) -> MolecularGraph {
        build(
            smiles,
            &GraphConfig {
                strict_adjacency: true,
            },
        )
        .unwrap()
    }

    #[test]
    fn ethane_has_two_nodes_and_one_edge_per_source() {
        let graph = faithful("CC");
        assert_eq!(graph.node_count(), 2);
        assert!(graph.nodes.iter().all(|n| n.len() == ATOM_FDIM));
        assert_eq!(graph.edges_from(0).len(), 1);
        assert_eq!(graph.edges_from(0)[0].target, 1);
        assert_eq!(graph.edges_from(0)[0].features.len(), BOND_FDIM);
        assert_eq!(graph.edges_from(1)[0].target, 0);
    }

    #[test]
    fn faithful_mode_keeps_only_lowest_partner() {
        let graph = faithful("CCC");
        let middle = graph.edges_from(1);
        assert_eq!(middle.len(), 1);
        assert_eq!(middle[0].target, 0);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn strict_mode_records_every_bond_both_ways() {
        let smiles = "CC(=O)Nc1ccccc1";
        let mol = perceive::parse_smiles(smiles).unwrap();
        let graph = strict(smiles);
        assert_eq!(graph.edge_count(), 2 * mol.bond_count());

        let targets: Vec<usize> = graph.edges_from(1).iter().map(|e| e.target).collect();
        assert_eq!(targets, [0, 2, 3]);
    }

    #[test]
    fn edge_features_are_binary() {
        let graph = strict("c1ccccc1C#N");
        for edges in graph.edges.values() {
            for edge in edges {
                assert!(edge.features.iter().all(|&v| v == 0.0 || v == 1.0));
            }
        }
    }

    #[test]
    fn isolated_atoms_have_no_edge_key() {
        let graph = faithful("[Na+].[Cl-]");
        assert_eq!(graph.node_count(), 2);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn node_indices_are_dense_after_hydrogen_folding() {
        let graph = faithful("[H]OC");
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edges.keys().copied().collect::<Vec<_>>(), [0, 1]);
    }

    #[test]
    fn unparseable_smiles_fails() {
        assert!(matches!(
            build("C1CC", &GraphConfig::default()),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn oversized_charge_fails_without_panicking() {
        for text in ["[C-2147483648]", "[C+4294967295]"] {
            assert!(matches!(
                build(text, &GraphConfig::default()),
                Err(Error::Parse { .. })
            ));
        }
    }
}
