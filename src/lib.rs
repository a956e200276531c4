//! Molecular property regression data pipeline in pure Rust.
//!
//! Compounds arrive as SMILES strings together with numeric targets, either in a
//! delimited table or in a hierarchical `receptor → compound → field` archive. This
//! crate turns them into fixed-width molecular graphs, serves them as an indexed,
//! shuffled, exclusion-filtered dataset, groups them into batches on a worker pool,
//! and drives a training loop over them.
//!
//! # Features
//!
//! - **SMILES parsing and perception**: Organic subset and bracket atoms, rings,
//!   branches, aromaticity (including Kekulé input), valence, hybridization
//! - **Graph encoding**: 75 atom features and 6 bond features per edge, in the
//!   layout used by DeepChem's convolutional featurizer
//! - **Datasets**: Tabular and archive sources behind one [`Dataset`](dataset::Dataset)
//!   trait, safe to read from many threads at once
//! - **Training**: Train/validation split, periodic validation, scalar logs, and
//!   checkpoints around any [`Regressor`](train::Regressor)
//!
//! # Quick Start
//!
//! ```
//! use molprop::{GraphConfig, build_graph};
//! use molprop::{ATOM_FDIM, BOND_FDIM};
//!
//! // Ethanol: three heavy atoms, hydrogens are implicit
//! let graph = build_graph("CCO", &GraphConfig::default())?;
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.nodes[0].len(), ATOM_FDIM);
//!
//! // Default adjacency keeps one edge per atom, toward its lowest-indexed partner
//! assert_eq!(graph.edge_count(), 3);
//! assert_eq!(graph.edges_from(1)[0].target, 0);
//! assert_eq!(graph.edges_from(1)[0].features.len(), BOND_FDIM);
//!
//! // Strict adjacency records every bond in both directions
//! let strict = build_graph("CCO", &GraphConfig { strict_adjacency: true })?;
//! assert_eq!(strict.edge_count(), 4);
//! # Ok::<(), molprop::io::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`]: SMILES, delimited tables, and archives
//! - [`graph`]: Molecule-to-graph construction
//! - [`dataset`]: Sample providers, dataset indexes, batches, and the data loader
//! - [`train`]: Training orchestration
//!
//! # Data Types
//!
//! - [`Molecule`]: Atoms and bonds of a parsed and perceived compound
//! - [`Atom`]: Element, charge, hydrogens, and perceived properties
//! - [`Element`]: Chemical element addressed by atomic number
//! - [`BondOrder`]: Single, double, triple, or aromatic
//! - [`Hybridization`]: Orbital hybridization of an atom
//! - [`MolecularGraph`]: Node feature vectors plus directed, featurized edges

mod featurize;
mod model;
mod perceive;

pub mod dataset;
pub mod graph;
pub mod io;
pub mod train;

pub use model::atom::Atom;
pub use model::element::{Element, ParseElementError};
pub use model::graph::{ATOM_FDIM, AtomFeatures, BOND_FDIM, BondFeatures, Edge, MolecularGraph};
pub use model::molecule::{Bond, Molecule};
pub use model::types::{BondOrder, Hybridization};

pub use featurize::{atom_features, bond_features};
pub use graph::{GraphConfig, build as build_graph};
pub use perceive::{parse_smiles, perceive};
