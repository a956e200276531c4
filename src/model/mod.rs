//! Core data structures representing molecules and their graph encodings.
//!
//! - [`element`] – Periodic table elements addressed by atomic number.
//! - [`types`] – Bond orders and hybridization states.
//! - [`atom`] – Atoms as written in SMILES plus perceived properties.
//! - [`molecule`] – Atom/bond topology with neighbor lookup.
//! - [`graph`] – Fixed-width feature vectors arranged as a node/edge graph.
//!
//! A [`Molecule`](molecule::Molecule) is the chemistry-side view consumed by the
//! featurizer; a [`MolecularGraph`](graph::MolecularGraph) is what a model sees.

pub mod atom;
pub mod element;
pub mod graph;
pub mod molecule;
pub mod types;
