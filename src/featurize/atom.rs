use super::one_hot;
use crate::model::graph::{ATOM_FDIM, AtomFeatures};
use crate::model::molecule::Molecule;
use crate::model::types::Hybridization;

const ELEMENTS: [&str; 44] = [
    "C", "N", "O", "S", "F", "Si", "P", "Cl", "Br", "Mg", "Na", "Ca", "Fe", "As", "Al", "I", "B",
    "V", "K", "Tl", "Yb", "Sb", "Sn", "Ag", "Pd", "Co", "Se", "Ti", "Zn", "H", "Li", "Ge", "Cu",
    "Au", "Ni", "Cd", "In", "Mn", "Zr", "Cr", "Pt", "Hg", "Pb", "Unknown",
];

const DEGREE_SLOTS: usize = 11;
const IMPLICIT_SLOTS: usize = 7;
const HYBRIDIZATION_SLOTS: usize = 5;
const HYDROGEN_SLOTS: usize = 5;

const DEGREE_AT: usize = ELEMENTS.len();
const IMPLICIT_AT: usize = DEGREE_AT + DEGREE_SLOTS;
const CHARGE_AT: usize = IMPLICIT_AT + IMPLICIT_SLOTS;
const RADICAL_AT: usize = CHARGE_AT + 1;
const HYBRIDIZATION_AT: usize = RADICAL_AT + 1;
const AROMATIC_AT: usize = HYBRIDIZATION_AT + HYBRIDIZATION_SLOTS;
const HYDROGEN_AT: usize = AROMATIC_AT + 1;

const _: () = assert!(HYDROGEN_AT + HYDROGEN_SLOTS == ATOM_FDIM);

/// Feature vector of atom `idx`. The molecule must have been perceived.
///
/// # Panics
///
/// Panics if `idx` is not an atom of `mol`.
pub fn atom_features(mol: &Molecule, idx: usize) -> AtomFeatures {
    let atom = mol.atom(idx);
    let mut f = [0.0f32; ATOM_FDIM];

    let symbol = atom.element.symbol();
    let element_slot = ELEMENTS
        .iter()
        .position(|&e| e == symbol)
        .unwrap_or(ELEMENTS.len() - 1);
    f[element_slot] = 1.0;

    one_hot(&mut f[DEGREE_AT..IMPLICIT_AT], mol.degree(idx));
    one_hot(
        &mut f[IMPLICIT_AT..CHARGE_AT],
        atom.implicit_hydrogens as usize,
    );
    f[CHARGE_AT] = atom.charge as f32;
    f[RADICAL_AT] = atom.radical_electrons as f32;

    let hybridization_slot = match atom.hybridization {
        Hybridization::Sp => 0,
        Hybridization::Sp2 => 1,
        Hybridization::Sp3 => 2,
        Hybridization::Sp3d => 3,
        Hybridization::Sp3d2 | Hybridization::S | Hybridization::Unspecified => 4,
    };
    f[HYBRIDIZATION_AT + hybridization_slot] = 1.0;

    if atom.aromatic {
        f[AROMATIC_AT] = 1.0;
    }
    one_hot(
        &mut f[HYDROGEN_AT..ATOM_FDIM],
        atom.total_hydrogens() as usize,
    );

    f
}
