//! Chemical perception of freshly parsed molecules.
//!
//! A [`Molecule`] straight out of the SMILES reader only knows what was written
//! down. [`perceive`] fills in the properties the featurizer needs by running a
//! fixed sequence of stages:
//!
//! 1. Fold plain `[H]` atoms into their heavy neighbor's hydrogen count.
//! 2. Mark ring bonds (every bond that is not a bridge).
//! 3. Demote aromatic bonds outside rings and reject aromatic atoms outside rings.
//! 4. Derive implicit hydrogens, total valence, and radical electrons.
//! 5. Recognize aromatic rings written in Kekulé form.
//! 6. Mark conjugated bonds.
//! 7. Assign hybridization states.
//!
//! Later stages depend on the output of earlier ones, so the order is fixed.

use crate::io::{Error, smiles};
use crate::model::molecule::Molecule;

mod aromaticity;
mod conjugation;
mod hybridization;
mod hydrogens;
mod rings;
mod valence;

/// Runs all perception stages on `mol` in place.
///
/// # Errors
///
/// Returns [`Error::Chemistry`] if an atom exceeds its maximum allowed valence or
/// an aromatic atom is not part of any ring.
pub fn perceive(mol: &mut Molecule) -> Result<(), Error> {
    hydrogens::fold_explicit_hydrogens(mol);
    rings::mark_ring_bonds(mol);
    aromaticity::check_aromatic_placement(mol)?;
    valence::assign_valences(mol)?;
    aromaticity::perceive_kekule_rings(mol);
    conjugation::mark_conjugated_bonds(mol);
    hybridization::assign_hybridization(mol);
    Ok(())
}

/// Parses a SMILES string and runs [`perceive`] on the result.
pub fn parse_smiles(text: &str) -> Result<Molecule, Error> {
    let mut mol = smiles::read(text)?;
    perceive(&mut mol)?;
    Ok(mol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{BondOrder, Hybridization};

    fn assert_benzene(mol: &Molecule) {
        assert_eq!(mol.atom_count(), 6);
        for atom in mol.atoms() {
            assert!(atom.aromatic);
            assert_eq!(atom.hybridization, Hybridization::Sp2);
            assert_eq!(atom.total_hydrogens(), 1);
            assert_eq!(atom.total_valence, 4);
        }
        for bond in mol.bonds() {
            assert_eq!(bond.order, BondOrder::Aromatic);
            assert!(bond.conjugated);
            assert!(bond.in_ring);
        }
    }

    #[test]
    fn aromatic_and_kekule_benzene_agree() {
        assert_benzene(&parse_smiles("c1ccccc1").unwrap());
        assert_benzene(&parse_smiles("C1=CC=CC=C1").unwrap());
    }

    #[test]
    fn ethane_is_saturated() {
        let mol = parse_smiles("CC").unwrap();
        for atom in mol.atoms() {
            assert_eq!(atom.implicit_hydrogens, 3);
            assert_eq!(atom.hybridization, Hybridization::Sp3);
        }
        assert!(!mol.bonds()[0].conjugated);
        assert!(!mol.bonds()[0].in_ring);
    }

    #[test]
    fn acetic_acid_carboxyl_is_conjugated() {
        let mol = parse_smiles("CC(=O)O").unwrap();
        assert!(!mol.bond_between(0, 1).unwrap().conjugated);
        assert!(mol.bond_between(1, 2).unwrap().conjugated);
        assert!(mol.bond_between(1, 3).unwrap().conjugated);
        assert_eq!(mol.atom(1).hybridization, Hybridization::Sp2);
        assert_eq!(mol.atom(2).hybridization, Hybridization::Sp2);
        assert_eq!(mol.atom(3).total_hydrogens(), 1);
    }

    #[test]
    fn explicit_hydrogens_are_folded() {
        let mol = parse_smiles("[H]C([H])([H])[H]").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.atom(0).total_hydrogens(), 4);
    }

    #[test]
    fn chemistry_errors_are_reported() {
        assert!(matches!(
            parse_smiles("C(C)(C)(C)(C)C"),
            Err(Error::Chemistry(_))
        ));
        assert!(matches!(parse_smiles("cc"), Err(Error::Chemistry(_))));
    }
}
