use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Marks conjugated bonds.
///
/// Aromatic bonds are always conjugated. Otherwise a multiple bond on an atom with
/// at most three connections (hydrogens included) is conjugated with every other
/// bond of that atom whose far end either carries a multiple bond itself or has a
/// lone pair and at most three connections. Both bonds of such a pair are marked.
/// Requires valences and final bond orders.
pub fn mark_conjugated_bonds(mol: &mut Molecule) {
    let n = mol.atom_count();
    let mut conjugated = vec![false; mol.bond_count()];

    let has_multiple: Vec<bool> = (0..n)
        .map(|a| {
            mol.neighbors(a)
                .iter()
                .any(|&(_, b)| mol.bonds()[b].order.is_multiple())
        })
        .collect();
    let connections: Vec<usize> = (0..n)
        .map(|a| mol.degree(a) + mol.atom(a).total_hydrogens() as usize)
        .collect();

    for (idx, bond) in mol.bonds().iter().enumerate() {
        if bond.order == BondOrder::Aromatic {
            conjugated[idx] = true;
        }
    }

    for center in 0..n {
        if connections[center] > 3 {
            continue;
        }
        let nbrs = mol.neighbors(center);
        for &(_, b1) in nbrs {
            if !mol.bonds()[b1].order.is_multiple() {
                continue;
            }
            for &(far, b2) in nbrs {
                if b2 == b1 {
                    continue;
                }
                let donor = has_lone_pair(mol.atom(far)) && connections[far] <= 3;
                if has_multiple[far] || donor {
                    conjugated[b1] = true;
                    conjugated[b2] = true;
                }
            }
        }
    }

    for (bond, flag) in mol.bonds_mut().iter_mut().zip(conjugated) {
        bond.conjugated = flag;
    }
}

fn has_lone_pair(atom: &Atom) -> bool {
    let Some(outer) = atom.element.outer_electrons() else {
        return false;
    };
    let used = atom.total_valence as i32 + atom.charge as i32 + atom.radical_electrons as i32;
    outer as i32 - used >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::smiles;
    use crate::perceive::{aromaticity, rings, valence};

    fn conjugation(text: &str) -> Molecule {
        let mut mol = smiles::read(text).unwrap();
        rings::mark_ring_bonds(&mut mol);
        aromaticity::check_aromatic_placement(&mut mol).unwrap();
        valence::assign_valences(&mut mol).unwrap();
        aromaticity::perceive_kekule_rings(&mut mol);
        mark_conjugated_bonds(&mut mol);
        mol
    }

    fn flags(mol: &Molecule) -> Vec<bool> {
        mol.bonds().iter().map(|b| b.conjugated).collect()
    }

    #[test]
    fn dienes_conjugate_isolated_alkenes_do_not() {
        assert_eq!(flags(&conjugation("C=CC=C")), [true, true, true]);
        assert_eq!(flags(&conjugation("C=CCC=C")), [false, false, false, false]);
    }

    #[test]
    fn lone_pairs_conjugate_with_multiple_bonds() {
        // amide: C-C(=O)-N
        assert_eq!(flags(&conjugation("CC(=O)N")), [false, true, true]);
        // enol ether
        assert_eq!(flags(&conjugation("C=COC")), [true, true, false]);
    }

    #[test]
    fn substituents_on_aromatic_rings() {
        let mol = conjugation("c1ccccc1O");
        assert!(mol.bond_between(5, 6).unwrap().conjugated);
        let mol = conjugation("c1ccccc1C");
        assert!(!mol.bond_between(5, 6).unwrap().conjugated);
    }
}
