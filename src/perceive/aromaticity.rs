use std::collections::BTreeSet;

use super::rings::smallest_cycle_through;
use crate::io::Error;
use crate::model::element::Element;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

const MIN_RING: usize = 5;
const MAX_RING: usize = 7;

/// Demotes aromatic bonds that are not ring bonds to single bonds and rejects
/// aromatic atoms that have no ring bond at all.
///
/// Requires ring bonds to be marked.
pub fn check_aromatic_placement(mol: &mut Molecule) -> Result<(), Error> {
    for bond in mol.bonds_mut() {
        if bond.order == BondOrder::Aromatic && !bond.in_ring {
            bond.order = BondOrder::Single;
        }
    }

    for (idx, atom) in mol.atoms().iter().enumerate() {
        if !atom.aromatic {
            continue;
        }
        let in_ring = mol
            .neighbors(idx)
            .iter()
            .any(|&(_, bond)| mol.bonds()[bond].in_ring);
        if !in_ring {
            return Err(Error::chemistry(format!(
                "aromatic atom {idx} ({}) is not in a ring",
                atom.element
            )));
        }
    }
    Ok(())
}

/// Marks five- to seven-membered rings written with alternating bonds as aromatic
/// when their pi electron count satisfies the 4n+2 rule.
///
/// Rings touching an atom that was already aromatic on input are left untouched.
/// Fused systems are resolved by repeating the search: a ring atom whose double bond
/// points into a ring accepted in an earlier round contributes one electron.
/// Requires ring bonds and valences.
pub fn perceive_kekule_rings(mol: &mut Molecule) {
    let candidates = candidate_rings(mol);
    if candidates.is_empty() {
        return;
    }

    let written_aromatic: Vec<bool> = mol.atoms().iter().map(|a| a.aromatic).collect();
    let kekule_orders: Vec<BondOrder> = mol.bonds().iter().map(|b| b.order).collect();
    let mut accepted_atom = vec![false; mol.atom_count()];
    let mut accepted_ring = vec![false; candidates.len()];

    loop {
        let mut newly: Vec<usize> = Vec::new();
        for (r, ring) in candidates.iter().enumerate() {
            if accepted_ring[r] || ring.iter().any(|&a| written_aromatic[a]) {
                continue;
            }
            let electrons = ring
                .iter()
                .map(|&a| pi_electrons(mol, a, ring, &kekule_orders, &accepted_atom))
                .try_fold(0u32, |acc, e| e.map(|e| acc + e));
            if electrons.is_some_and(|e| e >= 2 && (e - 2) % 4 == 0) {
                newly.push(r);
            }
        }

        if newly.is_empty() {
            break;
        }
        for r in newly {
            accepted_ring[r] = true;
            for &a in &candidates[r] {
                accepted_atom[a] = true;
            }
        }
    }

    for (ring, _) in candidates
        .iter()
        .zip(&accepted_ring)
        .filter(|(_, accepted)| **accepted)
    {
        for (k, &a) in ring.iter().enumerate() {
            let b = ring[(k + 1) % ring.len()];
            if let Some(bond) = mol.bond_index_between(a, b) {
                mol.bonds_mut()[bond].order = BondOrder::Aromatic;
            }
            mol.atoms_mut()[a].aromatic = true;
        }
    }
}

/// Smallest rings through each ring bond, deduplicated, in ring order.
fn candidate_rings(mol: &Molecule) -> Vec<Vec<usize>> {
    let mut seen = BTreeSet::new();
    let mut rings = Vec::new();

    for (idx, bond) in mol.bonds().iter().enumerate() {
        if !bond.in_ring {
            continue;
        }
        let Some(cycle) = smallest_cycle_through(mol, bond.i, bond.j, idx, MAX_RING) else {
            continue;
        };
        if cycle.len() < MIN_RING {
            continue;
        }
        let mut key = cycle.clone();
        key.sort_unstable();
        if seen.insert(key) {
            rings.push(cycle);
        }
    }
    rings
}

/// Pi electrons atom `a` donates to `ring`, or `None` if it cannot take part in an
/// aromatic ring.
fn pi_electrons(
    mol: &Molecule,
    a: usize,
    ring: &[usize],
    orders: &[BondOrder],
    accepted: &[bool],
) -> Option<u32> {
    let atom = mol.atom(a);

    let mut doubles = mol
        .neighbors(a)
        .iter()
        .filter(|&&(_, bond)| orders[bond].is_multiple());
    if let Some(&(partner, bond)) = doubles.next() {
        if doubles.next().is_some() || orders[bond] != BondOrder::Double {
            return None;
        }
        if ring.contains(&partner) || accepted[partner] {
            return Some(1);
        }
        return matches!(mol.atom(partner).element, Element::O | Element::N | Element::S)
            .then_some(0);
    }

    let degree = mol.degree(a) + atom.total_hydrogens() as usize;
    match (atom.element, atom.charge) {
        (Element::N | Element::P, 0) if degree <= 3 => Some(2),
        (Element::O | Element::S | Element::SE, 0) if degree == 2 => Some(2),
        (Element::C, -1) => Some(2),
        (Element::C, 1) => Some(0),
        _ => None,
    }
}
