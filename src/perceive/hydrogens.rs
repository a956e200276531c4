use crate::model::atom::Atom;
use crate::model::element::Element;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Removes every plain `[H]` attached by a single bond to one non-hydrogen atom.
///
/// Bracket atoms and aromatic heteroatoms record the removed hydrogen in their
/// explicit count. Any other heavy atom drops it, and valence perception later
/// restores it as an implicit hydrogen.
///
/// Isotopic or charged hydrogens, `[H][H]`, and bridging hydrogens stay in the graph.
pub fn fold_explicit_hydrogens(mol: &mut Molecule) {
    let mut keep = vec![true; mol.atom_count()];
    let mut gained = vec![0u8; mol.atom_count()];

    for (idx, atom) in mol.atoms().iter().enumerate() {
        if atom.element != Element::H || atom.isotope.is_some() || atom.charge != 0 {
            continue;
        }
        if atom.explicit_hydrogens != 0 {
            continue;
        }
        let &[(nbr, bond)] = mol.neighbors(idx) else {
            continue;
        };
        if mol.atom(nbr).element == Element::H || mol.bonds()[bond].order != BondOrder::Single {
            continue;
        }
        keep[idx] = false;
        if keeps_explicit_count(mol.atom(nbr)) {
            gained[nbr] = gained[nbr].saturating_add(1);
        }
    }

    if keep.iter().all(|&k| k) {
        return;
    }

    for (atom, extra) in mol.atoms_mut().iter_mut().zip(&gained) {
        atom.explicit_hydrogens = atom.explicit_hydrogens.saturating_add(*extra);
    }
    mol.retain_atoms(&keep);
}

fn keeps_explicit_count(atom: &Atom) -> bool {
    atom.bracket || (atom.aromatic && atom.element != Element::C)
}
