use crate::model::atom::Atom;
use crate::model::molecule::Molecule;
use crate::model::types::Hybridization;

/// Assigns a hybridization state to every atom from the number of sigma bonds plus
/// lone pairs around it.
///
/// An atom that would be SP3 but has at most three connections and sits on a
/// conjugated bond is reported as SP2. The wildcard atom stays unspecified.
/// Requires valences and conjugation.
pub fn assign_hybridization(mol: &mut Molecule) {
    for idx in 0..mol.atom_count() {
        let atom = mol.atom(idx);
        let connections = mol.degree(idx) + atom.total_hydrogens() as usize;
        let on_conjugated = mol
            .neighbors(idx)
            .iter()
            .any(|&(_, b)| mol.bonds()[b].conjugated);

        let state = if atom.element.is_wildcard() {
            Hybridization::Unspecified
        } else {
            match electron_domains(atom, connections) {
                0 | 1 => Hybridization::S,
                2 => Hybridization::Sp,
                3 => Hybridization::Sp2,
                4 if on_conjugated && connections < 4 => Hybridization::Sp2,
                4 => Hybridization::Sp3,
                5 => Hybridization::Sp3d,
                6 => Hybridization::Sp3d2,
                _ => Hybridization::Unspecified,
            }
        };
        mol.atoms_mut()[idx].hybridization = state;
    }
}

/// Sigma bonds plus lone pairs (radical electrons counted singly).
fn electron_domains(atom: &Atom, connections: usize) -> usize {
    let z = atom.element.atomic_number();
    let outer = match atom.element.outer_electrons() {
        Some(outer) if z > 1 => outer as i32,
        _ => return connections,
    };

    let valence = atom.total_valence as i32;
    let charge = atom.charge as i32;
    let radicals = atom.radical_electrons as i32;
    let free = outer - (valence + charge);

    let domains = if valence + outer - charge < 8 {
        connections as i32 + (free - radicals) / 2 + radicals
    } else {
        connections as i32 + free / 2
    };
    domains.max(0) as usize
}
