use crate::io::Error;
use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Derives implicit hydrogens, total valence, and radical electrons for every atom.
///
/// The explicit valence of an atom is the sum of its bond contributions (aromatic
/// bonds count as one) plus its explicit hydrogens. It is matched against the
/// smallest allowed valence of the element that is not below it:
///
/// - Organic-subset atoms fill the gap with implicit hydrogens.
/// - Bracket atoms never gain hydrogens; an unfilled gap becomes radical electrons.
/// - Aromatic atoms first spend one unit of the gap on their pi bond.
///
/// Elements without a valence list keep their explicit valence as is.
pub fn assign_valences(mol: &mut Molecule) -> Result<(), Error> {
    for idx in 0..mol.atom_count() {
        let mut bond_sum: u32 = 0;
        let mut has_aromatic_bond = false;
        for &(_, bond) in mol.neighbors(idx) {
            let order = mol.bonds()[bond].order;
            bond_sum += order.valence_contribution() as u32;
            has_aromatic_bond |= order == BondOrder::Aromatic;
        }

        let atom = &mol.atoms()[idx];
        let base = bond_sum + atom.explicit_hydrogens as u32;

        let Some(allowed) = atom.element.default_valences(atom.charge) else {
            let atom = &mut mol.atoms_mut()[idx];
            atom.implicit_hydrogens = 0;
            atom.radical_electrons = 0;
            atom.total_valence = clamp(base);
            continue;
        };

        let Some(target) = allowed.iter().map(|&v| v as u32).find(|&v| v >= base) else {
            return Err(Error::chemistry(format!(
                "atom {idx} ({}) has valence {base}, above the maximum of {}",
                atom.element,
                allowed.iter().max().copied().unwrap_or(0)
            )));
        };

        let mut slack = target - base;
        let mut pi = 0;
        if atom.aromatic && has_aromatic_bond && slack >= 1 {
            pi = 1;
            slack -= 1;
        }

        let (implicit, radicals) = if atom.bracket { (0, slack) } else { (slack, 0) };

        let atom = &mut mol.atoms_mut()[idx];
        atom.implicit_hydrogens = clamp(implicit);
        atom.radical_electrons = clamp(radicals);
        atom.total_valence = clamp(base + pi + implicit);
    }
    Ok(())
}

fn clamp(value: u32) -> u8 {
    value.min(u8::MAX as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::smiles;

    fn valences(text: &str) -> Molecule {
        let mut mol = smiles::read(text).unwrap();
        assign_valences(&mut mol).unwrap();
        mol
    }

    fn implicit_hs(mol: &Molecule) -> Vec<u8> {
        mol.atoms().iter().map(|a| a.implicit_hydrogens).collect()
    }

    #[test]
    fn organic_subset_fills_lowest_valence() {
        assert_eq!(implicit_hs(&valences("CC(=O)N")), [3, 0, 0, 2]);
        assert_eq!(implicit_hs(&valences("C#N")), [1, 0]);
        assert_eq!(implicit_hs(&valences("CS(=O)(=O)C")), [3, 0, 0, 0, 3]);
        assert_eq!(implicit_hs(&valences("FP(F)(F)(F)F")), [0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn aromatic_atoms_reserve_pi_electron() {
        let mol = valences("c1ccncc1");
        assert_eq!(implicit_hs(&mol), [1, 1, 1, 0, 1, 1]);
        assert!(
            mol.atoms()
                .iter()
                .all(|a| a.total_valence == a.element.default_valences(0).unwrap()[0])
        );

        let pyrrole = valences("c1cc[nH]c1");
        assert_eq!(pyrrole.atom(3).implicit_hydrogens, 0);
        assert_eq!(pyrrole.atom(3).total_hydrogens(), 1);
        assert_eq!(pyrrole.atom(3).total_valence, 3);
    }

    #[test]
    fn bracket_atoms_get_radicals_not_hydrogens() {
        let mol = valences("[CH3]C");
        assert_eq!(mol.atom(0).implicit_hydrogens, 0);
        assert_eq!(mol.atom(0).radical_electrons, 1);
        assert_eq!(mol.atom(1).implicit_hydrogens, 3);

        let mol = valences("[NH4+]");
        assert_eq!(mol.atom(0).radical_electrons, 0);
        assert_eq!(mol.atom(0).total_valence, 4);

        let mol = valences("C[O-]");
        assert_eq!(mol.atom(1).implicit_hydrogens, 0);
        assert_eq!(mol.atom(1).radical_electrons, 0);
    }

    #[test]
    fn elements_without_valence_list_are_left_alone() {
        let mol = valences("[Na+].[Cl-]");
        assert_eq!(mol.atom(0).total_valence, 0);
        assert_eq!(mol.atom(1).total_valence, 0);
        let mol = valences("*C");
        assert_eq!(mol.atom(0).implicit_hydrogens, 0);
        assert_eq!(mol.atom(1).implicit_hydrogens, 3);
    }

    #[test]
    fn hypervalent_carbon_is_rejected() {
        let mut mol = smiles::read("C(C)(C)(C)(C)C").unwrap();
        assert!(matches!(assign_valences(&mut mol), Err(Error::Chemistry(_))));
    }
}
