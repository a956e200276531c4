use crate::model::graph::{BOND_FDIM, BondFeatures};
use crate::model::molecule::Bond;
use crate::model::types::BondOrder;

/// Six 0/1 flags: single, double, triple, aromatic, conjugated, in ring.
///
/// A quadruple bond sets none of the order flags.
pub fn bond_features(bond: &Bond) -> BondFeatures {
    let mut f = [0.0f32; BOND_FDIM];
    match bond.order {
        BondOrder::Single => f[0] = 1.0,
        BondOrder::Double => f[1] = 1.0,
        BondOrder::Triple => f[2] = 1.0,
        BondOrder::Aromatic => f[3] = 1.0,
        BondOrder::Quadruple => {}
    }
    if bond.conjugated {
        f[4] = 1.0;
    }
    if bond.in_ring {
        f[5] = 1.0;
    }
    f
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perceive::parse_smiles;

    #[test]
    fn encodes_order_and_flags() {
        let mol = parse_smiles("c1ccccc1C=O").unwrap();
        assert_eq!(
            bond_features(mol.bond_between(0, 1).unwrap()),
            [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]
        );
        assert_eq!(
            bond_features(mol.bond_between(5, 6).unwrap()),
            [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(
            bond_features(mol.bond_between(6, 7).unwrap()),
            [0.0, 1.0, 0.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn quadruple_sets_no_order_flag() {
        let bond = Bond::new(0, 1, BondOrder::Quadruple);
        assert_eq!(bond_features(&bond), [0.0; BOND_FDIM]);
    }
}
