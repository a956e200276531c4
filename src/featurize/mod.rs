//! Fixed-width numeric encodings of atoms and bonds.
//!
//! The layout matches the DeepChem graph-convolution featurizer so that models
//! trained on either side see the same columns:
//!
//! | Block              | Width | Encoding                                   |
//! |--------------------|-------|--------------------------------------------|
//! | element            | 44    | one-hot, last slot for unlisted elements    |
//! | degree             | 11    | one-hot over 0..=10                         |
//! | implicit valence   | 7     | one-hot over 0..=6                          |
//! | formal charge      | 1     | raw value                                   |
//! | radical electrons  | 1     | raw value                                   |
//! | hybridization      | 5     | one-hot SP, SP2, SP3, SP3D, SP3D2           |
//! | aromatic           | 1     | flag                                        |
//! | total hydrogens    | 5     | one-hot over 0..=4                          |
//!
//! Bonds are encoded as six flags: single, double, triple, aromatic, conjugated,
//! in ring.
//!
//! Values outside a one-hot range land in the block's last slot.

mod atom;
mod bond;

pub use atom::atom_features;
pub use bond::bond_features;

/// Sets the slot of `value` within `block`, or the last slot if `value` is out of
/// range.
fn one_hot(block: &mut [f32], value: usize) {
    let slot = value.min(block.len() - 1);
    block[slot] = 1.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_hot_clamps_to_last_slot() {
        let mut block = [0.0; 4];
        one_hot(&mut block, 1);
        assert_eq!(block, [0.0, 1.0, 0.0, 0.0]);

        let mut block = [0.0; 4];
        one_hot(&mut block, 9);
        assert_eq!(block, [0.0, 0.0, 0.0, 1.0]);
    }
}
