use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    /// Bond order as used for valence bookkeeping.
    ///
    /// Aromatic bonds count as 1; the extra π contribution of an aromatic atom is
    /// resolved during valence perception.
    pub fn valence_contribution(&self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }

    #[inline]
    pub fn is_multiple(&self) -> bool {
        !matches!(self, BondOrder::Single)
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Quadruple => write!(f, "Quadruple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
        }
    }
}

/// Orbital hybridization of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hybridization {
    #[default]
    Unspecified,
    S,
    Sp,
    Sp2,
    Sp3,
    Sp3d,
    Sp3d2,
}

impl fmt::Display for Hybridization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hybridization::Unspecified => "unspecified",
            Hybridization::S => "S",
            Hybridization::Sp => "SP",
            Hybridization::Sp2 => "SP2",
            Hybridization::Sp3 => "SP3",
            Hybridization::Sp3d => "SP3D",
            Hybridization::Sp3d2 => "SP3D2",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valence_contribution_counts_aromatic_as_single() {
        assert_eq!(BondOrder::Single.valence_contribution(), 1);
        assert_eq!(BondOrder::Aromatic.valence_contribution(), 1);
        assert_eq!(BondOrder::Triple.valence_contribution(), 3);
        assert!(BondOrder::Aromatic.is_multiple());
        assert!(!BondOrder::Single.is_multiple());
    }

    #[test]
    fn hybridization_display() {
        assert_eq!(Hybridization::Sp3d2.to_string(), "SP3D2");
        assert_eq!(Hybridization::default(), Hybridization::Unspecified);
    }
}
