use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

const SYMBOLS: [&str; 119] = [
    "*", "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd",
    "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg",
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm",
    "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn",
    "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// A chemical element identified by its atomic number.
///
/// Atomic number 0 is the SMILES wildcard atom `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(u8);

impl Element {
    pub const WILDCARD: Element = Element(0);
    pub const H: Element = Element(1);
    pub const B: Element = Element(5);
    pub const C: Element = Element(6);
    pub const N: Element = Element(7);
    pub const O: Element = Element(8);
    pub const F: Element = Element(9);
    pub const NA: Element = Element(11);
    pub const P: Element = Element(15);
    pub const S: Element = Element(16);
    pub const CL: Element = Element(17);
    pub const SE: Element = Element(34);
    pub const BR: Element = Element(35);
    pub const I: Element = Element(53);

    pub fn from_atomic_number(z: u8) -> Option<Self> {
        ((z as usize) < SYMBOLS.len()).then_some(Element(z))
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn symbol(&self) -> &'static str {
        SYMBOLS[self.0 as usize]
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.0 == 0
    }

    /// Allowed valences used to derive implicit hydrogens, or `None` if the element
    /// carries no implicit hydrogens.
    ///
    /// A formal charge shifts the lookup to the isoelectronic element, so `[NH4+]`
    /// resolves like carbon and `[O-]` like fluorine.
    pub fn default_valences(&self, charge: i8) -> Option<&'static [u8]> {
        let effective = self.0 as i16 - charge as i16;
        match effective {
            5 => Some(&[3]),
            6 => Some(&[4]),
            7 => Some(&[3, 5]),
            8 => Some(&[2]),
            9 => Some(&[1]),
            15 => Some(&[3, 5]),
            16 => Some(&[2, 4, 6]),
            17 | 35 | 53 => Some(&[1]),
            _ => None,
        }
    }

    /// Number of valence-shell electrons for main-group elements.
    ///
    /// Returns `None` for d- and f-block elements.
    pub fn outer_electrons(&self) -> Option<u8> {
        let z = self.0;
        match z {
            0 => None,
            1 => Some(1),
            2 => Some(2),
            3..=10 => Some(z - 2),
            11..=18 => Some(z - 10),
            19 | 37 | 55 | 87 => Some(1),
            20 | 38 | 56 | 88 => Some(2),
            31..=36 => Some(z - 28),
            49..=54 => Some(z - 46),
            81..=86 => Some(z - 78),
            _ => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SYMBOLS
            .iter()
            .position(|sym| *sym == s)
            .map(|z| Element(z as u8))
            .ok_or_else(|| ParseElementError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_from_str_valid() {
        assert_eq!(Element::from_str("H").unwrap(), Element::H);
        assert_eq!(Element::from_str("Cl").unwrap(), Element::CL);
        assert_eq!(Element::from_str("Og").unwrap().atomic_number(), 118);
        assert_eq!(Element::from_str("*").unwrap(), Element::WILDCARD);
    }

    #[test]
    fn element_from_str_invalid_case() {
        let err = Element::from_str("cl").unwrap_err();
        assert_eq!(err.to_string(), "invalid or unsupported element symbol: 'cl'");
    }

    #[test]
    fn element_symbol_display_and_atomic_number() {
        assert_eq!(Element::NA.symbol(), "Na");
        assert_eq!(Element::NA.to_string(), "Na");
        assert_eq!(Element::NA.atomic_number(), 11);
        assert_eq!(Element::from_atomic_number(119), None);
    }

    #[test]
    fn default_valences_follow_isoelectronic_element() {
        assert_eq!(Element::C.default_valences(0), Some(&[4u8][..]));
        assert_eq!(Element::N.default_valences(1), Some(&[4u8][..]));
        assert_eq!(Element::O.default_valences(-1), Some(&[1u8][..]));
        assert_eq!(Element::S.default_valences(0), Some(&[2u8, 4, 6][..]));
        assert_eq!(Element::NA.default_valences(0), None);
    }

    #[test]
    fn outer_electrons_main_group_only() {
        assert_eq!(Element::C.outer_electrons(), Some(4));
        assert_eq!(Element::CL.outer_electrons(), Some(7));
        assert_eq!(Element::SE.outer_electrons(), Some(6));
        assert_eq!(Element::I.outer_electrons(), Some(7));
        assert_eq!(Element::from_str("Fe").unwrap().outer_electrons(), None);
    }
}
