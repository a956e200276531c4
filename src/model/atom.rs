use super::element::Element;
use super::types::Hybridization;

/// An atom of a parsed molecule.
///
/// The first block of fields is taken from the SMILES text; the second is filled in
/// by [`perceive`](crate::perceive::perceive).
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub aromatic: bool,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Hydrogens stated in a bracket atom, or folded in from `[H]` neighbors of bracket
    /// atoms and aromatic heteroatoms.
    pub explicit_hydrogens: u8,
    /// Bracket atoms never receive implicit hydrogens.
    pub bracket: bool,

    pub implicit_hydrogens: u8,
    pub total_valence: u8,
    pub radical_electrons: u8,
    pub hybridization: Hybridization,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            aromatic: false,
            charge: 0,
            isotope: None,
            explicit_hydrogens: 0,
            bracket: false,
            implicit_hydrogens: 0,
            total_valence: 0,
            radical_electrons: 0,
            hybridization: Hybridization::Unspecified,
        }
    }

    pub fn aromatic(element: Element) -> Self {
        Self {
            aromatic: true,
            ..Self::new(element)
        }
    }

    #[inline]
    pub fn total_hydrogens(&self) -> u8 {
        self.explicit_hydrogens + self.implicit_hydrogens
    }
}
