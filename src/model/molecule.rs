use super::atom::Atom;
use super::types::BondOrder;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub order: BondOrder,
    pub conjugated: bool,
    pub in_ring: bool,
}

impl Bond {
    pub fn new(idx1: usize, idx2: usize, order: BondOrder) -> Self {
        let (i, j) = if idx1 <= idx2 { (idx1, idx2) } else { (idx2, idx1) };
        Self {
            i,
            j,
            order,
            conjugated: false,
            in_ring: false,
        }
    }

    /// The endpoint opposite to `idx`.
    #[inline]
    pub fn other(&self, idx: usize) -> usize {
        if self.i == idx { self.j } else { self.i }
    }
}

/// Atom/bond topology of a single molecule.
///
/// Atom indices follow SMILES parse order. Every bond is reachable from both of its
/// endpoints through the neighbor lists.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    neighbors: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.atoms.push(atom);
        self.neighbors.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a bond and returns its index, or `None` if the bond would be a self-loop,
    /// reference a missing atom, or duplicate an existing bond.
    pub fn add_bond(&mut self, i: usize, j: usize, order: BondOrder) -> Option<usize> {
        if i == j || i >= self.atoms.len() || j >= self.atoms.len() {
            return None;
        }
        if self.bond_index_between(i, j).is_some() {
            return None;
        }
        let idx = self.bonds.len();
        self.bonds.push(Bond::new(i, j, order));
        self.neighbors[i].push((j, idx));
        self.neighbors[j].push((i, idx));
        Some(idx)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn atom(&self, idx: usize) -> &Atom {
        &self.atoms[idx]
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn atoms_mut(&mut self) -> &mut [Atom] {
        &mut self.atoms
    }

    #[inline]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    #[inline]
    pub fn bonds_mut(&mut self) -> &mut [Bond] {
        &mut self.bonds
    }

    /// `(neighbor, bond index)` pairs of atom `idx`, in bond creation order.
    #[inline]
    pub fn neighbors(&self, idx: usize) -> &[(usize, usize)] {
        &self.neighbors[idx]
    }

    /// Number of explicit (graph) neighbors.
    #[inline]
    pub fn degree(&self, idx: usize) -> usize {
        self.neighbors[idx].len()
    }

    pub fn bond_index_between(&self, i: usize, j: usize) -> Option<usize> {
        self.neighbors
            .get(i)?
            .iter()
            .find(|(nbr, _)| *nbr == j)
            .map(|(_, bond)| *bond)
    }

    pub fn bond_between(&self, i: usize, j: usize) -> Option<&Bond> {
        self.bond_index_between(i, j).map(|b| &self.bonds[b])
    }

    /// Drops every atom whose `keep` flag is false, together with its bonds, and
    /// renumbers the remaining atoms in their original relative order.
    pub fn retain_atoms(&mut self, keep: &[bool]) {
        debug_assert_eq!(keep.len(), self.atoms.len());

        let mut remap = vec![usize::MAX; self.atoms.len()];
        let mut next = 0;
        for (old, &k) in keep.iter().enumerate() {
            if k {
                remap[old] = next;
                next += 1;
            }
        }

        let atoms: Vec<Atom> = self
            .atoms
            .drain(..)
            .zip(keep)
            .filter_map(|(atom, &k)| k.then_some(atom))
            .collect();
        let bonds: Vec<Bond> = self.bonds.drain(..).collect();

        self.atoms = Vec::with_capacity(atoms.len());
        self.neighbors.clear();
        for atom in atoms {
            self.add_atom(atom);
        }
        for bond in bonds {
            let (i, j) = (remap[bond.i], remap[bond.j]);
            if i == usize::MAX || j == usize::MAX {
                continue;
            }
            if let Some(idx) = self.add_bond(i, j, bond.order) {
                self.bonds[idx].conjugated = bond.conjugated;
                self.bonds[idx].in_ring = bond.in_ring;
            }
        }
    }
}
