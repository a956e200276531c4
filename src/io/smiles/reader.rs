use std::collections::BTreeMap;
use std::str::FromStr;

use crate::io::{Format, error::Error};
use crate::model::{
    atom::Atom,
    element::Element,
    molecule::Molecule,
    types::BondOrder,
};

/// Parses the first whitespace-delimited token of `text` as SMILES.
///
/// Only the syntax is interpreted here: atoms, bonds, branches, and ring closures.
/// Hydrogen counts, aromaticity, and other chemistry are left to
/// [`perceive`](crate::perceive::perceive).
pub fn read(text: &str) -> Result<Molecule, Error> {
    let token = text.split_whitespace().next().unwrap_or("");
    if token.is_empty() {
        return Err(Error::parse(Format::Smiles, 0, "empty SMILES string"));
    }
    Parser::new(token).run()
}

struct RingOpening {
    atom: usize,
    order: Option<BondOrder>,
}

struct Parser<'a> {
    text: &'a [u8],
    pos: usize,
    mol: Molecule,
    prev: Option<usize>,
    pending: Option<BondOrder>,
    branches: Vec<usize>,
    rings: BTreeMap<u16, RingOpening>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text: text.as_bytes(),
            pos: 0,
            mol: Molecule::new(),
            prev: None,
            pending: None,
            branches: Vec::new(),
            rings: BTreeMap::new(),
        }
    }

    fn run(mut self) -> Result<Molecule, Error> {
        while let Some(c) = self.peek() {
            match c {
                b'(' => self.open_branch()?,
                b')' => self.close_branch()?,
                b'-' | b'=' | b'#' | b'$' | b':' | b'/' | b'\\' => self.bond_symbol(c)?,
                b'.' => self.dot()?,
                b'0'..=b'9' | b'%' => self.ring_closure()?,
                b'[' => {
                    let atom = self.bracket_atom()?;
                    self.place_atom(atom)?;
                }
                _ => {
                    let atom = self.organic_atom()?;
                    self.place_atom(atom)?;
                }
            }
        }

        if self.pending.is_some() {
            return Err(self.error("bond symbol at end of string"));
        }
        if !self.branches.is_empty() {
            return Err(self.error("unclosed branch"));
        }
        if let Some(label) = self.rings.keys().next() {
            return Err(self.error(format!("unclosed ring bond {label}")));
        }
        if self.mol.atom_count() == 0 {
            return Err(Error::parse(Format::Smiles, 0, "SMILES contains no atoms"));
        }

        Ok(self.mol)
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }

    fn error(&self, details: impl Into<String>) -> Error {
        Error::parse(Format::Smiles, self.pos, details)
    }

    fn open_branch(&mut self) -> Result<(), Error> {
        let Some(prev) = self.prev else {
            return Err(self.error("branch opened before any atom"));
        };
        if self.pending.is_some() {
            return Err(self.error("bond symbol directly before '('"));
        }
        self.branches.push(prev);
        self.pos += 1;
        Ok(())
    }

    fn close_branch(&mut self) -> Result<(), Error> {
        if self.pending.is_some() {
            return Err(self.error("bond symbol directly before ')'"));
        }
        let Some(anchor) = self.branches.pop() else {
            return Err(self.error("unmatched ')'"));
        };
        self.prev = Some(anchor);
        self.pos += 1;
        Ok(())
    }

    fn bond_symbol(&mut self, c: u8) -> Result<(), Error> {
        if self.prev.is_none() {
            return Err(self.error("bond symbol before any atom"));
        }
        if self.pending.is_some() {
            return Err(self.error("two consecutive bond symbols"));
        }
        self.pending = Some(match c {
            b'=' => BondOrder::Double,
            b'#' => BondOrder::Triple,
            b'$' => BondOrder::Quadruple,
            b':' => BondOrder::Aromatic,
            _ => BondOrder::Single,
        });
        self.pos += 1;
        Ok(())
    }

    fn dot(&mut self) -> Result<(), Error> {
        if self.prev.is_none() || self.pending.is_some() {
            return Err(self.error("misplaced '.'"));
        }
        self.prev = None;
        self.pos += 1;
        if matches!(self.peek(), None | Some(b')')) {
            return Err(self.error("'.' must be followed by an atom"));
        }
        Ok(())
    }

    fn ring_closure(&mut self) -> Result<(), Error> {
        let start = self.pos;
        let Some(prev) = self.prev else {
            return Err(self.error("ring bond before any atom"));
        };

        let label = if self.peek() == Some(b'%') {
            let (Some(d1), Some(d2)) = (self.peek_at(1), self.peek_at(2)) else {
                return Err(self.error("'%' must be followed by two digits"));
            };
            if !d1.is_ascii_digit() || !d2.is_ascii_digit() {
                return Err(self.error("'%' must be followed by two digits"));
            }
            self.pos += 3;
            ((d1 - b'0') * 10 + (d2 - b'0')) as u16
        } else {
            let d = self.peek().unwrap_or(b'0');
            self.pos += 1;
            (d - b'0') as u16
        };

        let order = self.pending.take();
        match self.rings.remove(&label) {
            None => {
                self.rings.insert(label, RingOpening { atom: prev, order });
            }
            Some(opening) => {
                if opening.atom == prev {
                    return Err(Error::parse(
                        Format::Smiles,
                        start,
                        format!("ring bond {label} closes on its own atom"),
                    ));
                }
                let order = match (opening.order, order) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(Error::parse(
                            Format::Smiles,
                            start,
                            format!("conflicting bond orders for ring bond {label}"),
                        ));
                    }
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => self.implicit_order(opening.atom, prev),
                };
                if self.mol.add_bond(opening.atom, prev, order).is_none() {
                    return Err(Error::parse(
                        Format::Smiles,
                        start,
                        format!("ring bond {label} duplicates an existing bond"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn implicit_order(&self, a: usize, b: usize) -> BondOrder {
        if self.mol.atom(a).aromatic && self.mol.atom(b).aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn place_atom(&mut self, atom: Atom) -> Result<(), Error> {
        let idx = self.mol.add_atom(atom);
        if let Some(prev) = self.prev {
            let order = self
                .pending
                .take()
                .unwrap_or_else(|| self.implicit_order(prev, idx));
            if self.mol.add_bond(prev, idx, order).is_none() {
                return Err(self.error("invalid bond between consecutive atoms"));
            }
        }
        self.prev = Some(idx);
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<Atom, Error> {
        let c = self.peek().unwrap_or(b' ');
        let next = self.peek_at(1);

        let (atom, width) = match (c, next) {
            (b'C', Some(b'l')) => (Atom::new(Element::CL), 2),
            (b'B', Some(b'r')) => (Atom::new(Element::BR), 2),
            (b'B', _) => (Atom::new(Element::B), 1),
            (b'C', _) => (Atom::new(Element::C), 1),
            (b'N', _) => (Atom::new(Element::N), 1),
            (b'O', _) => (Atom::new(Element::O), 1),
            (b'P', _) => (Atom::new(Element::P), 1),
            (b'S', _) => (Atom::new(Element::S), 1),
            (b'F', _) => (Atom::new(Element::F), 1),
            (b'I', _) => (Atom::new(Element::I), 1),
            (b'*', _) => (Atom::new(Element::WILDCARD), 1),
            (b'b', _) => (Atom::aromatic(Element::B), 1),
            (b'c', _) => (Atom::aromatic(Element::C), 1),
            (b'n', _) => (Atom::aromatic(Element::N), 1),
            (b'o', _) => (Atom::aromatic(Element::O), 1),
            (b'p', _) => (Atom::aromatic(Element::P), 1),
            (b's', _) => (Atom::aromatic(Element::S), 1),
            _ => {
                let shown = self.text[self.pos..]
                    .iter()
                    .take(1)
                    .map(|b| *b as char)
                    .collect::<String>();
                return Err(self.error(format!("unexpected character '{shown}'")));
            }
        };

        self.pos += width;
        Ok(atom)
    }

    fn bracket_atom(&mut self) -> Result<Atom, Error> {
        self.pos += 1;

        let isotope = self.number();
        let mut atom = self.bracket_symbol()?;
        atom.bracket = true;
        atom.isotope = match isotope {
            Some(n) => Some(
                u16::try_from(n).map_err(|_| self.error("isotope mass out of range"))?,
            ),
            None => None,
        };

        self.skip_chirality();

        if self.peek() == Some(b'H') {
            self.pos += 1;
            let count = self.number().unwrap_or(1);
            atom.explicit_hydrogens =
                u8::try_from(count).map_err(|_| self.error("hydrogen count out of range"))?;
        }

        atom.charge = self.charge()?;

        if self.peek() == Some(b':') {
            self.pos += 1;
            if self.number().is_none() {
                return Err(self.error("atom class must be a number"));
            }
        }

        if self.peek() != Some(b']') {
            return Err(self.error("expected ']' to close bracket atom"));
        }
        self.pos += 1;
        Ok(atom)
    }

    fn bracket_symbol(&mut self) -> Result<Atom, Error> {
        let Some(c) = self.peek() else {
            return Err(self.error("unterminated bracket atom"));
        };

        if c == b'*' {
            self.pos += 1;
            return Ok(Atom::new(Element::WILDCARD));
        }

        if c.is_ascii_lowercase() {
            for symbol in ["se", "as", "te", "b", "c", "n", "o", "p", "s"] {
                if self.text[self.pos..].starts_with(symbol.as_bytes()) {
                    let mut capitalized = symbol.to_string();
                    capitalized[..1].make_ascii_uppercase();
                    let element = Element::from_str(&capitalized)
                        .map_err(|e| self.error(e.to_string()))?;
                    self.pos += symbol.len();
                    return Ok(Atom::aromatic(element));
                }
            }
            return Err(self.error("unknown aromatic symbol in bracket atom"));
        }

        if !c.is_ascii_uppercase() {
            return Err(self.error("expected an element symbol"));
        }

        if let Some(second) = self.peek_at(1).filter(u8::is_ascii_lowercase) {
            let two = [c as char, second as char].iter().collect::<String>();
            if let Ok(element) = Element::from_str(&two) {
                self.pos += 2;
                return Ok(Atom::new(element));
            }
        }

        let one = (c as char).to_string();
        let element = Element::from_str(&one).map_err(|e| self.error(e.to_string()))?;
        self.pos += 1;
        Ok(Atom::new(element))
    }

    fn skip_chirality(&mut self) {
        if self.peek() != Some(b'@') {
            return;
        }
        self.pos += 1;
        if self.peek() == Some(b'@') {
            self.pos += 1;
            return;
        }
        let tag = &self.text[self.pos..];
        if ["TH", "AL", "SP", "TB", "OH"]
            .iter()
            .any(|t| tag.starts_with(t.as_bytes()))
        {
            self.pos += 2;
            self.number();
        }
    }

    fn charge(&mut self) -> Result<i8, Error> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        let symbol = self.text[self.pos];
        self.pos += 1;

        let magnitude = if let Some(n) = self.number() {
            n
        } else {
            let mut repeats: u32 = 1;
            while self.peek() == Some(symbol) {
                repeats = repeats.saturating_add(1);
                self.pos += 1;
            }
            repeats
        };

        i8::try_from(magnitude)
            .ok()
            .and_then(|m| m.checked_mul(sign))
            .ok_or_else(|| self.error("formal charge out of range"))
    }

    fn number(&mut self) -> Option<u32> {
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(d) = self.peek().filter(u8::is_ascii_digit) {
            value = value.saturating_mul(10).saturating_add((d - b'0') as u32);
            self.pos += 1;
        }
        (self.pos > start).then_some(value)
    }
}
