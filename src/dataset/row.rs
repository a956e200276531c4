use std::collections::BTreeMap;

use serde::Serialize;

use super::error::Error;
use crate::io::{self, archive::ArchiveReader};

/// One indexed record.
///
/// Tabular rows carry their SMILES and target cells; archive rows only name the
/// `(receptor, compound)` pair and resolve fields at retrieval time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub receptor: String,
    pub compound: String,
    pub cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new(receptor: impl Into<String>, compound: impl Into<String>) -> Self {
        Self {
            receptor: receptor.into(),
            compound: compound.into(),
            cells: BTreeMap::new(),
        }
    }
}

/// Resolves the fields a sample is built from.
pub trait Fields {
    fn smiles(&mut self, row: &Row) -> Result<String, Error>;
    fn target(&mut self, row: &Row, name: &str) -> Result<f64, Error>;
}

/// Fields stored directly in [`Row::cells`].
pub struct CellFields<'a> {
    pub smiles_column: &'a str,
}

impl Fields for CellFields<'_> {
    fn smiles(&mut self, row: &Row) -> Result<String, Error> {
        row.cells
            .get(self.smiles_column)
            .cloned()
            .ok_or_else(|| Error::missing_field(&row.compound, self.smiles_column))
    }

    fn target(&mut self, row: &Row, name: &str) -> Result<f64, Error> {
        let value = row
            .cells
            .get(name)
            .ok_or_else(|| Error::missing_field(&row.compound, name))?;
        parse_number(row, name, value)
    }
}

/// Fields looked up in an archive under `receptor/compound/field`, taking the first
/// element of each entry.
pub struct ArchiveFields<'a> {
    pub reader: Box<dyn ArchiveReader + 'a>,
    pub smiles_field: &'a str,
}

impl ArchiveFields<'_> {
    fn first(&mut self, row: &Row, field: &str) -> Result<io::archive::Scalar, Error> {
        let entry = self
            .reader
            .entry(&row.receptor, &row.compound, field)
            .map_err(|e| match e {
                io::Error::MissingKey { .. } => Error::missing_field(&row.compound, field),
                other => Error::Archive {
                    compound: row.compound.clone(),
                    source: other,
                },
            })?;
        entry.0.into_iter().next().ok_or_else(|| Error::Archive {
            compound: row.compound.clone(),
            source: io::Error::invalid_entry(
                io::archive::key_path(&row.receptor, &row.compound, field),
                "entry is empty",
            ),
        })
    }
}

impl Fields for ArchiveFields<'_> {
    fn smiles(&mut self, row: &Row) -> Result<String, Error> {
        let field = self.smiles_field;
        Ok(self.first(row, field)?.to_string())
    }

    fn target(&mut self, row: &Row, name: &str) -> Result<f64, Error> {
        let value = self.first(row, name)?;
        value.as_f64().ok_or_else(|| Error::InvalidField {
            compound: row.compound.clone(),
            field: name.to_string(),
            value: value.to_string(),
        })
    }
}

fn parse_number(row: &Row, field: &str, value: &str) -> Result<f64, Error> {
    value.trim().parse().map_err(|_| Error::InvalidField {
        compound: row.compound.clone(),
        field: field.to_string(),
        value: value.to_string(),
    })
}
