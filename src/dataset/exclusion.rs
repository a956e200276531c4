use std::collections::HashSet;
use std::path::Path;

use super::error::Error;
use crate::io::table;

/// Compound identifiers that must never appear in a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    ids: HashSet<String>,
}

impl ExclusionSet {
    /// Reads `column` of the delimited file at `path`.
    pub fn load(path: &Path, column: &str) -> Result<Self, Error> {
        let table = table::read_path(path, &[column]).map_err(|e| Error::source_load(path, e))?;
        let ids = table
            .rows()
            .map(|cells| cells[0].trim().to_string())
            .collect();
        Ok(Self { ids })
    }

    /// Loads the set when a path is configured and returns an empty set otherwise.
    pub fn load_optional(path: Option<&Path>, column: &str) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load(path, column),
            None => Ok(Self::default()),
        }
    }

    #[inline]
    pub fn contains(&self, compound: &str) -> bool {
        self.ids.contains(compound)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_identifier_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.csv");
        fs::write(&path, "drugID,reason\nD2,bad valence\n D3 ,timeout\n").unwrap();

        let set = ExclusionSet::load(&path, "drugID").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("D2"));
        assert!(set.contains("D3"));
        assert!(!set.contains("D1"));
    }

    #[test]
    fn missing_column_is_a_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.csv");
        fs::write(&path, "id\nD2\n").unwrap();

        let err = ExclusionSet::load(&path, "drugID").unwrap_err();
        assert!(matches!(err, Error::SourceLoad { .. }));
        assert!(ExclusionSet::load_optional(None, "drugID").unwrap().is_empty());
    }
}
