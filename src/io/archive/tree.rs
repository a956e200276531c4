use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Archive, ArchiveReader, Entry, Scalar, key_path};
use crate::io::error::Error;

/// Archive stored as a directory tree, one file per field.
#[derive(Debug, Clone)]
pub struct DirectoryArchive {
    root: PathBuf,
}

impl DirectoryArchive {
    pub fn open(root: &Path) -> Result<Self, Error> {
        if !root.is_dir() {
            return Err(Error::Io {
                source: std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("archive directory '{}' does not exist", root.display()),
                ),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Archive for DirectoryArchive {
    fn open_reader(&self) -> Result<Box<dyn ArchiveReader + '_>, Error> {
        Ok(Box::new(TreeReader { root: &self.root }))
    }

    fn describe(&self) -> String {
        format!("directory archive at {}", self.root.display())
    }
}

struct TreeReader<'a> {
    root: &'a Path,
}

impl ArchiveReader for TreeReader<'_> {
    fn entry(&mut self, receptor: &str, compound: &str, field: &str) -> Result<Entry, Error> {
        let key = key_path(receptor, compound, field);
        for part in [receptor, compound, field] {
            if part.is_empty() || part == ".." || part.contains(['/', '\\']) {
                return Err(Error::invalid_entry(key, "key component is not a plain name"));
            }
        }

        let path = self.root.join(receptor).join(compound).join(field);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::missing_key(key)),
            Err(e) => return Err(e.into()),
        };

        let values: Vec<Scalar> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match line.parse::<f64>() {
                Ok(n) => Scalar::Number(n),
                Err(_) => Scalar::Text(line.to_string()),
            })
            .collect();

        if values.is_empty() {
            return Err(Error::invalid_entry(key, "field file is empty"));
        }
        Ok(Entry(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_field(root: &Path, receptor: &str, compound: &str, field: &str, body: &str) {
        let dir = root.join(receptor).join(compound);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(field), body).unwrap();
    }

    #[test]
    fn reads_scalars_and_arrays() {
        let dir = tempfile::tempdir().unwrap();
        write_field(dir.path(), "fgfr1", "D1", "smiles", "CCO\n");
        write_field(dir.path(), "fgfr1", "D1", "vina_score", "-7.5\n-6.0\n");

        let archive = DirectoryArchive::open(dir.path()).unwrap();
        let mut reader = archive.open_reader().unwrap();

        let smiles = reader.entry("fgfr1", "D1", "smiles").unwrap();
        assert_eq!(smiles.first(), Some(&Scalar::Text("CCO".into())));

        let vina = reader.entry("fgfr1", "D1", "vina_score").unwrap();
        assert_eq!(vina.len(), 2);
        assert_eq!(vina.first().and_then(Scalar::as_f64), Some(-7.5));
    }

    #[test]
    fn missing_and_malformed_keys() {
        let dir = tempfile::tempdir().unwrap();
        write_field(dir.path(), "r", "c", "empty", "\n\n");
        let archive = DirectoryArchive::open(dir.path()).unwrap();
        let mut reader = archive.open_reader().unwrap();

        assert!(matches!(
            reader.entry("r", "c", "Hy"),
            Err(Error::MissingKey { ref path }) if path == "r/c/Hy"
        ));
        assert!(matches!(
            reader.entry("r", "c", "empty"),
            Err(Error::InvalidEntry { .. })
        ));
        assert!(matches!(
            reader.entry("..", "c", "empty"),
            Err(Error::InvalidEntry { .. })
        ));
    }

    #[test]
    fn open_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectoryArchive::open(&dir.path().join("absent")).is_err());
    }
}
