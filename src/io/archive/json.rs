use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{Archive, ArchiveReader, Entry, Scalar, key_path};
use crate::io::error::Error;

/// Archive held as one parsed JSON document of nested objects.
///
/// The document is parsed once at open time; readers only borrow it.
#[derive(Debug, Clone)]
pub struct JsonArchive {
    source: Option<PathBuf>,
    document: Value,
}

impl JsonArchive {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        let document: Value = serde_json::from_reader(BufReader::new(file))?;
        Self::check_root(&document)?;
        Ok(Self {
            source: Some(path.to_path_buf()),
            document,
        })
    }

    pub fn from_value(document: Value) -> Result<Self, Error> {
        Self::check_root(&document)?;
        Ok(Self {
            source: None,
            document,
        })
    }

    fn check_root(document: &Value) -> Result<(), Error> {
        if document.is_object() {
            Ok(())
        } else {
            Err(Error::invalid_entry("/", "archive root must be a JSON object"))
        }
    }
}

impl Archive for JsonArchive {
    fn open_reader(&self) -> Result<Box<dyn ArchiveReader + '_>, Error> {
        Ok(Box::new(DocumentReader {
            document: &self.document,
        }))
    }

    fn describe(&self) -> String {
        match &self.source {
            Some(path) => format!("JSON archive at {}", path.display()),
            None => "JSON archive (in memory)".to_string(),
        }
    }
}

struct DocumentReader<'a> {
    document: &'a Value,
}

impl ArchiveReader for DocumentReader<'_> {
    fn entry(&mut self, receptor: &str, compound: &str, field: &str) -> Result<Entry, Error> {
        let key = key_path(receptor, compound, field);
        let leaf = self
            .document
            .get(receptor)
            .and_then(|r| r.get(compound))
            .and_then(|c| c.get(field))
            .ok_or_else(|| Error::missing_key(key.clone()))?;

        let values = match leaf {
            Value::Array(items) => items
                .iter()
                .map(|item| to_scalar(item, &key))
                .collect::<Result<Vec<_>, _>>()?,
            other => vec![to_scalar(other, &key)?],
        };

        if values.is_empty() {
            return Err(Error::invalid_entry(key, "array is empty"));
        }
        Ok(Entry(values))
    }
}

fn to_scalar(value: &Value, key: &str) -> Result<Scalar, Error> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .map(Scalar::Number)
            .ok_or_else(|| Error::invalid_entry(key, "number is not representable as f64")),
        Value::String(s) => Ok(Scalar::Text(s.clone())),
        Value::Bool(b) => Ok(Scalar::Number(if *b { 1.0 } else { 0.0 })),
        Value::Null => Err(Error::invalid_entry(key, "value is null")),
        Value::Array(_) | Value::Object(_) => {
            Err(Error::invalid_entry(key, "expected a scalar or a flat array"))
        }
    }
}
