use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Error;

/// Final state of a training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub experiment: String,
    pub targets: Vec<String>,
    pub global_step: u64,
    pub model: serde_json::Value,
}

impl Checkpoint {
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| Error::output("checkpoint directory", parent, e))?;
        }
        let file = File::create(path).map_err(|e| Error::output("checkpoint", path, e))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer(&mut out, self).map_err(|source| Error::Serialize {
            what: "checkpoint",
            source,
        })?;
        out.flush().map_err(|e| Error::output("checkpoint", path, e))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| Error::Checkpoint(format!("{}: {e}", path.display())))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| Error::Checkpoint(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoints").join("debug_1");
        let checkpoint = Checkpoint {
            experiment: "debug_1".into(),
            targets: vec!["Hy".into()],
            global_step: 12,
            model: serde_json::json!({"bias": [0.5]}),
        };
        checkpoint.save(&path).unwrap();
        assert_eq!(Checkpoint::load(&path).unwrap(), checkpoint);
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Checkpoint::load(&path), Err(Error::Checkpoint(_))));
    }
}
