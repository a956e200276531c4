use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::error::Error;

/// One recorded scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarEvent {
    pub tag: String,
    pub step: u64,
    pub value: f64,
    /// Seconds since the Unix epoch.
    pub wall_time: f64,
}

/// Records tagged scalars, streaming each one to `scalars.jsonl` in the log
/// directory and keeping them in memory for a final export.
pub struct ScalarWriter {
    path: PathBuf,
    stream: BufWriter<File>,
    events: Vec<ScalarEvent>,
}

impl ScalarWriter {
    pub const FILE_NAME: &'static str = "scalars.jsonl";

    /// Creates `dir` if needed and starts a fresh event stream inside it.
    pub fn create(dir: &Path) -> Result<Self, Error> {
        fs::create_dir_all(dir).map_err(|e| Error::output("log directory", dir, e))?;
        let path = dir.join(Self::FILE_NAME);
        let file = File::create(&path).map_err(|e| Error::output("scalar log", &path, e))?;
        Ok(Self {
            path,
            stream: BufWriter::new(file),
            events: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn events(&self) -> &[ScalarEvent] {
        &self.events
    }

    pub fn add_scalar(&mut self, tag: &str, value: f64, step: u64) -> Result<(), Error> {
        let event = ScalarEvent {
            tag: tag.to_string(),
            step,
            value,
            wall_time: wall_time(),
        };
        serde_json::to_writer(&mut self.stream, &event).map_err(|source| Error::Serialize {
            what: "scalar event",
            source,
        })?;
        self.stream
            .write_all(b"\n")
            .map_err(|e| Error::output("scalar log", &self.path, e))?;
        self.events.push(event);
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.stream
            .flush()
            .map_err(|e| Error::output("scalar log", &self.path, e))
    }

    /// Scalars grouped by tag as `[wall_time, step, value]` triples.
    pub fn grouped(&self) -> BTreeMap<&str, Vec<(f64, u64, f64)>> {
        let mut out: BTreeMap<&str, Vec<_>> = BTreeMap::new();
        for e in &self.events {
            out.entry(e.tag.as_str())
                .or_default()
                .push((e.wall_time, e.step, e.value));
        }
        out
    }

    /// Writes every scalar recorded so far to `path` as one JSON object keyed by tag.
    pub fn export_json(&mut self, path: &Path) -> Result<(), Error> {
        self.flush()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::output("results directory", parent, e))?;
        }
        let file = File::create(path).map_err(|e| Error::output("scalar export", path, e))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, &self.grouped()).map_err(|source| {
            Error::Serialize {
                what: "scalar export",
                source,
            }
        })?;
        out.flush()
            .map_err(|e| Error::output("scalar export", path, e))
    }
}

pub(crate) fn wall_time() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
