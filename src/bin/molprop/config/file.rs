use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use molprop::dataset::{DataSource, DatasetConfig};
use molprop::train::TrainConfig;

/// Contents of a `--config` file. Every table is optional.
///
/// ```toml
/// [source]
/// kind = "table"
/// path = "data/dataset.csv"
///
/// [dataset]
/// targets = ["Hy", "MLOGP"]
///
/// [train]
/// batch_size = 32
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub source: Option<DataSource>,
    pub dataset: DatasetConfig,
    pub train: TrainConfig,
}

impl ConfigFile {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }
}
