use std::path::PathBuf;

use serde::Deserialize;

use crate::graph::GraphConfig;

/// Options shared by every dataset variant.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Target names, in the order they appear in each sample's target vector.
    pub targets: Vec<String>,
    pub columns: ColumnNames,
    /// Delimited file listing compounds to leave out.
    pub exclude: Option<PathBuf>,
    /// Column of the exclusion file holding compound identifiers.
    pub exclude_column: String,
    /// Archive field holding the SMILES string.
    pub smiles_field: String,
    /// Which listing files an archive dataset reads.
    pub listing: ListingSelection,
    /// Seed of the one-time row shuffle; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub graph: GraphConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            columns: ColumnNames::default(),
            exclude: None,
            exclude_column: default_compound_column(),
            smiles_field: default_smiles_column(),
            listing: ListingSelection::default(),
            seed: None,
            graph: GraphConfig::default(),
        }
    }
}

/// Column names of delimited sources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub receptor: String,
    pub compound: String,
    pub smiles: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            receptor: default_receptor_column(),
            compound: default_compound_column(),
            smiles: default_smiles_column(),
        }
    }
}

/// Selection of listing files inside an archive dataset's listing directory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSelection {
    /// Every regular file in the directory, sorted by file name and concatenated.
    #[default]
    AllFiles,
    /// A single file of the directory.
    Named(String),
}

/// Where a dataset's rows come from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// A single delimited file carrying SMILES and targets.
    Table { path: PathBuf },
    /// A hierarchical archive plus a directory of listing files naming
    /// `(receptor, compound)` pairs.
    Archive { path: PathBuf, listing_dir: PathBuf },
}

fn default_targets() -> Vec<String> {
    ["Hy", "MLOGP", "vina_score"].map(String::from).to_vec()
}
fn default_receptor_column() -> String {
    "receptor".to_string()
}
fn default_compound_column() -> String {
    "drugID".to_string()
}
fn default_smiles_column() -> String {
    "smiles".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_data_layout() {
        let config = DatasetConfig::default();
        assert_eq!(config.targets, ["Hy", "MLOGP", "vina_score"]);
        assert_eq!(config.columns.compound, "drugID");
        assert_eq!(config.exclude_column, "drugID");
        assert_eq!(config.listing, ListingSelection::AllFiles);
        assert!(!config.graph.strict_adjacency);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: DatasetConfig = toml::from_str(
            r#"
            targets = ["label"]
            seed = 7
            listing = { named = "fgfr1.csv" }

            [columns]
            compound = "id"

            [graph]
            strict_adjacency = true
            "#,
        )
        .unwrap();
        assert_eq!(config.targets, ["label"]);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.listing, ListingSelection::Named("fgfr1.csv".into()));
        assert_eq!(config.columns.compound, "id");
        assert_eq!(config.columns.smiles, "smiles");
        assert!(config.graph.strict_adjacency);
    }

    #[test]
    fn data_source_is_tagged() {
        let source: DataSource = toml::from_str(
            r#"
            kind = "archive"
            path = "kinase.json"
            listing_dir = "lists"
            "#,
        )
        .unwrap();
        assert_eq!(
            source,
            DataSource::Archive {
                path: "kinase.json".into(),
                listing_dir: "lists".into(),
            }
        );
    }
}
