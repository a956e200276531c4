use anyhow::{Result, bail};

use molprop::dataset::{DataSource, DatasetConfig, ListingSelection};

use super::ConfigFile;
use crate::cli::DatasetOptions;

/// Resolves the data source and dataset options, with command-line values taking
/// precedence over the config file.
pub fn build_dataset_config(
    file: &ConfigFile,
    opts: &DatasetOptions,
) -> Result<(DataSource, DatasetConfig)> {
    let source = resolve_source(file.source.as_ref(), opts)?;

    let mut config = file.dataset.clone();
    if !opts.targets.is_empty() {
        config.targets = opts.targets.clone();
    }
    if let Some(column) = &opts.receptor_column {
        config.columns.receptor = column.clone();
    }
    if let Some(column) = &opts.compound_column {
        config.columns.compound = column.clone();
    }
    if let Some(column) = &opts.smiles_column {
        config.columns.smiles = column.clone();
    }
    if let Some(field) = &opts.smiles_field {
        config.smiles_field = field.clone();
    }
    if let Some(path) = &opts.exclude {
        config.exclude = Some(path.clone());
    }
    if let Some(column) = &opts.exclude_column {
        config.exclude_column = column.clone();
    }
    if let Some(name) = &opts.listing_file {
        config.listing = ListingSelection::Named(name.clone());
    }
    if opts.seed.is_some() {
        config.seed = opts.seed;
    }
    if opts.strict_adjacency {
        config.graph.strict_adjacency = true;
    }

    if config.targets.is_empty() {
        bail!("At least one target is required (--target NAME)");
    }
    Ok((source, config))
}

fn resolve_source(from_file: Option<&DataSource>, opts: &DatasetOptions) -> Result<DataSource> {
    if let Some(path) = &opts.csv {
        return Ok(DataSource::Table { path: path.clone() });
    }

    let file_listing_dir = match from_file {
        Some(DataSource::Archive { listing_dir, .. }) => Some(listing_dir),
        _ => None,
    };

    if let Some(path) = &opts.archive {
        let Some(listing_dir) = opts.listing_dir.as_ref().or(file_listing_dir) else {
            bail!("An archive source needs a listing directory (--listing-dir DIR)");
        };
        return Ok(DataSource::Archive {
            path: path.clone(),
            listing_dir: listing_dir.clone(),
        });
    }

    match from_file {
        Some(DataSource::Archive { path, listing_dir }) => Ok(DataSource::Archive {
            path: path.clone(),
            listing_dir: opts.listing_dir.clone().unwrap_or_else(|| listing_dir.clone()),
        }),
        Some(source) => Ok(source.clone()),
        None => bail!(
            "No data source given; pass --csv or --archive, or set [source] in the config file"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    fn scan_options(args: &[&str]) -> DatasetOptions {
        let argv = ["molprop", "scan"].iter().chain(args).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Scan(scan) => scan.dataset,
            _ => unreachable!(),
        }
    }

    #[test]
    fn command_line_overrides_file() {
        let mut file = ConfigFile::default();
        file.dataset.targets = vec!["Hy".into()];
        file.dataset.seed = Some(1);

        let opts = scan_options(&["--csv", "d.csv", "--target", "MLOGP", "--strict-adjacency"]);
        let (source, config) = build_dataset_config(&file, &opts).unwrap();
        assert_eq!(
            source,
            DataSource::Table {
                path: PathBuf::from("d.csv")
            }
        );
        assert_eq!(config.targets, ["MLOGP"]);
        assert_eq!(config.seed, Some(1));
        assert!(config.graph.strict_adjacency);
    }

    #[test]
    fn archive_needs_listing_dir() {
        let file = ConfigFile::default();
        assert!(build_dataset_config(&file, &scan_options(&["--archive", "a.json"])).is_err());

        let opts = scan_options(&[
            "--archive",
            "a.json",
            "--listing-dir",
            "l",
            "--listing-file",
            "x.csv",
        ]);
        let (source, config) = build_dataset_config(&file, &opts).unwrap();
        assert!(matches!(source, DataSource::Archive { .. }));
        assert_eq!(config.listing, ListingSelection::Named("x.csv".into()));
    }

    #[test]
    fn source_is_required() {
        assert!(build_dataset_config(&ConfigFile::default(), &scan_options(&[])).is_err());
    }
}
