use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "molprop",
    about = "Molecular property regression data pipeline",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress banner and progress output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Train a property regressor on a dataset
    #[command(visible_alias = "t")]
    Train(TrainArgs),

    /// Build the molecular graph of a single SMILES string
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),

    /// Load every batch of a dataset and report failures
    #[command(visible_alias = "s")]
    Scan(ScanArgs),
}

/// Dataset selection shared by `train` and `scan`.
#[derive(Args)]
#[command(next_help_heading = "Dataset")]
pub struct DatasetOptions {
    /// Configuration file (TOML); command-line options override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Delimited file with SMILES and target columns
    #[arg(long, value_name = "FILE", conflicts_with = "archive")]
    pub csv: Option<PathBuf>,

    /// Archive holding receptor/compound/field entries (directory or JSON file)
    #[arg(long, value_name = "PATH")]
    pub archive: Option<PathBuf>,

    /// Directory of listing files naming receptor/compound pairs
    #[arg(long, value_name = "DIR")]
    pub listing_dir: Option<PathBuf>,

    /// Read only this listing file instead of every file in --listing-dir
    #[arg(long, value_name = "NAME")]
    pub listing_file: Option<String>,

    /// Delimited file of compound ids to leave out
    #[arg(long, value_name = "FILE")]
    pub exclude: Option<PathBuf>,

    /// Column of the exclusion file holding compound ids
    #[arg(long, value_name = "NAME")]
    pub exclude_column: Option<String>,

    /// Target name, repeatable (default: Hy, MLOGP, vina_score)
    #[arg(long = "target", value_name = "NAME", action = ArgAction::Append)]
    pub targets: Vec<String>,

    /// Column holding the receptor name
    #[arg(long, value_name = "NAME")]
    pub receptor_column: Option<String>,

    /// Column holding the compound id
    #[arg(long, value_name = "NAME")]
    pub compound_column: Option<String>,

    /// Column holding the SMILES string
    #[arg(long, value_name = "NAME")]
    pub smiles_column: Option<String>,

    /// Archive field holding the SMILES string
    #[arg(long, value_name = "NAME")]
    pub smiles_field: Option<String>,

    /// Seed of the dataset shuffle (random if omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Record every bond in both directions instead of one edge per atom
    #[arg(long)]
    pub strict_adjacency: bool,
}

/// Data loader options shared by `train` and `scan`.
#[derive(Args)]
#[command(next_help_heading = "Loading")]
pub struct LoaderOptions {
    /// Data loader threads (0 loads on the main thread)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Samples per batch
    #[arg(short, long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Drop samples that fail to load instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Training")]
pub struct TrainOptions {
    /// Number of passes over the training positions
    #[arg(short, long, value_name = "N")]
    pub epochs: Option<usize>,

    /// Request GPU placement (training always runs on the CPU)
    #[arg(long)]
    pub use_gpu: bool,

    /// SGD learning rate
    #[arg(long = "lr", value_name = "RATE")]
    pub learning_rate: Option<f64>,

    /// Dropout probability
    #[arg(short = 'p', long = "dropout", value_name = "P")]
    pub dropout: Option<f64>,

    /// Experiment name; outputs are keyed by <NAME>_<unix seconds>
    #[arg(long = "exp-name", value_name = "NAME")]
    pub experiment_name: Option<String>,

    /// Share of the dataset held out for validation
    #[arg(long, value_name = "FRACTION")]
    pub val_fraction: Option<f64>,

    /// Validate on one batch every N training steps
    #[arg(long, value_name = "N")]
    pub validate_every: Option<usize>,

    /// Seed of the train/validation split
    #[arg(long, value_name = "SEED")]
    pub split_seed: Option<u64>,

    /// Seed of weight initialization, dropout, and batch order
    #[arg(long = "train-seed", value_name = "SEED")]
    pub train_seed: Option<u64>,
}

#[derive(Args)]
#[command(next_help_heading = "Outputs")]
pub struct OutputDirs {
    /// Directory of streamed scalar logs
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Directory of exported scalar summaries
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Directory of model checkpoints
    #[arg(long, value_name = "DIR")]
    pub checkpoint_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct TrainArgs {
    #[command(flatten)]
    pub dataset: DatasetOptions,

    #[command(flatten)]
    pub loader: LoaderOptions,

    #[command(flatten)]
    pub train: TrainOptions,

    #[command(flatten)]
    pub outputs: OutputDirs,
}

#[derive(Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub dataset: DatasetOptions,

    #[command(flatten)]
    pub loader: LoaderOptions,
}

#[derive(Args)]
pub struct InspectArgs {
    /// SMILES string to encode
    #[arg(value_name = "SMILES", allow_hyphen_values = true)]
    pub smiles: String,

    /// Record every bond in both directions instead of one edge per atom
    #[arg(long)]
    pub strict_adjacency: bool,

    /// Print the full graph as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE", requires = "json")]
    pub output: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_train_flags() {
        let cli = Cli::try_parse_from([
            "molprop", "-vv", "train", "--csv", "data.csv", "--target", "Hy", "--target",
            "MLOGP", "-b", "32", "-p", "0.2", "--exp-name", "run", "--use-gpu",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Train(args) = cli.command else {
            panic!("expected train");
        };
        assert_eq!(args.dataset.targets, ["Hy", "MLOGP"]);
        assert_eq!(args.loader.batch_size, Some(32));
        assert_eq!(args.train.dropout, Some(0.2));
        assert!(args.train.use_gpu);
    }

    #[test]
    fn csv_and_archive_conflict() {
        assert!(
            Cli::try_parse_from(["molprop", "scan", "--csv", "a.csv", "--archive", "b"]).is_err()
        );
    }
}
