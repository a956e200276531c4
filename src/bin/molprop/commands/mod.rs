mod inspect;
mod scan;
mod train;

use inspect::run_inspect;
use scan::run_scan;
use train::run_train;

use anyhow::{Context, Result};

use molprop::dataset::{self, DataSource, Dataset, DatasetConfig};

use crate::cli::Command;
use crate::display::Context as DisplayContext;

pub fn dispatch(command: Command, ctx: DisplayContext) -> Result<()> {
    match command {
        Command::Train(args) => run_train(args, ctx),
        Command::Inspect(args) => run_inspect(args, ctx),
        Command::Scan(args) => run_scan(args, ctx),
    }
}

fn open_dataset(source: &DataSource, config: &DatasetConfig) -> Result<Box<dyn Dataset>> {
    dataset::open(source, config)
        .with_context(|| format!("Failed to open dataset at {}", source.path().display()))
}
