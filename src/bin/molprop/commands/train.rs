use anyhow::{Context, Result};

use molprop::train::{self, ReadoutRegressor, StepRecord, split_positions};

use super::open_dataset;
use crate::cli::TrainArgs;
use crate::config::{ConfigFile, build_dataset_config, build_train_config};
use crate::display::{
    Context as DisplayContext, Progress, print_dataset_info, print_training_summary,
};

const TOTAL_STEPS: u8 = 2;

pub fn run_train(args: TrainArgs, ctx: DisplayContext) -> Result<()> {
    let file = ConfigFile::load(args.dataset.config.as_deref())?;
    let (source, dataset_config) = build_dataset_config(&file, &args.dataset)?;
    let train_config = build_train_config(&file, &args.loader, &args.train, &args.outputs);
    train_config.validate()?;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading dataset");
    let dataset = open_dataset(&source, &dataset_config)?;
    let load_substeps = [
        format!("Read {} rows", dataset.len()),
        match &dataset_config.exclude {
            Some(path) => format!("Applied exclusions from {}", path.display()),
            None => "No exclusion file".to_string(),
        },
        match dataset_config.seed {
            Some(seed) => format!("Shuffled with seed {seed}"),
            None => "Shuffled with a random seed".to_string(),
        },
    ];
    let load_substeps_ref: Vec<&str> = load_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Loading dataset", &load_substeps_ref);

    if ctx.interactive {
        print_dataset_info(&source, dataset.len(), dataset.target_names());
    }

    progress.step("Training");
    let (train_positions, _) = split_positions(
        dataset.len(),
        train_config.val_fraction,
        train_config.split_seed,
    );
    let total_batches =
        train_config.epochs * train_positions.len().div_ceil(train_config.batch_size);
    let bar = progress.batches(total_batches as u64);

    let mut model = ReadoutRegressor::new(
        dataset.target_names().len(),
        train_config.learning_rate,
        train_config.dropout,
        train_config.seed,
    );
    let report = train::run_with(
        dataset.as_ref(),
        &mut model,
        &train_config,
        &mut |record: &StepRecord| {
            bar.advance(format!(
                "epoch {} · loss {:.4} · r² {:.3}",
                record.epoch + 1,
                record.train.loss,
                record.train.r2
            ));
        },
    )
    .context("Training failed")?;
    bar.finish();

    let train_substeps = [
        format!(
            "{} epochs, {} steps, batch size {}",
            train_config.epochs, report.global_steps, train_config.batch_size
        ),
        format!("Skipped {} invalid samples", report.skipped),
        format!("Scalars streamed to {}", report.scalar_log.display()),
    ];
    let train_substeps_ref: Vec<&str> = train_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Training", &train_substeps_ref);

    if ctx.interactive {
        print_training_summary(&report);
    }

    progress.finish("Training complete");

    Ok(())
}
