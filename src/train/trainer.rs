use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use tracing::{debug, info, warn};

use super::checkpoint::Checkpoint;
use super::config::TrainConfig;
use super::error::Error;
use super::metrics::StepMetrics;
use super::model::{ReadoutRegressor, Regressor};
use super::scalars::ScalarWriter;
use crate::dataset::{Batch, DataLoader, Dataset, LoadedBatch};

/// Progress of one training step, handed to the observer of [`run_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub epoch: usize,
    pub step_in_epoch: usize,
    pub steps_per_epoch: usize,
    pub global_step: u64,
    pub train: StepMetrics,
    pub val: Option<StepMetrics>,
}

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub experiment_id: String,
    pub train_size: usize,
    pub val_size: usize,
    pub global_steps: u64,
    /// Samples dropped because they failed to load.
    pub skipped: usize,
    pub last_train: Option<StepMetrics>,
    pub last_val: Option<StepMetrics>,
    pub scalar_log: PathBuf,
    pub scalar_export: PathBuf,
    pub checkpoint: PathBuf,
}

/// Splits `0..len` into training and validation positions.
///
/// Positions are shuffled with `seed`; the first `ceil(len * val_fraction)` of them
/// are held out for validation. Both halves are returned sorted.
pub fn split_positions(len: usize, val_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut positions: Vec<usize> = (0..len).collect();
    positions.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_val = ((len as f64 * val_fraction).ceil() as usize).min(len);
    let mut train = positions.split_off(n_val);
    let mut val = positions;
    train.sort_unstable();
    val.sort_unstable();
    (train, val)
}

/// `<name>_<unix seconds>`.
pub fn experiment_id(name: &str) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{name}_{secs}")
}

/// Trains the baseline [`ReadoutRegressor`] on `dataset`.
pub fn run(dataset: &dyn Dataset, config: &TrainConfig) -> Result<TrainReport, Error> {
    config.validate()?;
    let mut model = ReadoutRegressor::new(
        dataset.target_names().len(),
        config.learning_rate,
        config.dropout,
        config.seed,
    );
    run_with(dataset, &mut model, config, &mut |_| {})
}

/// Trains `model` on `dataset`, calling `on_step` after every training step.
///
/// # Errors
///
/// Fails on an invalid configuration, an empty dataset, a model whose task count
/// differs from the dataset's targets, any sample that fails to load unless
/// `skip_invalid` is set, and any output that cannot be written.
pub fn run_with(
    dataset: &dyn Dataset,
    model: &mut dyn Regressor,
    config: &TrainConfig,
    on_step: &mut dyn FnMut(&StepRecord),
) -> Result<TrainReport, Error> {
    config.validate()?;
    if dataset.is_empty() {
        return Err(Error::EmptyDataset);
    }
    let targets = dataset.target_names().to_vec();
    if model.n_tasks() != targets.len() {
        return Err(Error::invalid_config(format!(
            "model predicts {} tasks but the dataset has {} targets",
            model.n_tasks(),
            targets.len()
        )));
    }
    if config.use_gpu {
        warn!("GPU requested but not available; training on the CPU");
    }

    let experiment = experiment_id(&config.experiment_name);
    let (train_positions, val_positions) =
        split_positions(dataset.len(), config.val_fraction, config.split_seed);
    if train_positions.is_empty() {
        return Err(Error::invalid_config(
            "validation fraction leaves no training samples",
        ));
    }
    info!(
        experiment = %experiment,
        train = train_positions.len(),
        val = val_positions.len(),
        "starting training"
    );

    let loader = DataLoader::new(dataset, config.batch_size, config.workers)?;
    let steps_per_epoch = loader.num_batches(train_positions.len());
    let mut scalars = ScalarWriter::create(&config.log_dir.join(&experiment))?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut global_step: u64 = 0;
    let mut skipped = 0;
    let mut last_train = None;
    let mut last_val = None;

    for epoch in 0..config.epochs {
        let mut order = train_positions.clone();
        order.shuffle(&mut rng);

        let mut epoch_loss = 0.0;
        let mut epoch_steps = 0usize;
        for (step_in_epoch, loaded) in loader.batches(order).enumerate() {
            let batch = accept(loaded, config.skip_invalid, &mut skipped)?;
            if batch.is_empty() {
                continue;
            }

            let train = model.train_step(&batch);
            scalars.add_scalar("train/loss", train.loss, global_step)?;
            scalars.add_scalar("train/r2", train.r2, global_step)?;
            epoch_loss += train.loss;
            epoch_steps += 1;
            last_train = Some(train);

            let mut val = None;
            if step_in_epoch % config.validate_every == 0 && !val_positions.is_empty() {
                let picked: Vec<usize> = val_positions
                    .choose_multiple(&mut rng, config.batch_size)
                    .copied()
                    .collect();
                let batch = accept(loader.load(&picked), config.skip_invalid, &mut skipped)?;
                if !batch.is_empty() {
                    let metrics = model.evaluate(&batch);
                    scalars.add_scalar("val/loss", metrics.loss, global_step)?;
                    scalars.add_scalar("val/r2", metrics.r2, global_step)?;
                    debug!(step = global_step, loss = metrics.loss, r2 = metrics.r2, "validation");
                    val = Some(metrics);
                    last_val = val;
                }
            }

            on_step(&StepRecord {
                epoch,
                step_in_epoch,
                steps_per_epoch,
                global_step,
                train,
                val,
            });
            global_step += 1;
        }

        let mean_loss = if epoch_steps == 0 {
            f64::NAN
        } else {
            epoch_loss / epoch_steps as f64
        };
        info!(epoch, steps = epoch_steps, mean_loss, "epoch finished");
    }

    let scalar_export = config
        .results_dir
        .join(format!("{experiment}_all_scalars.json"));
    scalars.export_json(&scalar_export)?;

    let checkpoint = config.checkpoint_dir.join(&experiment);
    Checkpoint {
        experiment: experiment.clone(),
        targets,
        global_step,
        model: model.checkpoint(),
    }
    .save(&checkpoint)?;
    info!(path = %checkpoint.display(), "checkpoint written");

    Ok(TrainReport {
        experiment_id: experiment,
        train_size: train_positions.len(),
        val_size: val_positions.len(),
        global_steps: global_step,
        skipped,
        last_train,
        last_val,
        scalar_log: scalars.path().to_path_buf(),
        scalar_export,
        checkpoint,
    })
}

fn accept(loaded: LoadedBatch, skip_invalid: bool, skipped: &mut usize) -> Result<Batch, Error> {
    for (position, error) in loaded.failures {
        if skip_invalid && error.is_per_sample() {
            warn!(position, error = %error, "skipping invalid sample");
            *skipped += 1;
        } else {
            return Err(Error::Sample {
                position,
                source: error,
            });
        }
    }
    Ok(loaded.batch)
}
