use molprop::train::TrainConfig;

use super::ConfigFile;
use crate::cli::{LoaderOptions, OutputDirs, TrainOptions};

pub fn build_train_config(
    file: &ConfigFile,
    loader: &LoaderOptions,
    opts: &TrainOptions,
    outputs: &OutputDirs,
) -> TrainConfig {
    let mut config = file.train.clone();

    if let Some(n) = loader.workers {
        config.workers = n;
    }
    if let Some(n) = loader.batch_size {
        config.batch_size = n;
    }
    config.skip_invalid |= loader.skip_invalid;

    if let Some(n) = opts.epochs {
        config.epochs = n;
    }
    config.use_gpu |= opts.use_gpu;
    if let Some(rate) = opts.learning_rate {
        config.learning_rate = rate;
    }
    if let Some(p) = opts.dropout {
        config.dropout = p;
    }
    if let Some(name) = &opts.experiment_name {
        config.experiment_name = name.clone();
    }
    if let Some(fraction) = opts.val_fraction {
        config.val_fraction = fraction;
    }
    if let Some(n) = opts.validate_every {
        config.validate_every = n;
    }
    if let Some(seed) = opts.split_seed {
        config.split_seed = seed;
    }
    if opts.train_seed.is_some() {
        config.seed = opts.train_seed;
    }

    if let Some(dir) = &outputs.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(dir) = &outputs.results_dir {
        config.results_dir = dir.clone();
    }
    if let Some(dir) = &outputs.checkpoint_dir {
        config.checkpoint_dir = dir.clone();
    }

    config
}
