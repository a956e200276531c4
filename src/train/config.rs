use std::path::PathBuf;

use serde::Deserialize;

use super::error::Error;

/// Options of a training run.
///
/// Output locations follow a fixed layout keyed by the run's experiment id
/// (`<experiment_name>_<unix seconds>`):
///
/// - `<log_dir>/<id>/scalars.jsonl` – scalars streamed as they are recorded
/// - `<results_dir>/<id>_all_scalars.json` – all scalars at the end of the run
/// - `<checkpoint_dir>/<id>` – final model state
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub batch_size: usize,
    pub epochs: usize,
    /// Data loader threads; 0 loads on the training thread.
    pub workers: usize,
    pub learning_rate: f64,
    /// Dropout probability applied to the model input during training.
    pub dropout: f64,
    /// Accepted for compatibility; computation always runs on the CPU.
    pub use_gpu: bool,
    pub experiment_name: String,
    pub log_dir: PathBuf,
    pub results_dir: PathBuf,
    pub checkpoint_dir: PathBuf,
    /// Run one validation batch every this many training steps of an epoch.
    pub validate_every: usize,
    /// Share of positions held out for validation.
    pub val_fraction: f64,
    /// Seed of the train/validation split.
    pub split_seed: u64,
    /// Seed of weight initialization, dropout, and per-epoch ordering; `None` draws
    /// from OS entropy.
    pub seed: Option<u64>,
    /// Drop samples that fail to load instead of aborting the run.
    pub skip_invalid: bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            epochs: 1,
            workers: 0,
            learning_rate: 1e-3,
            dropout: 0.5,
            use_gpu: false,
            experiment_name: "debug".to_string(),
            log_dir: PathBuf::from("logs"),
            results_dir: PathBuf::from("results"),
            checkpoint_dir: PathBuf::from("checkpoints"),
            validate_every: 10,
            val_fraction: 0.25,
            split_seed: 0,
            seed: None,
            skip_invalid: false,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.batch_size == 0 {
            return Err(Error::invalid_config("batch size must be at least 1"));
        }
        if self.validate_every == 0 {
            return Err(Error::invalid_config("validation interval must be at least 1"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::invalid_config(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(Error::invalid_config(format!(
                "dropout probability must lie in [0, 1), got {}",
                self.dropout
            )));
        }
        if !(0.0..1.0).contains(&self.val_fraction) {
            return Err(Error::invalid_config(format!(
                "validation fraction must lie in [0, 1), got {}",
                self.val_fraction
            )));
        }
        if self.experiment_name.trim().is_empty() || self.experiment_name.contains(['/', '\\']) {
            return Err(Error::invalid_config(format!(
                "experiment name '{}' is not a plain file name",
                self.experiment_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TrainConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.validate_every, 10);
        assert_eq!(config.val_fraction, 0.25);
        assert_eq!(config.split_seed, 0);
        assert_eq!(config.experiment_name, "debug");
    }

    #[test]
    fn rejects_out_of_range_values() {
        let with = |edit: fn(&mut TrainConfig)| {
            let mut config = TrainConfig::default();
            edit(&mut config);
            config
        };
        let bad = [
            with(|c| c.batch_size = 0),
            with(|c| c.dropout = 1.0),
            with(|c| c.learning_rate = 0.0),
            with(|c| c.val_fraction = -0.1),
            with(|c| c.validate_every = 0),
            with(|c| c.experiment_name = "a/b".into()),
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let config: TrainConfig = toml::from_str(
            r#"
            batch_size = 32
            experiment_name = "kinase"
            seed = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.experiment_name, "kinase");
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.epochs, 1);
    }
}
