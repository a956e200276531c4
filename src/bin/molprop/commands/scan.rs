use anyhow::{Context, Result};
use tracing::warn;

use molprop::dataset::DataLoader;

use super::open_dataset;
use crate::cli::ScanArgs;
use crate::config::{ConfigFile, build_dataset_config};
use crate::display::{Context as DisplayContext, Progress, print_dataset_info, print_scan_summary};

const TOTAL_STEPS: u8 = 2;

/// Pulls every batch of the dataset through the loader once.
pub fn run_scan(args: ScanArgs, ctx: DisplayContext) -> Result<()> {
    let file = ConfigFile::load(args.dataset.config.as_deref())?;
    let (source, dataset_config) = build_dataset_config(&file, &args.dataset)?;
    let batch_size = args.loader.batch_size.unwrap_or(file.train.batch_size);
    let workers = args.loader.workers.unwrap_or(file.train.workers);
    let skip_invalid = args.loader.skip_invalid || file.train.skip_invalid;

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading dataset");
    let dataset = open_dataset(&source, &dataset_config)?;
    progress.complete_step("Loading dataset", &[]);

    if ctx.interactive {
        print_dataset_info(&source, dataset.len(), dataset.target_names());
    }

    progress.step("Scanning batches");
    let loader = DataLoader::new(dataset.as_ref(), batch_size, workers)
        .context("Failed to start data loader workers")?;
    let positions: Vec<usize> = (0..dataset.len()).collect();
    let bar = progress.batches(loader.num_batches(positions.len()) as u64);

    let mut samples = 0;
    let mut batches = 0;
    let mut failures = Vec::new();
    for loaded in loader.batches(positions) {
        for (position, error) in loaded.failures {
            if skip_invalid && error.is_per_sample() {
                warn!(position, error = %error, "sample failed to load");
                failures.push((position, error.to_string()));
            } else {
                return Err(error)
                    .with_context(|| format!("Sample at position {position} failed to load"));
            }
        }
        samples += loaded.batch.len();
        batches += 1;
        bar.advance(format!("{samples} samples"));
    }
    bar.finish();

    let scan_substeps = [
        format!("{batches} batches of up to {} samples", loader.batch_size()),
        format!("{} loader threads", loader.workers()),
    ];
    let scan_substeps_ref: Vec<&str> = scan_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Scanning batches", &scan_substeps_ref);

    print_scan_summary(samples, batches, &failures);

    progress.finish("Scan complete");

    Ok(())
}
