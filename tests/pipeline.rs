use std::fs;
use std::path::Path;

use molprop::dataset::{
    self, DataLoader, DataSource, Dataset, DatasetConfig, Error, ListingSelection,
};
use molprop::train::{self, Checkpoint, TrainConfig};

const CSV: &str = "\
receptor,drugID,smiles,Hy,MLOGP,vina_score
fgfr1,D1,CCO,0.5,-0.3,-5.1
fgfr1,D2,c1ccccc1,1.2,2.1,-6.0
fgfr1,D3,CC(=O)O,0.1,-0.2,-4.4
";

fn write(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

fn seeded() -> DatasetConfig {
    DatasetConfig {
        seed: Some(7),
        ..DatasetConfig::default()
    }
}

#[test]
fn tabular_dataset_drops_excluded_compounds() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    let exclude = dir.path().join("exclude.csv");
    write(&data, CSV);
    write(&exclude, "drugID\nD2\n");

    let config = DatasetConfig {
        exclude: Some(exclude),
        ..seeded()
    };
    let dataset = dataset::open(&DataSource::Table { path: data }, &config).unwrap();
    assert_eq!(dataset.len(), 2);

    let mut compounds: Vec<String> = (0..dataset.len())
        .map(|p| dataset.get(p).unwrap().compound)
        .collect();
    compounds.sort();
    assert_eq!(compounds, ["D1", "D3"]);

    let sample = dataset.get(0).unwrap();
    assert_eq!(sample.targets.len(), 3);
    assert_eq!(sample, dataset.get(0).unwrap());
    assert!(matches!(
        dataset.get(2),
        Err(Error::IndexOutOfRange { position: 2, len: 2 })
    ));
}

#[test]
fn archive_dataset_reads_directory_tree() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("archive");
    for (compound, smiles, hy) in [("D1", "CCO", "0.5"), ("D2", "c1ccccc1", "1.2")] {
        let base = archive.join("fgfr1").join(compound);
        write(&base.join("smiles"), smiles);
        write(&base.join("Hy"), hy);
    }
    write(&archive.join("egfr/D9/smiles"), "C1CC");
    write(&archive.join("egfr/D9/Hy"), "0.0");

    let listings = dir.path().join("lists");
    write(&listings.join("a.csv"), "receptor,drugID\nfgfr1,D1\nfgfr1,D2\n");
    write(&listings.join("b.csv"), "receptor,drugID\negfr,D9\nfgfr1,D404\n");

    let config = DatasetConfig {
        targets: vec!["Hy".into()],
        ..seeded()
    };
    let source = DataSource::Archive {
        path: archive.clone(),
        listing_dir: listings.clone(),
    };
    let dataset = dataset::open(&source, &config).unwrap();
    assert_eq!(dataset.len(), 4);

    let mut ok = 0;
    let mut parse = 0;
    let mut missing = 0;
    for p in 0..dataset.len() {
        match dataset.get(p) {
            Ok(sample) => {
                assert_eq!(sample.targets.len(), 1);
                ok += 1;
            }
            Err(Error::Parse { .. }) => parse += 1,
            Err(Error::MissingField { .. }) => missing += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!((ok, parse, missing), (2, 1, 1));

    let config = DatasetConfig {
        listing: ListingSelection::Named("a.csv".into()),
        ..config
    };
    let dataset = dataset::open(&source, &config).unwrap();
    assert_eq!(dataset.len(), 2);
}

#[test]
fn loader_covers_every_position_once() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    write(&data, CSV);
    let dataset = dataset::open(&DataSource::Table { path: data }, &seeded()).unwrap();

    let loader = DataLoader::new(dataset.as_ref(), 2, 2).unwrap();
    let batches: Vec<_> = loader.batches((0..dataset.len()).collect()).collect();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].batch.len(), 2);
    assert_eq!(batches[1].batch.len(), 1);
    assert!(batches.iter().all(|b| b.failures.is_empty()));

    let expected: Vec<String> = (0..dataset.len())
        .map(|p| dataset.get(p).unwrap().compound)
        .collect();
    let seen: Vec<String> = batches
        .iter()
        .flat_map(|b| b.batch.iter().map(|s| s.compound.clone()))
        .collect();
    assert_eq!(seen, expected);
}

#[test]
fn archive_batches_on_worker_pool_keep_order() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("archive");
    let mut listing = String::from("receptor,drugID\n");
    for (i, smiles) in ["CCO", "CCN", "c1ccccc1", "CC(=O)O", "C#N"].iter().enumerate() {
        let base = archive.join(format!("fgfr1/D{i}"));
        write(&base.join("smiles"), smiles);
        write(&base.join("Hy"), &format!("{i}.5"));
        listing.push_str(&format!("fgfr1,D{i}\n"));
    }
    write(&archive.join("egfr/D9/smiles"), "C1CC");
    write(&archive.join("egfr/D9/Hy"), "0.0");
    listing.push_str("egfr,D9\n");
    write(&dir.path().join("lists/all.csv"), &listing);

    let config = DatasetConfig {
        targets: vec!["Hy".into()],
        ..seeded()
    };
    let source = DataSource::Archive {
        path: archive,
        listing_dir: dir.path().join("lists"),
    };
    let dataset = dataset::open(&source, &config).unwrap();
    assert_eq!(dataset.len(), 6);

    let loader = DataLoader::new(dataset.as_ref(), 4, 2).unwrap();
    assert_eq!(loader.workers(), 2);

    let positions: Vec<usize> = (0..dataset.len()).rev().collect();
    let first: Vec<_> = loader.batches(positions.clone()).collect();
    let second: Vec<_> = loader.batches(positions.clone()).collect();
    assert_eq!(first.len(), 2);

    let mut failed = Vec::new();
    for (chunk, (a, b)) in positions.chunks(4).zip(first.iter().zip(&second)) {
        let expected: Vec<_> = chunk
            .iter()
            .filter_map(|&p| dataset.get(p).ok())
            .collect();
        let got: Vec<_> = a.batch.iter().cloned().collect();
        assert_eq!(got, expected);
        assert_eq!(b.batch.iter().cloned().collect::<Vec<_>>(), expected);

        let failures: Vec<usize> = a.failures.iter().map(|(p, _)| *p).collect();
        assert_eq!(failures, b.failures.iter().map(|(p, _)| *p).collect::<Vec<_>>());
        failed.extend(failures);
    }
    assert_eq!(failed.len(), 1);
    assert!(matches!(dataset.get(failed[0]), Err(Error::Parse { .. })));
}

#[test]
fn training_run_writes_scalars_and_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    write(&data, CSV);
    let dataset = dataset::open(&DataSource::Table { path: data }, &seeded()).unwrap();

    let config = TrainConfig {
        epochs: 3,
        batch_size: 1,
        validate_every: 1,
        dropout: 0.0,
        seed: Some(11),
        experiment_name: "smoke".into(),
        log_dir: dir.path().join("logs"),
        results_dir: dir.path().join("results"),
        checkpoint_dir: dir.path().join("checkpoints"),
        ..TrainConfig::default()
    };
    let report = train::run(dataset.as_ref(), &config).unwrap();

    // ceil(3 * 0.25) = 1 held out
    assert_eq!((report.train_size, report.val_size), (2, 1));
    assert_eq!(report.global_steps, 6);
    assert!(report.experiment_id.starts_with("smoke_"));

    let stream = fs::read_to_string(&report.scalar_log).unwrap();
    assert_eq!(stream.lines().count(), 6 * 4);

    let export: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report.scalar_export).unwrap()).unwrap();
    assert_eq!(export["val/r2"].as_array().unwrap().len(), 6);
    assert_eq!(
        report.scalar_export,
        dir.path()
            .join("results")
            .join(format!("{}_all_scalars.json", report.experiment_id))
    );

    let checkpoint = Checkpoint::load(&report.checkpoint).unwrap();
    assert_eq!(checkpoint.targets, ["Hy", "MLOGP", "vina_score"]);
    assert_eq!(checkpoint.global_step, 6);
}
