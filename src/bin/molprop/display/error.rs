use std::io::{self, Write};

use anyhow::Error;

use molprop::io::Format;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        // Typed errors may sit anywhere in the chain, wrapped by a layer above.
        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<molprop::train::Error>() {
                collector.collect_train_hints(e);
            } else if let Some(e) = cause.downcast_ref::<molprop::dataset::Error>() {
                collector.collect_dataset_hints(e);
            } else if let Some(e) = cause.downcast_ref::<molprop::io::Error>() {
                collector.collect_io_hints(e);
            }
            if collector.has_typed_hints {
                break;
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_train_hints(&mut self, err: &molprop::train::Error) {
        use molprop::train::Error as TrainError;

        match err {
            TrainError::InvalidConfig(_) => {
                self.mark_typed();
                self.add("Check the [train] table of the config file and the training flags");
                self.add("Dropout and validation fraction must lie in [0, 1)");
            }

            TrainError::EmptyDataset => {
                self.mark_typed();
                self.add("No rows remained after loading and exclusion filtering");
                self.add("Check the exclusion file and the listing files");
            }

            TrainError::Sample { position, source } => {
                self.add(format!("Sample at position {} could not be loaded", position));
                self.add("Pass --skip-invalid to drop broken samples and keep training");
                self.collect_dataset_hints(source);
            }

            TrainError::WorkerPool(_) => {
                self.mark_typed();
                self.add("Try fewer loader threads with --workers");
            }

            TrainError::Output { path, .. } => {
                self.mark_typed();
                self.add(format!("Could not write to {}", path.display()));
                self.add("Check --log-dir, --results-dir, and --checkpoint-dir permissions");
            }

            TrainError::Serialize { .. } => {
                self.mark_typed();
                self.add("A metric or parameter may be NaN or infinite");
                self.add("Try a smaller learning rate with --lr");
            }

            TrainError::Checkpoint(_) => {
                self.mark_typed();
                self.add("The checkpoint was written by an incompatible model");
            }
        }
    }

    fn collect_dataset_hints(&mut self, err: &molprop::dataset::Error) {
        use molprop::dataset::Error as DatasetError;

        self.mark_typed();

        match err {
            DatasetError::Parse { compound, source } => {
                self.add(format!("The SMILES of compound '{}' is malformed", compound));
                self.collect_io_hints(source);
            }

            DatasetError::MissingField { field, .. } => {
                self.add(format!("Field '{}' is absent for this compound", field));
                self.add("Check the --target names and --smiles-field against the archive");
            }

            DatasetError::InvalidField { field, .. } => {
                self.add(format!("Target '{}' must hold a number", field));
                self.add("Check for placeholder values such as 'NA' in the source");
            }

            DatasetError::SourceLoad { path, source } => {
                self.add(format!("Failed while loading {}", path.display()));
                self.collect_io_hints(source);
            }

            DatasetError::IndexOutOfRange { .. } => {
                self.add("This indicates a bug in position handling; please report it");
            }

            DatasetError::Archive { source, .. } => {
                self.add("The archive entry exists but could not be read");
                self.collect_io_hints(source);
            }
        }
    }

    fn collect_io_hints(&mut self, err: &molprop::io::Error) {
        use molprop::io::Error as IoError;

        self.mark_typed();

        match err {
            IoError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            IoError::Parse { format, position, .. } => {
                self.add(format!(
                    "Parser stopped at {} {} of the {} input",
                    format.position_unit(),
                    position,
                    format
                ));
                self.add_format_specific_parse_hints(*format);
            }

            IoError::Chemistry(_) => {
                self.add("The molecule parses but is chemically inconsistent");
                self.add("Check atom charges, hydrogen counts, and aromatic rings");
            }

            IoError::MissingColumn { column } => {
                self.add(format!("The header has no column named '{}'", column));
                self.add("Column names are case-sensitive; see --smiles-column and --target");
            }

            IoError::MissingKey { path } => {
                self.add(format!("Nothing is stored at '{}'", path));
            }

            IoError::InvalidEntry { .. } => {
                self.add("Archive leaves must be a scalar or a flat, non-empty array");
            }

            IoError::Json(_) => {
                self.add("The archive file is not valid JSON");
                self.add("Pass a directory to --archive to use a directory archive");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Delimited files must be UTF-8 text");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn add_format_specific_parse_hints(&mut self, format: Format) {
        match format {
            Format::Smiles => {
                self.add("SMILES: Check ring closure digits and bracket atoms");
                self.add("SMILES: Every '(' needs a matching ')'");
            }

            Format::Table => {
                self.add("Table: Every row needs as many fields as the header");
                self.add("Table: Quote fields that contain the delimiter");
            }

            Format::Archive => {}
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("config file") {
            self.add("Check the TOML syntax and the table names [source], [dataset], [train]");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
