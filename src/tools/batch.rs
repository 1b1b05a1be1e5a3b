//! Parse batch: extract every partitioned source file into a JSON record
//!
//! Input files live in `<input>/<YYYY-MM>/<file>`. Each one becomes
//! `<output>/<YYYY>-<MM>/<stem>_<YYYY>_<MM>.json`. Records that already exist
//! are left alone, so an interrupted batch can simply be run again.

use super::json::write_pretty;
use crate::entities::{parse_file, ExtractError, Language, ParserRegistry};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Worker threads; rayon's default when `None`
    pub threads: Option<usize>,
}

/// What happened to a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written,
    AlreadyDone,
    Skipped,
    Unsupported,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub files_seen: usize,
    pub written: usize,
    pub already_done: usize,
    pub skipped: usize,
    pub unsupported: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Written => self.written += 1,
            FileOutcome::AlreadyDone => self.already_done += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Unsupported => self.unsupported += 1,
        }
    }
}

/// Year/month partition taken from a folder name like `2021-07`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub year: String,
    pub month: String,
}

impl Partition {
    pub fn from_folder(name: &str) -> Self {
        let mut parts = name.split('-');
        match (parts.next(), parts.next()) {
            (Some(year), Some(month)) => Partition {
                year: year.to_string(),
                month: month.to_string(),
            },
            _ => Partition {
                year: UNKNOWN.to_string(),
                month: UNKNOWN.to_string(),
            },
        }
    }

    /// Partition of the folder containing `file`
    pub fn of_file(file: &Path) -> Self {
        let folder = file
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        Self::from_folder(&folder)
    }
}

/// Where the record for `file` is written
pub fn output_path(output_dir: &Path, file: &Path, partition: &Partition) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    output_dir
        .join(format!("{}-{}", partition.year, partition.month))
        .join(format!("{}_{}_{}.json", stem, partition.year, partition.month))
}

/// Extract one file and write its record
pub fn process_file(registry: &ParserRegistry, file: &Path, output_dir: &Path) -> FileOutcome {
    if Language::from_path(file).is_none() {
        return FileOutcome::Unsupported;
    }

    let partition = Partition::of_file(file);
    let out_path = output_path(output_dir, file, &partition);
    if out_path.exists() {
        return FileOutcome::AlreadyDone;
    }

    let result = match parse_file(registry, file) {
        Ok(result) => result,
        Err(ExtractError::Unsupported(_)) => return FileOutcome::Unsupported,
        Err(e) => {
            debug!(file = %file.display(), error = %e, "skipping file");
            return FileOutcome::Skipped;
        }
    };

    let written = out_path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| write_pretty(&out_path, &result));

    match written {
        Ok(()) => {
            debug!(path = %out_path.display(), "wrote record");
            FileOutcome::Written
        }
        Err(e) => {
            warn!(path = %out_path.display(), error = %e, "failed to write record");
            FileOutcome::Skipped
        }
    }
}

/// Files sitting directly inside a partition folder of `input_dir`
fn collect_files(input_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(input_dir)
        .min_depth(2)
        .max_depth(2)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Run the parse batch (parallelized with rayon)
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary, BatchError> {
    if !options.input_dir.is_dir() {
        return Err(BatchError::InputNotFound(options.input_dir.clone()));
    }

    let files = collect_files(&options.input_dir);
    info!(
        files = files.len(),
        input = %options.input_dir.display(),
        output = %options.output_dir.display(),
        "starting parse batch"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads.unwrap_or(0))
        .build()?;

    // Grammars are shared; each task builds its own parser from them
    let registry = ParserRegistry::new();
    let outcomes: Vec<FileOutcome> = pool.install(|| {
        files
            .par_iter()
            .map(|file| process_file(&registry, file, &options.output_dir))
            .collect()
    });

    let mut summary = BatchSummary::default();
    for outcome in &outcomes {
        summary.record(outcome);
    }

    info!(
        written = summary.written,
        already_done = summary.already_done,
        skipped = summary.skipped,
        "parse batch finished"
    );
    Ok(summary)
}
