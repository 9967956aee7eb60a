//! Batch conversion of report files into per-scan CSV files.
//!
//! Files sharing a leading digit run in their name (e.g. `1042_a.xps`,
//! `1042_b.xps`) are treated as the two reports of one scan and merged.

use crate::error::DexaError;
use crate::extraction::{load_text, DocumentConverter};
use crate::generate::{write_csv, Dialect};
use crate::merge::merge_pair;
use crate::parsing::{parse_report_with, ParserOptions};
use log::{error, info, warn};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Add;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;

static FILE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)").expect("valid file prefix pattern"));

/// Leading digit run of a file's base name.
pub fn file_prefix(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    FILE_PREFIX
        .captures(&name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Group files by numeric prefix. Files without a prefix are left out.
pub fn group_related_files(files: &[PathBuf]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for file in files {
        if let Some(prefix) = file_prefix(file) {
            groups.entry(prefix).or_default().push(file.clone());
        }
    }
    groups
}

/// One independent piece of batch work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkUnit {
    /// Two reports of the same scan, merged into one row.
    Pair { prefix: String, files: [PathBuf; 2] },
    Single(PathBuf),
}

impl WorkUnit {
    pub fn file_count(&self) -> usize {
        match self {
            WorkUnit::Pair { .. } => 2,
            WorkUnit::Single(_) => 1,
        }
    }

    /// Destination CSV path inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        let name = match self {
            WorkUnit::Pair { prefix, .. } => format!("{prefix}_merged_output.csv"),
            WorkUnit::Single(path) => {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("{stem}_output.csv")
            }
        };
        output_dir.join(name)
    }
}

/// Split a file list into work units: prefix groups of exactly two become
/// pairs, every other file is processed on its own.
pub fn plan_units(files: &[PathBuf]) -> Vec<WorkUnit> {
    let mut units = Vec::new();
    for (prefix, group) in group_related_files(files) {
        match <[PathBuf; 2]>::try_from(group) {
            Ok(files) => units.push(WorkUnit::Pair { prefix, files }),
            Err(group) => {
                if group.len() > 2 {
                    warn!(
                        "{} files share prefix {prefix}; converting them individually",
                        group.len()
                    );
                }
                units.extend(group.into_iter().map(WorkUnit::Single));
            }
        }
    }
    units.extend(
        files
            .iter()
            .filter(|f| file_prefix(f).is_none())
            .cloned()
            .map(WorkUnit::Single),
    );
    units
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub output_dir: PathBuf,
    pub dialect: Dialect,
    pub parser: ParserOptions,
    /// Worker threads; None uses the global rayon pool.
    pub jobs: Option<usize>,
}

impl BatchOptions {
    pub fn new(output_dir: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self {
            output_dir: output_dir.into(),
            dialect,
            parser: ParserOptions::default(),
            jobs: None,
        }
    }
}

/// File counts for a finished batch. A merged pair counts as two files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub merged: usize,
}

impl Add for BatchSummary {
    type Output = BatchSummary;

    fn add(self, other: BatchSummary) -> BatchSummary {
        BatchSummary {
            succeeded: self.succeeded + other.succeeded,
            failed: self.failed + other.failed,
            merged: self.merged + other.merged,
        }
    }
}

/// Files completed so far out of the batch total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

/// Convert every file, writing one CSV per work unit into the output directory.
///
/// Per-file failures are logged and counted; they never stop the batch.
/// `on_progress` is called after each unit, possibly from worker threads.
pub fn run_batch(
    files: &[PathBuf],
    options: &BatchOptions,
    converter: &dyn DocumentConverter,
    on_progress: &(dyn Fn(Progress) + Sync),
) -> Result<BatchSummary, DexaError> {
    if !options.output_dir.is_dir() {
        return Err(DexaError::MissingOutputDir(options.output_dir.clone()));
    }

    let units = plan_units(files);
    let total: usize = units.iter().map(WorkUnit::file_count).sum();
    let completed = AtomicUsize::new(0);
    info!(
        "converting {total} file(s) in {} unit(s) as dialect {}",
        units.len(),
        options.dialect
    );

    let work = || {
        units
            .par_iter()
            .map(|unit| {
                let summary = process_unit(unit, options, converter);
                let done = completed.fetch_add(unit.file_count(), Ordering::SeqCst) + unit.file_count();
                on_progress(Progress {
                    completed: done,
                    total,
                });
                summary
            })
            .reduce(BatchSummary::default, |a, b| a + b)
    };

    let summary = match options.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(work),
            Err(e) => {
                warn!("could not build a {jobs}-thread pool ({e}); using the global pool");
                work()
            }
        },
        None => work(),
    };

    info!(
        "batch finished: {} succeeded, {} failed, {} merged",
        summary.succeeded, summary.failed, summary.merged
    );
    Ok(summary)
}

fn process_unit(
    unit: &WorkUnit,
    options: &BatchOptions,
    converter: &dyn DocumentConverter,
) -> BatchSummary {
    let output = unit.output_path(&options.output_dir);
    match unit {
        WorkUnit::Single(path) => match convert_file(path, &output, options, converter) {
            Ok(()) => {
                info!("{} -> {}", path.display(), output.display());
                BatchSummary {
                    succeeded: 1,
                    ..Default::default()
                }
            }
            Err(e) => {
                error!("error processing {}: {e}", path.display());
                BatchSummary {
                    failed: 1,
                    ..Default::default()
                }
            }
        },
        WorkUnit::Pair { prefix, files } => {
            match convert_pair(files, &output, options, converter) {
                Ok(()) => {
                    info!("merged prefix {prefix} -> {}", output.display());
                    BatchSummary {
                        succeeded: 2,
                        merged: 1,
                        ..Default::default()
                    }
                }
                Err(e) => {
                    error!("error processing files with prefix {prefix}: {e}");
                    BatchSummary {
                        failed: 2,
                        ..Default::default()
                    }
                }
            }
        }
    }
}

fn convert_file(
    path: &Path,
    output: &Path,
    options: &BatchOptions,
    converter: &dyn DocumentConverter,
) -> Result<(), DexaError> {
    let text = load_text(path, converter)?;
    let report = parse_report_with(&text, &options.parser)?;
    let row = options.dialect.generate(&report)?;
    write_csv(&row, output)
}

fn convert_pair(
    files: &[PathBuf; 2],
    output: &Path,
    options: &BatchOptions,
    converter: &dyn DocumentConverter,
) -> Result<(), DexaError> {
    let first = parse_report_with(&load_text(&files[0], converter)?, &options.parser)?;
    let second = parse_report_with(&load_text(&files[1], converter)?, &options.parser)?;
    let merged = merge_pair(&first, &second)?;
    let row = options.dialect.generate(&merged)?;
    write_csv(&row, output)
}
