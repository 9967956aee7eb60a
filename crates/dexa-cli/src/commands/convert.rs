use dexa_core::batch::{run_batch, BatchOptions, BatchSummary};
use dexa_core::error::DexaError;
use dexa_core::extraction::is_xps;
use dexa_core::extraction::mutool::MutoolConverter;
use dexa_core::generate::Dialect;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

pub fn run(
    files: Vec<PathBuf>,
    out_dir: PathBuf,
    dialect: Dialect,
    jobs: Option<usize>,
) -> Result<(), DexaError> {
    if files.iter().any(|f| is_xps(f)) && !MutoolConverter::is_available() {
        log::warn!("mutool not found; XPS files will fail to convert");
    }

    let mut options = BatchOptions::new(out_dir, dialect);
    options.jobs = jobs;

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} files")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let converter = MutoolConverter::new();
    let summary = run_batch(&files, &options, &converter, &|progress| {
        bar.set_position(progress.completed as u64)
    });
    bar.finish_and_clear();

    let summary = summary?;
    print_summary(&summary, &options);
    Ok(())
}

fn print_summary(summary: &BatchSummary, options: &BatchOptions) {
    println!("Conversion complete (dialect {}).", options.dialect);
    if summary.merged > 0 {
        println!(
            "Successfully merged: {} pairs ({} files)",
            summary.merged,
            summary.merged * 2
        );
    }
    println!("Successfully processed: {} files", summary.succeeded);
    if summary.failed > 0 {
        println!("Errors encountered: {} files", summary.failed);
    }
    println!("Output directory: {}", options.output_dir.display());
}
