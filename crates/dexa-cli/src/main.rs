mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use dexa_core::generate::Dialect;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "dexa",
    version,
    about = "Convert DEXA body-composition reports into spreadsheet-ready CSV rows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert report files (plain text or XPS) into one CSV per scan
    Convert {
        /// Report files; two files sharing a numeric name prefix are merged
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory the CSV files are written to
        #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
        out_dir: PathBuf,

        /// Output column set
        #[arg(short, long, value_enum, default_value = "a")]
        dialect: DialectArg,

        /// Worker threads (default: one per core)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
    /// Parse a single report and show its regions (without generating columns)
    Parse {
        /// Path to a text or XPS report
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// List the output columns of a dialect
    Columns {
        /// Output column set
        #[arg(short, long, value_enum, default_value = "a")]
        dialect: DialectArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DialectArg {
    /// 55 columns including ASMM and chest-wall aggregates
    A,
    /// 38 columns with region shares of total body fat
    B,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::A => Dialect::A,
            DialectArg::B => Dialect::B,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            files,
            out_dir,
            dialect,
            jobs,
        } => commands::convert::run(files, out_dir, dialect.into(), jobs),
        Commands::Parse { input_file, output } => commands::parse::run(input_file, &output),
        Commands::Columns { dialect } => commands::columns::run(dialect.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// RUST_LOG overrides the level chosen here.
fn setup_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
