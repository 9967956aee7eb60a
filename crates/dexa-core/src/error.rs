use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DexaError {
    #[error("unrecognized report layout: neither 'BODY COMPOSITION: Total Body (Enhanced Analysis)' nor 'Total Body Custom Results' found")]
    UnrecognizedLayout,

    #[error("no region data could be parsed from the report")]
    EmptyReport,

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("region '{region}' has no usable '{field}' value")]
    InvalidField { region: String, field: String },

    #[error("cannot merge reports: {0}")]
    MergeFormat(String),

    #[error("document conversion failed: {0}")]
    Extraction(String),

    #[error("mutool not found. Install MuPDF: brew install mupdf-tools (macOS) or apt install mupdf-tools (Linux)")]
    MutoolNotFound,

    #[error("mutool failed with exit code {code}: {stderr}")]
    MutoolFailed { code: i32, stderr: String },

    #[error("output directory {0} does not exist")]
    MissingOutputDir(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
