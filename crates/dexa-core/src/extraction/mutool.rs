use crate::error::DexaError;
use crate::extraction::{DocumentConverter, XPS_EXTENSION};
use std::io::Write;
use std::process::Command;

/// XPS conversion backend using `mutool draw -F txt` (from MuPDF).
pub struct MutoolConverter;

impl MutoolConverter {
    pub fn new() -> Self {
        MutoolConverter
    }

    /// Check if mutool is available on the system.
    pub fn is_available() -> bool {
        Command::new("mutool")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for MutoolConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentConverter for MutoolConverter {
    fn convert(&self, document: &[u8]) -> Result<String, DexaError> {
        // mutool picks the document handler from the file extension.
        let mut tmpfile = tempfile::Builder::new()
            .suffix(&format!(".{XPS_EXTENSION}"))
            .tempfile()
            .map_err(|e| DexaError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(document)
            .map_err(|e| DexaError::Extraction(e.to_string()))?;

        let output = Command::new("mutool")
            .args(["draw", "-q", "-F", "txt", "-o", "-"])
            .arg(tmpfile.path())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DexaError::MutoolNotFound
                } else {
                    DexaError::Extraction(format!("mutool failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(DexaError::MutoolFailed { code, stderr });
        }

        Ok(join_pages(&String::from_utf8_lossy(&output.stdout)))
    }

    fn backend_name(&self) -> &str {
        "mutool"
    }
}

/// Pages arrive separated by form feeds; join them with a blank line each.
fn join_pages(text: &str) -> String {
    let mut joined = String::with_capacity(text.len());
    for page in text.split('\x0c') {
        joined.push_str(page);
        joined.push_str("\n\n");
    }
    joined
}
