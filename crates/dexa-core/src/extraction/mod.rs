pub mod mutool;

use crate::error::DexaError;
use std::path::Path;

/// Extension of the page-description documents the scanner software exports.
pub const XPS_EXTENSION: &str = "xps";

/// Trait for page-description to text conversion backends.
pub trait DocumentConverter: Send + Sync {
    /// Convert document bytes to plain text, pages separated by blank lines.
    fn convert(&self, document: &[u8]) -> Result<String, DexaError>;

    /// Name of this conversion backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Load the text of one input file.
///
/// `.xps` files (any case) go through the converter; anything else is read
/// as text, replacing invalid UTF-8.
pub fn load_text(path: &Path, converter: &dyn DocumentConverter) -> Result<String, DexaError> {
    let bytes = std::fs::read(path)?;
    if is_xps(path) {
        log::debug!(
            "converting {} with {}",
            path.display(),
            converter.backend_name()
        );
        converter.convert(&bytes)
    } else {
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub fn is_xps(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(XPS_EXTENSION))
        .unwrap_or(false)
}
