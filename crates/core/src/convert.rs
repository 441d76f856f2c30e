//! DOCX to PDF conversion collaborator.
//!
//! Conversion itself is delegated to an external converter (LibreOffice
//! by default); this module only manages the scoped conversion context: a
//! scratch directory acquired once per call and released on every exit
//! path, including errors, by RAII drop.

use std::fs;
use std::process::Command;

use tracing::debug;

use crate::error::{LayoutError, Result};

/// Default converter invocation, `soffice --headless`.
pub const DEFAULT_CONVERTER: &str = "soffice";

/// Converts DOCX bytes to PDF bytes through an external converter.
///
/// The converter is expected to accept
/// `--headless --convert-to pdf --outdir <dir> <file>` and write
/// `<stem>.pdf` into the output directory.
pub fn docx_to_pdf(docx_bytes: &[u8], converter_program: &str) -> Result<Vec<u8>> {
    let scratch = tempfile::TempDir::new()?;
    let docx_path = scratch.path().join("input.docx");
    fs::write(&docx_path, docx_bytes)?;

    debug!(converter = converter_program, "converting docx to pdf");
    let output = Command::new(converter_program)
        .args(["--headless", "--convert-to", "pdf", "--outdir"])
        .arg(scratch.path())
        .arg(&docx_path)
        .output()
        .map_err(|e| LayoutError::EngineFailure(format!("{converter_program}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LayoutError::UnsupportedOrCorruptInput(format!(
            "converter exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let pdf_path = scratch.path().join("input.pdf");
    fs::read(&pdf_path).map_err(|_| {
        LayoutError::UnsupportedOrCorruptInput("converter produced no PDF output".to_string())
    })
}
