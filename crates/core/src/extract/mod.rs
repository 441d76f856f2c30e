//! Word/box extraction sources.
//!
//! Heterogeneous extractors (PDF text layer, OCR engines) are unified
//! behind two small traits so everything downstream is engine-agnostic.
//! Each adapter converts its engine's native output into the common
//! [`PageExtraction`] record.

pub mod mupdf;
pub mod poppler;
pub mod quadjson;
pub mod tesseract;

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{LayoutError, Result};
use crate::geometry::Rect;

pub use mupdf::MupdfTextSource;
pub use poppler::PopplerTextSource;
pub use quadjson::QuadJsonOcr;
pub use tesseract::TesseractOcr;

/// A single extracted word with its tight bounding box in source units.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: Rect,
}

/// Per-page extraction output, identical in shape across all sources.
///
/// Word order follows the source engine's natural reading/detection
/// order, which is not guaranteed to match visual reading order for OCR
/// sources. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtraction {
    pub page_index: usize,
    pub width: f64,
    pub height: f64,
    pub words: Vec<Word>,
}

/// A source of word boxes from a document's embedded text layer.
///
/// One call covers the whole document and yields one [`PageExtraction`]
/// per page, with coordinates in PDF points. A source that cannot parse
/// the bytes as the claimed format must fail with
/// [`LayoutError::UnsupportedOrCorruptInput`], never return an empty
/// result that masks a real parse error.
pub trait TextLayerSource {
    /// Short engine name used in logs.
    fn name(&self) -> &'static str;

    fn extract(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>>;
}

/// A source of word boxes from a single page image via optical
/// recognition.
///
/// The returned `page_index` is always 0; the caller re-indexes when
/// aggregating multiple images into a document. Implementations must be
/// safe to call from multiple threads (`Send + Sync`) so pages can be
/// recognized independently.
pub trait OcrWordSource: Send + Sync {
    /// Short engine name used in logs.
    fn name(&self) -> &'static str;

    fn extract_image(&self, image_bytes: &[u8]) -> Result<PageExtraction>;
}

/// Runs an external extraction engine, feeding `input` on stdin and
/// capturing stdout.
///
/// A missing or crashing binary is an engine failure; a non-zero exit
/// means the engine rejected the input.
pub(crate) fn run_engine(mut command: Command, input: Option<&[u8]>) -> Result<Vec<u8>> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command
        .spawn()
        .map_err(|e| LayoutError::EngineFailure(format!("{:?}: {}", command.get_program(), e)))?;

    if let Some(bytes) = input {
        // The child may exit before consuming all of stdin; a broken pipe
        // here is reported through the exit status instead.
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(bytes);
        }
    }

    let output = child
        .wait_with_output()
        .map_err(|e| LayoutError::EngineFailure(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LayoutError::UnsupportedOrCorruptInput(format!(
            "{:?} exited with {}: {}",
            command.get_program(),
            output.status,
            stderr.trim()
        )));
    }

    Ok(output.stdout)
}

/// Probes image bytes for their pixel dimensions.
pub(crate) fn image_dimensions(image_bytes: &[u8]) -> Result<(u32, u32)> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| LayoutError::UnsupportedOrCorruptInput(format!("not a decodable image: {e}")))?;
    Ok((img.width(), img.height()))
}
