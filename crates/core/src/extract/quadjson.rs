//! OCR word extraction from quad-reporting recognizers.
//!
//! Detection-based OCR engines (EasyOCR, PaddleOCR and friends) report a
//! rotated 4-point polygon per word rather than an axis-aligned box. This
//! adapter drives any such engine through a small bridge command that
//! writes one JSON record per detection, and reduces each polygon to its
//! axis-aligned hull.

use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;

use crate::error::{LayoutError, Result};
use crate::extract::{OcrWordSource, PageExtraction, Word, image_dimensions, run_engine};
use crate::geometry::bbox_from_quad;

/// One detection record as emitted by the bridge command.
#[derive(Debug, Deserialize)]
struct QuadRecord {
    /// Four corner points, `[[x, y]; 4]`, in detection order.
    quad: [[f64; 2]; 4],
    text: String,
    #[serde(default)]
    #[allow(dead_code)]
    confidence: Option<f64>,
}

/// OCR adapter over an external recognizer that emits JSON-lines quad
/// records on stdout and reads the image from stdin.
#[derive(Debug, Clone)]
pub struct QuadJsonOcr {
    /// Bridge command to invoke.
    pub program: PathBuf,
    /// Extra arguments passed to the bridge command.
    pub args: Vec<String>,
}

impl QuadJsonOcr {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }
}

impl OcrWordSource for QuadJsonOcr {
    fn name(&self) -> &'static str {
        "quad-json"
    }

    fn extract_image(&self, image_bytes: &[u8]) -> Result<PageExtraction> {
        let (width, height) = image_dimensions(image_bytes)?;

        let mut command = Command::new(&self.program);
        command.args(&self.args);
        let stdout = run_engine(command, Some(image_bytes))?;

        let transcript = String::from_utf8_lossy(&stdout);
        let words = parse_quad_records(&transcript)?;

        Ok(PageExtraction {
            page_index: 0,
            width: width as f64,
            height: height as f64,
            words,
        })
    }
}

/// Parses JSON-lines quad records into words with axis-aligned boxes.
pub(crate) fn parse_quad_records(transcript: &str) -> Result<Vec<Word>> {
    let mut words = Vec::new();
    for line in transcript.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: QuadRecord = serde_json::from_str(line).map_err(|e| {
            LayoutError::UnsupportedOrCorruptInput(format!("quad record: {e}"))
        })?;
        let text = record.text.trim();
        if text.is_empty() {
            continue;
        }
        let quad = [
            (record.quad[0][0], record.quad[0][1]),
            (record.quad[1][0], record.quad[1][1]),
            (record.quad[2][0], record.quad[2][1]),
            (record.quad[3][0], record.quad[3][1]),
        ];
        words.push(Word {
            text: text.to_string(),
            bbox: bbox_from_quad(&quad),
        });
    }
    Ok(words)
}
