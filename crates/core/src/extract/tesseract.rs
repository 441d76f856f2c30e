//! OCR word extraction via the `tesseract` command line engine.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{LayoutError, Result};
use crate::extract::{OcrWordSource, PageExtraction, Word, image_dimensions, run_engine};

/// OCR adapter backed by tesseract's TSV output.
///
/// Tesseract reports boxes as left/top/width/height in pixels; they are
/// converted to `(x, y, x+w, y+h)` here. Page dimensions come from the
/// image itself, not the engine.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    /// Path to the `tesseract` binary.
    pub program: PathBuf,
    /// Languages passed via `-l`, joined with `+`.
    pub languages: Vec<String>,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            languages: vec!["eng".to_string()],
        }
    }
}

impl OcrWordSource for TesseractOcr {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn extract_image(&self, image_bytes: &[u8]) -> Result<PageExtraction> {
        let (width, height) = image_dimensions(image_bytes)?;

        let mut command = Command::new(&self.program);
        command.args(["stdin", "stdout", "tsv"]);
        if !self.languages.is_empty() {
            command.arg("-l").arg(self.languages.join("+"));
        }
        let stdout = run_engine(command, Some(image_bytes))?;

        let tsv = String::from_utf8_lossy(&stdout);
        let words = parse_tsv_words(&tsv)?;

        Ok(PageExtraction {
            page_index: 0,
            width: width as f64,
            height: height as f64,
            words,
        })
    }
}

/// Parses word-level rows (level 5) out of tesseract TSV output.
pub(crate) fn parse_tsv_words(tsv: &str) -> Result<Vec<Word>> {
    let mut words = Vec::new();
    for line in tsv.lines().skip(1) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 || fields[0] != "5" {
            continue;
        }
        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }
        let x = parse_field(fields[6])?;
        let y = parse_field(fields[7])?;
        let w = parse_field(fields[8])?;
        let h = parse_field(fields[9])?;
        words.push(Word {
            text: text.to_string(),
            bbox: (x, y, x + w, y + h),
        });
    }
    Ok(words)
}

fn parse_field(raw: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        LayoutError::UnsupportedOrCorruptInput(format!("tsv output: bad coordinate {raw}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV_FIXTURE: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
1\t1\t0\t0\t0\t0\t0\t0\t640\t480\t-1\t\n\
4\t1\t1\t1\t1\t0\t40\t50\t200\t20\t-1\t\n\
5\t1\t1\t1\t1\t1\t40\t50\t90\t20\t96.1\tSummary\n\
5\t1\t1\t1\t1\t2\t140\t52\t60\t18\t91.0\tEngineer\n\
5\t1\t1\t1\t1\t3\t210\t52\t10\t18\t12.0\t \n";

    #[test]
    fn test_parse_tsv_keeps_word_rows_only() {
        let words = parse_tsv_words(TSV_FIXTURE).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "Summary");
        assert_eq!(words[0].bbox, (40.0, 50.0, 130.0, 70.0));
        assert_eq!(words[1].text, "Engineer");
        assert_eq!(words[1].bbox, (140.0, 52.0, 200.0, 70.0));
    }

    #[test]
    fn test_parse_tsv_bad_coordinates_fail() {
        let tsv = "header\n5\t1\t1\t1\t1\t1\tNaNish\t50\t90\t20\t96.1\tword\n";
        assert!(parse_tsv_words(tsv).is_err());
    }
}
