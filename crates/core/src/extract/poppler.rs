//! Text-layer extraction via poppler's `pdftotext -bbox`.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use roxmltree::{Document, ParsingOptions};

use crate::error::{LayoutError, Result};
use crate::extract::{PageExtraction, TextLayerSource, Word, run_engine};

/// Word-box extractor backed by poppler's `pdftotext` in bbox mode.
///
/// The engine emits an XHTML document with one `<page>` element per page
/// and a `<word xMin yMin xMax yMax>` element per word, coordinates in
/// PDF points with a top-left origin.
#[derive(Debug, Clone)]
pub struct PopplerTextSource {
    /// Path to the `pdftotext` binary.
    pub program: PathBuf,
}

impl Default for PopplerTextSource {
    fn default() -> Self {
        Self {
            program: PathBuf::from("pdftotext"),
        }
    }
}

impl TextLayerSource for PopplerTextSource {
    fn name(&self) -> &'static str {
        "pdftotext"
    }

    fn extract(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>> {
        if pdf_bytes.len() < 8 || !pdf_bytes.starts_with(b"%PDF-") {
            return Err(LayoutError::UnsupportedOrCorruptInput(
                "missing PDF header".to_string(),
            ));
        }

        // pdftotext wants a file path; stage the bytes in a scratch file
        // that is removed again when this call returns.
        let mut scratch = tempfile::NamedTempFile::new()?;
        scratch.write_all(pdf_bytes)?;
        scratch.flush()?;

        let mut command = Command::new(&self.program);
        command.arg("-bbox").arg(scratch.path()).arg("-");
        let stdout = run_engine(command, None)?;

        let xml = String::from_utf8_lossy(&stdout);
        parse_bbox_document(&xml)
    }
}

/// Parses the XHTML word list produced by `pdftotext -bbox`.
pub(crate) fn parse_bbox_document(xml: &str) -> Result<Vec<PageExtraction>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| LayoutError::UnsupportedOrCorruptInput(format!("bbox output: {e}")))?;

    let mut pages = Vec::new();
    for node in doc.descendants() {
        if node.tag_name().name() != "page" {
            continue;
        }
        let width = float_attr(&node, "width")?;
        let height = float_attr(&node, "height")?;

        let mut words = Vec::new();
        for word in node.children() {
            if word.tag_name().name() != "word" {
                continue;
            }
            let text = word.text().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }
            words.push(Word {
                text: text.to_string(),
                bbox: (
                    float_attr(&word, "xMin")?,
                    float_attr(&word, "yMin")?,
                    float_attr(&word, "xMax")?,
                    float_attr(&word, "yMax")?,
                ),
            });
        }

        pages.push(PageExtraction {
            page_index: pages.len(),
            width,
            height,
            words,
        });
    }

    if pages.is_empty() {
        return Err(LayoutError::UnsupportedOrCorruptInput(
            "bbox output contained no pages".to_string(),
        ));
    }
    Ok(pages)
}

fn float_attr(node: &roxmltree::Node<'_, '_>, name: &str) -> Result<f64> {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| {
            LayoutError::UnsupportedOrCorruptInput(format!(
                "bbox output: missing or invalid attribute {name}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BBOX_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" lang="en" xml:lang="en">
<head><title></title></head>
<body>
<doc>
  <page width="612.000000" height="792.000000">
    <word xMin="72.000000" yMin="74.500000" xMax="135.200000" yMax="88.100000">Experience</word>
    <word xMin="72.000000" yMin="96.000000" xMax="98.400000" yMax="108.000000">Built</word>
    <word xMin="102.000000" yMin="96.000000" xMax="150.000000" yMax="108.000000">systems</word>
  </page>
  <page width="612.000000" height="792.000000">
  </page>
</doc>
</body>
</html>"#;

    #[test]
    fn test_parse_bbox_document_pages_and_words() {
        let pages = parse_bbox_document(BBOX_FIXTURE).unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page_index, 0);
        assert_eq!(pages[0].width, 612.0);
        assert_eq!(pages[0].height, 792.0);
        assert_eq!(pages[0].words.len(), 3);
        assert_eq!(pages[0].words[0].text, "Experience");
        assert_eq!(pages[0].words[0].bbox, (72.0, 74.5, 135.2, 88.1));
        assert!(pages[1].words.is_empty());
        assert_eq!(pages[1].page_index, 1);
    }

    #[test]
    fn test_parse_bbox_document_rejects_garbage() {
        let err = parse_bbox_document("this is not xml").unwrap_err();
        assert!(matches!(err, LayoutError::UnsupportedOrCorruptInput(_)));
    }

    #[test]
    fn test_extract_rejects_non_pdf_bytes() {
        let source = PopplerTextSource::default();
        let err = source.extract(b"garbage bytes here").unwrap_err();
        assert!(matches!(err, LayoutError::UnsupportedOrCorruptInput(_)));
    }
}
