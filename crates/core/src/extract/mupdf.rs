//! Text-layer extraction via MuPDF's `mutool draw` structured text output.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{LayoutError, Result};
use crate::extract::{PageExtraction, TextLayerSource, Word, run_engine};
use crate::geometry::{Rect, bbox_from_quad};

/// Word-box extractor backed by MuPDF's `mutool draw -F stext`.
///
/// The stext format reports per-character quads, so words are assembled
/// here: consecutive characters on a line accumulate into one word until
/// a whitespace character ends it, and the word box is the hull of its
/// character quads.
#[derive(Debug, Clone)]
pub struct MupdfTextSource {
    /// Path to the `mutool` binary.
    pub program: PathBuf,
}

impl Default for MupdfTextSource {
    fn default() -> Self {
        Self {
            program: PathBuf::from("mutool"),
        }
    }
}

impl TextLayerSource for MupdfTextSource {
    fn name(&self) -> &'static str {
        "mutool"
    }

    fn extract(&self, pdf_bytes: &[u8]) -> Result<Vec<PageExtraction>> {
        if pdf_bytes.len() < 8 || !pdf_bytes.starts_with(b"%PDF-") {
            return Err(LayoutError::UnsupportedOrCorruptInput(
                "missing PDF header".to_string(),
            ));
        }

        let mut scratch = tempfile::NamedTempFile::new()?;
        scratch.write_all(pdf_bytes)?;
        scratch.flush()?;

        let mut command = Command::new(&self.program);
        command
            .args(["draw", "-F", "stext", "-o", "-"])
            .arg(scratch.path());
        let stdout = run_engine(command, None)?;

        let xml = String::from_utf8_lossy(&stdout);
        parse_stext_document(&xml)
    }
}

/// Parses MuPDF structured text XML into per-page word lists.
pub(crate) fn parse_stext_document(xml: &str) -> Result<Vec<PageExtraction>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| LayoutError::UnsupportedOrCorruptInput(format!("stext output: {e}")))?;

    let mut pages = Vec::new();
    for page in doc.descendants() {
        if page.tag_name().name() != "page" {
            continue;
        }
        let width = float_attr(&page, "width")?;
        let height = float_attr(&page, "height")?;

        let mut words = Vec::new();
        for line in page.descendants() {
            if line.tag_name().name() != "line" {
                continue;
            }
            collect_line_words(&line, &mut words)?;
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
            "stext output contained no pages".to_string(),
        ));
    }
    Ok(pages)
}

/// Accumulates the characters of one stext line into whitespace-delimited
/// words.
fn collect_line_words(line: &Node<'_, '_>, words: &mut Vec<Word>) -> Result<()> {
    let mut text = String::new();
    let mut bbox: Option<Rect> = None;

    for ch in line.descendants() {
        if ch.tag_name().name() != "char" {
            continue;
        }
        let c = ch.attribute("c").unwrap_or("");
        if c.trim().is_empty() {
            flush_word(&mut text, &mut bbox, words);
            continue;
        }
        let quad = parse_quad(ch.attribute("quad").ok_or_else(|| {
            LayoutError::UnsupportedOrCorruptInput("stext output: char without quad".to_string())
        })?)?;
        let hull = bbox_from_quad(&quad);
        bbox = Some(match bbox {
            Some(b) => (
                b.0.min(hull.0),
                b.1.min(hull.1),
                b.2.max(hull.2),
                b.3.max(hull.3),
            ),
            None => hull,
        });
        text.push_str(c);
    }

    flush_word(&mut text, &mut bbox, words);
    Ok(())
}

fn flush_word(text: &mut String, bbox: &mut Option<Rect>, words: &mut Vec<Word>) {
    if let Some(b) = bbox.take() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            words.push(Word {
                text: trimmed.to_string(),
                bbox: b,
            });
        }
    }
    text.clear();
}

fn parse_quad(raw: &str) -> Result<[(f64, f64); 4]> {
    let parts: Vec<&str> = raw.split_ascii_whitespace().collect();
    if parts.len() != 8 {
        return Err(LayoutError::UnsupportedOrCorruptInput(format!(
            "stext output: quad needs 8 values, got {}",
            parts.len()
        )));
    }
    let mut values = [0.0f64; 8];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part.parse::<f64>().map_err(|_| {
            LayoutError::UnsupportedOrCorruptInput(format!("stext output: bad quad value {part}"))
        })?;
    }
    Ok([
        (values[0], values[1]),
        (values[2], values[3]),
        (values[4], values[5]),
        (values[6], values[7]),
    ])
}

fn float_attr(node: &Node<'_, '_>, name: &str) -> Result<f64> {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| {
            LayoutError::UnsupportedOrCorruptInput(format!(
                "stext output: missing or invalid attribute {name}"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEXT_FIXTURE: &str = r#"<?xml version="1.0"?>
<document name="resume.pdf">
<page id="page1" width="612" height="792">
<block bbox="72 74 160 108">
<line bbox="72 74 160 90" wmode="0" dir="1 0">
<font name="Helvetica-Bold" size="12">
<char quad="72 74 80 74 72 90 80 90" x="72" y="88" c="S"/>
<char quad="80 74 88 74 80 90 88 90" x="80" y="88" c="k"/>
<char quad="88 74 96 74 88 90 96 90" x="88" y="88" c="i"/>
<char quad="96 74 104 74 96 90 104 90" x="96" y="88" c="l"/>
<char quad="104 74 112 74 104 90 112 90" x="104" y="88" c="l"/>
<char quad="112 74 120 74 112 90 120 90" x="112" y="88" c="s"/>
</font>
</line>
<line bbox="72 96 160 108" wmode="0" dir="1 0">
<font name="Helvetica" size="10">
<char quad="72 96 78 96 72 108 78 108" x="72" y="106" c="R"/>
<char quad="78 96 84 96 78 108 84 108" x="78" y="106" c="u"/>
<char quad="84 96 90 96 84 108 90 108" x="84" y="106" c="s"/>
<char quad="90 96 96 96 90 108 96 108" x="90" y="106" c="t"/>
<char quad="96 96 100 96 96 108 100 108" x="96" y="106" c=" "/>
<char quad="100 96 106 96 100 108 106 108" x="100" y="106" c="C"/>
<char quad="106 96 112 96 106 108 112 108" x="106" y="106" c="+"/>
<char quad="112 96 118 96 112 108 118 108" x="112" y="106" c="+"/>
</font>
</line>
</block>
</page>
</document>"#;

    #[test]
    fn test_parse_stext_groups_chars_into_words() {
        let pages = parse_stext_document(STEXT_FIXTURE).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].width, 612.0);
        assert_eq!(pages[0].height, 792.0);

        let words = &pages[0].words;
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text, "Skills");
        assert_eq!(words[0].bbox, (72.0, 74.0, 120.0, 90.0));
        assert_eq!(words[1].text, "Rust");
        assert_eq!(words[1].bbox, (72.0, 96.0, 96.0, 108.0));
        assert_eq!(words[2].text, "C++");
        assert_eq!(words[2].bbox, (100.0, 96.0, 118.0, 108.0));
    }

    #[test]
    fn test_parse_stext_rejects_garbage() {
        let err = parse_stext_document("<nope>").unwrap_err();
        assert!(matches!(err, LayoutError::UnsupportedOrCorruptInput(_)));
    }
}
