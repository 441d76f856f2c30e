//! Pipeline orchestrator.
//!
//! Chooses the extraction path (text layer vs image/OCR) with fallback
//! and runs the builder and segmenter per page. This is the one layer
//! that converts typed component errors into degraded-but-successful
//! results: callers detect total failure by an empty `pages` sequence,
//! never by a returned error.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use indexmap::IndexMap;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::builder::{PageInput, build_image_page, build_page_inputs};
use crate::error::{LayoutError, Result};
use crate::extract::{OcrWordSource, TextLayerSource};
use crate::segment::{SectionGroups, SectionLexicon, segment_sections};

/// Options for document processing.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Try the PDF text layer before falling back to page images.
    pub prefer_text_layer: bool,

    /// Per-page extraction budget on the OCR path. A page that overruns
    /// is skipped; None waits indefinitely.
    pub page_timeout: Option<Duration>,

    /// Header keyword table for the section segmenter.
    pub lexicon: SectionLexicon,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            prefer_text_layer: true,
            page_timeout: None,
            lexicon: SectionLexicon::default(),
        }
    }
}

/// Aggregated per-document result. Immutable once returned.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentResult {
    pub pages: Vec<PageInput>,
    /// Per-page heuristic section groupings, keyed `page_<page_index>`.
    pub simple_section_groups: IndexMap<String, SectionGroups>,
}

impl DocumentResult {
    fn empty() -> Self {
        Self {
            pages: Vec::new(),
            simple_section_groups: IndexMap::new(),
        }
    }
}

pub(crate) fn default_thread_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Processes one document end to end.
///
/// Supply PDF bytes, page images, or both; images are the fallback when
/// the text layer is unavailable or unusable. Internal failures degrade
/// to fewer or zero pages rather than propagating.
pub fn process_document(
    pdf_bytes: Option<&[u8]>,
    images: Option<&[Vec<u8>]>,
    options: &ProcessOptions,
    text_source: &dyn TextLayerSource,
    ocr: &Arc<dyn OcrWordSource>,
) -> DocumentResult {
    let mut pages: Vec<PageInput> = Vec::new();

    if let Some(bytes) = pdf_bytes
        && options.prefer_text_layer
    {
        match text_source.extract(bytes) {
            Ok(extractions) => {
                debug!(
                    source = text_source.name(),
                    pages = extractions.len(),
                    "text layer extracted"
                );
                pages = build_page_inputs(extractions);
            }
            Err(e) => {
                // Partial results are discarded; the image path starts
                // from scratch.
                warn!(
                    source = text_source.name(),
                    error = %e,
                    "text layer extraction failed, falling back to images"
                );
            }
        }
    }

    if pages.is_empty()
        && let Some(images) = images
        && !images.is_empty()
    {
        pages = ocr_pages(images, options, ocr);
    }

    if pages.is_empty() {
        // No usable input at all: an explicit empty result, not an error.
        return DocumentResult::empty();
    }

    let mut simple_section_groups = IndexMap::with_capacity(pages.len());
    for page in &pages {
        let groups = segment_sections(&page.tokens, &page.bboxes, page.height, &options.lexicon);
        simple_section_groups.insert(format!("page_{}", page.page_index), groups);
    }

    DocumentResult {
        pages,
        simple_section_groups,
    }
}

/// Joins every page's tokens into a plain-text rendition of the resume.
pub fn extract_resume_text(pages: &[PageInput]) -> String {
    pages
        .iter()
        .map(|page| page.tokens.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Recognizes page images on a rayon pool and reassembles the surviving
/// pages in page-index order.
fn ocr_pages(
    images: &[Vec<u8>],
    options: &ProcessOptions,
    engine: &Arc<dyn OcrWordSource>,
) -> Vec<PageInput> {
    let pool = match ThreadPoolBuilder::new()
        .num_threads(default_thread_count())
        .build()
    {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "thread pool unavailable, recognizing pages sequentially");
            return crate::builder::build_page_inputs_from_images(images, engine.as_ref());
        }
    };

    let mut results: Vec<(usize, Result<PageInput>)> = pool.install(|| {
        images
            .par_iter()
            .enumerate()
            .map(|(page_index, bytes)| {
                let result = match options.page_timeout {
                    Some(budget) => {
                        extract_with_deadline(page_index, bytes.clone(), budget, Arc::clone(engine))
                    }
                    None => build_image_page(page_index, bytes, engine.as_ref()),
                };
                (page_index, result)
            })
            .collect()
    });

    results.sort_by_key(|(page_index, _)| *page_index);
    results
        .into_iter()
        .filter_map(|(page_index, result)| match result {
            Ok(page) => Some(page),
            Err(e) => {
                warn!(page_index, engine = engine.name(), error = %e, "skipping page");
                None
            }
        })
        .collect()
}

/// Runs one page extraction under a deadline.
///
/// The work runs on a detached thread; on overrun the result channel is
/// abandoned and the page reported as timed out. A truly wedged engine
/// call leaks its thread rather than hanging the document.
fn extract_with_deadline(
    page_index: usize,
    image_bytes: Vec<u8>,
    budget: Duration,
    engine: Arc<dyn OcrWordSource>,
) -> Result<PageInput> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(build_image_page(page_index, &image_bytes, engine.as_ref()));
    });

    match rx.recv_timeout(budget) {
        Ok(result) => result,
        Err(_) => Err(LayoutError::ProcessingTimeout { page_index }),
    }
}
