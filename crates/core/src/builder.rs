//! Page input builder.
//!
//! Combines the extraction adapters with the coordinate normalizer to
//! produce the per-page parallel token/box arrays consumed by layout
//! models and the heuristic segmenter.

use image::DynamicImage;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::extract::{OcrWordSource, PageExtraction};
use crate::geometry::{NormalizedBox, Rect, normalize_bbox};

/// Model-ready input for one page.
///
/// Invariant: `tokens`, `bboxes` and `original_bboxes` stay parallel and
/// equal in length to the source extraction's word count. Consumed
/// read-only downstream.
#[derive(Debug, Clone, Serialize)]
pub struct PageInput {
    pub page_index: usize,
    /// Decoded page image for downstream visual overlay. Populated on the
    /// image/OCR path; optionally attached later on the text-layer path.
    #[serde(skip)]
    pub page_image: Option<DynamicImage>,
    pub tokens: Vec<String>,
    pub bboxes: Vec<NormalizedBox>,
    pub original_bboxes: Vec<Rect>,
    pub width: f64,
    pub height: f64,
}

impl PageInput {
    /// Attaches a rendered page image after the fact.
    ///
    /// The text-layer path does not render pages itself; callers that
    /// re-render the source for visualization hang the result here.
    pub fn attach_image(&mut self, image: DynamicImage) {
        self.page_image = Some(image);
    }
}

/// Builds the parallel token/box arrays for a single extracted page.
pub fn build_page_input(extraction: PageExtraction) -> Result<PageInput> {
    let PageExtraction {
        page_index,
        width,
        height,
        words,
    } = extraction;

    let mut tokens = Vec::with_capacity(words.len());
    let mut bboxes = Vec::with_capacity(words.len());
    let mut original_bboxes = Vec::with_capacity(words.len());

    for word in words {
        bboxes.push(normalize_bbox(word.bbox, width, height)?);
        original_bboxes.push(word.bbox);
        tokens.push(word.text);
    }

    Ok(PageInput {
        page_index,
        page_image: None,
        tokens,
        bboxes,
        original_bboxes,
        width,
        height,
    })
}

/// Builds page inputs for a whole text-layer extraction.
///
/// A page with invalid dimensions is skipped with a warning rather than
/// failing the document.
pub fn build_page_inputs(pages: Vec<PageExtraction>) -> Vec<PageInput> {
    let mut out = Vec::with_capacity(pages.len());
    for page in pages {
        let page_index = page.page_index;
        match build_page_input(page) {
            Ok(input) => out.push(input),
            Err(e) => warn!(page_index, error = %e, "skipping page"),
        }
    }
    out
}

/// Runs OCR on one page image and builds its page input.
///
/// The decoded image is retained for later visual overlay. If the bytes
/// were recognized by the engine but cannot be decoded locally, the page
/// survives without an attached image.
pub fn build_image_page(
    page_index: usize,
    image_bytes: &[u8],
    engine: &dyn OcrWordSource,
) -> Result<PageInput> {
    let mut extraction = engine.extract_image(image_bytes)?;
    extraction.page_index = page_index;
    let mut input = build_page_input(extraction)?;

    match image::load_from_memory(image_bytes) {
        Ok(img) => input.page_image = Some(img),
        Err(e) => warn!(page_index, error = %e, "page image could not be decoded"),
    }

    Ok(input)
}

/// Builds page inputs for a sequence of page images, one OCR call each.
///
/// Page indices follow input order; a failing page is skipped with a
/// warning.
pub fn build_page_inputs_from_images(
    images: &[Vec<u8>],
    engine: &dyn OcrWordSource,
) -> Vec<PageInput> {
    let mut out = Vec::with_capacity(images.len());
    for (page_index, bytes) in images.iter().enumerate() {
        match build_image_page(page_index, bytes, engine) {
            Ok(input) => out.push(input),
            Err(e) => warn!(page_index, engine = engine.name(), error = %e, "skipping page"),
        }
    }
    out
}
