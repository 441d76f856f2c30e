//! vitae - resume layout extraction and heuristic section segmentation.
//!
//! Turns heterogeneous per-page word/box extraction outputs (PDF text
//! layer or OCR engines) into one normalized representation with boxes on
//! a fixed 0-1000 grid, and offers a rule-based grouping of tokens into
//! named resume sections as a fallback for layout-aware models.

pub mod builder;
pub mod convert;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod pipeline;
pub mod segment;

pub use builder::{PageInput, build_page_input, build_page_inputs, build_page_inputs_from_images};
pub use error::{LayoutError, Result};
pub use extract::{
    MupdfTextSource, OcrWordSource, PageExtraction, PopplerTextSource, QuadJsonOcr, TesseractOcr,
    TextLayerSource, Word,
};
pub use geometry::{NormalizedBox, Rect, bbox_from_quad, normalize_bbox};
pub use pipeline::{DocumentResult, ProcessOptions, extract_resume_text, process_document};
pub use segment::{SectionGroups, SectionLexicon, segment_sections};
