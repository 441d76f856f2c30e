//! Error types for the extraction pipeline.

use thiserror::Error;

/// Errors raised by the layout extraction components.
///
/// Component-level errors are precise and typed; the pipeline orchestrator
/// is the only layer that converts them into degraded-but-successful
/// results (fewer pages, empty sections).
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid page dimensions: {width}x{height}")]
    InvalidPageDimension { width: f64, height: f64 },

    #[error("unsupported or corrupt input: {0}")]
    UnsupportedOrCorruptInput(String),

    #[error("extraction engine failure: {0}")]
    EngineFailure(String),

    #[error("page {page_index} extraction exceeded its time budget")]
    ProcessingTimeout { page_index: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for LayoutError.
pub type Result<T> = std::result::Result<T, LayoutError>;
