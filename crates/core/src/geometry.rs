//! Geometric primitives and coordinate normalization.
//!
//! Provides the page-unit rectangle type, the fixed 0-1000 integer grid
//! used by layout-aware token-classification models, and conversions from
//! engine-native box representations.

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// A rectangle defined by (x0, y0, x1, y1) in page units, top-left origin.
pub type Rect = (f64, f64, f64, f64);

/// A bounding box rescaled to the fixed 0-1000 integer grid.
///
/// Serializes as a 4-element array `[x0, y0, x1, y1]`. After clamping,
/// `x0 <= x1` and `y0 <= y1` hold whenever the input satisfied them;
/// degenerate zero-area boxes are legal and represent clipped or
/// zero-size tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedBox(pub i32, pub i32, pub i32, pub i32);

impl NormalizedBox {
    /// Returns the box as an `[x0, y0, x1, y1]` array.
    pub fn as_array(&self) -> [i32; 4] {
        [self.0, self.1, self.2, self.3]
    }

    /// Vertical center of the box.
    pub fn y_center(&self) -> f64 {
        (self.1 + self.3) as f64 / 2.0
    }
}

/// Maps a box in page units onto the 0-1000 integer grid.
///
/// Coordinates are clamped to the page bounds before scaling (OCR engines
/// routinely overshoot by a pixel or two), and the rounded result is
/// clamped into [0, 1000] a second time because rounding can push a
/// boundary value by one. Ties round to even, so an exact half grid unit
/// maps the same way on every platform.
///
/// Page dimensions must be strictly positive; non-positive dimensions are
/// rejected with [`LayoutError::InvalidPageDimension`].
pub fn normalize_bbox(bbox: Rect, page_width: f64, page_height: f64) -> Result<NormalizedBox> {
    if page_width <= 0.0 || page_height <= 0.0 {
        return Err(LayoutError::InvalidPageDimension {
            width: page_width,
            height: page_height,
        });
    }

    let (x0, y0, x1, y1) = bbox;

    let scale = |v: f64, dim: f64| -> i32 {
        let clamped = v.clamp(0.0, dim);
        ((clamped / dim * 1000.0).round_ties_even() as i64).clamp(0, 1000) as i32
    };

    Ok(NormalizedBox(
        scale(x0, page_width),
        scale(y0, page_height),
        scale(x1, page_width),
        scale(y1, page_height),
    ))
}

/// Axis-aligned hull of a 4-point polygon.
///
/// OCR detectors report rotated quadrilaterals as four corner points; the
/// downstream grid only understands axis-aligned boxes, so take the
/// min/max over both axes.
pub fn bbox_from_quad(quad: &[(f64, f64); 4]) -> Rect {
    let mut xmin = f64::INFINITY;
    let mut ymin = f64::INFINITY;
    let mut xmax = f64::NEG_INFINITY;
    let mut ymax = f64::NEG_INFINITY;
    for &(x, y) in quad {
        xmin = xmin.min(x);
        ymin = ymin.min(y);
        xmax = xmax.max(x);
        ymax = ymax.max(y);
    }
    (xmin, ymin, xmax, ymax)
}
