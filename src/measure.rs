//! # Unit Conversion
//!
//! Pure conversion functions between the document's physical authoring units
//! (millimeters, inches, points) and pixels at a given DPI, plus the
//! best-fit scale calculation used to shrink a page into the viewport.
//!
//! Conversions are deliberately permissive: a value or DPI that fails the
//! validity check is passed through unchanged instead of erroring, because a
//! single bad field must never hard-fail an entire layout pass. Callers that
//! need to reject bad measures up front do so at validation time, not here.

use serde::{Deserialize, Serialize};

/// Smallest value accepted as a usable physical measure or DPI.
pub const MIN_VALID_MEASURE: f64 = 0.01;

/// Padding in viewport pixels reserved on both axes when fitting a page.
pub const FIT_PADDING: f64 = 100.0;

/// The physical unit a document is authored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    /// Millimeters.
    #[default]
    #[serde(rename = "mm")]
    Mm,
    /// Inches.
    #[serde(rename = "in")]
    In,
}

impl Unit {
    /// Convert a physical value in this unit to pixels at `dpi`.
    pub fn to_px(self, value: f64, dpi: f64) -> f64 {
        match self {
            Unit::Mm => mm_to_px(value, dpi),
            Unit::In => in_to_px(value, dpi),
        }
    }

    /// Convert pixels back to a physical value in this unit at `dpi`.
    pub fn from_px(self, px: f64, dpi: f64) -> f64 {
        match self {
            Unit::Mm => px_to_mm(px, dpi),
            Unit::In => px_to_in(px, dpi),
        }
    }
}

/// A measure is usable when it is a finite number of at least 0.01.
pub fn is_valid_measure(value: f64) -> bool {
    value.is_finite() && value >= MIN_VALID_MEASURE
}

/// Millimeters to pixels at `dpi`. Passes `mm` through unchanged when either
/// argument is not a valid measure.
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    if !is_valid_measure(mm) || !is_valid_measure(dpi) {
        return mm;
    }
    mm * dpi / 25.4
}

/// Inches to pixels at `dpi`. Same pass-through policy as [`mm_to_px`].
pub fn in_to_px(inches: f64, dpi: f64) -> f64 {
    if !is_valid_measure(inches) || !is_valid_measure(dpi) {
        return inches;
    }
    inches * dpi
}

/// Pixels to millimeters at `dpi`. Inverse of [`mm_to_px`].
pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
    if !is_valid_measure(px) || !is_valid_measure(dpi) {
        return px;
    }
    px * 25.4 / dpi
}

/// Pixels to inches at `dpi`. Inverse of [`in_to_px`].
pub fn px_to_in(px: f64, dpi: f64) -> f64 {
    if !is_valid_measure(px) || !is_valid_measure(dpi) {
        return px;
    }
    px / dpi
}

/// Points to pixels using the CSS ratio 96px / 72pt.
pub fn pt_to_px(pt: f64) -> f64 {
    pt * 96.0 / 72.0
}

/// Pixels to points using the CSS ratio 72pt / 96px.
pub fn px_to_pt(px: f64) -> f64 {
    px * 72.0 / 96.0
}

/// Uniform scale that fits `content_w × content_h` into the viewport minus
/// [`FIT_PADDING`] on both axes. Never scales up past 1.0, and only shrinks
/// an axis that actually overflows.
pub fn fit_scale(content_w: f64, content_h: f64, viewport_w: f64, viewport_h: f64) -> f64 {
    let mut scale = 1.0;

    if content_w > viewport_w - FIT_PADDING {
        scale = (viewport_w - FIT_PADDING) / content_w;
    }
    if content_h > viewport_h - FIT_PADDING {
        scale = scale.min((viewport_h - FIT_PADDING) / content_h);
    }

    scale
}
