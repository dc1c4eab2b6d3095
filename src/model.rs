//! # Document Model
//!
//! The input representation for the editor. A template describes a document
//! in physical units: one global measure (size, bleed, cut, DPI, unit) and
//! an ordered sequence of pages, each with a background and a list of
//! placed elements. This is designed to be easily produced by a template
//! store, an upload pipeline, or direct JSON construction.
//!
//! Physical coordinates are the source of truth. Pixel coordinates are a
//! derived, disposable view computed per render pass ([`ResolvedMeasure`])
//! and never edited by hand.

use crate::error::EditorError;
use crate::measure::{self, Unit};
use serde::{Deserialize, Serialize};

/// The global physical measure of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasureSpec {
    /// Authoring unit for every physical field in the template.
    #[serde(default)]
    pub unit: Unit,
    /// Target print resolution. Must be a positive number.
    pub dpi: f64,
    /// Page width in `unit`.
    pub width: f64,
    /// Page height in `unit`.
    pub height: f64,
    /// Bleed safety margin in `unit`, rendered as an overlay guide.
    #[serde(default)]
    pub bleed: f64,
    /// Cut line margin in `unit`, rendered as an overlay guide.
    #[serde(default)]
    pub cut: f64,
}

impl MeasureSpec {
    /// Compute the cached pixel fields for one render pass. Conversions
    /// degrade to pass-through for invalid inputs rather than erroring.
    pub fn resolve(&self) -> ResolvedMeasure {
        ResolvedMeasure {
            spec: self.clone(),
            px_width: self.unit.to_px(self.width, self.dpi),
            px_height: self.unit.to_px(self.height, self.dpi),
            px_bleed: self.unit.to_px(self.bleed, self.dpi),
            px_cut: self.unit.to_px(self.cut, self.dpi),
        }
    }
}

/// A [`MeasureSpec`] plus its derived pixel fields, computed once per render
/// pass. Recomputed via [`MeasureSpec::resolve`] whenever the unit, DPI or
/// any physical dimension changes.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedMeasure {
    pub spec: MeasureSpec,
    pub px_width: f64,
    pub px_height: f64,
    pub px_bleed: f64,
    pub px_cut: f64,
}

impl ResolvedMeasure {
    /// Convert a physical value in the document's unit to pixels.
    pub fn to_px(&self, value: f64) -> f64 {
        self.spec.unit.to_px(value, self.spec.dpi)
    }

    /// Convert pixels back to the document's physical unit.
    pub fn from_px(&self, px: f64) -> f64 {
        self.spec.unit.from_px(px, self.spec.dpi)
    }
}

/// A page background: a solid color and an optional image reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundSpec {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// One printable page: background plus an ordered list of elements.
/// Sequence order is print order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    #[serde(default)]
    pub background: BackgroundSpec,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A placed element. Positional fields are in the document's physical unit;
/// they are converted to pixels only at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementSpec {
    /// A text run.
    #[serde(rename_all = "camelCase")]
    Text {
        x: f64,
        y: f64,
        text: String,
        /// Font size in points.
        size: f64,
        #[serde(default)]
        color: Option<String>,
        #[serde(default)]
        align: TextAlign,
        #[serde(default)]
        rotate: f64,
        #[serde(default)]
        font: Option<String>,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
        #[serde(default)]
        underline: bool,
        /// Locked elements never become selectable.
        #[serde(default)]
        locked: bool,
    },

    /// A raster image.
    #[serde(rename_all = "camelCase")]
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// Opaque URL or data URI, resolved by the host environment.
        src: String,
        #[serde(default)]
        rotate: f64,
        #[serde(default)]
        locked: bool,
    },

    /// A vector shape. The SVG source is fetched as text and recolored.
    #[serde(rename_all = "camelCase")]
    Vector {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// URL of the SVG markup.
        src: String,
        #[serde(default)]
        fill_color: Option<String>,
        #[serde(default)]
        rotate: f64,
        #[serde(default)]
        locked: bool,
    },
}

impl ElementSpec {
    /// Create an unlocked text element with defaults for the cosmetic fields.
    pub fn text(x: f64, y: f64, content: &str, size: f64) -> Self {
        ElementSpec::Text {
            x,
            y,
            text: content.to_string(),
            size,
            color: None,
            align: TextAlign::default(),
            rotate: 0.0,
            font: None,
            bold: false,
            italic: false,
            underline: false,
            locked: false,
        }
    }

    /// Create an unlocked image element.
    pub fn image(x: f64, y: f64, width: f64, height: f64, src: &str) -> Self {
        ElementSpec::Image {
            x,
            y,
            width,
            height,
            src: src.to_string(),
            rotate: 0.0,
            locked: false,
        }
    }

    /// Create an unlocked vector element.
    pub fn vector(x: f64, y: f64, width: f64, height: f64, src: &str) -> Self {
        ElementSpec::Vector {
            x,
            y,
            width,
            height,
            src: src.to_string(),
            fill_color: None,
            rotate: 0.0,
            locked: false,
        }
    }

    pub fn locked(&self) -> bool {
        match self {
            ElementSpec::Text { locked, .. }
            | ElementSpec::Image { locked, .. }
            | ElementSpec::Vector { locked, .. } => *locked,
        }
    }

    pub fn rotate(&self) -> f64 {
        match self {
            ElementSpec::Text { rotate, .. }
            | ElementSpec::Image { rotate, .. }
            | ElementSpec::Vector { rotate, .. } => *rotate,
        }
    }

    /// Position in the document's physical unit.
    pub fn position(&self) -> (f64, f64) {
        match self {
            ElementSpec::Text { x, y, .. }
            | ElementSpec::Image { x, y, .. }
            | ElementSpec::Vector { x, y, .. } => (*x, *y),
        }
    }

    /// Overwrite the position, in the document's physical unit.
    pub fn set_position(&mut self, nx: f64, ny: f64) {
        match self {
            ElementSpec::Text { x, y, .. }
            | ElementSpec::Image { x, y, .. }
            | ElementSpec::Vector { x, y, .. } => {
                *x = nx;
                *y = ny;
            }
        }
    }
}

/// The raw template as submitted by the host. All three top-level objects
/// must be present; anything less is a hard precondition failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSpec {
    /// Host-defined properties (title, asset roots, …). Opaque to the core.
    #[serde(default)]
    pub props: Option<serde_json::Value>,
    #[serde(default)]
    pub measure: Option<MeasureSpec>,
    /// Print sides, in print order. Accepts the legacy `sides` key.
    #[serde(default, alias = "sides")]
    pub pages: Option<Vec<PageSpec>>,
}

impl TemplateSpec {
    /// Parse a template from JSON.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A validated document: the template with all preconditions checked and
/// the `Option` wrappers stripped. Created when a template is loaded and
/// replaced wholesale on re-render.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub props: serde_json::Value,
    pub measure: MeasureSpec,
    pub pages: Vec<PageSpec>,
}

impl Document {
    /// Validate the template shape. Fails without producing a document when
    /// `props`, `measure` or `pages` is missing, when the DPI is unusable or
    /// when any physical dimension is negative.
    pub fn validate(template: TemplateSpec) -> Result<Document, EditorError> {
        let props = template
            .props
            .ok_or_else(|| EditorError::Validation("template is missing `props`".into()))?;
        let measure = template
            .measure
            .ok_or_else(|| EditorError::Validation("template is missing `measure`".into()))?;
        let pages = template
            .pages
            .ok_or_else(|| EditorError::Validation("template is missing `pages`".into()))?;

        if !measure::is_valid_measure(measure.dpi) {
            return Err(EditorError::Validation(format!(
                "measure.dpi must be a positive number, got {}",
                measure.dpi
            )));
        }
        for (name, value) in [
            ("width", measure.width),
            ("height", measure.height),
            ("bleed", measure.bleed),
            ("cut", measure.cut),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EditorError::Validation(format!(
                    "measure.{name} must be a non-negative number, got {value}"
                )));
            }
        }

        Ok(Document {
            props,
            measure,
            pages,
        })
    }
}
