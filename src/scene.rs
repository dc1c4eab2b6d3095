//! # Pixel Scene Graph
//!
//! The derived, disposable view of a document: pages and elements resolved
//! from physical units into pixel rectangles, ready for a host to paint.
//! The scene is rebuilt in full on every render pass — layout is idempotent,
//! never incremental — and the document's physical coordinates remain the
//! source of truth throughout.
//!
//! Each element type has its own renderer. Rotation is carried as a pure
//! rotation about the node's top-left corner (reference behavior). Locked
//! elements are rendered with `selectable = false` and can never enter the
//! selection state.

use crate::geometry::{Matrix, Rect};
use crate::measure;
use crate::model::{BackgroundSpec, ElementSpec, ResolvedMeasure, TextAlign};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Rough advance width of a glyph as a fraction of the font size, used to
/// estimate text extents. A headless core has no font metrics; the host
/// replaces the estimate with the measured box via `Editor::set_node_bounds`.
const TEXT_ADVANCE_RATIO: f64 = 0.6;

/// Line box height as a fraction of the font size.
const TEXT_LINE_RATIO: f64 = 1.2;

/// Identifies a scene node across rebuilds of the same render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub u32);

/// The pixel-space visual payload of a node.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Visual {
    #[serde(rename_all = "camelCase")]
    Text {
        content: String,
        /// Font size in pixels (converted from points).
        font_px: f64,
        color: Option<String>,
        align: TextAlign,
        font: Option<String>,
        bold: bool,
        italic: bool,
        underline: bool,
    },
    #[serde(rename_all = "camelCase")]
    Image { src: String },
    #[serde(rename_all = "camelCase")]
    Vector {
        /// SVG markup with its fill attributes rewritten.
        markup: String,
    },
}

/// One positioned, sized visual in a page's pixel space.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: NodeId,
    /// Index of the backing element in the owning page's element list.
    pub element_index: usize,
    /// Page-local pixel rectangle, before the page-level scale transform.
    pub frame: Rect,
    /// Rotation in degrees about the frame's top-left corner.
    pub rotate: f64,
    /// False for locked elements; such nodes never receive pointer handling.
    pub selectable: bool,
    pub visual: Visual,
}

impl SceneNode {
    /// The node's own transform: a pure rotation about its top-left origin.
    pub fn transform(&self) -> Matrix {
        if self.rotate == 0.0 {
            Matrix::identity()
        } else {
            Matrix::rotate_deg(self.rotate)
        }
    }
}

/// A page's pixel container: its frame, background, overlay guides and
/// rendered nodes. Owned 1:1 by the render engine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePage {
    pub index: usize,
    /// Page size in document pixel space. Position is always (0, 0); the
    /// centered translate+scale placement lives in the host transform.
    pub frame: Rect,
    pub background: BackgroundSpec,
    /// Bleed guide overlay, inset from the page edge.
    pub bleed: Rect,
    /// Cut line overlay, inset from the page edge.
    pub cut: Rect,
    pub nodes: Vec<SceneNode>,
    /// Exactly one page in a scene is active (visible) at a time.
    pub active: bool,
}

impl ScenePage {
    pub fn new(index: usize, background: BackgroundSpec, measure: &ResolvedMeasure) -> Self {
        let frame = Rect::new(0.0, 0.0, measure.px_width, measure.px_height);
        Self {
            index,
            frame,
            background,
            bleed: frame.inset(measure.px_bleed),
            cut: frame.inset(measure.px_cut),
            nodes: Vec::new(),
            active: false,
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }
}

/// The complete pixel scene for a rendered document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub measure: ResolvedMeasure,
    pub pages: Vec<ScenePage>,
    /// Uniform scale factor mapping document pixel space to client space.
    pub scale: f64,
}

impl Scene {
    pub fn node(&self, id: NodeId) -> Option<(&ScenePage, &SceneNode)> {
        self.pages
            .iter()
            .find_map(|p| p.node(id).map(|n| (p, n)))
    }

    /// The page that owns `id`.
    pub fn page_of(&self, id: NodeId) -> Option<usize> {
        self.pages
            .iter()
            .position(|p| p.nodes.iter().any(|n| n.id == id))
    }
}

/// Render one element into a scene node. `vector_markup` carries the
/// already-fetched, recolored SVG source for vector elements; text and
/// image elements ignore it.
pub fn render_element(
    id: NodeId,
    element_index: usize,
    element: &ElementSpec,
    measure: &ResolvedMeasure,
    vector_markup: Option<String>,
) -> SceneNode {
    let (frame, visual) = match element {
        ElementSpec::Text {
            x,
            y,
            text,
            size,
            color,
            align,
            font,
            bold,
            italic,
            underline,
            ..
        } => {
            let font_px = measure::pt_to_px(*size);
            let frame = Rect::new(
                measure.to_px(*x),
                measure.to_px(*y),
                text.chars().count() as f64 * font_px * TEXT_ADVANCE_RATIO,
                font_px * TEXT_LINE_RATIO,
            );
            (
                frame,
                Visual::Text {
                    content: text.clone(),
                    font_px,
                    color: color.clone(),
                    align: *align,
                    font: font.clone(),
                    bold: *bold,
                    italic: *italic,
                    underline: *underline,
                },
            )
        }
        ElementSpec::Image {
            x,
            y,
            width,
            height,
            src,
            ..
        } => (
            Rect::new(
                measure.to_px(*x),
                measure.to_px(*y),
                measure.to_px(*width),
                measure.to_px(*height),
            ),
            Visual::Image { src: src.clone() },
        ),
        ElementSpec::Vector {
            x,
            y,
            width,
            height,
            ..
        } => (
            Rect::new(
                measure.to_px(*x),
                measure.to_px(*y),
                measure.to_px(*width),
                measure.to_px(*height),
            ),
            Visual::Vector {
                markup: vector_markup.unwrap_or_default(),
            },
        ),
    };

    SceneNode {
        id,
        element_index,
        frame,
        rotate: element.rotate(),
        selectable: !element.locked(),
        visual,
    }
}

fn fill_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Matches fill="#abc", fill='rgb(...)', fill="rgba(...)" and named
        // colors, with either quote style.
        Regex::new(r#"(?i)fill\s*=\s*(['"])(#[0-9a-f]{3,8}|rgb\([^)]*\)|rgba\([^)]*\)|[a-z]+)['"]"#)
            .expect("fill pattern compiles")
    })
}

/// Rewrite every `fill` attribute in `markup` to `color`. Markup without a
/// fill attribute is returned unchanged.
pub fn recolor_fill(markup: &str, color: &str) -> String {
    fill_pattern()
        .replace_all(markup, format!("fill=\"{color}\""))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::Unit;
    use crate::model::MeasureSpec;

    fn resolved() -> ResolvedMeasure {
        MeasureSpec {
            unit: Unit::Mm,
            dpi: 300.0,
            width: 85.0,
            height: 55.0,
            bleed: 5.0,
            cut: 3.0,
        }
        .resolve()
    }

    #[test]
    fn page_overlays_inset_by_pixel_margins() {
        let m = resolved();
        let page = ScenePage::new(0, BackgroundSpec::default(), &m);
        assert_eq!(page.bleed.x, m.px_bleed);
        assert_eq!(page.bleed.w, m.px_width - m.px_bleed * 2.0);
        assert_eq!(page.cut.y, m.px_cut);
        assert_eq!(page.cut.h, m.px_height - m.px_cut * 2.0);
    }

    #[test]
    fn image_frame_converts_all_four_fields() {
        let m = resolved();
        let node = render_element(
            NodeId(1),
            0,
            &ElementSpec::image(30.0, 40.0, 25.0, 13.0, "sample.png"),
            &m,
            None,
        );
        assert!((node.frame.x - m.to_px(30.0)).abs() < 1e-9);
        assert!((node.frame.y - m.to_px(40.0)).abs() < 1e-9);
        assert!((node.frame.w - m.to_px(25.0)).abs() < 1e-9);
        assert!((node.frame.h - m.to_px(13.0)).abs() < 1e-9);
        assert!(node.selectable);
    }

    #[test]
    fn text_font_size_uses_point_ratio() {
        let m = resolved();
        let node = render_element(
            NodeId(2),
            0,
            &ElementSpec::text(15.0, 10.0, "Sample text", 21.0),
            &m,
            None,
        );
        match &node.visual {
            Visual::Text { font_px, .. } => assert!((font_px - 28.0).abs() < 1e-9),
            other => panic!("expected text visual, got {other:?}"),
        }
    }

    #[test]
    fn locked_elements_are_not_selectable() {
        let m = resolved();
        let mut spec = ElementSpec::image(0.0, 0.0, 10.0, 10.0, "a.png");
        if let ElementSpec::Image { locked, .. } = &mut spec {
            *locked = true;
        }
        let node = render_element(NodeId(3), 0, &spec, &m, None);
        assert!(!node.selectable);
    }

    #[test]
    fn recolor_replaces_hex_rgb_and_named_fills() {
        let svg = r##"<svg><rect fill="#ff0000"/><circle fill='rgb(1, 2, 3)'/><path fill="rebeccapurple"/></svg>"##;
        let out = recolor_fill(svg, "#4b4c48ff");
        assert_eq!(out.matches("fill=\"#4b4c48ff\"").count(), 3);
        assert!(!out.contains("ff0000"));
    }

    #[test]
    fn recolor_leaves_other_attributes_alone() {
        let svg = r##"<rect stroke="#00ff00" fill-opacity="0.5"/>"##;
        assert_eq!(recolor_fill(svg, "#000"), svg);
    }

    #[test]
    fn zero_rotation_is_identity_transform() {
        let m = resolved();
        let node = render_element(
            NodeId(4),
            0,
            &ElementSpec::text(0.0, 0.0, "x", 12.0),
            &m,
            None,
        );
        assert!(node.transform().is_identity());
    }
}
