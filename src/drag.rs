//! # Transform / Drag Controller
//!
//! Selection and drag handling for scene nodes while the page sits under an
//! active `translate(-50%, -50%) scale(s)` transform.
//!
//! Naive client-pixel deltas are wrong under that transform. On drag start
//! the controller captures the wrapper's client-space rectangle and the
//! inverse of the wrapper's own transform matrix; every pointer move is
//! mapped into the wrapper's local coordinate space through that inverse,
//! and the local delta divided by the active scale becomes the position
//! change. This keeps pointer and element tracking 1:1 at any zoom level,
//! with any rotation baked into the wrapper.
//!
//! A drag session is exactly one pointer-down-to-pointer-up interval. At
//! most one wrapper exists at a time: activating a node tears down any
//! previous wrapper first, writing its position back through to the
//! document's physical coordinates.

use crate::geometry::{Matrix, Point, Rect, Viewport};
use crate::model::Document;
use crate::scene::{NodeId, Scene};
use serde::Serialize;
use tracing::debug;

/// Padding between the wrapped node and the wrapper border, in document
/// pixels.
pub const WRAPPER_PADDING: f64 = 2.0;

/// Duration of the snap-to-corner animation the host should play.
pub const SNAP_DURATION_MS: u32 = 200;

/// A page corner a fully-out wrapper snaps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// The outcome of a drop that landed fully outside the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snap {
    pub corner: Corner,
    pub from: Point,
    pub to: Point,
    /// Host animates `from → to` over this duration, then clears the
    /// transition style.
    pub duration_ms: u32,
}

/// The transient container around the selected node. Carries the node's
/// rotation transform so the node itself stays untransformed while wrapped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wrapper {
    pub node: NodeId,
    pub page_index: usize,
    /// Page-local pixel frame, offset by [`WRAPPER_PADDING`] from the
    /// node's own frame.
    pub frame: Rect,
    pub transform: Matrix,
}

#[derive(Debug, Clone)]
struct DragSession {
    /// Client-space origin of the wrapper at drag start.
    client_origin: Point,
    /// Inverse of the wrapper transform, locked at drag start.
    inverse: Matrix,
    /// Pointer position in wrapper-local space at the last move. Deltas are
    /// applied incrementally so a mid-drag scale change only affects
    /// movement from that moment on — no jump.
    last_local: Point,
}

/// Owns the process-wide selection: at most one wrapped node, and at most
/// one live drag session inside it.
#[derive(Debug, Default)]
pub struct DragController {
    wrapper: Option<Wrapper>,
    drag: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current selection's wrapper, if any.
    pub fn selection(&self) -> Option<&Wrapper> {
        self.wrapper.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Activate a node as the selection. Locked (non-selectable) and
    /// unknown nodes are refused and leave any existing selection intact.
    /// Selecting the already-selected node is a no-op. Returns the owning
    /// page index on success.
    pub fn activate(&mut self, scene: &mut Scene, doc: &mut Document, id: NodeId) -> Option<usize> {
        let (page, node) = scene.node(id)?;
        if !node.selectable {
            debug!(node = id.0, "ignoring activation of locked element");
            return None;
        }
        if self.wrapper.as_ref().is_some_and(|w| w.node == id) {
            return Some(page.index);
        }

        // Selection exclusivity: fully unwrap the previous node first.
        self.deselect(scene, doc);

        let (page, node) = scene.node(id)?;
        let page_index = page.index;
        self.wrapper = Some(Wrapper {
            node: id,
            page_index,
            frame: Rect::new(
                node.frame.x - WRAPPER_PADDING,
                node.frame.y - WRAPPER_PADDING,
                node.frame.w,
                node.frame.h,
            ),
            transform: node.transform(),
        });
        Some(page_index)
    }

    /// Unwrap the selection back into its page: the wrapper's position is
    /// written through to the scene node and to the backing element's
    /// physical coordinates. No-op without a selection.
    pub fn deselect(&mut self, scene: &mut Scene, doc: &mut Document) {
        self.drag = None;
        let Some(wrapper) = self.wrapper.take() else {
            return;
        };

        let x = wrapper.frame.x + WRAPPER_PADDING;
        let y = wrapper.frame.y + WRAPPER_PADDING;
        let phys_x = scene.measure.from_px(x);
        let phys_y = scene.measure.from_px(y);

        if let Some(page) = scene.pages.get_mut(wrapper.page_index) {
            if let Some(node) = page.node_mut(wrapper.node) {
                node.frame.x = x;
                node.frame.y = y;
                if let Some(element) = doc
                    .pages
                    .get_mut(wrapper.page_index)
                    .and_then(|p| p.elements.get_mut(node.element_index))
                {
                    element.set_position(phys_x, phys_y);
                }
            }
        }
    }

    /// Begin a drag session if the pointer-down landed on the wrapper.
    /// Captures the wrapper's client rectangle and inverse transform.
    pub fn pointer_down(&mut self, scene: &Scene, viewport: Viewport, client: Point) -> bool {
        let Some(wrapper) = &self.wrapper else {
            return false;
        };
        let Some(page) = scene.pages.get(wrapper.page_index) else {
            return false;
        };

        let client_rect = wrapper_client_rect(wrapper, page.frame, viewport, scene.scale);
        if !client_rect.contains(client) {
            return false;
        }

        let inverse = wrapper.transform.invert().unwrap_or_else(Matrix::identity);
        let client_origin = client_rect.origin();
        let last_local = to_local(client, client_origin, &inverse);

        self.drag = Some(DragSession {
            client_origin,
            inverse,
            last_local,
        });
        true
    }

    /// Apply a pointer move to the live drag session. `scale` is the scale
    /// factor in effect *now* — a resize mid-drag changes subsequent deltas
    /// immediately rather than jumping at drop time.
    pub fn pointer_move(&mut self, scale: f64, client: Point) {
        let Some(drag) = &mut self.drag else { return };
        let Some(wrapper) = &mut self.wrapper else {
            return;
        };

        let scale = if scale > 0.0 { scale } else { 1.0 };
        let local = to_local(client, drag.client_origin, &drag.inverse);
        wrapper.frame.x += (local.x - drag.last_local.x) / scale;
        wrapper.frame.y += (local.y - drag.last_local.y) / scale;
        drag.last_local = local;
    }

    /// End the drag session. If the wrapper ended entirely outside the page
    /// on any axis, it snaps to the nearest corner by center distance and
    /// the snap is returned for the host to animate. Partial overlap leaves
    /// the wrapper exactly where it was dropped.
    pub fn pointer_up(&mut self, scene: &Scene) -> Option<Snap> {
        self.drag.take()?;
        let wrapper = self.wrapper.as_mut()?;
        let page = scene.pages.get(wrapper.page_index)?;

        let snap = snap_target(wrapper.frame, page.frame)?;
        debug!(corner = ?snap.corner, "element dropped fully out of page, snapping");
        wrapper.frame.x = snap.to.x;
        wrapper.frame.y = snap.to.y;
        Some(snap)
    }
}

/// Map a client-space point into wrapper-local space: subtract the captured
/// rectangle origin, then apply the inverse transform.
fn to_local(client: Point, client_origin: Point, inverse: &Matrix) -> Point {
    inverse.transform_point(Point::new(
        client.x - client_origin.x,
        client.y - client_origin.y,
    ))
}

/// The wrapper's bounding rectangle in client space, given the page's
/// centered translate+scale placement inside the viewport.
fn wrapper_client_rect(wrapper: &Wrapper, page: Rect, viewport: Viewport, scale: f64) -> Rect {
    let page_origin = Point::new(
        (viewport.width - page.w * scale) / 2.0,
        (viewport.height - page.h * scale) / 2.0,
    );
    let scaled = wrapper.frame.scaled(scale);
    Rect::new(
        page_origin.x + scaled.x,
        page_origin.y + scaled.y,
        scaled.w,
        scaled.h,
    )
}

/// Decide whether `frame` is entirely outside `page` on at least one axis,
/// and if so which corner its center is nearest to.
fn snap_target(frame: Rect, page: Rect) -> Option<Snap> {
    let fully_out = frame.x > page.w
        || frame.right() < 0.0
        || frame.y > page.h
        || frame.bottom() < 0.0;
    if !fully_out {
        return None;
    }

    let corners = [
        (Corner::TopLeft, Point::new(0.0, 0.0)),
        (Corner::TopRight, Point::new(page.w - frame.w, 0.0)),
        (Corner::BottomLeft, Point::new(0.0, page.h - frame.h)),
        (
            Corner::BottomRight,
            Point::new(page.w - frame.w, page.h - frame.h),
        ),
    ];

    let center = frame.center();
    let (corner, to) = corners
        .into_iter()
        .min_by(|(_, a), (_, b)| {
            let da = center.distance_sq(Point::new(a.x + frame.w / 2.0, a.y + frame.h / 2.0));
            let db = center.distance_sq(Point::new(b.x + frame.w / 2.0, b.y + frame.h / 2.0));
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("four corners");

    Some(Snap {
        corner,
        from: frame.origin(),
        to,
        duration_ms: SNAP_DURATION_MS,
    })
}
