//! # Editor
//!
//! The orchestrating controller: owns the validated document, the pixel
//! scene, the uniform scale factor, pagination, the selection/drag
//! controller and the event channel. This is the single owner of every
//! piece of shared mutable state the reference kept in class-level statics;
//! collaborators receive it by reference, so multiple independent editor
//! instances can coexist (and be tested).
//!
//! Rendering is a state machine: `Unloaded → Resolving → LayingOut → Ready`,
//! with `Ready` re-entered on every resize. A failed validation aborts
//! before any visible state changes — partial renders are forbidden.

use crate::drag::{DragController, Snap, Wrapper};
use crate::error::EditorError;
use crate::events::{EditorEvent, EventBus};
use crate::fetch::{FrameClock, ImmediateClock, StaticSource, VectorSource};
use crate::geometry::{Point, Viewport};
use crate::measure;
use crate::model::{Document, ElementSpec, TemplateSpec};
use crate::pagination::{Pagination, PaginationControls};
use crate::scene::{self, NodeId, Scene, SceneNode, ScenePage};
use tracing::{debug, error, warn};

/// Where the render pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Unloaded,
    Resolving,
    LayingOut,
    Ready,
}

/// The editing core for one document.
pub struct Editor {
    viewport: Viewport,
    state: RenderState,
    doc: Option<Document>,
    scene: Option<Scene>,
    pagination: Pagination,
    drag: DragController,
    bus: EventBus,
    shapes: Box<dyn VectorSource>,
    frames: Box<dyn FrameClock>,
    next_node_id: u32,
}

impl Editor {
    /// An editor with no shape source and an immediate frame clock. Browser
    /// hosts swap both in via the builder methods.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            state: RenderState::Unloaded,
            doc: None,
            scene: None,
            pagination: Pagination::default(),
            drag: DragController::new(),
            bus: EventBus::new(),
            shapes: Box::new(StaticSource::new()),
            frames: Box::new(ImmediateClock),
            next_node_id: 0,
        }
    }

    pub fn with_vector_source(mut self, source: impl VectorSource + 'static) -> Self {
        self.shapes = Box::new(source);
        self
    }

    pub fn with_frame_clock(mut self, clock: impl FrameClock + 'static) -> Self {
        self.frames = Box::new(clock);
        self
    }

    // ─── Observability ──────────────────────────────────────────────

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    /// The active uniform scale factor (1.0 before the first render).
    pub fn scale(&self) -> f64 {
        self.scene.as_ref().map_or(1.0, |s| s.scale)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) {
        self.bus.subscribe(listener);
    }

    /// Events published since the last drain, for polling hosts.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        self.bus.drain()
    }

    // ─── Rendering ──────────────────────────────────────────────────

    /// Validate and lay out a template, replacing any current document
    /// wholesale. Resolves only after the frame clock has ticked once, so
    /// the host has had a paint cycle before interaction resumes.
    pub async fn render(&mut self, template: TemplateSpec) -> Result<(), EditorError> {
        // Precondition check happens before any visible state mutation.
        let doc = Document::validate(template).inspect_err(|e| {
            error!(error = %e, "template rejected, aborting render");
        })?;

        self.state = RenderState::Resolving;
        let measure = doc.measure.resolve();
        debug!(
            px_width = measure.px_width,
            px_height = measure.px_height,
            pages = doc.pages.len(),
            "measure resolved"
        );

        self.state = RenderState::LayingOut;
        let mut pages = Vec::with_capacity(doc.pages.len());
        for (index, page_spec) in doc.pages.iter().enumerate() {
            let mut page = ScenePage::new(index, page_spec.background.clone(), &measure);
            for (element_index, element) in page_spec.elements.iter().enumerate() {
                let id = NodeId(self.alloc_node_id());
                match self.render_node(id, element_index, element, &measure).await {
                    Ok(node) => page.nodes.push(node),
                    // One bad shape must not abort its siblings.
                    Err(e) => warn!(error = %e, page = index, "skipping element"),
                }
            }
            pages.push(page);
        }

        if let Some(first) = pages.first_mut() {
            first.active = true;
        }

        // Commit: replace document, scene, pagination and selection at once.
        self.drag = DragController::new();
        self.pagination = Pagination::new(pages.len());
        self.doc = Some(doc);
        self.scene = Some(Scene {
            measure,
            pages,
            scale: 1.0,
        });

        self.rescale(self.viewport);
        self.frames.tick().await;
        self.state = RenderState::Ready;
        Ok(())
    }

    async fn render_node(
        &self,
        id: NodeId,
        element_index: usize,
        element: &ElementSpec,
        measure: &crate::model::ResolvedMeasure,
    ) -> Result<SceneNode, EditorError> {
        let markup = match element {
            ElementSpec::Vector {
                src, fill_color, ..
            } => {
                let raw = self.shapes.fetch(src).await?;
                Some(match fill_color {
                    Some(color) => scene::recolor_fill(&raw, color),
                    None => raw,
                })
            }
            _ => None,
        };
        Ok(scene::render_element(
            id,
            element_index,
            element,
            measure,
            markup,
        ))
    }

    fn alloc_node_id(&mut self) -> u32 {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    /// Recompute the fit scale for the (possibly resized) viewport and
    /// re-publish it. Every page shares one uniform scale factor.
    pub fn rescale(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let Some(scene) = &mut self.scene else {
            return;
        };

        let scale = measure::fit_scale(
            scene.measure.px_width,
            scene.measure.px_height,
            viewport.width,
            viewport.height,
        );
        scene.scale = scale;
        self.bus.publish(EditorEvent::Scale { scale });
    }

    /// Insert a new element into a page of the currently rendered document.
    /// Fails when no document is rendered or the page does not exist.
    pub async fn add_element(
        &mut self,
        element: ElementSpec,
        page_index: usize,
    ) -> Result<(), EditorError> {
        let page_count = self.doc.as_ref().map(|d| d.pages.len());
        match page_count {
            Some(count) if page_index < count => {}
            _ => {
                let err = EditorError::MissingTarget(format!(
                    "page {page_index} is not part of the rendered document"
                ));
                error!(error = %err, "add_element refused");
                return Err(err);
            }
        }

        let Some(measure) = self.scene.as_ref().map(|s| s.measure.clone()) else {
            return Err(EditorError::MissingTarget("no scene rendered".into()));
        };
        let element_index = self.doc.as_ref().map_or(0, |d| d.pages[page_index].elements.len());
        let id = NodeId(self.alloc_node_id());
        let node = self.render_node(id, element_index, &element, &measure).await?;

        if let (Some(doc), Some(scene)) = (self.doc.as_mut(), self.scene.as_mut()) {
            doc.pages[page_index].elements.push(element);
            scene.pages[page_index].nodes.push(node);
        }
        Ok(())
    }

    // ─── Selection & drag ───────────────────────────────────────────

    /// Activate a node (click). Locked nodes are refused. Publishes
    /// `ElementSelected` when the selection changes.
    pub fn activate(&mut self, id: NodeId) -> bool {
        let (Some(scene), Some(doc)) = (&mut self.scene, &mut self.doc) else {
            return false;
        };
        let already = self.drag.selection().map(|w| w.node);
        match self.drag.activate(scene, doc, id) {
            Some(page_index) => {
                if already != Some(id) {
                    self.bus
                        .publish(EditorEvent::ElementSelected { page_index, node: id });
                }
                true
            }
            None => false,
        }
    }

    /// Clear the selection (click on empty page area), writing the wrapped
    /// node's position back to the document's physical coordinates.
    pub fn deselect(&mut self) {
        let (Some(scene), Some(doc)) = (&mut self.scene, &mut self.doc) else {
            return;
        };
        self.drag.deselect(scene, doc);
    }

    pub fn selection(&self) -> Option<&Wrapper> {
        self.drag.selection()
    }

    /// Pointer-down in client coordinates. Begins a drag session when it
    /// lands on the selection wrapper.
    pub fn pointer_down(&mut self, client: Point) -> bool {
        let Some(scene) = &self.scene else {
            return false;
        };
        self.drag.pointer_down(scene, self.viewport, client)
    }

    /// Pointer-move in client coordinates. Uses the scale in effect right
    /// now, so a resize mid-drag changes subsequent deltas immediately.
    pub fn pointer_move(&mut self, client: Point) {
        let scale = self.scale();
        self.drag.pointer_move(scale, client);
    }

    /// Pointer-up: ends the drag session. Returns the snap for the host to
    /// animate when the wrapper landed fully outside the page.
    pub fn pointer_up(&mut self) -> Option<Snap> {
        let scene = self.scene.as_ref()?;
        self.drag.pointer_up(scene)
    }

    /// Replace a node's estimated extent with the host-measured bounding
    /// box (text extents come from real glyph metrics only the host has).
    pub fn set_node_bounds(&mut self, id: NodeId, width: f64, height: f64) {
        let Some(scene) = &mut self.scene else { return };
        for page in &mut scene.pages {
            if let Some(node) = page.node_mut(id) {
                node.frame.w = width;
                node.frame.h = height;
                return;
            }
        }
        warn!(node = id.0, "set_node_bounds: no such node");
    }

    // ─── Pagination ─────────────────────────────────────────────────

    /// Step to the previous page. No-op at the first page.
    pub fn prev_page(&mut self) -> bool {
        let moved = self.pagination.prev();
        if moved {
            self.sync_active_page();
        }
        moved
    }

    /// Step to the next page. No-op at the last page.
    pub fn next_page(&mut self) -> bool {
        let moved = self.pagination.next();
        if moved {
            self.sync_active_page();
        }
        moved
    }

    pub fn active_page(&self) -> usize {
        self.pagination.active()
    }

    pub fn pagination_controls(&self) -> PaginationControls {
        self.pagination.controls()
    }

    /// `Displaying page {n} of {total} pages.`
    pub fn page_label(&self) -> String {
        self.pagination.label()
    }

    /// `Zoom: {pct}%`
    pub fn zoom_label(&self) -> String {
        format!("Zoom: {:.0}%", self.scale() * 100.0)
    }

    fn sync_active_page(&mut self) {
        let active = self.pagination.active();
        if let Some(scene) = &mut self.scene {
            for page in &mut scene.pages {
                page.active = page.index == active;
            }
        }
    }

    // ─── External collaborators ─────────────────────────────────────

    /// Relay a host panel toggle through the event channel so other
    /// collaborators (toolbars, property sheets) can react.
    pub fn set_panel_visibility(&mut self, open: bool) {
        self.bus.publish(EditorEvent::PanelVisibility { open });
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("state", &self.state)
            .field("viewport", &self.viewport)
            .field("pages", &self.scene.as_ref().map_or(0, |s| s.pages.len()))
            .field("scale", &self.scale())
            .finish()
    }
}
