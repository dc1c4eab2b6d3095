//! # Galley
//!
//! A headless editing core for print-ready documents.
//!
//! Most browser editors store element positions in screen pixels and fight
//! the zoom level forever after. Galley does the opposite: **physical units
//! are the source of truth.** A document is authored in millimeters or
//! inches at a target DPI; pixel coordinates are a derived, disposable view
//! rebuilt on every render pass, and the uniform scale factor that fits a
//! page into the viewport never leaks back into the document.
//!
//! ## Architecture
//!
//! ```text
//! Template (JSON/API)
//!        ↓
//!    [model]      — physical document: measure, pages, elements
//!        ↓
//!    [measure]    — mm/in/pt ↔ px conversion, viewport fit scale
//!        ↓
//!    [scene]      — pixel scene graph: page frames, guides, visuals
//!        ↓
//!    [editor]     — render state machine, rescale, pagination, events
//!        ⇅
//!    [drag]       — selection wrapper, inverse-transform pointer math
//! ```
//!
//! Layout flows one way (model → scene); interaction flows back: pointer
//! events move the selection wrapper in document pixel space, and deselect
//! writes the position through to the element's physical coordinates.
//!
//! The host owns the actual DOM/canvas. It paints from the [`scene::Scene`],
//! forwards pointer and resize events to the [`editor::Editor`], and reacts
//! to the typed [`events::EditorEvent`]s the core publishes.

pub mod drag;
pub mod editor;
pub mod error;
pub mod events;
pub mod fetch;
pub mod geometry;
pub mod measure;
pub mod model;
pub mod pagination;
pub mod scene;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use editor::{Editor, RenderState};
pub use error::EditorError;
pub use events::EditorEvent;
pub use geometry::{Point, Rect, Viewport};
pub use model::{Document, ElementSpec, MeasureSpec, PageSpec, TemplateSpec};
pub use scene::{NodeId, Scene};
