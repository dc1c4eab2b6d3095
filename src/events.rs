//! # Event Channel
//!
//! Typed publish/subscribe between the core and host-owned UI. The
//! reference system used bubbling DOM `CustomEvent`s as its bus; here the
//! channel is explicit so the render engine, the drag controller and
//! external collaborators stay decoupled without a DOM in sight.
//!
//! The bus is single-threaded, matching the cooperative event-loop model of
//! the whole core: `publish` runs every subscriber synchronously and also
//! records the event in a queue that polling hosts can [`EventBus::drain`].

use crate::scene::NodeId;
use serde::Serialize;

/// An observable side effect of the core, with a typed payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EditorEvent {
    /// An unlocked element was activated and is now the selection.
    #[serde(rename_all = "camelCase")]
    ElementSelected { page_index: usize, node: NodeId },
    /// The uniform page scale changed (viewport resize or re-render).
    Scale { scale: f64 },
    /// The host's properties panel toggled open or closed.
    PanelVisibility { open: bool },
}

type Listener = Box<dyn FnMut(&EditorEvent)>;

/// A synchronous, single-threaded event channel.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    queue: Vec<EditorEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Listeners run in subscription order on every
    /// publish and cannot be removed; they live as long as the bus.
    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Publish an event to every listener and append it to the poll queue.
    pub fn publish(&mut self, event: EditorEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.queue.push(event);
    }

    /// Take every event published since the last drain.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.queue)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}
