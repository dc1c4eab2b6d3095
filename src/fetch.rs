//! # Fetch Seams
//!
//! The core suspends at exactly two points: fetching a vector shape's
//! source markup, and waiting one frame after layout before interaction is
//! accepted. Both are modeled as single-value futures behind small traits
//! so that the browser host can plug in `fetch` and `requestAnimationFrame`
//! while native tests and the CLI stay synchronous.

use crate::error::EditorError;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves a vector shape URL to its SVG markup.
pub trait VectorSource {
    fn fetch<'a>(&'a self, src: &'a str) -> LocalBoxFuture<'a, Result<String, EditorError>>;
}

/// Yields once per host paint cycle. The default implementation resolves
/// immediately; a browser host backs this with `requestAnimationFrame`.
pub trait FrameClock {
    fn tick(&self) -> LocalBoxFuture<'_, ()>;
}

/// An in-memory shape source, used by tests and as a preloaded asset cache.
#[derive(Debug, Default)]
pub struct StaticSource {
    shapes: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register markup under a source URL.
    pub fn insert(&mut self, src: &str, markup: &str) {
        self.shapes.insert(src.to_string(), markup.to_string());
    }
}

impl VectorSource for StaticSource {
    fn fetch<'a>(&'a self, src: &'a str) -> LocalBoxFuture<'a, Result<String, EditorError>> {
        let result = self
            .shapes
            .get(src)
            .cloned()
            .ok_or_else(|| EditorError::ShapeLoad {
                src: src.to_string(),
                reason: "no such shape registered".to_string(),
            });
        async move { result }.boxed_local()
    }
}

/// Reads shape markup from the filesystem, relative to a base directory.
/// Backs the CLI; not meaningful inside a browser.
#[derive(Debug)]
pub struct FileSource {
    base: PathBuf,
}

impl FileSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl VectorSource for FileSource {
    fn fetch<'a>(&'a self, src: &'a str) -> LocalBoxFuture<'a, Result<String, EditorError>> {
        let path = self.base.join(src);
        async move {
            std::fs::read_to_string(&path).map_err(|e| EditorError::ShapeLoad {
                src: src.to_string(),
                reason: e.to_string(),
            })
        }
        .boxed_local()
    }
}

/// A frame clock that never actually waits.
#[derive(Debug, Default)]
pub struct ImmediateClock;

impl FrameClock for ImmediateClock {
    fn tick(&self) -> LocalBoxFuture<'_, ()> {
        async {}.boxed_local()
    }
}
