//! fOS Host - Rendering Surface
//!
//! The contract a UI runtime needs from whatever displays its markup:
//! resolve identifiers, replace content, read attributes, manage native
//! listeners and request frames. [`MemoryHost`] implements it over an
//! in-memory document.

mod memory;
mod parser;

pub use fos_tag::EventKind;
pub use memory::MemoryHost;

/// Element handle (index into the host's arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementRef(pub(crate) u32);

impl ElementRef {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

/// Native listener handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A native event as surfaced by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeEvent {
    pub kind: EventKind,
    /// Element the event originated on
    pub target: ElementRef,
    /// Propagation path, target first, outermost element last
    pub path: Vec<ElementRef>,
    pub bubbles: bool,
}

impl NativeEvent {
    pub fn new(kind: impl Into<EventKind>, target: ElementRef, path: Vec<ElementRef>) -> Self {
        let kind = kind.into();
        Self {
            bubbles: kind.bubbles(),
            kind,
            target,
            path,
        }
    }

    /// Elements the event is delivered to: the whole path when it bubbles,
    /// the target alone otherwise
    pub fn reached(&self) -> &[ElementRef] {
        if self.bubbles {
            &self.path
        } else {
            let end = self.path.len().min(1);
            &self.path[..end]
        }
    }
}

/// Host rendering surface
pub trait Host {
    /// Find the live element carrying `id`
    fn resolve(&self, id: &str) -> Option<ElementRef>;

    /// Replace everything inside `element` with parsed `markup`.
    /// Listeners on removed elements are dropped.
    fn replace_content(&mut self, element: ElementRef, markup: &str) -> Result<(), HostError>;

    fn attribute(&self, element: ElementRef, name: &str) -> Option<String>;

    fn listen(&mut self, element: ElementRef, kind: &EventKind) -> Result<ListenerId, HostError>;

    /// Returns false if the listener was already gone
    fn unlisten(&mut self, listener: ListenerId) -> bool;

    fn listeners(&self, element: ElementRef, kind: &EventKind) -> Vec<ListenerId>;

    /// Ask for a display-refresh-aligned callback
    fn request_frame(&mut self);
}

/// Host errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("Unknown element: {0:?}")]
    UnknownElement(ElementRef),

    #[error("Element cannot hold content: {0:?}")]
    NotAContainer(ElementRef),

    #[error("Markup parse error: {0}")]
    Parse(String),
}
