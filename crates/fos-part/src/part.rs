//! Part contract

use fos_tag::Tag;

use crate::{Init, PartId, RenderCx};

/// A stateful component
///
/// `init` runs once, lazily, before the first render; it is where
/// handlers are registered and children created. `render` populates the
/// part's wrapper tag from its state and is called on every pass that
/// finds the part dirty.
pub trait Part: 'static {
    type State: 'static;

    fn init(&mut self, cx: &mut Init<'_, Self::State>) {
        let _ = cx;
    }

    /// Add the part's content to `tag`. Only text and children are written
    /// to the host; attributes, classes or bindings set on `tag` itself are
    /// dropped, whether the part renders alone or embedded by its parent.
    fn render(&self, state: &Self::State, cx: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()>;

    /// Element name of the wrapper inserted when a parent embeds this part
    fn host_tag(&self) -> &str {
        "div"
    }
}

/// What handler callbacks get: the part's state and its dirty signal
#[derive(Debug)]
pub struct PartCx<S> {
    id: PartId,
    state: S,
    dirty: bool,
}

impl<S> PartCx<S> {
    pub(crate) fn new(id: PartId, state: S) -> Self {
        Self {
            id,
            state,
            dirty: false,
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Mutable state; counts as a state change
    pub fn state_mut(&mut self) -> &mut S {
        self.dirty = true;
        &mut self.state
    }

    /// Change state and schedule a re-render
    pub fn update<R>(&mut self, f: impl FnOnce(&mut S) -> R) -> R {
        self.dirty = true;
        f(&mut self.state)
    }

    /// Schedule a re-render without touching state
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn state_ref(&self) -> &S {
        &self.state
    }

    /// Mutable state without raising the dirty signal
    pub(crate) fn state_ref_mut(&mut self) -> &mut S {
        &mut self.state
    }
}
