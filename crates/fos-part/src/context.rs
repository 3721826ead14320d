//! Init and render contexts

use fos_bus::{HandlerKey, HandlerMap, KeyId, KeySource, Message, MessageKey, Registration};
use fos_tag::{Embed, EventKind, Tag};
use serde::de::DeserializeOwned;

use crate::tree::{Mounted, Tree};
use crate::{Part, PartCx, PartError, PartId};

/// Handed to [`Part::init`]: handler registration and child creation
pub struct Init<'a, S> {
    tree: &'a mut Tree,
    id: PartId,
    cx: &'a mut PartCx<S>,
    handlers: &'a mut HandlerMap<PartCx<S>>,
}

impl<'a, S: 'static> Init<'a, S> {
    pub(crate) fn new(
        tree: &'a mut Tree,
        id: PartId,
        cx: &'a mut PartCx<S>,
        handlers: &'a mut HandlerMap<PartCx<S>>,
    ) -> Self {
        Self {
            tree,
            id,
            cx,
            handlers,
        }
    }

    pub fn id(&self) -> PartId {
        self.id
    }

    pub fn state(&self) -> &S {
        self.cx.state_ref()
    }

    pub fn state_mut(&mut self) -> &mut S {
        self.cx.state_ref_mut()
    }

    /// The runtime's key source
    pub fn keys(&mut self) -> &mut KeySource {
        &mut self.tree.keys
    }

    pub fn key(&mut self) -> MessageKey {
        self.tree.keys.key()
    }

    pub fn typed_key<P>(&mut self) -> MessageKey<P> {
        self.tree.keys.typed()
    }

    /// Append a registration for (kind, key)
    pub fn register(&mut self, kind: impl Into<EventKind>, key: KeyId, registration: Registration<PartCx<S>>) {
        let kind = kind.into();
        if registration.is_passive() {
            self.tree.add_passive_route(HandlerKey::new(kind.clone(), key), self.id);
        }
        self.handlers.register(kind, key, registration);
    }

    /// Handler dispatched locally only
    pub fn on<P>(
        &mut self,
        kind: impl Into<EventKind>,
        key: &MessageKey<P>,
        callback: impl FnMut(&mut PartCx<S>, &Message) + 'static,
    ) {
        self.register(kind, key.id(), Registration::new(callback));
    }

    /// Handler whose messages continue to the parent part
    pub fn on_bubble<P>(
        &mut self,
        kind: impl Into<EventKind>,
        key: &MessageKey<P>,
        callback: impl FnMut(&mut PartCx<S>, &Message) + 'static,
    ) {
        self.register(kind, key.id(), Registration::new(callback).bubble());
    }

    /// Handler reached through the root's listener, so it keeps working
    /// while this part's own subtree is being replaced
    pub fn on_passive<P>(
        &mut self,
        kind: impl Into<EventKind>,
        key: &MessageKey<P>,
        callback: impl FnMut(&mut PartCx<S>, &Message) + 'static,
    ) {
        self.register(kind, key.id(), Registration::new(callback).passive());
    }

    /// Handler receiving the payload decoded as the key's type
    pub fn on_typed<P>(
        &mut self,
        kind: impl Into<EventKind>,
        key: &MessageKey<P>,
        callback: impl FnMut(&mut PartCx<S>, P, &Message) + 'static,
    ) where
        P: DeserializeOwned + 'static,
    {
        self.register(kind, key.id(), Registration::typed(key, callback));
    }

    /// Create a child part under this one
    pub fn create_child<C: Part>(&mut self, part: C, state: C::State) -> PartId {
        self.tree
            .create_child(self.id, move |id| Mounted::boxed(id, part, state))
    }

    /// Create a child from a registered kind
    pub fn create_kind(&mut self, kind: &str) -> Result<PartId, PartError> {
        let part = self
            .tree
            .registry
            .build(kind, self.tree.next_id())
            .ok_or_else(|| PartError::UnknownKind(kind.to_string()))?;
        Ok(self.tree.create_child(self.id, move |_| part))
    }

    /// Children created so far
    pub fn children(&self) -> Vec<PartId> {
        self.tree.children(self.id)
    }
}

/// Handed to [`Part::render`]: access to children for embedding
pub struct RenderCx<'a> {
    tree: &'a Tree,
    current: PartId,
    embedded: &'a mut Vec<PartId>,
}

impl<'a> RenderCx<'a> {
    pub(crate) fn new(tree: &'a Tree, current: PartId, embedded: &'a mut Vec<PartId>) -> Self {
        Self {
            tree,
            current,
            embedded,
        }
    }

    /// Part being rendered
    pub fn id(&self) -> PartId {
        self.current
    }

    /// Children in creation order
    pub fn children(&self) -> Vec<PartId> {
        self.tree.children(self.current)
    }

    /// Host identifier of a part
    pub fn name_of(&self, id: PartId) -> Option<&str> {
        self.tree.node(id).map(|n| n.name.as_str())
    }

    /// A child ready to be embedded with [`Tag::embed`]
    pub fn child(&mut self, id: PartId) -> Result<Embedded<'_>, PartError> {
        let node = self.tree.node(id).ok_or(PartError::UnknownPart(id))?;
        if node.parent != Some(self.current) {
            return Err(PartError::NotAChild {
                parent: self.current,
                child: id,
            });
        }
        Ok(Embedded {
            tree: self.tree,
            id,
            embedded: &mut *self.embedded,
        })
    }

    /// Embed a child into `tag`, returning its wrapper
    pub fn embed<'t>(&mut self, tag: &'t mut Tag, id: PartId) -> anyhow::Result<&'t mut Tag> {
        let mut child = self.child(id)?;
        tag.embed(&mut child)
    }
}

/// A child part borrowed for embedding
pub struct Embedded<'a> {
    tree: &'a Tree,
    id: PartId,
    embedded: &'a mut Vec<PartId>,
}

impl Embed for Embedded<'_> {
    type Error = anyhow::Error;

    fn host_tag(&self) -> &str {
        self.tree
            .node(self.id)
            .and_then(|n| n.part.as_ref())
            .map(|p| p.host_tag())
            .unwrap_or("div")
    }

    fn host_id(&self) -> &str {
        self.tree.node(self.id).map(|n| n.name.as_str()).unwrap_or_default()
    }

    fn render_into(&mut self, wrapper: &mut Tag) -> anyhow::Result<()> {
        let id = self.id;
        let part = self
            .tree
            .node(id)
            .and_then(|n| n.part.as_ref())
            .ok_or(PartError::UnknownPart(id))?;
        self.embedded.push(id);
        let mut cx = RenderCx::new(self.tree, id, &mut *self.embedded);
        part.render(&mut cx, wrapper)
            .map_err(|source| PartError::Render { part: id, source }.into())
    }
}
