//! Part arena
//!
//! Children are owned by their parent's registry; the parent link is a
//! plain id used for root resolution and bubble dispatch. Slots of
//! removed parts are emptied, never reused.

use std::any::Any;

use fos_bus::{Delivery, Dispatched, HandlerKey, HandlerMap, KeySource, Message};
use fos_tag::{EventKind, Tag};
use indexmap::IndexMap;

use crate::registry::Registry;
use crate::{Init, Part, PartCx, PartId, RenderCx, RuntimeConfig};

/// Type-erased mounted part
pub(crate) trait AnyPart {
    fn init(&mut self, tree: &mut Tree, id: PartId);
    fn render(&self, cx: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()>;
    fn host_tag(&self) -> &str;
    fn kinds(&self, delivery: Delivery) -> Vec<EventKind>;
    fn handler_count(&self) -> usize;
    fn dispatch(&mut self, msg: &Message, delivery: Delivery) -> Dispatched;
    fn take_dirty(&mut self) -> bool;
    fn set_isolation(&mut self, isolate: bool);
    fn state_any(&self) -> &dyn Any;
    fn state_any_mut(&mut self) -> &mut dyn Any;
}

pub(crate) struct Mounted<P: Part> {
    part: P,
    cx: PartCx<P::State>,
    handlers: HandlerMap<PartCx<P::State>>,
}

impl<P: Part> Mounted<P> {
    pub(crate) fn boxed(id: PartId, part: P, state: P::State) -> Box<dyn AnyPart> {
        Box::new(Mounted {
            part,
            cx: PartCx::new(id, state),
            handlers: HandlerMap::new(),
        })
    }
}

impl<P: Part> AnyPart for Mounted<P> {
    fn init(&mut self, tree: &mut Tree, id: PartId) {
        let Mounted { part, cx, handlers } = self;
        let mut init = Init::new(tree, id, cx, handlers);
        part.init(&mut init);
    }

    fn render(&self, cx: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
        self.part.render(self.cx.state_ref(), cx, tag)
    }

    fn host_tag(&self) -> &str {
        self.part.host_tag()
    }

    fn kinds(&self, delivery: Delivery) -> Vec<EventKind> {
        self.handlers.kinds(delivery)
    }

    fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn dispatch(&mut self, msg: &Message, delivery: Delivery) -> Dispatched {
        self.handlers.dispatch(&mut self.cx, msg, delivery)
    }

    fn take_dirty(&mut self) -> bool {
        self.cx.take_dirty()
    }

    fn set_isolation(&mut self, isolate: bool) {
        self.handlers.set_isolation(isolate);
    }

    fn state_any(&self) -> &dyn Any {
        self.cx.state_ref()
    }

    fn state_any_mut(&mut self) -> &mut dyn Any {
        self.cx.state_ref_mut()
    }
}

pub(crate) struct Node {
    /// Identifier of the host element the part renders into
    pub(crate) name: String,
    pub(crate) parent: Option<PartId>,
    pub(crate) children: IndexMap<String, PartId>,
    pub(crate) dirty: bool,
    pub(crate) initialized: bool,
    pub(crate) needs_listeners: bool,
    /// Taken out while the part initializes
    pub(crate) part: Option<Box<dyn AnyPart>>,
}

/// Part arena. Removed parts leave an empty slot that is never reused,
/// so a stale [`PartId`] stays unknown and the arena only grows.
pub(crate) struct Tree {
    nodes: Vec<Option<Node>>,
    pub(crate) keys: KeySource,
    pub(crate) config: RuntimeConfig,
    pub(crate) registry: Registry,
    /// Passive registrations, dispatched through the root's listeners
    pub(crate) passive: IndexMap<HandlerKey, Vec<PartId>>,
    pub(crate) root: Option<PartId>,
    next_name: u64,
}

impl Tree {
    pub(crate) fn new(config: RuntimeConfig) -> Self {
        Self {
            nodes: Vec::new(),
            keys: KeySource::starting_at(config.first_key),
            config,
            registry: Registry::default(),
            passive: IndexMap::new(),
            root: None,
            next_name: 1,
        }
    }

    pub(crate) fn next_id(&self) -> PartId {
        PartId(self.nodes.len() as u32)
    }

    pub(crate) fn node(&self, id: PartId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub(crate) fn node_mut(&mut self, id: PartId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    /// Add a part; it starts dirty and uninitialized
    pub(crate) fn insert(&mut self, parent: Option<PartId>, name: String, mut part: Box<dyn AnyPart>) -> PartId {
        let id = self.next_id();
        part.set_isolation(self.config.isolate_handlers);
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.insert(name.clone(), id);
        }
        self.nodes.push(Some(Node {
            name,
            parent,
            children: IndexMap::new(),
            dirty: true,
            initialized: false,
            needs_listeners: true,
            part: Some(part),
        }));
        id
    }

    /// Allocate a uniquely named part under `parent`
    pub(crate) fn create_child(&mut self, parent: PartId, build: impl FnOnce(PartId) -> Box<dyn AnyPart>) -> PartId {
        let name = format!("{}{}", self.config.part_id_prefix, self.next_name);
        self.next_name += 1;
        let part = build(self.next_id());
        let id = self.insert(Some(parent), name, part);
        tracing::trace!(%parent, child = %id, "Created child part");
        id
    }

    /// Remove a part from its slot; its registry entry in the parent stays
    pub(crate) fn remove(&mut self, id: PartId) -> Option<Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::take)
    }

    pub(crate) fn children(&self, id: PartId) -> Vec<PartId> {
        self.node(id)
            .map(|n| n.children.values().copied().collect())
            .unwrap_or_default()
    }

    /// `id` and all parts below it, pre-order
    pub(crate) fn subtree(&self, id: PartId) -> Vec<PartId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.node(current).is_none() {
                continue;
            }
            out.push(current);
            let children = self.children(current);
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Walk parent links up to the part without a parent
    pub(crate) fn resolve_root(&self, id: PartId) -> Option<PartId> {
        let mut current = id;
        loop {
            match self.node(current)?.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    pub(crate) fn add_passive_route(&mut self, key: HandlerKey, id: PartId) {
        let routes = self.passive.entry(key).or_default();
        if !routes.contains(&id) {
            routes.push(id);
        }
        if let Some(root) = self.resolve_root(id).and_then(|r| self.node_mut(r)) {
            root.needs_listeners = true;
        }
    }

    /// Event kinds the root must listen for on behalf of passive handlers
    pub(crate) fn passive_kinds(&self) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = Vec::new();
        for key in self.passive.keys() {
            if !kinds.contains(&key.kind) {
                kinds.push(key.kind.clone());
            }
        }
        kinds
    }
}
