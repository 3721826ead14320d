//! Runtime - render scheduling, render passes and event delivery
//!
//! A state change marks a part dirty and requests one frame from the host;
//! further signals before that frame are coalesced. [`Runtime::frame`] runs
//! the pass: initialize new parts, then walk from the root, re-rendering
//! dirty parts into their host element and recursing into clean ones.
//! Every replaced subtree gets its native listeners re-attached before the
//! pass returns.

use std::collections::HashSet;

use fos_bus::{delegate, Delivery, Dispatched, HandlerKey, KeyId, KeySource, Message};
use fos_host::{EventKind, Host, ListenerId, NativeEvent};
use fos_tag::Tag;
use indexmap::IndexMap;

use crate::tree::{Mounted, Tree};
use crate::{Part, PartError, PartId, RenderCx, RuntimeConfig};

/// Runtime counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub passes: u64,
    /// Parts whose host content was rewritten by their own render
    pub renders: u64,
    pub frames_requested: u64,
    /// Dirty signals absorbed by an already scheduled frame
    pub signals_coalesced: u64,
    pub messages: u64,
    pub handler_failures: u64,
}

/// Outcome of one render pass
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Parts rendered, embedded children included
    pub rendered: Vec<PartId>,
    /// Subtrees skipped because their host location failed
    pub failures: Vec<(PartId, PartError)>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of delivering one native event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Runtime listeners the event reached
    pub listeners: usize,
    pub messages: usize,
    pub invoked: usize,
    pub failed: usize,
    /// Listeners that found no bound element on the path
    pub discarded: usize,
}

/// Mounted part tree bound to a host
pub struct Runtime<H: Host> {
    host: H,
    tree: Tree,
    pending: bool,
    listeners: IndexMap<ListenerId, PartId>,
    attached: IndexMap<PartId, Vec<ListenerId>>,
    stats: Stats,
}

impl<H: Host> std::fmt::Debug for Runtime<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("pending", &self.pending)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Runtime<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, RuntimeConfig::default())
    }

    pub fn with_config(host: H, config: RuntimeConfig) -> Self {
        Self {
            host,
            tree: Tree::new(config),
            pending: false,
            listeners: IndexMap::new(),
            attached: IndexMap::new(),
            stats: Stats::default(),
        }
    }

    // === Accessors ===

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.tree.config
    }

    /// Key source shared by every part of this runtime
    pub fn keys(&mut self) -> &mut KeySource {
        &mut self.tree.keys
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn root(&self) -> Option<PartId> {
        self.tree.root
    }

    pub fn contains(&self, id: PartId) -> bool {
        self.tree.node(id).is_some()
    }

    pub fn parent(&self, id: PartId) -> Option<PartId> {
        self.tree.node(id)?.parent
    }

    pub fn children(&self, id: PartId) -> Vec<PartId> {
        self.tree.children(id)
    }

    /// Host identifier the part renders into
    pub fn part_name(&self, id: PartId) -> Option<&str> {
        self.tree.node(id).map(|n| n.name.as_str())
    }

    pub fn is_dirty(&self, id: PartId) -> bool {
        self.tree.node(id).is_some_and(|n| n.dirty)
    }

    pub fn is_initialized(&self, id: PartId) -> bool {
        self.tree.node(id).is_some_and(|n| n.initialized)
    }

    /// A frame has been requested and not yet run
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn handler_count(&self, id: PartId) -> usize {
        self.tree
            .node(id)
            .and_then(|n| n.part.as_ref())
            .map_or(0, |p| p.handler_count())
    }

    /// Native listeners currently attached for a part
    pub fn listener_count(&self, id: PartId) -> usize {
        self.attached.get(&id).map_or(0, Vec::len)
    }

    pub fn state<S: 'static>(&self, id: PartId) -> Result<&S, PartError> {
        self.tree
            .node(id)
            .and_then(|n| n.part.as_ref())
            .ok_or(PartError::UnknownPart(id))?
            .state_any()
            .downcast_ref::<S>()
            .ok_or(PartError::StateType(id))
    }

    // === Tree ===

    /// Create the root part at the host element `location` and render it
    pub fn mount<P: Part>(&mut self, location: &str, part: P, state: P::State) -> Result<PartId, PartError> {
        if self.tree.root.is_some() {
            return Err(PartError::AlreadyMounted);
        }
        let id = self.tree.next_id();
        if self.host.resolve(location).is_none() {
            return Err(PartError::Unresolved {
                part: id,
                location: location.to_string(),
            });
        }

        let id = self
            .tree
            .insert(None, location.to_string(), Mounted::boxed(id, part, state));
        self.tree.root = Some(id);
        tracing::info!(part = %id, location, "Mounted root part");

        self.signal_dirty(id);
        self.frame()?;
        Ok(id)
    }

    pub fn create_child<P: Part>(&mut self, parent: PartId, part: P, state: P::State) -> Result<PartId, PartError> {
        self.require(parent)?;
        let id = self
            .tree
            .create_child(parent, move |id| Mounted::boxed(id, part, state));
        self.signal_dirty(parent);
        Ok(id)
    }

    /// Register a factory so parts can be created by kind name
    pub fn register_kind<P, F>(&mut self, name: impl Into<String>, factory: F)
    where
        P: Part,
        F: Fn() -> (P, P::State) + 'static,
    {
        self.tree.registry.register(name, factory);
    }

    /// Registered kind names
    pub fn kinds(&self) -> Vec<&str> {
        self.tree.registry.kinds().collect()
    }

    pub fn create_kind(&mut self, parent: PartId, kind: &str) -> Result<PartId, PartError> {
        self.require(parent)?;
        let part = self
            .tree
            .registry
            .build(kind, self.tree.next_id())
            .ok_or_else(|| PartError::UnknownKind(kind.to_string()))?;
        let id = self.tree.create_child(parent, move |_| part);
        self.signal_dirty(parent);
        Ok(id)
    }

    /// Dispose of `child` and everything below it: handler maps are
    /// dropped, passive routes removed and native listeners detached.
    /// The parent is marked dirty so its markup loses the wrapper.
    pub fn remove_child(&mut self, parent: PartId, child: PartId) -> Result<(), PartError> {
        let node = self.tree.node(child).ok_or(PartError::UnknownPart(child))?;
        if node.parent != Some(parent) {
            return Err(PartError::NotAChild { parent, child });
        }
        let name = node.name.clone();
        let subtree = self.tree.subtree(child);

        for id in &subtree {
            self.detach_listeners(*id);
        }
        for routes in self.tree.passive.values_mut() {
            routes.retain(|id| !subtree.contains(id));
        }
        self.tree.passive.retain(|_, routes| !routes.is_empty());
        for id in &subtree {
            self.tree.remove(*id);
        }
        if let Some(node) = self.tree.node_mut(parent) {
            node.children.shift_remove(&name);
        }
        if let Some(root) = self.tree.root.and_then(|r| self.tree.node_mut(r)) {
            root.needs_listeners = true;
        }

        tracing::info!(%parent, %child, removed = subtree.len(), "Removed part subtree");
        self.signal_dirty(parent);
        Ok(())
    }

    fn require(&self, id: PartId) -> Result<(), PartError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(PartError::UnknownPart(id))
        }
    }

    // === Dirty tracking ===

    /// Signal that a part's output is stale
    pub fn mark_dirty(&mut self, id: PartId) -> Result<(), PartError> {
        self.require(id)?;
        self.signal_dirty(id);
        Ok(())
    }

    /// Change a part's state from outside and signal it dirty
    pub fn update<S: 'static, R>(&mut self, id: PartId, f: impl FnOnce(&mut S) -> R) -> Result<R, PartError> {
        let part = self
            .tree
            .node_mut(id)
            .and_then(|n| n.part.as_mut())
            .ok_or(PartError::UnknownPart(id))?;
        let state = part
            .state_any_mut()
            .downcast_mut::<S>()
            .ok_or(PartError::StateType(id))?;
        let out = f(state);
        self.signal_dirty(id);
        Ok(out)
    }

    fn signal_dirty(&mut self, id: PartId) {
        match self.tree.node_mut(id) {
            Some(node) => node.dirty = true,
            None => return,
        }
        self.schedule();
    }

    fn schedule(&mut self) {
        if self.pending {
            self.stats.signals_coalesced += 1;
            tracing::trace!("Render already scheduled");
            return;
        }
        self.pending = true;
        self.stats.frames_requested += 1;
        self.host.request_frame();
        tracing::trace!("Requested frame");
    }

    // === Render pass ===

    /// Frame callback: run the scheduled pass, if any
    pub fn frame(&mut self) -> Result<RenderReport, PartError> {
        if !self.pending {
            return Ok(RenderReport::default());
        }
        self.render_pass()
    }

    /// Run a render pass from the root now
    pub fn render_pass(&mut self) -> Result<RenderReport, PartError> {
        let root = self.tree.root.ok_or(PartError::NotMounted)?;
        self.pending = false;
        self.stats.passes += 1;

        self.initialize_parts(root);

        let mut report = RenderReport::default();
        self.walk(root, &mut report)?;
        tracing::debug!(
            rendered = report.rendered.len(),
            failures = report.failures.len(),
            "Render pass complete"
        );
        Ok(report)
    }

    /// Run `init` once for every part that has not had it, parents first.
    /// Parts created by an `init` are picked up in the next round.
    fn initialize_parts(&mut self, root: PartId) {
        loop {
            let fresh: Vec<PartId> = self
                .tree
                .subtree(root)
                .into_iter()
                .filter(|id| self.tree.node(*id).is_some_and(|n| !n.initialized))
                .collect();
            if fresh.is_empty() {
                break;
            }
            for id in fresh {
                self.initialize(id);
            }
        }
    }

    fn initialize(&mut self, id: PartId) {
        let Some(mut part) = self.tree.node_mut(id).and_then(|n| n.part.take()) else {
            return;
        };
        part.init(&mut self.tree, id);
        if let Some(node) = self.tree.node_mut(id) {
            node.part = Some(part);
            node.initialized = true;
        }
        tracing::debug!(part = %id, "Initialized part");
    }

    fn walk(&mut self, id: PartId, report: &mut RenderReport) -> Result<(), PartError> {
        let (dirty, needs_listeners) = match self.tree.node(id) {
            Some(node) => (node.dirty, node.needs_listeners),
            None => return Ok(()),
        };

        if !dirty {
            if needs_listeners {
                self.attach_listeners(id);
            }
            for child in self.tree.children(id) {
                self.walk(child, report)?;
            }
            return Ok(());
        }

        match self.render_part(id) {
            Ok(embedded) => {
                report.rendered.push(id);
                report.rendered.extend(embedded);
            }
            Err(err) if err.is_subtree_fatal() => {
                tracing::warn!(part = %id, error = %err, "Skipping subtree");
                report.failures.push((id, err));
                return Ok(());
            }
            Err(err) => return Err(err),
        }

        // Content replacement dropped every listener below this part
        let subtree = self.tree.subtree(id);
        for below in subtree.iter().skip(1) {
            if let Some(node) = self.tree.node_mut(*below) {
                node.needs_listeners = true;
            }
        }
        for part in subtree {
            self.attach_listeners(part);
        }
        Ok(())
    }

    /// Render one part into its host element. Returns the children that
    /// were embedded (and so rendered) along the way.
    fn render_part(&mut self, id: PartId) -> Result<Vec<PartId>, PartError> {
        let name = self
            .tree
            .node(id)
            .ok_or(PartError::UnknownPart(id))?
            .name
            .clone();
        let element = self
            .host
            .resolve(&name)
            .ok_or_else(|| PartError::Unresolved {
                part: id,
                location: name.clone(),
            })?;

        let mut embedded = Vec::new();
        let markup = {
            let part = self
                .tree
                .node(id)
                .and_then(|n| n.part.as_ref())
                .ok_or(PartError::UnknownPart(id))?;
            let mut scratch = Tag::new(part.host_tag());
            scratch.set_id(name.as_str());
            let mut cx = RenderCx::new(&self.tree, id, &mut embedded);
            part.render(&mut cx, &mut scratch)
                .map_err(|source| PartError::Render { part: id, source })?;
            scratch.inner_markup()
        };

        self.host
            .replace_content(element, &markup)
            .map_err(|source| PartError::Host { part: id, source })?;

        for part in embedded.iter().copied().chain([id]) {
            if let Some(node) = self.tree.node_mut(part) {
                node.dirty = false;
            }
        }
        self.stats.renders += 1;
        tracing::debug!(part = %id, bytes = markup.len(), embedded = embedded.len(), "Rendered part");
        Ok(embedded)
    }

    // === Listeners ===

    /// Replace the part's native listeners with exactly one per event kind
    /// it handles; the root also listens for passive kinds
    fn attach_listeners(&mut self, id: PartId) {
        self.detach_listeners(id);

        let Some(node) = self.tree.node(id) else { return };
        let Some(part) = node.part.as_ref() else { return };
        let mut kinds = part.kinds(Delivery::Local);
        if self.tree.root == Some(id) {
            for kind in self.tree.passive_kinds() {
                if !kinds.contains(&kind) {
                    kinds.push(kind);
                }
            }
        }
        let name = node.name.clone();
        if let Some(node) = self.tree.node_mut(id) {
            node.needs_listeners = false;
        }
        if kinds.is_empty() {
            return;
        }

        let Some(element) = self.host.resolve(&name) else {
            tracing::trace!(part = %id, "No host element to listen on");
            return;
        };
        let mut ids = Vec::with_capacity(kinds.len());
        for kind in &kinds {
            match self.host.listen(element, kind) {
                Ok(listener) => {
                    self.listeners.insert(listener, id);
                    ids.push(listener);
                }
                Err(err) => tracing::warn!(part = %id, %kind, error = %err, "Failed to attach listener"),
            }
        }
        tracing::debug!(part = %id, count = ids.len(), "Attached listeners");
        self.attached.insert(id, ids);
    }

    fn detach_listeners(&mut self, id: PartId) {
        if let Some(ids) = self.attached.shift_remove(&id) {
            for listener in ids {
                self.host.unlisten(listener);
                self.listeners.shift_remove(&listener);
            }
        }
    }

    // === Events ===

    /// Deliver a native event to every runtime listener it reaches
    pub fn deliver(&mut self, event: &NativeEvent) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        // A part sees each key at most once per event, whichever listener
        // or bubble step got there first
        let mut seen: HashSet<(PartId, KeyId)> = HashSet::new();
        // Passive routes run once per key, independent of local handling
        let mut passive_seen: HashSet<KeyId> = HashSet::new();
        let root = self.tree.root;

        for &element in event.reached() {
            for listener in self.host.listeners(element, &event.kind) {
                let Some(&owner) = self.listeners.get(&listener) else {
                    continue;
                };
                report.listeners += 1;

                let Some(found) = delegate(&self.host, event, element) else {
                    report.discarded += 1;
                    tracing::trace!(part = %owner, kind = %event.kind, "No bound element on path");
                    continue;
                };

                let mut handled = Vec::new();
                let mut passive_handled = Vec::new();
                for binding in found.bindings {
                    let local_due = !seen.contains(&(owner, binding.key));
                    let passive_due = root == Some(owner)
                        && !passive_seen.contains(&binding.key)
                        && self.has_passive(&event.kind, binding.key);
                    if !local_due && !passive_due {
                        continue;
                    }
                    let msg = Message::new(binding.key, event.clone(), binding.payload);
                    report.messages += 1;
                    self.stats.messages += 1;

                    if local_due {
                        let local = self.dispatch_to(owner, &msg, Delivery::Local, &mut report);
                        if local.invoked > 0 {
                            // Ancestors only hear about a handled key by bubbling
                            for ancestor in self.ancestors(owner) {
                                seen.insert((ancestor, binding.key));
                            }
                        }
                        if local.bubble {
                            self.bubble(owner, &msg, &mut seen, &mut report);
                        }
                        handled.push((owner, binding.key));
                    }
                    if passive_due {
                        self.dispatch_passive(&msg, &mut report);
                        passive_handled.push(binding.key);
                    }
                }
                seen.extend(handled);
                passive_seen.extend(passive_handled);
            }
        }

        report
    }

    fn ancestors(&self, id: PartId) -> Vec<PartId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    /// Forward to ancestors until the root or a single-scoped registration
    fn bubble(
        &mut self,
        from: PartId,
        msg: &Message,
        seen: &mut HashSet<(PartId, KeyId)>,
        report: &mut DeliveryReport,
    ) {
        let mut current = self.parent(from);
        while let Some(parent) = current {
            seen.insert((parent, msg.key));
            let outcome = self.dispatch_to(parent, msg, Delivery::Local, report);
            if outcome.single {
                break;
            }
            current = self.parent(parent);
        }
    }

    fn has_passive(&self, kind: &EventKind, key: KeyId) -> bool {
        self.tree
            .passive
            .get(&HandlerKey::new(kind.clone(), key))
            .is_some_and(|routes| !routes.is_empty())
    }

    fn dispatch_passive(&mut self, msg: &Message, report: &mut DeliveryReport) {
        let routes = self
            .tree
            .passive
            .get(&HandlerKey::new(msg.kind.clone(), msg.key))
            .cloned()
            .unwrap_or_default();
        for id in routes {
            self.dispatch_to(id, msg, Delivery::Passive, report);
        }
    }

    fn dispatch_to(
        &mut self,
        id: PartId,
        msg: &Message,
        delivery: Delivery,
        report: &mut DeliveryReport,
    ) -> Dispatched {
        let Some(part) = self.tree.node_mut(id).and_then(|n| n.part.as_mut()) else {
            return Dispatched::default();
        };
        let outcome = part.dispatch(msg, delivery);
        let dirty = part.take_dirty();

        report.invoked += outcome.invoked;
        report.failed += outcome.failed;
        self.stats.handler_failures += outcome.failed as u64;
        // Pointer moves and scrolls would flood the debug log
        if outcome.invoked > 0 && msg.kind.is_high_frequency() {
            tracing::trace!(part = %id, key = %msg.key, kind = %msg.kind, "Dispatched message");
        } else if outcome.invoked > 0 {
            tracing::debug!(
                part = %id,
                key = %msg.key,
                kind = %msg.kind,
                invoked = outcome.invoked,
                "Dispatched message"
            );
        }
        if dirty {
            self.signal_dirty(id);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_host::MemoryHost;

    struct Static(&'static str);

    impl Part for Static {
        type State = ();

        fn render(&self, _: &(), _: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
            tag.p(()).text(self.0);
            Ok(())
        }
    }

    fn host() -> MemoryHost {
        MemoryHost::from_markup(r#"<div id="app"></div>"#).unwrap()
    }

    #[test]
    fn test_mount_renders_once() {
        let mut rt = Runtime::new(host());
        let root = rt.mount("app", Static("hi"), ()).unwrap();
        let app = rt.host().resolve("app").unwrap();
        assert_eq!(rt.host().inner_markup(app), "<p>hi</p>");
        assert_eq!(rt.stats().passes, 1);
        assert!(!rt.is_dirty(root));
        assert!(!rt.is_pending());
        assert!(rt.is_initialized(root));
    }

    #[test]
    fn test_mount_twice() {
        let mut rt = Runtime::new(host());
        rt.mount("app", Static("a"), ()).unwrap();
        assert!(matches!(rt.mount("app", Static("b"), ()), Err(PartError::AlreadyMounted)));
    }

    #[test]
    fn test_mount_unresolved() {
        let mut rt = Runtime::new(host());
        assert!(matches!(
            rt.mount("nowhere", Static("a"), ()),
            Err(PartError::Unresolved { .. })
        ));
        assert!(rt.root().is_none());
    }

    #[test]
    fn test_frame_without_signal_is_noop() {
        let mut rt = Runtime::new(host());
        rt.mount("app", Static("a"), ()).unwrap();
        let report = rt.frame().unwrap();
        assert!(report.rendered.is_empty());
        assert_eq!(rt.stats().passes, 1);
    }

    #[test]
    fn test_state_type_checked() {
        let mut rt = Runtime::new(host());
        let root = rt.mount("app", Static("a"), ()).unwrap();
        assert!(rt.state::<()>(root).is_ok());
        assert!(matches!(rt.state::<u32>(root), Err(PartError::StateType(_))));
        assert!(matches!(rt.update(root, |n: &mut u32| *n += 1), Err(PartError::StateType(_))));
    }
}
