//! In-memory host document
//!
//! Arena of nodes with a document root at index 0. Slots of removed nodes
//! are emptied, never reused, so stale [`ElementRef`]s resolve to nothing.
//! The arena therefore only grows: every content replacement adds slots
//! and none are reclaimed. It is meant for tests and short-lived sessions.

use indexmap::IndexMap;

use fos_tag::{escape_attr, escape_text};

use crate::{ElementRef, EventKind, Host, HostError, ListenerId, NativeEvent};

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Document,
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<ElementRef>,
    children: Vec<ElementRef>,
    data: NodeData,
}

#[derive(Debug, Clone)]
struct Listener {
    element: ElementRef,
    kind: EventKind,
}

/// In-memory document implementing [`Host`]
///
/// Memory grows with every write, see the module docs.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    nodes: Vec<Option<Node>>,
    listeners: IndexMap<ListenerId, Listener>,
    next_listener: u64,
    frame_requests: usize,
    writes: usize,
}

impl MemoryHost {
    /// Empty document
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            })],
            listeners: IndexMap::new(),
            next_listener: 1,
            frame_requests: 0,
            writes: 0,
        }
    }

    /// Document holding parsed `markup`
    pub fn from_markup(markup: &str) -> Result<Self, HostError> {
        let mut host = Self::new();
        let root = host.root();
        host.append_markup(root, markup)?;
        Ok(host)
    }

    /// Document node
    pub fn root(&self) -> ElementRef {
        ElementRef(0)
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, el: ElementRef) -> Option<&Node> {
        self.nodes.get(el.0 as usize).and_then(Option::as_ref)
    }

    pub(crate) fn insert(&mut self, parent: ElementRef, data: NodeData) -> ElementRef {
        let id = ElementRef(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            parent: Some(parent),
            children: Vec::new(),
            data,
        }));
        if let Some(Some(p)) = self.nodes.get_mut(parent.0 as usize) {
            p.children.push(id);
        }
        id
    }

    /// Check the element is still in the document
    pub fn contains(&self, el: ElementRef) -> bool {
        self.node(el).is_some()
    }

    pub fn tag_name(&self, el: ElementRef) -> Option<&str> {
        match &self.node(el)?.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn parent(&self, el: ElementRef) -> Option<ElementRef> {
        self.node(el)?.parent
    }

    /// Element children, in document order
    pub fn children(&self, el: ElementRef) -> Vec<ElementRef> {
        self.node(el)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|c| self.tag_name(*c).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self, el: ElementRef) -> String {
        let mut out = String::new();
        self.collect_text(el, &mut out);
        out
    }

    fn collect_text(&self, el: ElementRef, out: &mut String) {
        let Some(node) = self.node(el) else { return };
        if let NodeData::Text(text) = &node.data {
            out.push_str(text);
        }
        for child in &node.children {
            self.collect_text(*child, out);
        }
    }

    /// Serialized children of `el`
    pub fn inner_markup(&self, el: ElementRef) -> String {
        let mut out = String::new();
        if let Some(node) = self.node(el) {
            for child in &node.children {
                self.write_node(*child, &mut out);
            }
        }
        out
    }

    fn write_node(&self, el: ElementRef, out: &mut String) {
        let Some(node) = self.node(el) else { return };
        match &node.data {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                for (attr, value) in attrs {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                for child in &node.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            NodeData::Document => {
                for child in &node.children {
                    self.write_node(*child, out);
                }
            }
        }
    }

    /// First element, in document order, whose attribute `name` equals `value`
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<ElementRef> {
        self.find_all_by_attribute(name, value).into_iter().next()
    }

    pub fn find_all_by_attribute(&self, name: &str, value: &str) -> Vec<ElementRef> {
        let mut found = Vec::new();
        self.walk(self.root(), &mut |host, el| {
            if host.attribute(el, name).as_deref() == Some(value) {
                found.push(el);
            }
        });
        found
    }

    /// First element with the given tag name, in document order
    pub fn find_by_tag(&self, tag: &str) -> Option<ElementRef> {
        let mut found = None;
        self.walk(self.root(), &mut |host, el| {
            if found.is_none() && host.tag_name(el).is_some_and(|n| n.eq_ignore_ascii_case(tag)) {
                found = Some(el);
            }
        });
        found
    }

    fn walk(&self, el: ElementRef, visit: &mut dyn FnMut(&Self, ElementRef)) {
        let Some(node) = self.node(el) else { return };
        if matches!(node.data, NodeData::Element { .. }) {
            visit(self, el);
        }
        for child in &node.children {
            self.walk(*child, visit);
        }
    }

    /// Build a native event fired at `target`. The path runs from the
    /// target to the outermost element; the document node is not part of it.
    pub fn event(&self, kind: impl Into<EventKind>, target: ElementRef) -> NativeEvent {
        let mut path = Vec::new();
        let mut current = Some(target);
        while let Some(el) = current {
            if el == self.root() || !self.contains(el) {
                break;
            }
            path.push(el);
            current = self.parent(el);
        }
        NativeEvent::new(kind, target, path)
    }

    /// Number of frame callbacks requested so far
    pub fn frame_requests(&self) -> usize {
        self.frame_requests
    }

    /// Number of content replacements so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Remove every descendant of `el`, returning how many nodes went away
    fn clear_children(&mut self, el: ElementRef) -> usize {
        let children = match self.nodes.get_mut(el.0 as usize).and_then(Option::as_mut) {
            Some(node) => std::mem::take(&mut node.children),
            None => return 0,
        };
        let mut removed = 0;
        let mut stack = children;
        while let Some(child) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(child.0 as usize).and_then(Option::take) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        let nodes = &self.nodes;
        self.listeners
            .retain(|_, l| nodes.get(l.element.0 as usize).is_some_and(Option::is_some));
        removed
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryHost {
    fn resolve(&self, id: &str) -> Option<ElementRef> {
        self.find_by_attribute("id", id)
    }

    fn replace_content(&mut self, element: ElementRef, markup: &str) -> Result<(), HostError> {
        match self.node(element).map(|n| &n.data) {
            None => return Err(HostError::UnknownElement(element)),
            Some(NodeData::Text(_)) => return Err(HostError::NotAContainer(element)),
            Some(_) => {}
        }
        let removed = self.clear_children(element);
        let added = self.append_markup(element, markup)?;
        self.writes += 1;
        tracing::trace!(element = element.0, removed, added, "Replaced content");
        Ok(())
    }

    fn attribute(&self, element: ElementRef, name: &str) -> Option<String> {
        match &self.node(element)?.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|(attr, _)| attr.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone()),
            _ => None,
        }
    }

    fn listen(&mut self, element: ElementRef, kind: &EventKind) -> Result<ListenerId, HostError> {
        if !self.contains(element) {
            return Err(HostError::UnknownElement(element));
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(
            id,
            Listener {
                element,
                kind: kind.clone(),
            },
        );
        Ok(id)
    }

    fn unlisten(&mut self, listener: ListenerId) -> bool {
        self.listeners.shift_remove(&listener).is_some()
    }

    fn listeners(&self, element: ElementRef, kind: &EventKind) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, l)| l.element == element && &l.kind == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_resolve() {
        let host = MemoryHost::from_markup(r#"<div id="app"><p>Hello</p></div>"#).unwrap();
        let app = host.resolve("app").unwrap();
        assert_eq!(host.tag_name(app), Some("div"));
        assert_eq!(host.text_content(app), "Hello");
        assert_eq!(host.inner_markup(app), "<p>Hello</p>");
        assert!(host.resolve("missing").is_none());
    }

    #[test]
    fn test_replace_drops_nested_listeners() {
        let mut host =
            MemoryHost::from_markup(r#"<div id="app"><button id="b">x</button></div>"#).unwrap();
        let app = host.resolve("app").unwrap();
        let button = host.resolve("b").unwrap();
        host.listen(app, &EventKind::Click).unwrap();
        host.listen(button, &EventKind::Click).unwrap();
        assert_eq!(host.listener_count(), 2);

        host.replace_content(app, "<span>y</span>").unwrap();
        assert_eq!(host.listener_count(), 1);
        assert!(!host.contains(button));
        assert_eq!(host.listeners(app, &EventKind::Click).len(), 1);
        assert_eq!(host.writes(), 1);
    }

    #[test]
    fn test_replaced_slots_are_not_reused() {
        let mut host = MemoryHost::from_markup(r#"<div id="app"><p id="old">x</p></div>"#).unwrap();
        let app = host.resolve("app").unwrap();
        let old = host.resolve("old").unwrap();

        let mut sizes = vec![host.node_count()];
        for n in 0..3 {
            host.replace_content(app, &format!(r#"<p id="new">{n}</p>"#)).unwrap();
            sizes.push(host.node_count());
        }
        assert!(sizes.windows(2).all(|w| w[0] < w[1]));
        assert!(!host.contains(old));
        assert_ne!(host.resolve("new"), Some(old));
        assert_eq!(host.text_content(app), "2");
    }

    #[test]
    fn test_event_path() {
        let host = MemoryHost::from_markup(r#"<div id="a"><ul id="b"><li id="c">x</li></ul></div>"#)
            .unwrap();
        let li = host.resolve("c").unwrap();
        let event = host.event("click", li);
        let ids: Vec<_> = event
            .path
            .iter()
            .map(|el| host.attribute(*el, "id").unwrap())
            .collect();
        assert_eq!(ids, ["c", "b", "a"]);
        assert!(event.bubbles);

        let focus = host.event(EventKind::Focus, li);
        assert_eq!(focus.reached(), &[li]);
    }

    #[test]
    fn test_attribute_case_insensitive() {
        let host = MemoryHost::from_markup(r#"<p id="x" data-__click__="k1;k2"></p>"#).unwrap();
        let p = host.resolve("x").unwrap();
        assert_eq!(host.attribute(p, "DATA-__CLICK__").as_deref(), Some("k1;k2"));
    }

    #[test]
    fn test_unknown_element() {
        let mut host = MemoryHost::new();
        let bogus = ElementRef::new(99);
        assert_eq!(
            host.replace_content(bogus, "<p></p>"),
            Err(HostError::UnknownElement(bogus))
        );
        assert!(host.listen(bogus, &EventKind::Click).is_err());
    }
}
