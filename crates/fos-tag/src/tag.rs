//! Tag node
//!
//! In-memory markup node built top-down during a render pass and dropped
//! after serialization. Children are owned exclusively.

use indexmap::IndexMap;

use crate::{Apply, AttrValue, ClassList, Dataset, EventKind, Style};

/// Markup node under construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tag {
    pub(crate) name: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: ClassList,
    pub(crate) style: Option<Style>,
    pub(crate) attrs: IndexMap<String, AttrValue>,
    pub(crate) text: Option<String>,
    pub(crate) data: Option<Dataset>,
    pub(crate) children: Vec<Tag>,
    /// Key ids bound per event kind, in bind order
    pub(crate) events: IndexMap<EventKind, Vec<String>>,
}

/// A component that can render itself inside a wrapper tag
pub trait Embed {
    type Error;

    /// Element name of the wrapper
    fn host_tag(&self) -> &str;

    /// Identifier carried by the wrapper
    fn host_id(&self) -> &str;

    /// Populate the wrapper. Only the text and children written into
    /// `wrapper` are kept; its own attributes and bindings are dropped,
    /// so the wrapper always carries just its identifier.
    fn render_into(&mut self, wrapper: &mut Tag) -> Result<(), Self::Error>;
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            ..Default::default()
        }
    }

    // === Accessors ===

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &ClassList {
        &self.classes
    }

    pub fn inline_style(&self) -> Option<&Style> {
        self.style.as_ref()
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(AttrValue::as_str)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn text_content(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.data.as_ref()
    }

    pub fn children(&self) -> &[Tag] {
        &self.children
    }

    pub fn events(&self) -> impl Iterator<Item = (&EventKind, &[String])> {
        self.events.iter().map(|(kind, keys)| (kind, keys.as_slice()))
    }

    /// Key ids bound to `kind` on this node
    pub fn bound_keys(&self, kind: &EventKind) -> &[String] {
        self.events.get(kind).map(Vec::as_slice).unwrap_or(&[])
    }

    // === Builders ===

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    /// Add classes; classes accumulate and never replace
    pub fn class<I, S>(&mut self, classes: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes);
        self
    }

    /// Merge into the inline style
    pub fn style(&mut self, style: impl Into<Style>) -> &mut Self {
        self.style.get_or_insert_with(Style::new).merge(style.into());
        self
    }

    /// Merge into the data attribute tree
    pub fn data(&mut self, data: impl Into<Dataset>) -> &mut Self {
        self.data.get_or_insert_with(Dataset::new).merge(data.into());
        self
    }

    /// Raw attribute, passed through verbatim
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    pub fn apply(&mut self, args: impl Apply) -> &mut Self {
        args.apply(self);
        self
    }

    pub fn with(&mut self, build: impl FnOnce(&mut Tag)) -> &mut Self {
        build(self);
        self
    }

    /// Record a key id for an event kind. Binding the same key twice keeps both.
    pub fn bind_key(&mut self, kind: impl Into<EventKind>, key: impl Into<String>) -> &mut Self {
        self.events.entry(kind.into()).or_default().push(key.into());
        self
    }

    /// Append a child element of any name
    pub fn el(&mut self, name: impl Into<String>, args: impl Apply) -> &mut Tag {
        let mut child = Tag::new(name);
        args.apply(&mut child);
        self.push(child)
    }

    /// Append an already built child
    pub fn push(&mut self, child: Tag) -> &mut Tag {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// Insert a wrapper carrying the component's identifier and render the
    /// component into it. The wrapper stays attached if rendering fails.
    pub fn embed<E: Embed + ?Sized>(&mut self, part: &mut E) -> Result<&mut Tag, E::Error> {
        let mut wrapper = Tag::new(part.host_tag());
        wrapper.set_id(part.host_id());
        let mut content = Tag::new(part.host_tag());
        let result = part.render_into(&mut content);
        let wrapper = self.push(wrapper);
        wrapper.adopt_content(content);
        result?;
        Ok(wrapper)
    }

    /// Take the text and children of `from`, leaving its attributes behind
    pub fn adopt_content(&mut self, from: Tag) -> &mut Self {
        if from.text.is_some() {
            self.text = from.text;
        }
        self.children.extend(from.children);
        self
    }
}

macro_rules! elements {
    ($($name:ident),* $(,)?) => {
        impl Tag {
            $(
                #[doc = concat!("Append a `<", stringify!($name), ">` child")]
                pub fn $name(&mut self, args: impl Apply) -> &mut Tag {
                    self.el(stringify!($name), args)
                }
            )*
        }
    };
}

elements!(
    div, span, p, a, button, ul, ol, li, input, label,
    h1, h2, h3, h4, h5, h6,
    section, header, footer, nav, main, article, aside,
    form, fieldset, legend,
    table, thead, tbody, tr, td, th,
    img, canvas, select, option, textarea,
    strong, em, b, i, small, pre, code,
    dl, dt, dd,
);
