//! Builder arguments
//!
//! Every element method accepts an [`Apply`] value: selector shorthand,
//! an [`Attrs`] configuration, a closure receiving the new tag, or a
//! tuple mixing them. Forms are applied left to right.

use indexmap::IndexMap;

use crate::{Dataset, Selector, Style, Tag};

/// Stringified attribute value
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttrValue(String);

impl AttrValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! attr_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(value: $ty) -> Self {
                    AttrValue(value.to_string())
                }
            }
        )*
    };
}

attr_value_from!(
    &str, String, &String, char, bool,
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

/// Something that can configure a tag
pub trait Apply {
    fn apply(self, tag: &mut Tag);
}

impl Apply for () {
    fn apply(self, _tag: &mut Tag) {}
}

/// Selector shorthand.
///
/// # Panics
///
/// Panics when the text is not a valid selector; use [`Selector::parse`]
/// to handle that case instead.
impl Apply for &str {
    #[track_caller]
    fn apply(self, tag: &mut Tag) {
        match Selector::parse(self) {
            Ok(selector) => selector.apply(tag),
            Err(err) => panic!("{err}"),
        }
    }
}

impl Apply for String {
    #[track_caller]
    fn apply(self, tag: &mut Tag) {
        self.as_str().apply(tag)
    }
}

impl Apply for Selector {
    fn apply(self, tag: &mut Tag) {
        let (id, classes) = self.into_parts();
        if let Some(id) = id {
            tag.set_id(id);
        }
        tag.class(classes);
    }
}

impl<F> Apply for F
where
    F: FnOnce(&mut Tag),
{
    fn apply(self, tag: &mut Tag) {
        self(tag)
    }
}

impl<T: Apply> Apply for Option<T> {
    fn apply(self, tag: &mut Tag) {
        if let Some(inner) = self {
            inner.apply(tag);
        }
    }
}

impl<A: Apply, B: Apply> Apply for (A, B) {
    fn apply(self, tag: &mut Tag) {
        self.0.apply(tag);
        self.1.apply(tag);
    }
}

impl<A: Apply, B: Apply, C: Apply> Apply for (A, B, C) {
    fn apply(self, tag: &mut Tag) {
        self.0.apply(tag);
        self.1.apply(tag);
        self.2.apply(tag);
    }
}

impl<A: Apply, B: Apply, C: Apply, D: Apply> Apply for (A, B, C, D) {
    fn apply(self, tag: &mut Tag) {
        self.0.apply(tag);
        self.1.apply(tag);
        self.2.apply(tag);
        self.3.apply(tag);
    }
}

/// Recognized attribute configuration
///
/// Classes accumulate, style and data merge per leaf key, everything
/// else overwrites.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attrs {
    pub id: Option<String>,
    pub class: Vec<String>,
    pub style: Option<Style>,
    pub data: Option<Dataset>,
    /// Raw attributes, passed through verbatim
    pub attrs: IndexMap<String, AttrValue>,
    pub text: Option<String>,
}

impl Attrs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn style(mut self, style: impl Into<Style>) -> Self {
        self.style.get_or_insert_with(Style::new).merge(style.into());
        self
    }

    pub fn data(mut self, data: impl Into<Dataset>) -> Self {
        self.data.get_or_insert_with(Dataset::new).merge(data.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

impl Apply for Attrs {
    fn apply(self, tag: &mut Tag) {
        if let Some(id) = self.id {
            tag.set_id(id);
        }
        tag.class(self.class);
        if let Some(style) = self.style {
            tag.style(style);
        }
        if let Some(data) = self.data {
            tag.data(data);
        }
        for (name, value) in self.attrs {
            tag.set_attr(name, value);
        }
        if let Some(text) = self.text {
            tag.text(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_values_stringified() {
        assert_eq!(AttrValue::from(3).as_str(), "3");
        assert_eq!(AttrValue::from(1.5).as_str(), "1.5");
        assert_eq!(AttrValue::from(true).as_str(), "true");
        assert_eq!(AttrValue::from("x").as_str(), "x");
    }

    #[test]
    fn test_attrs_builder_merges_style() {
        let attrs = Attrs::new()
            .style([("color", "red")])
            .style([("color", "blue"), ("size", "1")]);
        let style = attrs.style.unwrap();
        assert_eq!(style.get("color"), Some("blue"));
        assert_eq!(style.get("size"), Some("1"));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_tuple_applies_left_to_right() {
        let mut tag = Tag::new("div");
        tag.apply((".a#first", Attrs::new().id("second").class(["b"])));
        assert_eq!(tag.id(), Some("second"));
        assert_eq!(tag.classes().value(), "a b");
    }

    #[test]
    fn test_closure_form() {
        let mut tag = Tag::new("ul");
        tag.apply(|t: &mut Tag| {
            t.li(".x");
        });
        assert_eq!(tag.children().len(), 1);
    }

    #[test]
    fn test_option_form() {
        let mut tag = Tag::new("p");
        tag.apply((Some(".on"), None::<Attrs>));
        assert_eq!(tag.classes().value(), "on");
    }
}
