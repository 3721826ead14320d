//! Inline style
//!
//! Property map written as a single `style` declaration.

use indexmap::IndexMap;

use crate::AttrValue;

/// Inline style declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    props: IndexMap<String, AttrValue>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one property, last write wins
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.props.get(name).map(AttrValue::as_str)
    }

    /// Merge another style into this one
    pub fn merge(&mut self, other: Style) {
        for (name, value) in other.props {
            self.props.insert(name, value);
        }
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `name:value;name:value`
    pub fn declaration(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Style
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from(props: [(K, V); N]) -> Self {
        let mut style = Style::new();
        for (name, value) in props {
            style.set(name, value);
        }
        style
    }
}

impl<K, V> FromIterator<(K, V)> for Style
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Style::new();
        for (name, value) in iter {
            style.set(name, value);
        }
        style
    }
}
