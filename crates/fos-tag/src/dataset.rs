//! Dataset
//!
//! Nested `data-*` attribute tree. Nesting is flattened into dash-joined
//! attribute names when the tag is serialized.

use indexmap::IndexMap;

use crate::AttrValue;

/// Leaf value or nested map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    Value(AttrValue),
    Nested(Dataset),
}

macro_rules! data_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for DataValue {
                fn from(value: $ty) -> Self {
                    DataValue::Value(AttrValue::from(value))
                }
            }
        )*
    };
}

data_value_from!(
    &str, String, &String, char, bool,
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64,
);

impl From<AttrValue> for DataValue {
    fn from(value: AttrValue) -> Self {
        DataValue::Value(value)
    }
}

impl From<Dataset> for DataValue {
    fn from(data: Dataset) -> Self {
        DataValue::Nested(data)
    }
}

/// Nested data attribute map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: IndexMap<String, DataValue>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a leaf or nested value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataValue>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`Dataset::insert`]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<DataValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form for a nested map
    pub fn nest(self, key: impl Into<String>, data: Dataset) -> Self {
        self.set(key, data)
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge per leaf key; nested maps merge recursively, the last leaf wins
    pub fn merge(&mut self, other: Dataset) {
        for (key, value) in other.entries {
            match (self.entries.get_mut(&key), value) {
                (Some(DataValue::Nested(mine)), DataValue::Nested(theirs)) => mine.merge(theirs),
                (_, value) => {
                    self.entries.insert(key, value);
                }
            }
        }
    }

    /// Flattened `(suffix, value)` pairs, suffixes kebab-cased and dash-joined
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for (key, value) in &self.entries {
            let name = if prefix.is_empty() {
                to_kebab_case(key)
            } else {
                format!("{prefix}-{}", to_kebab_case(key))
            };
            match value {
                DataValue::Value(v) => out.push((name, v.as_str().to_string())),
                DataValue::Nested(nested) => nested.flatten_into(&name, out),
            }
        }
    }

    /// Full attribute names: `data-<suffix>`
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.flatten()
            .into_iter()
            .map(|(name, value)| (format!("data-{name}"), value))
            .collect()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Dataset
where
    K: Into<String>,
    V: Into<DataValue>,
{
    fn from(entries: [(K, V); N]) -> Self {
        let mut data = Dataset::new();
        for (key, value) in entries {
            data.insert(key, value);
        }
        data
    }
}

/// Convert camelCase to kebab-case
fn to_kebab_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for c in s.chars() {
        if c.is_ascii_uppercase() {
            result.push('-');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested() {
        let data = Dataset::new()
            .set("id", 7)
            .nest("user", Dataset::new().set("name", "ann").set("isAdmin", true));
        assert_eq!(
            data.attributes(),
            vec![
                ("data-id".to_string(), "7".to_string()),
                ("data-user-name".to_string(), "ann".to_string()),
                ("data-user-is-admin".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_per_leaf() {
        let mut data = Dataset::new().nest("a", Dataset::from([("x", 1), ("y", 2)]));
        data.merge(Dataset::new().nest("a", Dataset::from([("y", 3)])));
        assert_eq!(
            data.flatten(),
            vec![("a-x".to_string(), "1".to_string()), ("a-y".to_string(), "3".to_string())]
        );
    }

    #[test]
    fn test_leaf_replaces_nested() {
        let mut data = Dataset::new().nest("a", Dataset::from([("x", 1)]));
        data.merge(Dataset::from([("a", "flat")]));
        assert_eq!(data.flatten(), vec![("a".to_string(), "flat".to_string())]);
    }

    #[test]
    fn test_kebab() {
        assert_eq!(to_kebab_case("userId"), "user-id");
        assert_eq!(to_kebab_case("k3"), "k3");
    }
}
