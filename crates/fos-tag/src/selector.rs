//! Selector shorthand
//!
//! `.a.b#main` style text assigning classes and an identifier.
//! Segments compose left to right; a later `#` overrides an earlier one.

use std::str::FromStr;

use crate::TagError;

/// Parsed selector shorthand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse shorthand text. Whitespace between segments is ignored.
    pub fn parse(text: &str) -> Result<Self, TagError> {
        let mut selector = Selector::default();
        let mut chars = text.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            if c.is_whitespace() {
                continue;
            }
            if c != '.' && c != '#' {
                return Err(TagError::InvalidSelector {
                    selector: text.to_string(),
                    position,
                    found: c,
                });
            }

            let mut name = String::new();
            while let Some(&(_, next)) = chars.peek() {
                if next == '.' || next == '#' || next.is_whitespace() {
                    break;
                }
                name.push(next);
                chars.next();
            }
            if name.is_empty() {
                return Err(TagError::EmptySelectorName {
                    selector: text.to_string(),
                    position,
                });
            }

            if c == '#' {
                selector.id = Some(name);
            } else {
                selector.classes.push(name);
            }
        }

        Ok(selector)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn into_parts(self) -> (Option<String>, Vec<String>) {
        (self.id, self.classes)
    }
}

impl FromStr for Selector {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classes_and_id() {
        let sel = Selector::parse(".btn.primary#save").unwrap();
        assert_eq!(sel.id(), Some("save"));
        assert_eq!(sel.classes(), ["btn", "primary"]);
    }

    #[test]
    fn test_later_id_wins() {
        let sel: Selector = "#a .x #b".parse().unwrap();
        assert_eq!(sel.id(), Some("b"));
        assert_eq!(sel.classes(), ["x"]);
    }

    #[test]
    fn test_empty_text() {
        let sel = Selector::parse("").unwrap();
        assert_eq!(sel, Selector::default());
    }

    #[test]
    fn test_invalid_character() {
        let err = Selector::parse(".a x").unwrap_err();
        assert_eq!(
            err,
            TagError::InvalidSelector {
                selector: ".a x".to_string(),
                position: 3,
                found: 'x',
            }
        );
    }

    #[test]
    fn test_empty_name() {
        assert!(matches!(
            Selector::parse(".a.").unwrap_err(),
            TagError::EmptySelectorName { position: 2, .. }
        ));
    }
}
