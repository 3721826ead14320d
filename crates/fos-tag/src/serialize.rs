//! Markup serialization
//!
//! Depth-first: open tag, attributes, reserved event attributes, text,
//! children, close tag. Empty nodes still get an explicit close tag.

use std::fmt;

use crate::Tag;

impl Tag {
    /// Serialize this node and its subtree
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    /// Serialize the text and children only, without this node's own tags
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        self.write_inner(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);

        if let Some(id) = &self.id {
            write_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            write_attr(out, "class", &self.classes.value());
        }
        for (name, value) in &self.attrs {
            write_attr(out, name, value.as_str());
        }
        if let Some(data) = &self.data {
            for (name, value) in data.attributes() {
                write_attr(out, &name, &value);
            }
        }
        if let Some(style) = self.style.as_ref().filter(|s| !s.is_empty()) {
            write_attr(out, "style", &style.declaration());
        }
        for (kind, keys) in &self.events {
            if !keys.is_empty() {
                write_attr(out, &kind.attribute_name(), &keys.join(";"));
            }
        }
        out.push('>');

        self.write_inner(out);

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn write_inner(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(&escape_text(text));
        }
        for child in &self.children {
            child.write_markup(out);
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

/// Escape literal text content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attrs, Dataset};

    #[test]
    fn test_empty_node_has_close_tag() {
        assert_eq!(Tag::new("div").to_markup(), "<div></div>");
        assert_eq!(Tag::new("input").to_markup(), "<input></input>");
    }

    #[test]
    fn test_attribute_order() {
        let mut tag = Tag::new("button");
        tag.apply((
            "#save.primary",
            Attrs::new()
                .attr("type", "submit")
                .data(Dataset::from([("rowId", 4)]))
                .style([("color", "red")])
                .text("Save"),
        ));
        tag.bind_key("click", "k1").bind_key("click", "k2");
        assert_eq!(
            tag.to_markup(),
            r#"<button id="save" class="primary" type="submit" data-row-id="4" style="color:red" data-__click__="k1;k2">Save</button>"#
        );
    }

    #[test]
    fn test_inner_markup() {
        let mut tag = Tag::new("ul");
        tag.li(()).text("a");
        tag.li(()).text("b");
        assert_eq!(tag.inner_markup(), "<li>a</li><li>b</li>");
        assert_eq!(tag.to_string(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_escaping() {
        let mut tag = Tag::new("p");
        tag.set_attr("title", "a \"b\" & c").text("1 < 2");
        assert_eq!(
            tag.to_markup(),
            r#"<p title="a &quot;b&quot; &amp; c">1 &lt; 2</p>"#
        );
    }
}
