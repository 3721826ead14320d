//! Edge case tests for fos-tag

use fos_tag::{Attrs, Tag, TagError};

#[test]
fn test_no_self_closing() {
    let mut root = Tag::new("div");
    root.img(Attrs::new().attr("src", "a.png"));
    root.el("br", ());
    assert_eq!(root.to_markup(), r#"<div><img src="a.png"></img><br></br></div>"#);
}

#[test]
fn test_unknown_attribute_passthrough() {
    let mut tag = Tag::new("x-widget");
    tag.set_attr("aria-whatever", 1).set_attr("weird_name", false);
    assert_eq!(
        tag.to_markup(),
        r#"<x-widget aria-whatever="1" weird_name="false"></x-widget>"#
    );
}

#[test]
#[should_panic(expected = "Invalid selector")]
fn test_invalid_shorthand_panics() {
    let mut tag = Tag::new("div");
    tag.apply("div.x");
}

#[test]
fn test_invalid_shorthand_fallible() {
    let err = "~a".parse::<fos_tag::Selector>().unwrap_err();
    assert!(matches!(err, TagError::InvalidSelector { found: '~', position: 0, .. }));
}

#[test]
fn test_text_before_children() {
    let mut tag = Tag::new("p");
    tag.strong(()).text("bold");
    tag.text("lead ");
    assert_eq!(tag.to_markup(), "<p>lead <strong>bold</strong></p>");
}

#[test]
fn test_empty_class_list_and_style_omitted() {
    let mut tag = Tag::new("div");
    tag.class(Vec::<String>::new());
    tag.style(fos_tag::Style::new());
    assert_eq!(tag.to_markup(), "<div></div>");
}

#[test]
fn test_deep_nesting() {
    let mut root = Tag::new("div");
    let mut cursor = &mut root;
    for _ in 0..100 {
        cursor = cursor.div(());
    }
    cursor.text("leaf");
    let markup = root.to_markup();
    assert!(markup.ends_with("leaf</div></div>"));
    assert_eq!(markup.matches("<div>").count(), 101);
}

#[test]
fn test_unicode_text() {
    let mut tag = Tag::new("span");
    tag.text("héllo → wörld");
    assert_eq!(tag.to_markup(), "<span>héllo → wörld</span>");
}
