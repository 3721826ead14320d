//! Edge case tests for fos-part

use fos_host::{Host, MemoryHost};
use fos_part::{Part, PartError, RenderCx, Runtime, RuntimeConfig};
use fos_tag::Tag;

struct Text(&'static str);

impl Part for Text {
    type State = ();

    fn render(&self, _: &(), _: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
        tag.text(self.0);
        Ok(())
    }

    fn host_tag(&self) -> &str {
        "section"
    }
}

/// Embeds a part that is not its child
struct Stranger;

impl Part for Stranger {
    type State = ();

    fn render(&self, _: &(), cx: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
        let me = cx.id();
        cx.embed(tag, me)?;
        Ok(())
    }
}

fn host() -> MemoryHost {
    MemoryHost::from_markup(r#"<div id="app"></div><div id="other"></div>"#).unwrap()
}

#[test]
fn test_render_pass_before_mount() {
    let mut rt = Runtime::new(host());
    assert!(matches!(rt.render_pass(), Err(PartError::NotMounted)));
    assert!(rt.frame().unwrap().rendered.is_empty());
}

#[test]
fn test_unknown_part_operations() {
    let mut rt = Runtime::new(host());
    let root = rt.mount("app", Text("x"), ()).unwrap();
    rt.remove_child(root, root).unwrap_err();

    let ghost = {
        let mut other = Runtime::new(host());
        let r = other.mount("app", Text("y"), ()).unwrap();
        other.create_child(r, Text("z"), ()).unwrap()
    };
    assert!(matches!(rt.mark_dirty(ghost), Err(PartError::UnknownPart(_))));
    assert!(matches!(rt.create_child(ghost, Text("w"), ()), Err(PartError::UnknownPart(_))));
    assert_eq!(rt.part_name(ghost), None);
    assert!(!rt.is_dirty(ghost));
}

#[test]
fn test_root_text_only() {
    let mut rt = Runtime::new(host());
    rt.mount("app", Text("a < b"), ()).unwrap();
    let app = rt.host().resolve("app").unwrap();
    assert_eq!(rt.host().inner_markup(app), "a &lt; b");
    let other = rt.host().resolve("other").unwrap();
    assert_eq!(rt.host().inner_markup(other), "");
}

#[test]
fn test_embedding_non_child_fails_render() {
    let mut rt = Runtime::new(host());
    let err = rt.mount("app", Stranger, ()).unwrap_err();
    assert!(matches!(err, PartError::Render { .. }));
    assert!(err.to_string().contains("failed"));
}

#[test]
fn test_wrapper_uses_part_host_tag() {
    struct Holder;

    impl Part for Holder {
        type State = ();

        fn init(&mut self, cx: &mut fos_part::Init<'_, ()>) {
            cx.create_child(Text("inside"), ());
        }

        fn render(&self, _: &(), cx: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
            for child in cx.children() {
                cx.embed(tag, child)?;
            }
            Ok(())
        }
    }

    let mut rt = Runtime::new(host());
    rt.mount("app", Holder, ()).unwrap();
    let app = rt.host().resolve("app").unwrap();
    assert_eq!(rt.host().inner_markup(app), r#"<section id="part-1">inside</section>"#);
}

/// Sets attributes on its own wrapper, which never reach the host
struct Decorated;

impl Part for Decorated {
    type State = u32;

    fn render(&self, n: &u32, _: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
        tag.class(["decorated"]).set_attr("title", "x");
        tag.span(()).text(n.to_string());
        Ok(())
    }
}

#[test]
fn test_wrapper_attributes_dropped_on_both_render_paths() {
    struct Holder;

    impl Part for Holder {
        type State = ();

        fn init(&mut self, cx: &mut fos_part::Init<'_, ()>) {
            cx.create_child(Decorated, 0);
        }

        fn render(&self, _: &(), cx: &mut RenderCx<'_>, tag: &mut Tag) -> anyhow::Result<()> {
            for child in cx.children() {
                cx.embed(tag, child)?;
            }
            Ok(())
        }
    }

    let mut rt = Runtime::new(host());
    let root = rt.mount("app", Holder, ()).unwrap();
    let app = rt.host().resolve("app").unwrap();
    assert_eq!(rt.host().inner_markup(app), r#"<div id="part-1"><span>0</span></div>"#);

    // The child's own re-render leaves the same bare wrapper
    let child = rt.children(root)[0];
    rt.update(child, |n: &mut u32| *n += 1).unwrap();
    let report = rt.frame().unwrap();
    assert_eq!(report.rendered, vec![child]);
    assert_eq!(rt.host().inner_markup(app), r#"<div id="part-1"><span>1</span></div>"#);
}

#[test]
fn test_config_from_partial_json() {
    let config = RuntimeConfig::from_json(r#"{"part_id_prefix": "c"}"#).unwrap();
    assert_eq!(config.part_id_prefix, "c");
    assert_eq!(config.first_key, 1);
    assert!(config.isolate_handlers);
}
