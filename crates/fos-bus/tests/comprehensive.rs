//! Comprehensive tests for fos-bus
//!
//! Markup produced by the tag builder is decoded back into handler
//! dispatch through an in-memory host.

use fos_bus::{BindExt, Delivery, HandlerMap, KeySource, Message, Registration};
use fos_host::{Host, MemoryHost};
use fos_tag::Tag;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Default)]
struct Log {
    calls: Vec<String>,
}

fn render(markup: &Tag) -> MemoryHost {
    let mut host = MemoryHost::from_markup(r#"<div id="app"></div>"#).unwrap();
    let app = host.resolve("app").unwrap();
    host.replace_content(app, &markup.inner_markup()).unwrap();
    host
}

#[test]
fn test_delegation_round_trip_with_payload() {
    let mut keys = KeySource::new();
    let k = keys.key();
    let other = keys.key();

    let mut root = Tag::new("div");
    root.ul(()).with(|ul| {
        ul.li("#target").on_payload("click", &k, &json!({"n": 3})).unwrap();
        ul.li("#plain").on("click", &other);
    });
    let host = render(&root);
    let app = host.resolve("app").unwrap();

    let mut map: HandlerMap<Log> = HandlerMap::new();
    map.register("click", k.id(), Registration::new(|log: &mut Log, msg: &Message| {
        log.calls.push(format!("first {}", msg.payload.clone().unwrap()));
    }));
    map.register("click", k.id(), Registration::new(|log: &mut Log, msg: &Message| {
        log.calls.push(format!("second {}", msg.payload.clone().unwrap()));
    }));
    map.register("click", other.id(), Registration::new(|log: &mut Log, _: &Message| {
        log.calls.push("other".to_string());
    }));

    let target = host.resolve("target").unwrap();
    let mut log = Log::default();
    let outcome = map.handle(&mut log, &host, &host.event("click", target), app);

    assert_eq!(outcome.invoked, 2);
    assert_eq!(log.calls, [r#"first {"n":3}"#, r#"second {"n":3}"#]);
}

#[test]
fn test_event_without_anchor_is_discarded() {
    let mut keys = KeySource::new();
    let k = keys.key();
    let mut root = Tag::new("div");
    root.p("#bound").on("click", &k);
    root.p("#loose");
    let host = render(&root);
    let app = host.resolve("app").unwrap();

    let mut map: HandlerMap<u32> = HandlerMap::new();
    map.register("click", k.id(), Registration::new(|n: &mut u32, _: &Message| *n += 1));

    let mut n = 0;
    let loose = host.resolve("loose").unwrap();
    assert_eq!(map.handle(&mut n, &host, &host.event("click", loose), app).invoked, 0);
    let bound = host.resolve("bound").unwrap();
    assert_eq!(map.handle(&mut n, &host, &host.event("click", bound), app).invoked, 1);
    assert_eq!(n, 1);
}

#[test]
fn test_key_bound_twice_dispatches_twice() {
    let mut keys = KeySource::new();
    let k = keys.key();
    let mut root = Tag::new("div");
    root.button("#b").on("click", &k).on("click", &k);
    let host = render(&root);
    let app = host.resolve("app").unwrap();

    let mut map: HandlerMap<u32> = HandlerMap::new();
    map.register("click", k.id(), Registration::new(|n: &mut u32, _: &Message| *n += 1));
    let mut n = 0;
    let b = host.resolve("b").unwrap();
    map.handle(&mut n, &host, &host.event("click", b), app);
    assert_eq!(n, 2);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Move {
    dx: i32,
    dy: i32,
}

#[test]
fn test_typed_registration() {
    let mut keys = KeySource::new();
    let k = keys.typed::<Move>();
    let mut root = Tag::new("div");
    root.span("#s")
        .on_payload("click", &k, &Move { dx: 1, dy: -2 })
        .unwrap();
    let host = render(&root);
    let app = host.resolve("app").unwrap();

    let mut map: HandlerMap<Vec<Move>> = HandlerMap::new();
    map.register(
        "click",
        k.id(),
        Registration::typed(&k, |moves: &mut Vec<Move>, m: Move, _: &Message| moves.push(m)),
    );
    let mut moves = Vec::new();
    let s = host.resolve("s").unwrap();
    map.handle(&mut moves, &host, &host.event("click", s), app);
    assert_eq!(moves, [Move { dx: 1, dy: -2 }]);
}

#[test]
fn test_passive_not_run_by_local_delivery() {
    let mut keys = KeySource::new();
    let k = keys.key();
    let mut root = Tag::new("div");
    root.a("#link").on("click", &k);
    let host = render(&root);
    let app = host.resolve("app").unwrap();

    let mut map: HandlerMap<u32> = HandlerMap::new();
    map.register(
        "click",
        k.id(),
        Registration::new(|n: &mut u32, _: &Message| *n += 1).passive(),
    );
    let mut n = 0;
    let link = host.resolve("link").unwrap();
    assert_eq!(map.handle(&mut n, &host, &host.event("click", link), app).invoked, 0);
    assert_eq!(map.kinds(Delivery::Passive).len(), 1);
}
