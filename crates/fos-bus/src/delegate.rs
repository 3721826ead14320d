//! Event delegation
//!
//! One listener per event kind sits on a component's host element. When
//! it fires, the propagation path is walked from the target outward to
//! the first element carrying the reserved attribute for that kind.

use fos_host::{ElementRef, Host, NativeEvent};

use crate::{decode_payload, KeyId};

/// One key found on the anchor element
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub key: KeyId,
    pub payload: Option<serde_json::Value>,
}

/// Result of walking a propagation path
#[derive(Debug, Clone, PartialEq)]
pub struct Delegated {
    /// Nearest element carrying keys for the event kind
    pub anchor: ElementRef,
    /// Keys in attribute order; a key listed twice appears twice
    pub bindings: Vec<Binding>,
}

/// Find the bindings an event triggers, searching no further out than
/// `boundary` (inclusive). `None` means the event is discarded.
pub fn delegate<H: Host + ?Sized>(
    host: &H,
    event: &NativeEvent,
    boundary: ElementRef,
) -> Option<Delegated> {
    let Some(end) = event.path.iter().position(|el| *el == boundary) else {
        tracing::trace!(kind = %event.kind, "Listener element not on event path");
        return None;
    };

    let attribute = event.kind.attribute_name();
    let (anchor, keys) = event.path[..=end]
        .iter()
        .find_map(|el| host.attribute(*el, &attribute).map(|keys| (*el, keys)))?;

    let bindings = keys
        .split(';')
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .filter_map(|raw| match raw.parse::<KeyId>() {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring malformed key in markup");
                None
            }
        })
        .map(|key| Binding {
            key,
            payload: read_payload(host, anchor, key),
        })
        .collect();

    Some(Delegated { anchor, bindings })
}

fn read_payload<H: Host + ?Sized>(host: &H, anchor: ElementRef, key: KeyId) -> Option<serde_json::Value> {
    let raw = host.attribute(anchor, &format!("data-{key}"))?;
    match decode_payload(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(%key, error = %err, "Delivering message without malformed payload");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fos_host::MemoryHost;
    use serde_json::json;

    #[test]
    fn test_nearest_anchor_wins() {
        let host = MemoryHost::from_markup(concat!(
            r#"<div id="root" data-__click__="k9">"#,
            r#"<ul data-__click__="k1;k2" data-k2="%7B%22n%22%3A3%7D"><li id="t">x</li></ul>"#,
            r#"</div>"#,
        ))
        .unwrap();
        let root = host.resolve("root").unwrap();
        let li = host.resolve("t").unwrap();

        let found = delegate(&host, &host.event("click", li), root).unwrap();
        assert_eq!(host.tag_name(found.anchor), Some("ul"));
        assert_eq!(
            found.bindings,
            vec![
                Binding { key: KeyId::new(1), payload: None },
                Binding { key: KeyId::new(2), payload: Some(json!({"n": 3})) },
            ]
        );
    }

    #[test]
    fn test_boundary_limits_search() {
        let host = MemoryHost::from_markup(
            r#"<div data-__click__="k1"><section id="inner"><p id="t">x</p></section></div>"#,
        )
        .unwrap();
        let inner = host.resolve("inner").unwrap();
        let p = host.resolve("t").unwrap();
        assert!(delegate(&host, &host.event("click", p), inner).is_none());
    }

    #[test]
    fn test_malformed_entries() {
        let host = MemoryHost::from_markup(
            r#"<p id="t" data-__input__="k1;;bogus;k2" data-k1="%7Bbroken"></p>"#,
        )
        .unwrap();
        let p = host.resolve("t").unwrap();
        let found = delegate(&host, &host.event("input", p), p).unwrap();
        assert_eq!(
            found.bindings,
            vec![
                Binding { key: KeyId::new(1), payload: None },
                Binding { key: KeyId::new(2), payload: None },
            ]
        );
    }
}
