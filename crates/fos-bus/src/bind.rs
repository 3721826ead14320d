//! Binding keys to tags

use fos_tag::{Dataset, EventKind, Tag};
use serde::Serialize;

use crate::{encode_payload, BusError, MessageKey};

/// Attach `key` to `tag` for `kind`. A payload is stored next to it as
/// `data-<key>` in percent-encoded JSON.
pub fn bind<P: Serialize>(
    tag: &mut Tag,
    kind: impl Into<EventKind>,
    key: &MessageKey<P>,
    payload: Option<&P>,
) -> Result<(), BusError> {
    let id = key.id().to_string();
    if let Some(payload) = payload {
        let encoded = encode_payload(payload)?;
        tag.data(Dataset::new().set(id.as_str(), encoded));
    }
    tag.bind_key(kind, id);
    Ok(())
}

/// Binding methods on [`Tag`]
pub trait BindExt {
    /// Bind a key without payload
    fn on<P>(&mut self, kind: impl Into<EventKind>, key: &MessageKey<P>) -> &mut Self;

    /// Bind a key with a payload matching its type
    fn on_payload<P: Serialize>(
        &mut self,
        kind: impl Into<EventKind>,
        key: &MessageKey<P>,
        payload: &P,
    ) -> Result<&mut Self, BusError>;
}

impl BindExt for Tag {
    fn on<P>(&mut self, kind: impl Into<EventKind>, key: &MessageKey<P>) -> &mut Self {
        self.bind_key(kind, key.id().to_string())
    }

    fn on_payload<P: Serialize>(
        &mut self,
        kind: impl Into<EventKind>,
        key: &MessageKey<P>,
        payload: &P,
    ) -> Result<&mut Self, BusError> {
        bind(self, kind, key, Some(payload))?;
        Ok(self)
    }
}
