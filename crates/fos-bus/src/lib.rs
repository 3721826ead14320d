//! fOS Bus - Message Bus
//!
//! Event bindings travel through markup instead of closures over live
//! nodes. A render binds a [`MessageKey`] (and optionally a JSON payload)
//! to a tag for an event kind; the serialized markup carries
//! `data-__<kind>__="k1;k2"` and `data-k1="<percent-encoded JSON>"`.
//! When the host fires a native event, [`delegate`] walks the propagation
//! path back to the nearest tagged element and decodes the keys, and a
//! [`HandlerMap`] dispatches them to the registered callbacks.

mod bind;
mod codec;
mod delegate;
mod handler;
mod key;
mod message;

pub use bind::{bind, BindExt};
pub use codec::{decode_payload, encode_payload};
pub use delegate::{delegate, Binding, Delegated};
pub use handler::{Callback, Delivery, Dispatched, HandlerKey, HandlerMap, Registration, Scope};
pub use key::{KeyId, KeySource, MessageKey};
pub use message::Message;

/// Message bus errors
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("Invalid message key: {0:?}")]
    InvalidKey(String),

    #[error("Payload encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Payload decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Payload is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
