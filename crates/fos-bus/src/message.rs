//! Dispatched message

use fos_host::NativeEvent;
use fos_tag::EventKind;
use serde::de::DeserializeOwned;

use crate::{BusError, KeyId};

/// What a handler receives
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: EventKind,
    pub key: KeyId,
    pub event: NativeEvent,
    /// Decoded payload bound next to the key, if any
    pub payload: Option<serde_json::Value>,
}

impl Message {
    pub fn new(key: KeyId, event: NativeEvent, payload: Option<serde_json::Value>) -> Self {
        Self {
            kind: event.kind.clone(),
            key,
            event,
            payload,
        }
    }

    /// Decode the payload into `P`; a missing payload decodes from `null`
    pub fn payload_as<P: DeserializeOwned>(&self) -> Result<P, BusError> {
        match &self.payload {
            Some(value) => P::deserialize(value).map_err(BusError::Decode),
            None => serde_json::from_value(serde_json::Value::Null).map_err(BusError::Decode),
        }
    }
}
