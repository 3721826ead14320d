//! Payload codec
//!
//! JSON, then percent-encoded with the `encodeURIComponent` set so the
//! result is safe inside a data attribute.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::BusError;

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_payload<P: Serialize + ?Sized>(payload: &P) -> Result<String, BusError> {
    let json = serde_json::to_string(payload).map_err(BusError::Encode)?;
    Ok(utf8_percent_encode(&json, COMPONENT).to_string())
}

pub fn decode_payload(encoded: &str) -> Result<serde_json::Value, BusError> {
    let json = percent_decode_str(encoded).decode_utf8()?;
    serde_json::from_str(&json).map_err(BusError::Decode)
}
