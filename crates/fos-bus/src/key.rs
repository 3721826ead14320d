//! Message keys
//!
//! Opaque, monotonically issued identifiers. The payload type parameter
//! exists only at compile time.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use crate::BusError;

/// Runtime identity of a key, written as `k<n>` in markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(u64);

impl KeyId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k{}", self.0)
    }
}

impl FromStr for KeyId {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('k')
            .and_then(|n| n.parse().ok())
            .map(KeyId)
            .ok_or_else(|| BusError::InvalidKey(s.to_string()))
    }
}

/// Key bound to a payload shape `P`
pub struct MessageKey<P = serde_json::Value> {
    id: KeyId,
    _payload: PhantomData<fn() -> P>,
}

impl<P> MessageKey<P> {
    fn new(id: KeyId) -> Self {
        Self {
            id,
            _payload: PhantomData,
        }
    }

    pub fn id(&self) -> KeyId {
        self.id
    }

    /// Same key with the payload type erased
    pub fn untyped(&self) -> MessageKey {
        MessageKey::new(self.id)
    }
}

impl<P> Clone for MessageKey<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for MessageKey<P> {}

impl<P> fmt::Debug for MessageKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MessageKey").field(&self.id).finish()
    }
}

impl<P> PartialEq for MessageKey<P> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<P> Eq for MessageKey<P> {}

impl<P> Hash for MessageKey<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<P> fmt::Display for MessageKey<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.id.fmt(f)
    }
}

/// Issues keys. One source per runtime keeps ids unique within it.
#[derive(Debug, Clone)]
pub struct KeySource {
    next: u64,
}

impl KeySource {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    fn next_id(&mut self) -> KeyId {
        let id = KeyId(self.next);
        self.next += 1;
        id
    }

    /// Untyped key
    pub fn key(&mut self) -> MessageKey {
        MessageKey::new(self.next_id())
    }

    /// Key carrying payloads of type `P`
    pub fn typed<P>(&mut self) -> MessageKey<P> {
        MessageKey::new(self.next_id())
    }

    /// Number the next key will get
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for KeySource {
    fn default() -> Self {
        Self::new()
    }
}
