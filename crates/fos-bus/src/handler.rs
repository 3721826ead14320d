//! Handler maps
//!
//! Per-component registrations keyed by (event kind, key). Registrations
//! append and run in registration order. With isolation on, each callback
//! runs under `catch_unwind` so one failing handler cannot stop the rest.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use fos_host::{ElementRef, Host, NativeEvent};
use fos_tag::EventKind;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use crate::{delegate, KeyId, Message, MessageKey};

/// Composite lookup key, shown as `click:k3`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    pub kind: EventKind,
    pub key: KeyId,
}

impl HandlerKey {
    pub fn new(kind: impl Into<EventKind>, key: KeyId) -> Self {
        Self {
            kind: kind.into(),
            key,
        }
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}

/// Whether a message continues to the parent component after local dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Single,
    Bubble,
}

/// Which registrations a dispatch runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Registrations reached through the component's own listener
    Local,
    /// Registrations reached through the root's listener
    Passive,
}

pub type Callback<A> = Box<dyn FnMut(&mut A, &Message)>;

/// One registered callback
pub struct Registration<A> {
    callback: Callback<A>,
    scope: Scope,
    passive: bool,
}

impl<A> Registration<A> {
    pub fn new(callback: impl FnMut(&mut A, &Message) + 'static) -> Self {
        Self {
            callback: Box::new(callback),
            scope: Scope::Single,
            passive: false,
        }
    }

    /// Callback receiving the payload decoded as `P`. Messages whose
    /// payload does not decode are skipped with a warning.
    pub fn typed<P, F>(_key: &MessageKey<P>, mut callback: F) -> Self
    where
        P: DeserializeOwned + 'static,
        F: FnMut(&mut A, P, &Message) + 'static,
    {
        Self::new(move |target: &mut A, msg: &Message| match msg.payload_as::<P>() {
            Ok(payload) => callback(target, payload, msg),
            Err(err) => {
                tracing::warn!(key = %msg.key, kind = %msg.kind, error = %err, "Skipping undecodable payload");
            }
        })
    }

    pub fn bubble(mut self) -> Self {
        self.scope = Scope::Bubble;
        self
    }

    pub fn passive(mut self) -> Self {
        self.passive = true;
        self
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_passive(&self) -> bool {
        self.passive
    }

    fn delivery(&self) -> Delivery {
        if self.passive {
            Delivery::Passive
        } else {
            Delivery::Local
        }
    }
}

impl<A> fmt::Debug for Registration<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("scope", &self.scope)
            .field("passive", &self.passive)
            .finish_non_exhaustive()
    }
}

/// Outcome of one dispatch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dispatched {
    pub invoked: usize,
    pub failed: usize,
    /// A bubble-scoped registration ran
    pub bubble: bool,
    /// A single-scoped registration ran
    pub single: bool,
}

impl Dispatched {
    pub fn absorb(&mut self, other: Dispatched) {
        self.invoked += other.invoked;
        self.failed += other.failed;
        self.bubble |= other.bubble;
        self.single |= other.single;
    }
}

/// Registrations of one component, callbacks receiving `&mut A`
pub struct HandlerMap<A> {
    entries: IndexMap<HandlerKey, Vec<Registration<A>>>,
    isolate: bool,
}

impl<A> HandlerMap<A> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            isolate: true,
        }
    }

    /// Catch panics from callbacks (on by default)
    pub fn set_isolation(&mut self, isolate: bool) {
        self.isolate = isolate;
    }

    /// Append a registration; existing ones are never replaced
    pub fn register(&mut self, kind: impl Into<EventKind>, key: KeyId, registration: Registration<A>) {
        let handler_key = HandlerKey::new(kind, key);
        tracing::trace!(key = %handler_key, passive = registration.passive, "Registered handler");
        self.entries.entry(handler_key).or_default().push(registration);
    }

    /// Total registrations
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, kind: &EventKind, key: KeyId) -> bool {
        self.entries
            .keys()
            .any(|k| &k.kind == kind && k.key == key)
    }

    /// Distinct event kinds that have registrations for `delivery`
    pub fn kinds(&self, delivery: Delivery) -> Vec<EventKind> {
        let mut kinds: Vec<EventKind> = Vec::new();
        for (key, registrations) in &self.entries {
            if registrations.iter().any(|r| r.delivery() == delivery) && !kinds.contains(&key.kind) {
                kinds.push(key.kind.clone());
            }
        }
        kinds
    }

    /// Run every registration for the message's (kind, key) that matches
    /// `delivery`, in registration order
    pub fn dispatch(&mut self, target: &mut A, msg: &Message, delivery: Delivery) -> Dispatched {
        let mut outcome = Dispatched::default();
        let handler_key = HandlerKey::new(msg.kind.clone(), msg.key);
        let Some(registrations) = self.entries.get_mut(&handler_key) else {
            return outcome;
        };

        for registration in registrations.iter_mut().filter(|r| r.delivery() == delivery) {
            outcome.invoked += 1;
            match registration.scope {
                Scope::Bubble => outcome.bubble = true,
                Scope::Single => outcome.single = true,
            }

            if self.isolate {
                let callback = &mut registration.callback;
                let result = catch_unwind(AssertUnwindSafe(|| callback(target, msg)));
                if let Err(panic) = result {
                    outcome.failed += 1;
                    tracing::error!(
                        key = %handler_key,
                        reason = %panic_message(&*panic),
                        "Handler panicked"
                    );
                }
            } else {
                (registration.callback)(target, msg);
            }
        }

        outcome
    }

    /// Decode `event` up to `boundary` and dispatch every key found there
    pub fn handle<H: Host + ?Sized>(
        &mut self,
        target: &mut A,
        host: &H,
        event: &NativeEvent,
        boundary: ElementRef,
    ) -> Dispatched {
        let mut outcome = Dispatched::default();
        let Some(found) = delegate(host, event, boundary) else {
            return outcome;
        };
        for binding in found.bindings {
            let msg = Message::new(binding.key, event.clone(), binding.payload);
            outcome.absorb(self.dispatch(target, &msg, Delivery::Local));
        }
        outcome
    }
}

impl<A> Default for HandlerMap<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for HandlerMap<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMap")
            .field("keys", &self.entries.keys().map(ToString::to_string).collect::<Vec<_>>())
            .field("isolate", &self.isolate)
            .finish()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic".to_string()
    }
}
