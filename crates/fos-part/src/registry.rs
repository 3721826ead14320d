//! Part kind registry
//!
//! Name-indexed factories so parts can be created from a kind name
//! instead of a concrete type.

use indexmap::IndexMap;

use crate::tree::{AnyPart, Mounted};
use crate::{Part, PartId};

type Factory = Box<dyn Fn(PartId) -> Box<dyn AnyPart>>;

#[derive(Default)]
pub(crate) struct Registry {
    factories: IndexMap<String, Factory>,
}

impl Registry {
    /// Register (or replace) the factory for `name`
    pub(crate) fn register<P, F>(&mut self, name: impl Into<String>, factory: F)
    where
        P: Part,
        F: Fn() -> (P, P::State) + 'static,
    {
        let name = name.into();
        tracing::debug!(kind = %name, "Registered part kind");
        self.factories.insert(
            name,
            Box::new(move |id| {
                let (part, state) = factory();
                Mounted::boxed(id, part, state)
            }),
        );
    }

    pub(crate) fn build(&self, name: &str, id: PartId) -> Option<Box<dyn AnyPart>> {
        self.factories.get(name).map(|factory| factory(id))
    }

    pub(crate) fn kinds(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
