//! fOS Part - Part Tree
//!
//! Stateful components ("parts") arranged in a tree. Each part renders
//! into a [`Tag`](fos_tag::Tag); a state change marks it dirty and asks
//! the host for a frame, and the next render pass re-serializes only the
//! dirty subtrees, writes them into the host and re-attaches the native
//! listeners that [`fos_bus`] decodes events through.

mod config;
mod context;
mod part;
mod registry;
mod runtime;
mod tree;

use std::fmt;

pub use config::RuntimeConfig;
pub use context::{Embedded, Init, RenderCx};
pub use part::{Part, PartCx};
pub use runtime::{DeliveryReport, RenderReport, Runtime, Stats};

/// Part identifier (index into the runtime's arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub(crate) u32);

impl PartId {
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "part#{}", self.0)
    }
}

/// Part tree errors
#[derive(Debug, thiserror::Error)]
pub enum PartError {
    #[error("Unknown part: {0}")]
    UnknownPart(PartId),

    /// The part's host element is missing; only its subtree is skipped
    #[error("Host location {location:?} of {part} not found")]
    Unresolved { part: PartId, location: String },

    #[error("Host failed to update {part}: {source}")]
    Host {
        part: PartId,
        #[source]
        source: fos_host::HostError,
    },

    /// The render contract failed; the pass is abandoned
    #[error("Render of {part} failed: {source}")]
    Render {
        part: PartId,
        #[source]
        source: anyhow::Error,
    },

    #[error("Runtime already has a root part")]
    AlreadyMounted,

    #[error("Runtime has no root part")]
    NotMounted,

    #[error("State of {0} is not of the requested type")]
    StateType(PartId),

    #[error("Unknown part kind: {0:?}")]
    UnknownKind(String),

    #[error("{child} is not a child of {parent}")]
    NotAChild { parent: PartId, child: PartId },
}

impl PartError {
    /// Failures confined to one subtree; the pass continues with siblings
    pub fn is_subtree_fatal(&self) -> bool {
        matches!(self, PartError::Unresolved { .. } | PartError::Host { .. })
    }
}
