//! # Registration Errors
//!
//! The unrecoverable configuration errors caught once, at world
//! construction. Use-time precondition violations never take this path;
//! they fail fast under the `validate` feature (see the crate docs).

use thiserror::Error;

use super::component::ComponentId;

/// Errors that can occur while building a world.
///
/// Every variant is a configuration defect in the embedder: construction
/// fails outright and no partially-valid world is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// Two declared component types share a kind id, or one type was
    /// declared twice.
    #[error("duplicate component kind {id} ({name})")]
    DuplicateComponent {
        /// Type name of the offending declaration.
        name: &'static str,
        /// The contested kind id.
        id: ComponentId,
    },

    /// More component kinds declared than the kind mask can hold.
    #[error("{count} component kinds declared, limit is {limit}")]
    ComponentLimitExceeded {
        /// Number of kinds declared.
        count: usize,
        /// The hard limit ([`MAX_COMPONENTS`](super::component::MAX_COMPONENTS)).
        limit: usize,
    },

    /// A system declared a capability on a kind outside the world's
    /// declared component set.
    #[error("system {system} declares undeclared component kind {component}")]
    UndeclaredComponent {
        /// Type name of the offending system.
        system: &'static str,
        /// The undeclared kind id.
        component: ComponentId,
    },

    /// The same system type was registered twice; message dispatch is by
    /// concrete type, so instances must be unique.
    #[error("duplicate system registration: {name}")]
    DuplicateSystem {
        /// Type name of the duplicated system.
        name: &'static str,
    },
}

/// Result type for world construction.
pub type WorldResult<T> = Result<T, WorldError>;
