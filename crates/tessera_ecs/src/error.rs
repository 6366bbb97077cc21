//! # ECS Error Types
//!
//! All recoverable errors that can occur in the ECS core.
//!
//! Unchecked access (reading a component the entity does not hold) is not
//! an error here: the accessors return `Option` instead.

use thiserror::Error;

/// Errors that can occur in the ECS core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity allocator has no id left to hand out.
    ///
    /// Destroying any live entity makes creation possible again.
    #[error("entity capacity exceeded: at most {capacity} live entities")]
    CapacityExceeded {
        /// Maximum number of live entities.
        capacity: usize,
    },

    /// A component id that this registry never issued.
    #[error("unknown component id {id}: only {registered} component types registered")]
    UnknownComponent {
        /// Raw index of the offending id.
        id: usize,
        /// Number of component types registered so far.
        registered: usize,
    },

    /// An entity id above the configured entity capacity.
    #[error("entity {entity} out of range: ids go up to {max}")]
    EntityOutOfRange {
        /// Raw id of the offending entity.
        entity: u32,
        /// Largest id the storages accept.
        max: usize,
    },

    /// No more component types can be registered.
    #[error("component limit reached: {limit} types already registered")]
    ComponentLimitReached {
        /// Configured component type limit.
        limit: usize,
    },

    /// Invalid configuration file or values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for ECS operations.
pub type EcsResult<T> = Result<T, EcsError>;
