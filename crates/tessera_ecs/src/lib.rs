//! # TESSERA ECS
//!
//! Entity Component System core for real-time simulations:
//! - Dense, cache-friendly storage per component type
//! - O(1) component add/remove and entity id recycling
//! - Per-system entity sets maintained incrementally from component signatures
//!
//! ## Data Flow
//!
//! ```text
//! EntityHandle::add_component
//!     -> ComponentRegistry   (store the value)
//!     -> SystemRegistry      (update the entity signature, rematch every system)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use tessera_ecs::{Controller, Signature};
//!
//! let mut ecs = Controller::new();
//! let position = ecs.register_component::<Position>()?;
//! let movement = ecs.register_system(Signature::empty().with(position), Movement { position });
//!
//! ecs.create_entity()?.add_component(position, Position::default())?;
//! ecs.update(1.0 / 60.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::{EcsConfig, MAX_COMPONENT_COUNT, MAX_ENTITY_COUNT};
pub use ecs::{
    Component, ComponentId, ComponentRegistry, ComponentStorage, Controller, EntityAllocator,
    EntityHandle, EntityId, Signature, System, SystemContext, SystemId, SystemRegistry,
};
pub use error::{EcsError, EcsResult};
