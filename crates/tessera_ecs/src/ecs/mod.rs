//! # Entity Component System
//!
//! Signature-driven ECS with dense per-type storage.
//!
//! ## Design Philosophy
//!
//! - Components of one type live packed in a dense array
//! - Entity ids are plain integers, recycled oldest-first
//! - Systems keep their matching entity sets up to date incrementally
//! - All mutation is single-threaded and synchronous

mod component;
mod controller;
mod entity;
mod handle;
mod registry;
mod signature;
mod storage;
mod system;

pub use component::{Component, ComponentId};
pub use controller::Controller;
pub use entity::{EntityAllocator, EntityId};
pub use handle::EntityHandle;
pub use registry::ComponentRegistry;
pub use signature::Signature;
pub use storage::ComponentStorage;
pub use system::{System, SystemContext, SystemId, SystemRegistry};
