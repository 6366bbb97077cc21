//! # Controller
//!
//! The composition root of the ECS: owns the entity allocator, the
//! component registry and the system registry, and drives the per-frame
//! system updates.

use super::component::{Component, ComponentId};
use super::entity::{EntityAllocator, EntityId};
use super::handle::EntityHandle;
use super::registry::ComponentRegistry;
use super::signature::Signature;
use super::system::{System, SystemId, SystemRegistry};
use crate::config::EcsConfig;
use crate::error::EcsResult;

/// Owner of all ECS state.
///
/// # Example
///
/// ```rust,ignore
/// let mut ecs = Controller::new();
/// let position = ecs.register_component::<Position>()?;
/// let velocity = ecs.register_component::<Velocity>()?;
/// ecs.register_system(
///     Signature::empty().with(position).with(velocity),
///     Movement { position, velocity },
/// );
///
/// let mut player = ecs.create_entity()?;
/// player.add_component(position, Position::default())?;
/// player.add_component(velocity, Velocity::new(1.0, 0.0, 0.0))?;
///
/// loop {
///     ecs.update(delta_time);
/// }
/// ```
#[derive(Debug)]
pub struct Controller {
    config: EcsConfig,
    entities: EntityAllocator,
    components: ComponentRegistry,
    systems: SystemRegistry,
}

impl Controller {
    /// Creates a controller with the default capacities.
    #[must_use]
    pub fn new() -> Self {
        Self::build(EcsConfig::default())
    }

    /// Creates a controller with custom capacities.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::InvalidConfig`](crate::EcsError::InvalidConfig)
    /// if the config fails validation.
    pub fn with_config(config: EcsConfig) -> EcsResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EcsConfig) -> Self {
        Self {
            config,
            entities: EntityAllocator::new(config.max_entities),
            components: ComponentRegistry::new(config.max_components, config.max_entities),
            systems: SystemRegistry::new(),
        }
    }

    /// Returns the capacities this controller was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EcsConfig {
        &self.config
    }

    /// Read access to the entity allocator.
    #[inline]
    #[must_use]
    pub const fn entities(&self) -> &EntityAllocator {
        &self.entities
    }

    /// Read access to the component registry.
    #[inline]
    #[must_use]
    pub const fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Read access to the system registry.
    #[inline]
    #[must_use]
    pub const fn systems(&self) -> &SystemRegistry {
        &self.systems
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    /// Registers a component type.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentLimitReached`](crate::EcsError::ComponentLimitReached)
    /// once the configured number of types is registered.
    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentId<T>> {
        self.components.register()
    }

    /// Returns how many entities hold the component.
    #[must_use]
    pub fn component_count<T: Component>(&self, id: ComponentId<T>) -> usize {
        self.components.component_count(id)
    }

    /// Registers a system with the components it requires.
    pub fn register_system<S: System>(&mut self, signature: Signature, system: S) -> SystemId<S> {
        self.systems.register(signature, system)
    }

    /// Gets a registered system.
    #[must_use]
    pub fn get_system<S: System>(&self, id: SystemId<S>) -> Option<&S> {
        self.systems.get_system(id)
    }

    /// Gets a registered system mutably.
    pub fn get_system_mut<S: System>(&mut self, id: SystemId<S>) -> Option<&mut S> {
        self.systems.get_system_mut(id)
    }

    /// Creates an entity and returns a handle to it.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`](crate::EcsError::CapacityExceeded)
    /// when the entity capacity is used up.
    pub fn create_entity(&mut self) -> EcsResult<EntityHandle<'_>> {
        let id = self.entities.create()?;
        // Every live entity carries a signature, so empty-signature systems see it.
        self.systems.entity_signature_changed(id, Signature::empty());
        tracing::trace!(entity = %id, "entity created");
        Ok(self.entity(id))
    }

    /// Returns a handle to an existing entity.
    ///
    /// The id is not validated; using a handle for a destroyed id is the
    /// caller's mistake.
    pub fn entity(&mut self, id: EntityId) -> EntityHandle<'_> {
        EntityHandle::new(
            id,
            &mut self.entities,
            &mut self.components,
            &mut self.systems,
        )
    }

    /// Destroys an entity and everything attached to it.
    ///
    /// Destroying an id that is not live queues it for reuse again; the
    /// live count saturates at zero but the id may then be issued twice.
    pub fn destroy_entity(&mut self, id: EntityId) {
        self.entity(id).destroy();
    }

    /// Runs one system, then destroys the entities it marked for deletion.
    pub fn run_system<S: System>(&mut self, id: SystemId<S>, delta_time: f32) {
        self.run_index(id.index(), delta_time);
    }

    /// Runs every system once, in registration order.
    pub fn update(&mut self, delta_time: f32) {
        for index in 0..self.systems.len() {
            self.run_index(index, delta_time);
        }
    }

    fn run_index(&mut self, index: usize, delta_time: f32) {
        let marked = self.systems.run(index, &mut self.components, delta_time);
        if !marked.is_empty() {
            tracing::trace!(system = index, count = marked.len(), "flushing deferred deletions");
        }
        for entity in marked {
            self.destroy_entity(entity);
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
