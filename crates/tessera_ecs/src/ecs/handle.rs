//! # Entity Handles
//!
//! A handle pairs an [`EntityId`] with the three subsystems that own the
//! entity's state, so compound operations happen in one call:
//!
//! ```text
//! add_component:    ComponentRegistry (store value) -> SystemRegistry (set bit, rematch)
//! remove_component: ComponentRegistry (drop value)  -> SystemRegistry (clear bit, rematch)
//! destroy:          ComponentRegistry -> SystemRegistry -> EntityAllocator
//! ```
//!
//! Handles are views, not owners. Any number of them may be created for
//! the same id over time.

use super::component::{Component, ComponentId};
use super::entity::{EntityAllocator, EntityId};
use super::registry::ComponentRegistry;
use super::signature::Signature;
use super::system::SystemRegistry;
use crate::error::EcsResult;

/// Borrowed view of one entity with the power to change its components.
pub struct EntityHandle<'w> {
    id: EntityId,
    entities: &'w mut EntityAllocator,
    components: &'w mut ComponentRegistry,
    systems: &'w mut SystemRegistry,
}

impl<'w> EntityHandle<'w> {
    pub(crate) fn new(
        id: EntityId,
        entities: &'w mut EntityAllocator,
        components: &'w mut ComponentRegistry,
        systems: &'w mut SystemRegistry,
    ) -> Self {
        Self {
            id,
            entities,
            components,
            systems,
        }
    }

    /// Returns the entity's id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the entity's current signature.
    #[must_use]
    pub fn signature(&self) -> Signature {
        self.systems.entity_signature(self.id)
    }

    /// Attaches a component and updates system membership.
    ///
    /// # Returns
    ///
    /// The previously attached value, if the entity already held one.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`](crate::EcsError::UnknownComponent)
    /// for an unregistered id and
    /// [`EcsError::EntityOutOfRange`](crate::EcsError::EntityOutOfRange) for
    /// an id above the entity capacity. The signature is left untouched in
    /// either case.
    pub fn add_component<T: Component>(
        &mut self,
        id: ComponentId<T>,
        component: T,
    ) -> EcsResult<Option<T>> {
        let previous = self.components.add_component(self.id, id, component)?;

        let mut signature = self.systems.entity_signature(self.id);
        signature.set_component(id);
        self.systems.entity_signature_changed(self.id, signature);

        Ok(previous)
    }

    /// Attaches a default-valued component.
    ///
    /// # Errors
    ///
    /// Same as [`EntityHandle::add_component`].
    pub fn add_default_component<T: Component + Default>(
        &mut self,
        id: ComponentId<T>,
    ) -> EcsResult<Option<T>> {
        self.add_component(id, T::default())
    }

    /// Detaches a component and updates system membership.
    ///
    /// # Returns
    ///
    /// `true` if the entity held the component.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`](crate::EcsError::UnknownComponent)
    /// for an unregistered id. The signature is left untouched in that case.
    pub fn remove_component<T: Component>(&mut self, id: ComponentId<T>) -> EcsResult<bool> {
        let removed = self.components.remove_component(self.id, id)?;

        let mut signature = self.systems.entity_signature(self.id);
        signature.reset_component(id);
        self.systems.entity_signature_changed(self.id, signature);

        Ok(removed)
    }

    /// Checks if the entity holds the component.
    #[must_use]
    pub fn has_component<T: Component>(&self, id: ComponentId<T>) -> bool {
        self.components.contains_component(self.id, id)
    }

    /// Gets the entity's component.
    #[must_use]
    pub fn get_component<T: Component>(&self, id: ComponentId<T>) -> Option<&T> {
        self.components.get_component(self.id, id)
    }

    /// Gets the entity's component mutably.
    pub fn get_component_mut<T: Component>(&mut self, id: ComponentId<T>) -> Option<&mut T> {
        self.components.get_component_mut(self.id, id)
    }

    /// Destroys the entity.
    ///
    /// Components are dropped and system sets updated before the id is
    /// released for reuse.
    pub fn destroy(self) {
        self.components.entity_destroyed(self.id);
        self.systems.entity_destroyed(self.id);
        self.entities.destroy(self.id);
        tracing::trace!(entity = %self.id, "entity destroyed");
    }
}
