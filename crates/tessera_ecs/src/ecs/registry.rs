//! # Component Registry
//!
//! Owns one [`ComponentStorage`] per registered component type.
//!
//! Storages are kept type-erased in a vector indexed by the raw
//! [`ComponentId`]. The typed id selects the concrete storage again, so
//! callers never downcast by hand.

use std::fmt;

use super::component::{Component, ComponentId};
use super::entity::EntityId;
use super::storage::{ComponentStorage, ErasedStorage};
use crate::config::MAX_COMPONENT_COUNT;
use crate::error::{EcsError, EcsResult};

/// Type-erased owner of all component storages.
pub struct ComponentRegistry {
    /// Storages indexed by component id.
    storages: Vec<Box<dyn ErasedStorage>>,
    /// Maximum number of component types.
    max_components: usize,
    /// Largest entity id any storage must accept.
    max_entity: usize,
}

impl ComponentRegistry {
    /// Creates an empty registry.
    ///
    /// # Arguments
    ///
    /// * `max_components` - Component type limit, clamped to [`MAX_COMPONENT_COUNT`]
    /// * `max_entity` - Largest entity id the storages will see
    #[must_use]
    pub fn new(max_components: usize, max_entity: usize) -> Self {
        Self {
            storages: Vec::new(),
            max_components: max_components.min(MAX_COMPONENT_COUNT),
            max_entity,
        }
    }

    /// Returns the number of registered component types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storages.len()
    }

    /// Checks if no component type is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Registers a component type and creates its storage.
    ///
    /// Registering the same type twice yields two independent ids.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentLimitReached`] if the limit is used up.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentId<T>> {
        let index = self.storages.len();
        if index >= self.max_components {
            return Err(EcsError::ComponentLimitReached {
                limit: self.max_components,
            });
        }

        self.storages
            .push(Box::new(ComponentStorage::<T>::new(self.max_entity)));
        tracing::debug!(
            id = index,
            component = std::any::type_name::<T>(),
            "component registered"
        );

        // max_components never exceeds MAX_COMPONENT_COUNT, which fits u16.
        Ok(ComponentId::new(index as u16))
    }

    fn unknown<T: Component>(&self, id: ComponentId<T>) -> EcsError {
        EcsError::UnknownComponent {
            id: id.index(),
            registered: self.storages.len(),
        }
    }

    /// Resolves the typed storage for a component id.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`] if the id was not issued by
    /// this registry.
    pub fn storage<T: Component>(&self, id: ComponentId<T>) -> EcsResult<&ComponentStorage<T>> {
        self.storages
            .get(id.index())
            .and_then(|storage| storage.as_any().downcast_ref::<ComponentStorage<T>>())
            .ok_or_else(|| self.unknown(id))
    }

    /// Resolves the typed storage for a component id, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`] if the id was not issued by
    /// this registry.
    pub fn storage_mut<T: Component>(
        &mut self,
        id: ComponentId<T>,
    ) -> EcsResult<&mut ComponentStorage<T>> {
        let error = self.unknown(id);
        self.storages
            .get_mut(id.index())
            .and_then(|storage| storage.as_any_mut().downcast_mut::<ComponentStorage<T>>())
            .ok_or(error)
    }

    /// Attaches a component to the entity.
    ///
    /// # Returns
    ///
    /// The previously attached value, if the entity already held one.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`] for an unregistered id and
    /// [`EcsError::EntityOutOfRange`] for an entity id above the capacity.
    pub fn add_component<T: Component>(
        &mut self,
        entity: EntityId,
        id: ComponentId<T>,
        component: T,
    ) -> EcsResult<Option<T>> {
        if entity.index() > self.max_entity {
            return Err(EcsError::EntityOutOfRange {
                entity: entity.raw(),
                max: self.max_entity,
            });
        }
        Ok(self.storage_mut(id)?.add(entity, component))
    }

    /// Detaches a component from the entity.
    ///
    /// # Returns
    ///
    /// `true` if the entity held the component.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownComponent`] for an unregistered id.
    pub fn remove_component<T: Component>(
        &mut self,
        entity: EntityId,
        id: ComponentId<T>,
    ) -> EcsResult<bool> {
        Ok(self.storage_mut(id)?.remove(entity))
    }

    /// Gets the entity's component.
    ///
    /// `None` if the entity does not hold it or the id is unknown.
    #[must_use]
    pub fn get_component<T: Component>(&self, entity: EntityId, id: ComponentId<T>) -> Option<&T> {
        self.storage(id).ok()?.get(entity)
    }

    /// Gets the entity's component mutably.
    pub fn get_component_mut<T: Component>(
        &mut self,
        entity: EntityId,
        id: ComponentId<T>,
    ) -> Option<&mut T> {
        self.storage_mut(id).ok()?.get_mut(entity)
    }

    /// Checks if the entity holds the component.
    #[must_use]
    pub fn contains_component<T: Component>(&self, entity: EntityId, id: ComponentId<T>) -> bool {
        self.storage(id).is_ok_and(|storage| storage.contains(entity))
    }

    /// Returns how many entities hold the component. Zero for unknown ids.
    #[must_use]
    pub fn component_count<T: Component>(&self, id: ComponentId<T>) -> usize {
        self.storage(id).map_or(0, ComponentStorage::len)
    }

    /// Removes every component the entity holds.
    pub fn entity_destroyed(&mut self, entity: EntityId) {
        for storage in &mut self.storages {
            storage.remove_entity(entity);
        }
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field(
                "storages",
                &self
                    .storages
                    .iter()
                    .map(|s| (s.type_name(), s.active_len()))
                    .collect::<Vec<_>>(),
            )
            .field("max_components", &self.max_components)
            .finish()
    }
}
