//! # Component Storage
//!
//! Dense storage for a single component type.
//!
//! ```text
//! sparse:  [None, Some(1), None, Some(0), ...]   <- indexed by EntityId
//! dense:   [C3, C1, stale, stale]                <- packed values
//! owners:  [#3, #1, stale, stale]
//!                   ^^^^^^^^^^^^ free slots (always the tail)
//! ```
//!
//! - Add and remove are O(1)
//! - Removal swaps the last active slot into the hole, so the active
//!   slots stay packed at the front
//! - The dense arrays never shrink; vacated tail slots are reused first

use std::any::Any;

use super::component::Component;
use super::entity::EntityId;

/// Storage for all values of one component type.
///
/// # Type Parameters
///
/// * `C` - The component type to store
///
/// # Example
///
/// ```rust,ignore
/// let mut storage: ComponentStorage<Position> = ComponentStorage::new(1000);
/// storage.add(EntityId::new(7), Position::new(1.0, 2.0, 3.0));
/// assert_eq!(storage.len(), 1);
/// ```
pub struct ComponentStorage<C: Component> {
    /// Packed component values. Slots at and past `len()` are stale.
    dense: Vec<C>,
    /// Owner of each dense slot. Stale for free slots.
    owners: Vec<EntityId>,
    /// Entity id -> dense slot. Grown on demand.
    sparse: Vec<Option<u32>>,
    /// Vacated slot positions, most recently vacated last.
    free_slots: Vec<usize>,
    /// Largest entity id this storage accepts.
    max_entity: usize,
}

impl<C: Component> ComponentStorage<C> {
    /// Creates an empty storage for entity ids up to `max_entity`.
    #[must_use]
    pub fn new(max_entity: usize) -> Self {
        Self {
            dense: Vec::new(),
            owners: Vec::new(),
            sparse: Vec::new(),
            free_slots: Vec::new(),
            max_entity,
        }
    }

    /// Returns the number of entities holding this component.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len() - self.free_slots.len()
    }

    /// Checks if no entity holds this component.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of dense slots ever used, active or free.
    #[inline]
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.dense.len()
    }

    #[inline]
    fn slot_of(&self, entity: EntityId) -> Option<usize> {
        self.sparse
            .get(entity.index())
            .copied()
            .flatten()
            .map(|slot| slot as usize)
    }

    /// Checks if the entity holds this component.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.slot_of(entity).is_some()
    }

    /// Attaches a component to the entity.
    ///
    /// A vacated slot is reused before the dense arrays grow. If the entity
    /// already holds the component, the value is replaced in place.
    ///
    /// # Returns
    ///
    /// The previously attached value, if any.
    ///
    /// # Panics
    ///
    /// Panics if the entity id is above the storage's entity bound.
    pub fn add(&mut self, entity: EntityId, component: C) -> Option<C> {
        assert!(
            entity.index() <= self.max_entity,
            "entity {entity} out of range"
        );

        if let Some(slot) = self.slot_of(entity) {
            return Some(std::mem::replace(&mut self.dense[slot], component));
        }

        let slot = if let Some(slot) = self.free_slots.pop() {
            self.dense[slot] = component;
            self.owners[slot] = entity;
            slot
        } else {
            self.dense.push(component);
            self.owners.push(entity);
            self.dense.len() - 1
        };

        if entity.index() >= self.sparse.len() {
            self.sparse.resize(entity.index() + 1, None);
        }
        self.sparse[entity.index()] = Some(slot as u32);
        None
    }

    /// Detaches the component from the entity.
    ///
    /// The last active slot is moved into the hole and the vacated end slot
    /// becomes free. No-op if the entity does not hold the component.
    ///
    /// # Returns
    ///
    /// `true` if a component was removed.
    pub fn remove(&mut self, entity: EntityId) -> bool {
        let Some(slot) = self.slot_of(entity) else {
            return false;
        };
        if self.is_empty() {
            return false;
        }

        // Free slots are exactly the tail, so the active region ends here.
        let last = self.dense.len() - 1 - self.free_slots.len();

        if slot != last {
            self.dense.swap(slot, last);
            let moved = self.owners[last];
            self.owners[slot] = moved;
            self.sparse[moved.index()] = Some(slot as u32);
        }

        self.sparse[entity.index()] = None;
        self.free_slots.push(last);
        true
    }

    /// Gets the entity's component.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&C> {
        self.slot_of(entity).map(|slot| &self.dense[slot])
    }

    /// Gets the entity's component mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut C> {
        let slot = self.slot_of(entity)?;
        Some(&mut self.dense[slot])
    }

    /// Returns the active components as a packed slice.
    ///
    /// Order follows the dense slots, not entity ids.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.dense[..self.len()]
    }

    /// Returns the active components as a packed mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        let len = self.len();
        &mut self.dense[..len]
    }

    /// Iterates over active components with their owners.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &C)> {
        let len = self.len();
        self.owners[..len].iter().copied().zip(self.dense[..len].iter())
    }

    /// Iterates mutably over active components with their owners.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut C)> {
        let len = self.len();
        self.owners[..len]
            .iter()
            .copied()
            .zip(self.dense[..len].iter_mut())
    }
}

/// Type-erased view of a [`ComponentStorage`], used by the registry to hold
/// storages of different component types side by side.
pub(crate) trait ErasedStorage {
    /// Removes the entity's component, if any.
    fn remove_entity(&mut self, entity: EntityId) -> bool;

    /// Number of entities holding the component.
    fn active_len(&self) -> usize;

    /// Name of the stored component type, for diagnostics.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStorage for ComponentStorage<C> {
    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity)
    }

    fn active_len(&self) -> usize {
        self.len()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u32) -> EntityId {
        EntityId::new(raw)
    }

    #[test]
    fn test_add_get() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new(100);
        assert!(storage.add(id(5), 50).is_none());
        assert_eq!(storage.get(id(5)), Some(&50));
        assert_eq!(storage.get(id(6)), None);
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_add_twice_replaces() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new(100);
        storage.add(id(1), 10);
        assert_eq!(storage.add(id(1), 11), Some(10));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(id(1)), Some(&11));
    }

    #[test]
    fn test_remove_swaps_last_active() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new(100);
        storage.add(id(1), 10);
        storage.add(id(2), 20);
        storage.add(id(3), 30);

        assert!(storage.remove(id(1)));
        assert_eq!(storage.len(), 2);
        assert_eq!(storage.as_slice(), &[30, 20]);
        assert_eq!(storage.get(id(3)), Some(&30));
        assert!(!storage.contains(id(1)));

        // Dense arrays never shrink.
        assert_eq!(storage.slot_count(), 3);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new(100);
        assert!(!storage.remove(id(4)));
        storage.add(id(1), 1);
        assert!(!storage.remove(id(99)));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_free_slot_reused_before_growth() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new(100);
        storage.add(id(1), 1);
        storage.add(id(2), 2);
        storage.remove(id(2));
        storage.add(id(3), 3);

        assert_eq!(storage.slot_count(), 2);
        assert_eq!(storage.get(id(1)), Some(&1));
        assert_eq!(storage.get(id(3)), Some(&3));
    }

    #[test]
    fn test_default_value_is_not_absence() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new(100);
        storage.add(id(2), 0);
        assert!(storage.contains(id(2)));
        assert_eq!(storage.get(id(2)), Some(&0));
        assert!(!storage.contains(id(3)));
    }

    #[test]
    fn test_iter_pairs_owners() {
        let mut storage: ComponentStorage<u32> = ComponentStorage::new(100);
        for raw in 1..=4 {
            storage.add(id(raw), raw * 10);
        }
        storage.remove(id(2));

        for (owner, value) in storage.iter_mut() {
            *value += owner.raw();
        }
        let mut pairs: Vec<_> = storage.iter().map(|(e, v)| (e.raw(), *v)).collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(1, 11), (3, 33), (4, 44)]);
    }
}
