//! # Systems
//!
//! A system declares the components it needs with a [`Signature`] and gets
//! the set of entities whose components currently satisfy it.
//!
//! Membership is maintained incrementally: every time an entity's
//! signature changes, it is tested against each registered system and
//! inserted into or erased from that system's entity set.
//!
//! ## Frame update
//!
//! ```text
//! for each system (registration order):
//!     system.update(ctx, dt)      <- may only mark entities for deletion
//!     destroy marked entities     <- after iteration, no invalidation
//! ```

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::marker::PhantomData;

use super::component::{Component, ComponentId};
use super::entity::EntityId;
use super::registry::ComponentRegistry;
use super::signature::Signature;

/// Behavior run once per frame over the entities matching its signature.
///
/// Systems receive their dependencies (renderers, input state, ...) as
/// ordinary fields when constructed.
///
/// # Example
///
/// ```rust,ignore
/// struct Movement {
///     position: ComponentId<Position>,
///     velocity: ComponentId<Velocity>,
/// }
///
/// impl System for Movement {
///     fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) {
///         for entity in ctx.entities() {
///             let Some(&v) = ctx.get(entity, self.velocity) else { continue };
///             if let Some(p) = ctx.get_mut(entity, self.position) {
///                 p.x += v.x * delta_time;
///             }
///         }
///     }
/// }
/// ```
pub trait System: Any {
    /// Runs the per-frame logic over [`SystemContext::entities`].
    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32);
}

/// Per-update view handed to [`System::update`].
///
/// Component values can be read and written, but the entity set cannot
/// change structurally until the update returns. Entities that should go
/// away are marked with [`SystemContext::mark_for_deletion`] instead.
pub struct SystemContext<'a> {
    entities: &'a BTreeSet<EntityId>,
    components: &'a mut ComponentRegistry,
    pending_deletion: &'a mut Vec<EntityId>,
}

impl<'a> SystemContext<'a> {
    /// Iterates over the entities matching the system's signature, in id order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + 'a {
        let entities: &'a BTreeSet<EntityId> = self.entities;
        entities.iter().copied()
    }

    /// Returns the number of matching entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Read access to every component storage.
    #[must_use]
    pub fn components(&self) -> &ComponentRegistry {
        &*self.components
    }

    /// Gets an entity's component.
    #[must_use]
    pub fn get<T: Component>(&self, entity: EntityId, id: ComponentId<T>) -> Option<&T> {
        self.components.get_component(entity, id)
    }

    /// Gets an entity's component mutably.
    pub fn get_mut<T: Component>(&mut self, entity: EntityId, id: ComponentId<T>) -> Option<&mut T> {
        self.components.get_component_mut(entity, id)
    }

    /// Queues the entity for destruction once the update has finished.
    pub fn mark_for_deletion(&mut self, entity: EntityId) {
        self.pending_deletion.push(entity);
    }
}

/// Typed handle of a registered system.
pub struct SystemId<S: System> {
    index: usize,
    _marker: PhantomData<fn() -> S>,
}

impl<S: System> SystemId<S> {
    /// Returns the registration index of the system.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }
}

impl<S: System> Clone for SystemId<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: System> Copy for SystemId<S> {}

impl<S: System> PartialEq for SystemId<S> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<S: System> Eq for SystemId<S> {}

impl<S: System> fmt::Debug for SystemId<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SystemId")
            .field(&std::any::type_name::<S>())
            .field(&self.index)
            .finish()
    }
}

/// Object-safe face of [`System`] that can also be downcast.
trait AnySystem {
    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn type_name(&self) -> &'static str;
}

impl<S: System> AnySystem for S {
    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f32) {
        System::update(self, ctx, delta_time);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<S>()
    }
}

struct SystemRecord {
    signature: Signature,
    entities: BTreeSet<EntityId>,
    pending_deletion: Vec<EntityId>,
    system: Box<dyn AnySystem>,
}

/// Owner of all systems and of every entity's current signature.
#[derive(Default)]
pub struct SystemRegistry {
    systems: Vec<SystemRecord>,
    signatures: HashMap<EntityId, Signature>,
}

impl SystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Checks if no system is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Registers a system with the components it requires.
    ///
    /// Entities that already satisfy the signature join immediately.
    pub fn register<S: System>(&mut self, signature: Signature, system: S) -> SystemId<S> {
        let entities: BTreeSet<EntityId> = self
            .signatures
            .iter()
            .filter(|(_, sig)| sig.satisfies(&signature))
            .map(|(&entity, _)| entity)
            .collect();

        let index = self.systems.len();
        self.systems.push(SystemRecord {
            signature,
            entities,
            pending_deletion: Vec::new(),
            system: Box::new(system),
        });
        tracing::debug!(
            id = index,
            system = std::any::type_name::<S>(),
            required = signature.count(),
            "system registered"
        );

        SystemId {
            index,
            _marker: PhantomData,
        }
    }

    /// Gets a registered system.
    #[must_use]
    pub fn get_system<S: System>(&self, id: SystemId<S>) -> Option<&S> {
        self.systems.get(id.index)?.system.as_any().downcast_ref()
    }

    /// Gets a registered system mutably.
    pub fn get_system_mut<S: System>(&mut self, id: SystemId<S>) -> Option<&mut S> {
        self.systems
            .get_mut(id.index)?
            .system
            .as_any_mut()
            .downcast_mut()
    }

    /// Returns the signature a system requires.
    #[must_use]
    pub fn required_signature<S: System>(&self, id: SystemId<S>) -> Option<Signature> {
        self.systems.get(id.index).map(|record| record.signature)
    }

    /// Returns the entities currently matching a system.
    #[must_use]
    pub fn entities<S: System>(&self, id: SystemId<S>) -> Option<&BTreeSet<EntityId>> {
        self.systems.get(id.index).map(|record| &record.entities)
    }

    /// Returns the entity's current signature, empty if it has none.
    #[must_use]
    pub fn entity_signature(&self, entity: EntityId) -> Signature {
        self.signatures.get(&entity).copied().unwrap_or_default()
    }

    /// Returns the entity's stored signature, creating an empty one first.
    pub fn entity_signature_mut(&mut self, entity: EntityId) -> &mut Signature {
        self.signatures.entry(entity).or_default()
    }

    /// Records the entity's new signature and updates every system's set.
    pub fn entity_signature_changed(&mut self, entity: EntityId, signature: Signature) {
        self.signatures.insert(entity, signature);

        for record in &mut self.systems {
            if signature.satisfies(&record.signature) {
                record.entities.insert(entity);
            } else {
                record.entities.remove(&entity);
            }
        }
    }

    /// Drops the entity from every system and forgets its signature.
    ///
    /// Forgetting the signature means a recycled id starts out empty.
    pub fn entity_destroyed(&mut self, entity: EntityId) {
        for record in &mut self.systems {
            record.entities.remove(&entity);
        }
        self.signatures.remove(&entity);
    }

    /// Runs one system's update and returns the entities it marked for
    /// deletion, sorted and without duplicates.
    pub(crate) fn run(
        &mut self,
        index: usize,
        components: &mut ComponentRegistry,
        delta_time: f32,
    ) -> Vec<EntityId> {
        let Some(record) = self.systems.get_mut(index) else {
            return Vec::new();
        };

        let mut ctx = SystemContext {
            entities: &record.entities,
            components,
            pending_deletion: &mut record.pending_deletion,
        };
        record.system.update(&mut ctx, delta_time);

        let mut marked = std::mem::take(&mut record.pending_deletion);
        marked.sort_unstable();
        marked.dedup();
        marked
    }
}

impl fmt::Debug for SystemRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemRegistry")
            .field(
                "systems",
                &self
                    .systems
                    .iter()
                    .map(|r| (r.system.type_name(), r.entities.len()))
                    .collect::<Vec<_>>(),
            )
            .field("tracked_entities", &self.signatures.len())
            .finish()
    }
}
