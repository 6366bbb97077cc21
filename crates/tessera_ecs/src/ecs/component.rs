//! # Components
//!
//! Components are pure data records attached to entities. Each component
//! type gets a [`ComponentId`] when it is registered; the id doubles as the
//! bit index in every [`Signature`](super::Signature).

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker trait for ECS components.
///
/// Any `'static` type qualifies. Components should be plain data.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// let position = controller.register_component::<Position>()?;
/// ```
pub trait Component: Any {}

impl<T: Any> Component for T {}

/// Typed key of a registered component type.
///
/// Only the registry that issued an id can resolve it. Ids are assigned
/// sequentially from zero and never recycled.
pub struct ComponentId<T: Component> {
    index: u16,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> ComponentId<T> {
    #[inline]
    pub(crate) const fn new(index: u16) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Returns the raw index, which is also the signature bit of this type.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl<T: Component> Clone for ComponentId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Component> Copy for ComponentId<T> {}

impl<T: Component> PartialEq for ComponentId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T: Component> Eq for ComponentId<T> {}

impl<T: Component> Hash for ComponentId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T: Component> fmt::Debug for ComponentId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentId")
            .field(&std::any::type_name::<T>())
            .field(&self.index)
            .finish()
    }
}
