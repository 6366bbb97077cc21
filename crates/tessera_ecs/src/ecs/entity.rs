//! # Entity Management
//!
//! Entities are plain integer ids with no data of their own.
//!
//! - Id `0` is reserved as "no entity" and never handed out
//! - Fresh ids come from a monotonic counter starting at 1
//! - Destroyed ids are recycled oldest-first (FIFO)

use std::collections::VecDeque;
use std::fmt;

use crate::error::{EcsError, EcsResult};

/// Unique identifier of a live entity.
///
/// Ids are only unique among currently live entities: a destroyed id is
/// handed out again later.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// The reserved "no entity" id.
    pub const NULL: Self = Self(0);

    /// Wraps a raw id.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the raw id as an index into direct-indexed tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this is the reserved null id.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues and recycles entity ids, bounded by a fixed capacity.
///
/// The allocator is the sole authority on which ids are live, but it does
/// not validate ids passed to [`EntityAllocator::destroy`]: destroying an id
/// twice queues it twice.
#[derive(Debug)]
pub struct EntityAllocator {
    /// Next never-issued id.
    next: u32,
    /// Destroyed ids waiting for reuse, oldest at the front.
    free: VecDeque<EntityId>,
    /// Maximum number of live entities.
    capacity: usize,
}

impl EntityAllocator {
    /// Creates an allocator that can hold up to `capacity` live entities.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or does not fit an entity id.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity < u32::MAX as usize,
            "Capacity must be below u32::MAX"
        );

        Self {
            next: 1,
            free: VecDeque::new(),
            capacity,
        }
    }

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Issues an id, preferring the oldest destroyed one.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::CapacityExceeded`] when every id in
    /// `1..=capacity` is live.
    pub fn create(&mut self) -> EcsResult<EntityId> {
        if let Some(id) = self.free.pop_front() {
            return Ok(id);
        }

        if self.next as usize > self.capacity {
            tracing::warn!(capacity = self.capacity, "entity capacity exceeded");
            return Err(EcsError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let id = EntityId(self.next);
        self.next += 1;
        Ok(id)
    }

    /// Queues an id for reuse.
    pub fn destroy(&mut self, id: EntityId) {
        self.free.push_back(id);
    }

    /// Returns the number of live entities.
    ///
    /// Saturates at zero if ids were destroyed more often than created.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        (self.next as usize - 1).saturating_sub(self.free.len())
    }
}
