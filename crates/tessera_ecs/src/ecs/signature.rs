//! # Component Signatures
//!
//! A signature is a fixed-width bitset over component ids. Bit `i` is set
//! when the component with id `i` is present (entity signature) or
//! required (system signature).
//!
//! An entity matches a system when `(entity & required) == required`.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use super::component::{Component, ComponentId};
use crate::config::MAX_COMPONENT_COUNT;

const WORDS: usize = MAX_COMPONENT_COUNT / 64;

/// Bitset of component ids, [`MAX_COMPONENT_COUNT`] bits wide.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    bits: [u64; WORDS],
}

impl Signature {
    /// Creates a signature with no bits set.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: [0; WORDS] }
    }

    /// Returns a copy with the component's bit set.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let movable = Signature::empty().with(position).with(velocity);
    /// ```
    #[inline]
    #[must_use]
    pub fn with<T: Component>(mut self, id: ComponentId<T>) -> Self {
        self.set_component(id);
        self
    }

    /// Sets the component's bit.
    #[inline]
    pub fn set_component<T: Component>(&mut self, id: ComponentId<T>) {
        let index = id.index();
        self.bits[index / 64] |= 1 << (index % 64);
    }

    /// Clears the component's bit.
    #[inline]
    pub fn reset_component<T: Component>(&mut self, id: ComponentId<T>) {
        let index = id.index();
        self.bits[index / 64] &= !(1 << (index % 64));
    }

    /// Checks if the component's bit is set.
    #[inline]
    #[must_use]
    pub fn contains<T: Component>(&self, id: ComponentId<T>) -> bool {
        let index = id.index();
        (self.bits[index / 64] >> (index % 64)) & 1 == 1
    }

    /// Checks if every bit of `required` is also set here.
    #[inline]
    #[must_use]
    pub fn satisfies(&self, required: &Self) -> bool {
        (*self & *required) == *required
    }

    /// Returns the number of set bits.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Checks if no bit is set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Iterates over the indices of set bits in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_idx, &word)| {
            let mut word = word;
            std::iter::from_fn(move || {
                if word == 0 {
                    return None;
                }
                let bit = word.trailing_zeros() as usize;
                word &= word - 1;
                Some(word_idx * 64 + bit)
            })
        })
    }
}

impl Default for Signature {
    fn default() -> Self {
        Self::empty()
    }
}

impl BitAnd for Signature {
    type Output = Self;

    fn bitand(mut self, rhs: Self) -> Self {
        for (a, b) in self.bits.iter_mut().zip(rhs.bits) {
            *a &= b;
        }
        self
    }
}

impl BitOr for Signature {
    type Output = Self;

    fn bitor(mut self, rhs: Self) -> Self {
        for (a, b) in self.bits.iter_mut().zip(rhs.bits) {
            *a |= b;
        }
        self
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
