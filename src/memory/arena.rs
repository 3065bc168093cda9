//! Bump arena backing every AST allocation
//!
//! The arena hands out memory by advancing a single offset through a region
//! reserved up front. Nothing is ever freed individually: the whole region is
//! recycled by [`Arena::clear`] or released when the arena is dropped.
//!
//! # Budget
//!
//! The region itself comes from [`bumpalo`], but the arena enforces its own
//! byte budget on top of it. Before each allocation the used-offset is padded
//! to [`ARENA_ALIGN`] (or the type's alignment, whichever is larger), and a
//! request that would push it past the capacity fails with
//! [`ArenaError::Exhausted`] instead of growing. Every caller has to handle
//! that result.
//!
//! Destructors of values placed in the arena never run.

use bumpalo::Bump;
use std::alloc::Layout;
use std::cell::Cell;
use thiserror::Error;

/// Boundary every allocation starts on
pub const ARENA_ALIGN: usize = 8;

/// Capacity used by [`Arena::new`] (10 MiB)
pub const DEFAULT_ARENA_CAPACITY: usize = 10 * 1024 * 1024;

/// Arena failures. Both are fatal for whoever asked for the memory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("failed to reserve an arena region of {capacity} bytes")]
    Reserve { capacity: usize },

    #[error("arena exhausted: requested {requested} bytes, {remaining} remaining")]
    Exhausted { requested: usize, remaining: usize },
}

/// Fixed-capacity bump allocator
#[derive(Debug)]
pub struct Arena {
    bump: Bump,
    capacity: usize,
    used: Cell<usize>,
}

impl Arena {
    /// Reserve an arena with [`DEFAULT_ARENA_CAPACITY`] bytes.
    pub fn new() -> Result<Self, ArenaError> {
        Self::with_capacity(DEFAULT_ARENA_CAPACITY)
    }

    /// Reserve an arena holding at most `capacity` bytes of allocations
    /// (alignment padding included).
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        let bump = Bump::try_with_capacity(capacity)
            .map_err(|_| ArenaError::Reserve { capacity })?;

        Ok(Self {
            bump,
            capacity,
            used: Cell::new(0),
        })
    }

    pub fn alloc<T>(&self, value: T) -> Result<&mut T, ArenaError> {
        let layout = Layout::new::<T>();
        let end = self.reserve(layout)?;
        let slot = self
            .bump
            .try_alloc(value)
            .map_err(|_| self.exhausted(layout.size()))?;
        self.used.set(end);
        Ok(slot)
    }

    pub fn alloc_slice_fill_copy<T: Copy>(
        &self,
        len: usize,
        value: T,
    ) -> Result<&mut [T], ArenaError> {
        let layout = Layout::array::<T>(len)
            .map_err(|_| self.exhausted(usize::MAX))?;
        let end = self.reserve(layout)?;
        let slice = self
            .bump
            .try_alloc_slice_fill_copy(len, value)
            .map_err(|_| self.exhausted(layout.size()))?;
        self.used.set(end);
        Ok(slice)
    }

    /// Reset the used-offset to zero and recycle the region.
    ///
    /// Taking `&mut self` means no reference handed out before the clear can
    /// still be alive afterwards.
    pub fn clear(&mut self) {
        self.bump.reset();
        self.used.set(0);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed so far, padding included
    pub fn used(&self) -> usize {
        self.used.get()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.used.get()
    }

    /// Check the budget for `layout` and return the offset the allocation
    /// would end at. Nothing is committed until the caller stores it.
    fn reserve(&self, layout: Layout) -> Result<usize, ArenaError> {
        let align = layout.align().max(ARENA_ALIGN);
        let start = align_up(self.used.get(), align);

        match start.checked_add(layout.size()) {
            Some(end) if end <= self.capacity => Ok(end),
            _ => Err(self.exhausted(layout.size())),
        }
    }

    fn exhausted(&self, requested: usize) -> ArenaError {
        let remaining = self.remaining();
        tracing::warn!(requested, remaining, capacity = self.capacity, "arena exhausted");
        ArenaError::Exhausted {
            requested,
            remaining,
        }
    }
}

fn align_up(offset: usize, align: usize) -> usize {
    (offset + (align - 1)) & !(align - 1)
}
