//! Arena-backed allocator adapter.
//!
//! [`BumpAllocator`] lets a container draw its storage from a
//! [`bumpalo::Bump`] arena. Deallocation is forwarded to the arena, which
//! only reclaims the most recent block; everything else is released when
//! the arena itself is dropped or reset.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::fmt;
use std::ptr::{self, NonNull};

use allocator_api2::alloc::Allocator;
use bumpalo::Bump;

use crate::alloc::{AllocError, RawAllocator};

/// A [`RawAllocator`] drawing from a borrowed bump arena.
///
/// Two adapters compare equal iff they borrow the same arena, so storage
/// never migrates between arenas without an element-wise move.
#[derive(Clone, Copy)]
pub struct BumpAllocator<'bump> {
    arena: &'bump Bump,
}

impl<'bump> BumpAllocator<'bump> {
    /// Wrap a borrowed arena.
    pub fn new(arena: &'bump Bump) -> Self {
        Self { arena }
    }

    /// The arena this adapter draws from.
    pub fn arena(&self) -> &'bump Bump {
        self.arena
    }
}

impl PartialEq for BumpAllocator<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.arena, other.arena)
    }
}

impl Eq for BumpAllocator<'_> {}

impl fmt::Debug for BumpAllocator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BumpAllocator")
            .field("arena", &(self.arena as *const Bump))
            .field("allocated_bytes", &self.arena.allocated_bytes())
            .finish()
    }
}

impl RawAllocator for BumpAllocator<'_> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        Allocator::allocate(&self.arena, layout).map(|block| block.cast::<u8>())
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `ptr` was allocated from an equal
        // adapter, i.e. from this same arena, with `layout`.
        unsafe { Allocator::deallocate(&self.arena, ptr, layout) }
    }
}
