//! The allocator service a container draws its storage from.
//!
//! A [`RawAllocator`] is treated as an opaque service: it hands out raw
//! blocks for a [`Layout`] and takes them back. Containers own their
//! allocator by value and compare allocators to decide whether storage
//! allocated by one instance may be released through another.
//!
//! This module declares `unsafe` trait methods and forwards to the
//! `allocator-api2` global allocator; it is one of two modules in this
//! crate that may contain `unsafe` code (along with `bump`).

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::NonNull;

use allocator_api2::alloc::Allocator;

pub use allocator_api2::alloc::AllocError;

/// A source of raw memory blocks for container storage.
///
/// Equality carries meaning: two allocators compare equal if and only if
/// a block allocated through one may be deallocated through the other.
pub trait RawAllocator: Clone + PartialEq {
    /// Allocate a block of memory fitting `layout`.
    ///
    /// Containers never call this with a zero-sized layout.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by `allocate` on this allocator (or
    /// one that compares equal to it) with the same `layout`, and must not
    /// have been deallocated already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Largest block size, in bytes, this allocator can represent.
    ///
    /// Default: `isize::MAX`, the bound every Rust allocation obeys.
    fn max_bytes(&self) -> usize {
        isize::MAX as usize
    }

    /// The allocator a copy-constructed container should use.
    ///
    /// Default: a clone of `self`.
    fn select_on_copy(&self) -> Self {
        self.clone()
    }
}

/// The process-wide global allocator.
///
/// All instances compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

impl RawAllocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        allocator_api2::alloc::Global
            .allocate(layout)
            .map(|block| block.cast::<u8>())
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller guarantees `ptr` came from `allocate` with `layout`,
        // which forwarded to the same global allocator.
        unsafe { allocator_api2::alloc::Global.deallocate(ptr, layout) }
    }
}
