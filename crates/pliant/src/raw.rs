//! Storage manager: one owned block of raw slots and the live prefix in it.
//!
//! [`RawStorage`] owns a single allocation `[begin, begin + cap)` obtained
//! from its allocator, of which the prefix `[begin, begin + len)` holds
//! constructed elements. It is the only place in the crate that touches
//! uninitialised memory; every method it exposes is safe and keeps the
//! invariant `len <= cap` and "exactly the first `len` slots are live".
//!
//! Zero-sized element types never reach the allocator: their blocks are
//! dangling pointers and `cap` is tracked purely as a slot count.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use pliant_core::{RawAllocator, VecError, GROWTH_FACTOR};

/// Capacity after one amortized growth step from `capacity`.
///
/// Zero grows to one; every other capacity grows by `GROWTH_FACTOR`,
/// rounded up, and always by at least one slot.
pub(crate) fn grown_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        return 1;
    }
    // Float-to-int `as` saturates, so huge capacities clamp to usize::MAX.
    let scaled = (capacity as f64 * GROWTH_FACTOR).ceil() as usize;
    scaled.max(capacity.saturating_add(1))
}

/// An owned block of `cap` slots, the first `len` of which are live.
pub(crate) struct RawStorage<T, A: RawAllocator> {
    begin: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: RawStorage owns its elements exactly like `Box<[T]>` does; the
// raw pointer is never shared outside borrows of `self`.
unsafe impl<T: Send, A: RawAllocator + Send> Send for RawStorage<T, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, A: RawAllocator + Sync> Sync for RawStorage<T, A> {}

impl<T, A: RawAllocator> RawStorage<T, A> {
    /// Empty storage with no block.
    pub(crate) fn new_in(alloc: A) -> Self {
        Self {
            begin: NonNull::dangling(),
            len: 0,
            cap: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// Empty storage owning a block of exactly `capacity` slots.
    pub(crate) fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, VecError> {
        let mut storage = Self::new_in(alloc);
        if capacity > 0 {
            storage.reallocate(capacity)?;
        }
        Ok(storage)
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Largest slot count the allocator can represent for `T`.
    ///
    /// Never above `isize::MAX`, so every position fits a cursor offset,
    /// zero-sized `T` included.
    pub(crate) fn max_len(&self) -> usize {
        let limit = match mem::size_of::<T>() {
            0 => usize::MAX,
            size => self.alloc.max_bytes() / size,
        };
        limit.min(isize::MAX as usize)
    }

    pub(crate) fn as_ptr(&self) -> *const T {
        self.begin.as_ptr()
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut T {
        self.begin.as_ptr()
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialised, and `begin` is
        // non-null and aligned even when dangling.
        unsafe { slice::from_raw_parts(self.begin.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.begin.as_ptr(), self.len) }
    }

    fn layout_for(&self, capacity: usize) -> Result<Layout, VecError> {
        let max = self.max_len();
        if capacity > max {
            return Err(VecError::CapacityExceeded {
                requested: capacity,
                max,
            });
        }
        Layout::array::<T>(capacity).map_err(|_| VecError::CapacityExceeded {
            requested: capacity,
            max,
        })
    }

    /// Return the current block to the allocator.
    ///
    /// Leaves `begin`/`cap` describing freed memory: the caller must
    /// overwrite them before the storage is used again.
    fn release_block(&mut self) {
        if self.cap == 0 {
            return;
        }
        // The layout was valid when the block was allocated.
        let Ok(layout) = Layout::array::<T>(self.cap) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }
        // SAFETY: `begin` was returned by `self.alloc.allocate(layout)` and
        // has not been released since.
        unsafe { self.alloc.deallocate(self.begin.cast::<u8>(), layout) };
    }

    /// Relocate the live elements into a fresh block of exactly
    /// `new_capacity` slots and release the old block.
    ///
    /// Each element is moved bitwise, which is Rust's move construction
    /// followed by forgetting the source, so relocation cannot fail once
    /// the new block exists. `begin`, `len` and `cap` are replaced last.
    pub(crate) fn reallocate(&mut self, new_capacity: usize) -> Result<(), VecError> {
        assert!(
            new_capacity >= self.len,
            "reallocate below live length ({new_capacity} < {})",
            self.len
        );
        let layout = self.layout_for(new_capacity)?;
        let new_begin = if layout.size() == 0 {
            NonNull::<T>::dangling()
        } else {
            self.alloc
                .allocate(layout)
                .map_err(|_| VecError::AllocationFailed {
                    bytes: layout.size(),
                })?
                .cast::<T>()
        };

        tracing::trace!(
            old_capacity = self.cap,
            new_capacity,
            len = self.len,
            "reallocating storage"
        );

        // SAFETY: the new block has room for `new_capacity >= len` slots and
        // does not overlap the old block; the old slots are treated as
        // uninitialised after the copy.
        unsafe { ptr::copy_nonoverlapping(self.begin.as_ptr(), new_begin.as_ptr(), self.len) };
        self.release_block();
        self.begin = new_begin;
        self.cap = new_capacity;
        Ok(())
    }

    /// Make room for one more element, growing by the golden ratio.
    ///
    /// Growth is clamped to `max_len`, so the last few pushes before the
    /// allocator's bound still succeed.
    pub(crate) fn ensure_capacity_for_push(&mut self) -> Result<(), VecError> {
        if self.len < self.cap {
            return Ok(());
        }
        let max = self.max_len();
        if self.cap >= max {
            return Err(VecError::CapacityExceeded {
                requested: self.cap.saturating_add(1),
                max,
            });
        }
        self.reallocate(grown_capacity(self.cap).min(max))
    }

    /// Make room for `capacity` slots in total, growing by at least one
    /// golden-ratio step when a reallocation is needed.
    ///
    /// Bulk appends go through here so that repeated small appends keep
    /// the same amortized cost as repeated pushes.
    pub(crate) fn ensure_capacity_amortized(&mut self, capacity: usize) -> Result<(), VecError> {
        if capacity <= self.cap {
            return Ok(());
        }
        let stepped = grown_capacity(self.cap).min(self.max_len());
        self.reallocate(stepped.max(capacity))
    }

    /// Grow to exactly `capacity` slots if currently smaller. Never shrinks.
    pub(crate) fn ensure_capacity_at_least(&mut self, capacity: usize) -> Result<(), VecError> {
        if self.cap < capacity {
            self.reallocate(capacity)?;
        }
        Ok(())
    }

    /// Reallocate to exactly `len` slots when there is spare capacity.
    pub(crate) fn shrink_to_fit(&mut self) -> Result<(), VecError> {
        if self.len < self.cap {
            self.reallocate(self.len)?;
        }
        Ok(())
    }

    /// Construct `value` in the first free slot and return it.
    ///
    /// # Panics
    ///
    /// Panics if there is no free slot.
    pub(crate) fn push_within_capacity(&mut self, value: T) -> &mut T {
        assert!(self.len < self.cap, "push without spare capacity");
        // SAFETY: slot `len` lies inside the block and is uninitialised.
        unsafe {
            let slot = self.begin.as_ptr().add(self.len);
            ptr::write(slot, value);
            self.len += 1;
            &mut *slot
        }
    }

    /// Move the last live element out, if any.
    pub(crate) fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is now outside the live prefix,
        // so it is read exactly once.
        Some(unsafe { ptr::read(self.begin.as_ptr().add(self.len)) })
    }

    /// Destroy elements from the tail down until `new_len` remain.
    pub(crate) fn truncate(&mut self, new_len: usize) {
        while self.len > new_len {
            self.len -= 1;
            // SAFETY: slot `len` was live; it leaves the live prefix before
            // its destructor runs, so a panicking drop cannot double-drop.
            unsafe { ptr::drop_in_place(self.begin.as_ptr().add(self.len)) };
        }
    }

    /// Destroy every live element in forward index order. Capacity is kept.
    pub(crate) fn clear(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        self.len = 0;
        // SAFETY: the slice covered exactly the live prefix, which has been
        // detached from `len` before any destructor runs.
        unsafe { ptr::drop_in_place(live) };
    }

    /// Move every element of `source` onto the end of `self`.
    ///
    /// `source` keeps its block (capacity) but ends with no live elements.
    /// The two storages may use unequal allocators.
    pub(crate) fn append_moved(&mut self, source: &mut Self) -> Result<(), VecError> {
        let count = source.len;
        let needed = self
            .len
            .checked_add(count)
            .ok_or(VecError::CapacityExceeded {
                requested: usize::MAX,
                max: self.max_len(),
            })?;
        self.ensure_capacity_at_least(needed)?;
        // SAFETY: `self` has `count` free slots after `len`; the blocks are
        // distinct allocations. `source` forgets the moved elements.
        unsafe {
            ptr::copy_nonoverlapping(
                source.begin.as_ptr(),
                self.begin.as_ptr().add(self.len),
                count,
            );
        }
        source.len = 0;
        self.len += count;
        Ok(())
    }

    /// Take the whole block, leaving `self` empty with no capacity.
    ///
    /// The returned storage carries a clone of the allocator, which owns
    /// the block from now on. No element is touched.
    pub(crate) fn take(&mut self) -> Self {
        let empty = Self::new_in(self.alloc.clone());
        mem::replace(self, empty)
    }

    /// Exchange blocks (and live ranges) while each side keeps its allocator.
    ///
    /// # Panics
    ///
    /// Panics unless the two allocators compare equal, since each block
    /// must later be released through an allocator able to free it.
    pub(crate) fn swap_blocks(&mut self, other: &mut Self) {
        assert!(
            self.alloc == other.alloc,
            "cannot exchange storage between unequal allocators without propagation"
        );
        mem::swap(&mut self.begin, &mut other.begin);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.cap, &mut other.cap);
    }

    /// Switch to `alloc`, first moving live elements into a block of its own
    /// when it cannot free the current block.
    pub(crate) fn adopt_allocator(&mut self, alloc: A) -> Result<(), VecError> {
        if self.alloc == alloc {
            self.alloc = alloc;
            return Ok(());
        }
        let mut fresh = Self::with_capacity_in(self.len, alloc)?;
        fresh.append_moved(self)?;
        // The old storage drops here, releasing its block through the old allocator.
        *self = fresh;
        Ok(())
    }
}

impl<T, A: RawAllocator> Drop for RawStorage<T, A> {
    fn drop(&mut self) {
        self.clear();
        self.release_block();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pliant_core::Global;

    #[test]
    fn growth_from_zero_is_one() {
        assert_eq!(grown_capacity(0), 1);
    }

    #[test]
    fn growth_sequence_uses_ceiling() {
        let mut cap = 0;
        let mut seen = Vec::new();
        for _ in 0..6 {
            cap = grown_capacity(cap);
            seen.push(cap);
        }
        assert_eq!(seen, vec![1, 2, 4, 7, 12, 20]);
    }

    #[test]
    fn growth_saturates_instead_of_overflowing() {
        assert_eq!(grown_capacity(usize::MAX), usize::MAX);
    }

    #[test]
    fn new_storage_has_no_block() {
        let storage = RawStorage::<u32, _>::new_in(Global);
        assert_eq!(storage.len(), 0);
        assert_eq!(storage.capacity(), 0);
        assert!(storage.as_slice().is_empty());
    }

    #[test]
    fn reallocate_preserves_elements() {
        let mut storage = RawStorage::with_capacity_in(2, Global).unwrap();
        storage.push_within_capacity(String::from("a"));
        storage.push_within_capacity(String::from("b"));
        storage.reallocate(10).unwrap();
        assert_eq!(storage.capacity(), 10);
        assert_eq!(storage.as_slice(), ["a", "b"]);
    }

    #[test]
    fn push_growth_reaches_requested_count() {
        let mut storage = RawStorage::new_in(Global);
        for i in 0..100u64 {
            storage.ensure_capacity_for_push().unwrap();
            storage.push_within_capacity(i);
        }
        assert_eq!(storage.len(), 100);
        assert!(storage.capacity() >= 100);
        assert_eq!(storage.as_slice()[99], 99);
    }

    #[test]
    fn truncate_keeps_capacity() {
        let mut storage = RawStorage::with_capacity_in(8, Global).unwrap();
        for i in 0..8 {
            storage.push_within_capacity(i);
        }
        storage.truncate(3);
        assert_eq!(storage.as_slice(), [0, 1, 2]);
        assert_eq!(storage.capacity(), 8);
    }

    #[test]
    fn shrink_to_fit_on_empty_releases_block() {
        let mut storage = RawStorage::<u8, _>::with_capacity_in(32, Global).unwrap();
        storage.shrink_to_fit().unwrap();
        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut source = RawStorage::with_capacity_in(4, Global).unwrap();
        source.push_within_capacity(1u8);
        let taken = source.take();
        assert_eq!(taken.as_slice(), [1]);
        assert_eq!(source.len(), 0);
        assert_eq!(source.capacity(), 0);
    }

    #[test]
    fn append_moved_empties_source_but_keeps_its_block() {
        let mut dest = RawStorage::new_in(Global);
        let mut source = RawStorage::with_capacity_in(3, Global).unwrap();
        for s in ["x", "y", "z"] {
            source.push_within_capacity(s.to_string());
        }
        dest.append_moved(&mut source).unwrap();
        assert_eq!(dest.as_slice(), ["x", "y", "z"]);
        assert_eq!(source.len(), 0);
        assert_eq!(source.capacity(), 3);
    }

    #[test]
    fn zero_sized_elements_track_capacity_without_allocating() {
        let mut storage = RawStorage::<(), _>::new_in(Global);
        storage.ensure_capacity_at_least(1000).unwrap();
        assert_eq!(storage.capacity(), 1000);
        for _ in 0..1000 {
            storage.push_within_capacity(());
        }
        assert_eq!(storage.max_len(), isize::MAX as usize);
    }

    #[test]
    fn max_len_never_exceeds_isize_max() {
        let bytes = RawStorage::<u8, _>::new_in(Global);
        assert!(bytes.max_len() <= isize::MAX as usize);
        let units = RawStorage::<(), _>::new_in(Global);
        assert_eq!(units.max_len(), isize::MAX as usize);
    }

    #[test]
    fn amortized_growth_steps_past_small_requests() {
        let mut storage = RawStorage::<u32, _>::new_in(Global);
        storage.ensure_capacity_amortized(1).unwrap();
        assert_eq!(storage.capacity(), 1);
        for capacity in [2, 3, 4] {
            storage.ensure_capacity_amortized(capacity).unwrap();
        }
        // 1 -> 2 -> 4; the request for 4 fits without reallocating.
        assert_eq!(storage.capacity(), 4);
        storage.ensure_capacity_amortized(50).unwrap();
        assert_eq!(storage.capacity(), 50);
    }

    #[test]
    fn amortized_request_beyond_max_len_fails_unchanged() {
        let mut storage = RawStorage::<u64, _>::new_in(Global);
        let result = storage.ensure_capacity_amortized(usize::MAX / 2);
        assert!(matches!(result, Err(VecError::CapacityExceeded { .. })));
        assert_eq!(storage.capacity(), 0);
    }

    #[test]
    fn oversized_request_is_capacity_exceeded() {
        let mut storage = RawStorage::<u64, _>::new_in(Global);
        let result = storage.ensure_capacity_at_least(usize::MAX / 2);
        assert!(matches!(result, Err(VecError::CapacityExceeded { .. })));
        assert_eq!(storage.capacity(), 0);
    }
}
