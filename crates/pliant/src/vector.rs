//! The container: element lifecycle and the public API.
//!
//! [`Vector`] pairs a [`RawStorage`] block with a [`PropagationPolicy`].
//! Every element transition (construct, copy, move, destroy) goes through
//! the storage's safe primitives, one slot at a time, so a panicking
//! `Clone`/`Default`/constructor closure leaves exactly the elements built
//! so far live, and each of them is dropped exactly once later.
//!
//! # Ownership transfer
//!
//! Rust moves are bitwise and leave nothing behind, so the moved-from
//! states the container contract talks about are expressed as explicit
//! operations on `&mut` sources:
//!
//! - [`Vector::take_from`] is move construction: the source ends empty
//!   with no capacity.
//! - [`Vector::assign_move`] is move-assignment, honouring the policy.
//! - [`Clone::clone`] / [`Vector::try_clone`] is copy construction and
//!   [`Clone::clone_from`] / [`Vector::assign_copy`] is copy-assignment.
//!
//! # Checked and unchecked access
//!
//! `at`, `front`, and `back` report [`VecError`]. Indexing through `[]`
//! goes through the slice and panics out of range; the unchecked path is
//! the slice's `get_unchecked`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut};

use pliant_core::{Global, PropagationPolicy, RawAllocator, VecError};

use crate::cursor::{Cursor, RevCursor};
use crate::raw::RawStorage;

/// Report an error from a trait method that cannot return one.
#[cold]
#[track_caller]
fn fail(err: VecError) -> ! {
    panic!("{err}")
}

/// A growable contiguous sequence with an owned allocator.
///
/// Capacity grows by the golden ratio on single-element insertion and to
/// exact sizes on `reserve`, bulk construction, and growing `resize`. It
/// never shrinks except through [`shrink_to_fit`](Vector::shrink_to_fit).
pub struct Vector<T, A: RawAllocator = Global> {
    storage: RawStorage<T, A>,
    policy: PropagationPolicy,
}

impl<T> Vector<T, Global> {
    /// An empty vector on the global allocator. Allocates nothing.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// `count` default-constructed elements.
    pub fn with_len(count: usize) -> Result<Self, VecError>
    where
        T: Default,
    {
        Self::with_len_in(count, Global)
    }

    /// `count` clones of `value`.
    pub fn from_elem(count: usize, value: &T) -> Result<Self, VecError>
    where
        T: Clone,
    {
        Self::from_elem_in(count, value, Global)
    }

    /// Clones of the elements in `[first, last)`.
    pub fn from_cursors<'c>(first: Cursor<'c, T>, last: Cursor<'c, T>) -> Result<Self, VecError>
    where
        T: Clone,
    {
        Self::from_cursors_in(first, last, Global)
    }

    /// Clones of every item in a fixed sequence.
    pub fn from_slice(items: &[T]) -> Result<Self, VecError>
    where
        T: Clone,
    {
        Self::from_slice_in(items, Global)
    }

    /// An empty vector on the global allocator owning exactly `capacity`
    /// slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, VecError> {
        Self::with_capacity_in(capacity, Global)
    }
}

impl<T, A: RawAllocator> Vector<T, A> {
    /// An empty vector drawing from `alloc`, with the default policy.
    pub fn new_in(alloc: A) -> Self {
        Self::with_policy_in(PropagationPolicy::default(), alloc)
    }

    /// An empty vector drawing from `alloc` under an explicit policy.
    pub fn with_policy_in(policy: PropagationPolicy, alloc: A) -> Self {
        Self {
            storage: RawStorage::new_in(alloc),
            policy,
        }
    }

    /// An empty vector owning exactly `capacity` slots.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, VecError> {
        Ok(Self {
            storage: RawStorage::with_capacity_in(capacity, alloc)?,
            policy: PropagationPolicy::default(),
        })
    }

    /// Replace the propagation policy, keeping contents and allocator.
    ///
    /// Chains onto any constructor:
    /// `Vector::from_slice_in(items, alloc)?.with_policy(PropagationPolicy::NEVER)`.
    #[must_use]
    pub fn with_policy(mut self, policy: PropagationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `count` default-constructed elements drawing from `alloc`.
    pub fn with_len_in(count: usize, alloc: A) -> Result<Self, VecError>
    where
        T: Default,
    {
        let mut vec = Self::with_capacity_in(count, alloc)?;
        for _ in 0..count {
            vec.storage.push_within_capacity(T::default());
        }
        Ok(vec)
    }

    /// `count` clones of `value` drawing from `alloc`.
    pub fn from_elem_in(count: usize, value: &T, alloc: A) -> Result<Self, VecError>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(count, alloc)?;
        for _ in 0..count {
            vec.storage.push_within_capacity(value.clone());
        }
        Ok(vec)
    }

    /// Clones of the elements in `[first, last)` drawing from `alloc`.
    ///
    /// A `last` before `first` is an empty range.
    ///
    /// # Panics
    ///
    /// Panics if the range leaves the live elements of its block.
    pub fn from_cursors_in<'c>(
        mut first: Cursor<'c, T>,
        last: Cursor<'c, T>,
        alloc: A,
    ) -> Result<Self, VecError>
    where
        T: Clone,
    {
        let count = usize::try_from(last - first).unwrap_or(0);
        let mut vec = Self::with_capacity_in(count, alloc)?;
        for _ in 0..count {
            vec.storage.push_within_capacity(first.get().clone());
            first.advance();
        }
        Ok(vec)
    }

    /// Clones of every item in `items` drawing from `alloc`.
    pub fn from_slice_in(items: &[T], alloc: A) -> Result<Self, VecError>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(items.len(), alloc)?;
        vec.extend_cloned(items);
        Ok(vec)
    }

    /// Copy construction with an explicit allocator.
    ///
    /// The copy owns exactly `self.len()` slots and keeps `self`'s policy.
    pub fn clone_in(&self, alloc: A) -> Result<Self, VecError>
    where
        T: Clone,
    {
        let mut vec = Self::with_capacity_in(self.len(), alloc)?;
        vec.policy = self.policy;
        vec.extend_cloned(self.as_slice());
        Ok(vec)
    }

    /// Copy construction using the allocator's `select_on_copy`.
    pub fn try_clone(&self) -> Result<Self, VecError>
    where
        T: Clone,
    {
        self.clone_in(self.storage.allocator().select_on_copy())
    }

    /// Move construction: take `source`'s storage, allocator, and policy.
    ///
    /// No element is touched. `source` is left empty with zero capacity
    /// and a clone of its allocator.
    pub fn take_from(source: &mut Self) -> Self {
        Self {
            storage: source.storage.take(),
            policy: source.policy,
        }
    }

    /// Move construction with an explicit allocator.
    ///
    /// When `alloc` equals the source's allocator the block is taken as-is.
    /// Otherwise every element is moved into a fresh block from `alloc`.
    /// Either way `source` ends empty with zero capacity.
    pub fn take_from_in(source: &mut Self, alloc: A) -> Result<Self, VecError> {
        let storage = if *source.storage.allocator() == alloc {
            let mut storage = source.storage.take();
            storage.adopt_allocator(alloc)?;
            storage
        } else {
            let mut storage = RawStorage::with_capacity_in(source.len(), alloc)?;
            storage.append_moved(&mut source.storage)?;
            source.storage.shrink_to_fit()?;
            storage
        };
        Ok(Self {
            storage,
            policy: source.policy,
        })
    }

    /// Copy-assignment: replace the contents with clones of `source`.
    ///
    /// Current elements are destroyed first. The source's allocator is
    /// adopted under [`PropagationPolicy::on_copy_assign`], and also
    /// whenever the two allocators compare unequal: the current block is
    /// then released through the current allocator before adoption.
    /// Capacity grows to `source.len()` if needed and otherwise stays.
    pub fn assign_copy(&mut self, source: &Self) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.storage.clear();
        let unequal = self.storage.allocator() != source.storage.allocator();
        if self.policy.on_copy_assign || unequal {
            if unequal {
                tracing::debug!(
                    propagate = self.policy.on_copy_assign,
                    "adopting source allocator on copy-assignment"
                );
            }
            self.storage
                .adopt_allocator(source.storage.allocator().clone())?;
        }
        self.storage.ensure_capacity_at_least(source.len())?;
        self.extend_cloned(source.as_slice());
        Ok(())
    }

    /// Move-assignment: replace the contents with `source`'s elements.
    ///
    /// Current elements are destroyed first. If the policy propagates on
    /// move-assignment, or the allocators compare equal, `source`'s block is
    /// taken in O(1) and `source` ends with zero capacity. Otherwise each
    /// element is moved into storage owned by this vector's allocator and
    /// `source` ends empty but keeps its block.
    pub fn assign_move(&mut self, source: &mut Self) -> Result<(), VecError> {
        self.storage.clear();
        if self.policy.on_move_assign {
            // The replaced storage releases its block through the old allocator.
            self.storage = source.storage.take();
        } else if self.storage.allocator() == source.storage.allocator() {
            self.storage.shrink_to_fit()?;
            self.storage.swap_blocks(&mut source.storage);
        } else {
            tracing::debug!(
                len = source.len(),
                "element-wise move between unequal allocators"
            );
            self.storage.append_moved(&mut source.storage)?;
        }
        Ok(())
    }

    /// Assignment from a fixed sequence: replace the contents with clones
    /// of `items`, growing capacity to `items.len()` if needed.
    pub fn assign_slice(&mut self, items: &[T]) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.storage.clear();
        self.storage.ensure_capacity_at_least(items.len())?;
        self.extend_cloned(items);
        Ok(())
    }

    /// Replace the contents with `count` clones of `value`.
    pub fn assign_fill(&mut self, count: usize, value: &T) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.storage.clear();
        self.storage.ensure_capacity_at_least(count)?;
        for _ in 0..count {
            self.storage.push_within_capacity(value.clone());
        }
        Ok(())
    }

    /// Clone `items` onto the end. Capacity must already be sufficient.
    fn extend_cloned(&mut self, items: &[T])
    where
        T: Clone,
    {
        for item in items {
            self.storage.push_within_capacity(item.clone());
        }
    }

    /// The allocator this vector draws from.
    pub fn allocator(&self) -> &A {
        self.storage.allocator()
    }

    /// The propagation policy this vector was built with.
    pub fn policy(&self) -> PropagationPolicy {
        self.policy
    }

    /// Element at `index`, or [`VecError::OutOfRange`].
    pub fn at(&self, index: usize) -> Result<&T, VecError> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or(VecError::OutOfRange { index, len })
    }

    /// Mutable element at `index`, or [`VecError::OutOfRange`].
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, VecError> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(VecError::OutOfRange { index, len })
    }

    /// First element, or [`VecError::EmptyContainer`].
    pub fn front(&self) -> Result<&T, VecError> {
        self.as_slice()
            .first()
            .ok_or(VecError::EmptyContainer { operation: "front" })
    }

    /// Mutable first element, or [`VecError::EmptyContainer`].
    pub fn front_mut(&mut self) -> Result<&mut T, VecError> {
        self.as_mut_slice()
            .first_mut()
            .ok_or(VecError::EmptyContainer {
                operation: "front_mut",
            })
    }

    /// Last element, or [`VecError::EmptyContainer`].
    pub fn back(&self) -> Result<&T, VecError> {
        self.as_slice()
            .last()
            .ok_or(VecError::EmptyContainer { operation: "back" })
    }

    /// Mutable last element, or [`VecError::EmptyContainer`].
    pub fn back_mut(&mut self) -> Result<&mut T, VecError> {
        self.as_mut_slice()
            .last_mut()
            .ok_or(VecError::EmptyContainer {
                operation: "back_mut",
            })
    }

    /// Raw pointer to the first slot. Valid until the next reallocation.
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Mutable raw pointer to the first slot. Valid until the next reallocation.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// The live elements.
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// The live elements, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots owned, live or not.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Largest element count the allocator can represent.
    pub fn max_size(&self) -> usize {
        self.storage.max_len()
    }

    /// Grow capacity to exactly `capacity` slots if currently smaller.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), VecError> {
        self.storage.ensure_capacity_at_least(capacity)
    }

    /// Reallocate to exactly `len()` slots if there is spare capacity.
    pub fn shrink_to_fit(&mut self) -> Result<(), VecError> {
        self.storage.shrink_to_fit()
    }

    /// Destroy every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Append `value`, growing by the golden ratio when full.
    ///
    /// On error the vector is unchanged and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), VecError> {
        self.storage.ensure_capacity_for_push()?;
        self.storage.push_within_capacity(value);
        Ok(())
    }

    /// Construct a new last element from `make` and return it.
    ///
    /// Capacity is secured before `make` runs, so a panic inside `make`
    /// leaves the length unchanged (capacity may have grown).
    pub fn emplace_back<F>(&mut self, make: F) -> Result<&mut T, VecError>
    where
        F: FnOnce() -> T,
    {
        self.storage.ensure_capacity_for_push()?;
        Ok(self.storage.push_within_capacity(make()))
    }

    /// Destroy the last element.
    pub fn pop_back(&mut self) -> Result<(), VecError> {
        let len = self.len();
        if len == 0 {
            return Err(VecError::EmptyContainer {
                operation: "pop_back",
            });
        }
        self.storage.truncate(len - 1);
        Ok(())
    }

    /// Move the last element out, if any.
    pub fn pop(&mut self) -> Option<T> {
        self.storage.pop()
    }

    /// Grow with default-constructed elements or shrink from the tail.
    ///
    /// Growing reserves exactly `count` slots when capacity is short.
    /// Shrinking keeps capacity.
    pub fn resize(&mut self, count: usize) -> Result<(), VecError>
    where
        T: Default,
    {
        if count <= self.len() {
            self.storage.truncate(count);
            return Ok(());
        }
        self.storage.ensure_capacity_at_least(count)?;
        while self.len() < count {
            self.storage.push_within_capacity(T::default());
        }
        Ok(())
    }

    /// Grow with clones of `value` or shrink from the tail.
    ///
    /// Capacity behaves as in [`resize`](Vector::resize).
    pub fn resize_fill(&mut self, count: usize, value: &T) -> Result<(), VecError>
    where
        T: Clone,
    {
        if count <= self.len() {
            self.storage.truncate(count);
            return Ok(());
        }
        self.storage.ensure_capacity_at_least(count)?;
        while self.len() < count {
            self.storage.push_within_capacity(value.clone());
        }
        Ok(())
    }

    /// Exchange contents with `other` in O(1). No element is touched.
    ///
    /// Allocators are exchanged too under [`PropagationPolicy::on_swap`];
    /// policies always stay with their container.
    ///
    /// # Panics
    ///
    /// Panics if the policy does not propagate on swap and the allocators
    /// compare unequal: neither side could free the block it would receive.
    pub fn swap(&mut self, other: &mut Self) {
        if self.policy.on_swap {
            mem::swap(&mut self.storage, &mut other.storage);
        } else {
            self.storage.swap_blocks(&mut other.storage);
        }
    }

    /// Cursor at the first element.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Cursor one past the last element.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len())
    }

    /// Reverse cursor at the last element.
    pub fn rbegin(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.end())
    }

    /// Reverse cursor one before the first element.
    pub fn rend(&self) -> RevCursor<'_, T> {
        RevCursor::new(self.begin())
    }
}

impl<T> Default for Vector<T, Global> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, A: RawAllocator> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| fail(err))
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.assign_copy(source) {
            fail(err);
        }
    }
}

impl<T, A: RawAllocator> Deref for Vector<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAllocator> DerefMut for Vector<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: RawAllocator> AsRef<[T]> for Vector<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: RawAllocator> AsMut<[T]> for Vector<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, A: RawAllocator> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: Hash, A: RawAllocator> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, A: RawAllocator> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if let Some(wanted) = self.len().checked_add(lower) {
            if let Err(err) = self.storage.ensure_capacity_amortized(wanted) {
                fail(err);
            }
        }
        for item in iter {
            if let Err(err) = self.push_back(item) {
                fail(err);
            }
        }
    }
}

impl<'a, T: Copy + 'a, A: RawAllocator> Extend<&'a T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for Vector<T, Global> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<'a, T, A: RawAllocator> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: RawAllocator> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}
