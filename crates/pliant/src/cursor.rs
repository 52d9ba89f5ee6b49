//! Random-access cursors over a container's live elements.
//!
//! A [`Cursor`] is a position within one storage block. It borrows the
//! container it came from, so the block cannot be reallocated, swapped
//! away, or destroyed while the cursor exists: stale cursors are rejected
//! at compile time instead of being undefined behaviour.
//!
//! Cursor arithmetic is unchecked. A cursor may be moved anywhere, and
//! only dereferencing a position outside `[begin, end)` fails, with a
//! panic. [`Cursor::try_get`] is the non-panicking lookup.
//!
//! Comparison between cursors is positional. Cursors from different
//! blocks compare by block address, which is consistent but meaningless.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Index, Sub, SubAssign};

/// Forward cursor into a live storage block.
pub struct Cursor<'a, T> {
    block: &'a [T],
    pos: isize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(block: &'a [T], pos: usize) -> Self {
        Self {
            block,
            // Storage lengths are capped at isize::MAX.
            pos: isize::try_from(pos).unwrap_or(isize::MAX),
        }
    }

    /// Offset of this cursor from the start of its block.
    pub fn position(&self) -> isize {
        self.pos
    }

    /// The element under the cursor, or `None` outside `[begin, end)`.
    pub fn try_get(&self) -> Option<&'a T> {
        usize::try_from(self.pos)
            .ok()
            .and_then(|idx| self.block.get(idx))
    }

    /// The element under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is outside `[begin, end)`.
    #[track_caller]
    pub fn get(&self) -> &'a T {
        match self.try_get() {
            Some(item) => item,
            None => panic!(
                "cursor dereferenced outside the live range (position {}, len {})",
                self.pos,
                self.block.len()
            ),
        }
    }

    /// Raw address of the slot under the cursor. Never dereferenced here.
    pub fn as_ptr(&self) -> *const T {
        self.block.as_ptr().wrapping_offset(self.pos)
    }

    /// Step forward one slot (pre-increment).
    pub fn advance(&mut self) -> &mut Self {
        self.pos += 1;
        self
    }

    /// Step back one slot (pre-decrement).
    pub fn retreat(&mut self) -> &mut Self {
        self.pos -= 1;
        self
    }

    /// Step forward, returning the cursor as it was (post-increment).
    pub fn post_advance(&mut self) -> Self {
        let before = *self;
        self.pos += 1;
        before
    }

    /// Step back, returning the cursor as it was (post-decrement).
    pub fn post_retreat(&mut self) -> Self {
        let before = *self;
        self.pos -= 1;
        before
    }

    fn key(&self) -> (usize, isize) {
        (self.block.as_ptr().addr(), self.pos)
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> Deref for Cursor<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> Index<isize> for Cursor<'_, T> {
    type Output = T;

    fn index(&self, n: isize) -> &T {
        (*self + n).get()
    }
}

impl<'a, T> Add<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    fn add(mut self, n: isize) -> Self {
        self.pos += n;
        self
    }
}

impl<'a, T> Add<Cursor<'a, T>> for isize {
    type Output = Cursor<'a, T>;

    fn add(self, cursor: Cursor<'a, T>) -> Cursor<'a, T> {
        cursor + self
    }
}

impl<'a, T> Sub<isize> for Cursor<'a, T> {
    type Output = Cursor<'a, T>;

    fn sub(mut self, n: isize) -> Self {
        self.pos -= n;
        self
    }
}

impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        self.pos - other.pos
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    fn add_assign(&mut self, n: isize) {
        self.pos += n;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    fn sub_assign(&mut self, n: isize) {
        self.pos -= n;
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.pos)
            .field("len", &self.block.len())
            .finish()
    }
}

/// Reverse cursor: walks a block from the back.
///
/// Wraps a forward cursor `base` and refers to the element just before it,
/// so `RevCursor::new(end)` refers to the last element and
/// `RevCursor::new(begin)` is the one-past-the-front sentinel.
pub struct RevCursor<'a, T> {
    base: Cursor<'a, T>,
}

impl<'a, T> RevCursor<'a, T> {
    /// Reverse cursor referring to the element before `base`.
    pub fn new(base: Cursor<'a, T>) -> Self {
        Self { base }
    }

    /// The underlying forward cursor.
    pub fn base(&self) -> Cursor<'a, T> {
        self.base
    }

    /// The element under the cursor, or `None` outside the live range.
    pub fn try_get(&self) -> Option<&'a T> {
        (self.base - 1isize).try_get()
    }

    /// The element under the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is outside the live range.
    #[track_caller]
    pub fn get(&self) -> &'a T {
        (self.base - 1isize).get()
    }

    /// Step toward the front (pre-increment).
    pub fn advance(&mut self) -> &mut Self {
        self.base.retreat();
        self
    }

    /// Step toward the back (pre-decrement).
    pub fn retreat(&mut self) -> &mut Self {
        self.base.advance();
        self
    }

    /// Step toward the front, returning the cursor as it was.
    pub fn post_advance(&mut self) -> Self {
        let before = *self;
        self.base.retreat();
        before
    }

    /// Step toward the back, returning the cursor as it was.
    pub fn post_retreat(&mut self) -> Self {
        let before = *self;
        self.base.advance();
        before
    }
}

impl<T> Clone for RevCursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RevCursor<'_, T> {}

impl<T> Deref for RevCursor<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> Index<isize> for RevCursor<'_, T> {
    type Output = T;

    fn index(&self, n: isize) -> &T {
        (*self + n).get()
    }
}

impl<'a, T> Add<isize> for RevCursor<'a, T> {
    type Output = RevCursor<'a, T>;

    fn add(self, n: isize) -> Self {
        Self::new(self.base - n)
    }
}

impl<'a, T> Sub<isize> for RevCursor<'a, T> {
    type Output = RevCursor<'a, T>;

    fn sub(self, n: isize) -> Self {
        Self::new(self.base + n)
    }
}

impl<'a, T> Sub for RevCursor<'a, T> {
    type Output = isize;

    fn sub(self, other: Self) -> isize {
        other.base - self.base
    }
}

impl<T> AddAssign<isize> for RevCursor<'_, T> {
    fn add_assign(&mut self, n: isize) {
        self.base -= n;
    }
}

impl<T> SubAssign<isize> for RevCursor<'_, T> {
    fn sub_assign(&mut self, n: isize) {
        self.base += n;
    }
}

impl<T> PartialEq for RevCursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<T> Eq for RevCursor<'_, T> {}

impl<T> PartialOrd for RevCursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for RevCursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.base.cmp(&self.base)
    }
}

impl<T> fmt::Debug for RevCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevCursor")
            .field("base", &self.base)
            .finish()
    }
}
