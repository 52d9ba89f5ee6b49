//! Element-wise equality and lexicographic ordering.
//!
//! Comparison looks only at live elements: capacity, allocator, and
//! policy never affect the result, so vectors on different allocators
//! compare as sequences.

use std::cmp::Ordering;

use pliant_core::RawAllocator;

use crate::vector::Vector;

/// Element-wise equality. Sequences of different length are unequal
/// without comparing any element.
pub fn equal<T, U>(left: &[T], right: &[U]) -> bool
where
    T: PartialEq<U>,
{
    if left.len() != right.len() {
        return false;
    }
    left.iter().zip(right).all(|(a, b)| a == b)
}

/// Lexicographic comparison.
///
/// The first unequal pair decides; if one sequence is a prefix of the
/// other, the shorter is less. Returns `None` as soon as a pair is
/// incomparable.
pub fn partial_compare<T, U>(left: &[T], right: &[U]) -> Option<Ordering>
where
    T: PartialOrd<U>,
{
    for (a, b) in left.iter().zip(right) {
        match a.partial_cmp(b)? {
            Ordering::Equal => {}
            decided => return Some(decided),
        }
    }
    Some(left.len().cmp(&right.len()))
}

/// Lexicographic comparison over a total order.
pub fn compare<T: Ord>(left: &[T], right: &[T]) -> Ordering {
    for (a, b) in left.iter().zip(right) {
        match a.cmp(b) {
            Ordering::Equal => {}
            decided => return decided,
        }
    }
    left.len().cmp(&right.len())
}

impl<T, U, A, B> PartialEq<Vector<U, B>> for Vector<T, A>
where
    T: PartialEq<U>,
    A: RawAllocator,
    B: RawAllocator,
{
    fn eq(&self, other: &Vector<U, B>) -> bool {
        equal(self.as_slice(), other.as_slice())
    }
}

impl<T: Eq, A: RawAllocator> Eq for Vector<T, A> {}

impl<T, U, A, const N: usize> PartialEq<[U; N]> for Vector<T, A>
where
    T: PartialEq<U>,
    A: RawAllocator,
{
    fn eq(&self, other: &[U; N]) -> bool {
        equal(self.as_slice(), other)
    }
}

impl<T, U, A> PartialEq<[U]> for Vector<T, A>
where
    T: PartialEq<U>,
    A: RawAllocator,
{
    fn eq(&self, other: &[U]) -> bool {
        equal(self.as_slice(), other)
    }
}

impl<T, U, A> PartialEq<&[U]> for Vector<T, A>
where
    T: PartialEq<U>,
    A: RawAllocator,
{
    fn eq(&self, other: &&[U]) -> bool {
        equal(self.as_slice(), *other)
    }
}

// `le` and `ge` come from `partial_cmp`.
impl<T, U, A, B> PartialOrd<Vector<U, B>> for Vector<T, A>
where
    T: PartialOrd<U>,
    A: RawAllocator,
    B: RawAllocator,
{
    fn partial_cmp(&self, other: &Vector<U, B>) -> Option<Ordering> {
        partial_compare(self.as_slice(), other.as_slice())
    }
}

impl<T: Ord, A: RawAllocator> Ord for Vector<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self.as_slice(), other.as_slice())
    }
}
