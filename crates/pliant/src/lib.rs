//! Pliant: an allocator-aware growable contiguous sequence container.
//!
//! [`Vector`] stores its elements in one contiguous block drawn from a
//! pluggable [`RawAllocator`]. It grows by the golden ratio on
//! single-element insertion, offers checked and unchecked element access,
//! random-access [`Cursor`]s, and explicit control over whether the
//! allocator travels with the contents on copy-assignment, move-assignment,
//! and swap (see [`PropagationPolicy`]).
//!
//! # Architecture
//!
//! ```text
//! Vector<T, A> (lifecycle controller, safe code only)
//! ├── RawStorage<T, A> (raw.rs: the one owned block, the only unsafe code)
//! │   └── A: RawAllocator (Global, BumpAllocator, or user-provided)
//! └── PropagationPolicy (copy-assign / move-assign / swap rules)
//! ```
//!
//! # Example
//!
//! ```
//! use pliant::Vector;
//!
//! let mut v = Vector::new();
//! for i in 0..5 {
//!     v.push_back(i)?;
//! }
//! assert_eq!(v.len(), 5);
//! assert_eq!(*v.back()?, 4);
//! assert!(v.at(5).is_err());
//! # Ok::<(), pliant::VecError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod cmp;
pub mod cursor;
mod raw;
pub mod vector;

pub use cursor::{Cursor, RevCursor};
pub use pliant_core::{
    AllocError, BumpAllocator, Global, PropagationPolicy, RawAllocator, VecError, GROWTH_FACTOR,
};
pub use vector::Vector;
