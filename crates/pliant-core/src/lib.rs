//! Core types and traits for the Pliant container workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the abstractions the container is built against: the error taxonomy,
//! the allocator service trait and its implementations, and the
//! allocator propagation policy.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod alloc;
pub mod bump;
pub mod config;
pub mod error;

pub use alloc::{AllocError, Global, RawAllocator};
pub use bump::BumpAllocator;
pub use config::{PropagationPolicy, GROWTH_FACTOR};
pub use error::VecError;
