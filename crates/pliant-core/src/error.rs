//! Error types for container operations.
//!
//! Every checked operation on a container reports failure through
//! [`VecError`]. Unchecked paths (indexing through a raw pointer, slice
//! `get_unchecked`) do not report errors at all.

use std::error::Error;
use std::fmt;

/// Errors reported by fallible container operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VecError {
    /// Checked index access beyond `[0, len)`.
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Number of live elements at the time of the call.
        len: usize,
    },
    /// An operation that needs at least one element ran on an empty container.
    EmptyContainer {
        /// Name of the operation that was refused.
        operation: &'static str,
    },
    /// Requested capacity exceeds the allocator's representable maximum.
    CapacityExceeded {
        /// Number of element slots requested.
        requested: usize,
        /// Largest slot count the allocator can represent for this element type.
        max: usize,
    },
    /// The allocator refused a request it was able to represent.
    AllocationFailed {
        /// Size of the refused request in bytes.
        bytes: usize,
    },
}

impl fmt::Display for VecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index out of range: index {index} >= len {len}")
            }
            Self::EmptyContainer { operation } => {
                write!(f, "{operation}() called on an empty container")
            }
            Self::CapacityExceeded { requested, max } => {
                write!(
                    f,
                    "capacity exceeded: requested {requested} slots, max_size {max}"
                )
            }
            Self::AllocationFailed { bytes } => {
                write!(f, "allocation of {bytes} bytes failed")
            }
        }
    }
}

impl Error for VecError {}
