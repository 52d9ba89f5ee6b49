//! Container configuration: allocator propagation rules and growth tuning.

/// Multiplier applied to capacity on amortized growth.
///
/// The golden ratio keeps repeated pushes at O(1) average cost while
/// wasting less memory than doubling.
pub const GROWTH_FACTOR: f64 = 1.618;

/// Rules governing whether a container's allocator travels with its
/// content on copy-assignment, move-assignment, and swap.
///
/// The policy is carried by the container and consulted at run time.
/// It does not change what construction does: copy construction always
/// uses [`RawAllocator::select_on_copy`](crate::RawAllocator::select_on_copy)
/// and move construction always takes the source's allocator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropagationPolicy {
    /// Adopt the source's allocator on copy-assignment (`clone_from`).
    pub on_copy_assign: bool,
    /// Adopt the source's allocator on move-assignment.
    pub on_move_assign: bool,
    /// Exchange allocators along with storage on swap.
    pub on_swap: bool,
}

impl PropagationPolicy {
    /// The standard allocator's rules: propagate on move-assignment only.
    pub const STD: Self = Self {
        on_copy_assign: false,
        on_move_assign: true,
        on_swap: false,
    };

    /// Propagate on every operation.
    pub const ALWAYS: Self = Self {
        on_copy_assign: true,
        on_move_assign: true,
        on_swap: true,
    };

    /// Never propagate; each container keeps the allocator it was built with.
    pub const NEVER: Self = Self {
        on_copy_assign: false,
        on_move_assign: false,
        on_swap: false,
    };
}

impl Default for PropagationPolicy {
    fn default() -> Self {
        Self::STD
    }
}
