//! Instrumented allocator fixtures.
//!
//! [`CountingAllocator`] forwards to the global allocator and records
//! every call. Its identity is an explicit id: two instances compare equal
//! iff their ids match, which lets tests build "equal" and "unequal"
//! allocators at will while every block stays freeable by any instance.

use std::alloc::Layout;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use pliant_core::{AllocError, Global, RawAllocator};

/// Totals recorded by a [`CountingAllocator`] and its clones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    pub allocations: usize,
    pub deallocations: usize,
    pub live_bytes: usize,
}

#[derive(Debug, Default)]
struct Shared {
    allocations: AtomicUsize,
    deallocations: AtomicUsize,
    live_bytes: AtomicUsize,
    exhausted: AtomicBool,
}

/// Global-backed allocator that counts allocations and deallocations.
///
/// Clones share counters with the original.
#[derive(Clone, Debug)]
pub struct CountingAllocator {
    id: u32,
    shared: Arc<Shared>,
    max_bytes: Option<usize>,
    copy_id: Option<u32>,
}

impl CountingAllocator {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            shared: Arc::new(Shared::default()),
            max_bytes: None,
            copy_id: None,
        }
    }

    /// Report `max` as the largest representable block.
    pub fn with_max_bytes(mut self, max: usize) -> Self {
        self.max_bytes = Some(max);
        self
    }

    /// Hand copy-constructed containers a fresh allocator with `id`.
    pub fn with_copy_id(mut self, id: u32) -> Self {
        self.copy_id = Some(id);
        self
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Make every later allocation fail (or succeed again).
    pub fn set_exhausted(&self, exhausted: bool) {
        self.shared.exhausted.store(exhausted, Ordering::Relaxed);
    }

    pub fn stats(&self) -> AllocStats {
        AllocStats {
            allocations: self.shared.allocations.load(Ordering::Relaxed),
            deallocations: self.shared.deallocations.load(Ordering::Relaxed),
            live_bytes: self.shared.live_bytes.load(Ordering::Relaxed),
        }
    }
}

impl PartialEq for CountingAllocator {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CountingAllocator {}

#[allow(unsafe_code)]
impl RawAllocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if self.shared.exhausted.load(Ordering::Relaxed) {
            return Err(AllocError);
        }
        let ptr = Global.allocate(layout)?;
        self.shared.allocations.fetch_add(1, Ordering::Relaxed);
        self.shared
            .live_bytes
            .fetch_add(layout.size(), Ordering::Relaxed);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.shared.deallocations.fetch_add(1, Ordering::Relaxed);
        // Blocks may be released through an equal instance with other counters.
        let _ = self
            .shared
            .live_bytes
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |live| {
                Some(live.saturating_sub(layout.size()))
            });
        // SAFETY: every instance allocates from `Global`, so any block the
        // caller hands back is a live `Global` block with `layout`.
        unsafe { Global.deallocate(ptr, layout) }
    }

    fn max_bytes(&self) -> usize {
        self.max_bytes.unwrap_or(isize::MAX as usize)
    }

    fn select_on_copy(&self) -> Self {
        match self.copy_id {
            Some(id) => Self::new(id),
            None => self.clone(),
        }
    }
}
