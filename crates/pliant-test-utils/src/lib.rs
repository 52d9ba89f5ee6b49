//! Test utilities for Pliant development.
//!
//! Provides [`Tracked`], an element type that counts its own
//! constructions, clones, and drops, plus an instrumented allocator in
//! [`fixtures`]. Counters are thread-local so tests running in parallel
//! never observe each other.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;

pub mod fixtures;

pub use fixtures::{AllocStats, CountingAllocator};

/// Lifecycle event totals observed on the current thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub default_constructions: usize,
    pub value_constructions: usize,
    pub clones: usize,
    pub drops: usize,
}

impl Counts {
    const ZERO: Self = Self {
        default_constructions: 0,
        value_constructions: 0,
        clones: 0,
        drops: 0,
    };

    /// Every way a `Tracked` came into existence.
    pub fn constructions(&self) -> usize {
        self.default_constructions + self.value_constructions + self.clones
    }

    /// Constructions minus drops.
    pub fn live(&self) -> isize {
        self.constructions() as isize - self.drops as isize
    }
}

thread_local! {
    static COUNTS: Cell<Counts> = const { Cell::new(Counts::ZERO) };
    static CLONE_PANIC: Cell<Option<usize>> = const { Cell::new(None) };
}

fn record(update: impl FnOnce(&mut Counts)) {
    COUNTS.with(|cell| {
        let mut counts = cell.get();
        update(&mut counts);
        cell.set(counts);
    });
}

/// Zero this thread's counters and disarm any pending clone panic.
pub fn reset_counts() {
    COUNTS.with(|cell| cell.set(Counts::ZERO));
    disarm_clone_panic();
}

/// Snapshot of this thread's counters.
pub fn counts() -> Counts {
    COUNTS.with(Cell::get)
}

/// Make the clone after the next `after` clones panic, once.
pub fn arm_clone_panic(after: usize) {
    CLONE_PANIC.with(|cell| cell.set(Some(after)));
}

/// Cancel a pending clone panic.
pub fn disarm_clone_panic() {
    CLONE_PANIC.with(|cell| cell.set(None));
}

/// An element that reports every construction, clone, and drop.
///
/// Equality, ordering, and hashing look at the payload only.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tracked {
    value: u64,
}

impl Tracked {
    pub fn new(value: u64) -> Self {
        record(|c| c.value_constructions += 1);
        Self { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

impl Default for Tracked {
    fn default() -> Self {
        record(|c| c.default_constructions += 1);
        Self { value: 0 }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        let trigger = CLONE_PANIC.with(|cell| match cell.get() {
            Some(0) => {
                cell.set(None);
                true
            }
            Some(n) => {
                cell.set(Some(n - 1));
                false
            }
            None => false,
        });
        if trigger {
            panic!("Tracked::clone armed to panic");
        }
        record(|c| c.clones += 1);
        Self { value: self.value }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        record(|c| c.drops += 1);
    }
}
