//! Integration test: element lifecycle accounting.
//!
//! Every element a vector builds must be destroyed exactly once, and
//! relocation, moves, and swaps must not construct or destroy anything.
//! `Tracked` counts each event on the current thread.

use std::cell::RefCell;

use pliant::Vector;
use pliant_test_utils::{counts, reset_counts, Tracked};

fn tracked(values: &[u64]) -> Vector<Tracked> {
    values.iter().map(|&v| Tracked::new(v)).collect()
}

fn values(v: &Vector<Tracked>) -> Vec<u64> {
    v.iter().map(Tracked::value).collect()
}

// ── Construction ─────────────────────────────────────────────────────

#[test]
fn construct_with_count_default_constructs_each_element() {
    reset_counts();
    let v: Vector<Tracked> = Vector::with_len(10).unwrap();
    assert_eq!(counts().default_constructions, 10);
    assert_eq!(counts().clones, 0);
    drop(v);
    assert_eq!(counts().drops, 10);
}

#[test]
fn construct_with_value_clones_the_prototype() {
    reset_counts();
    let prototype = Tracked::new(42);
    let v = Vector::from_elem(10, &prototype).unwrap();
    assert_eq!(counts().clones, 10);
    assert!(v.iter().all(|t| t.value() == 42));
    drop(v);
    drop(prototype);
    assert_eq!(counts().live(), 0);
}

#[test]
fn copy_construction_clones_each_element_once() {
    reset_counts();
    let original = tracked(&[1, 2, 3, 4]);
    let before = counts();
    let copy = original.clone();
    let after = counts();
    assert_eq!(after.clones - before.clones, 4);
    assert_eq!(after.drops, before.drops);
    assert_eq!(values(&copy), [1, 2, 3, 4]);
}

#[test]
fn move_construction_touches_no_element() {
    reset_counts();
    let mut source = tracked(&[5, 6, 7]);
    let before = counts();
    let moved = Vector::take_from(&mut source);
    assert_eq!(counts(), before);
    assert_eq!(values(&moved), [5, 6, 7]);
    assert_eq!(source.len(), 0);
    assert_eq!(source.capacity(), 0);
}

// ── Assignment ───────────────────────────────────────────────────────

#[test]
fn move_assignment_destroys_old_contents_and_clones_nothing() {
    reset_counts();
    let mut target = tracked(&[1, 2]);
    let mut source = tracked(&[3, 4, 5]);
    let before = counts();
    target.assign_move(&mut source).unwrap();
    let after = counts();
    assert_eq!(after.clones, before.clones);
    assert_eq!(after.drops - before.drops, 2);
    assert_eq!(values(&target), [3, 4, 5]);
    assert!(source.is_empty());
}

#[test]
fn copy_assignment_destroys_then_clones() {
    reset_counts();
    let mut target = tracked(&[1, 2, 3, 4, 5]);
    let source = tracked(&[9, 8]);
    let before = counts();
    target.clone_from(&source);
    let after = counts();
    assert_eq!(after.drops - before.drops, 5);
    assert_eq!(after.clones - before.clones, 2);
    assert_eq!(values(&target), [9, 8]);
}

#[test]
fn assign_fill_replaces_every_element() {
    reset_counts();
    let mut v = tracked(&[1, 2, 3]);
    let fill = Tracked::new(0);
    v.assign_fill(2, &fill).unwrap();
    assert_eq!(values(&v), [0, 0]);
    drop(v);
    drop(fill);
    assert_eq!(counts().live(), 0);
}

// ── Capacity ─────────────────────────────────────────────────────────

#[test]
fn relocation_constructs_and_destroys_nothing() {
    reset_counts();
    let mut v = tracked(&[1, 2, 3]);
    let before = counts();
    v.reserve(100).unwrap();
    v.shrink_to_fit().unwrap();
    for i in 0..50 {
        v.push_back(Tracked::new(i)).unwrap();
    }
    let after = counts();
    assert_eq!(after.clones, before.clones);
    assert_eq!(after.drops, before.drops);
    assert_eq!(v.len(), 53);
}

#[test]
fn shrink_to_fit_keeps_contents() {
    reset_counts();
    let mut v: Vector<Tracked> = Vector::with_len(10).unwrap();
    v.reserve(100).unwrap();
    v.shrink_to_fit().unwrap();
    assert_eq!(v.capacity(), 10);
    assert_eq!(counts().live(), 10);
}

// ── Removal ──────────────────────────────────────────────────────────

#[test]
fn pop_back_destroys_exactly_one() {
    reset_counts();
    let mut v = tracked(&[1, 2, 3]);
    let before = counts();
    v.pop_back().unwrap();
    assert_eq!(counts().drops - before.drops, 1);
    assert_eq!(values(&v), [1, 2]);
}

#[test]
fn pop_hands_the_element_out() {
    reset_counts();
    let mut v = tracked(&[1, 2]);
    let before = counts();
    let last = v.pop().unwrap();
    assert_eq!(counts(), before);
    assert_eq!(last.value(), 2);
}

#[test]
fn clear_destroys_every_element_and_keeps_capacity() {
    reset_counts();
    let mut v = tracked(&[1, 2, 3, 4]);
    let cap = v.capacity();
    let before = counts();
    v.clear();
    assert_eq!(counts().drops - before.drops, 4);
    assert_eq!(v.capacity(), cap);
}

#[test]
fn resize_constructs_and_destroys_the_difference() {
    reset_counts();
    let mut v: Vector<Tracked> = Vector::new();
    v.resize(6).unwrap();
    assert_eq!(counts().default_constructions, 6);
    v.resize(2).unwrap();
    assert_eq!(counts().drops, 4);
    v.resize_fill(3, &Tracked::new(7)).unwrap();
    assert_eq!(values(&v), [0, 0, 7]);
}

#[test]
fn swap_constructs_and_destroys_nothing() {
    reset_counts();
    let mut a = tracked(&[1, 2, 3]);
    let mut b = tracked(&[4]);
    let before = counts();
    a.swap(&mut b);
    assert_eq!(counts(), before);
    assert_eq!(values(&a), [4]);
    assert_eq!(values(&b), [1, 2, 3]);
}

#[test]
fn everything_built_is_destroyed_once() {
    reset_counts();
    {
        let mut a = tracked(&[1, 2, 3]);
        let mut b = a.clone();
        b.push_back(Tracked::new(4)).unwrap();
        a.clone_from(&b);
        let mut c = Vector::take_from(&mut a);
        c.assign_move(&mut b).unwrap();
        c.resize(10).unwrap();
        c.pop_back().unwrap();
    }
    assert!(counts().constructions() > 0);
    assert_eq!(counts().live(), 0);
}

// ── Destruction order ────────────────────────────────────────────────

#[derive(Clone)]
struct Noisy<'a> {
    id: u32,
    log: &'a RefCell<Vec<u32>>,
}

impl Drop for Noisy<'_> {
    fn drop(&mut self) {
        self.log.borrow_mut().push(self.id);
    }
}

fn noisy(log: &RefCell<Vec<u32>>, count: u32) -> Vector<Noisy<'_>> {
    (0..count).map(|id| Noisy { id, log }).collect()
}

#[test]
fn clear_and_drop_destroy_front_to_back() {
    let log = RefCell::new(Vec::new());
    let mut v = noisy(&log, 3);
    v.clear();
    assert_eq!(*log.borrow(), [0, 1, 2]);

    log.borrow_mut().clear();
    drop(noisy(&log, 3));
    assert_eq!(*log.borrow(), [0, 1, 2]);
}

#[test]
fn shrinking_destroys_from_the_tail() {
    let log = RefCell::new(Vec::new());
    let mut v = noisy(&log, 5);
    v.pop_back().unwrap();
    assert_eq!(*log.borrow(), [4]);
    let spare = Noisy { id: 99, log: &log };
    v.resize_fill(1, &spare).unwrap();
    assert_eq!(*log.borrow(), [4, 3, 2, 1]);
}

// ── Property: live count always equals len ───────────────────────────

mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Push(u64),
        PopBack,
        Resize(usize),
        Clear,
        Shrink,
        CloneAssign,
        MoveAssign,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<u64>().prop_map(Op::Push),
            Just(Op::PopBack),
            (0usize..40).prop_map(Op::Resize),
            Just(Op::Clear),
            Just(Op::Shrink),
            Just(Op::CloneAssign),
            Just(Op::MoveAssign),
        ]
    }

    proptest! {
        #[test]
        fn live_elements_match_len(ops in proptest::collection::vec(op(), 1..60)) {
            reset_counts();
            let mut v: Vector<Tracked> = Vector::new();
            for op in ops {
                match op {
                    Op::Push(x) => v.push_back(Tracked::new(x)).unwrap(),
                    Op::PopBack => {
                        let _ = v.pop_back();
                    }
                    Op::Resize(n) => v.resize(n).unwrap(),
                    Op::Clear => v.clear(),
                    Op::Shrink => v.shrink_to_fit().unwrap(),
                    Op::CloneAssign => {
                        let copy = v.clone();
                        v.clone_from(&copy);
                    }
                    Op::MoveAssign => {
                        let mut other = v.clone();
                        v.assign_move(&mut other).unwrap();
                    }
                }
                prop_assert!(v.len() <= v.capacity());
                prop_assert_eq!(counts().live(), v.len() as isize);
            }
            drop(v);
            prop_assert_eq!(counts().live(), 0);
        }
    }
}
