//! Integration test: unwinding out of element construction.
//!
//! A panicking `Clone` or constructor closure must leave the vector
//! holding only fully built elements, and every element ever built must
//! still be dropped exactly once.

use std::panic::{catch_unwind, AssertUnwindSafe};

use pliant::Vector;
use pliant_test_utils::{arm_clone_panic, counts, reset_counts, Tracked};

fn tracked(values: &[u64]) -> Vector<Tracked> {
    values.iter().map(|&v| Tracked::new(v)).collect()
}

#[test]
fn panic_while_filling_drops_the_partial_vector() {
    reset_counts();
    let prototype = Tracked::new(1);
    arm_clone_panic(3);
    let result = catch_unwind(AssertUnwindSafe(|| Vector::from_elem(10, &prototype)));
    assert!(result.is_err());
    assert_eq!(counts().clones, 3);
    assert_eq!(counts().drops, 3);
    drop(prototype);
    assert_eq!(counts().live(), 0);
}

#[test]
fn panic_during_copy_leaves_the_original_intact() {
    reset_counts();
    let original = tracked(&[1, 2, 3, 4, 5]);
    arm_clone_panic(2);
    let result = catch_unwind(AssertUnwindSafe(|| original.clone()));
    assert!(result.is_err());
    assert_eq!(original.len(), 5);
    assert_eq!(counts().live(), 5);
}

#[test]
fn panic_during_copy_assignment_keeps_a_valid_prefix() {
    reset_counts();
    let mut target = tracked(&[9, 9]);
    let source = tracked(&[1, 2, 3, 4]);
    arm_clone_panic(2);
    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());
    let prefix: Vec<u64> = target.iter().map(Tracked::value).collect();
    assert_eq!(prefix, [1, 2]);
    assert!(target.len() <= target.capacity());
    drop(target);
    drop(source);
    assert_eq!(counts().live(), 0);
}

#[test]
fn panic_during_fill_resize_keeps_the_built_elements() {
    reset_counts();
    let mut v = tracked(&[1]);
    let fill = Tracked::new(7);
    arm_clone_panic(4);
    let result = catch_unwind(AssertUnwindSafe(|| v.resize_fill(10, &fill)));
    assert!(result.is_err());
    assert_eq!(v.len(), 5);
    assert!(v.capacity() >= 10);
    drop(v);
    drop(fill);
    assert_eq!(counts().live(), 0);
}

#[test]
fn panicking_constructor_leaves_length_unchanged() {
    reset_counts();
    let mut v = tracked(&[1, 2]);
    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ = v.emplace_back(|| panic!("constructor failed"));
    }));
    assert!(result.is_err());
    assert_eq!(v.len(), 2);
    v.push_back(Tracked::new(3)).unwrap();
    assert_eq!(v.len(), 3);
}

#[test]
fn vector_is_usable_after_a_failed_extend() {
    reset_counts();
    let mut v = tracked(&[1]);
    let extra = tracked(&[2, 3, 4]);
    arm_clone_panic(1);
    let result = catch_unwind(AssertUnwindSafe(|| v.extend(extra.iter().cloned())));
    assert!(result.is_err());
    assert_eq!(v.len(), 2);
    v.clear();
    assert!(v.is_empty());
    drop(v);
    drop(extra);
    assert_eq!(counts().live(), 0);
}
