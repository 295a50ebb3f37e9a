//! Stress tests that push the heap through large operation counts
//!
//! These tests perform many operations in various patterns across several
//! arities to catch edge cases in the index bookkeeping under load.

use indexed_dheap::{Element, IndexedDHeap};

const ARITIES: [usize; 5] = [2, 3, 4, 8, 16];

/// Test massive numbers of inserts and pops
fn test_massive_operations(arity: usize) {
    let mut heap = IndexedDHeap::new(arity).unwrap();

    for i in 0..5000 {
        heap.push(i, i).unwrap();
    }
    assert_eq!(heap.len(), 5000);
    heap.check_invariants().unwrap();

    for i in 0..5000 {
        assert_eq!(heap.pop_min().map(Element::into_parts), Some((i, i)));
    }
    assert!(heap.is_empty());
}

/// Test many increase_priority operations
fn test_many_increases(arity: usize) {
    let mut heap = IndexedDHeap::new(arity).unwrap();

    for i in 0..1000 {
        heap.push(i, 100_000 + i).unwrap();
    }

    // Walk backwards so every call moves an element past earlier ones
    for i in (0..1000).rev() {
        heap.increase_priority(&i, i).unwrap();
    }
    heap.check_invariants().unwrap();

    for i in 0..1000 {
        assert_eq!(heap.pop_min().map(Element::into_parts), Some((i, i)));
    }
}

/// Test many decrease_priority operations on the current root
fn test_root_sinking(arity: usize) {
    let mut heap = IndexedDHeap::new(arity).unwrap();
    for i in 0..500 {
        heap.push(i, i).unwrap();
    }

    // Repeatedly push the minimum to the back of the line
    for round in 0..500 {
        let root = heap.peek_min().map(|e| e.identity).unwrap();
        heap.decrease_priority(&root, 1_000 + round).unwrap();
    }
    heap.check_invariants().unwrap();

    let order: Vec<i32> = heap.into_sorted_vec().into_iter().map(|e| e.identity).collect();
    let expected: Vec<i32> = (0..500).collect();
    assert_eq!(order, expected);
}

/// Test alternating insert and pop
fn test_alternating_ops(arity: usize) {
    let mut heap = IndexedDHeap::new(arity).unwrap();

    for i in 0..1000 {
        heap.push(2 * i, i * 7 % 101).unwrap();
        heap.push(2 * i + 1, i * 13 % 97).unwrap();
        assert!(heap.pop_min().is_some());
    }
    assert_eq!(heap.len(), 1000);
    heap.check_invariants().unwrap();

    let mut last = i32::MIN;
    while let Some(element) = heap.pop_min() {
        assert!(element.cost >= last);
        last = element.cost;
    }
}

/// Reinserting identities after they were popped must work indefinitely
fn test_identity_reuse(arity: usize) {
    let mut heap = IndexedDHeap::new(arity).unwrap();

    for round in 0..50 {
        for id in 0..64u32 {
            heap.push(id, (id * 31 + round) % 64).unwrap();
        }
        for id in (0..64u32).step_by(3) {
            heap.update_priority(&id, 0).unwrap();
        }
        heap.check_invariants().unwrap();
        let drained = heap.pop_many(64);
        assert_eq!(drained.len(), 64);
        assert!(heap.is_empty());
    }
}

/// Many elements sharing a cost
fn test_all_equal_costs(arity: usize) {
    let mut heap = IndexedDHeap::new(arity).unwrap();
    for id in 0..300 {
        heap.push(id, 7).unwrap();
    }
    heap.check_invariants().unwrap();

    let mut seen = vec![false; 300];
    while let Some(element) = heap.pop_min() {
        assert_eq!(element.cost, 7);
        assert!(!seen[element.identity]);
        seen[element.identity] = true;
        heap.check_invariants().unwrap();
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_massive_operations_all_arities() {
    for arity in ARITIES {
        test_massive_operations(arity);
    }
}

#[test]
fn test_many_increases_all_arities() {
    for arity in ARITIES {
        test_many_increases(arity);
    }
}

#[test]
fn test_root_sinking_all_arities() {
    for arity in ARITIES {
        test_root_sinking(arity);
    }
}

#[test]
fn test_alternating_ops_all_arities() {
    for arity in ARITIES {
        test_alternating_ops(arity);
    }
}

#[test]
fn test_identity_reuse_all_arities() {
    for arity in ARITIES {
        test_identity_reuse(arity);
    }
}

#[test]
fn test_all_equal_costs_all_arities() {
    for arity in ARITIES {
        test_all_equal_costs(arity);
    }
}
