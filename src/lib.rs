//! Indexed d-ary heaps for Rust
//!
//! This crate provides a min-priority queue built on a d-ary heap (each node has
//! up to `d` children) with an auxiliary identity index, so that arbitrary live
//! elements can be found and re-prioritised without scanning.
//!
//! # Features
//!
//! - **Configurable arity**: any branching factor `d >= 2`, fixed at construction
//! - **O(1) membership**: `contains` and position lookups go through a hash index
//! - **In-place priority changes**: O(log_d n) `increase_priority`,
//!   O(d · log_d n) `decrease_priority`
//! - **Bulk construction**: O(n) `insert_many` via bottom-up heapify
//! - **Pathfinding**: Dijkstra, A* and bounded search using the heap as open set
//!
//! Lower cost means higher priority: `pop_min` always yields the cheapest element.
//!
//! # Example
//!
//! ```rust
//! use indexed_dheap::{Element, HeapError, IndexedDHeap};
//!
//! let mut heap = IndexedDHeap::new(4)?;
//! heap.insert(Element::new("item1", 5))?;
//! heap.insert(Element::new("item2", 3))?;
//!
//! heap.increase_priority(&"item1", 1)?;
//! assert_eq!(heap.peek_min(), Some(&Element::new("item1", 1)));
//!
//! // Priority changes must move strictly in the named direction
//! assert_eq!(heap.increase_priority(&"item2", 3), Err(HeapError::InvalidTransition));
//! # Ok::<(), HeapError>(())
//! ```

pub mod dheap;
pub mod element;
pub mod error;
pub mod pathfinding;

pub use dheap::{DHeapBuilder, IndexedDHeap, DEFAULT_ARITY};
pub use element::Element;
pub use error::HeapError;
