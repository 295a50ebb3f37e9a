//! Indexed d-ary min-heap
//!
//! A min-heap whose nodes have up to `arity` children, paired with an
//! identity → slot index so that membership tests and priority changes on
//! arbitrary live elements never need to scan the backing storage.
//!
//! The backing `Vec` and the index map are treated as a single unit: every
//! swap rewrites both map entries, every append or removal at the edge of the
//! `Vec` adds or removes exactly one map entry.
//!
//! # Time Complexity
//!
//! | Operation            | Complexity      |
//! |----------------------|-----------------|
//! | `insert`             | O(log_d n)      |
//! | `pop_min`            | O(d · log_d n)  |
//! | `peek_min`           | O(1)            |
//! | `contains`           | O(1)            |
//! | `increase_priority`  | O(log_d n)      |
//! | `decrease_priority`  | O(d · log_d n)  |
//! | `*_priority_at`      | as above        |
//! | `insert_many`        | O(n)            |
//!
//! # Example
//!
//! ```rust
//! use indexed_dheap::{Element, IndexedDHeap};
//!
//! let mut heap = IndexedDHeap::new(4)?;
//! heap.insert(Element::new("b", 20))?;
//! heap.insert(Element::new("a", 10))?;
//! heap.insert(Element::new("c", 30))?;
//!
//! // Move "c" to the front
//! heap.increase_priority(&"c", 5)?;
//! assert_eq!(heap.peek_min().map(|e| e.identity), Some("c"));
//!
//! assert_eq!(heap.pop_min().map(|e| e.cost), Some(5));
//! assert_eq!(heap.pop_min().map(|e| e.cost), Some(10));
//! assert_eq!(heap.len(), 1);
//! # Ok::<(), indexed_dheap::HeapError>(())
//! ```

use crate::element::Element;
use crate::error::HeapError;
use rustc_hash::{FxHashSet, FxHasher};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// Hasher used by the index map unless another one is supplied
pub type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Smallest branching factor accepted at construction
pub const MIN_ARITY: usize = 2;

/// Branching factor used by [`Default`] and [`DHeapBuilder::new`]
pub const DEFAULT_ARITY: usize = 4;

/// A d-ary min-heap with O(1) identity lookup
///
/// Elements are ordered by `cost` (lowest first) and located by `identity`.
/// Each identity may appear at most once. `K` is cloned once per insertion
/// to key the index map.
#[derive(Clone)]
pub struct IndexedDHeap<K, P, S = FxBuildHasher> {
    /// Densely packed heap storage; slot 0 holds the minimum
    items: Vec<Element<K, P>>,
    /// identity -> slot in `items`
    index_of: HashMap<K, usize, S>,
    arity: usize,
}

impl<K, P> IndexedDHeap<K, P, FxBuildHasher>
where
    K: Hash + Eq + Clone,
    P: Ord,
{
    /// Creates an empty heap with the given branching factor
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `arity < 2`.
    pub fn new(arity: usize) -> Result<Self, HeapError> {
        Self::with_capacity_and_hasher(arity, 0, FxBuildHasher::default())
    }

    /// Creates an empty heap able to hold `capacity` elements without reallocating
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `arity < 2`.
    pub fn with_capacity(arity: usize, capacity: usize) -> Result<Self, HeapError> {
        Self::with_capacity_and_hasher(arity, capacity, FxBuildHasher::default())
    }
}

impl<K, P, S> IndexedDHeap<K, P, S>
where
    K: Hash + Eq + Clone,
    P: Ord,
    S: BuildHasher,
{
    /// Creates an empty heap whose index map uses `hasher`
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if `arity < 2`.
    pub fn with_capacity_and_hasher(
        arity: usize,
        capacity: usize,
        hasher: S,
    ) -> Result<Self, HeapError> {
        if arity < MIN_ARITY {
            return Err(HeapError::InvalidArity);
        }
        Ok(IndexedDHeap {
            items: Vec::with_capacity(capacity),
            index_of: HashMap::with_capacity_and_hasher(capacity, hasher),
            arity,
        })
    }

    /// Returns the branching factor fixed at construction
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Returns the number of elements in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the heap holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts an element
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateIdentity`] if an element with the same
    /// identity is already present. The heap is left untouched.
    pub fn insert(&mut self, element: Element<K, P>) -> Result<(), HeapError> {
        if self.index_of.contains_key(&element.identity) {
            return Err(HeapError::DuplicateIdentity);
        }

        let index = self.items.len();
        self.index_of.insert(element.identity.clone(), index);
        self.items.push(element);
        self.sift_up(index);
        Ok(())
    }

    /// Shorthand for `insert(Element::new(identity, cost))`
    pub fn push(&mut self, identity: K, cost: P) -> Result<(), HeapError> {
        self.insert(Element::new(identity, cost))
    }

    /// Returns the minimum-cost element without removing it
    #[inline]
    pub fn peek_min(&self) -> Option<&Element<K, P>> {
        self.items.first()
    }

    /// Removes and returns the minimum-cost element, or `None` if empty
    pub fn pop_min(&mut self) -> Option<Element<K, P>> {
        if self.items.is_empty() {
            return None;
        }

        // swap_remove moves the last element into slot 0
        let popped = self.items.swap_remove(0);
        self.index_of.remove(&popped.identity);

        if !self.items.is_empty() {
            self.record_index(0);
            self.sift_down(0);
        }

        Some(popped)
    }

    /// Returns true if an element with this identity is in the heap
    #[inline]
    pub fn contains<Q>(&self, identity: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of.contains_key(identity)
    }

    /// Returns the current storage slot of an element
    ///
    /// Slot 0 is the root. Positions shift as the heap is modified.
    #[inline]
    pub fn position<Q>(&self, identity: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of.get(identity).copied()
    }

    /// Returns the live element with this identity
    pub fn get<Q>(&self, identity: &Q) -> Option<&Element<K, P>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of.get(identity).map(|&index| &self.items[index])
    }

    /// Returns the current cost of the element with this identity
    pub fn cost_of<Q>(&self, identity: &Q) -> Option<&P>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(identity).map(|element| &element.cost)
    }

    /// Lowers an element's cost, moving it toward the root
    ///
    /// Lower cost means higher priority, so this is the classic `decrease_key`.
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if no element has this identity
    /// - [`HeapError::InvalidTransition`] if `new_cost` is not strictly less
    ///   than the current cost
    pub fn increase_priority<Q>(&mut self, identity: &Q, new_cost: P) -> Result<(), HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.slot_of(identity)?;
        self.increase_priority_at(index, new_cost)
    }

    /// Raises an element's cost, moving it toward the leaves
    ///
    /// # Errors
    /// - [`HeapError::NotFound`] if no element has this identity
    /// - [`HeapError::InvalidTransition`] if `new_cost` is not strictly greater
    ///   than the current cost
    pub fn decrease_priority<Q>(&mut self, identity: &Q, new_cost: P) -> Result<(), HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.slot_of(identity)?;
        self.decrease_priority_at(index, new_cost)
    }

    /// Sets an element's cost, repairing in whichever direction is needed
    ///
    /// An unchanged cost is accepted and leaves the heap as is.
    ///
    /// # Errors
    /// Returns [`HeapError::NotFound`] if no element has this identity.
    pub fn update_priority<Q>(&mut self, identity: &Q, new_cost: P) -> Result<(), HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.slot_of(identity)?;
        self.update_priority_at(index, new_cost)
    }

    /// Lowers the cost of the element at storage slot `index`
    ///
    /// Slots are the positions reported by [`position`](Self::position) and
    /// [`iter`](Self::iter). They shift whenever the heap is mutated.
    ///
    /// # Errors
    /// - [`HeapError::IndexOutOfBounds`] if `index >= len()`
    /// - [`HeapError::InvalidTransition`] if `new_cost` is not strictly less
    ///   than the current cost
    pub fn increase_priority_at(&mut self, index: usize, new_cost: P) -> Result<(), HeapError> {
        let current = &self.items.get(index).ok_or(HeapError::IndexOutOfBounds)?.cost;
        if new_cost >= *current {
            return Err(HeapError::InvalidTransition);
        }

        self.items[index].cost = new_cost;
        self.sift_up(index);
        Ok(())
    }

    /// Raises the cost of the element at storage slot `index`
    ///
    /// # Errors
    /// - [`HeapError::IndexOutOfBounds`] if `index >= len()`
    /// - [`HeapError::InvalidTransition`] if `new_cost` is not strictly greater
    ///   than the current cost
    pub fn decrease_priority_at(&mut self, index: usize, new_cost: P) -> Result<(), HeapError> {
        let current = &self.items.get(index).ok_or(HeapError::IndexOutOfBounds)?.cost;
        if new_cost <= *current {
            return Err(HeapError::InvalidTransition);
        }

        self.items[index].cost = new_cost;
        self.sift_down(index);
        Ok(())
    }

    /// Sets the cost of the element at storage slot `index`
    ///
    /// # Errors
    /// Returns [`HeapError::IndexOutOfBounds`] if `index >= len()`.
    pub fn update_priority_at(&mut self, index: usize, new_cost: P) -> Result<(), HeapError> {
        let current = &self.items.get(index).ok_or(HeapError::IndexOutOfBounds)?.cost;
        match new_cost.cmp(current) {
            Ordering::Less => {
                self.items[index].cost = new_cost;
                self.sift_up(index);
            }
            Ordering::Greater => {
                self.items[index].cost = new_cost;
                self.sift_down(index);
            }
            Ordering::Equal => {}
        }
        Ok(())
    }

    /// Inserts a batch of elements, restoring heap order with one bottom-up pass
    ///
    /// Runs in O(n + m) rather than O(m log_d (n + m)) for m separate inserts.
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateIdentity`] if any identity is already in
    /// the heap or appears twice in the batch. Nothing is inserted in that case.
    pub fn insert_many<I>(&mut self, elements: I) -> Result<(), HeapError>
    where
        I: IntoIterator<Item = Element<K, P>>,
    {
        let elements: Vec<Element<K, P>> = elements.into_iter().collect();
        if elements.is_empty() {
            return Ok(());
        }

        {
            let mut seen: FxHashSet<&K> = FxHashSet::default();
            for element in &elements {
                if self.index_of.contains_key(&element.identity) || !seen.insert(&element.identity)
                {
                    return Err(HeapError::DuplicateIdentity);
                }
            }
        }

        self.items.reserve(elements.len());
        self.index_of.reserve(elements.len());
        for element in elements {
            self.index_of
                .insert(element.identity.clone(), self.items.len());
            self.items.push(element);
        }

        self.heapify();
        Ok(())
    }

    /// Pops up to `count` elements in ascending cost order
    pub fn pop_many(&mut self, count: usize) -> Vec<Element<K, P>> {
        let count = count.min(self.items.len());
        let mut popped = Vec::with_capacity(count);
        for _ in 0..count {
            if let Some(element) = self.pop_min() {
                popped.push(element);
            }
        }
        popped
    }

    /// Removes every element; the arity is kept
    pub fn clear(&mut self) {
        self.items.clear();
        self.index_of.clear();
    }

    /// Iterates over the elements in storage order
    ///
    /// Only the first element is guaranteed to be the minimum.
    pub fn iter(&self) -> std::slice::Iter<'_, Element<K, P>> {
        self.items.iter()
    }

    /// Consumes the heap, returning its elements by ascending cost
    pub fn into_sorted_vec(mut self) -> Vec<Element<K, P>> {
        let len = self.items.len();
        self.pop_many(len)
    }

    /// Checks heap order, index consistency and density
    ///
    /// Returns a description of the first violation found. O(n).
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.index_of.len() != self.items.len() {
            return Err(format!(
                "index map holds {} entries for {} items",
                self.index_of.len(),
                self.items.len()
            ));
        }

        for (index, element) in self.items.iter().enumerate() {
            match self.index_of.get(&element.identity) {
                Some(&recorded) if recorded == index => {}
                Some(&recorded) => {
                    return Err(format!("item at slot {index} is indexed at slot {recorded}"));
                }
                None => return Err(format!("item at slot {index} is missing from the index")),
            }

            if index > 0 {
                let parent = self.parent(index);
                if self.items[parent].cost > element.cost {
                    return Err(format!(
                        "heap order violated between parent {parent} and child {index}"
                    ));
                }
            }
        }

        Ok(())
    }

    #[inline]
    fn parent(&self, index: usize) -> usize {
        (index - 1) / self.arity
    }

    fn slot_of<Q>(&self, identity: &Q) -> Result<usize, HeapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of
            .get(identity)
            .copied()
            .ok_or(HeapError::NotFound)
    }

    /// Rewrites the index entry for whatever element now sits at `index`
    #[inline]
    fn record_index(&mut self, index: usize) {
        if let Some(slot) = self.index_of.get_mut(&self.items[index].identity) {
            *slot = index;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.items.swap(a, b);
        self.record_index(a);
        self.record_index(b);
    }

    /// Returns the slot of the cheapest child, preferring the leftmost on ties
    fn min_child(&self, index: usize) -> Option<usize> {
        let len = self.items.len();
        let first = index.saturating_mul(self.arity).saturating_add(1);
        if first >= len {
            return None;
        }
        let end = first.saturating_add(self.arity).min(len);

        let mut smallest = first;
        for child in (first + 1)..end {
            if self.items[child].cost < self.items[smallest].cost {
                smallest = child;
            }
        }
        Some(smallest)
    }

    /// Move element at index up to maintain heap property
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = self.parent(index);
            if self.items[index].cost < self.items[parent].cost {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Move element at index down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        while let Some(child) = self.min_child(index) {
            if self.items[child].cost < self.items[index].cost {
                self.swap(index, child);
                index = child;
            } else {
                break;
            }
        }
    }

    /// Floyd's bottom-up construction over the whole storage
    fn heapify(&mut self) {
        let len = self.items.len();
        if len < 2 {
            return;
        }
        let last_internal = (len - 2) / self.arity;
        for index in (0..=last_internal).rev() {
            self.sift_down(index);
        }
    }
}

impl<K, P, S> Default for IndexedDHeap<K, P, S>
where
    S: Default,
{
    fn default() -> Self {
        IndexedDHeap {
            items: Vec::new(),
            index_of: HashMap::with_hasher(S::default()),
            arity: DEFAULT_ARITY,
        }
    }
}

impl<K: fmt::Debug, P: fmt::Debug, S> fmt::Debug for IndexedDHeap<K, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedDHeap")
            .field("arity", &self.arity)
            .field("items", &self.items)
            .finish()
    }
}

/// Renders the storage order as `{id: cost, id: cost}`
impl<K: fmt::Display, P: fmt::Display, S> fmt::Display for IndexedDHeap<K, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (index, element) in self.items.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{element}")?;
        }
        write!(f, "}}")
    }
}

impl<'a, K, P, S> IntoIterator for &'a IndexedDHeap<K, P, S> {
    type Item = &'a Element<K, P>;
    type IntoIter = std::slice::Iter<'a, Element<K, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Fluent configuration for [`IndexedDHeap`]
///
/// # Example
///
/// ```rust
/// use indexed_dheap::{DHeapBuilder, IndexedDHeap};
///
/// let heap: IndexedDHeap<u32, u64> = DHeapBuilder::new()
///     .arity(8)
///     .capacity(1024)
///     .build()?;
/// assert_eq!(heap.arity(), 8);
///
/// assert!(DHeapBuilder::new().arity(1).build::<u32, u64>().is_err());
/// # Ok::<(), indexed_dheap::HeapError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DHeapBuilder {
    arity: usize,
    capacity: usize,
}

impl DHeapBuilder {
    /// Starts from arity [`DEFAULT_ARITY`] and no preallocation
    pub fn new() -> Self {
        DHeapBuilder {
            arity: DEFAULT_ARITY,
            capacity: 0,
        }
    }

    /// Sets the branching factor
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the number of elements to preallocate room for
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builds a heap using the default Fx hasher
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if the configured arity is below 2.
    pub fn build<K, P>(self) -> Result<IndexedDHeap<K, P>, HeapError>
    where
        K: Hash + Eq + Clone,
        P: Ord,
    {
        IndexedDHeap::with_capacity(self.arity, self.capacity)
    }

    /// Builds a heap whose index map uses `hasher`
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if the configured arity is below 2.
    pub fn build_with_hasher<K, P, S>(self, hasher: S) -> Result<IndexedDHeap<K, P, S>, HeapError>
    where
        K: Hash + Eq + Clone,
        P: Ord,
        S: BuildHasher,
    {
        IndexedDHeap::with_capacity_and_hasher(self.arity, self.capacity, hasher)
    }
}

impl Default for DHeapBuilder {
    fn default() -> Self {
        Self::new()
    }
}
