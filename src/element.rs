//! Heap entries keyed by identity
//!
//! An [`Element`] pairs a stable identity with a mutable cost. Two elements are
//! the same logical item when their identities match, whatever their costs are,
//! so equality and hashing deliberately ignore the cost field.

use std::fmt;
use std::hash::{Hash, Hasher};

/// An entry in an [`IndexedDHeap`](crate::dheap::IndexedDHeap)
///
/// # Example
///
/// ```rust
/// use indexed_dheap::Element;
///
/// let a = Element::new("task", 10);
/// let b = Element::new("task", 99);
///
/// // Same identity, different cost: still the same logical item
/// assert_eq!(a, b);
/// assert_eq!(a.cost, 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Element<K, P> {
    /// Key distinguishing this entry from every other live entry
    pub identity: K,
    /// Ordering key; lower costs are popped first
    pub cost: P,
}

impl<K, P> Element<K, P> {
    /// Creates an element from an identity and a cost
    pub fn new(identity: K, cost: P) -> Self {
        Element { identity, cost }
    }

    /// Splits the element into its identity and cost
    pub fn into_parts(self) -> (K, P) {
        (self.identity, self.cost)
    }
}

impl<K: PartialEq, P> PartialEq for Element<K, P> {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl<K: Eq, P> Eq for Element<K, P> {}

impl<K: Hash, P> Hash for Element<K, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}

impl<K, P> From<(K, P)> for Element<K, P> {
    fn from((identity, cost): (K, P)) -> Self {
        Element { identity, cost }
    }
}

impl<K: fmt::Display, P: fmt::Display> fmt::Display for Element<K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identity, self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_cost() {
        assert_eq!(Element::new(1, 5), Element::new(1, 500));
        assert_ne!(Element::new(1, 5), Element::new(2, 5));
    }

    #[test]
    fn test_hash_ignores_cost() {
        let mut set = HashSet::new();
        set.insert(Element::new("a", 1));
        assert!(!set.insert(Element::new("a", 2)));
        assert!(set.insert(Element::new("b", 1)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_from_tuple_and_display() {
        let e: Element<&str, u32> = ("x", 7).into();
        assert_eq!(e.to_string(), "x: 7");
        assert_eq!(e.into_parts(), ("x", 7));
    }

    #[test]
    fn test_fields_are_read_and_written_directly() {
        let mut e = Element::new('k', 3);
        e.cost += 1;
        let Element { identity, cost } = e;
        assert_eq!((identity, cost), ('k', 4));
    }
}
