//! Dijkstra's and A* pathfinding on top of [`IndexedDHeap`]
//!
//! The open set is an indexed d-ary heap keyed by a dense node index, so a
//! cheaper route to a node already in the open set becomes an in-place
//! [`update_priority`](IndexedDHeap::update_priority) rather than a
//! duplicate entry. Each node is therefore popped at most once.
//!
//! Dijkstra is A* with h(n) = 0. The node type carries its own goal context
//! and implements `is_goal()` to decide when the search stops.
//!
//! # Example
//!
//! ```rust
//! use indexed_dheap::pathfinding::{dijkstra, SearchNode};
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .into_iter()
//!             .map(|(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..self.clone() }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra(&start).unwrap();
//! assert_eq!(cost, 4); // Manhattan distance
//! assert_eq!(path.len(), 5);
//! ```

use crate::dheap::{IndexedDHeap, DEFAULT_ARITY};
use crate::element::Element;
use crate::error::HeapError;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

/// Trait for types that can be used as costs in pathfinding algorithms.
///
/// `Default` must be the additive zero.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// Trait for nodes in a search graph.
pub trait SearchNode: Clone + Eq + Hash {
    /// The cost type for edge weights
    type Cost: Cost;

    /// Returns all successor nodes along with the cost to reach them.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this node is a goal state.
    fn is_goal(&self) -> bool;
}

/// Trait for nodes that can provide a heuristic estimate for A* search.
///
/// The heuristic must be admissible (never overestimate the true cost)
/// for A* to find optimal paths.
pub trait AStarNode: SearchNode {
    /// Returns a lower bound on the cost from this node to any goal.
    fn heuristic(&self) -> Self::Cost;
}

/// Heap key for a node in the open set, ordered by f-score only.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCost<C> {
    /// g + h (h = 0 for Dijkstra)
    pub f_score: C,
    /// Cost from start
    pub g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

/// Dense index of a discovered node; this is the heap identity.
type NodeIndex = usize;

struct NodeEntry<N, C> {
    node: N,
    g_score: C,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Bookkeeping for one search: discovered nodes and the open set.
struct Frontier<N: SearchNode> {
    entries: Vec<NodeEntry<N, N::Cost>>,
    index_of: FxHashMap<N, NodeIndex>,
    open: IndexedDHeap<NodeIndex, PriorityCost<N::Cost>>,
}

impl<N: SearchNode> Frontier<N> {
    fn new(arity: usize, start: &N, start_h: N::Cost) -> Result<Self, HeapError> {
        let mut frontier = Frontier {
            entries: Vec::new(),
            index_of: FxHashMap::default(),
            open: IndexedDHeap::new(arity)?,
        };
        frontier.discover(start.clone(), N::Cost::default(), start_h, None)?;
        Ok(frontier)
    }

    fn discover(
        &mut self,
        node: N,
        g_score: N::Cost,
        h: N::Cost,
        came_from: Option<NodeIndex>,
    ) -> Result<(), HeapError> {
        let index = self.entries.len();
        self.index_of.insert(node.clone(), index);
        self.entries.push(NodeEntry {
            node,
            g_score,
            came_from,
            closed: false,
        });
        self.open.insert(Element::new(
            index,
            PriorityCost {
                f_score: g_score + h,
                g_score,
            },
        ))
    }

    /// Pops the cheapest open node and marks it closed.
    fn next(&mut self) -> Option<(NodeIndex, N::Cost)> {
        let element = self.open.pop_min()?;
        let index = element.identity;
        self.entries[index].closed = true;
        Some((index, element.cost.g_score))
    }

    /// Records a route to `neighbor` costing `tentative_g`, keeping the cheaper one.
    fn relax(
        &mut self,
        from: NodeIndex,
        neighbor: N,
        tentative_g: N::Cost,
        h: N::Cost,
    ) -> Result<(), HeapError> {
        let Some(&index) = self.index_of.get(&neighbor) else {
            return self.discover(neighbor, tentative_g, h, Some(from));
        };

        let entry = &mut self.entries[index];
        if entry.closed || tentative_g >= entry.g_score {
            return Ok(());
        }
        entry.g_score = tentative_g;
        entry.came_from = Some(from);

        let priority = PriorityCost {
            f_score: tentative_g + h,
            g_score: tentative_g,
        };
        self.open.update_priority(&index, priority)
    }

    fn node(&self, index: NodeIndex) -> &N {
        &self.entries[index].node
    }

    fn reconstruct_path(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[current].node.clone()];
        while let Some(prev) = self.entries[current].came_from {
            path.push(self.entries[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from `start` until `is_goal()` returns true.
///
/// Uses a heap of arity [`DEFAULT_ARITY`]; [`PathFinderBuilder::arity`]
/// picks another. Returns `Some((path, cost))` with the path inclusive of
/// both ends, or `None` if no goal is reachable.
///
/// # Example
/// ```rust
/// use indexed_dheap::pathfinding::{dijkstra, SearchNode};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// struct Node {
///     value: i32,
///     goal: i32,
/// }
///
/// impl SearchNode for Node {
///     type Cost = u32;
///
///     fn successors(&self) -> Vec<(Self, u32)> {
///         if self.value < 100 {
///             vec![(Node { value: self.value + 1, goal: self.goal }, 1)]
///         } else {
///             vec![]
///         }
///     }
///
///     fn is_goal(&self) -> bool {
///         self.value == self.goal
///     }
/// }
///
/// let (_, cost) = dijkstra(&Node { value: 0, goal: 5 }).unwrap();
/// assert_eq!(cost, 5);
/// ```
pub fn dijkstra<N: SearchNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    // Only an invalid arity can fail here, and DEFAULT_ARITY is valid
    PathFinderBuilder::new(start.clone()).dijkstra().ok().flatten()
}

/// Runs A* search from `start`, guided by the node's `heuristic()`.
///
/// Uses a heap of arity [`DEFAULT_ARITY`]; see [`PathFinderBuilder::arity`]
/// to choose another.
pub fn astar<N: AStarNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    // Same as dijkstra: DEFAULT_ARITY cannot be rejected
    PathFinderBuilder::new(start.clone()).astar().ok().flatten()
}

/// Builder for pathfinding queries with more configuration options.
///
/// # Example
/// ```rust
/// use indexed_dheap::pathfinding::{PathFinderBuilder, SearchNode};
///
/// #[derive(Clone, PartialEq, Eq, Hash)]
/// struct Step(u32);
///
/// impl SearchNode for Step {
///     type Cost = u32;
///     fn successors(&self) -> Vec<(Self, u32)> { vec![(Step(self.0 + 1), 1)] }
///     fn is_goal(&self) -> bool { self.0 == 10 }
/// }
///
/// let result = PathFinderBuilder::new(Step(0)).arity(8).max_cost(3).dijkstra()?;
/// assert!(result.is_none());
/// # Ok::<(), indexed_dheap::HeapError>(())
/// ```
pub struct PathFinderBuilder<N: SearchNode> {
    start: N,
    arity: usize,
    max_cost: Option<N::Cost>,
    max_nodes: Option<usize>,
}

impl<N: SearchNode> PathFinderBuilder<N> {
    /// Creates a new builder starting from the given node.
    pub fn new(start: N) -> Self {
        PathFinderBuilder {
            start,
            arity: DEFAULT_ARITY,
            max_cost: None,
            max_nodes: None,
        }
    }

    /// Sets the branching factor of the open-set heap.
    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the maximum path cost to explore.
    pub fn max_cost(mut self, cost: N::Cost) -> Self {
        self.max_cost = Some(cost);
        self
    }

    /// Sets the maximum number of nodes to expand.
    pub fn max_nodes(mut self, count: usize) -> Self {
        self.max_nodes = Some(count);
        self
    }

    /// Runs Dijkstra's algorithm with the configured settings.
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if the configured arity is below 2.
    pub fn dijkstra(self) -> Result<Option<(Vec<N>, N::Cost)>, HeapError> {
        self.search_with_heuristic(|_| N::Cost::default())
    }

    /// Runs A* search with the configured settings.
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidArity`] if the configured arity is below 2.
    pub fn astar(self) -> Result<Option<(Vec<N>, N::Cost)>, HeapError>
    where
        N: AStarNode,
    {
        self.search_with_heuristic(|n| n.heuristic())
    }

    fn search_with_heuristic(
        self,
        heuristic: impl Fn(&N) -> N::Cost,
    ) -> Result<Option<(Vec<N>, N::Cost)>, HeapError> {
        let mut frontier = Frontier::new(self.arity, &self.start, heuristic(&self.start))?;
        let mut expanded = 0usize;

        while let Some((current, current_g)) = frontier.next() {
            if let Some(max) = self.max_nodes {
                if expanded >= max {
                    return Ok(None);
                }
            }
            expanded += 1;

            if let Some(max) = self.max_cost {
                if current_g > max {
                    continue;
                }
            }

            if frontier.node(current).is_goal() {
                return Ok(Some((frontier.reconstruct_path(current), current_g)));
            }

            let successors = frontier.node(current).successors();
            for (neighbor, edge_cost) in successors {
                let tentative_g = current_g + edge_cost;
                if let Some(max) = self.max_cost {
                    if tentative_g > max {
                        continue;
                    }
                }
                let h = heuristic(&neighbor);
                frontier.relax(current, neighbor, tentative_g, h)?;
            }
        }

        Ok(None)
    }
}

/// Returns all nodes reachable from `start` within `max_cost`, in the order
/// they were settled, each with its shortest distance.
///
/// # Errors
/// Returns [`HeapError::InvalidArity`] if `arity < 2`.
pub fn reachable_within<N: SearchNode>(
    start: &N,
    max_cost: N::Cost,
    arity: usize,
) -> Result<Vec<(N, N::Cost)>, HeapError> {
    let mut result = Vec::new();
    let mut frontier = Frontier::new(arity, start, N::Cost::default())?;

    while let Some((current, current_g)) = frontier.next() {
        if current_g > max_cost {
            continue;
        }
        let current_node = frontier.node(current).clone();

        for (neighbor, edge_cost) in current_node.successors() {
            let tentative_g = current_g + edge_cost;
            if tentative_g > max_cost {
                continue;
            }
            frontier.relax(current, neighbor, tentative_g, N::Cost::default())?;
        }

        result.push((current_node, current_g));
    }

    Ok(result)
}

/// A directed weighted edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<V, C> {
    /// Tail vertex
    pub from: V,
    /// Head vertex
    pub to: V,
    /// Non-negative traversal cost
    pub weight: C,
}

/// An explicit directed graph given as vertex and edge lists.
#[derive(Debug, Clone)]
pub struct Graph<V, C> {
    /// Every vertex, including isolated ones
    pub vertices: Vec<V>,
    /// Directed edges; parallel edges and self-loops are allowed
    pub edges: Vec<Edge<V, C>>,
}

impl<V, C> Graph<V, C> {
    /// Creates a graph with no vertices and no edges.
    pub fn new() -> Self {
        Graph {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Adds a directed edge, registering unseen endpoints as vertices.
    pub fn add_edge(&mut self, from: V, to: V, weight: C)
    where
        V: PartialEq + Clone,
    {
        for v in [&from, &to] {
            if !self.vertices.contains(v) {
                self.vertices.push(v.clone());
            }
        }
        self.edges.push(Edge { from, to, weight });
    }
}

impl<V, C> Default for Graph<V, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-source shortest path tree produced by [`shortest_paths`].
///
/// Unreachable vertices have no distance and no predecessor.
#[derive(Debug, Clone)]
pub struct ShortestPaths<V, C> {
    /// Vertex the tree is rooted at
    pub source: V,
    /// Shortest distance to each reached vertex
    pub distances: FxHashMap<V, C>,
    /// Previous hop on the shortest route; absent for the source
    pub predecessors: FxHashMap<V, V>,
}

impl<V: Hash + Eq + Clone, C> ShortestPaths<V, C> {
    /// Returns the shortest distance to `target`, if reachable.
    pub fn distance(&self, target: &V) -> Option<&C> {
        self.distances.get(target)
    }

    /// Rebuilds the route from the source to `target`, both inclusive.
    pub fn path_to(&self, target: &V) -> Option<Vec<V>> {
        if !self.distances.contains_key(target) {
            return None;
        }
        let mut path = vec![target.clone()];
        let mut current = target;
        while let Some(prev) = self.predecessors.get(current) {
            path.push(prev.clone());
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Computes shortest distances from `source` to every reachable vertex.
///
/// Edge weights must be non-negative. `arity` selects the heap's branching factor.
///
/// # Errors
/// Returns [`HeapError::InvalidArity`] if `arity < 2`.
///
/// # Example
/// ```rust
/// use indexed_dheap::pathfinding::{shortest_paths, Graph};
///
/// let mut graph = Graph::new();
/// graph.add_edge('A', 'B', 4u32);
/// graph.add_edge('A', 'C', 1);
/// graph.add_edge('C', 'B', 2);
///
/// let tree = shortest_paths(&graph, 'A', 4)?;
/// assert_eq!(tree.distance(&'B'), Some(&3));
/// assert_eq!(tree.path_to(&'B'), Some(vec!['A', 'C', 'B']));
/// # Ok::<(), indexed_dheap::HeapError>(())
/// ```
pub fn shortest_paths<V, C>(
    graph: &Graph<V, C>,
    source: V,
    arity: usize,
) -> Result<ShortestPaths<V, C>, HeapError>
where
    V: Hash + Eq + Clone,
    C: Cost,
{
    let mut adjacency: FxHashMap<&V, Vec<(&V, C)>> = FxHashMap::default();
    for edge in &graph.edges {
        adjacency
            .entry(&edge.from)
            .or_default()
            .push((&edge.to, edge.weight));
    }

    let mut open: IndexedDHeap<V, C> =
        IndexedDHeap::with_capacity(arity, graph.vertices.len())?;
    let mut distances: FxHashMap<V, C> = FxHashMap::default();
    let mut predecessors: FxHashMap<V, V> = FxHashMap::default();

    open.push(source.clone(), C::default())?;
    distances.insert(source.clone(), C::default());

    while let Some(Element {
        identity: current,
        cost: current_distance,
    }) = open.pop_min()
    {
        let Some(neighbors) = adjacency.get(&current) else {
            continue;
        };
        for &(neighbor, weight) in neighbors {
            let candidate = current_distance + weight;
            let improved = match distances.get(neighbor) {
                Some(&known) => candidate < known,
                None => true,
            };
            if !improved {
                continue;
            }

            if open.contains(neighbor) {
                open.increase_priority(neighbor, candidate)?;
            } else if !distances.contains_key(neighbor) {
                open.push(neighbor.clone(), candidate)?;
            } else {
                // Settled vertices cannot improve with non-negative weights
                continue;
            }
            distances.insert(neighbor.clone(), candidate);
            predecessors.insert(neighbor.clone(), current.clone());
        }
    }

    Ok(ShortestPaths {
        source,
        distances,
        predecessors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    struct LinearNode {
        value: i32,
        goal: i32,
    }

    impl SearchNode for LinearNode {
        type Cost = u32;

        fn successors(&self) -> Vec<(Self, u32)> {
            if self.value < 100 {
                vec![(
                    LinearNode {
                        value: self.value + 1,
                        goal: self.goal,
                    },
                    1,
                )]
            } else {
                vec![]
            }
        }

        fn is_goal(&self) -> bool {
            self.value == self.goal
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug)]
    struct DecreaseKeyNode {
        id: u32,
        goal: u32,
    }

    impl SearchNode for DecreaseKeyNode {
        type Cost = u32;

        fn successors(&self) -> Vec<(Self, u32)> {
            //   0 --10-> 1 --1-> 3
            //   |        ^
            //   1        5
            //   v        |
            //   2 -------+
            let to = |id| DecreaseKeyNode { id, goal: self.goal };
            match self.id {
                0 => vec![(to(1), 10), (to(2), 1)],
                1 => vec![(to(3), 1)],
                2 => vec![(to(1), 5)],
                _ => vec![],
            }
        }

        fn is_goal(&self) -> bool {
            self.id == self.goal
        }
    }

    #[test]
    fn test_dijkstra_linear() {
        let (path, cost) = dijkstra(&LinearNode { value: 0, goal: 5 }).unwrap();
        assert_eq!(cost, 5);
        assert_eq!(path.len(), 6);
        assert_eq!(path[0].value, 0);
        assert_eq!(path[5].value, 5);
    }

    #[test]
    fn test_dijkstra_no_path() {
        assert!(dijkstra(&LinearNode { value: 0, goal: 200 }).is_none());
    }

    #[test]
    fn test_relaxation_moves_open_node_forward() {
        let (path, cost) = dijkstra(&DecreaseKeyNode { id: 0, goal: 3 }).unwrap();
        assert_eq!(cost, 7);
        let ids: Vec<u32> = path.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_builder_rejects_bad_arity() {
        let result = PathFinderBuilder::new(LinearNode { value: 0, goal: 3 })
            .arity(1)
            .dijkstra();
        assert_eq!(result.unwrap_err(), HeapError::InvalidArity);
    }

    #[test]
    fn test_builder_limits() {
        let start = LinearNode { value: 0, goal: 10 };
        assert!(PathFinderBuilder::new(start.clone())
            .max_cost(3)
            .dijkstra()
            .unwrap()
            .is_none());
        assert!(PathFinderBuilder::new(start.clone())
            .max_nodes(5)
            .dijkstra()
            .unwrap()
            .is_none());
        let (_, cost) = PathFinderBuilder::new(start)
            .max_cost(10)
            .max_nodes(20)
            .arity(3)
            .dijkstra()
            .unwrap()
            .unwrap();
        assert_eq!(cost, 10);
    }

    #[test]
    fn test_reachable_within() {
        let start = LinearNode { value: 0, goal: -1 };
        let reachable = reachable_within(&start, 5, DEFAULT_ARITY).unwrap();
        assert_eq!(reachable.len(), 6);
        for (node, cost) in &reachable {
            assert_eq!(*cost, node.value as u32);
        }

        assert_eq!(
            reachable_within(&start, 5, 1).unwrap_err(),
            HeapError::InvalidArity
        );
    }

    #[test]
    fn test_graph_default_is_empty() {
        let graph: Graph<u8, u32> = Graph::default();
        assert!(graph.vertices.is_empty());
        assert!(graph.edges.is_empty());
        let tree = shortest_paths(&graph, 7, 2).unwrap();
        assert_eq!(tree.path_to(&7), Some(vec![7]));
    }

    #[test]
    fn test_shortest_paths_unreachable() {
        let mut graph = Graph::new();
        graph.add_edge(1, 2, 3u64);
        graph.vertices.push(9);

        let tree = shortest_paths(&graph, 1, 2).unwrap();
        assert_eq!(tree.distance(&2), Some(&3));
        assert_eq!(tree.distance(&9), None);
        assert_eq!(tree.path_to(&9), None);
        assert_eq!(tree.path_to(&1), Some(vec![1]));
    }

    #[test]
    fn test_shortest_paths_invalid_arity() {
        let graph: Graph<u8, u8> = Graph::new();
        assert_eq!(
            shortest_paths(&graph, 0, 1).unwrap_err(),
            HeapError::InvalidArity
        );
    }

    #[test]
    fn test_priority_cost_ordering() {
        let a = PriorityCost {
            f_score: 5u32,
            g_score: 3u32,
        };
        let b = PriorityCost {
            f_score: 10u32,
            g_score: 1u32,
        };
        assert!(a < b);
    }
}
