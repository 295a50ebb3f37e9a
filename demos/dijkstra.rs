//! Shortest paths on a small road network
//!
//! ## Running
//!
//! ```bash
//! cargo run --example dijkstra
//! ```

use indexed_dheap::pathfinding::{shortest_paths, Graph};
use indexed_dheap::HeapError;

fn main() -> Result<(), HeapError> {
    let mut graph = Graph::new();
    for (from, to, weight) in [
        ("A", "B", 4u32),
        ("A", "C", 2),
        ("B", "E", 3),
        ("C", "D", 2),
        ("C", "F", 4),
        ("D", "E", 3),
        ("D", "F", 1),
        ("E", "F", 1),
    ] {
        graph.add_edge(from, to, weight);
    }

    let source = "A";
    println!("Shortest paths from vertex {source}:");
    println!("================================");

    for arity in [2, 4, 8] {
        let tree = shortest_paths(&graph, source, arity)?;
        println!("\narity {arity}:");
        for vertex in &graph.vertices {
            match (tree.distance(vertex), tree.path_to(vertex)) {
                (Some(distance), Some(path)) => {
                    println!("  {vertex}: {distance:>3}  via {}", path.join(" -> "));
                }
                _ => println!("  {vertex}: unreachable"),
            }
        }
    }

    Ok(())
}
