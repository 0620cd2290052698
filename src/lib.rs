//! # Chordal
//!
//! Chordal is a Rust library for algorithms on chordal graphs: recognition,
//! maximum-clique extraction, fill-in completion and tree decompositions.
//!
//! Everything is built on one primitive: taking a graph apart one vertex at a
//! time. [`Graph::extract_context`](graph::Graph::extract_context) removes a vertex
//! and hands back its local neighbourhood, and the
//! [`Eliminator`](elimination::Eliminator) repeats this along a pluggable
//! [`SelectionPolicy`](elimination::SelectionPolicy) until nothing is left.
//!
//! ```rust,ignore
//! use chordal::{elimination::MaximumCardinality, graph::Graph};
//!
//! let cycle = Graph::undirected(4, [(0, 1), (1, 2), (2, 3), (3, 0)])?;
//! assert!(!cycle.is_chordal_exact());
//!
//! let completion = cycle.chordal_completion();
//! assert_eq!(completion.fill_count(), 1);
//!
//! let tree = completion.graph.tree_decomposition_with(MaximumCardinality::new(&completion.graph));
//! assert_eq!(tree.width(), 2);
//! ```

#[macro_use]
pub mod typed_vec;

pub mod algorithms;
pub mod elimination;
pub mod graph;
pub mod parser;
pub mod tree;
