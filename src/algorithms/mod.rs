//! # Elimination-based algorithms
//!
//! Everything here is a single pass over an [`Eliminator`](crate::elimination::Eliminator)
//! with a local accumulator. Each algorithm works on a label-free copy
//! ([`Graph::shape`](crate::graph::Graph::shape)) so the caller's graph is left alone.
//!
//! ## Available Algorithms
//!
//! - [`clique`]: largest clique seen along an elimination order
//! - [`recognition`]: chordality tests
//! - [`fill_in`]: chordal completion through the elimination game
//!
//! Clique size and recognition are exact only when the order used is a perfect
//! elimination order. The default order (lowest id first) is not one in general;
//! pass [`MaximumCardinality`](crate::elimination::MaximumCardinality) when an
//! exact answer is needed on an arbitrary chordal input.

pub mod clique;
pub mod fill_in;
pub mod recognition;

pub use fill_in::ChordalCompletion;
pub use recognition::is_clique;
