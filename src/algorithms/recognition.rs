use itertools::Itertools;

use crate::{
    elimination::{GivenOrder, LowestIndex, MaximumCardinality, SelectionPolicy},
    graph::{EdgeSet, Graph, GraphError, NodeIndex, NodePair},
};

/// Whether every pair of distinct elements of `nodes` is an edge of `edges`.
/// Empty and single-element sets are cliques.
pub fn is_clique(nodes: impl IntoIterator<Item = NodeIndex>, edges: &EdgeSet) -> bool {
    let nodes: Vec<_> = nodes.into_iter().collect();
    nodes
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a != b)
        .all(|(&a, &b)| edges.contains(&NodePair::new(a, b)))
}

impl<E, V> Graph<E, V> {
    /// Whether the default order eliminates this graph without fill.
    ///
    /// A `true` answer proves the graph chordal. A `false` answer is only
    /// conclusive when the order happens to be a perfect elimination order; use
    /// [`Graph::is_chordal_exact`] for a definite answer.
    pub fn is_chordal(&self) -> bool {
        self.is_chordal_with(LowestIndex::default())
    }

    /// Whether every vertex's later neighbours, along `policy`, form a clique in
    /// the original edge set. Arc directions are ignored.
    pub fn is_chordal_with<P: SelectionPolicy>(&self, policy: P) -> bool {
        let edges = self.edge_set();
        self.undirected_shape().eliminate(policy).all(|context| {
            let later = context.successor_set();
            let ok = is_clique(later.iter().copied(), &edges);
            if !ok {
                tracing::debug!(
                    node = %context.node,
                    ?later,
                    "later neighbours are not a clique"
                );
            }
            ok
        })
    }

    /// Checks `order`, which must list every vertex exactly once.
    pub fn is_perfect_elimination_order(
        &self,
        order: &[NodeIndex],
    ) -> Result<bool, GraphError> {
        let policy = GivenOrder::strict(self, order.iter().copied())?;
        Ok(self.is_chordal_with(policy))
    }

    /// Exact chordality test along a maximum cardinality search order.
    pub fn is_chordal_exact(&self) -> bool {
        self.is_chordal_with(MaximumCardinality::new(self))
    }
}
