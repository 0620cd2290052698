use std::collections::BTreeSet;

use super::NodeIndex;

/// `(label, neighbour)` pairs in the order the arcs were stored.
pub type Adjacency<E> = Vec<(E, NodeIndex)>;

/// The local view of one vertex, as removed by [`super::Graph::take_context`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Context<E, V> {
    /// Arcs that entered the vertex, with their tails.
    pub predecessors: Adjacency<E>,
    pub node: NodeIndex,
    pub label: V,
    /// Arcs that left the vertex, with their heads. A loop shows up here once.
    pub successors: Adjacency<E>,
}

impl<E, V> Context<E, V> {
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    /// Distinct successor ids, the vertex itself excluded.
    ///
    /// During an elimination run of a graph whose arcs all have mirrors, such as
    /// [`super::Graph::undirected_shape`], the successors of a context are exactly
    /// the neighbours that are eliminated later.
    pub fn successor_set(&self) -> BTreeSet<NodeIndex> {
        self.successors
            .iter()
            .map(|(_, n)| *n)
            .filter(|&n| n != self.node)
            .collect()
    }

    /// Distinct predecessor ids, the vertex itself excluded.
    pub fn predecessor_set(&self) -> BTreeSet<NodeIndex> {
        self.predecessors
            .iter()
            .map(|(_, n)| *n)
            .filter(|&n| n != self.node)
            .collect()
    }

    /// Number of arcs the context carries.
    pub fn degree(&self) -> usize {
        self.predecessors.len() + self.successors.len()
    }
}
