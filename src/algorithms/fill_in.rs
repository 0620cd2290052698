use crate::{
    elimination::{GivenOrder, LowestIndex, SelectionPolicy},
    graph::{Graph, GraphError, NodeIndex, NodePair},
};

/// A chordal supergraph together with the edges that were added and the
/// elimination order that makes it chordal.
#[derive(Clone, Debug, PartialEq)]
pub struct ChordalCompletion<E, V> {
    pub graph: Graph<E, V>,
    /// Added edges, in the order they were created.
    pub fill_in: Vec<NodePair>,
    /// A perfect elimination order of `graph`.
    pub order: Vec<NodeIndex>,
}

impl<E, V> ChordalCompletion<E, V> {
    pub fn fill_count(&self) -> usize {
        self.fill_in.len()
    }
}

impl<E, V> Graph<E, V> {
    /// Makes `nodes` pairwise adjacent, adding an undirected edge labelled by
    /// `label` for every pair not already joined in either direction.
    ///
    /// Fails with [`GraphError::NodeNotFound`] before touching the graph if any
    /// element is absent. Returns the pairs that were added.
    pub fn add_clique(
        &mut self,
        nodes: &[NodeIndex],
        label: impl FnMut(NodeIndex, NodeIndex) -> E,
    ) -> Result<Vec<NodePair>, GraphError>
    where
        E: Clone,
    {
        if let Some(&missing) = nodes.iter().find(|&&n| !self.contains_node(n)) {
            return Err(GraphError::NodeNotFound(missing));
        }
        Ok(self.fill_clique(nodes, label))
    }

    pub(crate) fn fill_clique(
        &mut self,
        nodes: &[NodeIndex],
        mut label: impl FnMut(NodeIndex, NodeIndex) -> E,
    ) -> Vec<NodePair>
    where
        E: Clone,
    {
        let mut added = Vec::new();
        for (i, &a) in nodes.iter().enumerate() {
            for &b in &nodes[i + 1..] {
                if a == b
                    || !self.contains_node(a)
                    || !self.contains_node(b)
                    || self.is_adjacent(a, b)
                {
                    continue;
                }
                self.link_undirected(a, b, label(a, b));
                added.push(NodePair::new(a, b));
            }
        }
        added
    }

    /// Chordal completion along the default order, fill edges labelled with
    /// `E::default()`.
    pub fn chordal_completion(self) -> ChordalCompletion<E, V>
    where
        E: Default + Clone,
    {
        self.chordal_completion_with(LowestIndex::default(), |_, _| E::default())
    }

    /// Plays the elimination game along `policy`.
    ///
    /// Every vertex's later neighbours, counting fill added for earlier vertices,
    /// are made into a clique. The result is chordal and `order` is a perfect
    /// elimination order of it. A graph that `order` already eliminates without
    /// fill comes back unchanged.
    pub fn chordal_completion_with<P: SelectionPolicy>(
        mut self,
        policy: P,
        mut fill_label: impl FnMut(NodeIndex, NodeIndex) -> E,
    ) -> ChordalCompletion<E, V>
    where
        E: Clone,
    {
        let order = self.elimination_order(policy);
        let mut game = self
            .undirected_shape()
            .eliminate(GivenOrder::new(order.iter().copied()));
        let mut fill_in = Vec::new();

        while let Some(context) = game.next() {
            let later: Vec<_> = context.successor_set().into_iter().collect();
            let added = self.fill_clique(&later, &mut fill_label);
            if added.is_empty() {
                continue;
            }
            tracing::trace!(node = %context.node, added = added.len(), "fill");
            game.remainder_mut().fill_clique(&later, |_, _| ());
            fill_in.extend(added);
        }

        tracing::debug!(
            nodes = self.n_nodes(),
            fill = fill_in.len(),
            "chordal completion finished"
        );
        ChordalCompletion {
            graph: self,
            fill_in,
            order,
        }
    }
}
