use super::{EdgePolicy, Graph, GraphError, NodeIndex};

#[derive(Clone, Debug)]
struct PendingEdge<E> {
    from: NodeIndex,
    to: NodeIndex,
    data: E,
    undirected: bool,
}

/// Collects vertices and edges, handing out consecutive ids, and assembles a
/// [`Graph`] in one go.
#[derive(Clone, Debug)]
pub struct GraphBuilder<E, V> {
    nodes: Vec<V>,
    edges: Vec<PendingEdge<E>>,
    policy: EdgePolicy,
}

impl<E, V> GraphBuilder<E, V> {
    pub fn new() -> Self {
        GraphBuilder {
            nodes: Vec::new(),
            edges: Vec::new(),
            policy: EdgePolicy::Simple,
        }
    }

    pub fn policy(mut self, policy: EdgePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn add_node(&mut self, data: V) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(data);
        NodeIndex(index)
    }

    /// Queues an undirected edge.
    pub fn add_edge(&mut self, a: NodeIndex, b: NodeIndex, data: E) {
        self.edges.push(PendingEdge {
            from: a,
            to: b,
            data,
            undirected: true,
        });
    }

    /// Queues a single arc.
    pub fn add_arc(&mut self, from: NodeIndex, to: NodeIndex, data: E) {
        self.edges.push(PendingEdge {
            from,
            to,
            data,
            undirected: false,
        });
    }

    pub fn build(self) -> Result<Graph<E, V>, GraphError>
    where
        E: Clone,
    {
        let mut graph = Graph::with_policy(self.policy);
        for (i, data) in self.nodes.into_iter().enumerate() {
            graph.add_node(NodeIndex(i), data)?;
        }
        for edge in self.edges {
            if edge.undirected {
                graph.add_undirected_edge(edge.from, edge.to, edge.data)?;
            } else {
                graph.add_edge(edge.from, edge.to, edge.data)?;
            }
        }
        Ok(graph)
    }
}

impl<E, V> Default for GraphBuilder<E, V> {
    fn default() -> Self {
        Self::new()
    }
}
