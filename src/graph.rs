//! # Graph store
//!
//! A map of vertices keyed by caller-chosen [`NodeIndex`] values plus an arena of
//! arc slots. Ids are opaque, so any `usize` is a valid id and sparse ids cost
//! nothing. Every arc is listed in the `outgoing` adjacency of its
//! tail and the `incoming` adjacency of its head, so undirected graphs are simply
//! graphs in which every arc has a mirror (see [`Graph::add_undirected_edge`]).
//!
//! The central operation is [`Graph::extract_context`]: it removes one vertex
//! together with all incident arcs and hands back a [`Context`] describing what
//! was removed. Re-inserting the contexts in reverse order with
//! [`Graph::insert_context`] reconstructs the original graph, which is what the
//! elimination-based algorithms in this crate rely on.
//!
//! The algorithms work on the underlying undirected graph. They eliminate
//! [`Graph::undirected_shape`], where every edge has its mirror, so the successors
//! of a context are all of its later neighbours even when the input holds one-way
//! arcs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use ahash::AHashSet;
use itertools::Itertools;
use thiserror::Error;

use crate::define_indexed_vec;

pub mod builder;
pub mod context;

pub use builder::GraphBuilder;
pub use context::{Adjacency, Context};

/// Identifier of a vertex. Chosen by the caller, unique within a graph and
/// stable until the vertex is extracted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeIndex(pub usize);

impl From<usize> for NodeIndex {
    fn from(value: usize) -> Self {
        NodeIndex(value)
    }
}

impl From<NodeIndex> for usize {
    fn from(value: NodeIndex) -> Self {
        value.0
    }
}

define_indexed_vec!(
    /// Slot of an arc in the arc arena.
    pub struct ArcIndex;

    /// Storage indexed by [`ArcIndex`].
    pub struct ArcVec;
);

impl Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unordered pair of vertices, stored with the smaller id first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePair {
    pub lo: NodeIndex,
    pub hi: NodeIndex,
}

impl NodePair {
    pub fn new(a: NodeIndex, b: NodeIndex) -> Self {
        if a <= b {
            NodePair { lo: a, hi: b }
        } else {
            NodePair { lo: b, hi: a }
        }
    }

    pub fn is_loop(&self) -> bool {
        self.lo == self.hi
    }
}

impl Display for NodePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.lo, self.hi)
    }
}

/// Set of undirected edges, as produced by [`Graph::edge_set`].
pub type EdgeSet = AHashSet<NodePair>;

/// Outcome of [`Graph::extract_context`]. The graph comes back on both sides.
pub type ExtractResult<E, V> = Result<(Context<E, V>, Graph<E, V>), (GraphError, Graph<E, V>)>;

/// Whether parallel arcs are allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgePolicy {
    /// Inserting an arc that already exists fails with [`GraphError::DuplicateEdge`].
    #[default]
    Simple,
    /// Parallel arcs are stored side by side.
    Multi,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct NodeEntry<V> {
    label: V,
    incoming: Vec<ArcIndex>,
    outgoing: Vec<ArcIndex>,
}

impl<V> NodeEntry<V> {
    fn new(label: V) -> Self {
        NodeEntry {
            label,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct ArcEntry<E> {
    tail: NodeIndex,
    head: NodeIndex,
    label: E,
}

/// A labelled graph supporting vertex-context extraction.
///
/// `E` is the arc label, `V` the vertex label.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph<E, V> {
    nodes: BTreeMap<NodeIndex, NodeEntry<V>>,
    arcs: ArcVec<Option<ArcEntry<E>>>,
    vacant_arcs: Vec<ArcIndex>,
    n_arcs: usize,
    policy: EdgePolicy,
}

impl<E, V> Default for Graph<E, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, V> Graph<E, V> {
    pub fn new() -> Self {
        Self::with_policy(EdgePolicy::Simple)
    }

    /// A graph that accepts parallel arcs.
    pub fn multigraph() -> Self {
        Self::with_policy(EdgePolicy::Multi)
    }

    pub fn with_policy(policy: EdgePolicy) -> Self {
        Graph {
            nodes: BTreeMap::new(),
            arcs: ArcVec::new(),
            vacant_arcs: Vec::new(),
            n_arcs: 0,
            policy,
        }
    }

    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of arcs. An undirected edge counts twice, a loop once.
    pub fn n_arcs(&self) -> usize {
        self.n_arcs
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, node: NodeIndex) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Live vertex ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.keys().copied()
    }

    /// The lowest live id that is `>= from`.
    pub fn first_node_from(&self, from: NodeIndex) -> Option<NodeIndex> {
        self.nodes.range(from..).next().map(|(&id, _)| id)
    }

    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeIndex, &V)> {
        self.nodes.iter().map(|(&id, entry)| (id, &entry.label))
    }

    /// Every arc as `(tail, head, label)`, grouped by tail in ascending id order.
    pub fn arcs(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &E)> + '_ {
        self.nodes.values().flat_map(move |entry| {
            entry
                .outgoing
                .iter()
                .filter_map(move |&a| self.arcs.slot(a))
                .map(|arc| (arc.tail, arc.head, &arc.label))
        })
    }

    /// The underlying undirected edge set, loops excluded.
    pub fn edge_set(&self) -> EdgeSet {
        self.arcs()
            .map(|(tail, head, _)| NodePair::new(tail, head))
            .filter(|pair| !pair.is_loop())
            .collect()
    }

    pub fn label(&self, node: NodeIndex) -> Result<&V, GraphError> {
        self.nodes
            .get(&node)
            .map(|entry| &entry.label)
            .ok_or(GraphError::NodeNotFound(node))
    }

    pub fn label_mut(&mut self, node: NodeIndex) -> Result<&mut V, GraphError> {
        self.nodes
            .get_mut(&node)
            .map(|entry| &mut entry.label)
            .ok_or(GraphError::NodeNotFound(node))
    }

    /// Heads of the arcs leaving `node`, in insertion order.
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .get(&node)
            .into_iter()
            .flat_map(|entry| entry.outgoing.iter())
            .filter_map(move |&a| self.arcs.slot(a).map(|arc| arc.head))
    }

    /// Tails of the arcs entering `node`, in insertion order.
    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes
            .get(&node)
            .into_iter()
            .flat_map(|entry| entry.incoming.iter())
            .filter_map(move |&a| self.arcs.slot(a).map(|arc| arc.tail))
    }

    /// Vertices joined to `node` by an arc in either direction, `node` itself excluded.
    pub fn neighbors(&self, node: NodeIndex) -> BTreeSet<NodeIndex> {
        self.successors(node)
            .chain(self.predecessors(node))
            .filter(|&n| n != node)
            .collect()
    }

    /// Whether the arc `from -> to` exists.
    pub fn edge_exists(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.successors(from).any(|head| head == to)
    }

    /// Whether an arc joins the two vertices in either direction.
    pub fn is_adjacent(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.edge_exists(a, b) || self.edge_exists(b, a)
    }

    pub fn add_node(&mut self, node: NodeIndex, label: V) -> Result<(), GraphError> {
        if self.contains_node(node) {
            return Err(GraphError::DuplicateNode(node));
        }
        self.nodes.insert(node, NodeEntry::new(label));
        Ok(())
    }

    /// Inserts the single arc `from -> to`.
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        label: E,
    ) -> Result<(), GraphError> {
        self.check_endpoints(from, to)?;
        if self.policy == EdgePolicy::Simple && self.edge_exists(from, to) {
            return Err(GraphError::DuplicateEdge { from, to });
        }
        self.link(from, to, label);
        Ok(())
    }

    /// Inserts `a -> b` and its mirror `b -> a`. A loop is stored as one arc.
    pub fn add_undirected_edge(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        label: E,
    ) -> Result<(), GraphError>
    where
        E: Clone,
    {
        self.check_endpoints(a, b)?;
        if self.policy == EdgePolicy::Simple {
            if self.edge_exists(a, b) {
                return Err(GraphError::DuplicateEdge { from: a, to: b });
            }
            if self.edge_exists(b, a) {
                return Err(GraphError::DuplicateEdge { from: b, to: a });
            }
        }
        self.link_undirected(a, b, label);
        Ok(())
    }

    /// Removes `node` and every incident arc, returning what was removed.
    ///
    /// Arcs entering `node` end up in [`Context::predecessors`], arcs leaving it in
    /// [`Context::successors`]. A loop is reported once, on the successor side.
    pub fn take_context(&mut self, node: NodeIndex) -> Result<Context<E, V>, GraphError> {
        let entry = self
            .nodes
            .remove(&node)
            .ok_or(GraphError::NodeNotFound(node))?;

        let mut predecessors = Vec::with_capacity(entry.incoming.len());
        for a in entry.incoming {
            if self.arcs.slot(a).is_some_and(|arc| arc.tail == node) {
                continue;
            }
            let Some(arc) = self.release_arc(a) else {
                continue;
            };
            if let Some(tail) = self.nodes.get_mut(&arc.tail) {
                tail.outgoing.retain(|&x| x != a);
            }
            predecessors.push((arc.label, arc.tail));
        }

        let mut successors = Vec::with_capacity(entry.outgoing.len());
        for a in entry.outgoing {
            let Some(arc) = self.release_arc(a) else {
                continue;
            };
            if arc.head != node {
                if let Some(head) = self.nodes.get_mut(&arc.head) {
                    head.incoming.retain(|&x| x != a);
                }
            }
            successors.push((arc.label, arc.head));
        }

        Ok(Context {
            predecessors,
            node,
            label: entry.label,
            successors,
        })
    }

    /// Splits the graph into the context of `node` and the remainder.
    ///
    /// The graph is consumed, so a lineage of remainders can only ever have one
    /// live member. When `node` is absent the graph is handed back untouched
    /// next to the error.
    pub fn extract_context(mut self, node: NodeIndex) -> ExtractResult<E, V> {
        match self.take_context(node) {
            Ok(context) => Ok((context, self)),
            Err(err) => Err((err, self)),
        }
    }

    /// Puts a context back. All neighbours must be present; the graph is left
    /// untouched on failure.
    pub fn insert_context(&mut self, context: Context<E, V>) -> Result<(), GraphError> {
        let node = context.node;
        if self.contains_node(node) {
            return Err(GraphError::DuplicateNode(node));
        }

        let mut seen = AHashSet::new();
        let pairs = context
            .predecessors
            .iter()
            .map(|(_, tail)| (*tail, node))
            .chain(context.successors.iter().map(|(_, head)| (node, *head)));
        for (from, to) in pairs {
            for end in [from, to] {
                if end != node && !self.contains_node(end) {
                    return Err(GraphError::NodeNotFound(end));
                }
            }
            if self.policy == EdgePolicy::Simple && !seen.insert((from, to)) {
                return Err(GraphError::DuplicateEdge { from, to });
            }
        }

        self.nodes.insert(node, NodeEntry::new(context.label));
        for (label, tail) in context.predecessors {
            self.link(tail, node, label);
        }
        for (label, head) in context.successors {
            self.link(node, head, label);
        }
        Ok(())
    }

    /// Copies the structure with both labels dropped.
    pub fn shape(&self) -> Graph<(), ()> {
        self.map_ref(|_, _| (), |_| ())
    }

    /// The underlying simple undirected graph: every vertex, and one mirrored
    /// pair of arcs per element of [`Graph::edge_set`]. One-way arcs gain their
    /// mirror and parallel arcs collapse. Loops are dropped.
    ///
    /// Eliminating this graph makes [`Context::successor_set`] the set of all
    /// neighbours that are eliminated later.
    pub fn undirected_shape(&self) -> Graph<(), ()> {
        let mut graph: Graph<(), ()> = Graph::new();
        for node in self.node_ids() {
            graph.nodes.insert(node, NodeEntry::new(()));
        }
        for pair in self.edge_set().into_iter().sorted() {
            graph.link_undirected(pair.lo, pair.hi, ());
        }
        graph
    }

    pub fn map_ref<E2, V2>(
        &self,
        mut node_map: impl FnMut(NodeIndex, &V) -> V2,
        mut edge_map: impl FnMut(&E) -> E2,
    ) -> Graph<E2, V2> {
        Graph {
            nodes: self
                .nodes
                .iter()
                .map(|(&id, entry)| {
                    let entry = NodeEntry {
                        label: node_map(id, &entry.label),
                        incoming: entry.incoming.clone(),
                        outgoing: entry.outgoing.clone(),
                    };
                    (id, entry)
                })
                .collect(),
            arcs: self
                .arcs
                .iter()
                .map(|(_, slot)| {
                    slot.as_ref().map(|arc| ArcEntry {
                        tail: arc.tail,
                        head: arc.head,
                        label: edge_map(&arc.label),
                    })
                })
                .collect(),
            vacant_arcs: self.vacant_arcs.clone(),
            n_arcs: self.n_arcs,
            policy: self.policy,
        }
    }

    pub fn map<E2, V2>(
        self,
        mut node_map: impl FnMut(NodeIndex, V) -> V2,
        mut edge_map: impl FnMut(E) -> E2,
    ) -> Graph<E2, V2> {
        Graph {
            nodes: self
                .nodes
                .into_iter()
                .map(|(id, entry)| {
                    let entry = NodeEntry {
                        label: node_map(id, entry.label),
                        incoming: entry.incoming,
                        outgoing: entry.outgoing,
                    };
                    (id, entry)
                })
                .collect(),
            arcs: self
                .arcs
                .into_iter()
                .map(|(_, slot)| {
                    slot.map(|arc| ArcEntry {
                        tail: arc.tail,
                        head: arc.head,
                        label: edge_map(arc.label),
                    })
                })
                .collect(),
            vacant_arcs: self.vacant_arcs,
            n_arcs: self.n_arcs,
            policy: self.policy,
        }
    }

    fn check_endpoints(&self, a: NodeIndex, b: NodeIndex) -> Result<(), GraphError> {
        for end in [a, b] {
            if !self.contains_node(end) {
                return Err(GraphError::NodeNotFound(end));
            }
        }
        Ok(())
    }

    /// Stores an arc between two live vertices without any policy check.
    pub(crate) fn link(&mut self, tail: NodeIndex, head: NodeIndex, label: E) {
        let arc = ArcEntry { tail, head, label };
        let a = match self.vacant_arcs.pop() {
            Some(a) => {
                self.arcs.fill(a, arc);
                a
            }
            None => self.arcs.push(Some(arc)),
        };
        if let Some(entry) = self.nodes.get_mut(&tail) {
            entry.outgoing.push(a);
        }
        if let Some(entry) = self.nodes.get_mut(&head) {
            entry.incoming.push(a);
        }
        self.n_arcs += 1;
    }

    pub(crate) fn link_undirected(&mut self, a: NodeIndex, b: NodeIndex, label: E)
    where
        E: Clone,
    {
        if a == b {
            self.link(a, b, label);
        } else {
            self.link(a, b, label.clone());
            self.link(b, a, label);
        }
    }

    fn release_arc(&mut self, a: ArcIndex) -> Option<ArcEntry<E>> {
        let arc = self.arcs.vacate(a)?;
        self.vacant_arcs.push(a);
        self.n_arcs -= 1;
        Some(arc)
    }
}

impl Graph<(), ()> {
    /// Unlabelled undirected graph on the ids `0..n_nodes`.
    pub fn undirected(
        n_nodes: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, GraphError> {
        let mut graph = Graph::new();
        for i in 0..n_nodes {
            graph.add_node(NodeIndex(i), ())?;
        }
        for (a, b) in edges {
            graph.add_undirected_edge(NodeIndex(a), NodeIndex(b), ())?;
        }
        Ok(graph)
    }
}

/// Structural equality: same vertices with equal labels, and for every vertex the
/// same multiset of outgoing `(head, label)` pairs. Arc order and the edge policy
/// are ignored.
impl<E: PartialEq, V: PartialEq> PartialEq for Graph<E, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.n_nodes() != other.n_nodes() || self.n_arcs != other.n_arcs {
            return false;
        }
        self.nodes.iter().all(|(id, entry)| {
            let Some(theirs) = other.nodes.get(id) else {
                return false;
            };
            if entry.label != theirs.label {
                return false;
            }
            let mut unmatched: Vec<_> = theirs
                .outgoing
                .iter()
                .filter_map(|&a| other.arcs.slot(a))
                .collect();
            for arc in entry.outgoing.iter().filter_map(|&a| self.arcs.slot(a)) {
                match unmatched
                    .iter()
                    .position(|t| t.head == arc.head && t.label == arc.label)
                {
                    Some(i) => {
                        unmatched.swap_remove(i);
                    }
                    None => return false,
                }
            }
            unmatched.is_empty()
        })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeIndex),
    #[error("Node {0} already present")]
    DuplicateNode(NodeIndex),
    #[error("Edge {from} -> {to} already present")]
    DuplicateEdge { from: NodeIndex, to: NodeIndex },
    #[error("Node {0} appears more than once in the elimination order")]
    RepeatedInOrder(NodeIndex),
    #[error("Node {0} is missing from the elimination order")]
    MissingFromOrder(NodeIndex),
}
