//! # Elimination driver
//!
//! [`Eliminator`] repeatedly extracts a context from the current remainder until
//! nothing is left. Which vertex goes next is decided by a [`SelectionPolicy`]:
//!
//! - [`LowestIndex`]: the lowest live id. This is the default "any vertex will do"
//!   order used when no order is requested.
//! - [`GivenOrder`]: an explicit sequence supplied by the caller.
//! - [`Shuffled`]: a seeded random choice.
//! - [`MaximumCardinality`]: the reverse of a maximum cardinality search, which
//!   is a perfect elimination order whenever the graph is chordal.
//!
//! Only the last one makes recognition and clique extraction exact on an
//! arbitrary chordal input. The others are exact only when they happen to
//! produce a perfect elimination order.

use std::iter::FusedIterator;

use bitvec::vec::BitVec;
use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

use crate::graph::{Context, Graph, GraphError, NodeIndex};

/// Chooses the next vertex to eliminate from a remainder.
pub trait SelectionPolicy {
    /// A live vertex of `remainder`, or `None` to fall back to the lowest live id.
    fn next_vertex<E, V>(&mut self, remainder: &Graph<E, V>) -> Option<NodeIndex>;
}

impl<P: SelectionPolicy> SelectionPolicy for &mut P {
    fn next_vertex<E, V>(&mut self, remainder: &Graph<E, V>) -> Option<NodeIndex> {
        (**self).next_vertex(remainder)
    }
}

/// Always picks the lowest live id.
///
/// The cursor only moves forward, which is sound because an elimination run
/// never brings vertices back. Use a fresh value per run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LowestIndex {
    cursor: NodeIndex,
}

impl SelectionPolicy for LowestIndex {
    fn next_vertex<E, V>(&mut self, remainder: &Graph<E, V>) -> Option<NodeIndex> {
        let next = remainder.first_node_from(self.cursor)?;
        self.cursor = next;
        Some(next)
    }
}

/// Eliminates in a caller-supplied order.
///
/// Ids that are absent or already eliminated are skipped; vertices the order
/// does not mention are eliminated afterwards, lowest id first. Use
/// [`GivenOrder::strict`] to reject such orders instead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GivenOrder {
    order: Vec<NodeIndex>,
    position: usize,
}

impl GivenOrder {
    pub fn new(order: impl IntoIterator<Item = NodeIndex>) -> Self {
        GivenOrder {
            order: order.into_iter().collect(),
            position: 0,
        }
    }

    /// Checks that `order` lists every vertex of `graph` exactly once.
    pub fn strict<E, V>(
        graph: &Graph<E, V>,
        order: impl IntoIterator<Item = NodeIndex>,
    ) -> Result<Self, GraphError> {
        let order: Vec<_> = order.into_iter().collect();
        let ids: Vec<_> = graph.node_ids().collect();
        let mut seen: BitVec = BitVec::repeat(false, ids.len());
        for &node in &order {
            let Ok(rank) = ids.binary_search(&node) else {
                return Err(GraphError::NodeNotFound(node));
            };
            if seen.replace(rank, true) {
                return Err(GraphError::RepeatedInOrder(node));
            }
        }
        if let Some(rank) = seen.first_zero() {
            return Err(GraphError::MissingFromOrder(ids[rank]));
        }
        Ok(GivenOrder { order, position: 0 })
    }

    pub fn as_slice(&self) -> &[NodeIndex] {
        &self.order
    }
}

impl SelectionPolicy for GivenOrder {
    fn next_vertex<E, V>(&mut self, remainder: &Graph<E, V>) -> Option<NodeIndex> {
        while let Some(&node) = self.order.get(self.position) {
            self.position += 1;
            if remainder.contains_node(node) {
                return Some(node);
            }
        }
        None
    }
}

/// Picks uniformly among the live vertices with a seeded generator.
#[derive(Clone, Debug)]
pub struct Shuffled {
    rng: SmallRng,
}

impl Shuffled {
    pub fn seeded(seed: u64) -> Self {
        Shuffled {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl SelectionPolicy for Shuffled {
    fn next_vertex<E, V>(&mut self, remainder: &Graph<E, V>) -> Option<NodeIndex> {
        remainder.node_ids().choose(&mut self.rng)
    }
}

/// The reverse of a maximum cardinality search over the graph it was built from.
///
/// The search visits, at every step, the unvisited vertex with the most visited
/// neighbours (lowest id on ties). Reversed, the visit order is a perfect
/// elimination order exactly when the graph is chordal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaximumCardinality {
    order: GivenOrder,
}

impl MaximumCardinality {
    pub fn new<E, V>(graph: &Graph<E, V>) -> Self {
        let mut visit = maximum_cardinality_search(graph);
        visit.reverse();
        MaximumCardinality {
            order: GivenOrder::new(visit),
        }
    }

    pub fn order(&self) -> &[NodeIndex] {
        self.order.as_slice()
    }
}

impl SelectionPolicy for MaximumCardinality {
    fn next_vertex<E, V>(&mut self, remainder: &Graph<E, V>) -> Option<NodeIndex> {
        self.order.next_vertex(remainder)
    }
}

/// Works on ranks, the positions of the live ids in ascending order, so the
/// bookkeeping stays proportional to the number of vertices.
fn maximum_cardinality_search<E, V>(graph: &Graph<E, V>) -> Vec<NodeIndex> {
    let ids: Vec<_> = graph.node_ids().collect();
    let mut weight = vec![0usize; ids.len()];
    let mut visited: BitVec = BitVec::repeat(false, ids.len());
    let mut visit = Vec::with_capacity(ids.len());

    for _ in 0..ids.len() {
        // max_by_key keeps the last maximum, so compare on reversed ranks.
        let Some(next) = visited
            .iter_zeros()
            .max_by_key(|&r| (weight[r], std::cmp::Reverse(r)))
        else {
            break;
        };
        visited.set(next, true);
        visit.push(ids[next]);
        for neighbor in graph.neighbors(ids[next]) {
            if let Ok(r) = ids.binary_search(&neighbor) {
                if !visited[r] {
                    weight[r] += 1;
                }
            }
        }
    }
    visit
}

/// Runtime choice between the built-in policies.
#[derive(Clone, Debug)]
pub enum Policy {
    Lowest(LowestIndex),
    Given(GivenOrder),
    Shuffled(Shuffled),
    MaximumCardinality(MaximumCardinality),
}

impl Default for Policy {
    fn default() -> Self {
        Policy::Lowest(LowestIndex::default())
    }
}

impl SelectionPolicy for Policy {
    fn next_vertex<E, V>(&mut self, remainder: &Graph<E, V>) -> Option<NodeIndex> {
        match self {
            Policy::Lowest(p) => p.next_vertex(remainder),
            Policy::Given(p) => p.next_vertex(remainder),
            Policy::Shuffled(p) => p.next_vertex(remainder),
            Policy::MaximumCardinality(p) => p.next_vertex(remainder),
        }
    }
}

/// Lazy sequence of contexts, one per vertex, drained from an owned remainder.
///
/// The driver always empties the remainder: when the policy yields nothing, or
/// an id that is not live, the lowest live id is taken instead.
#[derive(Debug)]
pub struct Eliminator<E, V, P> {
    remainder: Graph<E, V>,
    policy: P,
    order: Vec<NodeIndex>,
}

impl<E, V, P: SelectionPolicy> Eliminator<E, V, P> {
    pub fn new(graph: Graph<E, V>, policy: P) -> Self {
        Eliminator {
            order: Vec::with_capacity(graph.n_nodes()),
            remainder: graph,
            policy,
        }
    }

    /// What is left of the graph.
    pub fn remainder(&self) -> &Graph<E, V> {
        &self.remainder
    }

    /// Mutable access to the remainder between two steps, e.g. to add fill edges
    /// that later contexts must see.
    pub fn remainder_mut(&mut self) -> &mut Graph<E, V> {
        &mut self.remainder
    }

    /// Vertices eliminated so far, in order.
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    pub fn into_order(self) -> Vec<NodeIndex> {
        self.order
    }
}

impl<E, V, P: SelectionPolicy> Iterator for Eliminator<E, V, P> {
    type Item = Context<E, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self
            .policy
            .next_vertex(&self.remainder)
            .filter(|&n| self.remainder.contains_node(n))
            .or_else(|| self.remainder.node_ids().next())?;
        let context = self.remainder.take_context(node).ok()?;
        self.order.push(node);
        Some(context)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remainder.n_nodes();
        (left, Some(left))
    }
}

impl<E, V, P: SelectionPolicy> ExactSizeIterator for Eliminator<E, V, P> {}

impl<E, V, P: SelectionPolicy> FusedIterator for Eliminator<E, V, P> {}

impl<E, V> Graph<E, V> {
    /// Consumes the graph into a lazy elimination sequence.
    pub fn eliminate<P: SelectionPolicy>(self, policy: P) -> Eliminator<E, V, P> {
        Eliminator::new(self, policy)
    }

    /// The order `policy` produces on this graph. The graph itself is untouched.
    pub fn elimination_order<P: SelectionPolicy>(&self, policy: P) -> Vec<NodeIndex> {
        let mut run = self.shape().eliminate(policy);
        run.by_ref().for_each(drop);
        run.into_order()
    }
}
