//! Clique-tree construction along a perfect elimination order.
//!
//! The input graph is first completed to a chordal supergraph. Its order is then
//! replayed and every vertex `w`, with later neighbours `S`, either reuses a bag
//! that is still waiting on exactly `{w} ∪ S` or opens a new one. All other bags
//! waiting on `w` hang below that bag. Since a bag only waits on vertices that have
//! not been eliminated, the later bag is always the parent.

use std::collections::BTreeSet;

use ahash::AHashMap;
use bitvec::vec::BitVec;

use super::{Bag, BagId, TreeDecomposition, TreeError};
use crate::{
    elimination::{GivenOrder, LowestIndex, SelectionPolicy},
    graph::{Graph, NodeIndex},
};

/// For every vertex not yet eliminated, the bags that list it as a member.
pub type PendingSuccessors = AHashMap<NodeIndex, BTreeSet<BagId>>;

#[derive(Debug)]
struct BuildState {
    tree: TreeDecomposition,
    pending: PendingSuccessors,
    /// Live ids in ascending order; `eliminated` is indexed by position in it.
    ids: Vec<NodeIndex>,
    eliminated: BitVec,
}

fn corrupted(err: TreeError) -> ! {
    panic!("tree decomposition build state corrupted: {err}")
}

impl BuildState {
    fn new<E, V>(graph: &Graph<E, V>) -> Self {
        let ids: Vec<_> = graph.node_ids().collect();
        BuildState {
            tree: TreeDecomposition::new(),
            pending: ids.iter().map(|&n| (n, BTreeSet::new())).collect(),
            eliminated: BitVec::repeat(false, ids.len()),
            ids,
        }
    }

    fn is_eliminated(&self, node: NodeIndex) -> bool {
        self.ids
            .binary_search(&node)
            .is_ok_and(|rank| self.eliminated[rank])
    }

    fn remaining_members(&self, bag: BagId) -> BTreeSet<NodeIndex> {
        match self.tree.bag(bag) {
            Ok(bag) => bag.iter().filter(|&n| !self.is_eliminated(n)).collect(),
            Err(err) => corrupted(err),
        }
    }

    fn step(&mut self, node: NodeIndex, later: BTreeSet<NodeIndex>) {
        let waiting: Vec<BagId> = self
            .pending
            .get(&node)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&b| self.tree.parent(b).is_ok_and(|p| p.is_root()))
            .collect();

        let mut clique = later.clone();
        clique.insert(node);

        let home = match waiting
            .iter()
            .copied()
            .find(|&b| self.remaining_members(b) == clique)
        {
            Some(reused) => {
                tracing::trace!(%node, bag = %reused, "reusing waiting bag");
                reused
            }
            None => {
                let bag = self.tree.add_bag(Bag::new());
                for &member in &clique {
                    if let Err(err) = self.tree.add_to_bag(bag, member) {
                        corrupted(err);
                    }
                }
                for &member in &later {
                    self.pending.entry(member).or_default().insert(bag);
                }
                bag
            }
        };

        for &child in waiting.iter().filter(|&&b| b != home) {
            if let Err(err) = self.tree.attach(child, home) {
                corrupted(err);
            }
        }

        self.tree.set_home(node, home);
        if let Ok(rank) = self.ids.binary_search(&node) {
            self.eliminated.set(rank, true);
        }
        self.pending.remove(&node);
    }

    fn finish(self) -> TreeDecomposition {
        self.tree
    }
}

impl<E, V> Graph<E, V> {
    /// Tree decomposition along the default order.
    pub fn tree_decomposition(&self) -> TreeDecomposition {
        self.tree_decomposition_with(LowestIndex::default())
    }

    /// Builds a tree decomposition whose bags are the cliques of the chordal
    /// completion along `policy`. Its width is the largest clique of that
    /// completion minus one. Arc directions are ignored.
    pub fn tree_decomposition_with<P: SelectionPolicy>(&self, policy: P) -> TreeDecomposition {
        let completion = self
            .undirected_shape()
            .chordal_completion_with(policy, |_, _| ());
        let mut state = BuildState::new(&completion.graph);

        for context in completion.graph.eliminate(GivenOrder::new(completion.order)) {
            let later = context.successor_set();
            state.step(context.node, later);
        }

        let tree = state.finish();
        tracing::debug!(
            bags = tree.n_bags(),
            width = tree.width(),
            "tree decomposition finished"
        );
        tree
    }
}
