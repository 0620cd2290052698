//! # Tree decompositions
//!
//! A [`TreeDecomposition`] is a forest of [`Bag`]s stored in an arena indexed by
//! [`BagId`]. Every bag keeps a parent pointer and an explicit list of children, so
//! the structure can be walked upwards ([`TreeDecomposition::iter_ancestors`]) and
//! downwards ([`TreeDecomposition::iter_preorder`]) without extra bookkeeping.
//!
//! Bags are never removed and only ever grow. Trees are assembled by
//! [`TreeDecomposition::attach`], which refuses to give a bag a second parent or to
//! close a cycle.
//!
//! For a graph `G`, a decomposition is valid when
//! - every vertex of `G` is in some bag,
//! - both ends of every edge of `G` share some bag,
//! - the bags containing any one vertex form a connected subtree.
//!
//! [`TreeDecomposition::validate`] checks all three. The decompositions built by
//! [`Graph::tree_decomposition`](crate::graph::Graph::tree_decomposition) satisfy them
//! by construction and have one tree per connected component.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display},
};

use ahash::AHashMap;
use itertools::Itertools;
use thiserror::Error;

use crate::{
    define_indexed_vec,
    graph::{Graph, NodeIndex, NodePair},
};

pub mod builder;
pub mod iterato;

pub use builder::PendingSuccessors;
use iterato::{AncestorsIter, PreorderIter};

define_indexed_vec!(
    /// Identifier of a bag within a [`TreeDecomposition`].
    pub struct BagId;

    /// Storage indexed by [`BagId`].
    pub struct BagVec;
);

impl Display for BagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// A set of vertices, kept ordered for reproducible output.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bag(BTreeSet<NodeIndex>);

impl Bag {
    pub fn new() -> Self {
        Bag(BTreeSet::new())
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.0.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.0.iter().copied()
    }

    pub fn as_set(&self) -> &BTreeSet<NodeIndex> {
        &self.0
    }

    fn insert(&mut self, node: NodeIndex) -> bool {
        self.0.insert(node)
    }

    fn display_with<'a>(&'a self, name: &'a impl Fn(NodeIndex) -> String) -> impl Display + 'a {
        struct Named<'a, F>(&'a Bag, &'a F);

        impl<F: Fn(NodeIndex) -> String> Display for Named<'_, F> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{{{}}}", self.0.iter().map(self.1).join(","))
            }
        }

        Named(self, name)
    }
}

impl FromIterator<NodeIndex> for Bag {
    fn from_iter<I: IntoIterator<Item = NodeIndex>>(iter: I) -> Self {
        Bag(iter.into_iter().collect())
    }
}

impl Display for Bag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_with(&|n: NodeIndex| n.to_string()))
    }
}

/// Where a bag hangs in its tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentId {
    #[default]
    Root,
    Node(BagId),
}

impl ParentId {
    pub fn bag(self) -> Option<BagId> {
        match self {
            ParentId::Root => None,
            ParentId::Node(b) => Some(b),
        }
    }

    pub fn is_root(self) -> bool {
        matches!(self, ParentId::Root)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BagNode {
    pub parent: ParentId,
    pub bag: Bag,
    pub children: Vec<BagId>,
}

/// A forest of bags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeDecomposition {
    nodes: BagVec<BagNode>,
    home: BTreeMap<NodeIndex, BagId>,
}

impl TreeDecomposition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_bags(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocates a root bag with the next id.
    pub fn add_bag(&mut self, bag: Bag) -> BagId {
        self.nodes.push(BagNode {
            parent: ParentId::Root,
            bag,
            children: Vec::new(),
        })
    }

    pub fn bag(&self, id: BagId) -> Result<&Bag, TreeError> {
        self.node(id).map(|n| &n.bag)
    }

    pub fn node(&self, id: BagId) -> Result<&BagNode, TreeError> {
        self.nodes.get(id).ok_or(TreeError::BagNotFound(id))
    }

    /// Inserts `node` into bag `id`. Fails without touching anything if the bag
    /// does not exist.
    pub fn add_to_bag(&mut self, id: BagId, node: NodeIndex) -> Result<(), TreeError> {
        let entry = self.nodes.get_mut(id).ok_or(TreeError::BagNotFound(id))?;
        entry.bag.insert(node);
        Ok(())
    }

    /// Makes `child` a child of `parent`.
    pub fn attach(&mut self, child: BagId, parent: BagId) -> Result<(), TreeError> {
        self.node(parent)?;
        if !self.node(child)?.parent.is_root() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.iter_ancestors(parent).any(|b| b == child) {
            return Err(TreeError::CreatesCycle { child, parent });
        }
        self.nodes[child].parent = ParentId::Node(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    pub fn parent(&self, id: BagId) -> Result<ParentId, TreeError> {
        self.node(id).map(|n| n.parent)
    }

    pub fn children(&self, id: BagId) -> Result<&[BagId], TreeError> {
        self.node(id).map(|n| n.children.as_slice())
    }

    /// Bags without a parent, one per tree, in ascending id order.
    pub fn roots(&self) -> impl Iterator<Item = BagId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent.is_root())
            .map(|(id, _)| id)
    }

    pub fn iter_bags(&self) -> impl Iterator<Item = (BagId, &Bag)> {
        self.nodes.iter().map(|(id, n)| (id, &n.bag))
    }

    pub fn bags_containing(&self, node: NodeIndex) -> impl Iterator<Item = BagId> + '_ {
        self.iter_bags()
            .filter(move |(_, bag)| bag.contains(node))
            .map(|(id, _)| id)
    }

    /// The bag a vertex was assigned when it was eliminated.
    pub fn home_bag(&self, node: NodeIndex) -> Option<BagId> {
        self.home.get(&node).copied()
    }

    pub(crate) fn set_home(&mut self, node: NodeIndex, bag: BagId) {
        self.home.insert(node, bag);
    }

    /// Largest bag size minus one. An empty decomposition has width 0.
    pub fn width(&self) -> usize {
        self.iter_bags()
            .map(|(_, bag)| bag.len())
            .max()
            .unwrap_or(0)
            .saturating_sub(1)
    }

    /// `start` followed by its parent, grandparent and so on up to the root.
    pub fn iter_ancestors(&self, start: BagId) -> AncestorsIter<'_> {
        AncestorsIter::new(self, start)
    }

    /// Depth-first walk of the subtree under `start`, children in insertion order.
    pub fn iter_preorder(&self, start: BagId) -> PreorderIter<'_> {
        PreorderIter::new(self, start)
    }

    /// Checks vertex coverage, edge coverage and running intersection against `graph`.
    pub fn validate<E, V>(&self, graph: &Graph<E, V>) -> Result<(), TreeError> {
        let mut containing: AHashMap<NodeIndex, BTreeSet<BagId>> = AHashMap::new();
        for (id, bag) in self.iter_bags() {
            for node in bag.iter() {
                containing.entry(node).or_default().insert(id);
            }
        }

        if let Some(node) = graph.node_ids().find(|n| !containing.contains_key(n)) {
            return Err(TreeError::UncoveredNode(node));
        }

        for pair in graph.edge_set().into_iter().sorted() {
            let shared = containing
                .get(&pair.lo)
                .zip(containing.get(&pair.hi))
                .is_some_and(|(a, b)| !a.is_disjoint(b));
            if !shared {
                return Err(TreeError::UncoveredEdge(pair));
            }
        }

        for node in graph.node_ids() {
            let Some(bags) = containing.get(&node) else {
                continue;
            };
            let tops = bags
                .iter()
                .filter(|&&b| match self.nodes[b].parent {
                    ParentId::Root => true,
                    ParentId::Node(p) => !bags.contains(&p),
                })
                .count();
            if tops != 1 {
                return Err(TreeError::NotConnected(node));
            }
        }
        Ok(())
    }

    /// Renders the forest one bag per line, naming vertices with `node_name`.
    ///
    /// ```text
    /// B2 {c,d}
    /// └── B1 {b,c}
    ///     └── B0 {a,b}
    /// ```
    pub fn draw(&self, node_name: impl Fn(NodeIndex) -> String) -> String {
        Drawing {
            tree: self,
            name: node_name,
        }
        .to_string()
    }
}

struct Drawing<'a, F> {
    tree: &'a TreeDecomposition,
    name: F,
}

impl<F: Fn(NodeIndex) -> String> Drawing<'_, F> {
    fn subtree(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: BagId,
        prefix: &str,
        is_last_child: bool,
    ) -> fmt::Result {
        let connector = if is_last_child { "└── " } else { "├── " };
        let node = &self.tree.nodes[id];
        writeln!(f, "{prefix}{connector}{id} {}", node.bag.display_with(&self.name))?;

        let child_prefix = format!("{prefix}{}", if is_last_child { "    " } else { "│   " });
        for (i, &child) in node.children.iter().enumerate() {
            self.subtree(f, child, &child_prefix, i + 1 == node.children.len())?;
        }
        Ok(())
    }
}

impl<F: Fn(NodeIndex) -> String> Display for Drawing<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for root in self.tree.roots() {
            let node = &self.tree.nodes[root];
            writeln!(f, "{root} {}", node.bag.display_with(&self.name))?;
            for (i, &child) in node.children.iter().enumerate() {
                self.subtree(f, child, "", i + 1 == node.children.len())?;
            }
        }
        Ok(())
    }
}

impl Display for TreeDecomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.draw(|n| n.to_string()))
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Bag {0} not found")]
    BagNotFound(BagId),
    #[error("Bag {0} already has a parent")]
    AlreadyAttached(BagId),
    #[error("Attaching {child} under {parent} would close a cycle")]
    CreatesCycle { child: BagId, parent: BagId },
    #[error("Node {0} is in no bag")]
    UncoveredNode(NodeIndex),
    #[error("Edge {0} is not covered by any bag")]
    UncoveredEdge(NodePair),
    #[error("Bags containing node {0} do not form a subtree")]
    NotConnected(NodeIndex),
}

#[cfg(test)]
mod tests;
