//! Walks over a [`TreeDecomposition`].

use super::{BagId, ParentId, TreeDecomposition};

// --- Ancestors Iterator ---

/// Traverses upwards from a starting bag to its root, the start included.
#[derive(Clone)]
pub struct AncestorsIter<'a> {
    tree: &'a TreeDecomposition,
    /// The next bag to yield. `None` once the root has been yielded.
    current: Option<BagId>,
}

impl<'a> AncestorsIter<'a> {
    pub fn new(tree: &'a TreeDecomposition, start: BagId) -> Self {
        AncestorsIter {
            tree,
            current: tree.node(start).ok().map(|_| start),
        }
    }
}

impl Iterator for AncestorsIter<'_> {
    type Item = BagId;

    fn next(&mut self) -> Option<Self::Item> {
        let bag = self.current?;
        self.current = match self.tree.parent(bag) {
            Ok(ParentId::Node(parent)) => Some(parent),
            Ok(ParentId::Root) | Err(_) => None,
        };
        Some(bag)
    }
}

// --- Preorder Iterator ---

/// A pre-order DFS over the subtree under a starting bag.
#[derive(Clone)]
pub struct PreorderIter<'a> {
    tree: &'a TreeDecomposition,
    stack: Vec<BagId>,
}

impl<'a> PreorderIter<'a> {
    pub fn new(tree: &'a TreeDecomposition, start: BagId) -> Self {
        PreorderIter {
            tree,
            stack: tree.node(start).ok().map(|_| start).into_iter().collect(),
        }
    }
}

impl Iterator for PreorderIter<'_> {
    type Item = BagId;

    fn next(&mut self) -> Option<Self::Item> {
        let bag = self.stack.pop()?;
        // Reversed so the first child comes off the stack next.
        if let Ok(children) = self.tree.children(bag) {
            self.stack.extend(children.iter().rev());
        }
        Some(bag)
    }
}
