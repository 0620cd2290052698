use std::collections::BTreeSet;

use crate::{
    elimination::{LowestIndex, SelectionPolicy},
    graph::{Graph, NodeIndex},
};

impl<E, V> Graph<E, V> {
    /// Size of the largest `{v} ∪ later neighbours of v` along the default order.
    ///
    /// This is the clique number when the order is a perfect elimination order.
    /// Otherwise it only bounds the clique number from above: the first member of
    /// a largest clique to be eliminated sees all the others as later neighbours.
    /// An empty graph gives 0. Arc directions are ignored.
    pub fn max_clique_size(&self) -> usize {
        self.max_clique_size_with(LowestIndex::default())
    }

    pub fn max_clique_size_with<P: SelectionPolicy>(&self, policy: P) -> usize {
        self.undirected_shape()
            .eliminate(policy)
            .map(|c| 1 + c.successor_set().len())
            .max()
            .unwrap_or(0)
    }

    /// Members of the largest clique along the default order. When several
    /// contexts tie, the first one eliminated wins.
    ///
    /// The set is only guaranteed to be a clique along a perfect elimination order.
    pub fn max_clique(&self) -> BTreeSet<NodeIndex> {
        self.max_clique_with(LowestIndex::default())
    }

    pub fn max_clique_with<P: SelectionPolicy>(&self, policy: P) -> BTreeSet<NodeIndex> {
        let mut best = BTreeSet::new();
        for context in self.undirected_shape().eliminate(policy) {
            let mut members = context.successor_set();
            if members.len() + 1 > best.len() {
                members.insert(context.node);
                best = members;
            }
        }
        best
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use crate::{
        algorithms::is_clique,
        dot,
        elimination::{GivenOrder, MaximumCardinality, Shuffled},
        graph::{Graph, NodeIndex},
    };
    use std::collections::BTreeSet;

    fn ids(ids: impl IntoIterator<Item = usize>) -> BTreeSet<NodeIndex> {
        ids.into_iter().map(NodeIndex).collect()
    }

    #[test]
    fn cycle_with_diagonal() {
        let g = Graph::undirected(4, [(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]).unwrap();
        assert_eq!(g.max_clique_size(), 3);
        assert_eq!(g.max_clique(), ids([0, 1, 3]));
    }

    #[test]
    fn diagonal_endpoints_last() {
        let g = Graph::undirected(4, [(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap();
        let order = [1, 3, 0, 2].map(NodeIndex);
        assert_eq!(g.max_clique_size_with(GivenOrder::new(order)), 3);
        assert_eq!(g.max_clique_with(GivenOrder::new(order)), ids([0, 1, 2]));
    }

    #[test]
    fn empty_graph() {
        let g = Graph::<(), ()>::new();
        assert_eq!(g.max_clique_size(), 0);
        assert!(g.max_clique().is_empty());
    }

    #[test]
    fn isolated_vertices() {
        let g = Graph::undirected(3, []).unwrap();
        assert_eq!(g.max_clique_size(), 1);
        assert_eq!(g.max_clique(), ids([0]));
    }

    #[test]
    fn order_matters_outside_perfect_orders() {
        // Two triangles sharing the edge 1-2, with a pendant 3-4.
        let g = Graph::undirected(
            5,
            [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3), (3, 4)],
        )
        .unwrap();
        assert_eq!(g.max_clique_size(), 3);

        // Eliminating 1 first sees {0,2,3}, which is not a clique.
        let order = [1, 0, 2, 3, 4].map(NodeIndex);
        assert_eq!(g.max_clique_size_with(GivenOrder::new(order)), 4);

        assert_eq!(g.max_clique_size_with(MaximumCardinality::new(&g)), 3);
    }

    #[test]
    fn one_way_arc_is_an_edge() {
        let mut g: Graph<(), ()> = Graph::new();
        g.add_node(NodeIndex(0), ()).unwrap();
        g.add_node(NodeIndex(1), ()).unwrap();
        g.add_edge(NodeIndex(1), NodeIndex(0), ()).unwrap();
        assert_eq!(g.max_clique_size(), 2);
        assert_eq!(g.max_clique(), ids([0, 1]));
    }

    #[test]
    fn labels_are_ignored() {
        let g = dot!(
            digraph {
                a -> b;
                b -> c;
                c -> a;
                c -> d;
            }
        )
        .unwrap();
        assert_eq!(g.max_clique_size(), 3);
        let names: Vec<_> = g
            .max_clique()
            .into_iter()
            .map(|n| g.name(n).unwrap().to_string())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    /// Clique number by trying every subset.
    fn clique_number(g: &Graph<(), ()>) -> usize {
        let ids: Vec<_> = g.node_ids().collect();
        let edges = g.edge_set();
        (0u32..1 << ids.len())
            .filter(|&mask| {
                let members = ids
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| (mask >> i) & 1 == 1)
                    .map(|(_, &n)| n);
                is_clique(members, &edges)
            })
            .map(|mask| mask.count_ones() as usize)
            .max()
            .unwrap_or(0)
    }

    fn arb_arcs() -> impl Strategy<Value = Graph<(), ()>> {
        (1usize..9).prop_flat_map(|n| {
            proptest::collection::vec((0..n, 0..n), 0..n * 3).prop_map(move |pairs| {
                let mut graph = Graph::new();
                for i in 0..n {
                    graph.add_node(NodeIndex(i), ()).unwrap();
                }
                for (a, b) in pairs.into_iter().collect::<BTreeSet<_>>() {
                    graph.add_edge(NodeIndex(a), NodeIndex(b), ()).unwrap();
                }
                graph
            })
        })
    }

    proptest! {
        #[test]
        fn any_order_bounds_the_clique_number(graph in arb_arcs(), seed in any::<u64>()) {
            let size = graph.max_clique_size_with(Shuffled::seeded(seed));
            prop_assert!(size <= graph.n_nodes());
            prop_assert!(size >= clique_number(&graph));
        }

        #[test]
        fn perfect_orders_find_the_clique_number(graph in arb_arcs(), seed in any::<u64>()) {
            let chordal = graph
                .chordal_completion_with(Shuffled::seeded(seed), |_, _| ())
                .graph;
            let expected = clique_number(&chordal);

            let mcs = MaximumCardinality::new(&chordal);
            prop_assert_eq!(chordal.max_clique_size_with(mcs.clone()), expected);

            let members = chordal.max_clique_with(mcs);
            prop_assert_eq!(members.len(), expected);
            prop_assert!(is_clique(members, &chordal.edge_set()));
        }
    }
}
