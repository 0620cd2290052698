use proptest::prelude::*;

use super::*;
use crate::elimination::{GivenOrder, MaximumCardinality, Shuffled};

fn bag(ids: impl IntoIterator<Item = usize>) -> Bag {
    ids.into_iter().map(NodeIndex).collect()
}

fn path(n: usize) -> Graph<(), ()> {
    Graph::undirected(n, (1..n).map(|i| (i - 1, i))).unwrap()
}

#[test]
fn path_of_five() {
    let g = path(5);
    let tree = g.tree_decomposition();
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.width(), 1);
    assert_eq!(tree.n_bags(), 4);
    assert_eq!(tree.roots().collect::<Vec<_>>(), vec![BagId(3)]);
    assert_eq!(tree.bag(BagId(0)), Ok(&bag([0, 1])));
    assert_eq!(tree.home_bag(NodeIndex(0)), Some(BagId(0)));
    assert_eq!(tree.home_bag(NodeIndex(4)), Some(BagId(3)));

    insta::assert_snapshot!(tree.to_string(), @r"
    B3 {3,4}
    └── B2 {2,3}
        └── B1 {1,2}
            └── B0 {0,1}
    ");

    assert_eq!(
        tree.iter_ancestors(BagId(0)).collect::<Vec<_>>(),
        (0..4).map(BagId).collect::<Vec<_>>()
    );
    assert_eq!(
        tree.iter_preorder(BagId(3)).collect::<Vec<_>>(),
        (0..4).rev().map(BagId).collect::<Vec<_>>()
    );
}

#[test]
fn star() {
    let g = Graph::undirected(5, (1..5).map(|i| (0, i))).unwrap();

    let tree = g.tree_decomposition_with(MaximumCardinality::new(&g));
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.width(), 1);
    assert_eq!(tree.children(BagId(0)), Ok(&[BagId(1), BagId(2), BagId(3)][..]));
    assert_eq!(
        tree.iter_preorder(BagId(0)).collect::<Vec<_>>(),
        (0..4).map(BagId).collect::<Vec<_>>()
    );

    let names = ["hub", "a", "b", "c", "d"];
    insta::assert_snapshot!(tree.draw(|n| names[n.0].to_string()), @r"
    B0 {hub,d}
    ├── B1 {hub,c}
    ├── B2 {hub,b}
    └── B3 {hub,a}
    ");

    // Eliminating the hub first fills in every leaf pair.
    let tree = g.tree_decomposition();
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.n_bags(), 1);
    assert_eq!(tree.width(), 4);
}

#[test]
fn cycle_with_diagonal() {
    let g = Graph::undirected(4, [(0, 1), (1, 2), (2, 3), (3, 0), (1, 3)]).unwrap();
    let tree = g.tree_decomposition();
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.width(), 2);
    assert_eq!(tree.n_bags(), 2);
    assert_eq!(tree.parent(BagId(0)), Ok(ParentId::Node(BagId(1))));
    assert_eq!(tree.home_bag(NodeIndex(3)), Some(BagId(1)));
}

#[test]
fn components_become_separate_trees() {
    let g = Graph::undirected(5, [(0, 1), (2, 3)]).unwrap();
    let tree = g.tree_decomposition();
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.roots().count(), 3);
    assert_eq!(tree.bag(BagId(2)), Ok(&bag([4])));
}

#[test]
fn empty_graph() {
    let g = Graph::<(), ()>::new();
    let tree = g.tree_decomposition();
    assert!(tree.is_empty());
    assert_eq!(tree.width(), 0);
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.to_string(), "");
}

#[test]
fn add_to_missing_bag_changes_nothing() {
    let mut tree = TreeDecomposition::new();
    let b = tree.add_bag(bag([1, 2]));
    let before = tree.clone();

    assert_eq!(
        tree.add_to_bag(BagId(5), NodeIndex(0)),
        Err(TreeError::BagNotFound(BagId(5)))
    );
    assert_eq!(tree, before);

    tree.add_to_bag(b, NodeIndex(0)).unwrap();
    assert_eq!(tree.bag(b), Ok(&bag([0, 1, 2])));
}

#[test]
fn attach_rejects_bad_links() {
    let mut tree = TreeDecomposition::new();
    let a = tree.add_bag(bag([0]));
    let b = tree.add_bag(bag([0, 1]));
    let c = tree.add_bag(bag([1]));

    tree.attach(a, b).unwrap();
    tree.attach(b, c).unwrap();
    assert_eq!(tree.attach(a, c), Err(TreeError::AlreadyAttached(a)));
    assert_eq!(
        tree.attach(c, a),
        Err(TreeError::CreatesCycle { child: c, parent: a })
    );
    assert_eq!(tree.attach(c, BagId(9)), Err(TreeError::BagNotFound(BagId(9))));
    assert_eq!(tree.roots().collect::<Vec<_>>(), vec![c]);
}

#[test]
fn validate_reports_each_violation() {
    let g = Graph::undirected(3, [(0, 1)]).unwrap();

    assert_eq!(
        TreeDecomposition::new().validate(&g),
        Err(TreeError::UncoveredNode(NodeIndex(0)))
    );

    let mut split = TreeDecomposition::new();
    let x = split.add_bag(bag([0, 2]));
    let y = split.add_bag(bag([1]));
    split.attach(y, x).unwrap();
    assert_eq!(
        split.validate(&g),
        Err(TreeError::UncoveredEdge(NodePair::new(NodeIndex(0), NodeIndex(1))))
    );

    let mut broken = TreeDecomposition::new();
    let top = broken.add_bag(bag([0, 1]));
    let middle = broken.add_bag(bag([2]));
    let bottom = broken.add_bag(bag([0]));
    broken.attach(middle, top).unwrap();
    broken.attach(bottom, middle).unwrap();
    assert_eq!(broken.validate(&g), Err(TreeError::NotConnected(NodeIndex(0))));
}

#[test]
fn one_way_arc_shares_a_bag() {
    let mut g: Graph<(), ()> = Graph::new();
    g.add_node(NodeIndex(0), ()).unwrap();
    g.add_node(NodeIndex(1), ()).unwrap();
    g.add_edge(NodeIndex(1), NodeIndex(0), ()).unwrap();

    let tree = g.tree_decomposition();
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.n_bags(), 1);
    assert_eq!(tree.bag(BagId(0)), Ok(&bag([0, 1])));
}

#[test]
fn far_apart_ids() {
    let far = NodeIndex(1 << 40);
    let last = NodeIndex(usize::MAX);
    let mut g: Graph<(), ()> = Graph::new();
    for n in [NodeIndex(0), far, last] {
        g.add_node(n, ()).unwrap();
    }
    g.add_undirected_edge(NodeIndex(0), far, ()).unwrap();
    g.add_undirected_edge(far, last, ()).unwrap();

    let tree = g.tree_decomposition();
    assert_eq!(tree.validate(&g), Ok(()));
    assert_eq!(tree.width(), 1);
    assert_eq!(tree.home_bag(last), Some(BagId(1)));
    assert_eq!(tree.bag(BagId(1)), Ok(&[far, last].into_iter().collect::<Bag>()));
}

fn arb_arcs() -> impl Strategy<Value = Graph<(), ()>> {
    (1usize..10).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 0..n * 2).prop_map(move |pairs| {
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

fn arb_graph() -> impl Strategy<Value = Graph<(), ()>> {
    (1usize..10).prop_flat_map(|n| {
        proptest::collection::vec((0..n, 0..n), 0..n * 2).prop_map(move |pairs| {
            let edges: BTreeSet<_> = pairs
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect();
            Graph::undirected(n, edges).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn built_decompositions_are_valid(graph in arb_graph(), seed in any::<u64>()) {
        let tree = graph.tree_decomposition_with(Shuffled::seeded(seed));
        prop_assert_eq!(tree.validate(&graph), Ok(()));

        for node in graph.node_ids() {
            let home = tree.home_bag(node).unwrap();
            prop_assert!(tree.bag(home).unwrap().contains(node));
        }

        let completion = graph
            .shape()
            .chordal_completion_with(Shuffled::seeded(seed), |_, _| ());
        let largest = completion
            .graph
            .max_clique_size_with(GivenOrder::new(completion.order.clone()));
        prop_assert_eq!(tree.width(), largest - 1);
    }

    #[test]
    fn one_way_arcs_are_covered(graph in arb_arcs(), seed in any::<u64>()) {
        let tree = graph.tree_decomposition_with(Shuffled::seeded(seed));
        prop_assert_eq!(tree.validate(&graph), Ok(()));

        let exact = graph.tree_decomposition_with(MaximumCardinality::new(&graph));
        prop_assert_eq!(exact.validate(&graph), Ok(()));
        if graph.is_chordal_exact() {
            let largest = graph.max_clique_size_with(MaximumCardinality::new(&graph));
            prop_assert_eq!(exact.width() + 1, largest);
        }
    }
}
