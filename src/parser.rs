//! # DOT loading
//!
//! Builds [`Graph`]s from descriptions in the
//! [DOT language](https://graphviz.org/doc/info/lang.html), using the `dot-parser`
//! crate for the syntax and its canonical form for the flattened node and edge lists.
//!
//! Vertices are numbered by name in lexicographic order, so the same file always
//! yields the same ids. Every DOT edge becomes an undirected edge whatever the
//! graph kind, since all algorithms of this crate work on the underlying undirected
//! graph. Repeated edges between one pair of names are merged, the first one wins.
//!
//! ```rust,ignore
//! use chordal::dot;
//!
//! let graph = dot!(digraph { a -> b; b -> c; c -> a; }).unwrap();
//! assert!(graph.is_chordal());
//! assert_eq!(graph.node("c"), Some(chordal::graph::NodeIndex(2)));
//! ```

use std::{
    collections::BTreeMap,
    fmt::Display,
    fs,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use itertools::Itertools;
use thiserror::Error;

use crate::graph::{Graph, GraphError, NodeIndex};

/// Attributes of a DOT node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotVertexData {
    /// The name the node has in the DOT source.
    pub id: String,
    pub statements: BTreeMap<String, String>,
}

impl DotVertexData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.statements.get(key).map(String::as_str)
    }
}

impl Display for DotVertexData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if !self.statements.is_empty() {
            let attrs = self
                .statements
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .join(" ");
            write!(f, " [{attrs}]")?;
        }
        Ok(())
    }
}

/// Attributes of a DOT edge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DotEdgeData {
    pub statements: BTreeMap<String, String>,
}

impl DotEdgeData {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.statements.get(key).map(String::as_str)
    }
}

/// A graph read from DOT, with the names of its vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct DotGraph {
    pub graph: Graph<DotEdgeData, DotVertexData>,
    names: IndexMap<String, NodeIndex>,
}

impl Deref for DotGraph {
    type Target = Graph<DotEdgeData, DotVertexData>;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

impl DerefMut for DotGraph {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.graph
    }
}

impl DotGraph {
    pub fn from_string<Str: AsRef<str>>(s: Str) -> Result<Self, ParseError> {
        let ast_graph = dot_parser::ast::Graph::try_from(s.as_ref())
            .map_err(|e| ParseError::Syntax(e.to_string()))?;
        let can_graph = dot_parser::canonical::Graph::from(
            ast_graph.filter_map(&|a| Some((a.0.to_string(), a.1.to_string()))),
        );
        Ok(Self::from(can_graph))
    }

    pub fn from_file<P: AsRef<Path>>(p: P) -> Result<Self, ParseError> {
        let path = p.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_string(source)
    }

    /// The DOT name of a vertex.
    pub fn name(&self, node: NodeIndex) -> Option<&str> {
        self.graph.label(node).ok().map(|d| d.id.as_str())
    }

    /// The vertex with DOT name `name`.
    pub fn node(&self, name: &str) -> Option<NodeIndex> {
        self.names.get(name).copied()
    }

    /// `(name, id)` pairs in id order.
    pub fn names(&self) -> impl Iterator<Item = (&str, NodeIndex)> {
        self.names.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn into_graph(self) -> Graph<DotEdgeData, DotVertexData> {
        self.graph
    }

    fn intern(&mut self, name: &str) -> NodeIndex {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = NodeIndex(self.names.len());
        let data = DotVertexData {
            id: name.to_string(),
            statements: BTreeMap::new(),
        };
        // Ids are handed out consecutively, so the slot is always free.
        let added = self.graph.add_node(id, data);
        debug_assert!(added.is_ok(), "interned id {id} already taken");
        self.names.insert(name.to_string(), id);
        id
    }
}

impl From<dot_parser::canonical::Graph<(String, String)>> for DotGraph {
    fn from(value: dot_parser::canonical::Graph<(String, String)>) -> Self {
        let mut g = DotGraph {
            graph: Graph::new(),
            names: IndexMap::new(),
        };

        let nodes = BTreeMap::from_iter(value.nodes.set);
        for (name, node) in nodes {
            let id = g.intern(&name);
            if let Ok(data) = g.graph.label_mut(id) {
                data.statements.extend(node.attr.into_iter());
            }
        }

        for e in value
            .edges
            .set
            .into_iter()
            .sorted_by(|a, b| Ord::cmp(&(&a.from, &a.to), &(&b.from, &b.to)))
        {
            let from = g.intern(&e.from);
            let to = g.intern(&e.to);
            let data = DotEdgeData {
                statements: e.attr.into_iter().collect(),
            };
            match g.graph.add_undirected_edge(from, to, data) {
                Ok(()) => {}
                Err(GraphError::DuplicateEdge { .. }) => {
                    tracing::trace!(from = %e.from, to = %e.to, "merging repeated edge");
                }
                Err(err) => tracing::warn!(%err, "dropping edge"),
            }
        }

        tracing::debug!(
            nodes = g.graph.n_nodes(),
            edges = g.graph.edge_set().len(),
            "loaded dot graph"
        );
        g
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid DOT: {0}")]
    Syntax(String),
    #[error("Cannot read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[macro_export]
macro_rules! dot {
    ($($t:tt)*) => {
        $crate::parser::DotGraph::from_string(stringify!($($t)*))
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_are_numbered_in_order() {
        let g = dot!(
            digraph {
                c -> a;
                b -> c;
                d;
            }
        )
        .unwrap();

        assert_eq!(g.n_nodes(), 4);
        for (i, name) in ["a", "b", "c", "d"].into_iter().enumerate() {
            assert_eq!(g.node(name), Some(NodeIndex(i)));
            assert_eq!(g.name(NodeIndex(i)), Some(name));
        }
        assert!(g.is_adjacent(NodeIndex(0), NodeIndex(2)));
        assert!(g.edge_exists(NodeIndex(0), NodeIndex(2)));
        assert!(g.edge_exists(NodeIndex(2), NodeIndex(0)));
        assert_eq!(g.neighbors(NodeIndex(3)).len(), 0);
    }

    #[test]
    fn repeated_edges_are_merged() {
        let g = dot!(
            digraph {
                a -> b;
                b -> a;
                a -> b;
                b -> c;
            }
        )
        .unwrap();
        assert_eq!(g.n_arcs(), 4);
        assert_eq!(g.edge_set().len(), 2);
    }

    #[test]
    fn attributes_are_kept() {
        let g = dot!(
            digraph {
                a [shape=box];
                a -> b [weight=3];
            }
        )
        .unwrap();
        let a = g.node("a").unwrap();
        assert_eq!(g.label(a).unwrap().get("shape"), Some("box"));
        let (_, _, edge) = g.arcs().next().unwrap();
        assert_eq!(edge.get("weight"), Some("3"));
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(
            DotGraph::from_string("digraph {"),
            Err(ParseError::Syntax(_))
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = DotGraph::from_file("does/not/exist.dot").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.dot"));
    }
}
