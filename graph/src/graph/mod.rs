// SPDX-License-Identifier: MIT OR Apache-2.0

//! The finished dependency graph: a directed multigraph over package names with
//! colored edges, plus neighborhood extraction and a JSON export format.

mod builder;
mod query;
mod sigma;

pub use builder::{BuilderState, GraphBuilder};
pub use query::NeighborhoodDirection;

use std::collections::HashMap;
use std::fmt;

use petgraph::graph::NodeIndex;
use petgraph::Directed;

type Ix = u32;

/// The color (and therefore meaning) of an edge in a [`PackageGraph`].
///
/// See `spec.md` §3: blue edges leave sources and enter binaries ("this source
/// produces this binary"), green edges leave binaries and enter sources ("this
/// source build-requires this binary"), red edges connect binaries to binaries
/// ("this binary runtime-requires this binary").
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EdgeColor {
    /// source -> binary: "this source produces this binary".
    Blue,
    /// binary -> source: "this source build-requires this binary".
    Green,
    /// binary -> binary: "this binary runtime-requires this binary".
    Red,
}

impl EdgeColor {
    /// The color name, as used by [`PackageGraph::to_sigma_json`].
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeColor::Blue => "blue",
            EdgeColor::Green => "green",
            EdgeColor::Red => "red",
        }
    }
}

impl fmt::Display for EdgeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed multigraph over package *names* (not package records), with edges
/// typed by [`EdgeColor`].
///
/// Nodes are created implicitly by edge insertion; a package never mentioned by any
/// edge is never added (`spec.md` §4.3: "a package never referenced by any edge is
/// omitted; this is intentional").
#[derive(Clone, Debug, Default)]
pub struct PackageGraph {
    pub(crate) inner: petgraph::Graph<Box<str>, EdgeColor, Directed, Ix>,
    pub(crate) index: HashMap<Box<str>, NodeIndex<Ix>>,
}

impl PackageGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node index for `name`, creating the node if it doesn't exist yet.
    pub(crate) fn ensure_node(&mut self, name: &str) -> NodeIndex<Ix> {
        if let Some(&ix) = self.index.get(name) {
            return ix;
        }
        let ix = self.inner.add_node(name.into());
        self.index.insert(name.into(), ix);
        ix
    }

    /// Adds a colored edge between two package names, creating either endpoint's
    /// node if it doesn't already exist. Parallel edges (including same-colored
    /// ones) are permitted, per `spec.md` §3.
    pub fn add_edge(&mut self, from: &str, to: &str, color: EdgeColor) {
        let from_ix = self.ensure_node(from);
        let to_ix = self.ensure_node(to);
        self.inner.add_edge(from_ix, to_ix, color);
    }

    /// Number of nodes (packages mentioned by at least one edge).
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// True if `name` has a node in this graph.
    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// An iterator over every package name with a node in this graph.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.inner.node_weights().map(|s| s.as_ref())
    }

    /// An iterator over every edge, as `(from, to, color)`.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, EdgeColor)> {
        self.inner.edge_indices().map(move |ix| {
            let (from, to) = self.inner.edge_endpoints(ix).expect("valid edge index");
            (
                self.inner[from].as_ref(),
                self.inner[to].as_ref(),
                self.inner[ix],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_creates_both_endpoints() {
        let mut g = PackageGraph::new();
        g.add_edge("src", "bin", EdgeColor::Blue);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.edge_count(), 1);
        assert!(g.contains_node("src"));
        assert!(g.contains_node("bin"));
    }

    #[test]
    fn parallel_edges_of_different_colors_are_kept() {
        let mut g = PackageGraph::new();
        g.add_edge("a", "b", EdgeColor::Red);
        g.add_edge("a", "b", EdgeColor::Red);
        assert_eq!(g.edge_count(), 2, "parallel same-color edges are permitted");
    }

    #[test]
    fn isolated_packages_never_referenced_by_an_edge_are_absent() {
        let g = PackageGraph::new();
        assert_eq!(g.node_count(), 0);
    }
}
