// SPDX-License-Identifier: MIT OR Apache-2.0

//! Neighborhood extraction: the sub-multigraph of nodes reachable from a root within
//! a fixed radius, directed or undirected.
//!
//! This is the one piece of `web.py`'s Flask front-end that is actually a graph
//! operation rather than HTTP plumbing (`nx.ego_graph(G, package_name, depth,
//! undirected=undirected)`), so it's supplemented into the core rather than treated
//! as out of scope. The rest of the front-end — the route handler, SVG rendering —
//! stays external.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::errors::Error;

use super::PackageGraph;

/// Whether a neighborhood query follows edges in their declared direction only, or
/// treats the graph as undirected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NeighborhoodDirection {
    /// Follow edges only from source to target.
    Directed,
    /// Follow edges in either direction.
    Undirected,
}

impl PackageGraph {
    /// Returns the induced sub-multigraph of nodes reachable from `root` within
    /// `radius` hops, preserving edge colors.
    ///
    /// An edge is included whenever both of its endpoints are within `radius` hops
    /// of the root, not only edges that lie on a shortest path to a node — this
    /// matches `networkx.ego_graph`'s behavior, which the original tool relied on.
    pub fn neighborhood(
        &self,
        root: &str,
        radius: usize,
        direction: NeighborhoodDirection,
    ) -> Result<PackageGraph, Error> {
        let root_ix = *self
            .index
            .get(root)
            .ok_or_else(|| Error::unknown_package(root))?;

        let reachable = self.reachable_within(root_ix, radius, direction);

        let mut sub = PackageGraph::new();
        for &ix in reachable.keys() {
            sub.ensure_node(&self.inner[ix]);
        }
        for edge in self.inner.edge_references() {
            let (from, to) = (edge.source(), edge.target());
            if reachable.contains_key(&from) && reachable.contains_key(&to) {
                sub.add_edge(&self.inner[from], &self.inner[to], *edge.weight());
            }
        }
        Ok(sub)
    }

    fn reachable_within(
        &self,
        root: NodeIndex<u32>,
        radius: usize,
        direction: NeighborhoodDirection,
    ) -> HashMap<NodeIndex<u32>, usize> {
        let mut distance = HashMap::new();
        distance.insert(root, 0usize);
        let mut frontier = vec![root];

        for dist in 1..=radius {
            let mut next = Vec::new();
            for &node in &frontier {
                for neighbor in self.step_neighbors(node, direction) {
                    if !distance.contains_key(&neighbor) {
                        distance.insert(neighbor, dist);
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        distance
    }

    fn step_neighbors(
        &self,
        node: NodeIndex<u32>,
        direction: NeighborhoodDirection,
    ) -> Vec<NodeIndex<u32>> {
        match direction {
            NeighborhoodDirection::Directed => self
                .inner
                .neighbors_directed(node, Direction::Outgoing)
                .collect(),
            NeighborhoodDirection::Undirected => {
                let mut out: Vec<_> = self
                    .inner
                    .neighbors_directed(node, Direction::Outgoing)
                    .collect();
                out.extend(self.inner.neighbors_directed(node, Direction::Incoming));
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeColor;

    fn sample() -> PackageGraph {
        let mut g = PackageGraph::new();
        // root -> a -> b -> c, and a standalone root <- z edge.
        g.add_edge("root", "a", EdgeColor::Red);
        g.add_edge("a", "b", EdgeColor::Red);
        g.add_edge("b", "c", EdgeColor::Red);
        g.add_edge("z", "root", EdgeColor::Green);
        g
    }

    #[test]
    fn directed_radius_one_sees_only_direct_outgoing() {
        let g = sample();
        let sub = g
            .neighborhood("root", 1, NeighborhoodDirection::Directed)
            .unwrap();
        assert!(sub.contains_node("root"));
        assert!(sub.contains_node("a"));
        assert!(!sub.contains_node("b"));
        assert!(!sub.contains_node("z"));
    }

    #[test]
    fn undirected_radius_one_sees_both_directions() {
        let g = sample();
        let sub = g
            .neighborhood("root", 1, NeighborhoodDirection::Undirected)
            .unwrap();
        assert!(sub.contains_node("a"));
        assert!(sub.contains_node("z"));
    }

    #[test]
    fn radius_two_reaches_transitively() {
        let g = sample();
        let sub = g
            .neighborhood("root", 2, NeighborhoodDirection::Directed)
            .unwrap();
        assert!(sub.contains_node("b"));
        assert!(!sub.contains_node("c"));
    }

    #[test]
    fn unknown_root_is_an_error() {
        let g = sample();
        let err = g
            .neighborhood("nope", 1, NeighborhoodDirection::Directed)
            .unwrap_err();
        assert_eq!(err.to_string(), "unknown package: 'nope'");
    }

    #[test]
    fn edges_between_reachable_nodes_are_kept_even_off_tree() {
        let mut g = PackageGraph::new();
        g.add_edge("root", "a", EdgeColor::Red);
        g.add_edge("root", "b", EdgeColor::Red);
        g.add_edge("a", "b", EdgeColor::Red);
        let sub = g
            .neighborhood("root", 1, NeighborhoodDirection::Directed)
            .unwrap();
        // a and b are both within radius 1; the a->b edge should be included even
        // though it isn't needed to reach either node from root.
        assert_eq!(sub.edge_count(), 3);
    }
}

#[cfg(all(test, feature = "proptest1"))]
mod proptest_tests {
    use super::*;
    use crate::graph::EdgeColor;
    use proptest::prelude::*;

    const NAMES: [&str; 5] = ["root", "a", "b", "c", "d"];

    fn edge_strategy() -> impl Strategy<Value = (usize, usize)> {
        (0..NAMES.len(), 0..NAMES.len())
    }

    proptest! {
        // A larger radius can only ever see more of the graph than a smaller one:
        // growing the radius never drops a previously-reachable node.
        #[test]
        fn larger_radius_is_a_superset(edges in prop::collection::vec(edge_strategy(), 0..20)) {
            let mut g = PackageGraph::new();
            for (from, to) in edges {
                g.add_edge(NAMES[from], NAMES[to], EdgeColor::Red);
            }
            if !g.contains_node("root") {
                return Ok(());
            }

            let small = g.neighborhood("root", 1, NeighborhoodDirection::Directed).unwrap();
            let large = g.neighborhood("root", 2, NeighborhoodDirection::Directed).unwrap();
            for name in small.node_names() {
                prop_assert!(large.contains_node(name));
            }
        }
    }
}
