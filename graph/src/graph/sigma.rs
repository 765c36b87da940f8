// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON export matching the node-link shape `lib.py::graph_to_sigma_JSON` produced
//! for the original tool's `sigma.js` front-end. Persistence and the front-end
//! itself remain out of scope; this is a serialization convenience on the graph
//! value the core already holds in memory.

use serde::Serialize;

use super::PackageGraph;

#[derive(Serialize)]
struct SigmaNode<'a> {
    key: &'a str,
}

#[derive(Serialize)]
struct SigmaEdge<'a> {
    source: &'a str,
    target: &'a str,
    color: &'a str,
}

#[derive(Serialize)]
struct SigmaAttributes {
    name: &'static str,
    #[serde(rename = "type")]
    kind: &'static str,
    multi: bool,
    #[serde(rename = "allowSelfLoops")]
    allow_self_loops: bool,
}

#[derive(Serialize)]
struct SigmaGraph<'a> {
    nodes: Vec<SigmaNode<'a>>,
    edges: Vec<SigmaEdge<'a>>,
    attributes: SigmaAttributes,
}

impl PackageGraph {
    /// Serializes this graph to the sigma.js node-link JSON shape.
    pub fn to_sigma_json(&self) -> serde_json::Result<String> {
        let nodes = self.node_names().map(|key| SigmaNode { key }).collect();
        let edges = self
            .edges()
            .map(|(source, target, color)| SigmaEdge {
                source,
                target,
                color: color.as_str(),
            })
            .collect();
        let attributes = SigmaAttributes {
            name: "PackageGraph",
            kind: "directed",
            multi: true,
            allow_self_loops: true,
        };

        serde_json::to_string(&SigmaGraph {
            nodes,
            edges,
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeColor;

    #[test]
    fn exports_expected_shape() {
        let mut g = PackageGraph::new();
        g.add_edge("src", "bin", EdgeColor::Blue);
        let json = g.to_sigma_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["attributes"]["type"], "directed");
        assert_eq!(value["attributes"]["multi"], true);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        let edge = &value["edges"][0];
        assert_eq!(edge["source"], "src");
        assert_eq!(edge["target"], "bin");
        assert_eq!(edge["color"], "blue");
    }
}
