use std::collections::HashMap;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Fixed,
    Conditional,
}

/// Static view of a built graph, used for inspection and DOT rendering.
/// Conditional edges appear once per declared branch.
pub struct Topology {
    graph: Graph<String, EdgeKind>,
    name_to_index: HashMap<String, NodeIndex>,
}

impl Topology {
    pub(crate) fn from_edges(
        nodes: Vec<String>,
        edges: Vec<(String, String, EdgeKind)>,
    ) -> Self {
        let mut graph = Graph::new();
        let mut name_to_index = HashMap::new();
        for name in nodes {
            let index = graph.add_node(name.clone());
            name_to_index.insert(name, index);
        }
        for (from, to, kind) in edges {
            if let (Some(&a), Some(&b)) = (name_to_index.get(&from), name_to_index.get(&to)) {
                graph.add_edge(a, b, kind);
            }
        }
        Self {
            graph,
            name_to_index,
        }
    }

    /// Node names in insertion order.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<(NodeIndex, String)> = self
            .name_to_index
            .iter()
            .map(|(name, &index)| (index, name.clone()))
            .collect();
        names.sort_by_key(|(index, _)| index.index());
        names.into_iter().map(|(_, name)| name).collect()
    }

    pub fn edges(&self) -> Vec<(String, String, EdgeKind)> {
        self.graph
            .edge_references()
            .filter_map(|edge| {
                let from = self.graph.node_weight(edge.source())?;
                let to = self.graph.node_weight(edge.target())?;
                Some((from.clone(), to.clone(), *edge.weight()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_node_order_and_edge_kinds() {
        let topology = Topology::from_edges(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                ("a".into(), "b".into(), EdgeKind::Fixed),
                ("b".into(), "c".into(), EdgeKind::Conditional),
            ],
        );
        assert_eq!(topology.node_names(), vec!["a", "b", "c"]);
        let edges = topology.edges();
        assert_eq!(edges.len(), 2);
        assert!(edges.contains(&("b".into(), "c".into(), EdgeKind::Conditional)));
    }
}
