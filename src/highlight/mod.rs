//! Hover emphasis: everything upstream and downstream of a focused node.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::flow::{FlowGraph, NodeName};

mod collect;

use self::collect::{Adjacency, collect_related};

/// Nodes and link indices (into `FlowGraph::links`) to draw at full opacity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub nodes: BTreeSet<NodeName>,
    pub links: BTreeSet<usize>,
}

impl Highlight {
    pub fn contains_node(&self, name: NodeName) -> bool {
        self.nodes.contains(&name)
    }

    pub fn contains_link(&self, index: usize) -> bool {
        self.links.contains(&index)
    }
}

/// Descendants and ancestors of `focus`, plus `focus` itself. A focus that is
/// not part of the graph highlights nothing.
pub fn reachable(graph: &FlowGraph, focus: NodeName) -> Highlight {
    let mut highlight = Highlight::default();
    if !graph.contains(focus) {
        log::warn!("highlight requested for {focus}, which is not in the graph");
        return highlight;
    }

    highlight.nodes.insert(focus);

    let adjacency = Adjacency::new(graph);
    collect_related(
        graph,
        &adjacency,
        focus,
        true,
        &mut highlight.nodes,
        &mut highlight.links,
    );
    collect_related(
        graph,
        &adjacency,
        focus,
        false,
        &mut highlight.nodes,
        &mut highlight.links,
    );

    highlight
}

/// [`reachable`] keyed by display label, e.g. `"Sat."`.
pub fn reachable_by_label(graph: &FlowGraph, focus: &str) -> Option<Highlight> {
    NodeName::from_label(focus).map(|name| reachable(graph, name))
}
