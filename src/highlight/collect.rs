use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::flow::{FlowGraph, NodeName};

/// Link indices per node in both directions.
pub(super) struct Adjacency {
    outgoing: HashMap<NodeName, Vec<usize>>,
    incoming: HashMap<NodeName, Vec<usize>>,
}

impl Adjacency {
    pub(super) fn new(graph: &FlowGraph) -> Self {
        let mut outgoing: HashMap<NodeName, Vec<usize>> = HashMap::new();
        let mut incoming: HashMap<NodeName, Vec<usize>> = HashMap::new();
        for (index, link) in graph.links.iter().enumerate() {
            outgoing.entry(link.source).or_default().push(index);
            incoming.entry(link.target).or_default().push(index);
        }
        Self { outgoing, incoming }
    }
}

/// Walks from `start` along links in one direction with an explicit frontier,
/// adding every node and link it passes to the result sets. Each node is
/// expanded at most once.
pub(super) fn collect_related(
    graph: &FlowGraph,
    adjacency: &Adjacency,
    start: NodeName,
    forward: bool,
    related_nodes: &mut BTreeSet<NodeName>,
    related_links: &mut BTreeSet<usize>,
) {
    let edges = if forward {
        &adjacency.outgoing
    } else {
        &adjacency.incoming
    };

    let mut queue = VecDeque::from([start]);
    let mut visited = HashSet::from([start]);

    while let Some(node) = queue.pop_front() {
        let Some(links) = edges.get(&node) else {
            continue;
        };

        for &index in links {
            let link = &graph.links[index];
            let next = if forward { link.target } else { link.source };

            related_links.insert(index);
            related_nodes.insert(next);

            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
}
