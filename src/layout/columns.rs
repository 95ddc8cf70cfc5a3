use std::collections::VecDeque;

use crate::util::snap_to_grid;

use super::{Network, NodeAlign};

/// Longest path (in edges) from any node without predecessors, following
/// `successors`. Nodes on a cycle keep the level they reached before the
/// cycle blocked further progress.
fn longest_path_levels(successors: &[Vec<usize>]) -> Vec<usize> {
    let mut in_degree = vec![0usize; successors.len()];
    for next in successors.iter().flatten() {
        in_degree[*next] += 1;
    }

    let mut queue = (0..successors.len())
        .filter(|&index| in_degree[index] == 0)
        .collect::<VecDeque<_>>();
    let mut levels = vec![0usize; successors.len()];
    let mut visited = 0usize;

    while let Some(node) = queue.pop_front() {
        visited += 1;
        for &next in &successors[node] {
            levels[next] = levels[next].max(levels[node] + 1);
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if visited < successors.len() {
        log::warn!(
            "flow graph contains a cycle; {} nodes keep partial depths",
            successors.len() - visited
        );
    }

    levels
}

/// Computes depth, layer and horizontal extent for every node and returns the
/// columns in node order.
pub(super) fn assign(
    network: &mut Network,
    align: NodeAlign,
    width: f64,
    node_width: f64,
) -> Vec<Vec<usize>> {
    let downstream = network
        .outgoing
        .iter()
        .map(|links| {
            links
                .iter()
                .map(|&link| network.links[link].target_index)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    let upstream = network
        .incoming
        .iter()
        .map(|links| {
            links
                .iter()
                .map(|&link| network.links[link].source_index)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let depths = longest_path_levels(&downstream);
    let heights = longest_path_levels(&upstream);

    let column_count = depths.iter().copied().max().map_or(0, |depth| depth + 1);
    if column_count == 0 {
        return Vec::new();
    }
    let last = column_count - 1;

    let column_step = if column_count > 1 {
        (width - node_width) / last as f64
    } else {
        0.0
    };

    let mut columns = vec![Vec::new(); column_count];
    for (index, node) in network.nodes.iter_mut().enumerate() {
        let depth = depths[index];
        let layer = match align {
            NodeAlign::Left => depth,
            NodeAlign::Right => last.saturating_sub(heights[index]),
            NodeAlign::Justify if network.outgoing[index].is_empty() => last,
            NodeAlign::Justify => depth,
        }
        .min(last);

        node.depth = depth;
        node.layer = layer;
        node.x0 = snap_to_grid(layer as f64 * column_step);
        node.x1 = snap_to_grid(node.x0 + node_width);
        columns[layer].push(index);
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_path_prefers_deepest_route() {
        // 0 -> 1 -> 2, 0 -> 2
        let levels = longest_path_levels(&[vec![1, 2], vec![2], vec![]]);
        assert_eq!(levels, vec![0, 1, 2]);
    }

    #[test]
    fn cycles_do_not_hang() {
        let levels = longest_path_levels(&[vec![1], vec![0]]);
        assert_eq!(levels, vec![0, 0]);
    }

    #[test]
    fn disconnected_sources_start_at_zero() {
        let levels = longest_path_levels(&[vec![2], vec![2], vec![]]);
        assert_eq!(levels, vec![0, 0, 1]);
    }
}
