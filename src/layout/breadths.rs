use std::cmp::Ordering;

use super::{LayoutLink, LayoutNode, Network};

const COLLISION_EPSILON: f64 = 1e-6;

fn by_breadth(a: &LayoutNode, b: &LayoutNode) -> Ordering {
    a.y0.total_cmp(&b.y0).then_with(|| a.name.cmp(&b.name))
}

fn sort_by_target(list: &mut [usize], nodes: &[LayoutNode], links: &[LayoutLink]) {
    list.sort_by(|&a, &b| by_breadth(&nodes[links[a].target_index], &nodes[links[b].target_index]));
}

fn sort_by_source(list: &mut [usize], nodes: &[LayoutNode], links: &[LayoutLink]) {
    list.sort_by(|&a, &b| by_breadth(&nodes[links[a].source_index], &nodes[links[b].source_index]));
}

/// Caps each column's padding so its gaps alone never exceed the extent.
fn effective_padding(columns: &[Vec<usize>], padding: &[f64], height: f64) -> Vec<f64> {
    columns
        .iter()
        .zip(padding)
        .map(|(column, &padding)| {
            if column.len() > 1 {
                padding.min(height / (column.len() - 1) as f64).max(0.0)
            } else {
                padding.max(0.0)
            }
        })
        .collect()
}

impl Network {
    fn sort_column(&self, column: &mut [usize]) {
        column.sort_by(|&a, &b| by_breadth(&self.nodes[a], &self.nodes[b]));
    }

    fn reorder_all_links(&mut self, column: &[usize]) {
        for &node in column {
            sort_by_target(&mut self.outgoing[node], &self.nodes, &self.links);
            sort_by_source(&mut self.incoming[node], &self.nodes, &self.links);
        }
    }

    /// After `node` moved, its neighbours' link lists may be out of order.
    fn reorder_node_links(&mut self, node: usize) {
        let sources = self.incoming[node]
            .iter()
            .map(|&link| self.links[link].source_index)
            .collect::<Vec<_>>();
        for source in sources {
            sort_by_target(&mut self.outgoing[source], &self.nodes, &self.links);
        }

        let targets = self.outgoing[node]
            .iter()
            .map(|&link| self.links[link].target_index)
            .collect::<Vec<_>>();
        for target in targets {
            sort_by_source(&mut self.incoming[target], &self.nodes, &self.links);
        }
    }

    /// The `y0` of `target` that would make the link from `source` straight.
    fn target_top(&self, source: usize, target: usize, padding: &[f64]) -> f64 {
        let gap = padding[self.nodes[source].layer];
        let mut y = self.nodes[source].y0 - (self.outgoing[source].len() as f64 - 1.0) * gap / 2.0;
        for &link in &self.outgoing[source] {
            if self.links[link].target_index == target {
                break;
            }
            y += self.links[link].width + gap;
        }
        for &link in &self.incoming[target] {
            if self.links[link].source_index == source {
                break;
            }
            y -= self.links[link].width;
        }
        y
    }

    /// The `y0` of `source` that would make the link into `target` straight.
    fn source_top(&self, source: usize, target: usize, padding: &[f64]) -> f64 {
        let gap = padding[self.nodes[target].layer];
        let mut y = self.nodes[target].y0 - (self.incoming[target].len() as f64 - 1.0) * gap / 2.0;
        for &link in &self.incoming[target] {
            if self.links[link].source_index == source {
                break;
            }
            y += self.links[link].width + gap;
        }
        for &link in &self.outgoing[source] {
            if self.links[link].target_index == target {
                break;
            }
            y -= self.links[link].width;
        }
        y
    }

    fn shift(&mut self, node: usize, dy: f64) {
        self.nodes[node].y0 += dy;
        self.nodes[node].y1 += dy;
    }

    fn initialize(&mut self, columns: &[Vec<usize>], padding: &[f64], height: f64) {
        let scale = columns
            .iter()
            .zip(padding)
            .filter(|(column, _)| !column.is_empty())
            .map(|(column, &gap)| {
                let total: f64 = column.iter().map(|&node| self.nodes[node].value).sum();
                let gaps = (column.len() - 1) as f64 * gap;
                if total > 0.0 {
                    (height - gaps) / total
                } else {
                    f64::INFINITY
                }
            })
            .fold(f64::INFINITY, f64::min);
        let scale = if scale.is_finite() { scale.max(0.0) } else { 0.0 };

        for (column, &gap) in columns.iter().zip(padding) {
            let mut y = 0.0;
            for &node in column {
                self.nodes[node].y0 = y;
                self.nodes[node].y1 = y + self.nodes[node].value * scale;
                y = self.nodes[node].y1 + gap;
                for &link in &self.outgoing[node] {
                    self.links[link].width = self.links[link].value * scale;
                }
            }

            let spare = (height - y + gap) / (column.len() + 1) as f64;
            for (position, &node) in column.iter().enumerate() {
                self.shift(node, spare * (position + 1) as f64);
            }
            self.reorder_all_links(column);
        }
    }

    fn push_down(&mut self, column: &[usize], mut y: f64, alpha: f64, gap: f64) {
        for &node in column {
            let dy = (y - self.nodes[node].y0) * alpha;
            if dy > COLLISION_EPSILON {
                self.shift(node, dy);
            }
            y = self.nodes[node].y1 + gap;
        }
    }

    fn push_up(&mut self, column: &[usize], mut y: f64, alpha: f64, gap: f64) {
        for &node in column.iter().rev() {
            let dy = (self.nodes[node].y1 - y) * alpha;
            if dy > COLLISION_EPSILON {
                self.shift(node, -dy);
            }
            y = self.nodes[node].y0 - gap;
        }
    }

    /// Pushes overlapping nodes apart from the middle node outwards, then
    /// pulls everything back inside `[0, height]`.
    fn resolve_collisions(&mut self, column: &[usize], alpha: f64, gap: f64, height: f64) {
        if column.is_empty() {
            return;
        }

        let middle = column.len() / 2;
        let subject = column[middle];
        let above = self.nodes[subject].y0 - gap;
        let below = self.nodes[subject].y1 + gap;
        self.push_up(&column[..middle], above, alpha, gap);
        self.push_down(&column[middle + 1..], below, alpha, gap);
        self.push_up(column, height, alpha, gap);
        self.push_down(column, 0.0, alpha, gap);
    }

    fn relax_left_to_right(
        &mut self,
        columns: &mut [Vec<usize>],
        padding: &[f64],
        alpha: f64,
        beta: f64,
        height: f64,
    ) {
        for index in 1..columns.len() {
            for position in 0..columns[index].len() {
                let target = columns[index][position];
                let mut y = 0.0;
                let mut weight = 0.0;
                for &link in &self.incoming[target] {
                    let source = self.links[link].source_index;
                    let span = self.nodes[target].layer as f64 - self.nodes[source].layer as f64;
                    let v = self.links[link].value * span;
                    y += self.target_top(source, target, padding) * v;
                    weight += v;
                }
                if !(weight > 0.0) {
                    continue;
                }

                let dy = (y / weight - self.nodes[target].y0) * alpha;
                self.shift(target, dy);
                self.reorder_node_links(target);
            }

            self.sort_column(&mut columns[index]);
            self.resolve_collisions(&columns[index], beta, padding[index], height);
        }
    }

    fn relax_right_to_left(
        &mut self,
        columns: &mut [Vec<usize>],
        padding: &[f64],
        alpha: f64,
        beta: f64,
        height: f64,
    ) {
        for index in (0..columns.len().saturating_sub(1)).rev() {
            for position in 0..columns[index].len() {
                let source = columns[index][position];
                let mut y = 0.0;
                let mut weight = 0.0;
                for &link in &self.outgoing[source] {
                    let target = self.links[link].target_index;
                    let span = self.nodes[target].layer as f64 - self.nodes[source].layer as f64;
                    let v = self.links[link].value * span;
                    y += self.source_top(source, target, padding) * v;
                    weight += v;
                }
                if !(weight > 0.0) {
                    continue;
                }

                let dy = (y / weight - self.nodes[source].y0) * alpha;
                self.shift(source, dy);
                self.reorder_node_links(source);
            }

            self.sort_column(&mut columns[index]);
            self.resolve_collisions(&columns[index], beta, padding[index], height);
        }
    }

    fn compute_link_breadths(&mut self) {
        for node in 0..self.nodes.len() {
            let mut y = self.nodes[node].y0;
            for &link in &self.outgoing[node] {
                let width = self.links[link].width;
                self.links[link].y0 = y + width / 2.0;
                y += width;
            }

            let mut y = self.nodes[node].y0;
            for &link in &self.incoming[node] {
                let width = self.links[link].width;
                self.links[link].y1 = y + width / 2.0;
                y += width;
            }
        }
    }
}

/// Stacks every column proportionally to flow, then relaxes node positions
/// towards their neighbours for `iterations` rounds. Ties between equal
/// breadths are broken by node name so the result is reproducible.
pub(super) fn compute(
    network: &mut Network,
    columns: &mut [Vec<usize>],
    padding: &[f64],
    height: f64,
    iterations: usize,
) {
    let padding = effective_padding(columns, padding, height);
    network.initialize(columns, &padding, height);

    for round in 0..iterations {
        let alpha = 0.99_f64.powi(round as i32);
        let beta = (1.0 - alpha).max((round + 1) as f64 / iterations as f64);
        network.relax_right_to_left(columns, &padding, alpha, beta, height);
        network.relax_left_to_right(columns, &padding, alpha, beta, height);
    }

    network.compute_link_breadths();
}
