//! Layered layout of a [`FlowGraph`]: columns from longest paths, node heights
//! proportional to flow, iterative relaxation to reduce crossings, then the
//! padding-balance, fan-out and optional mirror passes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::flow::{FlowGraph, NodeName};
use crate::util::snap_to_grid;

mod balance;
mod breadths;
mod columns;
mod fan_out;
mod mirror;

pub use fan_out::fan_out;
pub use mirror::mirror;

pub const DEFAULT_NODE_WIDTH: f64 = 20.0;
pub const DEFAULT_NODE_PADDING: f64 = 17.0;
pub const DEFAULT_ITERATIONS: usize = 6;

/// How nodes are assigned to columns once their depth is known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAlign {
    /// Column equals depth.
    Left,
    /// Column counted back from the sinks.
    Right,
    /// Like `Left`, but sinks are pushed to the last column.
    #[default]
    Justify,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    pub node_width: f64,
    pub node_padding: f64,
    pub iterations: usize,
    pub align: NodeAlign,
    /// Detail column is on the left (detail→macro graphs).
    pub reverse_hierarchy: bool,
    /// Mirror the finished layout horizontally.
    pub reverse_flow: bool,
}

impl LayoutConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            node_width: DEFAULT_NODE_WIDTH,
            node_padding: DEFAULT_NODE_PADDING,
            iterations: DEFAULT_ITERATIONS,
            align: NodeAlign::default(),
            reverse_hierarchy: false,
            reverse_flow: false,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_node_padding(mut self, node_padding: f64) -> Self {
        self.node_padding = node_padding;
        self
    }

    pub fn with_node_width(mut self, node_width: f64) -> Self {
        self.node_width = node_width;
        self
    }

    pub fn with_align(mut self, align: NodeAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_reverse_hierarchy(mut self, reverse_hierarchy: bool) -> Self {
        self.reverse_hierarchy = reverse_hierarchy;
        self
    }

    pub fn with_reverse_flow(mut self, reverse_flow: bool) -> Self {
        self.reverse_flow = reverse_flow;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub name: NodeName,
    pub depth: usize,
    pub layer: usize,
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl LayoutNode {
    pub fn center_y(&self) -> f64 {
        (self.y0 + self.y1) / 2.0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// A ribbon. `y0`/`y1` are its vertical midline at the source and target
/// ends.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutLink {
    pub source: NodeName,
    pub target: NodeName,
    pub value: f64,
    pub width: f64,
    pub y0: f64,
    pub y1: f64,
    #[serde(skip)]
    pub(crate) source_index: usize,
    #[serde(skip)]
    pub(crate) target_index: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutGraph {
    pub nodes: Vec<LayoutNode>,
    pub links: Vec<LayoutLink>,
    pub width: f64,
    pub height: f64,
    pub columns: usize,
    pub mirrored: bool,
}

impl LaidOutGraph {
    fn empty(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, name: NodeName) -> Option<&LayoutNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn column(&self, layer: usize) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.iter().filter(move |node| node.layer == layer)
    }

    /// The column holding the finest categories: rightmost for macro→detail,
    /// leftmost for detail→macro.
    pub fn detail_layer(&self, reverse_hierarchy: bool) -> Option<usize> {
        match (self.columns, reverse_hierarchy) {
            (0, _) => None,
            (_, true) => Some(0),
            (count, false) => Some(count - 1),
        }
    }
}

/// Working state shared by the layout passes. Links are referenced by index
/// from each node's `outgoing`/`incoming` lists.
struct Network {
    nodes: Vec<LayoutNode>,
    links: Vec<LayoutLink>,
    outgoing: Vec<Vec<usize>>,
    incoming: Vec<Vec<usize>>,
}

impl Network {
    /// Keeps only links with strictly positive finite flow between declared
    /// nodes, and only nodes touched by such a link.
    fn from_graph(graph: &FlowGraph) -> Self {
        let declared = graph
            .nodes
            .iter()
            .map(|node| node.name)
            .collect::<Vec<_>>();

        let valid_links = graph
            .links
            .iter()
            .filter(|link| {
                link.value.is_finite()
                    && link.value > 0.0
                    && link.source != link.target
                    && declared.contains(&link.source)
                    && declared.contains(&link.target)
            })
            .collect::<Vec<_>>();

        let mut index_by_name = HashMap::new();
        let mut nodes = Vec::new();
        for name in declared {
            let touched = valid_links
                .iter()
                .any(|link| link.source == name || link.target == name);
            if touched && !index_by_name.contains_key(&name) {
                index_by_name.insert(name, nodes.len());
                nodes.push(LayoutNode {
                    name,
                    depth: 0,
                    layer: 0,
                    value: 0.0,
                    x0: 0.0,
                    x1: 0.0,
                    y0: 0.0,
                    y1: 0.0,
                });
            }
        }

        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        let mut links = Vec::with_capacity(valid_links.len());
        for link in valid_links {
            let (Some(&source_index), Some(&target_index)) =
                (index_by_name.get(&link.source), index_by_name.get(&link.target))
            else {
                continue;
            };

            outgoing[source_index].push(links.len());
            incoming[target_index].push(links.len());
            links.push(LayoutLink {
                source: link.source,
                target: link.target,
                value: link.value,
                width: 0.0,
                y0: 0.0,
                y1: 0.0,
                source_index,
                target_index,
            });
        }

        for (index, node) in nodes.iter_mut().enumerate() {
            let inflow: f64 = incoming[index].iter().map(|&link| links[link].value).sum();
            let outflow: f64 = outgoing[index].iter().map(|&link| links[link].value).sum();
            node.value = inflow.max(outflow);
        }

        Self {
            nodes,
            links,
            outgoing,
            incoming,
        }
    }

    fn offset(&mut self, dy: f64) {
        for node in &mut self.nodes {
            node.y0 += dy;
            node.y1 += dy;
        }
        for link in &mut self.links {
            link.y0 += dy;
            link.y1 += dy;
        }
    }

    fn into_laid_out(self, width: f64, height: f64, columns: usize) -> LaidOutGraph {
        LaidOutGraph {
            nodes: self.nodes,
            links: self.links,
            width,
            height,
            columns,
            mirrored: false,
        }
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Lays out `graph` inside `config.width` × `config.height`. Never fails: a
/// graph without positive flow yields an empty layout.
pub fn layout(graph: &FlowGraph, config: &LayoutConfig) -> LaidOutGraph {
    let mut laid_out = stack(graph, config);
    if let Some(detail) = laid_out.detail_layer(config.reverse_hierarchy) {
        fan_out(&mut laid_out, detail);
    }

    if config.reverse_flow {
        mirror(&mut laid_out);
    }

    laid_out
}

/// Columns, proportional stacking, relaxation and the padding-balance pass.
fn stack(graph: &FlowGraph, config: &LayoutConfig) -> LaidOutGraph {
    let width = snap_to_grid(finite_or(config.width, 0.0).max(0.0));
    let height = finite_or(config.height, 0.0).max(0.0);
    let node_width = finite_or(config.node_width, DEFAULT_NODE_WIDTH)
        .max(0.0)
        .min(width);
    let node_padding = finite_or(config.node_padding, DEFAULT_NODE_PADDING).max(0.0);

    let mut network = Network::from_graph(graph);
    if network.nodes.is_empty() {
        log::debug!("nothing to lay out: graph carries no positive flow");
        return LaidOutGraph::empty(width, height);
    }

    let initial_columns = columns::assign(&mut network, config.align, width, node_width);
    let column_count = initial_columns.len();
    let base_padding = vec![node_padding; column_count];

    let (detail, overview) = if config.reverse_hierarchy {
        (0, column_count - 1)
    } else {
        (column_count - 1, 0)
    };

    // A crowded detail column gets fanned out afterwards, so the base layout
    // is stacked into a centred band that leaves room for the spread.
    let band = if initial_columns[detail].len() > 1 {
        fan_out::reserved_band(height)
    } else {
        height
    };

    let mut columns = initial_columns.clone();
    breadths::compute(&mut network, &mut columns, &base_padding, band, config.iterations);

    if detail != overview
        && let Some(padding) =
            balance::balanced_padding(&network.nodes, &columns, &base_padding, detail, overview)
    {
        let mut columns = initial_columns;
        breadths::compute(&mut network, &mut columns, &padding, band, config.iterations);
    }

    network.offset((height - band) / 2.0);
    network.into_laid_out(width, height, column_count)
}
