use serde::{Deserialize, Serialize};

use crate::nutrients::ResolvedQuantities;

use super::{FlowGraph, FlowLink, FlowNode, NodeName};

const DEEPEST_LEVEL: usize = 3;

/// View toggles, passed explicitly on every build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowOptions {
    pub reverse_hierarchy: bool,
    pub show_sodium: bool,
    pub show_fat_breakdown: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            reverse_hierarchy: false,
            show_sodium: false,
            show_fat_breakdown: true,
        }
    }
}

struct GraphBuilder {
    reverse: bool,
    graph: FlowGraph,
}

impl GraphBuilder {
    fn new(reverse: bool) -> Self {
        let nodes = NodeName::ALL
            .into_iter()
            .map(|name| {
                let level = name.macro_level();
                let depth = if reverse { DEEPEST_LEVEL - level } else { level };
                FlowNode { name, depth }
            })
            .collect();

        Self {
            reverse,
            graph: FlowGraph {
                nodes,
                links: Vec::new(),
            },
        }
    }

    /// Adds the coarse→fine link, flipped in detail→macro mode. Links without
    /// strictly positive flow are never materialised.
    fn link(&mut self, coarse: NodeName, fine: NodeName, value: f64) {
        if !(value.is_finite() && value > 0.0) {
            return;
        }

        let (source, target) = if self.reverse {
            (fine, coarse)
        } else {
            (coarse, fine)
        };
        self.graph.links.push(FlowLink {
            source,
            target,
            value,
        });
    }
}

pub fn build(quantities: &ResolvedQuantities, options: FlowOptions) -> FlowGraph {
    use NodeName::*;

    let q = quantities;
    let mut builder = GraphBuilder::new(options.reverse_hierarchy);

    builder.link(Total, Water, q.water);
    builder.link(Total, Protein, q.protein);
    builder.link(Total, Fat, q.total_fat);
    builder.link(Total, Carbs, q.carbs);
    if options.show_sodium {
        builder.link(Total, Sodium, q.sodium);
        builder.link(Total, Minerals, (q.minerals - q.sodium).max(0.0));
    } else {
        builder.link(Total, Minerals, q.minerals);
    }

    builder.link(Protein, AminoAcids, q.amino_acids);

    if options.show_fat_breakdown {
        builder.link(Fat, SatFat, q.sat_fat);
        builder.link(Fat, MonoFat, q.mono_fat);
        builder.link(Fat, PolyFat, q.poly_fat);
        builder.link(Fat, TransFat, q.trans_fat);
        builder.link(Fat, OtherFats, q.other_fats);

        builder.link(SatFat, FattyAcids, q.sat_fat);
        builder.link(MonoFat, FattyAcids, q.mono_fat);
        builder.link(PolyFat, FattyAcids, q.poly_fat);
        builder.link(TransFat, FattyAcids, q.trans_fat);
    }

    builder.link(Carbs, Sugars, q.sugars);
    builder.link(Carbs, Fiber, q.fiber);
    builder.link(Carbs, Starch, q.starch);

    log::trace!(
        "built flow graph with {} links (options: {options:?})",
        builder.graph.links.len()
    );
    builder.graph
}
