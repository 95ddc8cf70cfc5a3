use std::fmt;

use serde::{Deserialize, Serialize};

mod build;

pub use build::{FlowOptions, build};

/// The fixed node vocabulary of a nutrient flow graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeName {
    Total,
    Water,
    Protein,
    Fat,
    Carbs,
    Minerals,
    Sodium,
    #[serde(rename = "Amino Acids")]
    AminoAcids,
    #[serde(rename = "Sat.")]
    SatFat,
    #[serde(rename = "Mono")]
    MonoFat,
    #[serde(rename = "Poly")]
    PolyFat,
    #[serde(rename = "Trans")]
    TransFat,
    #[serde(rename = "Other Fats")]
    OtherFats,
    #[serde(rename = "Fatty Acids")]
    FattyAcids,
    Sugars,
    Fiber,
    Starch,
}

impl NodeName {
    pub const ALL: [NodeName; 17] = [
        NodeName::Total,
        NodeName::Water,
        NodeName::Protein,
        NodeName::Fat,
        NodeName::Carbs,
        NodeName::Minerals,
        NodeName::Sodium,
        NodeName::AminoAcids,
        NodeName::SatFat,
        NodeName::MonoFat,
        NodeName::PolyFat,
        NodeName::TransFat,
        NodeName::OtherFats,
        NodeName::FattyAcids,
        NodeName::Sugars,
        NodeName::Fiber,
        NodeName::Starch,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Water => "Water",
            Self::Protein => "Protein",
            Self::Fat => "Fat",
            Self::Carbs => "Carbs",
            Self::Minerals => "Minerals",
            Self::Sodium => "Sodium",
            Self::AminoAcids => "Amino Acids",
            Self::SatFat => "Sat.",
            Self::MonoFat => "Mono",
            Self::PolyFat => "Poly",
            Self::TransFat => "Trans",
            Self::OtherFats => "Other Fats",
            Self::FattyAcids => "Fatty Acids",
            Self::Sugars => "Sugars",
            Self::Fiber => "Fiber",
            Self::Starch => "Starch",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.label().eq_ignore_ascii_case(label))
    }

    /// Distance from `Total` in the macro→detail hierarchy.
    pub(crate) fn macro_level(self) -> usize {
        match self {
            Self::Total => 0,
            Self::Water
            | Self::Protein
            | Self::Fat
            | Self::Carbs
            | Self::Minerals
            | Self::Sodium => 1,
            Self::AminoAcids
            | Self::SatFat
            | Self::MonoFat
            | Self::PolyFat
            | Self::TransFat
            | Self::OtherFats
            | Self::Sugars
            | Self::Fiber
            | Self::Starch => 2,
            Self::FattyAcids => 3,
        }
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowNode {
    pub name: NodeName,
    pub depth: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: NodeName,
    pub target: NodeName,
    pub value: f64,
}

/// Nodes and strictly positive links. Built fresh per request and never
/// mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl FlowGraph {
    pub fn contains(&self, name: NodeName) -> bool {
        self.nodes.iter().any(|node| node.name == name)
    }

    pub fn node(&self, name: NodeName) -> Option<&FlowNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn outgoing(&self, name: NodeName) -> impl Iterator<Item = &FlowLink> {
        self.links.iter().filter(move |link| link.source == name)
    }

    pub fn incoming(&self, name: NodeName) -> impl Iterator<Item = &FlowLink> {
        self.links.iter().filter(move |link| link.target == name)
    }

    pub fn link_value(&self, source: NodeName, target: NodeName) -> Option<f64> {
        self.links
            .iter()
            .find(|link| link.source == source && link.target == target)
            .map(|link| link.value)
    }

    pub fn outflow(&self, name: NodeName) -> f64 {
        self.outgoing(name).map(|link| link.value).sum()
    }

    pub fn inflow(&self, name: NodeName) -> f64 {
        self.incoming(name).map(|link| link.value).sum()
    }

    /// The same graph with every link pointing the other way.
    pub fn reversed(&self) -> FlowGraph {
        FlowGraph {
            nodes: self.nodes.clone(),
            links: self
                .links
                .iter()
                .map(|link| FlowLink {
                    source: link.target,
                    target: link.source,
                    value: link.value,
                })
                .collect(),
        }
    }

    /// True when no link carries flow; the caller shows a "no data" state.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_lookup() {
        for name in NodeName::ALL {
            assert_eq!(NodeName::from_label(name.label()), Some(name));
        }
        assert_eq!(NodeName::from_label("fatty acids"), Some(NodeName::FattyAcids));
        assert_eq!(NodeName::from_label("Vitamin C"), None);
    }

    #[test]
    fn serializes_with_display_labels() {
        let link = FlowLink {
            source: NodeName::Fat,
            target: NodeName::SatFat,
            value: 2.0,
        };
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, r#"{"source":"Fat","target":"Sat.","value":2.0}"#);
    }

    #[test]
    fn reversed_swaps_every_link() {
        let graph = FlowGraph {
            nodes: vec![
                FlowNode { name: NodeName::Total, depth: 0 },
                FlowNode { name: NodeName::Water, depth: 1 },
            ],
            links: vec![FlowLink {
                source: NodeName::Total,
                target: NodeName::Water,
                value: 70.0,
            }],
        };

        let reversed = graph.reversed();
        assert_eq!(reversed.link_value(NodeName::Water, NodeName::Total), Some(70.0));
        assert_eq!(reversed.link_value(NodeName::Total, NodeName::Water), None);
        assert_eq!(reversed.reversed(), graph);
    }
}
