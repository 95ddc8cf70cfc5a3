//! Nutrient flow graphs: resolve per-100g nutrient amounts into a weighted
//! hierarchy of categories, lay it out as a layered Sankey diagram and answer
//! highlight queries against it.

pub mod dataset;
pub mod flow;
pub mod highlight;
pub mod layout;
pub mod nutrients;
pub mod session;
pub mod source;
pub mod util;

pub use dataset::{FoodDataset, SearchPage, SearchResult};
pub use flow::{FlowGraph, FlowLink, FlowNode, FlowOptions, NodeName, build};
pub use highlight::{Highlight, reachable};
pub use layout::{LaidOutGraph, LayoutConfig, NodeAlign, layout, mirror};
pub use nutrients::{NutrientAmounts, ResolvedQuantities, resolve};
pub use source::{FetchError, NutrientSource};
