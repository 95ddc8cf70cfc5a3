use super::LaidOutGraph;

/// Flips the layout horizontally. Link geometry follows node positions, so
/// only node extents change. Applying it twice restores the original.
pub fn mirror(layout: &mut LaidOutGraph) {
    let width = layout.width;
    for node in &mut layout.nodes {
        let (x0, x1) = (node.x0, node.x1);
        node.x0 = width - x1;
        node.x1 = width - x0;
    }
    layout.mirrored = !layout.mirrored;
}

#[cfg(test)]
mod tests {
    use crate::flow::{FlowOptions, build};
    use crate::layout::{LayoutConfig, layout};
    use crate::nutrients::ResolvedQuantities;

    use super::*;

    #[test]
    fn mirror_twice_is_identity() {
        let quantities = ResolvedQuantities {
            water: 61.3,
            protein: 17.9,
            total_fat: 13.7,
            carbs: 5.1,
            minerals: 2.0,
            sat_fat: 4.9,
            mono_fat: 5.7,
            poly_fat: 1.1,
            other_fats: 2.0,
            sugars: 0.4,
            starch: 4.7,
            ..ResolvedQuantities::default()
        };
        let graph = build(&quantities, FlowOptions::default());
        let original = layout(&graph, &LayoutConfig::new(947.37, 611.0));

        let mut flipped = original.clone();
        mirror(&mut flipped);
        assert!(flipped.mirrored);
        assert_ne!(flipped, original);

        mirror(&mut flipped);
        assert_eq!(flipped, original);
    }

    #[test]
    fn mirrored_extents_keep_width() {
        let quantities = ResolvedQuantities {
            water: 80.0,
            carbs: 20.0,
            sugars: 12.0,
            fiber: 8.0,
            ..ResolvedQuantities::default()
        };
        let graph = build(&quantities, FlowOptions::default());
        let mut laid_out = layout(&graph, &LayoutConfig::new(500.0, 300.0));
        let widths = laid_out
            .nodes
            .iter()
            .map(|node| node.x1 - node.x0)
            .collect::<Vec<_>>();

        mirror(&mut laid_out);
        for (node, width) in laid_out.nodes.iter().zip(widths) {
            assert_eq!(node.x1 - node.x0, width);
            assert!(node.x0 >= 0.0 && node.x1 <= 500.0);
        }
    }
}
