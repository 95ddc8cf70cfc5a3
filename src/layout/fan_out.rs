use super::LaidOutGraph;

const FAN_OUT_REFERENCE_HEIGHT: f64 = 500.0;
const FAN_OUT_BASE_GAIN: f64 = 0.20;
const FAN_OUT_MAX_GAIN: f64 = 0.60;
/// Largest share of the vertical extent the spread column may cover.
const FAN_OUT_MAX_SPAN: f64 = 0.94;

fn fan_out_factor(height: f64) -> f64 {
    1.0 + (FAN_OUT_BASE_GAIN * height / FAN_OUT_REFERENCE_HEIGHT).clamp(0.0, FAN_OUT_MAX_GAIN)
}

/// Vertical extent the base layout is stacked into when the detail column
/// will be fanned out, leaving room above and below for the spread.
pub(super) fn reserved_band(height: f64) -> f64 {
    height / fan_out_factor(height)
}

/// Spreads the nodes of column `layer` away from their shared centroid so
/// thin terminal bars stay legible. The factor is bounded so the column spans
/// at most `FAN_OUT_MAX_SPAN` of the height and never leaves `[0, height]`.
/// Every node's translation is carried over to the matching end of each link
/// that touches it. Returns the applied scale factor, or `None` when the
/// column was left untouched.
pub fn fan_out(layout: &mut LaidOutGraph, layer: usize) -> Option<f64> {
    let nodes = &mut layout.nodes;
    let mut members = (0..nodes.len())
        .filter(|&index| nodes[index].layer == layer)
        .collect::<Vec<_>>();
    if members.len() < 2 {
        return None;
    }

    members.sort_by(|&a, &b| {
        nodes[a]
            .y0
            .total_cmp(&nodes[b].y0)
            .then_with(|| nodes[a].name.cmp(&nodes[b].name))
    });

    let first = &nodes[members[0]];
    let last = &nodes[members[members.len() - 1]];
    let spread = last.center_y() - first.center_y();
    if !(spread > 0.0) {
        return None;
    }

    let height = layout.height;
    let centroid =
        members.iter().map(|&index| nodes[index].center_y()).sum::<f64>() / members.len() as f64;

    let span_limit = (FAN_OUT_MAX_SPAN * height - (first.height() + last.height()) / 2.0) / spread;
    let top_limit = (centroid - first.height() / 2.0) / (centroid - first.center_y());
    let bottom_limit = (height - centroid - last.height() / 2.0) / (last.center_y() - centroid);
    let factor = fan_out_factor(height)
        .min(span_limit)
        .min(top_limit)
        .min(bottom_limit);
    if !(factor > 1.0) {
        log::debug!("column {layer} has no room to fan out (factor {factor:.3})");
        return None;
    }

    let mut deltas = vec![0.0; nodes.len()];
    for &index in &members {
        let delta = (nodes[index].center_y() - centroid) * (factor - 1.0);
        deltas[index] = delta;
        nodes[index].y0 += delta;
        nodes[index].y1 += delta;
    }

    for link in &mut layout.links {
        link.y0 += deltas[link.source_index];
        link.y1 += deltas[link.target_index];
    }

    log::debug!(
        "fanned out {} nodes in column {layer} by {factor:.3}",
        members.len()
    );
    Some(factor)
}

#[cfg(test)]
mod tests {
    use crate::flow::NodeName;
    use crate::layout::{LayoutLink, LayoutNode};

    use super::*;

    fn node(name: NodeName, layer: usize, y0: f64, y1: f64) -> LayoutNode {
        LayoutNode {
            name,
            depth: layer,
            layer,
            value: y1 - y0,
            x0: layer as f64 * 100.0,
            x1: layer as f64 * 100.0 + 20.0,
            y0,
            y1,
        }
    }

    fn link(nodes: &[LayoutNode], source: usize, target: usize, y0: f64, y1: f64) -> LayoutLink {
        LayoutLink {
            source: nodes[source].name,
            target: nodes[target].name,
            value: 1.0,
            width: 1.0,
            y0,
            y1,
            source_index: source,
            target_index: target,
        }
    }

    fn sample() -> LaidOutGraph {
        let nodes = vec![
            node(NodeName::Total, 0, 300.0, 500.0),
            node(NodeName::Water, 1, 340.0, 400.0),
            node(NodeName::Protein, 1, 410.0, 440.0),
            node(NodeName::Minerals, 1, 450.0, 460.0),
        ];
        let links = vec![
            link(&nodes, 0, 1, 330.0, 370.0),
            link(&nodes, 0, 2, 375.0, 425.0),
            link(&nodes, 0, 3, 395.0, 455.0),
        ];
        LaidOutGraph {
            nodes,
            links,
            width: 200.0,
            height: 800.0,
            columns: 2,
            mirrored: false,
        }
    }

    #[test]
    fn factor_grows_with_height_and_is_capped() {
        assert!(fan_out_factor(300.0) < fan_out_factor(900.0));
        assert_eq!(fan_out_factor(100_000.0), 1.0 + FAN_OUT_MAX_GAIN);
        assert_eq!(fan_out_factor(0.0), 1.0);
    }

    #[test]
    fn spreads_around_centroid_and_moves_link_ends() {
        let mut layout = sample();
        let before = layout.clone();
        let factor = fan_out(&mut layout, 1).unwrap();
        assert!(factor > 1.0);

        let centroid_before = (370.0 + 425.0 + 455.0) / 3.0;
        let centroid_after = (layout.nodes[1].center_y()
            + layout.nodes[2].center_y()
            + layout.nodes[3].center_y())
            / 3.0;
        assert!((centroid_before - centroid_after).abs() < 1e-9);

        for index in 1..4 {
            let delta = layout.nodes[index].y0 - before.nodes[index].y0;
            assert!((layout.nodes[index].height() - before.nodes[index].height()).abs() < 1e-9);
            let link = &layout.links[index - 1];
            assert!((link.y1 - before.links[index - 1].y1 - delta).abs() < 1e-9);
            assert_eq!(link.y0, before.links[index - 1].y0);
        }

        assert_eq!(layout.nodes[0], before.nodes[0]);
        assert!(layout.nodes[1].y0 < before.nodes[1].y0);
        assert!(layout.nodes[3].y0 > before.nodes[3].y0);
    }

    #[test]
    fn single_node_column_is_untouched() {
        let mut layout = sample();
        let before = layout.clone();
        assert_eq!(fan_out(&mut layout, 0), None);
        assert_eq!(layout, before);
    }

    #[test]
    fn spread_never_exceeds_cap() {
        let mut layout = sample();
        layout.height = 140.0;
        for node in &mut layout.nodes[1..] {
            node.y0 -= 335.0;
            node.y1 -= 335.0;
        }
        fan_out(&mut layout, 1);

        let top = layout.nodes[1].y0;
        let bottom = layout.nodes[3].y1;
        assert!(bottom - top <= FAN_OUT_MAX_SPAN * 140.0 + 1e-9);
        assert!(top >= -1e-9 && bottom <= 140.0 + 1e-9);
    }
}
